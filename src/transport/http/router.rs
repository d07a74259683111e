use crate::domain::{Product, ProductPayload};
use crate::transport::http::handlers::{health, products};
use crate::transport::http::types::{ApiResponse, AppState, ValidationProblem};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        products::list_products_handler,
        products::get_product_handler,
        products::create_product_handler,
        products::update_product_handler,
        products::delete_product_handler
    ),
    components(schemas(Product, ProductPayload, ValidationProblem, ApiResponse)),
    tags(
        (name = "Product", description = "CRUD over the Products table"),
        (name = "Health", description = "Liveness and database reachability")
    )
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/product",
            get(products::list_products_handler).post(products::create_product_handler),
        )
        .route(
            "/product/:id",
            get(products::get_product_handler)
                .put(products::update_product_handler)
                .delete(products::delete_product_handler),
        )
        .with_state(app_state)
}

/// The full application: API routes, Swagger UI, CORS and request tracing.
pub fn create_app(app_state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);
    create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
