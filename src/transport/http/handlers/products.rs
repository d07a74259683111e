use crate::app::ProductContext;
use crate::domain::{Product, ProductPayload};
use crate::transport::http::handlers::common::{invalid_json, save_failed, validation_problem, ApiError};
use crate::transport::http::types::{ApiResponse, ValidationProblem};
use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/product",
    tag = "Product",
    operation_id = "GetProduct",
    responses(
        (status = 200, description = "All stored products", body = [Product]),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn list_products_handler(context: ProductContext) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(context.list().await?))
}

#[utoipa::path(
    get,
    path = "/product/{id}",
    tag = "Product",
    operation_id = "GetProductById",
    params(
        ("id" = Uuid, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 404, description = "No product with this id"),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn get_product_handler(
    mut context: ProductContext,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    Ok(match context.find(id).await? {
        Some(product) => (StatusCode::OK, Json(product)).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    })
}

#[utoipa::path(
    post,
    path = "/product",
    tag = "Product",
    operation_id = "PostProduct",
    request_body = ProductPayload,
    responses(
        (status = 201, description = "Product created", body = Product,
            headers(("Location" = String, description = "URL of the new product"))),
        (status = 400, description = "Validation failed or nothing was saved", body = ValidationProblem),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn create_product_handler(
    mut context: ProductContext,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = match payload {
        Ok(v) => v,
        Err(e) => return Ok(invalid_json(e)),
    };
    if let Err(errors) = payload.check() {
        return Ok(validation_problem(errors));
    }

    let product = payload.into_new_product();
    context.add(product.clone());
    let affected = context.save_changes().await?;
    if affected == 0 {
        return Ok(save_failed());
    }

    tracing::info!(id = %product.id, "product created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/product/{}", product.id))],
        Json(product),
    )
        .into_response())
}

#[utoipa::path(
    put,
    path = "/product/{id}",
    tag = "Product",
    operation_id = "PutProduct",
    params(
        ("id" = Uuid, Path, description = "Product id")
    ),
    request_body = ProductPayload,
    responses(
        (status = 204, description = "Product replaced"),
        (status = 400, description = "Validation failed or nothing was saved", body = ValidationProblem),
        (status = 404, description = "No product with this id"),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn update_product_handler(
    mut context: ProductContext,
    Path(id): Path<Uuid>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    // Existence is checked before the body so a missing id is always a 404.
    if context.find_untracked(id).await?.is_none() {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let Json(payload) = match payload {
        Ok(v) => v,
        Err(e) => return Ok(invalid_json(e)),
    };
    if let Err(errors) = payload.check() {
        return Ok(validation_problem(errors));
    }

    context.update(payload.into_replacement(id));
    let affected = context.save_changes().await?;
    if affected == 0 {
        return Ok(save_failed());
    }

    tracing::info!(%id, "product updated");
    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    delete,
    path = "/product/{id}",
    tag = "Product",
    operation_id = "DeleteProduct",
    params(
        ("id" = Uuid, Path, description = "Product id")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, description = "Nothing was saved", body = String),
        (status = 404, description = "No product with this id"),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn delete_product_handler(
    mut context: ProductContext,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let product = match context.find(id).await? {
        Some(p) => p,
        None => return Ok(StatusCode::NOT_FOUND.into_response()),
    };

    context.remove(&product);
    let affected = context.save_changes().await?;
    if affected == 0 {
        return Ok(save_failed());
    }

    tracing::info!(%id, "product deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}
