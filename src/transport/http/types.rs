use crate::app::ProductContext;
use crate::storage::ProductStore;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::sync::Arc;
use utoipa::ToSchema;

pub const SAVE_FAILED_MESSAGE: &str = "An error occurred while trying to save the product";
pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred while processing the request";
pub const VALIDATION_TITLE: &str = "One or more validation errors occurred.";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProductStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    /// A fresh persistence context bound to the shared store.
    pub fn context(&self) -> ProductContext {
        ProductContext::new(self.store.clone())
    }
}

/// Every handler that takes a `ProductContext` gets its own, scoped to the request.
#[async_trait]
impl FromRequestParts<AppState> for ProductContext {
    type Rejection = Infallible;

    async fn from_request_parts(_parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(state.context())
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of a 400 caused by field validation.
#[derive(Serialize, Debug, ToSchema)]
pub struct ValidationProblem {
    pub title: String,
    pub status: u16,
    /// Field name -> violation messages.
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ValidationProblem {
    pub fn new(errors: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            title: VALIDATION_TITLE.to_string(),
            status: 400,
            errors,
        }
    }
}
