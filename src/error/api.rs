use actix_web::HttpResponse;
use actix_web::ResponseError;
use actix_web::http::StatusCode;
use serde_json::json;
use thiserror::Error;

use super::GraphError;
use crate::constants::GRAPH_FAILURE_MESSAGE;
use crate::constants::MISSING_ADDRESS_MESSAGE;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Missing 'address' parameter")]
    MissingAddress,
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    #[error("Graph build failed: {0}")]
    Graph(#[from] GraphError),
}

impl ApiError {
    // Internal causes never reach the caller
    fn public_message(&self) -> String {
        match self {
            ApiError::MissingAddress => MISSING_ADDRESS_MESSAGE.to_string(),
            ApiError::InvalidQuery(reason) => reason.clone(),
            ApiError::Graph(_) => GRAPH_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingAddress | ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::Graph(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.public_message()
        }))
    }
}
