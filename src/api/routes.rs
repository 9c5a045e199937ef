use actix_web::HttpRequest;
use actix_web::Resource;
use actix_web::Scope;
use actix_web::error::QueryPayloadError;
use actix_web::web;

use super::handlers::get_address_graph;
use super::handlers::health;
use crate::error::ApiError;

fn query_error_handler(
    err: QueryPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    ApiError::InvalidQuery(err.to_string()).into()
}

pub fn graph_routes() -> Scope {
    web::scope("/api")
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .route("/address", web::get().to(get_address_graph))
}

pub fn health_routes() -> Resource { web::resource("/health").route(web::get().to(health)) }
