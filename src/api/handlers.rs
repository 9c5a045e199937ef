use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::web;
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use tracing::info;

use super::AppState;
use crate::error::ApiError;
use crate::model::Address;

#[derive(Debug, Deserialize)]
pub struct AddressGraphQuery {
    pub address: Option<String>,
    pub max_addresses: Option<usize>,
}

// Graph around a seed address
pub async fn get_address_graph(
    data: web::Data<AppState>,
    query: web::Query<AddressGraphQuery>,
) -> Result<HttpResponse, ApiError> {
    let Some(Ok(seed)) = query.address.as_deref().map(Address::parse) else {
        return Err(ApiError::MissingAddress);
    };
    let bound = data.crawler.config().clamp_bound(query.max_addresses);

    info!("address_graph_requested::seed::{}::bound::{}", seed, bound);

    match data.crawler.build_with_bound(&seed, bound).await {
        Ok(graph) => Ok(HttpResponse::Ok().json(graph)),
        Err(e) => {
            error!("address_graph_failed::seed::{}::error::{}", seed, e);
            Err(ApiError::Graph(e))
        },
    }
}

pub async fn health() -> impl Responder { HttpResponse::Ok().json(json!({ "status": "ok" })) }
