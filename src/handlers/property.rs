// src/handlers/property.rs
use log::{error, info};
use serde::Deserialize;
use std::sync::Arc;
use warp::Rejection;

use super::error::ApiError;
use crate::services::zillow::ZillowClient;

#[derive(Debug, Deserialize)]
pub struct PropertyQuery {
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
}

pub async fn get_property(
    query: PropertyQuery,
    client: Arc<ZillowClient>,
) -> Result<impl warp::Reply, Rejection> {
    info!("Handling request to look up property data");

    let (address, city, state, zipcode) =
        match (query.address, query.city, query.state, query.zipcode) {
            (Some(a), Some(c), Some(s), Some(z)) => (a, c, s, z),
            _ => {
                return Err(warp::reject::custom(ApiError::bad_request(
                    "Missing required parameters",
                )))
            }
        };

    match client.fetch_property(&address, &city, &state, &zipcode).await {
        Ok(property) => Ok(warp::reply::json(&property)),
        Err(e) => {
            error!("Failed to fetch property data: {}", e);
            Err(warp::reject::custom(ApiError::upstream_error(format!(
                "Failed to fetch property data: {}",
                e
            ))))
        }
    }
}
