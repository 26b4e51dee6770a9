// src/handlers/similar_homes.rs
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::Rejection;

use super::error::ApiError;
use crate::models::ComparableHome;
use crate::services::comps::{summarize_comparables, CompsAnalysis};
use crate::services::zillow::ZillowClient;

#[derive(Debug, Deserialize)]
pub struct SimilarHomesQuery {
    pub zpid: Option<String>,
}

#[derive(Serialize)]
struct SimilarHomesResponse {
    target_zpid: String,
    similar_homes: Vec<ComparableHome>,
    #[serde(flatten)]
    analysis: CompsAnalysis,
}

pub async fn get_similar_homes(
    query: SimilarHomesQuery,
    client: Arc<ZillowClient>,
) -> Result<impl warp::Reply, Rejection> {
    info!("Handling request to get similar homes");

    let zpid = query
        .zpid
        .ok_or_else(|| warp::reject::custom(ApiError::bad_request("Missing zpid parameter")))?;

    let homes = client.similar_homes(&zpid).await.map_err(|e| {
        error!("Failed to fetch similar homes: {}", e);
        warp::reject::custom(ApiError::upstream_error(format!(
            "Failed to fetch similar homes: {}",
            e
        )))
    })?;

    let analysis = summarize_comparables(&homes);
    Ok(warp::reply::json(&SimilarHomesResponse {
        target_zpid: zpid,
        similar_homes: homes,
        analysis,
    }))
}
