// src/handlers/health.rs
use chrono::Utc;
use serde_json::json;
use warp::Rejection;

pub async fn get_health() -> Result<impl warp::Reply, Rejection> {
    Ok(warp::reply::json(&json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    })))
}
