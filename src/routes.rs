// src/routes.rs
use log::info;
use std::convert::Infallible;
use std::sync::Arc;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::analyze::post_analyze;
use crate::handlers::error::{ApiError, ApiErrorKind};
use crate::handlers::health::get_health;
use crate::handlers::property::{get_property, PropertyQuery};
use crate::handlers::similar_homes::{get_similar_homes, SimilarHomesQuery};
use crate::services::zillow::ZillowClient;

// Recovery handling for our custom errors
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = match api_error.kind {
            ApiErrorKind::BadRequest => warp::http::StatusCode::BAD_REQUEST,
            ApiErrorKind::Upstream => warp::http::StatusCode::BAD_GATEWAY,
            ApiErrorKind::Internal => warp::http::StatusCode::INTERNAL_SERVER_ERROR,
        };
        message = api_error.message.clone();
    } else if err.find::<warp::filters::body::BodyDeserializeError>().is_some() {
        code = warp::http::StatusCode::BAD_REQUEST;
        message = "Invalid request body".to_string();
    } else {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(
    client: Arc<ZillowClient>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let client_filter = warp::any().map(move || client.clone());

    let health_route = warp::path!("api" / "v1" / "health")
        .and(warp::get())
        .and_then(get_health);

    let property_route = warp::path!("api" / "v1" / "property")
        .and(warp::get())
        .and(warp::query::<PropertyQuery>())
        .and(client_filter.clone())
        .and_then(get_property);

    let similar_homes_route = warp::path!("api" / "v1" / "similar-homes")
        .and(warp::get())
        .and(warp::query::<SimilarHomesQuery>())
        .and(client_filter.clone())
        .and_then(get_similar_homes);

    let analyze_route = warp::path!("api" / "v1" / "analyze")
        .and(warp::post())
        .and(warp::body::json())
        .and_then(post_analyze);

    info!("All routes configured successfully.");

    health_route
        .or(property_route)
        .or(similar_homes_route)
        .or(analyze_route)
        .recover(handle_rejection)
}
