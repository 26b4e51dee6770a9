// src/handlers/analyze.rs
use log::info;
use serde::{Deserialize, Serialize};
use warp::Rejection;

use crate::models::{AnalysisInput, ComparableHome, InvestmentMetrics};
use crate::services::comps::{summarize_comparables, CompsAnalysis};
use crate::services::metrics::compute_metrics;
use crate::services::scoring::{generate_recommendation, Recommendation};

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub input: AnalysisInput,
    /// Optional comparable homes; when present the recommendation is
    /// adjusted by market context.
    #[serde(default)]
    pub similar_homes: Vec<ComparableHome>,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    metrics: InvestmentMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    market_analysis: Option<CompsAnalysis>,
    recommendation: Recommendation,
}

/// Runs the full pipeline: metrics, optional comparables summary, score.
/// The pipeline itself cannot fail; only a malformed body is rejected.
pub async fn post_analyze(request: AnalyzeRequest) -> Result<impl warp::Reply, Rejection> {
    info!(
        "Handling analysis request ({} comparable homes supplied)",
        request.similar_homes.len()
    );

    let metrics = compute_metrics(&request.input);
    let market_analysis = if request.similar_homes.is_empty() {
        None
    } else {
        Some(summarize_comparables(&request.similar_homes))
    };
    let recommendation =
        generate_recommendation(&metrics, market_analysis.as_ref().and_then(CompsAnalysis::market));

    Ok(warp::reply::json(&AnalyzeResponse {
        metrics,
        market_analysis,
        recommendation,
    }))
}
