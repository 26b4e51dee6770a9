// src/bin/analyze_sample.rs
//
// Offline end-to-end run of the analysis pipeline on a canned deal,
// useful for eyeballing scoring changes without a RapidAPI key.
use rei_analyzer::models::{AnalysisInput, ComparableHome};
use rei_analyzer::services::comps::summarize_comparables;
use rei_analyzer::services::metrics::compute_metrics;
use rei_analyzer::services::scoring::generate_recommendation;
use serde_json::json;

fn main() -> std::result::Result<(), rei_analyzer::BoxError> {
    env_logger::init();

    let input: AnalysisInput = serde_json::from_value(json!({
        "purchasePrice": 250000,
        "repairCosts": 25000,
        "closingCosts": 5000,
        "marketValueComparables": 450000,
        "monthlyRent": 2000,
        "mortgagePayment": 1200,
        "propertyTaxes": 3600,
        "insurance": 1800,
        "managementFees": 10,
        "vacancyRate": 5,
        "noi": 18000,
        "annualDebtService": 14400,
        "loanAmount": 200000
    }))?;

    let comps: Vec<ComparableHome> = serde_json::from_value(json!([
        {"price": 430000, "rent_zestimate": 2100, "days_on_zillow": 25},
        {"price": 455000, "rent_zestimate": 1950, "days_on_zillow": 40},
        {"price": 470000, "rent_zestimate": 2200, "days_on_zillow": 18}
    ]))?;

    let metrics = compute_metrics(&input);
    println!("Metrics: {}", serde_json::to_string_pretty(&metrics)?);

    let analysis = summarize_comparables(&comps);
    println!("Market: {}", serde_json::to_string_pretty(&analysis)?);

    let recommendation = generate_recommendation(&metrics, analysis.market());
    println!(
        "Recommendation: {}",
        serde_json::to_string_pretty(&recommendation)?
    );
    Ok(())
}
