// src/services/scoring.rs
use serde::Serialize;

use super::comps::MarketSummary;
use super::money::format_currency;
use crate::models::InvestmentMetrics;

/// Safety margin under the 70% rule that earns an extra callout.
const COMFORTABLE_MARGIN: f64 = 20000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "CONSIDER")]
    Consider,
    #[serde(rename = "WEAK CONSIDER")]
    WeakConsider,
    #[serde(rename = "AVOID")]
    Avoid,
    #[serde(rename = "STRONG AVOID")]
    StrongAvoid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Confidence {
    #[serde(rename = "Very High")]
    VeryHigh,
    High,
    Medium,
    Low,
}

/// Scored buy/avoid recommendation with its supporting reasons and
/// warnings, in the order the factors were evaluated.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub score: i32,
    pub recommendation: Verdict,
    pub confidence: Confidence,
    pub reasons: Vec<String>,
    pub warnings: Vec<String>,
}

/// One row of a descending band cascade: value must exceed `0` to win
/// the band's points and message. First matching band wins.
type Band = (f64, i32, &'static str);

const CASH_FLOW_BANDS: &[Band] = &[
    (300.0, 25, "Excellent monthly cash flow (>$300)"),
    (200.0, 20, "Strong monthly cash flow (>$200)"),
    (100.0, 15, "Good monthly cash flow (>$100)"),
    (0.0, 10, "Positive monthly cash flow"),
];

const CASH_ON_CASH_BANDS: &[Band] = &[
    (15.0, 25, "Outstanding cash-on-cash return (>15%)"),
    (12.0, 20, "Excellent cash-on-cash return (>12%)"),
    (8.0, 15, "Good cash-on-cash return (>8%)"),
    (5.0, 10, "Adequate cash-on-cash return (>5%)"),
    (0.0, 5, "Positive cash-on-cash return"),
];

const CAP_RATE_BANDS: &[Band] = &[
    (10.0, 20, "Exceptional cap rate (>10%)"),
    (8.0, 15, "Strong cap rate (>8%)"),
    (6.0, 10, "Decent cap rate (>6%)"),
    (4.0, 5, "Low but acceptable cap rate"),
];

const DSCR_BANDS: &[Band] = &[
    (1.5, 10, "Excellent debt service coverage (>1.5)"),
    (1.25, 8, "Strong debt service coverage (>1.25)"),
    (1.0, 5, "Adequate debt service coverage"),
];

fn first_band(value: f64, bands: &[Band]) -> Option<(i32, &'static str)> {
    bands
        .iter()
        .find(|(threshold, _, _)| value > *threshold)
        .map(|&(_, points, message)| (points, message))
}

fn classify(score: i32) -> (Verdict, Confidence) {
    if score >= 85 {
        (Verdict::StrongBuy, Confidence::VeryHigh)
    } else if score >= 70 {
        (Verdict::Buy, Confidence::High)
    } else if score >= 50 {
        (Verdict::Consider, Confidence::Medium)
    } else if score >= 30 {
        (Verdict::WeakConsider, Confidence::Low)
    } else if score >= 10 {
        (Verdict::Avoid, Confidence::Medium)
    } else {
        (Verdict::StrongAvoid, Confidence::High)
    }
}

/// Additive heuristic scoring over the computed metrics, optionally
/// adjusted by market-comparable statistics. Deterministic and
/// infallible; re-evaluated fresh per call.
pub fn generate_recommendation(
    metrics: &InvestmentMetrics,
    market: Option<&MarketSummary>,
) -> Recommendation {
    let mut score = 0i32;
    let mut reasons: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    // Cash flow (25 points max)
    match first_band(metrics.monthly_cash_flow, CASH_FLOW_BANDS) {
        Some((points, message)) => {
            score += points;
            reasons.push(message.to_string());
        }
        None => {
            score -= 25;
            warnings.push("Negative monthly cash flow".to_string());
        }
    }

    // Cash-on-cash return (25 points max)
    match first_band(metrics.cash_on_cash_return, CASH_ON_CASH_BANDS) {
        Some((points, message)) => {
            score += points;
            reasons.push(message.to_string());
        }
        None => {
            score -= 20;
            warnings.push("Negative cash-on-cash return".to_string());
        }
    }

    // Cap rate (20 points max). A guarded-to-zero cap rate contributes
    // nothing; a computed-but-weak one is penalized.
    if let Some((points, message)) = first_band(metrics.cap_rate, CAP_RATE_BANDS) {
        score += points;
        reasons.push(message.to_string());
    } else if metrics.cap_rate > 0.0 {
        score -= 10;
        warnings.push("Very low cap rate (<4%)".to_string());
    }

    // 70% rule compliance (20 points max)
    if metrics.total_investment <= metrics.max_total_investment {
        score += 20;
        reasons.push("Meets 70% rule investment criteria".to_string());
        let margin = metrics.max_total_investment - metrics.total_investment;
        if margin > COMFORTABLE_MARGIN {
            reasons.push(format!("Strong safety margin ({})", format_currency(margin)));
        }
    } else {
        let excess = metrics.total_investment - metrics.max_total_investment;
        score -= 25;
        warnings.push(format!("Exceeds 70% rule by {}", format_currency(excess)));
    }

    // Market comparables context (15 points max), skipped entirely when
    // no summary is available
    if let Some(summary) = market {
        score += 5; // having market data at all is worth a little

        if let Some(prices) = &summary.price_statistics {
            if metrics.arv > 0.0 && prices.median_price > 0.0 {
                let price_ratio = metrics.arv / prices.median_price;
                if price_ratio <= 0.85 {
                    score += 10;
                    reasons.push("Property significantly below similar homes median".to_string());
                } else if price_ratio <= 0.95 {
                    score += 8;
                    reasons.push("Property priced below similar homes median".to_string());
                } else if price_ratio <= 1.05 {
                    score += 5;
                    reasons.push("Property competitively priced with similar homes".to_string());
                } else if price_ratio <= 1.15 {
                    score -= 3;
                    warnings.push("Property above similar homes median".to_string());
                } else {
                    score -= 8;
                    warnings.push("Property significantly overpriced vs similar homes".to_string());
                }
            }
        }

        if let Some(rentals) = &summary.rental_statistics {
            if metrics.monthly_rent > 0.0 && rentals.median_rent_estimate > 0.0 {
                let rent_ratio = metrics.monthly_rent / rentals.median_rent_estimate;
                if rent_ratio >= 1.1 {
                    score += 5;
                    reasons.push("Rent above market median - strong income potential".to_string());
                } else if rent_ratio >= 0.95 {
                    reasons.push("Rent competitive with market".to_string());
                } else {
                    warnings.push("Rent below market median".to_string());
                }
            }
        }

        if let Some(timing) = &summary.market_timing {
            if timing.average_days_on_zillow < 30.0 {
                reasons.push("Hot market - quick sales expected".to_string());
            } else if timing.average_days_on_zillow > 90.0 {
                warnings.push("Slower market - extended selling times".to_string());
            }
        }
    }

    // Debt service coverage (10 points max)
    if let Some((points, message)) = first_band(metrics.debt_service_coverage_ratio, DSCR_BANDS) {
        score += points;
        reasons.push(message.to_string());
    } else if metrics.debt_service_coverage_ratio > 0.0 {
        score -= 10;
        warnings.push("Insufficient debt service coverage (<1.0)".to_string());
    }

    // LTV (bonus/penalty)
    if metrics.ltv_ratio > 0.0 && metrics.ltv_ratio < 70.0 {
        score += 5;
        reasons.push("Conservative loan-to-value ratio".to_string());
    } else if metrics.ltv_ratio > 85.0 {
        score -= 10;
        warnings.push("High loan-to-value ratio (>85%)".to_string());
    }

    let (recommendation, confidence) = classify(score);
    Recommendation {
        score,
        recommendation,
        confidence,
        reasons,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnalysisInput;
    use crate::services::comps::{summarize_comparables, CompsAnalysis};
    use crate::services::metrics::compute_metrics;
    use crate::models::ComparableHome;
    use serde_json::json;

    fn scenario_input(market_value_comparables: f64) -> AnalysisInput {
        serde_json::from_value(json!({
            "purchasePrice": 250000,
            "repairCosts": 25000,
            "closingCosts": 5000,
            "marketValueComparables": market_value_comparables,
            "monthlyRent": 2000,
            "mortgagePayment": 1200,
            "propertyTaxes": 3600,
            "insurance": 1800,
            "managementFees": 10,
            "vacancyRate": 5,
            "noi": 18000,
            "annualDebtService": 14400,
            "loanAmount": 200000
        }))
        .unwrap()
    }

    fn priced_summary(prices: [f64; 3]) -> crate::services::comps::MarketSummary {
        let homes: Vec<ComparableHome> = prices
            .iter()
            .map(|&price| ComparableHome {
                price,
                ..ComparableHome::default()
            })
            .collect();
        match summarize_comparables(&homes) {
            CompsAnalysis::Market(summary) => summary,
            CompsAnalysis::Insufficient { .. } => panic!("expected a summary"),
        }
    }

    #[test]
    fn label_boundaries() {
        assert_eq!(classify(85).0, Verdict::StrongBuy);
        assert_eq!(classify(84).0, Verdict::Buy);
        assert_eq!(classify(70).0, Verdict::Buy);
        assert_eq!(classify(69).0, Verdict::Consider);
        assert_eq!(classify(50).0, Verdict::Consider);
        assert_eq!(classify(49).0, Verdict::WeakConsider);
        assert_eq!(classify(30).0, Verdict::WeakConsider);
        assert_eq!(classify(29).0, Verdict::Avoid);
        assert_eq!(classify(10).0, Verdict::Avoid);
        assert_eq!(classify(9).0, Verdict::StrongAvoid);
        assert_eq!(classify(-80).0, Verdict::StrongAvoid);
    }

    #[test]
    fn confidence_tracks_verdict() {
        assert_eq!(classify(90).1, Confidence::VeryHigh);
        assert_eq!(classify(75).1, Confidence::High);
        assert_eq!(classify(55).1, Confidence::Medium);
        assert_eq!(classify(35).1, Confidence::Low);
        assert_eq!(classify(15).1, Confidence::Medium);
        assert_eq!(classify(0).1, Confidence::High);
    }

    #[test]
    fn overleveraged_deal_fails_the_seventy_percent_rule() {
        // ARV 280k: max total investment 196k vs 280k committed
        let metrics = compute_metrics(&scenario_input(280000.0));
        let rec = generate_recommendation(&metrics, None);

        // +15 cash flow, +5 cash-on-cash, +10 cap rate, -25 rule, +5 DSCR
        assert_eq!(rec.score, 10);
        assert_eq!(rec.recommendation, Verdict::Avoid);
        assert!(rec
            .warnings
            .contains(&"Exceeds 70% rule by $84,000".to_string()));
        assert!(rec
            .reasons
            .contains(&"Good monthly cash flow (>$100)".to_string()));
    }

    #[test]
    fn strong_comps_flip_the_seventy_percent_rule() {
        // ARV 450k: max total investment 315k, margin 35k over 280k committed
        let metrics = compute_metrics(&scenario_input(450000.0));
        let rec = generate_recommendation(&metrics, None);

        assert!(rec
            .reasons
            .contains(&"Meets 70% rule investment criteria".to_string()));
        assert!(rec
            .reasons
            .contains(&"Strong safety margin ($35,000)".to_string()));
        // +15 cash flow, +5 cash-on-cash, -10 cap rate (4.0%), +20 rule,
        // +5 DSCR, +5 LTV
        assert_eq!(rec.score, 40);
        assert_eq!(rec.recommendation, Verdict::WeakConsider);
    }

    #[test]
    fn all_zero_metrics_is_a_strong_avoid() {
        let metrics = compute_metrics(&AnalysisInput::default());
        let rec = generate_recommendation(&metrics, None);
        // -25 cash flow, -20 cash-on-cash, +20 rule (0 <= 0)
        assert_eq!(rec.score, -25);
        assert_eq!(rec.recommendation, Verdict::StrongAvoid);
        assert_eq!(rec.confidence, Confidence::High);
    }

    #[test]
    fn band_edges_are_exclusive() {
        let metrics = InvestmentMetrics {
            monthly_cash_flow: 300.0,
            debt_service_coverage_ratio: 1.25,
            // Keep the 70% rule neutral-positive
            total_investment: 0.0,
            max_total_investment: 0.0,
            ..InvestmentMetrics::default()
        };
        let rec = generate_recommendation(&metrics, None);
        // 300 is not >300: the 20-point band wins; 1.25 is not >1.25:
        // the 5-point band wins
        assert!(rec
            .reasons
            .contains(&"Strong monthly cash flow (>$200)".to_string()));
        assert!(rec
            .reasons
            .contains(&"Adequate debt service coverage".to_string()));
    }

    #[test]
    fn weak_but_positive_cap_rate_is_penalized() {
        let metrics = InvestmentMetrics {
            cap_rate: 3.5,
            ..InvestmentMetrics::default()
        };
        let rec = generate_recommendation(&metrics, None);
        assert!(rec.warnings.contains(&"Very low cap rate (<4%)".to_string()));

        // Guarded-to-zero cap rate contributes nothing either way
        let metrics = InvestmentMetrics::default();
        let rec = generate_recommendation(&metrics, None);
        assert!(!rec.warnings.iter().any(|w| w.contains("cap rate")));
        assert!(!rec.reasons.iter().any(|r| r.contains("cap rate")));
    }

    #[test]
    fn market_context_rewards_underpriced_property() {
        let summary = priced_summary([300000.0, 350000.0, 400000.0]);
        let metrics = InvestmentMetrics {
            arv: 280000.0, // ratio 0.8 vs 350k median
            ..InvestmentMetrics::default()
        };
        let without = generate_recommendation(&metrics, None);
        let with = generate_recommendation(&metrics, Some(&summary));
        // +5 for data, +10 for buying well under the comps median
        assert_eq!(with.score, without.score + 15);
        assert!(with
            .reasons
            .contains(&"Property significantly below similar homes median".to_string()));
    }

    #[test]
    fn market_context_penalizes_overpriced_property() {
        let summary = priced_summary([300000.0, 350000.0, 400000.0]);
        let metrics = InvestmentMetrics {
            arv: 420000.0, // ratio 1.2
            ..InvestmentMetrics::default()
        };
        let without = generate_recommendation(&metrics, None);
        let with = generate_recommendation(&metrics, Some(&summary));
        // +5 for data, -8 for the overpriced band
        assert_eq!(with.score, without.score - 3);
        assert!(with
            .warnings
            .contains(&"Property significantly overpriced vs similar homes".to_string()));
    }

    #[test]
    fn rent_and_timing_notes_do_not_move_the_score() {
        let homes: Vec<ComparableHome> = (0..3)
            .map(|_| ComparableHome {
                price: 200000.0,
                rent_zestimate: 2000.0,
                days_on_zillow: 120.0,
                ..ComparableHome::default()
            })
            .collect();
        let summary = match summarize_comparables(&homes) {
            CompsAnalysis::Market(summary) => summary,
            CompsAnalysis::Insufficient { .. } => panic!("expected a summary"),
        };
        let metrics = InvestmentMetrics {
            monthly_rent: 2000.0, // ratio 1.0: neutral note
            ..InvestmentMetrics::default()
        };
        let rec = generate_recommendation(&metrics, Some(&summary));
        assert!(rec
            .reasons
            .contains(&"Rent competitive with market".to_string()));
        assert!(rec
            .warnings
            .contains(&"Slower market - extended selling times".to_string()));

        // Only the flat +5 data bonus applies (arv is 0, so no price band)
        let without = generate_recommendation(&metrics, None);
        assert_eq!(rec.score, without.score + 5);
    }

    #[test]
    fn missing_market_summary_skips_the_factor_entirely() {
        let metrics = compute_metrics(&scenario_input(280000.0));
        let with_none = generate_recommendation(&metrics, None);
        let again = generate_recommendation(&metrics, None);
        assert_eq!(with_none.score, again.score);
        assert!(!with_none.reasons.iter().any(|r| r.contains("similar homes")));
    }

    #[test]
    fn high_ltv_is_penalized() {
        let metrics = InvestmentMetrics {
            ltv_ratio: 90.0,
            ..InvestmentMetrics::default()
        };
        let rec = generate_recommendation(&metrics, None);
        assert!(rec
            .warnings
            .contains(&"High loan-to-value ratio (>85%)".to_string()));
    }

    #[test]
    fn verdict_serializes_as_display_labels() {
        let metrics = compute_metrics(&AnalysisInput::default());
        let rec = generate_recommendation(&metrics, None);
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["recommendation"], "STRONG AVOID");
        assert_eq!(json["confidence"], "High");
    }
}
