// src/services/comps.rs
use serde::Serialize;

use super::money::format_currency;
use crate::models::ComparableHome;

/// Minimum number of valid comparables required to produce statistics.
pub const MIN_VALID_HOMES: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct PriceStatistics {
    pub median_price: f64,
    pub average_price: f64,
    pub min_price: f64,
    pub max_price: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RentalStatistics {
    pub median_rent_estimate: f64,
    pub average_rent_estimate: f64,
    pub min_rent_estimate: f64,
    pub max_rent_estimate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PricePerSqftStatistics {
    pub median_price_per_sqft: f64,
    pub average_price_per_sqft: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarketTiming {
    pub average_days_on_zillow: f64,
    pub median_days_on_zillow: f64,
}

/// Aggregate market statistics over a set of comparable homes. A facet
/// with no positive observations is omitted entirely rather than zeroed.
#[derive(Debug, Clone, Serialize)]
pub struct MarketSummary {
    pub total_similar_homes: usize,
    pub price_statistics: Option<PriceStatistics>,
    pub rental_statistics: Option<RentalStatistics>,
    pub price_per_sqft_statistics: Option<PricePerSqftStatistics>,
    pub market_timing: Option<MarketTiming>,
    pub market_insights: Vec<String>,
}

/// Summarizer output: either a populated summary or an explicit
/// insufficient-data marker. The marker is not an error; callers score
/// without market context when they see it.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CompsAnalysis {
    Market(MarketSummary),
    Insufficient { error: String },
}

impl CompsAnalysis {
    pub fn market(&self) -> Option<&MarketSummary> {
        match self {
            CompsAnalysis::Market(summary) => Some(summary),
            CompsAnalysis::Insufficient { .. } => None,
        }
    }
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn min_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

fn max_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Reduces a list of comparable homes into market statistics and
/// human-readable insights. Requires at least [`MIN_VALID_HOMES`] homes
/// with a positive price or zestimate.
pub fn summarize_comparables(homes: &[ComparableHome]) -> CompsAnalysis {
    let valid: Vec<&ComparableHome> = homes
        .iter()
        .filter(|h| h.price > 0.0 || h.zestimate > 0.0)
        .collect();

    if valid.len() < MIN_VALID_HOMES {
        return CompsAnalysis::Insufficient {
            error: "Insufficient similar homes data for analysis".to_string(),
        };
    }

    let prices: Vec<f64> = valid
        .iter()
        .map(|h| if h.price > 0.0 { h.price } else { h.zestimate })
        .filter(|p| *p > 0.0)
        .collect();
    let rents: Vec<f64> = valid
        .iter()
        .map(|h| h.rent_zestimate)
        .filter(|r| *r > 0.0)
        .collect();
    let prices_per_sqft: Vec<f64> = valid
        .iter()
        .map(|h| h.price_per_sqft)
        .filter(|p| *p > 0.0)
        .collect();
    let days_on_market: Vec<f64> = valid
        .iter()
        .map(|h| h.days_on_zillow)
        .filter(|d| *d > 0.0)
        .collect();

    let price_statistics = (!prices.is_empty()).then(|| PriceStatistics {
        median_price: median(&prices),
        average_price: mean(&prices),
        min_price: min_of(&prices),
        max_price: max_of(&prices),
    });
    let rental_statistics = (!rents.is_empty()).then(|| RentalStatistics {
        median_rent_estimate: median(&rents),
        average_rent_estimate: mean(&rents),
        min_rent_estimate: min_of(&rents),
        max_rent_estimate: max_of(&rents),
    });
    let price_per_sqft_statistics = (!prices_per_sqft.is_empty()).then(|| PricePerSqftStatistics {
        median_price_per_sqft: median(&prices_per_sqft),
        average_price_per_sqft: mean(&prices_per_sqft),
    });
    let market_timing = (!days_on_market.is_empty()).then(|| MarketTiming {
        average_days_on_zillow: mean(&days_on_market),
        median_days_on_zillow: median(&days_on_market),
    });

    let mut market_insights = Vec::new();
    if let Some(stats) = &price_statistics {
        market_insights.push(format!(
            "Similar homes range: {} - {}",
            format_currency(stats.min_price),
            format_currency(stats.max_price)
        ));
        market_insights.push(format!(
            "Median similar home price: {}",
            format_currency(stats.median_price)
        ));
    }
    if let Some(stats) = &rental_statistics {
        market_insights.push(format!(
            "Area rental range: {} - {}/month",
            format_currency(stats.min_rent_estimate),
            format_currency(stats.max_rent_estimate)
        ));
    }
    if let Some(timing) = &market_timing {
        let avg_dom = timing.average_days_on_zillow;
        market_insights.push(if avg_dom < 20.0 {
            "Very hot market - similar homes selling quickly".to_string()
        } else if avg_dom < 45.0 {
            "Active market - normal absorption rate".to_string()
        } else if avg_dom < 90.0 {
            "Moderate market - longer time to sell".to_string()
        } else {
            "Slower market - extended marketing time".to_string()
        });
    }

    CompsAnalysis::Market(MarketSummary {
        total_similar_homes: valid.len(),
        price_statistics,
        rental_statistics,
        price_per_sqft_statistics,
        market_timing,
        market_insights,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ComparableHome;

    fn home(price: f64) -> ComparableHome {
        ComparableHome {
            price,
            ..ComparableHome::default()
        }
    }

    fn summary(homes: &[ComparableHome]) -> MarketSummary {
        match summarize_comparables(homes) {
            CompsAnalysis::Market(summary) => summary,
            CompsAnalysis::Insufficient { error } => {
                panic!("expected a summary, got marker: {error}")
            }
        }
    }

    #[test]
    fn fewer_than_three_valid_homes_is_insufficient() {
        let homes = vec![home(100000.0), home(150000.0)];
        assert!(summarize_comparables(&homes).market().is_none());
    }

    #[test]
    fn homes_without_price_or_zestimate_do_not_count_as_valid() {
        // Five records, only two carry a usable value
        let homes = vec![
            home(100000.0),
            home(150000.0),
            home(0.0),
            home(0.0),
            home(-1.0),
        ];
        assert!(summarize_comparables(&homes).market().is_none());
    }

    #[test]
    fn three_prices_produce_full_statistics() {
        let homes = vec![home(100000.0), home(150000.0), home(200000.0)];
        let summary = summary(&homes);
        assert_eq!(summary.total_similar_homes, 3);
        let stats = summary.price_statistics.unwrap();
        assert_eq!(stats.median_price, 150000.0);
        assert_eq!(stats.average_price, 150000.0);
        assert_eq!(stats.min_price, 100000.0);
        assert_eq!(stats.max_price, 200000.0);
    }

    #[test]
    fn even_count_median_averages_the_middle_pair() {
        assert_eq!(median(&[10.0, 20.0, 30.0, 40.0]), 25.0);
        assert_eq!(median(&[40.0, 10.0, 30.0, 20.0]), 25.0);
    }

    #[test]
    fn zestimate_stands_in_for_missing_price() {
        let mut unlisted = home(0.0);
        unlisted.zestimate = 300000.0;
        let homes = vec![home(100000.0), home(200000.0), unlisted];
        let stats = summary(&homes).price_statistics.unwrap();
        assert_eq!(stats.max_price, 300000.0);
        assert_eq!(stats.median_price, 200000.0);
    }

    #[test]
    fn facets_without_positive_values_are_omitted() {
        let homes = vec![home(100000.0), home(150000.0), home(200000.0)];
        let summary = summary(&homes);
        assert!(summary.rental_statistics.is_none());
        assert!(summary.price_per_sqft_statistics.is_none());
        assert!(summary.market_timing.is_none());
        // Insights still cover the price facet
        assert_eq!(summary.market_insights.len(), 2);
        assert_eq!(
            summary.market_insights[0],
            "Similar homes range: $100,000 - $200,000"
        );
        assert_eq!(
            summary.market_insights[1],
            "Median similar home price: $150,000"
        );
    }

    #[test]
    fn market_temperature_buckets() {
        let with_dom = |dom: f64| {
            let mut h = home(100000.0);
            h.days_on_zillow = dom;
            vec![h.clone(), h.clone(), h]
        };
        let insight = |dom: f64| summary(&with_dom(dom)).market_insights.pop().unwrap();

        assert_eq!(
            insight(10.0),
            "Very hot market - similar homes selling quickly"
        );
        assert_eq!(insight(30.0), "Active market - normal absorption rate");
        assert_eq!(insight(60.0), "Moderate market - longer time to sell");
        assert_eq!(insight(120.0), "Slower market - extended marketing time");
    }

    #[test]
    fn rental_statistics_and_insight() {
        let with_rent = |rent: f64| {
            let mut h = home(100000.0);
            h.rent_zestimate = rent;
            h
        };
        let homes = vec![with_rent(1200.0), with_rent(1500.0), with_rent(1800.0)];
        let summary = summary(&homes);
        let stats = summary.rental_statistics.unwrap();
        assert_eq!(stats.median_rent_estimate, 1500.0);
        assert_eq!(stats.average_rent_estimate, 1500.0);
        assert!(summary
            .market_insights
            .contains(&"Area rental range: $1,200 - $1,800/month".to_string()));
    }

    #[test]
    fn insufficient_marker_serializes_as_error_object() {
        let json = serde_json::to_value(summarize_comparables(&[])).unwrap();
        assert_eq!(
            json["error"],
            "Insufficient similar homes data for analysis"
        );
    }
}
