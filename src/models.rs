// src/models.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A form field as it arrives over the wire: a JSON number, free text,
/// or nothing at all. Absent fields deserialize to `Missing` via the
/// struct-level `#[serde(default)]`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl FieldValue {
    /// Parse-with-default: every input field resolves to a float, never
    /// an error. Unparseable or empty text falls back to `default`.
    pub fn parse_or(&self, default: f64) -> f64 {
        match self {
            FieldValue::Number(n) if n.is_finite() => *n,
            FieldValue::Text(s) => s.trim().parse::<f64>().unwrap_or(default),
            _ => default,
        }
    }
}

/// Raw analysis form inputs. Field names match the frontend form wire
/// format (camelCase).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisInput {
    pub purchase_price: FieldValue,
    pub closing_costs: FieldValue,
    pub repair_costs: FieldValue,
    pub monthly_rent: FieldValue,
    pub mortgage_payment: FieldValue,
    /// Annual.
    pub property_taxes: FieldValue,
    /// Annual.
    pub insurance: FieldValue,
    /// Percent of monthly rent, defaults to 10.
    pub management_fees: FieldValue,
    /// Percent of annual rent, defaults to 5.
    pub vacancy_rate: FieldValue,
    pub loan_amount: FieldValue,
    pub property_value: FieldValue,
    pub market_value_comparables: FieldValue,
    /// Annual net operating income, if known.
    pub noi: FieldValue,
    pub annual_debt_service: FieldValue,
    /// Annual.
    pub operating_expenses: FieldValue,
}

/// Derived investment metrics. Pure function of `AnalysisInput`;
/// immutable once produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentMetrics {
    pub arv: f64,
    pub max_total_investment: f64,
    pub max_purchase_price: f64,
    pub total_investment: f64,
    pub available_rehab_budget: f64,
    pub monthly_cash_flow: f64,
    pub annual_cash_flow: f64,
    pub cash_on_cash_return: f64,
    pub cap_rate: f64,
    pub ltv_ratio: f64,
    pub gross_rent_multiplier: f64,
    pub debt_service_coverage_ratio: f64,
    /// Reported but not scored.
    pub break_even_ratio: f64,
    pub forced_appreciation: f64,
    #[serde(rename = "totalROI")]
    pub total_roi: f64,
    pub annual_vacancy_cost: f64,
    pub annual_maintenance: f64,
    /// Normalized back to percent.
    pub vacancy_rate: f64,
    pub monthly_expenses: f64,
    pub annual_expenses: f64,
    pub monthly_rent: f64,
    pub estimated_noi: f64,
    pub purchase_price: f64,
    pub repair_costs: f64,
    pub closing_costs: f64,
}

/// A normalized comparable property, either fetched from the similar-homes
/// endpoint or supplied directly in an analyze request. Field names match
/// the upstream proxy's snake_case wire format; missing numerics are 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparableHome {
    pub zpid: Value,
    pub address: String,
    pub price: f64,
    /// Automated valuation, used when no listing price is available.
    pub zestimate: f64,
    pub beds: f64,
    pub baths: f64,
    pub sqft: f64,
    pub lot_size: f64,
    pub lot_units: String,
    pub year_built: f64,
    pub property_type: String,
    pub home_status: String,
    pub days_on_zillow: f64,
    pub price_per_sqft: f64,
    pub last_sold_date: String,
    pub last_sold_price: f64,
    pub property_tax: f64,
    pub hoa_fee: f64,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub rent_zestimate: f64,
    pub image_url: String,
    pub property_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gross_rent_multiplier: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap_rate_estimate: Option<f64>,
}

/// Best-effort property record from the address lookup, used by the
/// frontend to pre-populate the analysis form.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyLookup {
    pub zpid: Value,
    pub image_link: Option<String>,
    pub street_view: Option<String>,
    pub home_type: String,
    pub zestimate: f64,
    pub living_area: f64,
    pub lot_area: f64,
    pub lot_units: String,
    pub hoa_fee: f64,
    pub year_built: f64,
    pub rent_zestimate: f64,
    pub heating: String,
    pub beds: String,
    pub baths: String,
}
