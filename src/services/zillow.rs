// src/services/zillow.rs
use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use regex::Regex;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::models::{ComparableHome, PropertyLookup};

const RAPIDAPI_HOST: &str = "zillow-com4.p.rapidapi.com";
const SIMILAR_HOMES_LIMIT: usize = 20;
const COMPS_CACHE_MINUTES: i64 = 15;

/// Expense ratio assumed when estimating a comparable's cap rate from
/// its rent estimate alone.
const COMP_CAP_RATE_EXPENSE_FACTOR: f64 = 0.6;

/// Client for the Zillow RapidAPI property endpoints, with a short-lived
/// in-memory cache for similar-homes lookups.
pub struct ZillowClient {
    http: Client,
    api_key: String,
    comps_cache: RwLock<HashMap<String, (DateTime<Utc>, Vec<ComparableHome>)>>,
}

impl ZillowClient {
    pub fn new(api_key: String) -> Self {
        ZillowClient {
            http: Client::new(),
            api_key,
            comps_cache: RwLock::new(HashMap::new()),
        }
    }

    async fn get_json(&self, path: &str, params: &[(&str, &str)]) -> Result<Value> {
        let url = format!("https://{}/{}", RAPIDAPI_HOST, path);
        let response = self
            .http
            .get(&url)
            .query(params)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", RAPIDAPI_HOST)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "API request failed with status {}",
                response.status()
            ));
        }
        Ok(response.json().await?)
    }

    /// Looks up a property by street address and returns the normalized
    /// record the frontend pre-populates the analysis form with.
    pub async fn fetch_property(
        &self,
        address: &str,
        city: &str,
        state: &str,
        zipcode: &str,
    ) -> Result<PropertyLookup> {
        let full_address = format!("{} {} {} {}", address, city, state, zipcode);
        info!("Fetching property data for '{}'", full_address);

        let body = self
            .get_json(
                "properties/search-address",
                &[("address", full_address.as_str())],
            )
            .await?;
        let data = body.get("data").cloned().unwrap_or(Value::Null);
        Ok(extract_property(&data))
    }

    /// Fetches and normalizes up to 20 similar homes for a zpid. Results
    /// are cached in memory for a few minutes since the frontend re-polls
    /// the same property while the user edits figures.
    pub async fn similar_homes(&self, zpid: &str) -> Result<Vec<ComparableHome>> {
        {
            let cache = self.comps_cache.read().await;
            if let Some((fetched_at, homes)) = cache.get(zpid) {
                if *fetched_at > Utc::now() - Duration::minutes(COMPS_CACHE_MINUTES) {
                    info!("Returning cached similar homes for zpid {}", zpid);
                    return Ok(homes.clone());
                }
            }
        }

        info!("Fetching similar homes for zpid {}", zpid);
        let body = self
            .get_json("properties/similar-homes", &[("zpid", zpid)])
            .await?;
        let raw_homes = body
            .pointer("/data/similarHomes")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let homes: Vec<ComparableHome> = raw_homes
            .iter()
            .take(SIMILAR_HOMES_LIMIT)
            .filter_map(|raw| match normalize_home(raw) {
                Ok(home) => Some(home),
                Err(e) => {
                    warn!("Skipping malformed similar home: {}", e);
                    None
                }
            })
            .collect();
        info!("Normalized {} similar homes for zpid {}", homes.len(), zpid);

        let mut cache = self.comps_cache.write().await;
        cache.insert(zpid.to_string(), (Utc::now(), homes.clone()));
        Ok(homes)
    }
}

fn num(value: &Value, key: &str) -> f64 {
    value.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

fn text_or(value: &Value, key: &str, default: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

/// Strips currency decoration ("$2,495/mo") and parses the remainder,
/// yielding 0 when nothing numeric survives.
fn parse_currency(raw: &str) -> f64 {
    match Regex::new(r"[^0-9.]") {
        Ok(re) => re.replace_all(raw, "").parse::<f64>().unwrap_or(0.0),
        Err(_) => 0.0,
    }
}

/// Scans a facts array (`[{"elementType": ..., "value": {"fullValue": ...}}]`)
/// for the entry with the given element type.
fn fact_full_value<'a>(facts: Option<&'a Value>, element_type: &str) -> Option<&'a Value> {
    facts?
        .as_array()?
        .iter()
        .find(|fact| fact.get("elementType").and_then(Value::as_str) == Some(element_type))?
        .pointer("/value/fullValue")
}

fn extract_property(data: &Value) -> PropertyLookup {
    let reso_facts = data.get("resoFacts").cloned().unwrap_or(Value::Null);
    let formatted_chip = data.get("formattedChip").cloned().unwrap_or(Value::Null);

    let rent_zestimate = fact_full_value(formatted_chip.get("additionalFacts"), "rentZestimate")
        .and_then(Value::as_str)
        .map(parse_currency)
        .unwrap_or(0.0);

    let heating = reso_facts
        .get("atAGlanceFacts")
        .and_then(Value::as_array)
        .and_then(|facts| {
            facts
                .iter()
                .find(|f| f.get("factLabel").and_then(Value::as_str) == Some("Heating"))
        })
        .and_then(|f| f.get("factValue"))
        .and_then(Value::as_str)
        .unwrap_or("Not available")
        .to_string();

    let quick_facts = formatted_chip.get("quickFacts");
    let beds = fact_full_value(quick_facts, "beds")
        .and_then(Value::as_str)
        .unwrap_or("N/A")
        .to_string();
    let baths = fact_full_value(quick_facts, "baths")
        .and_then(Value::as_str)
        .unwrap_or("N/A")
        .to_string();

    PropertyLookup {
        zpid: data.get("zpid").cloned().unwrap_or(Value::Null),
        image_link: data
            .get("imageLink")
            .and_then(Value::as_str)
            .map(String::from),
        street_view: data
            .get("streetViewImageUrl")
            .and_then(Value::as_str)
            .map(String::from),
        home_type: text_or(data, "homeType", "Unknown"),
        zestimate: num(data, "zestimate"),
        living_area: num(data, "livingAreaValue"),
        lot_area: num(data, "lotAreaValue"),
        lot_units: text_or(data, "lotAreaUnits", ""),
        hoa_fee: num(data, "hoaFee"),
        year_built: num(&reso_facts, "yearBuilt"),
        rent_zestimate,
        heating,
        beds,
        baths,
    }
}

fn normalize_home(raw: &Value) -> Result<ComparableHome> {
    if !raw.is_object() {
        return Err(anyhow!("similar home entry is not an object"));
    }

    let price = num(raw, "price");
    let zestimate = num(raw, "zestimate");
    let sqft = num(raw, "livingArea");
    let rent_zestimate = num(raw, "rentZestimate");

    let price_for_calc = if price > 0.0 { price } else { zestimate };
    let price_per_sqft = if sqft > 0.0 && price_for_calc > 0.0 {
        price_for_calc / sqft
    } else {
        0.0
    };

    // Per-home investment estimates when both rent and value are known
    let (gross_rent_multiplier, cap_rate_estimate) = if rent_zestimate > 0.0 && price_for_calc > 0.0
    {
        let annual_rent = rent_zestimate * 12.0;
        (
            Some(price_for_calc / annual_rent),
            Some(annual_rent * COMP_CAP_RATE_EXPENSE_FACTOR / price_for_calc * 100.0),
        )
    } else {
        (None, None)
    };

    Ok(ComparableHome {
        zpid: raw.get("zpid").cloned().unwrap_or(Value::Null),
        address: text_or(raw, "address", "Unknown"),
        price,
        zestimate,
        beds: num(raw, "bedrooms"),
        baths: num(raw, "bathrooms"),
        sqft,
        lot_size: num(raw, "lotAreaValue"),
        lot_units: text_or(raw, "lotAreaUnits", ""),
        year_built: num(raw, "yearBuilt"),
        property_type: text_or(raw, "homeType", "Unknown"),
        home_status: text_or(raw, "homeStatus", "Unknown"),
        days_on_zillow: num(raw, "daysOnZillow"),
        price_per_sqft,
        last_sold_date: text_or(raw, "dateSold", ""),
        last_sold_price: num(raw, "lastSoldPrice"),
        property_tax: num(raw, "propertyTax"),
        hoa_fee: num(raw, "hoaFee"),
        city: text_or(raw, "city", ""),
        state: text_or(raw, "state", ""),
        zipcode: text_or(raw, "zipcode", ""),
        rent_zestimate,
        image_url: text_or(raw, "imgSrc", ""),
        property_url: text_or(raw, "detailUrl", ""),
        gross_rent_multiplier,
        cap_rate_estimate,
    })
}
