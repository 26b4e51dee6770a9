// src/bin/test_property.rs
use rei_analyzer::services::zillow::ZillowClient;
use std::env;

#[tokio::main]
async fn main() -> std::result::Result<(), rei_analyzer::BoxError> {
    dotenv::dotenv().ok();
    env_logger::init();

    let api_key = env::var("RAPIDAPI_KEY")?;
    let client = ZillowClient::new(api_key);

    let property = client
        .fetch_property("11622 Monica St", "Houston", "TX", "77071")
        .await?;
    println!("Property lookup: {:#?}", property);

    if !property.zpid.is_null() {
        let zpid = property.zpid.to_string();
        let homes = client.similar_homes(&zpid).await?;
        println!("Fetched {} similar homes for zpid {}", homes.len(), zpid);
    }
    Ok(())
}
