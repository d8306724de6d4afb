// src/bin/probe_service.rs
use chrono::{Duration, Utc};

use airfare_dashboard::models::{PredictionRequest, SpecialEvent};
use airfare_dashboard::services::client::FareServiceClient;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv::dotenv().ok();
    env_logger::init();

    let client = FareServiceClient::from_env();
    println!("Probing fare service at {}", client.base_url());

    let routes = client.routes().await?;
    println!("Routes served:     {}", routes.len());

    if let Some(route) = routes.first() {
        let quarterly = client.quarterly_fares(&route.from, &route.to).await?;
        println!("Quarterly points:  {}", quarterly.len());
        let yearly = client.yearly_fares(&route.from, &route.to).await?;
        println!("Yearly points:     {}", yearly.len());

        let today = Utc::now().date_naive();
        let outcome = client
            .predict(&PredictionRequest {
                departure: route.from.clone(),
                arrival: route.to.clone(),
                start_date: today,
                end_date: today + Duration::days(7),
                event: SpecialEvent::None,
            })
            .await?;
        println!("Predicted fare:    {:.2}", outcome.predicted_price);
    }

    let metrics = client.macro_metrics(Utc::now().date_naive()).await?;
    println!("Unemployment rate: {:.2}%", metrics.unemployment_rate);
    Ok(())
}
