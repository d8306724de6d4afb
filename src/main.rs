use anyhow::{bail, Context, Result};
use chrono::{Duration, NaiveDate, Utc};
use dotenv::dotenv;
use log::{info, warn};
use std::env;
use std::sync::Arc;

use airfare_dashboard::dashboard::{code_from_label, selection_label, Dashboard};
use airfare_dashboard::panels::flight_map::line_weight;
use airfare_dashboard::models::DateRange;
use airfare_dashboard::panels::trends::TrendsPanel;
use airfare_dashboard::services::airports::AirportDirectory;
use airfare_dashboard::services::client::FareServiceClient;

/// Headless dashboard session: pick a route and a date range from the
/// environment, run one full refresh against the fare service, and print the
/// panel states.
#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();
    info!("Logger initialized. Starting the dashboard session...");

    // Accept either a bare code or a full "SFO (San Francisco)" label.
    let departure = env::var("DEPARTURE")
        .map(|raw| code_from_label(&raw).unwrap_or(raw))
        .unwrap_or_else(|_| "SFO".to_string());
    let arrival = env::var("ARRIVAL")
        .map(|raw| code_from_label(&raw).unwrap_or(raw))
        .unwrap_or_else(|_| "LGA".to_string());

    let today = Utc::now().date_naive();
    let start = date_var("START_DATE")?.unwrap_or(today);
    let end = date_var("END_DATE")?.unwrap_or(today + Duration::days(7));
    let range = DateRange::new(start, end);
    if !range.is_ordered() {
        bail!("START_DATE {} is after END_DATE {}", start, end);
    }

    let airports = Arc::new(
        AirportDirectory::bundled().map_err(|e| anyhow::anyhow!("airport directory: {}", e))?,
    );
    let client = FareServiceClient::from_env();
    info!("Using fare service at {}", client.base_url());

    let mut dashboard = Dashboard::new(airports, range);

    dashboard.load_routes(&client).await;
    if let Some(message) = dashboard.flight_map.error() {
        bail!("{}", message);
    }
    info!("Route map holds {} routes", dashboard.flight_map.index().len());

    dashboard.set_departure(Some(departure.clone()));
    let destinations = dashboard.available_destinations();
    info!("{} destinations reachable from {}", destinations.len(), departure);
    if !destinations.contains(&arrival) {
        warn!("No listed route from {} to {}; panels may come back empty", departure, arrival);
    }
    dashboard.set_arrival(Some(arrival.clone()));

    dashboard.refresh(&client).await;
    dashboard.request_prediction(&client).await;

    print_snapshot(&dashboard);
    Ok(())
}

fn date_var(name: &str) -> Result<Option<NaiveDate>> {
    match env::var(name) {
        Ok(raw) => {
            let date = raw
                .parse::<NaiveDate>()
                .with_context(|| format!("${} must be YYYY-MM-DD, got {:?}", name, raw))?;
            Ok(Some(date))
        }
        Err(_) => Ok(None),
    }
}

fn print_snapshot(dashboard: &Dashboard) {
    let airports = dashboard.airports();

    println!();
    match dashboard.selection().pair() {
        Some((departure, arrival)) => {
            println!(
                "Route: {} -> {}",
                selection_label(departure, airports.name_of(departure)),
                selection_label(arrival, airports.name_of(arrival)),
            );
        }
        None => println!("Route: (none selected)"),
    }
    let range = dashboard.date_range();
    println!("Dates: {} .. {}", range.start, range.end);

    if let Some(route) = dashboard.selected_route() {
        if let Some(passengers) = route.passenger_count {
            println!("Total passengers: {}", passengers);
        }
        if let Some(fare) = route.average_fare {
            println!("Average fare:     ${:.2}", fare);
        }
    }

    let shown = dashboard.flight_map.displayed_routes(dashboard.selection());
    let markers = dashboard.flight_map.visible_airports(dashboard.selection());
    println!("Map: {} route lines, {} airport markers", shown.len(), markers.len());
    for displayed in shown.iter().filter(|d| d.selected) {
        println!(
            "  {} -> {} (weight {:.1})",
            displayed.route.from,
            displayed.route.to,
            line_weight(displayed.route.popularity)
        );
    }

    print_trends("Average Quarterly Pricing", &dashboard.quarterly);
    if let Some(price) = dashboard.prediction.overlay_price(range) {
        println!("  predicted: ${:.2}", price);
    }
    print_trends("Average Yearly Pricing", &dashboard.yearly);

    println!("\nMacro Metrics");
    if dashboard.macro_metrics.too_far_in_future() {
        println!("  Macro data is not available for the chosen date yet!");
    } else if let Some(message) = dashboard.macro_metrics.error() {
        println!("  {}", message);
    } else if let Some(metrics) = dashboard.macro_metrics.metrics() {
        println!("  GDP:               ${}", metrics.gdp);
        println!("  Global Oil Price:  ${:.2}", metrics.oil_price);
        println!("  Unemployment Rate: {:.2}%", metrics.unemployment_rate);
    } else {
        println!("  No data available for the selected range.");
    }

    println!("\nFare Predictor ({})", dashboard.prediction.event());
    if let Some(message) = dashboard.prediction.error() {
        println!("  {}", message);
    } else if let Some(price) = dashboard.prediction.predicted_price() {
        println!("  Your predicted price is: ${:.2}", price);
        if let Some(actual) = dashboard.prediction.actual_price() {
            println!("  Actual recorded price:   ${:.2}", actual);
        }
    } else {
        println!("  (no prediction requested)");
    }
}

fn print_trends(heading: &str, panel: &TrendsPanel) {
    println!("\n{} (page {})", heading, panel.page() + 1);
    if let Some(message) = panel.error() {
        println!("  {}", message);
        return;
    }
    let bars = panel.current_bars();
    if bars.is_empty() {
        println!("  No data available.");
        return;
    }
    for point in bars {
        let marker = if panel.is_highlighted(point) { "  <-- selected" } else { "" };
        println!("  {:<8} ${:>7.2}{}", point.label, point.value, marker);
    }
}
