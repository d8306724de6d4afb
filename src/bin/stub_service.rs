// src/bin/stub_service.rs
//
// Offline stand-in for the external prediction/analytics service. Serves the
// collaborator's JSON contract with deterministic fixture data so the
// dashboard can be driven without the real backend.
use log::{info, warn};
use serde::Deserialize;
use std::env;
use std::net::SocketAddr;
use warp::http::StatusCode;
use warp::Filter;

use airfare_dashboard::models::{FlightRoute, PredictionRequest, SpecialEvent, TimeSeriesPoint};
use airfare_dashboard::timeline;

#[derive(Debug, Deserialize)]
struct PairBody {
    departure: String,
    arrival: String,
}

#[derive(Debug, Deserialize)]
struct DateBody {
    date: chrono::NaiveDate,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();
    info!("Starting the fare service stub...");

    let port_str = env::var("PORT").unwrap_or_else(|_| {
        warn!("$PORT not set, defaulting to 3000");
        "3000".to_string()
    });
    let port: u16 = port_str.parse().expect("PORT must be a number");
    let addr: SocketAddr = ([127, 0, 0, 1], port).into();

    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET", "POST"]);

    let routes_route = warp::path!("api" / "routes")
        .and(warp::get())
        .map(|| warp::reply::json(&fixture_routes()));

    let quarterly_route = warp::path!("api" / "quarterly-fares")
        .and(warp::post())
        .and(warp::body::json())
        .map(|body: PairBody| fares_reply(&body, quarterly_series(&body.departure, &body.arrival)));

    let yearly_route = warp::path!("api" / "yearly-fares")
        .and(warp::post())
        .and(warp::body::json())
        .map(|body: PairBody| fares_reply(&body, yearly_series(&body.departure, &body.arrival)));

    let macro_route = warp::path!("api" / "macro-metrics")
        .and(warp::post())
        .and(warp::body::json())
        .map(|body: DateBody| {
            info!("Serving macro metrics for {}", body.date);
            warp::reply::with_status(
                warp::reply::json(&serde_json::json!({
                    "GDP": 21433.2,
                    "oilPrice": 82.75,
                    "unemploymentRate": 3.7,
                })),
                StatusCode::OK,
            )
        });

    let predict_route = warp::path!("api" / "predict")
        .and(warp::post())
        .and(warp::body::json())
        .map(|request: PredictionRequest| predict_reply(&request));

    let api = routes_route
        .or(quarterly_route)
        .or(yearly_route)
        .or(macro_route)
        .or(predict_route)
        .with(cors);

    info!("Stub serving the fare contract on {}", addr);
    warp::serve(api).run(addr).await;
}

fn fares_reply(
    body: &PairBody,
    series: Option<Vec<TimeSeriesPoint>>,
) -> warp::reply::WithStatus<warp::reply::Json> {
    match series {
        Some(points) => {
            info!("Serving {} fare points for {} -> {}", points.len(), body.departure, body.arrival);
            warp::reply::with_status(warp::reply::json(&points), StatusCode::OK)
        }
        None => {
            warn!("No fixture route for {} -> {}", body.departure, body.arrival);
            warp::reply::with_status(
                warp::reply::json(&serde_json::json!({ "error": "No fare history for this route" })),
                StatusCode::NOT_FOUND,
            )
        }
    }
}

fn predict_reply(request: &PredictionRequest) -> warp::reply::WithStatus<warp::reply::Json> {
    if pair_seed(&request.departure, &request.arrival).is_none() {
        // The real predictor reports unknown routes in-band, on a 2xx.
        return warp::reply::with_status(
            warp::reply::json(&serde_json::json!({ "error": "No data for this route." })),
            StatusCode::OK,
        );
    }
    let base = base_fare(&request.departure, &request.arrival);
    let predicted = base * event_multiplier(request.event);
    let mut reply = serde_json::json!({ "predictedPrice": predicted });
    if timeline::overlaps_recorded_history(request.end_date) {
        reply["actualPrice"] = serde_json::json!(base * 0.97);
    }
    info!(
        "Predicted {:.2} for {} -> {} ({})",
        predicted, request.departure, request.arrival, request.event
    );
    warp::reply::with_status(warp::reply::json(&reply), StatusCode::OK)
}

fn fixture_routes() -> Vec<FlightRoute> {
    FIXTURE_PAIRS
        .iter()
        .map(|&(from, to, popularity, passengers)| FlightRoute {
            from: from.to_string(),
            to: to.to_string(),
            popularity,
            passenger_count: Some(passengers),
            average_fare: Some(base_fare(from, to)),
        })
        .collect()
}

const FIXTURE_PAIRS: &[(&str, &str, f64, u64)] = &[
    ("SFO", "LGA", 88.0, 1_204_500),
    ("SFO", "JFK", 95.0, 1_532_800),
    ("LAX", "JFK", 100.0, 1_790_300),
    ("LAX", "SFO", 74.0, 986_200),
    ("ORD", "LGA", 69.0, 912_400),
    ("ATL", "MCO", 61.0, 845_100),
    ("DEN", "PHX", 48.0, 610_900),
    ("SEA", "SFO", 55.0, 702_300),
    ("BOS", "DCA", 42.0, 534_800),
    ("MIA", "JFK", 58.0, 724_600),
    ("DFW", "LAX", 66.0, 869_000),
    ("LAS", "LAX", 39.0, 498_200),
];

fn pair_seed(a: &str, b: &str) -> Option<u32> {
    let known = FIXTURE_PAIRS
        .iter()
        .any(|&(from, to, _, _)| (from == a && to == b) || (from == b && to == a));
    if !known {
        return None;
    }
    let mut codes = [a, b];
    codes.sort();
    Some(codes.concat().bytes().map(u32::from).sum())
}

fn base_fare(a: &str, b: &str) -> f64 {
    match pair_seed(a, b) {
        Some(seed) => 150.0 + f64::from(seed % 220),
        None => 0.0,
    }
}

// Seasonal bump per quarter within a year.
const SEASONAL: [f64; 4] = [0.0, 18.0, 34.0, 9.0];

fn quarterly_series(a: &str, b: &str) -> Option<Vec<TimeSeriesPoint>> {
    let base = match pair_seed(a, b) {
        Some(_) => base_fare(a, b),
        None => return None,
    };
    let mut series = Vec::new();
    let mut index = 0usize;
    for year in 2019..=2024 {
        for quarter in 1..=4 {
            if year == 2024 && quarter > 1 {
                break;
            }
            series.push(TimeSeriesPoint {
                label: format!("{} Q{}", year, quarter),
                value: base + SEASONAL[quarter - 1] + index as f64 * 1.5,
            });
            index += 1;
        }
    }
    Some(series)
}

fn yearly_series(a: &str, b: &str) -> Option<Vec<TimeSeriesPoint>> {
    let base = match pair_seed(a, b) {
        Some(_) => base_fare(a, b),
        None => return None,
    };
    let series = (2015..=2024)
        .enumerate()
        .map(|(index, year)| TimeSeriesPoint {
            label: year.to_string(),
            value: base + 12.0 + index as f64 * 6.0,
        })
        .collect();
    Some(series)
}

fn event_multiplier(event: SpecialEvent) -> f64 {
    match event {
        SpecialEvent::None => 1.0,
        SpecialEvent::Pandemic => 1.45,
        SpecialEvent::Recession => 1.2,
        SpecialEvent::ForeignDomesticConflict => 1.3,
        SpecialEvent::NaturalDisaster => 1.25,
    }
}
