// tests/dashboard_flow.rs
//
// Drives the whole dashboard against an in-process stand-in for the external
// fare service, exercising the same JSON contract the real collaborator
// serves.
use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use serde_json::{json, Value};
use warp::http::StatusCode;
use warp::Filter;

use airfare_dashboard::dashboard::Dashboard;
use airfare_dashboard::models::DateRange;
use airfare_dashboard::services::airports::AirportDirectory;
use airfare_dashboard::services::client::FareServiceClient;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 2021 Q1 through 2024 Q4.
fn quarterly_fixture() -> Value {
    let mut points = Vec::new();
    for (index, year) in (2021..=2024).enumerate() {
        for quarter in 1..=4 {
            points.push(json!({
                "label": format!("{} Q{}", year, quarter),
                "value": 200.0 + index as f64 * 10.0 + quarter as f64,
            }));
        }
    }
    Value::Array(points)
}

fn yearly_fixture() -> Value {
    let points: Vec<Value> = (2015..=2024)
        .enumerate()
        .map(|(index, year)| {
            json!({ "label": year.to_string(), "value": 230.0 + index as f64 * 5.0 })
        })
        .collect();
    Value::Array(points)
}

fn mock_api() -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let routes = warp::path!("api" / "routes").and(warp::get()).map(|| {
        warp::reply::json(&json!([
            { "from": "SFO", "to": "LGA", "popularity": 88.0, "passengerCount": 1204500, "averageFare": 289.0 },
            { "from": "JFK", "to": "SFO", "popularity": 95.0, "passengerCount": 1532800, "averageFare": 305.5 },
            { "from": "SEA", "to": "DEN", "popularity": 41.0 },
        ]))
    });

    // Fare history is "unavailable" out of SEA so the failure path is
    // reachable.
    let quarterly = warp::path!("api" / "quarterly-fares")
        .and(warp::post())
        .and(warp::body::json())
        .map(|body: Value| {
            if body["departure"] == "SEA" {
                warp::reply::with_status(
                    warp::reply::json(&json!({ "error": "fare history unavailable" })),
                    StatusCode::INTERNAL_SERVER_ERROR,
                )
            } else {
                warp::reply::with_status(warp::reply::json(&quarterly_fixture()), StatusCode::OK)
            }
        });

    let yearly = warp::path!("api" / "yearly-fares")
        .and(warp::post())
        .and(warp::body::json())
        .map(|body: Value| {
            if body["departure"] == "SEA" {
                warp::reply::with_status(
                    warp::reply::json(&json!({ "error": "fare history unavailable" })),
                    StatusCode::INTERNAL_SERVER_ERROR,
                )
            } else {
                warp::reply::with_status(warp::reply::json(&yearly_fixture()), StatusCode::OK)
            }
        });

    let macro_metrics = warp::path!("api" / "macro-metrics")
        .and(warp::post())
        .and(warp::body::json())
        .map(|_body: Value| {
            warp::reply::with_status(
                warp::reply::json(&json!({ "GDP": 21433.2, "oilPrice": 82.75, "unemploymentRate": 3.7 })),
                StatusCode::OK,
            )
        });

    let predict = warp::path!("api" / "predict")
        .and(warp::post())
        .and(warp::body::json())
        .map(|body: Value| {
            if body["departure"] == "SEA" {
                // The real predictor reports unknown routes in-band, on a 2xx.
                return warp::reply::with_status(
                    warp::reply::json(&json!({ "error": "No data for this route." })),
                    StatusCode::OK,
                );
            }
            let mut reply = json!({ "predictedPrice": 287.5 });
            let end = body["endDate"].as_str().and_then(|raw| raw.parse::<NaiveDate>().ok());
            if matches!(end, Some(end) if end <= date(2024, 3, 31)) {
                reply["actualPrice"] = json!(263.4);
            }
            warp::reply::with_status(warp::reply::json(&reply), StatusCode::OK)
        });

    routes.or(quarterly).or(yearly).or(macro_metrics).or(predict)
}

async fn spawn_mock() -> String {
    let (addr, server) = warp::serve(mock_api()).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    format!("http://{}", addr)
}

fn fresh_dashboard(range: DateRange) -> Dashboard {
    let airports = Arc::new(AirportDirectory::bundled().unwrap());
    Dashboard::new(airports, range)
}

#[tokio::test]
async fn full_session_populates_every_panel() {
    let client = FareServiceClient::new(spawn_mock().await);
    let range = DateRange::new(date(2024, 4, 1), date(2024, 4, 8));
    let mut dashboard = fresh_dashboard(range);

    dashboard.load_routes(&client).await;
    assert_eq!(dashboard.flight_map.index().len(), 3);
    assert!(dashboard.flight_map.error().is_none());

    dashboard.set_departure(Some("SFO".to_string()));
    let destinations: Vec<String> = dashboard.available_destinations().into_iter().collect();
    assert_eq!(destinations, vec!["JFK".to_string(), "LGA".to_string()]);
    dashboard.set_arrival(Some("LGA".to_string()));

    dashboard.refresh(&client).await;

    // "2024 Q2" sits at index 13 of 16, so the chart opens on page 1.
    assert_eq!(dashboard.quarterly.data().len(), 16);
    assert_eq!(dashboard.quarterly.page(), 1);
    assert!(dashboard
        .quarterly
        .current_bars()
        .iter()
        .any(|point| dashboard.quarterly.is_highlighted(point)));

    assert_eq!(dashboard.yearly.data().len(), 10);
    assert_eq!(dashboard.yearly.page(), 1);

    let metrics = dashboard.macro_metrics.metrics().expect("macro metrics");
    assert_eq!(metrics.unemployment_rate, 3.7);

    dashboard.request_prediction(&client).await;
    assert_eq!(dashboard.prediction.predicted_price(), Some(287.5));
    // The range ends past recorded history: no actual price, no overlay.
    assert_eq!(dashboard.prediction.actual_price(), None);
    assert_eq!(dashboard.prediction.overlay_price(range), None);
}

#[tokio::test]
async fn past_range_prediction_carries_the_actual_price() {
    let client = FareServiceClient::new(spawn_mock().await);
    let range = DateRange::new(date(2023, 6, 10), date(2023, 6, 17));
    let mut dashboard = fresh_dashboard(range);

    dashboard.load_routes(&client).await;
    dashboard.set_departure(Some("SFO".to_string()));
    dashboard.set_arrival(Some("JFK".to_string()));

    dashboard.request_prediction(&client).await;
    assert_eq!(dashboard.prediction.actual_price(), Some(263.4));
    assert_eq!(dashboard.prediction.overlay_price(range), Some(287.5));
}

#[tokio::test]
async fn service_failure_clears_the_trend_panels() {
    let client = FareServiceClient::new(spawn_mock().await);
    let range = DateRange::new(date(2023, 6, 10), date(2023, 6, 17));
    let mut dashboard = fresh_dashboard(range);

    dashboard.load_routes(&client).await;
    dashboard.set_departure(Some("SEA".to_string()));
    dashboard.set_arrival(Some("DEN".to_string()));
    dashboard.refresh(&client).await;

    assert_eq!(dashboard.quarterly.error(), Some("Failed to load data."));
    assert!(dashboard.quarterly.data().is_empty());
    assert_eq!(dashboard.yearly.error(), Some("Failed to load data."));

    // The macro panel is keyed on the date alone and still loads.
    assert!(dashboard.macro_metrics.metrics().is_some());
}

#[tokio::test]
async fn in_band_predictor_error_surfaces_its_message() {
    let client = FareServiceClient::new(spawn_mock().await);
    let range = DateRange::new(date(2023, 6, 10), date(2023, 6, 17));
    let mut dashboard = fresh_dashboard(range);

    dashboard.load_routes(&client).await;
    dashboard.set_departure(Some("SEA".to_string()));
    dashboard.set_arrival(Some("DEN".to_string()));
    dashboard.request_prediction(&client).await;

    assert_eq!(dashboard.prediction.error(), Some("No data for this route."));
    assert!(dashboard.prediction.outcome().is_none());
}

#[tokio::test]
async fn far_future_range_skips_the_macro_fetch() {
    // Point at a dead address: the panel must short-circuit before any fetch.
    let client = FareServiceClient::new("http://127.0.0.1:9");
    let today = Utc::now().date_naive();
    let range = DateRange::new(today + Duration::days(300), today + Duration::days(307));
    let mut dashboard = fresh_dashboard(range);

    dashboard.refresh_macro(&client).await;
    assert!(dashboard.macro_metrics.too_far_in_future());
    assert!(dashboard.macro_metrics.metrics().is_none());
    assert!(dashboard.macro_metrics.error().is_none());
}

#[tokio::test]
async fn unreachable_service_sets_the_route_error() {
    let client = FareServiceClient::new("http://127.0.0.1:9");
    let range = DateRange::new(date(2023, 6, 10), date(2023, 6, 17));
    let mut dashboard = fresh_dashboard(range);

    dashboard.load_routes(&client).await;
    assert_eq!(dashboard.flight_map.error(), Some("Failed to load routes."));
    assert!(dashboard.flight_map.index().is_empty());
}
