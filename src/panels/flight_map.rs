// src/panels/flight_map.rs
use std::collections::BTreeSet;

use log::{error, info};

use crate::dashboard::RouteSelection;
use crate::models::FlightRoute;
use crate::routes::RouteIndex;
use crate::services::error::ServiceError;

/// Stroke weight for a route line, scaled linearly from popularity
/// (0..=100 maps onto 1.0..=75.0).
pub fn line_weight(popularity: f64) -> f64 {
    let clamped = popularity.clamp(0.0, 100.0);
    1.0 + clamped / 100.0 * 74.0
}

/// A route as the map shows it, with its selection flag.
#[derive(Debug, Clone, Copy)]
pub struct DisplayedRoute<'a> {
    pub route: &'a FlightRoute,
    pub selected: bool,
}

/// Route-map state. The route list is fetched once per session and indexed;
/// everything else here is derived per selection change.
#[derive(Debug, Default)]
pub struct FlightMapPanel {
    index: RouteIndex,
    loading: bool,
    error: Option<String>,
}

impl FlightMapPanel {
    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    pub fn finish_load(&mut self, result: Result<Vec<FlightRoute>, ServiceError>) {
        self.loading = false;
        match result {
            Ok(routes) => {
                info!("Loaded {} routes", routes.len());
                self.index = RouteIndex::new(routes);
                self.error = None;
            }
            Err(e) => {
                error!("Error fetching routes: {}", e);
                self.index = RouteIndex::default();
                self.error = Some("Failed to load routes.".to_string());
            }
        }
    }

    pub fn index(&self) -> &RouteIndex {
        &self.index
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// With a complete selection whose exact route exists, the map narrows to
    /// that one route; otherwise every route is shown, flagged selected where
    /// it matches the pair.
    pub fn displayed_routes(&self, selection: &RouteSelection) -> Vec<DisplayedRoute<'_>> {
        if let Some((departure, arrival)) = selection.pair() {
            if let Some(route) = self.index.find_route(departure, arrival) {
                return vec![DisplayedRoute { route, selected: true }];
            }
            return self
                .index
                .routes()
                .iter()
                .map(|route| DisplayedRoute {
                    route,
                    selected: route.connects(departure, arrival),
                })
                .collect();
        }
        self.index
            .routes()
            .iter()
            .map(|route| DisplayedRoute { route, selected: false })
            .collect()
    }

    /// Codes with at least one visible route; only these get a map marker.
    pub fn visible_airports(&self, selection: &RouteSelection) -> BTreeSet<String> {
        let mut codes = BTreeSet::new();
        for shown in self.displayed_routes(selection) {
            codes.insert(shown.route.from.clone());
            codes.insert(shown.route.to.clone());
        }
        codes
    }
}
