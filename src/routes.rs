// src/routes.rs
use std::collections::BTreeSet;

use log::debug;

use crate::models::FlightRoute;

/// Bidirectional adjacency view over the flat route list served by the
/// analytics service. Well-formed data carries each unordered pair at most
/// once; lookups take the first match in service order otherwise.
#[derive(Debug, Clone, Default)]
pub struct RouteIndex {
    routes: Vec<FlightRoute>,
}

impl RouteIndex {
    pub fn new(routes: Vec<FlightRoute>) -> Self {
        debug!("Indexing {} routes", routes.len());
        RouteIndex { routes }
    }

    pub fn routes(&self) -> &[FlightRoute] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Airport codes reachable from `code` in either direction, excluding
    /// `code` itself. Empty set when nothing touches `code`.
    pub fn destinations_from(&self, code: &str) -> BTreeSet<String> {
        let mut destinations = BTreeSet::new();
        for route in &self.routes {
            if route.from == code {
                destinations.insert(route.to.clone());
            } else if route.to == code {
                destinations.insert(route.from.clone());
            }
        }
        destinations.remove(code);
        destinations
    }

    /// The route for the unordered pair (a, b), regardless of which direction
    /// the service listed it in.
    pub fn find_route(&self, a: &str, b: &str) -> Option<&FlightRoute> {
        self.routes.iter().find(|route| route.connects(a, b))
    }

    /// Codes that appear as an endpoint of at least one indexed route.
    pub fn airports_touched(&self) -> BTreeSet<String> {
        let mut codes = BTreeSet::new();
        for route in &self.routes {
            codes.insert(route.from.clone());
            codes.insert(route.to.clone());
        }
        codes
    }
}
