// src/services/airports.rs
use std::collections::HashMap;
use std::io::Read;

use csv::Reader;
use log::info;

use crate::models::Airport;
use crate::BoxError;

const BUNDLED_DIRECTORY: &str = include_str!("../../assets/airports.csv");

/// Shared read-only airport lookup. Panels that need a display name or a map
/// coordinate borrow the one directory instead of carrying their own tables.
#[derive(Debug, Clone)]
pub struct AirportDirectory {
    airports: Vec<Airport>,
    by_code: HashMap<String, usize>,
}

impl AirportDirectory {
    /// The directory bundled with the crate (the domestic airports the route
    /// data covers).
    pub fn bundled() -> Result<Self, BoxError> {
        Self::from_csv(BUNDLED_DIRECTORY.as_bytes())
    }

    pub fn from_csv(reader: impl Read) -> Result<Self, BoxError> {
        let mut rdr = Reader::from_reader(reader);
        let mut airports: Vec<Airport> = Vec::new();
        for record in rdr.deserialize() {
            let airport: Airport = record?;
            airports.push(airport);
        }
        let by_code = airports
            .iter()
            .enumerate()
            .map(|(index, airport)| (airport.code.clone(), index))
            .collect();
        info!("Loaded {} airports into the directory", airports.len());
        Ok(AirportDirectory { airports, by_code })
    }

    pub fn get(&self, code: &str) -> Option<&Airport> {
        self.by_code.get(code).map(|&index| &self.airports[index])
    }

    /// Display name for a code, falling back to the code itself for airports
    /// the directory does not know.
    pub fn name_of<'a>(&'a self, code: &'a str) -> &'a str {
        self.get(code).map(|airport| airport.name.as_str()).unwrap_or(code)
    }

    /// `(longitude, latitude)` for a code, when known.
    pub fn coordinates(&self, code: &str) -> Option<(f64, f64)> {
        self.get(code).map(|airport| (airport.longitude, airport.latitude))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Airport> {
        self.airports.iter()
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }
}
