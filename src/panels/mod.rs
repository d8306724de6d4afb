pub mod flight_map;
pub mod macro_metrics;
pub mod prediction;
pub mod trends;
