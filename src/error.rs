use thiserror::Error;

/// Errors of picking a route from the airport catalogue
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("Airport {0} not found")]
    UnknownAirport(String),
    #[error("Departure and destination airports cannot be the same ({0})")]
    SameAirport(String),
}
