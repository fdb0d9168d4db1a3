use std::{error::Error, sync::OnceLock};

use serde::{Deserialize, Serialize};

use crate::GeoPoint;

static AIRPORTS: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/src/airports.csv"));

/// A domestic airport that routes can be picked from
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Airport {
    /// IATA code (e.g. `DEL`)
    pub code: String,
    pub name: String,
    pub city: String,
    pub state: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Airport {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// A pair of distinct airports
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Route<'a> {
    pub departure: &'a Airport,
    pub destination: &'a Airport,
}

impl Route<'_> {
    /// Great-circle distance between the airports in km
    pub fn distance_km(&self) -> f64 {
        self.departure.point().distance_km(&self.destination.point())
    }
}

/// Parses a table of airports with the columns `code,name,city,state,latitude,longitude`,
/// sorted by city.
/// # Error
/// Errors if a record cannot be parsed or has coordinates out of range
pub fn parse_airports(data: &[u8]) -> Result<Vec<Airport>, Box<dyn Error>> {
    let mut airports = super::csv::deserialize::<Airport>(data).collect::<Result<Vec<_>, _>>()?;
    if let Some(airport) = airports.iter().find(|a| !a.point().is_valid()) {
        return Err(format!("Airport {} has invalid coordinates", airport.code).into());
    }
    airports.sort_by(|a, b| a.city.cmp(&b.city));
    Ok(airports)
}

/// Returns the airports in `src/airports.csv` sorted by city, parsed on first use.
/// Empty if the table cannot be parsed.
pub fn airports() -> &'static [Airport] {
    static CACHE: OnceLock<Vec<Airport>> = OnceLock::new();
    CACHE.get_or_init(|| {
        parse_airports(AIRPORTS.as_bytes()).unwrap_or_else(|e| {
            log::error!("Embedded airport table is invalid ({e}); no airports are known");
            vec![]
        })
    })
}

/// Returns the [`Airport`] with IATA code `code`, case-insensitive.
pub fn airport(code: &str) -> Option<&'static Airport> {
    let code = code.trim();
    airports().iter().find(|a| a.code.eq_ignore_ascii_case(code))
}

/// Returns the [`Route`] between two airports picked by code.
/// # Error
/// Errors if either code is unknown or if both are the same airport.
pub fn route(departure: &str, destination: &str) -> Result<Route<'static>, crate::Error> {
    let lookup = |code: &str| airport(code).ok_or_else(|| crate::Error::UnknownAirport(code.to_string()));
    let departure = lookup(departure)?;
    let destination = lookup(destination)?;
    if departure.code == destination.code {
        return Err(crate::Error::SameAirport(departure.code.clone()));
    }
    log::debug!("Route {} -> {}", departure.code, destination.code);
    Ok(Route {
        departure,
        destination,
    })
}

/// Returns the closest [`Airport`] from `pos`, or `None` when `airports` is empty.
pub fn closest(pos: GeoPoint, airports: &[Airport]) -> Option<&Airport> {
    airports
        .iter()
        .map(|airport| (airport, pos.distance_km(&airport.point())))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(airport, _)| airport)
}
