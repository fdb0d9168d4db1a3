#![forbid(unsafe_code)]
mod aircraft_profiles;
mod airports;
pub mod csv;
mod eco_fee;
mod emissions;
mod error;
mod policy;

pub use aircraft_profiles::*;
pub use airports::*;
pub use eco_fee::*;
pub use emissions::*;
pub use error::Error;
pub use policy::*;

/// Mean radius of the Earth in km, as used by the haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic point in degrees
#[derive(Debug, Clone, Copy, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn pos(&self) -> (f64, f64) {
        (self.latitude(), self.longitude())
    }

    /// Whether the latitude is in `[-90, 90]` and the longitude in `[-180, 180]`
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Returns the distance to another [`GeoPoint`] in km
    pub fn distance_km(&self, other: &Self) -> f64 {
        distance_km(*self, *other)
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

/// Returns the great-circle distance between two geo-points in km, using the
/// haversine formula on a sphere of radius [`EARTH_RADIUS_KM`].
pub fn distance_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Returns both ends of a route when both are present and valid
pub(crate) fn valid_ends(
    departure: Option<GeoPoint>,
    arrival: Option<GeoPoint>,
) -> Option<(GeoPoint, GeoPoint)> {
    match (departure, arrival) {
        (Some(from), Some(to)) if from.is_valid() && to.is_valid() => Some((from, to)),
        (from, to) => {
            log::warn!("Route has a missing or invalid end ({from:?} -> {to:?})");
            None
        }
    }
}

/// Rounds `value` to `decimals` decimal places, half away from zero
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
