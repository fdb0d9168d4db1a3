use serde::{Deserialize, Serialize};

use crate::{aircraft_profile, round_to, valid_ends, AircraftProfile, GeoPoint};

/// kg of CO2 per passenger-km before any adjustment
pub const BASE_EMISSION_FACTOR: f64 = 0.12;
/// Fraction of the seats assumed occupied when the number of passengers is unknown
pub const DEFAULT_LOAD_FACTOR: f64 = 0.82;
/// USD per ton of CO2 of the basic offset tier
pub const BASIC_OFFSET_COST_PER_TON: f64 = 8.0;
/// USD per ton of CO2 of the premium offset tier
pub const PREMIUM_OFFSET_COST_PER_TON: f64 = 40.0;

/// Distance tier of a flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Haul {
    /// up to and including 1500 km
    Short,
    /// up to and including 3500 km
    Medium,
    Long,
}

impl Haul {
    pub fn from_distance(distance: f64) -> Self {
        if distance <= 1500.0 {
            Haul::Short
        } else if distance <= 3500.0 {
            Haul::Medium
        } else {
            Haul::Long
        }
    }

    /// Short flights emit more per km (take-off and climb dominate), long-haul less.
    pub fn multiplier(&self) -> f64 {
        match self {
            Haul::Short => 1.2,
            Haul::Medium => 1.0,
            Haul::Long => 0.95,
        }
    }
}

/// Inputs of the aircraft-efficiency policy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightInputs {
    pub departure: Option<GeoPoint>,
    pub arrival: Option<GeoPoint>,
    /// aircraft type (e.g. `B77W`); the default profile is used when absent or unknown
    pub aircraft: Option<String>,
    /// number of passengers on board; estimated from the load factor when absent or zero
    pub passengers: Option<u32>,
}

/// Emissions of a flight and the cost of offsetting them, per the aircraft-efficiency policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionEstimate {
    /// km, rounded to an integer
    pub distance_km: f64,
    /// tier of the unrounded distance; `None` when invalid
    pub haul: Option<Haul>,
    pub estimated_passengers: u32,
    /// kg, rounded to one decimal
    pub co2_per_passenger_kg: f64,
    /// tons, rounded to one decimal
    pub total_co2_tons: f64,
    /// USD per passenger, rounded to two decimals
    pub basic_offset_cost_usd: f64,
    /// USD per passenger, rounded to two decimals
    pub premium_offset_cost_usd: f64,
    pub valid: bool,
}

impl EmissionEstimate {
    /// The all-zero estimate of a flight whose route is unknown
    pub fn invalid() -> Self {
        Self {
            distance_km: 0.0,
            haul: None,
            estimated_passengers: 0,
            co2_per_passenger_kg: 0.0,
            total_co2_tons: 0.0,
            basic_offset_cost_usd: 0.0,
            premium_offset_cost_usd: 0.0,
            valid: false,
        }
    }
}

/// kg of CO2 per passenger-km for a given distance tier and aircraft
pub fn adjusted_emission_factor(haul: Haul, aircraft: &AircraftProfile) -> f64 {
    BASE_EMISSION_FACTOR * haul.multiplier() * aircraft.efficiency_multiplier()
}

/// Passengers on board: `passengers` when known and positive, else the aircraft's
/// capacity at [`DEFAULT_LOAD_FACTOR`]. Never zero.
pub fn estimated_passengers(passengers: Option<u32>, aircraft: &AircraftProfile) -> u32 {
    passengers
        .filter(|p| *p > 0)
        .unwrap_or_else(|| (aircraft.passenger_capacity as f64 * DEFAULT_LOAD_FACTOR).round() as u32)
        .max(1)
}

/// Computes the estimate of a flight of `distance` km
pub fn distance_to_emissions(
    distance: f64,
    aircraft: &AircraftProfile,
    passengers: Option<u32>,
) -> EmissionEstimate {
    let haul = Haul::from_distance(distance);
    let factor = adjusted_emission_factor(haul, aircraft);
    let passengers = estimated_passengers(passengers, aircraft);

    let co2_per_passenger = distance * factor;
    let total_co2 = co2_per_passenger * passengers as f64 / 1000.0;

    let basic_offset_cost = co2_per_passenger / 1000.0 * BASIC_OFFSET_COST_PER_TON;
    let premium_offset_cost = co2_per_passenger / 1000.0 * PREMIUM_OFFSET_COST_PER_TON;

    EmissionEstimate {
        distance_km: round_to(distance, 0),
        haul: Some(haul),
        estimated_passengers: passengers,
        co2_per_passenger_kg: round_to(co2_per_passenger, 1),
        total_co2_tons: round_to(total_co2, 1),
        basic_offset_cost_usd: round_to(basic_offset_cost, 2),
        premium_offset_cost_usd: round_to(premium_offset_cost, 2),
        valid: true,
    }
}

/// Returns the emissions of a flight per the aircraft-efficiency policy, or
/// [`EmissionEstimate::invalid`] when the departure or arrival is missing or invalid.
pub fn emissions(inputs: &FlightInputs) -> EmissionEstimate {
    let Some((from, to)) = valid_ends(inputs.departure, inputs.arrival) else {
        return EmissionEstimate::invalid();
    };
    let aircraft = aircraft_profile(inputs.aircraft.as_deref());
    distance_to_emissions(from.distance_km(&to), aircraft, inputs.passengers)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::aircraft_profiles;

    #[test]
    fn boundaries_work() {
        assert_eq!(Haul::from_distance(0.0), Haul::Short);
        assert_eq!(Haul::from_distance(1500.0), Haul::Short);
        assert_eq!(Haul::from_distance(1500.01), Haul::Medium);
        assert_eq!(Haul::from_distance(3500.0), Haul::Medium);
        assert_eq!(Haul::from_distance(3500.01), Haul::Long);
        assert_eq!(Haul::from_distance(1500.0).multiplier(), 1.2);
        assert_eq!(Haul::from_distance(1500.01).multiplier(), 1.0);
    }

    #[test]
    fn b77w_1000km() {
        let aircraft = aircraft_profile(Some("B77W"));
        let factor = adjusted_emission_factor(Haul::Short, aircraft);
        assert!((factor - 0.108).abs() < 1e-12);

        let r = distance_to_emissions(1000.0, aircraft, None);
        assert_eq!(r.distance_km, 1000.0);
        assert_eq!(r.co2_per_passenger_kg, 108.0);
        // round(396 * 0.82)
        assert_eq!(r.estimated_passengers, 325);
        assert_eq!(r.total_co2_tons, 35.1);
        assert_eq!(r.basic_offset_cost_usd, 0.86);
        assert_eq!(r.premium_offset_cost_usd, 4.32);
        assert!(r.valid);
    }

    #[test]
    fn haul_of_unrounded_distance() {
        let aircraft = aircraft_profiles().default_profile();
        let r = distance_to_emissions(1500.4, aircraft, Some(100));
        assert_eq!(r.distance_km, 1500.0);
        assert_eq!(r.haul, Some(Haul::Medium));
        // 1500.4 * 0.12 * 1.0 * 0.8
        assert_eq!(r.co2_per_passenger_kg, 144.0);
        assert_eq!(EmissionEstimate::invalid().haul, None);
    }

    #[test]
    fn explicit_passengers() {
        let aircraft = aircraft_profiles().default_profile();
        assert_eq!(estimated_passengers(Some(150), aircraft), 150);
        assert_eq!(estimated_passengers(Some(0), aircraft), 148);
        assert_eq!(estimated_passengers(None, aircraft), 148);
    }

    #[test]
    fn tiny_aircraft_has_a_passenger() {
        let aircraft = AircraftProfile {
            identifier: "GLID".to_string(),
            name: "Glider".to_string(),
            passenger_capacity: 1,
            efficiency_rating: 10.0,
        };
        // round(0.82) == 1, but clamped anyway
        assert_eq!(estimated_passengers(None, &aircraft), 1);
    }

    #[test]
    fn missing_end_is_invalid() {
        let p = GeoPoint::new(28.55, 77.10);
        let inputs = FlightInputs {
            departure: Some(p),
            ..Default::default()
        };
        assert_eq!(emissions(&inputs), EmissionEstimate::invalid());

        let inputs = FlightInputs {
            arrival: Some(p),
            ..Default::default()
        };
        assert_eq!(emissions(&inputs), EmissionEstimate::invalid());
    }

    #[test]
    fn invalid_coordinates_are_invalid() {
        let inputs = FlightInputs {
            departure: Some(GeoPoint::new(28.55, 77.10)),
            arrival: Some(GeoPoint::new(128.55, 77.10)),
            ..Default::default()
        };
        let r = emissions(&inputs);
        assert!(!r.valid);
        assert_eq!(r.co2_per_passenger_kg, 0.0);
    }

    #[test]
    fn zero_latitude_is_valid() {
        // equator to 10 degrees north
        let inputs = FlightInputs {
            departure: Some(GeoPoint::new(0.0, 0.0)),
            arrival: Some(GeoPoint::new(10.0, 0.0)),
            ..Default::default()
        };
        let r = emissions(&inputs);
        assert!(r.valid);
        assert_eq!(r.distance_km, 1112.0);
    }
}
