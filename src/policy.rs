use serde::{Deserialize, Serialize};

use crate::{eco_fee, emissions, EcoFeeEstimate, EmissionEstimate, FeeInputs, FlightInputs};

/// The calculation policies of an estimate. They use different, non-reconcilable
/// constants for the same quantity and are therefore never mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Policy {
    /// emission factor adjusted by distance tier and aircraft efficiency; yields offset costs
    AircraftEfficiency,
    /// flat fuel burn and fee rate; yields an eco fee and its allocation
    FlatFee,
}

impl Policy {
    pub fn name(&self) -> &'static str {
        match self {
            Policy::AircraftEfficiency => "aircraft-efficiency",
            Policy::FlatFee => "flat-fee",
        }
    }
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Policy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aircraft-efficiency" => Ok(Policy::AircraftEfficiency),
            "flat-fee" => Ok(Policy::FlatFee),
            other => Err(format!("Unknown policy {other}")),
        }
    }
}

/// Inputs of an estimate, tagged by the policy that computes it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "kebab-case")]
pub enum Inputs {
    AircraftEfficiency(FlightInputs),
    FlatFee(FeeInputs),
}

impl Inputs {
    pub fn policy(&self) -> Policy {
        match self {
            Inputs::AircraftEfficiency(_) => Policy::AircraftEfficiency,
            Inputs::FlatFee(_) => Policy::FlatFee,
        }
    }
}

/// Result of an estimate, tagged by the policy that computed it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "kebab-case")]
pub enum Estimate {
    AircraftEfficiency(EmissionEstimate),
    FlatFee(EcoFeeEstimate),
}

impl Estimate {
    pub fn policy(&self) -> Policy {
        match self {
            Estimate::AircraftEfficiency(_) => Policy::AircraftEfficiency,
            Estimate::FlatFee(_) => Policy::FlatFee,
        }
    }

    /// Whether both ends of the route were present and valid
    pub fn is_valid(&self) -> bool {
        match self {
            Estimate::AircraftEfficiency(e) => e.valid,
            Estimate::FlatFee(e) => e.valid,
        }
    }

    /// Rounded distance of the route in km; zero when invalid
    pub fn distance_km(&self) -> f64 {
        match self {
            Estimate::AircraftEfficiency(e) => e.distance_km,
            Estimate::FlatFee(e) => e.distance_km,
        }
    }

    /// CO2 attributed to a single passenger in kg
    pub fn co2_per_passenger_kg(&self) -> f64 {
        match self {
            Estimate::AircraftEfficiency(e) => e.co2_per_passenger_kg,
            Estimate::FlatFee(e) => e.co2_per_passenger_kg,
        }
    }
}

/// Computes the estimate of `inputs` with the policy they are tagged with
pub fn estimate(inputs: &Inputs) -> Estimate {
    let estimate = match inputs {
        Inputs::AircraftEfficiency(inputs) => Estimate::AircraftEfficiency(emissions(inputs)),
        Inputs::FlatFee(inputs) => Estimate::FlatFee(eco_fee(inputs)),
    };
    log::debug!(
        "{} estimate: {} km, {} kg CO2 per passenger",
        estimate.policy(),
        estimate.distance_km(),
        estimate.co2_per_passenger_kg()
    );
    estimate
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{GeoPoint, TravelClass};

    fn delhi() -> Option<GeoPoint> {
        Some(GeoPoint::new(28.55, 77.10))
    }

    fn mumbai() -> Option<GeoPoint> {
        Some(GeoPoint::new(19.08, 72.87))
    }

    #[test]
    fn dispatch() {
        let inputs = Inputs::AircraftEfficiency(FlightInputs {
            departure: delhi(),
            arrival: mumbai(),
            aircraft: Some("A320".to_string()),
            passengers: None,
        });
        let r = estimate(&inputs);
        assert_eq!(inputs.policy(), Policy::AircraftEfficiency);
        assert_eq!(r.policy(), Policy::AircraftEfficiency);
        assert!(r.is_valid());

        let inputs = Inputs::FlatFee(FeeInputs {
            departure: delhi(),
            arrival: mumbai(),
            travel_class: TravelClass::Economy,
            ..Default::default()
        });
        let r2 = estimate(&inputs);
        assert_eq!(r2.policy(), Policy::FlatFee);
        assert!(r2.is_valid());

        // shared distance, different policies
        assert_eq!(r.distance_km(), r2.distance_km());
        assert_ne!(r.co2_per_passenger_kg(), r2.co2_per_passenger_kg());
    }

    #[test]
    fn invalid_inputs() {
        let r = estimate(&Inputs::AircraftEfficiency(FlightInputs::default()));
        assert!(!r.is_valid());
        assert_eq!(r.distance_km(), 0.0);

        let r = estimate(&Inputs::FlatFee(FeeInputs::default()));
        assert!(!r.is_valid());
    }

    #[test]
    fn policy_names() {
        for policy in [Policy::AircraftEfficiency, Policy::FlatFee] {
            assert_eq!(policy.name().parse::<Policy>(), Ok(policy));
        }
        assert!("cheapest".parse::<Policy>().is_err());
    }

    #[test]
    fn inputs_from_json() {
        let inputs: Inputs = serde_json::from_str(
            r#"{"policy": "aircraft-efficiency", "departure": {"latitude": 28.55, "longitude": 77.1}, "arrival": null, "aircraft": "B77W", "passengers": 200}"#,
        )
        .unwrap();
        assert_eq!(inputs.policy(), Policy::AircraftEfficiency);

        let inputs: Inputs = serde_json::from_str(
            r#"{"policy": "flat-fee", "departure": null, "arrival": null, "travel_class": "business"}"#,
        )
        .unwrap();
        let Inputs::FlatFee(inputs) = inputs else {
            panic!("expected flat-fee inputs")
        };
        assert_eq!(inputs.travel_class, TravelClass::Business);
        assert_eq!(inputs.parameters, crate::FeeParameters::default());
    }
}
