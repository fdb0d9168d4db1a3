use std::{collections::HashMap, error::Error, sync::OnceLock};

use serde::{Deserialize, Serialize};

static PROFILES: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/src/aircraft_profiles.csv"
));

/// Identifier of the profile used when the aircraft type is absent or unknown
pub static DEFAULT_PROFILE: &str = "default";

/// In-memory representation of an aircraft type's seating and efficiency
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AircraftProfile {
    /// the type (e.g. `B77W`), or `default` for the fallback profile
    pub identifier: String,
    /// the name of the type (e.g. `Boeing 777-300ER`)
    pub name: String,
    /// number of seats
    pub passenger_capacity: u32,
    /// fuel efficiency rating in `[0, 10]`, higher is better
    pub efficiency_rating: f64,
}

impl AircraftProfile {
    /// Multiplier applied to the base emission factor: `(10 - rating) / 10 + 0.5`.
    /// A rating of 10 yields 0.5 and a rating of 0 yields 1.5.
    pub fn efficiency_multiplier(&self) -> f64 {
        (10.0 - self.efficiency_rating) / 10.0 + 0.5
    }
}

/// A map of the aircraft type (e.g. `B77W`) to an [`AircraftProfile`], together with
/// the fallback profile used for absent or unknown types.
#[derive(Debug, Clone)]
pub struct AircraftProfiles {
    default: AircraftProfile,
    by_type: HashMap<String, AircraftProfile>,
}

impl AircraftProfiles {
    /// A table with only the default profile (180 seats, efficiency 7.0)
    pub fn fallback() -> Self {
        Self {
            default: AircraftProfile {
                identifier: DEFAULT_PROFILE.to_string(),
                name: "Unknown aircraft".to_string(),
                passenger_capacity: 180,
                efficiency_rating: 7.0,
            },
            by_type: HashMap::new(),
        }
    }

    /// Returns the profile of `type_`, or the default profile when `type_` is `None`
    /// or not in the table. Lookups are case-insensitive.
    pub fn get(&self, type_: Option<&str>) -> &AircraftProfile {
        let Some(type_) = type_.map(str::trim).filter(|t| !t.is_empty()) else {
            return &self.default;
        };
        match self.by_type.get(&type_.to_ascii_uppercase()) {
            Some(profile) => profile,
            None => {
                log::debug!("Aircraft type {type_} unknown; using the default profile");
                &self.default
            }
        }
    }

    /// The fallback profile
    pub fn default_profile(&self) -> &AircraftProfile {
        &self.default
    }

    /// Whether `type_` has its own entry in the table
    pub fn contains(&self, type_: &str) -> bool {
        self.by_type.contains_key(&type_.to_ascii_uppercase())
    }

    /// Number of known aircraft types, excluding the default profile
    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

fn validate(profile: &AircraftProfile) -> Result<(), Box<dyn Error>> {
    if profile.passenger_capacity == 0 {
        return Err(format!("Aircraft {} has no seats", profile.identifier).into());
    }
    if !(0.0..=10.0).contains(&profile.efficiency_rating) {
        return Err(format!(
            "Aircraft {} has efficiency rating {} outside [0, 10]",
            profile.identifier, profile.efficiency_rating
        )
        .into());
    }
    Ok(())
}

/// Parses a table of aircraft profiles with the columns
/// `identifier,name,passenger_capacity,efficiency_rating`.
/// # Error
/// Errors if a record cannot be parsed, has zero seats, has a rating outside `[0, 10]`,
/// or if the table has no `default` entry.
pub fn parse_aircraft_profiles(data: &[u8]) -> Result<AircraftProfiles, Box<dyn Error>> {
    let mut by_type = super::csv::load(data, |p: AircraftProfile| {
        (p.identifier.to_ascii_uppercase(), p)
    })?;
    by_type.values().try_for_each(validate)?;

    let default = by_type
        .remove(&DEFAULT_PROFILE.to_ascii_uppercase())
        .ok_or_else(|| Into::<Box<dyn Error>>::into("Aircraft table has no default profile"))?;
    Ok(AircraftProfiles { default, by_type })
}

/// Returns the aircraft profiles in `src/aircraft_profiles.csv`, parsed on first use.
pub fn aircraft_profiles() -> &'static AircraftProfiles {
    static CACHE: OnceLock<AircraftProfiles> = OnceLock::new();
    CACHE.get_or_init(|| {
        parse_aircraft_profiles(PROFILES.as_bytes()).unwrap_or_else(|e| {
            log::error!("Embedded aircraft table is invalid ({e}); using the default profile only");
            AircraftProfiles::fallback()
        })
    })
}

/// Returns the [`AircraftProfile`] of `type_`, falling back to the default profile
/// (180 seats, efficiency 7.0) when it is absent or unknown.
pub fn aircraft_profile(type_: Option<&str>) -> &'static AircraftProfile {
    aircraft_profiles().get(type_)
}
