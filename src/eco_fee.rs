use serde::{Deserialize, Serialize};

use crate::{round_to, valid_ends, GeoPoint};

/// Cabin class of the passenger paying the eco fee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelClass {
    #[default]
    Economy,
    Business,
}

impl TravelClass {
    pub fn name(&self) -> &'static str {
        match self {
            TravelClass::Economy => "Economy",
            TravelClass::Business => "Business",
        }
    }
}

impl std::fmt::Display for TravelClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Constants of the flat-fee policy. Defaults correspond to an Airbus A320neo
/// and a fee in Indian rupees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeParameters {
    /// name of the aircraft assumed for every route
    pub aircraft: String,
    /// liters of fuel burnt per km
    pub fuel_per_km: f64,
    /// kg of CO2 per liter of fuel
    pub co2_per_liter: f64,
    /// currency units charged per kg of CO2
    pub fee_per_kg_co2: f64,
    /// ISO 4217 code of the fee's currency
    pub currency: String,
    pub economy_seats: u32,
    pub business_seats: u32,
}

impl Default for FeeParameters {
    fn default() -> Self {
        Self {
            aircraft: "Airbus A320neo".to_string(),
            fuel_per_km: 2.5,
            co2_per_liter: 2.5,
            fee_per_kg_co2: 2.5,
            currency: "INR".to_string(),
            economy_seats: 186,
            business_seats: 174,
        }
    }
}

impl FeeParameters {
    /// Passengers paying the fee in `class`; never zero
    pub fn passengers(&self, class: TravelClass) -> u32 {
        match class {
            TravelClass::Economy => self.economy_seats,
            TravelClass::Business => self.business_seats,
        }
        .max(1)
    }

    /// Whether the fuel, CO2 and fee constants are finite and non-negative
    pub fn is_valid(&self) -> bool {
        [self.fuel_per_km, self.co2_per_liter, self.fee_per_kg_co2]
            .iter()
            .all(|c| c.is_finite() && *c >= 0.0)
    }
}

/// Inputs of the flat-fee policy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeeInputs {
    pub departure: Option<GeoPoint>,
    pub arrival: Option<GeoPoint>,
    #[serde(default)]
    pub travel_class: TravelClass,
    #[serde(default)]
    pub parameters: FeeParameters,
    /// flight number of the ticket (e.g. `6E201`), echoed in the estimate
    #[serde(default)]
    pub flight_number: Option<String>,
}

/// Share of the collected fee, in percent, of tree planting, solar energy and EV infrastructure
pub const ALLOCATION_SHARES: [u64; 3] = [50, 30, 20];

/// Split of the total fee collected across the funded projects, in minor currency units
/// (e.g. paise). The buckets always sum to the total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub tree_planting: u64,
    pub solar_energy: u64,
    pub ev_infrastructure: u64,
}

impl Allocation {
    /// Splits `total` minor units by [`ALLOCATION_SHARES`]; EV infrastructure
    /// receives the remainder of the integer division.
    pub fn split(total: u64) -> Self {
        let [tree, solar, _] = ALLOCATION_SHARES;
        // shares are below 100, so the quotients fit in u64
        let share = |percent: u64| (total as u128 * percent as u128 / 100) as u64;
        let tree_planting = share(tree);
        let solar_energy = share(solar);
        Self {
            tree_planting,
            solar_energy,
            ev_infrastructure: total - tree_planting - solar_energy,
        }
    }

    pub fn total(&self) -> u64 {
        self.tree_planting + self.solar_energy + self.ev_infrastructure
    }
}

/// Converts an amount in major units to minor units (1/100), saturating at 0 and `u64::MAX`
pub fn to_minor_units(amount: f64) -> u64 {
    (amount * 100.0).round().max(0.0) as u64
}

/// Converts an amount in major units to minor units (1/100), or `None` when the
/// amount is negative, not finite, or does not fit in `u64`
pub fn checked_minor_units(amount: f64) -> Option<u64> {
    let minor = (amount * 100.0).round();
    (minor.is_finite() && minor >= 0.0 && minor < u64::MAX as f64).then_some(minor as u64)
}

/// Converts an amount in minor units (1/100) to major units
pub fn to_major_units(amount: u64) -> f64 {
    amount as f64 / 100.0
}

/// The eco fee of a flight and how the collected fee is spent, per the flat-fee policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcoFeeEstimate {
    pub flight_number: Option<String>,
    /// km, rounded to an integer
    pub distance_km: f64,
    pub travel_class: TravelClass,
    pub aircraft: String,
    pub passengers: u32,
    /// liters, rounded to an integer
    pub total_fuel_l: f64,
    /// kg, rounded to an integer
    pub co2_emissions_kg: f64,
    /// kg, rounded to one decimal
    pub co2_per_passenger_kg: f64,
    /// rounded to two decimals
    pub eco_fee_per_passenger: f64,
    /// rounded to two decimals; equal to the sum of the allocation
    pub total_fee_collected: f64,
    pub currency: String,
    pub allocation: Allocation,
    pub valid: bool,
}

impl EcoFeeEstimate {
    /// The all-zero estimate of a flight whose route or fee constants are unusable
    pub fn invalid(travel_class: TravelClass, parameters: &FeeParameters) -> Self {
        Self {
            flight_number: None,
            distance_km: 0.0,
            travel_class,
            aircraft: parameters.aircraft.clone(),
            passengers: 0,
            total_fuel_l: 0.0,
            co2_emissions_kg: 0.0,
            co2_per_passenger_kg: 0.0,
            eco_fee_per_passenger: 0.0,
            total_fee_collected: 0.0,
            currency: parameters.currency.clone(),
            allocation: Allocation::default(),
            valid: false,
        }
    }
}

/// Flat representation of an [`EcoFeeEstimate`], one column per allocation bucket,
/// with amounts in major units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcoFeeRecord {
    pub flight_number: Option<String>,
    pub distance_km: f64,
    pub travel_class: TravelClass,
    pub aircraft: String,
    pub passengers: u32,
    pub total_fuel_l: f64,
    pub co2_emissions_kg: f64,
    pub co2_per_passenger_kg: f64,
    pub eco_fee_per_passenger: f64,
    pub total_fee_collected: f64,
    pub currency: String,
    pub tree_planting: f64,
    pub solar_energy: f64,
    pub ev_infrastructure: f64,
    pub valid: bool,
}

impl From<&EcoFeeEstimate> for EcoFeeRecord {
    fn from(e: &EcoFeeEstimate) -> Self {
        Self {
            flight_number: e.flight_number.clone(),
            distance_km: e.distance_km,
            travel_class: e.travel_class,
            aircraft: e.aircraft.clone(),
            passengers: e.passengers,
            total_fuel_l: e.total_fuel_l,
            co2_emissions_kg: e.co2_emissions_kg,
            co2_per_passenger_kg: e.co2_per_passenger_kg,
            eco_fee_per_passenger: e.eco_fee_per_passenger,
            total_fee_collected: e.total_fee_collected,
            currency: e.currency.clone(),
            tree_planting: to_major_units(e.allocation.tree_planting),
            solar_energy: to_major_units(e.allocation.solar_energy),
            ev_infrastructure: to_major_units(e.allocation.ev_infrastructure),
            valid: e.valid,
        }
    }
}

/// Computes the eco fee of a flight of `distance` km, or [`EcoFeeEstimate::invalid`]
/// when `distance` or a constant of `parameters` is negative or not finite, or when
/// the total fee does not fit in minor units.
pub fn distance_to_eco_fee(
    distance: f64,
    travel_class: TravelClass,
    parameters: &FeeParameters,
) -> EcoFeeEstimate {
    if !(distance.is_finite() && distance >= 0.0 && parameters.is_valid()) {
        log::warn!("Invalid flat-fee inputs: {distance} km, {parameters:?}");
        return EcoFeeEstimate::invalid(travel_class, parameters);
    }
    let passengers = parameters.passengers(travel_class);

    let total_fuel = distance * parameters.fuel_per_km;
    let co2_emissions = total_fuel * parameters.co2_per_liter;
    let co2_per_passenger = co2_emissions / passengers as f64;

    let fee_per_passenger = co2_per_passenger * parameters.fee_per_kg_co2;
    let Some(total_fee) = checked_minor_units(fee_per_passenger * passengers as f64) else {
        log::warn!("Total fee of {fee_per_passenger} per passenger does not fit in minor units");
        return EcoFeeEstimate::invalid(travel_class, parameters);
    };

    EcoFeeEstimate {
        flight_number: None,
        distance_km: round_to(distance, 0),
        travel_class,
        aircraft: parameters.aircraft.clone(),
        passengers,
        total_fuel_l: round_to(total_fuel, 0),
        co2_emissions_kg: round_to(co2_emissions, 0),
        co2_per_passenger_kg: round_to(co2_per_passenger, 1),
        eco_fee_per_passenger: round_to(fee_per_passenger, 2),
        total_fee_collected: to_major_units(total_fee),
        currency: parameters.currency.clone(),
        allocation: Allocation::split(total_fee),
        valid: true,
    }
}

/// Returns the eco fee of a flight per the flat-fee policy, or
/// [`EcoFeeEstimate::invalid`] when the departure or arrival is missing or invalid.
pub fn eco_fee(inputs: &FeeInputs) -> EcoFeeEstimate {
    let estimate = match valid_ends(inputs.departure, inputs.arrival) {
        Some((from, to)) => distance_to_eco_fee(
            from.distance_km(&to),
            inputs.travel_class,
            &inputs.parameters,
        ),
        None => EcoFeeEstimate::invalid(inputs.travel_class, &inputs.parameters),
    };
    EcoFeeEstimate {
        flight_number: inputs.flight_number.clone(),
        ..estimate
    }
}
