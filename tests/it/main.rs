use ecofee::*;

fn abs_difference<T: std::ops::Sub<Output = T> + PartialOrd>(x: T, y: T) -> T {
    if x < y {
        y - x
    } else {
        x - y
    }
}

fn delhi() -> GeoPoint {
    GeoPoint::new(28.55, 77.10)
}

fn mumbai() -> GeoPoint {
    GeoPoint::new(19.08, 72.87)
}

/// Verifies that `distance_km` agrees with the haversine distance of the `geoutils` crate,
/// which uses a slightly different Earth radius (hence the tolerance).
#[test]
fn acceptance_test_distance() {
    let accepted_error = 0.0001; // 0.01%

    for (from, to) in [
        ("DEL", "BOM"),
        ("TRV", "DIB"),
        ("SXR", "IXZ"),
        ("CCU", "BHJ"),
    ] {
        let route = route(from, to).unwrap();
        let (from, to) = (route.departure.point(), route.destination.point());

        let expected = geoutils::Location::new(from.latitude(), from.longitude())
            .haversine_distance_to(&geoutils::Location::new(to.latitude(), to.longitude()))
            .meters()
            / 1000.0;
        let distance = distance_km(from, to);
        assert!(abs_difference(distance, expected) / expected < accepted_error);
    }
}

#[test]
fn delhi_mumbai() {
    let distance = distance_km(delhi(), mumbai());
    assert!(distance > 1130.0 && distance < 1160.0);
    assert_eq!(Haul::from_distance(distance), Haul::Short);
    assert_eq!(distance, distance_km(mumbai(), delhi()));

    let estimate = estimate(&Inputs::AircraftEfficiency(FlightInputs {
        departure: Some(delhi()),
        arrival: Some(mumbai()),
        aircraft: None,
        passengers: None,
    }));
    let Estimate::AircraftEfficiency(e) = estimate else {
        panic!("expected an aircraft-efficiency estimate")
    };
    assert_eq!(
        e,
        EmissionEstimate {
            distance_km: 1137.0,
            haul: Some(Haul::Short),
            estimated_passengers: 148,
            co2_per_passenger_kg: 131.0,
            total_co2_tons: 19.4,
            basic_offset_cost_usd: 1.05,
            premium_offset_cost_usd: 5.24,
            valid: true,
        }
    );
}

#[test]
fn unknown_aircraft_is_default() {
    let inputs = |aircraft: &str| {
        Inputs::AircraftEfficiency(FlightInputs {
            departure: Some(delhi()),
            arrival: Some(mumbai()),
            aircraft: Some(aircraft.to_string()),
            passengers: None,
        })
    };
    assert_eq!(estimate(&inputs("XXXX")), estimate(&inputs("A320")));
}

#[test]
fn long_haul_is_cheaper_per_km() {
    // Port Blair -> Srinagar, ~3080 km
    let route = route("IXZ", "SXR").unwrap();
    assert_eq!(Haul::from_distance(route.distance_km()), Haul::Medium);

    let aircraft = aircraft_profile(Some("A359"));
    let short = distance_to_emissions(1500.0, aircraft, Some(100));
    let medium = distance_to_emissions(3000.0, aircraft, Some(100));
    let long = distance_to_emissions(7000.0, aircraft, Some(100));
    let per_km = |e: &EmissionEstimate| e.co2_per_passenger_kg / e.distance_km;
    assert!(per_km(&short) > per_km(&medium));
    assert!(per_km(&medium) > per_km(&long));
}

#[test]
fn missing_coordinates() {
    for (departure, arrival) in [(Some(delhi()), None), (None, Some(mumbai())), (None, None)] {
        let e = estimate(&Inputs::AircraftEfficiency(FlightInputs {
            departure,
            arrival,
            aircraft: Some("B77W".to_string()),
            passengers: Some(300),
        }));
        assert_eq!(e, Estimate::AircraftEfficiency(EmissionEstimate::invalid()));

        let e = estimate(&Inputs::FlatFee(FeeInputs {
            departure,
            arrival,
            ..Default::default()
        }));
        assert!(!e.is_valid());
        assert_eq!(e.distance_km(), 0.0);
    }
}

/// The fee-collection flow: a route picked from the catalogue, charged with the flat fee
#[test]
fn eco_fee_delhi_mumbai() {
    let route = route("DEL", "BOM").unwrap();
    let inputs = Inputs::FlatFee(FeeInputs {
        departure: Some(route.departure.point()),
        arrival: Some(route.destination.point()),
        travel_class: TravelClass::Economy,
        parameters: FeeParameters::default(),
        flight_number: Some("AI101".to_string()),
    });
    let Estimate::FlatFee(e) = estimate(&inputs) else {
        panic!("expected a flat-fee estimate")
    };
    assert!(e.valid);
    assert_eq!(e.distance_km, 1137.0);
    assert_eq!(e.total_fuel_l, 2843.0);
    assert_eq!(e.co2_emissions_kg, 7108.0);
    assert_eq!(e.passengers, 186);
    assert_eq!(e.co2_per_passenger_kg, 38.2);
    assert_eq!(e.eco_fee_per_passenger, 95.54);
    assert_eq!(e.currency, "INR");
    assert_eq!(e.flight_number.as_deref(), Some("AI101"));
    assert_eq!(to_minor_units(e.total_fee_collected), e.allocation.total());
}

#[test]
fn estimate_to_json() {
    let e = estimate(&Inputs::AircraftEfficiency(FlightInputs {
        departure: Some(delhi()),
        arrival: Some(mumbai()),
        aircraft: Some("B77W".to_string()),
        passengers: None,
    }));
    let value = serde_json::to_value(&e).unwrap();
    assert_eq!(value["policy"], "aircraft-efficiency");
    assert_eq!(value["estimated_passengers"], 325);
    assert_eq!(value["valid"], true);

    let back: Estimate = serde_json::from_value(value).unwrap();
    assert_eq!(back, e);
}
