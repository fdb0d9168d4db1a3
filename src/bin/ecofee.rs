use std::error::Error;

use clap::Parser;
use num_format::{Locale, ToFormattedString};
use simple_logger::SimpleLogger;
use tinytemplate::TinyTemplate;

use ecofee::*;

static EMISSION_TEMPLATE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/src/bin/emission_template.md"
));
static ECO_FEE_TEMPLATE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/src/bin/eco_fee_template.md"
));
static TEMPLATE_NAME: &'static str = "t";

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
enum Class {
    Economy,
    Business,
}

impl From<Class> for TravelClass {
    fn from(class: Class) -> Self {
        match class {
            Class::Economy => TravelClass::Economy,
            Class::Business => TravelClass::Business,
        }
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
enum Format {
    Markdown,
    Json,
    Csv,
}

const ABOUT: &'static str = r#"Estimates the CO2 of a domestic flight and what it costs to offset it.
The route is picked by airport code (`--from DEL --to BOM`) or by coordinates
(`--departure 28.55,77.10 --arrival 19.08,72.87`). Two independent policies are available:
* `aircraft-efficiency`: emission factor adjusted by distance and aircraft type,
  with the cost of offsetting one passenger's emissions
* `flat-fee`: flat fuel burn and fee rate, with the eco fee per passenger and
  how the collected fee is split across tree planting, solar energy and EV infrastructure
"#;

#[derive(Parser, Debug)]
#[command(author, version, about = ABOUT)]
struct Cli {
    /// IATA code of the departure airport (e.g. `DEL`)
    #[arg(long, conflicts_with = "departure", required_unless_present_any = ["departure", "list_airports"])]
    from: Option<String>,
    /// IATA code of the destination airport (e.g. `BOM`)
    #[arg(long, conflicts_with = "arrival", required_unless_present_any = ["arrival", "list_airports"])]
    to: Option<String>,
    /// Departure coordinates in format `latitude,longitude`
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    departure: Option<GeoPoint>,
    /// Arrival coordinates in format `latitude,longitude`
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    arrival: Option<GeoPoint>,
    /// The calculation policy: `aircraft-efficiency` or `flat-fee`
    #[arg(short, long, default_value_t = Policy::AircraftEfficiency)]
    policy: Policy,
    /// [aircraft-efficiency] The aircraft type (e.g. `B77W`)
    #[arg(short, long)]
    aircraft: Option<String>,
    /// [aircraft-efficiency] The number of passengers on board
    #[arg(long)]
    passengers: Option<u32>,
    /// [flat-fee] The travel class
    #[arg(short, long, value_enum, default_value_t = Class::Economy)]
    class: Class,
    /// [flat-fee] Liters of fuel burnt per km
    #[arg(long, value_parser = parse_rate)]
    fuel_per_km: Option<f64>,
    /// [flat-fee] kg of CO2 per liter of fuel
    #[arg(long, value_parser = parse_rate)]
    co2_per_liter: Option<f64>,
    /// [flat-fee] Fee per kg of CO2
    #[arg(long, value_parser = parse_rate)]
    fee_per_kg_co2: Option<f64>,
    /// [flat-fee] The currency of the fee
    #[arg(long)]
    currency: Option<String>,
    /// [flat-fee] The flight number printed with the estimate (e.g. `6E201`)
    #[arg(long)]
    flight: Option<String>,
    /// The format of the output
    #[arg(short, long, value_enum, default_value_t = Format::Markdown)]
    format: Format,
    /// Writes the output to this path instead of stdout
    #[arg(short, long)]
    output: Option<String>,
    /// Lists the known airports and exits
    #[arg(long)]
    list_airports: bool,
    /// Logs debug information
    #[arg(short, long)]
    verbose: bool,
}

fn parse_point(arg: &str) -> Result<GeoPoint, String> {
    let (latitude, longitude) = arg
        .split_once(',')
        .ok_or_else(|| format!("{arg} is not in format `latitude,longitude`"))?;
    let latitude = latitude.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let longitude = longitude.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let point = GeoPoint::new(latitude, longitude);
    point
        .is_valid()
        .then_some(point)
        .ok_or_else(|| format!("{arg} is outside of [-90, 90],[-180, 180]"))
}

fn parse_rate(arg: &str) -> Result<f64, String> {
    let rate = arg.trim().parse::<f64>().map_err(|e| e.to_string())?;
    (rate.is_finite() && rate >= 0.0)
        .then_some(rate)
        .ok_or_else(|| format!("{arg} is not a finite, non-negative number"))
}

/// A named end of a route
struct End {
    name: String,
    point: GeoPoint,
}

fn ends(cli: &Cli) -> Result<(End, End), Box<dyn Error>> {
    let end = |code: Option<&String>, point: Option<GeoPoint>| -> Result<End, Box<dyn Error>> {
        match (code, point) {
            (Some(code), _) => {
                let airport = airport(code).ok_or_else(|| ecofee::Error::UnknownAirport(code.clone()))?;
                Ok(End {
                    name: format!("{} ({})", airport.city, airport.code),
                    point: airport.point(),
                })
            }
            (None, Some(point)) => Ok(End {
                name: format!("{:.2}, {:.2}", point.latitude(), point.longitude()),
                point,
            }),
            (None, None) => Err("Route has no departure or arrival".into()),
        }
    };
    if let (Some(from), Some(to)) = (&cli.from, &cli.to) {
        let route = route(from, to)?;
        log::info!(
            "Route: {} -> {} ({:.0} km)",
            route.departure.name,
            route.destination.name,
            route.distance_km()
        );
    }
    Ok((
        end(cli.from.as_ref(), cli.departure)?,
        end(cli.to.as_ref(), cli.arrival)?,
    ))
}

fn fee_parameters(cli: &Cli) -> FeeParameters {
    let default = FeeParameters::default();
    FeeParameters {
        fuel_per_km: cli.fuel_per_km.unwrap_or(default.fuel_per_km),
        co2_per_liter: cli.co2_per_liter.unwrap_or(default.co2_per_liter),
        fee_per_kg_co2: cli.fee_per_kg_co2.unwrap_or(default.fee_per_kg_co2),
        currency: cli.currency.clone().unwrap_or(default.currency.clone()),
        ..default
    }
}

/// Formats an amount in minor units as `1,234.56`
fn money(minor: u64) -> String {
    format!(
        "{}.{:02}",
        (minor / 100).to_formatted_string(&Locale::en),
        minor % 100
    )
}

#[derive(serde::Serialize)]
struct EmissionContext<'a> {
    departure: &'a str,
    destination: &'a str,
    aircraft: String,
    policy: Policy,
    haul: Option<Haul>,
    distance_km: String,
    passengers: String,
    co2_per_passenger_kg: String,
    total_co2_tons: String,
    basic_offset_cost_usd: String,
    premium_offset_cost_usd: String,
}

#[derive(serde::Serialize)]
struct EcoFeeContext<'a> {
    flight_number: Option<&'a str>,
    departure: &'a str,
    destination: &'a str,
    aircraft: &'a str,
    policy: Policy,
    travel_class: TravelClass,
    currency: &'a str,
    distance_km: String,
    total_fuel_l: String,
    passengers: String,
    co2_emissions_kg: String,
    co2_per_passenger_kg: String,
    eco_fee_per_passenger: String,
    total_fee_collected: String,
    tree_planting: String,
    solar_energy: String,
    ev_infrastructure: String,
}

fn render(template: &str, context: &impl serde::Serialize) -> Result<String, Box<dyn Error>> {
    let mut tt = TinyTemplate::new();
    tt.set_default_formatter(&tinytemplate::format_unescaped);
    tt.add_template(TEMPLATE_NAME, template)?;
    Ok(tt.render(TEMPLATE_NAME, context)?)
}

fn markdown(
    estimate: &Estimate,
    departure: &End,
    destination: &End,
    aircraft: Option<&str>,
) -> Result<String, Box<dyn Error>> {
    let integer = |v: f64| (v as u64).to_formatted_string(&Locale::en);
    match estimate {
        Estimate::AircraftEfficiency(e) => {
            let profile = aircraft_profile(aircraft);
            let context = EmissionContext {
                departure: &departure.name,
                destination: &destination.name,
                aircraft: format!("{} ({})", profile.name, profile.identifier),
                policy: estimate.policy(),
                haul: e.haul,
                distance_km: integer(e.distance_km),
                passengers: e.estimated_passengers.to_formatted_string(&Locale::en),
                co2_per_passenger_kg: format!("{:.1}", e.co2_per_passenger_kg),
                total_co2_tons: format!("{:.1}", e.total_co2_tons),
                basic_offset_cost_usd: format!("{:.2}", e.basic_offset_cost_usd),
                premium_offset_cost_usd: format!("{:.2}", e.premium_offset_cost_usd),
            };
            render(EMISSION_TEMPLATE, &context)
        }
        Estimate::FlatFee(e) => {
            let context = EcoFeeContext {
                flight_number: e.flight_number.as_deref(),
                departure: &departure.name,
                destination: &destination.name,
                aircraft: &e.aircraft,
                policy: estimate.policy(),
                travel_class: e.travel_class,
                currency: &e.currency,
                distance_km: integer(e.distance_km),
                total_fuel_l: integer(e.total_fuel_l),
                passengers: e.passengers.to_formatted_string(&Locale::en),
                co2_emissions_kg: integer(e.co2_emissions_kg),
                co2_per_passenger_kg: format!("{:.1}", e.co2_per_passenger_kg),
                eco_fee_per_passenger: money(to_minor_units(e.eco_fee_per_passenger)),
                total_fee_collected: money(e.allocation.total()),
                tree_planting: money(e.allocation.tree_planting),
                solar_energy: money(e.allocation.solar_energy),
                ev_infrastructure: money(e.allocation.ev_infrastructure),
            };
            render(ECO_FEE_TEMPLATE, &context)
        }
    }
}

fn list_airports() -> Result<String, Box<dyn Error>> {
    Ok(String::from_utf8(ecofee::csv::serialize(
        airports().iter(),
    )?)?)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    SimpleLogger::new()
        .with_level(if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init()?;

    let rendered = if cli.list_airports {
        list_airports()?
    } else {
        let (departure, destination) = ends(&cli)?;

        let inputs = match cli.policy {
            Policy::AircraftEfficiency => Inputs::AircraftEfficiency(FlightInputs {
                departure: Some(departure.point),
                arrival: Some(destination.point),
                aircraft: cli.aircraft.clone(),
                passengers: cli.passengers,
            }),
            Policy::FlatFee => Inputs::FlatFee(FeeInputs {
                departure: Some(departure.point),
                arrival: Some(destination.point),
                travel_class: cli.class.into(),
                parameters: fee_parameters(&cli),
                flight_number: cli.flight.as_ref().map(|f| f.trim().to_uppercase()),
            }),
        };
        let estimate = estimate(&inputs);

        match cli.format {
            Format::Markdown => markdown(
                &estimate,
                &departure,
                &destination,
                cli.aircraft.as_deref(),
            )?,
            Format::Json => serde_json::to_string_pretty(&estimate)?,
            Format::Csv => String::from_utf8(match &estimate {
                Estimate::AircraftEfficiency(e) => ecofee::csv::serialize(std::iter::once(e))?,
                Estimate::FlatFee(e) => {
                    ecofee::csv::serialize(std::iter::once(EcoFeeRecord::from(e)))?
                }
            })?,
        }
    };

    match cli.output {
        Some(path) => {
            std::fs::write(&path, rendered)?;
            log::info!("Estimate written to {path}");
        }
        None => print!("{rendered}"),
    }

    Ok(())
}
