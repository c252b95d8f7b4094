use catalog::{
    CityDirectory, FlightSearch, MockFlightSearch, OfflineFlightSearch, SimulatedFlightSearch,
};
use chrono::{Days, NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use planner::Planner;
use scene::{SURFACE_RADIUS, route_between};
use serde_json::json;
use tracing_subscriber::EnvFilter;

mod demo;

use demo::{FlyOptions, run_fly};

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless travel globe: search, book and fly")]
struct Args {
    /// Seed for the planner and the simulated provider
    #[arg(long, env = "TRAVEL_SEED", default_value_t = 7)]
    seed: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Provider {
    /// Drifting offline fares
    Simulated,
    /// The two fixed offers
    Mock,
    /// Always unreachable, forces the fallback
    Offline,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search a route, optionally book it, and fly the camera there
    Fly {
        #[arg(long, default_value = "FRA")]
        origin: String,

        #[arg(long, default_value = "JFK")]
        destination: String,

        /// Departure date, YYYY-MM-DD (default: tomorrow)
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long, value_enum, env = "TRAVEL_PROVIDER", default_value = "simulated")]
        provider: Provider,

        /// Book the cheapest offer as a trip
        #[arg(long)]
        save: bool,

        /// Add a price alert on the cheapest offer
        #[arg(long)]
        alert: bool,

        /// Scale the orbit distance before flying (clamped to 7..=30)
        #[arg(long, default_value_t = 1.0)]
        zoom: f64,

        /// Give up on the camera after this many 60 Hz frames
        #[arg(long, default_value_t = 600)]
        max_frames: u64,
    },

    /// Print the sampled arc between two airports as JSON
    Route {
        #[arg(long)]
        origin: String,

        #[arg(long)]
        destination: String,

        #[arg(long, default_value_t = SURFACE_RADIUS)]
        radius: f64,
    },

    /// List the built-in airports
    Cities,
}

fn provider(kind: Provider, seed: u64) -> Box<dyn FlightSearch> {
    match kind {
        Provider::Simulated => Box::new(SimulatedFlightSearch::new(seed)),
        Provider::Mock => Box::new(MockFlightSearch),
        Provider::Offline => Box::new(OfflineFlightSearch),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    match args.command {
        Command::Fly {
            origin,
            destination,
            date,
            provider: kind,
            save,
            alert,
            zoom,
            max_frames,
        } => {
            let now = Utc::now().naive_utc();
            let today = now.date();
            let opts = FlyOptions {
                origin,
                destination,
                date: date
                    .unwrap_or_else(|| today.checked_add_days(Days::new(1)).unwrap_or(today)),
                save,
                alert,
                zoom,
                max_frames,
                viewport: (1280.0, 720.0),
            };

            let mut planner = Planner::demo(args.seed);
            let provider = provider(kind, args.seed);
            let report = run_fly(&mut planner, provider.as_ref(), &opts, now)?;

            println!("offers ({:?}):", report.source);
            for offer in &report.offers {
                println!(
                    "  {:<12} {:>8}  {}  {}",
                    offer.airline, offer.price, offer.departure, offer.duration
                );
            }
            if let Some(trip) = &report.trip {
                println!("trip {} \"{}\" {}", trip.id, trip.title, trip.date_label);
            }
            if let Some(alert) = &report.alert {
                println!(
                    "alert {} {}->{} target {}",
                    alert.id, alert.origin, alert.dest, alert.target_price
                );
            }
            let cam = report.camera;
            println!(
                "camera after {} frames: ({:.3}, {:.3}, {:.3}) distance {:.3}",
                report.frames,
                cam.x,
                cam.y,
                cam.z,
                cam.length()
            );
            println!("route points: {}", report.route_points);
            if let Some(picked) = &report.picked {
                println!("center of screen: {picked}");
            }
            for event in &report.events {
                println!(
                    "  [{:>4}] {:<6} {}",
                    event.frame_index,
                    event.kind.as_str(),
                    event.message
                );
            }
        }
        Command::Route {
            origin,
            destination,
            radius,
        } => {
            let cities = CityDirectory::builtin();
            let Some(path) = route_between(&cities, &origin, &destination, radius) else {
                return Err(format!("unknown airport in {origin}->{destination}").into());
            };
            let out = json!({
                "origin": origin.to_uppercase(),
                "destination": destination.to_uppercase(),
                "control": path.control.to_f32(),
                "apexRadius": path.apex_radius(),
                "points": path.positions_f32(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Command::Cities => {
            let cities = CityDirectory::builtin();
            for code in cities.codes() {
                if let Some(point) = cities.get(code) {
                    println!("{code}  {:>7.2} {:>8.2}", point.lat_deg, point.lon_deg);
                }
            }
        }
    }

    Ok(())
}
