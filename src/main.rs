use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use latency_globe::cli::commands::{self, parse_geo_point};
use latency_globe::config::AppConfig;
use latency_globe::geometry::GeoPoint;

#[derive(Parser)]
#[command(name = "latency-globe")]
#[command(about = "Geodesic track geometry and upstream proxy for a data-center latency globe")]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "globe.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the proxy server
    Serve,

    /// Print the sphere position for a lat/lng
    Position {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Sphere radius (defaults to the configured planet radius)
        #[arg(long)]
        radius: Option<f64>,
    },

    /// Print the great-circle point at an offset between two positions
    Interpolate {
        /// Start as LAT,LNG
        #[arg(long, value_parser = parse_geo_point, allow_hyphen_values = true)]
        from: GeoPoint,
        /// End as LAT,LNG
        #[arg(long, value_parser = parse_geo_point, allow_hyphen_values = true)]
        to: GeoPoint,
        #[arg(long, default_value_t = 0.5, allow_hyphen_values = true)]
        offset: f64,
    },

    /// Print control points and line points of a latency track
    Track {
        #[arg(long, value_parser = parse_geo_point, allow_hyphen_values = true)]
        from: GeoPoint,
        #[arg(long, value_parser = parse_geo_point, allow_hyphen_values = true)]
        to: GeoPoint,
        /// Latency value in ms
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        value: f64,
        /// Relative magnitude 0-100 (derived from value when omitted)
        #[arg(long)]
        percent: Option<f64>,
    },

    /// Print the band color for a latency value
    Color {
        #[arg(allow_hyphen_values = true)]
        value: f64,
    },

    /// Build a scene offline from upstream-shaped JSON files
    Scene {
        /// Data-center listing (`{"dataCenters": [...]}`)
        #[arg(long)]
        data_centers: PathBuf,
        /// Real-time map response (`{"data": [{"latencies": [...]}]}`)
        #[arg(long)]
        latencies: PathBuf,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn load(path: &str, required: bool) -> AppConfig {
    let path = Path::new(path);
    let result = if required {
        AppConfig::from_file(path)
    } else {
        commands::load_or_default(path)
    };
    match result {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => {
            let config = load(&cli.config, true);
            if let Err(e) = commands::run_server(&config).await {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }

        Commands::Position { lat, lng, radius } => {
            let radius = match radius {
                Some(r) => r,
                None => load(&cli.config, false).globe.planet_radius,
            };
            commands::print_position(lat, lng, radius);
        }

        Commands::Interpolate { from, to, offset } => {
            commands::print_interpolation(from, to, offset);
        }

        Commands::Track {
            from,
            to,
            value,
            percent,
        } => {
            let config = load(&cli.config, false);
            commands::print_track(&config.globe, from, to, value, percent);
        }

        Commands::Color { value } => commands::print_color(value),

        Commands::Scene {
            data_centers,
            latencies,
            output,
        } => {
            let config = load(&cli.config, false);
            if let Err(e) = commands::build_scene_file(
                &config.globe,
                &data_centers,
                &latencies,
                output.as_deref(),
            ) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
