use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{AppConfig, GlobeConfig};
use crate::geometry::{
    GeoPoint, TrackSpline, build_track_between, color_for_value, interpolate_points,
    position_from_lat_lng, track_altitude,
};
use crate::latency::{DataCenterDirectory, DataCentersResponse, RealTimeMapResponse};
use crate::scene::build_scene;
use crate::server::{self, ServerState};

use super::logging::init_logging;

/// Parse `LAT,LNG` in degrees.
pub fn parse_geo_point(s: &str) -> Result<GeoPoint, String> {
    let (lat, lng) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG, got '{}'", s))?;
    let lat = lat
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid latitude '{}': {}", lat.trim(), e))?;
    let lng = lng
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid longitude '{}': {}", lng.trim(), e))?;
    Ok(GeoPoint::new(lat, lng))
}

/// Load the config file if present, otherwise fall back to defaults.
pub fn load_or_default(path: &Path) -> Result<AppConfig, String> {
    if path.exists() {
        AppConfig::from_file(path)
    } else {
        Ok(AppConfig::default())
    }
}

/// Run the proxy until Ctrl-C.
pub async fn run_server(config: &AppConfig) -> Result<(), String> {
    init_logging(&config.server);

    let addr = config.server.socket_addr()?;
    let state = ServerState::from_config(config)
        .map_err(|e| format!("Cannot create upstream client: {}", e))?;
    let state = Arc::new(state);

    info!(
        static_dir = %config.server.static_directory,
        radius = config.globe.planet_radius,
        "Starting latency globe proxy"
    );

    tokio::select! {
        result = server::start_server(state, addr) => {
            result.map_err(|e| format!("Server error: {}", e))
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("Shutdown signal received");
            Ok(())
        }
    }
}

pub fn print_position(lat: f64, lng: f64, radius: f64) {
    let p = position_from_lat_lng(lat, lng, radius);
    println!("x:     {:.6}", p.x);
    println!("y:     {:.6}", p.y);
    println!("z:     {:.6}", p.z);
    println!("phi:   {:.6} rad", p.phi);
    println!("theta: {:.6} rad", p.theta);
}

pub fn print_interpolation(from: GeoPoint, to: GeoPoint, offset: f64) {
    let p = interpolate_points(from, to, offset);
    println!("lat: {:.6}", p.lat);
    println!("lng: {:.6}", p.lng);
}

pub fn print_track(
    globe: &GlobeConfig,
    from: GeoPoint,
    to: GeoPoint,
    value: f64,
    percent: Option<f64>,
) {
    let percent = percent.unwrap_or_else(|| globe.percent_for(value));
    let max_altitude = track_altitude(
        globe.track_base_altitude,
        globe.track_altitude_per_percent,
        percent,
    );
    let control = build_track_between(
        from,
        to,
        globe.planet_radius,
        globe.track_control_points,
        max_altitude,
    );
    let spline = TrackSpline::new(control);

    println!(
        "Track ({:.3}, {:.3}) -> ({:.3}, {:.3}) value {} percent {:.1} max altitude {:.1} color {}",
        from.lat,
        from.lng,
        to.lat,
        to.lng,
        value,
        percent,
        max_altitude,
        color_for_value(value)
    );
    println!();
    println!("--- Control points ---");
    for (i, p) in spline.control_points().iter().enumerate() {
        println!("{:>3} {:>14.3} {:>14.3} {:>14.3}  |r| {:.3}", i, p.x, p.y, p.z, p.length());
    }
    println!();
    println!("--- Line points ---");
    for (i, p) in spline.resample(globe.track_line_points).iter().enumerate() {
        println!("{:>3} {:>14.3} {:>14.3} {:>14.3}", i, p.x, p.y, p.z);
    }
}

pub fn print_color(value: f64) {
    let color = color_for_value(value);
    println!("{} (r={}, g={}, b={})", color, color.r(), color.g(), color.b());
}

/// Build a scene from upstream-shaped JSON files and write it as JSON.
pub fn build_scene_file(
    globe: &GlobeConfig,
    data_centers_path: &Path,
    latencies_path: &Path,
    output: Option<&Path>,
) -> Result<(), String> {
    let listing: DataCentersResponse = read_json(data_centers_path)?;
    let map: RealTimeMapResponse = read_json(latencies_path)?;

    let directory = DataCenterDirectory::from_list(listing.data_centers);
    let scene = build_scene(globe, &directory, &map.data);

    let json = serde_json::to_string_pretty(&scene)
        .map_err(|e| format!("Cannot serialize scene: {}", e))?;

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .map_err(|e| format!("Cannot write {}: {}", path.display(), e))?;
            eprintln!(
                "Scene written to {} ({} tracks, {} markers, {} skipped)",
                path.display(),
                scene.tracks.len(),
                scene.markers.len(),
                scene.skipped_samples
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
    serde_json::from_str(&content).map_err(|e| format!("Invalid JSON in {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn geo_point_parsing() {
        assert_eq!(parse_geo_point("40.7,-74.0").unwrap(), GeoPoint::new(40.7, -74.0));
        assert_eq!(parse_geo_point(" -33.9 , 151.2 ").unwrap(), GeoPoint::new(-33.9, 151.2));
        assert!(parse_geo_point("40.7").unwrap_err().contains("LAT,LNG"));
        assert!(parse_geo_point("north,-74").unwrap_err().contains("latitude"));
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let config = load_or_default(Path::new("/nonexistent/globe.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn scene_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let dcs = dir.path().join("dcs.json");
        let lat = dir.path().join("latencies.json");
        let out = dir.path().join("scene.json");

        let mut f = std::fs::File::create(&dcs).unwrap();
        write!(
            f,
            r#"{{"dataCenters": [{{"dcId": "a", "lat": 0.0, "lng": 0.0}}, {{"dcId": "b", "lat": 0.0, "lng": 90.0}}]}}"#
        )
        .unwrap();
        let mut f = std::fs::File::create(&lat).unwrap();
        write!(
            f,
            r#"{{"data": [{{"latencies": [{{"from": "a", "to": "b", "value": 120.0}}]}}]}}"#
        )
        .unwrap();

        build_scene_file(&GlobeConfig::default(), &dcs, &lat, Some(&out)).unwrap();

        let scene: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(scene["tracks"].as_array().unwrap().len(), 1);
        assert_eq!(scene["tracks"][0]["color"], "#ff9b00");
        assert_eq!(scene["markers"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn scene_file_reports_bad_json() {
        let mut bad = tempfile::NamedTempFile::new().unwrap();
        write!(bad, "not json").unwrap();
        let err =
            build_scene_file(&GlobeConfig::default(), bad.path(), bad.path(), None).unwrap_err();
        assert!(err.contains("Invalid JSON"));
    }
}
