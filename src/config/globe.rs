use serde::Deserialize;

use crate::geometry::degrees_to_radians;

/// Globe scene options: planet mesh, textures, markers and track lines.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GlobeConfig {
    #[serde(default = "default_planet_radius")]
    pub planet_radius: f64,
    /// Defaults to 1.02 x planet_radius when absent.
    #[serde(default)]
    pub cloud_radius: Option<f64>,
    #[serde(default = "default_planet_tilt_deg")]
    pub planet_tilt_deg: f64,
    #[serde(default = "default_geom_segments")]
    pub geom_segments: u32,
    #[serde(default = "default_geom_rings")]
    pub geom_rings: u32,
    #[serde(default)]
    pub surface_texture: String,
    #[serde(default)]
    pub cloud_texture: String,
    #[serde(default)]
    pub normals_texture: String,
    #[serde(default)]
    pub specular_texture: String,
    #[serde(default)]
    pub use_surface_shader: bool,
    #[serde(default)]
    pub create_combined_mesh: bool,
    #[serde(default = "default_marker_radius")]
    pub marker_radius: f64,
    #[serde(default = "default_track_control_points")]
    pub track_control_points: u32,
    #[serde(default = "default_track_line_points")]
    pub track_line_points: u32,
    #[serde(default = "default_track_base_altitude")]
    pub track_base_altitude: f64,
    #[serde(default = "default_track_altitude_per_percent")]
    pub track_altitude_per_percent: f64,
    #[serde(default = "default_track_opacity")]
    pub track_opacity: f32,
    #[serde(default)]
    pub percent_floor: f64,
    #[serde(default = "default_percent_ceiling")]
    pub percent_ceiling: f64,
}

fn default_planet_radius() -> f64 {
    6378.0
}
fn default_planet_tilt_deg() -> f64 {
    20.0
}
fn default_geom_segments() -> u32 {
    64
}
fn default_geom_rings() -> u32 {
    64
}
fn default_marker_radius() -> f64 {
    80.0
}
fn default_track_control_points() -> u32 {
    8
}
fn default_track_line_points() -> u32 {
    30
}
fn default_track_base_altitude() -> f64 {
    500.0
}
fn default_track_altitude_per_percent() -> f64 {
    10.0
}
fn default_track_opacity() -> f32 {
    0.3
}
fn default_percent_ceiling() -> f64 {
    100.0
}

const CLOUD_RADIUS_FACTOR: f64 = 1.02;

impl Default for GlobeConfig {
    fn default() -> Self {
        GlobeConfig {
            planet_radius: default_planet_radius(),
            cloud_radius: None,
            planet_tilt_deg: default_planet_tilt_deg(),
            geom_segments: default_geom_segments(),
            geom_rings: default_geom_rings(),
            surface_texture: String::new(),
            cloud_texture: String::new(),
            normals_texture: String::new(),
            specular_texture: String::new(),
            use_surface_shader: false,
            create_combined_mesh: false,
            marker_radius: default_marker_radius(),
            track_control_points: default_track_control_points(),
            track_line_points: default_track_line_points(),
            track_base_altitude: default_track_base_altitude(),
            track_altitude_per_percent: default_track_altitude_per_percent(),
            track_opacity: default_track_opacity(),
            percent_floor: 0.0,
            percent_ceiling: default_percent_ceiling(),
        }
    }
}

impl GlobeConfig {
    pub fn cloud_radius(&self) -> f64 {
        self.cloud_radius
            .unwrap_or(self.planet_radius * CLOUD_RADIUS_FACTOR)
    }

    pub fn cloud_scale(&self) -> f64 {
        self.cloud_radius() / self.planet_radius
    }

    pub fn tilt_radians(&self) -> f64 {
        degrees_to_radians(self.planet_tilt_deg)
    }

    /// Map a latency value into 0..=100 between the configured floor and ceiling.
    pub fn percent_for(&self, value: f64) -> f64 {
        let span = self.percent_ceiling - self.percent_floor;
        ((value - self.percent_floor) / span).clamp(0.0, 1.0) * 100.0
    }

    pub fn validate(&self) -> Result<(), String> {
        let mut errors = Vec::new();

        if self.planet_radius.is_nan() || self.planet_radius <= 0.0 {
            errors.push(format!(
                "planet_radius must be > 0.0, got {}. Example: planet_radius = 6378.0",
                self.planet_radius
            ));
        }

        if let Some(cloud) = self.cloud_radius {
            if cloud.is_nan() || cloud < self.planet_radius {
                errors.push(format!(
                    "cloud_radius must be >= planet_radius ({}), got {}. Example: cloud_radius = {}",
                    self.planet_radius,
                    cloud,
                    self.planet_radius * CLOUD_RADIUS_FACTOR
                ));
            }
        }

        if !(-90.0..=90.0).contains(&self.planet_tilt_deg) {
            errors.push(format!(
                "planet_tilt_deg must be -90..=90, got {}. Example: planet_tilt_deg = 20.0",
                self.planet_tilt_deg
            ));
        }

        if self.geom_segments < 3 {
            errors.push(format!(
                "geom_segments must be >= 3, got {}. Example: geom_segments = 64",
                self.geom_segments
            ));
        }

        if self.geom_rings < 2 {
            errors.push(format!(
                "geom_rings must be >= 2, got {}. Example: geom_rings = 64",
                self.geom_rings
            ));
        }

        if self.use_surface_shader {
            for (name, value) in [
                ("surface_texture", &self.surface_texture),
                ("normals_texture", &self.normals_texture),
                ("specular_texture", &self.specular_texture),
            ] {
                if value.is_empty() {
                    errors.push(format!(
                        "{} is required when use_surface_shader = true. Example: {} = \"textures/earth.jpg\"",
                        name, name
                    ));
                }
            }
        }

        if self.marker_radius.is_nan() || self.marker_radius <= 0.0 {
            errors.push(format!(
                "marker_radius must be > 0.0, got {}. Example: marker_radius = 80.0",
                self.marker_radius
            ));
        }

        if self.track_control_points == 0 {
            errors.push(format!(
                "track_control_points must be >= 1, got {}. Example: track_control_points = 8",
                self.track_control_points
            ));
        }

        if self.track_line_points < 2 {
            errors.push(format!(
                "track_line_points must be >= 2, got {}. Example: track_line_points = 30",
                self.track_line_points
            ));
        }

        if self.track_base_altitude.is_nan() || self.track_base_altitude < 0.0 {
            errors.push(format!(
                "track_base_altitude must be >= 0.0, got {}. Example: track_base_altitude = 500.0",
                self.track_base_altitude
            ));
        }

        if self.track_altitude_per_percent.is_nan() || self.track_altitude_per_percent < 0.0 {
            errors.push(format!(
                "track_altitude_per_percent must be >= 0.0, got {}. Example: track_altitude_per_percent = 10.0",
                self.track_altitude_per_percent
            ));
        }

        if !(0.0..=1.0).contains(&self.track_opacity) {
            errors.push(format!(
                "track_opacity must be 0.0-1.0, got {}. Example: track_opacity = 0.3",
                self.track_opacity
            ));
        }

        if !self.percent_floor.is_finite()
            || !self.percent_ceiling.is_finite()
            || self.percent_floor >= self.percent_ceiling
        {
            errors.push(format!(
                "percent_floor must be finite and < percent_ceiling, got {} and {}. Example: percent_floor = 0.0",
                self.percent_floor, self.percent_ceiling
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join("\n"))
        }
    }
}
