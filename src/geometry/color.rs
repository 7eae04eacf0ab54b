//! Latency value to color band mapping for track lines.

use serde::{Serialize, Serializer};

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub const RED: Color = Color(0xFF0000);
    pub const ORANGE: Color = Color(0xFF9B00);
    pub const YELLOW: Color = Color(0xFFFF00);
    pub const GREEN: Color = Color(0x00FF00);
    pub const BLUE: Color = Color(0x0000FF);

    pub fn hex(&self) -> u32 {
        self.0 & 0xFF_FFFF
    }

    pub fn r(&self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    pub fn g(&self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    pub fn b(&self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Components scaled to [0, 1], as most engines take vertex colors.
    pub fn to_rgb_f32(&self) -> [f32; 3] {
        [
            self.r() as f32 / 255.0,
            self.g() as f32 / 255.0,
            self.b() as f32 / 255.0,
        ]
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06x}", self.hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Threshold test for one band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Above(f64),
    AtLeast(f64),
    Any,
}

impl Bound {
    fn matches(&self, value: f64) -> bool {
        match *self {
            Bound::Above(limit) => value > limit,
            Bound::AtLeast(limit) => value >= limit,
            Bound::Any => true,
        }
    }
}

/// One entry of the latency color scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorBand {
    pub bound: Bound,
    pub color: Color,
}

/// Latency bands in milliseconds, highest first. First match wins.
pub const LATENCY_BANDS: [ColorBand; 5] = [
    ColorBand {
        bound: Bound::Above(180.0),
        color: Color::RED,
    },
    ColorBand {
        bound: Bound::Above(90.0),
        color: Color::ORANGE,
    },
    ColorBand {
        bound: Bound::Above(45.0),
        color: Color::YELLOW,
    },
    ColorBand {
        bound: Bound::AtLeast(0.0),
        color: Color::GREEN,
    },
    ColorBand {
        bound: Bound::Any,
        color: Color::BLUE,
    },
];

/// Color for a latency value.
///
/// Total over all inputs; NaN fails every comparison and lands in the last band.
pub fn color_for_value(value: f64) -> Color {
    LATENCY_BANDS
        .iter()
        .find(|band| band.bound.matches(value))
        .map(|band| band.color)
        .unwrap_or(Color::BLUE)
}
