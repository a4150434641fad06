//! Backdrop configuration.
//!
//! Every section is defaulted, so a config file only needs the values it
//! changes:
//!
//! ```json
//! {
//!     "seed": 7,
//!     "clusters": { "count": 5 },
//!     "style": { "primary": "#22d3ee" }
//! }
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// An sRGB color, serialized as `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub Vec3);

impl Color {
    /// Build a color from 8-bit channels.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self(Vec3::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0))
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn parse_hex(s: &str) -> Result<Self, ConfigError> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ConfigError::Invalid(format!("expected #rrggbb color, got {s:?}")));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| ConfigError::Invalid(format!("expected #rrggbb color, got {s:?}")))
        };
        Ok(Self::rgb8(channel(0)?, channel(2)?, channel(4)?))
    }

    /// This color with the given alpha.
    pub fn with_alpha(self, alpha: f32) -> Vec4 {
        self.0.extend(alpha)
    }

    /// Linear blend towards `other`.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        Color(self.0.lerp(other.0, t))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = (self.0.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
        write!(f, "#{:02x}{:02x}{:02x}", c.x as u8, c.y as u8, c.z as u8)
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Cluster field settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Number of clusters.
    pub count: usize,
    /// Maximum absolute velocity component, in pixels per frame.
    pub speed: f32,
    /// Smallest cluster radius in pixels.
    pub radius_min: f32,
    /// Largest cluster radius in pixels.
    pub radius_max: f32,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            count: 7,
            speed: 0.3,
            radius_min: 80.0,
            radius_max: 160.0,
        }
    }
}

/// Per-particle settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Particles owned by each cluster.
    pub per_cluster: usize,
    /// Maximum absolute velocity component of the local drift.
    pub speed: f32,
    /// Core radius in pixels.
    pub radius: f32,
    pub opacity_min: f32,
    pub opacity_max: f32,
    /// Phase advance per frame, in radians.
    pub pulse_rate: f32,
    /// Amplitude of the sinusoidal opacity term.
    pub pulse_amplitude: f32,
    /// Factor applied to an offset that strays past the cluster radius.
    pub containment_decay: f32,
    /// Glow radius as a multiple of the core radius.
    pub glow_scale: f32,
    /// Glow alpha as a fraction of the core opacity.
    pub glow_strength: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            per_cluster: 22,
            speed: 0.15,
            radius: 1.5,
            opacity_min: 0.3,
            opacity_max: 0.8,
            pulse_rate: 0.02,
            pulse_amplitude: 0.2,
            containment_decay: 0.98,
            glow_scale: 4.0,
            glow_strength: 0.35,
        }
    }
}

/// Proximity edge settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Distance at which an edge fades out completely.
    pub threshold: f32,
    /// Opacity of an edge between coincident particles.
    pub max_opacity: f32,
    /// Stroke width in pixels.
    pub line_width: f32,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            threshold: 140.0,
            max_opacity: 0.25,
            line_width: 0.6,
        }
    }
}

/// Edge-darkening pass drawn over everything else.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VignetteConfig {
    /// Fraction of the center-to-corner distance left untouched.
    pub inner: f32,
    /// Fraction at which the vignette reaches full strength.
    pub outer: f32,
    /// Alpha of the background color at full strength.
    pub strength: f32,
}

impl Default for VignetteConfig {
    fn default() -> Self {
        Self {
            inner: 0.25,
            outer: 1.0,
            strength: 0.7,
        }
    }
}

/// Colors and cosmetic passes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub background: Color,
    /// Tint of the first cluster and start color of every edge.
    pub primary: Color,
    /// Tint of the last cluster and end color of every edge.
    pub secondary: Color,
    pub vignette: Option<VignetteConfig>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background: Color::rgb8(0x05, 0x07, 0x12),
            primary: Color::rgb8(0x06, 0xb6, 0xd4),
            secondary: Color::rgb8(0x8b, 0x5c, 0xf6),
            vignette: Some(VignetteConfig::default()),
        }
    }
}

impl StyleConfig {
    /// Tint for cluster `index` out of `count`, spread from primary to secondary.
    pub fn cluster_color(&self, index: usize, count: usize) -> Color {
        if count <= 1 {
            return self.primary;
        }
        self.primary.lerp(self.secondary, index as f32 / (count - 1) as f32)
    }
}

/// Window settings for the windowed host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Neural Backdrop".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Complete backdrop configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackdropConfig {
    /// RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
    pub clusters: ClusterConfig,
    pub particles: ParticleConfig,
    pub connections: ConnectionConfig,
    pub style: StyleConfig,
    pub window: WindowConfig,
}

impl BackdropConfig {
    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse and validate a JSON config string.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would break the simulation's invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.clusters;
        check(c.speed >= 0.0, "clusters.speed must be >= 0")?;
        check(c.radius_min > 0.0, "clusters.radius_min must be > 0")?;
        check(
            c.radius_min <= c.radius_max,
            "clusters.radius_min must not exceed clusters.radius_max",
        )?;

        let p = &self.particles;
        check(p.speed >= 0.0, "particles.speed must be >= 0")?;
        check(p.radius > 0.0, "particles.radius must be > 0")?;
        check(
            (0.0..=1.0).contains(&p.opacity_min) && (0.0..=1.0).contains(&p.opacity_max),
            "particles.opacity_min and opacity_max must lie in [0, 1]",
        )?;
        check(
            p.opacity_min <= p.opacity_max,
            "particles.opacity_min must not exceed particles.opacity_max",
        )?;
        check(
            p.containment_decay > 0.0 && p.containment_decay < 1.0,
            "particles.containment_decay must lie in (0, 1)",
        )?;
        check(p.pulse_amplitude >= 0.0, "particles.pulse_amplitude must be >= 0")?;
        check(p.glow_scale >= 1.0, "particles.glow_scale must be >= 1")?;

        let e = &self.connections;
        check(e.threshold > 0.0, "connections.threshold must be > 0")?;
        check(
            e.max_opacity > 0.0 && e.max_opacity <= 1.0,
            "connections.max_opacity must lie in (0, 1]",
        )?;
        check(e.line_width > 0.0, "connections.line_width must be > 0")?;

        if let Some(v) = &self.style.vignette {
            check(
                v.inner >= 0.0 && v.inner < v.outer,
                "style.vignette.inner must be >= 0 and below outer",
            )?;
        }

        let w = &self.window;
        check(
            w.width > 0 && w.height > 0,
            "window.width and window.height must be > 0",
        )?;
        Ok(())
    }
}

fn check(ok: bool, message: &str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid(message.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = BackdropConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.clusters.count, 7);
        assert_eq!(config.particles.per_cluster, 22);
        assert_eq!(config.connections.threshold, 140.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = BackdropConfig::from_json(
            r##"{ "seed": 9, "clusters": { "count": 3 }, "style": { "primary": "#ff0000" } }"##,
        )
        .unwrap();

        assert_eq!(config.seed, Some(9));
        assert_eq!(config.clusters.count, 3);
        assert_eq!(config.clusters.radius_max, 160.0);
        assert_eq!(config.style.primary, Color::rgb8(255, 0, 0));
        assert_eq!(config.style.secondary, StyleConfig::default().secondary);
    }

    #[test]
    fn test_json_round_trip_preserves_colors() {
        let config = BackdropConfig::default();
        let json = config.to_json().unwrap();
        assert!(json.contains("\"#06b6d4\""));
        assert_eq!(BackdropConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_decay_outside_unit_interval() {
        let mut config = BackdropConfig::default();
        config.particles.containment_decay = 1.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.particles.containment_decay = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_radius_range() {
        let mut config = BackdropConfig::default();
        config.clusters.radius_min = 200.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_color_is_a_parse_error() {
        let err = BackdropConfig::from_json(r#"{ "style": { "background": "teal" } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_hex_color_requires_hex_digits() {
        assert_eq!(Color::parse_hex("#0a0B0c").unwrap(), Color::rgb8(0x0a, 0x0b, 0x0c));
        assert!(Color::parse_hex("#+1+2+3").is_err());
        assert!(Color::parse_hex("#-1ffff").is_err());
        assert!(Color::parse_hex("#12345g").is_err());
        assert!(Color::parse_hex("#12345").is_err());
    }

    #[test]
    fn test_rejects_zero_window_size() {
        let mut config = BackdropConfig::default();
        config.window.height = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_cluster_colors_span_palette() {
        let style = StyleConfig::default();
        assert_eq!(style.cluster_color(0, 7), style.primary);
        assert!(style.cluster_color(6, 7).0.abs_diff_eq(style.secondary.0, 1e-6));
        assert_eq!(style.cluster_color(0, 1), style.primary);
    }
}
