//! Scene configuration
//!
//! Every field has a default matching the stock demo, so a TOML file only
//! needs to list what it changes:
//!
//! ```toml
//! [sphere]
//! spawn = [0.0, 8.0, 0.0]
//! restitution = 0.5
//!
//! [reset]
//! interval = 200
//! ```

use std::f32::consts::PI;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use glam::Vec3;
use serde::Deserialize;

use crate::sync::DEFAULT_RESET_INTERVAL;

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    pub physics: PhysicsConfig,
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub sphere: SphereConfig,
    pub ground: GroundConfig,
    pub reset: ResetConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PhysicsConfig {
    pub gravity: [f32; 3],
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -9.81, 0.0],
        }
    }
}

/// Arc-rotate camera orbit parameters, angles in radians
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    pub alpha: f32,
    pub beta: f32,
    pub radius: f32,
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            alpha: -PI / 2.0,
            beta: PI / 2.5,
            radius: 15.0,
            target: [0.0, 0.0, 0.0],
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LightConfig {
    pub direction: [f32; 3],
    pub intensity: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: [0.0, -8.0, 2.0],
            intensity: 0.7,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SphereConfig {
    pub diameter: f32,
    pub segments: u32,
    /// Spawn and reset translation of the dynamic body
    pub spawn: [f32; 3],
    /// Added to the mesh radius so the wireframe draws outside the surface
    pub collider_margin: f32,
    pub density: f32,
    pub restitution: f32,
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            diameter: 2.0,
            segments: 32,
            spawn: [2.5, 5.0, 0.0],
            collider_margin: 0.01,
            density: 1.5,
            restitution: 1.5,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GroundConfig {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    /// Roll around the z axis, radians
    pub tilt: f32,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            width: 6.0,
            height: 0.1,
            depth: 6.0,
            tilt: 0.1,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ResetConfig {
    /// Frames between two resets of the dynamic body
    pub interval: u32,
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_RESET_INTERVAL,
        }
    }
}

impl SceneConfig {
    /// Read and validate a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, is not valid TOML for this schema,
    /// or describes degenerate geometry.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_toml_str(&text)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        tracing::info!("Loaded scene configuration from {}", path.display());
        Ok(config)
    }

    /// # Errors
    ///
    /// Fails on malformed TOML, unknown keys, or degenerate geometry.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Fails if a mesh dimension or the reset interval is not strictly
    /// positive.
    pub fn validate(&self) -> Result<()> {
        let SphereConfig {
            diameter, segments, ..
        } = self.sphere;
        ensure!(diameter > 0.0, "sphere diameter must be positive, got {diameter}");
        ensure!(segments >= 3, "sphere needs at least 3 segments, got {segments}");
        let GroundConfig {
            width,
            height,
            depth,
            ..
        } = self.ground;
        ensure!(
            width > 0.0 && height > 0.0 && depth > 0.0,
            "ground dimensions must be positive, got {width} x {height} x {depth}"
        );
        ensure!(self.camera.radius > 0.0, "camera radius must be positive");
        ensure!(self.reset.interval > 0, "reset interval must be at least one frame");
        Ok(())
    }

    pub fn gravity(&self) -> Vec3 {
        Vec3::from(self.physics.gravity)
    }

    pub fn spawn(&self) -> Vec3 {
        Vec3::from(self.sphere.spawn)
    }
}
