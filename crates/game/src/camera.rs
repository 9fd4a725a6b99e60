//! Third-person camera rig.
//!
//! The controller owns camera orientation (it applies look input during
//! reconcile). The rig only handles boom length from scroll input.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tether_physics::CameraFrame;

/// Camera rig settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Boom length change per scroll notch.
    pub zoom_speed: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Boom length at spawn.
    pub start_zoom: f32,
    /// Orbit pivot height above the feet.
    pub pivot_height: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            zoom_speed: 0.1,
            min_zoom: 1.0,
            max_zoom: 5.0,
            start_zoom: 3.0,
            pivot_height: 1.6,
        }
    }
}

/// Orbit camera behind the character.
#[derive(Debug, Clone, Default)]
pub struct ThirdPersonRig {
    pub config: CameraConfig,
}

impl ThirdPersonRig {
    pub fn new(config: CameraConfig) -> Self {
        Self { config }
    }

    /// Initial camera frame looking down +Z.
    pub fn frame(&self) -> CameraFrame {
        CameraFrame {
            zoom_distance: self.config.start_zoom.clamp(self.config.min_zoom, self.config.max_zoom),
            pivot_height: self.config.pivot_height,
            ..Default::default()
        }
    }

    /// Boom change for a raw scroll delta. Scrolling up pulls the camera in.
    pub fn zoom_delta(&self, scroll: Vec2) -> Vec2 {
        -scroll.normalize_or_zero() * self.config.zoom_speed
    }

    /// Apply scroll input to the boom length.
    pub fn apply_scroll(&self, camera: &mut CameraFrame, scroll: Vec2) {
        let delta = self.zoom_delta(scroll);
        camera.zoom_distance =
            (camera.zoom_distance + delta.y).clamp(self.config.min_zoom, self.config.max_zoom);
    }
}
