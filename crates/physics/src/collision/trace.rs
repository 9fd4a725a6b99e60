//! Sweep shapes and sweep outcomes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::layers::LayerMask;

/// What a swept shape ran into.
///
/// `fraction` is the share of the requested motion that was covered: 1.0
/// means the path was clear, 0.0 means the shape could not move at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceResult {
    pub fraction: f32,

    /// Where the shape stopped, backed off from any contact.
    pub end_position: Vec3,

    /// Contact normal. `None` for a clear path.
    pub hit_normal: Option<Vec3>,

    /// Layers of whatever stopped the sweep.
    pub hit_layers: LayerMask,

    /// Overlapping geometry before moving.
    pub started_in_solid: bool,

    /// Stuck: overlapping at the start and unable to move out.
    pub all_solid: bool,
}

impl TraceResult {
    /// A sweep that reached `end_position` untouched.
    pub fn no_hit(end_position: Vec3) -> Self {
        Self {
            fraction: 1.0,
            end_position,
            hit_normal: None,
            hit_layers: LayerMask::NONE,
            started_in_solid: false,
            all_solid: false,
        }
    }

    #[inline]
    pub fn hit_something(&self) -> bool {
        self.fraction < 1.0
    }

    /// Contact normal, or straight up for a clear path.
    #[inline]
    pub fn normal_or_up(&self) -> Vec3 {
        self.hit_normal.unwrap_or(Vec3::Y)
    }
}

/// Shape swept by a trace.
///
/// Capsules hang from the feet, which is where the character body keeps its
/// position. Spheres and points sit on the trace origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TraceShape {
    /// Upright capsule. `height` runs feet to crown.
    Capsule { radius: f32, height: f32 },
    Sphere { radius: f32 },
    /// Zero-size probe, used for rays.
    Point,
}

impl TraceShape {
    /// From the trace origin to the middle of the shape.
    pub fn center_offset(&self) -> Vec3 {
        match *self {
            Self::Capsule { height, .. } => Vec3::Y * (height * 0.5),
            Self::Sphere { .. } | Self::Point => Vec3::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_path() {
        let result = TraceResult::no_hit(Vec3::new(10.0, 0.0, 0.0));
        assert!(!result.hit_something());
        assert_eq!(result.normal_or_up(), Vec3::Y);
        assert_eq!(result.hit_layers, LayerMask::NONE);
    }

    #[test]
    fn test_blocked_path_keeps_normal() {
        let result = TraceResult {
            fraction: 0.5,
            hit_normal: Some(-Vec3::X),
            ..TraceResult::no_hit(Vec3::new(5.0, 0.0, 0.0))
        };
        assert!(result.hit_something());
        assert_eq!(result.normal_or_up(), -Vec3::X);
    }

    #[test]
    fn test_capsule_hangs_from_feet() {
        let capsule = TraceShape::Capsule { radius: 0.5, height: 2.0 };
        assert_eq!(capsule.center_offset(), Vec3::Y);
        assert_eq!(TraceShape::Sphere { radius: 0.5 }.center_offset(), Vec3::ZERO);
        assert_eq!(TraceShape::Point.center_offset(), Vec3::ZERO);
    }
}
