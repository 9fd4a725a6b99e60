//! Layer masks for collision filtering.
//!
//! Every piece of world geometry carries a layer set. Queries pass a mask and
//! only see geometry whose layers intersect it, so the ground probe can ignore
//! grapple-only anchors and the aim ray can ignore invisible player clips.

use serde::{Deserialize, Serialize};

/// Bit set of collision layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// No layers.
    pub const NONE: Self = Self(0);

    /// Walkable world geometry - floors, ramps, walls.
    pub const GROUND: Self = Self(1 << 0);

    /// Surfaces the grapple hook may latch onto.
    pub const GRAPPLE: Self = Self(1 << 1);

    /// Invisible blockers that stop the character but not the aim ray.
    pub const PLAYER_CLIP: Self = Self(1 << 2);

    /// Everything.
    pub const ALL: Self = Self(u32::MAX);

    /// Geometry the capsule collides with when moving.
    pub const MASK_CHARACTER_SOLID: Self =
        Self(Self::GROUND.0 | Self::GRAPPLE.0 | Self::PLAYER_CLIP.0);

    /// Geometry the ground probe treats as standable.
    pub const MASK_GROUND: Self = Self(Self::GROUND.0 | Self::GRAPPLE.0);

    /// Geometry the grapple aim ray can hit.
    pub const MASK_GRAPPLE_AIM: Self = Self(Self::GROUND.0 | Self::GRAPPLE.0);

    /// Check if these layers contain every layer in `other`.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if any of the given layers are set.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }
}

impl std::ops::BitOr for LayerMask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_operations() {
        let combined = LayerMask::GROUND | LayerMask::PLAYER_CLIP;

        assert!(combined.contains(LayerMask::GROUND));
        assert!(combined.contains(LayerMask::PLAYER_CLIP));
        assert!(!combined.contains(LayerMask::GRAPPLE));
        assert!(combined.intersects(LayerMask::GROUND));
    }

    #[test]
    fn test_standard_masks() {
        assert!(LayerMask::MASK_CHARACTER_SOLID.contains(LayerMask::PLAYER_CLIP));
        assert!(!LayerMask::MASK_GROUND.intersects(LayerMask::PLAYER_CLIP));
        assert!(!LayerMask::MASK_GRAPPLE_AIM.intersects(LayerMask::PLAYER_CLIP));
        assert!(LayerMask::MASK_GRAPPLE_AIM.contains(LayerMask::GRAPPLE));
    }
}
