//! Level geometry and spawn points.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use tether_physics::{CollisionWorld, LayerMask};

/// A playable space: collision geometry plus where characters start.
#[derive(Debug)]
pub struct Level {
    /// Level identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Collision world queried by the controller.
    pub collision: CollisionWorld,

    /// Player spawn points.
    pub spawn_points: Vec<SpawnPoint>,
}

/// Where a character starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnPoint {
    /// Feet position in world space.
    pub position: Vec3,

    /// Initial facing yaw in degrees.
    #[serde(default)]
    pub facing: f32,
}

impl SpawnPoint {
    /// Body rotation for this spawn.
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.facing.to_radians())
    }
}

/// A box in a level description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrushDesc {
    pub center: Vec3,
    pub half_extents: Vec3,
    /// Rotation about Z in degrees. Positive raises the -X end.
    #[serde(default)]
    pub tilt: f32,
    #[serde(default = "default_brush_layers")]
    pub layers: LayerMask,
}

fn default_brush_layers() -> LayerMask {
    LayerMask::GROUND
}

/// Serializable level layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDesc {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub brushes: Vec<BrushDesc>,
    #[serde(default)]
    pub spawn_points: Vec<SpawnPoint>,
}

impl Level {
    /// Create an empty level.
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            collision: CollisionWorld::new(),
            spawn_points: Vec::new(),
        }
    }

    /// Build a level from its description.
    pub fn from_desc(desc: &LevelDesc) -> Self {
        let mut level = Self::new(&desc.id, &desc.name);
        for brush in &desc.brushes {
            if brush.tilt == 0.0 {
                level.collision.add_box(brush.center, brush.half_extents, brush.layers);
            } else {
                level
                    .collision
                    .add_tilted_box(brush.center, brush.half_extents, brush.tilt, brush.layers);
            }
        }
        level.spawn_points = desc.spawn_points.clone();
        level
    }

    /// Development arena with something to exercise every locomotion state.
    ///
    /// ```text
    ///   north wall
    ///   ┌───────────────────────────────┐
    ///   │   tower (grapple)             │
    ///   │      ■            steep ramp  │
    ///   │                     ╱         │
    ///   │   spawn ●    ledge ▭          │
    ///   │                 gentle ramp ╲ │
    ///   └───────────────────────────────┘
    /// ```
    pub fn test_arena() -> Self {
        let mut level = Self::new("test_arena", "Test Arena");

        // Floor
        level.collision.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(60.0, 0.5, 60.0),
            LayerMask::GROUND,
        );

        // Walls
        let wall_height = 8.0;
        let wall_thickness = 0.5;
        let arena_size = 60.0;

        for (center, half_extents) in [
            (Vec3::new(0.0, 0.0, -arena_size), Vec3::new(arena_size, 0.0, wall_thickness)),
            (Vec3::new(0.0, 0.0, arena_size), Vec3::new(arena_size, 0.0, wall_thickness)),
            (Vec3::new(arena_size, 0.0, 0.0), Vec3::new(wall_thickness, 0.0, arena_size)),
            (Vec3::new(-arena_size, 0.0, 0.0), Vec3::new(wall_thickness, 0.0, arena_size)),
        ] {
            level.collision.add_box(
                center + Vec3::Y * wall_height / 2.0,
                half_extents + Vec3::Y * wall_height / 2.0,
                LayerMask::GROUND,
            );
        }

        // Grapple tower, 30m ahead of spawn
        level.collision.add_box(
            Vec3::new(0.0, 10.0, 30.0),
            Vec3::new(2.0, 10.0, 2.0),
            LayerMask::GRAPPLE,
        );

        // Overhead beam to swing from
        level.collision.add_box(
            Vec3::new(-20.0, 15.0, 0.0),
            Vec3::new(10.0, 0.5, 0.5),
            LayerMask::GRAPPLE,
        );

        // Step-up ledge, lower than the capsule step offset
        level.collision.add_box(
            Vec3::new(10.0, 0.1, 0.0),
            Vec3::new(2.0, 0.1, 2.0),
            LayerMask::GROUND,
        );

        // Walkable ramp (20 degrees)
        level.collision.add_tilted_box(
            Vec3::new(25.0, 0.0, -15.0),
            Vec3::new(6.0, 0.5, 3.0),
            20.0,
            LayerMask::GROUND,
        );

        // Steep ramp (60 degrees), slides the character off
        level.collision.add_tilted_box(
            Vec3::new(25.0, 0.0, 15.0),
            Vec3::new(6.0, 0.5, 3.0),
            60.0,
            LayerMask::GROUND,
        );

        // Invisible fence in front of the steep ramp
        level.collision.add_box(
            Vec3::new(17.0, 1.0, 15.0),
            Vec3::new(0.25, 1.0, 3.0),
            LayerMask::PLAYER_CLIP,
        );

        level.spawn_points.push(SpawnPoint {
            position: Vec3::ZERO,
            facing: 0.0,
        });
        level.spawn_points.push(SpawnPoint {
            position: Vec3::new(-20.0, 0.0, -10.0),
            facing: 90.0,
        });

        level
    }

    /// Get a player spawn point.
    pub fn get_player_spawn(&self, index: usize) -> Option<&SpawnPoint> {
        self.spawn_points.get(index)
    }

    /// Get the number of player spawn points.
    pub fn player_spawn_count(&self) -> usize {
        self.spawn_points.len()
    }
}
