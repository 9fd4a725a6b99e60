//! Tick phases in execution order.

use serde::{Deserialize, Serialize};

/// One phase of a controller tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TickPhase {
    /// Ground check and locomotion state selection.
    Classify,
    /// Vertical and lateral integration, or grapple pull / swing step.
    Integrate,
    /// Collision-resolving capsule move, then grapple bookkeeping.
    Move,
    /// Camera look, body rotation and rope, from the settled position.
    Reconcile,
}

impl TickPhase {
    /// The fixed order every tick runs in.
    pub const ORDER: [Self; 4] = [Self::Classify, Self::Integrate, Self::Move, Self::Reconcile];
}
