// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Lane Abstraction
//!
//! A **Lane** is one self-contained stage of the per-camera frame: packing
//! lights, building the shadow atlas, issuing the forward draw passes.
//! The render agent owns its lanes and drives them in a fixed order.
//!
//! The trait hierarchy has two levels:
//!
//! 1. **`Lane`** (this trait): identity and classification, shared by every lane.
//! 2. **Stage-specific methods** live on the concrete lane types, which take
//!    exactly the borrows they need (`&mut FrameLightBuffer`,
//!    `&mut dyn CommandEncoder`, ...). There is no type-erased context:
//!    the agent hands each lane its inputs explicitly.

use std::fmt;

/// Classification of lane types, used for logging and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneKind {
    /// Packs visible lights into the frame light buffer.
    Lighting,
    /// Shadow map generation.
    Shadow,
    /// Main scene rendering.
    Render,
    /// Debug visualization, compiled out of release builds.
    Diagnostic,
}

impl fmt::Display for LaneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaneKind::Lighting => write!(f, "Lighting"),
            LaneKind::Shadow => write!(f, "Shadow"),
            LaneKind::Render => write!(f, "Render"),
            LaneKind::Diagnostic => write!(f, "Diagnostic"),
        }
    }
}

/// The base trait for every frame stage.
pub trait Lane: Send + Sync {
    /// Human-readable name of the strategy this lane implements.
    fn strategy_name(&self) -> &'static str;

    /// What kind of stage this is.
    fn lane_kind(&self) -> LaneKind;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NamedLane;

    impl Lane for NamedLane {
        fn strategy_name(&self) -> &'static str {
            "Named"
        }

        fn lane_kind(&self) -> LaneKind {
            LaneKind::Shadow
        }
    }

    #[test]
    fn test_lane_identity() {
        let lane: Box<dyn Lane> = Box::new(NamedLane);
        assert_eq!(lane.strategy_name(), "Named");
        assert_eq!(lane.lane_kind().to_string(), "Shadow");
    }
}
