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


//! Rendering lanes - the hot path of a camera's frame.
//!
//! Each lane owns one stage of the forward pipeline and receives exactly the
//! borrows it needs from the render agent:
//!
//! - [`LightPackingLane`] fills the [`FrameLightBuffer`] from the culled lights.
//! - [`ShadowAtlasLane`] renders shadow casters into a tiled [`ShadowAtlas`].
//! - [`ForwardLane`] binds the light arrays and draws the scene passes.
//! - [`DiagnosticLane`] draws unsupported shaders with an error material
//!   (development builds only).

#[cfg(any(debug_assertions, feature = "diagnostics"))]
mod diagnostic_lane;
mod forward_lane;
mod light_buffer;
mod light_packing_lane;
mod shadow_atlas_lane;

#[cfg(test)]
mod test_support;

#[cfg(any(debug_assertions, feature = "diagnostics"))]
pub use diagnostic_lane::*;
pub use forward_lane::*;
pub use light_buffer::*;
pub use light_packing_lane::*;
pub use shadow_atlas_lane::*;
