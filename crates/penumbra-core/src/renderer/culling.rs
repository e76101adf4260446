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

//! Data exchanged with the visibility resolver.

use super::draw::VisibleRenderer;
use super::light::VisibleLight;
use crate::math::{Mat4, Vec3, Vec4};

/// Marks a light index map entry the per-object shading stage must skip.
pub const INVALID_LIGHT_INDEX: i32 = -1;

/// Everything the resolver needs to cull the scene for one camera.
#[derive(Debug, Clone, PartialEq)]
pub struct CullingParameters {
    /// Combined world-to-clip matrix of the camera.
    pub view_projection: Mat4,
    /// World-space position of the camera.
    pub camera_position: Vec3,
    /// Farthest distance at which shadows are rendered.
    pub shadow_distance: f32,
}

/// The outcome of culling: what is visible to the camera.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CullResults {
    /// Renderers inside the camera frustum.
    pub visible_renderers: Vec<VisibleRenderer>,
    /// Lights affecting the camera frustum, in slot order.
    pub visible_lights: Vec<VisibleLight>,
}

/// Culling data for one shadow split, consumed by the shadow draw.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShadowSplitData {
    /// Bounding sphere of the split: xyz = center, w = radius.
    pub culling_sphere: Vec4,
}

/// A light's shadow camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowMatrices {
    /// World-to-light-view matrix.
    pub view: Mat4,
    /// Light-view-to-clip matrix, in `[-1, 1]` depth convention.
    pub projection: Mat4,
    /// Culling data restricting the draw to this light's casters.
    pub split_data: ShadowSplitData,
}

/// Draws the shadow casters of one light with the current view/projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowDrawSettings {
    /// Slot index of the light.
    pub light_index: usize,
    /// Culling data from the resolver.
    pub split_data: ShadowSplitData,
}
