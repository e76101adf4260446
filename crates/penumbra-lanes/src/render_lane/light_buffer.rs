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

//! The fixed-capacity light arrays shared by the lighting and shadow lanes.

use penumbra_core::math::{Mat4, Vec4};

/// Per-slot light data uploaded to the shading stage every camera.
///
/// All arrays have exactly `capacity` entries and are allocated once. The
/// render agent owns the buffer and lends it by `&mut` to whichever lane is
/// running; contents are overwritten per camera, never reallocated.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameLightBuffer {
    pub(crate) colors: Vec<Vec4>,
    pub(crate) directions_or_positions: Vec<Vec4>,
    pub(crate) attenuations: Vec<Vec4>,
    pub(crate) spot_directions: Vec<Vec4>,
    /// x = shadow strength (0 if the slot has no shadow), y = 1 for soft shadows.
    pub(crate) shadow_data: Vec<Vec4>,
    pub(crate) world_to_shadow: Vec<Mat4>,
    pub(crate) active_count: usize,
    pub(crate) shadow_tile_count: usize,
}

impl FrameLightBuffer {
    /// Allocates a zeroed buffer of `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            colors: vec![Vec4::ZERO; capacity],
            directions_or_positions: vec![Vec4::ZERO; capacity],
            attenuations: vec![Vec4::ZERO; capacity],
            spot_directions: vec![Vec4::ZERO; capacity],
            shadow_data: vec![Vec4::ZERO; capacity],
            world_to_shadow: vec![Mat4::IDENTITY; capacity],
            active_count: 0,
            shadow_tile_count: 0,
        }
    }

    /// Number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.colors.len()
    }

    /// Slots filled by the last pack.
    #[inline]
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Shadow-eligible lights found by the last pack.
    #[inline]
    pub fn shadow_tile_count(&self) -> usize {
        self.shadow_tile_count
    }

    /// `_VisibleLightColors`.
    pub fn colors(&self) -> &[Vec4] {
        &self.colors
    }

    /// `_VisibleLightDirectionsOrPositions`.
    pub fn directions_or_positions(&self) -> &[Vec4] {
        &self.directions_or_positions
    }

    /// `_VisibleLightAttenuations`.
    pub fn attenuations(&self) -> &[Vec4] {
        &self.attenuations
    }

    /// `_VisibleLightSpotDirections`.
    pub fn spot_directions(&self) -> &[Vec4] {
        &self.spot_directions
    }

    /// `_ShadowData`.
    pub fn shadow_data(&self) -> &[Vec4] {
        &self.shadow_data
    }

    /// `_WorldToShadowMatrices`.
    pub fn world_to_shadow(&self) -> &[Mat4] {
        &self.world_to_shadow
    }

    /// Turns every slot's shadow off, used when the shadow pass cannot run.
    pub fn clear_shadows(&mut self) {
        self.shadow_data.fill(Vec4::ZERO);
        self.shadow_tile_count = 0;
    }

    /// Raw bytes of the color array, as uploaded.
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }
}
