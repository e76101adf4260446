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

use crate::math::Aabb;
use crate::renderer::camera::Camera;
use crate::renderer::culling::{CullResults, CullingParameters, ShadowMatrices};
use crate::renderer::error::ShadowMatrixError;

/// The contract the renderer relies on to know what is visible.
///
/// Light indices used by the shadow queries are positions in the
/// `visible_lights` list of the most recent [`cull`](Self::cull) result.
pub trait VisibilityResolver {
    /// Derives culling parameters for `camera`, or `None` if the camera
    /// cannot produce an image (degenerate view, empty viewport, ...).
    fn culling_parameters(&self, camera: &Camera) -> Option<CullingParameters>;

    /// Culls the scene. Subsequent light queries refer to this result.
    fn cull(&mut self, parameters: &CullingParameters) -> CullResults;

    /// Bounds of everything light `light_index` can shadow, or `None` if it
    /// has no shadow casters.
    fn shadow_caster_bounds(&self, light_index: usize) -> Option<Aabb>;

    /// View/projection for a spot light's shadow.
    fn compute_spot_shadow_matrices(
        &self,
        light_index: usize,
    ) -> Result<ShadowMatrices, ShadowMatrixError>;

    /// View/projection for a directional light's shadow, fitted to its casters.
    fn compute_directional_shadow_matrices(
        &self,
        light_index: usize,
    ) -> Result<ShadowMatrices, ShadowMatrixError>;

    /// The per-object light index map: one entry per visible light.
    fn light_index_map(&self) -> Vec<i32>;

    /// Replaces the per-object light index map.
    fn set_light_index_map(&mut self, map: Vec<i32>);

    /// Emits editor-only world geometry (gizmos, grid) for a scene-view camera.
    fn emit_scene_view_geometry(&mut self, _camera: &Camera) {}
}
