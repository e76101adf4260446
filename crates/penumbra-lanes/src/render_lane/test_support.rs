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

//! A hand-driven visibility resolver for lane unit tests.

use penumbra_core::{
    math::{Aabb, Mat4, Vec3, Vec4},
    renderer::{
        Camera, CullResults, CullingParameters, ShadowMatrices, ShadowMatrixError,
        ShadowSplitData, VisibilityResolver,
    },
};
use std::collections::HashMap;

pub(crate) struct StubResolver {
    light_index_map: Vec<i32>,
    caster_bounds: HashMap<usize, Aabb>,
    matrices: HashMap<usize, ShadowMatrices>,
    pub(crate) map_writes: usize,
}

impl StubResolver {
    pub(crate) fn new(light_count: usize) -> Self {
        Self {
            light_index_map: (0..light_count as i32).collect(),
            caster_bounds: HashMap::new(),
            matrices: HashMap::new(),
            map_writes: 0,
        }
    }

    /// Gives light `index` a unit cube of casters and a default shadow camera.
    pub(crate) fn casters_for(&mut self, index: usize) {
        self.caster_bounds.insert(
            index,
            Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ONE),
        );
        self.matrices.entry(index).or_insert_with(default_matrices);
    }

    pub(crate) fn with_matrices(&mut self, index: usize, matrices: ShadowMatrices) {
        self.casters_for(index);
        self.matrices.insert(index, matrices);
    }

    /// Keeps the casters of light `index` but makes its matrix query fail.
    pub(crate) fn fail_matrices_for(&mut self, index: usize) {
        self.casters_for(index);
        self.matrices.remove(&index);
    }

    fn matrices_for(&self, index: usize) -> Result<ShadowMatrices, ShadowMatrixError> {
        self.matrices
            .get(&index)
            .copied()
            .ok_or(ShadowMatrixError::DegenerateFrustum { light_index: index })
    }
}

/// A camera at (0, 0, 5) looking at the origin through a 90 degree frustum.
pub(crate) fn default_matrices() -> ShadowMatrices {
    ShadowMatrices {
        view: Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y)
            .unwrap_or(Mat4::IDENTITY),
        projection: Mat4::perspective_rh_no(90f32.to_radians(), 1.0, 0.1, 20.0),
        split_data: ShadowSplitData {
            culling_sphere: Vec4::new(0.0, 0.0, 0.0, 2.0),
        },
    }
}

impl VisibilityResolver for StubResolver {
    fn culling_parameters(&self, camera: &Camera) -> Option<CullingParameters> {
        Some(CullingParameters {
            view_projection: camera.view_projection(),
            camera_position: camera.position,
            shadow_distance: camera.far_clip,
        })
    }

    fn cull(&mut self, _parameters: &CullingParameters) -> CullResults {
        CullResults::default()
    }

    fn shadow_caster_bounds(&self, light_index: usize) -> Option<Aabb> {
        self.caster_bounds.get(&light_index).copied()
    }

    fn compute_spot_shadow_matrices(
        &self,
        light_index: usize,
    ) -> Result<ShadowMatrices, ShadowMatrixError> {
        self.matrices_for(light_index)
    }

    fn compute_directional_shadow_matrices(
        &self,
        light_index: usize,
    ) -> Result<ShadowMatrices, ShadowMatrixError> {
        self.matrices_for(light_index)
    }

    fn light_index_map(&self) -> Vec<i32> {
        self.light_index_map.clone()
    }

    fn set_light_index_map(&mut self, map: Vec<i32>) {
        self.map_writes += 1;
        self.light_index_map = map;
    }
}
