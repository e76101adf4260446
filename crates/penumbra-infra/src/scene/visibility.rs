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

//! A brute-force visibility resolver over an in-memory scene.

use penumbra_core::math::{Aabb, Mat4, Vec3, Vec4, EPSILON};
use penumbra_core::renderer::{
    Camera, CullResults, CullingParameters, LightKind, ShadowMatrices, ShadowMatrixError,
    ShadowSplitData, VisibilityResolver, VisibleLight, VisibleRenderer,
};

/// Near plane of spot light shadow cameras.
pub const SPOT_SHADOW_NEAR_PLANE: f32 = 0.05;

/// Returns `true` if no part of `bounds` can be inside the clip volume of
/// `view_projection`. Conservative: boxes straddling a frustum corner pass.
fn outside_frustum(view_projection: &Mat4, bounds: &Aabb) -> bool {
    let clip: Vec<Vec4> = bounds
        .corners()
        .iter()
        .map(|c| view_projection.transform_point(*c))
        .collect();
    let all = |test: fn(&Vec4) -> bool| clip.iter().all(test);
    all(|p| p.x < -p.w)
        || all(|p| p.x > p.w)
        || all(|p| p.y < -p.w)
        || all(|p| p.y > p.w)
        || all(|p| p.z < -p.w)
        || all(|p| p.z > p.w)
}

/// Squared distance from `point` to the closest point of `bounds`.
fn distance_squared_to(bounds: &Aabb, point: Vec3) -> f32 {
    let closest = point.max(bounds.min).min(bounds.max);
    (closest - point).length_squared()
}

fn is_finite(m: &Mat4) -> bool {
    m.to_cols_array_2d().iter().flatten().all(|v| v.is_finite())
}

/// Resolves visibility for a fixed list of lights and renderers.
#[derive(Debug, Default)]
pub struct SceneVisibility {
    lights: Vec<VisibleLight>,
    renderers: Vec<VisibleRenderer>,
    /// Result of the last cull; light queries index into it.
    culled: CullResults,
    camera_position: Vec3,
    shadow_distance: f32,
    light_index_map: Vec<i32>,
    scene_view_emits: usize,
}

impl SceneVisibility {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a light to the scene.
    pub fn add_light(&mut self, light: VisibleLight) -> &mut Self {
        self.lights.push(light);
        self
    }

    /// Adds a renderer to the scene.
    pub fn add_renderer(&mut self, renderer: VisibleRenderer) -> &mut Self {
        self.renderers.push(renderer);
        self
    }

    /// Lights kept by the last cull.
    pub fn visible_lights(&self) -> &[VisibleLight] {
        &self.culled.visible_lights
    }

    /// How many times scene-view geometry was emitted.
    pub fn scene_view_emit_count(&self) -> usize {
        self.scene_view_emits
    }

    fn visible_light(&self, light_index: usize) -> Result<&VisibleLight, ShadowMatrixError> {
        self.culled
            .visible_lights
            .get(light_index)
            .ok_or(ShadowMatrixError::InvalidLightIndex(light_index))
    }

    fn light_is_visible(light: &VisibleLight, view_projection: &Mat4) -> bool {
        match light.kind {
            LightKind::Directional => true,
            LightKind::Point | LightKind::Spot => {
                let reach = Vec3::ONE * light.range.max(0.0);
                let influence =
                    Aabb::from_center_half_extents(light.position().truncate(), reach);
                !outside_frustum(view_projection, &influence)
            }
        }
    }
}

impl VisibilityResolver for SceneVisibility {
    fn culling_parameters(&self, camera: &Camera) -> Option<CullingParameters> {
        if camera.pixel_rect.is_empty() {
            log::debug!("Camera '{}' has an empty viewport", camera.name);
            return None;
        }
        if !(camera.near_clip > 0.0 && camera.far_clip > camera.near_clip) {
            log::debug!("Camera '{}' has invalid clip planes", camera.name);
            return None;
        }
        let view_projection = camera.view_projection();
        if !is_finite(&view_projection) {
            log::debug!("Camera '{}' has a degenerate projection", camera.name);
            return None;
        }
        Some(CullingParameters {
            view_projection,
            camera_position: camera.position,
            shadow_distance: camera.far_clip,
        })
    }

    fn cull(&mut self, parameters: &CullingParameters) -> CullResults {
        let vp = &parameters.view_projection;
        let visible_renderers: Vec<VisibleRenderer> = self
            .renderers
            .iter()
            .filter(|r| !r.bounds.is_empty() && !outside_frustum(vp, &r.bounds))
            .copied()
            .collect();
        let visible_lights: Vec<VisibleLight> = self
            .lights
            .iter()
            .filter(|l| Self::light_is_visible(l, vp))
            .copied()
            .collect();

        log::trace!(
            "Culled {}/{} renderers, {}/{} lights",
            visible_renderers.len(),
            self.renderers.len(),
            visible_lights.len(),
            self.lights.len()
        );

        self.camera_position = parameters.camera_position;
        self.shadow_distance = parameters.shadow_distance;
        self.light_index_map = (0..visible_lights.len() as i32).collect();
        self.culled = CullResults {
            visible_renderers,
            visible_lights,
        };
        self.culled.clone()
    }

    fn shadow_caster_bounds(&self, light_index: usize) -> Option<Aabb> {
        let light = self.culled.visible_lights.get(light_index)?;
        let max_distance_sq = self.shadow_distance * self.shadow_distance;
        let light_position = light.position().truncate();
        let range_sq = light.range * light.range;

        let bounds = self
            .renderers
            .iter()
            .filter(|r| r.casts_shadows && !r.bounds.is_empty())
            .filter(|r| distance_squared_to(&r.bounds, self.camera_position) <= max_distance_sq)
            .filter(|r| match light.kind {
                LightKind::Directional => true,
                LightKind::Point | LightKind::Spot => {
                    distance_squared_to(&r.bounds, light_position) <= range_sq
                }
            })
            .fold(Aabb::EMPTY, |acc, r| acc.merge(&r.bounds));

        (!bounds.is_empty()).then_some(bounds)
    }

    fn compute_spot_shadow_matrices(
        &self,
        light_index: usize,
    ) -> Result<ShadowMatrices, ShadowMatrixError> {
        let light = self.visible_light(light_index)?;
        if light.kind != LightKind::Spot {
            return Err(ShadowMatrixError::UnsupportedLightKind(light.kind));
        }
        if light.range <= SPOT_SHADOW_NEAR_PLANE
            || light.spot_angle <= 0.0
            || light.spot_angle >= 180.0
        {
            return Err(ShadowMatrixError::DegenerateFrustum { light_index });
        }
        if self.shadow_caster_bounds(light_index).is_none() {
            return Err(ShadowMatrixError::NoShadowCasters { light_index });
        }

        let position = light.position().truncate();
        let forward = light.forward().truncate().normalize();
        let up = if forward.y.abs() > 0.99 { Vec3::Z } else { Vec3::Y };
        let view = Mat4::look_at_rh(position, position + forward, up)
            .ok_or(ShadowMatrixError::DegenerateFrustum { light_index })?;
        let projection = Mat4::perspective_rh_no(
            light.spot_angle.to_radians(),
            1.0,
            SPOT_SHADOW_NEAR_PLANE,
            light.range,
        );

        Ok(ShadowMatrices {
            view,
            projection,
            split_data: ShadowSplitData {
                culling_sphere: Vec4::from_vec3(position, light.range),
            },
        })
    }

    fn compute_directional_shadow_matrices(
        &self,
        light_index: usize,
    ) -> Result<ShadowMatrices, ShadowMatrixError> {
        let light = self.visible_light(light_index)?;
        if light.kind != LightKind::Directional {
            return Err(ShadowMatrixError::UnsupportedLightKind(light.kind));
        }
        let bounds = self
            .shadow_caster_bounds(light_index)
            .ok_or(ShadowMatrixError::NoShadowCasters { light_index })?;

        let forward = light.forward().truncate();
        if forward.length_squared() < EPSILON {
            return Err(ShadowMatrixError::DegenerateFrustum { light_index });
        }
        let forward = forward.normalize();
        let center = bounds.center();
        let radius = bounds.half_extents().length().max(EPSILON);
        let up = if forward.y.abs() > 0.99 { Vec3::Z } else { Vec3::Y };
        // Back off two radii so every caster sits between the near and far planes.
        let eye = center - forward * (2.0 * radius);
        let view = Mat4::look_at_rh(eye, center, up)
            .ok_or(ShadowMatrixError::DegenerateFrustum { light_index })?;
        let projection =
            Mat4::orthographic_rh_no(-radius, radius, -radius, radius, 0.0, 4.0 * radius);

        Ok(ShadowMatrices {
            view,
            projection,
            split_data: ShadowSplitData {
                culling_sphere: Vec4::from_vec3(center, radius),
            },
        })
    }

    fn light_index_map(&self) -> Vec<i32> {
        self.light_index_map.clone()
    }

    fn set_light_index_map(&mut self, map: Vec<i32>) {
        self.light_index_map = map;
    }

    fn emit_scene_view_geometry(&mut self, camera: &Camera) {
        self.scene_view_emits += 1;
        log::trace!("Emitted scene-view geometry for '{}'", camera.name);
    }
}
