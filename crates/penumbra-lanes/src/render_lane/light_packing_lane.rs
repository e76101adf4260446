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

//! Light packing lane - fills the per-slot light arrays from the visible lights.

use super::FrameLightBuffer;
use penumbra_core::{
    lane::{Lane, LaneKind},
    math::{Vec4, DEG_TO_RAD},
    renderer::{LightKind, LightShadows, VisibilityResolver, VisibleLight, INVALID_LIGHT_INDEX},
};

/// Smallest squared range used for the inverse-square falloff.
const MIN_RANGE_SQUARED: f32 = 1e-3;

/// Smallest cosine gap between inner and outer spot cones.
const MIN_SPOT_ANGLE_RANGE: f32 = 1e-3;

/// Controls the width of a spot light's penumbra.
///
/// The inner cone cosine is `cos(ratio * tan(outer half-angle))`. Past roughly
/// 100 degrees that cosine drops below the outer one and the cosine gap is
/// clamped, which turns wide spots into a hard edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotPenumbra {
    /// Inner-to-outer cone ratio.
    pub ratio: f32,
}

impl SpotPenumbra {
    /// `atan(23 / 32)`, an empirical ratio giving a plausible penumbra width.
    pub const DEFAULT_RATIO: f32 = 0.623_199_34;

    /// Creates a penumbra with the given ratio.
    pub const fn new(ratio: f32) -> Self {
        Self { ratio }
    }

    /// Spot falloff coefficients `(z, w)` for a full cone of `spot_angle` degrees.
    ///
    /// The shader evaluates `saturate(dot(spot_dir, light_dir) * z + w)`.
    pub fn falloff(&self, spot_angle: f32) -> (f32, f32) {
        let outer_rad = DEG_TO_RAD * 0.5 * spot_angle;
        let outer_cos = outer_rad.cos();
        let outer_tan = outer_rad.tan();
        let inner_cos = (self.ratio * outer_tan).cos();
        let angle_range = (inner_cos - outer_cos).max(MIN_SPOT_ANGLE_RANGE);
        let z = 1.0 / angle_range;
        (z, -outer_cos * z)
    }
}

impl Default for SpotPenumbra {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RATIO)
    }
}

/// What a call to [`LightPackingLane::pack`] produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LightPackingReport {
    /// Slots filled: `min(visible lights, capacity)`.
    pub active_count: usize,
    /// Lights eligible for a shadow tile.
    pub shadow_tile_count: usize,
    /// Lights past capacity whose light index was invalidated.
    pub overflow_count: usize,
}

/// Packs visible lights into a [`FrameLightBuffer`].
#[derive(Debug, Clone, Default)]
pub struct LightPackingLane {
    penumbra: SpotPenumbra,
}

impl LightPackingLane {
    /// Creates a lane using `penumbra` for spot lights.
    pub fn new(penumbra: SpotPenumbra) -> Self {
        Self { penumbra }
    }

    /// The spot penumbra in use.
    pub fn penumbra(&self) -> SpotPenumbra {
        self.penumbra
    }

    /// Packs `lights` into `buffer` and reports the result.
    ///
    /// Writes slots `[0, active)`, zeroes the color of the slots past them,
    /// and resets the shadow tile counter. Lights past the buffer capacity
    /// are marked invalid in the resolver's light index map.
    pub fn pack(
        &self,
        lights: &[VisibleLight],
        resolver: &mut dyn VisibilityResolver,
        buffer: &mut FrameLightBuffer,
    ) -> LightPackingReport {
        let capacity = buffer.capacity();
        let active = lights.len().min(capacity);
        let mut shadow_tile_count = 0;

        for (i, light) in lights.iter().take(active).enumerate() {
            let mut attenuation = Vec4::W;
            let mut spot_direction = Vec4::ZERO;
            let mut shadow = Vec4::ZERO;

            let direction_or_position = match light.kind {
                LightKind::Directional => -light.forward(),
                LightKind::Point | LightKind::Spot => {
                    attenuation.x = 1.0 / (light.range * light.range).max(MIN_RANGE_SQUARED);
                    light.position()
                }
            };

            if light.kind == LightKind::Spot {
                spot_direction = -light.forward();
                let (z, w) = self.penumbra.falloff(light.spot_angle);
                attenuation.z = z;
                attenuation.w = w;
            }

            if light.shadows.casts() {
                let has_casters = resolver
                    .shadow_caster_bounds(i)
                    .is_some_and(|bounds| !bounds.is_empty());
                if has_casters {
                    shadow_tile_count += 1;
                    shadow.x = light.shadow_strength;
                    shadow.y = if light.shadows == LightShadows::Soft {
                        1.0
                    } else {
                        0.0
                    };
                }
            }

            buffer.colors[i] = light.final_color.to_vec4();
            buffer.directions_or_positions[i] = direction_or_position;
            buffer.attenuations[i] = attenuation;
            buffer.spot_directions[i] = spot_direction;
            buffer.shadow_data[i] = shadow;

            log::trace!(
                "Packed {:?} light {} (shadow strength {})",
                light.kind,
                i,
                shadow.x
            );
        }

        for color in &mut buffer.colors[active..] {
            *color = Vec4::ZERO;
        }

        let overflow_count = lights.len() - active;
        if overflow_count > 0 {
            let mut map = resolver.light_index_map();
            for entry in map.iter_mut().skip(capacity) {
                *entry = INVALID_LIGHT_INDEX;
            }
            resolver.set_light_index_map(map);
            log::debug!(
                "{} visible lights exceed capacity {}, {} dropped from per-object lighting",
                lights.len(),
                capacity,
                overflow_count
            );
        }

        buffer.active_count = active;
        buffer.shadow_tile_count = shadow_tile_count;

        LightPackingReport {
            active_count: active,
            shadow_tile_count,
            overflow_count,
        }
    }
}

impl Lane for LightPackingLane {
    fn strategy_name(&self) -> &'static str {
        "LightPacking"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Lighting
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_lane::test_support::StubResolver;
    use approx::assert_relative_eq;
    use penumbra_core::math::{LinearRgba, Vec3};

    fn red() -> LinearRgba {
        LinearRgba::new(1.0, 0.0, 0.0, 1.0)
    }

    #[test]
    fn test_default_ratio_matches_formula() {
        assert_relative_eq!(
            SpotPenumbra::DEFAULT_RATIO,
            (23.0f32 / 32.0).atan(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_directional_packing() {
        let lane = LightPackingLane::default();
        let lights = [VisibleLight::directional(Vec3::new(0.0, -1.0, 0.0), red())];
        let mut resolver = StubResolver::new(lights.len());
        let mut buffer = FrameLightBuffer::new(16);

        let report = lane.pack(&lights, &mut resolver, &mut buffer);

        assert_eq!(report.active_count, 1);
        assert_eq!(buffer.colors()[0], red().to_vec4());
        let dir = buffer.directions_or_positions()[0];
        assert_relative_eq!(dir.y, 1.0, epsilon = 1e-6);
        assert_eq!(dir.w, 0.0);
        assert_eq!(buffer.attenuations()[0], Vec4::W);
        assert_eq!(buffer.spot_directions()[0], Vec4::ZERO);
    }

    #[test]
    fn test_point_attenuation_is_inverse_square() {
        let lane = LightPackingLane::default();
        let lights = [VisibleLight::point(Vec3::new(1.0, 2.0, 3.0), red(), 4.0)];
        let mut resolver = StubResolver::new(1);
        let mut buffer = FrameLightBuffer::new(16);

        lane.pack(&lights, &mut resolver, &mut buffer);

        assert_relative_eq!(buffer.attenuations()[0].x, 1.0 / 16.0);
        assert_eq!(buffer.attenuations()[0].w, 1.0);
        assert_eq!(
            buffer.directions_or_positions()[0],
            Vec4::new(1.0, 2.0, 3.0, 1.0)
        );
    }

    #[test]
    fn test_zero_range_is_clamped() {
        let lane = LightPackingLane::default();
        let lights = [VisibleLight::point(Vec3::ZERO, red(), 0.0)];
        let mut resolver = StubResolver::new(1);
        let mut buffer = FrameLightBuffer::new(16);

        lane.pack(&lights, &mut resolver, &mut buffer);

        let x = buffer.attenuations()[0].x;
        assert!(x.is_finite());
        assert_relative_eq!(x, 1000.0, max_relative = 1e-5);
    }

    #[test]
    fn test_spot_falloff_positive_across_angles() {
        let penumbra = SpotPenumbra::default();
        for step in 0..=180 {
            let angle = step as f32;
            let (z, w) = penumbra.falloff(angle);
            assert!(z > 0.0, "z must be positive at {angle} degrees");
            assert!(z.is_finite() && w.is_finite());
            assert!(1.0 / z >= MIN_SPOT_ANGLE_RANGE - 1e-6, "gap clamped at {angle}");
        }
    }

    #[test]
    fn test_spot_falloff_reference_values() {
        let penumbra = SpotPenumbra::default();

        let (z, w) = penumbra.falloff(60.0);
        assert_relative_eq!(z, 14.297_9, max_relative = 1e-4);
        assert_relative_eq!(w, -0.866_025_4 * 14.297_9, max_relative = 1e-4);

        let (z, _) = penumbra.falloff(30.0);
        assert_relative_eq!(z, 49.59, max_relative = 1e-3);

        // Wide cones collapse onto the clamp.
        let (z, w) = penumbra.falloff(120.0);
        assert_relative_eq!(z, 1.0 / MIN_SPOT_ANGLE_RANGE, max_relative = 1e-4);
        assert_relative_eq!(w, -0.5 * z, max_relative = 1e-4);
    }

    #[test]
    fn test_spot_packing() {
        let lane = LightPackingLane::default();
        let forward = Vec3::new(0.0, 0.0, -1.0);
        let lights = [VisibleLight::spot(Vec3::new(0.0, 3.0, 0.0), forward, red(), 10.0, 60.0)];
        let mut resolver = StubResolver::new(1);
        let mut buffer = FrameLightBuffer::new(16);

        lane.pack(&lights, &mut resolver, &mut buffer);

        let spot_dir = buffer.spot_directions()[0];
        assert_relative_eq!(spot_dir.z, 1.0, epsilon = 1e-6);
        let att = buffer.attenuations()[0];
        assert_relative_eq!(att.x, 0.01);
        let (z, w) = lane.penumbra().falloff(60.0);
        assert_eq!((att.z, att.w), (z, w));
        // The outer cone edge evaluates to zero.
        let outer_cos = (30.0f32).to_radians().cos();
        assert_relative_eq!(outer_cos * att.z + att.w, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_slot_count_and_zeroed_tail() {
        let lane = LightPackingLane::default();
        let mut buffer = FrameLightBuffer::new(8);
        let many: Vec<_> = (0..6)
            .map(|i| VisibleLight::point(Vec3::new(i as f32, 0.0, 0.0), red(), 5.0))
            .collect();
        let mut resolver = StubResolver::new(many.len());
        lane.pack(&many, &mut resolver, &mut buffer);

        let few = &many[..2];
        let mut resolver = StubResolver::new(few.len());
        let report = lane.pack(few, &mut resolver, &mut buffer);

        assert_eq!(report.active_count, 2);
        assert_eq!(buffer.active_count(), 2);
        assert!(buffer.colors()[2..].iter().all(|c| *c == Vec4::ZERO));
        assert_eq!(buffer.colors()[1], red().to_vec4());
    }

    #[test]
    fn test_shadow_eligibility_requires_casters() {
        let lane = LightPackingLane::default();
        let lights = [
            VisibleLight::directional(Vec3::new(0.0, -1.0, 0.0), red())
                .with_shadows(LightShadows::Soft, 0.8, 0.05),
            VisibleLight::directional(Vec3::new(1.0, -1.0, 0.0), red())
                .with_shadows(LightShadows::Hard, 1.0, 0.05),
            VisibleLight::directional(Vec3::new(-1.0, -1.0, 0.0), red()),
        ];
        let mut resolver = StubResolver::new(lights.len());
        resolver.casters_for(0);
        let mut buffer = FrameLightBuffer::new(16);

        let report = lane.pack(&lights, &mut resolver, &mut buffer);

        assert_eq!(report.shadow_tile_count, 1);
        assert_eq!(buffer.shadow_tile_count(), 1);
        assert_eq!(buffer.shadow_data()[0], Vec4::new(0.8, 1.0, 0.0, 0.0));
        assert_eq!(buffer.shadow_data()[1], Vec4::ZERO);
        assert_eq!(buffer.shadow_data()[2], Vec4::ZERO);
    }

    #[test]
    fn test_tile_counter_resets_per_pack() {
        let lane = LightPackingLane::default();
        let lights = [VisibleLight::directional(Vec3::new(0.0, -1.0, 0.0), red())
            .with_shadows(LightShadows::Hard, 1.0, 0.05)];
        let mut resolver = StubResolver::new(1);
        resolver.casters_for(0);
        let mut buffer = FrameLightBuffer::new(16);

        lane.pack(&lights, &mut resolver, &mut buffer);
        let report = lane.pack(&lights, &mut resolver, &mut buffer);

        assert_eq!(report.shadow_tile_count, 1);
    }

    #[test]
    fn test_packing_is_idempotent() {
        let lane = LightPackingLane::default();
        let lights = [
            VisibleLight::spot(Vec3::ONE, Vec3::new(0.0, -1.0, 0.0), red(), 7.0, 45.0)
                .with_shadows(LightShadows::Soft, 0.5, 0.1),
            VisibleLight::point(Vec3::ZERO, LinearRgba::WHITE, 3.0),
        ];
        let mut resolver = StubResolver::new(lights.len());
        resolver.casters_for(0);
        let mut first = FrameLightBuffer::new(16);
        lane.pack(&lights, &mut resolver, &mut first);
        let mut second = first.clone();
        lane.pack(&lights, &mut resolver, &mut second);

        assert_eq!(first.color_bytes(), second.color_bytes());
        assert_eq!(first, second);
    }

    #[test]
    fn test_overflow_masks_light_index_map() {
        let lane = LightPackingLane::default();
        let lights: Vec<_> = (0..20)
            .map(|i| VisibleLight::point(Vec3::new(i as f32, 0.0, 0.0), red(), 2.0))
            .collect();
        let mut resolver = StubResolver::new(lights.len());
        let mut buffer = FrameLightBuffer::new(16);

        let report = lane.pack(&lights, &mut resolver, &mut buffer);

        assert_eq!(report.active_count, 16);
        assert_eq!(report.overflow_count, 4);
        let map = resolver.light_index_map();
        assert_eq!(&map[..16], &(0..16).collect::<Vec<i32>>()[..]);
        assert!(map[16..].iter().all(|&i| i == INVALID_LIGHT_INDEX));
    }

    #[test]
    fn test_no_overflow_leaves_map_untouched() {
        let lane = LightPackingLane::default();
        let lights = [VisibleLight::point(Vec3::ZERO, red(), 2.0)];
        let mut resolver = StubResolver::new(1);
        let mut buffer = FrameLightBuffer::new(16);

        lane.pack(&lights, &mut resolver, &mut buffer);

        assert_eq!(resolver.map_writes, 0);
    }
}
