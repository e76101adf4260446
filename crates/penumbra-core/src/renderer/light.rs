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

//! Defines the light data handed to the renderer by a visibility resolver.
//!
//! A [`VisibleLight`] is a read-only, already-resolved view of a scene light for
//! one frame: its color is final (intensity and color space applied) and its
//! placement is a full local-to-world transform. The render lanes in
//! `penumbra-lanes` pack these into shader arrays.

use crate::math::{LinearRgba, Mat4, Vec3, Vec4};

/// The shape of a light's influence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LightKind {
    /// Infinitely distant light with parallel rays and no falloff (sun-like).
    #[default]
    Directional,
    /// Omni-directional light with distance falloff.
    Point,
    /// Cone-shaped light with distance and angular falloff.
    Spot,
}

/// How, if at all, a light casts shadows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LightShadows {
    /// The light casts no shadows.
    #[default]
    None,
    /// Single-tap shadow comparisons.
    Hard,
    /// Filtered (PCF) shadow comparisons.
    Soft,
}

impl LightShadows {
    /// Returns `true` for any mode that casts shadows.
    #[inline]
    pub fn casts(self) -> bool {
        self != LightShadows::None
    }
}

/// A light that survived visibility culling for the current camera.
///
/// The renderer never mutates a `VisibleLight`; it is owned by the visibility
/// resolver for the duration of the frame.
///
/// # Examples
///
/// ```
/// use penumbra_core::math::{LinearRgba, Vec3};
/// use penumbra_core::renderer::light::{LightShadows, VisibleLight};
///
/// let flashlight = VisibleLight::spot(
///     Vec3::new(0.0, 2.0, 0.0),
///     Vec3::new(0.0, -1.0, 0.0),
///     LinearRgba::WHITE,
///     20.0,
///     45.0,
/// )
/// .with_shadows(LightShadows::Soft, 0.8, 0.05);
/// assert!(flashlight.shadows.casts());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleLight {
    /// The kind of light.
    pub kind: LightKind,
    /// World transform. Column 2 is the forward axis the light shines along,
    /// column 3 is the world position.
    pub local_to_world: Mat4,
    /// Final linear color (intensity already applied).
    pub final_color: LinearRgba,
    /// Maximum range in world units (point and spot lights).
    pub range: f32,
    /// Full cone angle in degrees (spot lights).
    pub spot_angle: f32,
    /// Shadow mode requested by the light.
    pub shadows: LightShadows,
    /// Depth bias applied while rendering this light's shadow casters.
    pub shadow_bias: f32,
    /// Shadow strength in `[0, 1]`.
    pub shadow_strength: f32,
}

impl Default for VisibleLight {
    fn default() -> Self {
        Self {
            kind: LightKind::Directional,
            local_to_world: Mat4::IDENTITY,
            final_color: LinearRgba::WHITE,
            range: 10.0,
            spot_angle: 30.0,
            shadows: LightShadows::None,
            shadow_bias: 0.05,
            shadow_strength: 1.0,
        }
    }
}

impl VisibleLight {
    /// Creates a directional light shining along `forward`.
    pub fn directional(forward: Vec3, color: LinearRgba) -> Self {
        Self {
            kind: LightKind::Directional,
            local_to_world: Mat4::from_position_forward(Vec3::ZERO, forward)
                .unwrap_or(Mat4::IDENTITY),
            final_color: color,
            ..Default::default()
        }
    }

    /// Creates a point light at `position`.
    pub fn point(position: Vec3, color: LinearRgba, range: f32) -> Self {
        Self {
            kind: LightKind::Point,
            local_to_world: Mat4::from_translation(position),
            final_color: color,
            range,
            ..Default::default()
        }
    }

    /// Creates a spot light at `position` shining along `forward` with a full
    /// cone of `spot_angle` degrees.
    pub fn spot(
        position: Vec3,
        forward: Vec3,
        color: LinearRgba,
        range: f32,
        spot_angle: f32,
    ) -> Self {
        Self {
            kind: LightKind::Spot,
            local_to_world: Mat4::from_position_forward(position, forward)
                .unwrap_or_else(|| Mat4::from_translation(position)),
            final_color: color,
            range,
            spot_angle,
            ..Default::default()
        }
    }

    /// Returns the light with the given shadow settings.
    pub fn with_shadows(mut self, shadows: LightShadows, strength: f32, bias: f32) -> Self {
        self.shadows = shadows;
        self.shadow_strength = strength;
        self.shadow_bias = bias;
        self
    }

    /// The axis the light shines along (column 2 of the transform).
    #[inline]
    pub fn forward(&self) -> Vec4 {
        self.local_to_world.col(2)
    }

    /// The world position of the light (column 3 of the transform, `w = 1`).
    #[inline]
    pub fn position(&self) -> Vec4 {
        self.local_to_world.col(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq;

    #[test]
    fn test_directional_forward_is_normalized() {
        let light = VisibleLight::directional(Vec3::new(0.0, -2.0, 0.0), LinearRgba::WHITE);
        assert_eq!(light.kind, LightKind::Directional);
        assert!(approx_eq(light.forward().truncate().length(), 1.0));
        assert!(approx_eq(light.forward().y, -1.0));
    }

    #[test]
    fn test_point_position_has_unit_w() {
        let light = VisibleLight::point(Vec3::new(1.0, 2.0, 3.0), LinearRgba::WHITE, 5.0);
        assert_eq!(light.position(), Vec4::new(1.0, 2.0, 3.0, 1.0));
        assert!(!light.shadows.casts());
    }

    #[test]
    fn test_spot_with_shadows() {
        let light = VisibleLight::spot(Vec3::ZERO, Vec3::Z, LinearRgba::WHITE, 10.0, 60.0)
            .with_shadows(LightShadows::Hard, 0.5, 0.1);
        assert_eq!(light.kind, LightKind::Spot);
        assert_eq!(light.shadows, LightShadows::Hard);
        assert!(approx_eq(light.shadow_strength, 0.5));
        assert_eq!(light.forward(), Vec4::new(0.0, 0.0, 1.0, 0.0));
    }
}
