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

//! Defines the linear-space color type carried by lights and clear operations.

use super::Vec4;
use bytemuck::{Pod, Zeroable};
use std::ops::Mul;

/// A color in linear RGBA space.
///
/// Lights hand their *final* color to the renderer already multiplied by
/// intensity and converted out of sRGB, so components may exceed `1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct LinearRgba {
    /// The red component in linear space.
    pub r: f32,
    /// The green component in linear space.
    pub g: f32,
    /// The blue component in linear space.
    pub b: f32,
    /// The alpha (opacity) component.
    pub a: f32,
}

impl LinearRgba {
    /// Fully transparent black. Also the "no light" value of a packed color slot.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a new color from its components.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Reinterprets the color as a `Vec4` for uniform upload.
    #[inline]
    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(self.r, self.g, self.b, self.a)
    }
}

impl Mul<f32> for LinearRgba {
    type Output = Self;

    /// Scales the color channels, leaving alpha untouched.
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.r * rhs, self.g * rhs, self.b * rhs, self.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaling_keeps_alpha() {
        let c = LinearRgba::new(0.5, 0.25, 1.0, 0.75) * 2.0;
        assert_eq!(c, LinearRgba::new(1.0, 0.5, 2.0, 0.75));
        assert_eq!(c.to_vec4(), Vec4::new(1.0, 0.5, 2.0, 0.75));
    }
}
