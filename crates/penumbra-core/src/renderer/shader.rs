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

//! The shader-facing naming contract: global property ids, feature keywords and pass names.
//!
//! Shaders bind renderer data by name. The names below are bit-exact: the
//! shading stage depends on them. Instead of hashing strings every frame, each
//! name is assigned a stable integer [`ShaderPropertyId`] in a fixed table.
//! Backends resolve the table to their own handles once, at initialization.

use std::fmt;

/// A stable handle to a global shader property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderPropertyId(u32);

impl ShaderPropertyId {
    /// `_VisibleLightColors`: per-slot light color array.
    pub const VISIBLE_LIGHT_COLORS: Self = Self(0);
    /// `_VisibleLightDirectionsOrPositions`: per-slot direction (directional) or position (point/spot).
    pub const VISIBLE_LIGHT_DIRECTIONS_OR_POSITIONS: Self = Self(1);
    /// `_VisibleLightAttenuations`: per-slot range and cone falloff terms.
    pub const VISIBLE_LIGHT_ATTENUATIONS: Self = Self(2);
    /// `_VisibleLightSpotDirections`: per-slot spot direction.
    pub const VISIBLE_LIGHT_SPOT_DIRECTIONS: Self = Self(3);
    /// `unity_LightIndicesOffsetAndCount`: per-object light index window.
    pub const LIGHT_INDICES_OFFSET_AND_COUNT: Self = Self(4);
    /// `_ShadowMap`: the shadow atlas texture.
    pub const SHADOW_MAP: Self = Self(5);
    /// `_ShadowBias`: depth bias for the light being rendered.
    pub const SHADOW_BIAS: Self = Self(6);
    /// `_ShadowData`: per-slot (strength, softness) array.
    pub const SHADOW_DATA: Self = Self(7);
    /// `_WorldToShadowMatrix`: single matrix for single-shadow configurations.
    pub const WORLD_TO_SHADOW_MATRIX: Self = Self(8);
    /// `_WorldToShadowMatrices`: per-slot world-to-atlas matrices.
    pub const WORLD_TO_SHADOW_MATRICES: Self = Self(9);
    /// `_ShadowMapSize`: `(1/size, 1/size, size, size)`.
    pub const SHADOW_MAP_SIZE: Self = Self(10);

    /// The number of entries in the property table.
    pub const COUNT: usize = 11;

    const NAMES: [&'static str; Self::COUNT] = [
        "_VisibleLightColors",
        "_VisibleLightDirectionsOrPositions",
        "_VisibleLightAttenuations",
        "_VisibleLightSpotDirections",
        "unity_LightIndicesOffsetAndCount",
        "_ShadowMap",
        "_ShadowBias",
        "_ShadowData",
        "_WorldToShadowMatrix",
        "_WorldToShadowMatrices",
        "_ShadowMapSize",
    ];

    /// The table index of this property.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The exact shader-side name of this property.
    #[inline]
    pub fn name(self) -> &'static str {
        Self::NAMES[self.index()]
    }

    /// Looks a property up by its shader-side name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| Self(i as u32))
    }

    /// Iterates over every property in table order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT as u32).map(Self)
    }
}

impl fmt::Display for ShaderPropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A shader feature keyword toggled globally by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKeyword {
    /// `_SHADOWS_HARD`: at least one light samples its shadow with a single tap.
    ShadowsHard,
    /// `_SHADOWS_SOFT`: at least one light samples its shadow with filtering.
    ShadowsSoft,
}

impl ShaderKeyword {
    /// The exact shader-side name of this keyword.
    pub const fn name(self) -> &'static str {
        match self {
            ShaderKeyword::ShadowsHard => "_SHADOWS_HARD",
            ShaderKeyword::ShadowsSoft => "_SHADOWS_SOFT",
        }
    }

    const fn bit(self) -> u32 {
        match self {
            ShaderKeyword::ShadowsHard => 1 << 0,
            ShaderKeyword::ShadowsSoft => 1 << 1,
        }
    }
}

impl fmt::Display for ShaderKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of enabled [`ShaderKeyword`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ShaderKeywords {
    bits: u32,
}

impl ShaderKeywords {
    /// No keywords enabled.
    pub const NONE: Self = Self { bits: 0 };

    /// Returns `true` if `keyword` is enabled.
    #[inline]
    pub const fn contains(&self, keyword: ShaderKeyword) -> bool {
        self.bits & keyword.bit() != 0
    }

    /// Enables or disables `keyword`.
    #[inline]
    pub fn set(&mut self, keyword: ShaderKeyword, enabled: bool) {
        if enabled {
            self.bits |= keyword.bit();
        } else {
            self.bits &= !keyword.bit();
        }
    }

    /// Returns `true` if no keyword is enabled.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

/// The name of a shader pass (light mode tag) a draw call selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderPassName(pub &'static str);

impl ShaderPassName {
    /// The pass every pipeline-aware shader provides.
    pub const SRP_DEFAULT_UNLIT: Self = Self("SRPDefaultUnlit");

    /// Built-in pipeline passes this renderer does not understand. Objects
    /// whose shaders only provide these are drawn with the error material.
    pub const LEGACY: [Self; 6] = [
        Self("ForwardBase"),
        Self("PrepassBase"),
        Self("Always"),
        Self("Vertex"),
        Self("VertexLMRGBM"),
        Self("VertexLM"),
    ];
}

impl fmt::Display for ShaderPassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_names_are_exact() {
        assert_eq!(ShaderPropertyId::VISIBLE_LIGHT_COLORS.name(), "_VisibleLightColors");
        assert_eq!(
            ShaderPropertyId::LIGHT_INDICES_OFFSET_AND_COUNT.name(),
            "unity_LightIndicesOffsetAndCount"
        );
        assert_eq!(
            ShaderPropertyId::WORLD_TO_SHADOW_MATRICES.name(),
            "_WorldToShadowMatrices"
        );
        assert_eq!(ShaderPropertyId::SHADOW_MAP_SIZE.to_string(), "_ShadowMapSize");
    }

    #[test]
    fn test_property_table_round_trips_by_name() {
        for id in ShaderPropertyId::all() {
            assert_eq!(ShaderPropertyId::from_name(id.name()), Some(id));
        }
        assert_eq!(ShaderPropertyId::all().count(), ShaderPropertyId::COUNT);
        assert_eq!(ShaderPropertyId::from_name("_Missing"), None);
    }

    #[test]
    fn test_keyword_set() {
        let mut set = ShaderKeywords::NONE;
        set.set(ShaderKeyword::ShadowsSoft, true);
        assert!(set.contains(ShaderKeyword::ShadowsSoft));
        assert!(!set.contains(ShaderKeyword::ShadowsHard));
        set.set(ShaderKeyword::ShadowsSoft, false);
        assert!(set.is_empty());
        assert_eq!(ShaderKeyword::ShadowsHard.name(), "_SHADOWS_HARD");
    }
}
