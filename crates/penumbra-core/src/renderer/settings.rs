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

//! User-facing pipeline configuration, loaded from RON.

use super::draw::DrawFlags;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// The largest number of lights the shading stage can index.
pub const MAX_VISIBLE_LIGHTS_LIMIT: usize = 64;

/// The resolution of the shadow atlas, one of a fixed set of power-of-two sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ShadowMapSize {
    /// 256 x 256.
    S256,
    /// 512 x 512.
    S512,
    /// 1024 x 1024.
    #[default]
    S1024,
    /// 2048 x 2048.
    S2048,
    /// 4096 x 4096.
    S4096,
}

impl ShadowMapSize {
    /// Edge length in pixels.
    pub const fn pixels(self) -> u32 {
        match self {
            ShadowMapSize::S256 => 256,
            ShadowMapSize::S512 => 512,
            ShadowMapSize::S1024 => 1024,
            ShadowMapSize::S2048 => 2048,
            ShadowMapSize::S4096 => 4096,
        }
    }
}

impl TryFrom<u32> for ShadowMapSize {
    type Error = SettingsError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            256 => Ok(ShadowMapSize::S256),
            512 => Ok(ShadowMapSize::S512),
            1024 => Ok(ShadowMapSize::S1024),
            2048 => Ok(ShadowMapSize::S2048),
            4096 => Ok(ShadowMapSize::S4096),
            other => Err(SettingsError::UnsupportedShadowMapSize(other)),
        }
    }
}

impl From<ShadowMapSize> for u32 {
    fn from(size: ShadowMapSize) -> Self {
        size.pixels()
    }
}

/// An error found while parsing or validating [`PipelineSettings`].
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    /// The shadow map size is not one of 256/512/1024/2048/4096.
    UnsupportedShadowMapSize(u32),
    /// `max_visible_lights` is outside `1..=64`.
    InvalidMaxVisibleLights(usize),
    /// `shadow_distance` is not a positive finite number.
    InvalidShadowDistance(f32),
    /// `spot_penumbra_ratio` is outside `(0, 1]`.
    InvalidSpotPenumbraRatio(f32),
    /// The RON text could not be parsed.
    Parse(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::UnsupportedShadowMapSize(size) => {
                write!(f, "Unsupported shadow map size {size}")
            }
            SettingsError::InvalidMaxVisibleLights(n) => write!(
                f,
                "max_visible_lights must be in 1..={MAX_VISIBLE_LIGHTS_LIMIT}, got {n}"
            ),
            SettingsError::InvalidShadowDistance(d) => {
                write!(f, "shadow_distance must be positive, got {d}")
            }
            SettingsError::InvalidSpotPenumbraRatio(r) => {
                write!(f, "spot_penumbra_ratio must be in (0, 1], got {r}")
            }
            SettingsError::Parse(msg) => write!(f, "Failed to parse pipeline settings: {msg}"),
        }
    }
}

impl std::error::Error for SettingsError {}

/// Construction parameters of the forward pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Let the backend merge small draws sharing a material.
    pub dynamic_batching: bool,
    /// Let the backend draw identical meshes in a single instanced call.
    pub instancing: bool,
    /// Resolution of the shadow atlas.
    pub shadow_map_size: ShadowMapSize,
    /// Farthest distance at which shadows are rendered.
    pub shadow_distance: f32,
    /// Capacity of the per-frame light arrays.
    pub max_visible_lights: usize,
    /// Ratio between the inner and outer cone tangents of spot lights.
    pub spot_penumbra_ratio: f32,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            dynamic_batching: false,
            instancing: false,
            shadow_map_size: ShadowMapSize::default(),
            shadow_distance: 100.0,
            max_visible_lights: 16,
            spot_penumbra_ratio: (23.0f32 / 32.0).atan(),
        }
    }
}

impl PipelineSettings {
    /// Parses and validates settings from RON text. Missing fields take
    /// their default value.
    pub fn from_ron_str(text: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            ron::from_str(text).map_err(|e| SettingsError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads, parses and validates a RON settings file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pipeline settings '{}'", path.display()))?;
        let settings = Self::from_ron_str(&text)
            .with_context(|| format!("Invalid pipeline settings in '{}'", path.display()))?;
        log::debug!("Loaded pipeline settings from '{}'", path.display());
        Ok(settings)
    }

    /// Checks every field against its allowed range.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(1..=MAX_VISIBLE_LIGHTS_LIMIT).contains(&self.max_visible_lights) {
            return Err(SettingsError::InvalidMaxVisibleLights(
                self.max_visible_lights,
            ));
        }
        if !(self.shadow_distance.is_finite() && self.shadow_distance > 0.0) {
            return Err(SettingsError::InvalidShadowDistance(self.shadow_distance));
        }
        if !(self.spot_penumbra_ratio > 0.0 && self.spot_penumbra_ratio <= 1.0) {
            return Err(SettingsError::InvalidSpotPenumbraRatio(
                self.spot_penumbra_ratio,
            ));
        }
        Ok(())
    }

    /// The draw flags every forward pass uses.
    pub fn draw_flags(&self) -> DrawFlags {
        let mut flags = DrawFlags::NONE;
        if self.dynamic_batching {
            flags = flags | DrawFlags::DYNAMIC_BATCHING;
        }
        if self.instancing {
            flags = flags | DrawFlags::INSTANCING;
        }
        flags
    }
}
