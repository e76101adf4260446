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

//! Defines transient texture descriptors and render-target bindings.

use std::borrow::Cow;

/// A handle to a temporary texture allocated by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// The memory layout of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// Depth texture sampled with hardware depth comparison.
    ShadowMap,
    /// Plain depth texture.
    Depth,
    /// 8-bit RGBA color.
    Rgba8Unorm,
}

/// Defines the filtering mode for texture sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterMode {
    /// Returns the value of the nearest texel.
    Point,
    /// Weighted average of the four nearest texels.
    Bilinear,
}

/// Defines how texture coordinates outside `[0, 1]` are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapMode {
    /// Coordinates wrap around.
    Repeat,
    /// Coordinates are clamped to the edge.
    Clamp,
}

/// Describes a temporary texture to acquire for part of a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporaryTextureDescriptor {
    /// A debug label.
    pub label: Option<Cow<'static, str>>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Bits of the depth buffer, `0` for none.
    pub depth_bits: u32,
    /// Texel format.
    pub format: TextureFormat,
    /// Sampling filter.
    pub filter_mode: FilterMode,
    /// Addressing mode.
    pub wrap_mode: WrapMode,
}

impl TemporaryTextureDescriptor {
    /// Describes a square depth-only shadow map of `size` pixels, sampled
    /// bilinearly with clamped addressing.
    pub fn shadow_map(size: u32) -> Self {
        Self {
            label: Some(Cow::Borrowed("Shadow Atlas")),
            width: size,
            height: size,
            depth_bits: 16,
            format: TextureFormat::ShadowMap,
            filter_mode: FilterMode::Bilinear,
            wrap_mode: WrapMode::Clamp,
        }
    }
}

/// What happens to a render target's previous contents when it is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadAction {
    /// Keep the existing contents.
    Load,
    /// The existing contents are irrelevant.
    DontCare,
}

/// What happens to a render target's contents once rendering ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreAction {
    /// Keep the rendered contents.
    Store,
    /// Discard the rendered contents.
    DontCare,
}

/// Which buffers of a render target are cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ClearFlags {
    bits: u32,
}

impl ClearFlags {
    /// Clear nothing.
    pub const NONE: Self = Self { bits: 0 };
    /// Clear the depth buffer.
    pub const DEPTH: Self = Self { bits: 1 << 0 };
    /// Clear the color buffer.
    pub const COLOR: Self = Self { bits: 1 << 1 };

    /// Builds flags from two booleans.
    #[inline]
    pub const fn from_parts(depth: bool, color: bool) -> Self {
        let mut bits = 0;
        if depth {
            bits |= Self::DEPTH.bits;
        }
        if color {
            bits |= Self::COLOR.bits;
        }
        Self { bits }
    }

    /// Returns `true` if depth is cleared.
    #[inline]
    pub const fn depth(&self) -> bool {
        self.bits & Self::DEPTH.bits != 0
    }

    /// Returns `true` if color is cleared.
    #[inline]
    pub const fn color(&self) -> bool {
        self.bits & Self::COLOR.bits != 0
    }

    /// Returns `true` if nothing is cleared.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

/// Binds a texture as the active render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTargetBinding {
    /// The target texture.
    pub texture: TextureId,
    /// Load behavior.
    pub load: LoadAction,
    /// Store behavior.
    pub store: StoreAction,
    /// Buffers cleared right after binding.
    pub clear: ClearFlags,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shadow_map_descriptor() {
        let desc = TemporaryTextureDescriptor::shadow_map(1024);
        assert_eq!((desc.width, desc.height), (1024, 1024));
        assert_eq!(desc.format, TextureFormat::ShadowMap);
        assert_eq!(desc.filter_mode, FilterMode::Bilinear);
        assert_eq!(desc.wrap_mode, WrapMode::Clamp);
    }

    #[test]
    fn test_clear_flags_from_parts() {
        let f = ClearFlags::from_parts(true, false);
        assert!(f.depth());
        assert!(!f.color());
        assert!(ClearFlags::from_parts(false, false).is_empty());
        assert_eq!(ClearFlags::from_parts(false, true), ClearFlags::COLOR);
    }
}
