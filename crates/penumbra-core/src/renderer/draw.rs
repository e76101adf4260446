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

//! Descriptors for batched renderer draws: sorting, filtering and per-object configuration.

use super::shader::ShaderPassName;
use crate::math::Aabb;
use std::ops::RangeInclusive;

/// An opaque handle to a material owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u64);

/// An opaque handle to a renderer (one drawable object) owned by the visibility resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RendererId(pub u64);

/// A renderer that survived culling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleRenderer {
    /// The renderer handle.
    pub id: RendererId,
    /// The render queue of the renderer's material.
    pub render_queue: u32,
    /// World-space bounds.
    pub bounds: Aabb,
    /// Whether the renderer writes into shadow maps.
    pub casts_shadows: bool,
}

/// The inclusive render-queue window a draw call accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderQueueRange(pub RangeInclusive<u32>);

impl RenderQueueRange {
    /// Highest queue considered opaque.
    pub const OPAQUE_MAX: u32 = 2500;
    /// Highest queue value in use.
    pub const MAX: u32 = 5000;

    /// Opaque and alpha-tested geometry.
    pub fn opaque() -> Self {
        Self(0..=Self::OPAQUE_MAX)
    }

    /// Alpha-blended geometry.
    pub fn transparent() -> Self {
        Self(Self::OPAQUE_MAX + 1..=Self::MAX)
    }

    /// Every queue.
    pub fn all() -> Self {
        Self(0..=Self::MAX)
    }

    /// Returns `true` if `queue` falls inside the range.
    #[inline]
    pub fn contains(&self, queue: u32) -> bool {
        self.0.contains(&queue)
    }
}

/// How a batch of renderers is ordered before drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortFlags {
    /// No ordering.
    #[default]
    None,
    /// Front-to-back, bucketed by render state.
    CommonOpaque,
    /// Back-to-front.
    CommonTransparent,
}

/// Batching features enabled for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DrawFlags {
    bits: u32,
}

impl DrawFlags {
    /// No batching.
    pub const NONE: Self = Self { bits: 0 };
    /// Merge small meshes on the CPU.
    pub const DYNAMIC_BATCHING: Self = Self { bits: 1 << 0 };
    /// Use GPU instancing where the material supports it.
    pub const INSTANCING: Self = Self { bits: 1 << 1 };

    /// Combines two sets of flags.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Checks whether every flag in `other` is set.
    #[inline]
    pub const fn contains(&self, other: Self) -> bool {
        self.bits & other.bits == other.bits
    }

    /// Returns the raw bits.
    #[inline]
    pub const fn bits(&self) -> u32 {
        self.bits
    }
}

impl std::ops::BitOr for DrawFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// Extra per-object data the backend sets up for each renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RendererConfiguration {
    /// Nothing extra.
    #[default]
    None,
    /// Up to eight light indices per object, read from the resolver's light index map.
    PerObjectLightIndices8,
}

/// How a batch of renderers is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRendererSettings {
    /// Shader passes to draw, in priority order.
    pub pass_names: Vec<ShaderPassName>,
    /// Ordering of the batch.
    pub sorting: SortFlags,
    /// Batching features.
    pub flags: DrawFlags,
    /// Per-object data.
    pub renderer_configuration: RendererConfiguration,
    /// If set, every renderer is drawn with this material instead of its own.
    pub override_material: Option<MaterialId>,
}

impl DrawRendererSettings {
    /// Creates settings drawing a single shader pass.
    pub fn new(pass: ShaderPassName) -> Self {
        Self {
            pass_names: vec![pass],
            sorting: SortFlags::None,
            flags: DrawFlags::NONE,
            renderer_configuration: RendererConfiguration::None,
            override_material: None,
        }
    }
}

/// Which renderers of a batch are drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRenderersSettings {
    /// Accepted render queues.
    pub render_queue_range: RenderQueueRange,
}

impl Default for FilterRenderersSettings {
    fn default() -> Self {
        Self {
            render_queue_range: RenderQueueRange::all(),
        }
    }
}

impl FilterRenderersSettings {
    /// Filters to the given queue range.
    pub fn with_queue_range(render_queue_range: RenderQueueRange) -> Self {
        Self { render_queue_range }
    }

    /// Returns `true` if `renderer` passes the filter.
    #[inline]
    pub fn accepts(&self, renderer: &VisibleRenderer) -> bool {
        self.render_queue_range.contains(renderer.render_queue)
    }
}
