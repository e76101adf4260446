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

//! Implements the forward draw passes of a camera.
//!
//! The `ForwardLane` binds the packed light arrays and issues the three
//! scene passes in a fixed order: opaque front-to-back, skybox, then
//! transparent back-to-front. Both geometry passes draw the same culled
//! renderer set and only differ by sort hint and render-queue filter.

use super::FrameLightBuffer;
use penumbra_core::{
    lane::{Lane, LaneKind},
    renderer::{
        Camera, CommandEncoder, DrawFlags, DrawRendererSettings, FilterRenderersSettings,
        RenderQueueRange, RendererConfiguration, ShaderPassName, ShaderPropertyId, SortFlags,
        VisibleRenderer,
    },
};

/// Draws the opaque, skybox and transparent passes.
#[derive(Debug, Clone, Default)]
pub struct ForwardLane {
    flags: DrawFlags,
}

impl ForwardLane {
    /// Creates a lane drawing with the given batching flags.
    pub fn new(flags: DrawFlags) -> Self {
        Self { flags }
    }

    /// The batching flags of every draw.
    pub fn flags(&self) -> DrawFlags {
        self.flags
    }

    /// Binds the four per-slot light arrays.
    pub fn bind_light_uniforms(&self, encoder: &mut dyn CommandEncoder, buffer: &FrameLightBuffer) {
        encoder.set_global_vector_array(ShaderPropertyId::VISIBLE_LIGHT_COLORS, buffer.colors());
        encoder.set_global_vector_array(
            ShaderPropertyId::VISIBLE_LIGHT_DIRECTIONS_OR_POSITIONS,
            buffer.directions_or_positions(),
        );
        encoder.set_global_vector_array(
            ShaderPropertyId::VISIBLE_LIGHT_ATTENUATIONS,
            buffer.attenuations(),
        );
        encoder.set_global_vector_array(
            ShaderPropertyId::VISIBLE_LIGHT_SPOT_DIRECTIONS,
            buffer.spot_directions(),
        );
    }

    /// Draw settings for one pass. `per_object_lights` requests per-object
    /// light indices from the resolver's light index map.
    pub fn draw_settings(&self, sorting: SortFlags, per_object_lights: bool) -> DrawRendererSettings {
        let mut settings = DrawRendererSettings::new(ShaderPassName::SRP_DEFAULT_UNLIT);
        settings.flags = self.flags;
        settings.sorting = sorting;
        if per_object_lights {
            settings.renderer_configuration = RendererConfiguration::PerObjectLightIndices8;
        }
        settings
    }

    /// Issues the opaque, skybox and transparent passes.
    pub fn render(
        &self,
        encoder: &mut dyn CommandEncoder,
        camera: &Camera,
        renderers: &[VisibleRenderer],
        per_object_lights: bool,
    ) {
        let opaque = self.draw_settings(SortFlags::CommonOpaque, per_object_lights);
        encoder.draw_renderers(
            renderers,
            &opaque,
            &FilterRenderersSettings::with_queue_range(RenderQueueRange::opaque()),
        );

        encoder.draw_skybox(camera);

        let transparent = self.draw_settings(SortFlags::CommonTransparent, per_object_lights);
        encoder.draw_renderers(
            renderers,
            &transparent,
            &FilterRenderersSettings::with_queue_range(RenderQueueRange::transparent()),
        );
    }
}

impl Lane for ForwardLane {
    fn strategy_name(&self) -> &'static str {
        "Forward"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Render
    }
}
