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

//! Defines the ForwardRenderAgent, the per-camera frame orchestrator.

use super::frame::{CameraOutcome, CameraReport, CameraStats, FrameContext, FrameError, FrameReport};
use penumbra_core::{
    lane::Lane,
    math::Vec4,
    renderer::{
        Camera, CommandEncoder, PipelineSettings, ShaderPropertyId, VisibilityResolver,
    },
};
#[cfg(any(debug_assertions, feature = "diagnostics"))]
use penumbra_core::renderer::CameraKind;
#[cfg(any(debug_assertions, feature = "diagnostics"))]
use penumbra_lanes::DiagnosticLane;
use penumbra_lanes::{
    ForwardLane, FrameLightBuffer, LightPackingLane, ShadowAtlasLane, SpotPenumbra,
};
use std::time::{Duration, Instant};

/// Profiling sample wrapping a camera's draw passes.
pub const RENDER_CAMERA_SAMPLE: &str = "Render Camera";

/// Drives the lanes through one camera at a time, in a fixed order.
///
/// The agent owns the frame light buffer and lends it to the lanes; nothing
/// is shared between cameras except the buffer's storage, which every
/// camera overwrites.
pub struct ForwardRenderAgent {
    // Settings the agent was built from.
    settings: PipelineSettings,
    // Per-slot light arrays, allocated once with `max_visible_lights` slots.
    light_buffer: FrameLightBuffer,
    // Fills the light buffer from the culled lights.
    light_packing_lane: LightPackingLane,
    // Renders the shadow atlas when a light casts shadows.
    shadow_atlas_lane: ShadowAtlasLane,
    // Binds the light arrays and issues the scene passes.
    forward_lane: ForwardLane,
    // Highlights objects with unsupported shaders. Compiled out of release builds.
    #[cfg(any(debug_assertions, feature = "diagnostics"))]
    diagnostic_lane: DiagnosticLane,
    // --- Metrics ---
    // Duration of the last render() call.
    last_frame_time: Duration,
    // Total number of frames rendered since agent creation.
    frame_count: u64,
}

impl ForwardRenderAgent {
    /// Creates an agent from already validated settings.
    pub fn new(settings: PipelineSettings) -> Self {
        let agent = Self {
            light_buffer: FrameLightBuffer::new(settings.max_visible_lights),
            light_packing_lane: LightPackingLane::new(SpotPenumbra::new(
                settings.spot_penumbra_ratio,
            )),
            shadow_atlas_lane: ShadowAtlasLane::new(settings.shadow_map_size),
            forward_lane: ForwardLane::new(settings.draw_flags()),
            #[cfg(any(debug_assertions, feature = "diagnostics"))]
            diagnostic_lane: DiagnosticLane::new(),
            settings,
            last_frame_time: Duration::ZERO,
            frame_count: 0,
        };
        log::debug!(
            "ForwardRenderAgent lanes: {}",
            agent
                .lanes()
                .iter()
                .map(|l| format!("{} ({})", l.strategy_name(), l.lane_kind()))
                .collect::<Vec<_>>()
                .join(", ")
        );
        agent
    }

    /// The settings the agent was built from.
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// The light arrays as packed for the last camera.
    pub fn light_buffer(&self) -> &FrameLightBuffer {
        &self.light_buffer
    }

    /// Duration of the last [`render`](Self::render) call.
    pub fn last_frame_time(&self) -> Duration {
        self.last_frame_time
    }

    /// Frames rendered since creation.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Every lane the agent drives, in execution order.
    pub fn lanes(&self) -> Vec<&dyn Lane> {
        #[cfg_attr(not(any(debug_assertions, feature = "diagnostics")), allow(unused_mut))]
        let mut lanes: Vec<&dyn Lane> = vec![
            &self.light_packing_lane,
            &self.shadow_atlas_lane,
            &self.forward_lane,
        ];
        #[cfg(any(debug_assertions, feature = "diagnostics"))]
        lanes.push(&self.diagnostic_lane);
        lanes
    }

    /// Renders every camera in order. Never fails: a camera that cannot be
    /// rendered is reported as skipped.
    pub fn render(
        &mut self,
        encoder: &mut dyn CommandEncoder,
        resolver: &mut dyn VisibilityResolver,
        cameras: &[Camera],
    ) -> FrameReport {
        let start = Instant::now();
        let mut report = FrameReport::default();

        for camera in cameras {
            let outcome = self.render_camera(encoder, resolver, camera);
            report.cameras.push(CameraReport {
                camera: camera.name.clone(),
                outcome,
            });
        }

        self.last_frame_time = start.elapsed();
        self.frame_count += 1;
        log::debug!(
            "Frame {}: {} cameras rendered, {} skipped in {:?}",
            self.frame_count,
            report.rendered_count(),
            report.skipped_count(),
            self.last_frame_time
        );
        report
    }

    /// Renders a single camera and releases its shadow surface afterwards,
    /// whatever the outcome.
    pub fn render_camera(
        &mut self,
        encoder: &mut dyn CommandEncoder,
        resolver: &mut dyn VisibilityResolver,
        camera: &Camera,
    ) -> CameraOutcome {
        let mut ctx = FrameContext::for_camera(camera);
        let result = self.render_camera_inner(encoder, resolver, &mut ctx);

        if let Some(texture) = ctx.shadow_texture.take() {
            encoder.release_temporary_texture(texture);
        }

        match result {
            Ok(stats) => {
                log::debug!(
                    "Camera '{}': {} renderers, {} lights, {} shadow tiles",
                    camera.name,
                    stats.visible_renderers,
                    stats.active_lights,
                    stats.shadow_tiles
                );
                CameraOutcome::Rendered(stats)
            }
            Err(e) => {
                log::debug!("Camera '{}' skipped: {e}", camera.name);
                CameraOutcome::Skipped(e)
            }
        }
    }

    fn render_camera_inner(
        &mut self,
        encoder: &mut dyn CommandEncoder,
        resolver: &mut dyn VisibilityResolver,
        ctx: &mut FrameContext<'_>,
    ) -> Result<CameraStats, FrameError> {
        let camera = ctx.camera;
        let mut parameters =
            resolver
                .culling_parameters(camera)
                .ok_or_else(|| FrameError::CullingUnavailable {
                    camera: camera.name.clone(),
                })?;
        parameters.shadow_distance = self.settings.shadow_distance.min(camera.far_clip);

        #[cfg(any(debug_assertions, feature = "diagnostics"))]
        if camera.kind == CameraKind::SceneView {
            resolver.emit_scene_view_geometry(camera);
        }

        let cull = resolver.cull(&parameters);
        let has_lights = !cull.visible_lights.is_empty();
        let mut stats = CameraStats {
            visible_renderers: cull.visible_renderers.len(),
            visible_lights: cull.visible_lights.len(),
            ..Default::default()
        };

        if !has_lights {
            encoder.set_global_vector(ShaderPropertyId::LIGHT_INDICES_OFFSET_AND_COUNT, Vec4::ZERO);
            ctx.disable_shadows(encoder);
        }

        let packed =
            self.light_packing_lane
                .pack(&cull.visible_lights, resolver, &mut self.light_buffer);
        stats.active_lights = packed.active_count;
        stats.overflow_lights = packed.overflow_count;

        if has_lights {
            if packed.shadow_tile_count > 0 {
                match self.shadow_atlas_lane.render(
                    encoder,
                    &*resolver,
                    &cull.visible_lights,
                    &mut self.light_buffer,
                ) {
                    Ok(atlas) => {
                        ctx.shadow_texture = Some(atlas.texture);
                        ctx.keywords = atlas.keywords();
                        stats.shadow_tiles = atlas.tiles.len();
                    }
                    Err(e) => {
                        log::warn!("Camera '{}' renders without shadows: {e}", camera.name);
                        self.light_buffer.clear_shadows();
                        ctx.disable_shadows(encoder);
                        stats.warnings.push(e.into());
                    }
                }
            } else {
                ctx.disable_shadows(encoder);
            }
        }

        encoder.setup_camera_properties(camera);
        if !ctx.clear.is_empty() {
            encoder.clear_render_target(ctx.clear, ctx.background_color);
        }

        encoder.begin_sample(RENDER_CAMERA_SAMPLE);
        self.forward_lane
            .bind_light_uniforms(encoder, &self.light_buffer);
        self.forward_lane
            .render(encoder, camera, &cull.visible_renderers, has_lights);

        #[cfg(any(debug_assertions, feature = "diagnostics"))]
        if let Err(e) = self.diagnostic_lane.render(encoder, &cull.visible_renderers) {
            log::warn!("Diagnostic pass skipped for camera '{}': {e}", camera.name);
            stats.warnings.push(FrameError::DiagnosticPass(e));
        }

        encoder.end_sample(RENDER_CAMERA_SAMPLE);
        encoder.submit();

        stats.keywords = ctx.keywords;
        Ok(stats)
    }
}
