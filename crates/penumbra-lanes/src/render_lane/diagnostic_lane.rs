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

//! Diagnostic lane - draws objects the pipeline cannot shade with an error material.
//!
//! Only compiled with `debug_assertions` or the `diagnostics` feature.

use penumbra_core::{
    lane::{Lane, LaneKind},
    renderer::{
        CommandEncoder, DrawRendererSettings, FilterRenderersSettings, MaterialId, RenderError,
        ShaderPassName, VisibleRenderer,
    },
};
use std::sync::RwLock;

/// Shader of the error material.
pub const ERROR_SHADER: &str = "Hidden/InternalErrorShader";

/// Highlights renderers whose shaders only have legacy passes.
#[derive(Debug, Default)]
pub struct DiagnosticLane {
    /// Created on first use and reused for every camera after that.
    error_material: RwLock<Option<MaterialId>>,
}

impl DiagnosticLane {
    /// Creates the lane. The error material is created on first draw.
    pub fn new() -> Self {
        Self::default()
    }

    /// The error material, if it has been created.
    pub fn error_material(&self) -> Option<MaterialId> {
        *self
            .error_material
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn get_or_create_material(
        &self,
        encoder: &mut dyn CommandEncoder,
    ) -> Result<MaterialId, RenderError> {
        let mut slot = self
            .error_material
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(material) = *slot {
            return Ok(material);
        }
        let material = encoder.create_material(ERROR_SHADER)?;
        log::debug!("Created diagnostic error material {material:?}");
        *slot = Some(material);
        Ok(material)
    }

    /// Draws every renderer through the legacy passes with the error material.
    pub fn render(
        &self,
        encoder: &mut dyn CommandEncoder,
        renderers: &[VisibleRenderer],
    ) -> Result<(), RenderError> {
        let material = self.get_or_create_material(encoder)?;
        let settings = DrawRendererSettings {
            pass_names: ShaderPassName::LEGACY.to_vec(),
            override_material: Some(material),
            ..DrawRendererSettings::new(ShaderPassName::LEGACY[0])
        };
        encoder.draw_renderers(renderers, &settings, &FilterRenderersSettings::default());
        Ok(())
    }
}

impl Lane for DiagnosticLane {
    fn strategy_name(&self) -> &'static str {
        "Diagnostic"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Diagnostic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use penumbra_core::math::{Aabb, Vec3};
    use penumbra_core::renderer::{RenderQueueRange, RendererId};
    use penumbra_infra::recording::{RecordedCommand, RecordingEncoder};

    fn renderers() -> Vec<VisibleRenderer> {
        vec![VisibleRenderer {
            id: RendererId(7),
            render_queue: 4000,
            bounds: Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ONE),
            casts_shadows: false,
        }]
    }

    #[test]
    fn test_material_created_once() {
        let lane = DiagnosticLane::new();
        let mut encoder = RecordingEncoder::new();

        lane.render(&mut encoder, &renderers()).unwrap();
        lane.render(&mut encoder, &renderers()).unwrap();

        let created = encoder
            .commands()
            .iter()
            .filter(|c| matches!(c, RecordedCommand::CreateMaterial { .. }))
            .count();
        assert_eq!(created, 1);
        assert!(lane.error_material().is_some());
    }

    #[test]
    fn test_draws_legacy_passes_without_queue_filter() {
        let lane = DiagnosticLane::new();
        let mut encoder = RecordingEncoder::new();

        lane.render(&mut encoder, &renderers()).unwrap();

        let draw = encoder
            .commands()
            .iter()
            .find_map(|c| match c {
                RecordedCommand::DrawRenderers {
                    settings, filter, ..
                } => Some((settings.clone(), filter.clone())),
                _ => None,
            })
            .unwrap();
        assert_eq!(draw.0.pass_names, ShaderPassName::LEGACY.to_vec());
        assert_eq!(draw.0.override_material, lane.error_material());
        assert_eq!(draw.1.render_queue_range, RenderQueueRange::all());
    }

    #[test]
    fn test_material_failure_is_retried() {
        let lane = DiagnosticLane::new();
        let mut encoder = RecordingEncoder::new().with_failing_shader(ERROR_SHADER);

        assert!(lane.render(&mut encoder, &renderers()).is_err());
        assert!(lane.error_material().is_none());

        let mut encoder = RecordingEncoder::new();
        assert!(lane.render(&mut encoder, &renderers()).is_ok());
    }
}
