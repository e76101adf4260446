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

//! Per-camera scratch state and the report returned for a frame.

use penumbra_core::{
    math::LinearRgba,
    renderer::{
        Camera, ClearFlags, CommandEncoder, RenderError, ShaderKeyword, ShaderKeywords, TextureId,
    },
};
use penumbra_lanes::ShadowPassError;
use thiserror::Error;

/// Something that went wrong while rendering a camera.
///
/// `CullingUnavailable` skips the camera. The other variants only degrade
/// it and are reported in [`CameraStats::warnings`].
#[derive(Debug, Error)]
pub enum FrameError {
    /// The resolver could not produce culling parameters; nothing was issued.
    #[error("camera '{camera}' cannot be culled")]
    CullingUnavailable {
        /// Name of the skipped camera.
        camera: String,
    },
    /// The shadow pass could not run; every light rendered unshadowed.
    #[error("shadow pass skipped: {0}")]
    ShadowPass(#[from] ShadowPassError),
    /// The diagnostic pass could not run.
    #[error("diagnostic pass skipped: {0}")]
    DiagnosticPass(#[source] RenderError),
}

/// Scratch state of one camera, created at its start and dropped at its end.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameContext<'a> {
    /// The camera being rendered, with its view and projection.
    pub camera: &'a Camera,
    /// Buffers cleared before drawing.
    pub clear: ClearFlags,
    /// Color used when clearing color.
    pub background_color: LinearRgba,
    /// Shadow keywords in effect for this camera.
    pub keywords: ShaderKeywords,
    /// The shadow atlas surface, if one was acquired.
    pub(crate) shadow_texture: Option<TextureId>,
}

impl<'a> FrameContext<'a> {
    /// Captures the camera state the frame needs.
    pub fn for_camera(camera: &'a Camera) -> Self {
        Self {
            camera,
            clear: ClearFlags::from_parts(
                camera.clear_mode.clears_depth(),
                camera.clear_mode.clears_color(),
            ),
            background_color: camera.background_color,
            keywords: ShaderKeywords::NONE,
            shadow_texture: None,
        }
    }

    /// Disables both shadow keywords.
    pub fn disable_shadows(&mut self, encoder: &mut dyn CommandEncoder) {
        for keyword in [ShaderKeyword::ShadowsHard, ShaderKeyword::ShadowsSoft] {
            encoder.disable_keyword(keyword);
            self.keywords.set(keyword, false);
        }
    }
}

/// What the renderer did for a camera that produced an image.
#[derive(Debug, Default)]
pub struct CameraStats {
    /// Renderers returned by the cull.
    pub visible_renderers: usize,
    /// Lights returned by the cull.
    pub visible_lights: usize,
    /// Slots packed into the light buffer.
    pub active_lights: usize,
    /// Lights dropped from per-object lighting because of capacity.
    pub overflow_lights: usize,
    /// Tiles rendered into the shadow atlas.
    pub shadow_tiles: usize,
    /// Shadow keywords in effect while drawing.
    pub keywords: ShaderKeywords,
    /// Recoverable problems met along the way.
    pub warnings: Vec<FrameError>,
}

/// The result of one camera.
#[derive(Debug)]
pub enum CameraOutcome {
    /// The camera was rendered and submitted.
    Rendered(CameraStats),
    /// The camera produced no image this frame.
    Skipped(FrameError),
}

impl CameraOutcome {
    /// Returns `true` if the camera was rendered.
    pub fn is_rendered(&self) -> bool {
        matches!(self, CameraOutcome::Rendered(_))
    }

    /// The stats of a rendered camera.
    pub fn stats(&self) -> Option<&CameraStats> {
        match self {
            CameraOutcome::Rendered(stats) => Some(stats),
            CameraOutcome::Skipped(_) => None,
        }
    }
}

/// One camera's entry in a [`FrameReport`].
#[derive(Debug)]
pub struct CameraReport {
    /// Name of the camera.
    pub camera: String,
    /// What happened to it.
    pub outcome: CameraOutcome,
}

/// The result of rendering a list of cameras, in camera order.
#[derive(Debug, Default)]
pub struct FrameReport {
    /// One entry per camera.
    pub cameras: Vec<CameraReport>,
}

impl FrameReport {
    /// Number of cameras that produced an image.
    pub fn rendered_count(&self) -> usize {
        self.cameras.iter().filter(|c| c.outcome.is_rendered()).count()
    }

    /// Number of cameras that were skipped.
    pub fn skipped_count(&self) -> usize {
        self.cameras.len() - self.rendered_count()
    }

    /// The outcome of the camera named `name`.
    pub fn outcome(&self, name: &str) -> Option<&CameraOutcome> {
        self.cameras
            .iter()
            .find(|c| c.camera == name)
            .map(|c| &c.outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use penumbra_core::math::{Rect, Vec3};
    use penumbra_core::renderer::CameraClearMode;

    fn camera(mode: CameraClearMode) -> Camera {
        Camera::perspective(
            "Cam",
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::ZERO,
            60.0,
            Rect::new(0.0, 0.0, 100.0, 100.0),
            0.1,
            50.0,
        )
        .with_clear(mode, LinearRgba::new(0.1, 0.2, 0.3, 1.0))
    }

    #[test]
    fn test_clear_flags_follow_clear_mode() {
        let solid = camera(CameraClearMode::SolidColor);
        let ctx = FrameContext::for_camera(&solid);
        assert!(ctx.clear.depth() && ctx.clear.color());
        assert_eq!(ctx.background_color, LinearRgba::new(0.1, 0.2, 0.3, 1.0));
        assert_eq!(ctx.camera.view_projection(), solid.view_projection());
        assert!(ctx.keywords.is_empty());

        let skybox = camera(CameraClearMode::Skybox);
        let ctx = FrameContext::for_camera(&skybox);
        assert!(ctx.clear.depth() && !ctx.clear.color());

        let nothing = camera(CameraClearMode::Nothing);
        assert!(FrameContext::for_camera(&nothing).clear.is_empty());
    }

    #[test]
    fn test_report_counts() {
        let report = FrameReport {
            cameras: vec![
                CameraReport {
                    camera: "A".into(),
                    outcome: CameraOutcome::Rendered(CameraStats::default()),
                },
                CameraReport {
                    camera: "B".into(),
                    outcome: CameraOutcome::Skipped(FrameError::CullingUnavailable {
                        camera: "B".into(),
                    }),
                },
            ],
        };
        assert_eq!(report.rendered_count(), 1);
        assert_eq!(report.skipped_count(), 1);
        assert!(report.outcome("B").is_some_and(|o| !o.is_rendered()));
        assert_eq!(
            FrameError::CullingUnavailable { camera: "B".into() }.to_string(),
            "camera 'B' cannot be culled"
        );
    }
}
