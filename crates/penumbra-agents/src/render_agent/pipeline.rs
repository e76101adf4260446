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

use super::{agent::ForwardRenderAgent, frame::FrameReport};
use anyhow::Context;
use penumbra_core::renderer::{
    Camera, CommandEncoder, PipelineSettings, SettingsError, VisibilityResolver,
};
use std::path::Path;

/// The public entry point of the renderer.
///
/// A pipeline is created once from validated [`PipelineSettings`] and then
/// asked to render a list of cameras every frame.
///
/// # Examples
///
/// ```
/// use penumbra_agents::ForwardPipeline;
/// use penumbra_core::renderer::PipelineSettings;
///
/// let pipeline = ForwardPipeline::new(PipelineSettings::default()).unwrap();
/// assert_eq!(pipeline.settings().max_visible_lights, 16);
/// ```
pub struct ForwardPipeline {
    agent: ForwardRenderAgent,
}

impl ForwardPipeline {
    /// Validates `settings` and builds the pipeline.
    pub fn new(settings: PipelineSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        log::info!(
            "ForwardPipeline: {} light slots, {}px shadow atlas, shadow distance {}",
            settings.max_visible_lights,
            settings.shadow_map_size.pixels(),
            settings.shadow_distance
        );
        Ok(Self {
            agent: ForwardRenderAgent::new(settings),
        })
    }

    /// Builds the pipeline from a RON settings file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let settings = PipelineSettings::load(path)?;
        Self::new(settings)
            .with_context(|| format!("Cannot build pipeline from '{}'", path.display()))
    }

    /// The settings the pipeline was built from.
    pub fn settings(&self) -> &PipelineSettings {
        self.agent.settings()
    }

    /// The agent doing the work.
    pub fn agent(&self) -> &ForwardRenderAgent {
        &self.agent
    }

    /// Renders every camera in order. See [`ForwardRenderAgent::render`].
    pub fn render(
        &mut self,
        encoder: &mut dyn CommandEncoder,
        resolver: &mut dyn VisibilityResolver,
        cameras: &[Camera],
    ) -> FrameReport {
        self.agent.render(encoder, resolver, cameras)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_settings_are_rejected() {
        let settings = PipelineSettings {
            max_visible_lights: 0,
            ..Default::default()
        };
        assert!(matches!(
            ForwardPipeline::new(settings),
            Err(SettingsError::InvalidMaxVisibleLights(0))
        ));
    }

    #[test]
    fn test_light_buffer_sized_from_settings() {
        let settings = PipelineSettings {
            max_visible_lights: 8,
            ..Default::default()
        };
        let pipeline = ForwardPipeline::new(settings).unwrap();
        assert_eq!(pipeline.agent().light_buffer().capacity(), 8);
        assert_eq!(pipeline.agent().frame_count(), 0);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = ForwardPipeline::from_file("does/not/exist.ron")
            .err()
            .unwrap();
        assert!(format!("{err:#}").contains("does/not/exist.ron"));
    }
}
