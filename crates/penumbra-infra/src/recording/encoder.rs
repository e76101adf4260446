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

use super::command::{GlobalValue, RecordedCommand};
use penumbra_core::math::{LinearRgba, Mat4, Rect, Vec4};
use penumbra_core::renderer::{
    Camera, ClearFlags, CommandEncoder, DrawRendererSettings, FilterRenderersSettings, MaterialId,
    RenderError, RenderTargetBinding, ShaderKeyword, ShaderKeywords, ShaderPropertyId,
    ShadowDrawSettings, TemporaryTextureDescriptor, TextureId, VisibleRenderer,
};
use std::collections::{HashMap, HashSet};

/// A headless [`CommandEncoder`] that records every command in issue order.
///
/// Besides the raw command list it tracks the state a GPU backend would
/// hold: live temporary textures, global shader properties and keywords.
#[derive(Debug, Default)]
pub struct RecordingEncoder {
    commands: Vec<RecordedCommand>,
    reversed_z: bool,
    next_texture: u64,
    next_material: u64,
    live_textures: HashSet<TextureId>,
    /// Maximum number of live temporary textures, `None` for unlimited.
    texture_budget: Option<usize>,
    failing_shaders: HashSet<String>,
    globals: HashMap<ShaderPropertyId, GlobalValue>,
    keywords: ShaderKeywords,
    open_samples: Vec<String>,
    submit_count: usize,
}

impl RecordingEncoder {
    /// Creates an encoder with a conventional depth buffer and no limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emulates a device with a reversed depth buffer.
    pub fn with_reversed_z(mut self, reversed_z: bool) -> Self {
        self.reversed_z = reversed_z;
        self
    }

    /// Fails texture allocation once `budget` textures are live.
    pub fn with_texture_budget(mut self, budget: usize) -> Self {
        self.texture_budget = Some(budget);
        self
    }

    /// Fails material creation for `shader`.
    pub fn with_failing_shader(mut self, shader: impl Into<String>) -> Self {
        self.failing_shaders.insert(shader.into());
        self
    }

    /// Every command recorded so far.
    pub fn commands(&self) -> &[RecordedCommand] {
        &self.commands
    }

    /// Drains the recorded commands, keeping the tracked state.
    pub fn take_commands(&mut self) -> Vec<RecordedCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Temporary textures acquired and not yet released.
    pub fn live_texture_count(&self) -> usize {
        self.live_textures.len()
    }

    /// Currently enabled keywords.
    pub fn keywords(&self) -> ShaderKeywords {
        self.keywords
    }

    /// How many times [`submit`](CommandEncoder::submit) was called.
    pub fn submit_count(&self) -> usize {
        self.submit_count
    }

    /// The current value of a global property.
    pub fn global(&self, id: ShaderPropertyId) -> Option<&GlobalValue> {
        self.globals.get(&id)
    }

    /// The current value of a global vector property.
    pub fn global_vector(&self, id: ShaderPropertyId) -> Option<Vec4> {
        match self.globals.get(&id) {
            Some(GlobalValue::Vector(v)) => Some(*v),
            _ => None,
        }
    }

    /// The current value of a global vector array property.
    pub fn global_vector_array(&self, id: ShaderPropertyId) -> Option<&[Vec4]> {
        match self.globals.get(&id) {
            Some(GlobalValue::VectorArray(v)) => Some(v),
            _ => None,
        }
    }

    /// The current value of a global matrix property.
    pub fn global_matrix(&self, id: ShaderPropertyId) -> Option<Mat4> {
        match self.globals.get(&id) {
            Some(GlobalValue::Matrix(m)) => Some(*m),
            _ => None,
        }
    }

    /// The current value of a global matrix array property.
    pub fn global_matrix_array(&self, id: ShaderPropertyId) -> Option<&[Mat4]> {
        match self.globals.get(&id) {
            Some(GlobalValue::MatrixArray(m)) => Some(m),
            _ => None,
        }
    }

    /// Index of the first recorded command matching `predicate`.
    pub fn position(&self, predicate: impl Fn(&RecordedCommand) -> bool) -> Option<usize> {
        self.commands.iter().position(predicate)
    }

    fn set_global(&mut self, id: ShaderPropertyId, value: GlobalValue) {
        self.globals.insert(id, value.clone());
        self.commands.push(RecordedCommand::SetGlobal(id, value));
    }
}

impl CommandEncoder for RecordingEncoder {
    fn uses_reversed_z(&self) -> bool {
        self.reversed_z
    }

    fn get_temporary_texture(
        &mut self,
        descriptor: &TemporaryTextureDescriptor,
    ) -> Result<TextureId, RenderError> {
        if let Some(budget) = self.texture_budget {
            if self.live_textures.len() >= budget {
                return Err(RenderError::TextureAllocationFailed {
                    descriptor: descriptor.clone(),
                    details: format!("temporary texture budget of {budget} exhausted"),
                });
            }
        }
        self.next_texture += 1;
        let texture = TextureId(self.next_texture);
        self.live_textures.insert(texture);
        self.commands.push(RecordedCommand::GetTemporaryTexture {
            texture,
            descriptor: descriptor.clone(),
        });
        Ok(texture)
    }

    fn release_temporary_texture(&mut self, texture: TextureId) {
        if !self.live_textures.remove(&texture) {
            log::warn!("RecordingEncoder: released unknown texture {:?}", texture);
        }
        self.commands
            .push(RecordedCommand::ReleaseTemporaryTexture(texture));
    }

    fn create_material(&mut self, shader_name: &str) -> Result<MaterialId, RenderError> {
        if self.failing_shaders.contains(shader_name) {
            return Err(RenderError::MaterialCreationFailed {
                shader: shader_name.to_owned(),
            });
        }
        self.next_material += 1;
        let material = MaterialId(self.next_material);
        self.commands.push(RecordedCommand::CreateMaterial {
            material,
            shader: shader_name.to_owned(),
        });
        Ok(material)
    }

    fn set_render_target(&mut self, target: &RenderTargetBinding) {
        if !self.live_textures.contains(&target.texture) {
            log::warn!(
                "RecordingEncoder: render target {:?} is not a live texture",
                target.texture
            );
        }
        self.commands.push(RecordedCommand::SetRenderTarget(*target));
    }

    fn setup_camera_properties(&mut self, camera: &Camera) {
        self.commands.push(RecordedCommand::SetupCameraProperties {
            camera: camera.name.clone(),
        });
    }

    fn clear_render_target(&mut self, flags: ClearFlags, color: LinearRgba) {
        self.commands
            .push(RecordedCommand::ClearRenderTarget { flags, color });
    }

    fn set_viewport(&mut self, viewport: Rect) {
        self.commands.push(RecordedCommand::SetViewport(viewport));
    }

    fn enable_scissor_rect(&mut self, rect: Rect) {
        self.commands.push(RecordedCommand::EnableScissorRect(rect));
    }

    fn disable_scissor_rect(&mut self) {
        self.commands.push(RecordedCommand::DisableScissorRect);
    }

    fn set_view_projection_matrices(&mut self, view: &Mat4, projection: &Mat4) {
        self.commands.push(RecordedCommand::SetViewProjectionMatrices {
            view: *view,
            projection: *projection,
        });
    }

    fn set_global_float(&mut self, id: ShaderPropertyId, value: f32) {
        self.set_global(id, GlobalValue::Float(value));
    }

    fn set_global_vector(&mut self, id: ShaderPropertyId, value: Vec4) {
        self.set_global(id, GlobalValue::Vector(value));
    }

    fn set_global_vector_array(&mut self, id: ShaderPropertyId, values: &[Vec4]) {
        self.set_global(id, GlobalValue::VectorArray(values.to_vec()));
    }

    fn set_global_matrix(&mut self, id: ShaderPropertyId, value: &Mat4) {
        self.set_global(id, GlobalValue::Matrix(*value));
    }

    fn set_global_matrix_array(&mut self, id: ShaderPropertyId, values: &[Mat4]) {
        self.set_global(id, GlobalValue::MatrixArray(values.to_vec()));
    }

    fn set_global_texture(&mut self, id: ShaderPropertyId, texture: TextureId) {
        if !self.live_textures.contains(&texture) {
            log::warn!("RecordingEncoder: binding dead texture {:?} to {}", texture, id);
        }
        self.set_global(id, GlobalValue::Texture(texture));
    }

    fn enable_keyword(&mut self, keyword: ShaderKeyword) {
        self.keywords.set(keyword, true);
        self.commands.push(RecordedCommand::EnableKeyword(keyword));
    }

    fn disable_keyword(&mut self, keyword: ShaderKeyword) {
        self.keywords.set(keyword, false);
        self.commands.push(RecordedCommand::DisableKeyword(keyword));
    }

    fn begin_sample(&mut self, name: &str) {
        self.open_samples.push(name.to_owned());
        self.commands
            .push(RecordedCommand::BeginSample(name.to_owned()));
    }

    fn end_sample(&mut self, name: &str) {
        match self.open_samples.pop() {
            Some(open) if open == name => {}
            Some(open) => log::warn!(
                "RecordingEncoder: sample \"{name}\" closed while \"{open}\" is open"
            ),
            None => log::warn!("RecordingEncoder: sample \"{name}\" closed but never opened"),
        }
        self.commands.push(RecordedCommand::EndSample(name.to_owned()));
    }

    fn draw_renderers(
        &mut self,
        renderers: &[VisibleRenderer],
        settings: &DrawRendererSettings,
        filter: &FilterRenderersSettings,
    ) {
        let accepted = renderers
            .iter()
            .filter(|r| filter.accepts(r))
            .map(|r| r.id)
            .collect();
        self.commands.push(RecordedCommand::DrawRenderers {
            renderers: accepted,
            settings: settings.clone(),
            filter: filter.clone(),
        });
    }

    fn draw_skybox(&mut self, camera: &Camera) {
        self.commands.push(RecordedCommand::DrawSkybox {
            camera: camera.name.clone(),
        });
    }

    fn draw_shadows(&mut self, settings: &ShadowDrawSettings) {
        self.commands.push(RecordedCommand::DrawShadows(*settings));
    }

    fn submit(&mut self) {
        self.submit_count += 1;
        if !self.open_samples.is_empty() {
            log::warn!(
                "RecordingEncoder: submit with open samples {:?}",
                self.open_samples
            );
        }
        self.commands.push(RecordedCommand::Submit);
    }
}
