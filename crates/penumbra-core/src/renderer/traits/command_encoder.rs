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

use crate::math::{LinearRgba, Mat4, Rect, Vec4};
use crate::renderer::camera::Camera;
use crate::renderer::culling::ShadowDrawSettings;
use crate::renderer::draw::{
    DrawRendererSettings, FilterRenderersSettings, MaterialId, VisibleRenderer,
};
use crate::renderer::error::RenderError;
use crate::renderer::shader::{ShaderKeyword, ShaderPropertyId};
use crate::renderer::texture::{
    ClearFlags, RenderTargetBinding, TemporaryTextureDescriptor, TextureId,
};

/// A trait for an object that records the renderer's GPU command stream.
///
/// The renderer issues commands strictly in frame order; the backend executes
/// them in the order they were recorded. There is no explicit synchronization:
/// ordering is established by issue order alone, and [`submit`](Self::submit)
/// hands everything recorded so far to the GPU.
///
/// Global shader state (properties and keywords) set through the encoder
/// persists until overwritten, across cameras.
pub trait CommandEncoder {
    /// Returns `true` if the device uses a reversed depth buffer (near = 1, far = 0).
    fn uses_reversed_z(&self) -> bool;

    /// Acquires a temporary texture for the rest of the frame.
    fn get_temporary_texture(
        &mut self,
        descriptor: &TemporaryTextureDescriptor,
    ) -> Result<TextureId, RenderError>;

    /// Returns a texture obtained from [`get_temporary_texture`](Self::get_temporary_texture).
    fn release_temporary_texture(&mut self, texture: TextureId);

    /// Creates a material for the named shader.
    fn create_material(&mut self, shader_name: &str) -> Result<MaterialId, RenderError>;

    /// Binds a texture as the render target.
    fn set_render_target(&mut self, target: &RenderTargetBinding);

    /// Binds the camera's target and sets its view/projection matrices.
    fn setup_camera_properties(&mut self, camera: &Camera);

    /// Clears the current render target.
    fn clear_render_target(&mut self, flags: ClearFlags, color: LinearRgba);

    /// Sets the viewport within the current render target.
    fn set_viewport(&mut self, viewport: Rect);

    /// Restricts rasterization to `rect`.
    fn enable_scissor_rect(&mut self, rect: Rect);

    /// Lifts any scissor restriction.
    fn disable_scissor_rect(&mut self);

    /// Sets the view and projection matrices used by subsequent draws.
    fn set_view_projection_matrices(&mut self, view: &Mat4, projection: &Mat4);

    /// Sets a global float property.
    fn set_global_float(&mut self, id: ShaderPropertyId, value: f32);

    /// Sets a global vector property.
    fn set_global_vector(&mut self, id: ShaderPropertyId, value: Vec4);

    /// Sets a global vector array property.
    fn set_global_vector_array(&mut self, id: ShaderPropertyId, values: &[Vec4]);

    /// Sets a global matrix property.
    fn set_global_matrix(&mut self, id: ShaderPropertyId, value: &Mat4);

    /// Sets a global matrix array property.
    fn set_global_matrix_array(&mut self, id: ShaderPropertyId, values: &[Mat4]);

    /// Sets a global texture property.
    fn set_global_texture(&mut self, id: ShaderPropertyId, texture: TextureId);

    /// Enables a global shader keyword.
    fn enable_keyword(&mut self, keyword: ShaderKeyword);

    /// Disables a global shader keyword.
    fn disable_keyword(&mut self, keyword: ShaderKeyword);

    /// Enables or disables a global shader keyword.
    fn set_keyword(&mut self, keyword: ShaderKeyword, enabled: bool) {
        if enabled {
            self.enable_keyword(keyword);
        } else {
            self.disable_keyword(keyword);
        }
    }

    /// Opens a named profiling sample.
    fn begin_sample(&mut self, name: &str);

    /// Closes a named profiling sample.
    fn end_sample(&mut self, name: &str);

    /// Draws the renderers that pass `filter`, using `settings`.
    fn draw_renderers(
        &mut self,
        renderers: &[VisibleRenderer],
        settings: &DrawRendererSettings,
        filter: &FilterRenderersSettings,
    );

    /// Draws the camera's skybox.
    fn draw_skybox(&mut self, camera: &Camera);

    /// Draws one light's shadow casters into the current render target.
    fn draw_shadows(&mut self, settings: &ShadowDrawSettings);

    /// Hands everything recorded so far to the GPU.
    fn submit(&mut self);
}
