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

use penumbra_core::math::{LinearRgba, Mat4, Rect, Vec4};
use penumbra_core::renderer::{
    ClearFlags, DrawRendererSettings, FilterRenderersSettings, MaterialId, RenderTargetBinding,
    RendererId, ShaderKeyword, ShaderPropertyId, ShadowDrawSettings, TemporaryTextureDescriptor,
    TextureId,
};
use std::fmt;

/// One command captured by the [`RecordingEncoder`](super::RecordingEncoder).
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCommand {
    GetTemporaryTexture {
        texture: TextureId,
        descriptor: TemporaryTextureDescriptor,
    },
    ReleaseTemporaryTexture(TextureId),
    CreateMaterial {
        material: MaterialId,
        shader: String,
    },
    SetRenderTarget(RenderTargetBinding),
    SetupCameraProperties {
        camera: String,
    },
    ClearRenderTarget {
        flags: ClearFlags,
        color: LinearRgba,
    },
    SetViewport(Rect),
    EnableScissorRect(Rect),
    DisableScissorRect,
    SetViewProjectionMatrices {
        view: Mat4,
        projection: Mat4,
    },
    SetGlobal(ShaderPropertyId, GlobalValue),
    EnableKeyword(ShaderKeyword),
    DisableKeyword(ShaderKeyword),
    BeginSample(String),
    EndSample(String),
    /// Only the renderers that passed the filter are recorded.
    DrawRenderers {
        renderers: Vec<RendererId>,
        settings: DrawRendererSettings,
        filter: FilterRenderersSettings,
    },
    DrawSkybox {
        camera: String,
    },
    DrawShadows(ShadowDrawSettings),
    Submit,
}

impl RecordedCommand {
    /// A short name for logs.
    pub fn label(&self) -> &'static str {
        match self {
            RecordedCommand::GetTemporaryTexture { .. } => "GetTemporaryTexture",
            RecordedCommand::ReleaseTemporaryTexture(_) => "ReleaseTemporaryTexture",
            RecordedCommand::CreateMaterial { .. } => "CreateMaterial",
            RecordedCommand::SetRenderTarget(_) => "SetRenderTarget",
            RecordedCommand::SetupCameraProperties { .. } => "SetupCameraProperties",
            RecordedCommand::ClearRenderTarget { .. } => "ClearRenderTarget",
            RecordedCommand::SetViewport(_) => "SetViewport",
            RecordedCommand::EnableScissorRect(_) => "EnableScissorRect",
            RecordedCommand::DisableScissorRect => "DisableScissorRect",
            RecordedCommand::SetViewProjectionMatrices { .. } => "SetViewProjectionMatrices",
            RecordedCommand::SetGlobal(..) => "SetGlobal",
            RecordedCommand::EnableKeyword(_) => "EnableKeyword",
            RecordedCommand::DisableKeyword(_) => "DisableKeyword",
            RecordedCommand::BeginSample(_) => "BeginSample",
            RecordedCommand::EndSample(_) => "EndSample",
            RecordedCommand::DrawRenderers { .. } => "DrawRenderers",
            RecordedCommand::DrawSkybox { .. } => "DrawSkybox",
            RecordedCommand::DrawShadows(_) => "DrawShadows",
            RecordedCommand::Submit => "Submit",
        }
    }
}

impl fmt::Display for RecordedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordedCommand::SetGlobal(id, value) => write!(f, "SetGlobal {id} = {value}"),
            RecordedCommand::EnableKeyword(k) => write!(f, "EnableKeyword {k}"),
            RecordedCommand::DisableKeyword(k) => write!(f, "DisableKeyword {k}"),
            RecordedCommand::BeginSample(name) => write!(f, "BeginSample \"{name}\""),
            RecordedCommand::EndSample(name) => write!(f, "EndSample \"{name}\""),
            RecordedCommand::DrawRenderers {
                renderers,
                settings,
                ..
            } => write!(
                f,
                "DrawRenderers {} objects, {:?}",
                renderers.len(),
                settings.sorting
            ),
            RecordedCommand::SetViewport(r) => write!(
                f,
                "SetViewport ({}, {}, {}x{})",
                r.x, r.y, r.width, r.height
            ),
            other => f.write_str(other.label()),
        }
    }
}

/// The value of a global shader property.
#[derive(Debug, Clone, PartialEq)]
pub enum GlobalValue {
    Float(f32),
    Vector(Vec4),
    VectorArray(Vec<Vec4>),
    Matrix(Mat4),
    MatrixArray(Vec<Mat4>),
    Texture(TextureId),
}

impl fmt::Display for GlobalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlobalValue::Float(v) => write!(f, "{v}"),
            GlobalValue::Vector(v) => write!(f, "({}, {}, {}, {})", v.x, v.y, v.z, v.w),
            GlobalValue::VectorArray(a) => write!(f, "[{} vectors]", a.len()),
            GlobalValue::Matrix(_) => f.write_str("matrix"),
            GlobalValue::MatrixArray(a) => write!(f, "[{} matrices]", a.len()),
            GlobalValue::Texture(t) => write!(f, "texture #{}", t.0),
        }
    }
}
