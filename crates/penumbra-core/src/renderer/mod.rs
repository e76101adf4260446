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


//! Provides the backend-agnostic contracts of the forward renderer.
//!
//! This module defines the "common language" shared by every stage of the
//! frame: the light and camera data model, the fixed shader property table,
//! draw and texture descriptors, and the two collaborator traits
//! ([`CommandEncoder`] and [`VisibilityResolver`]).
//!
//! The 'what' of rendering lives here, while the 'how' is handled by a
//! concrete backend in `penumbra-infra`. `penumbra-lanes` and
//! `penumbra-agents` only ever talk to these traits.

pub mod camera;
pub mod culling;
pub mod draw;
pub mod error;
pub mod light;
pub mod settings;
pub mod shader;
pub mod texture;
pub mod traits;

pub use self::camera::{Camera, CameraClearMode, CameraKind};
pub use self::culling::{
    CullResults, CullingParameters, ShadowDrawSettings, ShadowMatrices, ShadowSplitData,
    INVALID_LIGHT_INDEX,
};
pub use self::draw::{
    DrawFlags, DrawRendererSettings, FilterRenderersSettings, MaterialId, RenderQueueRange,
    RendererConfiguration, RendererId, SortFlags, VisibleRenderer,
};
pub use self::error::{RenderError, ShadowMatrixError};
pub use self::light::{LightKind, LightShadows, VisibleLight};
pub use self::settings::{PipelineSettings, SettingsError, ShadowMapSize};
pub use self::shader::{ShaderKeyword, ShaderKeywords, ShaderPassName, ShaderPropertyId};
pub use self::texture::{
    ClearFlags, FilterMode, LoadAction, RenderTargetBinding, StoreAction,
    TemporaryTextureDescriptor, TextureFormat, TextureId, WrapMode,
};
pub use self::traits::{CommandEncoder, VisibilityResolver};
