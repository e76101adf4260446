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

//! Defines the error types shared by the renderer contracts.

use super::light::LightKind;
use super::texture::TemporaryTextureDescriptor;
use std::fmt;

/// An error reported by a command backend.
#[derive(Debug)]
pub enum RenderError {
    /// A temporary texture could not be allocated.
    TextureAllocationFailed {
        /// The descriptor that was requested.
        descriptor: TemporaryTextureDescriptor,
        /// Backend-specific details.
        details: String,
    },
    /// A material could not be created for the named shader.
    MaterialCreationFailed {
        /// The shader the material was requested for.
        shader: String,
    },
    /// Any other backend failure.
    Backend(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::TextureAllocationFailed {
                descriptor,
                details,
            } => write!(
                f,
                "Failed to allocate {}x{} {:?} texture: {details}",
                descriptor.width, descriptor.height, descriptor.format
            ),
            RenderError::MaterialCreationFailed { shader } => {
                write!(f, "Failed to create material for shader '{shader}'")
            }
            RenderError::Backend(msg) => write!(f, "Backend error: {msg}"),
        }
    }
}

impl std::error::Error for RenderError {}

/// Why a visibility resolver could not produce shadow matrices for a light.
///
/// Always recoverable: the light simply renders unshadowed this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ShadowMatrixError {
    /// The light index does not name a visible light.
    InvalidLightIndex(usize),
    /// The light's shadow frustum is degenerate (zero range, zero cone, ...).
    DegenerateFrustum {
        /// The light in question.
        light_index: usize,
    },
    /// Nothing in the light's frustum casts shadows.
    NoShadowCasters {
        /// The light in question.
        light_index: usize,
    },
    /// The light kind has no single-tile shadow projection.
    UnsupportedLightKind(LightKind),
}

impl fmt::Display for ShadowMatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShadowMatrixError::InvalidLightIndex(i) => {
                write!(f, "No visible light at index {i}")
            }
            ShadowMatrixError::DegenerateFrustum { light_index } => {
                write!(f, "Shadow frustum of light {light_index} is degenerate")
            }
            ShadowMatrixError::NoShadowCasters { light_index } => {
                write!(f, "Light {light_index} has no shadow casters")
            }
            ShadowMatrixError::UnsupportedLightKind(kind) => {
                write!(f, "{kind:?} lights cannot be rendered into a shadow atlas tile")
            }
        }
    }
}

impl std::error::Error for ShadowMatrixError {}
