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

//! Camera description consumed by the frame orchestrator.

use crate::math::{LinearRgba, Mat4, Rect, Vec3};

/// Where a camera comes from. Only scene-view cameras get editor geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CameraKind {
    /// A regular in-game camera.
    #[default]
    Game,
    /// The editor's scene view.
    SceneView,
    /// A thumbnail/preview camera.
    Preview,
}

/// What a camera clears before drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CameraClearMode {
    /// Clear depth; the skybox pass covers the color buffer.
    #[default]
    Skybox,
    /// Clear depth and color to the background color.
    SolidColor,
    /// Clear depth only.
    DepthOnly,
    /// Clear nothing.
    Nothing,
}

impl CameraClearMode {
    /// Returns `true` if the depth buffer must be cleared.
    #[inline]
    pub fn clears_depth(self) -> bool {
        !matches!(self, CameraClearMode::Nothing)
    }

    /// Returns `true` if the color buffer must be cleared.
    #[inline]
    pub fn clears_color(self) -> bool {
        matches!(self, CameraClearMode::SolidColor)
    }
}

/// A camera to render this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// A name used in logs.
    pub name: String,
    /// The camera's origin.
    pub kind: CameraKind,
    /// World-to-camera matrix.
    pub view: Mat4,
    /// Camera-to-clip matrix.
    pub projection: Mat4,
    /// World-space position of the camera.
    pub position: Vec3,
    /// Near clipping plane distance.
    pub near_clip: f32,
    /// Far clipping plane distance.
    pub far_clip: f32,
    /// Target rectangle in pixels.
    pub pixel_rect: Rect,
    /// Clear behavior.
    pub clear_mode: CameraClearMode,
    /// Color used when `clear_mode` clears color.
    pub background_color: LinearRgba,
}

impl Camera {
    /// Creates a perspective camera at `eye` looking at `target`.
    ///
    /// A degenerate orientation leaves the view matrix at identity; the
    /// visibility resolver is expected to reject such cameras.
    pub fn perspective(
        name: impl Into<String>,
        eye: Vec3,
        target: Vec3,
        fov_y_degrees: f32,
        pixel_rect: Rect,
        near_clip: f32,
        far_clip: f32,
    ) -> Self {
        let aspect = if pixel_rect.height > 0.0 {
            pixel_rect.width / pixel_rect.height
        } else {
            1.0
        };
        Self {
            name: name.into(),
            kind: CameraKind::Game,
            view: Mat4::look_at_rh(eye, target, Vec3::Y).unwrap_or(Mat4::IDENTITY),
            projection: Mat4::perspective_rh_no(
                fov_y_degrees.to_radians(),
                aspect,
                near_clip,
                far_clip,
            ),
            position: eye,
            near_clip,
            far_clip,
            pixel_rect,
            clear_mode: CameraClearMode::Skybox,
            background_color: LinearRgba::BLACK,
        }
    }

    /// Returns the camera with a different clear mode and background color.
    pub fn with_clear(mut self, mode: CameraClearMode, background: LinearRgba) -> Self {
        self.clear_mode = mode;
        self.background_color = background;
        self
    }

    /// Returns the camera with a different [`CameraKind`].
    pub fn with_kind(mut self, kind: CameraKind) -> Self {
        self.kind = kind;
        self
    }

    /// Combined world-to-clip matrix.
    #[inline]
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}
