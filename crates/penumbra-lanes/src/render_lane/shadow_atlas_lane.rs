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

//! Shadow atlas lane - renders every shadow-casting light into one tiled depth surface.

use super::FrameLightBuffer;
use penumbra_core::{
    lane::{Lane, LaneKind},
    math::{Mat4, Rect, Vec3, Vec4},
    renderer::{
        ClearFlags, CommandEncoder, LightKind, LoadAction, RenderError, RenderTargetBinding,
        ShaderKeyword, ShaderKeywords, ShaderPropertyId, ShadowDrawSettings, ShadowMapSize,
        ShadowMatrices, ShadowMatrixError, StoreAction, TemporaryTextureDescriptor, TextureId,
        VisibilityResolver, VisibleLight,
    },
};
use thiserror::Error;

/// Pixels left unrendered around each tile so bilinear taps never cross seams.
pub const SHADOW_TILE_BORDER: f32 = 4.0;

/// Largest grid edge: 4 x 4 = 16 tiles.
pub const MAX_SHADOW_SPLIT: u32 = 4;

/// Profiling sample wrapping the shadow pass.
pub const RENDER_SHADOWS_SAMPLE: &str = "Render Shadows";

/// An error that prevents the shadow pass from running at all.
#[derive(Debug, Error)]
pub enum ShadowPassError {
    /// The backend could not provide the atlas surface.
    #[error("shadow atlas surface unavailable: {0}")]
    SurfaceUnavailable(#[from] RenderError),
}

/// The square grid the atlas is divided into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowGrid {
    /// Tiles per row and per column.
    pub split: u32,
    /// Edge length of a tile in pixels, floored.
    pub tile_size: f32,
}

impl ShadowGrid {
    /// The smallest grid that fits `tile_count` tiles, capped at 4 x 4.
    pub fn for_tile_count(tile_count: usize, resolution: u32) -> Self {
        let split = match tile_count {
            0..=1 => 1,
            2..=4 => 2,
            5..=9 => 3,
            _ => MAX_SHADOW_SPLIT,
        };
        Self {
            split,
            tile_size: (resolution / split) as f32,
        }
    }

    /// Number of tiles in the grid.
    #[inline]
    pub fn capacity(&self) -> usize {
        (self.split * self.split) as usize
    }

    /// Row-major `(x, y)` coordinates of tile `tile_index`.
    #[inline]
    pub fn tile_coords(&self, tile_index: usize) -> (u32, u32) {
        let index = tile_index as u32;
        (index % self.split, index / self.split)
    }

    /// Pixel viewport of tile `(x, y)`.
    pub fn tile_viewport(&self, tile_x: u32, tile_y: u32) -> Rect {
        Rect::new(
            tile_x as f32 * self.tile_size,
            tile_y as f32 * self.tile_size,
            self.tile_size,
            self.tile_size,
        )
    }
}

/// Where one light landed in the atlas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowTile {
    /// Slot of the light.
    pub light_index: usize,
    /// Grid column.
    pub tile_x: u32,
    /// Grid row.
    pub tile_y: u32,
    /// Pixel viewport of the tile.
    pub viewport: Rect,
    /// Region actually rasterized.
    pub scissor: Rect,
}

/// The shadow atlas built for one camera.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowAtlas {
    /// The transient surface. Must be released at the end of the camera.
    pub texture: TextureId,
    /// Edge length in pixels.
    pub resolution: u32,
    /// Tile layout.
    pub grid: ShadowGrid,
    /// Rendered tiles, in slot order.
    pub tiles: Vec<ShadowTile>,
    /// Some rendered light uses hard shadows.
    pub hard_shadows: bool,
    /// Some rendered light uses soft shadows.
    pub soft_shadows: bool,
}

impl ShadowAtlas {
    /// The shadow keywords this atlas enables.
    pub fn keywords(&self) -> ShaderKeywords {
        let mut keywords = ShaderKeywords::NONE;
        keywords.set(ShaderKeyword::ShadowsHard, self.hard_shadows);
        keywords.set(ShaderKeyword::ShadowsSoft, self.soft_shadows);
        keywords
    }
}

/// Remaps clip space `[-1, 1]` to texture space `[0, 1]` on every axis.
pub fn clip_to_texture_matrix() -> Mat4 {
    Mat4::from_scale_translation(Vec3::new(0.5, 0.5, 0.5), Vec3::new(0.5, 0.5, 0.5))
}

/// Squeezes texture space `[0, 1]` into tile `(tile_x, tile_y)` of a `split` grid.
pub fn tile_matrix(split: u32, tile_x: u32, tile_y: u32) -> Mat4 {
    let scale = 1.0 / split as f32;
    let mut m = Mat4::IDENTITY;
    m.set(0, 0, scale);
    m.set(1, 1, scale);
    m.set(0, 3, tile_x as f32 * scale);
    m.set(1, 3, tile_y as f32 * scale);
    m
}

/// Composes the world-to-atlas matrix of one light.
///
/// `reversed_z` flips the projection's depth row first, so depth comparisons
/// stay correct on reversed depth buffers.
pub fn world_to_shadow_matrix(
    matrices: &ShadowMatrices,
    reversed_z: bool,
    split: u32,
    tile_x: u32,
    tile_y: u32,
) -> Mat4 {
    let mut projection = matrices.projection;
    if reversed_z {
        projection.negate_row(2);
    }
    let world_to_shadow = clip_to_texture_matrix() * (projection * matrices.view);
    if split > 1 {
        tile_matrix(split, tile_x, tile_y) * world_to_shadow
    } else {
        world_to_shadow
    }
}

/// Renders the shadow casters of every eligible light into a tiled atlas.
#[derive(Debug, Clone)]
pub struct ShadowAtlasLane {
    resolution: u32,
}

impl ShadowAtlasLane {
    /// Creates a lane rendering into a `size` x `size` atlas.
    pub fn new(size: ShadowMapSize) -> Self {
        Self {
            resolution: size.pixels(),
        }
    }

    /// Edge length of the atlas in pixels.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    fn shadow_matrices(
        resolver: &dyn VisibilityResolver,
        light: &VisibleLight,
        light_index: usize,
    ) -> Result<ShadowMatrices, ShadowMatrixError> {
        match light.kind {
            LightKind::Spot => resolver.compute_spot_shadow_matrices(light_index),
            LightKind::Directional => resolver.compute_directional_shadow_matrices(light_index),
            LightKind::Point => Err(ShadowMatrixError::UnsupportedLightKind(LightKind::Point)),
        }
    }

    /// Builds the atlas for the lights packed in `buffer`.
    ///
    /// Expects `buffer.shadow_tile_count() > 0`. On success the returned
    /// atlas owns a temporary texture the caller must release. Lights whose
    /// matrices cannot be computed, or that do not fit the grid, get their
    /// shadow strength zeroed in `buffer`.
    pub fn render(
        &self,
        encoder: &mut dyn CommandEncoder,
        resolver: &dyn VisibilityResolver,
        lights: &[VisibleLight],
        buffer: &mut FrameLightBuffer,
    ) -> Result<ShadowAtlas, ShadowPassError> {
        let grid = ShadowGrid::for_tile_count(buffer.shadow_tile_count(), self.resolution);
        let texture =
            encoder.get_temporary_texture(&TemporaryTextureDescriptor::shadow_map(self.resolution))?;

        encoder.set_render_target(&RenderTargetBinding {
            texture,
            load: LoadAction::DontCare,
            store: StoreAction::Store,
            clear: ClearFlags::DEPTH,
        });
        encoder.begin_sample(RENDER_SHADOWS_SAMPLE);

        let reversed_z = encoder.uses_reversed_z();
        let mut atlas = ShadowAtlas {
            texture,
            resolution: self.resolution,
            grid,
            tiles: Vec::with_capacity(grid.capacity()),
            hard_shadows: false,
            soft_shadows: false,
        };

        for (i, light) in lights.iter().take(buffer.active_count()).enumerate() {
            if buffer.shadow_data[i].x <= 0.0 {
                continue;
            }

            let matrices = match Self::shadow_matrices(resolver, light, i) {
                Ok(matrices) => matrices,
                Err(e) => {
                    log::warn!("Light {i} renders without shadows this frame: {e}");
                    buffer.shadow_data[i].x = 0.0;
                    continue;
                }
            };

            let tile_index = atlas.tiles.len();
            if tile_index >= grid.capacity() {
                log::debug!("Shadow atlas full, light {i} dropped from the shadow pass");
                buffer.shadow_data[i].x = 0.0;
                continue;
            }

            let (tile_x, tile_y) = grid.tile_coords(tile_index);
            let viewport = grid.tile_viewport(tile_x, tile_y);
            let scissor = viewport.inset(SHADOW_TILE_BORDER);

            encoder.set_viewport(viewport);
            encoder.enable_scissor_rect(scissor);
            encoder.set_view_projection_matrices(&matrices.view, &matrices.projection);
            encoder.set_global_float(ShaderPropertyId::SHADOW_BIAS, light.shadow_bias);
            encoder.draw_shadows(&ShadowDrawSettings {
                light_index: i,
                split_data: matrices.split_data,
            });

            buffer.world_to_shadow[i] =
                world_to_shadow_matrix(&matrices, reversed_z, grid.split, tile_x, tile_y);

            if buffer.shadow_data[i].y <= 0.0 {
                atlas.hard_shadows = true;
            } else {
                atlas.soft_shadows = true;
            }

            log::trace!("Light {i} rendered into shadow tile ({tile_x}, {tile_y})");
            atlas.tiles.push(ShadowTile {
                light_index: i,
                tile_x,
                tile_y,
                viewport,
                scissor,
            });
        }

        encoder.disable_scissor_rect();

        let res = self.resolution as f32;
        encoder.set_global_texture(ShaderPropertyId::SHADOW_MAP, texture);
        encoder.set_global_vector(
            ShaderPropertyId::SHADOW_MAP_SIZE,
            Vec4::new(1.0 / res, 1.0 / res, res, res),
        );
        encoder.set_global_vector_array(ShaderPropertyId::SHADOW_DATA, buffer.shadow_data());
        encoder.set_global_matrix_array(
            ShaderPropertyId::WORLD_TO_SHADOW_MATRICES,
            buffer.world_to_shadow(),
        );
        if grid.split == 1 {
            if let Some(tile) = atlas.tiles.first() {
                encoder.set_global_matrix(
                    ShaderPropertyId::WORLD_TO_SHADOW_MATRIX,
                    &buffer.world_to_shadow[tile.light_index],
                );
            }
        }
        encoder.set_keyword(ShaderKeyword::ShadowsHard, atlas.hard_shadows);
        encoder.set_keyword(ShaderKeyword::ShadowsSoft, atlas.soft_shadows);
        encoder.end_sample(RENDER_SHADOWS_SAMPLE);

        log::debug!(
            "Shadow atlas {}px, {}x{} grid, {} tiles rendered",
            self.resolution,
            grid.split,
            grid.split,
            atlas.tiles.len()
        );
        Ok(atlas)
    }
}

impl Lane for ShadowAtlasLane {
    fn strategy_name(&self) -> &'static str {
        "ShadowAtlas"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Shadow
    }
}
