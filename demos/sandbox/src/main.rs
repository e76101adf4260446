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

// Penumbra Sandbox
// Renders a small scene into a command recorder and logs what was issued.
//
// Usage: sandbox [path/to/pipeline.ron]

use std::path::PathBuf;

use anyhow::Result;
use penumbra_agents::{CameraOutcome, ForwardPipeline};
use penumbra_core::math::{Aabb, LinearRgba, Rect, Vec3};
use penumbra_core::renderer::{
    Camera, CameraClearMode, CameraKind, LightShadows, RendererId, VisibleLight, VisibleRenderer,
};
use penumbra_infra::{RecordingEncoder, SceneVisibility};

const OPAQUE_QUEUE: u32 = 2000;
const TRANSPARENT_QUEUE: u32 = 3000;

fn renderer(id: u64, queue: u32, center: Vec3, half_extents: Vec3, casts_shadows: bool) -> VisibleRenderer {
    VisibleRenderer {
        id: RendererId(id),
        render_queue: queue,
        bounds: Aabb::from_center_half_extents(center, half_extents),
        casts_shadows,
    }
}

fn build_scene() -> SceneVisibility {
    let mut scene = SceneVisibility::new();
    scene
        // Ground plane, receives but does not cast.
        .add_renderer(renderer(1, OPAQUE_QUEUE, Vec3::new(0.0, -0.5, 0.0), Vec3::new(20.0, 0.5, 20.0), false))
        .add_renderer(renderer(2, OPAQUE_QUEUE, Vec3::new(-3.0, 1.0, 0.0), Vec3::ONE, true))
        .add_renderer(renderer(3, OPAQUE_QUEUE, Vec3::new(3.0, 1.5, -2.0), Vec3::new(1.0, 1.5, 1.0), true))
        .add_renderer(renderer(4, TRANSPARENT_QUEUE, Vec3::new(0.0, 1.0, 2.0), Vec3::new(0.75, 0.75, 0.75), true))
        .add_light(
            VisibleLight::directional(Vec3::new(-0.4, -1.0, -0.3), LinearRgba::new(1.0, 0.95, 0.85, 1.0))
                .with_shadows(LightShadows::Soft, 0.9, 0.05),
        )
        .add_light(
            VisibleLight::spot(
                Vec3::new(-3.0, 6.0, 0.0),
                Vec3::new(0.0, -1.0, 0.0),
                LinearRgba::new(2.0, 1.6, 1.2, 1.0),
                15.0,
                45.0,
            )
            .with_shadows(LightShadows::Hard, 1.0, 0.02),
        )
        .add_light(VisibleLight::point(
            Vec3::new(3.0, 2.0, 3.0),
            LinearRgba::new(0.2, 0.4, 1.5, 1.0),
            8.0,
        ))
        .add_light(VisibleLight::point(
            Vec3::new(0.0, 0.5, -6.0),
            LinearRgba::new(1.5, 0.3, 0.2, 1.0),
            4.0,
        ));
    scene
}

fn build_cameras() -> Vec<Camera> {
    let viewport = Rect::new(0.0, 0.0, 1280.0, 720.0);
    vec![
        Camera::perspective("Main", Vec3::new(0.0, 4.0, 12.0), Vec3::ZERO, 60.0, viewport, 0.3, 200.0)
            .with_clear(CameraClearMode::Skybox, LinearRgba::BLACK),
        Camera::perspective(
            "Minimap",
            Vec3::new(0.0, 30.0, 0.1),
            Vec3::ZERO,
            40.0,
            Rect::new(1024.0, 464.0, 256.0, 256.0),
            1.0,
            50.0,
        )
        .with_clear(CameraClearMode::SolidColor, LinearRgba::new(0.1, 0.1, 0.12, 1.0)),
        Camera::perspective("Scene", Vec3::new(8.0, 8.0, 8.0), Vec3::ZERO, 50.0, viewport, 0.1, 500.0)
            .with_kind(CameraKind::SceneView),
    ]
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/pipeline.ron"));

    let mut pipeline = ForwardPipeline::from_file(&settings_path)?;
    let mut scene = build_scene();
    let cameras = build_cameras();
    let mut encoder = RecordingEncoder::new();

    let report = pipeline.render(&mut encoder, &mut scene, &cameras);

    for command in encoder.commands() {
        log::debug!("  {command}");
    }
    for entry in &report.cameras {
        match &entry.outcome {
            CameraOutcome::Rendered(stats) => {
                log::info!(
                    "{}: {} renderers, {} lights ({} overflow), {} shadow tiles, keywords {:?}",
                    entry.camera,
                    stats.visible_renderers,
                    stats.active_lights,
                    stats.overflow_lights,
                    stats.shadow_tiles,
                    stats.keywords
                );
                for warning in &stats.warnings {
                    log::warn!("{}: {warning}", entry.camera);
                }
            }
            CameraOutcome::Skipped(reason) => log::info!("{}: skipped ({reason})", entry.camera),
        }
    }
    log::info!(
        "{} commands, {} submits, {} live temporary textures, frame took {:?}",
        encoder.commands().len(),
        encoder.submit_count(),
        encoder.live_texture_count(),
        pipeline.agent().last_frame_time()
    );
    Ok(())
}
