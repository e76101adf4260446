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

use approx::assert_relative_eq;
use penumbra_agents::{CameraOutcome, FrameError, ForwardPipeline, RENDER_CAMERA_SAMPLE};
use penumbra_core::math::{Aabb, LinearRgba, Rect, Vec3, Vec4};
use penumbra_core::renderer::{
    Camera, CameraClearMode, ClearFlags, LightShadows, PipelineSettings, RendererConfiguration,
    RendererId, ShaderKeyword, ShaderPropertyId, VisibilityResolver, VisibleLight,
    VisibleRenderer,
};
use penumbra_infra::recording::{RecordedCommand, RecordingEncoder};
use penumbra_infra::scene::SceneVisibility;
use penumbra_lanes::RENDER_SHADOWS_SAMPLE;

fn cube(id: u64, center: Vec3) -> VisibleRenderer {
    VisibleRenderer {
        id: RendererId(id),
        render_queue: 2000,
        bounds: Aabb::from_center_half_extents(center, Vec3::ONE),
        casts_shadows: true,
    }
}

fn camera(name: &str) -> Camera {
    Camera::perspective(
        name,
        Vec3::new(0.0, 2.0, 10.0),
        Vec3::ZERO,
        60.0,
        Rect::new(0.0, 0.0, 640.0, 480.0),
        0.3,
        100.0,
    )
}

fn sun(shadows: LightShadows) -> VisibleLight {
    VisibleLight::directional(Vec3::new(0.3, -1.0, 0.2), LinearRgba::WHITE)
        .with_shadows(shadows, 0.8, 0.05)
}

fn downward_spot(x: f32) -> VisibleLight {
    VisibleLight::spot(
        Vec3::new(x, 6.0, 0.0),
        Vec3::new(0.0, -1.0, 0.0),
        LinearRgba::WHITE,
        12.0,
        50.0,
    )
    .with_shadows(LightShadows::Soft, 1.0, 0.05)
}

fn pipeline() -> ForwardPipeline {
    ForwardPipeline::new(PipelineSettings::default()).unwrap()
}

fn position_of(encoder: &RecordingEncoder, wanted: &RecordedCommand) -> usize {
    encoder
        .position(|c| c == wanted)
        .unwrap_or_else(|| panic!("{wanted} was never recorded"))
}

#[test]
fn test_camera_without_lights() {
    let mut scene = SceneVisibility::new();
    scene.add_renderer(cube(1, Vec3::ZERO));
    let mut encoder = RecordingEncoder::new();
    let mut pipeline = pipeline();

    let report = pipeline.render(&mut encoder, &mut scene, &[camera("Main")]);

    let stats = report.outcome("Main").and_then(CameraOutcome::stats).unwrap();
    assert_eq!(stats.visible_renderers, 1);
    assert_eq!(stats.active_lights, 0);
    assert!(stats.keywords.is_empty());
    assert_eq!(
        encoder.global_vector(ShaderPropertyId::LIGHT_INDICES_OFFSET_AND_COUNT),
        Some(Vec4::ZERO)
    );
    assert!(encoder.keywords().is_empty());
    assert!(!encoder
        .commands()
        .iter()
        .any(|c| matches!(c, RecordedCommand::GetTemporaryTexture { .. })));
    assert_eq!(encoder.submit_count(), 1);

    let colors = encoder
        .global_vector_array(ShaderPropertyId::VISIBLE_LIGHT_COLORS)
        .unwrap();
    assert_eq!(colors.len(), 16);
    assert!(colors.iter().all(|c| *c == Vec4::ZERO));

    // No per-object light indices without lights.
    assert!(encoder.commands().iter().all(|c| match c {
        RecordedCommand::DrawRenderers { settings, .. } =>
            settings.renderer_configuration == RendererConfiguration::None,
        _ => true,
    }));
}

#[test]
fn test_frame_command_order() {
    let mut scene = SceneVisibility::new();
    scene.add_renderer(cube(1, Vec3::ZERO));
    let mut encoder = RecordingEncoder::new();
    let cam = camera("Main").with_clear(CameraClearMode::SolidColor, LinearRgba::BLACK);

    pipeline().render(&mut encoder, &mut scene, &[cam]);

    let setup = position_of(
        &encoder,
        &RecordedCommand::SetupCameraProperties {
            camera: "Main".into(),
        },
    );
    let clear = position_of(
        &encoder,
        &RecordedCommand::ClearRenderTarget {
            flags: ClearFlags::from_parts(true, true),
            color: LinearRgba::BLACK,
        },
    );
    let begin = position_of(
        &encoder,
        &RecordedCommand::BeginSample(RENDER_CAMERA_SAMPLE.into()),
    );
    let skybox = position_of(
        &encoder,
        &RecordedCommand::DrawSkybox {
            camera: "Main".into(),
        },
    );
    let end = position_of(
        &encoder,
        &RecordedCommand::EndSample(RENDER_CAMERA_SAMPLE.into()),
    );
    let submit = position_of(&encoder, &RecordedCommand::Submit);

    assert!(setup < clear && clear < begin && begin < skybox);
    assert!(skybox < end && end < submit);
    assert_eq!(submit, encoder.commands().len() - 1);
}

#[test]
fn test_clear_nothing_issues_no_clear() {
    let mut scene = SceneVisibility::new();
    let mut encoder = RecordingEncoder::new();
    let cam = camera("Main").with_clear(CameraClearMode::Nothing, LinearRgba::BLACK);

    pipeline().render(&mut encoder, &mut scene, &[cam]);

    assert!(encoder
        .position(|c| matches!(c, RecordedCommand::ClearRenderTarget { .. }))
        .is_none());
    assert_eq!(encoder.submit_count(), 1);
}

#[test]
fn test_single_directional_caster() {
    let mut scene = SceneVisibility::new();
    scene
        .add_renderer(cube(1, Vec3::ZERO))
        .add_light(sun(LightShadows::Hard));
    let mut encoder = RecordingEncoder::new();

    let report = pipeline().render(&mut encoder, &mut scene, &[camera("Main")]);

    let stats = report.outcome("Main").and_then(CameraOutcome::stats).unwrap();
    assert_eq!(stats.active_lights, 1);
    assert_eq!(stats.shadow_tiles, 1);
    assert!(stats.warnings.is_empty());
    assert!(stats.keywords.contains(ShaderKeyword::ShadowsHard));
    assert!(!stats.keywords.contains(ShaderKeyword::ShadowsSoft));

    assert!(encoder
        .position(|c| *c == RecordedCommand::SetViewport(Rect::new(0.0, 0.0, 1024.0, 1024.0)))
        .is_some());
    // Even a lone tile keeps its border unrendered.
    let scissor = position_of(
        &encoder,
        &RecordedCommand::EnableScissorRect(Rect::new(4.0, 4.0, 1016.0, 1016.0)),
    );
    let unscissor = position_of(&encoder, &RecordedCommand::DisableScissorRect);
    let shadows_done = position_of(
        &encoder,
        &RecordedCommand::EndSample(RENDER_SHADOWS_SAMPLE.into()),
    );
    assert!(scissor < unscissor && unscissor < shadows_done);

    let shadow_data = encoder
        .global_vector_array(ShaderPropertyId::SHADOW_DATA)
        .unwrap();
    assert_relative_eq!(shadow_data[0].x, 0.8);
    assert_relative_eq!(shadow_data[0].y, 0.0);

    // The caster's center lands inside the [0, 1] shadow texture space.
    let world_to_shadow = encoder
        .global_matrix(ShaderPropertyId::WORLD_TO_SHADOW_MATRIX)
        .unwrap();
    let p = world_to_shadow.transform_point(Vec3::ZERO);
    for v in [p.x / p.w, p.y / p.w, p.z / p.w] {
        assert!((0.0..=1.0).contains(&v), "{v} outside the shadow map");
    }

    // Every draw of a lit camera requests per-object light indices.
    assert!(encoder.commands().iter().any(|c| matches!(
        c,
        RecordedCommand::DrawRenderers { settings, .. }
            if settings.renderer_configuration == RendererConfiguration::PerObjectLightIndices8
    )));
}

#[test]
fn test_shadow_surface_released_after_submit() {
    let mut scene = SceneVisibility::new();
    scene
        .add_renderer(cube(1, Vec3::ZERO))
        .add_light(sun(LightShadows::Soft));
    let mut encoder = RecordingEncoder::new();

    pipeline().render(&mut encoder, &mut scene, &[camera("Main")]);

    let texture = encoder
        .commands()
        .iter()
        .find_map(|c| match c {
            RecordedCommand::GetTemporaryTexture { texture, .. } => Some(*texture),
            _ => None,
        })
        .unwrap();
    let submit = position_of(&encoder, &RecordedCommand::Submit);
    let release = position_of(&encoder, &RecordedCommand::ReleaseTemporaryTexture(texture));
    assert!(submit < release);
    assert_eq!(encoder.live_texture_count(), 0);
}

#[test]
fn test_light_overflow_marks_excess_lights() {
    let mut scene = SceneVisibility::new();
    scene.add_renderer(cube(1, Vec3::ZERO));
    for i in 0..20 {
        scene.add_light(VisibleLight::point(
            Vec3::new(i as f32 * 0.2 - 2.0, 0.0, 0.0),
            LinearRgba::WHITE,
            5.0,
        ));
    }
    let mut encoder = RecordingEncoder::new();

    let report = pipeline().render(&mut encoder, &mut scene, &[camera("Main")]);

    let stats = report.outcome("Main").and_then(CameraOutcome::stats).unwrap();
    assert_eq!(stats.visible_lights, 20);
    assert_eq!(stats.active_lights, 16);
    assert_eq!(stats.overflow_lights, 4);

    let map = scene.light_index_map();
    assert_eq!(map.len(), 20);
    assert_eq!(&map[..16], &(0..16).collect::<Vec<i32>>()[..]);
    assert!(map[16..].iter().all(|&i| i == -1));
    assert!(!encoder
        .commands()
        .iter()
        .any(|c| matches!(c, RecordedCommand::GetTemporaryTexture { .. })));
}

#[test]
fn test_seventeen_casters_fill_sixteen_tiles() {
    let settings = PipelineSettings {
        max_visible_lights: 32,
        ..Default::default()
    };
    let mut pipeline = ForwardPipeline::new(settings).unwrap();
    let mut scene = SceneVisibility::new();
    scene.add_renderer(cube(1, Vec3::ZERO));
    for i in 0..17 {
        scene.add_light(downward_spot(i as f32 * 0.5 - 4.0));
    }
    let mut encoder = RecordingEncoder::new();

    let report = pipeline.render(&mut encoder, &mut scene, &[camera("Main")]);

    let stats = report.outcome("Main").and_then(CameraOutcome::stats).unwrap();
    assert_eq!(stats.active_lights, 17);
    assert_eq!(stats.shadow_tiles, 16);
    assert!(stats.keywords.contains(ShaderKeyword::ShadowsSoft));

    let shadow_data = pipeline.agent().light_buffer().shadow_data();
    assert!(shadow_data[..16].iter().all(|d| d.x > 0.0));
    assert_eq!(shadow_data[16].x, 0.0);

    let viewports = encoder
        .commands()
        .iter()
        .filter(|c| matches!(c, RecordedCommand::SetViewport(_)))
        .count();
    assert_eq!(viewports, 16);
    assert!(encoder
        .position(|c| *c == RecordedCommand::SetViewport(Rect::new(768.0, 768.0, 256.0, 256.0)))
        .is_some());
    // Several tiles bind no single-tile matrix.
    assert!(encoder
        .global(ShaderPropertyId::WORLD_TO_SHADOW_MATRIX)
        .is_none());
}

#[test]
fn test_shadow_surface_failure_degrades() {
    let mut scene = SceneVisibility::new();
    scene
        .add_renderer(cube(1, Vec3::ZERO))
        .add_light(sun(LightShadows::Hard));
    let mut encoder = RecordingEncoder::new().with_texture_budget(0);
    let mut pipeline = pipeline();

    let report = pipeline.render(&mut encoder, &mut scene, &[camera("Main")]);

    let stats = report.outcome("Main").and_then(CameraOutcome::stats).unwrap();
    assert_eq!(stats.shadow_tiles, 0);
    assert!(stats.keywords.is_empty());
    assert!(matches!(stats.warnings[..], [FrameError::ShadowPass(_)]));
    assert!(encoder.keywords().is_empty());
    assert!(pipeline
        .agent()
        .light_buffer()
        .shadow_data()
        .iter()
        .all(|d| d.x == 0.0));
    assert!(encoder
        .position(|c| matches!(c, RecordedCommand::ReleaseTemporaryTexture(_)))
        .is_none());
    assert_eq!(encoder.submit_count(), 1);
}

#[test]
fn test_unusable_camera_is_skipped_silently() {
    let mut scene = SceneVisibility::new();
    scene.add_renderer(cube(1, Vec3::ZERO)).add_light(sun(LightShadows::Hard));
    let mut cam = camera("Broken");
    cam.pixel_rect = Rect::new(0.0, 0.0, 0.0, 0.0);
    let mut encoder = RecordingEncoder::new();

    let report = pipeline().render(&mut encoder, &mut scene, &[cam]);

    assert!(matches!(
        report.outcome("Broken"),
        Some(CameraOutcome::Skipped(FrameError::CullingUnavailable { camera })) if camera == "Broken"
    ));
    assert!(encoder.commands().is_empty());
}

#[test]
fn test_cameras_render_in_order() {
    let mut scene = SceneVisibility::new();
    scene
        .add_renderer(cube(1, Vec3::ZERO))
        .add_light(downward_spot(0.0));
    let mut broken = camera("Broken");
    broken.far_clip = broken.near_clip;
    let mut encoder = RecordingEncoder::new();
    let mut pipeline = pipeline();

    let report = pipeline.render(
        &mut encoder,
        &mut scene,
        &[camera("First"), broken, camera("Second")],
    );

    let names: Vec<_> = report.cameras.iter().map(|c| c.camera.as_str()).collect();
    assert_eq!(names, ["First", "Broken", "Second"]);
    assert_eq!(report.rendered_count(), 2);
    assert_eq!(report.skipped_count(), 1);
    assert_eq!(encoder.submit_count(), 2);
    assert_eq!(encoder.live_texture_count(), 0);
    assert_eq!(pipeline.agent().frame_count(), 1);

    let first_setup = position_of(
        &encoder,
        &RecordedCommand::SetupCameraProperties {
            camera: "First".into(),
        },
    );
    let second_setup = position_of(
        &encoder,
        &RecordedCommand::SetupCameraProperties {
            camera: "Second".into(),
        },
    );
    let first_submit = position_of(&encoder, &RecordedCommand::Submit);
    assert!(first_setup < first_submit && first_submit < second_setup);
}

#[test]
fn test_light_slots_reset_when_lights_disappear() {
    let mut lit = SceneVisibility::new();
    lit.add_renderer(cube(1, Vec3::ZERO))
        .add_light(sun(LightShadows::Hard))
        .add_light(downward_spot(0.0));
    let mut dark = SceneVisibility::new();
    dark.add_renderer(cube(1, Vec3::ZERO));
    let mut encoder = RecordingEncoder::new();
    let mut pipeline = pipeline();

    pipeline.render(&mut encoder, &mut lit, &[camera("Main")]);
    assert_eq!(pipeline.agent().light_buffer().active_count(), 2);

    pipeline.render(&mut encoder, &mut dark, &[camera("Main")]);
    let buffer = pipeline.agent().light_buffer();
    assert_eq!(buffer.active_count(), 0);
    assert_eq!(buffer.shadow_tile_count(), 0);
    assert!(buffer.colors().iter().all(|c| *c == Vec4::ZERO));
    assert!(encoder.keywords().is_empty());
    assert_eq!(pipeline.agent().frame_count(), 2);
}

#[cfg(any(debug_assertions, feature = "diagnostics"))]
mod diagnostics {
    use super::*;
    use penumbra_core::renderer::CameraKind;
    use penumbra_lanes::ERROR_SHADER;

    #[test]
    fn test_scene_view_geometry_emitted_for_scene_view_only() {
        let mut scene = SceneVisibility::new();
        let mut encoder = RecordingEncoder::new();
        let scene_view = camera("Scene").with_kind(CameraKind::SceneView);

        pipeline().render(&mut encoder, &mut scene, &[camera("Game"), scene_view]);

        assert_eq!(scene.scene_view_emit_count(), 1);
    }

    #[test]
    fn test_error_material_created_once_across_frames() {
        let mut scene = SceneVisibility::new();
        scene.add_renderer(cube(1, Vec3::ZERO));
        let mut encoder = RecordingEncoder::new();
        let mut pipeline = pipeline();

        pipeline.render(&mut encoder, &mut scene, &[camera("Main")]);
        pipeline.render(&mut encoder, &mut scene, &[camera("Main")]);

        let created = encoder
            .commands()
            .iter()
            .filter(|c| matches!(c, RecordedCommand::CreateMaterial { .. }))
            .count();
        assert_eq!(created, 1);
    }

    #[test]
    fn test_missing_error_shader_only_warns() {
        let mut scene = SceneVisibility::new();
        scene.add_renderer(cube(1, Vec3::ZERO));
        let mut encoder = RecordingEncoder::new().with_failing_shader(ERROR_SHADER);

        let report = pipeline().render(&mut encoder, &mut scene, &[camera("Main")]);

        let stats = report.outcome("Main").and_then(CameraOutcome::stats).unwrap();
        assert!(matches!(stats.warnings[..], [FrameError::DiagnosticPass(_)]));
        assert_eq!(encoder.submit_count(), 1);
    }
}
