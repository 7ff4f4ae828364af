//! Scene driver tests on the headless backend.

use super::*;
use ember_config::schema::SceneConfig;
use ember_renderer::{HeadlessBackend, Viewport};

/// Buffers per icosphere mesh: position, normal, index.
const BUFFERS_PER_MESH: usize = 3;

fn settings(subdivisions: u32) -> SceneConfig {
    SceneConfig {
        subdivisions,
        ..SceneConfig::default()
    }
}

fn harness(subdivisions: u32) -> (HeadlessBackend, Scene<HeadlessBackend>, Renderer, Camera) {
    let mut backend = HeadlessBackend::new();
    let scene = Scene::new(&mut backend, &settings(subdivisions), false).unwrap();
    let renderer = Renderer::new(Viewport::new(640, 480));
    let camera = Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 45.0, 4.0 / 3.0, 0.1, 1000.0);
    (backend, scene, renderer, camera)
}

#[test]
fn new_prepares_every_program() {
    let (backend, scene, _, _) = harness(1);
    for program in scene.programs().iter() {
        assert!(backend.is_prepared(program.id()));
        assert_eq!(backend.program_label(program.id()), Some(program.label()));
    }
}

#[test]
fn new_builds_every_mesh_at_the_requested_level() {
    let (backend, scene, _, _) = harness(2);
    assert_eq!(backend.live_buffers(), SceneMeshes::<HeadlessBackend>::COUNT * BUFFERS_PER_MESH);
    assert_eq!(scene.level(), GeometryLevel::new(2, false));
    assert_eq!(scene.meshes.body.vertex_count() as usize, Icosphere::vertex_count(2));
    assert_eq!(scene.meshes.body.element_count() as usize, Icosphere::triangle_count(2) * 3);
}

#[test]
fn default_frame_draws_every_face_part() {
    let (mut backend, mut scene, renderer, camera) = harness(1);
    let stats = scene.render_frame(&mut backend, &renderer, &camera).unwrap();

    // body, 2 brows, 2 eyes, 2 lashes, 2 eyeballs, nose, mouth
    assert_eq!(stats.draw_calls, 11);
    // eye, lash and eyeball passes reuse their program across both sides
    assert_eq!(stats.program_switches, 7);
    // both brows share one snapshot, mirrored parts need their own
    assert_eq!(stats.uniform_uploads, 10);

    let frame = backend.last_frame().unwrap();
    assert!(frame.cleared);
    assert_eq!(frame.clear_color, renderer.clear_color());
    assert_eq!(frame.draws[0].program, scene.programs().body.id());
    assert_eq!(frame.draws[10].program, scene.programs().mouth.id());
}

#[test]
fn pass_order_is_fixed() {
    let (mut backend, mut scene, renderer, camera) = harness(0);
    let mut config = settings(0);
    config.outer_flame = true;
    scene.apply_settings(&config, false);
    scene.render_frame(&mut backend, &renderer, &camera).unwrap();

    let programs = scene.programs();
    let expected = [
        programs.body.id(),
        programs.brows.id(),
        programs.brows.id(),
        programs.eye.id(),
        programs.eye.id(),
        programs.lash.id(),
        programs.lash.id(),
        programs.eyeball.id(),
        programs.eyeball.id(),
        programs.nose.id(),
        programs.mouth.id(),
        programs.flame.id(),
    ];
    let drawn: Vec<_> = backend
        .last_frame()
        .unwrap()
        .draws
        .iter()
        .map(|d| d.program)
        .collect();
    assert_eq!(drawn, expected);
}

#[test]
fn optional_parts_follow_settings() {
    let (mut backend, mut scene, renderer, camera) = harness(0);
    let config = SceneConfig {
        subdivisions: 0,
        nose: false,
        mouth: false,
        ..SceneConfig::default()
    };
    scene.apply_settings(&config, false);
    let stats = scene.render_frame(&mut backend, &renderer, &camera).unwrap();
    assert_eq!(stats.draw_calls, 9);

    let stats = {
        let mut with_flame = config.clone();
        with_flame.outer_flame = true;
        scene.apply_settings(&with_flame, false);
        scene.render_frame(&mut backend, &renderer, &camera).unwrap()
    };
    assert_eq!(stats.draw_calls, 10);
}

#[test]
fn unchanged_level_does_not_rebuild() {
    let (mut backend, mut scene, renderer, camera) = harness(1);
    let created = backend.buffers_created();

    for _ in 0..3 {
        scene.render_frame(&mut backend, &renderer, &camera).unwrap();
    }
    let mut recolored = settings(1);
    recolored.geom_color = Color::from_rgb(10, 20, 30);
    scene.apply_settings(&recolored, false);
    assert!(!scene.sync_geometry(&backend));
    scene.render_frame(&mut backend, &renderer, &camera).unwrap();

    assert_eq!(backend.buffers_created(), created);
}

#[test]
fn level_change_rebuilds_and_releases_old_buffers() {
    let (mut backend, mut scene, renderer, camera) = harness(1);
    let live = backend.live_buffers();
    let created = backend.buffers_created();

    scene.apply_settings(&settings(3), false);
    assert!(scene.sync_geometry(&backend));
    assert!(!scene.sync_geometry(&backend));

    assert_eq!(backend.live_buffers(), live);
    assert_eq!(backend.buffers_created(), created + live as u64);
    assert_eq!(scene.meshes.body.vertex_count() as usize, Icosphere::vertex_count(3));

    let stats = scene.render_frame(&mut backend, &renderer, &camera).unwrap();
    assert_eq!(stats.draw_calls, 11);
    let body_draw = &backend.last_frame().unwrap().draws[0];
    assert_eq!(body_draw.count as usize, Icosphere::triangle_count(3) * 3);
}

#[test]
fn wireframe_toggle_rebuilds_as_lines() {
    let (mut backend, mut scene, renderer, camera) = harness(0);
    scene.apply_settings(&settings(0), true);
    scene.render_frame(&mut backend, &renderer, &camera).unwrap();

    assert_eq!(scene.level().topology, Topology::LineList);
    let body_draw = &backend.last_frame().unwrap().draws[0];
    assert_eq!(body_draw.topology, Topology::LineList);
    // 30 icosahedron edges, two indices each
    assert_eq!(body_draw.count, 60);
}

#[test]
fn frame_counter_drives_time() {
    let (mut backend, mut scene, renderer, camera) = harness(0);
    for _ in 0..4 {
        scene.render_frame(&mut backend, &renderer, &camera).unwrap();
    }
    assert_eq!(scene.frame(), 4);

    let time = scene
        .programs()
        .body
        .uniforms()
        .read_f32(ember_renderer::UniformRole::Time);
    assert_eq!(time, Some(4.0));
}

#[test]
fn colors_are_channels_over_255() {
    let (mut backend, mut scene, renderer, camera) = harness(0);
    scene.render_frame(&mut backend, &renderer, &camera).unwrap();

    let color = scene
        .programs()
        .body
        .uniforms()
        .read_floats(ember_renderer::UniformRole::Color)
        .unwrap();
    assert_eq!(color, vec![183.0 / 255.0, 140.0 / 255.0, 17.0 / 255.0, 1.0]);
}

#[test]
fn mirrored_parts_bind_distinct_snapshots() {
    let (mut backend, mut scene, renderer, camera) = harness(0);
    scene.render_frame(&mut backend, &renderer, &camera).unwrap();

    let draws = &backend.last_frame().unwrap().draws;
    // brows share one snapshot, the two eyes do not
    assert_eq!(draws[1].uniform_offset, draws[2].uniform_offset);
    assert_ne!(draws[3].uniform_offset, draws[4].uniform_offset);
}
