//! End-to-end checks over registration, the transform stack and full frames.

use approx::assert_relative_eq;

use room3d_core::composite::{draw_table, Dimensions};
use room3d_core::draw::{DrawContext, DrawRecorder, DrawTarget, TextureFlags};
use room3d_core::transform::transform_point;
use room3d_core::{
    register_shapes, Axis, Color, Command, DrawRange, Direction, Mat4, RoomConfig, Scene,
    SceneState, ShapeCatalog, ShapeKind, TexTiling, TiltFamily, TransformStack, Vec3,
};

fn wall_and_furniture() -> ShapeCatalog {
    ShapeCatalog::new()
        .with(
            "wall",
            Color::opaque(1.0, 1.0, 1.0),
            ShapeKind::Square {
                tiling: TexTiling::Repeat,
            },
        )
        .with("furniture", Color::opaque(1.0, 0.0, 0.0), ShapeKind::Cube)
}

#[test]
fn wall_and_furniture_directory() {
    let registered = register_shapes(&wall_and_furniture()).unwrap();
    assert_eq!(
        registered.directory.get("wall").unwrap(),
        DrawRange { offset: 0, count: 6 }
    );
    assert_eq!(
        registered.directory.get("furniture").unwrap(),
        DrawRange { offset: 6, count: 36 }
    );
    assert_eq!(registered.buffers.indices.len(), 42);
}

#[test]
fn room_catalog_ranges_are_disjoint_and_cover_buffer() {
    let registered = register_shapes(&ShapeCatalog::room(&TiltFamily::default())).unwrap();
    let vertex_count = registered.buffers.vertex_count() as u32;
    assert!(registered.buffers.indices.iter().all(|&i| i < vertex_count));
    assert_eq!(registered.buffers.indices.len() % 3, 0);

    // ranges tile the index buffer back to back, in catalog order
    let mut expected_offset = 0;
    for (_, range) in registered.directory.iter() {
        assert_eq!(range.offset, expected_offset);
        expected_offset = range.end();
    }
    assert_eq!(expected_offset, registered.buffers.indices.len());
}

#[test]
fn table_height_scales_with_dimensions() {
    let registered = register_shapes(&wall_and_furniture()).unwrap();
    let mut recorder = DrawRecorder::new();
    let mut ctx = DrawContext::new(&registered.directory, &mut recorder, TextureFlags::default());
    let height = draw_table(&mut ctx, Dimensions::new(2.0, 1.0, 1.0)).unwrap();
    assert_eq!(height, 1.5);
    ctx.finish().unwrap();
}

#[test]
fn push_scale_translate_pop_is_a_no_op() {
    let mut stack = TransformStack::new();
    stack.push();
    stack.scale(2.0, 1.0, 1.0);
    stack.translate(1.0, 0.0, 0.0);
    stack.pop().unwrap();
    assert_eq!(*stack.current(), Mat4::identity());
}

#[test]
fn rotation_applies_in_local_frame() {
    let a = Vec3::new(3.0, -1.0, 2.0);
    let mut stack = TransformStack::new();
    stack.translate(a.x, a.y, a.z).rotate(90.0, 0.0, 1.0, 0.0);

    assert_relative_eq!(transform_point(stack.current(), &Vec3::zeros()), a, epsilon = 1e-6);

    // rotating (1, 0, 0) by 90 degrees about +Y gives (0, 0, -1)
    let p = transform_point(stack.current(), &Vec3::new(1.0, 0.0, 0.0));
    assert_relative_eq!(p, a + Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
}

#[test]
fn every_reachable_frame_is_balanced() {
    let config = RoomConfig::default();
    let scene = Scene::new(config.clone()).unwrap();
    let mut state = SceneState::new();
    let mut recorder = DrawRecorder::new();

    // walk the tilt down to its minimum and back up, animating the seats and
    // turning the room as we go
    let mut commands = Vec::new();
    for _ in 0..16 {
        commands.push(Command::Tilt(Direction::Negative));
        commands.push(Command::Animate);
    }
    for _ in 0..32 {
        commands.push(Command::Tilt(Direction::Positive));
        commands.push(Command::Rotate(Axis::Y, Direction::Positive));
        commands.push(Command::Animate);
    }

    for command in commands {
        state.apply(command, &config);
        recorder.clear();
        let stats = scene.draw_frame(&state, &mut recorder).unwrap();
        assert_eq!(stats.draw_calls, recorder.len());
        assert!(recorder.culling());

        // only the fish is drawn two-sided
        let open: Vec<_> = recorder.draws.iter().filter(|d| !d.culling).collect();
        assert_eq!(open.len(), 1);
    }
    assert_eq!(state.tank_tilt, 45);
}

#[test]
fn textures_switch_surfaces_without_failing() {
    let scene = Scene::new(RoomConfig::default()).unwrap();
    let mut state = SceneState::new();
    let mut recorder = DrawRecorder::new();

    scene.draw_frame(&state, &mut recorder).unwrap();
    let flat = recorder.draws.iter().filter(|d| d.call.surface == room3d_core::Surface::Flat).count();
    assert_eq!(flat, recorder.len());

    state.textures = TextureFlags::all_ready();
    recorder.clear();
    scene.draw_frame(&state, &mut recorder).unwrap();
    let textured = recorder
        .draws
        .iter()
        .filter(|d| d.call.surface != room3d_core::Surface::Flat)
        .count();
    // floor, four walls, fish
    assert_eq!(textured, 6);
}
