//! End-to-end runs of every sketch against a recording surface.

use sketch_core::{MaskConfig, Pointer, PointerEvent, RecordingSurface, Size};
use sketch_scenes::{SketchKind, create_sketch};

const FRAME: f64 = 1.0 / 60.0;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn every_sketch_keeps_the_surface_balanced_through_a_resize() {
    init_logging();
    for kind in SketchKind::ALL {
        let mut sketch = create_sketch(kind, Size::ZERO, 42, MaskConfig::default()).unwrap();
        let mut pointer = Pointer::new();
        let mut surface = RecordingSurface::new(0.0, 0.0);

        for frame in 0..240 {
            let size = if frame < 60 {
                Size::new(900.0, 700.0)
            } else {
                Size::new(600.0, 900.0)
            };
            surface.resize(size.width, size.height);
            match frame {
                30 => pointer.handle(PointerEvent::Move { x: 100.0, y: 100.0 }),
                90 => pointer.handle(PointerEvent::Down { x: 300.0, y: 450.0 }),
                100 => pointer.handle(PointerEvent::Move { x: 300.0, y: 520.0 }),
                110 => pointer.handle(PointerEvent::Up { x: 300.0, y: 520.0 }),
                _ => {}
            }
            sketch.update(FRAME, &pointer, size);
            surface.clear_ops();
            sketch.draw(&mut surface);
            pointer.end_frame();

            assert_eq!(surface.state_depth(), 0, "{kind} frame {frame}");
            assert!(surface.active_clips().is_empty(), "{kind} frame {frame}");
        }
    }
}

#[test]
fn sketches_are_deterministic_per_seed() {
    init_logging();
    let run = |kind: SketchKind| {
        let size = Size::new(800.0, 600.0);
        let mut sketch = create_sketch(kind, size, 7, MaskConfig::default()).unwrap();
        let mut pointer = Pointer::new();
        pointer.handle(PointerEvent::Move { x: 400.0, y: 300.0 });
        let mut surface = RecordingSurface::new(size.width, size.height);
        for _ in 0..30 {
            sketch.update(FRAME, &pointer, size);
            pointer.end_frame();
        }
        sketch.draw(&mut surface);
        surface.ops().to_vec()
    };
    for kind in SketchKind::ALL {
        assert_eq!(run(kind), run(kind), "{kind}");
    }
}

#[test]
fn mask_config_from_json_drives_creation() {
    init_logging();
    let config = MaskConfig::from_json(r#"{"ellipseVertices": 24, "noiseStrength": 0}"#).unwrap();
    let sketch = create_sketch(SketchKind::Eyes, Size::new(800.0, 600.0), 1, config);
    assert!(sketch.is_ok());
}
