//! WASM bridge: runs a sketch on an HTML `<canvas>`.
//!
//! Compiled via `wasm-pack build --target web`. The host page owns the
//! animation loop: it forwards pointer events and resizes as they happen and
//! calls [`SketchApp::frame`] from `requestAnimationFrame`.

mod canvas;
mod logging;

use canvas::CanvasSurface;
use sketch_core::{MaskConfig, Pointer, PointerEvent, SketchResult, Size};
use sketch_scenes::{Sketch, SketchKind, create_sketch};
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

pub use logging::init_logging;

/// One running sketch plus the pointer state fed to it.
#[wasm_bindgen]
pub struct SketchApp {
    sketch: Box<dyn Sketch>,
    pointer: Pointer,
    width: f64,
    height: f64,
    /// Latched so the host sees the transition exactly once.
    reported_finished: bool,
}

#[wasm_bindgen]
impl SketchApp {
    /// Create a sketch by name (`fly`, `eyes`, `scrub`, `gather`).
    ///
    /// `mask_config_json` overrides the mask defaults; missing fields keep
    /// their default values.
    #[wasm_bindgen(constructor)]
    pub fn new(
        kind: &str,
        width: f64,
        height: f64,
        seed: u32,
        mask_config_json: Option<String>,
    ) -> Result<SketchApp, JsValue> {
        console_error_panic_hook_setup();
        Self::build(kind, width, height, u64::from(seed), mask_config_json.as_deref())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Advance by `dt` seconds and paint into `ctx`.
    ///
    /// Returns `true` on the first frame the sketch reports finished.
    pub fn frame(&mut self, ctx: &CanvasRenderingContext2d, dt: f64) -> bool {
        self.advance(dt);
        let mut surface = CanvasSurface::new(ctx, self.width, self.height);
        self.sketch.draw(&mut surface);
        self.take_finished()
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.pointer.handle(PointerEvent::Down { x, y });
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.pointer.handle(PointerEvent::Move { x, y });
    }

    pub fn pointer_up(&mut self, x: f64, y: f64) {
        self.pointer.handle(PointerEvent::Up { x, y });
    }

    /// Resize the drawing area. Takes effect on the next frame.
    pub fn resize(&mut self, width: f64, height: f64) {
        log::trace!("resize to {width}x{height}");
        self.width = width;
        self.height = height;
    }

    pub fn is_finished(&self) -> bool {
        self.sketch.is_finished()
    }

    /// Name of the running sketch.
    pub fn kind(&self) -> String {
        self.sketch.kind().to_string()
    }
}

impl SketchApp {
    fn build(
        kind: &str,
        width: f64,
        height: f64,
        seed: u64,
        mask_config_json: Option<&str>,
    ) -> SketchResult<Self> {
        let kind: SketchKind = kind.parse()?;
        let mask = match mask_config_json {
            Some(json) if !json.trim().is_empty() => MaskConfig::from_json(json)?,
            _ => MaskConfig::default(),
        };
        let size = Size::new(width, height);
        let sketch = create_sketch(kind, size, seed, mask)?;
        log::info!("started {kind} at {width}x{height} (seed {seed})");
        Ok(Self {
            sketch,
            pointer: Pointer::new(),
            width,
            height,
            reported_finished: false,
        })
    }

    fn advance(&mut self, dt: f64) {
        let size = Size::new(self.width, self.height);
        self.sketch.update(dt, &self.pointer, size);
        self.pointer.end_frame();
    }

    fn take_finished(&mut self) -> bool {
        if self.reported_finished || !self.sketch.is_finished() {
            return false;
        }
        self.reported_finished = true;
        true
    }
}

/// A seed for hosts that don't pick one.
#[wasm_bindgen]
pub fn random_seed() -> u32 {
    (js_sys::Math::random() * f64::from(u32::MAX)) as u32
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("sketch panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builds_each_kind_by_name() {
        for kind in SketchKind::ALL {
            let app = SketchApp::build(kind.name(), 800.0, 600.0, 1, None).unwrap();
            assert_eq!(app.kind(), kind.name());
        }
    }

    #[test]
    fn unknown_kind_is_an_error() {
        assert!(SketchApp::build("kaleidoscope", 800.0, 600.0, 1, None).is_err());
    }

    #[test]
    fn mask_json_is_applied_and_validated() {
        assert!(SketchApp::build("fly", 800.0, 600.0, 1, Some(r#"{"margin": 10}"#)).is_ok());
        assert!(SketchApp::build("fly", 800.0, 600.0, 1, Some("  ")).is_ok());
        assert!(SketchApp::build("fly", 800.0, 600.0, 1, Some("{not json")).is_err());
        assert!(
            SketchApp::build("fly", 800.0, 600.0, 1, Some(r#"{"ellipseVertices": 2}"#)).is_err()
        );
    }

    #[test]
    fn finished_is_reported_once() {
        let mut app = SketchApp::build("gather", 800.0, 600.0, 1, None).unwrap();
        app.advance(1.0 / 60.0);
        app.pointer_down(400.0, 300.0);
        let mut reports = 0;
        for _ in 0..180 {
            app.advance(1.0 / 60.0);
            if app.take_finished() {
                reports += 1;
            }
        }
        assert!(app.is_finished());
        assert_eq!(reports, 1);
    }

    #[test]
    fn resize_reaches_the_sketch() {
        let mut app = SketchApp::build("scrub", 0.0, 0.0, 1, None).unwrap();
        app.advance(1.0 / 60.0);
        app.resize(640.0, 480.0);
        app.pointer_down(320.0, 240.0);
        for _ in 0..10 {
            app.advance(1.0 / 60.0);
        }
        assert!(!app.is_finished());
        assert_eq!((app.width, app.height), (640.0, 480.0));
    }
}
