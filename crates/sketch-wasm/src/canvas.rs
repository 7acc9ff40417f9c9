//! Canvas2D implementation of [`Surface`].

use sketch_core::{Color, Point, Rect, Size, Surface};
use std::f64::consts::TAU;
use web_sys::CanvasRenderingContext2d;

/// Borrows a 2-D context for the duration of one frame.
pub struct CanvasSurface<'a> {
    ctx: &'a CanvasRenderingContext2d,
    size: Size,
}

impl<'a> CanvasSurface<'a> {
    pub fn new(ctx: &'a CanvasRenderingContext2d, width: f64, height: f64) -> Self {
        Self {
            ctx,
            size: Size::new(width, height),
        }
    }

    fn circle(&self, center: Point, radius: f64) {
        self.ctx.begin_path();
        let _ = self.ctx.arc(center.x, center.y, radius.max(0.0), 0.0, TAU);
    }
}

impl Surface for CanvasSurface<'_> {
    fn size(&self) -> Size {
        self.size
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, p: Point) {
        self.ctx.move_to(p.x, p.y);
    }

    fn line_to(&mut self, p: Point) {
        self.ctx.line_to(p.x, p.y);
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn clip(&mut self) {
        self.ctx.clip();
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx
            .fill_rect(rect.x0, rect.y0, rect.width(), rect.height());
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width);
        self.ctx
            .stroke_rect(rect.x0, rect.y0, rect.width(), rect.height());
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        self.circle(center, radius);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, color: Color, width: f64) {
        self.circle(center, radius);
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width);
        self.ctx.stroke();
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f64) {
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width);
        self.ctx.stroke();
    }
}
