//! 2D canvas backend

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::scene::{Align, Color, Scene};

fn css(color: Color) -> String {
    let [r, g, b, a] = color;
    format!(
        "rgba({}, {}, {}, {})",
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
        a
    )
}

/// Paints scenes onto an HTML canvas
pub struct CanvasPainter {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasPainter {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    pub fn paint(&self, scene: &Scene) -> Result<(), JsValue> {
        let ctx = &self.ctx;

        ctx.set_global_alpha(1.0);
        ctx.set_fill_style_str(&css(scene.clear));
        ctx.fill_rect(0.0, 0.0, self.width().into(), self.height().into());

        for quad in &scene.quads {
            let [r, g, b, a] = quad.color;
            ctx.set_global_alpha(a.into());
            ctx.set_fill_style_str(&css([r, g, b, 1.0]));

            if quad.rotation == 0.0 {
                ctx.fill_rect(
                    quad.pos.x.into(),
                    quad.pos.y.into(),
                    quad.size.x.into(),
                    quad.size.y.into(),
                );
            } else {
                let center = quad.center();
                ctx.save();
                ctx.translate(center.x.into(), center.y.into())?;
                ctx.rotate(quad.rotation.into())?;
                ctx.fill_rect(
                    (-quad.size.x / 2.0).into(),
                    (-quad.size.y / 2.0).into(),
                    quad.size.x.into(),
                    quad.size.y.into(),
                );
                ctx.restore();
            }
        }

        ctx.set_global_alpha(1.0);
        for label in &scene.labels {
            ctx.set_font(&format!("bold {}px monospace", label.size_px));
            ctx.set_text_align(match label.align {
                Align::Left => "left",
                Align::Center => "center",
                Align::Right => "right",
            });
            ctx.set_fill_style_str(&css(label.color));
            ctx.fill_text(&label.text, label.pos.x.into(), label.pos.y.into())?;
        }

        Ok(())
    }
}
