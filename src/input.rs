use glam::Vec2;
use globe_core::{PointerState, Viewport};
use web_sys as web;

/// Canvas size in CSS pixels, the space pointer events are reported in.
#[inline]
pub fn canvas_viewport(canvas: &web::HtmlCanvasElement) -> Viewport {
    let rect = canvas.get_bounding_client_rect();
    Viewport::new(rect.width() as f32, rect.height() as f32)
}

/// Pointer position relative to the canvas' top-left corner, in CSS pixels.
#[inline]
pub fn pointer_canvas_css(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    Vec2::new(
        ev.client_x() as f32 - rect.left() as f32,
        ev.client_y() as f32 - rect.top() as f32,
    )
}

#[inline]
pub fn pointer_state(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> PointerState {
    let pos = pointer_canvas_css(ev, canvas);
    PointerState::from_client(pos.x, pos.y, canvas_viewport(canvas))
}
