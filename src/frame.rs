use crate::input;
use crate::render;
use crate::tooltip::DomTooltip;
use globe_core::{FrameLoop, GlobeConfig, PointerState, TooltipSurface};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

// Clamp for frame deltas after the tab was hidden.
const MAX_FRAME_DT_SEC: f32 = 0.25;

pub struct FrameContext<'a> {
    pub globe: FrameLoop,
    pub pointer: Rc<RefCell<PointerState>>,
    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<render::GpuState<'a>>,
    pub tooltip: DomTooltip,
    pub last_instant: Instant,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_instant)
            .min(std::time::Duration::from_secs_f32(MAX_FRAME_DT_SEC));
        self.last_instant = now;

        let viewport = input::canvas_viewport(&self.canvas);
        if viewport != self.globe.viewport() && viewport.width > 0.0 && viewport.height > 0.0 {
            self.globe.resize(viewport);
        }

        // Read, not drained: every event since the last frame collapses into this one sample.
        let pointer = *self.pointer.borrow();

        match &mut self.gpu {
            Some(g) => {
                g.resize_if_needed(self.canvas.width(), self.canvas.height());
                self.globe.tick(dt, &pointer, g, &mut self.tooltip);
            }
            None => {
                let result = self.globe.step(dt, &pointer);
                self.tooltip.present(&result.tooltip_frame());
            }
        }
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    config: &GlobeConfig,
    marker_count: usize,
) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas, config, marker_count).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
