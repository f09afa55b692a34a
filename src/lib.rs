#![cfg(target_arch = "wasm32")]
use globe_core::{
    parse_feed, FrameLoop, GlobeConfig, MarkerFactory, MarkerRegistry, PointerState,
    PulseAnimator,
};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod render;
mod tooltip;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

fn load_config(document: &web::Document) -> GlobeConfig {
    match dom::element_text(document, constants::CONFIG_ELEMENT_ID) {
        Some(json) => GlobeConfig::from_json_str(&json).unwrap_or_else(|e| {
            log::warn!("[config] {}; using defaults", e);
            GlobeConfig::default()
        }),
        None => GlobeConfig::default(),
    }
}

fn build_registry(config: &GlobeConfig) -> anyhow::Result<MarkerRegistry> {
    let records = parse_feed(constants::COUNTRY_DATA_JSON)?;
    let factory = MarkerFactory::new(config.globe_radius, config.marker.clone());
    let mut registry = MarkerRegistry::new();
    let report = registry.extend_from_feed(&factory, &records);
    if !report.rejected.is_empty() {
        log::warn!(
            "[feed] {} of {} records rejected",
            report.rejected.len(),
            records.len()
        );
    }
    PulseAnimator::new(config.pulse.clone()).attach_all(&mut registry);
    Ok(registry)
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("globe-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    static STARTED: AtomicBool = AtomicBool::new(false);
    if STARTED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(constants::CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", constants::CANVAS_ID))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    wire_canvas_resize(&canvas);

    let config = load_config(&document);
    log::info!("[config] rotation={:?}", config.rotation);
    let registry = build_registry(&config)?;
    let marker_count = registry.len();
    let globe = FrameLoop::new(&config, registry, input::canvas_viewport(&canvas));

    // One pointer per scene, owned here and shared with the handlers.
    let pointer = Rc::new(RefCell::new(PointerState::default()));
    events::wire_input_handlers(events::pointer::InputWiring {
        canvas: canvas.clone(),
        pointer: pointer.clone(),
    });

    let gpu = frame::init_gpu(&canvas, &config, marker_count).await;
    let tooltip = tooltip::DomTooltip::from_document(&document, &canvas);

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        globe,
        pointer,
        canvas,
        gpu,
        tooltip,
        last_instant: Instant::now(),
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
