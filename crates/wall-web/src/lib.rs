#![cfg(target_arch = "wasm32")]
//! Browser front-end.
//!
//! Expects a `<canvas id="wall-canvas">` (optionally with `data-style` and
//! `data-relief`), nav buttons `#nav-home`, `#nav-about`, `#nav-works`,
//! `#nav-contacts`, and hover targets carrying `data-project` or
//! `data-freq`/`data-bpm`, plus an optional comma-separated `data-images`.

mod assets;
mod constants;
mod dom;
mod events;
mod frame;

use constants::{ATTR_RELIEF, ATTR_STYLE, CANVAS_ID};
use std::cell::RefCell;
use std::rc::Rc;
use wall_core::{MorphStyle, Scene, SceneConfig, ViewportClass, ViewportProfile};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("wall-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{CANVAS_ID}"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    dom::sync_canvas_backing_size(&canvas);
    {
        let canvas = canvas.clone();
        dom::add_listener(&window, "resize", move || {
            dom::sync_canvas_backing_size(&canvas)
        });
    }

    let style = canvas
        .get_attribute(ATTR_STYLE)
        .and_then(|s| MorphStyle::from_name(s.trim()))
        .unwrap_or_default();
    let profile = ViewportProfile::for_class(ViewportClass::from_css_width(dom::css_width()));
    let state = frame::WallState::new(Scene::new(SceneConfig::new(style, profile)));
    events::wire(&document, &state);

    match (style, canvas.get_attribute(ATTR_RELIEF)) {
        (MorphStyle::ImageRelief, Some(url)) => {
            let scene = state.scene.clone();
            spawn_local(async move {
                let relief = assets::load_relief(&url).await;
                scene.borrow_mut().set_relief_image(relief);
            });
        }
        (MorphStyle::ImageRelief, None) => {
            log::warn!("no {ATTR_RELIEF} on the canvas; relief morph disabled")
        }
        _ => {}
    }

    let gpu = frame::GpuState::new(&canvas).await?;
    let ctx = Rc::new(RefCell::new(frame::FrameContext::new(state, canvas, gpu)));
    let handle = frame::start_loop(ctx);
    dom::add_listener(&window, "pagehide", move || handle.stop());
    Ok(())
}
