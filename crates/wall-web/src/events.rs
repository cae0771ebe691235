use crate::assets;
use crate::constants::*;
use crate::dom;
use crate::frame::WallState;
use wall_core::{Mode, ProjectKind};
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

pub fn wire(document: &web::Document, state: &WallState) {
    wire_nav(document, state);
    wire_start(document, state);
    wire_hover(document, state);
}

fn wire_nav(document: &web::Document, state: &WallState) {
    for id in NAV_IDS {
        let Some(mode) = Mode::from_name(id) else {
            continue;
        };
        let state = state.clone();
        dom::add_click_listener(document, id, move || {
            let mut controls = state.controls.borrow_mut();
            controls.start();
            if controls.set_mode(mode) && mode != Mode::Works {
                controls.set_hover(None);
                state.scene.borrow_mut().clear_planes();
            }
        });
    }
}

/// Any click on the page, canvas included, counts as the first interaction.
fn wire_start(document: &web::Document, state: &WallState) {
    let controls = state.controls.clone();
    dom::add_listener(document, "click", move || controls.borrow_mut().start());
}

/// `(frequency, bpm)` carried by a hover target, from `data-project` or the raw attributes.
fn hover_values(el: &web::Element) -> Option<(f32, f32)> {
    if let Some(kind) = el
        .get_attribute(ATTR_PROJECT)
        .and_then(|n| ProjectKind::from_name(n.trim()))
    {
        return Some(kind.hover());
    }
    let freq = el.get_attribute(ATTR_FREQ)?.trim().parse::<f32>().ok()?;
    let bpm = el.get_attribute(ATTR_BPM)?.trim().parse::<f32>().ok()?;
    Some((freq, bpm))
}

fn wire_hover(document: &web::Document, state: &WallState) {
    let targets = dom::query_all(document, HOVER_SELECTOR);
    log::debug!("{} hover targets", targets.len());
    for el in targets {
        let Some(hover) = hover_values(&el) else {
            log::warn!("hover target without usable frequency/bpm");
            continue;
        };
        let urls = el
            .get_attribute(ATTR_IMAGES)
            .map(|a| assets::parse_image_list(&a))
            .unwrap_or_default();

        let enter = state.clone();
        dom::add_listener(&el, "mouseenter", move || {
            enter.controls.borrow_mut().set_hover(Some(hover));
            if enter.controls.borrow().mode() == Mode::Works && !urls.is_empty() {
                show_planes(&enter, &urls);
            }
        });

        let leave = state.clone();
        dom::add_listener(&el, "mouseleave", move || {
            leave.controls.borrow_mut().set_hover(None);
            leave.scene.borrow_mut().clear_planes();
        });
    }
}

/// Queue one plane per url and load them in the background.
fn show_planes(state: &WallState, urls: &[String]) {
    let ids = state.scene.borrow_mut().show_planes(urls.len());
    for (id, url) in ids.into_iter().zip(urls.iter().cloned()) {
        let state = state.clone();
        spawn_local(async move {
            match assets::load_plane_image(&url).await {
                Ok(image) => {
                    let live = state
                        .scene
                        .borrow_mut()
                        .resolve_plane(id, Ok(image.dimensions()));
                    if live {
                        state.textures.borrow_mut().push((id, image));
                    } else {
                        log::debug!("dropping stale plane image {url}");
                    }
                }
                Err(e) => {
                    log::warn!("plane image {url}: {e}");
                    state.scene.borrow_mut().resolve_plane(id, Err(e));
                }
            }
        });
    }
}
