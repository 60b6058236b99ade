use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement};

use crate::state::SharedState;

pub const CONTAINER_ID: &str = "heroSection";
pub const GAME_CANVAS_ID: &str = "gameCanvas";
pub const STAR_CANVAS_ID: &str = "starCanvas";

pub fn container() -> Option<HtmlElement> {
    let document = web_sys::window()?.document()?;
    document
        .get_element_by_id(CONTAINER_ID)?
        .dyn_into::<HtmlElement>()
        .ok()
}

/// Container bounding box in CSS pixels: (left, top, width, height).
pub fn container_box() -> Option<(f64, f64, f64, f64)> {
    let rect = container()?.get_bounding_client_rect();
    Some((rect.left(), rect.top(), rect.width(), rect.height()))
}

/// Size the 2D game canvas to the container box and record the simulation
/// bounds. The star canvas is sized separately by the star map, which owns
/// the device-pixel-ratio handling for the GL surface.
pub fn resize(state: &SharedState) {
    let Some((_, _, w, h)) = container_box() else {
        return;
    };

    if let Some(canvas) = canvas_by_id(GAME_CANVAS_ID) {
        canvas.set_width(w as u32);
        canvas.set_height(h as u32);
    }

    let mut s = state.borrow_mut();
    s.screen_w = w;
    s.screen_h = h;
}

pub fn canvas_by_id(id: &str) -> Option<HtmlCanvasElement> {
    let document = web_sys::window()?.document()?;
    document.get_element_by_id(id)?.dyn_into::<HtmlCanvasElement>().ok()
}

pub fn context_2d(id: &str) -> Option<CanvasRenderingContext2d> {
    canvas_by_id(id)?
        .get_context("2d")
        .ok()?
        .map(|c| c.unchecked_into())
}
