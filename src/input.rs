//! Pointer/touch/resize wiring. Event callbacks run between animation frames
//! and only ever activate pool slots or move camera targets; they never
//! iterate entities or render. Every listener registered here is removed
//! again by [`InputHandles::detach`] on unmount.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{EventTarget, MouseEvent, TouchEvent};

use crate::canvas;
use crate::missiles;
use crate::starmap::SharedStarMap;
use crate::state::SharedState;

pub struct InputHandles {
    canvas_target: EventTarget,
    container_target: EventTarget,
    window_target: EventTarget,
    click: Closure<dyn FnMut(MouseEvent)>,
    touchstart: Closure<dyn FnMut(TouchEvent)>,
    mousemove: Closure<dyn FnMut(MouseEvent)>,
    resize: Closure<dyn FnMut(web_sys::Event)>,
}

impl InputHandles {
    pub fn detach(&self) {
        let _ = self
            .canvas_target
            .remove_event_listener_with_callback("click", self.click.as_ref().unchecked_ref());
        let _ = self.canvas_target.remove_event_listener_with_callback(
            "touchstart",
            self.touchstart.as_ref().unchecked_ref(),
        );
        let _ = self.container_target.remove_event_listener_with_callback(
            "mousemove",
            self.mousemove.as_ref().unchecked_ref(),
        );
        let _ = self
            .window_target
            .remove_event_listener_with_callback("resize", self.resize.as_ref().unchecked_ref());
    }
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Attach all hero listeners. Returns `None` when the container or canvas is
/// not in the DOM yet.
pub fn setup_input(state: SharedState, starmap: SharedStarMap) -> Option<InputHandles> {
    let window = web_sys::window()?;
    let game_canvas = canvas::canvas_by_id(canvas::GAME_CANVAS_ID)?;
    let container = canvas::container()?;

    // Click: launch a missile at the click point, streak the star map
    let state_click = state.clone();
    let starmap_click = starmap.clone();
    let click = Closure::wrap(Box::new(move |e: MouseEvent| {
        let Some((left, top, _, _)) = canvas::container_box() else {
            return;
        };
        let x = e.client_x() as f64 - left;
        let y = e.client_y() as f64 - top;
        missiles::launch_missile(&mut state_click.borrow_mut(), x, y);
        if let Some(sm) = starmap_click.borrow_mut().as_mut() {
            sm.spawn_shooting_star(x, y);
        }
    }) as Box<dyn FnMut(MouseEvent)>);
    game_canvas
        .add_event_listener_with_callback("click", click.as_ref().unchecked_ref())
        .ok()?;

    // Touch: first changed touch launches, same mapping as click
    let state_touch = state.clone();
    let starmap_touch = starmap.clone();
    let touchstart = Closure::wrap(Box::new(move |e: TouchEvent| {
        e.prevent_default();
        let Some(touch) = e.changed_touches().get(0) else {
            return;
        };
        let Some((left, top, _, _)) = canvas::container_box() else {
            return;
        };
        let x = touch.client_x() as f64 - left;
        let y = touch.client_y() as f64 - top;
        missiles::launch_missile(&mut state_touch.borrow_mut(), x, y);
        if let Some(sm) = starmap_touch.borrow_mut().as_mut() {
            sm.spawn_shooting_star(x, y);
        }
    }) as Box<dyn FnMut(TouchEvent)>);
    let opts = web_sys::AddEventListenerOptions::new();
    opts.set_passive(false);
    game_canvas
        .add_event_listener_with_callback_and_add_event_listener_options(
            "touchstart",
            touchstart.as_ref().unchecked_ref(),
            &opts,
        )
        .ok()?;

    // Pointer motion feeds the star-map parallax target only
    let starmap_move = starmap.clone();
    let mousemove = Closure::wrap(Box::new(move |e: MouseEvent| {
        let Some((left, top, _, _)) = canvas::container_box() else {
            return;
        };
        if let Some(sm) = starmap_move.borrow_mut().as_mut() {
            sm.pointer_moved(
                e.client_x() as f64 - left,
                e.client_y() as f64 - top,
                now_ms(),
            );
        }
    }) as Box<dyn FnMut(MouseEvent)>);
    container
        .add_event_listener_with_callback("mousemove", mousemove.as_ref().unchecked_ref())
        .ok()?;

    // Container resize keeps both surfaces in step; no state reset
    let state_resize = state.clone();
    let starmap_resize = starmap.clone();
    let resize = Closure::wrap(Box::new(move |_: web_sys::Event| {
        canvas::resize(&state_resize);
        let s = state_resize.borrow();
        if let Some(sm) = starmap_resize.borrow_mut().as_mut() {
            sm.resize(s.screen_w, s.screen_h);
        }
    }) as Box<dyn FnMut(web_sys::Event)>);
    window
        .add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())
        .ok()?;

    Some(InputHandles {
        canvas_target: game_canvas.into(),
        container_target: container.into(),
        window_target: window.into(),
        click,
        touchstart,
        mousemove,
        resize,
    })
}
