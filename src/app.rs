use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;

use crate::canvas;
use crate::device;
use crate::game_loop::{self, LoopHandle};
use crate::input::{self, InputHandles};
use crate::starmap::{self, SharedStarMap, StarMap};
use crate::state::{self, SharedState};
use crate::rng;

/// Everything mount creates and unmount must tear down, in teardown order:
/// loop first (so no dangling callback touches a disposed context), then
/// listeners, then GPU resources.
struct HeroHandles {
    game_loop: LoopHandle,
    input: InputHandles,
}

#[component]
pub fn App() -> impl IntoView {
    view! { <HeroSection /> }
}

/// The hero region: star-map canvas underneath, missile-game canvas on top,
/// HUD drawn by the game canvas itself. Score, health %, and active counts
/// are exposed to surrounding chrome via [`crate::hud::stats`].
#[component]
pub fn HeroSection() -> impl IntoView {
    let game_state: SharedState = state::new_shared_state();
    let starmap: SharedStarMap = Rc::new(RefCell::new(None));
    let handles: Rc<RefCell<Option<HeroHandles>>> = Rc::new(RefCell::new(None));

    let state_mount = send_wrapper::SendWrapper::new(game_state.clone());
    let starmap_mount = send_wrapper::SendWrapper::new(starmap.clone());
    let handles_mount = send_wrapper::SendWrapper::new(handles.clone());

    Effect::new(move |_| {
        let game_state = (*state_mount).clone();
        let starmap = (*starmap_mount).clone();

        rng::seed_from_entropy();
        canvas::resize(&game_state);
        let (w, h) = {
            let s = game_state.borrow();
            (s.screen_w, s.screen_h)
        };

        // Capability tiering and WebGL probe happen once, here; failure
        // downgrades to the CSS gradient and skips the subsystem entirely
        let tier = device::detect();
        match canvas::canvas_by_id(canvas::STAR_CANVAS_ID)
            .and_then(|c| StarMap::init(c, tier, w, h))
        {
            Some(map) => {
                *starmap.borrow_mut() = Some(map);
            }
            None => {
                if let Some(container) = canvas::container() {
                    starmap::apply_css_fallback(&container);
                }
            }
        }

        let Some(input) = input::setup_input(game_state.clone(), starmap.clone()) else {
            log::error!("hero section failed to attach input listeners");
            return;
        };
        let game_loop = game_loop::start(game_state.clone(), starmap.clone());
        log::info!("hero simulation mounted");

        *handles_mount.borrow_mut() = Some(HeroHandles { game_loop, input });
    });

    let starmap_cleanup = send_wrapper::SendWrapper::new(starmap.clone());
    let handles_cleanup = send_wrapper::SendWrapper::new(handles);
    on_cleanup(move || {
        if let Some(h) = handles_cleanup.borrow_mut().take() {
            h.game_loop.cancel();
            h.input.detach();
        }
        if let Some(map) = starmap_cleanup.borrow_mut().take() {
            map.dispose();
        }
        log::info!("hero simulation unmounted");
    });

    view! {
        <section id="heroSection">
            <canvas id="starCanvas"></canvas>
            <canvas id="gameCanvas"></canvas>
        </section>
    }
}
