use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::constants::{FRAME_DELTA_MAX_MS, SHIP_SPAWN_INTERVAL_MS};
use crate::renderer;
use crate::ships;
use crate::simulation;
use crate::starmap::SharedStarMap;
use crate::state::SharedState;

/// Delta-seconds between two rAF timestamps, or `None` when the gap exceeds
/// the clamp (tab was backgrounded) and the tick's physics must be skipped
/// instead of integrating a huge catch-up step.
pub fn frame_delta(last_ms: f64, now_ms: f64) -> Option<f64> {
    let gap = now_ms - last_ms;
    if gap > FRAME_DELTA_MAX_MS {
        None
    } else {
        Some(gap / 1000.0)
    }
}

type RafClosure = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Cancellable handle to the self-rescheduling animation loop. Cancelling
/// before GPU teardown is what keeps a dangling callback from touching a
/// disposed context.
pub struct LoopHandle {
    raf_id: Rc<Cell<Option<i32>>>,
    running: Rc<Cell<bool>>,
    _closure: RafClosure,
}

impl LoopHandle {
    pub fn cancel(&self) {
        self.running.set(false);
        if let Some(id) = self.raf_id.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }
}

/// Single recurring animation callback driving both subsystems: clamped
/// delta, ship spawn cadence, simulation step, 2D render, star map frame.
pub fn start(state: SharedState, starmap: SharedStarMap) -> LoopHandle {
    let f: RafClosure = Rc::new(RefCell::new(None));
    let g = f.clone();

    let raf_id = Rc::new(Cell::new(None::<i32>));
    let running = Rc::new(Cell::new(true));
    let last_time = Rc::new(Cell::new(None::<f64>));
    let last_spawn = Rc::new(Cell::new(0.0_f64));

    let raf_id_cl = raf_id.clone();
    let running_cl = running.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
        if !running_cl.get() {
            return;
        }

        match last_time.get() {
            None => {
                // First invocation seeds the references; no physics yet
                last_time.set(Some(timestamp));
                last_spawn.set(timestamp);
            }
            Some(last) => {
                last_time.set(Some(timestamp));
                match frame_delta(last, timestamp) {
                    Some(dt) => {
                        if timestamp - last_spawn.get() >= SHIP_SPAWN_INTERVAL_MS {
                            ships::spawn_enemy_ship(&mut state.borrow_mut());
                            last_spawn.set(timestamp);
                        }

                        simulation::step(&mut state.borrow_mut(), dt);
                        renderer::render(&state);
                        if let Some(sm) = starmap.borrow_mut().as_mut() {
                            sm.render_frame(dt, timestamp);
                        }
                    }
                    None => {
                        // Runaway gap: skip the tick and restart the spawn
                        // cadence from here so resuming doesn't burst-spawn
                        last_spawn.set(timestamp);
                    }
                }
            }
        }

        if let Some(window) = web_sys::window() {
            if let Ok(id) = window
                .request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref())
            {
                raf_id_cl.set(Some(id));
            }
        }
    }) as Box<dyn FnMut(f64)>));

    if let Some(window) = web_sys::window() {
        if let Ok(id) = window
            .request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref())
        {
            raf_id.set(Some(id));
        }
    }

    LoopHandle { raf_id, running, _closure: g }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_frame_gap_converts_to_seconds() {
        assert_eq!(frame_delta(1000.0, 1016.0), Some(0.016));
    }

    #[test]
    fn backgrounded_gap_is_skipped() {
        assert_eq!(frame_delta(1000.0, 1500.0), None);
    }

    #[test]
    fn clamp_boundary_is_exclusive() {
        assert_eq!(frame_delta(0.0, FRAME_DELTA_MAX_MS), Some(FRAME_DELTA_MAX_MS / 1000.0));
        assert_eq!(frame_delta(0.0, FRAME_DELTA_MAX_MS + 0.001), None);
    }

    /// A synthetic 500 ms gap must leave entity positions untouched.
    #[test]
    fn skipped_tick_integrates_nothing() {
        use crate::state::GameState;

        let mut s = GameState::new();
        s.screen_w = 1000.0;
        s.screen_h = 1000.0;
        let m = &mut s.missiles[0];
        m.active = true;
        m.x = 100.0;
        m.y = 100.0;
        m.vx = 600.0;

        if let Some(dt) = frame_delta(1000.0, 1500.0) {
            crate::simulation::step(&mut s, dt);
        }
        assert_eq!(s.missiles[0].x, 100.0);
        assert_eq!(s.missiles[0].y, 100.0);
    }
}
