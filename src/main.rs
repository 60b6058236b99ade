mod app;
mod canvas;
mod constants;
mod device;
mod explosions;
mod game_loop;
mod hud;
mod input;
mod missiles;
mod pool;
mod renderer;
mod rng;
mod ships;
mod simulation;
mod starmap;
mod state;
mod trail;

fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::mount_to_body(app::App);
}
