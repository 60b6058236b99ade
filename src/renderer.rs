use web_sys::CanvasRenderingContext2d;

use crate::canvas;
use crate::constants::TARGET_RADIUS;
use crate::state::SharedState;
use crate::{explosions, hud, missiles, rng, ships};

/// Immediate-mode 2D pass over the game canvas. World drawing happens inside
/// a save/restore block so the shake translation never leaks into the HUD.
pub fn render(state: &SharedState) {
    let Some(ctx) = canvas::context_2d(canvas::GAME_CANVAS_ID) else {
        return;
    };

    let s = state.borrow();
    ctx.clear_rect(0.0, 0.0, s.screen_w, s.screen_h);

    ctx.save();
    if s.shake > 0.0 {
        let jx = (rng::random() - 0.5) * s.shake;
        let jy = (rng::random() - 0.5) * s.shake;
        let _ = ctx.translate(jx, jy);
    }

    draw_turret(&ctx, &s);
    missiles::render_missiles(&ctx, &s);
    ships::render_ships(&ctx, &s);
    explosions::render_explosions(&ctx, &s);

    ctx.restore();

    hud::render_hud(&ctx, &s);
}

/// The defended Megabot turret at the launcher anchor.
fn draw_turret(ctx: &CanvasRenderingContext2d, s: &crate::state::GameState) {
    let (tx, ty) = s.target_pos();

    if let Ok(glow) = ctx.create_radial_gradient(tx, ty, 0.0, tx, ty, TARGET_RADIUS) {
        let _ = glow.add_color_stop(0.0, "rgba(125, 244, 255, 0.35)");
        let _ = glow.add_color_stop(1.0, "transparent");
        ctx.set_fill_style_canvas_gradient(&glow);
        ctx.fill_rect(
            tx - TARGET_RADIUS,
            ty - TARGET_RADIUS,
            TARGET_RADIUS * 2.0,
            TARGET_RADIUS * 2.0,
        );
    }

    ctx.set_stroke_style_str("rgba(125, 244, 255, 0.25)");
    ctx.set_line_width(1.0);
    ctx.begin_path();
    let _ = ctx.arc(tx, ty, TARGET_RADIUS, 0.0, std::f64::consts::PI * 2.0);
    ctx.stroke();

    ctx.set_fill_style_str("#cdf8ff");
    ctx.begin_path();
    let _ = ctx.arc(tx, ty, 7.0, 0.0, std::f64::consts::PI * 2.0);
    ctx.fill();
}
