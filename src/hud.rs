use web_sys::CanvasRenderingContext2d;

use crate::constants::TARGET_MAX_HEALTH;
use crate::pool;
use crate::state::GameState;

/// The only state a surrounding UI needs to read from the simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeroStats {
    pub score: i32,
    pub health_pct: f64,
    pub active_missiles: usize,
    pub active_ships: usize,
}

pub fn stats(s: &GameState) -> HeroStats {
    HeroStats {
        score: s.score,
        health_pct: s.target_health as f64 / TARGET_MAX_HEALTH as f64 * 100.0,
        active_missiles: pool::active_count(&s.missiles),
        active_ships: pool::active_count(&s.ships),
    }
}

/// Screen-space HUD chrome, drawn outside the shake transform.
pub fn render_hud(ctx: &CanvasRenderingContext2d, s: &GameState) {
    let st = stats(s);
    let w = s.screen_w;

    ctx.set_fill_style_str("#7df4ff");
    ctx.set_font("bold 18px monospace");
    ctx.set_text_align("left");
    let _ = ctx.fill_text(&format!("SCORE {:06}", st.score), 16.0, 30.0);

    draw_target_health_bar(ctx, w / 2.0, 16.0, 160.0, 10.0, st.health_pct);

    ctx.set_fill_style_str("rgba(255, 255, 255, 0.5)");
    ctx.set_font("12px monospace");
    ctx.set_text_align("left");
    let _ = ctx.fill_text(
        &format!("missiles {}  hostiles {}", st.active_missiles, st.active_ships),
        16.0,
        s.screen_h - 14.0,
    );

    if s.target_health == 0 {
        ctx.set_fill_style_str("#ff4444");
        ctx.set_font("bold 28px monospace");
        ctx.set_text_align("center");
        let _ = ctx.fill_text("DEFENSES DOWN", w / 2.0, s.screen_h / 2.0);
    }
}

fn draw_target_health_bar(
    ctx: &CanvasRenderingContext2d,
    cx: f64,
    y: f64,
    w: f64,
    h: f64,
    pct: f64,
) {
    let ratio = (pct / 100.0).clamp(0.0, 1.0);

    ctx.set_fill_style_str("rgba(0, 0, 0, 0.5)");
    ctx.fill_rect(cx - w / 2.0 - 2.0, y - 2.0, w + 4.0, h + 4.0);

    let color = if ratio > 0.6 {
        "#44ff44"
    } else if ratio > 0.3 {
        "#ffaa00"
    } else {
        "#ff4444"
    };
    ctx.set_fill_style_str(color);
    ctx.fill_rect(cx - w / 2.0, y, w * ratio, h);

    ctx.set_stroke_style_str("#ffffff44");
    ctx.set_line_width(1.0);
    ctx.stroke_rect(cx - w / 2.0 - 2.0, y - 2.0, w + 4.0, h + 4.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TARGET_MAX_HEALTH;

    #[test]
    fn stats_reflect_pool_activity_and_health() {
        let mut s = GameState::new();
        s.score = 700;
        s.target_health = TARGET_MAX_HEALTH / 2;
        s.missiles[0].active = true;
        s.missiles[3].active = true;
        s.ships[1].active = true;

        let st = stats(&s);
        assert_eq!(st.score, 700);
        assert_eq!(st.health_pct, 50.0);
        assert_eq!(st.active_missiles, 2);
        assert_eq!(st.active_ships, 1);
    }
}
