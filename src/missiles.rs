use web_sys::CanvasRenderingContext2d;

use crate::constants::*;
use crate::explosions;
use crate::pool::{self, PoolSlot};
use crate::state::GameState;

/// Spawn a missile from the launcher anchor toward `(target_x, target_y)`.
/// A full pool silently drops the launch.
pub fn launch_missile(s: &mut GameState, target_x: f64, target_y: f64) {
    let (origin_x, origin_y) = s.target_pos();
    let dx = target_x - origin_x;
    let dy = target_y - origin_y;
    let len = (dx * dx + dy * dy).sqrt();
    if len <= f64::EPSILON {
        return;
    }

    let Some(m) = pool::acquire(&mut s.missiles) else {
        return;
    };
    m.x = origin_x;
    m.y = origin_y;
    m.vx = dx / len * MISSILE_SPEED;
    m.vy = dy / len * MISSILE_SPEED;
    m.lifetime = 0.0;
    m.max_lifetime = MISSILE_LIFETIME;
    m.trail.clear();
    m.active = true;
}

/// Per-frame missile step: lifetime countdown, trail sample, straight-line
/// integration, boundary cull. A missile reaching its lifetime ceiling
/// deactivates before any further processing that tick.
pub fn update_missiles(s: &mut GameState, dt: f64) {
    let (w, h) = (s.screen_w, s.screen_h);
    for m in s.missiles.iter_mut().filter(|m| m.active) {
        m.lifetime += dt;
        if m.lifetime >= m.max_lifetime {
            m.deactivate();
            continue;
        }

        m.trail.push(m.x, m.y);
        m.x += m.vx * dt;
        m.y += m.vy * dt;

        if m.x < -MISSILE_CULL_PADDING
            || m.x > w + MISSILE_CULL_PADDING
            || m.y < -MISSILE_CULL_PADDING
            || m.y > h + MISSILE_CULL_PADDING
        {
            m.deactivate();
        }
    }
}

/// Broad-phase circle test of every active missile against every active ship.
/// A missile resolves against at most one ship per frame and deactivates on
/// any hit (no penetration).
pub fn collide_missiles(s: &mut GameState) {
    let GameState { missiles, ships, explosions, score, .. } = s;

    for m in missiles.iter_mut().filter(|m| m.active) {
        for ship in ships.iter_mut().filter(|sh| sh.active) {
            let dx = m.x - ship.x;
            let dy = m.y - ship.y;
            let reach = MISSILE_RADIUS + ship.size;
            if dx * dx + dy * dy >= reach * reach {
                continue;
            }

            ship.health -= 1;
            ship.hit_flash = 1.0;
            if ship.health <= 0 {
                ship.deactivate();
                explosions::spawn_explosion(explosions, ship.x, ship.y, ship.size * 2.0);
                *score += ship.max_health * SCORE_PER_HEALTH;
            } else {
                explosions::spawn_explosion(explosions, m.x, m.y, ship.size * 0.5);
            }
            m.deactivate();
            break;
        }
    }
}

pub fn render_missiles(ctx: &CanvasRenderingContext2d, s: &GameState) {
    for m in s.missiles.iter().filter(|m| m.active) {
        // Trail, oldest to newest with a linear opacity/size ramp
        let len = m.trail.len();
        for (i, (tx, ty)) in m.trail.iter_oldest_first().enumerate() {
            let t = (i + 1) as f64 / len as f64;
            ctx.set_global_alpha(t * 0.55);
            ctx.set_fill_style_str("#7df4ff");
            let r = 0.8 + t * 2.4;
            ctx.begin_path();
            let _ = ctx.arc(tx, ty, r, 0.0, std::f64::consts::PI * 2.0);
            ctx.fill();
        }
        ctx.set_global_alpha(1.0);

        // Three-layer head: outer glow, inner glow, solid core
        if let Ok(outer) = ctx.create_radial_gradient(m.x, m.y, 0.0, m.x, m.y, 14.0) {
            let _ = outer.add_color_stop(0.0, "rgba(125, 244, 255, 0.45)");
            let _ = outer.add_color_stop(1.0, "transparent");
            ctx.set_fill_style_canvas_gradient(&outer);
            ctx.fill_rect(m.x - 14.0, m.y - 14.0, 28.0, 28.0);
        }
        if let Ok(inner) = ctx.create_radial_gradient(m.x, m.y, 0.0, m.x, m.y, 6.0) {
            let _ = inner.add_color_stop(0.0, "rgba(255, 255, 255, 0.9)");
            let _ = inner.add_color_stop(1.0, "rgba(125, 244, 255, 0.0)");
            ctx.set_fill_style_canvas_gradient(&inner);
            ctx.fill_rect(m.x - 6.0, m.y - 6.0, 12.0, 12.0);
        }
        ctx.set_fill_style_str("#ffffff");
        ctx.begin_path();
        let _ = ctx.arc(m.x, m.y, 2.2, 0.0, std::f64::consts::PI * 2.0);
        ctx.fill();
    }
}
