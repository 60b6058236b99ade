use web_sys::CanvasRenderingContext2d;

use crate::pool::{self, PoolSlot};
use crate::state::{Explosion, GameState};

/// Purely cosmetic, pooled. A full pool silently drops the spawn.
pub fn spawn_explosion(pool: &mut [Explosion], x: f64, y: f64, size: f64) {
    let Some(e) = pool::acquire(pool) else {
        return;
    };
    e.x = x;
    e.y = y;
    e.size = size;
    e.lifetime = 0.0;
    e.active = true;
}

pub fn update_explosions(s: &mut GameState, dt: f64) {
    for e in s.explosions.iter_mut().filter(|e| e.active) {
        e.lifetime += dt;
        if e.lifetime >= e.max_lifetime {
            e.deactivate();
        }
    }
}

pub fn render_explosions(ctx: &CanvasRenderingContext2d, s: &GameState) {
    for e in s.explosions.iter().filter(|e| e.active) {
        let progress = e.lifetime / e.max_lifetime;
        let radius = e.size * (1.0 + 2.0 * progress);
        let opacity = 1.0 - progress;

        ctx.set_global_alpha(opacity);
        if let Ok(outer) = ctx.create_radial_gradient(e.x, e.y, 0.0, e.x, e.y, radius) {
            let _ = outer.add_color_stop(0.0, "rgba(255, 200, 80, 0.8)");
            let _ = outer.add_color_stop(0.5, "rgba(255, 110, 30, 0.4)");
            let _ = outer.add_color_stop(1.0, "transparent");
            ctx.set_fill_style_canvas_gradient(&outer);
            ctx.fill_rect(e.x - radius, e.y - radius, radius * 2.0, radius * 2.0);
        }

        let core = (radius * 0.4).max(2.0);
        if let Ok(inner) = ctx.create_radial_gradient(e.x, e.y, 0.0, e.x, e.y, core) {
            let _ = inner.add_color_stop(0.0, "rgba(255, 255, 230, 0.95)");
            let _ = inner.add_color_stop(1.0, "transparent");
            ctx.set_fill_style_canvas_gradient(&inner);
            ctx.fill_rect(e.x - core, e.y - core, core * 2.0, core * 2.0);
        }
        ctx.set_global_alpha(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{EXPLOSION_LIFETIME, EXPLOSION_POOL_SIZE};
    use crate::pool::active_count;

    #[test]
    fn expires_at_fixed_lifetime_inclusive() {
        let mut s = GameState::new();
        spawn_explosion(&mut s.explosions, 10.0, 20.0, 30.0);
        assert!(s.explosions[0].active);
        update_explosions(&mut s, EXPLOSION_LIFETIME);
        assert!(!s.explosions[0].active);
    }

    #[test]
    fn survives_partial_lifetime() {
        let mut s = GameState::new();
        spawn_explosion(&mut s.explosions, 0.0, 0.0, 30.0);
        update_explosions(&mut s, EXPLOSION_LIFETIME * 0.5);
        assert!(s.explosions[0].active);
    }

    #[test]
    fn overflow_spawns_are_dropped() {
        let mut s = GameState::new();
        for i in 0..EXPLOSION_POOL_SIZE + 10 {
            spawn_explosion(&mut s.explosions, i as f64, 0.0, 10.0);
        }
        assert_eq!(active_count(&s.explosions), EXPLOSION_POOL_SIZE);
        // The first slot still carries its original spawn, not an overwrite
        assert_eq!(s.explosions[0].x, 0.0);
    }
}
