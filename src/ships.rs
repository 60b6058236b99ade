use web_sys::CanvasRenderingContext2d;

use crate::constants::*;
use crate::explosions;
use crate::pool::{self, PoolSlot};
use crate::rng;
use crate::state::{GameState, ShipKind};

/// Spawn an enemy ship on a random container edge, just outside bounds,
/// heading straight for the defended target. Called on the spawn cadence by
/// the loop driver, never per-frame.
pub fn spawn_enemy_ship(s: &mut GameState) {
    let (w, h) = (s.screen_w, s.screen_h);
    let (tx, ty) = s.target_pos();

    let kind = ShipKind::from_roll(rng::random());
    let size = kind.size();

    // Edge 0..4: top, right, bottom, left
    let (x, y) = match (rng::random() * 4.0) as u32 {
        0 => (rng::random() * w, -size),
        1 => (w + size, rng::random() * h),
        2 => (rng::random() * w, h + size),
        _ => (-size, rng::random() * h),
    };

    let dx = tx - x;
    let dy = ty - y;
    let len = (dx * dx + dy * dy).sqrt().max(f64::EPSILON);
    let (lo, hi) = kind.speed_range();
    let speed = rng::range(lo, hi);

    let Some(ship) = pool::acquire(&mut s.ships) else {
        return;
    };
    ship.x = x;
    ship.y = y;
    ship.vx = dx / len * speed;
    ship.vy = dy / len * speed;
    ship.kind = kind;
    ship.health = kind.max_health();
    ship.max_health = kind.max_health();
    ship.size = size;
    ship.rotation = dy.atan2(dx);
    ship.hit_flash = 0.0;
    ship.active = true;
}

/// Per-frame ship step: straight-line integration (no steering after spawn),
/// hit-flash decay, collision against the defended target, off-screen cull.
pub fn update_ships(s: &mut GameState, dt: f64) {
    let (w, h) = (s.screen_w, s.screen_h);
    let (tx, ty) = s.target_pos();
    let GameState { ships, explosions, target_health, shake, .. } = s;

    for ship in ships.iter_mut().filter(|sh| sh.active) {
        ship.x += ship.vx * dt;
        ship.y += ship.vy * dt;

        // Visual feedback only; never gates simulation logic
        ship.hit_flash = (ship.hit_flash - HIT_FLASH_DECAY * dt).max(0.0);

        let dx = ship.x - tx;
        let dy = ship.y - ty;
        let reach = ship.size + TARGET_RADIUS;
        if dx * dx + dy * dy < reach * reach {
            ship.deactivate();
            explosions::spawn_explosion(explosions, ship.x, ship.y, ship.size * 2.0);
            *target_health = (*target_health - TARGET_IMPACT_DAMAGE).max(0);
            *shake = SHAKE_IMPACT;
            continue;
        }

        // Ships originate off-screen, so they get a wider cull band than
        // missiles before being dropped.
        if ship.x < -SHIP_CULL_PADDING
            || ship.x > w + SHIP_CULL_PADDING
            || ship.y < -SHIP_CULL_PADDING
            || ship.y > h + SHIP_CULL_PADDING
        {
            ship.deactivate();
        }
    }
}

fn flash_color(body: (u8, u8, u8), flash: f64) -> String {
    let lerp = |c: u8| -> u8 { (c as f64 + (255.0 - c as f64) * flash) as u8 };
    format!("rgb({},{},{})", lerp(body.0), lerp(body.1), lerp(body.2))
}

pub fn render_ships(ctx: &CanvasRenderingContext2d, s: &GameState) {
    for ship in s.ships.iter().filter(|sh| sh.active) {
        let colors = &SHIP_COLORS[ship.kind.color_index()];

        // Type-colored glow behind the body
        let glow_r = ship.size * 2.0;
        if let Ok(glow) =
            ctx.create_radial_gradient(ship.x, ship.y, 0.0, ship.x, ship.y, glow_r)
        {
            let _ = glow.add_color_stop(0.0, colors.glow);
            let _ = glow.add_color_stop(1.0, "transparent");
            ctx.set_fill_style_canvas_gradient(&glow);
            ctx.fill_rect(ship.x - glow_r, ship.y - glow_r, glow_r * 2.0, glow_r * 2.0);
        }

        // Rotated triangular body, flash-interpolated toward white
        ctx.save();
        let _ = ctx.translate(ship.x, ship.y);
        let _ = ctx.rotate(ship.rotation);
        ctx.set_fill_style_str(&flash_color(colors.body, ship.hit_flash));
        ctx.begin_path();
        ctx.move_to(ship.size, 0.0);
        ctx.line_to(-ship.size * 0.7, ship.size * 0.6);
        ctx.line_to(-ship.size * 0.7, -ship.size * 0.6);
        ctx.close_path();
        ctx.fill();

        // Engine dot at the tail
        ctx.set_fill_style_str("#ffffff");
        ctx.begin_path();
        let _ = ctx.arc(-ship.size * 0.8, 0.0, 2.0, 0.0, std::f64::consts::PI * 2.0);
        ctx.fill();
        ctx.restore();

        draw_ship_health_bar(ctx, ship.x, ship.y - ship.size - 10.0, ship.size * 2.0,
            ship.health, ship.max_health);
    }
}

/// Screen-space health bar above the ship, not rotated with it.
fn draw_ship_health_bar(
    ctx: &CanvasRenderingContext2d,
    cx: f64,
    y: f64,
    w: f64,
    hp: i32,
    max_hp: i32,
) {
    let ratio = hp as f64 / max_hp as f64;

    ctx.set_fill_style_str("rgba(0, 0, 0, 0.5)");
    ctx.fill_rect(cx - w / 2.0, y, w, 3.0);

    let color = if ratio > 0.6 {
        "#44ff44"
    } else if ratio > 0.3 {
        "#ffaa00"
    } else {
        "#ff4444"
    };
    ctx.set_fill_style_str(color);
    ctx.fill_rect(cx - w / 2.0, y, w * ratio, 3.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::active_count;

    fn state(w: f64, h: f64) -> GameState {
        let mut s = GameState::new();
        s.screen_w = w;
        s.screen_h = h;
        s
    }

    fn place_ship(s: &mut GameState, idx: usize, x: f64, y: f64, vx: f64, vy: f64) {
        let ship = &mut s.ships[idx];
        ship.active = true;
        ship.kind = ShipKind::Fighter;
        ship.x = x;
        ship.y = y;
        ship.vx = vx;
        ship.vy = vy;
        ship.health = 1;
        ship.max_health = 1;
        ship.size = ShipKind::Fighter.size();
        ship.hit_flash = 0.0;
    }

    #[test]
    fn spawned_ship_heads_for_the_target_within_speed_band() {
        let mut s = state(1200.0, 800.0);
        spawn_enemy_ship(&mut s);
        let ship = s.ships.iter().find(|sh| sh.active).expect("one ship spawned");
        let speed = (ship.vx * ship.vx + ship.vy * ship.vy).sqrt();
        let (lo, hi) = ship.kind.speed_range();
        assert!(speed >= lo - 1e-9 && speed < hi + 1e-9);
        assert_eq!(ship.health, ship.kind.max_health());
        assert_eq!(ship.rotation, ship.vy.atan2(ship.vx));
        // Heading points at the anchor
        let (tx, ty) = s.target_pos();
        let heading = (ty - ship.y).atan2(tx - ship.x);
        assert!((heading - ship.rotation).abs() < 1e-9);
    }

    #[test]
    fn ship_reaching_target_damages_it_and_explodes() {
        let mut s = state(1000.0, 1000.0);
        let (tx, ty) = s.target_pos();
        place_ship(&mut s, 0, tx + 10.0, ty, 0.0, 0.0);
        update_ships(&mut s, 0.016);
        assert!(!s.ships[0].active);
        assert_eq!(s.target_health, TARGET_MAX_HEALTH - TARGET_IMPACT_DAMAGE);
        assert_eq!(s.shake, SHAKE_IMPACT);
        assert_eq!(active_count(&s.explosions), 1);
    }

    #[test]
    fn target_health_floors_at_zero_without_panicking() {
        let mut s = state(1000.0, 1000.0);
        let (tx, ty) = s.target_pos();
        for _ in 0..15 {
            place_ship(&mut s, 0, tx, ty, 0.0, 0.0);
            update_ships(&mut s, 0.016);
        }
        assert_eq!(s.target_health, 0);
    }

    #[test]
    fn hit_flash_decays_without_affecting_health() {
        let mut s = state(1000.0, 1000.0);
        place_ship(&mut s, 0, 900.0, 900.0, 0.0, 0.0);
        s.ships[0].hit_flash = 1.0;
        update_ships(&mut s, 0.1);
        let ship = &s.ships[0];
        assert!((ship.hit_flash - (1.0 - HIT_FLASH_DECAY * 0.1)).abs() < 1e-9);
        assert_eq!(ship.health, 1);
        update_ships(&mut s, 10.0);
        assert_eq!(s.ships[0].hit_flash, 0.0, "clamped at zero");
    }

    #[test]
    fn ship_is_culled_past_the_wide_band() {
        let mut s = state(400.0, 400.0);
        place_ship(&mut s, 0, 400.0 + SHIP_CULL_PADDING - 1.0, 390.0, 200.0, 0.0);
        update_ships(&mut s, 0.1);
        assert!(!s.ships[0].active);
    }

    #[test]
    fn spawn_on_full_pool_is_dropped() {
        let mut s = state(1000.0, 1000.0);
        for _ in 0..SHIP_POOL_SIZE + 5 {
            spawn_enemy_ship(&mut s);
        }
        assert_eq!(active_count(&s.ships), SHIP_POOL_SIZE);
    }
}
