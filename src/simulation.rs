//! Per-tick simulation orchestration. The loop driver calls [`step`] once per
//! rendered frame with the clamped wall-clock delta; input callbacks only ever
//! activate pool slots between frames, so nothing here needs locking.

use crate::constants::SHAKE_DECAY;
use crate::state::GameState;
use crate::{explosions, missiles, ships};

pub fn step(s: &mut GameState, dt: f64) {
    missiles::update_missiles(s, dt);
    missiles::collide_missiles(s);
    ships::update_ships(s, dt);
    explosions::update_explosions(s, dt);
    s.shake = (s.shake - SHAKE_DECAY * dt).max(0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use crate::pool::active_count;
    use crate::state::ShipKind;

    const TICK: f64 = 1.0 / 60.0;

    fn state(w: f64, h: f64) -> GameState {
        let mut s = GameState::new();
        s.screen_w = w;
        s.screen_h = h;
        s
    }

    #[test]
    fn missed_launch_expires_with_score_unchanged() {
        let mut s = state(5000.0, 5000.0);
        missiles::launch_missile(&mut s, 2500.0, 4000.0);
        assert_eq!(active_count(&s.missiles), 1);

        let mut elapsed = 0.0;
        while elapsed < MISSILE_LIFETIME + 0.1 {
            step(&mut s, TICK);
            elapsed += TICK;
        }
        assert_eq!(active_count(&s.missiles), 0);
        assert_eq!(s.score, 0);
    }

    #[test]
    fn one_shot_kill_scenario() {
        let mut s = state(1000.0, 1000.0);
        // A fighter parked directly below the launcher, inside missile range
        let ship = &mut s.ships[0];
        ship.active = true;
        ship.kind = ShipKind::Fighter;
        ship.x = 500.0;
        ship.y = 700.0;
        ship.vx = 0.0;
        ship.vy = 0.0;
        ship.health = 1;
        ship.max_health = 1;
        ship.size = ShipKind::Fighter.size();

        missiles::launch_missile(&mut s, 500.0, 700.0);
        let mut elapsed = 0.0;
        while active_count(&s.ships) > 0 && elapsed < MISSILE_LIFETIME {
            step(&mut s, TICK);
            elapsed += TICK;
        }

        assert_eq!(active_count(&s.ships), 0, "fighter destroyed");
        assert_eq!(s.score, 100);
        let e = s.explosions.iter().find(|e| e.active).expect("kill explosion");
        assert_eq!(e.size, 2.0 * 15.0);
        let dist = ((e.x - 500.0).powi(2) + (e.y - 700.0).powi(2)).sqrt();
        assert!(dist < 1.0, "explosion at the ship's last position");
    }

    #[test]
    fn missile_pool_exhaustion_is_a_noop() {
        let mut s = state(1000.0, 1000.0);
        for i in 0..MISSILE_POOL_SIZE {
            missiles::launch_missile(&mut s, 100.0 + i as f64, 900.0);
        }
        assert_eq!(active_count(&s.missiles), MISSILE_POOL_SIZE);

        let snapshot: Vec<_> = s.missiles.iter().map(|m| (m.x, m.y, m.vx, m.vy)).collect();
        missiles::launch_missile(&mut s, 999.0, 999.0);
        assert_eq!(active_count(&s.missiles), MISSILE_POOL_SIZE);
        let after: Vec<_> = s.missiles.iter().map(|m| (m.x, m.y, m.vx, m.vy)).collect();
        assert_eq!(snapshot, after, "no existing missile's state changed");
    }

    #[test]
    fn score_is_monotonically_non_decreasing() {
        let mut s = state(1000.0, 1000.0);
        let mut last_score = 0;
        for i in 0..5 {
            let ship = &mut s.ships[0];
            ship.active = true;
            ship.kind = ShipKind::Fighter;
            ship.x = 500.0;
            ship.y = 600.0;
            ship.vx = 0.0;
            ship.vy = 0.0;
            ship.health = 1;
            ship.max_health = 1;
            ship.size = 15.0;

            let m = &mut s.missiles[i];
            m.active = true;
            m.x = 500.0;
            m.y = 600.0;
            m.vx = 0.0;
            m.vy = 0.0;
            m.lifetime = 0.0;

            step(&mut s, TICK);
            assert!(s.score >= last_score);
            last_score = s.score;
        }
        assert_eq!(s.score, 500);
    }

    #[test]
    fn shake_decays_linearly_to_zero() {
        let mut s = state(1000.0, 1000.0);
        s.shake = SHAKE_IMPACT;
        step(&mut s, 0.1);
        assert!((s.shake - (SHAKE_IMPACT - SHAKE_DECAY * 0.1)).abs() < 1e-9);
        step(&mut s, 10.0);
        assert_eq!(s.shake, 0.0);
    }

    #[test]
    fn zero_target_health_does_not_halt_the_simulation() {
        let mut s = state(1000.0, 1000.0);
        s.target_health = 0;
        missiles::launch_missile(&mut s, 500.0, 900.0);
        step(&mut s, TICK);
        assert_eq!(active_count(&s.missiles), 1, "loop keeps running at zero health");
    }
}
