use std::cell::RefCell;
use std::rc::Rc;

use crate::constants::*;
use crate::pool::PoolSlot;
use crate::trail::Trail;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipKind {
    Fighter,
    Bomber,
    Interceptor,
}

impl ShipKind {
    pub fn from_roll(roll: f64) -> Self {
        if roll < 1.0 / 3.0 {
            ShipKind::Fighter
        } else if roll < 2.0 / 3.0 {
            ShipKind::Bomber
        } else {
            ShipKind::Interceptor
        }
    }

    pub fn max_health(self) -> i32 {
        match self {
            ShipKind::Fighter => 1,
            ShipKind::Bomber => 3,
            ShipKind::Interceptor => 2,
        }
    }

    pub fn size(self) -> f64 {
        match self {
            ShipKind::Fighter => 15.0,
            ShipKind::Bomber => 25.0,
            ShipKind::Interceptor => 18.0,
        }
    }

    /// Speed band in units/sec, inside the global 80-150 range.
    pub fn speed_range(self) -> (f64, f64) {
        match self {
            ShipKind::Fighter => (100.0, 150.0),
            ShipKind::Bomber => (80.0, 100.0),
            ShipKind::Interceptor => (110.0, 150.0),
        }
    }

    pub fn color_index(self) -> usize {
        match self {
            ShipKind::Fighter => 0,
            ShipKind::Bomber => 1,
            ShipKind::Interceptor => 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Missile {
    pub active: bool,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub lifetime: f64,
    pub max_lifetime: f64,
    pub trail: Trail,
}

impl Missile {
    fn new() -> Self {
        Self {
            active: false,
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            lifetime: 0.0,
            max_lifetime: MISSILE_LIFETIME,
            trail: Trail::new(),
        }
    }
}

impl PoolSlot for Missile {
    fn is_active(&self) -> bool {
        self.active
    }
    fn deactivate(&mut self) {
        self.active = false;
    }
}

#[derive(Debug, Clone)]
pub struct EnemyShip {
    pub active: bool,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub kind: ShipKind,
    pub health: i32,
    pub max_health: i32,
    pub size: f64,
    pub rotation: f64,
    /// Visual-only decay value; never gates simulation logic.
    pub hit_flash: f64,
}

impl EnemyShip {
    fn new() -> Self {
        Self {
            active: false,
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            kind: ShipKind::Fighter,
            health: 0,
            max_health: 0,
            size: 0.0,
            rotation: 0.0,
            hit_flash: 0.0,
        }
    }
}

impl PoolSlot for EnemyShip {
    fn is_active(&self) -> bool {
        self.active
    }
    fn deactivate(&mut self) {
        self.active = false;
    }
}

#[derive(Debug, Clone)]
pub struct Explosion {
    pub active: bool,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub lifetime: f64,
    pub max_lifetime: f64,
}

impl Explosion {
    fn new() -> Self {
        Self {
            active: false,
            x: 0.0,
            y: 0.0,
            size: 0.0,
            lifetime: 0.0,
            max_lifetime: EXPLOSION_LIFETIME,
        }
    }
}

impl PoolSlot for Explosion {
    fn is_active(&self) -> bool {
        self.active
    }
    fn deactivate(&mut self) {
        self.active = false;
    }
}

pub struct GameState {
    // Pools, pre-allocated at init, fixed capacity forever after
    pub missiles: Vec<Missile>,
    pub ships: Vec<EnemyShip>,
    pub explosions: Vec<Explosion>,

    // Gameplay
    pub score: i32,
    pub target_health: i32,

    // Container box, CSS pixels
    pub screen_w: f64,
    pub screen_h: f64,

    // Screen shake scalar, linear decay
    pub shake: f64,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            missiles: (0..MISSILE_POOL_SIZE).map(|_| Missile::new()).collect(),
            ships: (0..SHIP_POOL_SIZE).map(|_| EnemyShip::new()).collect(),
            explosions: (0..EXPLOSION_POOL_SIZE).map(|_| Explosion::new()).collect(),
            score: 0,
            target_health: TARGET_MAX_HEALTH,
            screen_w: 0.0,
            screen_h: 0.0,
            shake: 0.0,
        }
    }

    /// Launcher anchor and defended-target position: top-center of the
    /// container at 30% height.
    pub fn target_pos(&self) -> (f64, f64) {
        (self.screen_w / 2.0, self.screen_h * TARGET_ANCHOR_Y_FRAC)
    }
}

pub type SharedState = Rc<RefCell<GameState>>;

pub fn new_shared_state() -> SharedState {
    Rc::new(RefCell::new(GameState::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool;

    #[test]
    fn pools_start_at_capacity_and_fully_inactive() {
        let s = GameState::new();
        assert_eq!(s.missiles.len(), MISSILE_POOL_SIZE);
        assert_eq!(s.ships.len(), SHIP_POOL_SIZE);
        assert_eq!(s.explosions.len(), EXPLOSION_POOL_SIZE);
        assert_eq!(pool::active_count(&s.missiles), 0);
        assert_eq!(pool::active_count(&s.ships), 0);
        assert_eq!(pool::active_count(&s.explosions), 0);
    }

    #[test]
    fn target_anchor_is_top_center_at_30_percent() {
        let mut s = GameState::new();
        s.screen_w = 1200.0;
        s.screen_h = 800.0;
        assert_eq!(s.target_pos(), (600.0, 240.0));
    }

    #[test]
    fn ship_kind_stats_match_tuning() {
        assert_eq!(ShipKind::Fighter.max_health(), 1);
        assert_eq!(ShipKind::Fighter.size(), 15.0);
        assert_eq!(ShipKind::Bomber.max_health(), 3);
        assert_eq!(ShipKind::Bomber.size(), 25.0);
        assert_eq!(ShipKind::Interceptor.max_health(), 2);
        assert_eq!(ShipKind::Interceptor.size(), 18.0);
    }

    #[test]
    fn kind_roll_is_uniform_over_thirds() {
        assert_eq!(ShipKind::from_roll(0.1), ShipKind::Fighter);
        assert_eq!(ShipKind::from_roll(0.5), ShipKind::Bomber);
        assert_eq!(ShipKind::from_roll(0.9), ShipKind::Interceptor);
    }
}
