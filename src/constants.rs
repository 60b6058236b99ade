// Hero simulation constants. Compile-time tuning values, not runtime config.

// Pools
pub const MISSILE_POOL_SIZE: usize = 50;
pub const SHIP_POOL_SIZE: usize = 15;
pub const EXPLOSION_POOL_SIZE: usize = 30;

// Missiles
pub const MISSILE_SPEED: f64 = 600.0; // units/sec
pub const MISSILE_LIFETIME: f64 = 3.0; // sec
pub const MISSILE_RADIUS: f64 = 5.0;
pub const MISSILE_CULL_PADDING: f64 = 50.0;
pub const TRAIL_LEN: usize = 15;

// Enemy ships
pub const SHIP_SPAWN_INTERVAL_MS: f64 = 2000.0;
pub const SHIP_CULL_PADDING: f64 = 100.0;
pub const HIT_FLASH_DECAY: f64 = 3.0; // per sec

// Defended target (the Megabot turret)
pub const TARGET_RADIUS: f64 = 40.0;
pub const TARGET_MAX_HEALTH: i32 = 100;
pub const TARGET_IMPACT_DAMAGE: i32 = 10;
/// Launcher/target anchor sits at top-center, this fraction of container height.
pub const TARGET_ANCHOR_Y_FRAC: f64 = 0.3;

// Explosions
pub const EXPLOSION_LIFETIME: f64 = 0.5; // sec

// Scoring
pub const SCORE_PER_HEALTH: i32 = 100;

// Screen shake
pub const SHAKE_DECAY: f64 = 30.0; // per sec
pub const SHAKE_IMPACT: f64 = 15.0;

// Loop driver: skip physics entirely when the frame gap exceeds this
// (tab-backgrounding protection).
pub const FRAME_DELTA_MAX_MS: f64 = 100.0;

// Star map tiers
pub const STARS_LOW: usize = 2000;
pub const STARS_MID: usize = 5000;
pub const STARS_HIGH: usize = 15000;
pub const NEBULAE_LOW: usize = 0;
pub const NEBULAE_MID: usize = 2;
pub const NEBULAE_HIGH: usize = 4;

// Colors per ship type: body fill rgb + glow
pub struct ShipColor {
    pub body: (u8, u8, u8),
    pub glow: &'static str,
}

pub const SHIP_COLORS: [ShipColor; 3] = [
    ShipColor { body: (255, 68, 68), glow: "rgba(255, 68, 68, 0.35)" }, // fighter
    ShipColor { body: (255, 170, 0), glow: "rgba(255, 170, 0, 0.35)" }, // bomber
    ShipColor { body: (170, 170, 255), glow: "rgba(170, 170, 255, 0.35)" }, // interceptor
];

// Fixed five-color star palette
pub const STAR_PALETTE: [(f32, f32, f32); 5] = [
    (1.0, 1.0, 1.0),   // white
    (0.81, 0.89, 1.0), // blue-white
    (1.0, 0.91, 0.77), // warm white
    (1.0, 0.82, 0.63), // amber
    (0.61, 0.69, 1.0), // violet-blue
];
