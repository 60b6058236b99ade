use crate::constants::*;

/// Star-map preset chosen once at construction from device capability and
/// the reduced-motion accessibility preference. Never re-evaluated at
/// runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTier {
    pub stars: usize,
    pub nebulae: usize,
    pub parallax: bool,
    pub auto_rotate: bool,
}

pub fn tier_for(mobile: bool, cores: u32, reduced_motion: bool) -> RenderTier {
    let (stars, nebulae) = if mobile || cores <= 4 {
        (STARS_LOW, NEBULAE_LOW)
    } else if cores < 8 {
        (STARS_MID, NEBULAE_MID)
    } else {
        (STARS_HIGH, NEBULAE_HIGH)
    };

    RenderTier {
        stars,
        nebulae,
        parallax: !reduced_motion && !mobile,
        auto_rotate: !reduced_motion,
    }
}

/// One-shot capability probe: touch/UA mobile sniff, logical core count,
/// `prefers-reduced-motion` media query.
pub fn detect() -> RenderTier {
    let Some(window) = web_sys::window() else {
        return tier_for(false, 8, false);
    };
    let nav = window.navigator();

    let ua_mobile = nav
        .user_agent()
        .map(|ua| {
            let ua = ua.to_lowercase();
            ua.contains("android") || ua.contains("iphone") || ua.contains("ipad")
        })
        .unwrap_or(false);
    let mobile = nav.max_touch_points() > 0 || ua_mobile;

    let cores = nav.hardware_concurrency() as u32;

    let reduced_motion = window
        .match_media("(prefers-reduced-motion: reduce)")
        .ok()
        .flatten()
        .map(|mq| mq.matches())
        .unwrap_or(false);

    tier_for(mobile, cores, reduced_motion)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mobile_gets_low_tier_without_nebulae_or_parallax() {
        let t = tier_for(true, 16, false);
        assert_eq!(t.stars, STARS_LOW);
        assert_eq!(t.nebulae, NEBULAE_LOW);
        assert!(!t.parallax);
        assert!(t.auto_rotate);
    }

    #[test]
    fn low_core_desktop_gets_low_tier() {
        let t = tier_for(false, 4, false);
        assert_eq!(t.stars, STARS_LOW);
        assert!(t.parallax);
    }

    #[test]
    fn mid_core_desktop_gets_mid_tier() {
        let t = tier_for(false, 6, false);
        assert_eq!(t.stars, STARS_MID);
        assert_eq!(t.nebulae, NEBULAE_MID);
    }

    #[test]
    fn high_core_desktop_gets_full_tier() {
        let t = tier_for(false, 12, false);
        assert_eq!(t.stars, STARS_HIGH);
        assert_eq!(t.nebulae, NEBULAE_HIGH);
        assert!(t.parallax && t.auto_rotate);
    }

    #[test]
    fn reduced_motion_disables_parallax_and_auto_rotate() {
        let t = tier_for(false, 12, true);
        assert!(!t.parallax);
        assert!(!t.auto_rotate);
        assert_eq!(t.stars, STARS_HIGH, "star count unaffected");
    }
}
