use std::cell::Cell;

// WASM-native xorshift64 (avoids JS interop overhead of Math.random on the
// per-frame path). Seeded once from JS entropy at startup; the non-zero
// default keeps native tests deterministic.
thread_local! {
    static RNG_STATE: Cell<u64> = Cell::new(0x9e37_79b9_7f4a_7c15);
}

/// Seed from host entropy. Called once at startup on the wasm path.
pub fn seed_from_entropy() {
    let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
    RNG_STATE.with(|s| s.set(if seed == 0 { 1 } else { seed }));
}

/// Uniform in [0, 1).
pub fn random() -> f64 {
    RNG_STATE.with(|s| {
        let mut state = s.get();
        if state == 0 {
            state = 1;
        }
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        s.set(state);
        (state >> 11) as f64 / (1u64 << 53) as f64
    })
}

/// Uniform in [lo, hi).
pub fn range(lo: f64, hi: f64) -> f64 {
    lo + random() * (hi - lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_stays_in_unit_interval() {
        for _ in 0..1000 {
            let r = random();
            assert!((0.0..1.0).contains(&r));
        }
    }

    #[test]
    fn range_stays_in_bounds() {
        for _ in 0..1000 {
            let r = range(80.0, 150.0);
            assert!((80.0..150.0).contains(&r));
        }
    }
}
