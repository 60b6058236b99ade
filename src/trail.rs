use crate::constants::TRAIL_LEN;

/// Fixed-length circular buffer of missile positions. Once full, writes wrap
/// and overwrite the oldest sample.
#[derive(Debug, Clone)]
pub struct Trail {
    xs: [f64; TRAIL_LEN],
    ys: [f64; TRAIL_LEN],
    head: usize,
    filled: bool,
}

impl Trail {
    pub fn new() -> Self {
        Self {
            xs: [0.0; TRAIL_LEN],
            ys: [0.0; TRAIL_LEN],
            head: 0,
            filled: false,
        }
    }

    /// Reset without touching the stale samples; they are overwritten on push.
    pub fn clear(&mut self) {
        self.head = 0;
        self.filled = false;
    }

    pub fn push(&mut self, x: f64, y: f64) {
        self.xs[self.head] = x;
        self.ys[self.head] = y;
        self.head = (self.head + 1) % TRAIL_LEN;
        if self.head == 0 {
            self.filled = true;
        }
    }

    pub fn len(&self) -> usize {
        if self.filled { TRAIL_LEN } else { self.head }
    }

    /// Samples in chronological order, oldest first.
    pub fn iter_oldest_first(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        let start = if self.filled { self.head } else { 0 };
        let len = self.len();
        (0..len).map(move |i| {
            let idx = (start + i) % TRAIL_LEN;
            (self.xs[idx], self.ys[idx])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_fill_reads_back_in_order() {
        let mut t = Trail::new();
        for i in 0..7 {
            t.push(i as f64, -(i as f64));
        }
        assert_eq!(t.len(), 7);
        let got: Vec<_> = t.iter_oldest_first().collect();
        let want: Vec<_> = (0..7).map(|i| (i as f64, -(i as f64))).collect();
        assert_eq!(got, want);
    }

    #[test]
    fn wraparound_keeps_most_recent_in_order() {
        let mut t = Trail::new();
        let total = TRAIL_LEN + 6;
        for i in 0..total {
            t.push(i as f64, i as f64 * 2.0);
        }
        assert_eq!(t.len(), TRAIL_LEN);
        let got: Vec<_> = t.iter_oldest_first().collect();
        let want: Vec<_> = (total - TRAIL_LEN..total)
            .map(|i| (i as f64, i as f64 * 2.0))
            .collect();
        assert_eq!(got, want);
    }

    #[test]
    fn clear_resets_length_and_order() {
        let mut t = Trail::new();
        for i in 0..TRAIL_LEN * 2 {
            t.push(i as f64, 0.0);
        }
        t.clear();
        assert_eq!(t.len(), 0);
        t.push(99.0, 1.0);
        assert_eq!(t.iter_oldest_first().collect::<Vec<_>>(), vec![(99.0, 1.0)]);
    }

    #[test]
    fn exactly_full_buffer_is_oldest_first() {
        let mut t = Trail::new();
        for i in 0..TRAIL_LEN {
            t.push(i as f64, 0.0);
        }
        assert_eq!(t.len(), TRAIL_LEN);
        let first = t.iter_oldest_first().next().unwrap();
        assert_eq!(first.0, 0.0);
    }
}
