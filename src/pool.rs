//! Fixed-capacity entity pools. Slots are pre-allocated at init with
//! `active == false`; spawning overwrites a free slot's fields and flips the
//! flag, releasing just clears it. Acquisition on a full pool returns `None`
//! and the spawn is silently dropped.

pub trait PoolSlot {
    fn is_active(&self) -> bool;
    fn deactivate(&mut self);
}

/// Linear scan for the first inactive slot. The caller overwrites the slot's
/// fields and sets it active; stale fields are never cleared implicitly.
pub fn acquire<T: PoolSlot>(pool: &mut [T]) -> Option<&mut T> {
    pool.iter_mut().find(|slot| !slot.is_active())
}

pub fn active_count<T: PoolSlot>(pool: &[T]) -> usize {
    pool.iter().filter(|slot| slot.is_active()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Slot {
        active: bool,
        tag: u32,
    }

    impl PoolSlot for Slot {
        fn is_active(&self) -> bool {
            self.active
        }
        fn deactivate(&mut self) {
            self.active = false;
        }
    }

    fn pool(n: usize) -> Vec<Slot> {
        (0..n).map(|i| Slot { active: false, tag: i as u32 }).collect()
    }

    #[test]
    fn acquire_returns_first_inactive() {
        let mut p = pool(4);
        p[0].active = true;
        p[2].active = true;
        let slot = acquire(&mut p).unwrap();
        assert_eq!(slot.tag, 1);
    }

    #[test]
    fn full_pool_returns_none_and_leaves_slots_untouched() {
        let mut p = pool(3);
        for s in p.iter_mut() {
            s.active = true;
        }
        let tags: Vec<_> = p.iter().map(|s| s.tag).collect();
        assert!(acquire(&mut p).is_none());
        assert_eq!(p.iter().map(|s| s.tag).collect::<Vec<_>>(), tags);
        assert_eq!(active_count(&p), 3);
    }

    #[test]
    fn release_makes_slot_reacquirable() {
        let mut p = pool(2);
        p[0].active = true;
        p[1].active = true;
        p[1].deactivate();
        let slot = acquire(&mut p).unwrap();
        assert_eq!(slot.tag, 1);
        assert_eq!(active_count(&p), 1);
    }

    #[test]
    fn active_count_never_exceeds_capacity() {
        let mut p = pool(5);
        for _ in 0..20 {
            if let Some(slot) = acquire(&mut p) {
                slot.active = true;
            }
        }
        assert_eq!(active_count(&p), 5);
    }
}
