// Random Source Port (for deterministic testing)

/// Randomness used by the load balancer
pub trait RandomSource: Send + Sync {
    /// Draw two distinct indices from `0..len`, every unordered pair equally
    /// likely. Callers guarantee `len >= 2`.
    fn pick_two(&self, len: usize) -> (usize, usize);
}

/// Thread-local RNG (production)
pub struct ThreadRandomSource;

impl RandomSource for ThreadRandomSource {
    fn pick_two(&self, len: usize) -> (usize, usize) {
        let picked = rand::seq::index::sample(&mut rand::thread_rng(), len, 2);
        (picked.index(0), picked.index(1))
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays a fixed sequence of picks, then falls back to `(0, 1)`
    pub struct ScriptedRandomSource {
        picks: Mutex<VecDeque<(usize, usize)>>,
    }

    impl ScriptedRandomSource {
        pub fn new(picks: impl IntoIterator<Item = (usize, usize)>) -> Self {
            Self {
                picks: Mutex::new(picks.into_iter().collect()),
            }
        }

        pub fn push(&self, pick: (usize, usize)) {
            self.picks.lock().unwrap().push_back(pick);
        }
    }

    impl RandomSource for ScriptedRandomSource {
        fn pick_two(&self, _len: usize) -> (usize, usize) {
            self.picks.lock().unwrap().pop_front().unwrap_or((0, 1))
        }
    }
}
