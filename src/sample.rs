//! Uniform random sampling of paths without replacement.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;
use std::sync::Mutex;

/// A process-lifetime random source for picking images.
///
/// The generator is seeded once from OS entropy, so every run draws a
/// different sequence, and is guarded by a mutex so one sampler can be
/// shared across request threads.
#[derive(Debug)]
pub struct RandomSampler {
    rng: Mutex<StdRng>,
}

impl RandomSampler {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// A reproducible sampler.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Draw `count` distinct entries from `paths`, in random order.
    ///
    /// `count` is clamped to `paths.len()`; asking for more than exists is
    /// not an error.
    pub fn sample<T: Clone>(&self, paths: &[T], count: usize) -> Vec<T> {
        let amount = count.min(paths.len());
        // a poisoned lock only means another sampler call panicked; the
        // generator state itself is still valid
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        index::sample(&mut *rng, paths.len(), amount)
            .into_iter()
            .map(|i| paths[i].clone())
            .collect()
    }
}

impl Default for RandomSampler {
    fn default() -> Self {
        Self::new()
    }
}
