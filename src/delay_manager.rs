use std::thread;
use std::time::Duration;

use log::info;
use rand::Rng;

/// Randomised pause between consecutive page requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageDelay {
    min_ms: u64,
    max_ms: u64,
}

impl PageDelay {
    pub fn disabled() -> Self {
        PageDelay::default()
    }

    /// Uniform jitter in `min_ms..=max_ms`. Bounds are swapped if reversed.
    pub fn between(min_ms: u64, max_ms: u64) -> Self {
        PageDelay {
            min_ms: min_ms.min(max_ms),
            max_ms: min_ms.max(max_ms),
        }
    }

    pub fn fixed(ms: u64) -> Self {
        PageDelay::between(ms, ms)
    }

    pub fn is_enabled(&self) -> bool {
        self.max_ms > 0
    }

    pub fn pick(&self) -> Duration {
        if self.min_ms == self.max_ms {
            return Duration::from_millis(self.max_ms);
        }
        let mut rng = rand::thread_rng();
        Duration::from_millis(rng.gen_range(self.min_ms..=self.max_ms))
    }

    pub fn wait(&self) {
        if !self.is_enabled() {
            return;
        }
        let delay = self.pick();
        info!("Waiting for {} ms (Page Delay)...", delay.as_millis());
        thread::sleep(delay);
    }
}
