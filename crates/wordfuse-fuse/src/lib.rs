//! Single-shot bomb fuse for wordfuse rooms.
//!
//! Each room owns exactly one [`Fuse`]. Arming it sets a deadline; the room
//! actor awaits [`Fuse::wait_for_detonation`] inside its `select!` loop
//! alongside its command channel:
//!
//! ```rust,ignore
//! loop {
//!     tokio::select! {
//!         cmd = self.rx.recv() => { /* join, submit, ... */ }
//!         boom = self.game.fuse_mut().wait_for_detonation() => {
//!             self.game.detonate(boom);
//!         }
//!     }
//! }
//! ```
//!
//! There is no spawned timer task to leak or race: the deadline is plain
//! data, so "at most one live timer" holds by construction, and dropping
//! the room drops its fuse.
//!
//! Every arm is tagged with the caller's turn marker. A [`Detonation`]
//! reports the marker it was armed under so the caller can discard it if
//! the turn moved on in the meantime.

use std::time::Duration;

use rand::Rng;
use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Bounds for randomly drawn fuse lengths, in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuseConfig {
    pub min_secs: u64,
    pub max_secs: u64,
}

impl Default for FuseConfig {
    fn default() -> Self {
        Self {
            min_secs: 5,
            max_secs: 40,
        }
    }
}

impl FuseConfig {
    /// Upper bound on any fuse.
    pub const MAX_SECS: u64 = 600;

    pub fn new(min_secs: u64, max_secs: u64) -> Self {
        Self { min_secs, max_secs }
    }

    /// Returns a copy with bounds forced into `1..=MAX_SECS` and ordered.
    pub fn validated(mut self) -> Self {
        if self.min_secs > self.max_secs {
            warn!(
                min = self.min_secs,
                max = self.max_secs,
                "fuse bounds inverted; swapping"
            );
            std::mem::swap(&mut self.min_secs, &mut self.max_secs);
        }
        if self.min_secs == 0 {
            warn!("fuse minimum of 0s; raising to 1s");
            self.min_secs = 1;
        }
        if self.max_secs > Self::MAX_SECS {
            warn!(
                max = self.max_secs,
                limit = Self::MAX_SECS,
                "fuse maximum too long; clamping"
            );
            self.max_secs = Self::MAX_SECS;
        }
        self.max_secs = self.max_secs.max(self.min_secs);
        self
    }
}

// ---------------------------------------------------------------------------
// Events and stats
// ---------------------------------------------------------------------------

/// A fuse that burned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detonation {
    /// Turn marker passed to [`Fuse::arm`].
    pub turn: u64,
    /// Length the fuse was armed with.
    pub length: Duration,
}

/// Lifetime counters for one fuse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FuseStats {
    pub armed: u64,
    pub detonations: u64,
    /// Armed fuses that were cancelled or replaced before burning down.
    pub defusals: u64,
}

// ---------------------------------------------------------------------------
// Fuse
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Armed {
    turn: u64,
    deadline: Instant,
    length: Duration,
}

/// A single optional countdown.
#[derive(Debug)]
pub struct Fuse {
    config: FuseConfig,
    armed: Option<Armed>,
    stats: FuseStats,
}

impl Fuse {
    pub fn new(config: FuseConfig) -> Self {
        Self {
            config: config.validated(),
            armed: None,
            stats: FuseStats::default(),
        }
    }

    pub fn config(&self) -> FuseConfig {
        self.config
    }

    /// Draws a fuse length uniformly from the configured bounds.
    pub fn draw(&self) -> Duration {
        let secs = rand::rng().random_range(self.config.min_secs..=self.config.max_secs);
        Duration::from_secs(secs)
    }

    /// Arms the fuse for `turn`. An already armed fuse is replaced.
    pub fn arm(&mut self, turn: u64, length: Duration) {
        if let Some(prev) = self.armed.take() {
            trace!(turn = prev.turn, "replacing armed fuse");
            self.stats.defusals += 1;
        }
        self.armed = Some(Armed {
            turn,
            deadline: Instant::now() + length,
            length,
        });
        self.stats.armed += 1;
        debug!(turn, secs = length.as_secs(), "fuse armed");
    }

    /// Disarms the fuse. Returns the turn it was armed for, if any.
    pub fn cancel(&mut self) -> Option<u64> {
        let prev = self.armed.take()?;
        self.stats.defusals += 1;
        trace!(turn = prev.turn, "fuse cancelled");
        Some(prev.turn)
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Time left before detonation.
    pub fn remaining(&self) -> Option<Duration> {
        self.armed
            .map(|a| a.deadline.saturating_duration_since(Instant::now()))
    }

    pub fn stats(&self) -> FuseStats {
        self.stats
    }

    /// Resolves when the armed fuse burns down, disarming it.
    ///
    /// Pends forever while disarmed, so a `select!` branch on it simply
    /// never fires. Cancel-safe: the fuse is only consumed after the
    /// deadline passes, so dropping the future early leaves it armed.
    pub async fn wait_for_detonation(&mut self) -> Detonation {
        let Some(armed) = self.armed else {
            return std::future::pending().await;
        };

        time::sleep_until(armed.deadline).await;

        self.armed = None;
        self.stats.detonations += 1;
        debug!(turn = armed.turn, "fuse detonated");

        Detonation {
            turn: armed.turn,
            length: armed.length,
        }
    }
}

impl Default for Fuse {
    fn default() -> Self {
        Self::new(FuseConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bounds() {
        let cfg = FuseConfig::default();
        assert_eq!((cfg.min_secs, cfg.max_secs), (5, 40));
    }

    #[test]
    fn test_validated_swaps_inverted_bounds() {
        let cfg = FuseConfig::new(30, 10).validated();
        assert_eq!((cfg.min_secs, cfg.max_secs), (10, 30));
    }

    #[test]
    fn test_validated_raises_zero_minimum() {
        let cfg = FuseConfig::new(0, 0).validated();
        assert_eq!((cfg.min_secs, cfg.max_secs), (1, 1));
    }

    #[test]
    fn test_validated_clamps_maximum() {
        let cfg = FuseConfig::new(5, 10_000).validated();
        assert_eq!(cfg.max_secs, FuseConfig::MAX_SECS);
    }

    #[test]
    fn test_draw_stays_in_bounds() {
        let fuse = Fuse::new(FuseConfig::new(5, 8));
        for _ in 0..200 {
            let secs = fuse.draw().as_secs();
            assert!((5..=8).contains(&secs), "drew {secs}");
        }
    }

    #[test]
    fn test_draw_fixed_bounds() {
        let fuse = Fuse::new(FuseConfig::new(3, 3));
        assert_eq!(fuse.draw(), Duration::from_secs(3));
    }

    #[test]
    fn test_arm_replaces_previous_and_counts_defusal() {
        let mut fuse = Fuse::default();
        fuse.arm(1, Duration::from_secs(5));
        fuse.arm(2, Duration::from_secs(5));

        assert_eq!(fuse.stats().armed, 2);
        assert_eq!(fuse.stats().defusals, 1);
        assert_eq!(fuse.cancel(), Some(2));
    }

    #[test]
    fn test_cancel_disarmed_is_noop() {
        let mut fuse = Fuse::default();
        assert_eq!(fuse.cancel(), None);
        assert_eq!(fuse.stats().defusals, 0);
    }
}
