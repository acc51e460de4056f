//! Mount lifecycle: Loading -> Running -> TornDown
//!
//! The timer handle lives here so that starting and cancelling it stays tied
//! 1:1 to mount and teardown. The scheduler itself is a trait so the browser
//! can use `setInterval` while tests count calls.

use crate::error::Result;

/// Background + logo
pub const REQUIRED_ASSETS: u8 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Loading { loaded: u8 },
    Running,
    TornDown,
}

/// Fixed-rate repeating timer
pub trait TickScheduler {
    type Handle: Copy;

    fn schedule(&mut self, period_ms: i32) -> Result<Self::Handle>;

    fn cancel(&mut self, handle: Self::Handle);
}

pub struct Lifecycle<S: TickScheduler> {
    phase: Phase,
    scheduler: S,
    handle: Option<S::Handle>,
}

impl<S: TickScheduler> Lifecycle<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            phase: Phase::Loading { loaded: 0 },
            scheduler,
            handle: None,
        }
    }

    pub fn phase(&self) -> Phase { self.phase }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_torn_down(&self) -> bool {
        self.phase == Phase::TornDown
    }

    pub fn scheduler(&self) -> &S { &self.scheduler }

    /// Count one loaded asset. True exactly once: when the last required
    /// asset arrives and the effect may start.
    pub fn asset_loaded(&mut self) -> bool {
        match self.phase {
            Phase::Loading { loaded } if loaded < REQUIRED_ASSETS => {
                let loaded = loaded + 1;
                self.phase = Phase::Loading { loaded };
                loaded == REQUIRED_ASSETS
            }
            _ => false,
        }
    }

    /// Start the repeating tick. No-op unless every asset has loaded and the
    /// timer is not already running.
    pub fn start(&mut self, period_ms: i32) -> Result<()> {
        if self.phase != (Phase::Loading { loaded: REQUIRED_ASSETS }) || self.handle.is_some() {
            return Ok(());
        }
        let handle = self.scheduler.schedule(period_ms)?;
        self.handle = Some(handle);
        self.phase = Phase::Running;
        Ok(())
    }

    /// Cancel the timer (if any) and refuse all further ticks.
    /// True only on the first call.
    pub fn teardown(&mut self) -> bool {
        if self.phase == Phase::TornDown {
            return false;
        }
        if let Some(handle) = self.handle.take() {
            self.scheduler.cancel(handle);
        }
        self.phase = Phase::TornDown;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RippleError;

    #[derive(Default)]
    struct CountingScheduler {
        scheduled: Vec<i32>,
        cancelled: Vec<u32>,
        fail: bool,
    }

    impl TickScheduler for CountingScheduler {
        type Handle = u32;

        fn schedule(&mut self, period_ms: i32) -> Result<u32> {
            if self.fail {
                return Err(RippleError::Canvas("no window".into()));
            }
            self.scheduled.push(period_ms);
            Ok(self.scheduled.len() as u32)
        }

        fn cancel(&mut self, handle: u32) {
            self.cancelled.push(handle);
        }
    }

    #[test]
    fn starts_only_after_both_assets() {
        let mut lc = Lifecycle::new(CountingScheduler::default());
        lc.start(25).unwrap();
        assert!(!lc.is_running());

        assert!(!lc.asset_loaded());
        lc.start(25).unwrap();
        assert!(!lc.is_running());

        assert!(lc.asset_loaded());
        lc.start(25).unwrap();
        assert!(lc.is_running());
        assert_eq!(lc.scheduler().scheduled, vec![25]);

        // extra load events and restarts change nothing
        assert!(!lc.asset_loaded());
        lc.start(25).unwrap();
        assert_eq!(lc.scheduler().scheduled.len(), 1);
    }

    #[test]
    fn teardown_cancels_exactly_once() {
        let mut lc = Lifecycle::new(CountingScheduler::default());
        lc.asset_loaded();
        lc.asset_loaded();
        lc.start(25).unwrap();

        assert!(lc.teardown());
        assert!(!lc.teardown());
        assert_eq!(lc.scheduler().cancelled, vec![1]);
        assert!(lc.is_torn_down());
        assert!(!lc.is_running());
    }

    #[test]
    fn teardown_while_loading_never_starts() {
        let mut lc = Lifecycle::new(CountingScheduler::default());
        lc.asset_loaded();
        assert!(lc.teardown());

        assert!(!lc.asset_loaded());
        lc.start(25).unwrap();
        assert!(!lc.is_running());
        assert!(lc.scheduler().scheduled.is_empty());
        assert!(lc.scheduler().cancelled.is_empty());
    }

    #[test]
    fn failed_schedule_stays_loading() {
        let mut lc = Lifecycle::new(CountingScheduler { fail: true, ..Default::default() });
        lc.asset_loaded();
        lc.asset_loaded();
        assert!(lc.start(25).is_err());
        assert_eq!(lc.phase(), Phase::Loading { loaded: REQUIRED_ASSETS });
    }
}
