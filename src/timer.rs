//! Host-side periodic tick scheduling.
//!
//! The engine never sleeps or spawns threads. It asks a [`TickTimer`] for a
//! periodic schedule, keeps the returned [`TickHandle`], and asks the timer on
//! every host poll whether that schedule has a tick due. Cancelling a handle
//! discards any tick it had pending, so a stale schedule can never fire.

use std::time::{Duration, Instant};

/// Identifies one installed periodic schedule.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct TickHandle(u64);

/// A cancellable periodic schedule owned by the host.
pub trait TickTimer {
    /// Installs a periodic schedule firing every `interval`.
    fn schedule(&mut self, interval: Duration) -> TickHandle;

    /// Removes a schedule; pending fires of that handle are dropped.
    fn cancel(&mut self, handle: TickHandle);

    /// Consumes one due fire of `handle`, returning whether one was due.
    fn take_due(&mut self, handle: TickHandle) -> bool;
}

#[derive(Debug, Clone, Copy)]
struct ActiveSchedule {
    handle: TickHandle,
    interval: Duration,
    deadline: Instant,
}

/// Wall-clock timer backing the terminal host loop.
///
/// Holds at most one schedule. Installing a new schedule replaces the old
/// one, and a host that falls behind gets one tick, not a burst.
#[derive(Debug, Default)]
pub struct IntervalTimer {
    next_id: u64,
    active: Option<ActiveSchedule>,
}

impl IntervalTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Time left until the active schedule is due, if any is installed.
    #[must_use]
    pub fn time_until_due(&self) -> Option<Duration> {
        self.active
            .map(|active| active.deadline.saturating_duration_since(Instant::now()))
    }

    fn take_due_at(&mut self, handle: TickHandle, now: Instant) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if active.handle != handle || now < active.deadline {
            return false;
        }

        active.deadline += active.interval;
        if active.deadline <= now {
            active.deadline = now + active.interval;
        }
        true
    }
}

impl TickTimer for IntervalTimer {
    fn schedule(&mut self, interval: Duration) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle(self.next_id);
        if let Some(previous) = self.active {
            log::debug!("replacing tick schedule {:?}", previous.handle);
        }

        self.active = Some(ActiveSchedule {
            handle,
            interval,
            deadline: Instant::now() + interval,
        });
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        if self.active.is_some_and(|active| active.handle == handle) {
            self.active = None;
        }
    }

    fn take_due(&mut self, handle: TickHandle) -> bool {
        self.take_due_at(handle, Instant::now())
    }
}

/// Timer driven explicitly by the caller, for deterministic hosts and tests.
///
/// [`ManualTimer::fire`] queues one tick on the active schedule.
#[derive(Debug, Default)]
pub struct ManualTimer {
    next_id: u64,
    active: Option<(TickHandle, Duration)>,
    queued: u32,
    schedules_installed: u32,
}

impl ManualTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues one tick if a schedule is installed. Returns whether it was queued.
    pub fn fire(&mut self) -> bool {
        if self.active.is_none() {
            return false;
        }
        self.queued += 1;
        true
    }

    /// Interval of the installed schedule.
    #[must_use]
    pub fn interval(&self) -> Option<Duration> {
        self.active.map(|(_, interval)| interval)
    }

    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.active.is_some()
    }

    /// Number of `schedule` calls so far.
    #[must_use]
    pub fn schedules_installed(&self) -> u32 {
        self.schedules_installed
    }
}

impl TickTimer for ManualTimer {
    fn schedule(&mut self, interval: Duration) -> TickHandle {
        self.next_id += 1;
        self.schedules_installed += 1;
        let handle = TickHandle(self.next_id);
        self.active = Some((handle, interval));
        self.queued = 0;
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        if self.active.is_some_and(|(active, _)| active == handle) {
            self.active = None;
            self.queued = 0;
        }
    }

    fn take_due(&mut self, handle: TickHandle) -> bool {
        match self.active {
            Some((active, _)) if active == handle && self.queued > 0 => {
                self.queued -= 1;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{IntervalTimer, ManualTimer, TickTimer};

    #[test]
    fn manual_timer_only_fires_active_handle() {
        let mut timer = ManualTimer::new();
        let first = timer.schedule(Duration::from_millis(120));
        let second = timer.schedule(Duration::from_millis(115));

        assert!(timer.fire());
        assert!(!timer.take_due(first));
        assert!(timer.take_due(second));
        assert!(!timer.take_due(second));
    }

    #[test]
    fn manual_timer_cancel_drops_queued_ticks() {
        let mut timer = ManualTimer::new();
        let handle = timer.schedule(Duration::from_millis(120));
        timer.fire();
        timer.fire();

        timer.cancel(handle);

        assert!(!timer.take_due(handle));
        assert!(!timer.fire());
        assert!(!timer.is_scheduled());
    }

    #[test]
    fn interval_timer_is_not_due_before_deadline() {
        let mut timer = IntervalTimer::new();
        let handle = timer.schedule(Duration::from_secs(60));

        assert!(!timer.take_due(handle));
        assert!(timer.time_until_due().is_some());
    }

    #[test]
    fn interval_timer_fires_once_when_host_falls_behind() {
        let mut timer = IntervalTimer::new();
        let handle = timer.schedule(Duration::from_millis(10));
        let late = Instant::now() + Duration::from_millis(100);

        assert!(timer.take_due_at(handle, late));
        assert!(!timer.take_due_at(handle, late));
    }

    #[test]
    fn interval_timer_ignores_cancelled_handle() {
        let mut timer = IntervalTimer::new();
        let handle = timer.schedule(Duration::from_millis(10));
        timer.cancel(handle);

        let late = Instant::now() + Duration::from_millis(100);
        assert!(!timer.take_due_at(handle, late));
        assert!(timer.time_until_due().is_none());
    }
}
