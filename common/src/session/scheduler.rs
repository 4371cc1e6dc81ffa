use std::time::Duration;

use super::collaborators::TickScheduler;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Schedule {
    pub interval: Duration,
    pub suspended: bool,
}

/// Records what the session asked for; the tick loop reads it back after every step
/// and rebuilds its timer when the schedule changed.
#[derive(Clone, Debug)]
pub struct IntervalScheduler {
    schedule: Schedule,
}

impl IntervalScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            schedule: Schedule {
                interval,
                suspended: true,
            },
        }
    }

    pub fn schedule(&self) -> Schedule {
        self.schedule
    }
}

impl TickScheduler for IntervalScheduler {
    fn set_interval(&mut self, interval: Duration) {
        self.schedule.interval = interval;
    }

    fn suspend(&mut self) {
        self.schedule.suspended = true;
    }

    fn resume(&mut self) {
        self.schedule.suspended = false;
    }
}
