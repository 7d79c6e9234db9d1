use std::time::Duration;

use tokio::time::Instant;

pub const TIME_TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockTrigger {
    Movement,
    Time,
    Countdown,
}

/// Handle to a repeating firing. Dropping the handle cancels it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RepeatingTask {
    period: Duration,
    next_due: Instant,
}

impl RepeatingTask {
    /// First firing is one full period after `start`.
    pub fn new(period: Duration, start: Instant) -> Self {
        Self {
            period,
            next_due: start + period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    fn fire(&mut self) -> Instant {
        let due = self.next_due;
        self.next_due += self.period;
        due
    }
}

#[derive(Debug, Default)]
pub struct GameClock {
    movement: Option<RepeatingTask>,
    time: Option<RepeatingTask>,
    countdown: Option<RepeatingTask>,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts both round triggers from a fresh full period.
    pub fn arm(&mut self, movement_period: Duration, now: Instant) {
        self.movement = Some(RepeatingTask::new(movement_period, now));
        self.time = Some(RepeatingTask::new(TIME_TICK_PERIOD, now));
    }

    pub fn disarm(&mut self) {
        self.movement = None;
        self.time = None;
    }

    /// Replaces the movement trigger; the next move is one new period after `at`.
    pub fn rearm_movement(&mut self, period: Duration, at: Instant) {
        if self.movement.is_some() {
            self.movement = Some(RepeatingTask::new(period, at));
        }
    }

    pub fn arm_countdown(&mut self, period: Duration, now: Instant) {
        self.countdown = Some(RepeatingTask::new(period, now));
    }

    pub fn cancel_countdown(&mut self) {
        self.countdown = None;
    }

    pub fn cancel_all(&mut self) {
        self.disarm();
        self.cancel_countdown();
    }

    pub fn is_armed(&self, trigger: ClockTrigger) -> bool {
        self.slot(trigger).is_some()
    }

    pub fn movement_period(&self) -> Option<Duration> {
        self.movement.map(|task| task.period())
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        [self.movement, self.time, self.countdown]
            .into_iter()
            .flatten()
            .map(|task| task.next_due())
            .min()
    }

    /// Takes the earliest trigger due at or before `now` and schedules its next firing.
    /// Ties go to movement, then time, then countdown.
    pub fn pop_due(&mut self, now: Instant) -> Option<(ClockTrigger, Instant)> {
        let trigger = [ClockTrigger::Movement, ClockTrigger::Time, ClockTrigger::Countdown]
            .into_iter()
            .filter_map(|trigger| self.slot(trigger).map(|task| (trigger, task.next_due())))
            .filter(|(_, due)| *due <= now)
            .min_by_key(|(_, due)| *due)
            .map(|(trigger, _)| trigger)?;

        self.slot_mut(trigger)
            .as_mut()
            .map(|task| (trigger, task.fire()))
    }

    fn slot(&self, trigger: ClockTrigger) -> Option<RepeatingTask> {
        match trigger {
            ClockTrigger::Movement => self.movement,
            ClockTrigger::Time => self.time,
            ClockTrigger::Countdown => self.countdown,
        }
    }

    fn slot_mut(&mut self, trigger: ClockTrigger) -> &mut Option<RepeatingTask> {
        match trigger {
            ClockTrigger::Movement => &mut self.movement,
            ClockTrigger::Time => &mut self.time,
            ClockTrigger::Countdown => &mut self.countdown,
        }
    }
}
