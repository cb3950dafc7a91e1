//! Virtual clock and countdown registry.
//!
//! The clock converts real frame time into virtual seconds with a scale
//! factor and drives every countdown by the same virtual delta. Countdowns
//! are tagged work items keyed by [`CountdownId`] (order + purpose); the
//! registry owns them and orders only keep the id for cancellation.
//!
//! Expiry is two-phase. [`Clock::advance`] updates remaining time and queues
//! every countdown that reached zero. The caller then drains the queue with
//! [`Clock::pop_due`], which removes the countdown from the registry before
//! handing its id back. Handlers may freely register or unregister other
//! countdowns while draining: a countdown cancelled (or replaced) before it
//! is popped is skipped, so each registration fires at most once.

use std::collections::{BTreeMap, VecDeque};

use guild_logic::constants::{DEFAULT_TIME_SCALE, SECONDS_PER_DAY};

use crate::events::{ClockEvent, EventBus};
use crate::orders::OrderId;

/// What an expiring countdown means for its order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CountdownPurpose {
    /// Time left to assemble and dispatch a party.
    Staffing,
    /// Time until a dispatched party returns.
    Mission,
}

/// Opaque handle of one pending work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CountdownId {
    pub order: OrderId,
    pub purpose: CountdownPurpose,
}

impl CountdownId {
    pub fn staffing(order: OrderId) -> Self {
        Self {
            order,
            purpose: CountdownPurpose::Staffing,
        }
    }

    pub fn mission(order: OrderId) -> Self {
        Self {
            order,
            purpose: CountdownPurpose::Mission,
        }
    }
}

/// A registered countdown.
#[derive(Debug, Clone, PartialEq)]
pub struct Countdown {
    duration: f64,
    remaining: f64,
    /// Registration serial; distinguishes a re-registration from a stale
    /// queue entry with the same id.
    serial: u64,
}

impl Countdown {
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }

    /// 0.0 at registration, 1.0 at expiry.
    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        1.0 - self.remaining / self.duration
    }
}

/// Result of one [`Clock::advance`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tick {
    /// Virtual seconds that elapsed.
    pub virtual_delta: f64,
    /// Day indices that began during this tick, in order.
    pub days_started: Vec<u64>,
}

/// Scaled virtual clock hosting the countdown registry.
#[derive(Debug)]
pub struct Clock {
    time_scale: f64,
    paused: bool,
    elapsed: f64,
    day: u64,
    started: bool,
    countdowns: BTreeMap<CountdownId, Countdown>,
    due: VecDeque<(CountdownId, u64)>,
    next_serial: u64,
    events: EventBus<ClockEvent>,
}

impl Clock {
    pub fn new(time_scale: f64) -> Self {
        Self {
            time_scale: sanitize_scale(time_scale),
            paused: false,
            elapsed: 0.0,
            day: 0,
            started: false,
            countdowns: BTreeMap::new(),
            due: VecDeque::new(),
            next_serial: 0,
            events: EventBus::new(),
        }
    }

    /// Emit the startup day event once. Returns the day if it was emitted.
    pub fn start(&mut self) -> Option<u64> {
        if self.started {
            return None;
        }
        self.started = true;
        self.events.emit(&ClockEvent::DayStarted(self.day));
        Some(self.day)
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Advance by `real_delta` real seconds.
    ///
    /// Does nothing while paused. Negative or non-finite deltas count as
    /// zero. Starts the clock first if [`Clock::start`] was never called.
    pub fn advance(&mut self, real_delta: f64) -> Tick {
        let mut tick = Tick::default();
        if let Some(day) = self.start() {
            tick.days_started.push(day);
        }
        if self.paused {
            return tick;
        }

        let real = if real_delta.is_finite() {
            real_delta.max(0.0)
        } else {
            0.0
        };
        let delta = real * self.time_scale;
        self.elapsed += delta;
        tick.virtual_delta = delta;

        for (id, countdown) in self.countdowns.iter_mut() {
            if countdown.remaining <= 0.0 {
                continue;
            }
            countdown.remaining = (countdown.remaining - delta).max(0.0);
            if countdown.remaining <= 0.0 {
                self.due.push_back((*id, countdown.serial));
            }
        }

        let day = (self.elapsed / SECONDS_PER_DAY).floor() as u64;
        while self.day < day {
            self.day += 1;
            self.events.emit(&ClockEvent::DayStarted(self.day));
            tick.days_started.push(self.day);
        }
        tick
    }

    /// Register a countdown. Registering an id that is already present is a
    /// no-op and returns `false`. Non-positive durations are due immediately.
    pub fn register(&mut self, id: CountdownId, duration: f64) -> bool {
        if self.countdowns.contains_key(&id) {
            return false;
        }
        let duration = if duration.is_finite() {
            duration.max(0.0)
        } else {
            0.0
        };
        let serial = self.next_serial;
        self.next_serial += 1;
        self.countdowns.insert(
            id,
            Countdown {
                duration,
                remaining: duration,
                serial,
            },
        );
        if duration <= 0.0 {
            self.due.push_back((id, serial));
        }
        true
    }

    /// Cancel a countdown. Unregistering an absent id is a no-op.
    pub fn unregister(&mut self, id: CountdownId) -> bool {
        self.countdowns.remove(&id).is_some()
    }

    /// Pop the next expired countdown, removing it from the registry.
    ///
    /// Entries cancelled or re-registered since they were queued are skipped.
    pub fn pop_due(&mut self) -> Option<CountdownId> {
        while let Some((id, serial)) = self.due.pop_front() {
            let live = self.countdowns.get(&id).map(|c| c.serial) == Some(serial);
            if live {
                self.countdowns.remove(&id);
                log::debug!("countdown {:?} for order {} expired", id.purpose, id.order);
                return Some(id);
            }
        }
        None
    }

    pub fn is_registered(&self, id: CountdownId) -> bool {
        self.countdowns.contains_key(&id)
    }

    pub fn countdown(&self, id: CountdownId) -> Option<&Countdown> {
        self.countdowns.get(&id)
    }

    pub fn remaining(&self, id: CountdownId) -> Option<f64> {
        self.countdowns.get(&id).map(Countdown::remaining)
    }

    pub fn active_countdowns(&self) -> usize {
        self.countdowns.len()
    }

    pub fn set_time_scale(&mut self, scale: f64) {
        self.time_scale = sanitize_scale(scale);
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Total virtual seconds elapsed.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed
    }

    pub fn elapsed_minutes(&self) -> f64 {
        self.elapsed / 60.0
    }

    pub fn elapsed_hours(&self) -> f64 {
        self.elapsed / 3600.0
    }

    /// `floor(elapsed / 86400)`.
    pub fn current_day(&self) -> u64 {
        self.day
    }

    pub fn events_mut(&mut self) -> &mut EventBus<ClockEvent> {
        &mut self.events
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_SCALE)
    }
}

fn sanitize_scale(scale: f64) -> f64 {
    if scale.is_finite() {
        scale.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn drain(clock: &mut Clock) -> Vec<CountdownId> {
        std::iter::from_fn(|| clock.pop_due()).collect()
    }

    #[test]
    fn test_time_scale() {
        let mut clock = Clock::new(2.0);
        clock.advance(1.5);
        assert!((clock.elapsed_secs() - 3.0).abs() < 1e-9);
        assert!((clock.elapsed_minutes() - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_scale_clamped_non_negative() {
        let mut clock = Clock::new(-5.0);
        assert_eq!(clock.time_scale(), 0.0);
        clock.set_time_scale(f64::NAN);
        assert_eq!(clock.time_scale(), 0.0);
        clock.set_time_scale(10.0);
        assert_eq!(clock.time_scale(), 10.0);
    }

    #[test]
    fn test_negative_delta_ignored() {
        let mut clock = Clock::new(1.0);
        clock.advance(-10.0);
        assert_eq!(clock.elapsed_secs(), 0.0);
    }

    #[test]
    fn test_countdown_expires_once() {
        let mut clock = Clock::new(1.0);
        let id = CountdownId::staffing(OrderId(1));
        assert!(clock.register(id, 10.0));
        clock.advance(4.0);
        assert!(drain(&mut clock).is_empty());
        assert_eq!(clock.remaining(id), Some(6.0));
        clock.advance(6.0);
        assert_eq!(drain(&mut clock), vec![id]);
        assert!(!clock.is_registered(id));
        clock.advance(100.0);
        assert!(drain(&mut clock).is_empty());
    }

    #[test]
    fn test_register_idempotent() {
        let mut clock = Clock::new(1.0);
        let id = CountdownId::mission(OrderId(3));
        assert!(clock.register(id, 10.0));
        clock.advance(5.0);
        // second registration keeps the original countdown
        assert!(!clock.register(id, 100.0));
        assert_eq!(clock.remaining(id), Some(5.0));
        assert_eq!(clock.active_countdowns(), 1);
    }

    #[test]
    fn test_unregister_idempotent() {
        let mut clock = Clock::new(1.0);
        let id = CountdownId::mission(OrderId(4));
        assert!(!clock.unregister(id));
        clock.register(id, 1.0);
        assert!(clock.unregister(id));
        assert!(!clock.unregister(id));
    }

    #[test]
    fn test_cancel_after_queue_never_fires() {
        let mut clock = Clock::new(1.0);
        let a = CountdownId::staffing(OrderId(1));
        let b = CountdownId::staffing(OrderId(2));
        clock.register(a, 5.0);
        clock.register(b, 5.0);
        clock.advance(5.0);
        assert_eq!(clock.pop_due(), Some(a));
        // handler of `a` cancels `b` in the same tick
        clock.unregister(b);
        assert_eq!(clock.pop_due(), None);
    }

    #[test]
    fn test_reregistered_id_is_not_fired_by_stale_entry() {
        let mut clock = Clock::new(1.0);
        let a = CountdownId::staffing(OrderId(1));
        clock.register(a, 5.0);
        clock.advance(5.0);
        clock.unregister(a);
        clock.register(a, 30.0);
        assert_eq!(clock.pop_due(), None);
        assert_eq!(clock.remaining(a), Some(30.0));
    }

    #[test]
    fn test_register_during_drain_waits_for_next_tick() {
        let mut clock = Clock::new(1.0);
        let staffing = CountdownId::staffing(OrderId(9));
        let mission = CountdownId::mission(OrderId(9));
        clock.register(staffing, 1.0);
        clock.advance(1.0);
        assert_eq!(clock.pop_due(), Some(staffing));
        clock.register(mission, 10.0);
        assert_eq!(clock.pop_due(), None);
        assert_eq!(clock.remaining(mission), Some(10.0));
    }

    #[test]
    fn test_zero_duration_is_due_immediately() {
        let mut clock = Clock::new(1.0);
        let id = CountdownId::mission(OrderId(2));
        clock.register(id, 0.0);
        assert_eq!(clock.pop_due(), Some(id));
    }

    #[test]
    fn test_progress() {
        let mut clock = Clock::new(1.0);
        let id = CountdownId::mission(OrderId(5));
        clock.register(id, 100.0);
        clock.advance(25.0);
        let progress = clock.countdown(id).unwrap().progress();
        assert!((progress - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut clock = Clock::new(1.0);
        let id = CountdownId::mission(OrderId(6));
        clock.register(id, 10.0);
        clock.start();
        clock.pause();
        let tick = clock.advance(SECONDS_PER_DAY * 2.0);
        assert!(tick.days_started.is_empty());
        assert_eq!(clock.elapsed_secs(), 0.0);
        assert_eq!(clock.remaining(id), Some(10.0));
        clock.resume();
        clock.advance(10.0);
        assert_eq!(clock.pop_due(), Some(id));
    }

    #[test]
    fn test_day_zero_emitted_once() {
        let days = Arc::new(Mutex::new(Vec::new()));
        let mut clock = Clock::new(1.0);
        let sink = Arc::clone(&days);
        clock
            .events_mut()
            .subscribe(move |e: &ClockEvent| match e {
                ClockEvent::DayStarted(d) => sink.lock().unwrap().push(*d),
            });
        assert_eq!(clock.start(), Some(0));
        assert_eq!(clock.start(), None);
        let tick = clock.advance(1.0);
        assert!(tick.days_started.is_empty());
        assert_eq!(*days.lock().unwrap(), vec![0]);
    }

    #[test]
    fn test_advance_auto_starts() {
        let mut clock = Clock::new(1.0);
        let tick = clock.advance(1.0);
        assert_eq!(tick.days_started, vec![0]);
    }

    #[test]
    fn test_day_boundaries() {
        let mut clock = Clock::new(1.0);
        clock.start();
        let tick = clock.advance(SECONDS_PER_DAY - 1.0);
        assert!(tick.days_started.is_empty());
        let tick = clock.advance(1.0);
        assert_eq!(tick.days_started, vec![1]);
        assert_eq!(clock.current_day(), 1);
        // a long frame crosses several days, one event each
        let tick = clock.advance(SECONDS_PER_DAY * 3.0);
        assert_eq!(tick.days_started, vec![2, 3, 4]);
    }
}
