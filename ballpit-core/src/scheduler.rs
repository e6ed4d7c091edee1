//! Two periodic timers driven by host-supplied elapsed time
//!
//! The scheduler owns no clock and no threads. A driver reports how much
//! time passed and gets back the activities that fell due, in the order they
//! should run. Each activity runs to completion before the next one starts,
//! so a slow tick delays later ones but never overlaps them.

use crate::config::{self, ConfigError, SimConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What to do with firings that were missed while the driver was busy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatePolicy {
    /// Run missed firings back-to-back, up to the catch-up limit
    #[default]
    CatchUp,
    /// Run a single firing and drop the rest
    Skip,
}

/// A unit of scheduled work. Ties between timers run ticks first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Activity {
    Tick,
    Spawn,
}

#[derive(Debug, Clone)]
struct Timer {
    period: Duration,
    next_due: Duration,
}

impl Timer {
    fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: period,
        }
    }

    /// Firing times due at or before `now`, plus how many were dropped.
    /// Afterwards `next_due` is strictly after `now`.
    fn collect_due(&mut self, now: Duration, policy: LatePolicy, max_catch_up: u32) -> (Vec<Duration>, u64) {
        if self.next_due > now {
            return (Vec::new(), 0);
        }

        let period = self.period.as_nanos();
        let missed = ((now - self.next_due).as_nanos() / period + 1) as u64;
        let run = match policy {
            LatePolicy::CatchUp => missed.min(max_catch_up as u64),
            LatePolicy::Skip => 1,
        };

        let times = (0..run)
            .map(|k| self.next_due + nanos(period * k as u128))
            .collect();
        self.next_due += nanos(period * missed as u128);

        (times, missed - run)
    }
}

fn nanos(n: u128) -> Duration {
    Duration::from_nanos(n.min(u64::MAX as u128) as u64)
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    clock: Duration,
    tick: Timer,
    spawn: Timer,
    policy: LatePolicy,
    max_catch_up: u32,
    dropped: u64,
}

impl Scheduler {
    /// Rejects zero periods and a zero catch-up limit
    pub fn new(
        tick_period: Duration,
        spawn_period: Duration,
        policy: LatePolicy,
        max_catch_up: u32,
    ) -> Result<Self, ConfigError> {
        config::validate_interval("tick", tick_period)?;
        config::validate_interval("spawn", spawn_period)?;
        config::validate_catch_up(max_catch_up)?;
        Ok(Self {
            clock: Duration::ZERO,
            tick: Timer::new(tick_period),
            spawn: Timer::new(spawn_period),
            policy,
            max_catch_up,
            dropped: 0,
        })
    }

    pub fn from_config(config: &SimConfig) -> Result<Self, ConfigError> {
        Self::new(
            config.tick_interval(),
            config.spawn_interval(),
            config.late_policy,
            config.max_catch_up,
        )
    }

    /// Time since the scheduler started
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Total firings dropped by the late policy so far
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Time left until the next activity falls due
    pub fn until_next(&self) -> Duration {
        self.tick
            .next_due
            .min(self.spawn.next_due)
            .saturating_sub(self.clock)
    }

    /// Move the clock forward and return due activities in run order
    pub fn advance(&mut self, elapsed: Duration) -> Vec<Activity> {
        self.clock += elapsed;

        let (ticks, dropped_ticks) = self.tick.collect_due(self.clock, self.policy, self.max_catch_up);
        let (spawns, dropped_spawns) = self.spawn.collect_due(self.clock, self.policy, self.max_catch_up);

        if dropped_ticks > 0 || dropped_spawns > 0 {
            log::warn!(
                "running late at {:?}: dropped {} ticks and {} spawns",
                self.clock,
                dropped_ticks,
                dropped_spawns
            );
            self.dropped += dropped_ticks + dropped_spawns;
        }

        let mut due: Vec<(Duration, Activity)> = ticks
            .into_iter()
            .map(|t| (t, Activity::Tick))
            .chain(spawns.into_iter().map(|t| (t, Activity::Spawn)))
            .collect();
        due.sort();
        due.into_iter().map(|(_, activity)| activity).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn count(activities: &[Activity], kind: Activity) -> usize {
        activities.iter().filter(|a| **a == kind).count()
    }

    #[test]
    fn nothing_due_before_first_period() {
        let mut s = Scheduler::new(ms(33), ms(2000), LatePolicy::CatchUp, 10).unwrap();
        assert!(s.advance(ms(32)).is_empty());
        assert_eq!(s.advance(ms(1)), vec![Activity::Tick]);
    }

    #[test]
    fn accumulates_partial_periods() {
        let mut s = Scheduler::new(ms(10), ms(1000), LatePolicy::CatchUp, 10).unwrap();
        assert!(s.advance(ms(6)).is_empty());
        assert_eq!(s.advance(ms(6)), vec![Activity::Tick]);
        assert_eq!(s.until_next(), ms(8));
    }

    #[test]
    fn catch_up_runs_missed_ticks_back_to_back() {
        let mut s = Scheduler::new(ms(10), ms(1000), LatePolicy::CatchUp, 10).unwrap();
        let due = s.advance(ms(45));
        assert_eq!(due, vec![Activity::Tick; 4]);
        assert_eq!(s.dropped(), 0);
    }

    #[test]
    fn catch_up_is_capped() {
        let mut s = Scheduler::new(ms(10), ms(100_000), LatePolicy::CatchUp, 5).unwrap();
        let due = s.advance(ms(1000));
        assert_eq!(due.len(), 5);
        assert_eq!(s.dropped(), 95);
        // resynchronised: the next firing is one period away, not a backlog
        assert_eq!(s.advance(ms(10)), vec![Activity::Tick]);
    }

    #[test]
    fn skip_runs_once() {
        let mut s = Scheduler::new(ms(10), ms(100_000), LatePolicy::Skip, 10).unwrap();
        assert_eq!(s.advance(ms(45)), vec![Activity::Tick]);
        assert_eq!(s.dropped(), 3);
        assert!(s.advance(ms(4)).is_empty());
        assert_eq!(s.advance(ms(1)), vec![Activity::Tick]);
    }

    #[test]
    fn activities_are_chronological_with_ticks_first_on_ties() {
        let mut s = Scheduler::new(ms(10), ms(25), LatePolicy::CatchUp, 10).unwrap();
        let due = s.advance(ms(50));
        // ticks at 10,20,30,40,50; spawns at 25,50
        assert_eq!(
            due,
            vec![
                Activity::Tick,
                Activity::Tick,
                Activity::Spawn,
                Activity::Tick,
                Activity::Tick,
                Activity::Tick,
                Activity::Spawn,
            ]
        );
    }

    #[test]
    fn zero_period_is_rejected() {
        let err = Scheduler::new(ms(0), ms(2000), LatePolicy::CatchUp, 10).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroInterval("tick")));
        let err = Scheduler::new(ms(33), Duration::ZERO, LatePolicy::Skip, 10).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroInterval("spawn")));
    }

    #[test]
    fn zero_catch_up_is_rejected() {
        let err = Scheduler::new(ms(33), ms(2000), LatePolicy::CatchUp, 0).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCatchUp));
    }

    #[test]
    fn default_cadence_ratio() {
        let config = SimConfig::default();
        let mut s = Scheduler::from_config(&config).unwrap();
        let mut due = Vec::new();
        for _ in 0..(2000 / 33 + 1) {
            due.extend(s.advance(ms(33)));
        }
        assert_eq!(count(&due, Activity::Spawn), 1);
        assert_eq!(count(&due, Activity::Tick), 61);
    }
}
