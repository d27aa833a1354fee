use std::{cell::RefCell, rc::Rc, time::Duration};

use crate::{
    host::{HapticEffect, HapticPlayer, Scheduler, ScreenFader, TimerEvent},
    side::Side,
};

/// Frame-driven timer queue: scheduled events fire once accumulated tick time
/// reaches their due time.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    pending: Vec<(Duration, TimerEvent)>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&mut self, delay: Duration, event: TimerEvent) {
        self.pending.push((self.now + delay, event));
    }

    fn advance(&mut self, dt: Duration) -> Vec<TimerEvent> {
        self.now += dt;
        let now = self.now;

        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|(at, _)| *at <= now);
        self.pending = pending;

        due.sort_by_key(|(at, _)| *at);
        due.into_iter().map(|(_, event)| event).collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeRecord {
    pub from_alpha: f32,
    pub to_alpha: f32,
    pub duration: Duration,
}

/// Screen fader that records every fade request. Clones share the record.
#[derive(Clone, Debug, Default)]
pub struct RecordingFader {
    fades: Rc<RefCell<Vec<FadeRecord>>>,
}

impl RecordingFader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fades(&self) -> Vec<FadeRecord> {
        self.fades.borrow().clone()
    }
}

impl ScreenFader for RecordingFader {
    fn start_fade(&mut self, from_alpha: f32, to_alpha: f32, duration: Duration) {
        self.fades.borrow_mut().push(FadeRecord {
            from_alpha,
            to_alpha,
            duration,
        });
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HapticRecord {
    pub effect: String,
    pub side: Side,
    pub intensity: f32,
}

/// Haptic player that records every pulse. Clones share the record.
#[derive(Clone, Debug, Default)]
pub struct RecordingHaptics {
    pulses: Rc<RefCell<Vec<HapticRecord>>>,
}

impl RecordingHaptics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pulses(&self) -> Vec<HapticRecord> {
        self.pulses.borrow().clone()
    }
}

impl HapticPlayer for RecordingHaptics {
    fn play(&self, effect: &HapticEffect, side: Side, intensity: f32) {
        self.pulses.borrow_mut().push(HapticRecord {
            effect: effect.name.clone(),
            side,
            intensity,
        });
    }
}
