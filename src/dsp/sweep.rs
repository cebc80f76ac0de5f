use crate::{dsp::ramp::Ramp, MIN_TIME};

/*
Cutoff Sweep
============

A one-shot filter envelope. On note_on the cutoff jumps to `start`, opens
linearly to `peak` over the attack, then closes exponentially to `settle` over
the decay and stays there for the rest of the note:

   Hz
   peak ┤   ╱╲
        │  ╱  ╲
        │ ╱    ╲___
 settle ┤╱         ‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾
  start ┤
        └──┬────┬──────────────────→ t
           A    A+D

The sweep ignores note_off: the tone stays at `settle` while the amplitude
envelope releases. That open-then-close motion is the "wah" of a struck
electric piano.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment {
    Open,
    Close,
    Settled,
}

#[derive(Debug, Clone, Copy)]
pub struct CutoffSweep {
    start_hz: f32,
    peak_hz: f32,
    settle_hz: f32,
    open_time: f32,
    close_time: f32,

    segment: Segment,
    sample_rate: f32,
    ramp: Ramp,
}

impl CutoffSweep {
    pub fn new(
        start_hz: f32,
        peak_hz: f32,
        settle_hz: f32,
        open_time: f32,
        close_time: f32,
    ) -> Self {
        Self {
            start_hz,
            peak_hz,
            settle_hz,
            open_time: open_time.max(MIN_TIME),
            close_time: close_time.max(MIN_TIME),
            segment: Segment::Settled,
            sample_rate: 48_000.0,
            ramp: Ramp::hold(start_hz),
        }
    }

    /// Restart the sweep from `start_hz`.
    pub fn trigger(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.ramp = Ramp::linear(self.start_hz, self.peak_hz, self.open_time, sample_rate);
        self.segment = Segment::Open;
    }

    /// Advance one sample and return the cutoff in Hz.
    #[inline]
    pub fn next_cutoff(&mut self) -> f32 {
        let value = self.ramp.next();
        if self.ramp.is_done() && self.segment == Segment::Open {
            self.ramp = Ramp::exponential(
                self.peak_hz,
                self.settle_hz,
                self.close_time,
                self.sample_rate,
            );
            self.segment = Segment::Close;
        } else if self.ramp.is_done() {
            self.segment = Segment::Settled;
        }
        value
    }

    pub fn render(&mut self, cutoffs: &mut [f32]) {
        for cutoff in cutoffs.iter_mut() {
            *cutoff = self.next_cutoff();
        }
    }

    pub fn current(&self) -> f32 {
        self.ramp.value()
    }

    pub fn is_settled(&self) -> bool {
        self.segment == Segment::Settled
    }
}
