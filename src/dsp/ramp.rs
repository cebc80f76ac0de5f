/*
Parameter Ramps
===============

A ramp moves a value from `from` to `to` over a fixed number of samples and
then holds `to`. Two shapes are supported:

  linear        value += step                  step   = (to - from) / n
  exponential   value *= factor                factor = (to / from) ^ (1 / n)

Exponential ramps sound "natural" for both loudness and cutoff because the ear
hears ratios, not differences: 3000 Hz -> 1000 Hz over 0.3 s spends as long
going from 3000 to 1732 as from 1732 to 1000.

    value
      to ┤                  ____________    linear
         │             ____╱
         │        ____╱
    from ┤───────╱

      from ┤╲
           │ ╲
           │  ╲___
        to ┤      ‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾    exponential

An exponential curve can never reach or cross zero, so both endpoints are
clamped to a small positive floor before the factor is computed.

Sample Counts
-------------

    samples = round(seconds * sample_rate), at least 1

The last sample of a ramp lands exactly on `to` so accumulated rounding never
leaves the held value slightly off target.
*/

/// Smallest magnitude an exponential ramp is allowed to touch.
pub const EXP_FLOOR: f32 = 1.0e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Shape {
    Linear { step: f32 },
    Exponential { factor: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ramp {
    value: f32,
    target: f32,
    remaining: u32,
    shape: Shape,
}

#[inline]
fn samples_for(seconds: f32, sample_rate: f32) -> u32 {
    (seconds * sample_rate).round().max(1.0) as u32
}

impl Ramp {
    /// A ramp that is already finished and holds `value`.
    pub fn hold(value: f32) -> Self {
        Self {
            value,
            target: value,
            remaining: 0,
            shape: Shape::Linear { step: 0.0 },
        }
    }

    pub fn linear(from: f32, to: f32, seconds: f32, sample_rate: f32) -> Self {
        let samples = samples_for(seconds, sample_rate);
        Self {
            value: from,
            target: to,
            remaining: samples,
            shape: Shape::Linear {
                step: (to - from) / samples as f32,
            },
        }
    }

    pub fn exponential(from: f32, to: f32, seconds: f32, sample_rate: f32) -> Self {
        let samples = samples_for(seconds, sample_rate);
        let from = from.max(EXP_FLOOR);
        let to = to.max(EXP_FLOOR);
        Self {
            value: from,
            target: to,
            remaining: samples,
            shape: Shape::Exponential {
                factor: (to / from).powf(1.0 / samples as f32),
            },
        }
    }

    /// Advance one sample and return the new value.
    #[inline]
    pub fn next(&mut self) -> f32 {
        match self.remaining {
            0 => {}
            1 => {
                self.value = self.target;
                self.remaining = 0;
            }
            _ => {
                self.value = match self.shape {
                    Shape::Linear { step } => self.value + step,
                    Shape::Exponential { factor } => self.value * factor,
                };
                self.remaining -= 1;
            }
        }
        self.value
    }

    pub fn is_done(&self) -> bool {
        self.remaining == 0
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_ramp_lands_on_target() {
        let mut ramp = Ramp::linear(0.0, 1.0, 0.01, 1_000.0);
        let values: Vec<f32> = (0..10).map(|_| ramp.next()).collect();

        assert!((values[0] - 0.1).abs() < 1e-6);
        assert!((values[4] - 0.5).abs() < 1e-5);
        assert_eq!(values[9], 1.0);
        assert!(ramp.is_done());
        assert_eq!(ramp.next(), 1.0);
    }

    #[test]
    fn exponential_ramp_passes_geometric_midpoint() {
        let mut ramp = Ramp::exponential(3000.0, 1000.0, 0.3, 1_000.0);
        let mut midpoint = 0.0;
        for i in 0..300 {
            let value = ramp.next();
            if i == 149 {
                midpoint = value;
            }
        }

        let geometric = (3000.0f32 * 1000.0).sqrt();
        assert!((midpoint - geometric).abs() < 5.0, "midpoint {midpoint}");
        assert_eq!(ramp.value(), 1000.0);
    }

    #[test]
    fn exponential_ramp_from_zero_uses_floor() {
        let mut ramp = Ramp::exponential(0.0, 0.5, 0.01, 1_000.0);
        assert!(ramp.value() > 0.0);
        for _ in 0..10 {
            assert!(ramp.next().is_finite());
        }
        assert_eq!(ramp.value(), 0.5);
    }

    #[test]
    fn zero_length_ramp_jumps() {
        let mut ramp = Ramp::linear(0.2, 0.8, 0.0, 48_000.0);
        assert_eq!(ramp.next(), 0.8);
        assert!(ramp.is_done());
    }

    #[test]
    fn hold_never_moves() {
        let mut ramp = Ramp::hold(0.4);
        assert!(ramp.is_done());
        assert_eq!(ramp.next(), 0.4);
        assert_eq!(ramp.next(), 0.4);
    }
}
