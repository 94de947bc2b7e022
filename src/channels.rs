//! Extra input channels fed to the network next to the pixel coordinates.
//! Every pixel of a frame receives the same values.

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

/// Position of a frame in an animation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Frame {
    pub index: u64,
    /// Seconds since the first frame.
    pub time: f32,
}

impl Frame {
    pub fn at(index: u64, fps: f32) -> Self {
        let time = if fps > 0. { index as f32 / fps } else { 0. };
        Self { index, time }
    }
}

#[enum_dispatch]
pub trait AuxChannels {
    /// Number of values written by [fill](AuxChannels::fill).
    fn count(&self) -> usize;

    /// Writes the channel values for `frame` into the start of `out`.
    fn fill(&self, frame: Frame, out: &mut [f32]);

    fn values(&self, frame: Frame) -> Vec<f32> {
        let mut out = vec![0.; self.count()];
        self.fill(frame, &mut out);
        out
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NoChannels {}

impl AuxChannels for NoChannels {
    fn count(&self) -> usize {
        0
    }

    fn fill(&self, _frame: Frame, _out: &mut [f32]) {}
}

/// Fixed values, independent of the frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Constant {
    pub values: Vec<f32>,
}

impl AuxChannels for Constant {
    fn count(&self) -> usize {
        self.values.len()
    }

    fn fill(&self, _frame: Frame, out: &mut [f32]) {
        for (o, v) in out.iter_mut().zip(&self.values) {
            *o = *v;
        }
    }
}

/// A single bias that moves by `step` every frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sweep {
    pub start: f32,
    pub step: f32,
}

impl Default for Sweep {
    fn default() -> Self {
        Self {
            start: -1.,
            step: 0.01,
        }
    }
}

impl AuxChannels for Sweep {
    fn count(&self) -> usize {
        1
    }

    fn fill(&self, frame: Frame, out: &mut [f32]) {
        if let Some(o) = out.first_mut() {
            *o = self.start + self.step * frame.index as f32;
        }
    }
}

/// One sine wave per table entry: `sin(time * speed * freq[i] + phase[i])`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Oscillators {
    pub freq: Vec<f32>,
    pub phase: Vec<f32>,
    pub speed: f32,
}

impl Default for Oscillators {
    fn default() -> Self {
        Self {
            freq: vec![8.6, 7.5, 3.0, 9.8, 6.7, 5.3, 0.9, 8.6],
            phase: vec![3.1, 4.1, 5.9, 2.6, 5.3, 5.8, 9.8, 1.2],
            speed: 0.05,
        }
    }
}

impl AuxChannels for Oscillators {
    fn count(&self) -> usize {
        self.freq.len().min(self.phase.len())
    }

    fn fill(&self, frame: Frame, out: &mut [f32]) {
        for ((o, f), p) in out.iter_mut().zip(&self.freq).zip(&self.phase) {
            *o = (frame.time * self.speed * f + p).sin();
        }
    }
}

#[enum_dispatch(AuxChannels)]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ChannelSource {
    Empty(NoChannels),
    Constant(Constant),
    Sweep(Sweep),
    Oscillators(Oscillators),
}

impl Default for ChannelSource {
    fn default() -> Self {
        Sweep::default().into()
    }
}
