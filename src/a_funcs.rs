use serde::{Deserialize, Serialize};

pub trait ActivFunc {
    fn evaluate(x: f32) -> f32;
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug)]
pub struct Sigmoid;
impl ActivFunc for Sigmoid {
    fn evaluate(x: f32) -> f32 {
        1. / (1. + (-x).exp())
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug)]
pub struct TanH;
impl ActivFunc for TanH {
    fn evaluate(x: f32) -> f32 {
        x.tanh()
    }
}

/// Applies `F` to every element of `src`, writing into `dst`.
/// Only the common prefix of the two slices is touched.
pub fn apply<F: ActivFunc>(src: &[f32], dst: &mut [f32]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d = F::evaluate(*s);
    }
}
