use crate::error::NetError;

use rand::distributions::Uniform as UniformDist;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

/// Implement Initializer for the struct reference as well
macro_rules! impl_ref {
    ($struct:ty) => {
        impl Initializer for &mut $struct {
            fn get(&mut self) -> Result<f32, NetError> {
                <$struct as Initializer>::get(self)
            }
        }
    };
}

/// Source of weight values. Called once per weight, in storage order.
pub trait Initializer {
    fn get(&mut self) -> Result<f32, NetError>;
}

impl Initializer for Box<dyn Initializer> {
    fn get(&mut self) -> Result<f32, NetError> {
        (**self).get()
    }
}

fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    }
}

/// Draws weights from uniform[-1, 1] multiplied by `scale`.
pub struct Uniform {
    rng: SmallRng,
    dist: UniformDist<f32>,
    scale: f32,
}

impl Uniform {
    pub fn new(seed: Option<u64>) -> Self {
        Self::scaled(seed, 1.)
    }

    pub fn scaled(seed: Option<u64>, scale: f32) -> Self {
        Self {
            rng: make_rng(seed),
            dist: UniformDist::new_inclusive(-1f32, 1f32),
            scale,
        }
    }
}

impl Initializer for Uniform {
    fn get(&mut self) -> Result<f32, NetError> {
        Ok(self.rng.sample(&self.dist) * self.scale)
    }
}
impl_ref!(Uniform);

/// Draws weights from a normal distribution centered on zero.
pub struct Gaussian {
    rng: SmallRng,
    dist: Normal<f32>,
}

impl Gaussian {
    pub fn new(seed: Option<u64>, std_dev: f32) -> Result<Self, NetError> {
        if !std_dev.is_finite() || std_dev < 0. {
            return Err(NetError::InvalidInitializer {
                reason: format!("standard deviation must be finite and positive, got {}", std_dev),
            });
        }
        let dist = Normal::new(0., std_dev).map_err(|_| NetError::InvalidInitializer {
            reason: format!("unusable standard deviation {}", std_dev),
        })?;
        Ok(Self {
            rng: make_rng(seed),
            dist,
        })
    }
}

impl Initializer for Gaussian {
    fn get(&mut self) -> Result<f32, NetError> {
        Ok(self.rng.sample(&self.dist))
    }
}
impl_ref!(Gaussian);

/// Always initializes weights to the same value
pub struct Constant(pub f32);
impl Initializer for Constant {
    fn get(&mut self) -> Result<f32, NetError> {
        Ok(self.0)
    }
}
impl_ref!(Constant);

/// This initializer accepts an iterator over f32 values and uses them to initialize the weights.
/// Running out of values is reported as an error.
pub struct WeightInit<T: Iterator<Item = f32>> {
    iter: T,
}
impl<I: Iterator<Item = f32>> WeightInit<I> {
    pub fn new<T: IntoIterator<Item = f32, IntoIter = I>>(weights: T) -> Self {
        Self {
            iter: weights.into_iter(),
        }
    }
}

impl<I: Iterator<Item = f32>> Initializer for WeightInit<I> {
    fn get(&mut self) -> Result<f32, NetError> {
        self.iter.next().ok_or_else(|| NetError::InvalidInitializer {
            reason: "ran out of weights".to_string(),
        })
    }
}

impl<I: Iterator<Item = f32>> Initializer for &mut WeightInit<I> {
    fn get(&mut self) -> Result<f32, NetError> {
        <WeightInit<I> as Initializer>::get(self)
    }
}

/// Serializable description of an initializer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum InitKind {
    Uniform { scale: f32 },
    Gaussian { std_dev: f32 },
    Constant { value: f32 },
}

impl Default for InitKind {
    fn default() -> Self {
        InitKind::Uniform { scale: 1. }
    }
}

impl InitKind {
    pub fn build(&self, seed: Option<u64>) -> Result<Box<dyn Initializer>, NetError> {
        let init: Box<dyn Initializer> = match *self {
            InitKind::Uniform { scale } => Box::new(Uniform::scaled(seed, scale)),
            InitKind::Gaussian { std_dev } => Box::new(Gaussian::new(seed, std_dev)?),
            InitKind::Constant { value } => Box::new(Constant(value)),
        };
        Ok(init)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw<I: Initializer>(mut init: I, n: usize) -> Vec<f32> {
        (0..n).map(|_| init.get().unwrap()).collect()
    }

    #[test]
    fn uniform_stays_in_range() {
        let values = draw(Uniform::scaled(Some(7), 1.1), 1000);
        assert!(values.iter().all(|v| (-1.1..=1.1).contains(v)));
        assert!(values.iter().any(|v| *v < 0.) && values.iter().any(|v| *v > 0.));
    }

    #[test]
    fn seeded_uniform_is_reproducible() {
        assert_eq!(draw(Uniform::new(Some(3)), 32), draw(Uniform::new(Some(3)), 32));
        assert_ne!(draw(Uniform::new(Some(3)), 32), draw(Uniform::new(Some(4)), 32));
    }

    #[test]
    fn gaussian_rejects_bad_deviation() {
        assert!(Gaussian::new(None, -1.).is_err());
        assert!(Gaussian::new(None, f32::NAN).is_err());
        assert!(Gaussian::new(Some(1), 0.5).is_ok());
    }

    #[test]
    fn weight_init_runs_out() {
        let mut init = WeightInit::new(vec![1., 2.]);
        assert_eq!(init.get(), Ok(1.));
        assert_eq!(init.get(), Ok(2.));
        assert!(init.get().is_err());
    }

    #[test]
    fn init_kind_from_json() {
        let kind: InitKind = serde_json::from_str(r#"{"kind":"constant","value":0.5}"#).unwrap();
        assert_eq!(kind, InitKind::Constant { value: 0.5 });
        assert_eq!(draw(kind.build(None).unwrap(), 3), vec![0.5; 3]);
    }
}
