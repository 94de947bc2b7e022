pub mod construction;
pub mod feed_forward;

pub use self::construction::NetworkBuilder;
pub use self::feed_forward::Network;

use crate::error::NetError;
use serde::{Deserialize, Serialize};

/// The shape of a network. Fixes every weight matrix shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Topology {
    /// Neurons per hidden layer.
    pub width: usize,
    pub inputs: usize,
    pub outputs: usize,
    /// Number of square `width` x `width` layers between the input and output layer.
    pub hidden: usize,
}

impl Default for Topology {
    fn default() -> Self {
        Self {
            width: 16,
            inputs: 3,
            outputs: 3,
            hidden: 8,
        }
    }
}

impl Topology {
    pub fn new(width: usize, inputs: usize, outputs: usize, hidden: usize) -> Self {
        Self {
            width,
            inputs,
            outputs,
            hidden,
        }
    }

    /// Checks that all sizes are non-zero. The hidden layer count may be zero.
    pub fn validate(&self) -> Result<(), NetError> {
        if self.width == 0 {
            return Err(NetError::topology("network width must be at least 1"));
        }
        if self.inputs == 0 {
            return Err(NetError::topology("there must be at least one input channel"));
        }
        if self.outputs == 0 {
            return Err(NetError::topology("there must be at least one output channel"));
        }
        // the packed kernel buffer is the largest allocation
        let packed = self
            .stride()
            .checked_mul(self.stride())
            .and_then(|slab| slab.checked_mul(self.hidden.checked_add(2)?))
            .and_then(|n| n.checked_mul(std::mem::size_of::<f32>()))
            .filter(|bytes| *bytes <= isize::MAX as usize);
        if self.checked_weight_count().is_none() || packed.is_none() {
            return Err(NetError::topology("topology too large"));
        }
        Ok(())
    }

    fn checked_weight_count(&self) -> Option<usize> {
        let input = self.width.checked_mul(self.inputs)?;
        let hidden = self.width.checked_mul(self.width)?.checked_mul(self.hidden)?;
        let output = self.outputs.checked_mul(self.width)?;
        input.checked_add(hidden)?.checked_add(output)
    }

    /// Number of weight matrices, input and output layers included.
    pub fn layer_count(&self) -> usize {
        self.hidden.saturating_add(2)
    }

    /// Shape of the `index`th weight matrix in evaluation order.
    pub fn layer_shape(&self, index: usize) -> Option<(usize, usize)> {
        match index {
            0 => Some((self.width, self.inputs)),
            i if i <= self.hidden => Some((self.width, self.width)),
            i if i - 1 == self.hidden => Some((self.outputs, self.width)),
            _ => None,
        }
    }

    /// Largest vector that flows through the network.
    pub fn stride(&self) -> usize {
        self.width.max(self.inputs).max(self.outputs)
    }

    pub fn weight_count(&self) -> usize {
        (0..self.layer_count())
            .filter_map(|i| self.layer_shape(i))
            .map(|(r, c)| r * c)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_shapes_follow_topology() {
        let t = Topology::new(16, 3, 3, 2);
        assert_eq!(t.layer_count(), 4);
        assert_eq!(t.layer_shape(0), Some((16, 3)));
        assert_eq!(t.layer_shape(1), Some((16, 16)));
        assert_eq!(t.layer_shape(2), Some((16, 16)));
        assert_eq!(t.layer_shape(3), Some((3, 16)));
        assert_eq!(t.layer_shape(4), None);
        assert_eq!(t.weight_count(), 16 * 3 + 2 * 256 + 3 * 16);
    }

    #[test]
    fn no_hidden_layers() {
        let t = Topology::new(2, 2, 1, 0);
        assert_eq!(t.layer_shape(0), Some((2, 2)));
        assert_eq!(t.layer_shape(1), Some((1, 2)));
        assert_eq!(t.layer_shape(2), None);
    }

    #[test]
    fn zero_sizes_are_rejected() {
        assert!(Topology::new(0, 3, 3, 1).validate().is_err());
        assert!(Topology::new(4, 0, 3, 1).validate().is_err());
        assert!(Topology::new(4, 3, 0, 1).validate().is_err());
        assert!(Topology::new(4, 3, 3, 0).validate().is_ok());
    }

    #[test]
    fn oversized_topologies_are_rejected() {
        for t in &[
            Topology::new(usize::MAX / 2, 3, 3, 1),
            Topology::new(usize::MAX / 4, 3, 3, 0),
            Topology::new(4, usize::MAX, 3, 0),
            Topology::new(16, 3, 3, usize::MAX),
        ] {
            assert!(
                matches!(t.validate(), Err(NetError::InvalidTopology { .. })),
                "{:?} was accepted",
                t
            );
        }
    }

    #[test]
    fn stride_covers_channels() {
        assert_eq!(Topology::new(4, 10, 3, 1).stride(), 10);
        assert_eq!(Topology::default().stride(), 16);
    }
}
