use super::{Network, Topology};
use crate::{
    error::NetError,
    initializer::{Initializer, Uniform},
    matrix::Matrix,
};

/// Builder for [Network]. Without an explicit initializer the weights are
/// drawn from uniform[-1, 1] using entropy.
pub struct NetworkBuilder<I = Uniform> {
    topology: Topology,
    init: I,
}

impl NetworkBuilder {
    pub fn new(topology: Topology) -> Self {
        NetworkBuilder {
            topology,
            init: Uniform::new(None),
        }
    }
}

impl<I: Initializer> NetworkBuilder<I> {
    /// Replaces the weight source.
    pub fn initializer<J: Initializer>(self, init: J) -> NetworkBuilder<J> {
        NetworkBuilder {
            topology: self.topology,
            init,
        }
    }

    /// Allocates every layer and fills it from the initializer, input layer
    /// first. The topology is validated before anything is allocated.
    pub fn build(mut self) -> Result<Network, NetError> {
        self.topology.validate()?;

        let mut layers = Vec::with_capacity(self.topology.layer_count());
        for i in 0..self.topology.layer_count() {
            let (rows, cols) = self
                .topology
                .layer_shape(i)
                .ok_or_else(|| NetError::topology(format!("no layer at index {}", i)))?;
            let mut layer = Matrix::new(rows, cols);
            let init = &mut self.init;
            layer.try_fill(|| init.get())?;
            layers.push(layer);
        }

        Network::from_parts(self.topology, layers)
    }
}
