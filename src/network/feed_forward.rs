use super::Topology;
use crate::{error::NetError, matrix::Matrix};

/// An untrained multilayer perceptron. Layers are stored in evaluation order:
/// the input layer, `hidden` square layers and the output layer.
/// Weights never change after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    topology: Topology,
    layers: Vec<Matrix>,
}

impl Network {
    /// Assembles a network from explicit weight matrices.
    /// Every matrix must have the shape dictated by the topology they imply.
    pub fn from_layers(
        input: Matrix,
        hidden: Vec<Matrix>,
        output: Matrix,
    ) -> Result<Self, NetError> {
        let topology = Topology::new(input.rows(), input.cols(), output.rows(), hidden.len());

        let mut layers = Vec::with_capacity(topology.layer_count());
        layers.push(input);
        layers.extend(hidden);
        layers.push(output);

        Self::from_parts(topology, layers)
    }

    pub(crate) fn from_parts(topology: Topology, layers: Vec<Matrix>) -> Result<Self, NetError> {
        topology.validate()?;
        if layers.len() != topology.layer_count() {
            return Err(NetError::topology(format!(
                "expected {} layers but received {}",
                topology.layer_count(),
                layers.len()
            )));
        }

        // every layer must accept what the previous one produced
        let mut prev = (topology.inputs, 1);
        for (i, layer) in layers.iter().enumerate() {
            let expected = topology.layer_shape(i);
            if Some(layer.shape()) != expected || layer.cols() != prev.0 {
                return Err(NetError::ShapeMismatch {
                    left: layer.shape(),
                    right: prev,
                });
            }
            prev = (layer.rows(), 1);
        }

        Ok(Self { topology, layers })
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// All weight matrices in evaluation order.
    pub fn layers(&self) -> &[Matrix] {
        &self.layers
    }

    /// Runs a single forward pass. `input` must hold exactly `topology().inputs` values;
    /// the result holds `topology().outputs` values, each in (0, 1).
    pub fn evaluate(&self, input: &[f32]) -> Result<Vec<f32>, NetError> {
        let (output, rest) = match self.layers.split_last() {
            Some(split) => split,
            None => return Err(NetError::topology("network has no layers")),
        };

        let mut signal = Matrix::column(input);
        for layer in rest {
            signal = layer.multiply(&signal)?.tanh();
        }
        Ok(output.multiply(&signal)?.sigmoid().into_vec())
    }
}
