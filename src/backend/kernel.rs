use super::{Evaluator, Scratch};
use crate::{
    a_funcs::{apply, Sigmoid, TanH},
    error::NetError,
    network::{Network, Topology},
};

use std::sync::Arc;

/// Every layer of a network packed into zero padded `stride` x `stride` slabs
/// of one immutable buffer, like a 3D weight texture. Cloning shares the data.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightBuffer {
    stride: usize,
    layers: usize,
    data: Arc<[f32]>,
}

impl WeightBuffer {
    pub fn pack(network: &Network) -> Self {
        let stride = network.topology().stride();
        let layers = network.layers().len();
        let mut data = vec![0f32; stride * stride * layers];

        for (layer, slab) in network
            .layers()
            .iter()
            .zip(data.chunks_exact_mut(stride * stride))
        {
            let cols = layer.cols();
            for (src, dst) in layer
                .as_slice()
                .chunks_exact(cols)
                .zip(slab.chunks_exact_mut(stride))
            {
                dst[..cols].copy_from_slice(src);
            }
        }

        Self {
            stride,
            layers,
            data: data.into(),
        }
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn layer_count(&self) -> usize {
        self.layers
    }

    /// Row-major slab of the `index`th layer.
    pub fn layer(&self, index: usize) -> &[f32] {
        let size = self.stride * self.stride;
        &self.data[index * size..(index + 1) * size]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

/// `dst = slab * src` for a square slab.
fn multiply(slab: &[f32], stride: usize, src: &[f32], dst: &mut [f32]) {
    for (row, d) in slab.chunks_exact(stride).zip(dst.iter_mut()) {
        *d = row.iter().zip(src).map(|(w, x)| w * x).sum();
    }
}

/// Evaluates every invocation with a fixed pair of ping-pong buffers and the
/// shared, read-only weight buffer.
#[derive(Clone, Debug)]
pub struct KernelBackend {
    topology: Topology,
    weights: WeightBuffer,
}

impl KernelBackend {
    pub fn new(network: &Network) -> Self {
        Self {
            topology: *network.topology(),
            weights: WeightBuffer::pack(network),
        }
    }

    pub fn weights(&self) -> &WeightBuffer {
        &self.weights
    }
}

impl Evaluator for KernelBackend {
    fn topology(&self) -> &Topology {
        &self.topology
    }

    fn evaluate_with<'s>(
        &self,
        input: &[f32],
        scratch: &'s mut Scratch,
    ) -> Result<&'s [f32], NetError> {
        if input.len() != self.topology.inputs {
            return Err(NetError::ShapeMismatch {
                left: (self.topology.width, self.topology.inputs),
                right: (input.len(), 1),
            });
        }

        let stride = self.weights.stride();
        scratch.prepare(stride);
        scratch.front[..input.len()].copy_from_slice(input);

        let last = self.weights.layer_count() - 1;
        for i in 0..=last {
            multiply(self.weights.layer(i), stride, &scratch.front, &mut scratch.back);
            if i == last {
                apply::<Sigmoid>(&scratch.back, &mut scratch.front);
            } else {
                apply::<TanH>(&scratch.back, &mut scratch.front);
            }
        }

        Ok(&scratch.front[..self.topology.outputs])
    }
}
