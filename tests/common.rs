#![allow(dead_code)]

use dreamnet::backend::{Backend, BackendKind};
use dreamnet::initializer::{Constant, Uniform};
use dreamnet::network::{Network, NetworkBuilder, Topology};

pub const TOLERANCE: f32 = 0.00001;

pub fn random_network(topology: Topology, seed: u64) -> Network {
    NetworkBuilder::new(topology)
        .initializer(Uniform::new(Some(seed)))
        .build()
        .unwrap()
}

pub fn flat_network(topology: Topology, value: f32) -> Network {
    NetworkBuilder::new(topology)
        .initializer(Constant(value))
        .build()
        .unwrap()
}

pub fn both_backends(network: Network) -> [(BackendKind, Backend); 2] {
    [
        (BackendKind::Host, BackendKind::Host.build(network.clone())),
        (BackendKind::Kernel, BackendKind::Kernel.build(network)),
    ]
}

pub fn sigmoid(x: f32) -> f32 {
    1. / (1. + (-x).exp())
}

/// Compares two arrays with the given error tolerance, panicking with both arrays on a mismatch or NaN.
pub fn check(expected: &[f32], output: &[f32], tolerance: f32, id: &str) {
    let diag = || format!("expected: {:?}\nreceived: {:?}", expected, output);

    assert_eq!(expected.len(), output.len(), "{} has the wrong length.\n{}", id, diag());
    for (e, o) in expected.iter().zip(output) {
        if e.is_nan() || o.is_nan() {
            panic!("Evaluation produced a NaN\n{}", diag());
        }
        if (e - o).abs() >= tolerance {
            panic!("Evaluation produced incorrect {}.\n{}", id, diag());
        }
    }
}
