//! Execution backends. Both evaluate the same [Network](crate::network::Network);
//! they differ in how the weights are laid out and how scratch memory is used.

pub mod host;
pub mod kernel;

pub use self::host::HostBackend;
pub use self::kernel::{KernelBackend, WeightBuffer};

use crate::{
    error::NetError,
    network::{Network, Topology},
};

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

/// Two activation buffers reused across evaluations by a single worker.
/// Never shared between threads.
#[derive(Clone, Debug, Default)]
pub struct Scratch {
    pub(crate) front: Vec<f32>,
    pub(crate) back: Vec<f32>,
}

impl Scratch {
    pub fn new(topology: &Topology) -> Self {
        let mut scratch = Self::default();
        scratch.prepare(topology.stride());
        scratch
    }

    /// Sizes both buffers to `len` and zeroes the front one.
    pub(crate) fn prepare(&mut self, len: usize) {
        self.front.clear();
        self.front.resize(len, 0.);
        self.back.resize(len, 0.);
    }
}

#[enum_dispatch]
pub trait Evaluator {
    fn topology(&self) -> &Topology;

    /// Evaluates one input vector using `scratch` for intermediate values.
    /// The returned slice holds `topology().outputs` values.
    fn evaluate_with<'s>(
        &self,
        input: &[f32],
        scratch: &'s mut Scratch,
    ) -> Result<&'s [f32], NetError>;

    fn evaluate(&self, input: &[f32]) -> Result<Vec<f32>, NetError> {
        let mut scratch = Scratch::new(self.topology());
        self.evaluate_with(input, &mut scratch).map(|o| o.to_vec())
    }
}

#[enum_dispatch(Evaluator)]
#[derive(Clone, Debug)]
pub enum Backend {
    HostBackend,
    KernelBackend,
}

/// Selects a backend from configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Host,
    Kernel,
}

impl Default for BackendKind {
    fn default() -> Self {
        BackendKind::Host
    }
}

impl BackendKind {
    pub fn build(self, network: Network) -> Backend {
        match self {
            BackendKind::Host => HostBackend::new(network).into(),
            BackendKind::Kernel => KernelBackend::new(&network).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{initializer::Uniform, matrix::tests::check, network::NetworkBuilder};

    #[test]
    fn backends_agree() {
        let topology = Topology::new(16, 10, 3, 9);
        let network = NetworkBuilder::new(topology)
            .initializer(Uniform::new(Some(99)))
            .build()
            .unwrap();
        let host = BackendKind::Host.build(network.clone());
        let kernel = BackendKind::Kernel.build(network);

        let mut host_scratch = Scratch::new(host.topology());
        let mut kernel_scratch = Scratch::new(kernel.topology());
        for i in 0..20 {
            let input: Vec<f32> = (0..10).map(|c| ((i * 10 + c) as f32 * 0.37).sin()).collect();
            let h = host.evaluate_with(&input, &mut host_scratch).unwrap().to_vec();
            let k = kernel.evaluate_with(&input, &mut kernel_scratch).unwrap();
            check(&h, k, 0.00001, "kernel output");
        }
    }

    #[test]
    fn backend_kind_from_json() {
        let kind: BackendKind = serde_json::from_str("\"kernel\"").unwrap();
        assert_eq!(kind, BackendKind::Kernel);
        assert_eq!(BackendKind::default(), BackendKind::Host);
    }
}
