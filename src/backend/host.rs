use super::{Evaluator, Scratch};
use crate::{
    error::NetError,
    network::{Network, Topology},
};

use std::sync::Arc;

/// Evaluates through [Network::evaluate], allocating fresh activation
/// matrices for every call. The scratch only receives the result.
#[derive(Clone, Debug)]
pub struct HostBackend {
    network: Arc<Network>,
}

impl HostBackend {
    pub fn new(network: Network) -> Self {
        Self {
            network: Arc::new(network),
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }
}

impl Evaluator for HostBackend {
    fn topology(&self) -> &Topology {
        self.network.topology()
    }

    fn evaluate_with<'s>(
        &self,
        input: &[f32],
        scratch: &'s mut Scratch,
    ) -> Result<&'s [f32], NetError> {
        let output = self.network.evaluate(input)?;
        scratch.prepare(self.topology().stride());
        scratch.front[..output.len()].copy_from_slice(&output);
        Ok(&scratch.front[..output.len()])
    }
}
