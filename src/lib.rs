//! Abstract imagery from untrained neural networks.
//!
//! A [Network](network::Network) with uniformly random weights is evaluated
//! once per pixel; the pixel coordinates (and optional extra channels) go in
//! and the outputs come out as RGB.

pub mod a_funcs;
pub mod backend;
pub mod channels;
pub mod config;
pub mod error;
pub mod initializer;
pub mod matrix;
pub mod network;
pub mod output;
pub mod sampler;

pub use backend::{Backend, BackendKind, Evaluator};
pub use config::DreamConfig;
pub use error::NetError;
pub use matrix::Matrix;
pub use network::{Network, NetworkBuilder, Topology};
pub use sampler::{Image, Sampler};
