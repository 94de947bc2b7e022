//! Run configuration, loaded from a JSON file. Every field has a default so
//! a partial (or missing) file is fine.

use crate::{
    backend::{Backend, BackendKind},
    channels::{AuxChannels, ChannelSource},
    initializer::InitKind,
    network::{Network, NetworkBuilder, Topology},
    output::Format,
    sampler::{CoordinateMap, Image, Sampler},
};

use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "dreamnet.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DreamConfig {
    pub topology: Topology,
    pub init: InitKind,
    /// Seed for the weights. A random one is picked when absent.
    pub seed: Option<u64>,
    pub backend: BackendKind,
    pub channels: ChannelSource,
    pub render: RenderConfig,
    pub animation: AnimationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    /// Integer enlargement applied before writing.
    pub upscale: usize,
    pub coordinates: CoordinateMap,
    pub parallel: bool,
    pub format: Format,
    pub output: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 40,
            height: 40,
            upscale: 8,
            coordinates: CoordinateMap::default(),
            parallel: true,
            format: Format::default(),
            output: "dream.ppm".to_string(),
        }
    }
}

impl RenderConfig {
    pub fn sampler(&self) -> Sampler {
        Sampler::new(self.coordinates, self.parallel)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub frames: u64,
    pub fps: f32,
    pub directory: String,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            frames: 200,
            fps: 30.,
            directory: "frames".to_string(),
        }
    }
}

impl DreamConfig {
    /// Reads `path`, falling back to defaults when the file doesn't exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let s = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = serde_json::from_str(&s)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Checks that the pixel inputs line up with the network's input layer.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.topology.validate()?;
        let fed = 2 + self.channels.count();
        ensure!(
            fed == self.topology.inputs,
            "the network takes {} inputs but the image provides {} (2 coordinates + {} channels)",
            self.topology.inputs,
            fed,
            self.channels.count()
        );
        let RenderConfig {
            width,
            height,
            upscale,
            ..
        } = self.render;
        let scale = upscale.max(1);
        width
            .checked_mul(scale)
            .zip(height.checked_mul(scale))
            .and_then(|(w, h)| Image::byte_len(w, h).ok())
            .with_context(|| {
                format!(
                    "a {}x{} image upscaled by {} is too large",
                    width, height, upscale
                )
            })?;
        Ok(())
    }

    /// Builds the network with weights drawn from `seed`.
    pub fn network(&self, seed: u64) -> anyhow::Result<Network> {
        let init = self.init.build(Some(seed))?;
        let network = NetworkBuilder::new(self.topology)
            .initializer(init)
            .build()?;
        Ok(network)
    }

    pub fn backend(&self, seed: u64) -> anyhow::Result<Backend> {
        Ok(self.backend.build(self.network(seed)?))
    }
}
