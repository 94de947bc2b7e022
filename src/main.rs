//! dreamnet CLI - render images from a randomly initialized network.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use dreamnet::backend::BackendKind;
use dreamnet::channels::{Constant, Frame};
use dreamnet::config::{DreamConfig, DEFAULT_CONFIG_FILE};
use dreamnet::output::{write_image, Format};
use dreamnet::Evaluator;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

#[derive(Parser)]
#[command(name = "dreamnet")]
#[command(about = "Render abstract images from an untrained neural network")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Seed for the network weights
    #[arg(short = 'S', long, global = true)]
    seed: Option<u64>,

    /// Execution backend
    #[arg(short, long, value_enum, global = true)]
    backend: Option<BackendArg>,

    /// Width of the rendered image
    #[arg(long, global = true)]
    width: Option<usize>,

    /// Height of the rendered image
    #[arg(long, global = true)]
    height: Option<usize>,

    /// Integer upscale factor applied before writing
    #[arg(long, global = true)]
    upscale: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    format: Option<FormatArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Render a single image
    Render {
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Extra channel values, replacing the configured channel source
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        aux: Option<Vec<f32>>,

        /// Frame index used to evaluate the channel source
        #[arg(long, default_value = "0")]
        frame: u64,
    },

    /// Render a sequence of frames driven by the channel source
    Animate {
        /// Output directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Number of frames
        #[arg(short = 'n', long)]
        frames: Option<u64>,

        /// Frames per second, used for time driven channels
        #[arg(long)]
        fps: Option<f32>,
    },
}

#[derive(Clone, Copy, ValueEnum, Debug)]
enum BackendArg {
    /// Matrix based evaluation
    Host,
    /// Packed weights with per-invocation scratch buffers
    Kernel,
}

impl BackendArg {
    fn to_kind(self) -> BackendKind {
        match self {
            BackendArg::Host => BackendKind::Host,
            BackendArg::Kernel => BackendKind::Kernel,
        }
    }
}

#[derive(Clone, Copy, ValueEnum, Debug)]
enum FormatArg {
    /// Bare RGB bytes
    Raw,
    /// Binary PPM
    Ppm,
}

impl FormatArg {
    fn to_format(self) -> Format {
        match self {
            FormatArg::Raw => Format::Raw,
            FormatArg::Ppm => Format::Ppm,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dreamnet=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let mut config = DreamConfig::load(&cli.config)?;

    if let Some(backend) = cli.backend {
        config.backend = backend.to_kind();
    }
    if let Some(width) = cli.width {
        config.render.width = width;
    }
    if let Some(height) = cli.height {
        config.render.height = height;
    }
    if let Some(upscale) = cli.upscale {
        config.render.upscale = upscale;
    }
    if let Some(format) = cli.format {
        config.render.format = format.to_format();
    }
    if let Commands::Render { aux: Some(values), .. } = &cli.command {
        config.channels = Constant {
            values: values.clone(),
        }
        .into();
    }
    config.validate()?;

    let seed = cli.seed.or(config.seed).unwrap_or_else(rand::random);
    let backend = config.backend(seed)?;
    let sampler = config.render.sampler();
    let (width, height) = (config.render.width, config.render.height);
    let format = config.render.format;

    info!(
        seed,
        backend = ?config.backend,
        topology = ?backend.topology(),
        "network ready"
    );

    match cli.command {
        Commands::Render { output, frame, .. } => {
            let frame = Frame::at(frame, config.animation.fps);
            let start = Instant::now();
            let image = sampler
                .render_frame(&backend, &config.channels, frame, width, height)?
                .upscale(config.render.upscale)?;
            info!(width, height, elapsed = ?start.elapsed(), "rendered");

            let output = output.unwrap_or_else(|| PathBuf::from(&config.render.output));
            write_image(&output, &image, format)?;
            info!("Saved to {}", output.display());
        }

        Commands::Animate {
            output_dir,
            frames,
            fps,
        } => {
            let frames = frames.unwrap_or(config.animation.frames);
            let fps = fps.unwrap_or(config.animation.fps);
            let output_dir =
                output_dir.unwrap_or_else(|| PathBuf::from(&config.animation.directory));
            fs::create_dir_all(&output_dir)?;

            let start = Instant::now();
            for index in 0..frames {
                let image = sampler
                    .render_frame(
                        &backend,
                        &config.channels,
                        Frame::at(index, fps),
                        width,
                        height,
                    )?
                    .upscale(config.render.upscale)?;
                let path =
                    output_dir.join(format!("dream_{:05}.{}", index, format.extension()));
                write_image(&path, &image, format)?;
            }
            info!(
                frames,
                elapsed = ?start.elapsed(),
                "Done! Frames saved to {}",
                output_dir.display()
            );
        }
    }

    Ok(())
}
