//! Writing rendered frames to disk.

use crate::sampler::Image;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    /// Bare RGB bytes without any header.
    Raw,
    /// Binary (P6) portable pixmap.
    Ppm,
}

impl Default for Format {
    fn default() -> Self {
        Format::Ppm
    }
}

impl Format {
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Raw => "raw",
            Format::Ppm => "ppm",
        }
    }

    pub fn encode(&self, image: &Image) -> Vec<u8> {
        match self {
            Format::Raw => image.as_bytes().to_vec(),
            Format::Ppm => {
                let header = format!("P6\n{} {}\n255\n", image.width(), image.height());
                let mut out = Vec::with_capacity(header.len() + image.as_bytes().len());
                out.extend_from_slice(header.as_bytes());
                out.extend_from_slice(image.as_bytes());
                out
            }
        }
    }
}

pub fn write_image(path: &Path, image: &Image, format: Format) -> anyhow::Result<()> {
    fs::write(path, format.encode(image))
        .with_context(|| format!("failed to write {}", path.display()))?;
    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        ?format,
        "wrote image"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ppm_header() {
        let image = Image::new(3, 2).unwrap();
        let bytes = Format::Ppm.encode(&image);
        assert!(bytes.starts_with(b"P6\n3 2\n255\n"));
        assert_eq!(bytes.len(), 11 + 18);
    }

    #[test]
    fn raw_is_pixels_only() {
        let image = Image::new(3, 2).unwrap();
        assert_eq!(Format::Raw.encode(&image), vec![0; 18]);
        assert_eq!(Format::Raw.extension(), "raw");
    }

    #[test]
    fn write_to_missing_directory_fails() {
        let path = std::env::temp_dir()
            .join("dreamnet-no-such-dir")
            .join("out.ppm");
        assert!(write_image(&path, &Image::new(1, 1).unwrap(), Format::Ppm).is_err());
    }
}
