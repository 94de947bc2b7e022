//! Turns a network into pixels: one evaluation per pixel, outputs read as RGB.

use crate::{
    backend::{Evaluator, Scratch},
    channels::{AuxChannels, Frame},
    error::NetError,
};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// How a pixel index is turned into a network input.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CoordinateMap {
    /// `pos / extent - 0.5`
    Centered,
    /// Pixel centres spread over `[-scale / 2, scale / 2]`.
    Span { scale: f32 },
}

impl Default for CoordinateMap {
    fn default() -> Self {
        CoordinateMap::Centered
    }
}

impl CoordinateMap {
    pub fn map(&self, pos: usize, extent: usize) -> f32 {
        match *self {
            CoordinateMap::Centered => pos as f32 / extent as f32 - 0.5,
            CoordinateMap::Span { scale } => {
                (pos as f32 + 0.5) / extent as f32 * scale - scale / 2.
            }
        }
    }
}

/// Quantizes a channel value in [0, 1] to a byte. Out of range values are clamped.
pub fn to_byte(value: f32) -> u8 {
    (value.max(0.).min(1.) * 255.).round() as u8
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb(pub [f32; 3]);

impl Rgb {
    /// Reads the first three outputs. Networks with fewer outputs repeat
    /// their last one, giving a grey image for a single output.
    pub fn from_outputs(outputs: &[f32]) -> Self {
        let at = |c: usize| outputs.get(c).or_else(|| outputs.last()).copied().unwrap_or(0.);
        Rgb([at(0), at(1), at(2)])
    }

    pub fn to_bytes(&self) -> [u8; 3] {
        [to_byte(self.0[0]), to_byte(self.0[1]), to_byte(self.0[2])]
    }
}

/// Row-major RGB image, three bytes per pixel, top row first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Image {
    /// Black image. Fails if the buffer would not fit in memory.
    pub fn new(width: usize, height: usize) -> Result<Self, NetError> {
        let len = Self::byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Size in bytes of a `width` x `height` image, or Err if it overflows
    /// the largest possible allocation.
    pub fn byte_len(width: usize, height: usize) -> Result<usize, NetError> {
        width
            .checked_mul(3)
            .and_then(|row| row.checked_mul(height))
            .filter(|len| *len <= isize::MAX as usize)
            .ok_or(NetError::ImageTooLarge {
                width,
                height,
                scale: 1,
            })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 3;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    /// Nearest neighbour enlargement by an integer factor. A factor of 0 is treated as 1.
    pub fn upscale(&self, factor: usize) -> Result<Image, NetError> {
        let factor = factor.max(1);
        if factor == 1 {
            return Ok(self.clone());
        }

        let too_large = NetError::ImageTooLarge {
            width: self.width,
            height: self.height,
            scale: factor,
        };
        let (width, height) = match (
            self.width.checked_mul(factor),
            self.height.checked_mul(factor),
        ) {
            (Some(w), Some(h)) => (w, h),
            _ => return Err(too_large),
        };
        let mut out = Image::new(width, height).map_err(|_| too_large)?;
        let row_len = out.width * 3;
        for (y, row) in out.data.chunks_exact_mut(row_len.max(1)).enumerate() {
            for (x, px) in row.chunks_exact_mut(3).enumerate() {
                let i = ((y / factor) * self.width + x / factor) * 3;
                px.copy_from_slice(&self.data[i..i + 3]);
            }
        }
        Ok(out)
    }
}

/// Evaluates a network once per pixel. Holds no state between renders.
#[derive(Clone, Copy, Debug)]
pub struct Sampler {
    pub coords: CoordinateMap,
    /// Render rows on the rayon thread pool.
    pub parallel: bool,
}

impl Default for Sampler {
    fn default() -> Self {
        Self {
            coords: CoordinateMap::default(),
            parallel: true,
        }
    }
}

impl Sampler {
    pub fn new(coords: CoordinateMap, parallel: bool) -> Self {
        Self { coords, parallel }
    }

    /// Renders a `width` x `height` image. Each pixel's input is its two
    /// coordinates followed by `aux`.
    pub fn render<E>(
        &self,
        evaluator: &E,
        width: usize,
        height: usize,
        aux: &[f32],
    ) -> Result<Image, NetError>
    where
        E: Evaluator + Sync,
    {
        let mut image = Image::new(width, height)?;
        self.render_into(evaluator, width, height, aux, &mut image.data)?;
        Ok(image)
    }

    /// Like [render](Self::render) but writes into a caller owned buffer of
    /// exactly `width * height * 3` bytes.
    pub fn render_into<E>(
        &self,
        evaluator: &E,
        width: usize,
        height: usize,
        aux: &[f32],
        dst: &mut [u8],
    ) -> Result<(), NetError>
    where
        E: Evaluator + Sync,
    {
        let expected = Image::byte_len(width, height)?;
        if dst.len() != expected {
            return Err(NetError::StorageLength {
                expected,
                actual: dst.len(),
            });
        }
        if expected == 0 {
            return Ok(());
        }

        let row_len = width * 3;
        if self.parallel {
            dst.par_chunks_mut(row_len).enumerate().try_for_each_init(
                || Scratch::new(evaluator.topology()),
                |scratch, (y, row)| self.render_row(evaluator, scratch, y, height, aux, row),
            )
        } else {
            let mut scratch = Scratch::new(evaluator.topology());
            dst.chunks_mut(row_len)
                .enumerate()
                .try_for_each(|(y, row)| {
                    self.render_row(evaluator, &mut scratch, y, height, aux, row)
                })
        }
    }

    /// Renders one frame of an animation, asking `channels` for the extra inputs.
    pub fn render_frame<E, C>(
        &self,
        evaluator: &E,
        channels: &C,
        frame: Frame,
        width: usize,
        height: usize,
    ) -> Result<Image, NetError>
    where
        E: Evaluator + Sync,
        C: AuxChannels,
    {
        let aux = channels.values(frame);
        self.render(evaluator, width, height, &aux)
    }

    fn render_row<E: Evaluator>(
        &self,
        evaluator: &E,
        scratch: &mut Scratch,
        y: usize,
        height: usize,
        aux: &[f32],
        row: &mut [u8],
    ) -> Result<(), NetError> {
        let width = row.len() / 3;
        let mut input = Vec::with_capacity(aux.len() + 2);
        input.extend_from_slice(&[0., self.coords.map(y, height)]);
        input.extend_from_slice(aux);

        for (x, px) in row.chunks_exact_mut(3).enumerate() {
            input[0] = self.coords.map(x, width);
            let out = evaluator.evaluate_with(&input, scratch)?;
            px.copy_from_slice(&Rgb::from_outputs(out).to_bytes());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        backend::BackendKind,
        initializer::{Constant, Uniform},
        network::{NetworkBuilder, Topology},
    };

    #[test]
    fn byte_quantization() {
        assert_eq!(to_byte(0.), 0);
        assert_eq!(to_byte(1.), 255);
        assert_eq!(to_byte(0.5), 128);
        assert_eq!(to_byte(-3.), 0);
        assert_eq!(to_byte(7.), 255);
        assert_eq!(to_byte(f32::NAN), 0);
    }

    #[test]
    fn coordinate_maps() {
        assert_eq!(CoordinateMap::Centered.map(0, 4), -0.5);
        assert_eq!(CoordinateMap::Centered.map(2, 4), 0.);
        let span = CoordinateMap::Span { scale: 4. };
        assert_eq!(span.map(0, 2), -1.);
        assert_eq!(span.map(1, 2), 1.);
    }

    #[test]
    fn grey_for_single_output() {
        assert_eq!(Rgb::from_outputs(&[0.2]).0, [0.2; 3]);
        assert_eq!(Rgb::from_outputs(&[0.1, 0.9]).0, [0.1, 0.9, 0.9]);
        assert_eq!(Rgb::from_outputs(&[0.1, 0.2, 0.3, 0.4]).0, [0.1, 0.2, 0.3]);
    }

    #[test]
    fn upscale_repeats_pixels() {
        let mut image = Image::new(2, 1).unwrap();
        image.data.copy_from_slice(&[1, 2, 3, 4, 5, 6]);
        let big = image.upscale(2).unwrap();

        assert_eq!((big.width(), big.height()), (4, 2));
        assert_eq!(big.pixel(1, 1), Some([1, 2, 3]));
        assert_eq!(big.pixel(2, 0), Some([4, 5, 6]));
        assert_eq!(big.pixel(4, 0), None);
        assert_eq!(image.upscale(0).unwrap(), image);
    }

    #[test]
    fn oversized_images_are_errors() {
        let image = Image::new(2, 2).unwrap();
        assert_eq!(
            image.upscale(usize::MAX / 2),
            Err(NetError::ImageTooLarge {
                width: 2,
                height: 2,
                scale: usize::MAX / 2
            })
        );
        assert!(image.upscale(1 << 20).is_err());
        assert!(Image::new(usize::MAX, 2).is_err());
        assert!(Image::new(usize::MAX / 4, usize::MAX / 4).is_err());
        assert_eq!(Image::byte_len(4, 5), Ok(60));
    }

    #[test]
    fn render_rejects_oversized_images() {
        let network = NetworkBuilder::new(Topology::new(4, 2, 3, 1)).build().unwrap();
        let backend = BackendKind::Host.build(network);
        let sampler = Sampler::default();

        assert!(matches!(
            sampler.render(&backend, usize::MAX / 2, 3, &[]),
            Err(NetError::ImageTooLarge { .. })
        ));
        let mut dst = Vec::new();
        assert!(matches!(
            sampler.render_into(&backend, usize::MAX, usize::MAX, &[], &mut dst),
            Err(NetError::ImageTooLarge { .. })
        ));
    }

    #[test]
    fn zero_weights_render_flat_grey() {
        let network = NetworkBuilder::new(Topology::new(16, 2, 3, 8))
            .initializer(Constant(0.))
            .build()
            .unwrap();
        let backend = BackendKind::Host.build(network);
        let image = Sampler::default().render(&backend, 4, 4, &[]).unwrap();

        assert_eq!(image.as_bytes().len(), 4 * 4 * 3);
        assert!(image.as_bytes().iter().all(|b| *b == 128));
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let network = NetworkBuilder::new(Topology::default())
            .initializer(Uniform::new(Some(21)))
            .build()
            .unwrap();
        let backend = BackendKind::Kernel.build(network);

        let par = Sampler::new(CoordinateMap::Centered, true)
            .render(&backend, 13, 7, &[0.4])
            .unwrap();
        let seq = Sampler::new(CoordinateMap::Centered, false)
            .render(&backend, 13, 7, &[0.4])
            .unwrap();
        assert_eq!(par, seq);
    }

    #[test]
    fn destination_length_is_checked() {
        let network = NetworkBuilder::new(Topology::new(4, 2, 3, 1)).build().unwrap();
        let backend = BackendKind::Host.build(network);
        let mut dst = vec![0u8; 10];
        assert_eq!(
            Sampler::default().render_into(&backend, 2, 2, &[], &mut dst),
            Err(NetError::StorageLength {
                expected: 12,
                actual: 10
            })
        );
    }

    #[test]
    fn empty_image() {
        let network = NetworkBuilder::new(Topology::new(4, 2, 3, 1)).build().unwrap();
        let backend = BackendKind::Host.build(network);
        let image = Sampler::default().render(&backend, 0, 5, &[]).unwrap();
        assert!(image.as_bytes().is_empty());
    }

    #[test]
    fn channel_count_must_match_inputs() {
        let network = NetworkBuilder::new(Topology::new(4, 3, 3, 1)).build().unwrap();
        let backend = BackendKind::Host.build(network);
        let res = Sampler::default().render(&backend, 2, 2, &[]);
        assert!(matches!(res, Err(NetError::ShapeMismatch { .. })));
    }
}
