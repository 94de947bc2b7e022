use crate::{
    a_funcs::{ActivFunc, Sigmoid, TanH},
    error::{NetError, Shape},
};

/// Dense row-major matrix of `f32`. The shape is fixed at construction and
/// `data.len() == rows * cols` always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Box<[f32]>,
}

impl Matrix {
    /// Zero filled matrix.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.; rows * cols].into_boxed_slice(),
        }
    }

    /// Wraps `data` as a `rows` x `cols` matrix.
    /// Returns Err if the length of `data` doesn't match the shape.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self, NetError> {
        if data.len() != rows * cols {
            return Err(NetError::StorageLength {
                expected: rows * cols,
                actual: data.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            data: data.into_boxed_slice(),
        })
    }

    /// Builds a matrix from nested rows. All rows must have the same length.
    pub fn from_rows<R: AsRef<[f32]>>(rows: &[R]) -> Result<Self, NetError> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(NetError::StorageLength {
                    expected: cols,
                    actual: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Self::from_vec(rows.len(), cols, data)
    }

    /// A `values.len()` x 1 column vector.
    pub fn column(values: &[f32]) -> Self {
        Self {
            rows: values.len(),
            cols: 1,
            data: values.into(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> Shape {
        (self.rows, self.cols)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Overwrites every element with a value produced by `gen`, called once per
    /// element in storage order.
    pub fn fill<G: FnMut() -> f32>(&mut self, mut gen: G) {
        for x in self.data.iter_mut() {
            *x = gen();
        }
    }

    /// Same as [fill](Self::fill) but for generators which can fail.
    /// Elements written before the failure are kept.
    pub fn try_fill<G, E>(&mut self, mut gen: G) -> Result<(), E>
    where
        G: FnMut() -> Result<f32, E>,
    {
        for x in self.data.iter_mut() {
            *x = gen()?;
        }
        Ok(())
    }

    /// Standard matrix product `self * other`.
    pub fn multiply(&self, other: &Matrix) -> Result<Matrix, NetError> {
        if self.cols != other.rows {
            return Err(NetError::ShapeMismatch {
                left: self.shape(),
                right: other.shape(),
            });
        }

        let mut result = Matrix::new(self.rows, other.cols);
        for (lhs, out) in self
            .data
            .chunks_exact(self.cols.max(1))
            .zip(result.data.chunks_exact_mut(other.cols.max(1)))
        {
            for (j, o) in out.iter_mut().enumerate() {
                *o = lhs
                    .iter()
                    .enumerate()
                    .map(|(k, l)| l * other.data[k * other.cols + j])
                    .sum();
            }
        }
        Ok(result)
    }

    /// Elementwise map into a new matrix of the same shape.
    pub fn map<F: ActivFunc>(&self) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|x| F::evaluate(*x)).collect(),
        }
    }

    pub fn tanh(&self) -> Matrix {
        self.map::<TanH>()
    }

    pub fn sigmoid(&self) -> Matrix {
        self.map::<Sigmoid>()
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data.into_vec()
    }
}
