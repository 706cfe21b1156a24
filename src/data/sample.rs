//! Validated sample container shared by every estimator.
//!
//! Purpose
//! -------
//! Hold an `n × d` matrix of observations that is guaranteed non-empty,
//! at least one-dimensional, and finite, so the numerical code downstream
//! never re-checks those properties.
//!
//! Key behaviors
//! -------------
//! - [`Sample::new`] validates an owned `Array2<f64>`.
//! - [`Sample::from_values`] builds a univariate (`d = 1`) sample.
//! - [`Sample::from_rows`] builds a sample from row vectors, rejecting
//!   ragged input.
//!
//! Invariants & assumptions
//! ------------------------
//! - `n ≥ 1`, `d ≥ 1`, every entry finite.
//! - Immutable after construction; accessors hand out views.
//!
//! Testing notes
//! -------------
//! - Unit tests cover each constructor's happy path and every rejection.
use crate::data::errors::{SampleError, SampleResult, SampleRole};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Finite, non-empty collection of points in ℝ^d.
///
/// Rows are observations and columns are features. The `role` is used only
/// to label validation errors.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    points: Array2<f64>,
    role: SampleRole,
}

impl Sample {
    /// Validate and wrap an `n × d` matrix.
    ///
    /// # Errors
    /// - `SampleError::EmptySample` if `n == 0`.
    /// - `SampleError::ZeroDimension` if `d == 0`.
    /// - `SampleError::NonFiniteData` for the first NaN/±∞ entry.
    ///
    /// # Examples
    /// ```rust
    /// # use ndarray::array;
    /// # use rust_density_ratio::data::{Sample, SampleRole};
    /// let s = Sample::new(array![[0.0, 1.0], [2.0, 3.0]], SampleRole::Source)?;
    /// assert_eq!((s.len(), s.dim()), (2, 2));
    /// # Ok::<(), rust_density_ratio::data::SampleError>(())
    /// ```
    pub fn new(points: Array2<f64>, role: SampleRole) -> SampleResult<Self> {
        if points.nrows() == 0 {
            return Err(SampleError::EmptySample { role });
        }
        if points.ncols() == 0 {
            return Err(SampleError::ZeroDimension { role });
        }
        for ((row, col), &value) in points.indexed_iter() {
            if !value.is_finite() {
                return Err(SampleError::NonFiniteData { role, row, col, value });
            }
        }
        Ok(Self { points, role })
    }

    /// Univariate sample: each value becomes one row of a single column.
    ///
    /// # Errors
    /// Same as [`Sample::new`].
    pub fn from_values(values: Array1<f64>, role: SampleRole) -> SampleResult<Self> {
        let n = values.len();
        let points = values.into_shape((n, 1)).map_err(|_| SampleError::EmptySample { role })?;
        Self::new(points, role)
    }

    /// Build a sample from row vectors.
    ///
    /// # Errors
    /// - `SampleError::EmptySample` if `rows` is empty.
    /// - `SampleError::RaggedRows` if a row length differs from the first row.
    /// - Anything [`Sample::new`] rejects.
    pub fn from_rows(rows: &[Vec<f64>], role: SampleRole) -> SampleResult<Self> {
        let first = rows.first().ok_or(SampleError::EmptySample { role })?;
        let d = first.len();
        let mut flat = Vec::with_capacity(rows.len() * d);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != d {
                return Err(SampleError::RaggedRows { role, row, expected: d, found: values.len() });
            }
            flat.extend_from_slice(values);
        }
        let points = Array2::from_shape_vec((rows.len(), d), flat)
            .map_err(|_| SampleError::ZeroDimension { role })?;
        Self::new(points, role)
    }

    /// Number of observations `n`.
    pub fn len(&self) -> usize {
        self.points.nrows()
    }

    /// Always `false`; kept for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        self.points.nrows() == 0
    }

    /// Feature dimension `d`.
    pub fn dim(&self) -> usize {
        self.points.ncols()
    }

    pub fn role(&self) -> SampleRole {
        self.role
    }

    pub fn points(&self) -> ArrayView2<'_, f64> {
        self.points.view()
    }

    /// Observation `i` as a view of length `d`. Panics if `i >= len()`.
    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.points.row(i)
    }

    pub fn rows(&self) -> impl Iterator<Item = ArrayView1<'_, f64>> {
        self.points.axis_iter(Axis(0))
    }

    /// Same points under a different role label.
    pub fn relabel(&self, role: SampleRole) -> Sample {
        Sample { points: self.points.clone(), role }
    }

    pub fn into_inner(self) -> Array2<f64> {
        self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `Sample::new`, `from_values`, `from_rows` happy paths.
    // - Empty, zero-dimension, ragged, and non-finite rejections.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Valid inputs produce samples with the expected shape.
    //
    // Given
    // -----
    // - A 3×2 matrix, a length-4 vector, and two rows of length 3.
    //
    // Expect
    // ------
    // - Shapes (3, 2), (4, 1) and (2, 3) with roles preserved.
    fn constructors_accept_valid_input() {
        // Arrange / Act
        let a = Sample::new(array![[0.0, 1.0], [2.0, 3.0], [4.0, 5.0]], SampleRole::Source)
            .expect("valid matrix");
        let b = Sample::from_values(array![0.1, 0.2, 0.3, 0.4], SampleRole::Target)
            .expect("valid values");
        let c = Sample::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]], SampleRole::Query)
            .expect("valid rows");

        // Assert
        assert_eq!((a.len(), a.dim()), (3, 2));
        assert_eq!((b.len(), b.dim()), (4, 1));
        assert_eq!((c.len(), c.dim()), (2, 3));
        assert_eq!(b.role(), SampleRole::Target);
        assert_eq!(c.row(1)[2], 6.0);
    }

    #[test]
    // Purpose
    // -------
    // Empty samples are rejected with their role.
    //
    // Given
    // -----
    // - A 0×1 matrix, an empty vector, and no rows.
    //
    // Expect
    // ------
    // - `EmptySample` carrying the role passed in.
    fn constructors_reject_empty_samples() {
        assert_eq!(
            Sample::new(Array2::zeros((0, 1)), SampleRole::Source),
            Err(SampleError::EmptySample { role: SampleRole::Source })
        );
        assert_eq!(
            Sample::from_values(Array1::zeros(0), SampleRole::Target),
            Err(SampleError::EmptySample { role: SampleRole::Target })
        );
        assert_eq!(
            Sample::from_rows(&[], SampleRole::Query),
            Err(SampleError::EmptySample { role: SampleRole::Query })
        );
    }

    #[test]
    // Purpose
    // -------
    // Zero-width, ragged, and non-finite inputs are rejected.
    //
    // Given
    // -----
    // - A 2×0 matrix, rows of lengths 2 and 1, and a matrix holding NaN.
    //
    // Expect
    // ------
    // - `ZeroDimension`, `RaggedRows { row: 1 }`, `NonFiniteData { (1, 0) }`.
    fn constructors_reject_malformed_samples() {
        assert_eq!(
            Sample::new(Array2::zeros((2, 0)), SampleRole::Source),
            Err(SampleError::ZeroDimension { role: SampleRole::Source })
        );
        assert_eq!(
            Sample::from_rows(&[vec![1.0, 2.0], vec![3.0]], SampleRole::Source),
            Err(SampleError::RaggedRows {
                role: SampleRole::Source,
                row: 1,
                expected: 2,
                found: 1
            })
        );
        assert!(matches!(
            Sample::new(array![[0.0], [f64::NAN]], SampleRole::Target),
            Err(SampleError::NonFiniteData { row: 1, col: 0, .. })
        ));
    }
}
