//! Per-dimension standardization over the academic skill dimensions
//!
//! Equivalent to a column-wise standard scaler: fit computes mean and
//! population stddev per academic dimension, transform maps values to
//! z-scores. Constant columns get their scale clamped to `1.0` so they
//! standardize to a plain mean-shift instead of NaN.

use crate::error::{Error, Result};

/// Number of jointly-standardized academic dimensions
pub const ACADEMIC_DIM_COUNT: usize = 3;

/// A fitted standardization model over the academic dimensions
///
/// A `Scaler` only exists after a successful fit; an unfit store simply
/// holds no scaler.
#[derive(Debug, Clone, PartialEq)]
pub struct Scaler {
    mean: [f64; ACADEMIC_DIM_COUNT],
    scale: [f64; ACADEMIC_DIM_COUNT],
}

impl Scaler {
    /// Compute column-wise mean and stddev over the given rows
    ///
    /// Fails when there are no rows to fit on.
    pub fn fit(rows: &[[f64; ACADEMIC_DIM_COUNT]]) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::InsufficientData { have: 0, need: 1 });
        }

        let n = rows.len() as f64;
        let mut mean = [0.0; ACADEMIC_DIM_COUNT];
        for row in rows {
            for (m, x) in mean.iter_mut().zip(row) {
                *m += x;
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        let mut scale = [0.0; ACADEMIC_DIM_COUNT];
        for row in rows {
            for ((s, m), x) in scale.iter_mut().zip(&mean).zip(row) {
                *s += (x - m) * (x - m);
            }
        }
        for s in &mut scale {
            *s = (*s / n).sqrt();
            // A constant column would otherwise divide by zero
            if *s == 0.0 {
                *s = 1.0;
            }
        }

        Ok(Self { mean, scale })
    }

    /// Rebuild a fitted scaler from persisted mean/scale vectors
    pub fn from_parts(mean: &[f64], scale: &[f64]) -> Result<Self> {
        let mean: [f64; ACADEMIC_DIM_COUNT] = mean.try_into().map_err(|_| {
            Error::CorruptModel(format!(
                "scaler_mean has {} entries, expected {}",
                mean.len(),
                ACADEMIC_DIM_COUNT
            ))
        })?;
        let scale: [f64; ACADEMIC_DIM_COUNT] = scale.try_into().map_err(|_| {
            Error::CorruptModel(format!(
                "scaler_scale has {} entries, expected {}",
                scale.len(),
                ACADEMIC_DIM_COUNT
            ))
        })?;
        Ok(Self { mean, scale })
    }

    /// Standardize a single row: `(x - mean) / scale` per column
    #[inline]
    #[must_use]
    pub fn transform_row(&self, row: [f64; ACADEMIC_DIM_COUNT]) -> [f64; ACADEMIC_DIM_COUNT] {
        let mut out = [0.0; ACADEMIC_DIM_COUNT];
        for i in 0..ACADEMIC_DIM_COUNT {
            out[i] = (row[i] - self.mean[i]) / self.scale[i];
        }
        out
    }

    /// Standardize a whole matrix row by row
    #[must_use]
    pub fn transform(&self, rows: &[[f64; ACADEMIC_DIM_COUNT]]) -> Vec<[f64; ACADEMIC_DIM_COUNT]> {
        rows.iter().map(|&row| self.transform_row(row)).collect()
    }

    #[inline]
    #[must_use]
    pub fn mean(&self) -> &[f64; ACADEMIC_DIM_COUNT] {
        &self.mean
    }

    #[inline]
    #[must_use]
    pub fn scale(&self) -> &[f64; ACADEMIC_DIM_COUNT] {
        &self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_requires_rows() {
        assert!(matches!(
            Scaler::fit(&[]),
            Err(Error::InsufficientData { have: 0, .. })
        ));
    }

    #[test]
    fn test_fit_computes_population_stats() {
        let rows = [[10.0, 0.0, 4.0], [0.0, 0.0, 8.0]];
        let scaler = Scaler::fit(&rows).unwrap();
        assert_eq!(scaler.mean(), &[5.0, 0.0, 6.0]);
        // Population stddev; the constant middle column is clamped to 1.0
        assert_eq!(scaler.scale(), &[5.0, 1.0, 2.0]);
    }

    #[test]
    fn test_transform_standardizes_columns() {
        let rows = [[10.0, 2.0, 4.0], [0.0, 6.0, 8.0], [5.0, 4.0, 6.0]];
        let scaler = Scaler::fit(&rows).unwrap();
        let out = scaler.transform(&rows);

        for col in 0..ACADEMIC_DIM_COUNT {
            let n = out.len() as f64;
            let mean: f64 = out.iter().map(|r| r[col]).sum::<f64>() / n;
            let var: f64 = out.iter().map(|r| (r[col] - mean).powi(2)).sum::<f64>() / n;
            assert!(mean.abs() < 1e-12, "column {} mean {}", col, mean);
            assert!((var.sqrt() - 1.0).abs() < 1e-12, "column {} std {}", col, var.sqrt());
        }
    }

    #[test]
    fn test_constant_column_shifts_to_zero() {
        let rows = [[3.0, 1.0, 0.0], [3.0, 2.0, 0.0]];
        let scaler = Scaler::fit(&rows).unwrap();
        let out = scaler.transform(&rows);
        // Constant columns map to all-zero rather than NaN/Inf
        assert_eq!(out[0][0], 0.0);
        assert_eq!(out[1][0], 0.0);
        assert_eq!(out[0][2], 0.0);
        assert!(out.iter().flatten().all(|x| x.is_finite()));
    }

    #[test]
    fn test_from_parts_validates_length() {
        assert!(Scaler::from_parts(&[1.0, 2.0, 3.0], &[1.0, 1.0, 1.0]).is_ok());
        assert!(matches!(
            Scaler::from_parts(&[1.0], &[1.0, 1.0, 1.0]),
            Err(Error::CorruptModel(_))
        ));
        assert!(matches!(
            Scaler::from_parts(&[1.0, 2.0, 3.0], &[]),
            Err(Error::CorruptModel(_))
        ));
    }

    #[test]
    fn test_from_parts_matches_fit() {
        let rows = [[10.0, 5.0, 1.0], [2.0, 3.0, 9.0]];
        let fitted = Scaler::fit(&rows).unwrap();
        let rebuilt = Scaler::from_parts(fitted.mean(), fitted.scale()).unwrap();
        assert_eq!(fitted, rebuilt);
    }
}
