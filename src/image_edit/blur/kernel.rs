//! Directional blur kernel construction

use crate::image_edit::common::error::{EditError, Result};

/// Offset applied to the user angle before rotating the diagonal line kernel.
pub const KERNEL_ANGLE_OFFSET: f64 = 45.0;

/// Maps a user-facing angle in degrees to the kernel rotation, `(angle - 45) mod 360`.
pub fn normalize_angle(angle_degrees: f64) -> f64 {
    (angle_degrees - KERNEL_ANGLE_OFFSET).rem_euclid(360.0)
}

/// One non-zero kernel weight, positioned relative to the kernel anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tap {
    pub dx: isize,
    pub dy: isize,
    pub weight: f32,
}

/// Square convolution matrix of a rotated line, normalized to sum to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct BlurKernel {
    size: usize,
    /// Row-major `size * size` weights
    weights: Vec<f32>,
}

impl BlurKernel {
    /// Builds an `intensity` x `intensity` line kernel.
    ///
    /// Starts from the identity diagonal (a 45 degree line of ones), rotates it
    /// about its center by the normalized angle with bilinear resampling and a
    /// zero border, then rescales so the weights sum to 1.
    pub fn new(intensity: usize, angle_degrees: f64) -> Result<Self> {
        if intensity == 0 {
            return Err(EditError::invalid("blur intensity must be at least 1"));
        }
        if !angle_degrees.is_finite() {
            return Err(EditError::invalid(format!(
                "blur angle {} is not finite",
                angle_degrees
            )));
        }
        if intensity == 1 {
            return Ok(Self::identity());
        }

        let n = intensity;
        let theta = normalize_angle(angle_degrees).to_radians();
        let (sin, cos) = theta.sin_cos();
        let center = (n as f64 - 1.0) / 2.0;

        let mut weights = vec![0.0f32; n * n];
        for row in 0..n {
            for col in 0..n {
                let dx = col as f64 - center;
                let dy = row as f64 - center;
                // inverse of the affine rotation: where this cell came from
                let sx = cos * dx - sin * dy + center;
                let sy = sin * dx + cos * dy + center;
                weights[row * n + col] = sample_diagonal(n, sx, sy) as f32;
            }
        }

        let sum: f32 = weights.iter().sum();
        if sum <= f32::EPSILON {
            // fully rotated out of the grid; fall back to a single center weight
            weights.iter_mut().for_each(|w| *w = 0.0);
            weights[(n / 2) * n + n / 2] = 1.0;
        } else {
            weights.iter_mut().for_each(|w| *w /= sum);
        }

        Ok(Self { size: n, weights })
    }

    pub fn identity() -> Self {
        Self {
            size: 1,
            weights: vec![1.0],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn weight(&self, row: usize, col: usize) -> f32 {
        self.weights[row * self.size + col]
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn is_identity(&self) -> bool {
        self.size == 1
    }

    /// Anchor cell, `size / 2` on both axes.
    pub fn anchor(&self) -> usize {
        self.size / 2
    }

    /// Non-zero weights with offsets from the anchor.
    pub fn taps(&self) -> Vec<Tap> {
        let anchor = self.anchor() as isize;
        let mut taps = Vec::new();
        for row in 0..self.size {
            for col in 0..self.size {
                let weight = self.weight(row, col);
                if weight > 0.0 {
                    taps.push(Tap {
                        dx: col as isize - anchor,
                        dy: row as isize - anchor,
                        weight,
                    });
                }
            }
        }
        taps
    }
}

/// Bilinear sample of the `n` x `n` identity matrix at `(x, y)`, zero outside.
fn sample_diagonal(n: usize, x: f64, y: f64) -> f64 {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;

    let at = |col: f64, row: f64| -> f64 {
        if col < 0.0 || row < 0.0 || col >= n as f64 || row >= n as f64 {
            return 0.0;
        }
        if col == row { 1.0 } else { 0.0 }
    };

    at(x0, y0) * (1.0 - fx) * (1.0 - fy)
        + at(x0 + 1.0, y0) * fx * (1.0 - fy)
        + at(x0, y0 + 1.0) * (1.0 - fx) * fy
        + at(x0 + 1.0, y0 + 1.0) * fx * fy
}
