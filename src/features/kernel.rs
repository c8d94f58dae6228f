//! Holiday influence kernel.
//!
//! A holiday's effect on sales builds up over the following days and peaks
//! between 4 and 5 days later, so the kernel is a Gaussian bump centred at
//! offset 4.5 rather than at the holiday itself.

/// Number of day offsets the canonical kernel covers (0..=10).
pub const KERNEL_LEN: usize = 11;

const CENTER: f64 = 4.5;
const WIDTH: f64 = 8.5;

/// Weight applied `offset` days after a holiday, indexed by offset.
#[derive(Debug, Clone, PartialEq)]
pub struct InfluenceKernel {
    weights: Vec<f64>,
}

impl InfluenceKernel {
    /// Kernel from explicit weights (offset `i` gets `weights[i]`).
    pub fn from_weights(weights: Vec<f64>) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// `(offset, weight)` pairs in offset order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.weights.iter().copied().enumerate()
    }
}

impl Default for InfluenceKernel {
    fn default() -> Self {
        influence_kernel()
    }
}

/// The canonical 11-weight kernel: `exp(-(i - 4.5)^2 / 8.5)`.
pub fn influence_kernel() -> InfluenceKernel {
    let weights = (0..KERNEL_LEN)
        .map(|i| {
            let d = i as f64 - CENTER;
            (-(d * d) / WIDTH).exp()
        })
        .collect();
    InfluenceKernel { weights }
}
