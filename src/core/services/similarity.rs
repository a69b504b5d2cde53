//! Perceptual hashing
//!
//! DCT hash over a 64x64 grayscale thumbnail. The top-left 16x16 block of
//! low-frequency coefficients is compared against its median, one bit per
//! coefficient. Near-identical pictures differ in only a few bits.

use std::f64::consts::PI;

use crate::core::models::{ImageEvidence, PerceptualHash, THUMBNAIL_SIDE};

/// Side of the low-frequency block kept from the DCT
pub const HASH_SIDE: usize = 16;

/// Hash a row-major `THUMBNAIL_SIDE` x `THUMBNAIL_SIDE` luminance buffer
///
/// Shorter buffers are treated as zero-padded, so the result is always
/// defined.
#[must_use]
pub fn perceptual_hash(luma: &[u8]) -> PerceptualHash {
    let n = THUMBNAIL_SIDE;
    let table = cosine_table(n);

    // Row pass: keep only the first HASH_SIDE coefficients of every row.
    let mut rows = vec![[0.0f64; HASH_SIDE]; n];
    for (y, row) in rows.iter_mut().enumerate() {
        for (k, coeff) in row.iter_mut().enumerate() {
            *coeff = (0..n)
                .map(|x| pixel(luma, x, y) * table[k * n + x])
                .sum();
        }
    }

    // Column pass over the kept coefficients.
    let mut block = [0.0f64; HASH_SIDE * HASH_SIDE];
    for v in 0..HASH_SIDE {
        for u in 0..HASH_SIDE {
            block[v * HASH_SIDE + u] = (0..n).map(|y| rows[y][u] * table[v * n + y]).sum();
        }
    }

    let median = median(&block);
    let mut words = [0u64; 4];
    for (i, value) in block.iter().enumerate() {
        if *value > median {
            words[i / 64] |= 1 << (63 - (i % 64));
        }
    }
    PerceptualHash(words)
}

/// Perceptual similarity of two decoded images in 0..=1
#[must_use]
pub fn image_similarity(a: &ImageEvidence, b: &ImageEvidence) -> f64 {
    a.phash.similarity(&b.phash)
}

fn pixel(luma: &[u8], x: usize, y: usize) -> f64 {
    luma.get(y * THUMBNAIL_SIDE + x).copied().map_or(0.0, f64::from)
}

/// `cos(pi * k * (2x + 1) / 2n)` for `k < HASH_SIDE`, `x < n`
fn cosine_table(n: usize) -> Vec<f64> {
    #[allow(clippy::cast_precision_loss)]
    let n_f = n as f64;
    let mut table = Vec::with_capacity(HASH_SIDE * n);
    for k in 0..HASH_SIDE {
        for x in 0..n {
            #[allow(clippy::cast_precision_loss)]
            let angle = PI * k as f64 * (2.0 * x as f64 + 1.0) / (2.0 * n_f);
            table.push(angle.cos());
        }
    }
    table
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        f64::midpoint(sorted[mid - 1], sorted[mid])
    } else {
        sorted[mid]
    }
}
