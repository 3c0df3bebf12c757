use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sparse vector over a fixed vocabulary.
///
/// `indices` are strictly increasing term ids, `values` the matching weights.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    indices: Vec<u32>,
    values: Vec<f32>,
}

impl SparseVector {
    /// Build from `(index, value)` pairs in any order. Zero weights are dropped
    /// and duplicate indices are summed.
    pub fn from_pairs(mut pairs: Vec<(u32, f32)>) -> Self {
        pairs.sort_unstable_by_key(|&(idx, _)| idx);

        let mut indices: Vec<u32> = Vec::with_capacity(pairs.len());
        let mut values: Vec<f32> = Vec::with_capacity(pairs.len());
        for (idx, value) in pairs {
            if indices.last() == Some(&idx) {
                if let Some(last) = values.last_mut() {
                    *last += value;
                }
            } else {
                indices.push(idx);
                values.push(value);
            }
        }

        let mut v = Self { indices, values };
        v.prune_zeros();
        v
    }

    fn prune_zeros(&mut self) {
        let mut keep = 0;
        for i in 0..self.indices.len() {
            if self.values[i] != 0.0 {
                self.indices[keep] = self.indices[i];
                self.values[keep] = self.values[i];
                keep += 1;
            }
        }
        self.indices.truncate(keep);
        self.values.truncate(keep);
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Number of non-zero entries
    #[inline]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn get(&self, index: u32) -> f32 {
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    #[inline]
    pub fn norm(&self) -> f32 {
        self.values.iter().map(|v| v * v).sum::<f32>().sqrt()
    }

    /// Scale to unit L2 norm. The zero vector is left unchanged.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for v in &mut self.values {
                *v /= norm;
            }
        }
    }

    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// Dot product by merging the two sorted index lists
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0f32;
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    /// Cosine similarity clamped to `[0, 1]`.
    ///
    /// Weights are non-negative so the cosine is never negative; the clamp
    /// only absorbs rounding. Either side being zero yields 0.
    pub fn cosine_similarity(&self, other: &SparseVector) -> f32 {
        let denom = self.norm() * other.norm();
        if denom == 0.0 {
            return 0.0;
        }
        (self.dot(other) / denom).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_sorts_merges_and_prunes() {
        let v = SparseVector::from_pairs(vec![(5, 1.0), (1, 2.0), (5, 0.5), (3, 0.0)]);
        assert_eq!(v.indices(), &[1, 5]);
        assert_eq!(v.values(), &[2.0, 1.5]);
        assert_eq!(v.get(3), 0.0);
        assert_eq!(v.get(5), 1.5);
    }

    #[test]
    fn test_dot_and_norm() {
        let a = SparseVector::from_pairs(vec![(0, 3.0), (2, 4.0)]);
        let b = SparseVector::from_pairs(vec![(2, 1.0), (7, 9.0)]);
        assert_eq!(a.dot(&b), 4.0);
        assert_eq!(a.norm(), 5.0);

        let n = a.normalized();
        assert!((n.norm() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_bounds() {
        let a = SparseVector::from_pairs(vec![(0, 1.0), (1, 2.0)]);
        let b = SparseVector::from_pairs(vec![(4, 1.0)]);
        assert!((a.cosine_similarity(&a) - 1.0).abs() < 1e-6);
        assert_eq!(a.cosine_similarity(&b), 0.0);
        assert_eq!(a.cosine_similarity(&SparseVector::default()), 0.0);
    }
}
