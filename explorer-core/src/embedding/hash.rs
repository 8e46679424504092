//! Placeholder embedding: character codes folded into a fixed-length vector.
//!
//! Position `i mod dimension` accumulates the UTF-16 code unit of the `i`-th
//! character, modulo 1000. The result is deterministic and carries no
//! semantic meaning; it only gives a local server something to index.

use crate::embedding::{EmbeddingError, EmbeddingProvider};

/// Vector length of the placeholder provider.
pub const PLACEHOLDER_DIMENSION: usize = 1536;

const MODULUS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashEmbedding {
    dimension: usize,
}

impl Default for HashEmbedding {
    fn default() -> Self {
        Self {
            dimension: PLACEHOLDER_DIMENSION,
        }
    }
}

impl HashEmbedding {
    pub fn new(dimension: usize) -> Result<Self, EmbeddingError> {
        if dimension == 0 {
            return Err(EmbeddingError::Config(
                "placeholder embedding dimension must be > 0".into(),
            ));
        }
        Ok(Self { dimension })
    }

    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut slots = vec![0u32; self.dimension];
        for (i, unit) in text.encode_utf16().enumerate() {
            let slot = &mut slots[i % self.dimension];
            *slot = (*slot + u32::from(unit)) % MODULUS;
        }
        slots.into_iter().map(|v| v as f32).collect()
    }
}

impl EmbeddingProvider for HashEmbedding {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn generate(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|t| self.embed(t)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_land_in_their_slots() {
        let v = HashEmbedding::default().embed("hi");
        assert_eq!(v.len(), PLACEHOLDER_DIMENSION);
        assert_eq!(v[0], 104.0);
        assert_eq!(v[1], 105.0);
        assert!(v[2..].iter().all(|x| *x == 0.0));
    }

    #[test]
    fn wraps_and_reduces_modulo_1000() {
        let p = HashEmbedding::new(2).unwrap();
        // 'z' = 122: slot 0 gets 122 * 5, slot 1 gets 122 * 4.
        let v = p.embed("zzzzzzzzz");
        assert_eq!(v, vec![(122.0 * 5.0) % 1000.0, (122.0 * 4.0) % 1000.0]);

        let big = p.embed(&"~".repeat(40));
        assert!(big.iter().all(|x| *x < 1000.0));
    }

    #[test]
    fn is_deterministic_and_counts_utf16_units() {
        let p = HashEmbedding::new(4).unwrap();
        assert_eq!(p.embed("same text"), p.embed("same text"));

        // U+1F600 is a surrogate pair: two UTF-16 units fill two slots.
        let v = p.embed("\u{1F600}");
        assert_eq!(v[0], (0xD83Du32 % 1000) as f32);
        assert_eq!(v[1], (0xDE00u32 % 1000) as f32);
    }

    #[tokio::test]
    async fn generate_keeps_input_order() {
        let p = HashEmbedding::new(3).unwrap();
        let out = p
            .generate(&["a".to_string(), "b".to_string()])
            .await
            .unwrap();
        assert_eq!(out, vec![vec![97.0, 0.0, 0.0], vec![98.0, 0.0, 0.0]]);
    }
}
