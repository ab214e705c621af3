use super::error::EmbeddingError;

/// Text-to-vector capability consumed by the scorer.
///
/// Implementations return one unit-normalized vector per input string, in input order.
/// `encode` is blocking; async callers run it through `tokio::task::spawn_blocking`.
pub trait EmbeddingProvider: Send + Sync {
    /// Encodes a batch of texts.
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Length of every vector returned by [`encode`](Self::encode).
    fn embedding_dim(&self) -> usize;

    /// Short backend identifier for logs and health output.
    fn name(&self) -> &str;
}

/// Raw dot product over the shared prefix of two vectors.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Cosine of two unit vectors, clamped to `[-1, 1]` and rescaled to `[0, 1]`.
pub fn normalized_similarity(a: &[f32], b: &[f32]) -> f32 {
    rescale_similarity(dot(a, b))
}

/// Clamps a raw similarity to `[-1, 1]` and maps it onto `[0, 1]`.
///
/// NaN maps to `0.5` (the rescaled midpoint) so drift never escapes the unit interval.
pub fn rescale_similarity(raw: f32) -> f32 {
    if raw.is_nan() {
        return 0.5;
    }
    (raw.clamp(-1.0, 1.0) + 1.0) / 2.0
}

/// Scales `v` in place to unit length (zero vectors are left unchanged).
pub fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}
