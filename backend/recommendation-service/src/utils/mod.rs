// Utility functions for recommendation-service

use ndarray::ArrayView1;

/// Z-score normalize a column of values over the current catalog.
/// A zero-variance column maps to all zeros.
pub fn z_scores(values: &[f32]) -> Vec<f32> {
    if values.is_empty() {
        return Vec::new();
    }

    let n = values.len() as f32;
    let mean = values.iter().sum::<f32>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n;
    let std = variance.sqrt();

    if std < f32::EPSILON {
        return vec![0.0; values.len()];
    }

    values.iter().map(|v| (v - mean) / std).collect()
}

/// Cosine similarity in [-1, 1]; zero vectors yield 0.0
pub fn cosine_similarity(a: ArrayView1<f32>, b: ArrayView1<f32>) -> f32 {
    let dot = a.dot(&b);
    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();

    if norm_a < f32::EPSILON || norm_b < f32::EPSILON {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Uppercase the first character, used for synthesized outfit names
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Round to two decimal places for response payloads
pub fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

/// Round to four decimal places, used for generated pseudo-scores
pub fn round4(value: f32) -> f32 {
    (value * 10000.0).round() / 10000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_z_scores() {
        let scores = z_scores(&[1.0, 2.0, 3.0]);
        assert!((scores[1] - 0.0).abs() < 0.001);
        assert!(scores[0] < 0.0 && scores[2] > 0.0);

        // 零方差列全部歸零
        let flat = z_scores(&[5.0, 5.0, 5.0]);
        assert!(flat.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_cosine_similarity() {
        let a = array![1.0f32, 0.0];
        let b = array![1.0f32, 0.0];
        let c = array![0.0f32, 1.0];
        let zero = array![0.0f32, 0.0];

        assert!((cosine_similarity(a.view(), b.view()) - 1.0).abs() < 0.001);
        assert!((cosine_similarity(a.view(), c.view())).abs() < 0.001);
        assert_eq!(cosine_similarity(a.view(), zero.view()), 0.0);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("casual"), "Casual");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.006), 1.01);
        assert_eq!(round2(-0.204), -0.2);
    }
}
