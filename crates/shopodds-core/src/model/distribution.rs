use serde::Serialize;

/// Tolerance used when checking that probabilities sum to one.
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// Probability mass over "copies obtained", indexed `0..=max_outcome`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    probabilities: Vec<f64>,
}

impl Distribution {
    /// All mass on a single outcome.
    pub fn point_mass(outcome: usize) -> Self {
        let mut probabilities = vec![0.0; outcome + 1];
        probabilities[outcome] = 1.0;
        Self { probabilities }
    }

    /// All mass on "nothing obtained".
    pub fn degenerate() -> Self {
        Self::point_mass(0)
    }

    /// Builds a distribution from non-negative weights, rescaling them to sum
    /// to one. Weights with no usable mass collapse to [`Distribution::degenerate`].
    pub fn from_weights(weights: Vec<f64>) -> Self {
        let total: f64 = weights.iter().filter(|w| w.is_finite() && **w > 0.0).sum();
        if weights.is_empty() || total <= 0.0 || !total.is_finite() {
            return Self::degenerate();
        }
        let probabilities = weights
            .into_iter()
            .map(|w| if w.is_finite() && w > 0.0 { w / total } else { 0.0 })
            .collect();
        Self { probabilities }
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    pub fn max_outcome(&self) -> usize {
        self.probabilities.len().saturating_sub(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.probabilities.iter().copied().enumerate()
    }

    /// Probability of exactly `k` copies; zero past the support.
    pub fn exactly(&self, k: usize) -> f64 {
        self.probabilities.get(k).copied().unwrap_or(0.0)
    }

    /// Probability of `k` or more copies, clamped to `[0, 1]`.
    pub fn at_least(&self, k: usize) -> f64 {
        let tail: f64 = self.probabilities.iter().skip(k).sum();
        tail.clamp(0.0, 1.0)
    }

    pub fn total(&self) -> f64 {
        self.probabilities.iter().sum()
    }

    /// Expected number of copies.
    pub fn mean(&self) -> f64 {
        self.iter().map(|(k, p)| k as f64 * p).sum()
    }

    pub fn is_normalized(&self) -> bool {
        self.probabilities.iter().all(|p| *p >= 0.0)
            && (self.total() - 1.0).abs() <= PROBABILITY_TOLERANCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_are_rescaled() {
        let dist = Distribution::from_weights(vec![1.0, 1.0, 2.0]);
        assert!(dist.is_normalized());
        assert!((dist.exactly(2) - 0.5).abs() < 1e-12);
        assert_eq!(dist.max_outcome(), 2);
    }

    #[test]
    fn zero_mass_collapses_to_nothing_obtained() {
        let dist = Distribution::from_weights(vec![0.0, 0.0]);
        assert_eq!(dist, Distribution::degenerate());

        let nan = Distribution::from_weights(vec![f64::NAN]);
        assert_eq!(nan.exactly(0), 1.0);

        let empty = Distribution::from_weights(Vec::new());
        assert_eq!(empty.exactly(0), 1.0);
    }

    #[test]
    fn tail_queries_are_monotone_and_clamped() {
        let dist = Distribution::from_weights(vec![0.2, 0.3, 0.4, 0.1]);
        let tails: Vec<f64> = (0..6).map(|k| dist.at_least(k)).collect();
        for pair in tails.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
        assert!(tails[0] <= 1.0);
        assert_eq!(dist.at_least(4), 0.0);
        assert_eq!(dist.exactly(9), 0.0);
    }

    #[test]
    fn mean_weights_outcomes() {
        let dist = Distribution::from_weights(vec![0.5, 0.0, 0.5]);
        assert!((dist.mean() - 1.0).abs() < 1e-12);
    }
}
