//! Containment and the binomial ANI estimator.

/// Fraction of the reference sketch found in the other sketch. An empty
/// intersection is 0 even when the reference sketch is empty.
pub fn containment(intersection: usize, set_size: usize) -> f64 {
    if intersection == 0 {
        return 0.0;
    }
    intersection as f64 / set_size as f64
}

/// ANI estimate: the m-th root of containment, where `informative` is the
/// number of nucleotide positions the seed actually reads.
pub fn binomial_estimator(containment: f64, informative: usize) -> f64 {
    if containment <= 0.0 {
        return 0.0;
    }
    containment.powf(1.0 / informative as f64)
}
