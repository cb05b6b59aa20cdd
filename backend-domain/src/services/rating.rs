// Rating aggregation
// The collector's running average is recomputed from the full review
// aggregate at write time and persisted, never defaulted on read

pub fn average_rating(ratings: &[f64]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: f64 = ratings.iter().sum();
    let mean = sum / ratings.len() as f64;
    // Two decimal places, matching what the profile surface displays.
    (mean * 100.0).round() / 100.0
}
