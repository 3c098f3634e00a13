/// Formats a probability as a percentage, e.g. `to_pct(0.1234, 2) == "12.34%"`.
pub fn to_pct(probability: f64, digits: usize) -> String {
    format!("{:.*}%", digits, probability * 100.0)
}
