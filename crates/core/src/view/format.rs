/// Fixed-point text with exactly `digits` decimals.
///
/// Rounds the exact binary value once. Exact ties go away from zero; every
/// other value is already rounded correctly by `format!`.
pub fn fixed(value: f64, digits: u32) -> String {
    if !value.is_finite() {
        return plain_number(value);
    }
    let digits = digits as usize;
    if is_exact_tie(value, digits) {
        // the next double up is past the tie, so rounding lands away from zero
        let above = f64::from_bits(value.abs().to_bits() + 1);
        let sign = if value.is_sign_negative() { "-" } else { "" };
        return format!("{sign}{:.*}", digits, above);
    }
    format!("{:.*}", digits, value)
}

// Wide enough to print any finite f64 without rounding.
const EXACT_PRECISION: usize = 1100;

fn is_exact_tie(value: f64, digits: usize) -> bool {
    let exact = format!("{:.*}", EXACT_PRECISION, value.abs());
    let fraction = match exact.split_once('.') {
        Some((_, f)) => f.trim_end_matches('0'),
        None => return false,
    };
    fraction.len() == digits + 1 && fraction.ends_with('5')
}

/// Shortest form of the number: `3.2`, `120`, `0`.
pub fn plain_number(value: f64) -> String {
    if value == 0.0 {
        // covers -0.0
        return "0".to_owned();
    }
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    format!("{value}")
}
