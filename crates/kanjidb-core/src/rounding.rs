//! Decimal rounding performed on the printed digits of a number rather than
//! on its binary value, so `19.995` rounds to `20` instead of `19.99`.

use crate::error::{Error, Result};

/// Rounds `value` half-up to `decimal_places` and strips trailing zeros.
pub fn round(value: f64, decimal_places: u32) -> Result<String> {
    if !value.is_finite() {
        return Err(Error::RoundingOverflow(value.to_string()));
    }
    round_str(&value.to_string(), decimal_places)
}

/// Same as [`round`] for a number already in decimal string form.
///
/// Fails with `RoundingOverflow` on exponent notation (`9.99e+37`).
pub fn round_str(num: &str, decimal_places: u32) -> Result<String> {
    if num.contains(['e', 'E']) {
        return Err(Error::RoundingOverflow(num.to_string()));
    }
    if let Some(magnitude) = num.strip_prefix('-') {
        let rounded = round_str(magnitude, decimal_places)?;
        if rounded.bytes().all(|b| b == b'0') {
            return Ok(rounded);
        }
        return Ok(format!("-{rounded}"));
    }

    let (int_part, frac_part) = num.split_once('.').unwrap_or((num, ""));
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty()) || !is_digits(int_part) || !is_digits(frac_part) {
        return Err(Error::InvalidNumber(num.to_string()));
    }

    let places = decimal_places as usize;
    let mut int_digits: Vec<u8> = if int_part.is_empty() {
        vec![b'0']
    } else {
        int_part.bytes().collect()
    };
    let mut frac_digits: Vec<u8> = frac_part.bytes().take(places).collect();

    let round_up = frac_part.as_bytes().get(places).is_some_and(|d| *d >= b'5');
    if round_up && increment(&mut frac_digits) && increment(&mut int_digits) {
        int_digits.insert(0, b'1');
    }

    while frac_digits.last() == Some(&b'0') {
        frac_digits.pop();
    }

    let mut out: String = int_digits.iter().map(|&b| char::from(b)).collect();
    if !frac_digits.is_empty() {
        out.push('.');
        out.extend(frac_digits.iter().map(|&b| char::from(b)));
    }
    Ok(out)
}

// Adds one to the last digit; true when the carry runs off the front.
fn increment(digits: &mut [u8]) -> bool {
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return false;
        }
    }
    true
}
