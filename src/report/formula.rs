//! Formula rendering.
//!
//! Terms are printed from the highest power down, zero coefficients are skipped,
//! and signs become the joiners between terms:
//!
//! ```text
//! plain: f(x) = 0.1785 * x^2 - 0.1925 * x + 0.8505
//! latex: f(x) = 0.18x^{2} - 0.19x + 0.85
//! ```
//!
//! Coefficients use "significant digits" formatting: fixed notation while the
//! decimal exponent is in `[-6, precision)`, exponential (`3.84e-9`) outside it.

use crate::domain::FormulaStyle;

const MAX_PRECISION: usize = 100;

/// Enough fractional digits to print any finite `f64` exactly in exponential form.
const EXACT_DIGITS: usize = 800;

/// Render `f(x) = ...` for index-aligned powers and coefficients.
pub fn format_formula(
    powers: &[u32],
    coefficients: &[f64],
    precision: Option<usize>,
    style: FormulaStyle,
) -> String {
    let (times, sup_open, sup_close) = match style {
        FormulaStyle::Plain => (" * ", "^", ""),
        FormulaStyle::Latex => ("", "^{", "}"),
    };

    let mut order: Vec<usize> = (0..powers.len().min(coefficients.len())).collect();
    order.sort_by(|&a, &b| powers[b].cmp(&powers[a]));

    let mut body = String::new();
    for k in order {
        let c = coefficients[k];
        if c == 0.0 {
            continue;
        }

        let negative = c < 0.0;
        if body.is_empty() {
            if negative {
                body.push_str("- ");
            }
        } else {
            body.push_str(if negative { " - " } else { " + " });
        }

        let coef = format_number(c.abs(), precision);
        match powers[k] {
            0 => body.push_str(&coef),
            1 => body.push_str(&format!("{coef}{times}x")),
            p => body.push_str(&format!("{coef}{times}x{sup_open}{p}{sup_close}")),
        }
    }

    if body.is_empty() {
        body.push('0');
    }
    format!("f(x) = {body}")
}

/// Format with `precision` significant digits, or the shortest exact form when `None`.
pub fn format_number(value: f64, precision: Option<usize>) -> String {
    match precision {
        Some(p) => to_precision(value, p),
        None => shortest(value),
    }
}

/// Format `value` with `digits` significant digits (clamped to `1..=100`).
///
/// Trailing zeros are kept (`0.00000130`); exponential notation is used when the
/// decimal exponent is below `-6` or at least `digits`. Ties round away from
/// zero (`2.5` -> `3`, `0.125` -> `0.13`).
pub fn to_precision(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return non_finite(value);
    }
    let p = digits.clamp(1, MAX_PRECISION);
    if value == 0.0 {
        return if p == 1 {
            "0".to_string()
        } else {
            format!("0.{}", "0".repeat(p - 1))
        };
    }

    let (digits, exp) = round_significant(value.abs(), p);
    let sign = if value < 0.0 { "-" } else { "" };

    let body = if exp < -6 || exp >= p as i32 {
        let (head, tail) = digits.split_at(1);
        if tail.is_empty() {
            join_exponent(head, exp)
        } else {
            join_exponent(&format!("{head}.{tail}"), exp)
        }
    } else if exp >= 0 {
        let (int, frac) = digits.split_at(exp as usize + 1);
        if frac.is_empty() {
            int.to_string()
        } else {
            format!("{int}.{frac}")
        }
    } else {
        format!("0.{}{digits}", "0".repeat(exp.unsigned_abs() as usize - 1))
    };
    format!("{sign}{body}")
}

/// The first `p` significant digits of a positive finite `value`, rounded half
/// away from zero, with the decimal exponent of the leading digit.
fn round_significant(value: f64, p: usize) -> (String, i32) {
    // Every finite f64 has a terminating decimal expansion of at most 767
    // significant digits, so this prints it exactly.
    let exact = format!("{:.*e}", EXACT_DIGITS, value);
    let (mantissa, mut exp) = split_exponent(&exact).unwrap_or((exact.as_str(), 0));

    let mut kept: Vec<u8> = mantissa.bytes().filter(u8::is_ascii_digit).collect();
    let round_up = kept.get(p).is_some_and(|&d| d >= b'5');
    kept.truncate(p);

    if round_up {
        let mut carry = true;
        for d in kept.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            // 9.99 -> 10.0: the digits become 1 followed by zeros.
            kept.insert(0, b'1');
            kept.truncate(p);
            exp += 1;
        }
    }

    (kept.into_iter().map(char::from).collect(), exp)
}

/// Shortest round-trip representation, switching to exponential notation for
/// exponents below `-6` or from `21` up.
fn shortest(value: f64) -> String {
    if !value.is_finite() {
        return non_finite(value);
    }
    let sci = format!("{value:e}");
    match split_exponent(&sci) {
        Some((mantissa, exp)) if exp < -6 || exp >= 21 => join_exponent(mantissa, exp),
        _ => format!("{value}"),
    }
}

fn split_exponent(sci: &str) -> Option<(&str, i32)> {
    let (mantissa, exp) = sci.split_once('e')?;
    Some((mantissa, exp.parse().ok()?))
}

fn join_exponent(mantissa: &str, exp: i32) -> String {
    if exp < 0 {
        format!("{mantissa}e-{}", exp.unsigned_abs())
    } else {
        format!("{mantissa}e+{exp}")
    }
}

fn non_finite(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value > 0.0 {
        "Infinity".to_string()
    } else {
        "-Infinity".to_string()
    }
}
