use crate::error::EncodeError;
use crate::value::Value;

/// Serialize a value to JSON text.
///
/// Fails on NaN/infinity; every other value is representable. Object
/// keys come out sorted (BTreeMap iteration order).
pub fn encode(value: &Value) -> Result<String, EncodeError> {
    let mut out = String::new();
    write_value(&mut out, value)?;
    Ok(out)
}

fn write_value(out: &mut String, value: &Value) -> Result<(), EncodeError> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => {
            if !n.is_finite() {
                return Err(EncodeError::NonFiniteNumber);
            }
            out.push_str(&format_number(*n));
        }
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item)?;
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(out, key);
                out.push(':');
                write_value(out, item)?;
            }
            out.push('}');
        }
    }
    Ok(())
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\x08' => out.push_str("\\b"),
            '\x0c' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\x7f' => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            // Non-ASCII passes through as UTF-8
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Format a finite f64 like C's "%.14g": at most 14 significant digits,
/// trailing zeros trimmed, exponent notation outside the fixed range.
fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    // Integral values short enough to print exactly skip the %g path.
    if n.fract() == 0.0 && n.abs() < 1e14 {
        return format!("{}", n as i64);
    }
    let exp = n.abs().log10().floor() as i32;
    if (-4..14).contains(&exp) {
        let decimals = (13 - exp).max(0) as usize;
        trim_fraction(format!("{:.*}", decimals, n))
    } else {
        trim_exponent(format!("{:.13e}", n))
    }
}

/// Drop trailing fraction zeros ("1.50000" -> "1.5", "2.0000" -> "2").
fn trim_fraction(mut s: String) -> String {
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    s
}

/// Trim mantissa zeros in "d.ddddde±xx" notation.
fn trim_exponent(s: String) -> String {
    let Some(e) = s.find(['e', 'E']) else {
        return s;
    };
    let mantissa = trim_fraction(s[..e].to_string());
    format!("{}{}", mantissa, &s[e..])
}
