use crate::error::DecodeError;
use crate::value::{Map, Value};

/// Containers deeper than this abort the parse instead of risking a
/// stack overflow on adversarial input.
const MAX_DEPTH: usize = 128;

/// Parse JSON text into a value.
///
/// Single pass, no backtracking; the first malformed token aborts with
/// the 1-based line/column of the offending character. Trailing
/// non-whitespace after the top-level value is an error.
pub fn decode(text: &str) -> Result<Value, DecodeError> {
    let mut d = Decoder { src: text, pos: 0 };
    d.skip_whitespace();
    let value = d.parse_value(0)?;
    d.skip_whitespace();
    if d.pos < d.src.len() {
        return Err(d.error("trailing garbage"));
    }
    Ok(value)
}

struct Decoder<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Decoder<'a> {
    fn bytes(&self) -> &'a [u8] {
        self.src.as_bytes()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes().get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.pos += 1;
        }
    }

    /// Build an error at the current cursor. Line/column are computed
    /// lazily; the hot path never tracks them.
    fn error(&self, message: impl Into<String>) -> DecodeError {
        self.error_at(self.pos, message)
    }

    fn error_at(&self, pos: usize, message: impl Into<String>) -> DecodeError {
        let mut line = 1;
        let mut column = 1;
        for &b in &self.bytes()[..pos.min(self.src.len())] {
            if b == b'\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        DecodeError {
            line,
            column,
            message: message.into(),
        }
    }

    fn parse_value(&mut self, depth: usize) -> Result<Value, DecodeError> {
        if depth > MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some(b'"') => Ok(Value::String(self.parse_string()?)),
            Some(b'[') => self.parse_array(depth),
            Some(b'{') => self.parse_object(depth),
            Some(b'-' | b'0'..=b'9') => self.parse_number(),
            Some(c) if c.is_ascii_alphabetic() => self.parse_literal(),
            Some(c) => Err(self.error(format!("unexpected character '{}'", c as char))),
        }
    }

    fn parse_literal(&mut self) -> Result<Value, DecodeError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphabetic()) {
            self.pos += 1;
        }
        match &self.src[start..self.pos] {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "null" => Ok(Value::Null),
            word => Err(self.error_at(start, format!("invalid literal '{}'", word))),
        }
    }

    fn parse_number(&mut self) -> Result<Value, DecodeError> {
        let start = self.pos;
        while matches!(self.peek(), Some(b'-' | b'+' | b'.' | b'e' | b'E' | b'0'..=b'9')) {
            self.pos += 1;
        }
        let token = &self.src[start..self.pos];
        match token.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Value::Number(n)),
            _ => Err(self.error_at(start, format!("invalid number '{}'", token))),
        }
    }

    fn parse_string(&mut self) -> Result<String, DecodeError> {
        let open = self.pos;
        self.pos += 1; // opening quote
        let mut out = String::new();
        let mut run_start = self.pos;
        loop {
            match self.peek() {
                None => return Err(self.error_at(open, "unterminated string")),
                Some(b'"') => {
                    out.push_str(&self.src[run_start..self.pos]);
                    self.pos += 1;
                    return Ok(out);
                }
                Some(b'\\') => {
                    out.push_str(&self.src[run_start..self.pos]);
                    self.pos += 1;
                    out.push(self.parse_escape()?);
                    run_start = self.pos;
                }
                Some(c) if c < 0x20 => {
                    return Err(self.error("control character in string"));
                }
                // Multi-byte UTF-8 sequences only stop at ASCII bytes
                // above, so runs always end on a char boundary.
                Some(_) => self.pos += 1,
            }
        }
    }

    fn parse_escape(&mut self) -> Result<char, DecodeError> {
        let at = self.pos - 1;
        let c = match self.peek() {
            None => return Err(self.error_at(at, "unterminated string")),
            Some(b'"') => '"',
            Some(b'\\') => '\\',
            Some(b'/') => '/',
            Some(b'b') => '\x08',
            Some(b'f') => '\x0c',
            Some(b'n') => '\n',
            Some(b'r') => '\r',
            Some(b't') => '\t',
            Some(b'u') => {
                self.pos += 1;
                return self.parse_unicode_escape(at);
            }
            Some(c) => {
                return Err(self.error_at(at, format!("invalid escape '\\{}'", c as char)));
            }
        };
        self.pos += 1;
        Ok(c)
    }

    /// Decode `\uXXXX`, combining a high surrogate with a following
    /// `\uXXXX` low surrogate into one code point.
    fn parse_unicode_escape(&mut self, at: usize) -> Result<char, DecodeError> {
        let first = self.parse_hex4(at)? as u32;
        let code = if (0xd800..=0xdbff).contains(&first) {
            if self.peek() != Some(b'\\') || self.bytes().get(self.pos + 1) != Some(&b'u') {
                return Err(self.error_at(at, "invalid unicode escape in string"));
            }
            self.pos += 2;
            let second = self.parse_hex4(at)? as u32;
            if !(0xdc00..=0xdfff).contains(&second) {
                return Err(self.error_at(at, "invalid unicode escape in string"));
            }
            0x10000 + ((first - 0xd800) << 10) + (second - 0xdc00)
        } else {
            first
        };
        char::from_u32(code).ok_or_else(|| self.error_at(at, "invalid unicode escape in string"))
    }

    fn parse_hex4(&mut self, at: usize) -> Result<u16, DecodeError> {
        let end = self.pos + 4;
        if end > self.src.len() || !self.src.is_char_boundary(end) {
            return Err(self.error_at(at, "invalid unicode escape in string"));
        }
        let digits = &self.src[self.pos..end];
        // from_str_radix alone is too lax: it accepts a leading sign
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(self.error_at(at, "invalid unicode escape in string"));
        }
        let n = u16::from_str_radix(digits, 16)
            .map_err(|_| self.error_at(at, "invalid unicode escape in string"))?;
        self.pos = end;
        Ok(n)
    }

    fn parse_array(&mut self, depth: usize) -> Result<Value, DecodeError> {
        self.pos += 1; // '['
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Ok(Value::Array(items));
        }
        loop {
            items.push(self.parse_value(depth + 1)?);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    self.skip_whitespace();
                }
                Some(b']') => {
                    self.pos += 1;
                    return Ok(Value::Array(items));
                }
                _ => return Err(self.error("expected ',' or ']' in array")),
            }
        }
    }

    fn parse_object(&mut self, depth: usize) -> Result<Value, DecodeError> {
        self.pos += 1; // '{'
        let mut map = Map::new();
        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(Value::Object(map));
        }
        loop {
            if self.peek() != Some(b'"') {
                return Err(self.error("expected string for object key"));
            }
            let key = self.parse_string()?;
            self.skip_whitespace();
            if self.peek() != Some(b':') {
                return Err(self.error("expected ':' after object key"));
            }
            self.pos += 1;
            self.skip_whitespace();
            let value = self.parse_value(depth + 1)?;
            map.insert(key, value);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    self.skip_whitespace();
                }
                Some(b'}') => {
                    self.pos += 1;
                    return Ok(Value::Object(map));
                }
                _ => return Err(self.error("expected ',' or '}' in object")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(text: &str) -> Value {
        decode(text).unwrap()
    }

    fn err(text: &str) -> DecodeError {
        decode(text).unwrap_err()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(ok("null"), Value::Null);
        assert_eq!(ok("true"), Value::Bool(true));
        assert_eq!(ok("false"), Value::Bool(false));
        assert_eq!(ok("0"), Value::Number(0.0));
        assert_eq!(ok("-12.5"), Value::Number(-12.5));
        assert_eq!(ok("3e2"), Value::Number(300.0));
        assert_eq!(ok("1.25E-2"), Value::Number(0.0125));
        assert_eq!(ok(r#""hi""#), Value::from("hi"));
    }

    #[test]
    fn test_whitespace_tolerated() {
        assert_eq!(ok("  \t\r\n true \n"), Value::Bool(true));
        assert_eq!(ok("[ 1 , 2 ]"), Value::Array(vec![Value::Number(1.0), Value::Number(2.0)]));
        assert_eq!(ok("{ \"a\" : 1 }").as_object().unwrap().len(), 1);
    }

    #[test]
    fn test_escapes() {
        assert_eq!(ok(r#""a\nb\u0041c""#), Value::from("a\nb\u{41}c"));
        assert_eq!(ok(r#""\"\\\/\b\f\n\r\t""#), Value::from("\"\\/\x08\x0c\n\r\t"));
    }

    #[test]
    fn test_surrogate_pair() {
        assert_eq!(ok(r#""\ud83d\ude00""#), Value::from("\u{1f600}"));
        // Unpaired surrogates are malformed
        assert!(decode(r#""\ud83d""#).is_err());
        assert!(decode(r#""\ud83dA""#).is_err());
        assert!(decode(r#""\udc00""#).is_err());
    }

    #[test]
    fn test_utf8_input() {
        assert_eq!(ok("\"日本語\""), Value::from("日本語"));
    }

    #[test]
    fn test_nested_containers() {
        let v = ok(r#"{"a":[1,{"b":null}],"c":"x"}"#);
        let obj = v.as_object().unwrap();
        let arr = obj["a"].as_array().unwrap();
        assert_eq!(arr[0], Value::Number(1.0));
        assert_eq!(arr[1].as_object().unwrap()["b"], Value::Null);
        assert_eq!(obj["c"], Value::from("x"));
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let v = ok(r#"{"a":1,"a":2}"#);
        assert_eq!(v.as_object().unwrap()["a"], Value::Number(2.0));
    }

    #[test]
    fn test_trailing_garbage() {
        let e = err(r#"{"a":1} garbage"#);
        assert_eq!(e.message, "trailing garbage");
        assert_eq!((e.line, e.column), (1, 9));
    }

    #[test]
    fn test_syntax_errors() {
        assert!(decode("").is_err());
        assert!(decode("tru").is_err());
        assert!(decode("TRUE").is_err());
        assert!(decode("[1,]").is_err());
        assert!(decode("[1 2]").is_err());
        assert!(decode(r#"{"a" 1}"#).is_err());
        assert!(decode(r#"{"a":1,}"#).is_err());
        assert!(decode(r#"{1:2}"#).is_err());
        assert!(decode(r#"{"a":1"#).is_err());
        assert!(decode(r#""unterminated"#).is_err());
        assert!(decode(r#""bad \q escape""#).is_err());
        assert!(decode(r#""bad \u12 escape""#).is_err());
        assert!(decode(r#""\u+041""#).is_err());
        assert!(decode("1e").is_err());
        assert!(decode("1.2.3").is_err());
        assert!(decode("\"raw\ncontrol\"").is_err());
    }

    #[test]
    fn test_error_position() {
        let e = err("{\"a\": tru}\n");
        assert_eq!((e.line, e.column), (1, 7));
        let e = err("[\n  1,\n  x\n]");
        assert_eq!((e.line, e.column), (3, 3));
    }

    #[test]
    fn test_deep_nesting_rejected() {
        let mut text = String::new();
        for _ in 0..10_000 {
            text.push('[');
        }
        let e = err(&text);
        assert_eq!(e.message, "nesting too deep");
    }

    #[test]
    fn test_nesting_within_limit() {
        let depth = 100;
        let mut text = String::new();
        for _ in 0..depth {
            text.push('[');
        }
        text.push('1');
        for _ in 0..depth {
            text.push(']');
        }
        assert!(decode(&text).is_ok());
    }
}
