//! Message template rendering.
//!
//! Templates use named placeholders: `{Name}`, `{Name:l}` (literal string) and
//! `{Name:0.00}` (fixed decimals for numbers). `{{` and `}}` escape braces.
//! Placeholders with no matching property are written back verbatim.

use serde_json::Value;

/// Render `template` against an ordered list of named properties.
pub fn render(template: &str, properties: &[(&str, Value)]) -> String {
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") {
            out.push('{');
            rest = &tail[2..];
            continue;
        }
        if tail.starts_with("}}") {
            out.push('}');
            rest = &tail[2..];
            continue;
        }
        if tail.starts_with('}') {
            out.push('}');
            rest = &tail[1..];
            continue;
        }

        let Some(close) = tail.find('}') else {
            out.push_str(tail);
            return out;
        };

        let token = &tail[1..close];
        let (name, format) = match token.split_once(':') {
            Some((name, format)) => (name, Some(format)),
            None => (token, None),
        };

        match properties.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(&format_value(value, format)),
            None => out.push_str(&tail[..=close]),
        }
        rest = &tail[close + 1..];
    }

    out.push_str(rest);
    out
}

fn format_value(value: &Value, format: Option<&str>) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match (format.and_then(fixed_decimals), n.as_f64()) {
            (Some(decimals), Some(f)) => format!("{:.*}", decimals, f),
            _ => n.to_string(),
        },
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Number of decimals for a `0.00`-style numeric format, if it is one.
fn fixed_decimals(format: &str) -> Option<usize> {
    let (whole, fraction) = format.split_once('.').unwrap_or((format, ""));
    let is_digit_mask = |s: &str| s.chars().all(|c| c == '0' || c == '#');
    if whole.is_empty() || !is_digit_mask(whole) || !is_digit_mask(fraction) {
        return None;
    }
    Some(fraction.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_substitutes_named_properties() {
        let rendered = render(
            "{Method} {Parameters} {Message}",
            &[
                ("Method", json!("get_user")),
                ("Parameters", json!("id=7")),
                ("Message", json!("called")),
            ],
        );
        assert_eq!(rendered, "get_user id=7 called");
    }

    #[test]
    fn test_literal_and_decimal_formats() {
        let rendered = render(
            "{AuthId:l} HTTP {RequestMethod:l} responded {StatusCode} in {Elapsed:0.00} ms",
            &[
                ("AuthId", json!("abcdefgh")),
                ("RequestMethod", json!("GET")),
                ("StatusCode", json!(200)),
                ("Elapsed", json!(12.3456)),
            ],
        );
        assert_eq!(rendered, "abcdefgh HTTP GET responded 200 in 12.35 ms");
    }

    #[test]
    fn test_unknown_placeholder_left_verbatim() {
        let rendered = render("{Known} {Unknown:l}", &[("Known", json!("x"))]);
        assert_eq!(rendered, "x {Unknown:l}");
    }

    #[test]
    fn test_escaped_braces_and_unterminated() {
        assert_eq!(render("{{literal}} {Open", &[]), "{literal} {Open");
    }
}
