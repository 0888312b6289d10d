//! # Diagnostic Rendering
//!
//! Formats failure messages as `<text>: <arg0>, <arg1>, ...`.
//!
//! ## Rendering Rules
//!
//! 1. Position 1 is the offending value by convention and is **always**
//!    rendered as a JSON literal, so the string `"null"` prints with quotes and
//!    the null value prints bare.
//! 2. Scalars in any other position (strings, numbers, booleans) are rendered
//!    raw: a path prints as `.a.b`, not `".a.b"`.
//! 3. Containers in any position are rendered as JSON literals.
//! 4. A message with no arguments is the text alone.

use serde_json::Value;

/// Render a value as a compact JSON literal.
pub fn render_literal(value: &Value) -> String {
    // `Display` for `Value` is compact JSON and cannot fail.
    value.to_string()
}

/// Render one argument according to its position.
pub fn render_argument(position: usize, arg: &Value) -> String {
    if position == 1 {
        return render_literal(arg);
    }
    match arg {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => render_literal(other),
    }
}

/// Join a kind's text with its rendered arguments.
pub fn render_message(text: &str, args: &[Value]) -> String {
    if args.is_empty() {
        return text.to_string();
    }
    let rendered: Vec<String> = args
        .iter()
        .enumerate()
        .map(|(i, arg)| render_argument(i, arg))
        .collect();
    format!("{text}: {}", rendered.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_arguments() {
        assert_eq!(render_message("schema is invalid", &[]), "schema is invalid");
    }

    #[test]
    fn test_path_is_raw_value_is_literal() {
        let msg = render_message(
            "value type is wrong",
            &[json!(".id"), json!("123"), json!("int")],
        );
        assert_eq!(msg, r#"value type is wrong: .id, "123", int"#);
    }

    #[test]
    fn test_null_and_string_null_are_distinct() {
        let a = render_message("x", &[json!(""), json!(null)]);
        let b = render_message("x", &[json!(""), json!("null")]);
        assert_eq!(a, "x: , null");
        assert_eq!(b, r#"x: , "null""#);
        assert_ne!(a, b);
    }

    #[test]
    fn test_float_keeps_fraction() {
        assert_eq!(render_literal(&json!(5.0)), "5.0");
        assert_eq!(render_literal(&json!(5)), "5");
    }

    #[test]
    fn test_containers_render_as_json() {
        let msg = render_message(
            "value is not among the enum list",
            &[json!(".type"), json!("fax"), json!(["mobile", "email"])],
        );
        assert_eq!(
            msg,
            r#"value is not among the enum list: .type, "fax", ["mobile","email"]"#
        );
    }

    #[test]
    fn test_float_literal_parses_back_exactly() {
        let value = json!(-379723458.40814877);
        let rendered = render_literal(&value);
        assert_eq!(rendered, "-379723458.40814877");
        let parsed: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed.as_f64(), value.as_f64());
    }

    #[test]
    fn test_scalar_extras_are_raw() {
        assert_eq!(render_argument(2, &json!(true)), "true");
        assert_eq!(render_argument(3, &json!(42)), "42");
        assert_eq!(render_argument(1, &json!(true)), "true");
        assert_eq!(render_argument(1, &json!("s")), "\"s\"");
    }
}
