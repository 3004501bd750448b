//! Reply renderer (C2): turns a parsed [`RespValue`] into the verbatim text
//! a command-line client prints, matching the original cluster CLI's
//! rendering rules exactly:
//!
//! - nil renders as nothing
//! - an error renders as its message plus a trailing newline
//! - a status/bulk string renders verbatim, with no trailing newline
//! - an integer renders as its decimal text
//! - an array renders as its children joined by `\n`, recursively

use crate::resp::types::RespValue;

/// Renders `value` the way a command-line client would print it.
pub fn render(value: &RespValue) -> String {
    match value {
        RespValue::Null => String::new(),
        RespValue::Error(msg) => format!("{msg}\n"),
        RespValue::SimpleString(s) => s.clone(),
        RespValue::BulkString(b) => String::from_utf8_lossy(b).into_owned(),
        RespValue::Integer(i) => i.to_string(),
        RespValue::Array(items) => items
            .iter()
            .map(render)
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn nil_renders_empty() {
        assert_eq!(render(&RespValue::Null), "");
    }

    #[test]
    fn error_renders_with_trailing_newline() {
        assert_eq!(render(&RespValue::Error("ERR boom".into())), "ERR boom\n");
    }

    #[test]
    fn status_renders_verbatim() {
        assert_eq!(render(&RespValue::SimpleString("OK".into())), "OK");
    }

    #[test]
    fn bulk_string_renders_verbatim() {
        assert_eq!(
            render(&RespValue::BulkString(Bytes::from_static(b"hello"))),
            "hello"
        );
    }

    #[test]
    fn integer_renders_as_decimal() {
        assert_eq!(render(&RespValue::Integer(-42)), "-42");
    }

    #[test]
    fn array_renders_children_joined_by_newline() {
        let v = RespValue::Array(vec![
            RespValue::BulkString(Bytes::from_static(b"a")),
            RespValue::Integer(1),
            RespValue::Null,
        ]);
        assert_eq!(render(&v), "a\n1\n");
    }

    #[test]
    fn nested_array_renders_recursively() {
        let v = RespValue::Array(vec![
            RespValue::Array(vec![RespValue::Integer(1), RespValue::Integer(2)]),
            RespValue::SimpleString("OK".into()),
        ]);
        assert_eq!(render(&v), "1\n2\nOK");
    }
}
