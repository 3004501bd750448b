use bytes::Bytes;

/// RESP2 wire value.
///
/// Restricted to the variants a sharded key-value cluster actually returns
/// on the wire: RESP3 extensions (doubles, maps, push, verbatim strings,
/// etc.) are out of scope.
#[derive(Debug, Clone, PartialEq)]
pub enum RespValue {
    /// `+OK\r\n`
    SimpleString(String),
    /// `-ERR message\r\n`
    Error(String),
    /// `:1000\r\n`
    Integer(i64),
    /// `$6\r\nfoobar\r\n`
    BulkString(Bytes),
    /// `*2\r\n…`
    Array(Vec<RespValue>),
    /// `$-1\r\n` or `*-1\r\n`
    Null,
}

impl RespValue {
    /// Interprets this value as a UTF-8 string, if possible.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::SimpleString(s) => Some(s),
            Self::BulkString(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    /// Interprets this value as bytes, if possible.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::BulkString(b) => Some(b),
            Self::SimpleString(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    /// Interprets this value as an integer, if possible.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Consumes this value, returning its elements if it is an array.
    pub fn into_array(self) -> Option<Vec<RespValue>> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// True when this value is RESP null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True when this value is an error reply.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// The error message, if this is an error reply.
    pub fn as_error_msg(&self) -> Option<&str> {
        match self {
            Self::Error(msg) => Some(msg),
            _ => None,
        }
    }

    /// Static type name, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::SimpleString(_) => "simple_string",
            Self::Error(_) => "error",
            Self::Integer(_) => "integer",
            Self::BulkString(_) => "bulk_string",
            Self::Array(_) => "array",
            Self::Null => "null",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_str_simple_string() {
        assert_eq!(RespValue::SimpleString("OK".into()).as_str(), Some("OK"));
    }

    #[test]
    fn as_str_bulk_string_utf8() {
        let v = RespValue::BulkString(Bytes::from_static(b"hello"));
        assert_eq!(v.as_str(), Some("hello"));
    }

    #[test]
    fn as_str_bulk_string_non_utf8() {
        let v = RespValue::BulkString(Bytes::from_static(&[0xff, 0xfe]));
        assert_eq!(v.as_str(), None);
    }

    #[test]
    fn as_bytes_bulk_string() {
        let v = RespValue::BulkString(Bytes::from_static(&[1, 2, 3]));
        assert_eq!(v.as_bytes(), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn as_int_integer() {
        assert_eq!(RespValue::Integer(42).as_int(), Some(42));
        assert_eq!(RespValue::Integer(-1).as_int(), Some(-1));
    }

    #[test]
    fn as_int_other_is_none() {
        assert_eq!(RespValue::SimpleString("42".into()).as_int(), None);
    }

    #[test]
    fn into_array_roundtrips_elements() {
        let v = RespValue::Array(vec![RespValue::Integer(1), RespValue::Integer(2)]);
        assert_eq!(v.into_array().unwrap().len(), 2);
    }

    #[test]
    fn is_null_only_for_null() {
        assert!(RespValue::Null.is_null());
        assert!(!RespValue::Integer(0).is_null());
    }

    #[test]
    fn is_error_and_message() {
        let v = RespValue::Error("ERR boom".into());
        assert!(v.is_error());
        assert_eq!(v.as_error_msg(), Some("ERR boom"));
        assert!(!RespValue::Integer(0).is_error());
    }

    #[test]
    fn type_name_all_variants() {
        assert_eq!(RespValue::SimpleString("".into()).type_name(), "simple_string");
        assert_eq!(RespValue::Error("".into()).type_name(), "error");
        assert_eq!(RespValue::Integer(0).type_name(), "integer");
        assert_eq!(RespValue::BulkString(Bytes::new()).type_name(), "bulk_string");
        assert_eq!(RespValue::Array(vec![]).type_name(), "array");
        assert_eq!(RespValue::Null.type_name(), "null");
    }
}
