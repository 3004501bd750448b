//! RESP2 parser.
//!
//! [`parse`] takes a byte buffer and returns `Ok((value, bytes_consumed))`
//! or `Err(ParseError::Incomplete)` when more data is needed, or
//! `Err(ParseError::Protocol(..))` on malformed input. Uses [`bytes::Bytes`]
//! so bulk strings are extracted with zero-copy `slice()`.

use crate::resp::types::RespValue;
use bytes::Bytes;
use memchr::memchr;

/// Parser-local failure mode, kept separate from [`crate::error::ClusterError`]
/// because `Incomplete` is control flow (read more, retry), not a hard error.
#[derive(Debug)]
pub enum ParseError {
    Incomplete,
    Protocol(String),
}

pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Parses one RESP value from the front of `buf`, returning the value and
/// the number of bytes it consumed.
pub fn parse(buf: &Bytes) -> ParseResult<(RespValue, usize)> {
    if buf.is_empty() {
        return Err(ParseError::Incomplete);
    }
    match buf[0] {
        b'+' => parse_simple_string(buf),
        b'-' => parse_simple_error(buf),
        b':' => parse_integer(buf),
        b'$' => parse_bulk_string(buf),
        b'*' => parse_array(buf),
        other => Err(ParseError::Protocol(format!("unknown RESP type byte: 0x{other:02x}"))),
    }
}

/// Convenience wrapper over [`parse`] for callers that only have a slice.
pub fn parse_slice(buf: &[u8]) -> ParseResult<(RespValue, usize)> {
    parse(&Bytes::copy_from_slice(buf))
}

/// Computes the byte length of one complete RESP frame at the front of
/// `buf` without materializing a [`RespValue`]. Used to find a frame
/// boundary before deciding whether to read more from the socket.
pub fn resp_frame_len(buf: &[u8]) -> ParseResult<usize> {
    if buf.is_empty() {
        return Err(ParseError::Incomplete);
    }
    match buf[0] {
        b'+' | b'-' | b':' => {
            let (_, next) = read_line(buf, 1)?;
            Ok(next)
        }
        b'$' => {
            let (line, next) = read_line(buf, 1)?;
            let len = parse_int_from_bytes(line)?;
            if len < 0 {
                return Ok(next);
            }
            let total = next + len as usize + 2;
            if buf.len() < total {
                return Err(ParseError::Incomplete);
            }
            Ok(total)
        }
        b'*' => {
            let (line, mut next) = read_line(buf, 1)?;
            let count = parse_int_from_bytes(line)?;
            if count < 0 {
                return Ok(next);
            }
            for _ in 0..count {
                next += resp_frame_len(&buf[next..])?;
            }
            Ok(next)
        }
        other => Err(ParseError::Protocol(format!("unknown RESP type byte: 0x{other:02x}"))),
    }
}

#[inline]
fn find_crlf(buf: &[u8], offset: usize) -> ParseResult<usize> {
    let search = &buf[offset..];
    match memchr(b'\r', search) {
        Some(pos) => {
            let abs = offset + pos;
            if abs + 1 < buf.len() && buf[abs + 1] == b'\n' {
                Ok(abs)
            } else if abs + 1 >= buf.len() {
                Err(ParseError::Incomplete)
            } else {
                Err(ParseError::Protocol("expected \\n after \\r".into()))
            }
        }
        None => Err(ParseError::Incomplete),
    }
}

#[inline]
fn read_line(buf: &[u8], offset: usize) -> ParseResult<(&[u8], usize)> {
    let cr = find_crlf(buf, offset)?;
    Ok((&buf[offset..cr], cr + 2))
}

fn parse_int_from_bytes(bytes: &[u8]) -> ParseResult<i64> {
    if bytes.is_empty() {
        return Err(ParseError::Protocol("empty integer".into()));
    }
    let (negative, digits) = match bytes[0] {
        b'-' => (true, &bytes[1..]),
        b'+' => (false, &bytes[1..]),
        _ => (false, bytes),
    };
    if digits.is_empty() {
        return Err(ParseError::Protocol("integer has no digits".into()));
    }

    // Accumulate as negative so i64::MIN round-trips without overflowing.
    let mut n: i64 = 0;
    for &b in digits {
        if !b.is_ascii_digit() {
            return Err(ParseError::Protocol(format!("invalid byte in integer: 0x{b:02x}")));
        }
        n = n
            .checked_mul(10)
            .and_then(|n| n.checked_sub((b - b'0') as i64))
            .ok_or_else(|| ParseError::Protocol("integer overflow".into()))?;
    }
    Ok(if negative { n } else { -n })
}

fn parse_simple_string(buf: &Bytes) -> ParseResult<(RespValue, usize)> {
    let (line, next) = read_line(buf, 1)?;
    let s = match line {
        b"OK" => "OK".to_string(),
        b"PONG" => "PONG".to_string(),
        _ => std::str::from_utf8(line)
            .map_err(|e| ParseError::Protocol(format!("invalid UTF-8 in simple string: {e}")))?
            .to_string(),
    };
    Ok((RespValue::SimpleString(s), next))
}

fn parse_simple_error(buf: &Bytes) -> ParseResult<(RespValue, usize)> {
    let (line, next) = read_line(buf, 1)?;
    let s = std::str::from_utf8(line)
        .map_err(|e| ParseError::Protocol(format!("invalid UTF-8 in error: {e}")))?
        .to_string();
    Ok((RespValue::Error(s), next))
}

fn parse_integer(buf: &Bytes) -> ParseResult<(RespValue, usize)> {
    let (line, next) = read_line(buf, 1)?;
    Ok((RespValue::Integer(parse_int_from_bytes(line)?), next))
}

fn parse_bulk_string(buf: &Bytes) -> ParseResult<(RespValue, usize)> {
    let (line, next) = read_line(buf, 1)?;
    let len = parse_int_from_bytes(line)?;
    if len < 0 {
        return Ok((RespValue::Null, next));
    }
    let len = len as usize;
    let data_end = next + len;
    if buf.len() < data_end + 2 {
        return Err(ParseError::Incomplete);
    }
    if buf[data_end] != b'\r' || buf[data_end + 1] != b'\n' {
        return Err(ParseError::Protocol("bulk string not terminated by \\r\\n".into()));
    }
    Ok((RespValue::BulkString(buf.slice(next..data_end)), data_end + 2))
}

fn parse_array(buf: &Bytes) -> ParseResult<(RespValue, usize)> {
    let (line, mut next) = read_line(buf, 1)?;
    let count = parse_int_from_bytes(line)?;
    if count < 0 {
        return Ok((RespValue::Null, next));
    }
    let count = count as usize;
    let mut elements = Vec::with_capacity(count);
    for _ in 0..count {
        let (val, consumed) = parse(&buf.slice(next..))?;
        elements.push(val);
        next += consumed;
    }
    Ok((RespValue::Array(elements), next))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_string() {
        let (v, n) = parse_slice(b"+OK\r\n").unwrap();
        assert_eq!(v, RespValue::SimpleString("OK".into()));
        assert_eq!(n, 5);
    }

    #[test]
    fn parses_error() {
        let (v, _) = parse_slice(b"-ERR boom\r\n").unwrap();
        assert_eq!(v, RespValue::Error("ERR boom".into()));
    }

    #[test]
    fn parses_integer() {
        let (v, _) = parse_slice(b":1000\r\n").unwrap();
        assert_eq!(v, RespValue::Integer(1000));
    }

    #[test]
    fn parses_negative_integer() {
        let (v, _) = parse_slice(b":-1\r\n").unwrap();
        assert_eq!(v, RespValue::Integer(-1));
    }

    #[test]
    fn parses_bulk_string() {
        let (v, n) = parse_slice(b"$6\r\nfoobar\r\n").unwrap();
        assert_eq!(v, RespValue::BulkString(Bytes::from_static(b"foobar")));
        assert_eq!(n, 12);
    }

    #[test]
    fn parses_null_bulk_string() {
        let (v, _) = parse_slice(b"$-1\r\n").unwrap();
        assert_eq!(v, RespValue::Null);
    }

    #[test]
    fn parses_null_array() {
        let (v, _) = parse_slice(b"*-1\r\n").unwrap();
        assert_eq!(v, RespValue::Null);
    }

    #[test]
    fn parses_nested_array() {
        let (v, n) = parse_slice(b"*2\r\n$3\r\nfoo\r\n:7\r\n").unwrap();
        assert_eq!(
            v,
            RespValue::Array(vec![
                RespValue::BulkString(Bytes::from_static(b"foo")),
                RespValue::Integer(7),
            ])
        );
        assert_eq!(n, 19);
    }

    #[test]
    fn incomplete_buffer_requests_more_data() {
        assert!(matches!(parse_slice(b"$6\r\nfoo"), Err(ParseError::Incomplete)));
        assert!(matches!(parse_slice(b"*2\r\n:1\r\n"), Err(ParseError::Incomplete)));
        assert!(matches!(parse_slice(b""), Err(ParseError::Incomplete)));
    }

    #[test]
    fn unknown_type_byte_is_protocol_error() {
        assert!(matches!(parse_slice(b"^nope\r\n"), Err(ParseError::Protocol(_))));
    }

    #[test]
    fn resp_frame_len_matches_consumed_bytes() {
        let wire = b"*2\r\n$3\r\nfoo\r\n:7\r\n";
        let (_, consumed) = parse_slice(wire).unwrap();
        assert_eq!(resp_frame_len(wire).unwrap(), consumed);
    }
}
