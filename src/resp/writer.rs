//! RESP command serializer: encodes argument lists as a RESP array of bulk
//! strings (`*<N>\r\n$<len>\r\narg1\r\n…`).

use itoa::Buffer;

/// Encodes a command's arguments as a binary-safe RESP bulk-string array.
pub fn encode_command(args: &[&[u8]]) -> Vec<u8> {
    let mut cap = 1 + 10 + 2;
    for arg in args {
        cap += 1 + 10 + 2 + arg.len() + 2;
    }

    let mut buf = Vec::with_capacity(cap);
    let mut itoa_buf = Buffer::new();

    buf.push(b'*');
    buf.extend_from_slice(itoa_buf.format(args.len()).as_bytes());
    buf.extend_from_slice(b"\r\n");

    for arg in args {
        buf.push(b'$');
        buf.extend_from_slice(itoa_buf.format(arg.len()).as_bytes());
        buf.extend_from_slice(b"\r\n");
        buf.extend_from_slice(arg);
        buf.extend_from_slice(b"\r\n");
    }
    buf
}

/// Convenience wrapper over [`encode_command`] for string arguments.
pub fn encode_command_str(args: &[&str]) -> Vec<u8> {
    let byte_args: Vec<&[u8]> = args.iter().map(|s| s.as_bytes()).collect();
    encode_command(&byte_args)
}

/// Builds a command from mixed string/bytes arguments ergonomically.
///
/// ```ignore
/// let bytes = cmd!("SET", "mykey", "myvalue");
/// ```
#[macro_export]
macro_rules! cmd {
    ($($arg:expr),+ $(,)?) => {{
        $crate::resp::writer::encode_command_str(&[$($arg),+])
    }};
}
