//! Single-node transport: a blocking `TcpStream` wrapper with an integrated
//! read buffer and RESP parser for synchronous request/response I/O. This
//! is the concrete "underlying transport" the router and connection cache
//! build on.

use crate::error::ClusterError;
use crate::resp::parser::{parse, ParseError};
use crate::resp::types::RespValue;
use crate::resp::writer::encode_command;

use bytes::BytesMut;
use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::{Duration, Instant};

const DEFAULT_BUF_CAPACITY: usize = 16 * 1024;

/// Maximum a single read buffer is allowed to grow to before a reply is
/// considered malformed rather than merely large.
pub const DEFAULT_MAX_BUF_SIZE: usize = 512 * 1024 * 1024;

/// A single blocking connection to one cluster node.
pub struct Connection {
    stream: TcpStream,
    buf: BytesMut,
    max_buf_size: usize,
    pub last_used: Instant,
}

impl Connection {
    /// Connects to `addr` (e.g. `"127.0.0.1:6379"`).
    pub fn connect(addr: &str) -> Result<Self, ClusterError> {
        Self::connect_timeout(addr, None)
    }

    /// Connects to `addr`, optionally bounding how long the TCP handshake
    /// may take.
    pub fn connect_timeout(addr: &str, timeout: Option<Duration>) -> Result<Self, ClusterError> {
        let stream = match timeout {
            Some(t) => {
                let sock_addr = addr
                    .parse()
                    .or_else(|_| {
                        use std::net::ToSocketAddrs;
                        addr.to_socket_addrs()?
                            .next()
                            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "no address"))
                    })
                    .map_err(ClusterError::Network)?;
                TcpStream::connect_timeout(&sock_addr, t)?
            }
            None => TcpStream::connect(addr)?,
        };
        stream.set_nodelay(true).ok();
        Ok(Self {
            stream,
            buf: BytesMut::with_capacity(DEFAULT_BUF_CAPACITY),
            max_buf_size: DEFAULT_MAX_BUF_SIZE,
            last_used: Instant::now(),
        })
    }

    /// Sends raw, already-encoded bytes to the server.
    pub fn send_raw(&mut self, data: &[u8]) -> Result<(), ClusterError> {
        self.stream.write_all(data)?;
        self.last_used = Instant::now();
        Ok(())
    }

    /// Reads and parses one complete RESP value from the server, growing
    /// the read buffer as needed up to `max_buf_size`.
    pub fn read_response(&mut self) -> Result<RespValue, ClusterError> {
        loop {
            if !self.buf.is_empty() {
                let snapshot = self.buf.split().freeze();
                match parse(&snapshot) {
                    Ok((value, consumed)) => {
                        if consumed < snapshot.len() {
                            self.buf.extend_from_slice(&snapshot[consumed..]);
                        }
                        self.last_used = Instant::now();
                        return Ok(value);
                    }
                    Err(ParseError::Incomplete) => {
                        self.buf.extend_from_slice(&snapshot);
                    }
                    Err(ParseError::Protocol(msg)) => {
                        self.buf.extend_from_slice(&snapshot);
                        return Err(ClusterError::Protocol(msg));
                    }
                }
            }
            self.grow_buf_if_needed()?;
            let mut chunk = [0u8; 4096];
            let n = self.stream.read(&mut chunk)?;
            if n == 0 {
                return Err(ClusterError::Network(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "connection closed by server",
                )));
            }
            self.buf.extend_from_slice(&chunk[..n]);
        }
    }

    fn grow_buf_if_needed(&mut self) -> Result<(), ClusterError> {
        if self.buf.capacity() - self.buf.len() >= 4096 {
            return Ok(());
        }
        let new_cap = (self.buf.capacity() * 2).max(DEFAULT_BUF_CAPACITY);
        if new_cap > self.max_buf_size {
            if self.buf.capacity() >= self.max_buf_size {
                return Err(ClusterError::Protocol(format!(
                    "RESP message too large: buffer would exceed {} bytes",
                    self.max_buf_size
                )));
            }
            self.buf.reserve(self.max_buf_size - self.buf.capacity());
        } else {
            self.buf.reserve(new_cap - self.buf.capacity());
        }
        Ok(())
    }

    /// Sends a command and reads its reply.
    pub fn execute(&mut self, args: &[&[u8]]) -> Result<RespValue, ClusterError> {
        let cmd = encode_command(args);
        self.send_raw(&cmd)?;
        self.read_response()
    }

    /// Sends a one-shot `ASKING` command ahead of the real command, as the
    /// redirection state machine does when following an ASK reply. Returns
    /// both replies — the caller must treat either one being null or an
    /// error as a failure of this attempt, per the ASK retry contract.
    pub fn execute_asking(&mut self, args: &[&[u8]]) -> Result<(RespValue, RespValue), ClusterError> {
        let asking_reply = self.execute(&[b"ASKING"])?;
        let reply = self.execute(args)?;
        Ok((asking_reply, reply))
    }

    /// Sends `PING` and reports whether the server answered `PONG`.
    pub fn ping(&mut self) -> Result<bool, ClusterError> {
        match self.execute(&[b"PING"])? {
            RespValue::SimpleString(s) => Ok(s == "PONG"),
            _ => Ok(false),
        }
    }
}
