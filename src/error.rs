//! Error types (C7): a typed error enum plus the MOVED/ASK redirect parser.

use std::io;
use thiserror::Error;

/// A parsed redirect, extracted from the first line of a server error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectKind {
    /// `MOVED <slot> <host>:<port>`
    Moved { slot: u16, addr: String },
    /// `ASK <slot> <host>:<port>`
    Ask { slot: u16, addr: String },
    /// Any other error line — not a redirect.
    Other,
}

impl RedirectKind {
    /// Classifies a raw server error line as MOVED, ASK, or neither.
    pub fn from_error_msg(msg: &str) -> Self {
        if let Some(rest) = msg.strip_prefix("MOVED ") {
            return Self::parse_redirect(rest, |slot, addr| Self::Moved { slot, addr });
        }
        if let Some(rest) = msg.strip_prefix("ASK ") {
            return Self::parse_redirect(rest, |slot, addr| Self::Ask { slot, addr });
        }
        Self::Other
    }

    fn parse_redirect(rest: &str, make: impl FnOnce(u16, String) -> Self) -> Self {
        match rest.split_once(' ') {
            Some((slot_str, addr)) => match slot_str.parse::<u16>() {
                Ok(slot) => make(slot, addr.to_string()),
                Err(_) => Self::Other,
            },
            None => Self::Other,
        }
    }
}

/// Errors a cluster client operation can fail with.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// Underlying TCP I/O failure.
    #[error("network error: {0}")]
    Network(#[from] io::Error),

    /// A reply did not parse as a well-formed RESP value.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The redirection loop exhausted its hop budget without a final reply.
    #[error("too many redirections ({hops} hops)")]
    Redirection { hops: u32 },

    /// The server returned a (non-redirect) error reply, verbatim.
    #[error("server error: {0}")]
    Server(String),

    /// Bootstrap configuration was invalid (empty node list, bad address).
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ClusterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_moved() {
        let kind = RedirectKind::from_error_msg("MOVED 3999 127.0.0.1:6381");
        assert_eq!(
            kind,
            RedirectKind::Moved {
                slot: 3999,
                addr: "127.0.0.1:6381".to_string()
            }
        );
    }

    #[test]
    fn parses_ask() {
        let kind = RedirectKind::from_error_msg("ASK 3999 127.0.0.1:6381");
        assert_eq!(
            kind,
            RedirectKind::Ask {
                slot: 3999,
                addr: "127.0.0.1:6381".to_string()
            }
        );
    }

    #[test]
    fn non_redirect_errors_are_other() {
        assert_eq!(
            RedirectKind::from_error_msg("WRONGTYPE Operation against a key"),
            RedirectKind::Other
        );
        assert_eq!(RedirectKind::from_error_msg("ERR unknown command"), RedirectKind::Other);
    }

    #[test]
    fn moved_with_malformed_slot_is_other() {
        assert_eq!(
            RedirectKind::from_error_msg("MOVED abc 127.0.0.1:6381"),
            RedirectKind::Other
        );
    }

    #[test]
    fn moved_with_missing_addr_is_other() {
        assert_eq!(RedirectKind::from_error_msg("MOVED 3999"), RedirectKind::Other);
    }

    #[test]
    fn display_messages() {
        let err = ClusterError::Protocol("bad input".into());
        assert_eq!(err.to_string(), "protocol error: bad input");

        let err = ClusterError::Redirection { hops: 16 };
        assert_eq!(err.to_string(), "too many redirections (16 hops)");

        let err = ClusterError::Server("WRONGTYPE whoops".into());
        assert_eq!(err.to_string(), "server error: WRONGTYPE whoops");

        let err = ClusterError::Config("empty bootstrap list".into());
        assert_eq!(err.to_string(), "configuration error: empty bootstrap list");
    }

    #[test]
    fn io_error_converts_via_from() {
        let io_err = io::Error::new(io::ErrorKind::Other, "refused");
        let err: ClusterError = io_err.into();
        assert!(matches!(err, ClusterError::Network(_)));
    }
}
