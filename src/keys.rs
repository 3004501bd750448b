//! Key extraction: deciding which argument (if any) carries the routing key.
//!
//! Deliberately narrow and case-sensitive — it mirrors the small set of
//! no-key commands a cluster client must special-case, not a full command
//! table. Commands outside this set are assumed to carry their key as the
//! second argument.

const NO_KEY_COMMANDS: &[&[u8]] = &[
    b"info",
    b"multi",
    b"exec",
    b"slaveof",
    b"config",
    b"shutdown",
];

/// Returns the key argument for `argv`, or `None` if the command carries no
/// key (in which case the caller should route via a random connection).
pub fn key_of<'a>(argv: &[&'a [u8]]) -> Option<&'a [u8]> {
    let command = argv.first()?;
    if NO_KEY_COMMANDS.contains(command) {
        return None;
    }
    argv.get(1).copied()
}
