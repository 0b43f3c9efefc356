//! Protocol module - Defines the wire protocol between the two peers
//!
//! Each game move travels as one comma-separated ASCII message:
//!
//! ```text
//! move,<player>,<row>,<col>
//! ```
//!
//! - `player` is the mark's sign: `1` for X, `-1` for O
//! - `row` and `col` are decimal integers in `0..3`
//!
//! There is no length prefix or delimiter; one send corresponds to one read.

mod codec;
mod message;

pub use codec::*;
pub use message::*;

/// The only command token in this protocol version
pub const MOVE_COMMAND: &str = "move";

/// Default TCP port for hosting a game
pub const DEFAULT_PORT: u16 = 8080;

/// Default upper bound on a single inbound frame
pub const DEFAULT_MAX_FRAME_SIZE: usize = 1024;
