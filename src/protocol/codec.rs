//! Protocol codec for encoding/decoding moves
//!
//! Decoding is all-or-nothing: every field is validated before a `Move` is built.

use std::str;
use thiserror::Error;

use super::{Move, DEFAULT_MAX_FRAME_SIZE, MOVE_COMMAND};
use crate::game::{Player, BOARD_SIZE};

/// Number of comma-separated fields in a move message
const FIELD_COUNT: usize = 4;

/// Codec errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Message is not valid UTF-8")]
    InvalidUtf8,

    #[error("Message too large: {0} bytes (max: {1})")]
    TooLarge(usize, usize),

    #[error("Expected 4 fields, got {0}")]
    FieldCount(usize),

    #[error("Unknown command: {0:?}")]
    UnknownCommand(String),

    #[error("Field '{field}' is not an integer: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Player must be 1 or -1, got {0}")]
    InvalidPlayer(i64),

    #[error("Field '{field}' out of range: {value}")]
    OutOfRange { field: &'static str, value: i64 },
}

/// Encode a move into its wire form, e.g. `move,1,0,0`
pub fn encode(mv: &Move) -> String {
    format!(
        "{},{},{},{}",
        MOVE_COMMAND,
        mv.actor.sign(),
        mv.row,
        mv.col
    )
}

/// Decode one wire message into a move, using the default frame limit
pub fn decode(bytes: &[u8]) -> Result<Move, CodecError> {
    decode_with_limit(bytes, DEFAULT_MAX_FRAME_SIZE)
}

/// Decode one wire message no longer than `max_frame_size` bytes
pub fn decode_with_limit(bytes: &[u8], max_frame_size: usize) -> Result<Move, CodecError> {
    if bytes.len() > max_frame_size {
        return Err(CodecError::TooLarge(bytes.len(), max_frame_size));
    }

    let text = str::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)?;
    let fields: Vec<&str> = text.trim().split(',').collect();

    if fields.len() != FIELD_COUNT {
        return Err(CodecError::FieldCount(fields.len()));
    }

    if fields[0].trim() != MOVE_COMMAND {
        return Err(CodecError::UnknownCommand(fields[0].to_string()));
    }

    let sign = parse_field("player", fields[1])?;
    let row = parse_field("row", fields[2])?;
    let col = parse_field("col", fields[3])?;

    let actor = Player::from_sign(sign).ok_or(CodecError::InvalidPlayer(sign))?;
    let row = coordinate("row", row)?;
    let col = coordinate("col", col)?;

    Ok(Move::new(actor, row, col))
}

fn parse_field(field: &'static str, raw: &str) -> Result<i64, CodecError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| CodecError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

fn coordinate(field: &'static str, value: i64) -> Result<usize, CodecError> {
    usize::try_from(value)
        .ok()
        .filter(|&v| v < BOARD_SIZE)
        .ok_or(CodecError::OutOfRange { field, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_host_first_move() {
        let mv = Move::new(Player::X, 0, 0);
        assert_eq!(encode(&mv), "move,1,0,0");
    }

    #[test]
    fn test_encode_o_move() {
        let mv = Move::new(Player::O, 2, 1);
        assert_eq!(encode(&mv), "move,-1,2,1");
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        for actor in [Player::X, Player::O] {
            for row in 0..3 {
                for col in 0..3 {
                    let mv = Move::new(actor, row, col);
                    assert_eq!(decode(encode(&mv).as_bytes()), Ok(mv));
                }
            }
        }
    }

    #[test]
    fn test_decode_tolerates_trailing_newline() {
        let mv = decode(b"move,-1,1,2\n").unwrap();
        assert_eq!(mv, Move::new(Player::O, 1, 2));
    }

    #[test]
    fn test_decode_wrong_field_count() {
        assert_eq!(decode(b"move,1,0"), Err(CodecError::FieldCount(3)));
        assert_eq!(decode(b"move,1,0,0,0"), Err(CodecError::FieldCount(5)));
        assert_eq!(decode(b""), Err(CodecError::FieldCount(1)));
    }

    #[test]
    fn test_decode_coalesced_frames_fail() {
        let err = decode(b"move,1,0,0move,-1,1,1").unwrap_err();
        assert_eq!(err, CodecError::FieldCount(7));
    }

    #[test]
    fn test_decode_unknown_command() {
        assert!(matches!(
            decode(b"enter,1,0,0"),
            Err(CodecError::UnknownCommand(cmd)) if cmd == "enter"
        ));
    }

    #[test]
    fn test_decode_non_numeric() {
        assert!(matches!(
            decode(b"move,x,0,0"),
            Err(CodecError::InvalidNumber { field: "player", .. })
        ));
        assert!(matches!(
            decode(b"move,1,a,0"),
            Err(CodecError::InvalidNumber { field: "row", .. })
        ));
        assert!(matches!(
            decode(b"move,1,0,1.5"),
            Err(CodecError::InvalidNumber { field: "col", .. })
        ));
    }

    #[test]
    fn test_decode_out_of_domain() {
        assert_eq!(decode(b"move,0,0,0"), Err(CodecError::InvalidPlayer(0)));
        assert_eq!(decode(b"move,2,0,0"), Err(CodecError::InvalidPlayer(2)));
        assert_eq!(
            decode(b"move,1,3,0"),
            Err(CodecError::OutOfRange { field: "row", value: 3 })
        );
        assert_eq!(
            decode(b"move,1,0,-1"),
            Err(CodecError::OutOfRange { field: "col", value: -1 })
        );
    }

    #[test]
    fn test_decode_invalid_utf8() {
        assert_eq!(decode(&[0xff, 0xfe, b',']), Err(CodecError::InvalidUtf8));
    }

    #[test]
    fn test_decode_too_large() {
        let big = vec![b'1'; DEFAULT_MAX_FRAME_SIZE + 1];
        assert!(matches!(decode(&big), Err(CodecError::TooLarge(_, _))));
    }

    #[test]
    fn test_decode_honours_configured_limit() {
        let mut frame = b"move,-1,1,1".to_vec();
        frame.resize(1500, b' ');

        assert_eq!(decode(&frame), Err(CodecError::TooLarge(1500, 1024)));
        assert_eq!(
            decode_with_limit(&frame, 2048),
            Ok(Move::new(Player::O, 1, 1))
        );
        assert_eq!(
            decode_with_limit(b"move,1,0,0", 4),
            Err(CodecError::TooLarge(10, 4))
        );
    }
}
