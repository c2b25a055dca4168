//! Text protocol codec
//!
//! Every message is `VERB[ payload]`. Multi-record payloads (`SCORES`,
//! `HISCORES`) put one record per line inside the same message, so the
//! payload after the first space is taken verbatim, newlines included.

use std::fmt::Write as _;

use thiserror::Error;

use crate::types::{
    InboundMessage, LifeStatus, OutboundMessage, ScoreLine, ScoreRecord, COLOR_COUNT, PIECE_COUNT,
    REMOTE_BOARD_CELLS,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("empty message")]
    Empty,
    #[error("unknown verb `{0}`")]
    UnknownVerb(String),
    #[error("`{verb}` requires a payload")]
    MissingPayload { verb: &'static str },
    #[error("invalid integer `{value}` in {field}")]
    InvalidInteger { field: &'static str, value: String },
    #[error("piece id {0} out of range")]
    PieceOutOfRange(i64),
    #[error("invalid life status `{0}`")]
    InvalidLifeStatus(String),
    #[error("malformed {verb} record `{record}`")]
    MalformedRecord { verb: &'static str, record: String },
    #[error("board has {actual} cells, expected {expected}")]
    BoardLength { expected: usize, actual: usize },
    #[error("cell value {0} out of range")]
    CellOutOfRange(i32),
}

/// Parse one inbound message
pub fn parse_inbound(message: &str) -> Result<InboundMessage, ProtocolError> {
    let message = message.trim_start();
    let (verb, payload) = match message.split_once(' ') {
        Some((verb, payload)) => (verb, Some(payload)),
        None => (message.trim_end(), None),
    };
    if verb.is_empty() {
        return Err(ProtocolError::Empty);
    }

    match verb {
        "PIECE" => parse_piece(require(payload, "PIECE")?),
        "SCORES" => parse_scores(require(payload, "SCORES")?).map(InboundMessage::Scores),
        "BOARD" => parse_board(require(payload, "BOARD")?),
        "MSG" => {
            let payload = require(payload, "MSG")?.trim_end_matches(['\r', '\n']);
            let (name, text) = payload.split_once(':').unwrap_or((payload, ""));
            Ok(InboundMessage::Msg {
                name: name.to_string(),
                text: text.to_string(),
            })
        }
        "HISCORES" => parse_hiscores(payload.unwrap_or_default()).map(InboundMessage::HiScores),
        "NEWSCORE" => Ok(InboundMessage::NewScore),
        "START" => Ok(InboundMessage::Start),
        "HOST" => Ok(InboundMessage::Host),
        "PARTED" => Ok(InboundMessage::Parted),
        "JOIN" => Ok(InboundMessage::Joined(
            require(payload, "JOIN")?.trim().to_string(),
        )),
        "NICK" => Ok(InboundMessage::Nick(
            require(payload, "NICK")?.trim().to_string(),
        )),
        "ERROR" => Ok(InboundMessage::Error(
            payload.unwrap_or_default().trim().to_string(),
        )),
        other => Err(ProtocolError::UnknownVerb(other.to_string())),
    }
}

fn require<'a>(payload: Option<&'a str>, verb: &'static str) -> Result<&'a str, ProtocolError> {
    match payload {
        Some(p) if !p.trim().is_empty() => Ok(p),
        _ => Err(ProtocolError::MissingPayload { verb }),
    }
}

fn parse_int<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, ProtocolError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ProtocolError::InvalidInteger {
            field,
            value: value.trim().to_string(),
        })
}

fn parse_piece(payload: &str) -> Result<InboundMessage, ProtocolError> {
    let id: i64 = parse_int("piece", payload)?;
    if !(0..PIECE_COUNT as i64).contains(&id) {
        return Err(ProtocolError::PieceOutOfRange(id));
    }
    Ok(InboundMessage::Piece(id as u8))
}

/// `name:score:STATUS` per line. One bad line rejects the whole batch so a
/// partial leaderboard is never shown.
fn parse_scores(payload: &str) -> Result<Vec<ScoreLine>, ProtocolError> {
    let lines = payload
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let malformed = || ProtocolError::MalformedRecord {
                verb: "SCORES",
                record: line.to_string(),
            };
            let (rest, status) = line.rsplit_once(':').ok_or_else(malformed)?;
            let (name, score) = rest.rsplit_once(':').ok_or_else(malformed)?;
            if name.is_empty() {
                return Err(malformed());
            }
            let score = parse_int("score", score)?;
            let status = LifeStatus::from_str(status)
                .ok_or_else(|| ProtocolError::InvalidLifeStatus(status.to_string()))?;
            Ok(ScoreLine::new(name, score, status))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if lines.is_empty() {
        return Err(ProtocolError::MissingPayload { verb: "SCORES" });
    }
    Ok(lines)
}

fn parse_hiscores(payload: &str) -> Result<Vec<ScoreRecord>, ProtocolError> {
    payload
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (name, score) = line.rsplit_once(':').ok_or_else(|| {
                ProtocolError::MalformedRecord {
                    verb: "HISCORES",
                    record: line.to_string(),
                }
            })?;
            Ok(ScoreRecord::new(name, parse_int("score", score)?))
        })
        .collect()
}

fn parse_board(payload: &str) -> Result<InboundMessage, ProtocolError> {
    let (name, values) = payload
        .rsplit_once(':')
        .ok_or_else(|| ProtocolError::MalformedRecord {
            verb: "BOARD",
            record: payload.trim().to_string(),
        })?;
    let cells = values
        .split_whitespace()
        .map(|v| parse_int::<i32>("board", v))
        .collect::<Result<Vec<_>, _>>()?;
    if cells.len() != REMOTE_BOARD_CELLS {
        return Err(ProtocolError::BoardLength {
            expected: REMOTE_BOARD_CELLS,
            actual: cells.len(),
        });
    }
    if let Some(&bad) = cells.iter().find(|&&c| !(0..COLOR_COUNT).contains(&c)) {
        return Err(ProtocolError::CellOutOfRange(bad));
    }
    Ok(InboundMessage::Board {
        name: name.trim().to_string(),
        cells,
    })
}

/// Format one outbound message
pub fn encode_outbound(message: &OutboundMessage) -> String {
    let mut out = String::new();
    write_outbound_into(&mut out, message);
    out
}

/// Format one outbound message into `out`, replacing its contents
pub fn write_outbound_into(out: &mut String, message: &OutboundMessage) {
    out.clear();
    out.push_str(message.verb());
    match message {
        OutboundMessage::Board(cells) => {
            for cell in cells {
                let _ = write!(out, " {cell}");
            }
        }
        OutboundMessage::Score(score) => {
            let _ = write!(out, " {score}");
        }
        OutboundMessage::Lives(lives) => {
            let _ = write!(out, " {lives}");
        }
        OutboundMessage::Msg(text) => {
            out.push(' ');
            push_single_line(out, text);
        }
        OutboundMessage::HiScore(record) => {
            out.push(' ');
            push_single_line(out, &record.to_string());
        }
        OutboundMessage::Nick(value)
        | OutboundMessage::Create(value)
        | OutboundMessage::Join(value) => {
            out.push(' ');
            push_single_line(out, value);
        }
        OutboundMessage::PieceRequest
        | OutboundMessage::Die
        | OutboundMessage::ScoresRequest
        | OutboundMessage::HiScoresRequest
        | OutboundMessage::Start
        | OutboundMessage::Part => {}
    }
}

/// Free text must not smuggle a second line into the message
fn push_single_line(out: &mut String, text: &str) {
    out.extend(text.chars().map(|c| if c == '\n' || c == '\r' { ' ' } else { c }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_piece() {
        assert_eq!(parse_inbound("PIECE 14"), Ok(InboundMessage::Piece(14)));
        assert_eq!(
            parse_inbound("PIECE 15"),
            Err(ProtocolError::PieceOutOfRange(15))
        );
        assert!(matches!(
            parse_inbound("PIECE x"),
            Err(ProtocolError::InvalidInteger { .. })
        ));
        assert_eq!(
            parse_inbound("PIECE"),
            Err(ProtocolError::MissingPayload { verb: "PIECE" })
        );
    }

    #[test]
    fn test_parse_msg_without_colon() {
        assert_eq!(
            parse_inbound("MSG bob"),
            Ok(InboundMessage::Msg {
                name: "bob".into(),
                text: String::new()
            })
        );
    }

    #[test]
    fn test_unknown_and_empty() {
        assert_eq!(
            parse_inbound("CHANNELS a b"),
            Err(ProtocolError::UnknownVerb("CHANNELS".into()))
        );
        assert_eq!(parse_inbound("   "), Err(ProtocolError::Empty));
    }

    #[test]
    fn test_encode_simple_verbs() {
        assert_eq!(encode_outbound(&OutboundMessage::PieceRequest), "PIECE");
        assert_eq!(encode_outbound(&OutboundMessage::Score(120)), "SCORE 120");
        assert_eq!(encode_outbound(&OutboundMessage::Lives(0)), "LIVES 0");
        assert_eq!(encode_outbound(&OutboundMessage::Die), "DIE");
        assert_eq!(
            encode_outbound(&OutboundMessage::Msg("two\nlines".into())),
            "MSG two lines"
        );
        assert_eq!(
            encode_outbound(&OutboundMessage::HiScore(ScoreRecord::new("amy", 900))),
            "HISCORE amy:900"
        );
    }

    #[test]
    fn test_write_into_reuses_buffer() {
        let mut buf = String::from("stale");
        write_outbound_into(&mut buf, &OutboundMessage::Board(vec![0, 1, 2]));
        assert_eq!(buf, "BOARD 0 1 2");
    }
}
