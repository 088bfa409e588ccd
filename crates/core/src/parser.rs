// crates/core/src/parser.rs
//! Transcript Parser (§4.C).
//!
//! Consumes a line-delimited transcript file and produces an ordered
//! sequence of `RawTurn`s: one user message plus the contiguous
//! assistant response (including tool invocations) up to the next
//! user message.
//!
//! Open Question (§9): the exact mapping from transcript fields to
//! turn boundaries is ambiguous when tool results arrive interleaved
//! after assistant text finalization. This parser resolves it the way
//! §9 recommends: a new `user` record is always the boundary, full
//! stop — everything between two `user` records (or between the last
//! `user` record and EOF) belongs to one turn, regardless of how many
//! assistant/tool_use/tool_result records precede it.
//!
//! Pure function: no I/O beyond the string handed to it.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ParseError;

/// A single tool invocation observed within a turn, carrying both its
/// input and (if seen) its result — the Artifact Extractor (§4.D)
/// walks these.
#[derive(Debug, Clone, Default)]
pub struct ToolInvocation {
    pub name: String,
    pub input: Option<Value>,
    pub result: Option<Value>,
    pub is_error: bool,
}

/// One user message plus its contiguous assistant response, as
/// recovered from the transcript — not yet a Store `Turn` (no id,
/// session id, or content hash; the Recorder computes those).
#[derive(Debug, Clone, Default)]
pub struct RawTurn {
    pub user_message: String,
    pub assistant_text: String,
    pub tool_invocations: Vec<ToolInvocation>,
    pub model_name: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    /// Original transcript lines spanning this turn, preserved verbatim
    /// for `TurnContent.raw_jsonl` (§3).
    pub raw_lines: Vec<String>,
}

impl RawTurn {
    pub fn tool_names(&self) -> Vec<String> {
        self.tool_invocations.iter().map(|t| t.name.clone()).collect()
    }
}

/// Result of parsing one transcript file.
#[derive(Debug, Clone, Default)]
pub struct ParsedTranscript {
    pub turns: Vec<RawTurn>,
    /// Lines that failed to parse as JSON, or whose `type` tag was not
    /// recognized (§7 "Malformed input" — counted, never fatal).
    pub skipped_lines: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RawRecord {
    User {
        message: Option<RawMessage>,
        timestamp: Option<String>,
    },
    Assistant {
        message: Option<RawMessage>,
        timestamp: Option<String>,
    },
    ToolUse {
        name: Option<String>,
        #[serde(default)]
        input: Option<Value>,
        timestamp: Option<String>,
    },
    ToolResult {
        #[serde(default)]
        content: Option<Value>,
        #[serde(default)]
        is_error: Option<bool>,
        timestamp: Option<String>,
    },
    Meta {
        timestamp: Option<String>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct RawMessage {
    #[serde(default)]
    content: RawContent,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
    Empty(Value),
}

impl Default for RawContent {
    fn default() -> Self {
        RawContent::Text(String::new())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        #[serde(default)]
        name: String,
        #[serde(default)]
        input: Option<Value>,
    },
    ToolResult {
        #[serde(default)]
        content: Option<Value>,
        #[serde(default)]
        is_error: Option<bool>,
    },
    #[serde(other)]
    Other,
}

fn extract_text(content: &RawContent) -> String {
    match content {
        RawContent::Text(s) => s.clone(),
        RawContent::Blocks(blocks) => blocks
            .iter()
            .filter_map(|b| match b {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n"),
        RawContent::Empty(_) => String::new(),
    }
}

fn extract_tool_invocations(content: &RawContent) -> Vec<ToolInvocation> {
    match content {
        RawContent::Blocks(blocks) => blocks
            .iter()
            .filter_map(|b| match b {
                ContentBlock::ToolUse { name, input } => Some(ToolInvocation {
                    name: name.clone(),
                    input: input.clone(),
                    result: None,
                    is_error: false,
                }),
                ContentBlock::ToolResult { content, is_error } => Some(ToolInvocation {
                    name: String::new(),
                    input: None,
                    result: content.clone(),
                    is_error: is_error.unwrap_or(false),
                }),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn parse_timestamp(s: &Option<String>) -> Option<DateTime<Utc>> {
    s.as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse transcript text already read into memory (the pure core of
/// §4.C — `parse_file` below is the thin I/O wrapper).
pub fn parse_transcript(text: &str) -> ParsedTranscript {
    let mut turns = Vec::new();
    let mut skipped_lines = 0usize;
    let mut current: Option<RawTurn> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let record: RawRecord = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(_) => {
                skipped_lines += 1;
                continue;
            }
        };

        match record {
            RawRecord::User { message, timestamp } => {
                if let Some(turn) = current.take() {
                    turns.push(turn);
                }
                let text = message.as_ref().map(|m| extract_text(&m.content)).unwrap_or_default();
                let started_at = parse_timestamp(&timestamp);
                current = Some(RawTurn {
                    user_message: text,
                    started_at,
                    ended_at: started_at,
                    raw_lines: vec![line.to_string()],
                    ..Default::default()
                });
                continue;
            }
            RawRecord::Assistant { message, timestamp } => {
                let turn = current.get_or_insert_with(RawTurn::default);
                if let Some(message) = &message {
                    let text = extract_text(&message.content);
                    if !text.is_empty() {
                        if !turn.assistant_text.is_empty() {
                            turn.assistant_text.push('\n');
                        }
                        turn.assistant_text.push_str(&text);
                    }
                    turn.tool_invocations.extend(extract_tool_invocations(&message.content));
                    if turn.model_name.is_none() {
                        turn.model_name = message.model.clone();
                    }
                }
                if let Some(ts) = parse_timestamp(&timestamp) {
                    turn.ended_at = Some(ts);
                }
            }
            RawRecord::ToolUse { name, input, timestamp } => {
                let turn = current.get_or_insert_with(RawTurn::default);
                turn.tool_invocations.push(ToolInvocation {
                    name: name.unwrap_or_default(),
                    input,
                    result: None,
                    is_error: false,
                });
                if let Some(ts) = parse_timestamp(&timestamp) {
                    turn.ended_at = Some(ts);
                }
            }
            RawRecord::ToolResult { content, is_error, timestamp } => {
                let turn = current.get_or_insert_with(RawTurn::default);
                turn.tool_invocations.push(ToolInvocation {
                    name: String::new(),
                    input: None,
                    result: content,
                    is_error: is_error.unwrap_or(false),
                });
                if let Some(ts) = parse_timestamp(&timestamp) {
                    turn.ended_at = Some(ts);
                }
            }
            RawRecord::Meta { .. } => {}
            RawRecord::Other => {
                skipped_lines += 1;
            }
        }

        if let Some(turn) = current.as_mut() {
            turn.raw_lines.push(line.to_string());
        }
    }

    if let Some(turn) = current.take() {
        turns.push(turn);
    }

    ParsedTranscript { turns, skipped_lines }
}

/// Read and parse a transcript file from disk.
pub fn parse_file(path: &Path) -> Result<ParsedTranscript, ParseError> {
    let bytes = std::fs::read(path).map_err(|e| ParseError::io(path, e))?;
    let text = String::from_utf8(bytes).map_err(|e| ParseError::InvalidUtf8 {
        path: path.to_owned(),
        line: text_first_invalid_line(e.as_bytes()),
    })?;
    Ok(parse_transcript(&text))
}

fn text_first_invalid_line(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_turns_with_trailing_error() {
        let transcript = r#"
{"type":"user","message":{"content":"hi"},"timestamp":"2026-01-01T00:00:00Z"}
{"type":"assistant","message":{"content":"hello"},"timestamp":"2026-01-01T00:00:01Z"}
{"type":"user","message":{"content":"do thing"},"timestamp":"2026-01-01T00:01:00Z"}
{"type":"assistant","message":{"content":[{"type":"text","text":"working"},{"type":"tool_use","name":"Bash","input":{"command":"ls"}}]},"timestamp":"2026-01-01T00:01:01Z"}
{"type":"user","message":{"content":"again"},"timestamp":"2026-01-01T00:02:00Z"}
{"type":"assistant","message":{"content":[{"type":"tool_use","name":"Bash","input":{"command":"run.sh"}},{"type":"tool_result","content":"Traceback (most recent call last)","is_error":true}]},"timestamp":"2026-01-01T00:02:01Z"}
"#;
        let parsed = parse_transcript(transcript);
        assert_eq!(parsed.turns.len(), 3);
        assert_eq!(parsed.skipped_lines, 0);

        let last = &parsed.turns[2];
        assert_eq!(last.user_message, "again");
        assert!(last.tool_invocations.iter().any(|t| t.is_error));
    }

    #[test]
    fn trailing_user_without_reply_is_its_own_turn() {
        let transcript = r#"
{"type":"user","message":{"content":"q1"}}
{"type":"assistant","message":{"content":"a1"}}
{"type":"user","message":{"content":"q2 unanswered"}}
"#;
        let parsed = parse_transcript(transcript);
        assert_eq!(parsed.turns.len(), 2);
        assert_eq!(parsed.turns[1].user_message, "q2 unanswered");
        assert!(parsed.turns[1].assistant_text.is_empty());
    }

    #[test]
    fn malformed_lines_are_skipped_not_fatal() {
        let transcript = "{not json}\n{\"type\":\"user\",\"message\":{\"content\":\"hi\"}}\n{\"type\":\"future_type\"}\n";
        let parsed = parse_transcript(transcript);
        assert_eq!(parsed.turns.len(), 1);
        assert_eq!(parsed.skipped_lines, 2);
    }

    #[test]
    fn empty_transcript_yields_no_turns() {
        let parsed = parse_transcript("");
        assert!(parsed.turns.is_empty());
        assert_eq!(parsed.skipped_lines, 0);
    }

    #[test]
    fn meta_records_are_ignored_without_counting_as_skipped() {
        let transcript = "{\"type\":\"meta\",\"timestamp\":\"2026-01-01T00:00:00Z\"}\n{\"type\":\"user\",\"message\":{\"content\":\"hi\"}}\n";
        let parsed = parse_transcript(transcript);
        assert_eq!(parsed.turns.len(), 1);
        assert_eq!(parsed.skipped_lines, 0);
    }
}
