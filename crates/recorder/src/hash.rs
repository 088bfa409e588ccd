// crates/recorder/src/hash.rs
//! Deterministic content hash over `(user_message, assistant_text,
//! ordered tool_names)` (§3 Turn invariant, §4.E step 3). Two parses
//! of the same transcript region produce the same 64-hex digest,
//! which is how the Recorder detects a turn hasn't changed.

use mnemo_core::parser::RawTurn;

pub fn content_hash(turn: &RawTurn) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(turn.user_message.as_bytes());
    hasher.update(b"\0");
    hasher.update(turn.assistant_text.as_bytes());
    hasher.update(b"\0");
    for name in turn.tool_names() {
        hasher.update(name.as_bytes());
        hasher.update(b",");
    }
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(user: &str, assistant: &str) -> RawTurn {
        RawTurn { user_message: user.to_string(), assistant_text: assistant.to_string(), ..Default::default() }
    }

    #[test]
    fn identical_turns_hash_identically() {
        assert_eq!(content_hash(&turn("hi", "hello")), content_hash(&turn("hi", "hello")));
    }

    #[test]
    fn differing_assistant_text_changes_the_hash() {
        assert_ne!(content_hash(&turn("hi", "hello")), content_hash(&turn("hi", "hey")));
    }

    #[test]
    fn hash_is_64_hex_characters() {
        let h = content_hash(&turn("a", "b"));
        assert_eq!(h.len(), 64);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn tool_names_participate_in_the_hash() {
        use mnemo_core::parser::ToolInvocation;
        let mut with_tool = turn("hi", "hello");
        with_tool.tool_invocations.push(ToolInvocation { name: "Bash".into(), ..Default::default() });
        assert_ne!(content_hash(&turn("hi", "hello")), content_hash(&with_tool));
    }
}
