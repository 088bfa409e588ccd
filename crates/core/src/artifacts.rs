// crates/core/src/artifacts.rs
//! Artifact Extractor (§4.D).
//!
//! Walks every tool invocation in a turn and extracts files, commands,
//! and errors. Deterministic given identical input; duplicates within
//! a turn are collapsed.

use serde_json::Value;

use crate::parser::{RawTurn, ToolInvocation};

/// Tool names treated as touching a file on disk.
const FILE_TOOLS: &[&str] = &["Read", "Write", "Edit", "MultiEdit", "NotebookEdit"];

/// Tool names treated as shell execution.
const SHELL_TOOLS: &[&str] = &["Bash", "Shell", "Execute"];

/// Common error signatures matched as substrings in tool output (§4.D).
const ERROR_SIGNATURES: &[&str] = &["Traceback", "error:", "Error:"];

/// Whether the Command artifact records the full command string or
/// just its first argv token (§4.D "configurable").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGranularity {
    FirstToken,
    FullString,
}

#[derive(Debug, Clone, Copy)]
pub struct ArtifactExtractorConfig {
    pub command_granularity: CommandGranularity,
}

impl Default for ArtifactExtractorConfig {
    fn default() -> Self {
        Self { command_granularity: CommandGranularity::FirstToken }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedArtifacts {
    pub files: Vec<String>,
    pub commands: Vec<String>,
    pub errors: Vec<String>,
}

fn string_field<'a>(input: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| input.get(k).and_then(Value::as_str))
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn paths_from_tool(invocation: &ToolInvocation) -> Vec<String> {
    let mut paths = Vec::new();
    if let Some(input) = &invocation.input {
        if let Some(path) = string_field(input, &["file_path", "path"]) {
            paths.push(path.to_string());
        }
        // MultiEdit-style batched edits: an `edits` array of {file_path}.
        if let Some(edits) = input.get("edits").and_then(Value::as_array) {
            for edit in edits {
                if let Some(path) = string_field(edit, &["file_path", "path"]) {
                    paths.push(path.to_string());
                }
            }
        }
    }
    if let Some(result) = &invocation.result {
        if let Some(path) = result.get("file_path").and_then(Value::as_str) {
            paths.push(path.to_string());
        }
    }
    paths
}

fn command_from_tool(invocation: &ToolInvocation, granularity: CommandGranularity) -> Option<String> {
    let input = invocation.input.as_ref()?;
    let command = string_field(input, &["command"])?;
    match granularity {
        CommandGranularity::FullString => Some(command.to_string()),
        CommandGranularity::FirstToken => command.split_whitespace().next().map(str::to_string),
    }
}

fn errors_from_tool(invocation: &ToolInvocation) -> Vec<String> {
    let mut errors = Vec::new();
    let output_text = invocation.result.as_ref().map(value_to_text).unwrap_or_default();

    if invocation.is_error {
        let snippet: String = output_text.chars().take(200).collect();
        errors.push(if snippet.is_empty() { "tool invocation failed".to_string() } else { snippet });
    }

    for signature in ERROR_SIGNATURES {
        if let Some(pos) = output_text.find(signature) {
            let snippet: String = output_text[pos..].chars().take(200).collect();
            errors.push(snippet);
        }
    }

    errors
}

fn dedup(mut items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items.retain(|item| seen.insert(item.clone()));
    items
}

/// Extract files/commands/errors from every tool invocation in a turn.
pub fn extract_artifacts(turn: &RawTurn, config: &ArtifactExtractorConfig) -> ExtractedArtifacts {
    let mut files = Vec::new();
    let mut commands = Vec::new();
    let mut errors = Vec::new();

    for invocation in &turn.tool_invocations {
        if FILE_TOOLS.contains(&invocation.name.as_str()) {
            files.extend(paths_from_tool(invocation));
        } else if !invocation.name.is_empty() {
            // Any tool's result may still reference a path it modified.
            files.extend(paths_from_tool(invocation));
        }

        if SHELL_TOOLS.contains(&invocation.name.as_str()) {
            if let Some(cmd) = command_from_tool(invocation, config.command_granularity) {
                commands.push(cmd);
            }
        }

        errors.extend(errors_from_tool(invocation));
    }

    ExtractedArtifacts {
        files: dedup(files),
        commands: dedup(commands),
        errors: dedup(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tool(name: &str, input: Value) -> ToolInvocation {
        ToolInvocation { name: name.to_string(), input: Some(input), result: None, is_error: false }
    }

    #[test]
    fn extracts_file_path_from_edit_tool() {
        let turn = RawTurn {
            tool_invocations: vec![tool("Edit", json!({"file_path": "/src/main.rs"}))],
            ..Default::default()
        };
        let artifacts = extract_artifacts(&turn, &ArtifactExtractorConfig::default());
        assert_eq!(artifacts.files, vec!["/src/main.rs".to_string()]);
    }

    #[test]
    fn extracts_first_token_of_shell_command_by_default() {
        let turn = RawTurn {
            tool_invocations: vec![tool("Bash", json!({"command": "cargo test --workspace"}))],
            ..Default::default()
        };
        let artifacts = extract_artifacts(&turn, &ArtifactExtractorConfig::default());
        assert_eq!(artifacts.commands, vec!["cargo".to_string()]);
    }

    #[test]
    fn full_command_string_when_configured() {
        let turn = RawTurn {
            tool_invocations: vec![tool("Bash", json!({"command": "cargo test --workspace"}))],
            ..Default::default()
        };
        let config = ArtifactExtractorConfig { command_granularity: CommandGranularity::FullString };
        let artifacts = extract_artifacts(&turn, &config);
        assert_eq!(artifacts.commands, vec!["cargo test --workspace".to_string()]);
    }

    #[test]
    fn detects_is_error_and_traceback_signature() {
        let turn = RawTurn {
            tool_invocations: vec![ToolInvocation {
                name: "Bash".to_string(),
                input: Some(json!({"command": "python run.py"})),
                result: Some(Value::String("Traceback (most recent call last):\nValueError".to_string())),
                is_error: true,
            }],
            ..Default::default()
        };
        let artifacts = extract_artifacts(&turn, &ArtifactExtractorConfig::default());
        assert!(artifacts.errors.len() >= 1);
        assert!(artifacts.errors.iter().any(|e| e.contains("Traceback")));
    }

    #[test]
    fn duplicates_within_a_turn_are_collapsed() {
        let turn = RawTurn {
            tool_invocations: vec![
                tool("Read", json!({"file_path": "/a.rs"})),
                tool("Read", json!({"file_path": "/a.rs"})),
            ],
            ..Default::default()
        };
        let artifacts = extract_artifacts(&turn, &ArtifactExtractorConfig::default());
        assert_eq!(artifacts.files, vec!["/a.rs".to_string()]);
    }

    #[test]
    fn deterministic_given_identical_input() {
        let turn = RawTurn {
            tool_invocations: vec![tool("Bash", json!({"command": "ls -la"}))],
            ..Default::default()
        };
        let a = extract_artifacts(&turn, &ArtifactExtractorConfig::default());
        let b = extract_artifacts(&turn, &ArtifactExtractorConfig::default());
        assert_eq!(a, b);
    }
}
