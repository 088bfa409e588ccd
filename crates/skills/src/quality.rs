// crates/skills/src/quality.rs
//! Session quality scoring (§4.J "Quality scoring"): a `[0, 1]` score
//! built from five signals, each normalized to `[0, 1]` and combined
//! with fixed weights. A configurable threshold (default 0.6, see
//! `mnemo_core::config::SkillsConfig`) gates whether the session is
//! eligible for skill generation.

use std::collections::HashSet;

/// One turn's worth of signal inputs, in session order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnSignal {
    pub tool_call_count: i32,
    pub tool_names: Vec<String>,
    pub files_touched: Vec<String>,
    pub errors_encountered: Vec<String>,
}

/// Cap used to normalize the log-scaled turn-count signal — sessions
/// at or beyond this many turns saturate the signal at 1.0.
const TURN_COUNT_SATURATION: usize = 20;

/// Cap used to normalize tool-kind diversity.
const TOOL_KIND_SATURATION: usize = 8;

fn turns_signal(turn_count: usize) -> f64 {
    if turn_count == 0 {
        return 0.0;
    }
    ((1.0 + turn_count as f64).ln() / (1.0 + TURN_COUNT_SATURATION as f64).ln()).min(1.0)
}

fn tool_fraction_signal(turns: &[TurnSignal]) -> f64 {
    if turns.is_empty() {
        return 0.0;
    }
    let with_tools = turns.iter().filter(|t| t.tool_call_count > 0).count();
    with_tools as f64 / turns.len() as f64
}

/// "Successful multi-step edit": files touched across >= 2 turns, and
/// the final turn carries no error artifacts.
fn multi_step_edit_signal(turns: &[TurnSignal]) -> f64 {
    let turns_touching_files = turns.iter().filter(|t| !t.files_touched.is_empty()).count();
    let last_turn_clean = turns.last().map(|t| t.errors_encountered.is_empty()).unwrap_or(false);
    if turns_touching_files >= 2 && last_turn_clean {
        1.0
    } else {
        0.0
    }
}

fn tool_diversity_signal(turns: &[TurnSignal]) -> f64 {
    let kinds: HashSet<&str> = turns.iter().flat_map(|t| t.tool_names.iter().map(String::as_str)).filter(|n| !n.is_empty()).collect();
    (kinds.len() as f64 / TOOL_KIND_SATURATION as f64).min(1.0)
}

fn confirmation_signal(final_user_message: &str, confirmation_keywords: &[String]) -> f64 {
    let lower = final_user_message.to_lowercase();
    if confirmation_keywords.iter().any(|kw| lower.contains(&kw.to_lowercase())) {
        1.0
    } else {
        0.0
    }
}

/// Combine the five signals per §4.J, weighted so that a clean
/// multi-step edit confirmed by the user dominates the score while
/// turn count and tool diversity contribute more gently.
pub fn quality_score(turns: &[TurnSignal], final_user_message: &str, confirmation_keywords: &[String]) -> f64 {
    let w_turns = 0.2;
    let w_tools = 0.2;
    let w_edit = 0.25;
    let w_diversity = 0.15;
    let w_confirm = 0.2;

    w_turns * turns_signal(turns.len())
        + w_tools * tool_fraction_signal(turns)
        + w_edit * multi_step_edit_signal(turns)
        + w_diversity * tool_diversity_signal(turns)
        + w_confirm * confirmation_signal(final_user_message, confirmation_keywords)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords() -> Vec<String> {
        vec!["thanks".into(), "works".into(), "perfect".into()]
    }

    #[test]
    fn empty_session_scores_zero() {
        assert_eq!(quality_score(&[], "", &keywords()), 0.0);
    }

    #[test]
    fn strong_session_scores_above_the_default_threshold() {
        let turns = vec![
            TurnSignal { tool_call_count: 1, tool_names: vec!["Read".into()], files_touched: vec!["a.rs".into()], errors_encountered: vec![] },
            TurnSignal { tool_call_count: 2, tool_names: vec!["Edit".into(), "Bash".into()], files_touched: vec!["a.rs".into()], errors_encountered: vec![] },
            TurnSignal { tool_call_count: 1, tool_names: vec!["Edit".into()], files_touched: vec!["b.rs".into()], errors_encountered: vec![] },
        ];
        let score = quality_score(&turns, "thanks, that works perfectly", &keywords());
        assert!(score >= 0.6, "expected >= 0.6, got {score}");
    }

    #[test]
    fn trailing_error_suppresses_the_multi_step_edit_signal() {
        let clean_turns = vec![
            TurnSignal { tool_call_count: 1, tool_names: vec!["Edit".into()], files_touched: vec!["a.rs".into()], errors_encountered: vec![] },
            TurnSignal { tool_call_count: 1, tool_names: vec!["Edit".into()], files_touched: vec!["b.rs".into()], errors_encountered: vec![] },
        ];
        let mut dirty_turns = clean_turns.clone();
        dirty_turns.last_mut().unwrap().errors_encountered.push("Traceback".into());

        let clean_score = quality_score(&clean_turns, "thanks", &keywords());
        let dirty_score = quality_score(&dirty_turns, "thanks", &keywords());
        assert!(dirty_score < clean_score);
    }

    #[test]
    fn score_is_bounded_in_zero_one() {
        let turns: Vec<TurnSignal> = (0..50)
            .map(|i| TurnSignal {
                tool_call_count: 3,
                tool_names: vec![format!("Tool{i}")],
                files_touched: vec![format!("f{i}.rs")],
                errors_encountered: vec![],
            })
            .collect();
        let score = quality_score(&turns, "thanks works perfect lgtm great awesome", &keywords());
        assert!((0.0..=1.0).contains(&score));
    }
}
