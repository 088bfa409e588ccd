// crates/core/src/formatter.rs
//! Formatter (§4.H).
//!
//! Pure, deterministic packing of scored `ContextItem`s into the final
//! markdown string returned to the hook. No I/O, no randomness: same
//! input always produces the same output (§8 property 5).

use mnemo_types::{ContextItem, ContextKind};

/// `ceil(chars / 4)` token estimate (§4.H step 1 — cheap stand-in for
/// a real tokenizer, good enough for a budget heuristic).
fn estimate_tokens(text: &str) -> u32 {
    let chars = text.chars().count();
    ((chars + 3) / 4) as u32
}

fn render_item(item: &ContextItem) -> String {
    let mut line = format!("- [{}] **{}**", item.kind.tag(), item.title);
    if let Some(qualifier) = &item.qualifier {
        line.push_str(&format!(" ({qualifier})"));
    } else if let Some(age) = item.age_hours {
        line.push_str(&format!(" ({age:.0}h ago)"));
    }
    if let Some(body) = &item.body {
        if !body.is_empty() {
            line.push_str(&format!(" — {body}"));
        }
    }
    line
}

fn heading(kind: ContextKind) -> String {
    format!("### {}", kind.tag())
}

/// Greedily accept items by descending score, skipping (not stopping
/// on) any item that would push the running total over budget, then
/// group accepted items under `## Focus Context` by `RENDER_ORDER`
/// (§4.H steps 3-4). Returns an empty string if nothing is accepted.
pub fn format_context(items: &[ContextItem], max_tokens: u32) -> String {
    let mut ordered: Vec<&ContextItem> = items.iter().collect();
    ordered.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    let mut budget_used = 0u32;
    let mut accepted: Vec<&ContextItem> = Vec::new();
    for item in ordered {
        let rendered = render_item(item);
        let cost = estimate_tokens(&rendered);
        if budget_used + cost > max_tokens {
            continue;
        }
        budget_used += cost;
        accepted.push(item);
    }

    if accepted.is_empty() {
        return String::new();
    }

    let mut out = String::from("## Focus Context\n");
    for kind in ContextKind::RENDER_ORDER {
        let group: Vec<&&ContextItem> = accepted.iter().filter(|i| i.kind == kind).collect();
        if group.is_empty() {
            continue;
        }
        out.push('\n');
        out.push_str(&heading(kind));
        out.push('\n');
        for item in group {
            out.push_str(&render_item(item));
            out.push('\n');
        }
    }

    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemo_types::Id;

    fn item(kind: ContextKind, title: &str, score: f64) -> ContextItem {
        ContextItem {
            kind,
            ref_id: Id::new_v4(),
            title: title.to_string(),
            body: None,
            qualifier: None,
            age_hours: None,
            score,
            metadata: serde_json::Value::Null,
        }
    }

    #[test]
    fn empty_input_yields_empty_string() {
        assert_eq!(format_context(&[], 1500), "");
    }

    #[test]
    fn groups_are_rendered_in_render_order_regardless_of_input_order() {
        let items = vec![
            item(ContextKind::Error, "e1", 0.9),
            item(ContextKind::Focus, "f1", 0.9),
            item(ContextKind::Task, "t1", 0.9),
        ];
        let out = format_context(&items, 1500);
        let focus_pos = out.find("### Focus").unwrap();
        let task_pos = out.find("### Task").unwrap();
        let error_pos = out.find("### Error").unwrap();
        assert!(focus_pos < task_pos);
        assert!(task_pos < error_pos);
    }

    #[test]
    fn over_budget_items_are_skipped_not_truncating_the_whole_pass() {
        let huge_body = "x".repeat(10_000);
        let mut huge = item(ContextKind::Conversation, "huge", 0.99);
        huge.body = Some(huge_body);
        let small = item(ContextKind::Conversation, "small", 0.5);

        let out = format_context(&[huge, small], 50);
        assert!(out.contains("small"));
        assert!(!out.contains("huge"));
    }

    #[test]
    fn formatting_is_deterministic() {
        let items = vec![item(ContextKind::Task, "a", 0.7), item(ContextKind::Task, "b", 0.3)];
        let a = format_context(&items, 1500);
        let b = format_context(&items, 1500);
        assert_eq!(a, b);
    }

    #[test]
    fn higher_score_items_are_preferred_under_a_tight_budget() {
        let low = item(ContextKind::Task, "low", 0.1);
        let high = item(ContextKind::Task, "high", 0.9);
        let out = format_context(&[low, high], 6);
        assert!(out.contains("high"));
        assert!(!out.contains("low"));
    }
}
