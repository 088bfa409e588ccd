// crates/skills/src/document.rs
//! SKILL document rendering (§6 "SKILL document format"): YAML-like
//! frontmatter with `name`/`description`/`triggers`, followed by a
//! numbered procedure.

/// Lowercase, hyphenated slug derived from a free-text name.
pub fn slugify(text: &str) -> String {
    let mut slug = String::new();
    let mut last_was_hyphen = true;
    for c in text.chars() {
        if c.is_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Render a SKILL.md document. The frontmatter deliberately doesn't
/// quote scalars, matching the "YAML-like" wording in §6 rather than
/// pulling in a full YAML writer for three fixed keys.
pub fn render_skill_document(name: &str, description: &str, triggers: &[String], procedure: &[String]) -> String {
    let mut doc = String::new();
    doc.push_str("---\n");
    doc.push_str(&format!("name: {name}\n"));
    doc.push_str(&format!("description: {description}\n"));
    doc.push_str("triggers:\n");
    for trigger in triggers {
        doc.push_str(&format!("  - {trigger}\n"));
    }
    doc.push_str("---\n\n");
    for (i, step) in procedure.iter().enumerate() {
        doc.push_str(&format!("{}. {}\n", i + 1, step));
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_lowercases_and_hyphenates() {
        assert_eq!(slugify("Deploy Checklist!"), "deploy-checklist");
    }

    #[test]
    fn slugify_collapses_runs_of_punctuation() {
        assert_eq!(slugify("fix   auth -- bug"), "fix-auth-bug");
    }

    #[test]
    fn render_includes_frontmatter_and_numbered_steps() {
        let doc = render_skill_document(
            "deploy-checklist",
            "Deploy the service safely",
            &["deploy".into(), "release".into()],
            &["Run the test suite".into(), "Tag the release".into()],
        );
        assert!(doc.starts_with("---\n"));
        assert!(doc.contains("name: deploy-checklist"));
        assert!(doc.contains("  - deploy"));
        assert!(doc.contains("1. Run the test suite"));
        assert!(doc.contains("2. Tag the release"));
    }

    #[test]
    fn render_with_no_triggers_or_steps_still_has_frontmatter() {
        let doc = render_skill_document("x", "y", &[], &[]);
        assert!(doc.contains("triggers:\n---"));
    }
}
