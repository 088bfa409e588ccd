// crates/core/src/classifier.rs
//! Classifier (§4.F).
//!
//! Strictly lexical, no model call, no suspension point (§5): given a
//! prompt and the already-fetched project/person rows, produces a
//! `Signal`. Callers are responsible for prefetching `projects` and
//! `people` at most once per invocation (§4.F step 6) — this function
//! itself never touches the Store.

use std::collections::HashSet;

use mnemo_types::{EntityMatch, Intent, Signal};

use crate::error::ClassifyError;

/// Matches absolute paths, relative/dotted paths, and bare filenames
/// with an extension (§4.F step 4).
const PATH_PATTERN: &str = r"(?:[~.]?/[\w.\-]+)+\.[A-Za-z0-9]{1,8}|(?:[\w\-]+/)+[\w\-]+\.[A-Za-z0-9]{1,8}|\b[\w\-]+\.[A-Za-z]{1,8}\b";

const CONTINUATION_WORDS: &[&str] = &["continue", "keep", "again", "resume"];
const IMPERATIVE_VERBS: &[&str] = &[
    "fix", "add", "remove", "delete", "implement", "refactor", "write", "create", "update", "run",
    "build", "test", "make", "check", "rename", "move", "install", "deploy", "revert", "undo",
];
const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "is", "are", "was", "were", "to", "of", "in", "on",
    "for", "with", "this", "that", "it", "be", "at", "as", "by", "from",
];

/// Minimum length of a person's first name to match on its own
/// (§4.F step 3 — avoids matching on very short, high-collision names).
const MIN_FIRST_NAME_LEN: usize = 3;

pub trait ProjectRef {
    fn id(&self) -> Option<mnemo_types::Id>;
    fn slug(&self) -> &str;
    fn name(&self) -> &str;
}

pub trait PersonRef {
    fn id(&self) -> Option<mnemo_types::Id>;
    fn name(&self) -> &str;
}

impl ProjectRef for mnemo_types::Project {
    fn id(&self) -> Option<mnemo_types::Id> {
        Some(self.id)
    }
    fn slug(&self) -> &str {
        &self.slug
    }
    fn name(&self) -> &str {
        &self.name
    }
}

impl PersonRef for mnemo_types::Person {
    fn id(&self) -> Option<mnemo_types::Id> {
        Some(self.id)
    }
    fn name(&self) -> &str {
        &self.name
    }
}

fn tokenize(prompt: &str) -> Vec<String> {
    prompt
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

fn occurrence_confidence(tokens: &[String], needle: &str) -> f64 {
    let count = tokens.iter().filter(|t| t.as_str() == needle).count();
    (count as f64 * 0.5).min(1.0)
}

fn detect_intent(prompt: &str, tokens: &[String]) -> Intent {
    let trimmed = prompt.trim();
    if trimmed.ends_with('?') {
        return Intent::Question;
    }
    if let Some(first) = tokens.first() {
        if CONTINUATION_WORDS.contains(&first.as_str()) {
            return Intent::Continuation;
        }
        if IMPERATIVE_VERBS.contains(&first.as_str()) {
            return Intent::Command;
        }
    }
    Intent::Unknown
}

/// Holds compiled patterns so a long-lived process (the Worker's
/// per-process cache, §5) can reuse them across invocations instead
/// of recompiling per prompt.
pub struct Classifier {
    path_pattern: regex_lite::Regex,
}

impl Classifier {
    pub fn new() -> Result<Self, ClassifyError> {
        let path_pattern =
            regex_lite::Regex::new(PATH_PATTERN).map_err(|e| ClassifyError::BadPattern(e.to_string()))?;
        Ok(Self { path_pattern })
    }

    /// Classify `prompt` against already-fetched projects/people.
    pub fn classify<P: ProjectRef, Q: PersonRef>(&self, prompt: &str, projects: &[P], people: &[Q]) -> Signal {
        let tokens = tokenize(prompt);
        let token_set: HashSet<&str> = tokens.iter().map(|s| s.as_str()).collect();

        let mut projects_out = Vec::new();
        for project in projects {
            let slug = project.slug().to_lowercase();
            let name = project.name().to_lowercase();
            let hit = token_set.contains(slug.as_str())
                || (!name.is_empty() && name.split_whitespace().all(|w| token_set.contains(w)));
            if hit {
                let confidence = occurrence_confidence(&tokens, &slug).max(occurrence_confidence(&tokens, &name));
                projects_out.push(EntityMatch {
                    name: project.name().to_string(),
                    id: project.id(),
                    confidence: confidence.max(0.5),
                });
            }
        }

        let mut people_out = Vec::new();
        for person in people {
            let full = person.name().to_lowercase();
            let first = full.split_whitespace().next().unwrap_or_default();
            let full_hit = !full.is_empty() && full.split_whitespace().all(|w| token_set.contains(w));
            let first_hit = first.len() >= MIN_FIRST_NAME_LEN && token_set.contains(first);
            if full_hit || first_hit {
                let confidence = occurrence_confidence(&tokens, first).max(if full_hit { 1.0 } else { 0.5 });
                people_out.push(EntityMatch {
                    name: person.name().to_string(),
                    id: person.id(),
                    confidence,
                });
            }
        }

        let paths: Vec<String> = self
            .path_pattern
            .find_iter(prompt)
            .map(|m| m.as_str().to_string())
            .collect();

        let keywords: Vec<String> = {
            let mut seen = HashSet::new();
            tokens
                .iter()
                .filter(|t| t.len() >= 3 && !STOPWORDS.contains(&t.as_str()))
                .filter(|t| seen.insert((*t).clone()))
                .cloned()
                .collect()
        };

        let intent = detect_intent(prompt, &tokens);

        Signal {
            projects: projects_out,
            people: people_out,
            paths,
            keywords,
            has_code_fence: prompt.contains("```"),
            intent: Some(intent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemo_types::{Project, ProjectStatus, ProjectTier};

    fn project(name: &str, slug: &str) -> Project {
        Project {
            id: mnemo_types::Id::new_v4(),
            name: name.to_string(),
            slug: slug.to_string(),
            tier: ProjectTier::Simple,
            status: ProjectStatus::Active,
            mention_count: 0,
            last_activity: None,
            user_pinned: false,
            user_priority: None,
            user_deadline: None,
        }
    }

    #[test]
    fn s1_continue_simon_refactor_matches_project_and_continuation_intent() {
        let classifier = Classifier::new().unwrap();
        let projects = vec![project("simon", "simon")];
        let people: Vec<mnemo_types::Person> = vec![];

        let signal = classifier.classify("continue simon refactor", &projects, &people);

        assert_eq!(signal.projects.len(), 1);
        assert_eq!(signal.projects[0].name, "simon");
        assert_eq!(signal.intent, Some(Intent::Continuation));
    }

    #[test]
    fn extracts_absolute_path_with_extension() {
        let classifier = Classifier::new().unwrap();
        let signal = classifier.classify("fix the auth bug in /src/login.py", &Vec::<Project>::new(), &Vec::<mnemo_types::Person>::new());
        assert!(signal.paths.iter().any(|p| p.contains("login.py")));
        assert_eq!(signal.intent, Some(Intent::Command));
    }

    #[test]
    fn question_mark_yields_question_intent() {
        let classifier = Classifier::new().unwrap();
        let signal = classifier.classify("what is the status of simon?", &Vec::<Project>::new(), &Vec::<mnemo_types::Person>::new());
        assert_eq!(signal.intent, Some(Intent::Question));
    }

    #[test]
    fn no_match_yields_empty_signal_sections() {
        let classifier = Classifier::new().unwrap();
        let signal = classifier.classify("hello there", &Vec::<Project>::new(), &Vec::<mnemo_types::Person>::new());
        assert!(signal.projects.is_empty());
        assert!(signal.people.is_empty());
    }

    #[test]
    fn classification_of_large_corpus_is_well_within_budget() {
        let classifier = Classifier::new().unwrap();
        let projects: Vec<Project> = (0..2000).map(|i| project(&format!("proj{i}"), &format!("proj{i}"))).collect();
        let people: Vec<mnemo_types::Person> = Vec::new();

        let start = std::time::Instant::now();
        let _ = classifier.classify("continue proj42 refactor of /src/main.rs", &projects, &people);
        assert!(start.elapsed() < std::time::Duration::from_millis(500));
    }
}
