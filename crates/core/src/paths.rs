//! Centralized path functions for all app storage locations.
//!
//! Single source of truth — eliminates ad-hoc `dirs::config_dir().join(...)`
//! scattered across crates.

use std::path::PathBuf;

/// App config root: `~/Library/Application Support/mnemo/` (macOS) or
/// `~/.config/mnemo/` (Linux).
pub fn app_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mnemo"))
}

/// Default config file path: `<app_config_dir>/config.toml` (§6 Configuration).
pub fn default_config_path() -> Option<PathBuf> {
    app_config_dir().map(|d| d.join("config.toml"))
}

/// Base directory for installed SKILL documents of a given scope
/// (§6 SKILL document format: `<base>/<scope>/skills/<name>/SKILL.md`).
pub fn skills_base_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("mnemo"))
}

/// Full path of the SKILL document for `name` at `scope`
/// (§6 SKILL document format).
pub fn skill_document_path(scope: mnemo_types::SkillScope, name: &str) -> Option<PathBuf> {
    let scope_dir = match scope {
        mnemo_types::SkillScope::Personal => "personal",
        mnemo_types::SkillScope::Project => "project",
    };
    skills_base_dir().map(|base| base.join(scope_dir).join("skills").join(name).join("SKILL.md"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_dir() {
        let dir = app_config_dir().expect("config dir resolves");
        assert!(dir.to_string_lossy().contains("mnemo"));
    }

    #[test]
    fn test_default_config_path() {
        let path = default_config_path().expect("config path resolves");
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn test_skills_base_dir() {
        let dir = skills_base_dir().expect("data dir resolves");
        assert!(dir.to_string_lossy().contains("mnemo"));
    }

    #[test]
    fn test_skill_document_path() {
        let path = skill_document_path(mnemo_types::SkillScope::Project, "deploy-checklist").expect("path resolves");
        let rendered = path.to_string_lossy();
        assert!(rendered.contains("project"));
        assert!(rendered.contains("deploy-checklist"));
        assert!(rendered.ends_with("SKILL.md"));
    }
}
