//! Persistence of the shortcut binding set: a flat JSON map from action
//! name to binding. Loading never surfaces an error to the user; a
//! missing or unreadable file falls back to the built-in defaults.

use crate::ink::shortcuts::{self, ShortcutSet};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const SHORTCUTS_FILE_NAME: &str = "shortcuts.json";

pub fn shortcuts_path() -> Result<PathBuf> {
    let base = dirs_next::config_dir().context("locate user config directory")?;
    Ok(base.join("glasspen").join(SHORTCUTS_FILE_NAME))
}

/// Load the binding set. Corrupt or missing settings are discarded in
/// favour of defaults; actions missing from a valid file (e.g. written
/// by an older build) are filled in from defaults.
pub fn load(path: &Path) -> ShortcutSet {
    match try_load(path) {
        Ok(Some(set)) => merge_defaults(set),
        Ok(None) => shortcuts::default_bindings(),
        Err(err) => {
            tracing::warn!(
                ?err,
                path = %path.display(),
                "discarding unreadable shortcut settings, using defaults"
            );
            shortcuts::default_bindings()
        }
    }
}

fn try_load(path: &Path) -> Result<Option<ShortcutSet>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read shortcut settings file {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(None);
    }

    let set: ShortcutSet = serde_json::from_str(&content)
        .with_context(|| format!("deserialize shortcut settings file {}", path.display()))?;
    Ok(Some(set))
}

fn merge_defaults(mut set: ShortcutSet) -> ShortcutSet {
    for (action, binding) in shortcuts::default_bindings() {
        set.entry(action).or_insert(binding);
    }
    set
}

pub fn save(path: &Path, bindings: &ShortcutSet) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create settings folder {}", parent.display()))?;
    }

    let json =
        serde_json::to_string_pretty(bindings).context("serialize shortcut settings")?;
    std::fs::write(path, json)
        .with_context(|| format!("write shortcut settings file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ink::shortcuts::{Modifiers, ShortcutBinding};

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(SHORTCUTS_FILE_NAME);
        assert_eq!(load(&path), shortcuts::default_bindings());
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(SHORTCUTS_FILE_NAME);
        std::fs::write(&path, "{ not json").expect("write corrupt file");
        assert_eq!(load(&path), shortcuts::default_bindings());
    }

    #[test]
    fn saved_bindings_roundtrip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(SHORTCUTS_FILE_NAME);

        let mut set = shortcuts::default_bindings();
        set.insert(
            "undo".to_string(),
            ShortcutBinding::for_key("u", Modifiers::CTRL_SHIFT),
        );
        set.insert("clear".to_string(), ShortcutBinding::for_mouse(1, Modifiers::CTRL));

        save(&path, &set).expect("save bindings");
        assert_eq!(load(&path), set);
    }

    #[test]
    fn partial_file_is_merged_with_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(SHORTCUTS_FILE_NAME);
        std::fs::write(
            &path,
            r#"{ "undo": { "key": "u", "ctrl": true } }"#,
        )
        .expect("write partial file");

        let loaded = load(&path);
        assert_eq!(
            loaded.get("undo"),
            Some(&ShortcutBinding::for_key("u", Modifiers::CTRL))
        );
        // Everything the file omits comes from defaults.
        assert_eq!(
            loaded.get("redo"),
            Some(&ShortcutBinding::for_key("y", Modifiers::CTRL))
        );
        assert_eq!(loaded.len(), shortcuts::default_bindings().len());
    }

    #[test]
    fn unknown_actions_in_the_file_are_kept() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(SHORTCUTS_FILE_NAME);
        std::fs::write(&path, r#"{ "future-action": { "key": "j" } }"#)
            .expect("write file");

        let loaded = load(&path);
        assert!(loaded.contains_key("future-action"));
        assert_eq!(loaded.len(), shortcuts::default_bindings().len() + 1);
    }
}
