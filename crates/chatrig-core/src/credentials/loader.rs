//! Priority-ordered credential loading.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::key::{CredentialKey, KeyName, MergeRule};
use super::map::CredentialMap;
use super::parser;
use crate::paths::StackPaths;

/// One credential file. Lower `priority` wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialSource {
    pub path: PathBuf,
    pub priority: usize,
}

/// Reads credential sources in priority order into a [`CredentialMap`].
#[derive(Debug, Clone)]
pub struct CredentialLoader {
    sources: Vec<CredentialSource>,
}

impl CredentialLoader {
    /// Build a loader over `paths`, highest priority first.
    pub fn new(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        let sources = paths
            .into_iter()
            .enumerate()
            .map(|(priority, path)| CredentialSource { path, priority })
            .collect();
        Self { sources }
    }

    /// The standard chain: explicit override, user secrets file, legacy dotfile.
    pub fn for_stack(paths: &StackPaths, explicit: Option<&Path>) -> Self {
        let chain = explicit
            .map(Path::to_path_buf)
            .into_iter()
            .chain(std::iter::once(paths.user_secrets.clone()))
            .chain(paths.legacy_secrets.clone());
        Self::new(chain)
    }

    pub fn sources(&self) -> &[CredentialSource] {
        &self.sources
    }

    /// Read every source and merge them.
    ///
    /// Missing or unreadable files are skipped; having no credentials at all
    /// is a valid configuration.
    pub fn load(&self) -> CredentialMap {
        let mut map = CredentialMap::new();
        for source in &self.sources {
            let Some(content) = read_source(&source.path) else {
                continue;
            };
            let accepted = merge_source(&mut map, &content);
            debug!(
                path = %source.path.display(),
                priority = source.priority,
                accepted,
                "Read credential source"
            );
        }
        map
    }
}

fn read_source(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Skipping credential source");
            None
        }
    }
}

/// Values one file provides, after canonical-over-alias resolution.
#[derive(Default)]
struct SourceValues {
    canonical: BTreeMap<CredentialKey, String>,
    alias: BTreeMap<CredentialKey, String>,
}

impl SourceValues {
    fn from_content(content: &str) -> Self {
        let mut values = Self::default();
        for assignment in parser::parse(content) {
            if assignment.value.is_empty() {
                continue;
            }
            let Some((key, kind)) = CredentialKey::from_name(&assignment.key) else {
                continue;
            };
            let slot = match kind {
                KeyName::Canonical => &mut values.canonical,
                KeyName::Alias => &mut values.alias,
            };
            // First occurrence inside a file wins, same as across files.
            slot.entry(key).or_insert(assignment.value);
        }
        values
    }

    fn resolved(&self, key: CredentialKey) -> Option<&str> {
        self.canonical
            .get(&key)
            .or_else(|| self.alias.get(&key))
            .map(String::as_str)
    }
}

/// Merge one file into `map`, returning how many keys it contributed.
fn merge_source(map: &mut CredentialMap, content: &str) -> usize {
    let values = SourceValues::from_content(content);
    let mut accepted = 0;

    for key in CredentialKey::ALL {
        if key.merge_rule() == MergeRule::FirstNonEmpty
            && let Some(value) = values.resolved(key)
            && map.insert_if_absent(key, value)
        {
            accepted += 1;
        }
    }

    let positional = [CredentialKey::OpenAiApiBaseUrls, CredentialKey::OpenAiApiKeys];
    let pair_resolved = positional.iter().any(|k| map.contains(*k));
    let pair_offered = positional.iter().any(|k| values.resolved(*k).is_some());
    if !pair_resolved && pair_offered {
        for key in positional {
            if let Some(value) = values.resolved(key)
                && map.insert_if_absent(key, value)
            {
                accepted += 1;
            }
        }
    }

    accepted
}
