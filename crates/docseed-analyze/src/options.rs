use std::collections::BTreeSet;

use docseed_core::{ID_PATH, VERSION_PATH};

/// Options that control how analysis behaves.
#[derive(Debug, Clone, Default)]
pub struct AnalyzerOptions {
    /// Additional path names to leave out, at every nesting level.
    pub exclude: BTreeSet<String>,
}

impl AnalyzerOptions {
    pub fn excluding<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exclude: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Reserved store paths unioned with the user exclusions.
    pub(crate) fn excluded_paths(&self) -> BTreeSet<String> {
        let mut paths = self.exclude.clone();
        paths.insert(ID_PATH.to_string());
        paths.insert(VERSION_PATH.to_string());
        paths
    }
}
