use crate::conf::types::PathsConfig;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathDecision {
    /// Canonical path to count under.
    Include(String),
    Exclude(ExcludeReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExcludeReason {
    EmptyPath,
    StaticAsset,
    NotIncluded,
}

/// Path canonicalization rules, built once from the `paths` config section.
#[derive(Debug, Clone)]
pub struct PathRules {
    include_order: Vec<String>,
    include: HashSet<String>,
    aliases: HashMap<String, String>,
    strip_query_string: bool,
    ignore_static_assets: bool,
    ignore_extensions: HashSet<String>,
}

impl PathRules {
    /// Expects `ignore_extensions` already normalized (see
    /// [`crate::conf::types::normalize_extensions`]).
    pub fn from_config(cfg: &PathsConfig) -> Self {
        Self {
            include_order: cfg.include_exact.clone(),
            include: cfg.include_exact.iter().cloned().collect(),
            aliases: cfg
                .aliases
                .iter()
                .map(|(from, to)| (from.clone(), to.clone()))
                .collect(),
            strip_query_string: cfg.strip_query_string,
            ignore_static_assets: cfg.ignore_static_assets,
            ignore_extensions: cfg.ignore_extensions.iter().cloned().collect(),
        }
    }

    /// Included paths in configured order.
    pub fn included(&self) -> &[String] {
        &self.include_order
    }

    /// Map a raw request path to the path it is counted under.
    ///
    /// In order: strip the query string, drop ignored static assets, apply
    /// one alias hop, then require membership in the include list.
    pub fn normalize(&self, raw_path: &str) -> PathDecision {
        if raw_path.is_empty() {
            return PathDecision::Exclude(ExcludeReason::EmptyPath);
        }

        let mut path = raw_path;
        if self.strip_query_string
            && let Some((before, _)) = path.split_once('?')
        {
            path = before;
        }

        if self.ignore_static_assets
            && let Some(ext) = extension(path)
            && self.ignore_extensions.contains(&ext)
        {
            return PathDecision::Exclude(ExcludeReason::StaticAsset);
        }

        let path = self.aliases.get(path).map(String::as_str).unwrap_or(path);

        if self.include.contains(path) {
            PathDecision::Include(path.to_string())
        } else {
            PathDecision::Exclude(ExcludeReason::NotIncluded)
        }
    }
}

/// Lower-cased extension of the last path segment, dot included.
///
/// Leading dots of the segment do not start an extension, so `/.well-known`
/// has none.
fn extension(path: &str) -> Option<String> {
    let segment = path.rsplit('/').next().unwrap_or(path);
    let name = segment.trim_start_matches('.');
    let dot = name.rfind('.')?;
    Some(name[dot..].to_lowercase())
}
