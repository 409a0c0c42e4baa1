use crate::types::{FloodError, FloodResult};
use regex::{Regex, RegexBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Depth used when the caller does not limit the search
pub const DEFAULT_SEARCH_DEPTH: usize = 20;

/// Kind of directory entry a search accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Folder,
    All,
}

/// Options for [`find`]
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    /// Directory levels below the root to look into (1 = direct children)
    pub depth: usize,
    pub kind: EntryKind,
    pub case_sensitive: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            depth: DEFAULT_SEARCH_DEPTH,
            kind: EntryKind::All,
            case_sensitive: false,
        }
    }
}

impl SearchOptions {
    pub fn with_depth(depth: usize) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }

    pub fn kind(mut self, kind: EntryKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }
}

/// Compile a search pattern; `*` is a wildcard, everything else is regex
pub fn compile_pattern(pattern: &str, case_sensitive: bool) -> FloodResult<Regex> {
    let expanded = pattern.replace('*', ".*");
    Ok(RegexBuilder::new(&expanded)
        .case_insensitive(!case_sensitive)
        .build()?)
}

/// Find files and/or directories whose name matches `pattern` below `root`.
///
/// Matching is an unanchored search against the entry name. Results are
/// sorted by path. An empty result is reported as [`FloodError::NotFound`].
pub fn find<P: AsRef<Path>>(
    pattern: &str,
    root: P,
    options: SearchOptions,
) -> FloodResult<Vec<PathBuf>> {
    let root = root.as_ref();
    let regex = compile_pattern(pattern, options.case_sensitive)?;

    let mut result = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .min_depth(1)
        .max_depth(options.depth);

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::debug!("Skipping unreadable entry below {}: {}", root.display(), e);
                continue;
            }
        };

        let is_dir = entry.file_type().is_dir();
        match options.kind {
            EntryKind::File if is_dir => continue,
            EntryKind::Folder if !is_dir => continue,
            _ => {}
        }

        if regex.is_match(&entry.file_name().to_string_lossy()) {
            result.push(entry.into_path());
        }
    }

    if result.is_empty() {
        return Err(FloodError::NotFound {
            pattern: pattern.to_string(),
            path: root.to_path_buf(),
        });
    }

    result.sort();
    Ok(result)
}

/// Like [`find`] but only returns the first match
pub fn find_single<P: AsRef<Path>>(
    pattern: &str,
    root: P,
    options: SearchOptions,
) -> FloodResult<PathBuf> {
    let mut matches = find(pattern, root, options)?;
    Ok(matches.swap_remove(0))
}
