//! @ai:module:intent Expand file-set declarations into concrete work items
//! @ai:module:layer application
//! @ai:module:public_api FileSetDecl, resolve_file_sets, file_list, glob
//! @ai:module:depends_on paths, definition
//! @ai:module:stateless true

use crate::definition::{OptionPair, WorkItem};
use crate::paths::{expand_path, join_path, normalize_path};
use globset::GlobBuilder;
use serde::{Deserialize, Serialize};
use std::path::Path;
use walkdir::WalkDir;

/// @ai:intent One `sourcefiles` block of a benchmark definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileSetDecl {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub includesfile: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default, rename = "option")]
    pub options: Vec<OptionPair>,
}

/// @ai:intent Resolve file-set blocks in declaration order, pairing files with block options
/// @ai:post no deduplication; excludes remove exact post-expansion matches only
/// @ai:effects fs:read
pub fn resolve_file_sets(decls: &[FileSetDecl]) -> Vec<WorkItem> {
    let mut items = Vec::new();

    for decl in decls {
        let mut files = Vec::new();

        for pattern in &decl.include {
            files.extend(file_list(pattern, ""));
        }

        for list_pattern in &decl.includesfile {
            for list_file in file_list(list_pattern, "") {
                files.extend(read_list_file(&list_file));
            }
        }

        for pattern in &decl.exclude {
            for excluded in file_list(pattern, "") {
                files.retain(|file| file != &excluded);
            }
        }

        items.extend(files.into_iter().map(|file| WorkItem {
            file,
            options: decl.options.clone(),
        }));
    }

    items
}

/// @ai:intent Read a list of file patterns, resolving each relative to the list file
/// @ai:effects fs:read
fn read_list_file(list_file: &str) -> Vec<String> {
    let content = match std::fs::read_to_string(list_file) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Cannot read file list {:?}: {}", list_file, e);
            return Vec::new();
        }
    };

    let dir = dirname(list_file);

    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with("//"))
        .flat_map(|line| file_list(line, dir))
        .collect()
}

/// @ai:intent Expand one pattern (variables, tilde, wildcards) into a sorted file list
/// @ai:pre base is empty or the directory the pattern is relative to
/// @ai:post falls back to the bare pattern when nothing matched relative to base
/// @ai:effects fs:read, env:read
pub fn file_list(pattern: &str, base: &str) -> Vec<String> {
    let short = normalize_path(&join_path(base, pattern));
    let expanded = expand_path(&short);

    let mut files = glob(&expanded);

    if !files.is_empty() {
        files.sort();
    }

    if expanded != short {
        tracing::debug!(
            "Expanded tilde and/or shell variables in expression {:?} to {:?}.",
            short,
            expanded
        );
    }

    if files.is_empty() {
        if base.is_empty() {
            tracing::warn!("No files found matching {:?}.", short);
        } else {
            tracing::warn!(
                "Perhaps old or invalid test-set. Trying fallback for {:?}.",
                pattern
            );
            files = file_list(pattern, "");

            if !files.is_empty() {
                tracing::warn!("Fallback has found some files for {:?}.", pattern);
            }
        }
    }

    files
}

/// @ai:intent Shell-style wildcard expansion of one path expression
/// @ai:post literal expressions yield themselves iff the path exists; order unspecified
/// @ai:effects fs:read
pub fn glob(pattern: &str) -> Vec<String> {
    if !has_magic(pattern) {
        return if Path::new(pattern).symlink_metadata().is_ok() {
            vec![pattern.to_string()]
        } else {
            Vec::new()
        };
    }

    let (dir, name) = split_last(pattern);

    let dirs = if dir.is_empty() {
        vec![String::new()]
    } else if has_magic(dir) {
        glob(dir)
    } else {
        vec![dir.to_string()]
    };

    let mut matches = Vec::new();

    for dir in dirs {
        if has_magic(name) {
            matches.extend(
                match_in_dir(&dir, name)
                    .into_iter()
                    .map(|entry| join_path(&dir, &entry)),
            );
        } else {
            let candidate = join_path(&dir, name);

            if Path::new(&candidate).symlink_metadata().is_ok() {
                matches.push(candidate);
            }
        }
    }

    matches
}

/// @ai:intent List directory entries whose name matches one wildcard component
/// @ai:effects fs:read
fn match_in_dir(dir: &str, component: &str) -> Vec<String> {
    let matcher = match GlobBuilder::new(component)
        .literal_separator(true)
        .backslash_escape(true)
        .build()
    {
        Ok(glob) => glob.compile_matcher(),
        Err(e) => {
            tracing::debug!("Invalid wildcard {:?}: {}", component, e);
            return Vec::new();
        }
    };

    let root = if dir.is_empty() { "." } else { dir };
    let include_hidden = component.starts_with('.');

    WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| include_hidden || !name.starts_with('.'))
        .filter(|name| matcher.is_match(name.as_str()))
        .collect()
}

fn has_magic(text: &str) -> bool {
    text.contains(['*', '?', '['])
}

fn split_last(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(0) => ("/", &path[1..]),
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("", path),
    }
}

fn dirname(path: &str) -> &str {
    split_last(path).0
}
