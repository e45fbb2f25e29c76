//! @ai:module:intent Shell-style path helpers: tilde and variable expansion, normalization
//! @ai:module:layer infrastructure
//! @ai:module:public_api expand_user, expand_vars, expand_path, normalize_path, join_path
//! @ai:module:stateless true

use regex::{Captures, Regex};
use std::sync::OnceLock;

fn var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$(\w+|\{[^}]*\})").expect("valid variable pattern"))
}

/// @ai:intent Replace a leading `~` or `~/` with the home directory
/// @ai:effects env:read
pub fn expand_user(path: &str) -> String {
    if path != "~" && !path.starts_with("~/") {
        return path.to_string();
    }

    match std::env::var("HOME") {
        Ok(home) => format!("{}{}", home.trim_end_matches('/'), &path[1..]),
        Err(_) => path.to_string(),
    }
}

/// @ai:intent Replace `$NAME` and `${NAME}` with environment values
/// @ai:post unknown variables are left untouched
/// @ai:effects env:read
pub fn expand_vars(text: &str) -> String {
    if !text.contains('$') {
        return text.to_string();
    }

    var_pattern()
        .replace_all(text, |caps: &Captures| {
            let name = caps[1].trim_start_matches('{').trim_end_matches('}');
            std::env::var(name).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

/// @ai:intent Expand tilde first, then environment variables
/// @ai:effects env:read
pub fn expand_path(path: &str) -> String {
    expand_vars(&expand_user(path))
}

/// @ai:intent Join a relative path onto a base directory; absolute paths win
/// @ai:effects pure
pub fn join_path(base: &str, path: &str) -> String {
    if base.is_empty() || path.starts_with('/') {
        path.to_string()
    } else if base.ends_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// @ai:intent Collapse redundant separators and `.`/`..` components lexically
/// @ai:post `A/foo/../B` becomes `A/B`; an empty result becomes `.`
/// @ai:effects pure
pub fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for component in path.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");

    if absolute {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}
