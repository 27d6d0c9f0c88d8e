//! Project-relative paths in rendered output
//!
//! Position comments carry the file a model was defined in. Absolute paths
//! under the project root are rewritten so the output does not depend on
//! where the project is checked out.

use std::borrow::Cow;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

/// Resolve the root: the configured one, else the process working directory
pub fn project_root(configured: Option<&Path>) -> Option<PathBuf> {
    match configured {
        Some(root) => Some(root.to_path_buf()),
        None => std::env::current_dir().ok(),
    }
}

/// Strip every occurrence of `<root>/` from the text
pub fn relativize<'a>(text: &'a str, root: Option<&Path>) -> Cow<'a, str> {
    let Some(root) = project_root(root) else {
        return Cow::Borrowed(text);
    };

    let root = root.to_string_lossy();
    let root = root.trim_end_matches(MAIN_SEPARATOR);
    if root.is_empty() {
        return Cow::Borrowed(text);
    }

    let prefix = format!("{root}{MAIN_SEPARATOR}");
    if text.contains(&prefix) {
        Cow::Owned(text.replace(&prefix, ""))
    } else {
        Cow::Borrowed(text)
    }
}
