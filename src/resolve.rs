//! Logical path → filesystem path resolution.
//!
//! Clients address files with *logical* paths: `/`-separated, rooted at the
//! shared tree (`/holidays/2023/IMG_0042.jpg`). A missing leading `/` is
//! tolerated. Resolution is lexical first (`.` dropped, `..` popped, never
//! above the root) and then checked against the canonical filesystem, so a
//! symlink inside the tree cannot lead outside it either.

use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("{path} escapes the shared root")]
    OutsideRoot { path: String },
    #[error("{path} not found: {source}")]
    Missing {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl ResolveError {
    /// The logical path that failed to resolve.
    pub fn path(&self) -> &str {
        match self {
            Self::OutsideRoot { path } | Self::Missing { path, .. } => path,
        }
    }
}

/// Canonical logical form of a client path.
///
/// Always starts with `/`, never ends with one (except the root itself),
/// contains no `.`/`..` segments and no empty segments. Returns `None` when
/// the path climbs above the root.
///
/// ```
/// # use lan_file_distributor::resolve::normalize_logical;
/// assert_eq!(normalize_logical("a/./b//c.jpg").as_deref(), Some("/a/b/c.jpg"));
/// assert_eq!(normalize_logical("/a/../b.jpg").as_deref(), Some("/b.jpg"));
/// assert_eq!(normalize_logical("../etc/passwd"), None);
/// ```
pub fn normalize_logical(path: &str) -> Option<String> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split(is_separator) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            s => segments.push(s),
        }
    }
    Some(format!("/{}", segments.join("/")))
}

/// Segment separator of logical paths. Windows also accepts `\`; elsewhere
/// a backslash is an ordinary file-name character.
fn is_separator(c: char) -> bool {
    c == '/' || (cfg!(windows) && c == '\\')
}

/// Resolve a logical path to an existing location under `root`.
///
/// Fails with [`ResolveError::OutsideRoot`] for traversal attempts and with
/// [`ResolveError::Missing`] when nothing exists at the resolved location.
pub fn resolve(root: &Path, logical: &str) -> Result<PathBuf, ResolveError> {
    let normalized = normalize_logical(logical).ok_or_else(|| ResolveError::OutsideRoot {
        path: logical.to_string(),
    })?;

    let mut candidate = root.to_path_buf();
    for component in Path::new(normalized.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => candidate.push(part),
            // drive prefixes and the like have no business in a logical path
            _ => {
                return Err(ResolveError::OutsideRoot {
                    path: logical.to_string(),
                });
            }
        }
    }

    let missing = |source| ResolveError::Missing {
        path: normalized.clone(),
        source,
    };
    let canonical_root = root.canonicalize().map_err(missing)?;
    let canonical = candidate.canonicalize().map_err(missing)?;
    if !canonical.starts_with(&canonical_root) {
        return Err(ResolveError::OutsideRoot { path: normalized });
    }
    Ok(candidate)
}

/// Join a logical folder and an entry name into a logical path.
pub fn join_logical(folder: &str, name: &str) -> String {
    let folder = normalize_logical(folder).unwrap_or_else(|| "/".to_string());
    if folder == "/" {
        format!("/{name}")
    } else {
        format!("{folder}/{name}")
    }
}
