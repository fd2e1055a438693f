//! CLI output formatting for repository results.
//!
//! # Output Format
//!
//! ## Listing
//!
//! ```text
//! /photos (3 entries)
//! 001 album/
//! 002 landscape.jpg  182.4 KB
//! 003 notes.txt  13 B
//! ```
//!
//! Directories are recognised by a trailing `/`; sizes are only shown for
//! files.
//!
//! ## Image paths
//!
//! ```text
//! /photos (2 images)
//! 001 /photos/landscape.jpg
//! 002 /photos/portrait.jpg
//! ```
//!
//! ## Fetched images
//!
//! ```text
//! 001 landscape.jpg 640x480
//!     Source: /photos/landscape.jpg
//!     Output: out/001-landscape.jpg (41.2 KB)
//! ```
//!
//! # Architecture
//!
//! Each result kind has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::types::{EncodedArtifact, File};
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Human-readable byte count.
fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{} {}", n, one)
    } else {
        format!("{} {}", n, many)
    }
}

fn folder_label(folder: &str) -> &str {
    if folder.is_empty() { "/" } else { folder }
}

// ============================================================================
// Listings
// ============================================================================

/// Format a folder listing.
///
/// `is_dir` tells directories from files; the listing itself carries only
/// names and sizes.
pub fn format_listing(folder: &str, files: &[File], is_dir: impl Fn(&File) -> bool) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({})",
        folder_label(folder),
        plural(files.len(), "entry", "entries")
    )];
    for (i, file) in files.iter().enumerate() {
        if is_dir(file) {
            lines.push(format!("{} {}/", format_index(i + 1), file.name));
        } else {
            lines.push(format!(
                "{} {}  {}",
                format_index(i + 1),
                file.name,
                format_size(file.size)
            ));
        }
    }
    lines
}

/// Print a folder listing to stdout, checking directories against `root`.
pub fn print_listing(folder: &str, files: &[File], root: &Path) {
    let is_dir = |file: &File| root.join(file.path.trim_start_matches('/')).is_dir();
    for line in format_listing(folder, files, is_dir) {
        println!("{}", line);
    }
}

/// Format the image paths of a folder.
pub fn format_paths(folder: &str, paths: &[String]) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({})",
        folder_label(folder),
        plural(paths.len(), "image", "images")
    )];
    lines.extend(
        paths
            .iter()
            .enumerate()
            .map(|(i, path)| format!("{} {}", format_index(i + 1), path)),
    );
    lines
}

pub fn print_paths(folder: &str, paths: &[String]) {
    for line in format_paths(folder, paths) {
        println!("{}", line);
    }
}

// ============================================================================
// Fetched images
// ============================================================================

/// Format fetched images alongside the files they were written to.
///
/// `written` is parallel to `artifacts`.
pub fn format_artifacts(artifacts: &[EncodedArtifact], written: &[impl AsRef<Path>]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, (artifact, out)) in artifacts.iter().zip(written).enumerate() {
        lines.push(format!(
            "{} {} {}x{}",
            format_index(i + 1),
            artifact.name,
            artifact.width,
            artifact.height
        ));
        lines.push(format!("    Source: {}", artifact.source_path));
        lines.push(format!(
            "    Output: {} ({})",
            out.as_ref().display(),
            format_size(artifact.data.len() as u64)
        ));
    }
    lines
}

pub fn print_artifacts(artifacts: &[EncodedArtifact], written: &[impl AsRef<Path>]) {
    for line in format_artifacts(artifacts, written) {
        println!("{}", line);
    }
}
