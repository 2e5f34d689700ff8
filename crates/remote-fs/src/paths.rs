//! Remote path helpers

use tracing::debug;

use crate::session::RemoteFs;

/// Normalize a remote path: empty becomes `.`, trailing slashes are dropped
/// (root stays `/`), and runs of `/` collapse to one.
pub fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let trimmed = path.trim_end_matches('/');
    let trimmed = if trimmed.is_empty() { "/" } else { trimmed };

    let mut normalized = String::with_capacity(trimmed.len());
    let mut previous_slash = false;
    for c in trimmed.chars() {
        if c == '/' && previous_slash {
            continue;
        }
        previous_slash = c == '/';
        normalized.push(c);
    }
    normalized
}

/// Directory part of a remote path (`/a/b` -> `/a`, `/a` -> `/`, `a` -> ``)
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Last component of a remote or local path
pub fn file_name(path: &str) -> &str {
    path.rsplit(&['/', '\\'][..]).next().unwrap_or(path)
}

/// Every prefix of `dir`, shortest first (`/a/b` -> [`/a`, `/a/b`])
pub fn ancestor_chain(dir: &str) -> Vec<String> {
    let absolute = dir.starts_with('/');
    let mut current = String::new();
    let mut chain = Vec::new();

    for part in dir.split('/').filter(|p| !p.is_empty() && *p != ".") {
        if absolute || !current.is_empty() {
            current.push('/');
        }
        current.push_str(part);
        chain.push(current.clone());
    }
    chain
}

/// Create any missing parent directories of `remote_path`.
///
/// Individual `mkdir` failures are ignored; the following transfer reports
/// the real problem if the directory still does not exist.
pub fn ensure_parent_dirs(fs: &mut dyn RemoteFs, remote_path: &str) {
    let parent = parent_dir(remote_path);
    if parent.is_empty() || parent == "/" || fs.is_dir(parent) {
        return;
    }

    for dir in ancestor_chain(parent) {
        if fs.is_dir(&dir) {
            continue;
        }
        if let Err(e) = fs.make_dir(&dir) {
            debug!("Could not create {}: {}", dir, e);
        }
    }
}
