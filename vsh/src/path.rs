//! Path resolution against the current directory.
//!
//! Command arguments are only absolutized ([`resolve`]); `cd` additionally
//! collapses `.`, `..` and repeated separators ([`change_dir`]).

/// Absolutizes `path` against `cwd` by concatenation. An absent or empty path
/// means `cwd` itself; an absolute path is returned untouched.
pub fn resolve(path: Option<&str>, cwd: &str) -> String {
    match path {
        None | Some("") => cwd.to_string(),
        Some(p) if p.starts_with('/') => p.to_string(),
        Some(p) => format!("{cwd}/{p}"),
    }
}

/// Normalizes an absolute path: drops empty and `.` segments and lets `..`
/// pop the previous segment. Popping past the root is a no-op.
pub fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    format!("/{}", parts.join("/"))
}

/// Computes the directory `cd target` moves to from `cwd`.
pub fn change_dir(cwd: &str, target: Option<&str>) -> String {
    normalize(&resolve(target, cwd))
}
