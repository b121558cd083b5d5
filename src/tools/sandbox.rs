//! Working-directory confinement shared by every built-in tool.
//!
//! Resolution is lexical: `root` and `root/relative` are made absolute and
//! their `.`/`..` segments collapsed without touching the filesystem, so the
//! check also covers paths that do not exist yet (write targets).

use std::path::{Component, Path, PathBuf};

use super::error::ToolError;

/// Resolves `relative` against `root` and rejects anything that lands outside it.
///
/// Accepts the root itself or any descendant. `action` names the operation in
/// the error message (`"read"`, `"list"`, ...).
pub fn resolve_within(
    root: &Path,
    relative: &str,
    action: &'static str,
) -> Result<PathBuf, ToolError> {
    let root = absolute_root(root)?;
    let target = normalize(&root.join(relative));

    // Path::starts_with compares whole components, so "/work-other" is not
    // inside "/work".
    if target.starts_with(&root) {
        Ok(target)
    } else {
        Err(ToolError::OutsideRoot {
            action,
            path: relative.to_string(),
        })
    }
}

/// Makes `root` absolute (against the process cwd) and normalized.
pub fn absolute_root(root: &Path) -> Result<PathBuf, ToolError> {
    let absolute = if root.is_absolute() {
        root.to_path_buf()
    } else {
        std::env::current_dir()?.join(root)
    };
    Ok(normalize(&absolute))
}

/// Collapses `.` and `..` segments lexically. `..` never climbs above the
/// filesystem root.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}
