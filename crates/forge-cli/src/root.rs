use std::path::{Path, PathBuf};

/// Resolve the project root.
///
/// Priority:
/// 1. `--root` flag / `FORGE_ROOT` env var (passed in as `explicit`)
/// 2. Nearest ancestor of `cwd` containing `.forge/`
/// 3. Nearest ancestor of `cwd` containing `.git/`
/// 4. `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    resolve_from(&cwd)
}

fn resolve_from(start: &Path) -> PathBuf {
    find_ancestor_with(start, forge_core::paths::FORGE_DIR)
        .or_else(|| find_ancestor_with(start, ".git"))
        .unwrap_or_else(|| start.to_path_buf())
}

fn find_ancestor_with(start: &Path, marker: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(marker).is_dir())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        let result = resolve_root(Some(dir.path()));
        assert_eq!(result, dir.path());
    }

    #[test]
    fn finds_forge_dir_above_cwd() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".forge")).unwrap();
        let deep = dir.path().join("src/deep");
        std::fs::create_dir_all(&deep).unwrap();
        assert_eq!(resolve_from(&deep), dir.path());
    }

    #[test]
    fn forge_dir_beats_git_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();
        let project = dir.path().join("project");
        std::fs::create_dir_all(project.join(".forge")).unwrap();
        let deep = project.join("src");
        std::fs::create_dir_all(&deep).unwrap();
        assert_eq!(resolve_from(&deep), project);
    }

    #[test]
    fn falls_back_to_git_then_start() {
        let dir = TempDir::new().unwrap();
        let deep = dir.path().join("a/b");
        std::fs::create_dir_all(&deep).unwrap();
        std::fs::create_dir_all(dir.path().join("a/.git")).unwrap();
        assert_eq!(resolve_from(&deep), dir.path().join("a"));

        let bare = TempDir::new().unwrap();
        // A temp dir may itself live under a git checkout; only assert when it doesn't.
        if find_ancestor_with(bare.path(), ".git").is_none()
            && find_ancestor_with(bare.path(), ".forge").is_none()
        {
            assert_eq!(resolve_from(bare.path()), bare.path());
        }
    }
}
