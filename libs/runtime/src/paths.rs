use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

/// Platform user directory used as the root for the default home dir.
fn user_base_dir() -> Result<PathBuf> {
    #[cfg(target_os = "windows")]
    let var = "APPDATA";
    #[cfg(not(target_os = "windows"))]
    let var = "HOME";

    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("environment variable {var} is not set"))
}

/// Expand a leading `~` and make the path absolute against the current directory.
fn expand(raw: &str) -> Result<PathBuf> {
    let expanded = if raw == "~" {
        user_base_dir()?
    } else if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        user_base_dir()?.join(rest)
    } else {
        PathBuf::from(raw)
    };

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        let cwd = std::env::current_dir().context("cannot read current directory")?;
        Ok(cwd.join(expanded))
    }
}

/// Resolve the application home directory.
///
/// `None` selects `<user base>/<default_subdir>`. When `create` is set the
/// directory is created if missing.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let dir = match configured {
        Some(raw) => expand(raw.trim())?,
        None => user_base_dir()?.join(default_subdir),
    };

    if create {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("cannot create home dir {}", dir.display()))?;
    }
    Ok(dir)
}

/// Join `file` onto `base_dir` unless it is already absolute.
pub fn resolve_under(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}
