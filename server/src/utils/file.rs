//! Path helpers for config and database locations

use std::path::PathBuf;

/// Expand `~` and make relative paths absolute against the current directory
///
/// ```text
/// expand_path("~/.usermanagement/usermanagement.json") // -> /home/user/.usermanagement/...
/// expand_path("conf/usermanagement.json")              // -> /current/dir/conf/...
/// expand_path("/etc/usermanagement.json")              // unchanged
/// ```
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();

    let expanded = match path {
        "" => PathBuf::from("."),
        "~" => dirs::home_dir().unwrap_or_else(|| PathBuf::from(path)),
        _ => match (path.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(path),
        },
    };

    if expanded.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(&expanded))
            .unwrap_or(expanded)
    } else {
        expanded
    }
}

/// Expand a `~` home prefix inside a `sqlite://` URL
///
/// Other URLs, including `sqlite::memory:`, are returned unchanged.
pub fn expand_sqlite_url(url: &str) -> String {
    match url.strip_prefix("sqlite://") {
        Some(rest) if rest == "~" || rest.starts_with("~/") => {
            let (path, query) = match rest.split_once('?') {
                Some((path, query)) => (path, Some(query)),
                None => (rest, None),
            };
            let expanded = expand_path(path);
            match query {
                Some(query) => format!("sqlite://{}?{}", expanded.display(), query),
                None => format!("sqlite://{}", expanded.display()),
            }
        }
        _ => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_path_absolute() {
        assert_eq!(
            expand_path("/etc/usermanagement.json"),
            PathBuf::from("/etc/usermanagement.json")
        );
    }

    #[test]
    fn test_expand_path_relative_is_absolute() {
        let result = expand_path("conf/usermanagement.json");
        assert!(result.is_absolute());
        assert!(result.ends_with("conf/usermanagement.json"));
    }

    #[test]
    fn test_expand_path_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~"), home);
            assert_eq!(expand_path("~/.usermanagement"), home.join(".usermanagement"));
        }
    }

    #[test]
    fn test_expand_path_empty_is_cwd() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(expand_path("  "), cwd.join("."));
    }

    #[test]
    fn test_expand_sqlite_url_tilde() {
        if let Some(home) = dirs::home_dir() {
            let expected = format!("sqlite://{}?mode=rwc", home.join("users.db").display());
            assert_eq!(expand_sqlite_url("sqlite://~/users.db?mode=rwc"), expected);
        }
    }

    #[test]
    fn test_expand_sqlite_url_passthrough() {
        assert_eq!(expand_sqlite_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            expand_sqlite_url("sqlite://usermanagement.db"),
            "sqlite://usermanagement.db"
        );
        assert_eq!(expand_sqlite_url("sqlite:///var/db/u.db"), "sqlite:///var/db/u.db");
    }
}
