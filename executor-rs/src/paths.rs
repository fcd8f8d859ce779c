// executor-rs/src/paths.rs
// Maps the filename reported by a crashing process onto a path inside the
// cloned repository.

/// Normalizes separators, drops a leading `/`, and cuts everything up to and
/// including `<repo_name>/` when the reported path runs through the repo.
/// A path ending at `<repo_name>/` keeps its last non-empty segment instead.
pub fn repo_relative_path(filename: &str, repo_name: Option<&str>) -> String {
    let normalized = filename.replace('\\', "/");
    let trimmed = normalized.trim_start_matches('/');

    if let Some(name) = repo_name.filter(|n| !n.is_empty()) {
        let marker = format!("{}/", name);
        if let Some(pos) = trimmed.find(&marker) {
            let relative = &trimmed[pos + marker.len()..];
            if !relative.is_empty() {
                return relative.to_string();
            }
            return trimmed.rsplit('/').find(|s| !s.is_empty()).unwrap_or(trimmed).to_string();
        }
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_name_unchanged() {
        assert_eq!(repo_relative_path("app.py", Some("auto-ops-demo-python")), "app.py");
    }

    #[test]
    fn windows_path_inside_repo() {
        assert_eq!(
            repo_relative_path(
                r"C:\work\auto-ops-demo-python\shop\checkout.py",
                Some("auto-ops-demo-python")
            ),
            "shop/checkout.py"
        );
    }

    #[test]
    fn path_ending_at_repo_keeps_last_segment() {
        assert_eq!(
            repo_relative_path("/home/dev/auto-ops-demo-python/", Some("auto-ops-demo-python")),
            "auto-ops-demo-python"
        );
    }

    #[test]
    fn absolute_path_outside_repo() {
        assert_eq!(repo_relative_path("/srv/app/main.py", Some("demo")), "srv/app/main.py");
        assert_eq!(repo_relative_path("/srv/app/main.py", None), "srv/app/main.py");
    }
}
