//! The `check` subcommand: load the content tree and report problems.
use colored::Colorize;
use tracing::{error, info};

use atelier::{ContentStore, Locale};

use crate::config::SiteConfig;

/// Load every content file and report what was found.
///
/// Returns the process exit code: `0` when the tree is clean, `1` when any
/// file failed to load.
pub fn run(config: &SiteConfig) -> i32 {
    let store = ContentStore::load(&config.content.dir);

    for locale in Locale::ALL {
        info!(
            name: "content",
            "{}: {} projects, {} posts",
            locale.as_str().bold(),
            store.projects(locale).len(),
            store.posts(locale).len()
        );
    }

    let issues = store.issues();
    if issues.is_empty() {
        info!(name: "content", "{}", "No problems found.".green());
        return 0;
    }

    for issue in issues {
        error!(name: "content", "{}", issue);
    }
    error!(
        name: "content",
        "{}",
        format!("{} file(s) failed to load", issues.len()).red().bold()
    );
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::ContentSection;
    use tempfile::tempdir;

    fn config_for(dir: &std::path::Path) -> SiteConfig {
        SiteConfig {
            content: ContentSection {
                dir: dir.to_path_buf(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_clean_tree_passes() {
        let dir = tempdir().unwrap();
        let portfolio = dir.path().join("en/portfolio");
        std::fs::create_dir_all(&portfolio).unwrap();
        std::fs::write(
            portfolio.join("alpha.md"),
            "---\ntitle: Alpha\nyear: 2024\n---\nBody.\n",
        )
        .unwrap();

        assert_eq!(run(&config_for(dir.path())), 0);
    }

    #[test]
    fn test_broken_file_fails() {
        let dir = tempdir().unwrap();
        let news = dir.path().join("sr/news");
        std::fs::create_dir_all(&news).unwrap();
        std::fs::write(
            news.join("bad.md"),
            "---\ntitle: [unterminated\n---\nBody.\n",
        )
        .unwrap();

        assert_eq!(run(&config_for(dir.path())), 1);
    }
}
