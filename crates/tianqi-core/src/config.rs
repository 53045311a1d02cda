//! Dashboard configuration: defaults, optional TOML file, then `TIANQI__*` environment.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | bind_addr | 127.0.0.1:8000 | Gateway listen address. |
//! | data_root | ./data | Directory the relative candidate bases resolve against. |
//! | data_bases | ["../", "./", "/"] | Candidate bases probed in order. `http(s)://` entries are fetched remotely. |
//! | theme | pixel | `pixel` or `neon`. |
//! | title | TIANQI | Page title. |
//! | layout.* | true | Optional sections: history, tag_cloud, achievements, category_tabs, charts. |
//! | omit_containers | [] | Container ids the page layout leaves out. |

use crate::theme::Theme;
use crate::view::{Layout, LayoutToggles};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_PATH: &str = "config/dashboard";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub bind_addr: String,
    pub data_root: String,
    pub data_bases: Vec<String>,
    #[serde(default)]
    pub theme: Theme,
    pub title: String,
    #[serde(default)]
    pub layout: LayoutToggles,
    #[serde(default)]
    pub omit_containers: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            data_root: "./data".to_string(),
            data_bases: default_bases(),
            theme: Theme::default(),
            title: "TIANQI".to_string(),
            layout: LayoutToggles::default(),
            omit_containers: Vec::new(),
        }
    }
}

fn default_bases() -> Vec<String> {
    vec!["../".to_string(), "./".to_string(), "/".to_string()]
}

impl DashboardConfig {
    /// Load config. Precedence: env `TIANQI__*` > file (`TIANQI_CONFIG` or `config/dashboard.toml`) > defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("TIANQI_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Path::new(&config_path))
    }

    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        let builder = config::Config::builder()
            .set_default("bind_addr", defaults.bind_addr)?
            .set_default("data_root", defaults.data_root)?
            .set_default("data_bases", defaults.data_bases)?
            .set_default("theme", defaults.theme.name())?
            .set_default("title", defaults.title)?;

        let with_ext = path.with_extension("toml");
        let builder = if path.is_file() {
            builder.add_source(config::File::from(path))
        } else if with_ext.is_file() {
            builder.add_source(config::File::from(with_ext.as_path()))
        } else {
            builder
        };

        builder
            .add_source(
                config::Environment::with_prefix("TIANQI")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("data_bases")
                    .with_list_parse_key("omit_containers")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Candidate bases resolved against `data_root`. Remote URLs pass through;
    /// `/` means `data_root` itself, relative entries join onto it.
    pub fn resolved_bases(&self) -> Vec<String> {
        let root = PathBuf::from(&self.data_root);
        self.data_bases
            .iter()
            .map(|base| {
                if base.starts_with("http://") || base.starts_with("https://") {
                    base.clone()
                } else {
                    let rel = base.trim_start_matches('/');
                    root.join(rel).to_string_lossy().into_owned()
                }
            })
            .collect()
    }

    pub fn layout(&self) -> Layout {
        Layout::new(self.layout).without(self.omit_containers.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            "theme = \"neon\"\ntitle = \"Test Board\"\ndata_bases = [\"./unified/\"]\n[layout]\ntag_cloud = false"
        )
        .unwrap();

        let cfg = DashboardConfig::load_from(&path).unwrap();
        assert_eq!(cfg.theme, Theme::Neon);
        assert_eq!(cfg.title, "Test Board");
        assert_eq!(cfg.data_bases, vec!["./unified/".to_string()]);
        assert!(!cfg.layout.tag_cloud);
        assert!(cfg.layout.history);
        assert_eq!(cfg.bind_addr, "127.0.0.1:8000");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = DashboardConfig::load_from(&dir.path().join("absent")).unwrap();
        assert_eq!(cfg.theme, Theme::Pixel);
        assert_eq!(cfg.data_bases.len(), 3);
    }

    #[test]
    fn resolved_bases_join_data_root() {
        let cfg = DashboardConfig {
            data_root: "/srv/data".to_string(),
            data_bases: vec![
                "./unified/".to_string(),
                "/".to_string(),
                "https://example.org/board/".to_string(),
            ],
            ..Default::default()
        };
        let bases = cfg.resolved_bases();
        assert_eq!(bases[0], "/srv/data/./unified/");
        assert_eq!(bases[1], "/srv/data/");
        assert_eq!(bases[2], "https://example.org/board/");
    }
}
