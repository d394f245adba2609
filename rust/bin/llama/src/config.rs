//! Saved catalog servers for the `llama` CLI.
//!
//! Each entry names a server hosting the `llamas` collection; catalog
//! commands use the active one unless `--server` is given. Stored as TOML
//! in `~/.llama/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One saved catalog server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    /// Name used with `llama context use` (e.g. "local").
    pub name: String,

    /// Base URL of the entity API; empty until `--server` is given.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub server: String,
}

/// Everything `~/.llama/config.toml` holds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server the catalog commands talk to when `--server` is absent.
    #[serde(rename = "current-context", default)]
    pub current_context: String,

    #[serde(default)]
    pub contexts: Vec<Context>,
}

impl ClientConfig {
    /// Where `--config` points when not given.
    pub fn default_path() -> PathBuf {
        llama_home().join("config.toml")
    }

    /// A missing file means no servers saved yet, not an error.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn current(&self) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == self.current_context)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Context> {
        self.contexts.iter_mut().find(|c| c.name == name)
    }

    /// Save a server under its name. With nothing active yet, it becomes active.
    pub fn upsert_context(&mut self, ctx: Context) {
        if self.current_context.is_empty() {
            self.current_context = ctx.name.clone();
        }
        match self.get_mut(&ctx.name) {
            Some(existing) => *existing = ctx,
            None => self.contexts.push(ctx),
        }
    }

    /// Forget a saved server. Deleting the active one leaves none active.
    pub fn remove_context(&mut self, name: &str) -> bool {
        let len = self.contexts.len();
        self.contexts.retain(|c| c.name != name);
        if self.current_context == name {
            self.current_context.clear();
        }
        self.contexts.len() < len
    }

    /// Server URL to talk to: the `--server` override, else the current context's.
    pub fn resolve_server(&self, override_url: Option<&str>) -> anyhow::Result<String> {
        if let Some(url) = override_url.filter(|u| !u.is_empty()) {
            return Ok(url.to_string());
        }
        match self.current() {
            Some(ctx) if !ctx.server.is_empty() => Ok(ctx.server.clone()),
            Some(ctx) => anyhow::bail!(
                "No server URL set for context \"{}\". Run `llama context set {} --server <url>`.",
                ctx.name,
                ctx.name
            ),
            None => anyhow::bail!(
                "No current context. Pass --server <url> or run `llama context set <name> --server <url>`."
            ),
        }
    }
}

fn llama_home() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".llama")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local() -> Context {
        Context {
            name: "local".into(),
            server: "http://localhost:8080".into(),
        }
    }

    #[test]
    fn missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load(&dir.path().join("config.toml")).unwrap();
        assert!(config.current_context.is_empty());
        assert!(config.contexts.is_empty());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = ClientConfig::default();
        config.upsert_context(local());
        config.save(&path).unwrap();

        let back = ClientConfig::load(&path).unwrap();
        assert_eq!(back.current_context, "local");
        assert_eq!(back.contexts, vec![local()]);
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("current-context = \"local\""));
    }

    #[test]
    fn default_path_is_under_llama_home() {
        let path = ClientConfig::default_path();
        assert!(path.ends_with(".llama/config.toml"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "contexts = 3").unwrap();
        assert!(ClientConfig::load(&path).is_err());
    }

    #[test]
    fn upsert_replaces_existing_and_keeps_current() {
        let mut config = ClientConfig::default();
        config.upsert_context(local());
        config.upsert_context(Context {
            name: "stage".into(),
            server: "http://stage:8080".into(),
        });
        config.upsert_context(Context {
            name: "local".into(),
            server: "http://127.0.0.1:9000".into(),
        });

        assert_eq!(config.contexts.len(), 2);
        assert_eq!(config.current_context, "local");
        assert_eq!(config.current().unwrap().server, "http://127.0.0.1:9000");
    }

    #[test]
    fn removing_current_clears_it() {
        let mut config = ClientConfig::default();
        config.upsert_context(local());
        assert!(config.remove_context("local"));
        assert!(config.current_context.is_empty());
        assert!(!config.remove_context("local"));
    }

    #[test]
    fn server_override_wins() {
        let mut config = ClientConfig::default();
        config.upsert_context(local());
        assert_eq!(
            config.resolve_server(Some("http://other:1")).unwrap(),
            "http://other:1"
        );
        assert_eq!(config.resolve_server(None).unwrap(), "http://localhost:8080");
    }

    #[test]
    fn no_server_anywhere_is_an_error() {
        assert!(ClientConfig::default().resolve_server(None).is_err());

        let mut config = ClientConfig::default();
        config.upsert_context(Context {
            name: "bare".into(),
            server: String::new(),
        });
        let err = config.resolve_server(None).unwrap_err();
        assert!(err.to_string().contains("llama context set bare"));
    }
}
