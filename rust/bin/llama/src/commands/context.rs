//! `llama context ...`: manage the saved catalog servers.

use std::path::Path;

use anyhow::Result;

use crate::config::{ClientConfig, Context};

/// List all contexts, marking the current one.
pub fn list(config_path: &Path) -> Result<()> {
    let config = ClientConfig::load(config_path)?;

    if config.contexts.is_empty() {
        println!("No contexts configured.");
        println!("Run: llama context set <name> --server <url>");
        return Ok(());
    }

    println!("{:2} {:20} {:40}", "", "NAME", "SERVER");
    for ctx in &config.contexts {
        let marker = if ctx.name == config.current_context { "*" } else { " " };
        let server = if ctx.server.is_empty() { "-" } else { &ctx.server };
        println!("{:2} {:20} {:40}", marker, ctx.name, server);
    }
    Ok(())
}

/// Create or update a context.
pub fn set(name: &str, server: Option<&str>, config_path: &Path) -> Result<()> {
    let mut config = ClientConfig::load(config_path)?;

    let existed = match config.get_mut(name) {
        Some(ctx) => {
            if let Some(s) = server {
                ctx.server = s.trim_end_matches('/').to_string();
            }
            true
        }
        None => {
            config.upsert_context(Context {
                name: name.to_string(),
                server: server.unwrap_or_default().trim_end_matches('/').to_string(),
            });
            false
        }
    };

    config.save(config_path)?;
    if existed {
        println!("Context \"{}\" updated.", name);
    } else {
        println!("Context \"{}\" created.", name);
    }
    Ok(())
}

/// Switch the current context.
pub fn use_context(name: &str, config_path: &Path) -> Result<()> {
    let mut config = ClientConfig::load(config_path)?;

    if !config.contexts.iter().any(|c| c.name == name) {
        anyhow::bail!(
            "Context \"{}\" not found. Run `llama context list` to see available contexts.",
            name
        );
    }

    config.current_context = name.to_string();
    config.save(config_path)?;
    println!("Switched to context \"{}\".", name);
    Ok(())
}

pub fn delete(name: &str, config_path: &Path) -> Result<()> {
    let mut config = ClientConfig::load(config_path)?;

    if !config.remove_context(name) {
        anyhow::bail!("Context \"{}\" not found.", name);
    }

    config.save(config_path)?;
    println!("Context \"{}\" deleted.", name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_creates_then_updates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        set("local", Some("http://localhost:8080/"), &path).unwrap();
        set("local", Some("http://localhost:9090"), &path).unwrap();

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.contexts.len(), 1);
        assert_eq!(config.current_context, "local");
        assert_eq!(config.contexts[0].server, "http://localhost:9090");
    }

    #[test]
    fn set_without_server_keeps_existing_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        set("local", Some("http://localhost:8080"), &path).unwrap();
        set("local", None, &path).unwrap();

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.contexts[0].server, "http://localhost:8080");
    }

    #[test]
    fn use_switches_current() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        set("local", Some("http://localhost:8080"), &path).unwrap();
        set("stage", Some("http://stage:8080"), &path).unwrap();

        use_context("stage", &path).unwrap();
        assert_eq!(ClientConfig::load(&path).unwrap().current_context, "stage");
        assert!(use_context("prod", &path).is_err());
    }

    #[test]
    fn delete_unknown_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        set("local", None, &path).unwrap();

        delete("local", &path).unwrap();
        assert!(delete("local", &path).is_err());
        assert!(ClientConfig::load(&path).unwrap().contexts.is_empty());
    }
}
