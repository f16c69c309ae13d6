//! App icon commands backed by a file store

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tint_core::{FileStore, HealthConfig, IconStateStore};

use super::print_json;

/// Icon state over `path`, or the default data-directory file
pub fn open_icon_store(path: Option<&Path>, config: &HealthConfig) -> IconStateStore {
    let path = path.map(Path::to_path_buf).unwrap_or_else(FileStore::default_path);
    tracing::debug!(path = %path.display(), "Opening icon state store");
    IconStateStore::new(Arc::new(FileStore::new(path))).with_config(config)
}

pub async fn cmd_icon_current(icons: &IconStateStore) -> Result<()> {
    match icons.get_current_variant().await {
        Some(variant) => {
            let config = variant.config();
            println!("{} ({}, {})", variant, config.file_name, config.color);
        }
        None => println!("No icon set"),
    }
    Ok(())
}

pub async fn cmd_icon_describe(icons: &IconStateStore) -> Result<()> {
    println!("{}", icons.describe_current().await);
    Ok(())
}

pub async fn cmd_icon_history(icons: &IconStateStore) -> Result<()> {
    let history = icons.history().await;
    if history.is_empty() {
        println!("No icon changes recorded");
        return Ok(());
    }

    for entry in &history {
        let pct = if entry.budget_percentage.is_finite() {
            format!("{:.1}%", entry.budget_percentage)
        } else {
            "n/a".to_string()
        };
        println!(
            "{}  {} -> {}  {:>7}  {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.from_variant,
            entry.to_variant,
            pct,
            entry.reason
        );
    }
    Ok(())
}

pub async fn cmd_icon_reset(icons: &IconStateStore) -> Result<()> {
    icons.reset().await;
    println!("Icon reset to default");
    Ok(())
}

pub async fn cmd_icon_init(icons: &IconStateStore, percentage: f64) -> Result<()> {
    icons.initialize(percentage).await;
    cmd_icon_current(icons).await
}

pub async fn cmd_icon_sync(icons: &IconStateStore, percentage: f64, reason: &str) -> Result<()> {
    match icons.sync(percentage, reason).await {
        Some(entry) => print_json(&entry),
        None => {
            println!("Icon unchanged");
            Ok(())
        }
    }
}

pub async fn cmd_icon_set(icons: &IconStateStore, color: &str, status: &str) -> Result<()> {
    icons.set_current_variant(color, status).await;
    cmd_icon_current(icons).await
}

pub async fn cmd_icon_clear_history(icons: &IconStateStore) -> Result<()> {
    icons.clear_history().await;
    println!("Icon history cleared");
    Ok(())
}

pub fn cmd_icon_supported(icons: &IconStateStore) -> Result<()> {
    if icons.is_supported() {
        println!("Alternate app icons are supported on this platform");
    } else {
        println!("Alternate app icons are not supported on this platform");
    }
    Ok(())
}
