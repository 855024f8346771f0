use crate::Database;
use anyhow::Result;
use std::path::PathBuf;

pub async fn run(path: PathBuf, name: Option<String>) -> Result<()> {
    let site_name = name.unwrap_or_else(|| "BreachPress".to_string());

    std::fs::create_dir_all(&path)?;
    std::fs::create_dir_all(path.join("data"))?;
    std::fs::create_dir_all(path.join("data/media"))?;

    let config_path = path.join("breachpress.toml");
    if config_path.exists() {
        anyhow::bail!("'{}' already exists", config_path.display());
    }

    let config = format!(
        r#"[site]
title = "{}"
description = "Exposing what stays hidden"
url = "http://localhost:3000"
language = "en"

[server]
host = "127.0.0.1"
port = 3000

[database]
path = "./data/breachpress.db"

[content]
articles_per_page = 10
related_limit = 3
recent_limit = 3

[media]
upload_dir = "./data/media"

[intake]
max_requests = 5
window_secs = 300
"#,
        site_name
    );
    std::fs::write(&config_path, config)?;

    let db = Database::open(path.join("data/breachpress.db").to_string_lossy().as_ref())?;
    db.migrate()?;

    println!("Initialized '{}' in {}", site_name, path.display());
    println!("Next: breachpress bootstrap --username <name> --email <email>");

    Ok(())
}
