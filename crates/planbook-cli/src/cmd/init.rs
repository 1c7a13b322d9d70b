use anyhow::Context;
use planbook_core::{config::Config, io, paths};
use std::path::Path;

pub fn run(root: &Path, organization: Option<&str>) -> anyhow::Result<()> {
    let organization = organization
        .map(str::to_string)
        .or_else(|| {
            root.file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "organization".to_string());

    println!("Initializing planbook in: {}", root.display());

    let dirs = [paths::PLANBOOK_DIR, paths::DISTRICTS_DIR];
    for dir in dirs {
        let p = root.join(dir);
        io::ensure_dir(&p).with_context(|| format!("failed to create {}", p.display()))?;
    }

    let config_path = paths::config_path(root);
    if !config_path.exists() {
        let cfg = Config::new(&organization);
        cfg.save(root).context("failed to write config.yaml")?;
        println!("  created: .planbook/config.yaml");
    } else {
        println!("  exists:  .planbook/config.yaml");
    }

    println!("\nNext steps:");
    println!("  planbook district create <slug> --name '<District Name>'");
    println!("  planbook serve");
    Ok(())
}
