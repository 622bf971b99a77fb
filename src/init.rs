//! Site initialization module.
//!
//! Creates new site structure with default configuration and a sample
//! post.

use crate::config::SiteConfig;
use crate::content::Category;
use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Default config filename
const CONFIG_FILE: &str = "paracosm.toml";

/// Sample post written into a fresh site
const SAMPLE_POST: &str = "+++\ntitle = \"Hello World\"\nslug = \"hello-world\"\nemoji = \"\u{1f30a}\"\ndate = \"2024-01-01\"\n+++\n\n## First Section\n\nWelcome to your new site. Edit this file under `content/posts/`.\n\n[Paracosm on GitHub](https://github.com/paracosm-ssg/paracosm)\n";

/// Create a new site with default structure
pub fn new_site(config: &'static SiteConfig, has_name: bool) -> Result<()> {
    let root = config.get_root();

    // Safety check: if no name was provided (init in current dir),
    // the directory must be completely empty
    if !has_name && !is_dir_empty(root)? {
        bail!(
            "Current directory is not empty. Use `paracosm init <SITE_NAME>` to create in a subdirectory."
        );
    }

    init_site_structure(root)?;
    init_default_config(root)?;
    init_sample_content(root)?;

    crate::log!("init"; "created site at {}", root.display());
    Ok(())
}

/// Check if a directory is completely empty
fn is_dir_empty(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    Ok(fs::read_dir(path)?.next().is_none())
}

/// Write default configuration file
fn init_default_config(root: &Path) -> Result<()> {
    let content = toml::to_string_pretty(&SiteConfig::default())?;
    fs::write(root.join(CONFIG_FILE), content)?;
    Ok(())
}

/// Create one content directory per category
fn init_site_structure(root: &Path) -> Result<()> {
    for category in Category::ALL {
        let path = root.join("content").join(category.dir());
        if path.exists() {
            bail!(
                "Path `{}` already exists. Try `paracosm init <SITE_NAME>` instead.",
                path.display()
            );
        }
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
    }
    Ok(())
}

/// Write the sample post
fn init_sample_content(root: &Path) -> Result<()> {
    let path = root
        .join("content")
        .join(Category::Post.dir())
        .join("hello-world.md");
    fs::write(path, SAMPLE_POST)?;
    Ok(())
}
