use anyhow::{bail, Context, Result};
use gfx_compose::{GraphicsConf, KnownMachine, DEFAULT_MACHINE, KNOWN_IMAGES};
use std::fs;
use std::path::Path;

pub const DEFAULT_CONF_PATH: &str = "conf/qemu-graphics.conf";

/// Write the static graphics settings to `path`. Existing files are kept
/// unless `force` is set.
pub fn write_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let conf = GraphicsConf::from_defaults();
    fs::write(path, conf.render()).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("✅ Wrote {}", path.display());
    Ok(())
}

pub fn machines(json: bool) -> Result<()> {
    let names: Vec<&str> = KnownMachine::ALL.iter().map(KnownMachine::name).collect();
    if json {
        let listing = serde_json::json!({
            "machines": names,
            "images": KNOWN_IMAGES,
        });
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!("Machines:");
    for name in names {
        let marker = if name == DEFAULT_MACHINE { " (default)" } else { "" };
        println!("  {name}{marker}");
    }
    println!("Images:");
    for image in KNOWN_IMAGES {
        println!("  {image}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_config_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("conf/qemu-graphics.conf");
        write_config(&path, false).unwrap();

        let written = GraphicsConf::parse(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, GraphicsConf::from_defaults());
    }

    #[test]
    fn test_write_config_refuses_overwrite() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("qemu-graphics.conf");
        fs::write(&path, "KEEP = \"me\"\n").unwrap();

        assert!(write_config(&path, false).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "KEEP = \"me\"\n");

        write_config(&path, true).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("QEMU_MEMORY"));
    }
}
