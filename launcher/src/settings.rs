//! Settings file support
//!
//! Reads `webos-qemu.toml` from the working directory to override the
//! built-in launch defaults and the build tree layout. Command-line flags are
//! applied on top of whatever this produces.

use crate::environment::BuildLayout;
use anyhow::{bail, Context, Result};
use gfx_compose::{LaunchConfig, DEFAULT_KVM_DEVICE};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "webos-qemu.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub launch: LaunchSettings,

    #[serde(default)]
    pub paths: PathSettings,
}

/// Launch defaults. Unset keys keep the built-in value.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LaunchSettings {
    pub machine: Option<String>,
    pub image: Option<String>,
    pub display: Option<String>,
    pub memory_mb: Option<u32>,
    pub gpu: Option<bool>,
    pub kvm: Option<bool>,
    pub serial: Option<bool>,
    pub nographic: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathSettings {
    /// Directory holding `oe-init-build-env`
    #[serde(default = "default_project_root")]
    pub project_root: PathBuf,

    /// Bitbake build directory, relative to `project_root` unless absolute
    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,

    #[serde(default = "default_kvm_device")]
    pub kvm_device: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        PathSettings {
            project_root: default_project_root(),
            build_dir: default_build_dir(),
            kvm_device: default_kvm_device(),
        }
    }
}

fn default_project_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_build_dir() -> PathBuf {
    PathBuf::from("BUILD")
}
fn default_kvm_device() -> PathBuf {
    PathBuf::from(DEFAULT_KVM_DEVICE)
}

impl Settings {
    /// Load settings.
    ///
    /// An explicit path must exist. Without one, `webos-qemu.toml` in the
    /// working directory is used if present, defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.is_file() {
                    bail!("Settings file {} not found", path.display());
                }
                path
            }
            None => {
                let path = Path::new(SETTINGS_FILE);
                if !path.exists() {
                    log::debug!("no {SETTINGS_FILE}, using built-in defaults");
                    return Ok(Settings::default());
                }
                path
            }
        };

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let settings =
            Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
        log::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Built-in defaults with the `[launch]` table applied
    pub fn launch_config(&self) -> LaunchConfig {
        let launch = &self.launch;
        let defaults = LaunchConfig::default();
        LaunchConfig {
            machine: launch.machine.clone().unwrap_or(defaults.machine),
            image: launch.image.clone().unwrap_or(defaults.image),
            display: launch.display.clone().unwrap_or(defaults.display),
            memory_mb: launch.memory_mb.unwrap_or(defaults.memory_mb),
            enable_gpu: launch.gpu.unwrap_or(defaults.enable_gpu),
            enable_kvm: launch.kvm.unwrap_or(defaults.enable_kvm),
            enable_serial: launch.serial.unwrap_or(defaults.enable_serial),
            no_graphic: launch.nographic.unwrap_or(defaults.no_graphic),
        }
    }

    /// Build directory resolved against the project root
    pub fn build_dir(&self) -> PathBuf {
        self.paths.project_root.join(&self.paths.build_dir)
    }

    pub fn build_layout(&self) -> BuildLayout {
        BuildLayout::new(&self.paths.project_root, self.build_dir())
    }
}
