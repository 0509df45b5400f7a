//! Static graphics settings file written by the setup tool.
//!
//! Bitbake-style `KEY = "value"` lines. The values are derived from the
//! composer's own defaults so the file documents exactly what a default
//! launch does.

use crate::compose::{AUDIO_DEVICES, GPU_DEVICE};
use crate::config::LaunchConfig;
use crate::display::DisplayBackend;
use std::collections::BTreeMap;

const HEADER: &str = "# webOS OSE QEMU graphics settings\n\
                      # Generated by webos-gfx-setup. Launch-time flags override these.\n";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfParseError {
    #[error("line {line}: expected KEY = \"value\", got {text:?}")]
    MissingEquals { line: usize, text: String },
    #[error("line {line}: empty key")]
    EmptyKey { line: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphicsConf {
    entries: BTreeMap<String, String>,
}

impl GraphicsConf {
    pub fn from_defaults() -> Self {
        Self::from_launch_config(&LaunchConfig::default(), DisplayBackend::default())
    }

    /// `config.display` is ignored in favour of the already resolved `display`.
    fn from_launch_config(config: &LaunchConfig, display: DisplayBackend) -> Self {
        let display = display.display_arg(config.enable_gpu);

        let mut entries = BTreeMap::new();
        entries.insert("QEMU_MEMORY".to_string(), config.memory_mb.to_string());
        entries.insert("QEMU_DISPLAY".to_string(), display);
        entries.insert("QEMU_GPU_DEVICE".to_string(), GPU_DEVICE.to_string());
        entries.insert(
            "QEMU_KVM".to_string(),
            if config.enable_kvm { "1" } else { "0" }.to_string(),
        );
        entries.insert("QEMU_AUDIO".to_string(), AUDIO_DEVICES.join(","));
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn render(&self) -> String {
        let mut out = String::from(HEADER);
        for (key, value) in &self.entries {
            out.push_str(&format!("{key} = \"{value}\"\n"));
        }
        out
    }

    pub fn parse(text: &str) -> Result<Self, ConfParseError> {
        let mut entries = BTreeMap::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfParseError::MissingEquals {
                    line: idx + 1,
                    text: line.to_string(),
                });
            };
            let key = key.trim();
            if key.is_empty() {
                return Err(ConfParseError::EmptyKey { line: idx + 1 });
            }
            let value = value.trim().trim_matches('"').trim_matches('\'');
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(Self { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_documented_values() {
        let conf = GraphicsConf::from_defaults();
        assert_eq!(conf.get("QEMU_MEMORY"), Some("2048"));
        assert_eq!(conf.get("QEMU_DISPLAY"), Some("sdl,gl=on"));
        assert_eq!(conf.get("QEMU_GPU_DEVICE"), Some("virtio-vga-gl"));
        assert_eq!(conf.get("QEMU_KVM"), Some("1"));
    }

    #[test]
    fn test_default_backend_is_default_display() {
        assert_eq!(
            crate::config::DEFAULT_DISPLAY.parse::<DisplayBackend>(),
            Ok(DisplayBackend::default())
        );
    }

    #[test]
    fn test_display_comes_from_resolved_backend() {
        let config = LaunchConfig {
            display: "spice".to_string(),
            enable_gpu: false,
            ..LaunchConfig::default()
        };
        let conf = GraphicsConf::from_launch_config(&config, DisplayBackend::Vnc);
        assert_eq!(conf.get("QEMU_DISPLAY"), Some("vnc=:1"));

        let conf = GraphicsConf::from_launch_config(&config, DisplayBackend::Gtk);
        assert_eq!(conf.get("QEMU_DISPLAY"), Some("gtk"));
    }

    #[test]
    fn test_render_parses_back() {
        let conf = GraphicsConf::from_defaults();
        let text = conf.render();
        assert!(text.starts_with("# webOS OSE QEMU graphics settings"));
        assert_eq!(GraphicsConf::parse(&text).unwrap(), conf);
    }

    #[test]
    fn test_parse_tolerates_quotes_and_comments() {
        let conf = GraphicsConf::parse("# comment\n\nA = 'x'\nB=y\n  C = \"z w\"  \n").unwrap();
        assert_eq!(conf.get("A"), Some("x"));
        assert_eq!(conf.get("B"), Some("y"));
        assert_eq!(conf.get("C"), Some("z w"));
    }

    #[test]
    fn test_parse_rejects_bare_line() {
        let err = GraphicsConf::parse("A = 1\nnot a setting\n").unwrap_err();
        assert_eq!(
            err,
            ConfParseError::MissingEquals {
                line: 2,
                text: "not a setting".to_string()
            }
        );
    }

    #[test]
    fn test_parse_rejects_empty_key() {
        let err = GraphicsConf::parse(" = 1").unwrap_err();
        assert_eq!(err, ConfParseError::EmptyKey { line: 1 });
    }
}
