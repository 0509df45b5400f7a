//! Display backends understood by the composer.

use crate::error::ComposeError;
use std::str::FromStr;

/// VNC display index used for `-display vnc=:N`.
pub const VNC_DISPLAY_INDEX: u16 = 1;

/// First TCP port of the VNC display range.
const VNC_BASE_PORT: u16 = 5900;

/// Display configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisplayBackend {
    /// SDL window (virgl capable)
    #[default]
    Sdl,
    /// GTK window (virgl capable)
    Gtk,
    /// VNC server on the fixed display index
    Vnc,
    /// No display at all
    None,
}

impl DisplayBackend {
    pub fn name(&self) -> &'static str {
        match self {
            DisplayBackend::Sdl => "sdl",
            DisplayBackend::Gtk => "gtk",
            DisplayBackend::Vnc => "vnc",
            DisplayBackend::None => "none",
        }
    }

    /// Value for `-display`. Only the windowed backends take `gl=on`.
    pub fn display_arg(&self, gl: bool) -> String {
        match self {
            DisplayBackend::Sdl | DisplayBackend::Gtk if gl => format!("{},gl=on", self.name()),
            DisplayBackend::Sdl | DisplayBackend::Gtk => self.name().to_string(),
            DisplayBackend::Vnc => format!("vnc=:{VNC_DISPLAY_INDEX}"),
            DisplayBackend::None => "none".to_string(),
        }
    }

    /// TCP port the backend opens on the host, if any
    pub fn vnc_port(&self) -> Option<u16> {
        match self {
            DisplayBackend::Vnc => Some(VNC_BASE_PORT + VNC_DISPLAY_INDEX),
            _ => None,
        }
    }
}

impl FromStr for DisplayBackend {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sdl" => Ok(DisplayBackend::Sdl),
            "gtk" => Ok(DisplayBackend::Gtk),
            "vnc" => Ok(DisplayBackend::Vnc),
            "none" => Ok(DisplayBackend::None),
            other => Err(ComposeError::InvalidConfig {
                field: "displayBackend",
                value: other.to_string(),
                reason: "expected one of sdl, gtk, vnc, none",
            }),
        }
    }
}
