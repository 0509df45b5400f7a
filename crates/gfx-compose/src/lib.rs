//! QEMU launch option composition for the webOS OSE graphics test environment.
//!
//! [`compose`] is a pure function of a [`LaunchConfig`] and a resolved
//! [`HostCapabilities`]. Host probing lives behind [`CapabilityProbe`].

mod caps;
mod compose;
mod config;
mod display;
mod error;
mod graphics_conf;

pub use caps::{CapabilityProbe, HostCapabilities, HostProbe, DEFAULT_KVM_DEVICE};
pub use compose::{
    compose, ArgumentList, Composition, AUDIO_DEVICES, FALLBACK_VGA, GPU_DEVICE, SERIAL_CONSOLE,
};
pub use config::{
    KnownMachine, LaunchConfig, DEFAULT_DISPLAY, DEFAULT_IMAGE, DEFAULT_MACHINE,
    DEFAULT_MEMORY_MB, KNOWN_IMAGES,
};
pub use display::{DisplayBackend, VNC_DISPLAY_INDEX};
pub use error::{Capability, ComposeError, Diagnostic};
pub use graphics_conf::{ConfParseError, GraphicsConf};
