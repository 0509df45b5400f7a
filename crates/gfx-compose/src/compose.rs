//! QEMU launch option composer
//!
//! Turns a [`LaunchConfig`] plus resolved [`HostCapabilities`] into the
//! ordered argument list handed to runqemu as `qemuparams`.
//!
//! Arguments are appended by named rules run from a single ordered table.
//! Display and GPU device come out of the same rule, so the device always
//! follows the display flag it augments.

use crate::caps::HostCapabilities;
use crate::config::LaunchConfig;
use crate::display::DisplayBackend;
use crate::error::{Capability, ComposeError, Diagnostic};
use serde::Serialize;
use std::fmt;

/// Accelerated VirtIO GPU device (virgl)
pub const GPU_DEVICE: &str = "virtio-vga-gl";
/// `-vga` model used when the accelerated device is off
pub const FALLBACK_VGA: &str = "std";
/// Sound card and codec, always emitted together
pub const AUDIO_DEVICES: [&str; 2] = ["intel-hda", "hda-duplex"];
pub const SERIAL_CONSOLE: &str = "mon:stdio";

/// Ordered QEMU arguments. Only the composer appends to it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ArgumentList(Vec<String>);

impl ArgumentList {
    fn option(&mut self, flag: &str, value: impl Into<String>) {
        self.0.push(flag.to_string());
        self.0.push(value.into());
    }

    fn switch(&mut self, flag: &str) {
        self.0.push(flag.to_string());
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, arg: &str) -> bool {
        self.0.iter().any(|a| a == arg)
    }

    /// True if `flag` is immediately followed by `value`
    pub fn contains_pair(&self, flag: &str, value: &str) -> bool {
        self.0.windows(2).any(|w| w[0] == flag && w[1] == value)
    }

    /// runqemu's `qemuparams` value
    pub fn qemuparams(&self) -> String {
        self.0.join(" ")
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Display for ArgumentList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qemuparams())
    }
}

/// Result of a successful composition
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Composition {
    pub args: ArgumentList,
    pub diagnostics: Vec<Diagnostic>,
    /// Host port opened by the VNC backend. Informational only.
    pub vnc_port: Option<u16>,
}

#[derive(Clone, Copy, Debug)]
enum Graphics {
    /// Serial-only mode, display and GPU settings ignored
    Nographic,
    Display { backend: DisplayBackend, gpu: bool },
}

/// Validated view of a [`LaunchConfig`]. Every fallible check happens while
/// building this, before any argument is emitted.
#[derive(Clone, Copy, Debug)]
struct Plan {
    memory_mb: u32,
    graphics: Graphics,
    kvm: bool,
    serial: bool,
}

impl Plan {
    fn resolve(config: &LaunchConfig) -> Result<Self, ComposeError> {
        if config.memory_mb == 0 {
            return Err(ComposeError::InvalidConfig {
                field: "memoryMB",
                value: config.memory_mb.to_string(),
                reason: "must be a positive number of megabytes",
            });
        }

        let graphics = if config.no_graphic {
            Graphics::Nographic
        } else {
            Graphics::Display {
                backend: config.display.parse()?,
                gpu: config.enable_gpu,
            }
        };

        Ok(Self {
            memory_mb: config.memory_mb,
            graphics,
            kvm: config.enable_kvm,
            serial: config.enable_serial,
        })
    }

    fn no_graphic(&self) -> bool {
        matches!(self.graphics, Graphics::Nographic)
    }
}

#[derive(Default)]
struct Output {
    args: ArgumentList,
    diagnostics: Vec<Diagnostic>,
    vnc_port: Option<u16>,
}

type Rule = fn(&Plan, &HostCapabilities, &mut Output);

/// Application order. Changing it changes the emitted command line.
const RULES: [(&str, Rule); 5] = [
    ("memory", memory_rule),
    ("graphics", graphics_rule),
    ("kvm", kvm_rule),
    ("audio", audio_rule),
    ("serial", serial_rule),
];

fn memory_rule(plan: &Plan, _caps: &HostCapabilities, out: &mut Output) {
    out.args.option("-m", plan.memory_mb.to_string());
}

fn graphics_rule(plan: &Plan, _caps: &HostCapabilities, out: &mut Output) {
    match plan.graphics {
        Graphics::Nographic => out.args.switch("-nographic"),
        Graphics::Display { backend, gpu } => {
            out.args.option("-display", backend.display_arg(gpu));
            out.vnc_port = backend.vnc_port();
            if gpu {
                out.args.option("-device", GPU_DEVICE);
            } else {
                out.args.option("-vga", FALLBACK_VGA);
            }
        }
    }
}

fn kvm_rule(plan: &Plan, caps: &HostCapabilities, out: &mut Output) {
    if !plan.kvm {
        return;
    }
    if caps.kvm_available {
        out.args.switch("-enable-kvm");
    } else {
        out.diagnostics.push(Diagnostic::CapabilityUnavailable {
            capability: Capability::Kvm,
            detail: "KVM device missing or not read/writable, falling back to TCG emulation"
                .to_string(),
        });
    }
}

fn audio_rule(plan: &Plan, caps: &HostCapabilities, out: &mut Output) {
    if caps.audio_available && !plan.no_graphic() {
        for device in AUDIO_DEVICES {
            out.args.option("-device", device);
        }
    }
}

fn serial_rule(plan: &Plan, _caps: &HostCapabilities, out: &mut Output) {
    if plan.serial {
        out.args.option("-serial", SERIAL_CONSOLE);
    }
}

/// Compose the QEMU arguments for one launch.
///
/// Pure: the same inputs always give the same output. The only failures are
/// an unsupported display backend or a zero memory size, and neither returns
/// a partial list.
pub fn compose(config: &LaunchConfig, caps: &HostCapabilities) -> Result<Composition, ComposeError> {
    let plan = Plan::resolve(config)?;
    let mut out = Output::default();

    for (name, rule) in RULES {
        let before = out.args.len();
        rule(&plan, caps, &mut out);
        log::trace!("rule {name}: +{} args", out.args.len() - before);
    }

    Ok(Composition {
        args: out.args,
        diagnostics: out.diagnostics,
        vnc_port: out.vnc_port,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_CAPS: HostCapabilities = HostCapabilities {
        kvm_available: true,
        audio_available: true,
    };

    fn args(config: &LaunchConfig, caps: &HostCapabilities) -> Vec<String> {
        compose(config, caps).unwrap().args.into_vec()
    }

    #[test]
    fn test_default_config_full_host() {
        let config = LaunchConfig::default();
        assert_eq!(
            args(&config, &ALL_CAPS),
            [
                "-m", "2048", "-display", "sdl,gl=on", "-device", "virtio-vga-gl",
                "-enable-kvm", "-device", "intel-hda", "-device", "hda-duplex",
            ]
        );
    }

    #[test]
    fn test_gtk_without_virgl() {
        let config = LaunchConfig {
            display: "gtk".to_string(),
            enable_gpu: false,
            enable_kvm: false,
            ..LaunchConfig::default()
        };
        assert_eq!(
            args(&config, &HostCapabilities::default()),
            ["-m", "2048", "-display", "gtk", "-vga", "std"]
        );
    }

    #[test]
    fn test_display_none() {
        let config = LaunchConfig {
            display: "none".to_string(),
            ..LaunchConfig::default()
        };
        let composed = compose(&config, &HostCapabilities::default()).unwrap();
        assert!(composed.args.contains_pair("-display", "none"));
        assert!(composed.args.contains_pair("-device", GPU_DEVICE));
        assert_eq!(composed.vnc_port, None);
    }

    #[test]
    fn test_nographic_with_serial() {
        let config = LaunchConfig {
            no_graphic: true,
            enable_serial: true,
            enable_kvm: false,
            ..LaunchConfig::default()
        };
        assert_eq!(
            args(&config, &ALL_CAPS),
            ["-m", "2048", "-nographic", "-serial", "mon:stdio"]
        );
    }

    #[test]
    fn test_nographic_ignores_invalid_display() {
        let config = LaunchConfig {
            display: "spice".to_string(),
            no_graphic: true,
            ..LaunchConfig::default()
        };
        assert!(compose(&config, &ALL_CAPS).is_ok());
    }

    #[test]
    fn test_kvm_disabled_emits_nothing() {
        let config = LaunchConfig {
            enable_kvm: false,
            ..LaunchConfig::default()
        };
        let composed = compose(&config, &HostCapabilities::default()).unwrap();
        assert!(!composed.args.contains("-enable-kvm"));
        assert!(composed.diagnostics.is_empty());
    }

    #[test]
    fn test_zero_memory_rejected() {
        let config = LaunchConfig {
            memory_mb: 0,
            ..LaunchConfig::default()
        };
        let err = compose(&config, &ALL_CAPS).unwrap_err();
        assert_eq!(err.field(), "memoryMB");
        assert_eq!(err.value(), "0");
    }

    #[test]
    fn test_gpu_device_follows_display() {
        let composed = compose(&LaunchConfig::default(), &ALL_CAPS).unwrap();
        let list = composed.args.as_slice();
        let display = list.iter().position(|a| a == "-display").unwrap();
        let device = list.iter().position(|a| a == GPU_DEVICE).unwrap();
        assert!(display < device);
    }

    #[test]
    fn test_qemuparams_joined() {
        let config = LaunchConfig {
            enable_kvm: false,
            ..LaunchConfig::default()
        };
        let composed = compose(&config, &HostCapabilities::default()).unwrap();
        assert_eq!(
            composed.args.qemuparams(),
            "-m 2048 -display sdl,gl=on -device virtio-vga-gl"
        );
        assert_eq!(composed.args.to_string(), composed.args.qemuparams());
    }
}
