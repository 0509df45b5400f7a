//! Host capability probing.
//!
//! The composer only ever sees a resolved [`HostCapabilities`]. Anything that
//! touches the host lives behind [`CapabilityProbe`] so tests can substitute
//! fixed answers.

use nix::unistd::{access, AccessFlags};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_KVM_DEVICE: &str = "/dev/kvm";
const DEFAULT_PROC_ROOT: &str = "/proc";

/// Process names that count as a running audio server
const AUDIO_SERVERS: &[&str] = &["pulseaudio", "pipewire", "pipewire-pulse"];

/// Snapshot of what the host can offer to the VM
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HostCapabilities {
    pub kvm_available: bool,
    pub audio_available: bool,
}

pub trait CapabilityProbe {
    fn kvm_available(&self) -> bool;

    fn audio_available(&self) -> bool;

    fn probe(&self) -> HostCapabilities {
        HostCapabilities {
            kvm_available: self.kvm_available(),
            audio_available: self.audio_available(),
        }
    }
}

/// Fixed answers, for tests and for callers that already know the host.
impl CapabilityProbe for HostCapabilities {
    fn kvm_available(&self) -> bool {
        self.kvm_available
    }

    fn audio_available(&self) -> bool {
        self.audio_available
    }
}

/// Probes the real host: KVM device permissions and audio server presence.
///
/// Audio detection is best-effort. The server may start or stop between the
/// probe and the launch.
#[derive(Clone, Debug)]
pub struct HostProbe {
    kvm_device: PathBuf,
    proc_root: PathBuf,
    runtime_dir: Option<PathBuf>,
}

impl Default for HostProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl HostProbe {
    pub fn new() -> Self {
        Self {
            kvm_device: PathBuf::from(DEFAULT_KVM_DEVICE),
            proc_root: PathBuf::from(DEFAULT_PROC_ROOT),
            runtime_dir: std::env::var_os("XDG_RUNTIME_DIR").map(PathBuf::from),
        }
    }

    /// Override the KVM device node
    pub fn kvm_device(mut self, path: impl Into<PathBuf>) -> Self {
        self.kvm_device = path.into();
        self
    }

    /// Override the procfs mount scanned for audio servers
    pub fn proc_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.proc_root = path.into();
        self
    }

    /// Override (or clear) the runtime dir searched for the PulseAudio socket
    pub fn runtime_dir(mut self, path: Option<PathBuf>) -> Self {
        self.runtime_dir = path;
        self
    }

    fn audio_process_running(&self) -> bool {
        let Ok(entries) = fs::read_dir(&self.proc_root) else {
            log::debug!("cannot read {}", self.proc_root.display());
            return false;
        };

        entries
            .filter_map(Result::ok)
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.bytes().all(|b| b.is_ascii_digit()))
            })
            .filter_map(|entry| fs::read_to_string(entry.path().join("comm")).ok())
            .any(|comm| AUDIO_SERVERS.contains(&comm.trim()))
    }

    fn pulse_socket_present(&self) -> bool {
        self.runtime_dir
            .as_deref()
            .is_some_and(|dir| dir.join("pulse/native").exists())
    }
}

impl CapabilityProbe for HostProbe {
    fn kvm_available(&self) -> bool {
        device_read_write(&self.kvm_device)
    }

    fn audio_available(&self) -> bool {
        self.audio_process_running() || self.pulse_socket_present()
    }
}

fn device_read_write(path: &Path) -> bool {
    if !path.exists() {
        log::debug!("{} does not exist", path.display());
        return false;
    }
    match access(path, AccessFlags::R_OK | AccessFlags::W_OK) {
        Ok(()) => true,
        Err(err) => {
            log::debug!("{} not accessible: {err}", path.display());
            false
        }
    }
}
