use crate::settings::Settings;
use anyhow::{bail, Result};
use gfx_compose::{CapabilityProbe, HostCapabilities, HostProbe};

/// Tools that only matter for part of the workflow
const OPTIONAL_TOOLS: [(&str, &str); 3] = [
    ("runqemu", "source oe-init-build-env to put poky/scripts on PATH"),
    ("bitbake", "source oe-init-build-env to put bitbake on PATH"),
    ("glxinfo", "install mesa-utils to inspect host OpenGL"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Ok,
    Warn,
    Fail,
}

#[derive(Debug)]
pub struct Check {
    pub status: Status,
    pub message: String,
}

impl Check {
    fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

pub fn run(settings: &Settings) -> Result<()> {
    let config = settings.launch_config();
    let qemu = config
        .known_machine()
        .and_then(|m| m.qemu_binary())
        .unwrap_or("qemu-system-x86_64");
    let caps = HostProbe::new()
        .kvm_device(&settings.paths.kvm_device)
        .probe();

    let checks = collect(|tool| which::which(tool).is_ok(), qemu, &caps);
    let mut ok = true;
    for check in &checks {
        let tag = match check.status {
            Status::Ok => "[OK]",
            Status::Warn => "[WARN]",
            Status::Fail => {
                ok = false;
                "[FAIL]"
            }
        };
        eprintln!("{tag} {}", check.message);
    }

    if !ok {
        bail!("doctor checks failed");
    }
    Ok(())
}

/// Evaluate every check. `has_tool` answers whether a binary is on PATH.
pub fn collect(has_tool: impl Fn(&str) -> bool, qemu: &str, caps: &HostCapabilities) -> Vec<Check> {
    let mut checks = Vec::new();

    if has_tool(qemu) {
        checks.push(Check::new(Status::Ok, qemu));
    } else {
        checks.push(Check::new(Status::Fail, format!("missing `{qemu}` in PATH")));
    }

    for (tool, hint) in OPTIONAL_TOOLS {
        if has_tool(tool) {
            checks.push(Check::new(Status::Ok, tool));
        } else {
            checks.push(Check::new(Status::Warn, format!("missing `{tool}` ({hint})")));
        }
    }

    if caps.kvm_available {
        checks.push(Check::new(Status::Ok, "KVM device is read/writable"));
    } else {
        checks.push(Check::new(
            Status::Warn,
            "KVM unavailable, guests run under TCG (add yourself to the kvm group)",
        ));
    }

    if caps.audio_available {
        checks.push(Check::new(Status::Ok, "audio server running"));
    } else {
        checks.push(Check::new(Status::Warn, "no audio server, guests launch without sound"));
    }

    checks
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_HOST: HostCapabilities = HostCapabilities {
        kvm_available: true,
        audio_available: true,
    };

    #[test]
    fn test_everything_present() {
        let checks = collect(|_| true, "qemu-system-x86_64", &FULL_HOST);
        assert_eq!(checks.len(), 6);
        assert!(checks.iter().all(|c| c.status == Status::Ok));
    }

    #[test]
    fn test_missing_qemu_fails() {
        let checks = collect(|tool| tool != "qemu-system-x86_64", "qemu-system-x86_64", &FULL_HOST);
        assert_eq!(checks[0].status, Status::Fail);
        assert!(checks[0].message.contains("qemu-system-x86_64"));
    }

    #[test]
    fn test_optional_gaps_only_warn() {
        let checks = collect(
            |tool| tool == "qemu-system-arm",
            "qemu-system-arm",
            &HostCapabilities::default(),
        );
        assert!(checks.iter().all(|c| c.status != Status::Fail));
        assert_eq!(checks.iter().filter(|c| c.status == Status::Warn).count(), 5);
    }
}
