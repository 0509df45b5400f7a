//! runqemu invocation
//!
//! runqemu only works inside an initialized build environment, so the
//! command sources `oe-init-build-env` in a bash wrapper and then `exec`s
//! runqemu with the composed `qemuparams`.

use crate::environment::{BuildLayout, BUILD_ENV_MARKER};
use anyhow::{bail, Context, Result};
use gfx_compose::{ArgumentList, Composition, Diagnostic, LaunchConfig};
use serde::Serialize;
use std::process::{Command, Stdio};

pub const RUNQEMU: &str = "runqemu";

/// Everything needed to start runqemu, in a printable form
#[derive(Debug, Serialize)]
pub struct LaunchPlan {
    pub machine: String,
    pub image: String,
    pub args: ArgumentList,
    pub qemuparams: String,
    pub diagnostics: Vec<String>,
    pub vnc_port: Option<u16>,
}

impl LaunchPlan {
    pub fn new(config: &LaunchConfig, composition: &Composition) -> Self {
        Self {
            machine: config.machine.clone(),
            image: config.image.clone(),
            args: composition.args.clone(),
            qemuparams: composition.args.qemuparams(),
            diagnostics: composition
                .diagnostics
                .iter()
                .map(Diagnostic::to_string)
                .collect(),
            vnc_port: composition.vnc_port,
        }
    }

    /// runqemu's positional arguments
    pub fn runqemu_args(&self) -> [String; 3] {
        [
            self.machine.clone(),
            self.image.clone(),
            format!("qemuparams={}", self.qemuparams),
        ]
    }

    /// Shell-style rendering for `--dry-run`
    pub fn display_command(&self) -> String {
        format!(
            "{RUNQEMU} {} {} qemuparams=\"{}\"",
            self.machine, self.image, self.qemuparams
        )
    }

    /// Build the wrapped runqemu command for `layout`
    pub fn command(&self, layout: &BuildLayout) -> Command {
        let script = format!(
            "source ./{BUILD_ENV_MARKER} \"$1\" > /dev/null && shift && exec {RUNQEMU} \"$@\""
        );
        let mut cmd = Command::new("bash");
        cmd.current_dir(&layout.project_root)
            .arg("-c")
            .arg(script)
            .arg("webos-qemu")
            .arg(layout.build_dir_from_root())
            .args(self.runqemu_args());
        cmd
    }
}

/// Run runqemu in the foreground and wait for it to exit
pub fn run(plan: &LaunchPlan, layout: &BuildLayout) -> Result<()> {
    log::info!("starting {}", plan.display_command());
    let status = plan
        .command(layout)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .context("Failed to run runqemu")?;

    if !status.success() {
        bail!("runqemu exited with {status}");
    }
    Ok(())
}
