use clap::{Parser, Subcommand};
use gfx_compose::LaunchConfig;
use std::path::PathBuf;

/// Flags of the `webos-qemu` launcher
#[derive(Debug, Parser)]
#[command(name = "webos-qemu")]
#[command(about = "Launch a webOS OSE image in QEMU with VirtIO GPU (virgl) acceleration")]
pub struct LaunchArgs {
    /// Target machine (passed through to runqemu)
    #[arg(short = 'm', long, value_name = "MACHINE")]
    pub machine: Option<String>,

    /// Image to boot
    #[arg(short = 'i', long, value_name = "IMAGE")]
    pub image: Option<String>,

    /// Display backend: sdl, gtk, vnc or none
    #[arg(short = 'd', long, value_name = "DISPLAY")]
    pub display: Option<String>,

    /// Guest memory in MB
    #[arg(long, value_name = "SIZE")]
    pub memory: Option<u32>,

    /// Disable the accelerated VirtIO GPU (falls back to -vga std)
    #[arg(long = "no-virgl")]
    pub no_virgl: bool,

    /// Do not request KVM acceleration
    #[arg(long = "no-kvm")]
    pub no_kvm: bool,

    /// Attach the serial console to stdio
    #[arg(long)]
    pub serial: bool,

    /// Serial-only mode, no display or GPU
    #[arg(long)]
    pub nographic: bool,

    /// Settings file (default: ./webos-qemu.toml if present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the runqemu invocation instead of running it
    #[arg(long)]
    pub dry_run: bool,

    /// With --dry-run, print the launch plan as JSON
    #[arg(long, requires = "dry_run")]
    pub json: bool,

    /// Debug logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl LaunchArgs {
    /// Layer the command line over `base`. Switches only ever turn their
    /// feature off (or serial/nographic on); absent flags keep `base`.
    pub fn apply(&self, base: LaunchConfig) -> LaunchConfig {
        let mut config = base;
        if let Some(ref machine) = self.machine {
            config.machine = machine.clone();
        }
        if let Some(ref image) = self.image {
            config.image = image.clone();
        }
        if let Some(ref display) = self.display {
            config.display = display.clone();
        }
        if let Some(memory) = self.memory {
            config.memory_mb = memory;
        }
        if self.no_virgl {
            config.enable_gpu = false;
        }
        if self.no_kvm {
            config.enable_kvm = false;
        }
        if self.serial {
            config.enable_serial = true;
        }
        if self.nographic {
            config.no_graphic = true;
        }
        config
    }
}

#[derive(Debug, Parser)]
#[command(name = "webos-gfx-setup")]
#[command(about = "Prepare and check the host for the webOS OSE QEMU graphics environment")]
pub struct SetupCli {
    /// Settings file (default: ./webos-qemu.toml if present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub cmd: SetupCmd,
}

#[derive(Debug, Subcommand)]
pub enum SetupCmd {
    /// Write the static QEMU graphics settings file.
    WriteConfig {
        #[arg(long, short, default_value = crate::setup::DEFAULT_CONF_PATH)]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Check host tools, KVM access and audio.
    Doctor,

    /// List supported machines and images.
    Machines {
        #[arg(long)]
        json: bool,
    },
}
