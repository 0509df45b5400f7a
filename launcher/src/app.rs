use crate::cli::{LaunchArgs, SetupCli, SetupCmd};
use crate::environment::{BuildLayout, EnvironmentMissing};
use crate::runner::LaunchPlan;
use crate::settings::Settings;
use anyhow::Result;
use gfx_compose::{compose, CapabilityProbe, HostCapabilities, HostProbe, LaunchConfig};

/// `webos-qemu`: settings, then flags, then probe, compose, check and run.
pub fn launch(args: &LaunchArgs) -> Result<()> {
    let settings = Settings::load(args.config.as_deref())?;
    let probe = HostProbe::new().kvm_device(&settings.paths.kvm_device);
    launch_with(args, &settings, &probe, &settings.build_layout())
}

/// Launch flow against an explicit host probe and build tree.
///
/// Composition errors are returned before the build tree is looked at, and
/// `--dry-run` never looks at it.
pub fn launch_with(
    args: &LaunchArgs,
    settings: &Settings,
    probe: &impl CapabilityProbe,
    layout: &BuildLayout,
) -> Result<()> {
    let config = args.apply(settings.launch_config());

    if config.known_machine().is_none() {
        log::debug!("machine {} is not in the known list, passing it through", config.machine);
    }

    let caps = probe.probe();
    log::debug!("host capabilities: {caps:?}");

    let composition = compose(&config, &caps)?;
    if audio_dropped(&config, &caps) {
        log::warn!("no audio server detected, launching without sound");
    }
    for diagnostic in &composition.diagnostics {
        log::warn!("{diagnostic}");
    }
    if let Some(port) = composition.vnc_port {
        log::info!("VNC display will listen on localhost:{port}");
    }

    let plan = LaunchPlan::new(&config, &composition);
    if args.dry_run {
        if args.json {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        } else {
            println!("{}", plan.display_command());
        }
        return Ok(());
    }

    layout.check(&config.machine)?;
    crate::runner::run(&plan, layout)
}

/// A graphical launch on a host without an audio server loses sound.
fn audio_dropped(config: &LaunchConfig, caps: &HostCapabilities) -> bool {
    !config.no_graphic && !caps.audio_available
}

pub fn setup(cli: &SetupCli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    match &cli.cmd {
        SetupCmd::WriteConfig { output, force } => crate::setup::write_config(output, *force),
        SetupCmd::Doctor => crate::doctor::run(&settings),
        SetupCmd::Machines { json } => crate::setup::machines(*json),
    }
}

/// Print a fatal error, plus the fix when the build tree is incomplete.
pub fn report(err: &anyhow::Error) {
    eprintln!("❌ {err:#}");
    if let Some(missing) = err.downcast_ref::<EnvironmentMissing>() {
        eprintln!("💡 {}", missing.remediation());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use gfx_compose::ComposeError;
    use tempfile::TempDir;

    const FULL_HOST: HostCapabilities = HostCapabilities {
        kvm_available: true,
        audio_available: true,
    };

    fn args(flags: &[&str]) -> LaunchArgs {
        LaunchArgs::try_parse_from(std::iter::once("webos-qemu").chain(flags.iter().copied()))
            .unwrap()
    }

    fn empty_tree(tmp: &TempDir) -> BuildLayout {
        BuildLayout::new(tmp.path(), tmp.path().join("BUILD"))
    }

    #[test]
    fn test_invalid_display_fails_before_tree_check() {
        let tmp = TempDir::new().unwrap();
        let err = launch_with(
            &args(&["--display", "spice"]),
            &Settings::default(),
            &FULL_HOST,
            &empty_tree(&tmp),
        )
        .unwrap_err();

        assert!(err.downcast_ref::<EnvironmentMissing>().is_none());
        let compose_err = err.downcast_ref::<ComposeError>().unwrap();
        assert_eq!(compose_err.field(), "displayBackend");
        assert_eq!(compose_err.value(), "spice");
    }

    #[test]
    fn test_dry_run_skips_tree_check() {
        let tmp = TempDir::new().unwrap();
        let result = launch_with(
            &args(&["--dry-run", "--display", "vnc"]),
            &Settings::default(),
            &HostCapabilities::default(),
            &empty_tree(&tmp),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_missing_tree_keeps_remediation() {
        let tmp = TempDir::new().unwrap();
        let err = launch_with(&args(&[]), &Settings::default(), &FULL_HOST, &empty_tree(&tmp))
            .unwrap_err();

        let missing = err.downcast_ref::<EnvironmentMissing>().unwrap();
        assert!(matches!(missing, EnvironmentMissing::BuildEnvNotInitialized { .. }));
        assert!(missing.remediation().contains("setup script"));
    }

    #[test]
    fn test_audio_loss_only_matters_for_graphical_runs() {
        let no_audio = HostCapabilities {
            kvm_available: true,
            audio_available: false,
        };
        let graphical = LaunchConfig::default();
        let headless = LaunchConfig {
            no_graphic: true,
            ..LaunchConfig::default()
        };

        assert!(audio_dropped(&graphical, &no_audio));
        assert!(!audio_dropped(&headless, &no_audio));
        assert!(!audio_dropped(&graphical, &FULL_HOST));
    }
}
