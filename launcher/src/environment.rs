//! Build tree checks run before handing off to runqemu.

use std::path::{Path, PathBuf};

/// Script that marks an initialized Yocto/OE checkout
pub const BUILD_ENV_MARKER: &str = "oe-init-build-env";

#[derive(Debug, thiserror::Error)]
pub enum EnvironmentMissing {
    #[error("build environment not initialized: {} not found", marker.display())]
    BuildEnvNotInitialized { marker: PathBuf },

    #[error("no images built for {machine}: {} does not exist", dir.display())]
    ImageDirMissing { machine: String, dir: PathBuf },
}

impl EnvironmentMissing {
    /// What the user should run to fix it
    pub fn remediation(&self) -> String {
        match self {
            EnvironmentMissing::BuildEnvNotInitialized { .. } => {
                "Run the setup script from the webOS OSE checkout first, then retry.".to_string()
            }
            EnvironmentMissing::ImageDirMissing { machine, .. } => format!(
                "Build an image first: source {BUILD_ENV_MARKER} && bitbake webos-image (MACHINE={machine})"
            ),
        }
    }
}

/// Where the build tree lives on disk
#[derive(Clone, Debug)]
pub struct BuildLayout {
    pub project_root: PathBuf,
    pub build_dir: PathBuf,
}

impl BuildLayout {
    pub fn new(project_root: impl Into<PathBuf>, build_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            build_dir: build_dir.into(),
        }
    }

    pub fn marker(&self) -> PathBuf {
        self.project_root.join(BUILD_ENV_MARKER)
    }

    /// Build directory as seen from inside `project_root`, where the build
    /// environment gets sourced. Paths outside the root are made absolute.
    pub fn build_dir_from_root(&self) -> PathBuf {
        match self.build_dir.strip_prefix(&self.project_root) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel.to_path_buf(),
            _ => absolute(&self.build_dir),
        }
    }

    /// `<build>/deploy/images/<machine>`
    pub fn image_dir(&self, machine: &str) -> PathBuf {
        self.build_dir.join("deploy/images").join(machine)
    }

    /// The marker is checked first so an uninitialized tree never reports a
    /// missing image.
    pub fn check(&self, machine: &str) -> Result<(), EnvironmentMissing> {
        let marker = self.marker();
        if !marker.is_file() {
            return Err(EnvironmentMissing::BuildEnvNotInitialized { marker });
        }

        let dir = self.image_dir(machine);
        if !dir.is_dir() {
            return Err(EnvironmentMissing::ImageDirMissing {
                machine: machine.to_string(),
                dir,
            });
        }
        Ok(())
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
