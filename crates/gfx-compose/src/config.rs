//! Launch configuration and the known machine table.

pub const DEFAULT_MACHINE: &str = "qemux86-64";
pub const DEFAULT_IMAGE: &str = "webos-image";
pub const DEFAULT_DISPLAY: &str = "sdl";
pub const DEFAULT_MEMORY_MB: u32 = 2048;

/// Images the build is expected to produce.
pub const KNOWN_IMAGES: &[&str] = &["webos-image"];

/// Target machines with a Yocto BSP in the webOS OSE layers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KnownMachine {
    Qemux86,
    Qemux86_64,
    Qemuarm,
    RaspberryPi3,
    RaspberryPi3_64,
    RaspberryPi4,
    RaspberryPi4_64,
}

impl KnownMachine {
    pub const ALL: [KnownMachine; 7] = [
        KnownMachine::Qemux86,
        KnownMachine::Qemux86_64,
        KnownMachine::Qemuarm,
        KnownMachine::RaspberryPi3,
        KnownMachine::RaspberryPi3_64,
        KnownMachine::RaspberryPi4,
        KnownMachine::RaspberryPi4_64,
    ];

    /// Returns the bitbake `MACHINE` name
    pub fn name(&self) -> &'static str {
        match self {
            KnownMachine::Qemux86 => "qemux86",
            KnownMachine::Qemux86_64 => "qemux86-64",
            KnownMachine::Qemuarm => "qemuarm",
            KnownMachine::RaspberryPi3 => "raspberrypi3",
            KnownMachine::RaspberryPi3_64 => "raspberrypi3-64",
            KnownMachine::RaspberryPi4 => "raspberrypi4",
            KnownMachine::RaspberryPi4_64 => "raspberrypi4-64",
        }
    }

    /// Returns the QEMU system emulator runqemu uses for this machine.
    ///
    /// Hardware boards have no emulator.
    pub fn qemu_binary(&self) -> Option<&'static str> {
        match self {
            KnownMachine::Qemux86 => Some("qemu-system-i386"),
            KnownMachine::Qemux86_64 => Some("qemu-system-x86_64"),
            KnownMachine::Qemuarm => Some("qemu-system-arm"),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }
}

/// Options for a single runqemu launch.
///
/// `display` stays a raw string until composition so that an unsupported
/// backend is reported by the composer together with the field it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchConfig {
    pub machine: String,
    pub image: String,
    pub display: String,
    pub memory_mb: u32,
    pub enable_gpu: bool,
    pub enable_kvm: bool,
    pub enable_serial: bool,
    pub no_graphic: bool,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            machine: DEFAULT_MACHINE.to_string(),
            image: DEFAULT_IMAGE.to_string(),
            display: DEFAULT_DISPLAY.to_string(),
            memory_mb: DEFAULT_MEMORY_MB,
            enable_gpu: true,
            enable_kvm: true,
            enable_serial: false,
            no_graphic: false,
        }
    }
}

impl LaunchConfig {
    /// Known machine entry, if `machine` names one. Unknown names are still
    /// passed through to runqemu unchanged.
    pub fn known_machine(&self) -> Option<KnownMachine> {
        KnownMachine::from_name(&self.machine)
    }
}
