use std::fmt;

/// Fatal composition failure. No argument list is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComposeError {
    #[error("invalid config: {field} = {value:?}: {reason}")]
    InvalidConfig {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl ComposeError {
    pub fn field(&self) -> &'static str {
        match self {
            ComposeError::InvalidConfig { field, .. } => *field,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            ComposeError::InvalidConfig { value, .. } => value,
        }
    }
}

/// Host capability that may be missing at launch time
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    Kvm,
    Audio,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Kvm => "KVM",
            Capability::Audio => "audio server",
        };
        f.write_str(name)
    }
}

/// Non-fatal finding collected while composing. The launch goes ahead with
/// a slower or simpler configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    CapabilityUnavailable {
        capability: Capability,
        detail: String,
    },
}

impl Diagnostic {
    pub fn capability(&self) -> Capability {
        match self {
            Diagnostic::CapabilityUnavailable { capability, .. } => *capability,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::CapabilityUnavailable { capability, detail } => {
                write!(f, "{capability} unavailable: {detail}")
            }
        }
    }
}
