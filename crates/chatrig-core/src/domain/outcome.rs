use serde::Serialize;

/// Result of a best-effort step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum StepOutcome {
    Ok,
    Degraded(String),
    Failed(String),
}

impl StepOutcome {
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Ok => None,
            Self::Degraded(reason) | Self::Failed(reason) => Some(reason),
        }
    }
}

impl std::fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => f.write_str("ok"),
            Self::Degraded(reason) => write!(f, "degraded ({reason})"),
            Self::Failed(reason) => write!(f, "failed ({reason})"),
        }
    }
}
