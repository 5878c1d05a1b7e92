//! Health verdicts and their severity order.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::config::HealthCodes;
use crate::config::schema::FALLBACK_HEALTH_CODE;

/// Health classification of a monitor or of the whole cluster.
///
/// Variants are declared in ascending severity so the derived `Ord`
/// gives FAILED > DEGRADED > OK > UNKNOWN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Verdict {
    #[default]
    Unknown,
    Ok,
    Degraded,
    Failed,
}

impl Verdict {
    /// Wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Unknown => "UNKNOWN",
            Verdict::Ok => "OK",
            Verdict::Degraded => "DEGRADED",
            Verdict::Failed => "FAILED",
        }
    }

    /// Parse a wire label. Unrecognized labels are treated as UNKNOWN.
    pub fn from_label(label: &str) -> Self {
        match label {
            "OK" => Verdict::Ok,
            "DEGRADED" => Verdict::Degraded,
            "FAILED" => Verdict::Failed,
            _ => Verdict::Unknown,
        }
    }

    /// Worst verdict of a set, UNKNOWN when the set is empty.
    pub fn worst<I>(verdicts: I) -> Self
    where
        I: IntoIterator<Item = Verdict>,
    {
        verdicts.into_iter().max().unwrap_or_default()
    }

    /// Map a cluster verdict to the configured health code.
    pub fn health_code(&self, codes: &HealthCodes) -> u16 {
        match self {
            Verdict::Failed => codes.code_failed,
            Verdict::Degraded => codes.code_degraded,
            Verdict::Ok => codes.code_healthy,
            Verdict::Unknown => FALLBACK_HEALTH_CODE,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Verdict {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Verdict::from_label(&label))
    }
}
