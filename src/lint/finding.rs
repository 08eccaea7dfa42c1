use serde::{Deserialize, Serialize};

/// A defect reported by a recipe check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Stable check identifier (e.g. "KILN-002").
    pub check_id: String,
    /// Human-readable check name.
    pub check_name: String,
    /// Severity level.
    pub severity: Severity,
    /// What kind of defect this is.
    pub category: DefectCategory,
    /// Human-readable description of the defect.
    pub message: String,
    /// Dotted path to the offending field (e.g. "source.sha256").
    pub field: Option<String>,
    /// Suggested fix.
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn from_str_lenient(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "info" => Some(Self::Info),
            "low" => Some(Self::Low),
            "medium" | "med" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" | "crit" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefectCategory {
    /// Missing, empty, or malformed schema fields.
    Schema,
    /// Fetchability and integrity of the declared source.
    Integrity,
    /// Dependency list problems.
    Dependencies,
    /// Gaps in post-build verification.
    Testing,
    /// Platform selector problems.
    Portability,
}

impl std::fmt::Display for DefectCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Schema => write!(f, "Schema"),
            Self::Integrity => write!(f, "Integrity"),
            Self::Dependencies => write!(f, "Dependencies"),
            Self::Testing => write!(f, "Testing"),
            Self::Portability => write!(f, "Portability"),
        }
    }
}

/// Metadata about a check, used for `list-checks` output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckMetadata {
    pub id: String,
    pub name: String,
    pub description: String,
    pub default_severity: Severity,
    pub category: DefectCategory,
}
