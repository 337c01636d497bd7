/*
[INPUT]:  Workflow API enumerations (task status, status filter, tenancy region)
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new regions are added
*/

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

/// Lifecycle status of a workflow task as reported by the API.
///
/// Unrecognised wire values are preserved in [`TaskStatus::Unknown`] so that
/// record mapping never fails on a new server-side status.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Active,
    Expired,
    Complete,
    Overridden,
    Terminated,
    Unknown(String),
}

impl TaskStatus {
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => TaskStatus::Active,
            "expired" => TaskStatus::Expired,
            "complete" => TaskStatus::Complete,
            "overridden" => TaskStatus::Overridden,
            "terminated" => TaskStatus::Terminated,
            _ => TaskStatus::Unknown(value.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Active => "active",
            TaskStatus::Expired => "expired",
            TaskStatus::Complete => "complete",
            TaskStatus::Overridden => "overridden",
            TaskStatus::Terminated => "terminated",
            TaskStatus::Unknown(raw) => raw,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, TaskStatus::Active)
    }

    /// Display label with each word capitalised ("Active", "Overridden").
    pub fn label(&self) -> String {
        self.as_str()
            .split(' ')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TaskStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Status filter sent with the task query. `All` omits the parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    Active,
    Expired,
    Complete,
    Overridden,
    Terminated,
    All,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 6] = [
        StatusFilter::Active,
        StatusFilter::Expired,
        StatusFilter::Complete,
        StatusFilter::Overridden,
        StatusFilter::Terminated,
        StatusFilter::All,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::Active => "active",
            StatusFilter::Expired => "expired",
            StatusFilter::Complete => "complete",
            StatusFilter::Overridden => "overridden",
            StatusFilter::Terminated => "terminated",
            StatusFilter::All => "all",
        }
    }

    /// Value for the `status` query parameter, `None` when no filter applies.
    pub fn query_value(self) -> Option<&'static str> {
        match self {
            StatusFilter::All => None,
            other => Some(other.as_str()),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        StatusFilter::ALL
            .into_iter()
            .find(|filter| filter.as_str() == wanted)
            .ok_or_else(|| format!("unknown status filter: {s}"))
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tenancy region selecting the API host.
///
/// Any unrecognised region code falls back to [`Region::Us`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Region {
    #[default]
    Us,
    Eu,
    Au,
    Ca,
    Uk,
}

impl Region {
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "us" => Region::Us,
            "eu" => Region::Eu,
            "au" => Region::Au,
            "ca" => Region::Ca,
            "uk" => Region::Uk,
            other => {
                tracing::warn!(region = other, "unrecognised tenancy region, using us");
                Region::Us
            }
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Region::Us => "us",
            Region::Eu => "eu",
            Region::Au => "au",
            Region::Ca => "ca",
            Region::Uk => "uk",
        }
    }

    pub fn base_url(self) -> &'static str {
        match self {
            Region::Us => "https://us.nintex.io",
            Region::Eu => "https://eu.nintex.io",
            Region::Au => "https://au.nintex.io",
            Region::Ca => "https://ca.nintex.io",
            Region::Uk => "https://uk.nintex.io",
        }
    }
}

impl From<String> for Region {
    fn from(value: String) -> Self {
        Region::from_code(&value)
    }
}

impl From<Region> for String {
    fn from(value: Region) -> Self {
        value.code().to_string()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
