use crate::error::EstimateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How often a recurring task is performed.
///
/// Each variant maps to a fixed day divisor used to spread the task's quantity
/// over an average day. Parsing is strict: labels that do not name one of these
/// variants are rejected rather than defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Frequency {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Semiannual,
    Annual,
}

impl Frequency {
    pub const ALL: [Frequency; 7] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Biweekly,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::Semiannual,
        Frequency::Annual,
    ];

    /// Number of days one occurrence is spread over. Never zero.
    pub fn divisor_days(self) -> f64 {
        match self {
            Frequency::Daily => 1.0,
            Frequency::Weekly => 7.0,
            Frequency::Biweekly => 14.0,
            Frequency::Monthly => 30.0,
            Frequency::Quarterly => 90.0,
            Frequency::Semiannual => 182.0,
            Frequency::Annual => 365.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Semiannual => "semiannual",
            Frequency::Annual => "annual",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = EstimateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "biweekly" | "fortnightly" => Ok(Frequency::Biweekly),
            "monthly" => Ok(Frequency::Monthly),
            "quarterly" => Ok(Frequency::Quarterly),
            "semiannual" | "semiannually" | "halfyearly" => Ok(Frequency::Semiannual),
            "annual" | "annually" | "yearly" => Ok(Frequency::Annual),
            _ => Err(EstimateError::UnknownFrequency(s.to_string())),
        }
    }
}

impl TryFrom<String> for Frequency {
    type Error = EstimateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Frequency> for String {
    fn from(value: Frequency) -> Self {
        value.as_str().to_string()
    }
}
