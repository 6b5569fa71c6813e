use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::TabconvError;

/// How parsed tables are combined with the tables already in a document.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Replace,
    Merge,
}

impl FromStr for Mode {
    type Err = TabconvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "replace" => Ok(Mode::Replace),
            "merge" => Ok(Mode::Merge),
            other => Err(TabconvError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Replace => f.write_str("replace"),
            Mode::Merge => f.write_str("merge"),
        }
    }
}
