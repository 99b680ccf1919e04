use std::fmt;
use std::str::FromStr;

use webir_common::WebirError;

/// Binding languages the emitter can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingTarget {
    Gleam,
}

impl BindingTarget {
    pub const ALL: [BindingTarget; 1] = [BindingTarget::Gleam];

    pub fn as_str(self) -> &'static str {
        match self {
            BindingTarget::Gleam => "gleam",
        }
    }

    /// Parse a language name as given on the command line.
    pub fn parse(name: &str) -> Result<Self, WebirError> {
        Self::ALL
            .into_iter()
            .find(|target| target.as_str() == name)
            .ok_or_else(|| WebirError::UnsupportedTarget {
                name: name.to_string(),
            })
    }
}

impl FromStr for BindingTarget {
    type Err = WebirError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for BindingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
