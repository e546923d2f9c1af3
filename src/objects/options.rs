//! Parser configuration.

use crate::objects::store::DEFAULT_GROUP;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParseOptions {
    /// Fail on unknown directives and on faces with fewer than three
    /// vertices instead of skipping or keeping them. Default: false
    pub strict: bool,

    /// Name of the group created for faces that appear before any `g`/`o`
    /// line, and for `g` lines with no name. Default: `"default"`
    pub default_group: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        return ParseOptions {
            strict: false,
            default_group: DEFAULT_GROUP.to_string(),
        };
    }
}

impl ParseOptions {
    pub fn strict() -> Self {
        return ParseOptions {
            strict: true,
            ..Default::default()
        };
    }

    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        return self;
    }

    #[must_use]
    pub fn with_default_group(mut self, name: &str) -> Self {
        self.default_group = name.to_string();
        return self;
    }
}
