//! Resource references used for icons.

use std::fmt;

use crate::error::ValueParseError;

const THEME_PROTOCOL: &str = "theme://";
const FONT_ICON_PROTOCOL: &str = "fonticon://";

/// A reference to an image or glyph the client can load.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Absolute or relative URL.
    External(String),
    /// Path inside the active theme.
    Theme(String),
    /// A glyph from an icon font.
    FontIcon { family: String, codepoint: u32 },
}

impl Resource {
    pub fn external(url: impl Into<String>) -> Self {
        Resource::External(url.into())
    }

    pub fn theme(path: impl Into<String>) -> Self {
        Resource::Theme(path.into())
    }

    /// Parse the declarative form: `theme://path`, `fonticon://Family/hex` or a URL.
    pub fn parse(input: &str) -> Result<Resource, ValueParseError> {
        if input.is_empty() {
            return Err(ValueParseError::Empty);
        }
        if let Some(path) = input.strip_prefix(THEME_PROTOCOL) {
            return Ok(Resource::Theme(path.to_owned()));
        }
        if let Some(rest) = input.strip_prefix(FONT_ICON_PROTOCOL) {
            let (family, hex) = rest.split_once('/').ok_or_else(|| {
                ValueParseError::invalid("font icon", input, "expected family/codepoint")
            })?;
            let codepoint = u32::from_str_radix(hex, 16)
                .map_err(|e| ValueParseError::invalid("font icon", input, e.to_string()))?;
            return Ok(Resource::FontIcon {
                family: family.to_owned(),
                codepoint,
            });
        }
        Ok(Resource::External(input.to_owned()))
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::External(url) => f.write_str(url),
            Resource::Theme(path) => write!(f, "{THEME_PROTOCOL}{path}"),
            Resource::FontIcon { family, codepoint } => {
                write!(f, "{FONT_ICON_PROTOCOL}{family}/{codepoint:x}")
            }
        }
    }
}
