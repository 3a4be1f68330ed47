//! Component sizes: Size, Unit, Sizing (width + height).

use std::fmt;

use super::tokenizer::{split_dimension, tokenize, Token};
use crate::error::ValueParseError;

/// A CSS length unit accepted for component width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Pixels,
    Points,
    Picas,
    Em,
    Rem,
    Ex,
    Millimeters,
    Centimeters,
    Inches,
    Percentage,
    ViewWidth,
    ViewHeight,
    ViewMin,
    ViewMax,
}

impl Unit {
    /// The CSS suffix for this unit.
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Pixels => "px",
            Unit::Points => "pt",
            Unit::Picas => "pc",
            Unit::Em => "em",
            Unit::Rem => "rem",
            Unit::Ex => "ex",
            Unit::Millimeters => "mm",
            Unit::Centimeters => "cm",
            Unit::Inches => "in",
            Unit::Percentage => "%",
            Unit::ViewWidth => "vw",
            Unit::ViewHeight => "vh",
            Unit::ViewMin => "vmin",
            Unit::ViewMax => "vmax",
        }
    }

    /// Look up a unit by its CSS suffix.
    pub fn from_symbol(symbol: &str) -> Option<Unit> {
        let unit = match symbol {
            "px" => Unit::Pixels,
            "pt" => Unit::Points,
            "pc" => Unit::Picas,
            "em" => Unit::Em,
            "rem" => Unit::Rem,
            "ex" => Unit::Ex,
            "mm" => Unit::Millimeters,
            "cm" => Unit::Centimeters,
            "in" => Unit::Inches,
            "%" => Unit::Percentage,
            "vw" => Unit::ViewWidth,
            "vh" => Unit::ViewHeight,
            "vmin" => Unit::ViewMin,
            "vmax" => Unit::ViewMax,
            _ => return None,
        };
        Some(unit)
    }
}

/// A single dimension. Any negative value means "undefined" (size to content).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub value: f32,
    pub unit: Unit,
}

impl Size {
    /// Size to content.
    pub const UNDEFINED: Size = Size {
        value: -1.0,
        unit: Unit::Pixels,
    };

    /// Fill the parent.
    pub const FULL: Size = Size {
        value: 100.0,
        unit: Unit::Percentage,
    };

    pub fn new(value: f32, unit: Unit) -> Self {
        if value < 0.0 {
            return Self::UNDEFINED;
        }
        Self { value, unit }
    }

    pub fn pixels(value: f32) -> Self {
        Self::new(value, Unit::Pixels)
    }

    pub fn percent(value: f32) -> Self {
        Self::new(value, Unit::Percentage)
    }

    pub fn is_undefined(&self) -> bool {
        self.value < 0.0
    }

    pub fn is_full(&self) -> bool {
        self.unit == Unit::Percentage && self.value == 100.0
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::UNDEFINED
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_undefined() {
            return Ok(());
        }
        if self.value.fract() == 0.0 {
            write!(f, "{}{}", self.value as i64, self.unit.symbol())
        } else {
            write!(f, "{}{}", self.value, self.unit.symbol())
        }
    }
}

/// Parse a size string such as `"100%"`, `"12.5em"` or `"200"` (pixels).
///
/// An empty string parses as [`Size::UNDEFINED`].
pub fn parse_size(input: &str) -> Result<Size, ValueParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Size::UNDEFINED);
    }
    let tokens = tokenize(trimmed)
        .ok_or_else(|| ValueParseError::invalid("size", input, "unexpected character"))?;
    match tokens.as_slice() {
        [(Token::Number, text)] => {
            let value = parse_number(text, input)?;
            Ok(Size::new(value, Unit::Pixels))
        }
        [(Token::Dimension, text)] => {
            let (number, symbol) = split_dimension(text);
            let unit = Unit::from_symbol(symbol)
                .ok_or_else(|| ValueParseError::invalid("size", input, "unknown unit"))?;
            Ok(Size::new(parse_number(number, input)?, unit))
        }
        _ => Err(ValueParseError::invalid(
            "size",
            input,
            "expected a single number with an optional unit",
        )),
    }
}

fn parse_number(text: &str, input: &str) -> Result<f32, ValueParseError> {
    text.parse::<f32>()
        .map_err(|e| ValueParseError::invalid("size", input, e.to_string()))
}

/// Width and height of a component.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sizing {
    pub width: Size,
    pub height: Size,
}

impl Sizing {
    pub fn undefined() -> Self {
        Self::default()
    }

    pub fn full() -> Self {
        Self {
            width: Size::FULL,
            height: Size::FULL,
        }
    }

    /// Full width, undefined height: the default for vertical layouts.
    pub fn full_width() -> Self {
        Self {
            width: Size::FULL,
            height: Size::UNDEFINED,
        }
    }

    pub fn is_full(&self) -> bool {
        self.width.is_full() && self.height.is_full()
    }

    pub fn is_undefined(&self) -> bool {
        self.width.is_undefined() && self.height.is_undefined()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_percent() {
        assert_eq!(parse_size("100%").unwrap(), Size::FULL);
    }

    #[test]
    fn parse_fractional_em() {
        let size = parse_size("12.5em").unwrap();
        assert_eq!(size.value, 12.5);
        assert_eq!(size.unit, Unit::Em);
    }

    #[test]
    fn bare_number_is_pixels() {
        assert_eq!(parse_size("200").unwrap(), Size::pixels(200.0));
    }

    #[test]
    fn empty_and_negative_are_undefined() {
        assert!(parse_size("").unwrap().is_undefined());
        assert!(parse_size("-1px").unwrap().is_undefined());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_size("12 px").is_err());
        assert!(parse_size("wide").is_err());
        assert!(parse_size("10px;").is_err());
    }

    #[test]
    fn display_round_trip() {
        for text in ["100%", "12.5em", "200px", "3rem", "50vw"] {
            assert_eq!(parse_size(text).unwrap().to_string(), text);
        }
        assert_eq!(Size::UNDEFINED.to_string(), "");
    }

    #[test]
    fn sizing_helpers() {
        assert!(Sizing::full().is_full());
        assert!(Sizing::undefined().is_undefined());
        let layout = Sizing::full_width();
        assert!(layout.width.is_full());
        assert!(layout.height.is_undefined());
    }
}
