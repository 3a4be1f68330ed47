//! RGBA colors with CSS parsing and HSV/HSL conversion.

use std::fmt;

use super::tokenizer::{split_dimension, tokenize, Token};
use crate::error::ValueParseError;

/// An RGBA color, each channel in `0..=255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 255,
        }
    }

    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// CSS hex form `#rrggbb` (alpha is not part of the CSS form).
    pub fn to_css(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }

    /// Hue in degrees `[0, 360)`, saturation and value in `[0, 1]`.
    pub fn to_hsv(&self) -> (f32, f32, f32) {
        let r = self.red as f32 / 255.0;
        let g = self.green as f32 / 255.0;
        let b = self.blue as f32 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let hue = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * (((g - b) / delta).rem_euclid(6.0))
        } else if max == g {
            60.0 * (((b - r) / delta) + 2.0)
        } else {
            60.0 * (((r - g) / delta) + 4.0)
        };
        let saturation = if max == 0.0 { 0.0 } else { delta / max };
        (hue, saturation, max)
    }

    /// Build a color from hue (degrees), saturation and value (`[0, 1]`).
    pub fn from_hsv(hue: f32, saturation: f32, value: f32) -> Self {
        let chroma = value * saturation;
        let (r, g, b) = hue_to_rgb(hue, chroma);
        let m = value - chroma;
        Self::rgb(channel(r + m), channel(g + m), channel(b + m))
    }

    /// Build a color from hue (degrees), saturation and lightness (`[0, 1]`).
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let (r, g, b) = hue_to_rgb(hue, chroma);
        let m = lightness - chroma / 2.0;
        Self::rgb(channel(r + m), channel(g + m), channel(b + m))
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

fn hue_to_rgb(hue: f32, chroma: f32) -> (f32, f32, f32) {
    let h = hue.rem_euclid(360.0) / 60.0;
    let x = chroma * (1.0 - (h.rem_euclid(2.0) - 1.0).abs());
    match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    }
}

fn channel(unit: f32) -> u8 {
    (unit.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Parse a CSS color string.
///
/// Accepted forms: `#rgb`, `#rrggbb`, `rgb(r, g, b)`, `rgba(r, g, b, a)` with
/// `a` in `[0, 1]`, `hsv(h, s, v)` and `hsl(h, s, l)` with `h` in degrees and
/// `s`, `v`, `l` as percentages (with or without the `%` sign).
pub fn parse_color(input: &str) -> Result<Color, ValueParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValueParseError::Empty);
    }
    let tokens = tokenize(trimmed)
        .ok_or_else(|| ValueParseError::invalid("color", input, "unexpected character"))?;

    match tokens.as_slice() {
        [(Token::HexColor, text)] => parse_hex(text, input),
        [(Token::Ident, name), (Token::ParenOpen, _), rest @ ..] => {
            let args = function_args(rest, input)?;
            match (name.to_ascii_lowercase().as_str(), args.as_slice()) {
                ("rgb", [r, g, b]) => Ok(Color::rgb(
                    byte(r, input)?,
                    byte(g, input)?,
                    byte(b, input)?,
                )),
                ("rgba", [r, g, b, a]) => {
                    let alpha = a.number;
                    if !(0.0..=1.0).contains(&alpha) {
                        return Err(ValueParseError::invalid(
                            "color",
                            input,
                            "alpha must be between 0 and 1",
                        ));
                    }
                    Ok(Color::rgba(
                        byte(r, input)?,
                        byte(g, input)?,
                        byte(b, input)?,
                        channel(alpha),
                    ))
                }
                ("hsv", [h, s, v]) => Ok(Color::from_hsv(
                    degrees(h, input)?,
                    percent(s, input)?,
                    percent(v, input)?,
                )),
                ("hsl", [h, s, l]) => Ok(Color::from_hsl(
                    degrees(h, input)?,
                    percent(s, input)?,
                    percent(l, input)?,
                )),
                (other, args) => Err(ValueParseError::invalid(
                    "color",
                    input,
                    format!("unsupported function {other} with {} arguments", args.len()),
                )),
            }
        }
        _ => Err(ValueParseError::invalid(
            "color",
            input,
            "expected a hex color or a color function",
        )),
    }
}

/// One numeric function argument, remembering whether it carried a `%`.
#[derive(Debug, Clone, Copy)]
struct Arg {
    number: f32,
    percent: bool,
}

fn function_args(tokens: &[(Token, &str)], input: &str) -> Result<Vec<Arg>, ValueParseError> {
    let mut args = Vec::new();
    let mut expect_value = true;
    for (i, (token, text)) in tokens.iter().enumerate() {
        match (token, expect_value) {
            (Token::Number, true) => {
                args.push(Arg {
                    number: number(text, input)?,
                    percent: false,
                });
                expect_value = false;
            }
            (Token::Dimension, true) => {
                let (value, unit) = split_dimension(text);
                if unit != "%" {
                    return Err(ValueParseError::invalid(
                        "color",
                        input,
                        format!("unexpected unit {unit}"),
                    ));
                }
                args.push(Arg {
                    number: number(value, input)?,
                    percent: true,
                });
                expect_value = false;
            }
            (Token::Comma, false) => expect_value = true,
            (Token::ParenClose, false) if i == tokens.len() - 1 => return Ok(args),
            _ => break,
        }
    }
    Err(ValueParseError::invalid(
        "color",
        input,
        "malformed argument list",
    ))
}

fn number(text: &str, input: &str) -> Result<f32, ValueParseError> {
    text.parse::<f32>()
        .map_err(|e| ValueParseError::invalid("color", input, e.to_string()))
}

fn byte(arg: &Arg, input: &str) -> Result<u8, ValueParseError> {
    if arg.percent || arg.number.fract() != 0.0 || !(0.0..=255.0).contains(&arg.number) {
        return Err(ValueParseError::invalid(
            "color",
            input,
            "channel must be an integer between 0 and 255",
        ));
    }
    Ok(arg.number as u8)
}

fn degrees(arg: &Arg, input: &str) -> Result<f32, ValueParseError> {
    if arg.percent || !(0.0..=360.0).contains(&arg.number) {
        return Err(ValueParseError::invalid(
            "color",
            input,
            "hue must be between 0 and 360",
        ));
    }
    Ok(arg.number)
}

fn percent(arg: &Arg, input: &str) -> Result<f32, ValueParseError> {
    if !(0.0..=100.0).contains(&arg.number) {
        return Err(ValueParseError::invalid(
            "color",
            input,
            "percentage must be between 0 and 100",
        ));
    }
    Ok(arg.number / 100.0)
}

fn parse_hex(text: &str, input: &str) -> Result<Color, ValueParseError> {
    let digits = &text[1..];
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_owned(),
        _ => {
            return Err(ValueParseError::invalid(
                "color",
                input,
                "hex color must have 3 or 6 digits",
            ))
        }
    };
    let component = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&expanded[range], 16)
            .map_err(|e| ValueParseError::invalid("color", input, e.to_string()))
    };
    Ok(Color::rgb(component(0..2)?, component(2..4)?, component(4..6)?))
}
