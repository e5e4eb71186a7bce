//! CSS value parsers for the handful of properties inline styles may set.

use cssparser::{ParseError, Parser, Token};

use crate::model::{Alignment, Color};

/// Parse a color value: `#rgb`, `#rrggbb`, `rgb()`/`rgba()` or one of the
/// named colors the article generator uses.
pub(crate) fn parse_color(input: &mut Parser<'_, '_>) -> Option<Color> {
    if let Ok(ident) = input.try_parse(|i| i.expect_ident_cloned()) {
        return named_color(ident.as_ref());
    }

    // cssparser yields IDHash for `#ff0000` but Hash for `#222299`; the token
    // variant must be checked inside try_parse so the position is restored.
    if let Ok(hash) = input.try_parse(|i| -> Result<_, ParseError<'_, ()>> {
        match i.next()? {
            Token::IDHash(h) | Token::Hash(h) => Ok(h.clone()),
            _ => Err(i.new_custom_error(())),
        }
    }) {
        return parse_hex_color(hash.as_ref());
    }

    input.try_parse(parse_rgb_function).ok()
}

/// Parse a standalone color string such as `"#1D4ED8"` or `"rgb(1, 2, 3)"`.
#[cfg(test)]
fn parse_color_str(value: &str) -> Option<Color> {
    use cssparser::ParserInput;

    let mut input = ParserInput::new(value);
    let mut parser = Parser::new(&mut input);
    let color = parse_color(&mut parser)?;
    parser.is_exhausted().then_some(color)
}

fn named_color(name: &str) -> Option<Color> {
    let color = match name.to_ascii_lowercase().as_str() {
        "blue" => Color::hex(0x3B82F6),
        "red" => Color::hex(0xEF4444),
        "green" => Color::hex(0x10B981),
        "gray" | "grey" => Color::hex(0x71717A),
        _ => return None,
    };
    Some(color)
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 | 4 => {
            let r = channel(&hex[0..1])? * 17;
            let g = channel(&hex[1..2])? * 17;
            let b = channel(&hex[2..3])? * 17;
            Some(Color::rgb(r, g, b))
        }
        // Alpha, when present, is dropped: Word colors are opaque.
        6 | 8 => {
            let r = channel(&hex[0..2])?;
            let g = channel(&hex[2..4])?;
            let b = channel(&hex[4..6])?;
            Some(Color::rgb(r, g, b))
        }
        _ => None,
    }
}

fn parse_rgb_function<'i>(input: &mut Parser<'i, '_>) -> Result<Color, ParseError<'i, ()>> {
    let name = input.expect_function()?.clone();
    if !name.eq_ignore_ascii_case("rgb") && !name.eq_ignore_ascii_case("rgba") {
        return Err(input.new_custom_error(()));
    }
    input.parse_nested_block(|input| {
        let r = parse_color_component(input)?;
        let _ = input.try_parse(|i| i.expect_comma());
        let g = parse_color_component(input)?;
        let _ = input.try_parse(|i| i.expect_comma());
        let b = parse_color_component(input)?;
        // Alpha in either `, a` or `/ a` form.
        while input.next().is_ok() {}
        Ok(Color::rgb(r, g, b))
    })
}

fn parse_color_component<'i>(input: &mut Parser<'i, '_>) -> Result<u8, ParseError<'i, ()>> {
    let location = input.current_source_location();
    match input.next()? {
        Token::Number { value, .. } => Ok(value.round().clamp(0.0, 255.0) as u8),
        Token::Percentage { unit_value, .. } => {
            Ok((unit_value * 255.0).round().clamp(0.0, 255.0) as u8)
        }
        _ => Err(location.new_custom_error(())),
    }
}

/// Extract the color from a `background` shorthand, skipping the other
/// components (images, positions, repeat keywords).
pub(crate) fn parse_background(input: &mut Parser<'_, '_>) -> Option<Color> {
    let mut color = None;
    while !input.is_exhausted() {
        if color.is_none()
            && let Ok(c) = input.try_parse(|i| parse_color(i).ok_or(i.new_custom_error::<_, ()>(())))
        {
            color = Some(c);
            continue;
        }
        if input.next().is_err() {
            break;
        }
    }
    color
}

/// `font-weight`: keywords or a numeric weight, 600 and up counting as bold.
pub(crate) fn parse_font_weight(input: &mut Parser<'_, '_>) -> Option<bool> {
    match input.next().ok()? {
        Token::Ident(ident) => match ident.to_ascii_lowercase().as_str() {
            "bold" | "bolder" => Some(true),
            "normal" | "lighter" => Some(false),
            _ => None,
        },
        Token::Number { value, .. } => Some(*value >= 600.0),
        _ => None,
    }
}

/// `font-style`: true for italic or oblique.
pub(crate) fn parse_font_style(input: &mut Parser<'_, '_>) -> Option<bool> {
    let ident = input.expect_ident().ok()?;
    match ident.to_ascii_lowercase().as_str() {
        "italic" | "oblique" => Some(true),
        "normal" => Some(false),
        _ => None,
    }
}

pub(crate) fn parse_text_align(input: &mut Parser<'_, '_>) -> Option<Alignment> {
    let ident = input.expect_ident().ok()?;
    Alignment::parse(ident.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colors() {
        assert_eq!(parse_color_str("#1D4ED8"), Some(Color::hex(0x1D4ED8)));
        assert_eq!(parse_color_str("#1d4ed8"), Some(Color::hex(0x1D4ED8)));
        assert_eq!(parse_color_str("#fff"), Some(Color::hex(0xFFFFFF)));
        assert_eq!(parse_color_str("#222299"), Some(Color::hex(0x222299)));
        assert_eq!(parse_color_str("#12345"), None);
    }

    #[test]
    fn test_rgb_functions() {
        assert_eq!(parse_color_str("rgb(239, 68, 68)"), Some(Color::hex(0xEF4444)));
        assert_eq!(parse_color_str("rgba(59, 130, 246, 0.5)"), Some(Color::hex(0x3B82F6)));
        assert_eq!(parse_color_str("rgb(16 185 129 / 50%)"), Some(Color::hex(0x10B981)));
        assert_eq!(parse_color_str("rgb(300, -4, 0)"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(parse_color_str("hsl(0, 100%, 50%)"), None);
    }

    #[test]
    fn test_named_colors() {
        assert_eq!(parse_color_str("red"), Some(Color::hex(0xEF4444)));
        assert_eq!(parse_color_str("Blue"), Some(Color::hex(0x3B82F6)));
        assert_eq!(parse_color_str("grey"), Some(Color::hex(0x71717A)));
        assert_eq!(parse_color_str("rebeccapurple"), None);
        assert_eq!(parse_color_str("black"), None);
        assert_eq!(parse_color_str(""), None);
    }
}
