//! Inline `style` attribute parsing.

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, Parser, ParserInput, ParserState,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser,
};

use super::values::{
    parse_background, parse_color, parse_font_style, parse_font_weight, parse_text_align,
};
use crate::model::{Alignment, Color};

/// The declarations of an inline `style` attribute the converter honors.
///
/// Later declarations override earlier ones, unparsable values are skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub color: Option<Color>,
    pub background: Option<Color>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub align: Option<Alignment>,
}

impl InlineStyle {
    pub fn parse(css: &str) -> Self {
        let mut style = InlineStyle::default();
        let mut input = ParserInput::new(css);
        let mut parser = Parser::new(&mut input);
        let mut decl_parser = InlineDeclarationParser { style: &mut style };

        for result in RuleBodyParser::new(&mut parser, &mut decl_parser) {
            if let Err((_, source)) = result {
                log::debug!("ignoring inline declaration {source:?}");
            }
        }

        style
    }

    pub fn is_empty(&self) -> bool {
        *self == InlineStyle::default()
    }
}

struct InlineDeclarationParser<'a> {
    style: &'a mut InlineStyle,
}

impl<'i> DeclarationParser<'i> for InlineDeclarationParser<'_> {
    type Declaration = ();
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        _start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let applied = match name.to_ascii_lowercase().as_str() {
            "color" => parse_color(input).map(|c| self.style.color = Some(c)),
            "background-color" => parse_color(input).map(|c| self.style.background = Some(c)),
            "background" => parse_background(input).map(|c| self.style.background = Some(c)),
            "font-weight" => parse_font_weight(input).map(|b| self.style.bold = Some(b)),
            "font-style" => parse_font_style(input).map(|i| self.style.italic = Some(i)),
            "text-align" => parse_text_align(input).map(|a| self.style.align = Some(a)),
            _ => None,
        };

        match applied {
            Some(()) => {
                let _ = input.try_parse(cssparser::parse_important);
                Ok(())
            }
            None => Err(input.new_custom_error(())),
        }
    }
}

impl<'i> AtRuleParser<'i> for InlineDeclarationParser<'_> {
    type Prelude = ();
    type AtRule = ();
    type Error = ();
}

impl<'i> QualifiedRuleParser<'i> for InlineDeclarationParser<'_> {
    type Prelude = ();
    type QualifiedRule = ();
    type Error = ();
}

impl<'i> RuleBodyItemParser<'i, (), ()> for InlineDeclarationParser<'_> {
    fn parse_declarations(&self) -> bool {
        true
    }

    fn parse_qualified(&self) -> bool {
        false
    }
}
