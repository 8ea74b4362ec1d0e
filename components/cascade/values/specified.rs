/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Specified values: parsed from CSS input, not yet resolved against the
//! style under construction.

use super::computed::{self, Context};
use super::{Parse, StyleParseError, StyleParseErrorKind, ToComputedValue, RGBA};
use app_units::Au;
use cssparser::{match_ignore_ascii_case, Parser, Token};

/// A specified length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    /// An absolute length, in CSS pixels.
    Px(f32),
    /// A multiple of the font size of the element itself.
    Em(f32),
    /// A multiple of the x-height of the element's font.
    Ex(f32),
}

impl Parse for Length {
    fn parse<'i, 't>(input: &mut Parser<'i, 't>) -> Result<Self, StyleParseError<'i>> {
        let location = input.current_source_location();
        let token = input.next()?.clone();
        match token {
            Token::Dimension { value, ref unit, .. } => {
                match_ignore_ascii_case! { &**unit,
                    "px" => Ok(Length::Px(value)),
                    "em" => Ok(Length::Em(value)),
                    "ex" => Ok(Length::Ex(value)),
                    _ => Err(location.new_unexpected_token_error(token.clone())),
                }
            },
            Token::Number { value, .. } if value == 0. => Ok(Length::Px(0.)),
            ref token => Err(location.new_unexpected_token_error(token.clone())),
        }
    }
}

impl ToComputedValue for Length {
    type ComputedValue = Au;

    fn to_computed_value(&self, context: &Context) -> Au {
        match *self {
            Length::Px(px) => Au::from_f32_px(px),
            Length::Em(em) => context.builder.font.get().font_size.scale_by(em),
            Length::Ex(ex) => context.x_height().scale_by(ex),
        }
    }
}

/// A percentage, stored as a unit fraction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Percentage(pub f32);

/// A specified `font-size` value.
///
/// Font-relative units here resolve against the *parent* font, since the
/// value under computation is the font size itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontSize(pub Length);

impl Parse for FontSize {
    fn parse<'i, 't>(input: &mut Parser<'i, 't>) -> Result<Self, StyleParseError<'i>> {
        Length::parse(input).map(FontSize)
    }
}

impl ToComputedValue for FontSize {
    type ComputedValue = Au;

    fn to_computed_value(&self, context: &Context) -> Au {
        let parent_font = &context.builder.inherited_style().font;
        match self.0 {
            Length::Px(px) => Au::from_f32_px(px),
            Length::Em(em) => parent_font.font_size.scale_by(em),
            Length::Ex(ex) => context.x_height_of(parent_font).scale_by(ex),
        }
    }
}

/// A specified color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Color {
    /// The `currentcolor` keyword, resolved at computed-value time against
    /// the element's own `color`.
    CurrentColor,
    /// A concrete color.
    Rgba(RGBA),
}

impl Parse for Color {
    fn parse<'i, 't>(input: &mut Parser<'i, 't>) -> Result<Self, StyleParseError<'i>> {
        let location = input.current_source_location();
        let token = input.next()?.clone();
        match token {
            Token::Hash(ref value) | Token::IDHash(ref value) => match parse_hash_color(value) {
                Ok(rgba) => Ok(Color::Rgba(rgba)),
                Err(()) => Err(location.new_unexpected_token_error(token.clone())),
            },
            Token::Ident(ref ident) => match parse_color_keyword(ident) {
                Ok(color) => Ok(color),
                Err(()) => Err(location.new_unexpected_token_error(token.clone())),
            },
            Token::Function(ref name) => {
                let has_alpha = match_ignore_ascii_case! { &**name,
                    "rgb" => false,
                    "rgba" => true,
                    _ => return Err(location.new_unexpected_token_error(token.clone())),
                };
                input
                    .parse_nested_block(|input| parse_rgb_components(input, has_alpha))
                    .map(Color::Rgba)
            },
            ref token => Err(location.new_unexpected_token_error(token.clone())),
        }
    }
}

impl ToComputedValue for Color {
    type ComputedValue = RGBA;

    fn to_computed_value(&self, context: &Context) -> RGBA {
        match *self {
            // For the `color` property itself this reads the inherited color,
            // since the slot hasn't been written yet when its own declaration
            // is applied.
            Color::CurrentColor => context.builder.color.get().color,
            Color::Rgba(rgba) => rgba,
        }
    }
}

/// The sixteen basic CSS color keywords plus `transparent` and
/// `currentcolor`.
fn parse_color_keyword(ident: &str) -> Result<Color, ()> {
    let rgb = |red, green, blue| Ok(Color::Rgba(RGBA::new(red, green, blue, 255)));
    match_ignore_ascii_case! { ident,
        "currentcolor" => Ok(Color::CurrentColor),
        "transparent" => Ok(Color::Rgba(RGBA::transparent())),
        "black" => rgb(0, 0, 0),
        "silver" => rgb(192, 192, 192),
        "gray" => rgb(128, 128, 128),
        "white" => rgb(255, 255, 255),
        "maroon" => rgb(128, 0, 0),
        "red" => rgb(255, 0, 0),
        "purple" => rgb(128, 0, 128),
        "fuchsia" => rgb(255, 0, 255),
        "green" => rgb(0, 128, 0),
        "lime" => rgb(0, 255, 0),
        "olive" => rgb(128, 128, 0),
        "yellow" => rgb(255, 255, 0),
        "navy" => rgb(0, 0, 128),
        "blue" => rgb(0, 0, 255),
        "teal" => rgb(0, 128, 128),
        "aqua" => rgb(0, 255, 255),
        _ => Err(()),
    }
}

fn parse_hash_color(value: &str) -> Result<RGBA, ()> {
    fn hex(byte: u8) -> Result<u8, ()> {
        match byte {
            b'0'..=b'9' => Ok(byte - b'0'),
            b'a'..=b'f' => Ok(byte - b'a' + 10),
            b'A'..=b'F' => Ok(byte - b'A' + 10),
            _ => Err(()),
        }
    }

    let bytes = value.as_bytes();
    let mut components = [0u8; 4];
    match bytes.len() {
        6 | 8 => {
            for (i, pair) in bytes.chunks(2).enumerate() {
                components[i] = hex(pair[0])? * 16 + hex(pair[1])?;
            }
        },
        3 | 4 => {
            for (i, byte) in bytes.iter().enumerate() {
                let digit = hex(*byte)?;
                components[i] = digit * 16 + digit;
            }
        },
        _ => return Err(()),
    }
    let alpha = if bytes.len() == 4 || bytes.len() == 8 {
        components[3]
    } else {
        255
    };
    Ok(RGBA::new(components[0], components[1], components[2], alpha))
}

fn parse_rgb_components<'i, 't>(
    input: &mut Parser<'i, 't>,
    has_alpha: bool,
) -> Result<RGBA, StyleParseError<'i>> {
    fn clamp_component(value: f32) -> u8 {
        value.round().max(0.).min(255.) as u8
    }

    let red = clamp_component(input.expect_number()?);
    input.expect_comma()?;
    let green = clamp_component(input.expect_number()?);
    input.expect_comma()?;
    let blue = clamp_component(input.expect_number()?);
    let alpha = if has_alpha {
        input.expect_comma()?;
        let alpha = input.expect_number()?;
        clamp_component(alpha * 255.)
    } else {
        255
    };
    input.expect_exhausted()?;
    Ok(RGBA::new(red, green, blue, alpha))
}

/// A single font family name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FamilyName {
    /// The generic `serif` family.
    Serif,
    /// The generic `sans-serif` family.
    SansSerif,
    /// The generic `monospace` family.
    Monospace,
    /// The generic `cursive` family.
    Cursive,
    /// The generic `fantasy` family.
    Fantasy,
    /// A specific family, by name.
    Specific(Box<str>),
}

impl Parse for FamilyName {
    fn parse<'i, 't>(input: &mut Parser<'i, 't>) -> Result<Self, StyleParseError<'i>> {
        let location = input.current_source_location();
        let token = input.next()?.clone();
        match token {
            Token::QuotedString(ref name) => Ok(FamilyName::Specific((&**name).into())),
            Token::Ident(ref ident) => Ok(match_ignore_ascii_case! { &**ident,
                "serif" => FamilyName::Serif,
                "sans-serif" => FamilyName::SansSerif,
                "monospace" => FamilyName::Monospace,
                "cursive" => FamilyName::Cursive,
                "fantasy" => FamilyName::Fantasy,
                _ => FamilyName::Specific((&**ident).into()),
            }),
            ref token => Err(location.new_unexpected_token_error(token.clone())),
        }
    }
}

/// A `font-family` list.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FontFamily(pub Box<[FamilyName]>);

impl FontFamily {
    /// The initial font family list.
    pub fn initial() -> Self {
        FontFamily(Box::new([FamilyName::Serif]))
    }
}

impl Parse for FontFamily {
    fn parse<'i, 't>(input: &mut Parser<'i, 't>) -> Result<Self, StyleParseError<'i>> {
        let families = input.parse_comma_separated(FamilyName::parse)?;
        Ok(FontFamily(families.into_boxed_slice()))
    }
}

trivial_to_computed_value!(FontFamily);

/// A specified `font-weight` value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FontWeight {
    /// The `normal` keyword.
    Normal,
    /// The `bold` keyword.
    Bold,
    /// A numeric weight.
    Weight(u16),
}

impl Parse for FontWeight {
    fn parse<'i, 't>(input: &mut Parser<'i, 't>) -> Result<Self, StyleParseError<'i>> {
        let location = input.current_source_location();
        let token = input.next()?.clone();
        match token {
            Token::Ident(ref ident) => match_ignore_ascii_case! { &**ident,
                "normal" => Ok(FontWeight::Normal),
                "bold" => Ok(FontWeight::Bold),
                _ => Err(location.new_unexpected_token_error(token.clone())),
            },
            Token::Number {
                int_value: Some(weight),
                ..
            } if (1..=1000).contains(&weight) => Ok(FontWeight::Weight(weight as u16)),
            ref token => Err(location.new_unexpected_token_error(token.clone())),
        }
    }
}

impl ToComputedValue for FontWeight {
    type ComputedValue = computed::FontWeight;

    fn to_computed_value(&self, _context: &Context) -> computed::FontWeight {
        match *self {
            FontWeight::Normal => computed::FontWeight::normal(),
            FontWeight::Bold => computed::FontWeight::bold(),
            FontWeight::Weight(weight) => computed::FontWeight(weight),
        }
    }
}

/// A specified border side width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BorderSideWidth {
    /// The `thin` keyword.
    Thin,
    /// The `medium` keyword.
    Medium,
    /// The `thick` keyword.
    Thick,
    /// An explicit width.
    Length(Length),
}

impl Parse for BorderSideWidth {
    fn parse<'i, 't>(input: &mut Parser<'i, 't>) -> Result<Self, StyleParseError<'i>> {
        if let Ok(ident) = input.try_parse(|input| input.expect_ident_cloned()) {
            let location = input.current_source_location();
            return match_ignore_ascii_case! { &ident,
                "thin" => Ok(BorderSideWidth::Thin),
                "medium" => Ok(BorderSideWidth::Medium),
                "thick" => Ok(BorderSideWidth::Thick),
                _ => Err(location.new_custom_error(StyleParseErrorKind::UnspecifiedError)),
            };
        }
        Length::parse(input).map(BorderSideWidth::Length)
    }
}

impl ToComputedValue for BorderSideWidth {
    type ComputedValue = Au;

    fn to_computed_value(&self, context: &Context) -> Au {
        match *self {
            BorderSideWidth::Thin => Au::from_px(1),
            BorderSideWidth::Medium => Au::from_px(3),
            BorderSideWidth::Thick => Au::from_px(5),
            BorderSideWidth::Length(length) => length.to_computed_value(context),
        }
    }
}

/// A border line style.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BorderStyle {
    /// No border.
    None,
    /// Same as `none`, but wins border conflict resolution.
    Hidden,
    /// A dotted border.
    Dotted,
    /// A dashed border.
    Dashed,
    /// A solid border.
    Solid,
    /// A double border.
    Double,
}

impl Parse for BorderStyle {
    fn parse<'i, 't>(input: &mut Parser<'i, 't>) -> Result<Self, StyleParseError<'i>> {
        let location = input.current_source_location();
        let ident = input.expect_ident_cloned()?;
        match_ignore_ascii_case! { &ident,
            "none" => Ok(BorderStyle::None),
            "hidden" => Ok(BorderStyle::Hidden),
            "dotted" => Ok(BorderStyle::Dotted),
            "dashed" => Ok(BorderStyle::Dashed),
            "solid" => Ok(BorderStyle::Solid),
            "double" => Ok(BorderStyle::Double),
            _ => Err(location.new_custom_error(StyleParseErrorKind::UnspecifiedError)),
        }
    }
}

trivial_to_computed_value!(BorderStyle);

/// A specified image value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Image {
    /// The `none` keyword.
    None,
    /// An image reached by a URL.
    Url(Box<str>),
}

impl Parse for Image {
    fn parse<'i, 't>(input: &mut Parser<'i, 't>) -> Result<Self, StyleParseError<'i>> {
        let location = input.current_source_location();
        let token = input.next()?.clone();
        match token {
            Token::Ident(ref ident) if ident.eq_ignore_ascii_case("none") => Ok(Image::None),
            Token::UnquotedUrl(ref url) => Ok(Image::Url((&**url).into())),
            Token::Function(ref name) if name.eq_ignore_ascii_case("url") => {
                input.parse_nested_block(|input| {
                    let url = input.expect_string_cloned()?;
                    Ok(Image::Url((&*url).into()))
                })
            },
            ref token => Err(location.new_unexpected_token_error(token.clone())),
        }
    }
}

trivial_to_computed_value!(Image);

/// A specified length, percentage, or `auto`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LengthOrPercentageOrAuto {
    /// A length.
    Length(Length),
    /// A percentage, resolved at layout time.
    Percentage(Percentage),
    /// The `auto` keyword.
    Auto,
}

impl Parse for LengthOrPercentageOrAuto {
    fn parse<'i, 't>(input: &mut Parser<'i, 't>) -> Result<Self, StyleParseError<'i>> {
        if input
            .try_parse(|input| input.expect_ident_matching("auto"))
            .is_ok()
        {
            return Ok(LengthOrPercentageOrAuto::Auto);
        }
        if let Ok(length) = input.try_parse(Length::parse) {
            return Ok(LengthOrPercentageOrAuto::Length(length));
        }
        let location = input.current_source_location();
        match *input.next()? {
            Token::Percentage { unit_value, .. } => Ok(LengthOrPercentageOrAuto::Percentage(
                Percentage(unit_value),
            )),
            ref token => Err(location.new_unexpected_token_error(token.clone())),
        }
    }
}

impl ToComputedValue for LengthOrPercentageOrAuto {
    type ComputedValue = computed::LengthOrPercentageOrAuto;

    fn to_computed_value(&self, context: &Context) -> computed::LengthOrPercentageOrAuto {
        match *self {
            LengthOrPercentageOrAuto::Length(length) => {
                computed::LengthOrPercentageOrAuto::Length(length.to_computed_value(context))
            },
            LengthOrPercentageOrAuto::Percentage(percentage) => {
                computed::LengthOrPercentageOrAuto::Percentage(percentage)
            },
            LengthOrPercentageOrAuto::Auto => computed::LengthOrPercentageOrAuto::Auto,
        }
    }
}

/// A specified length or percentage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LengthOrPercentage {
    /// A length.
    Length(Length),
    /// A percentage, resolved at layout time.
    Percentage(Percentage),
}

impl Parse for LengthOrPercentage {
    fn parse<'i, 't>(input: &mut Parser<'i, 't>) -> Result<Self, StyleParseError<'i>> {
        if let Ok(length) = input.try_parse(Length::parse) {
            return Ok(LengthOrPercentage::Length(length));
        }
        let location = input.current_source_location();
        match *input.next()? {
            Token::Percentage { unit_value, .. } => {
                Ok(LengthOrPercentage::Percentage(Percentage(unit_value)))
            },
            ref token => Err(location.new_unexpected_token_error(token.clone())),
        }
    }
}

impl ToComputedValue for LengthOrPercentage {
    type ComputedValue = computed::LengthOrPercentage;

    fn to_computed_value(&self, context: &Context) -> computed::LengthOrPercentage {
        match *self {
            LengthOrPercentage::Length(length) => {
                computed::LengthOrPercentage::Length(length.to_computed_value(context))
            },
            LengthOrPercentage::Percentage(percentage) => {
                computed::LengthOrPercentage::Percentage(percentage)
            },
        }
    }
}
