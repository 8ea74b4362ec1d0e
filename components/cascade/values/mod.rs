/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The small catalogue of value types the cascade carries around.
//!
//! Real style engines have a much larger value vocabulary; the cascade only
//! needs enough of one to exercise specified-to-computed conversion, font
//! relative units and `currentcolor` resolution.

pub mod computed;
pub mod specified;

use cssparser::CowRcStr;

/// Errors the value layer reports on top of the tokenizer's.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleParseErrorKind<'i> {
    /// An unknown property name was encountered.
    UnknownProperty(CowRcStr<'i>),
    /// A `var()` function with an invalid custom property name.
    ExpectedCustomPropertyName,
    /// A value that doesn't parse as the expected type.
    UnspecifiedError,
}

/// The parse error type used throughout the crate.
pub type StyleParseError<'i> = cssparser::ParseError<'i, StyleParseErrorKind<'i>>;

/// A trait to parse a specified value from CSS input.
pub trait Parse: Sized {
    /// Parses a value of this type.
    fn parse<'i, 't>(input: &mut cssparser::Parser<'i, 't>) -> Result<Self, StyleParseError<'i>>;
}

/// A trait to compute the final value of a specified value in a given
/// context.
pub trait ToComputedValue {
    /// The computed form of this value.
    type ComputedValue;

    /// Converts this specified value to a computed value.
    fn to_computed_value(&self, context: &computed::Context) -> Self::ComputedValue;
}

/// A color in the sRGB color space, with 8 bit components.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct RGBA {
    /// The red component.
    pub red: u8,
    /// The green component.
    pub green: u8,
    /// The blue component.
    pub blue: u8,
    /// The alpha component.
    pub alpha: u8,
}

impl RGBA {
    /// Constructs a color from its components.
    #[inline]
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        RGBA { red, green, blue, alpha }
    }

    /// The fully transparent color.
    #[inline]
    pub const fn transparent() -> Self {
        RGBA::new(0, 0, 0, 0)
    }
}
