/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Computed values, and the context a specified value is computed in.

use crate::font_metrics::{FontMetricsProvider, FontMetricsQueryResult};
use crate::properties::{style_structs, StyleBuilder};
use app_units::Au;

pub use super::specified::{BorderStyle, FamilyName, FontFamily, Image, Percentage};
pub use super::RGBA;

/// The context a specified value is computed in: the style built so far, the
/// device, and the font metrics provider used by font-relative units.
pub struct Context<'a, 'b> {
    /// Whether the style being computed is for the root element.
    pub is_root_element: bool,
    /// The builder of the style under construction.
    pub builder: StyleBuilder<'a>,
    /// Queried for `ex` units and friends.
    pub font_metrics_provider: &'b dyn FontMetricsProvider,
}

impl<'a, 'b> Context<'a, 'b> {
    /// The x-height of the element's own font.
    pub fn x_height(&self) -> Au {
        self.x_height_of(self.builder.font.get())
    }

    /// The x-height of the given font, falling back to half the font size
    /// when no metrics are available.
    pub fn x_height_of(&self, font: &style_structs::Font) -> Au {
        match self
            .font_metrics_provider
            .query(font, font.font_size, self.builder.device())
        {
            FontMetricsQueryResult::Available(metrics) => metrics.x_height,
            FontMetricsQueryResult::NotAvailable => font.font_size.scale_by(0.5),
        }
    }
}

/// A computed font weight.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FontWeight(pub u16);

impl FontWeight {
    /// The `normal` weight.
    #[inline]
    pub fn normal() -> Self {
        FontWeight(400)
    }

    /// The `bold` weight.
    #[inline]
    pub fn bold() -> Self {
        FontWeight(700)
    }
}

/// A computed length or percentage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LengthOrPercentage {
    /// An absolute length.
    Length(Au),
    /// A percentage, resolved against the containing block at layout time.
    Percentage(Percentage),
}

/// A computed length, percentage, or `auto`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LengthOrPercentageOrAuto {
    /// An absolute length.
    Length(Au),
    /// A percentage, resolved against the containing block at layout time.
    Percentage(Percentage),
    /// The `auto` keyword.
    Auto,
}
