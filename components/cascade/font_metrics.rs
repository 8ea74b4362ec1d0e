/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Access to font metrics from the platform font subsystem, which lives
//! outside this crate.

use crate::media_queries::Device;
use crate::properties::style_structs::Font;
use app_units::Au;

/// Represents the font metrics that style needs from a font to compute the
/// value of certain CSS units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontMetrics {
    /// The x-height of the font.
    pub x_height: Au,
    /// The advance of the zero glyph, for `ch` units.
    pub zero_advance_measure: Au,
}

/// The result for querying font metrics for a given font family.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FontMetricsQueryResult {
    /// The font is available and we have its metrics.
    Available(FontMetrics),
    /// The query did not find a matching font, or the platform cannot answer
    /// right now.
    NotAvailable,
}

/// A trait used to represent something capable of providing us font metrics.
pub trait FontMetricsProvider {
    /// Obtain the metrics for `font` at `base_size` on the given device.
    fn query(&self, font: &Font, base_size: Au, device: &Device) -> FontMetricsQueryResult {
        let _ = (font, base_size, device);
        FontMetricsQueryResult::NotAvailable
    }
}

/// A metrics provider for when the font subsystem is not wired up; every
/// query reports the font as unavailable.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopFontMetricsProvider;

impl FontMetricsProvider for NoopFontMetricsProvider {}
