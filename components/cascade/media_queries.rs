/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The device against which styles are computed. Media query evaluation
//! proper happens before rules reach this crate; the cascade only needs the
//! viewport and the device default style.

use crate::properties::ComputedValues;
use app_units::Au;
use euclid::default::Size2D;
use std::sync::Arc;

/// A device to style against, paired with the default computed values reset
/// properties start from.
#[derive(Clone, Debug)]
pub struct Device {
    viewport_size: Size2D<f32>,
    default_computed_values: Arc<ComputedValues>,
}

impl Device {
    /// Trivially constructs a new device for the given viewport size, in CSS
    /// pixels.
    pub fn new(viewport_size: Size2D<f32>) -> Device {
        Device {
            viewport_size,
            default_computed_values: ComputedValues::initial().clone(),
        }
    }

    /// The default computed values for this device.
    #[inline]
    pub fn default_computed_values(&self) -> &ComputedValues {
        &self.default_computed_values
    }

    /// The viewport size, in CSS pixels.
    #[inline]
    pub fn viewport_size(&self) -> Size2D<f32> {
        self.viewport_size
    }

    /// The viewport size, in app units.
    pub fn au_viewport_size(&self) -> Size2D<Au> {
        Size2D::new(
            Au::from_f32_px(self.viewport_size.width),
            Au::from_f32_px(self.viewport_size.height),
        )
    }
}
