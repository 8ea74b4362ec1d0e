/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Computes the final used styles ("computed values") of a tree of markup
//! elements from the set of style rules matched against each element.
//!
//! The engine is built around a structurally shared *rule tree*: every
//! element's ordered sequence of matched declaration blocks maps to a single
//! node, so elements sharing a cascade path share a node. Cascading walks a
//! node's ancestor chain, resolving declarations by origin, importance and
//! source order, substituting custom properties, and assembling the result
//! through a copy-on-write style builder.
//!
//! Selector matching, the CSS rule parser and the concrete layout consumers
//! are external to this crate; it accepts pre-matched declaration blocks and
//! produces [`properties::ComputedValues`].

#![deny(missing_docs)]

#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

#[macro_use]
mod macros;

pub mod applicable_declarations;
pub mod custom_properties;
pub mod font_metrics;
pub mod media_queries;
pub mod properties;
pub mod rule_tree;
pub mod stylesheets;
pub mod values;

pub use crate::properties::ComputedValues;
