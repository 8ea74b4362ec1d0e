/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Unit tests for the cascade engine.

use cascade::applicable_declarations::{ApplicableDeclarationBlock, ApplicableDeclarationList};
use cascade::font_metrics::NoopFontMetricsProvider;
use cascade::media_queries::Device;
use cascade::properties::declaration_block::parse_style_attribute;
use cascade::properties::{ComputedValues, Importance, PropertyDeclarationBlock};
use cascade::rule_tree::{CascadeLevel, StrongRuleNode, StyleSource};
use cascade::stylesheets::{Origin, StyleRule};
use euclid::default::Size2D;
use std::sync::Arc;

mod cascading;
mod custom_properties;
mod declaration_block;
mod rule_tree;
mod style_builder;

pub fn block_from(css: &str) -> Arc<PropertyDeclarationBlock> {
    Arc::new(parse_style_attribute(css))
}

pub fn rule(origin: Origin, css: &str) -> Arc<StyleRule> {
    Arc::new(StyleRule {
        origin,
        declarations: block_from(css),
    })
}

/// Builds the rules for the given `(origin, declarations)` specs. The specs
/// must be in ascending origin order, like the output of selector matching.
/// The returned rules must be kept alive for as long as the rule-tree nodes
/// built from them are expected to stay valid.
pub fn rules(specs: &[(Origin, &str)]) -> Vec<Arc<StyleRule>> {
    specs
        .iter()
        .map(|&(origin, css)| rule(origin, css))
        .collect()
}

pub fn matched(rules: &[Arc<StyleRule>]) -> ApplicableDeclarationList {
    rules
        .iter()
        .enumerate()
        .map(|(index, rule)| {
            ApplicableDeclarationBlock::new(
                StyleSource::from_rule(rule.clone()),
                index as u32,
                CascadeLevel::from_origin(rule.origin, Importance::Normal),
                0,
            )
        })
        .collect()
}

pub fn device() -> Device {
    Device::new(Size2D::new(800., 600.))
}

pub fn cascade_node(
    device: &Device,
    node: &StrongRuleNode,
    parent: Option<&Arc<ComputedValues>>,
) -> Arc<ComputedValues> {
    cascade::properties::cascade(
        device,
        node,
        parent.is_none(),
        parent,
        None,
        &NoopFontMetricsProvider,
    )
}
