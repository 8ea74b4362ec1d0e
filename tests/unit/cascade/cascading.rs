/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use crate::{cascade_node, device, matched, rules};
use app_units::Au;
use cascade::font_metrics::{
    FontMetrics, FontMetricsProvider, FontMetricsQueryResult, NoopFontMetricsProvider,
};
use cascade::media_queries::Device;
use cascade::properties::style_structs::Font;
use cascade::rule_tree::RuleTree;
use cascade::stylesheets::Origin;
use cascade::values::computed::LengthOrPercentageOrAuto;
use cascade::values::RGBA;
use std::sync::Arc;

const RED: RGBA = RGBA::new(255, 0, 0, 255);
const GREEN: RGBA = RGBA::new(0, 128, 0, 255);
const BLUE: RGBA = RGBA::new(0, 0, 255, 255);

#[test]
fn author_rules_win_the_normal_cascade() {
    let tree = RuleTree::new();
    let device = device();
    let rules = rules(&[
        (Origin::UserAgent, "color: red"),
        (Origin::User, "color: green"),
        (Origin::Author, "color: blue"),
    ]);

    let node = tree.compute_rule_node(&mut matched(&rules));
    let style = cascade_node(&device, &node, None);
    assert_eq!(style.color.color, BLUE);
}

#[test]
fn important_rules_invert_origin_precedence() {
    let tree = RuleTree::new();
    let device = device();

    // Among !important declarations the precedence runs UA > User > Author,
    // the reverse of the normal levels.
    let rules_list = rules(&[
        (Origin::UserAgent, "color: red !important"),
        (Origin::Author, "color: blue !important"),
    ]);
    let node = tree.compute_rule_node(&mut matched(&rules_list));
    let style = cascade_node(&device, &node, None);
    assert_eq!(style.color.color, RED);

    // The same rules without the importance resolve the other way around.
    let rules_list = rules(&[
        (Origin::UserAgent, "color: red"),
        (Origin::Author, "color: blue"),
    ]);
    let node = tree.compute_rule_node(&mut matched(&rules_list));
    let style = cascade_node(&device, &node, None);
    assert_eq!(style.color.color, BLUE);

    // User-important beats author-important too.
    let rules_list = rules(&[
        (Origin::User, "color: green !important"),
        (Origin::Author, "color: blue !important"),
    ]);
    let node = tree.compute_rule_node(&mut matched(&rules_list));
    let style = cascade_node(&device, &node, None);
    assert_eq!(style.color.color, GREEN);
}

#[test]
fn any_important_declaration_beats_any_normal_one() {
    let tree = RuleTree::new();
    let device = device();
    let rules = rules(&[
        (Origin::UserAgent, "background-color: red !important"),
        (Origin::Author, "background-color: blue"),
    ]);

    let node = tree.compute_rule_node(&mut matched(&rules));
    let style = cascade_node(&device, &node, None);
    assert_eq!(style.background.background_color, RED);
}

#[test]
fn first_win_is_per_property() {
    let tree = RuleTree::new();
    let device = device();
    let rules = rules(&[
        (Origin::UserAgent, "background-color: yellow; color: red"),
        (Origin::Author, "background-color: blue"),
    ]);

    let node = tree.compute_rule_node(&mut matched(&rules));
    let style = cascade_node(&device, &node, None);

    // The author block only claims background-color; color still comes from
    // the UA sheet.
    assert_eq!(style.background.background_color, BLUE);
    assert_eq!(style.color.color, RED);
}

#[test]
fn later_rules_of_equal_level_win() {
    let tree = RuleTree::new();
    let device = device();
    let rules = rules(&[
        (Origin::Author, "color: red"),
        (Origin::Author, "color: blue"),
    ]);

    let node = tree.compute_rule_node(&mut matched(&rules));
    let style = cascade_node(&device, &node, None);
    assert_eq!(style.color.color, BLUE);
}

#[test]
fn em_lengths_resolve_against_the_early_cascaded_font() {
    let tree = RuleTree::new();
    let device = device();
    let rules = rules(&[(
        Origin::Author,
        "margin-top: 2em; font-size: 10px; padding-top: 50%",
    )]);

    let node = tree.compute_rule_node(&mut matched(&rules));
    let style = cascade_node(&device, &node, None);

    assert_eq!(style.font.font_size, Au::from_px(10));
    assert_eq!(
        style.margin.margin_top,
        LengthOrPercentageOrAuto::Length(Au::from_px(20)),
    );
}

struct FixedMetrics;

impl FontMetricsProvider for FixedMetrics {
    fn query(&self, _: &Font, _: Au, _: &Device) -> FontMetricsQueryResult {
        FontMetricsQueryResult::Available(FontMetrics {
            x_height: Au::from_px(7),
            zero_advance_measure: Au::from_px(5),
        })
    }
}

#[test]
fn ex_lengths_use_the_font_metrics_provider() {
    let tree = RuleTree::new();
    let device = device();
    let rules = rules(&[(Origin::Author, "margin-top: 2ex")]);
    let node = tree.compute_rule_node(&mut matched(&rules));

    let style = cascade::properties::cascade(&device, &node, true, None, None, &FixedMetrics);
    assert_eq!(
        style.margin.margin_top,
        LengthOrPercentageOrAuto::Length(Au::from_px(14)),
    );

    // Without metrics, ex falls back to half the font size.
    let style =
        cascade::properties::cascade(&device, &node, true, None, None, &NoopFontMetricsProvider);
    assert_eq!(
        style.margin.margin_top,
        LengthOrPercentageOrAuto::Length(Au::from_px(16)),
    );
}

#[test]
fn untouched_structs_are_shared_with_the_parent() {
    let tree = RuleTree::new();
    let device = device();

    let parent_rules = rules(&[(Origin::Author, "color: blue; font-size: 10px")]);
    let parent_node = tree.compute_rule_node(&mut matched(&parent_rules));
    let parent = cascade_node(&device, &parent_node, None);

    let child_rules = rules(&[(Origin::Author, "background-color: lime")]);
    let child_node = tree.compute_rule_node(&mut matched(&child_rules));
    let child = cascade_node(&device, &child_node, Some(&parent));

    // Inherited structs the child never writes are shared by pointer.
    assert!(Arc::ptr_eq(&parent.color, &child.color));
    assert!(Arc::ptr_eq(&parent.font, &child.font));
    assert_eq!(child.color.color, BLUE);

    // The background struct was written, so it's the child's own.
    assert!(!Arc::ptr_eq(&parent.background, &child.background));
}

#[test]
fn css_wide_keywords_apply() {
    let tree = RuleTree::new();
    let device = device();

    let parent_rules = rules(&[(
        Origin::Author,
        "color: red; background-color: blue",
    )]);
    let parent_node = tree.compute_rule_node(&mut matched(&parent_rules));
    let parent = cascade_node(&device, &parent_node, None);

    let child_rules = rules(&[(
        Origin::Author,
        "color: initial; background-color: inherit; margin-top: unset",
    )]);
    let child_node = tree.compute_rule_node(&mut matched(&child_rules));
    let child = cascade_node(&device, &child_node, Some(&parent));

    // `initial` on an inherited property drops the inherited value.
    assert_eq!(child.color.color, RGBA::new(0, 0, 0, 255));
    // `inherit` on a reset property pulls the parent value in.
    assert_eq!(child.background.background_color, BLUE);
    // `unset` on a reset property is the initial value.
    assert_eq!(
        child.margin.margin_top,
        LengthOrPercentageOrAuto::Length(Au(0)),
    );
}

#[test]
fn revert_rolls_back_to_the_previous_origin() {
    let tree = RuleTree::new();
    let device = device();
    let rules = rules(&[
        (Origin::UserAgent, "color: red"),
        (Origin::User, "color: green"),
        (Origin::Author, "color: blue"),
        (Origin::Author, "color: revert !important"),
    ]);

    let node = tree.compute_rule_node(&mut matched(&rules));
    let style = cascade_node(&device, &node, None);

    // The author-important revert suppresses the author origin entirely, so
    // the user declaration wins.
    assert_eq!(style.color.color, GREEN);
}

#[test]
fn unchanged_restyles_reuse_the_resolved_declarations() {
    let tree = RuleTree::new();
    let device = device();
    let rules = rules(&[(Origin::Author, "color: blue; margin-top: 1px")]);

    let node = tree.compute_rule_node(&mut matched(&rules));
    let first = cascade_node(&device, &node, None);
    let second = cascade::properties::cascade(
        &device,
        &node,
        true,
        None,
        Some(&first),
        &NoopFontMetricsProvider,
    );

    let first_list = first.properties().unwrap();
    let second_list = second.properties().unwrap();
    assert!(Arc::ptr_eq(first_list, second_list));
}
