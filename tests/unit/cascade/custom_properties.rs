/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use crate::{cascade_node, device, matched, rules};
use cascade::rule_tree::RuleTree;
use cascade::stylesheets::Origin;
use cascade::values::RGBA;
use std::sync::Arc;

const LIME: RGBA = RGBA::new(0, 255, 0, 255);
const GREEN: RGBA = RGBA::new(0, 128, 0, 255);
const PURPLE: RGBA = RGBA::new(128, 0, 128, 255);
const NAVY: RGBA = RGBA::new(0, 0, 128, 255);
const TEAL: RGBA = RGBA::new(0, 128, 128, 255);
const TRANSPARENT: RGBA = RGBA::transparent();

#[test]
fn var_references_substitute() {
    let tree = RuleTree::new();
    let device = device();
    let rules = rules(&[(Origin::Author, "--main: lime; color: var(--main)")]);

    let node = tree.compute_rule_node(&mut matched(&rules));
    let style = cascade_node(&device, &node, None);
    assert_eq!(style.color.color, LIME);
}

#[test]
fn custom_properties_inherit() {
    let tree = RuleTree::new();
    let device = device();

    let parent_rules = rules(&[(Origin::Author, "--main: lime")]);
    let parent_node = tree.compute_rule_node(&mut matched(&parent_rules));
    let parent = cascade_node(&device, &parent_node, None);

    let child_rules = rules(&[(Origin::Author, "color: var(--main)")]);
    let child_node = tree.compute_rule_node(&mut matched(&child_rules));
    let child = cascade_node(&device, &child_node, Some(&parent));
    assert_eq!(child.color.color, LIME);

    // No custom declarations on the child: the parent's list is shared by
    // pointer, not copied.
    assert!(Arc::ptr_eq(
        parent.custom_properties().unwrap(),
        child.custom_properties().unwrap(),
    ));
}

#[test]
fn fallbacks_apply_when_the_variable_is_missing() {
    let tree = RuleTree::new();
    let device = device();
    let rules = rules(&[(Origin::Author, "color: var(--missing, purple)")]);

    let node = tree.compute_rule_node(&mut matched(&rules));
    let style = cascade_node(&device, &node, None);
    assert_eq!(style.color.color, PURPLE);
}

#[test]
fn unresolved_references_are_invalid_at_computed_value_time() {
    let tree = RuleTree::new();
    let device = device();

    let parent_rules = rules(&[(Origin::Author, "color: navy")]);
    let parent_node = tree.compute_rule_node(&mut matched(&parent_rules));
    let parent = cascade_node(&device, &parent_node, None);

    // An inherited property behaves as `inherit`.
    let child_rules = rules(&[(Origin::Author, "color: var(--missing)")]);
    let child_node = tree.compute_rule_node(&mut matched(&child_rules));
    let child = cascade_node(&device, &child_node, Some(&parent));
    assert_eq!(child.color.color, NAVY);

    // A reset property behaves as `initial`, and still claims its slot: the
    // lower-priority declaration doesn't come back.
    let child_rules = rules(&[
        (Origin::Author, "background-color: purple"),
        (Origin::Author, "background-color: var(--missing)"),
    ]);
    let child_node = tree.compute_rule_node(&mut matched(&child_rules));
    let child = cascade_node(&device, &child_node, Some(&parent));
    assert_eq!(child.background.background_color, TRANSPARENT);
}

#[test]
fn cyclic_references_are_invalid_at_computed_value_time() {
    let tree = RuleTree::new();
    let device = device();

    let parent_rules = rules(&[(Origin::Author, "color: teal")]);
    let parent_node = tree.compute_rule_node(&mut matched(&parent_rules));
    let parent = cascade_node(&device, &parent_node, None);

    let child_rules = rules(&[(
        Origin::Author,
        "--a: var(--b); --b: var(--a); color: var(--a)",
    )]);
    let child_node = tree.compute_rule_node(&mut matched(&child_rules));
    let child = cascade_node(&device, &child_node, Some(&parent));
    assert_eq!(child.color.color, TEAL);
}

#[test]
fn cycles_resolve_through_fallbacks() {
    let tree = RuleTree::new();
    let device = device();
    let rules = rules(&[(
        Origin::Author,
        "--a: var(--a, lime); color: var(--a)",
    )]);

    let node = tree.compute_rule_node(&mut matched(&rules));
    let style = cascade_node(&device, &node, None);
    assert_eq!(style.color.color, LIME);
}

#[test]
fn revert_restores_the_lower_origin_value() {
    let tree = RuleTree::new();
    let device = device();

    // The author sets --x, then reverts it with an important declaration;
    // the user origin's value must come back.
    let rules = rules(&[
        (Origin::UserAgent, "--x: purple"),
        (Origin::User, "--x: green"),
        (Origin::Author, "--x: lime"),
        (Origin::Author, "--x: revert !important"),
        (Origin::Author, "color: var(--x)"),
    ]);

    let node = tree.compute_rule_node(&mut matched(&rules));
    let style = cascade_node(&device, &node, None);
    assert_eq!(style.color.color, GREEN);
}

#[test]
fn initial_removes_the_inherited_value() {
    let tree = RuleTree::new();
    let device = device();

    let parent_rules = rules(&[(Origin::Author, "--main: lime")]);
    let parent_node = tree.compute_rule_node(&mut matched(&parent_rules));
    let parent = cascade_node(&device, &parent_node, None);

    let child_rules = rules(&[(
        Origin::Author,
        "--main: initial; color: var(--main, purple)",
    )]);
    let child_node = tree.compute_rule_node(&mut matched(&child_rules));
    let child = cascade_node(&device, &child_node, Some(&parent));
    assert_eq!(child.color.color, PURPLE);
}
