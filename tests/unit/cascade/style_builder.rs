/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use crate::{cascade_node, device, matched, rules};
use cascade::properties::StyleBuilder;
use cascade::rule_tree::RuleTree;
use cascade::stylesheets::Origin;
use cascade::values::RGBA;
use std::sync::Arc;

const RED: RGBA = RGBA::new(255, 0, 0, 255);
const LIME: RGBA = RGBA::new(0, 255, 0, 255);

#[test]
fn mutation_copies_instead_of_aliasing() {
    let tree = RuleTree::new();
    let device = device();

    let parent_rules = rules(&[(Origin::Author, "color: red")]);
    let parent_node = tree.compute_rule_node(&mut matched(&parent_rules));
    let parent = cascade_node(&device, &parent_node, None);
    assert_eq!(parent.color.color, RED);

    let mut builder = StyleBuilder::new(&device, Some(&parent), None, None, None);
    builder.color.mutate().color = LIME;
    let child = builder.build();

    // The parent's struct is untouched; the child owns a fresh copy, while
    // the structs that were never written stay shared.
    assert_eq!(parent.color.color, RED);
    assert_eq!(child.color.color, LIME);
    assert!(!Arc::ptr_eq(&parent.color, &child.color));
    assert!(Arc::ptr_eq(&parent.font, &child.font));
}

#[test]
fn repeated_mutation_reuses_the_owned_copy() {
    let device = device();
    let mut builder = StyleBuilder::new(&device, None, None, None, None);

    builder.color.mutate().color = RED;
    let first = builder.color.get() as *const _;
    builder.color.mutate().color = LIME;
    let second = builder.color.get() as *const _;

    assert_eq!(first, second);
    assert_eq!(builder.color.get().color, LIME);
}

#[test]
fn take_and_put_round_trip() {
    let device = device();
    let mut builder = StyleBuilder::new(&device, None, None, None, None);

    let mut font = builder.font.take();
    font.font_size = app_units::Au::from_px(42);
    builder.font.put(font);

    let style = builder.build();
    assert_eq!(style.font.font_size, app_units::Au::from_px(42));
}

#[test]
#[should_panic(expected = "vacated")]
fn taking_a_vacated_slot_panics() {
    let device = device();
    let mut builder = StyleBuilder::new(&device, None, None, None, None);
    let _taken = builder.font.take();
    let _ = builder.font.take();
}

#[test]
#[should_panic(expected = "vacated")]
fn reading_a_vacated_slot_panics() {
    let device = device();
    let mut builder = StyleBuilder::new(&device, None, None, None, None);
    let _taken = builder.background.take();
    let _ = builder.background.get();
}

#[test]
#[should_panic(expected = "non-vacated")]
fn refilling_an_occupied_slot_panics() {
    let device = device();
    let mut builder = StyleBuilder::new(&device, None, None, None, None);
    let font = builder.font.take();
    builder.font.put(font.clone());
    builder.font.put(font);
}
