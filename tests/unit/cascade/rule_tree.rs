/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use crate::{matched, rule, rules};
use cascade::rule_tree::{CascadeLevel, RuleTree, StyleSource};
use cascade::stylesheets::Origin;

#[test]
fn identical_cascade_paths_share_a_node() {
    let tree = RuleTree::new();
    let rules = rules(&[
        (Origin::UserAgent, "color: red"),
        (Origin::Author, "color: blue"),
    ]);

    let first = tree.compute_rule_node(&mut matched(&rules));
    let second = tree.compute_rule_node(&mut matched(&rules));
    assert_eq!(first, second);
}

#[test]
fn longer_paths_reuse_their_prefix() {
    let tree = RuleTree::new();
    let ua = rule(Origin::UserAgent, "color: red");
    let author = rule(Origin::Author, "color: blue");

    let prefix = tree.compute_rule_node(&mut matched(&[ua.clone()]));
    let full = tree.compute_rule_node(&mut matched(&[ua.clone(), author.clone()]));

    assert_ne!(prefix, full);
    assert_eq!(full.parent(), Some(&prefix));
}

#[test]
fn rules_sharing_a_declaration_block_share_nodes() {
    let tree = RuleTree::new();
    let first = rule(Origin::Author, "color: blue");
    let second = std::sync::Arc::new(cascade::stylesheets::StyleRule {
        origin: Origin::Author,
        declarations: first.declarations.clone(),
    });

    let a = tree.compute_rule_node(&mut matched(&[first.clone()]));
    let b = tree.compute_rule_node(&mut matched(&[second.clone()]));
    assert_eq!(a, b);
}

#[test]
fn important_rules_invert_origin_order() {
    let tree = RuleTree::new();
    let rules = rules(&[
        (Origin::UserAgent, "color: red !important"),
        (Origin::User, "color: green !important"),
        (Origin::Author, "color: blue !important"),
    ]);

    let node = tree.compute_rule_node(&mut matched(&rules));

    let levels: Vec<_> = node
        .self_and_ancestors()
        .map(|node| node.cascade_level())
        .collect();
    assert_eq!(
        levels,
        [
            CascadeLevel::UAImportant,
            CascadeLevel::UserImportant,
            CascadeLevel::AuthorImportant,
            CascadeLevel::AuthorNormal,
            CascadeLevel::UserNormal,
            CascadeLevel::UANormal,
            // The root.
            CascadeLevel::UANormal,
        ]
    );
}

#[test]
fn gc_unlinks_dead_paths_and_keeps_siblings() {
    let tree = RuleTree::new();

    let keep = rule(Origin::Author, "color: blue");
    let kept_node = tree.insert_ordered_rules(std::iter::once((
        StyleSource::from_rule(keep.clone()),
        CascadeLevel::AuthorNormal,
    )));

    let doomed = rule(Origin::Author, "color: red");
    let doomed_node = tree.insert_ordered_rules(std::iter::once((
        StyleSource::from_rule(doomed.clone()),
        CascadeLevel::AuthorNormal,
    )));

    assert_eq!(tree.root().children().count(), 2);

    // Drop both the computed node and the rule owning the declarations, then
    // collect.
    drop(doomed_node);
    drop(doomed);
    tree.gc();

    let children: Vec<_> = tree.root().children().collect();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0], kept_node);

    // Re-walking the tree reuses the surviving sibling.
    let again = tree.insert_ordered_rules(std::iter::once((
        StyleSource::from_rule(keep.clone()),
        CascadeLevel::AuthorNormal,
    )));
    assert_eq!(again, kept_node);
}

#[test]
fn gc_keeps_nodes_with_live_handles() {
    let tree = RuleTree::new();
    let doomed = rule(Origin::Author, "color: red");
    let node = tree.insert_ordered_rules(std::iter::once((
        StyleSource::from_rule(doomed.clone()),
        CascadeLevel::AuthorNormal,
    )));

    // The declarations die, but the computed style still references the
    // node; it must survive the sweep.
    drop(doomed);
    tree.gc();
    assert_eq!(tree.root().children().count(), 1);
    assert!(node.style_source().is_none());

    drop(node);
    tree.gc();
    assert_eq!(tree.root().children().count(), 0);
}

#[test]
fn concurrent_insertion_shares_nodes() {
    use rayon::prelude::*;

    let tree = RuleTree::new();
    let shared = rules(&[
        (Origin::UserAgent, "color: red"),
        (Origin::User, "color: green"),
        (Origin::Author, "color: blue"),
    ]);
    let suffixes = rules(&[
        (Origin::Author, "background-color: aqua"),
        (Origin::Author, "background-color: teal"),
        (Origin::Author, "background-color: navy"),
        (Origin::Author, "background-color: olive"),
    ]);

    let nodes: Vec<_> = (0..64usize)
        .into_par_iter()
        .map(|i| {
            let mut path: Vec<_> = shared.to_vec();
            path.push(suffixes[i % suffixes.len()].clone());
            tree.compute_rule_node(&mut matched(&path))
        })
        .collect();

    for (i, node) in nodes.iter().enumerate() {
        // Same suffix, same node; everyone shares the three-rule prefix.
        assert_eq!(node, &nodes[i % suffixes.len()]);
        assert_eq!(node.parent(), nodes[0].parent());
    }

    // The shared prefix exists exactly once under the root.
    assert_eq!(tree.root().children().count(), 1);
}
