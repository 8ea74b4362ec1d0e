/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

#![deny(unsafe_code)]

//! The rule tree.

use crate::applicable_declarations::ApplicableDeclarationList;
use smallvec::SmallVec;
use std::io::{self, Write};

#[allow(unsafe_code)]
mod core;
mod level;
mod source;

pub use self::core::{RuleChildrenIterator, RuleTree, SelfAndAncestors, StrongRuleNode};
pub use self::level::CascadeLevel;
pub use self::source::StyleSource;

impl RuleTree {
    fn dump<W: Write>(&self, writer: &mut W) {
        let _ = writeln!(writer, " + RuleTree");
        self.root().dump(writer, 0);
    }

    /// Dump the rule tree to stdout.
    pub fn dump_stdout(&self) {
        let mut stdout = io::stdout();
        self.dump(&mut stdout);
    }

    /// Inserts the given rules, that must be in proper order by origin, and
    /// returns the corresponding rule node representing the last inserted
    /// one.
    ///
    /// !important rules are detected and inserted into the appropriate
    /// position in the rule tree. This allows selector matching to ignore
    /// importance, while still maintaining the appropriate cascade order in
    /// the rule tree.
    pub fn insert_ordered_rules_with_important<I>(&self, iter: I) -> StrongRuleNode
    where
        I: Iterator<Item = (StyleSource, CascadeLevel)>,
    {
        use self::CascadeLevel::*;
        let mut current = self.root().clone();
        let mut last_level = current.cascade_level();
        let mut found_important = false;

        let mut important_author = SmallVec::<[StyleSource; 4]>::new();
        let mut important_user = SmallVec::<[StyleSource; 4]>::new();
        let mut important_ua = SmallVec::<[StyleSource; 4]>::new();

        for (source, level) in iter {
            debug_assert!(level >= last_level, "Out-of-origin-order declarations");
            debug_assert!(!level.is_important(), "Important levels handled internally");

            let any_important = source.read().any_important();
            if any_important {
                found_important = true;
                match level {
                    AuthorNormal => important_author.push(source.clone()),
                    UserNormal => important_user.push(source.clone()),
                    UANormal => important_ua.push(source.clone()),
                    _ => {},
                }
            }

            // We don't optimize out sources whose declarations are all
            // important: the normal-level node keeps the source order of the
            // block visible, and empty nodes are cheap.
            current = current.ensure_child(source, level);
            last_level = level;
        }

        // Early-return in the common case of no !important declarations.
        if !found_important {
            return current;
        }

        // Insert important declarations, in order of increasing importance,
        // which ends up with the origins inverted relative to the normal
        // levels, as the cascade requires.
        for source in important_author.drain(..) {
            current = current.ensure_child(source, AuthorImportant);
        }
        for source in important_user.drain(..) {
            current = current.ensure_child(source, UserImportant);
        }
        for source in important_ua.drain(..) {
            current = current.ensure_child(source, UAImportant);
        }

        current
    }

    /// Given a list of applicable declarations, insert the rules and return
    /// the corresponding rule node, giving the garbage collector a chance to
    /// run once in a while.
    pub fn compute_rule_node(
        &self,
        applicable_declarations: &mut ApplicableDeclarationList,
    ) -> StrongRuleNode {
        let node = self.insert_ordered_rules_with_important(
            applicable_declarations.drain(..).map(|block| block.for_rule_tree()),
        );
        self.maybe_gc();
        node
    }

    /// Inserts the given rules, that must be in proper order by origin, and
    /// returns the corresponding rule node representing the last inserted
    /// one.
    pub fn insert_ordered_rules<I>(&self, iter: I) -> StrongRuleNode
    where
        I: Iterator<Item = (StyleSource, CascadeLevel)>,
    {
        let mut current = self.root().clone();
        for (source, level) in iter {
            current = current.ensure_child(source, level);
        }
        current
    }
}
