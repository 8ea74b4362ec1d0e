/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The style source of a rule node: a style rule, or a bare declaration
//! block from a style attribute.

use crate::properties::PropertyDeclarationBlock;
use crate::stylesheets::{Origin, StyleRule};
use std::sync::{Arc, Weak};

/// A style source for a rule node. Rule-tree identity is the identity of the
/// underlying declaration block, so two rules sharing a block (and the
/// block's own style-attribute form) are the same source to the tree.
#[derive(Clone, Debug)]
pub enum StyleSource {
    /// A style rule stable identifier.
    Rule(Arc<StyleRule>),
    /// A declaration block stable identifier, from a style attribute.
    Declarations(Arc<PropertyDeclarationBlock>),
}

impl StyleSource {
    /// Creates a style source from a whole rule.
    pub fn from_rule(rule: Arc<StyleRule>) -> Self {
        StyleSource::Rule(rule)
    }

    /// Creates a style source from a declaration block.
    pub fn from_declarations(declarations: Arc<PropertyDeclarationBlock>) -> Self {
        StyleSource::Declarations(declarations)
    }

    /// Reads the declarations of this source.
    #[inline]
    pub fn read(&self) -> &PropertyDeclarationBlock {
        match *self {
            StyleSource::Rule(ref rule) => &rule.declarations,
            StyleSource::Declarations(ref block) => block,
        }
    }

    /// The cascade origin this source enters the cascade at. Style-attribute
    /// declarations cascade as author rules.
    pub fn origin(&self) -> Origin {
        match *self {
            StyleSource::Rule(ref rule) => rule.origin,
            StyleSource::Declarations(..) => Origin::Author,
        }
    }

    /// The identity of this source, for rule-node matching.
    #[inline]
    pub(crate) fn key(&self) -> *const PropertyDeclarationBlock {
        match *self {
            StyleSource::Rule(ref rule) => Arc::as_ptr(&rule.declarations),
            StyleSource::Declarations(ref block) => Arc::as_ptr(block),
        }
    }

    /// Downgrades this source to the weak form held by rule nodes.
    pub(crate) fn downgrade(&self) -> WeakStyleSource {
        let weak = match *self {
            StyleSource::Rule(ref rule) => Arc::downgrade(&rule.declarations),
            StyleSource::Declarations(ref block) => Arc::downgrade(block),
        };
        WeakStyleSource(weak)
    }

    /// Whether this source and `other` wrap the same declaration block.
    pub fn ptr_eq(&self, other: &StyleSource) -> bool {
        self.key() == other.key()
    }
}

/// The weak form of a style source, held by rule nodes so that the tree never
/// keeps a dropped stylesheet's declarations alive.
#[derive(Clone, Debug)]
pub(crate) struct WeakStyleSource(Weak<PropertyDeclarationBlock>);

impl WeakStyleSource {
    /// Attempts to upgrade back to a usable source. Returns `None` once the
    /// declarations have been dropped by their owner.
    pub fn upgrade(&self) -> Option<StyleSource> {
        self.0.upgrade().map(StyleSource::Declarations)
    }

    /// Whether the underlying declaration block is still alive.
    pub fn is_alive(&self) -> bool {
        self.0.strong_count() != 0
    }

    /// Whether this weak source refers to the same declaration block as the
    /// given live source.
    pub fn ptr_eq_source(&self, source: &StyleSource) -> bool {
        std::ptr::eq(self.0.as_ptr(), source.key())
    }
}
