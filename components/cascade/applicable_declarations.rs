/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Applicable declarations management.

use crate::rule_tree::{CascadeLevel, StyleSource};
use smallvec::SmallVec;

/// List of applicable declarations. This is a transient structure that
/// shuttles declarations between selector matching and inserting into the
/// rule tree, and therefore we want to avoid heap-allocation where possible.
///
/// In measurements on real pages, we pretty much never have more than 8
/// applicable declarations, so we could consider making this 8 entries
/// instead of 16. However, it may depend a lot on workload, and stack space
/// is cheap.
pub type ApplicableDeclarationList = SmallVec<[ApplicableDeclarationBlock; 16]>;

const SOURCE_ORDER_SHIFT: u32 = 0;
const SOURCE_ORDER_BITS: u32 = 24;
const SOURCE_ORDER_MAX: u32 = (1 << SOURCE_ORDER_BITS) - 1;
const SOURCE_ORDER_MASK: u32 = SOURCE_ORDER_MAX << SOURCE_ORDER_SHIFT;

const CASCADE_LEVEL_SHIFT: u32 = SOURCE_ORDER_BITS;
const CASCADE_LEVEL_BITS: u32 = 4;
const CASCADE_LEVEL_MAX: u32 = (1 << CASCADE_LEVEL_BITS) - 1;
const CASCADE_LEVEL_MASK: u32 = CASCADE_LEVEL_MAX << CASCADE_LEVEL_SHIFT;

/// The source order and cascade level of an applicable declaration block,
/// packed into a single word.
///
/// Both fields saturate rather than wrap on overflow: a stylesheet with more
/// than 2^24 rules loses ordering precision among the excess rules, but never
/// corrupts the level bits.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct ApplicableDeclarationBits(u32);

impl ApplicableDeclarationBits {
    fn new(source_order: u32, cascade_level: CascadeLevel) -> Self {
        let mut bits = source_order.min(SOURCE_ORDER_MAX) << SOURCE_ORDER_SHIFT;
        bits |= (cascade_level as u32).min(CASCADE_LEVEL_MAX) << CASCADE_LEVEL_SHIFT;
        ApplicableDeclarationBits(bits)
    }

    fn source_order(&self) -> u32 {
        (self.0 & SOURCE_ORDER_MASK) >> SOURCE_ORDER_SHIFT
    }

    fn level(&self) -> CascadeLevel {
        CascadeLevel::from_byte(((self.0 & CASCADE_LEVEL_MASK) >> CASCADE_LEVEL_SHIFT) as u8)
    }
}

/// A property declaration together with its precedence among rules of equal
/// specificity so that we can sort them.
///
/// This represents the declarations in a given declaration block for a given
/// importance.
#[derive(Clone, Debug)]
pub struct ApplicableDeclarationBlock {
    /// The style source, either a style rule, or a property declaration
    /// block.
    pub source: StyleSource,
    /// The source order of the block, and the cascade level it belongs to.
    bits: ApplicableDeclarationBits,
    /// The specificity of the selector this block is represented by.
    pub specificity: u32,
}

impl ApplicableDeclarationBlock {
    /// Constructs an applicable declaration block from a given declaration
    /// block and cascade level.
    #[inline]
    pub fn from_declarations(source: StyleSource, level: CascadeLevel) -> Self {
        ApplicableDeclarationBlock {
            source,
            bits: ApplicableDeclarationBits::new(0, level),
            specificity: 0,
        }
    }

    /// Constructs an applicable declaration block from the given components.
    #[inline]
    pub fn new(
        source: StyleSource,
        source_order: u32,
        level: CascadeLevel,
        specificity: u32,
    ) -> Self {
        ApplicableDeclarationBlock {
            source,
            bits: ApplicableDeclarationBits::new(source_order, level),
            specificity,
        }
    }

    /// Returns the source order of the block.
    #[inline]
    pub fn source_order(&self) -> u32 {
        self.bits.source_order()
    }

    /// Returns the cascade level of the block.
    #[inline]
    pub fn level(&self) -> CascadeLevel {
        self.bits.level()
    }

    /// Convenience method to consume self and return the right thing for the
    /// rule tree to iterate over.
    #[inline]
    pub fn for_rule_tree(self) -> (StyleSource, CascadeLevel) {
        let level = self.level();
        (self.source, level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packing_roundtrips() {
        let bits = ApplicableDeclarationBits::new(42, CascadeLevel::AuthorNormal);
        assert_eq!(bits.source_order(), 42);
        assert_eq!(bits.level(), CascadeLevel::AuthorNormal);
    }

    #[test]
    fn source_order_saturates() {
        let bits = ApplicableDeclarationBits::new(u32::MAX, CascadeLevel::UAImportant);
        assert_eq!(bits.source_order(), (1 << 24) - 1);
        assert_eq!(bits.level(), CascadeLevel::UAImportant);
    }
}
