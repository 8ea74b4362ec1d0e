/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Style rule origins and per-origin bookkeeping. Stylesheet parsing and
//! storage live outside this crate; matched rules arrive here already carrying
//! their origin.

use crate::properties::PropertyDeclarationBlock;
use std::sync::Arc;

/// Each style rule has an origin, which determines where it enters the
/// cascade.
///
/// <https://drafts.csswg.org/css-cascade/#cascading-origins>
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum Origin {
    /// <https://drafts.csswg.org/css-cascade/#cascade-origin-ua>
    UserAgent = 1 << 0,
    /// <https://drafts.csswg.org/css-cascade/#cascade-origin-user>
    User = 1 << 1,
    /// <https://drafts.csswg.org/css-cascade/#cascade-origin-author>
    Author = 1 << 2,
}

impl Origin {
    /// The set of origins a `revert` declaration at this origin rolls back:
    /// this origin and every origin that overrides it in the normal cascade
    /// order. Declarations from the remaining, lower origins still apply.
    pub fn reverted_origins(self) -> OriginSet {
        match self {
            Origin::UserAgent => OriginSet::all(),
            Origin::User => OriginSet::ORIGIN_USER | OriginSet::ORIGIN_AUTHOR,
            Origin::Author => OriginSet::ORIGIN_AUTHOR,
        }
    }
}

bitflags! {
    /// A set of origins. This is equivalent to Gecko's OriginFlags.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct OriginSet: u8 {
        /// <https://drafts.csswg.org/css-cascade/#cascade-origin-ua>
        const ORIGIN_USER_AGENT = Origin::UserAgent as u8;
        /// <https://drafts.csswg.org/css-cascade/#cascade-origin-user>
        const ORIGIN_USER = Origin::User as u8;
        /// <https://drafts.csswg.org/css-cascade/#cascade-origin-author>
        const ORIGIN_AUTHOR = Origin::Author as u8;
    }
}

impl OriginSet {
    /// Iterates over the origins in the set.
    pub fn iter_origins(self) -> impl Iterator<Item = Origin> {
        const ALL: [Origin; 3] = [Origin::UserAgent, Origin::User, Origin::Author];
        ALL.iter()
            .copied()
            .filter(move |origin| self.contains(OriginSet::from_bits_truncate(*origin as u8)))
    }
}

impl From<Origin> for OriginSet {
    fn from(origin: Origin) -> Self {
        OriginSet::from_bits_truncate(origin as u8)
    }
}

/// An object that stores a `T` for each origin of the CSS cascade.
#[derive(Clone, Debug, Default)]
pub struct PerOrigin<T> {
    /// Data for `Origin::UserAgent`.
    pub user_agent: T,
    /// Data for `Origin::User`.
    pub user: T,
    /// Data for `Origin::Author`.
    pub author: T,
}

impl<T> PerOrigin<T> {
    /// Returns a reference to the per-origin data for the given origin.
    #[inline]
    pub fn borrow(&self, origin: Origin) -> &T {
        match origin {
            Origin::UserAgent => &self.user_agent,
            Origin::User => &self.user,
            Origin::Author => &self.author,
        }
    }

    /// Returns a mutable reference to the per-origin data for the given
    /// origin.
    #[inline]
    pub fn borrow_mut(&mut self, origin: Origin) -> &mut T {
        match origin {
            Origin::UserAgent => &mut self.user_agent,
            Origin::User => &mut self.user,
            Origin::Author => &mut self.author,
        }
    }
}

/// A style rule, as matched by the selector machinery: the declaration block,
/// plus the origin of the stylesheet it came from. Selectors themselves stay
/// on the matching side of the fence.
#[derive(Clone, Debug)]
pub struct StyleRule {
    /// The origin of the stylesheet this rule belongs to.
    pub origin: Origin,
    /// The declarations of this rule.
    pub declarations: Arc<PropertyDeclarationBlock>,
}
