/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The cascade levels of the rule tree.

use crate::properties::Importance;
use crate::stylesheets::Origin;

/// The cascade level a rule node sits at: the combination of the origin of
/// its declarations and whether they are `!important`.
///
/// The variants are ordered by *tree construction* order, which is also
/// ascending cascade priority: a node deeper in the tree overrides its
/// ancestors. Note that the important levels run through the origins in the
/// opposite direction to the normal ones; the cascade requires that
/// inversion, it is not an accident.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(u8)]
pub enum CascadeLevel {
    /// Normal user-agent rules.
    UANormal = 0,
    /// Normal user rules.
    UserNormal,
    /// Normal author rules, including the style attribute.
    AuthorNormal,
    /// Important author rules.
    AuthorImportant,
    /// Important user rules.
    UserImportant,
    /// Important user-agent rules.
    UAImportant,
}

impl CascadeLevel {
    /// The number of distinct cascade levels.
    pub const COUNT: usize = CascadeLevel::UAImportant as usize + 1;

    /// Converts a raw ordinal back into a level.
    ///
    /// Out-of-range ordinals are a programmer error.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => CascadeLevel::UANormal,
            1 => CascadeLevel::UserNormal,
            2 => CascadeLevel::AuthorNormal,
            3 => CascadeLevel::AuthorImportant,
            4 => CascadeLevel::UserImportant,
            5 => CascadeLevel::UAImportant,
            _ => panic!("invalid cascade level ordinal {}", byte),
        }
    }

    /// The level for declarations of the given origin and importance.
    pub fn from_origin(origin: Origin, importance: Importance) -> Self {
        match (origin, importance) {
            (Origin::UserAgent, Importance::Normal) => CascadeLevel::UANormal,
            (Origin::User, Importance::Normal) => CascadeLevel::UserNormal,
            (Origin::Author, Importance::Normal) => CascadeLevel::AuthorNormal,
            (Origin::Author, Importance::Important) => CascadeLevel::AuthorImportant,
            (Origin::User, Importance::Important) => CascadeLevel::UserImportant,
            (Origin::UserAgent, Importance::Important) => CascadeLevel::UAImportant,
        }
    }

    /// Whether this cascade level represents important rules of some kind.
    #[inline]
    pub fn is_important(&self) -> bool {
        matches!(
            *self,
            CascadeLevel::AuthorImportant |
                CascadeLevel::UserImportant |
                CascadeLevel::UAImportant
        )
    }

    /// Returns the importance of declarations relevant at this level.
    #[inline]
    pub fn importance(&self) -> Importance {
        if self.is_important() {
            Importance::Important
        } else {
            Importance::Normal
        }
    }

    /// Returns the cascade origin of the rule.
    #[inline]
    pub fn origin(&self) -> Origin {
        match *self {
            CascadeLevel::UANormal | CascadeLevel::UAImportant => Origin::UserAgent,
            CascadeLevel::UserNormal | CascadeLevel::UserImportant => Origin::User,
            CascadeLevel::AuthorNormal | CascadeLevel::AuthorImportant => Origin::Author,
        }
    }
}
