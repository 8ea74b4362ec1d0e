/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! A property declaration block.

use crate::custom_properties::{Name, VariableValue};
use crate::properties::{
    CSSWideKeyword, CustomDeclaration, CustomDeclarationValue, LonghandIdSet, PropertyDeclaration,
    PropertyDeclarationId, PropertyId, UnparsedValue, VariableDeclaration,
};
use crate::values::{StyleParseError, StyleParseErrorKind};
use cssparser::{
    parse_important, AtRuleParser, CowRcStr, DeclarationParser, Delimiter, Parser, ParserInput,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser,
};
use fnv::FnvHashSet;
use smallbitvec::SmallBitVec;
use std::sync::Arc;
use thin_vec::ThinVec;

/// A declaration [importance][importance].
///
/// [importance]: https://drafts.csswg.org/css-cascade/#importance
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Importance {
    /// Indicates a declaration without `!important`.
    Normal,
    /// Indicates a declaration with `!important`.
    Important,
}

impl Importance {
    /// Return whether this is an important declaration.
    #[inline]
    pub fn important(self) -> bool {
        match self {
            Importance::Normal => false,
            Importance::Important => true,
        }
    }
}

#[derive(Clone, Debug, Default)]
struct PropertyDeclarationIdSet {
    longhands: LonghandIdSet,
    custom: FnvHashSet<Name>,
}

impl PropertyDeclarationIdSet {
    fn insert(&mut self, id: PropertyDeclarationId) -> bool {
        match id {
            PropertyDeclarationId::Longhand(id) => {
                if self.longhands.contains(id) {
                    return false;
                }
                self.longhands.insert(id);
                true
            },
            PropertyDeclarationId::Custom(name) => self.custom.insert(name.clone()),
        }
    }

    fn contains(&self, id: PropertyDeclarationId) -> bool {
        match id {
            PropertyDeclarationId::Longhand(id) => self.longhands.contains(id),
            PropertyDeclarationId::Custom(name) => self.custom.contains(name),
        }
    }
}

/// A block of property declarations, each with its importance.
///
/// Only deduplicated declarations appear here: pushing a property already in
/// the block updates it in place, so within-block precedence is simply
/// position.
#[derive(Clone, Debug, Default)]
pub struct PropertyDeclarationBlock {
    declarations: ThinVec<PropertyDeclaration>,
    declarations_importance: SmallBitVec,
    property_ids: PropertyDeclarationIdSet,
}

impl PropertyDeclarationBlock {
    /// Creates an empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of declarations in the block.
    #[inline]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Whether the block is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// The declarations of the block, in source order.
    #[inline]
    pub fn declarations(&self) -> &[PropertyDeclaration] {
        &self.declarations
    }

    /// Whether the block holds any declaration with `!important`.
    #[inline]
    pub fn any_important(&self) -> bool {
        !self.declarations_importance.all_false()
    }

    /// Whether the block holds any declaration without `!important`.
    #[inline]
    pub fn any_normal(&self) -> bool {
        !self.declarations_importance.all_true()
    }

    /// Returns an iterator over `(&PropertyDeclaration, Importance)` pairs.
    pub fn declaration_importance_iter(&self) -> DeclarationImportanceIterator {
        DeclarationImportanceIterator {
            block: self,
            front: 0,
            back: self.declarations.len(),
        }
    }

    /// Returns the declaration and importance of the given property, if the
    /// block contains it.
    pub fn get(
        &self,
        id: PropertyDeclarationId,
    ) -> Option<(&PropertyDeclaration, Importance)> {
        if !self.property_ids.contains(id) {
            return None;
        }
        self.declarations
            .iter()
            .position(|declaration| declaration.id() == id)
            .map(|index| self.entry_at(index))
    }

    /// Adds or overrides the given declaration. Returns whether the block
    /// changed.
    pub fn push(&mut self, declaration: PropertyDeclaration, importance: Importance) -> bool {
        if !self.property_ids.insert(declaration.id()) {
            let index = self
                .declarations
                .iter()
                .position(|existing| existing.id() == declaration.id())
                .expect("declaration absent but its id was in the id set");
            let changed = self.declarations[index] != declaration ||
                self.declarations_importance.get(index) != Some(importance.important());
            self.declarations[index] = declaration;
            self.declarations_importance.set(index, importance.important());
            return changed;
        }
        self.declarations.push(declaration);
        self.declarations_importance.push(importance.important());
        true
    }

    fn entry_at(&self, index: usize) -> (&PropertyDeclaration, Importance) {
        let importance = if self.declarations_importance.get(index) == Some(true) {
            Importance::Important
        } else {
            Importance::Normal
        };
        (&self.declarations[index], importance)
    }
}

/// A double-ended iterator over the `(declaration, importance)` pairs of a
/// block. The cascade walks it in reverse, since later declarations in a
/// block take precedence.
pub struct DeclarationImportanceIterator<'a> {
    block: &'a PropertyDeclarationBlock,
    front: usize,
    back: usize,
}

impl<'a> Iterator for DeclarationImportanceIterator<'a> {
    type Item = (&'a PropertyDeclaration, Importance);

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let index = self.front;
        self.front += 1;
        Some(self.block.entry_at(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<'a> DoubleEndedIterator for DeclarationImportanceIterator<'a> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(self.block.entry_at(self.back))
    }
}

impl<'a> ExactSizeIterator for DeclarationImportanceIterator<'a> {}

/// Parses a declaration list (the contents of a rule block or a style
/// attribute) into a declaration block, skipping declarations that don't
/// parse.
pub fn parse_property_declaration_list(input: &mut Parser) -> PropertyDeclarationBlock {
    let mut block = PropertyDeclarationBlock::new();
    let mut parser = PropertyDeclarationParser;
    let mut iter = RuleBodyParser::new(input, &mut parser);
    while let Some(declaration) = iter.next() {
        match declaration {
            Ok((declaration, importance)) => {
                block.push(declaration, importance);
            },
            Err((error, slice)) => {
                debug!("Ignoring unsupported declaration {:?}: {:?}", slice, error);
            },
        }
    }
    block
}

/// Parses a style attribute into a declaration block.
pub fn parse_style_attribute(css: &str) -> PropertyDeclarationBlock {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    parse_property_declaration_list(&mut parser)
}

struct PropertyDeclarationParser;

impl<'i> DeclarationParser<'i> for PropertyDeclarationParser {
    type Declaration = (PropertyDeclaration, Importance);
    type Error = StyleParseErrorKind<'i>;

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Declaration, StyleParseError<'i>> {
        let id = PropertyId::parse(&name).map_err(|()| {
            input.new_custom_error(StyleParseErrorKind::UnknownProperty(name.clone()))
        })?;
        let declaration =
            input.parse_until_before(Delimiter::Bang, |input| parse_one_declaration(id, input))?;
        let importance = match input.try_parse(parse_important) {
            Ok(()) => Importance::Important,
            Err(..) => Importance::Normal,
        };
        input.expect_exhausted()?;
        Ok((declaration, importance))
    }
}

impl<'i> AtRuleParser<'i> for PropertyDeclarationParser {
    type Prelude = ();
    type AtRule = (PropertyDeclaration, Importance);
    type Error = StyleParseErrorKind<'i>;
}

impl<'i> QualifiedRuleParser<'i> for PropertyDeclarationParser {
    type Prelude = ();
    type QualifiedRule = (PropertyDeclaration, Importance);
    type Error = StyleParseErrorKind<'i>;
}

impl<'i> RuleBodyItemParser<'i, (PropertyDeclaration, Importance), StyleParseErrorKind<'i>>
    for PropertyDeclarationParser
{
    fn parse_declarations(&self) -> bool {
        true
    }

    fn parse_qualified(&self) -> bool {
        false
    }
}

fn parse_one_declaration<'i, 't>(
    id: PropertyId,
    input: &mut Parser<'i, 't>,
) -> Result<PropertyDeclaration, StyleParseError<'i>> {
    input.skip_whitespace();
    match id {
        PropertyId::Custom(name) => {
            let value = match input.try_parse(CSSWideKeyword::parse) {
                Ok(keyword) => CustomDeclarationValue::CSSWideKeyword(keyword),
                Err(()) => CustomDeclarationValue::Value(Arc::new(VariableValue::parse(input)?)),
            };
            Ok(PropertyDeclaration::Custom(CustomDeclaration { name, value }))
        },
        PropertyId::Longhand(longhand_id) => {
            if let Ok(keyword) = input.try_parse(CSSWideKeyword::parse) {
                return Ok(PropertyDeclaration::css_wide_keyword(longhand_id, keyword));
            }
            let start = input.state();
            match input.parse_entirely(|input| longhand_id.parse_value(input)) {
                Ok(declaration) => Ok(declaration),
                Err(error) => {
                    // Retry as an unparsed value; without var() references
                    // it's simply invalid.
                    input.reset(&start);
                    let value = VariableValue::parse(input)?;
                    if !value.has_references() {
                        return Err(error);
                    }
                    Ok(PropertyDeclaration::WithVariables(VariableDeclaration {
                        id: longhand_id,
                        value: Arc::new(UnparsedValue { css: value }),
                    }))
                },
            }
        },
    }
}
