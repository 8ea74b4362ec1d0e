/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Custom properties cascading and substitution, aka CSS variables.
//!
//! A declared value is kept as a template of raw text runs and `var()`
//! references; substitution splices resolved values into the text at
//! computed-value time, with a visitation stack preventing cycles.

use crate::properties::{CSSWideKeyword, CustomDeclaration, CustomDeclarationValue};
use crate::rule_tree::CascadeLevel;
use crate::stylesheets::PerOrigin;
use crate::values::{StyleParseError, StyleParseErrorKind};
use cssparser::{Parser, Token};
use fnv::{FnvHashMap, FnvHashSet};
use smallvec::SmallVec;
use std::sync::Arc;

/// The name of a custom property, without the `--` prefix.
pub type Name = Arc<str>;

/// Parses a custom property name, `--` prefix included.
pub fn parse_name(s: &str) -> Result<Name, ()> {
    match s.strip_prefix("--") {
        Some(name) if !name.is_empty() => Ok(Name::from(name)),
        _ => Err(()),
    }
}

/// One run of a declared value template.
#[derive(Clone, Debug, PartialEq)]
pub enum TemplateSegment {
    /// A run of raw declaration text.
    Text(Box<str>),
    /// A `var()` reference.
    Variable {
        /// The referenced custom property name.
        name: Name,
        /// The fallback template, if one was written.
        fallback: Option<Box<[TemplateSegment]>>,
    },
}

/// A custom property value: raw text with embedded `var()` references.
#[derive(Clone, Debug, PartialEq)]
pub struct VariableValue {
    segments: Box<[TemplateSegment]>,
    references: FnvHashSet<Name>,
}

impl VariableValue {
    /// Parses a declared value per the `<declaration-value>` grammar,
    /// collecting the names referenced through `var()`.
    pub fn parse<'i, 't>(input: &mut Parser<'i, 't>) -> Result<Self, StyleParseError<'i>> {
        let mut segments = Vec::new();
        let mut references = FnvHashSet::default();
        parse_declaration_value(input, &mut segments, &mut references)?;
        Ok(VariableValue {
            segments: segments.into_boxed_slice(),
            references,
        })
    }

    /// Whether this value references any custom property.
    #[inline]
    pub fn has_references(&self) -> bool {
        !self.references.is_empty()
    }

    /// The names this value references.
    pub fn references(&self) -> impl Iterator<Item = &Name> {
        self.references.iter()
    }

    /// Substitutes every `var()` reference from `custom_properties`,
    /// producing the final value text. Fails when a reference has no value
    /// and no usable fallback, or only resolves through a cycle.
    pub fn substitute(
        &self,
        custom_properties: Option<&CustomPropertiesList>,
    ) -> Result<String, ()> {
        let mut result = String::new();
        let mut stack = SmallVec::<[Name; 8]>::new();
        substitute_block(&self.segments, custom_properties, &mut result, &mut stack)?;
        Ok(result)
    }
}

fn substitute_block(
    segments: &[TemplateSegment],
    custom_properties: Option<&CustomPropertiesList>,
    dest: &mut String,
    stack: &mut SmallVec<[Name; 8]>,
) -> Result<(), ()> {
    for segment in segments {
        match *segment {
            TemplateSegment::Text(ref text) => dest.push_str(text),
            TemplateSegment::Variable {
                ref name,
                ref fallback,
            } => {
                // A name already being resolved further up the stack is a
                // cycle; it falls through to the fallback, or fails.
                if !stack.iter().any(|entry| entry == name) {
                    let value = custom_properties.and_then(|list| list.get(name)).cloned();
                    if let Some(value) = value {
                        stack.push(name.clone());
                        let mut resolved = String::new();
                        let substituted =
                            substitute_block(&value.segments, custom_properties, &mut resolved, stack);
                        stack.pop();
                        if substituted.is_ok() {
                            dest.push_str(&resolved);
                            continue;
                        }
                    }
                }
                match *fallback {
                    Some(ref fallback) => {
                        substitute_block(fallback, custom_properties, dest, stack)?
                    },
                    None => return Err(()),
                }
            },
        }
    }
    Ok(())
}

fn push_text(segments: &mut Vec<TemplateSegment>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(TemplateSegment::Text(ref mut existing)) = segments.last_mut() {
        let mut merged = String::with_capacity(existing.len() + text.len());
        merged.push_str(existing);
        merged.push_str(text);
        *existing = merged.into_boxed_str();
        return;
    }
    segments.push(TemplateSegment::Text(text.into()));
}

/// <https://drafts.csswg.org/css-syntax-3/#typedef-declaration-value>
fn parse_declaration_value<'i, 't>(
    input: &mut Parser<'i, 't>,
    segments: &mut Vec<TemplateSegment>,
    references: &mut FnvHashSet<Name>,
) -> Result<(), StyleParseError<'i>> {
    let mut segment_start = input.position();
    loop {
        let token_start = input.position();
        let token = match input.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(..) => break,
        };
        match token {
            Token::BadUrl(..) |
            Token::BadString(..) |
            Token::CloseParenthesis |
            Token::CloseSquareBracket |
            Token::CloseCurlyBracket => {
                return Err(input.new_custom_error(StyleParseErrorKind::UnspecifiedError));
            },
            Token::Function(ref name) if name.eq_ignore_ascii_case("var") => {
                push_text(segments, input.slice(segment_start..token_start));
                let variable =
                    input.parse_nested_block(|input| parse_var_function(input, references))?;
                segments.push(variable);
                segment_start = input.position();
            },
            Token::Function(..) |
            Token::ParenthesisBlock |
            Token::SquareBracketBlock |
            Token::CurlyBracketBlock => {
                let closing = match token {
                    Token::SquareBracketBlock => "]",
                    Token::CurlyBracketBlock => "}",
                    _ => ")",
                };
                // The raw slice up to the current position includes the
                // opening token.
                push_text(segments, input.slice(segment_start..input.position()));
                input.parse_nested_block(|input| {
                    parse_declaration_value(input, segments, references)
                })?;
                push_text(segments, closing);
                segment_start = input.position();
            },
            _ => {},
        }
    }
    push_text(segments, input.slice_from(segment_start));
    Ok(())
}

fn parse_var_function<'i, 't>(
    input: &mut Parser<'i, 't>,
    references: &mut FnvHashSet<Name>,
) -> Result<TemplateSegment, StyleParseError<'i>> {
    let name = {
        let ident = input.expect_ident_cloned()?;
        parse_name(&ident).map_err(|()| {
            input.new_custom_error(StyleParseErrorKind::ExpectedCustomPropertyName)
        })?
    };
    let fallback = if input.try_parse(|input| input.expect_comma()).is_ok() {
        input.skip_whitespace();
        let mut segments = Vec::new();
        parse_declaration_value(input, &mut segments, references)?;
        Some(segments.into_boxed_slice())
    } else {
        None
    };
    references.insert(name.clone());
    Ok(TemplateSegment::Variable { name, fallback })
}

/// The resolved custom properties of an element, sorted by name.
///
/// Shared by reference with the parent's list whenever the cascade doesn't
/// actually change anything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CustomPropertiesList {
    entries: Box<[(Name, Arc<VariableValue>)]>,
}

impl CustomPropertiesList {
    fn from_map(map: FnvHashMap<Name, Arc<VariableValue>>) -> Self {
        let mut entries: Vec<_> = map.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        CustomPropertiesList {
            entries: entries.into_boxed_slice(),
        }
    }

    /// Looks up the value of a custom property.
    pub fn get(&self, name: &str) -> Option<&Arc<VariableValue>> {
        self.entries
            .binary_search_by(|entry| entry.0.as_ref().cmp(name))
            .ok()
            .map(|index| &self.entries[index].1)
    }

    /// The number of custom properties in the list.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the (name, value) entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = &(Name, Arc<VariableValue>)> {
        self.entries.iter()
    }

    fn to_map(&self) -> FnvHashMap<Name, Arc<VariableValue>> {
        self.entries
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// Whether building a list from `map` would reproduce this list, entry
    /// for entry, by identity.
    fn is_compatible(&self, map: &FnvHashMap<Name, Arc<VariableValue>>) -> bool {
        map.len() == self.entries.len() &&
            self.entries.iter().all(|(name, value)| {
                map.get(name)
                    .map_or(false, |candidate| Arc::ptr_eq(candidate, value))
            })
    }
}

/// Builds the custom-properties list of one cascade, seeded from the
/// inherited list and fed declarations in decreasing cascade priority.
pub struct CustomPropertiesBuilder<'a> {
    previous: Option<&'a Arc<CustomPropertiesList>>,
    inherited: Option<&'a Arc<CustomPropertiesList>>,
    custom_properties: Option<FnvHashMap<Name, Arc<VariableValue>>>,
    seen: FnvHashSet<Name>,
    reverted: PerOrigin<FnvHashSet<Name>>,
}

impl<'a> CustomPropertiesBuilder<'a> {
    /// Creates a builder. `previous` is the list computed for this element on
    /// the previous restyle, if any, used purely for identity reuse.
    pub fn new(
        previous: Option<&'a Arc<CustomPropertiesList>>,
        inherited: Option<&'a Arc<CustomPropertiesList>>,
    ) -> Self {
        CustomPropertiesBuilder {
            previous,
            inherited,
            custom_properties: None,
            seen: FnvHashSet::default(),
            reverted: PerOrigin::default(),
        }
    }

    /// Feeds one custom declaration at the given cascade level.
    pub fn cascade(&mut self, declaration: &CustomDeclaration, level: CascadeLevel) {
        let origin = level.origin();
        let name = &declaration.name;

        if self.reverted.borrow(origin).contains(name) {
            return;
        }
        if self.seen.contains(name) {
            return;
        }

        match declaration.value {
            CustomDeclarationValue::CSSWideKeyword(keyword) => match keyword {
                CSSWideKeyword::Revert => {
                    // Deliberately not inserted into `seen`: a declaration
                    // from an origin the revert doesn't roll back may still
                    // win.
                    for origin in origin.reverted_origins().iter_origins() {
                        self.reverted.borrow_mut(origin).insert(name.clone());
                    }
                },
                CSSWideKeyword::Initial => {
                    self.seen.insert(name.clone());
                    if self.value(name).is_some() {
                        self.map_mut().remove(name);
                    }
                },
                // Custom properties are inherited, so unset and inherit both
                // leave the inherited value in place.
                CSSWideKeyword::Unset | CSSWideKeyword::Inherit => {
                    self.seen.insert(name.clone());
                },
            },
            CustomDeclarationValue::Value(ref value) => {
                self.seen.insert(name.clone());
                let unchanged = self
                    .value(name)
                    .map_or(false, |existing| Arc::ptr_eq(existing, value));
                if unchanged {
                    return;
                }
                self.map_mut().insert(name.clone(), value.clone());
            },
        }
    }

    fn value(&self, name: &str) -> Option<&Arc<VariableValue>> {
        match self.custom_properties {
            Some(ref map) => map.get(name),
            None => self.inherited.and_then(|list| list.get(name)),
        }
    }

    fn map_mut(&mut self) -> &mut FnvHashMap<Name, Arc<VariableValue>> {
        let inherited = self.inherited;
        self.custom_properties.get_or_insert_with(|| {
            inherited.map_or_else(FnvHashMap::default, |list| list.to_map())
        })
    }

    /// Finishes the cascade, preferring identity reuse: the inherited list
    /// when nothing changed, the previous restyle's list when it would be
    /// rebuilt identical.
    pub fn build(self) -> Option<Arc<CustomPropertiesList>> {
        let map = match self.custom_properties {
            Some(map) => map,
            None => return self.inherited.cloned(),
        };
        if let Some(previous) = self.previous {
            if previous.is_compatible(&map) {
                return Some(previous.clone());
            }
        }
        Some(Arc::new(CustomPropertiesList::from_map(map)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cssparser::ParserInput;

    fn parse(css: &str) -> VariableValue {
        let mut input = ParserInput::new(css);
        let mut parser = Parser::new(&mut input);
        VariableValue::parse(&mut parser).unwrap()
    }

    #[test]
    fn text_runs_are_merged() {
        let value = parse("1px solid rgb(0, 0, 0)");
        assert!(!value.has_references());
        assert_eq!(value.substitute(None).unwrap(), "1px solid rgb(0, 0, 0)");
    }

    #[test]
    fn references_are_collected() {
        let value = parse("var(--a) calc(var(--b, var(--c)))");
        let mut names: Vec<_> = value.references().map(|name| name.to_string()).collect();
        names.sort();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn fallback_is_used_without_a_value() {
        let value = parse("var(--missing, 10px)");
        assert_eq!(value.substitute(None).unwrap(), "10px");
    }

    #[test]
    fn unresolved_reference_fails() {
        let value = parse("var(--missing)");
        assert!(value.substitute(None).is_err());
    }
}
