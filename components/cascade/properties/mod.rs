/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Supported CSS properties and the cascade.

pub mod cascade;
pub mod declaration_block;

pub use self::cascade::{cascade, PropertiesList};
pub use self::declaration_block::{Importance, PropertyDeclarationBlock};

use crate::custom_properties::{self, CustomPropertiesList, Name, VariableValue};
use crate::media_queries::Device;
use crate::rule_tree::StrongRuleNode;
use crate::values::computed;
use crate::values::specified;
use crate::values::RGBA;
use app_units::Au;
use cssparser::{match_ignore_ascii_case, Parser, ParserInput};
use fnv::FnvHashMap;
use std::mem;
use std::sync::Arc;

bitflags! {
    /// Flags registered for a longhand property.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct PropertyFlags: u8 {
        /// The property is inherited by default.
        const INHERITED = 1 << 0;
        /// The property cascades in the early pass, before properties whose
        /// computation may depend on it.
        const EARLY_PROPERTY = 1 << 1;
    }
}

/// An enum to represent a CSS wide keyword.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CSSWideKeyword {
    /// The `initial` keyword.
    Initial,
    /// The `inherit` keyword.
    Inherit,
    /// The `unset` keyword.
    Unset,
    /// The `revert` keyword.
    Revert,
}

impl CSSWideKeyword {
    /// Parses a CSS wide keyword from a CSS identifier.
    pub fn from_ident(ident: &str) -> Result<Self, ()> {
        Ok(match_ignore_ascii_case! { ident,
            "initial" => CSSWideKeyword::Initial,
            "inherit" => CSSWideKeyword::Inherit,
            "unset" => CSSWideKeyword::Unset,
            "revert" => CSSWideKeyword::Revert,
            _ => return Err(()),
        })
    }

    /// Parses a CSS wide keyword completely.
    pub fn parse(input: &mut Parser) -> Result<Self, ()> {
        let keyword = {
            let ident = input.expect_ident().map_err(|_| ())?;
            Self::from_ident(&**ident)?
        };
        input.expect_exhausted().map_err(|_| ())?;
        Ok(keyword)
    }
}

/// A declaration using a CSS-wide keyword.
#[derive(Clone, Debug, PartialEq)]
pub struct WideKeywordDeclaration {
    /// The longhand the keyword applies to.
    pub id: LonghandId,
    /// The CSS-wide keyword.
    pub keyword: CSSWideKeyword,
}

/// An unparsed declaration that contains `var()` functions.
#[derive(Clone, Debug, PartialEq)]
pub struct VariableDeclaration {
    /// The id of the property this declaration represents.
    pub id: LonghandId,
    /// The unparsed value of the declaration.
    pub value: Arc<UnparsedValue>,
}

/// A custom property declaration value is either an unparsed value or a CSS
/// wide-keyword.
#[derive(Clone, Debug, PartialEq)]
pub enum CustomDeclarationValue {
    /// A value.
    Value(Arc<VariableValue>),
    /// A wide keyword.
    CSSWideKeyword(CSSWideKeyword),
}

/// A custom property declaration with the property name and the declared
/// value.
#[derive(Clone, Debug, PartialEq)]
pub struct CustomDeclaration {
    /// The name of the custom property.
    pub name: Name,
    /// The value of the custom property.
    pub value: CustomDeclarationValue,
}

/// An unparsed longhand value, kept around until cascade time so `var()`
/// references can be substituted against the resolved custom properties.
#[derive(Clone, Debug, PartialEq)]
pub struct UnparsedValue {
    /// The raw declaration value template.
    pub css: VariableValue,
}

impl UnparsedValue {
    /// Substitutes the `var()` references of this value and re-parses the
    /// result as a value of `longhand_id`.
    ///
    /// Unsubstitutable or unparseable results are invalid at computed-value
    /// time: they behave as `inherit` for inherited properties and as
    /// `initial` otherwise.
    pub fn substitute_variables(
        &self,
        longhand_id: LonghandId,
        custom_properties: Option<&CustomPropertiesList>,
    ) -> PropertyDeclaration {
        let invalid_at_computed_value_time = || {
            let keyword = if longhand_id.inherited() {
                CSSWideKeyword::Inherit
            } else {
                CSSWideKeyword::Initial
            };
            PropertyDeclaration::css_wide_keyword(longhand_id, keyword)
        };

        let css = match self.css.substitute(custom_properties) {
            Ok(css) => css,
            Err(()) => return invalid_at_computed_value_time(),
        };

        let mut input = ParserInput::new(&css);
        let mut input = Parser::new(&mut input);
        input.skip_whitespace();

        if let Ok(keyword) = input.try_parse(CSSWideKeyword::parse) {
            return PropertyDeclaration::css_wide_keyword(longhand_id, keyword);
        }

        let declaration = match input.parse_entirely(|input| longhand_id.parse_value(input)) {
            Ok(declaration) => declaration,
            Err(..) => invalid_at_computed_value_time(),
        };
        declaration
    }
}

/// An identifier for a given property declaration, which can be either a
/// longhand or a custom property.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PropertyDeclarationId<'a> {
    /// A longhand.
    Longhand(LonghandId),
    /// A custom property declaration.
    Custom(&'a Name),
}

impl<'a> PropertyDeclarationId<'a> {
    /// Returns the longhand id, if this is one.
    #[inline]
    pub fn as_longhand(&self) -> Option<LonghandId> {
        match *self {
            PropertyDeclarationId::Longhand(id) => Some(id),
            PropertyDeclarationId::Custom(..) => None,
        }
    }
}

/// Representation of a CSS property, either a longhand or a custom property.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyId {
    /// A longhand property.
    Longhand(LonghandId),
    /// A custom property.
    Custom(Name),
}

impl PropertyId {
    /// Parses a property name, returning `Err(())` for unknown properties.
    pub fn parse(name: &str) -> Result<Self, ()> {
        if name.starts_with("--") {
            return Ok(PropertyId::Custom(custom_properties::parse_name(name)?));
        }
        LonghandId::from_name(name).map(PropertyId::Longhand).ok_or(())
    }
}

/// A function applying a matching longhand declaration to the style being
/// built.
pub type CascadePropertyFn = fn(&PropertyDeclaration, &mut computed::Context);

type ParsePropertyFn = for<'i, 't> fn(
    &mut Parser<'i, 't>,
) -> Result<PropertyDeclaration, crate::values::StyleParseError<'i>>;

properties! {
    inherited early struct font: Font {
        font_family FontFamily {
            "font-family", specified::FontFamily,
            initial: computed::FontFamily::initial()
        }
        font_size FontSize {
            "font-size", specified::FontSize,
            initial: Au::from_px(16)
        }
        font_weight FontWeight {
            "font-weight", specified::FontWeight,
            initial: computed::FontWeight::normal()
        }
    }
    inherited early struct color: Color {
        color Color {
            "color", specified::Color,
            initial: RGBA::new(0, 0, 0, 255)
        }
    }
    reset late struct background: Background {
        background_color BackgroundColor {
            "background-color", specified::Color,
            initial: RGBA::transparent()
        }
        background_image BackgroundImage {
            "background-image", specified::Image,
            initial: computed::Image::None
        }
    }
    reset late struct border: Border {
        border_top_width BorderTopWidth {
            "border-top-width", specified::BorderSideWidth,
            initial: Au::from_px(3)
        }
        border_top_style BorderTopStyle {
            "border-top-style", specified::BorderStyle,
            initial: computed::BorderStyle::None
        }
        border_top_color BorderTopColor {
            "border-top-color", specified::Color,
            initial: RGBA::new(0, 0, 0, 255)
        }
        border_right_width BorderRightWidth {
            "border-right-width", specified::BorderSideWidth,
            initial: Au::from_px(3)
        }
        border_right_style BorderRightStyle {
            "border-right-style", specified::BorderStyle,
            initial: computed::BorderStyle::None
        }
        border_right_color BorderRightColor {
            "border-right-color", specified::Color,
            initial: RGBA::new(0, 0, 0, 255)
        }
        border_bottom_width BorderBottomWidth {
            "border-bottom-width", specified::BorderSideWidth,
            initial: Au::from_px(3)
        }
        border_bottom_style BorderBottomStyle {
            "border-bottom-style", specified::BorderStyle,
            initial: computed::BorderStyle::None
        }
        border_bottom_color BorderBottomColor {
            "border-bottom-color", specified::Color,
            initial: RGBA::new(0, 0, 0, 255)
        }
        border_left_width BorderLeftWidth {
            "border-left-width", specified::BorderSideWidth,
            initial: Au::from_px(3)
        }
        border_left_style BorderLeftStyle {
            "border-left-style", specified::BorderStyle,
            initial: computed::BorderStyle::None
        }
        border_left_color BorderLeftColor {
            "border-left-color", specified::Color,
            initial: RGBA::new(0, 0, 0, 255)
        }
    }
    reset late struct margin: Margin {
        margin_top MarginTop {
            "margin-top", specified::LengthOrPercentageOrAuto,
            initial: computed::LengthOrPercentageOrAuto::Length(Au(0))
        }
        margin_right MarginRight {
            "margin-right", specified::LengthOrPercentageOrAuto,
            initial: computed::LengthOrPercentageOrAuto::Length(Au(0))
        }
        margin_bottom MarginBottom {
            "margin-bottom", specified::LengthOrPercentageOrAuto,
            initial: computed::LengthOrPercentageOrAuto::Length(Au(0))
        }
        margin_left MarginLeft {
            "margin-left", specified::LengthOrPercentageOrAuto,
            initial: computed::LengthOrPercentageOrAuto::Length(Au(0))
        }
    }
    reset late struct padding: Padding {
        padding_top PaddingTop {
            "padding-top", specified::LengthOrPercentage,
            initial: computed::LengthOrPercentage::Length(Au(0))
        }
        padding_right PaddingRight {
            "padding-right", specified::LengthOrPercentage,
            initial: computed::LengthOrPercentage::Length(Au(0))
        }
        padding_bottom PaddingBottom {
            "padding-bottom", specified::LengthOrPercentage,
            initial: computed::LengthOrPercentage::Length(Au(0))
        }
        padding_left PaddingLeft {
            "padding-left", specified::LengthOrPercentage,
            initial: computed::LengthOrPercentage::Length(Au(0))
        }
    }
}

impl LonghandId {
    /// Whether this longhand is inherited by default.
    #[inline]
    pub fn inherited(self) -> bool {
        self.flags().contains(PropertyFlags::INHERITED)
    }

    /// Whether this longhand cascades before the late properties.
    #[inline]
    pub fn is_early_property(self) -> bool {
        self.flags().contains(PropertyFlags::EARLY_PROPERTY)
    }

    /// Looks a longhand up from its CSS name, ASCII case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.bytes().any(|b| b.is_ascii_uppercase()) {
            let lowercase = name.to_ascii_lowercase();
            PROPERTY_ID_BY_NAME.get(lowercase.as_str()).copied()
        } else {
            PROPERTY_ID_BY_NAME.get(name).copied()
        }
    }
}

impl PropertyDeclaration {
    /// Returns a CSS-wide keyword declaration for a given longhand.
    #[inline]
    pub fn css_wide_keyword(id: LonghandId, keyword: CSSWideKeyword) -> Self {
        PropertyDeclaration::CSSWideKeyword(WideKeywordDeclaration { id, keyword })
    }

    /// Returns a CSS-wide keyword if the declaration's value is one.
    #[inline]
    pub fn get_css_wide_keyword(&self) -> Option<CSSWideKeyword> {
        match *self {
            PropertyDeclaration::CSSWideKeyword(ref declaration) => Some(declaration.keyword),
            _ => None,
        }
    }

    /// Whether this is a custom property declaration.
    #[inline]
    pub fn is_custom(&self) -> bool {
        matches!(*self, PropertyDeclaration::Custom(..))
    }
}

/// A set of longhand properties.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LonghandIdSet {
    storage: [u32; (property_counts::LONGHANDS - 1 + 32) / 32],
}

impl LonghandIdSet {
    /// Returns an empty set.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the given longhand is in the set.
    #[inline]
    pub fn contains(&self, id: LonghandId) -> bool {
        let bit = id as usize;
        (self.storage[bit / 32] & (1 << (bit % 32))) != 0
    }

    /// Adds the given longhand to the set.
    #[inline]
    pub fn insert(&mut self, id: LonghandId) {
        let bit = id as usize;
        self.storage[bit / 32] |= 1 << (bit % 32);
    }

    /// Removes the given longhand from the set.
    #[inline]
    pub fn remove(&mut self, id: LonghandId) {
        let bit = id as usize;
        self.storage[bit / 32] &= !(1 << (bit % 32));
    }

    /// Clears the set.
    #[inline]
    pub fn clear(&mut self) {
        for cell in &mut self.storage {
            *cell = 0;
        }
    }

    /// Returns whether the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.iter().all(|cell| *cell == 0)
    }
}

/// A reference to a style struct of the parent, the default style, or an
/// owned copy under construction.
///
/// A slot stays `Borrowed` until a property inside it is written; the first
/// mutation clones the borrowed struct into an `Owned` one. `take` moves the
/// value out, leaving the slot `Vacated` until `put` refills it. Touching a
/// vacated slot in any other way is a bug in the caller.
pub enum StyleStructRef<'a, T: 'a> {
    /// An owned, mutable struct.
    Owned(T),
    /// A borrowed, shared struct; not yet copied.
    Borrowed(&'a Arc<T>),
    /// A moved-out slot, awaiting `put`.
    Vacated,
}

impl<'a, T: Clone> StyleStructRef<'a, T> {
    /// Returns a mutable reference, cloning the borrowed struct on the first
    /// write.
    pub fn mutate(&mut self) -> &mut T {
        if let StyleStructRef::Borrowed(arc) = *self {
            *self = StyleStructRef::Owned((**arc).clone());
        }
        match *self {
            StyleStructRef::Owned(ref mut value) => value,
            StyleStructRef::Vacated => panic!("mutating a vacated style struct"),
            StyleStructRef::Borrowed(..) => unreachable!(),
        }
    }

    /// Moves the value out of the slot, leaving it vacated.
    pub fn take(&mut self) -> T {
        match mem::replace(self, StyleStructRef::Vacated) {
            StyleStructRef::Owned(value) => value,
            StyleStructRef::Borrowed(arc) => (**arc).clone(),
            StyleStructRef::Vacated => panic!("taking a vacated style struct"),
        }
    }

    /// Refills a vacated slot.
    pub fn put(&mut self, value: T) {
        match *self {
            StyleStructRef::Vacated => *self = StyleStructRef::Owned(value),
            _ => panic!("putting into a non-vacated style struct"),
        }
    }

    /// Returns a shared reference to the current value.
    pub fn get(&self) -> &T {
        match *self {
            StyleStructRef::Owned(ref value) => value,
            StyleStructRef::Borrowed(arc) => &**arc,
            StyleStructRef::Vacated => panic!("accessing a vacated style struct"),
        }
    }

    /// Finalizes the slot into an immutable, shareable struct.
    pub fn build(self) -> Arc<T> {
        match self {
            StyleStructRef::Owned(value) => Arc::new(value),
            StyleStructRef::Borrowed(arc) => arc.clone(),
            StyleStructRef::Vacated => panic!("building a vacated style struct"),
        }
    }
}

impl ComputedValues {
    /// The initial computed values, shared by every device default style.
    pub fn initial() -> &'static Arc<ComputedValues> {
        &INITIAL_VALUES
    }

    /// The custom properties resolved for this style, if any.
    pub fn custom_properties(&self) -> Option<&Arc<CustomPropertiesList>> {
        self.custom_properties.as_ref()
    }

    /// The resolved declaration list this style was built from, if any.
    pub fn properties(&self) -> Option<&Arc<PropertiesList>> {
        self.properties.as_ref()
    }

    /// The rule node this style was cascaded from, if any.
    pub fn rules(&self) -> Option<&StrongRuleNode> {
        self.rules.as_ref()
    }
}

impl<'a> StyleBuilder<'a> {
    /// The style this cascade inherits from.
    #[inline]
    pub fn inherited_style(&self) -> &'a ComputedValues {
        self.inherited_style
    }

    /// The device default style reset properties start from.
    #[inline]
    pub fn reset_style(&self) -> &'a ComputedValues {
        self.reset_style
    }

    /// The device this style is cascaded against.
    #[inline]
    pub fn device(&self) -> &'a Device {
        self.device
    }

    /// The custom properties resolved for this cascade, if any.
    #[inline]
    pub fn custom_properties(&self) -> Option<&Arc<CustomPropertiesList>> {
        self.custom_properties.as_ref()
    }
}
