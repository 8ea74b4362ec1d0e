/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Macros driving the longhand property registry.
//!
//! `properties!` expands the whole longhand catalogue at once: the id and
//! declaration enums, the grouped style structs, the initial values, the
//! copy-on-write builder slots and the static per-longhand function tables.
//! Everything the engine knows about a property is registered here, ahead of
//! time; nothing is discovered at runtime.

macro_rules! property_flags {
    (inherited) => {
        PropertyFlags::INHERITED
    };
    (reset) => {
        PropertyFlags::empty()
    };
    (early) => {
        PropertyFlags::EARLY_PROPERTY
    };
    (late) => {
        PropertyFlags::empty()
    };
}

macro_rules! select_style {
    (inherited, $inherited_style:expr, $reset_style:expr) => {
        $inherited_style
    };
    (reset, $inherited_style:expr, $reset_style:expr) => {
        $reset_style
    };
}

macro_rules! properties {
    (
        $(
            $inherited:ident $timing:ident struct $struct_ident:ident : $StructName:ident {
                $(
                    $ident:ident $Variant:ident {
                        $name:literal,
                        $SpecifiedTy:ty,
                        initial: $initial:expr
                    }
                )+
            }
        )+
    ) => {
        /// Longhand counts, fixed at registration time.
        pub mod property_counts {
            /// The number of longhand properties in the registry.
            pub const LONGHANDS: usize = [$($( $name, )+)+].len();
        }

        /// An identifier for a specific longhand property.
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[repr(u16)]
        pub enum LonghandId {
            $($(
                #[doc = concat!("The `", $name, "` property.")]
                $Variant,
            )+)+
        }

        impl LonghandId {
            /// Returns the canonical CSS name of this longhand.
            pub fn name(self) -> &'static str {
                match self {
                    $($( LonghandId::$Variant => $name, )+)+
                }
            }

            /// Returns the registered flags of this longhand.
            pub fn flags(self) -> PropertyFlags {
                match self {
                    $($(
                        LonghandId::$Variant => {
                            property_flags!($inherited).union(property_flags!($timing))
                        },
                    )+)+
                }
            }

            /// Parses a specified value of this longhand.
            pub fn parse_value<'i, 't>(
                self,
                input: &mut ::cssparser::Parser<'i, 't>,
            ) -> Result<PropertyDeclaration, crate::values::StyleParseError<'i>> {
                PARSE_PROPERTY[self as usize](input)
            }

            pub(crate) fn cascade_property_fn(self) -> CascadePropertyFn {
                CASCADE_PROPERTY[self as usize]
            }
        }

        /// A single parsed property declaration.
        #[derive(Clone, Debug, PartialEq)]
        pub enum PropertyDeclaration {
            $($(
                #[doc = concat!("A specified value for the `", $name, "` property.")]
                $Variant($SpecifiedTy),
            )+)+
            /// A CSS-wide keyword for a longhand.
            CSSWideKeyword(WideKeywordDeclaration),
            /// A longhand value that still contains `var()` references.
            WithVariables(VariableDeclaration),
            /// A custom (`--x`) property declaration.
            Custom(CustomDeclaration),
        }

        impl PropertyDeclaration {
            /// The id of the property this declaration sets.
            pub fn id(&self) -> PropertyDeclarationId {
                match *self {
                    $($(
                        PropertyDeclaration::$Variant(..) => {
                            PropertyDeclarationId::Longhand(LonghandId::$Variant)
                        },
                    )+)+
                    PropertyDeclaration::CSSWideKeyword(ref declaration) => {
                        PropertyDeclarationId::Longhand(declaration.id)
                    },
                    PropertyDeclaration::WithVariables(ref declaration) => {
                        PropertyDeclarationId::Longhand(declaration.id)
                    },
                    PropertyDeclaration::Custom(ref declaration) => {
                        PropertyDeclarationId::Custom(&declaration.name)
                    },
                }
            }
        }

        /// The grouped computed style structs.
        pub mod style_structs {
            use crate::values::specified;

            $(
                #[doc = concat!("The `", stringify!($StructName), "` style struct.")]
                #[derive(Clone, Debug, PartialEq)]
                pub struct $StructName {
                    $(
                        #[doc = concat!("The computed `", $name, "` value.")]
                        pub $ident:
                            <$SpecifiedTy as crate::values::ToComputedValue>::ComputedValue,
                    )+
                }
            )+
        }

        lazy_static! {
            static ref INITIAL_VALUES: Arc<ComputedValues> = Arc::new(ComputedValues {
                $(
                    $struct_ident: Arc::new(style_structs::$StructName {
                        $( $ident: $initial, )+
                    }),
                )+
                custom_properties: None,
                properties: None,
                rules: None,
            });

            static ref PROPERTY_ID_BY_NAME: FnvHashMap<&'static str, LonghandId> = {
                let mut map = FnvHashMap::default();
                $($( map.insert($name, LonghandId::$Variant); )+)+
                map
            };
        }

        /// The computed style of an element: one shared struct per property
        /// group, plus the data needed to short-circuit the next restyle.
        #[derive(Clone, Debug)]
        pub struct ComputedValues {
            $(
                #[doc = concat!("The `", stringify!($StructName), "` struct.")]
                pub $struct_ident: Arc<style_structs::$StructName>,
            )+
            custom_properties: Option<Arc<CustomPropertiesList>>,
            properties: Option<Arc<PropertiesList>>,
            rules: Option<StrongRuleNode>,
        }

        /// A builder over the style structs of a single cascade, borrowing
        /// every struct from the inherited or default style until a property
        /// inside it is actually written.
        pub struct StyleBuilder<'a> {
            device: &'a Device,
            inherited_style: &'a ComputedValues,
            reset_style: &'a ComputedValues,
            rules: Option<StrongRuleNode>,
            custom_properties: Option<Arc<CustomPropertiesList>>,
            properties: Option<Arc<PropertiesList>>,
            $(
                #[doc = concat!("The `", stringify!($StructName), "` slot.")]
                pub $struct_ident: StyleStructRef<'a, style_structs::$StructName>,
            )+
        }

        impl<'a> StyleBuilder<'a> {
            /// Creates a builder for one cascade, inheriting from
            /// `parent_style` where given and from the device default style
            /// otherwise.
            pub fn new(
                device: &'a Device,
                parent_style: Option<&'a ComputedValues>,
                rules: Option<StrongRuleNode>,
                custom_properties: Option<Arc<CustomPropertiesList>>,
                properties: Option<Arc<PropertiesList>>,
            ) -> Self {
                let reset_style = device.default_computed_values();
                let inherited_style = parent_style.unwrap_or(reset_style);
                StyleBuilder {
                    device,
                    inherited_style,
                    reset_style,
                    rules,
                    custom_properties,
                    properties,
                    $(
                        $struct_ident: StyleStructRef::Borrowed(
                            &select_style!($inherited, inherited_style, reset_style)
                                .$struct_ident,
                        ),
                    )+
                }
            }

            /// Finalizes every slot into an immutable `ComputedValues`.
            pub fn build(self) -> Arc<ComputedValues> {
                Arc::new(ComputedValues {
                    $( $struct_ident: self.$struct_ident.build(), )+
                    custom_properties: self.custom_properties,
                    properties: self.properties,
                    rules: self.rules,
                })
            }
        }

        /// Per-longhand cascade and parse entry points.
        pub mod longhands {
            $($(
                #[doc = concat!("Entry points for the `", $name, "` longhand.")]
                pub mod $ident {
                    use crate::properties::*;
                    use crate::values::computed::Context;
                    use crate::values::specified;
                    use crate::values::{Parse, StyleParseError, ToComputedValue};
                    use cssparser::Parser;

                    /// Applies a declaration of this longhand to the style
                    /// under construction.
                    pub fn cascade_property(
                        declaration: &PropertyDeclaration,
                        context: &mut Context,
                    ) {
                        match *declaration {
                            PropertyDeclaration::$Variant(ref specified_value) => {
                                let computed = specified_value.to_computed_value(context);
                                context.builder.$struct_ident.mutate().$ident = computed;
                            },
                            PropertyDeclaration::CSSWideKeyword(ref declaration) => {
                                debug_assert_eq!(declaration.id, LonghandId::$Variant);
                                match declaration.keyword {
                                    CSSWideKeyword::Inherit => {
                                        let value = context
                                            .builder
                                            .inherited_style()
                                            .$struct_ident
                                            .$ident
                                            .clone();
                                        context.builder.$struct_ident.mutate().$ident = value;
                                    },
                                    CSSWideKeyword::Initial => {
                                        let value = context
                                            .builder
                                            .reset_style()
                                            .$struct_ident
                                            .$ident
                                            .clone();
                                        context.builder.$struct_ident.mutate().$ident = value;
                                    },
                                    CSSWideKeyword::Unset | CSSWideKeyword::Revert => {
                                        panic!("resolved before property application")
                                    },
                                }
                            },
                            _ => panic!("entered the wrong cascade_property"),
                        }
                    }

                    /// Parses a specified value of this longhand.
                    pub fn parse_value<'i, 't>(
                        input: &mut Parser<'i, 't>,
                    ) -> Result<PropertyDeclaration, StyleParseError<'i>> {
                        <$SpecifiedTy as Parse>::parse(input).map(PropertyDeclaration::$Variant)
                    }
                }
            )+)+
        }

        pub(crate) static CASCADE_PROPERTY: [CascadePropertyFn; property_counts::LONGHANDS] = [
            $($( longhands::$ident::cascade_property, )+)+
        ];

        pub(crate) static PARSE_PROPERTY: [ParsePropertyFn; property_counts::LONGHANDS] = [
            $($( longhands::$ident::parse_value, )+)+
        ];
    };
}

macro_rules! trivial_to_computed_value {
    ($ty:ty) => {
        impl crate::values::ToComputedValue for $ty {
            type ComputedValue = Self;

            #[inline]
            fn to_computed_value(&self, _context: &crate::values::computed::Context) -> Self {
                self.clone()
            }
        }
    };
}
