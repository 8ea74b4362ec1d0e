/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The main cascading algorithm of the style system.

use crate::custom_properties::{CustomPropertiesBuilder, CustomPropertiesList};
use crate::font_metrics::FontMetricsProvider;
use crate::media_queries::Device;
use crate::properties::{
    CSSWideKeyword, ComputedValues, LonghandId, LonghandIdSet, PropertyDeclaration,
    PropertyDeclarationId, StyleBuilder,
};
use crate::rule_tree::{CascadeLevel, StrongRuleNode, StyleSource};
use crate::stylesheets::PerOrigin;
use crate::values::computed::Context;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::sync::Arc;

/// Performs the CSS cascade for one element: resolves the declarations of
/// the given rule node into a new `ComputedValues`, inheriting from
/// `parent_style` (or the device default style at the root).
///
/// `previous_style` is the style computed for the same element by the
/// previous restyle, if any; when neither the rule node nor the custom
/// properties changed, the resolved declaration list is reused wholesale.
pub fn cascade(
    device: &Device,
    rule_node: &StrongRuleNode,
    is_root_element: bool,
    parent_style: Option<&Arc<ComputedValues>>,
    previous_style: Option<&Arc<ComputedValues>>,
    font_metrics_provider: &dyn FontMetricsProvider,
) -> Arc<ComputedValues> {
    // Upgrade and hold the sources for the duration of the cascade. The
    // ancestor walk visits cascade levels from highest to lowest priority;
    // the root (and any node whose declarations died) contributes nothing.
    let mut blocks = SmallVec::<[(StyleSource, CascadeLevel); 16]>::new();
    for node in rule_node.self_and_ancestors() {
        if let Some(source) = node.style_source() {
            blocks.push((source, node.cascade_level()));
        }
    }

    // Flatten into (declaration, level) in priority order: within one block
    // later declarations override earlier ones, hence the reverse, and a
    // node contributes only the declarations matching its own importance.
    let mut declarations = Vec::new();
    for (source, level) in blocks.iter() {
        let block = source.read();
        let node_importance = level.importance();
        for (declaration, importance) in block.declaration_importance_iter().rev() {
            if importance == node_importance {
                declarations.push((declaration, *level));
            }
        }
    }

    let inherited_custom = parent_style.and_then(|style| style.custom_properties());
    let previous_custom = previous_style.and_then(|style| style.custom_properties());
    let mut custom_builder = CustomPropertiesBuilder::new(previous_custom, inherited_custom);
    for &(declaration, level) in declarations.iter() {
        if let PropertyDeclaration::Custom(ref custom) = *declaration {
            custom_builder.cascade(custom, level);
        }
    }
    let custom_properties = custom_builder.build();

    let properties = reusable_property_list(rule_node, previous_style, custom_properties.as_ref())
        .unwrap_or_else(|| {
            let mut builder = PropertiesListBuilder::new(custom_properties.as_deref());
            for &(declaration, level) in declarations.iter() {
                builder.cascade(declaration, level);
            }
            Arc::new(builder.build())
        });

    let builder = StyleBuilder::new(
        device,
        parent_style.map(|style| &**style),
        Some(rule_node.clone()),
        custom_properties,
        Some(properties.clone()),
    );
    let mut context = Context {
        is_root_element,
        builder,
        font_metrics_provider,
    };

    // Properties other computations depend on (fonts, color) cascade first,
    // so that late properties resolve against finalized early values.
    for (id, declaration) in properties.iter() {
        if id.is_early_property() {
            (id.cascade_property_fn())(declaration, &mut context);
        }
    }
    for (id, declaration) in properties.iter() {
        if !id.is_early_property() {
            (id.cascade_property_fn())(declaration, &mut context);
        }
    }

    context.builder.build()
}

/// Returns the previous restyle's resolved declaration list if this cascade
/// would rebuild it identically.
fn reusable_property_list(
    rule_node: &StrongRuleNode,
    previous_style: Option<&Arc<ComputedValues>>,
    custom_properties: Option<&Arc<CustomPropertiesList>>,
) -> Option<Arc<PropertiesList>> {
    let previous = previous_style?;
    if previous.rules()? != rule_node {
        return None;
    }
    let identical_custom = match (previous.custom_properties(), custom_properties) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    };
    if !identical_custom {
        return None;
    }
    previous.properties().cloned()
}

/// The resolved declaration list of one cascade: for every longhand that won
/// the cascade, the final (substituted) declaration to apply, in decreasing
/// cascade priority.
#[derive(Clone, Debug)]
pub struct PropertiesList {
    entries: Vec<(LonghandId, PropertyDeclaration)>,
}

impl PropertiesList {
    /// Iterates over the resolved declarations.
    pub fn iter(&self) -> impl Iterator<Item = (LonghandId, &PropertyDeclaration)> {
        self.entries.iter().map(|(id, declaration)| (*id, declaration))
    }

    /// The number of resolved declarations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no longhand declaration won the cascade.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Accumulates the winning longhand declaration per property, fed in
/// decreasing cascade priority: the first declaration of a property wins,
/// modulo `revert` bookkeeping per origin.
struct PropertiesListBuilder<'a> {
    custom_properties: Option<&'a CustomPropertiesList>,
    seen: LonghandIdSet,
    reverted: PerOrigin<LonghandIdSet>,
    entries: Vec<(LonghandId, PropertyDeclaration)>,
}

impl<'a> PropertiesListBuilder<'a> {
    fn new(custom_properties: Option<&'a CustomPropertiesList>) -> Self {
        PropertiesListBuilder {
            custom_properties,
            seen: LonghandIdSet::new(),
            reverted: PerOrigin::default(),
            entries: Vec::new(),
        }
    }

    fn cascade(&mut self, declaration: &PropertyDeclaration, level: CascadeLevel) {
        let longhand_id = match declaration.id() {
            PropertyDeclarationId::Longhand(id) => id,
            PropertyDeclarationId::Custom(..) => return,
        };

        if self.seen.contains(longhand_id) {
            return;
        }

        let origin = level.origin();
        if self.reverted.borrow(origin).contains(longhand_id) {
            return;
        }

        let declaration = self.substitute_variables_if_needed(declaration);

        if declaration.get_css_wide_keyword() == Some(CSSWideKeyword::Revert) {
            for origin in origin.reverted_origins().iter_origins() {
                self.reverted.borrow_mut(origin).insert(longhand_id);
            }
            return;
        }

        self.seen.insert(longhand_id);

        // Declarations that spell out the default behavior don't need to be
        // applied at all: the builder already starts from the inherited or
        // reset struct as appropriate.
        let inherited = longhand_id.inherited();
        let is_unset = match declaration.get_css_wide_keyword() {
            Some(CSSWideKeyword::Unset) => true,
            Some(CSSWideKeyword::Inherit) => inherited,
            Some(CSSWideKeyword::Initial) => !inherited,
            _ => false,
        };
        if is_unset {
            return;
        }

        self.entries.push((longhand_id, declaration.into_owned()));
    }

    fn substitute_variables_if_needed<'decl>(
        &self,
        declaration: &'decl PropertyDeclaration,
    ) -> Cow<'decl, PropertyDeclaration> {
        match *declaration {
            PropertyDeclaration::WithVariables(ref variable_declaration) => {
                Cow::Owned(variable_declaration.value.substitute_variables(
                    variable_declaration.id,
                    self.custom_properties,
                ))
            },
            _ => Cow::Borrowed(declaration),
        }
    }

    fn build(self) -> PropertiesList {
        PropertiesList {
            entries: self.entries,
        }
    }
}
