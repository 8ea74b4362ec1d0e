/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use cascade::properties::declaration_block::parse_style_attribute;
use cascade::properties::{
    CSSWideKeyword, Importance, LonghandId, PropertyDeclaration, PropertyDeclarationId,
};
use cascade::values::specified;
use cascade::values::RGBA;

#[test]
fn parses_declarations_with_importance() {
    let block = parse_style_attribute("color: red; background-color: blue !important");
    assert_eq!(block.len(), 2);
    assert!(block.any_important());
    assert!(block.any_normal());

    let (_, importance) = block
        .get(PropertyDeclarationId::Longhand(LonghandId::BackgroundColor))
        .unwrap();
    assert_eq!(importance, Importance::Important);
}

#[test]
fn duplicate_properties_update_in_place() {
    let block = parse_style_attribute("color: red; color: blue");
    assert_eq!(block.len(), 1);

    let (declaration, importance) = block
        .get(PropertyDeclarationId::Longhand(LonghandId::Color))
        .unwrap();
    assert_eq!(importance, Importance::Normal);
    assert_eq!(
        *declaration,
        PropertyDeclaration::Color(specified::Color::Rgba(RGBA::new(0, 0, 255, 255))),
    );
}

#[test]
fn unknown_and_invalid_declarations_are_skipped() {
    let block = parse_style_attribute("colour: red; color: blue; color-scheme: dark");
    assert_eq!(block.len(), 1);

    let block = parse_style_attribute("color: 12px; background-color: aqua");
    assert_eq!(block.len(), 1);
}

#[test]
fn css_wide_keywords_parse() {
    let block = parse_style_attribute("color: inherit");
    let (declaration, _) = block
        .get(PropertyDeclarationId::Longhand(LonghandId::Color))
        .unwrap();
    assert_eq!(
        declaration.get_css_wide_keyword(),
        Some(CSSWideKeyword::Inherit)
    );
}

#[test]
fn var_functions_become_unparsed_values() {
    let block = parse_style_attribute("color: var(--main); margin-top: calc(var(--m) * 2)");
    assert_eq!(block.len(), 2);
    for declaration in block.declarations() {
        assert!(matches!(
            declaration,
            PropertyDeclaration::WithVariables(..)
        ));
    }
}

#[test]
fn custom_declarations_parse() {
    let block = parse_style_attribute("--main: #00ff00; --empty: inherit");
    assert_eq!(block.len(), 2);
    assert!(block
        .declarations()
        .iter()
        .all(|declaration| declaration.is_custom()));
}

#[test]
fn importance_iteration_is_double_ended() {
    let block = parse_style_attribute("color: red; background-color: blue !important");
    let forward: Vec<_> = block
        .declaration_importance_iter()
        .map(|(declaration, importance)| (declaration.id().as_longhand().unwrap(), importance))
        .collect();
    let mut backward: Vec<_> = block
        .declaration_importance_iter()
        .rev()
        .map(|(declaration, importance)| (declaration.id().as_longhand().unwrap(), importance))
        .collect();
    backward.reverse();
    assert_eq!(forward, backward);
    assert_eq!(
        forward,
        [
            (LonghandId::Color, Importance::Normal),
            (LonghandId::BackgroundColor, Importance::Important),
        ]
    );
}
