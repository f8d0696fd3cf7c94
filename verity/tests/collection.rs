//! Tests for result aggregation: attribute and model-level roll-ups.

mod common;

use common::build_user;
use common::presence;
use verity::prelude::*;

#[test]
fn test_empty_rule_set_is_valid() {
    let user = build_user(ValidationRules::new());
    let outcome = user.validations().validate_sync().expect("model is alive");

    assert!(outcome.validations.is_valid());
    assert!(!outcome.validations.is_validating());
    assert!(outcome.validations.messages().is_empty());
}

#[test]
fn test_model_aggregate_is_and_over_attributes() {
    let user = build_user(common::name_rules());
    user.set("firstName", "John");

    let outcome = user.validations().validate_sync().expect("model is alive");
    assert!(!outcome.validations.is_valid());
    assert!(outcome.validations.attr("firstName").is_valid());
    assert!(!outcome.validations.attr("lastName").is_valid());

    user.set("lastName", "Doe");
    let outcome = user.validations().validate_sync().expect("model is alive");
    assert!(outcome.validations.is_valid());
    assert!(outcome.validations.is_truly_valid());
}

#[test]
fn test_messages_concatenate_in_declaration_order() {
    let user = build_user(common::name_rules());

    let outcome = user.validations().validate_sync().expect("model is alive");
    assert_eq!(
        outcome.validations.messages(),
        vec![
            "firstName should be present".to_string(),
            "lastName should be present".to_string()
        ]
    );
    assert_eq!(
        outcome.validations.message(),
        Some("firstName should be present".to_string())
    );
}

#[test]
fn test_valid_entries_contribute_no_messages() {
    let user = build_user(common::name_rules());
    user.set("firstName", "John");

    let outcome = user.validations().validate_sync().expect("model is alive");
    assert_eq!(
        outcome.validations.messages(),
        vec!["lastName should be present".to_string()]
    );
}

#[test]
fn test_multiple_rules_per_attribute_share_the_collection() {
    let rules = ValidationRules::new()
        .attr("password", presence)
        .attr("password", |value, _, _, _| {
            let long_enough = value
                .as_ref()
                .and_then(AttrValue::as_str)
                .is_some_and(|s| s.len() >= 8);
            if long_enough {
                ValidatorOutput::ready(true)
            } else {
                ValidatorOutput::ready("password is too short")
            }
        });
    let user = build_user(rules);
    user.set("password", "hunter2");

    let password = user.validations().attr("password");
    assert_eq!(password.len(), 2);

    let outcome = user.validations().validate_sync().expect("model is alive");
    let password = outcome.validations.attr("password");
    assert!(!password.is_valid());
    assert_eq!(password.messages(), vec!["password is too short".to_string()]);

    user.set("password", "correct horse battery staple");
    let outcome = user.validations().validate_sync().expect("model is alive");
    assert!(outcome.validations.attr("password").is_valid());
}

#[test]
fn test_errors_carry_attribute_names() {
    let user = build_user(common::name_rules());
    user.set("firstName", "John");

    let outcome = user.validations().validate_sync().expect("model is alive");
    let errors = outcome.validations.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].attribute, "lastName");
    assert_eq!(
        outcome.validations.error().map(|e| e.to_string()),
        Some("lastName: lastName should be present".to_string())
    );
}

#[test]
fn test_dirty_tracks_presence_and_defaults() {
    let user = build_user(common::name_rules());

    // Nothing set: nothing dirty.
    assert!(!user.validations().is_dirty());

    // Present value with no discoverable default.
    user.set("firstName", "John");
    assert!(user.validations().is_dirty());

    // Value equal to its declared default is clean.
    let user = build_user(common::name_rules());
    user.set_default("firstName", "John");
    user.set("firstName", "John");
    assert!(!user.validations().is_dirty());

    user.set("firstName", "Jane");
    assert!(user.validations().is_dirty());
}

#[test]
fn test_datetime_values_flow_through_validators() {
    let rules = ValidationRules::new().attr("dob", presence);
    let user = build_user(rules);

    let outcome = user.validations().validate_sync().expect("model is alive");
    assert!(!outcome.validations.is_valid());

    user.set("dob", AttrValue::DateTime(chrono::Utc::now()));
    let outcome = user.validations().validate_sync().expect("model is alive");
    assert!(outcome.validations.is_valid());
    assert!(outcome.validations.is_dirty());
}

fn min_length(
    value: Option<AttrValue>,
    options: &Options,
    _model: &ModelHandle,
    attribute: &str,
) -> ValidatorOutput {
    if options.get_bool("allowBlank").unwrap_or(false) && value.is_none() {
        return ValidatorOutput::ready(true);
    }
    let min = options.get_i64("min").unwrap_or(0);
    let long_enough = value
        .as_ref()
        .and_then(AttrValue::as_str)
        .is_some_and(|s| s.len() as i64 >= min);
    if long_enough {
        ValidatorOutput::ready(true)
    } else {
        let message = options
            .get_str("message")
            .map(str::to_string)
            .unwrap_or_else(|| format!("{attribute} is too short"));
        ValidatorOutput::ready(message)
    }
}

#[test]
fn test_options_drive_validator_behavior() {
    let rules = ValidationRules::new().attr_with(
        "password",
        Options::new().set("min", 8).set("message", "pick a longer password"),
        min_length,
    );
    let user = build_user(rules);
    user.set("password", "hunter2");

    let outcome = user.validations().validate_sync().expect("model is alive");
    assert!(!outcome.validations.is_valid());
    assert_eq!(
        outcome.validations.message(),
        Some("pick a longer password".to_string())
    );

    user.set("password", "correct horse battery staple");
    let outcome = user.validations().validate_sync().expect("model is alive");
    assert!(outcome.validations.is_valid());
}

#[test]
fn test_allow_blank_option_accepts_missing_value() {
    let rules = ValidationRules::new().attr_with(
        "nickname",
        Options::new().set("min", 3).set("allowBlank", true),
        min_length,
    );
    let user = build_user(rules);

    let outcome = user.validations().validate_sync().expect("model is alive");
    assert!(outcome.validations.is_valid());

    user.set("nickname", "jo");
    let outcome = user.validations().validate_sync().expect("model is alive");
    assert_eq!(
        outcome.validations.message(),
        Some("nickname is too short".to_string())
    );
}

#[test]
fn test_model_values_format_for_debug_output() {
    let user = build_user(common::name_rules());
    let value = AttrValue::from(common::handle(&user));

    let formatted = format!("{value:?}");
    assert!(formatted.starts_with("Model"));
}

#[test]
fn test_attr_collection_for_unknown_attribute_is_vacuously_valid() {
    let user = build_user(common::name_rules());
    let missing = user.validations().attr("nickname");

    assert!(missing.is_empty());
    assert!(missing.is_valid());
    assert_eq!(missing.message(), None);
}
