//! Document merge operations.
//!
//! # Responsibility
//! - `overlay_defaults`: load-time deep merge of compiled-in defaults onto a
//!   persisted document.
//! - `apply_partial`: update-time shallow merge of a partial document.
//! - `merge_top_level`: field-merge write used by document stores.
//!
//! # Invariants
//! - The two document merges stay separate operations with different rules.
//! - `overlay_defaults` is idempotent:
//!   `overlay(overlay(p, d), d) == overlay(p, d)`.
//! - `apply_partial` never touches sections absent from the partial.

use crate::model::document::{PartialPortfolioDocument, PortfolioDocument};
use serde_json::{Map, Value};

/// Deep-merges `defaults` onto `persisted`.
///
/// Rules:
/// - object/object: merged key-by-key; keys only in `persisted` are kept.
/// - array/array: the persisted array wins wholesale.
/// - anything else: the default value wins.
pub fn overlay_defaults(persisted: Value, defaults: &Value) -> Value {
    match (persisted, defaults) {
        (Value::Object(mut persisted), Value::Object(defaults)) => {
            for (key, default_value) in defaults {
                let merged = match persisted.remove(key) {
                    Some(persisted_value) => overlay_defaults(persisted_value, default_value),
                    None => default_value.clone(),
                };
                persisted.insert(key.clone(), merged);
            }
            Value::Object(persisted)
        }
        (persisted @ Value::Array(_), Value::Array(_)) => persisted,
        (_, default_value) => default_value.clone(),
    }
}

/// Replaces every section present in `partial`; other sections are untouched.
pub fn apply_partial(document: &mut PortfolioDocument, partial: PartialPortfolioDocument) {
    let PartialPortfolioDocument {
        personal_info,
        skills,
        projects,
        experiences,
        education,
    } = partial;

    if let Some(personal_info) = personal_info {
        document.personal_info = personal_info;
    }
    if let Some(skills) = skills {
        document.skills = skills;
    }
    if let Some(projects) = projects {
        document.projects = projects;
    }
    if let Some(experiences) = experiences {
        document.experiences = experiences;
    }
    if let Some(education) = education {
        document.education = education;
    }
}

/// Replaces top-level fields of `target` with those in `patch`.
pub fn merge_top_level(target: &mut Map<String, Value>, patch: Map<String, Value>) {
    for (key, value) in patch {
        target.insert(key, value);
    }
}
