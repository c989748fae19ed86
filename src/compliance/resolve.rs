//! Capability resolution.

use std::collections::HashSet;

use serde::Serialize;

use super::{ComplianceEntry, ComplianceLevel};

/// A capability after merging the compliance level with declared extras.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedCapability {
    /// Capability name
    pub name: String,

    /// Whether the service supports it
    pub supported: bool,

    /// Display category, when known from the static table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Display description, when known from the static table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Resolve a capability table against a compliance level and a list of
/// explicitly declared extras.
///
/// - A table entry is supported when `level` implies it or it is named in
///   `extras`.
/// - Extras unknown to the table are appended as supported, so vendor
///   extensions surface instead of being dropped.
/// - The result is sorted by name and contains each name once.
///
/// This never fails; a missing level simply implies nothing.
pub fn resolve(
    table: &[ComplianceEntry],
    level: Option<ComplianceLevel>,
    extras: &[String],
) -> Vec<ResolvedCapability> {
    let declared: HashSet<&str> = extras.iter().map(String::as_str).collect();

    let mut resolved: Vec<ResolvedCapability> = table
        .iter()
        .map(|entry| ResolvedCapability {
            name: entry.name.to_string(),
            supported: level.is_some_and(|l| entry.implied_by(l))
                || declared.contains(entry.name),
            category: entry.category.map(str::to_string),
            description: entry.description.map(str::to_string),
        })
        .collect();

    let mut seen: HashSet<&str> = table.iter().map(|entry| entry.name).collect();
    for extra in extras {
        if seen.insert(extra.as_str()) {
            resolved.push(ResolvedCapability {
                name: extra.clone(),
                supported: true,
                category: None,
                description: None,
            });
        }
    }

    resolved.sort_by(|a, b| a.name.cmp(&b.name));
    resolved
}
