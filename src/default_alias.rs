//! Bookkeeping for the `default` alias section.
//!
//! Tools that pick their active profile by a fixed section name get a
//! `default` section mirroring one generated profile, with an
//! `original_name` key pointing back at it. Invariant: at most one
//! `default` section exists, and while it exists its `original_name` names
//! a section that exists — deleting the referenced profile deletes the
//! alias with it.

use ini::Ini;

pub const DEFAULT_SECTION: &str = "default";
pub const ORIGINAL_NAME_KEY: &str = "original_name";

/// What happened to the alias while deleting a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasCleanup {
    /// The alias pointed at the deleted section and was removed with it.
    Removed,
    /// The alias points at some other section and was left alone.
    Unrelated,
    /// An alias exists but has no readable `original_name`; relatedness
    /// cannot be determined, so it was left untouched. Reported as a
    /// warning, not an error.
    Unreadable,
    /// No alias section present.
    NotPresent,
}

/// Overwrite the `default` section with a copy of the named profile's keys
/// plus the back-reference. The profile section itself is untouched; the
/// alias is a copy, not a move. A missing profile section is a no-op.
pub fn set_default(sections: &mut Ini, profile_name: &str) {
    let pairs: Vec<(String, String)> = match sections.section(Some(profile_name)) {
        Some(props) => props
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        None => return,
    };
    sections.delete(Some(DEFAULT_SECTION));
    for (key, value) in pairs {
        sections.set_to(Some(DEFAULT_SECTION), key, value);
    }
    sections.set_to(
        Some(DEFAULT_SECTION),
        ORIGINAL_NAME_KEY.to_string(),
        profile_name.to_string(),
    );
}

/// Cascade an alias removal after `deleted_name` was deleted, so the alias
/// never dangles.
pub fn clear_default_if_points_to(sections: &mut Ini, deleted_name: &str) -> AliasCleanup {
    let Some(alias) = sections.section(Some(DEFAULT_SECTION)) else {
        return AliasCleanup::NotPresent;
    };
    match alias.get(ORIGINAL_NAME_KEY) {
        Some(original) if original == deleted_name => {
            sections.delete(Some(DEFAULT_SECTION));
            AliasCleanup::Removed
        }
        Some(_) => AliasCleanup::Unrelated,
        None => AliasCleanup::Unreadable,
    }
}

/// Name of the profile the `default` alias points at, for status output.
pub fn current_default_name(sections: &Ini) -> String {
    sections
        .section(Some(DEFAULT_SECTION))
        .and_then(|props| props.get(ORIGINAL_NAME_KEY))
        .unwrap_or("unknown")
        .to_string()
}
