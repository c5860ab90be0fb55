//! Section merge rules: how a proposed section set is reconciled with a
//! tool's existing config file. Pure functions over in-memory section sets;
//! callers persist the result.

use ini::{Ini, Properties};

/// What happens to a same-named existing section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceMode {
    /// Drop the existing section and write exactly the proposed keys.
    Overwrite,
    /// Overwrite/add only the proposed keys, keep the rest of the section.
    MergeKeys,
}

/// What happens to sections that are not part of the proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusivity {
    /// The file holds exactly one logical profile; purge everything else.
    ExclusiveSingleProfile,
    /// Unrelated sections are left untouched.
    Additive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergePolicy {
    pub replace: ReplaceMode,
    pub exclusivity: Exclusivity,
}

impl MergePolicy {
    /// Key-level merge preserving unrelated existing keys.
    pub const fn careful(exclusivity: Exclusivity) -> Self {
        MergePolicy {
            replace: ReplaceMode::MergeKeys,
            exclusivity,
        }
    }

    /// Section-level replace discarding keys not in the proposal.
    pub const fn destructive(exclusivity: Exclusivity) -> Self {
        MergePolicy {
            replace: ReplaceMode::Overwrite,
            exclusivity,
        }
    }
}

/// Reconcile `existing` with `proposed` under `policy`.
///
/// Section and key order follows the existing file first, then the
/// proposal's insertion order for anything new; nothing is sorted.
pub fn merge_sections(existing: &Ini, proposed: &Ini, policy: MergePolicy) -> Ini {
    let mut merged = existing.clone();

    if policy.exclusivity == Exclusivity::ExclusiveSingleProfile {
        let keep: Vec<String> = proposed.sections().flatten().map(str::to_string).collect();
        let present: Vec<String> = merged.sections().flatten().map(str::to_string).collect();
        for name in present {
            if !keep.iter().any(|k| *k == name) {
                merged.delete(Some(name.as_str()));
            }
        }
    }

    for (name, props) in proposed.iter() {
        // The general (unnamed) section is not part of the data model.
        let Some(name) = name else { continue };
        if policy.replace == ReplaceMode::Overwrite {
            merged.delete(Some(name));
        }
        merged.entry(Some(name.to_string())).or_insert(Properties::new());
        for (key, value) in props.iter() {
            merged.set_to(Some(name), key.to_string(), value.to_string());
        }
    }

    merged
}
