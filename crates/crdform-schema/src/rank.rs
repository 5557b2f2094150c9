//! Merging, ordering and partitioning of collected candidates.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::warn;

use crate::extract::Candidate;
use crate::field::{FieldDefinition, top_level_spec_key};

/// Candidates split into default and optional fields.
#[derive(Debug, Default)]
pub(crate) struct Ranked {
    /// Every merged candidate, in rank order.
    pub candidates: Vec<Candidate>,
    pub defaults: Vec<FieldDefinition>,
    pub optionals: Vec<FieldDefinition>,
}

/// Merges candidates that share a path, keeping first-seen order.
pub(crate) fn dedup_candidates(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut merged: IndexMap<String, Candidate> = IndexMap::with_capacity(candidates.len());
    for candidate in candidates {
        match merged.entry(candidate.field.path.clone()) {
            Entry::Vacant(entry) => {
                entry.insert(candidate);
            }
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                existing.required |= candidate.required;
                if candidate.has_default && !existing.has_default {
                    existing.has_default = true;
                    existing.field.value = candidate.field.value;
                }
                if existing.field.description.is_empty() {
                    existing.field.description = candidate.field.description;
                }
                if existing.field.field_type.is_unspecified() {
                    existing.field.field_type = candidate.field.field_type;
                }
                existing.depth = existing.depth.min(candidate.depth);
            }
        }
    }
    merged.into_values().collect()
}

/// Orders candidates and splits them into at most `max_defaults` defaults.
///
/// Required candidates come first, then default-backed ones, then shallower
/// ones, with the path as the final tie-break. Required and default-backed
/// candidates are placed first; the remaining default slots are then filled
/// in rank order.
pub(crate) fn rank(candidates: Vec<Candidate>, max_defaults: usize) -> Ranked {
    let mut candidates = dedup_candidates(candidates);
    candidates.sort_by(|left, right| {
        right
            .required
            .cmp(&left.required)
            .then(right.has_default.cmp(&left.has_default))
            .then(left.depth.cmp(&right.depth))
            .then_with(|| left.field.path.cmp(&right.field.path))
    });

    let mut defaults = Vec::new();
    let mut optionals = Vec::new();
    let mut placed = HashSet::new();

    for candidate in &candidates {
        if (candidate.required || candidate.has_default) && defaults.len() < max_defaults {
            placed.insert(candidate.field.path.as_str());
            defaults.push(candidate.field.clone());
        } else {
            optionals.push(candidate.field.clone());
        }
    }

    for candidate in &candidates {
        if defaults.len() >= max_defaults {
            break;
        }
        if placed.insert(candidate.field.path.as_str()) {
            defaults.push(candidate.field.clone());
        }
    }

    optionals.retain(|field| !placed.contains(field.path.as_str()));

    Ranked {
        candidates,
        defaults,
        optionals,
    }
}

/// How strongly a default field resists being moved to the optional list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Priority {
    Backfill,
    Seed,
    DefaultBacked,
    Required,
    /// Never moved.
    Pinned,
}

/// Fits `defaults` into `max_defaults` and the whole template into `limit`.
///
/// Entries are moved from the tail of `defaults` to the front of `optionals`,
/// lowest priority first. Within a priority the last field covering a
/// top-level spec key is kept as long as anything else can go. Optionals are
/// then cleared of paths already in `defaults` and cut to the remaining room.
pub(crate) fn fit_budget(
    defaults: &mut Vec<FieldDefinition>,
    optionals: &mut Vec<FieldDefinition>,
    priorities: &HashMap<String, Priority>,
    max_defaults: usize,
    limit: usize,
) {
    let priority = |field: &FieldDefinition| {
        priorities
            .get(&field.path)
            .copied()
            .unwrap_or(Priority::Backfill)
    };

    if defaults.len() > max_defaults {
        let mut indexed: Vec<(usize, FieldDefinition)> = defaults.drain(..).enumerate().collect();
        let mut demoted = Vec::new();
        for tier in [
            Priority::Backfill,
            Priority::Seed,
            Priority::DefaultBacked,
            Priority::Required,
        ] {
            for keep_coverage in [true, false] {
                let mut index = indexed.len();
                while indexed.len() > max_defaults && index > 0 {
                    index -= 1;
                    if priority(&indexed[index].1) != tier {
                        continue;
                    }
                    if keep_coverage && is_sole_coverer(&indexed, index) {
                        continue;
                    }
                    demoted.push(indexed.remove(index));
                }
            }
        }
        if indexed.len() > max_defaults {
            warn!(
                count = indexed.len(),
                max_defaults, "pinned default fields exceed the default budget"
            );
        }

        demoted.sort_by_key(|(position, _)| *position);
        *defaults = indexed.into_iter().map(|(_, field)| field).collect();
        let mut moved: Vec<_> = demoted.into_iter().map(|(_, field)| field).collect();
        moved.append(optionals);
        *optionals = moved;
    }

    let mut seen: HashSet<String> = defaults.iter().map(|field| field.path.clone()).collect();
    optionals.retain(|field| seen.insert(field.path.clone()));
    optionals.truncate(limit.saturating_sub(defaults.len()));
}

fn is_sole_coverer(defaults: &[(usize, FieldDefinition)], index: usize) -> bool {
    let Some(key) = top_level_spec_key(&defaults[index].1.path) else {
        return false;
    };
    !defaults
        .iter()
        .enumerate()
        .any(|(other, (_, field))| other != index && top_level_spec_key(&field.path) == Some(key))
}
