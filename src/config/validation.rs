// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Recipe validation for graph integrity.
//!
//! Checks run in a fixed order so error messages stay meaningful:
//!
//! 1. **Uniqueness**: every task name appears once
//! 2. **References**: every `requires` entry names a task of the recipe
//! 3. **Acyclicity**: Kahn's algorithm, repeatedly removing tasks with no
//!    remaining requirements; whatever survives is part of (or stuck behind) a cycle
//!
//! Cycle detection needs a structurally valid graph, so it only runs when the
//! first two checks pass. Errors from the first two checks are accumulated.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::config::Task;
use crate::errors::ValidationError;

/// Validate a recipe's task list, returning every problem found.
pub fn validate_recipe(tasks: &[Task]) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(duplicate_errors) = validate_unique_task_names(tasks) {
        errors.extend(duplicate_errors);
    }

    if let Err(unresolved_errors) = validate_requirements(tasks) {
        errors.extend(unresolved_errors);
    }

    if errors.is_empty() {
        if let Err(cycle_error) = validate_acyclic(tasks) {
            errors.push(cycle_error);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_unique_task_names(tasks: &[Task]) -> Result<(), Vec<ValidationError>> {
    let mut seen = HashSet::new();
    let mut errors = Vec::new();

    for task in tasks {
        if !seen.insert(task.name.as_str()) {
            errors.push(ValidationError::DuplicateTaskName {
                task: task.name.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_requirements(tasks: &[Task]) -> Result<(), Vec<ValidationError>> {
    let names: HashSet<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
    let mut errors = Vec::new();

    for task in tasks {
        for required in &task.requires {
            if !names.contains(required.as_str()) {
                errors.push(ValidationError::UnresolvedRequirement {
                    task: task.name.clone(),
                    missing: required.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Kahn's algorithm over the `requires` relation.
///
/// On failure the reported tasks are the remainder with pure "downstream"
/// tasks trimmed off (tasks nothing else in the remainder requires), which
/// leaves the tasks on a cycle or sitting between cycles.
fn validate_acyclic(tasks: &[Task]) -> Result<(), ValidationError> {
    let mut remaining: BTreeMap<&str, BTreeSet<&str>> = tasks
        .iter()
        .map(|t| (t.name.as_str(), t.requires.iter().map(String::as_str).collect()))
        .collect();

    loop {
        let removable: Vec<&str> = remaining
            .iter()
            .filter(|(_, requires)| requires.is_empty())
            .map(|(name, _)| *name)
            .collect();

        if removable.is_empty() {
            break;
        }

        for name in &removable {
            remaining.remove(name);
        }
        for requires in remaining.values_mut() {
            for name in &removable {
                requires.remove(name);
            }
        }
    }

    if remaining.is_empty() {
        return Ok(());
    }

    // Peel tasks that no other remaining task requires.
    loop {
        let required: HashSet<&str> = remaining.values().flatten().copied().collect();
        let leaves: Vec<&str> = remaining
            .keys()
            .filter(|name| !required.contains(*name))
            .copied()
            .collect();
        if leaves.is_empty() {
            break;
        }
        for leaf in leaves {
            remaining.remove(leaf);
        }
    }

    Err(ValidationError::CyclicDependency {
        tasks: remaining.keys().map(|name| name.to_string()).collect(),
    })
}
