// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Recipe documents: parsing, variable substitution and loading from disk.
//!
//! # Example
//! ```yaml
//! recipe:
//!   - name: fetch
//!     processor: download
//!     arguments:
//!       url: "https://{host}/dump.tar"
//!   - name: unpack
//!     requires: [fetch]
//!     processor: untar
//!     arguments:
//!       archive: "{workdir}/dump.tar"
//! ```
//!
//! Variables come from an optional second document:
//! ```yaml
//! recipe_vars:
//!   host: mirror.example.org
//!   workdir: /srv/data
//! ```

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use crate::errors::RecipeError;

/// One unit of recipe work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub name: String,
    pub requires: BTreeSet<String>,
    pub processor: String,
    pub arguments: BTreeMap<String, String>,
}

impl Task {
    pub fn new(name: impl Into<String>, processor: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requires: BTreeSet::new(),
            processor: processor.into(),
            arguments: BTreeMap::new(),
        }
    }

    pub fn requiring<I, S>(mut self, requires: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires.extend(requires.into_iter().map(Into::into));
        self
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }

    /// Argument pairs in the shape the dispatcher binds them.
    pub fn argument_pairs(&self) -> Vec<(String, String)> {
        self.arguments
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct RecipeDocument {
    recipe: Vec<TaskDocument>,
}

#[derive(Debug, Deserialize)]
struct TaskDocument {
    name: String,
    #[serde(default)]
    requires: Vec<String>,
    processor: String,
    #[serde(default)]
    arguments: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Deserialize)]
struct VariablesDocument {
    recipe_vars: BTreeMap<String, serde_yaml::Value>,
}

/// Parse a variables document (`recipe_vars: {...}`).
pub fn parse_variables(source: &str, origin: &str) -> Result<HashMap<String, String>, RecipeError> {
    let doc: VariablesDocument =
        serde_yaml::from_str(source).map_err(|source| RecipeError::Parse {
            origin: origin.to_string(),
            source,
        })?;
    doc.recipe_vars
        .into_iter()
        .map(|(name, value)| match scalar_to_string(&value) {
            Some(value) => Ok((name, value)),
            None => Err(RecipeError::NonScalarArgument {
                task: "recipe_vars".to_string(),
                argument: name,
            }),
        })
        .collect()
}

/// Parse a recipe document and substitute `{variable}` placeholders.
///
/// Tasks are returned in document order; duplicates and graph problems are
/// left to [`crate::config::validate_recipe`].
pub fn parse_recipe(
    source: &str,
    origin: &str,
    variables: &HashMap<String, String>,
) -> Result<Vec<Task>, RecipeError> {
    let doc: RecipeDocument = serde_yaml::from_str(source).map_err(|source| RecipeError::Parse {
        origin: origin.to_string(),
        source,
    })?;

    doc.recipe
        .into_iter()
        .map(|task| build_task(task, variables))
        .collect()
}

fn build_task(doc: TaskDocument, variables: &HashMap<String, String>) -> Result<Task, RecipeError> {
    let mut arguments = BTreeMap::new();
    for (argument, value) in doc.arguments {
        let raw = scalar_to_string(&value).ok_or_else(|| RecipeError::NonScalarArgument {
            task: doc.name.clone(),
            argument: argument.clone(),
        })?;
        let value = substitute(&raw, variables).map_err(|failure| match failure {
            Substitution::Missing(variable) => RecipeError::UnresolvedVariable {
                task: doc.name.clone(),
                argument: argument.clone(),
                variable,
            },
            Substitution::Malformed => RecipeError::MalformedPlaceholder {
                task: doc.name.clone(),
                argument: argument.clone(),
            },
        })?;
        arguments.insert(argument, value);
    }

    Ok(Task {
        name: doc.name,
        requires: doc.requires.into_iter().collect(),
        processor: doc.processor,
        arguments,
    })
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[derive(Debug, PartialEq)]
enum Substitution {
    Missing(String),
    Malformed,
}

/// Replace `{name}` with the variable value; `{{` and `}}` are literal braces.
fn substitute(template: &str, variables: &HashMap<String, String>) -> Result<String, Substitution> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') | None => return Err(Substitution::Malformed),
                        Some(c) => name.push(c),
                    }
                }
                let value = variables
                    .get(&name)
                    .ok_or_else(|| Substitution::Missing(name.clone()))?;
                out.push_str(value);
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => return Err(Substitution::Malformed),
            c => out.push(c),
        }
    }

    Ok(out)
}

/// Load a recipe from disk, applying variables from an optional variables file.
pub fn load_recipe<P: AsRef<Path>>(
    recipe_path: P,
    variables_path: Option<&Path>,
) -> Result<Vec<Task>, RecipeError> {
    let variables = match variables_path {
        Some(path) => parse_variables(&read(path)?, &format!("'{}'", path.display()))?,
        None => HashMap::new(),
    };

    let recipe_path = recipe_path.as_ref();
    parse_recipe(
        &read(recipe_path)?,
        &format!("'{}'", recipe_path.display()),
        &variables,
    )
}

fn read(path: &Path) -> Result<String, RecipeError> {
    fs::read_to_string(path).map_err(|source| RecipeError::Io {
        path: path.to_path_buf(),
        source,
    })
}
