// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Processor definitions as advertised by agents.
//!
//! A [`Processor`] received from an agent is a template: its arguments carry
//! no values (or agent-provided defaults). Binding a task's arguments mutates
//! the arguments in place, so callers must bind on a clone, never on the
//! catalog entry itself. `Clone` produces a fully independent copy.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Display, Formatter};
use thiserror::Error;

/// Kind of value an argument accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgKind {
    Str,
    Int,
    Float,
    Bool,
    Path,
}

impl Display for ArgKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArgKind::Str => "str",
            ArgKind::Int => "int",
            ArgKind::Float => "float",
            ArgKind::Bool => "bool",
            ArgKind::Path => "path",
        };
        f.write_str(name)
    }
}

/// A raw value could not be coerced into the argument's kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value '{value}' for argument '{argument}': expected {expected}")]
pub struct InvalidValue {
    pub argument: String,
    pub value: String,
    pub expected: ArgKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorArg {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ArgKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub value: Option<Value>,
}

impl ProcessorArg {
    pub fn new(name: impl Into<String>, kind: ArgKind, required: bool) -> Self {
        Self {
            name: name.into(),
            kind,
            required,
            description: None,
            value: None,
        }
    }

    /// Parse `raw` according to the argument kind and store the typed value.
    ///
    /// On failure the previous value is left untouched.
    pub fn set_value(&mut self, raw: &str) -> Result<(), InvalidValue> {
        let parsed = match self.kind {
            ArgKind::Str => Some(Value::String(raw.to_string())),
            ArgKind::Path => (!raw.trim().is_empty()).then(|| Value::String(raw.to_string())),
            ArgKind::Int => raw.trim().parse::<i64>().ok().map(Value::from),
            ArgKind::Float => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number),
            ArgKind::Bool => parse_bool(raw).map(Value::Bool),
        };

        match parsed {
            Some(value) => {
                self.value = Some(value);
                Ok(())
            }
            None => Err(InvalidValue {
                argument: self.name.clone(),
                value: raw.to_string(),
                expected: self.kind,
            }),
        }
    }

    /// An unset argument is valid; a set one must hold a value of its kind.
    pub fn is_valid(&self) -> bool {
        match &self.value {
            None => true,
            Some(value) => match self.kind {
                ArgKind::Str => value.is_string(),
                ArgKind::Path => value.as_str().is_some_and(|s| !s.trim().is_empty()),
                ArgKind::Int => value.is_i64() || value.is_u64(),
                ArgKind::Float => value.is_number(),
                ArgKind::Bool => value.is_boolean(),
            },
        }
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Processor {
    pub name: String,
    #[serde(default)]
    pub docstring: String,
    #[serde(default)]
    pub args: Vec<ProcessorArg>,
}

impl Processor {
    pub fn new(name: impl Into<String>, docstring: impl Into<String>, args: Vec<ProcessorArg>) -> Self {
        Self {
            name: name.into(),
            docstring: docstring.into(),
            args,
        }
    }

    pub fn get_arg(&self, name: &str) -> Option<&ProcessorArg> {
        self.args.iter().find(|arg| arg.name == name)
    }

    pub fn get_arg_mut(&mut self, name: &str) -> Option<&mut ProcessorArg> {
        self.args.iter_mut().find(|arg| arg.name == name)
    }

    /// True iff every required argument is set and every set value is valid.
    pub fn validate_arguments(&self) -> bool {
        self.args
            .iter()
            .all(|arg| (!arg.required || arg.is_set()) && arg.is_valid())
    }

    /// Human readable usage: the docstring followed by one line per argument.
    pub fn usage(&self) -> String {
        let mut usage = format!("{}\n", self.name);
        if !self.docstring.trim().is_empty() {
            usage.push_str(&format!("\n{}\n", self.docstring.trim_end()));
        }
        if !self.args.is_empty() {
            usage.push_str("\narguments:\n");
            for arg in &self.args {
                let presence = if arg.required { "required" } else { "optional" };
                usage.push_str(&format!("  {} ({}, {})", arg.name, arg.kind, presence));
                if let Some(description) = &arg.description {
                    usage.push_str(&format!(": {}", description));
                }
                usage.push('\n');
            }
        }
        usage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert() -> Processor {
        Processor::new(
            "convert",
            "Convert a file to another format.",
            vec![
                ProcessorArg::new("input", ArgKind::Path, true),
                ProcessorArg::new("quality", ArgKind::Int, false),
                ProcessorArg::new("ratio", ArgKind::Float, false),
                ProcessorArg::new("overwrite", ArgKind::Bool, false),
            ],
        )
    }

    #[test]
    fn test_set_value_coerces_by_kind() {
        let mut processor = convert();
        processor.get_arg_mut("input").unwrap().set_value("/data/in.raw").unwrap();
        processor.get_arg_mut("quality").unwrap().set_value(" 90 ").unwrap();
        processor.get_arg_mut("ratio").unwrap().set_value("0.5").unwrap();
        processor.get_arg_mut("overwrite").unwrap().set_value("Yes").unwrap();

        assert_eq!(processor.get_arg("input").unwrap().value, Some(Value::from("/data/in.raw")));
        assert_eq!(processor.get_arg("quality").unwrap().value, Some(Value::from(90)));
        assert_eq!(processor.get_arg("ratio").unwrap().value, Some(Value::from(0.5)));
        assert_eq!(processor.get_arg("overwrite").unwrap().value, Some(Value::Bool(true)));
        assert!(processor.validate_arguments());
    }

    #[test]
    fn test_set_value_rejects_bad_input_and_keeps_previous_value() {
        let mut arg = ProcessorArg::new("quality", ArgKind::Int, true);
        arg.set_value("7").unwrap();

        let err = arg.set_value("seven").unwrap_err();
        assert_eq!(err.expected, ArgKind::Int);
        assert_eq!(err.value, "seven");
        assert_eq!(arg.value, Some(Value::from(7)));
    }

    #[test]
    fn test_float_rejects_non_finite() {
        let mut arg = ProcessorArg::new("ratio", ArgKind::Float, false);
        assert!(arg.set_value("inf").is_err());
        assert!(arg.set_value("NaN").is_err());
    }

    #[test]
    fn test_empty_path_is_invalid() {
        let mut arg = ProcessorArg::new("input", ArgKind::Path, true);
        assert!(arg.set_value("   ").is_err());
    }

    #[test]
    fn test_validate_requires_required_arguments() {
        let processor = convert();
        assert!(!processor.validate_arguments());
    }

    #[test]
    fn test_validate_detects_mistyped_agent_default() {
        let mut processor = convert();
        processor.get_arg_mut("input").unwrap().set_value("a.raw").unwrap();
        processor.get_arg_mut("quality").unwrap().value = Some(Value::from("high"));
        assert!(!processor.validate_arguments());
    }

    #[test]
    fn test_binding_a_clone_leaves_template_untouched() {
        let template = convert();
        let mut bound = template.clone();
        bound.get_arg_mut("input").unwrap().set_value("x.raw").unwrap();

        assert!(template.get_arg("input").unwrap().value.is_none());
        assert!(bound.get_arg("input").unwrap().is_set());
    }

    #[test]
    fn test_usage_lists_arguments() {
        let usage = convert().usage();
        assert!(usage.starts_with("convert\n"));
        assert!(usage.contains("Convert a file to another format."));
        assert!(usage.contains("  input (path, required)"));
        assert!(usage.contains("  overwrite (bool, optional)"));
    }

    #[test]
    fn test_wire_format_uses_type_key() {
        let body = r#"{"name": "p", "docstring": "d", "args": [{"name": "n", "type": "int", "required": true}]}"#;
        let processor: Processor = serde_json::from_str(body).unwrap();
        assert_eq!(processor.args[0].kind, ArgKind::Int);
        assert!(processor.args[0].value.is_none());
    }
}
