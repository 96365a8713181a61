//! Cache Key Module
//!
//! Accepted key kinds and their normalization to the canonical string form.

use std::fmt;

use serde_json::Value;

use crate::error::{Result, StoreError};

// == Symbol ==
/// A named identifier key. Normalizes to its name, so `Symbol::new("user")`
/// and `"user"` address the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a symbol with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the symbol name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// == Key Input ==
/// Any value offered as a key.
///
/// Text and symbols are always valid. Dynamic JSON values are valid only
/// when they hold a string; every other kind is rejected with
/// [`StoreError::InvalidKeyKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum KeyInput {
    Text(String),
    Symbol(Symbol),
    Dynamic(Value),
}

impl KeyInput {
    /// Validates the key and returns its canonical string form.
    pub fn into_key(self) -> Result<String> {
        match self {
            KeyInput::Text(text) => Ok(text),
            KeyInput::Symbol(symbol) => Ok(symbol.0),
            KeyInput::Dynamic(Value::String(text)) => Ok(text),
            KeyInput::Dynamic(other) => Err(StoreError::InvalidKeyKind {
                kind: kind_name(&other),
            }),
        }
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl From<&str> for KeyInput {
    fn from(text: &str) -> Self {
        KeyInput::Text(text.to_string())
    }
}

impl From<String> for KeyInput {
    fn from(text: String) -> Self {
        KeyInput::Text(text)
    }
}

impl From<&String> for KeyInput {
    fn from(text: &String) -> Self {
        KeyInput::Text(text.clone())
    }
}

impl From<Symbol> for KeyInput {
    fn from(symbol: Symbol) -> Self {
        KeyInput::Symbol(symbol)
    }
}

impl From<&Symbol> for KeyInput {
    fn from(symbol: &Symbol) -> Self {
        KeyInput::Symbol(symbol.clone())
    }
}

impl From<Value> for KeyInput {
    fn from(value: Value) -> Self {
        KeyInput::Dynamic(value)
    }
}
