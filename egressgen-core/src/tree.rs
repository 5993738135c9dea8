//! Field-path access into a loaded template.
//!
//! Paths must already exist in the template; only the final key of a
//! [`TemplateTree::set`] may be new. A missing node surfaces as
//! [`EgressError::MissingField`] with the dotted path.

use crate::error::{EgressError, Result};
use crate::template::TemplateKind;
use serde_yaml::{Mapping, Sequence, Value};

/// A template document being turned into a manifest.
#[derive(Debug, Clone)]
pub struct TemplateTree {
    kind: TemplateKind,
    doc: Value,
}

impl TemplateTree {
    pub fn new(kind: TemplateKind, doc: Value) -> Self {
        Self { kind, doc }
    }

    pub fn kind(&self) -> TemplateKind {
        self.kind
    }

    pub fn into_value(self) -> Value {
        self.doc
    }

    fn missing(&self, path: &[&str]) -> EgressError {
        EgressError::missing(self.kind.file_name(), path.join("."))
    }

    fn node_mut(&mut self, path: &[&str]) -> Result<&mut Value> {
        let kind = self.kind;
        let mut node = &mut self.doc;
        for (depth, key) in path.iter().enumerate() {
            node = match node.get_mut(*key) {
                Some(child) => child,
                None => {
                    return Err(EgressError::missing(
                        kind.file_name(),
                        path[..=depth].join("."),
                    ));
                }
            };
        }
        Ok(node)
    }

    pub fn mapping_mut(&mut self, path: &[&str]) -> Result<&mut Mapping> {
        let err = self.missing(path);
        self.node_mut(path)?.as_mapping_mut().ok_or(err)
    }

    pub fn sequence_mut(&mut self, path: &[&str]) -> Result<&mut Sequence> {
        let err = self.missing(path);
        self.node_mut(path)?.as_sequence_mut().ok_or(err)
    }

    /// Overwrite (or add) `key` inside the mapping at `parent`.
    pub fn set(&mut self, parent: &[&str], key: &str, value: impl Into<Value>) -> Result<()> {
        self.mapping_mut(parent)?
            .insert(Value::String(key.to_string()), value.into());
        Ok(())
    }

    /// Append to the sequence at `path`.
    pub fn push(&mut self, path: &[&str], value: Value) -> Result<()> {
        self.sequence_mut(path)?.push(value);
        Ok(())
    }

    /// Mutable access to the first mapping in the sequence at `path`.
    pub fn first_entry_mut(&mut self, path: &[&str]) -> Result<&mut Mapping> {
        let err = EgressError::missing(self.kind.file_name(), format!("{}[0]", path.join(".")));
        self.sequence_mut(path)?
            .first_mut()
            .and_then(Value::as_mapping_mut)
            .ok_or(err)
    }
}
