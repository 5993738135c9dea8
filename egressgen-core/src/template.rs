//! Template documents the manifests are derived from.
//!
//! Every load returns a fresh, owned tree: builders mutate it freely and
//! nothing is cached between sites.

use crate::error::{EgressError, Result};
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The four manifest kinds generated per site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    Gateway,
    DestinationRule,
    ServiceEntry,
    VirtualService,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 4] = [
        TemplateKind::Gateway,
        TemplateKind::DestinationRule,
        TemplateKind::ServiceEntry,
        TemplateKind::VirtualService,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            TemplateKind::Gateway => "gateway.yaml",
            TemplateKind::DestinationRule => "destrule.yaml",
            TemplateKind::ServiceEntry => "service.yaml",
            TemplateKind::VirtualService => "virtual_service.yaml",
        }
    }

    fn builtin_source(self) -> &'static str {
        match self {
            TemplateKind::Gateway => include_str!("../templates/gateway.yaml"),
            TemplateKind::DestinationRule => include_str!("../templates/destrule.yaml"),
            TemplateKind::ServiceEntry => include_str!("../templates/service.yaml"),
            TemplateKind::VirtualService => include_str!("../templates/virtual_service.yaml"),
        }
    }
}

/// Anything that can hand out a template tree by kind.
pub trait TemplateSource {
    fn load(&self, kind: TemplateKind) -> Result<Value>;
}

impl<T: TemplateSource + ?Sized> TemplateSource for Box<T> {
    fn load(&self, kind: TemplateKind) -> Result<Value> {
        (**self).load(kind)
    }
}

/// Templates compiled into the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinTemplates;

impl TemplateSource for BuiltinTemplates {
    fn load(&self, kind: TemplateKind) -> Result<Value> {
        parse(kind, kind.builtin_source())
    }
}

/// Templates read from a directory on every load.
#[derive(Debug, Clone)]
pub struct TemplateDir {
    root: PathBuf,
}

impl TemplateDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TemplateSource for TemplateDir {
    fn load(&self, kind: TemplateKind) -> Result<Value> {
        let path = self.root.join(kind.file_name());
        debug!(path = %path.display(), "Reading template");
        let raw = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                EgressError::TemplateNotFound(path.display().to_string())
            }
            _ => EgressError::Io(e),
        })?;
        parse(kind, &raw)
    }
}

fn parse(kind: TemplateKind, raw: &str) -> Result<Value> {
    let value: Value = serde_yaml::from_str(raw).map_err(|e| EgressError::TemplateParse {
        name: kind.file_name().to_string(),
        reason: e.to_string(),
    })?;
    if !value.is_mapping() {
        return Err(EgressError::TemplateParse {
            name: kind.file_name().to_string(),
            reason: "top-level document is not a mapping".to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_templates_all_parse_as_mappings() {
        for kind in TemplateKind::ALL {
            let doc = BuiltinTemplates.load(kind).unwrap();
            assert!(doc.is_mapping(), "{} should be a mapping", kind.file_name());
            assert!(doc.get("metadata").is_some());
            assert!(doc.get("spec").is_some());
        }
    }

    #[test]
    fn builtin_kinds_match_their_file() {
        let kinds = [
            (TemplateKind::Gateway, "Gateway"),
            (TemplateKind::DestinationRule, "DestinationRule"),
            (TemplateKind::ServiceEntry, "ServiceEntry"),
            (TemplateKind::VirtualService, "VirtualService"),
        ];
        for (kind, expected) in kinds {
            let doc = BuiltinTemplates.load(kind).unwrap();
            assert_eq!(doc["kind"].as_str(), Some(expected));
        }
    }

    #[test]
    fn each_load_returns_a_fresh_tree() {
        let mut first = BuiltinTemplates.load(TemplateKind::Gateway).unwrap();
        first["kind"] = Value::String("Mutated".into());
        let second = BuiltinTemplates.load(TemplateKind::Gateway).unwrap();
        assert_eq!(second["kind"].as_str(), Some("Gateway"));
    }

    #[test]
    fn template_dir_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = TemplateDir::new(dir.path());
        let err = source.load(TemplateKind::ServiceEntry).unwrap_err();
        match err {
            EgressError::TemplateNotFound(path) => assert!(path.ends_with("service.yaml")),
            other => panic!("expected TemplateNotFound, got {other:?}"),
        }
    }

    #[test]
    fn template_dir_rejects_non_mapping() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("gateway.yaml"), "- just\n- a list\n").unwrap();
        let err = TemplateDir::new(dir.path()).load(TemplateKind::Gateway).unwrap_err();
        assert!(matches!(err, EgressError::TemplateParse { .. }));
    }

    #[test]
    fn template_dir_rereads_on_every_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("destrule.yaml");
        let source = TemplateDir::new(dir.path());

        std::fs::write(&path, "metadata:\n  name: one\n").unwrap();
        let first = source.load(TemplateKind::DestinationRule).unwrap();
        std::fs::write(&path, "metadata:\n  name: two\n").unwrap();
        let second = source.load(TemplateKind::DestinationRule).unwrap();

        assert_eq!(first["metadata"]["name"].as_str(), Some("one"));
        assert_eq!(second["metadata"]["name"].as_str(), Some("two"));
    }
}
