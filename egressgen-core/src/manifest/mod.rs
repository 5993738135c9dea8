//! Per-site manifest derivation.
//!
//! Each site yields four documents cross-referencing one another by name:
//! the Gateway is `<easyname>-gateway` and is listed in the VirtualService's
//! gateways; the DestinationRule subset is `<easyname>` and is the subset
//! the VirtualService's mesh routes point at.

pub mod destination_rule;
pub mod gateway;
pub mod service_entry;
pub mod virtual_service;

use crate::config::{Port, Site};
use crate::error::Result;
use crate::template::{BuiltinTemplates, TemplateKind, TemplateSource};
use crate::tree::TemplateTree;
use serde_yaml::Value;
use tracing::debug;

/// Everything the builders need about one site, computed once.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSite {
    pub host: String,
    pub easyname: String,
    pub ports: Vec<Port>,
    pub gateway_host: String,
}

impl ResolvedSite {
    pub fn new(site: &Site, gateway_host: &str) -> Self {
        Self {
            host: site.site.clone(),
            easyname: site.easyname(),
            ports: site.resolved_ports(),
            gateway_host: gateway_host.to_string(),
        }
    }

    pub fn gateway_name(&self) -> String {
        format!("{}-gateway", self.easyname)
    }
}

/// The four documents generated for one site.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifests {
    pub easyname: String,
    pub destination_rule: Value,
    pub gateway: Value,
    pub service_entry: Value,
    pub virtual_service: Value,
}

impl Manifests {
    /// Documents in output order.
    pub fn documents(&self) -> [&Value; 4] {
        [
            &self.destination_rule,
            &self.gateway,
            &self.service_entry,
            &self.virtual_service,
        ]
    }

    /// Render as a multi-document YAML stream.
    pub fn to_yaml_stream(&self) -> Result<String> {
        let mut out = String::new();
        for (i, doc) in self.documents().into_iter().enumerate() {
            if i > 0 {
                out.push_str("---\n");
            }
            out.push_str(&serde_yaml::to_string(doc)?);
        }
        Ok(out)
    }
}

/// Derives manifests for sites routed through one egress gateway.
pub struct ManifestGenerator<T> {
    templates: T,
    gateway_host: String,
}

impl<T: TemplateSource> ManifestGenerator<T> {
    pub fn new(templates: T, gateway_host: impl Into<String>) -> Self {
        Self {
            templates,
            gateway_host: gateway_host.into(),
        }
    }

    pub fn gateway_host(&self) -> &str {
        &self.gateway_host
    }

    pub fn generate(&self, site: &Site) -> Result<Manifests> {
        let resolved = ResolvedSite::new(site, &self.gateway_host);
        debug!(
            site = %resolved.host,
            easyname = %resolved.easyname,
            ports = resolved.ports.len(),
            "Generating manifests"
        );

        Ok(Manifests {
            destination_rule: destination_rule::build(
                self.tree(TemplateKind::DestinationRule)?,
                &resolved,
            )?,
            gateway: gateway::build(self.tree(TemplateKind::Gateway)?, &resolved)?,
            service_entry: service_entry::build(self.tree(TemplateKind::ServiceEntry)?, &resolved)?,
            virtual_service: virtual_service::build(
                self.tree(TemplateKind::VirtualService)?,
                &resolved,
            )?,
            easyname: resolved.easyname,
        })
    }

    fn tree(&self, kind: TemplateKind) -> Result<TemplateTree> {
        Ok(TemplateTree::new(kind, self.templates.load(kind)?))
    }
}

/// Generate one site's manifests from the builtin templates.
pub fn generate(site: &Site, gateway_host: &str) -> Result<Manifests> {
    ManifestGenerator::new(BuiltinTemplates, gateway_host).generate(site)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_site_applies_defaults_once() {
        let resolved = ResolvedSite::new(&Site::new("*.foo.com"), "gw.local");
        assert_eq!(resolved.easyname, "foo-com");
        assert_eq!(resolved.gateway_name(), "foo-com-gateway");
        assert_eq!(resolved.ports.len(), 2);
        assert_eq!(resolved.gateway_host, "gw.local");
    }

    #[test]
    fn stream_orders_documents_and_separates_them() {
        let manifests = generate(&Site::new("example.com"), "gw.local").unwrap();
        let stream = manifests.to_yaml_stream().unwrap();

        assert!(!stream.starts_with("---"));
        assert_eq!(stream.matches("---\n").count(), 3);

        let kinds: Vec<&str> = stream
            .lines()
            .filter_map(|l| l.strip_prefix("kind: "))
            .collect();
        assert_eq!(
            kinds,
            vec!["DestinationRule", "Gateway", "ServiceEntry", "VirtualService"]
        );
    }

    #[test]
    fn generator_reports_configured_gateway() {
        let generator = ManifestGenerator::new(BuiltinTemplates, "egress.example");
        assert_eq!(generator.gateway_host(), "egress.example");
    }
}
