use super::ResolvedSite;
use crate::error::Result;
use crate::tree::TemplateTree;
use serde::Serialize;
use serde_yaml::Value;

#[derive(Debug, Serialize)]
struct ServicePort<'a> {
    number: u16,
    name: String,
    protocol: &'a str,
}

/// Registers the external host with the mesh; one port entry per site port,
/// named `<proto lowercased>-<number>`.
pub fn build(mut tree: TemplateTree, site: &ResolvedSite) -> Result<Value> {
    tree.set(&["metadata"], "name", site.easyname.as_str())?;
    tree.push(&["spec", "hosts"], Value::String(site.host.clone()))?;

    for port in &site.ports {
        let entry = ServicePort {
            number: port.port,
            name: format!("{}-{}", port.proto.to_lowercase(), port.port),
            protocol: &port.proto,
        };
        tree.push(&["spec", "ports"], serde_yaml::to_value(entry)?)?;
    }
    Ok(tree.into_value())
}
