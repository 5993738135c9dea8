use super::ResolvedSite;
use crate::error::Result;
use crate::tree::TemplateTree;
use serde::Serialize;
use serde_yaml::Value;

#[derive(Debug, Serialize)]
struct Server<'a> {
    port: ServerPort<'a>,
    hosts: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tls: Option<ServerTls>,
}

#[derive(Debug, Serialize)]
struct ServerPort<'a> {
    number: u16,
    name: String,
    protocol: &'a str,
}

#[derive(Debug, Serialize)]
struct ServerTls {
    mode: &'static str,
}

/// `<easyname>-gateway` with one server per port, in port order.
///
/// TLS servers pass traffic through untouched. Repeated port numbers are not
/// merged.
pub fn build(mut tree: TemplateTree, site: &ResolvedSite) -> Result<Value> {
    tree.set(&["metadata"], "name", site.gateway_name())?;

    for port in &site.ports {
        let server = Server {
            port: ServerPort {
                number: port.port,
                name: format!("{}-{}", site.easyname, port.port),
                protocol: &port.proto,
            },
            hosts: vec![site.host.as_str()],
            tls: port.is_tls().then_some(ServerTls { mode: "PASSTHROUGH" }),
        };
        tree.push(&["spec", "servers"], serde_yaml::to_value(server)?)?;
    }
    Ok(tree.into_value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Port, Site};
    use crate::template::{BuiltinTemplates, TemplateKind, TemplateSource};

    fn builtin() -> TemplateTree {
        let kind = TemplateKind::Gateway;
        TemplateTree::new(kind, BuiltinTemplates.load(kind).unwrap())
    }

    #[test]
    fn tls_server_is_passthrough() {
        let site = Site::with_ports("*.foo.com", vec![Port::new(443, "TLS")]);
        let doc = build(builtin(), &ResolvedSite::new(&site, "gw")).unwrap();

        assert_eq!(doc["metadata"]["name"].as_str(), Some("foo-com-gateway"));
        let servers = doc["spec"]["servers"].as_sequence().unwrap();
        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0]["tls"]["mode"].as_str(), Some("PASSTHROUGH"));
        assert_eq!(servers[0]["hosts"][0].as_str(), Some("*.foo.com"));
        assert_eq!(servers[0]["port"]["name"].as_str(), Some("foo-com-443"));
        assert_eq!(servers[0]["port"]["number"].as_u64(), Some(443));
        assert_eq!(servers[0]["port"]["protocol"].as_str(), Some("TLS"));
    }

    #[test]
    fn non_tls_server_has_no_tls_block() {
        let site = Site::with_ports("a.com", vec![Port::new(8080, "HTTP2")]);
        let doc = build(builtin(), &ResolvedSite::new(&site, "gw")).unwrap();
        let server = &doc["spec"]["servers"][0];
        assert!(server.get("tls").is_none());
        assert_eq!(server["port"]["protocol"].as_str(), Some("HTTP2"));
    }

    #[test]
    fn duplicate_ports_are_not_merged() {
        let site = Site::with_ports("a.com", vec![Port::new(443, "TLS"), Port::new(443, "HTTPS")]);
        let doc = build(builtin(), &ResolvedSite::new(&site, "gw")).unwrap();
        assert_eq!(doc["spec"]["servers"].as_sequence().unwrap().len(), 2);
    }

    #[test]
    fn template_selector_is_preserved() {
        let doc = build(builtin(), &ResolvedSite::new(&Site::new("a.com"), "gw")).unwrap();
        assert_eq!(doc["spec"]["selector"]["istio"].as_str(), Some("egressgateway"));
        assert_eq!(doc["spec"]["servers"].as_sequence().unwrap().len(), 2);
    }
}
