use super::ResolvedSite;
use crate::error::Result;
use crate::tree::TemplateTree;
use serde::Serialize;
use serde_yaml::Value;

/// Mesh-internal traffic source in Istio route matches.
const MESH_GATEWAY: &str = "mesh";

#[derive(Debug, Serialize)]
struct RouteRule<'a> {
    #[serde(rename = "match")]
    matches: Vec<RouteMatch<'a>>,
    route: Vec<RouteTarget<'a>>,
}

#[derive(Debug, Serialize)]
struct RouteMatch<'a> {
    gateways: Vec<&'a str>,
    port: u16,
    #[serde(rename = "sniHosts", skip_serializing_if = "Option::is_none")]
    sni_hosts: Option<Vec<&'a str>>,
}

#[derive(Debug, Serialize)]
struct RouteTarget<'a> {
    destination: Destination<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    weight: Option<u32>,
}

#[derive(Debug, Serialize)]
struct Destination<'a> {
    host: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    subset: Option<&'a str>,
    port: PortSelector,
}

#[derive(Debug, Serialize)]
struct PortSelector {
    number: u16,
}

/// `direct-<easyname>`: sends mesh traffic for the site to the egress
/// gateway, and traffic arriving at the site's gateway out to the real host.
///
/// Each port contributes a mesh rule and a gateway rule. TLS ports land in
/// `tls` with an SNI match, everything else in `http`. Empty lists are left
/// off the output.
pub fn build(mut tree: TemplateTree, site: &ResolvedSite) -> Result<Value> {
    let gateway_name = site.gateway_name();

    tree.set(&["metadata"], "name", format!("direct-{}", site.easyname))?;
    tree.set(
        &["spec"],
        "hosts",
        Value::Sequence(vec![Value::String(site.host.clone())]),
    )?;
    tree.push(&["spec", "gateways"], Value::String(gateway_name.clone()))?;

    let mut http = Vec::new();
    let mut tls = Vec::new();

    for port in &site.ports {
        let sni_hosts = port.is_tls().then(|| vec![site.host.as_str()]);

        let via_egress = RouteRule {
            matches: vec![RouteMatch {
                gateways: vec![MESH_GATEWAY],
                port: port.port,
                sni_hosts: sni_hosts.clone(),
            }],
            route: vec![RouteTarget {
                destination: Destination {
                    host: site.gateway_host.as_str(),
                    subset: Some(site.easyname.as_str()),
                    port: PortSelector { number: port.port },
                },
                weight: Some(100),
            }],
        };
        let to_site = RouteRule {
            matches: vec![RouteMatch {
                gateways: vec![gateway_name.as_str()],
                port: port.port,
                sni_hosts,
            }],
            route: vec![RouteTarget {
                destination: Destination {
                    host: site.host.as_str(),
                    subset: None,
                    port: PortSelector { number: port.port },
                },
                weight: None,
            }],
        };

        let bucket = if port.is_tls() { &mut tls } else { &mut http };
        bucket.push(serde_yaml::to_value(via_egress)?);
        bucket.push(serde_yaml::to_value(to_site)?);
    }

    if !http.is_empty() {
        tree.set(&["spec"], "http", Value::Sequence(http))?;
    }
    if !tls.is_empty() {
        tree.set(&["spec"], "tls", Value::Sequence(tls))?;
    }
    Ok(tree.into_value())
}
