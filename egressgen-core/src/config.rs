use crate::easyname::{easyname, is_safe_file_stem};
use crate::error::{EgressError, Result};
use figment::{Figment, providers::{Env, Format, Yaml}};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::warn;

/// Egress gateway used when the config does not name one.
pub const DEFAULT_ISTIO_GATEWAY: &str = "istio-egressgateway.istio-system.svc.cluster.local";

/// Top-level generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EgressConfig {
    /// Hostname of the mesh egress gateway all sites are routed through.
    #[serde(default = "default_istio_gateway", deserialize_with = "gateway_or_default")]
    pub istio_gateway: String,
    pub sites: Vec<Site>,
}

/// One external site allowed out through the egress gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Site {
    /// Hostname or wildcard pattern, e.g. `*.example.com`.
    pub site: String,
    #[serde(default)]
    pub ports: Option<Vec<Port>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Port {
    pub port: u16,
    /// Protocol name as Istio spells it (`HTTP`, `TLS`, ...). Case-sensitive.
    pub proto: String,
}

fn default_istio_gateway() -> String { DEFAULT_ISTIO_GATEWAY.into() }

/// `istio_gateway:` with no value is a YAML null; treat it like an absent key.
fn gateway_or_default<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_istio_gateway))
}

// ── Impls ─────────────────────────────────────────────────────

impl Port {
    pub fn new(port: u16, proto: &str) -> Self {
        Self { port, proto: proto.to_string() }
    }

    pub fn is_tls(&self) -> bool {
        self.proto == "TLS"
    }
}

impl Site {
    pub fn new(site: &str) -> Self {
        Self { site: site.to_string(), ports: None }
    }

    pub fn with_ports(site: &str, ports: Vec<Port>) -> Self {
        Self { site: site.to_string(), ports: Some(ports) }
    }

    /// Port list every manifest for this site is derived from.
    ///
    /// Absent or empty → HTTP on 80 and TLS on 443.
    pub fn resolved_ports(&self) -> Vec<Port> {
        match &self.ports {
            Some(ports) if !ports.is_empty() => ports.clone(),
            _ => vec![Port::new(80, "HTTP"), Port::new(443, "TLS")],
        }
    }

    pub fn easyname(&self) -> String {
        easyname(&self.site)
    }
}

impl EgressConfig {
    /// Load configuration from a YAML file + `EGRESSGEN_` env overrides.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(EgressError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        Self::extract(
            Figment::new()
                .merge(Yaml::file(path))
                .merge(Env::prefixed("EGRESSGEN_")),
        )
    }

    /// Parse configuration from an in-memory YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Self::extract(Figment::new().merge(Yaml::string(yaml)))
    }

    fn extract(figment: Figment) -> Result<Self> {
        let mut config: EgressConfig = figment
            .extract()
            .map_err(|e| EgressError::Config(e.to_string()))?;
        if config.istio_gateway.trim().is_empty() {
            config.istio_gateway = default_istio_gateway();
        }
        Ok(config)
    }

    /// Reject configs that would yield broken or conflicting manifests.
    ///
    /// Two sites sharing an easyname only warn: they write the same output
    /// file and the later one wins.
    pub fn validate(&self) -> Result<()> {
        let mut seen_names: HashMap<String, &str> = HashMap::new();

        for (index, site) in self.sites.iter().enumerate() {
            if site.site.trim().is_empty() {
                return Err(EgressError::EmptySiteName { index });
            }

            let name = site.easyname();
            if !is_safe_file_stem(&name) {
                return Err(EgressError::UnsafeOutputName {
                    site: site.site.clone(),
                    easyname: name,
                });
            }

            let mut seen_ports = HashSet::new();
            for port in site.resolved_ports() {
                if port.proto.trim().is_empty() {
                    return Err(EgressError::EmptyProtocol {
                        site: site.site.clone(),
                        port: port.port,
                    });
                }
                if !seen_ports.insert(port.port) {
                    return Err(EgressError::DuplicatePort {
                        site: site.site.clone(),
                        port: port.port,
                    });
                }
            }

            if let Some(previous) = seen_names.insert(name.clone(), &site.site) {
                warn!(
                    site = %site.site,
                    previous = %previous,
                    easyname = %name,
                    "Sites share an easyname, later site overwrites the output file"
                );
            }
        }
        Ok(())
    }
}
