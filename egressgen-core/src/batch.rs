use crate::config::EgressConfig;
use crate::error::Result;
use crate::manifest::ManifestGenerator;
use crate::output::ManifestWriter;
use crate::template::TemplateSource;
use std::path::PathBuf;
use tracing::info;

/// One site that made it to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSite {
    pub site: String,
    pub path: PathBuf,
}

/// Validate `config`, then generate and write every site in input order.
///
/// Stops at the first failure; files already written for earlier sites
/// are left in place.
pub fn render_all<T: TemplateSource>(
    config: &EgressConfig,
    generator: &ManifestGenerator<T>,
    writer: &ManifestWriter,
) -> Result<Vec<RenderedSite>> {
    config.validate()?;

    let mut rendered = Vec::with_capacity(config.sites.len());
    for site in &config.sites {
        let target = writer.path_for(&site.easyname());
        info!(
            site = %site.site,
            file = %target.display(),
            "Processing {} to {}",
            site.site,
            target.display()
        );

        let manifests = generator.generate(site)?;
        let path = writer.write(&manifests)?;
        rendered.push(RenderedSite {
            site: site.site.clone(),
            path,
        });
    }

    info!(
        sites = rendered.len(),
        dir = %writer.dir().display(),
        gateway = %generator.gateway_host(),
        "Manifests generated"
    );
    Ok(rendered)
}
