// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  egressgen: Istio egress manifest generator
//
//  Input:   YAML list of external sites
//  Output:  DestinationRule + Gateway + ServiceEntry + VirtualService
//           per site, one multi-document file each
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use anyhow::Context;
use clap::Parser;
use egressgen_core::config::EgressConfig;
use egressgen_core::manifest::ManifestGenerator;
use egressgen_core::output::{DEFAULT_OUTPUT_DIR, ManifestWriter};
use egressgen_core::template::{BuiltinTemplates, TemplateDir, TemplateSource};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "egressgen",
    version,
    about = "Generate Istio egress manifests for a list of external sites"
)]
struct Cli {
    /// YAML file listing the sites to allow through the egress gateway
    config: PathBuf,

    /// Read templates from this directory instead of the builtin set
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Directory the per-site manifests are written to
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ── Tracing ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with_target(false)
        .init();

    // ── Config ──
    info!(path = %cli.config.display(), "Loading config file");
    let config = EgressConfig::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    info!(
        sites = config.sites.len(),
        gateway = %config.istio_gateway,
        "Config loaded"
    );

    // ── Templates ──
    let templates: Box<dyn TemplateSource> = match &cli.templates {
        Some(dir) => {
            info!(dir = %dir.display(), "Using template directory");
            Box::new(TemplateDir::new(dir))
        }
        None => Box::new(BuiltinTemplates),
    };

    // ── Generate ──
    let generator = ManifestGenerator::new(templates, config.istio_gateway.clone());
    let writer = ManifestWriter::new(&cli.output_dir);
    egressgen_core::render_all(&config, &generator, &writer)
        .context("manifest generation aborted")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_is_the_only_required_argument() {
        let cli = Cli::try_parse_from(["egressgen", "sites.yaml"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("sites.yaml"));
        assert!(cli.templates.is_none());
        assert_eq!(cli.output_dir, PathBuf::from("output_manifests"));
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn missing_config_path_is_rejected() {
        assert!(Cli::try_parse_from(["egressgen"]).is_err());
    }

    #[test]
    fn optional_flags_are_parsed() {
        let cli = Cli::try_parse_from([
            "egressgen",
            "sites.yaml",
            "--templates",
            "tpl",
            "--output-dir",
            "out",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.templates, Some(PathBuf::from("tpl")));
        assert_eq!(cli.output_dir, PathBuf::from("out"));
        assert_eq!(cli.log_level, "debug");
    }
}
