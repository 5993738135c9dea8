pub mod batch;
pub mod config;
pub mod easyname;
pub mod error;
pub mod manifest;
pub mod output;
pub mod template;
pub mod tree;

pub use batch::{RenderedSite, render_all};
pub use config::{EgressConfig, Port, Site};
pub use easyname::easyname;
pub use error::{EgressError, Result};
pub use manifest::{ManifestGenerator, Manifests, generate};
pub use output::ManifestWriter;
pub use template::{BuiltinTemplates, TemplateDir, TemplateKind, TemplateSource};
