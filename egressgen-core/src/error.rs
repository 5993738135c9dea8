use thiserror::Error;

/// Unified error type for egressgen.
#[derive(Error, Debug)]
pub enum EgressError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Site #{index} has an empty hostname")]
    EmptySiteName { index: usize },

    #[error("Site {site} declares port {port} more than once")]
    DuplicatePort { site: String, port: u16 },

    #[error("Site {site} declares port {port} without a protocol")]
    EmptyProtocol { site: String, port: u16 },

    #[error("Site {site} maps to {easyname:?}, which is not a usable output file name")]
    UnsafeOutputName { site: String, easyname: String },

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Template {name} is malformed: {reason}")]
    TemplateParse { name: String, reason: String },

    #[error("Template {template} is missing field {path}")]
    MissingField { template: String, path: String },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EgressError {
    pub(crate) fn missing(template: &str, path: impl Into<String>) -> Self {
        EgressError::MissingField {
            template: template.to_string(),
            path: path.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EgressError>;
