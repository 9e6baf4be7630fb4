pub mod discovery;
pub mod synthesize;
pub mod template;

pub use discovery::{DetectedFunction, HandlerDiscovery, TemplateFileDiscovery};
pub use synthesize::{relative_function_handler, synthesize_template, SynthesisRequest};
pub use template::{FunctionProperties, SamTemplate, TemplateResource, SERVERLESS_FUNCTION_TYPE};

#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("handler discovery failed: {0}")]
    Discovery(String),
    #[error("failed to create descriptor directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode descriptor {path}: {source}")]
    Encode {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to write descriptor {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read descriptor {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid descriptor yaml in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}
