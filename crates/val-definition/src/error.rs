use val_kernel::ValError;

/// Errors from loading rule documents or building definitions.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    #[error("failed to read file: {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid toml at {path}: {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Check(#[from] ValError),
}
