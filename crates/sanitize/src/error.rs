#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid sanitizer configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Failures surfaced to the caller of the pipeline. Per-element problems never
/// end up here; they degrade the element instead.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("no sanitizers registered")]
    NoSanitizers,
    #[error(transparent)]
    Config(#[from] ConfigError),
}
