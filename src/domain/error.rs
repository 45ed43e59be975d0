use thiserror::Error;

/// Errors raised while loading tables, physics settings or save snapshots.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown collision group `{0}`")]
    UnknownGroup(String),

    #[error("the `none` group cannot appear in collision tables")]
    NoneGroup,

    #[error("bounce coefficient {value} for {a}/{b} is outside 0..=1")]
    InvalidCoefficient { a: String, b: String, value: f32 },

    #[error("`{field}` must be positive, got {value}")]
    InvalidValue { field: &'static str, value: f32 },
}
