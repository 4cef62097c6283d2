use thiserror::Error;

/// Errors raised at the serialization boundary.
///
/// Tree operations themselves never fail; malformed-but-parseable input is normalized
/// instead of rejected.
#[derive(Debug, Error)]
pub enum MenuTreeError {
    /// Server payload or submission could not be (de)serialized.
    #[error("menu json: {0}")]
    Json(#[from] serde_json::Error),
    /// Editor configuration could not be parsed.
    #[error("menu tree config: {0}")]
    Config(#[source] serde_json::Error),
    /// A string id is neither numeric nor in the temporary `tmp-<n>` form.
    #[error("invalid menu item id `{0}`")]
    InvalidId(String),
}

pub type Result<T, E = MenuTreeError> = std::result::Result<T, E>;
