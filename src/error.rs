// error.rs - Crate error type
//
// Only config loading reports errors to callers. Surface failures are
// swallowed by the renderer and only logged.

pub type BackdropResult<T> = Result<T, BackdropError>;

#[derive(thiserror::Error, Debug)]
pub enum BackdropError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("surface unavailable: {0}")]
    Surface(String),
}

impl BackdropError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            BackdropError::invalid_config("x")
                .to_string()
                .starts_with("invalid config:")
        );
        assert!(
            BackdropError::surface("no 2d context")
                .to_string()
                .contains("no 2d context")
        );
    }

    #[test]
    fn json_errors_convert() {
        let err: BackdropError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(err.to_string().starts_with("config parse error:"));
    }
}
