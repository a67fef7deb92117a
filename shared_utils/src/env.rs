use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading process environment variables.
#[derive(Debug, Error)]
pub enum EnvError {
    /// A variable required by the application is not set.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// The variable is set but its value is not valid unicode.
    #[error("Environment variable {0} is not valid unicode")]
    NotUnicode(String),
}

/// Reads an environment variable, returning a structured error if it's missing.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, EnvError> {
    match std::env::var(name) {
        Ok(v) => Ok(v),
        Err(std::env::VarError::NotPresent) => Err(EnvError::MissingEnvVar(name.to_string())),
        Err(std::env::VarError::NotUnicode(_)) => Err(EnvError::NotUnicode(name.to_string())),
    }
}

/// Reads an optional path-valued variable.
///
/// Unset and blank values both yield `Ok(None)`; a non-unicode value is an error.
pub fn get_env_path(name: &str) -> Result<Option<PathBuf>, EnvError> {
    match get_env_var(name) {
        Ok(v) if v.trim().is_empty() => Ok(None),
        Ok(v) => Ok(Some(PathBuf::from(v.trim()))),
        Err(EnvError::MissingEnvVar(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_var_is_structured_error() {
        let err = get_env_var("SHARED_UTILS_TEST_SURELY_UNSET_VAR").unwrap_err();
        assert!(matches!(err, EnvError::MissingEnvVar(ref n) if n == "SHARED_UTILS_TEST_SURELY_UNSET_VAR"));
        assert_eq!(
            err.to_string(),
            "Missing environment variable: SHARED_UTILS_TEST_SURELY_UNSET_VAR"
        );
    }

    #[test]
    fn missing_path_var_is_none() {
        let got = get_env_path("SHARED_UTILS_TEST_SURELY_UNSET_PATH").unwrap();
        assert!(got.is_none());
    }
}
