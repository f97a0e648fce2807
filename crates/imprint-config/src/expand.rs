//! Environment variable expansion for configuration strings.

use std::borrow::Cow;
use std::convert::Infallible;

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a config string.
///
/// An unset variable without a default is an error naming the config
/// field; strings without references pass through unchanged.
///
/// # Errors
///
/// Returns [`ConfigError::EnvVar`] when a referenced variable is unset
/// and no default is given.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    let mut missing: Option<String> = None;

    let context = |name: &str| -> Result<Option<Cow<'static, str>>, Infallible> {
        // "${VAR:-default}" arrives as the single name "VAR:-default"
        let (var, default) = match name.split_once(":-") {
            Some((var, default)) => (var, Some(default)),
            None => (name, None),
        };

        match std::env::var(var) {
            Ok(val) => Ok(Some(Cow::Owned(val))),
            Err(_) => match default {
                Some(default) => Ok(Some(Cow::Owned(default.to_owned()))),
                None => {
                    missing = Some(var.to_owned());
                    // Substitute empty so expansion completes; the missing
                    // marker turns the whole call into an error below
                    Ok(Some(Cow::Borrowed("")))
                }
            },
        }
    };

    let expanded = shellexpand::env_with_context(value, context)
        .map(Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: e.to_string(),
        })?;

    if let Some(var) = missing {
        return Err(ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{var}}} not set"),
        });
    }

    Ok(expanded)
}
