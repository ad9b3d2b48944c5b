//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// A bare `$` (as in `$HOME` or `$5`) is kept literally, and so is a `${`
/// without a closing brace. `field` names the configuration key for error
/// messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let mut expanded = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let end = start + len + 1;
        expanded.push_str(&rest[..start]);
        expanded.push_str(&expand_reference(&rest[start..end], field)?);
        rest = &rest[end..];
    }
    expanded.push_str(rest);
    Ok(expanded)
}

/// Expand a single `${...}` reference.
fn expand_reference(reference: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env(reference)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}
