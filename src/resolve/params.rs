//! Interpolation parameter parsing.

use serde_json::Value;

use super::normalize::normalize_relaxed_json;
use crate::error::TranslateError;
use crate::types::{
    InterpolationParams,
    ParamsInput,
};

/// Turns binding parameters into an interpolation map.
///
/// Unlike defaults, relaxed parameter text that does not parse to an object
/// is an authoring error and is returned as such.
///
/// # Returns
/// - `Ok(None)`: no parameters (absent or empty text)
/// - `Ok(Some(map))`: parsed parameters
/// - `Err(TranslateError)`: text that is not an object literal
pub fn parse_params(
    input: Option<&ParamsInput>,
) -> Result<Option<InterpolationParams>, TranslateError> {
    match input {
        None => Ok(None),
        Some(ParamsInput::Map(map)) => Ok(Some(map.clone())),
        Some(ParamsInput::Relaxed(text)) if text.is_empty() => Ok(None),
        Some(ParamsInput::Relaxed(text)) => {
            let value: Value = serde_json::from_str(&normalize_relaxed_json(text)).map_err(
                |source| TranslateError::MalformedParameterSyntax { input: text.clone(), source },
            )?;
            match value {
                Value::Object(map) => Ok(Some(map)),
                _ => Err(TranslateError::ParameterNotObject { input: text.clone() }),
            }
        }
    }
}
