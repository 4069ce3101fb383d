//! CLI `--set KEY=VALUE` overrides

use record_compose::{Record, Value};

use super::ConfigError;

/// Parse one `KEY=VALUE` pair.
pub fn parse_override(pair: &str) -> Result<(String, Value), ConfigError> {
    let (key, raw) = pair.split_once('=').ok_or_else(|| {
        ConfigError::ValidationError(format!("override `{}` is not KEY=VALUE", pair))
    })?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "override `{}` has an empty key",
            pair
        )));
    }

    Ok((key.to_string(), parse_value(raw)))
}

/// Read a command-line value: `true`/`false`, then a finite number, else text.
pub fn parse_value(raw: &str) -> Value {
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Number(n),
            _ => Value::Text(raw.to_string()),
        },
    }
}

/// Parse all pairs into an overrides record. Later pairs win.
pub fn parse_overrides(pairs: &[String]) -> Result<Record, ConfigError> {
    let mut record = Record::new();
    for pair in pairs {
        let (key, value) = parse_override(pair)?;
        record.set(key, value);
    }
    Ok(record)
}
