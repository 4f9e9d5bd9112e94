//! Template loading for INCLUDE lines

use cloud_support_common::{CloudSupportError, Result};
use std::collections::HashMap;
use tera::{Tera, Value};

pub const INCLUDE_TEMPLATE: &str = "include.md";

/// Load the INCLUDE line template
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();

    tera.register_filter("include_file", include_file_filter);

    tera.add_raw_template(INCLUDE_TEMPLATE, include_str!("../templates/include.md.tera"))
        .map_err(|e| {
            CloudSupportError::Annotation(format!("Failed to load include template: {}", e))
        })?;

    Ok(tera)
}

/// Map a serialized status to the name of its include file
fn include_file_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let status = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("include_file filter expects a string"))?;

    let file = match status {
        "AllClouds" => "all-clouds",
        "GlobalAndUSGov" => "global-us",
        "GlobalAndChina" => "global-china",
        "GlobalOnly" => "global-only",
        other => {
            return Err(tera::Error::msg(format!(
                "Invalid cloud support status: {}",
                other
            )))
        }
    };

    Ok(Value::String(file.to_string()))
}
