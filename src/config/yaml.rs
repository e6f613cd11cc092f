use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{Result, StudyFlowError};

pub fn read_config(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| StudyFlowError::ConfigFile {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_yaml<T: DeserializeOwned>(origin: &str, contents: &str) -> Result<T> {
    serde_yaml::from_str(contents).map_err(|source| StudyFlowError::ConfigParse {
        origin: origin.to_string(),
        source,
    })
}

pub fn from_yaml_value<T: DeserializeOwned>(origin: &str, value: serde_yaml::Value) -> Result<T> {
    serde_yaml::from_value(value).map_err(|source| StudyFlowError::ConfigParse {
        origin: origin.to_string(),
        source,
    })
}

/// 把 YAML 键转换成字符串；数字和布尔键按字面量处理
pub fn key_to_string(key: &serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
