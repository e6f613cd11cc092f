use std::collections::HashMap;
use super::schema::Schema;
use super::error::SchemaError;
use super::extracted::{ExtractedInfo, EXTRACTED_INFO_SCHEMA};

/// Schema 注册表
#[derive(Default, Clone)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Schema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self {
            schemas: HashMap::new(),
        }
    }

    /// 预置内建 schema（目前只有 `extracted_info`）
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(EXTRACTED_INFO_SCHEMA, ExtractedInfo::schema());
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, schema: Schema) {
        self.schemas.insert(name.into(), schema);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn get(&self, name: &str) -> std::result::Result<&Schema, SchemaError> {
        self.schemas
            .get(name)
            .ok_or_else(|| SchemaError::NotRegistered(name.to_string()))
    }

    pub fn validate(&self, name: &str, value: &serde_json::Value) -> std::result::Result<(), SchemaError> {
        let schema = self.get(name)?;
        super::validation::validate_value(schema, value, &mut Vec::new())
    }
}
