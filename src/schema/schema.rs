use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Schema 类型枚举
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum SchemaKind {
    #[serde(rename = "null")]
    Null,
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "integer")]
    Integer,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "string")]
    String,
    #[serde(rename = "array")]
    Array { items: Box<Schema> },
    /// 键为任意字符串、值统一符合 `values` 的映射
    #[serde(rename = "map")]
    Map { values: Box<Schema> },
    #[serde(rename = "object")]
    Object {
        properties: BTreeMap<String, Schema>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        required: Vec<String>,
        #[serde(default = "Schema::allow_additional")]
        additional: bool,
    },
    #[serde(rename = "any")]
    Any,
}

/// Schema 定义
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Schema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub kind: SchemaKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Schema {
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            name: None,
            kind,
            description: None,
        }
    }

    pub fn string() -> Self {
        Self::new(SchemaKind::String)
    }

    pub fn array_of(items: Schema) -> Self {
        Self::new(SchemaKind::Array {
            items: Box::new(items),
        })
    }

    pub fn map_of(values: Schema) -> Self {
        Self::new(SchemaKind::Map {
            values: Box::new(values),
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// 以缩进 JSON 形式描述该 Schema，用于写入 prompt
    pub fn to_prompt_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| format!("{:?}", self.kind))
    }

    /// 生成一个满足该 Schema 的最小占位值
    pub fn placeholder(&self) -> serde_json::Value {
        use serde_json::Value;
        match &self.kind {
            SchemaKind::Null | SchemaKind::Any => Value::Null,
            SchemaKind::Boolean => Value::Bool(false),
            SchemaKind::Integer | SchemaKind::Number => Value::from(0),
            SchemaKind::String => Value::String(String::new()),
            SchemaKind::Array { .. } => Value::Array(Vec::new()),
            SchemaKind::Map { .. } => Value::Object(serde_json::Map::new()),
            SchemaKind::Object { properties, .. } => Value::Object(
                properties
                    .iter()
                    .map(|(key, schema)| (key.clone(), schema.placeholder()))
                    .collect(),
            ),
        }
    }

    /// 只保留 schema 声明过的对象字段，其余键丢弃
    pub fn project(&self, value: serde_json::Value) -> serde_json::Value {
        use serde_json::Value;
        match (&self.kind, value) {
            (SchemaKind::Object { properties, .. }, Value::Object(mut map)) => Value::Object(
                properties
                    .iter()
                    .filter_map(|(key, schema)| {
                        map.remove(key).map(|field| (key.clone(), schema.project(field)))
                    })
                    .collect(),
            ),
            (SchemaKind::Array { items }, Value::Array(values)) => {
                Value::Array(values.into_iter().map(|v| items.project(v)).collect())
            }
            (SchemaKind::Map { values }, Value::Object(map)) => Value::Object(
                map.into_iter()
                    .map(|(key, v)| (key, values.project(v)))
                    .collect(),
            ),
            (_, other) => other,
        }
    }

    fn allow_additional() -> bool {
        true
    }
}
