use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::pipeline::{PipelineRun, TaskOutput};
use crate::schema::ExtractedInfo;

/// 可持久化的运行记录值
///
/// 封闭的值集合；不在其中的类型通过 [`RecordValue::text`] 转为字符串。
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<RecordValue>),
    Mapping(BTreeMap<String, RecordValue>),
    /// 命名记录，序列化时只保留字段
    Record {
        name: String,
        fields: BTreeMap<String, RecordValue>,
    },
}

impl RecordValue {
    pub fn text(value: impl Display) -> Self {
        RecordValue::String(value.to_string())
    }

    pub fn record<I, K>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, RecordValue)>,
        K: Into<String>,
    {
        RecordValue::Record {
            name: name.into(),
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// 顶层字段名（仅对 Mapping / Record 有意义）
    pub fn keys(&self) -> Vec<&str> {
        match self {
            RecordValue::Mapping(fields) | RecordValue::Record { fields, .. } => {
                fields.keys().map(String::as_str).collect()
            }
            _ => Vec::new(),
        }
    }
}

impl Serialize for RecordValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RecordValue::Null => serializer.serialize_unit(),
            RecordValue::Bool(b) => serializer.serialize_bool(*b),
            RecordValue::Integer(i) => serializer.serialize_i64(*i),
            RecordValue::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            RecordValue::Float(f) => serializer.serialize_str(&f.to_string()),
            RecordValue::String(s) => serializer.serialize_str(s),
            RecordValue::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            RecordValue::Mapping(fields) | RecordValue::Record { fields, .. } => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

/// 转换为 [`RecordValue`]
pub trait ToRecord {
    fn to_record(&self) -> RecordValue;
}

impl ToRecord for RecordValue {
    fn to_record(&self) -> RecordValue {
        self.clone()
    }
}

impl ToRecord for bool {
    fn to_record(&self) -> RecordValue {
        RecordValue::Bool(*self)
    }
}

macro_rules! integer_records {
    ($($t:ty),*) => {
        $(impl ToRecord for $t {
            fn to_record(&self) -> RecordValue {
                RecordValue::Integer(i64::from(*self))
            }
        })*
    };
}

integer_records!(i8, i16, i32, i64, u8, u16, u32);

impl ToRecord for u64 {
    fn to_record(&self) -> RecordValue {
        i64::try_from(*self)
            .map(RecordValue::Integer)
            .unwrap_or_else(|_| RecordValue::text(self))
    }
}

impl ToRecord for usize {
    fn to_record(&self) -> RecordValue {
        (*self as u64).to_record()
    }
}

impl ToRecord for f32 {
    fn to_record(&self) -> RecordValue {
        RecordValue::Float(f64::from(*self))
    }
}

impl ToRecord for f64 {
    fn to_record(&self) -> RecordValue {
        RecordValue::Float(*self)
    }
}

impl ToRecord for str {
    fn to_record(&self) -> RecordValue {
        RecordValue::String(self.to_string())
    }
}

impl ToRecord for String {
    fn to_record(&self) -> RecordValue {
        RecordValue::String(self.clone())
    }
}

impl ToRecord for std::path::Path {
    fn to_record(&self) -> RecordValue {
        RecordValue::text(self.display())
    }
}

impl ToRecord for std::path::PathBuf {
    fn to_record(&self) -> RecordValue {
        self.as_path().to_record()
    }
}

impl<T: ToRecord + ?Sized> ToRecord for &T {
    fn to_record(&self) -> RecordValue {
        (**self).to_record()
    }
}

impl<T: ToRecord> ToRecord for Option<T> {
    fn to_record(&self) -> RecordValue {
        match self {
            Some(value) => value.to_record(),
            None => RecordValue::Null,
        }
    }
}

impl<T: ToRecord> ToRecord for [T] {
    fn to_record(&self) -> RecordValue {
        RecordValue::Sequence(self.iter().map(ToRecord::to_record).collect())
    }
}

impl<T: ToRecord> ToRecord for Vec<T> {
    fn to_record(&self) -> RecordValue {
        self.as_slice().to_record()
    }
}

impl<T: ToRecord> ToRecord for BTreeMap<String, T> {
    fn to_record(&self) -> RecordValue {
        RecordValue::Mapping(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_record()))
                .collect(),
        )
    }
}

impl<T: ToRecord> ToRecord for HashMap<String, T> {
    fn to_record(&self) -> RecordValue {
        RecordValue::Mapping(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_record()))
                .collect(),
        )
    }
}

impl ToRecord for Value {
    fn to_record(&self) -> RecordValue {
        match self {
            Value::Null => RecordValue::Null,
            Value::Bool(b) => RecordValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => RecordValue::Integer(i),
                None => n
                    .as_f64()
                    .map(RecordValue::Float)
                    .unwrap_or_else(|| RecordValue::text(n)),
            },
            Value::String(s) => RecordValue::String(s.clone()),
            Value::Array(items) => RecordValue::Sequence(items.iter().map(ToRecord::to_record).collect()),
            Value::Object(map) => RecordValue::Mapping(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_record()))
                    .collect(),
            ),
        }
    }
}

impl ToRecord for ExtractedInfo {
    fn to_record(&self) -> RecordValue {
        RecordValue::record(
            "ExtractedInfo",
            [
                ("main_concepts", self.main_concepts.to_record()),
                ("supporting_details", self.supporting_details.to_record()),
                ("technical_terms", self.technical_terms.to_record()),
                ("relationships", self.relationships.to_record()),
                ("facts", self.facts.to_record()),
            ],
        )
    }
}

impl ToRecord for TaskOutput {
    fn to_record(&self) -> RecordValue {
        RecordValue::record(
            "TaskOutput",
            [
                ("task", self.task.to_record()),
                ("agent_role", self.agent_role.to_record()),
                ("raw", self.raw.to_record()),
                ("structured", self.structured.to_record()),
                ("schema", self.schema.to_record()),
                ("output_file", self.output_file.to_record()),
            ],
        )
    }
}

impl ToRecord for PipelineRun {
    fn to_record(&self) -> RecordValue {
        let outputs = self.outputs();
        RecordValue::record(
            "PipelineRun",
            [
                ("tasks", outputs.to_record()),
                (
                    "final_output",
                    self.final_output().map(|output| output.raw.as_str()).to_record(),
                ),
            ],
        )
    }
}
