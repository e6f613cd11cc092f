use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::schema::{Schema, SchemaKind};

/// 内建结构化输出 schema 的注册名
pub const EXTRACTED_INFO_SCHEMA: &str = "extracted_info";

/// 抽取任务返回的结构化信息
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ExtractedInfo {
    pub main_concepts: Vec<String>,
    pub supporting_details: BTreeMap<String, Vec<String>>,
    pub technical_terms: BTreeMap<String, String>,
    pub relationships: Vec<String>,
    pub facts: Vec<String>,
}

impl ExtractedInfo {
    pub const FIELDS: [&'static str; 5] = [
        "main_concepts",
        "supporting_details",
        "technical_terms",
        "relationships",
        "facts",
    ];

    pub fn schema() -> Schema {
        let properties = [
            (
                "main_concepts",
                Schema::array_of(Schema::string())
                    .with_description("List of key concepts from the document"),
            ),
            (
                "supporting_details",
                Schema::map_of(Schema::array_of(Schema::string()))
                    .with_description("Mapping of concepts to their supporting details"),
            ),
            (
                "technical_terms",
                Schema::map_of(Schema::string())
                    .with_description("Mapping of technical terms to their definitions"),
            ),
            (
                "relationships",
                Schema::array_of(Schema::string())
                    .with_description("List of relationships between concepts"),
            ),
            (
                "facts",
                Schema::array_of(Schema::string())
                    .with_description("List of important facts from the document"),
            ),
        ]
        .into_iter()
        .map(|(name, schema)| (name.to_string(), schema))
        .collect();

        Schema::new(SchemaKind::Object {
            properties,
            required: Self::FIELDS.iter().map(|f| f.to_string()).collect(),
            additional: true,
        })
        .with_name(EXTRACTED_INFO_SCHEMA)
        .with_description("Structure for storing extracted information from documents")
    }
}
