use serde_json::Value;

use crate::error::{Result, StudyFlowError};
use crate::schema::validate_value;

use super::task::OutputSchema;

const JSON_CODE_BLOCK_START: &str = "```json";
const CODE_BLOCK_START: &str = "```";
const CODE_BLOCK_END: &str = "```";

/// 清理响应内容，提取 JSON（处理代码块包裹的情况）
pub fn clean_response(response: &str) -> &str {
    let start_marker = if response.contains(JSON_CODE_BLOCK_START) {
        JSON_CODE_BLOCK_START
    } else if response.contains(CODE_BLOCK_START) {
        CODE_BLOCK_START
    } else {
        return response.trim();
    };

    if let Some(start) = response.find(start_marker) {
        let body_start = start + start_marker.len();
        if let Some(end) = response[body_start..].find(CODE_BLOCK_END) {
            return response[body_start..body_start + end].trim();
        }
    }
    response.trim()
}

fn parse_json(text: &str) -> std::result::Result<Value, serde_json::Error> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(err) => {
            // 模型有时在 JSON 前后附带说明文字
            match (text.find('{'), text.rfind('}')) {
                (Some(start), Some(end)) if start < end => serde_json::from_str(&text[start..=end]),
                _ => Err(err),
            }
        }
    }
}

/// 将模型回答解析为符合 schema 的 JSON 值
pub fn parse_structured(task: &str, response: &str, schema: &OutputSchema) -> Result<Value> {
    let cleaned = clean_response(response);
    let value = parse_json(cleaned).map_err(|e| StudyFlowError::StructuredOutput {
        task: task.to_string(),
        message: format!("response is not valid JSON: {}", e),
    })?;

    validate_value(&schema.schema, &value, &mut Vec::new()).map_err(|e| {
        StudyFlowError::StructuredOutput {
            task: task.to_string(),
            message: format!("response does not match schema `{}`: {}", schema.name, e),
        }
    })?;

    Ok(schema.schema.project(value))
}
