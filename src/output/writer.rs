use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{Result, StudyFlowError};
use crate::pipeline::PipelineRun;
use crate::schema::{ExtractedInfo, EXTRACTED_INFO_SCHEMA};

use super::record::{RecordValue, ToRecord};

const JSON_INDENT: &[u8] = b"    ";

/// 以 4 空格缩进序列化记录
pub fn to_pretty_json(record: &RecordValue) -> Result<String> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(JSON_INDENT));
    record
        .serialize(&mut serializer)
        .map_err(|e| StudyFlowError::Serialization(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| StudyFlowError::Serialization(e.to_string()))
}

/// 写入 JSON 记录文件，自动创建父目录
pub fn write_record(path: impl AsRef<Path>, record: &RecordValue) -> Result<()> {
    let path = path.as_ref();
    let json = to_pretty_json(record)?;
    let io_error = |source| StudyFlowError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(path, json).map_err(io_error)?;
    tracing::info!(path = %path.display(), "run record written");
    Ok(())
}

/// 选择要持久化的运行记录
///
/// 优先使用最后一个结构化任务的结果；没有结构化结果时退回整个运行。
/// Extracted-Info 结果先解析为 [`ExtractedInfo`] 再写出。
pub fn run_record(run: &PipelineRun) -> Result<RecordValue> {
    let Some(output) = run.last_structured() else {
        return Ok(run.to_record());
    };
    if output.schema.as_deref() == Some(EXTRACTED_INFO_SCHEMA) {
        if let Some(info) = run.structured_as::<ExtractedInfo>(&output.task)? {
            return Ok(info.to_record());
        }
    }
    Ok(output.structured.to_record())
}
