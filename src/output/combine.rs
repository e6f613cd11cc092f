use std::path::{Path, PathBuf};

use crate::error::{Result, StudyFlowError};

/// 合并文档中各部分之间的分隔符
pub const SECTION_SEPARATOR: &str = "\n\n---\n\n";

/// 合并结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombineReport {
    /// 写入合并文档的文件，按顺序
    pub included: Vec<PathBuf>,
    /// 不存在而被跳过的文件
    pub missing: Vec<PathBuf>,
    /// 实际写入的目标文件；没有任何内容时为 `None`
    pub written: Option<PathBuf>,
}

/// 按顺序合并 markdown 文件
///
/// 缺失的文件记录警告后跳过，空文件直接忽略；至少有一段内容时才写入目标文件。
pub fn combine_markdown_files<P: AsRef<Path>>(
    paths: &[P],
    destination: impl AsRef<Path>,
) -> Result<CombineReport> {
    let destination = destination.as_ref();
    let mut report = CombineReport::default();
    let mut sections = Vec::new();

    for path in paths {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let trimmed = content.trim();
                if trimmed.is_empty() {
                    tracing::debug!(path = %path.display(), "skipping empty artifact");
                    continue;
                }
                sections.push(trimmed.to_string());
                report.included.push(path.to_path_buf());
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "artifact not found, skipping");
                report.missing.push(path.to_path_buf());
            }
            Err(source) => {
                return Err(StudyFlowError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    if sections.is_empty() {
        tracing::warn!(destination = %destination.display(), "no artifacts to combine");
        return Ok(report);
    }

    let io_error = |source| StudyFlowError::Io {
        path: destination.to_path_buf(),
        source,
    };
    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(destination, sections.join(SECTION_SEPARATOR)).map_err(io_error)?;
    tracing::info!(
        destination = %destination.display(),
        sections = sections.len(),
        "combined document written"
    );
    report.written = Some(destination.to_path_buf());
    Ok(report)
}
