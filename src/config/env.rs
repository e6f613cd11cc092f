use crate::error::{Result, StudyFlowError};
use anyhow::anyhow;
use std::env;

/// 环境变量配置管理
pub struct EnvConfig;

impl EnvConfig {
    /// 解析凭据引用
    ///
    /// - `${VAR_NAME}`：读取环境变量，未设置时报错
    /// - 其他值：原样返回
    pub fn resolve(value: &str) -> Result<String> {
        match value.strip_prefix("${").and_then(|rest| rest.strip_suffix('}')) {
            Some(var) => Self::get_env(var),
            None => Ok(value.to_string()),
        }
    }

    /// 从环境变量获取值
    pub fn get_env(key: &str) -> Result<String> {
        env::var(key).map_err(|_| {
            StudyFlowError::Other(anyhow!(
                "environment variable '{}' is not set",
                key
            ))
        })
    }

    /// 获取可选的环境变量（空字符串视为未设置）
    pub fn get_env_optional(key: &str) -> Option<String> {
        env::var(key).ok().filter(|value| !value.is_empty())
    }

    pub fn is_debug_mode() -> bool {
        env::var("STUDYFLOW_DEBUG").is_ok()
    }
}
