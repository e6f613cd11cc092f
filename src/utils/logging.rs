use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::EnvConfig;

const DEFAULT_FILTER: &str = "studyflow=info,warn";
const DEBUG_FILTER: &str = "studyflow=debug,info";

/// 日志配置
pub struct LoggingConfig;

impl LoggingConfig {
    /// 初始化日志系统
    ///
    /// 支持通过环境变量配置：
    /// - RUST_LOG: 设置日志级别（error, warn, info, debug, trace）
    /// - STUDYFLOW_DEBUG: 启用详细调试输出（文件、行号、target）
    ///
    /// 重复初始化会被忽略。
    ///
    /// ```no_run
    /// use studyflow::utils::LoggingConfig;
    ///
    /// LoggingConfig::init();
    /// tracing::info!("ready");
    /// ```
    pub fn init() {
        if Self::try_init().is_err() {
            tracing::debug!("global subscriber already installed");
        }
    }

    /// 初始化日志系统，已有全局 subscriber 时返回错误
    pub fn try_init() -> Result<(), tracing_subscriber::util::TryInitError> {
        let is_debug = Self::is_debug();
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(Self::default_filter(is_debug)));

        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(is_debug)
            .with_file(is_debug)
            .with_line_number(is_debug);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;

        if is_debug {
            tracing::debug!("调试模式已启用");
        }
        Ok(())
    }

    /// 未设置 RUST_LOG 时使用的过滤器
    pub fn default_filter(is_debug: bool) -> &'static str {
        if is_debug {
            DEBUG_FILTER
        } else {
            DEFAULT_FILTER
        }
    }

    /// 检查是否启用调试模式
    pub fn is_debug() -> bool {
        EnvConfig::is_debug_mode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_follows_debug_flag() {
        assert_eq!(LoggingConfig::default_filter(false), "studyflow=info,warn");
        assert_eq!(LoggingConfig::default_filter(true), "studyflow=debug,info");
    }

    #[test]
    fn repeated_init_does_not_panic() {
        LoggingConfig::init();
        LoggingConfig::init();
    }
}
