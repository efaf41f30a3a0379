use std::env;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// 日志配置
pub struct LoggingConfig;

impl LoggingConfig {
    /// 初始化日志系统
    ///
    /// 支持通过环境变量配置：
    /// - RUST_LOG: 设置日志级别（error, warn, info, debug, trace）
    /// - REFINEFLOW_DEBUG: 启用详细调试输出
    pub fn init() {
        let is_debug = env::var("REFINEFLOW_DEBUG").is_ok();

        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => {
                if is_debug {
                    EnvFilter::new("refineflow=debug,info")
                } else {
                    EnvFilter::new("refineflow=info,warn")
                }
            }
        };

        let fmt_layer = if is_debug {
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
        } else {
            fmt::layer()
                .with_target(false)
                .with_file(false)
                .with_line_number(false)
                .with_thread_ids(false)
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();
    }

    /// 初始化日志系统（带自定义过滤器）
    pub fn init_with_filter(filter: &str) {
        let env_filter = EnvFilter::new(filter);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer())
            .init();
    }

    /// 检查是否启用调试模式
    pub fn is_debug() -> bool {
        env::var("REFINEFLOW_DEBUG").is_ok()
    }
}
