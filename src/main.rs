//! # mtsconv - MTS 批量转换工具
//!
//! 把摄像机录制的 .MTS 视频批量转码为 .MP4，并在画面角落叠加
//! 随播放推进的录制时间。
//!
//! ## 子命令
//! - `convert` - 批量转换（文件、目录、glob 模式）
//! - `check`   - 检查 ffmpeg / ffprobe
//!
//! ## 依赖关系
//! - 只负责日志初始化、参数解析和退出码
//! - 其余逻辑在库 crate 中，见 `lib.rs`

use clap::Parser;
use mtsconv::cli::Cli;
use mtsconv::{commands, utils};
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    // 诊断日志写到 stderr，RUST_LOG 可覆盖
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mtsconv=warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match commands::run(cli.command) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            utils::output::print_error(&format!("{}", e));
            std::process::exit(1);
        }
    }
}
