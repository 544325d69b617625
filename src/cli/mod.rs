//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `convert`: 批量转换 MTS -> MP4（带录制时间叠加）
//! - `check`: 检查 ffmpeg / ffprobe 是否可用
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: convert, check

pub mod check;
pub mod convert;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// mtsconv - MTS 批量转换工具
#[derive(Parser)]
#[command(name = "mtsconv")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Batch-convert MTS videos to MP4 with a recording-time overlay", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Convert MTS files, directories or glob patterns to MP4
    Convert(convert::ConvertArgs),

    /// Check that ffmpeg and ffprobe can be found and run
    Check(check::CheckArgs),
}

/// 外部工具路径（两个子命令共用）
#[derive(Args, Debug, Clone, Default)]
pub struct ToolArgs {
    /// Path to the ffmpeg executable
    #[arg(long, env = "MTSCONV_FFMPEG")]
    pub ffmpeg: Option<PathBuf>,

    /// Path to the ffprobe executable
    #[arg(long, env = "MTSCONV_FFPROBE")]
    pub ffprobe: Option<PathBuf>,
}
