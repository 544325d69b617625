//! # convert 子命令 CLI 定义
//!
//! 批量转换 MTS 文件为 MP4，叠加录制时间。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/convert.rs`

use super::ToolArgs;
use crate::transcode::{ConversionConfig, OverlayPosition, DEFAULT_MARGIN};

use clap::Args;
use std::path::PathBuf;

/// convert 子命令参数
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input .MTS file(s), directories or glob patterns.
    /// `INPUT OUTPUT.mp4` converts a single file to an explicit output path.
    #[arg(required = true, num_args = 1..)]
    pub inputs: Vec<String>,

    /// Output directory for converted files (default: next to each input)
    #[arg(short, long, env = "MTSCONV_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Corner for the timestamp overlay
    #[arg(short, long, value_enum, env = "MTSCONV_POSITION", default_value_t = OverlayPosition::default())]
    pub position: OverlayPosition,

    /// Font size of the timestamp text
    #[arg(long, default_value_t = 24)]
    pub font_size: u32,

    /// Distance of the timestamp from the frame edges, in pixels
    #[arg(long, default_value_t = DEFAULT_MARGIN)]
    pub margin: u32,

    /// Recognized input extension (repeatable, default: mts, m2ts)
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Continue with the remaining files when one fails (default)
    #[arg(long, default_value_t = false, conflicts_with = "stop_on_error")]
    pub continue_on_error: bool,

    /// Stop after the first failed file
    #[arg(long, default_value_t = false)]
    pub stop_on_error: bool,

    /// Write a per-file CSV report
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    #[command(flatten)]
    pub tools: ToolArgs,
}

impl ConvertArgs {
    /// 由参数构建转换配置
    pub fn conversion_config(&self) -> ConversionConfig {
        ConversionConfig {
            position: self.position,
            margin: self.margin,
            font_size: self.font_size,
            ..ConversionConfig::default()
        }
    }

    /// 旧式调用 `INPUT OUTPUT.mp4`：返回 (输入, 输出)
    pub fn explicit_output(&self) -> Option<(PathBuf, PathBuf)> {
        match self.inputs.as_slice() {
            [input, output] if output.to_lowercase().ends_with(".mp4") => {
                Some((PathBuf::from(input), PathBuf::from(output)))
            }
            _ => None,
        }
    }
}
