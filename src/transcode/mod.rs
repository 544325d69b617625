//! # 转码模块
//!
//! 单文件转换协作者：批处理引擎只依赖这里的 `Converter` trait，
//! 具体实现 `FfmpegConverter` 调用外部 ffmpeg / ffprobe。
//!
//! ## 功能
//! - 叠加层位置与样式配置 (`ConversionConfig`)
//! - 类型化的单文件失败 (`ConversionError` / `FailureKind`)
//! - ffmpeg / ffprobe 可执行文件定位
//! - 录制时间提取
//!
//! ## 依赖关系
//! - 被 `batch/engine.rs` 通过 trait 调用
//! - 被 `commands/` 构造
//! - 子模块: ffmpeg, probe, tools

pub mod ffmpeg;
pub mod probe;
pub mod tools;

pub use ffmpeg::FfmpegConverter;

use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 默认叠加层边距（像素）
pub const DEFAULT_MARGIN: u32 = 20;

/// 时间戳叠加层位置
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OverlayPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

impl OverlayPosition {
    /// drawtext 的 `x=..:y=..` 坐标表达式
    pub fn coordinates(&self, margin: u32) -> String {
        match self {
            OverlayPosition::TopLeft => format!("x={margin}:y={margin}"),
            OverlayPosition::TopRight => format!("x=w-tw-{margin}:y={margin}"),
            OverlayPosition::BottomLeft => format!("x={margin}:y=h-th-{margin}"),
            OverlayPosition::BottomRight => format!("x=w-tw-{margin}:y=h-th-{margin}"),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            OverlayPosition::TopLeft => "top-left",
            OverlayPosition::TopRight => "top-right",
            OverlayPosition::BottomLeft => "bottom-left",
            OverlayPosition::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for OverlayPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 单文件转换配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionConfig {
    pub position: OverlayPosition,
    pub margin: u32,
    pub font_size: u32,
    pub font_color: String,
    pub border_width: u32,
    pub border_color: String,
    /// x264 preset
    pub preset: String,
    pub crf: u8,
    pub audio_bitrate: String,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        ConversionConfig {
            position: OverlayPosition::default(),
            margin: DEFAULT_MARGIN,
            font_size: 24,
            font_color: "white".to_string(),
            border_width: 2,
            border_color: "black".to_string(),
            preset: "medium".to_string(),
            crf: 23,
            audio_bitrate: "192k".to_string(),
        }
    }
}

/// 失败分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// 输入文件在解析之后消失
    InputMissing,
    /// 无法获得录制时间
    MetadataUnavailable,
    /// 外部进程无法启动
    ProcessLaunch,
    /// 外部进程非零退出
    NonZeroExit,
    /// 输出无法写入
    OutputWrite,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::InputMissing => "input missing",
            FailureKind::MetadataUnavailable => "metadata unavailable",
            FailureKind::ProcessLaunch => "process launch failed",
            FailureKind::NonZeroExit => "non-zero exit",
            FailureKind::OutputWrite => "output write failed",
        };
        f.write_str(s)
    }
}

/// 单文件转换错误
///
/// `Display` 给出原始诊断信息（用于日志），`user_message()` 给出面向用户的说明。
#[derive(Error, Debug, Clone)]
pub enum ConversionError {
    #[error("input file vanished: {path}")]
    InputMissing { path: PathBuf },

    #[error("no recording time for {path}: {reason}")]
    MetadataUnavailable { path: PathBuf, reason: String },

    #[error("failed to launch '{program}': {reason}")]
    ProcessLaunch { program: String, reason: String },

    #[error("'{program}' exited with {code:?}\n{stderr}")]
    NonZeroExit {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("cannot write {path}: {reason}")]
    OutputWrite { path: PathBuf, reason: String },
}

impl ConversionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ConversionError::InputMissing { .. } => FailureKind::InputMissing,
            ConversionError::MetadataUnavailable { .. } => FailureKind::MetadataUnavailable,
            ConversionError::ProcessLaunch { .. } => FailureKind::ProcessLaunch,
            ConversionError::NonZeroExit { .. } => FailureKind::NonZeroExit,
            ConversionError::OutputWrite { .. } => FailureKind::OutputWrite,
        }
    }

    /// 面向用户的错误说明，不包含外部进程的原始输出
    pub fn user_message(&self) -> String {
        match self {
            ConversionError::InputMissing { .. } => {
                "Input file no longer exists".to_string()
            }
            ConversionError::MetadataUnavailable { .. } => {
                "Could not determine the recording time".to_string()
            }
            ConversionError::ProcessLaunch { program, .. } => {
                format!("Could not start {}", program)
            }
            ConversionError::NonZeroExit { program, code, .. } => match code {
                Some(code) => format!("{} failed with exit code {}", program, code),
                None => format!("{} was terminated by a signal", program),
            },
            ConversionError::OutputWrite { path, .. } => {
                format!("Could not write output file {}", path.display())
            }
        }
    }
}

/// 单文件转换协作者
pub trait Converter: Send + Sync {
    /// 阻塞地把 `input` 转换为 `output`，不可中途取消
    fn convert(
        &self,
        input: &Path,
        output: &Path,
        config: &ConversionConfig,
    ) -> std::result::Result<(), ConversionError>;
}
