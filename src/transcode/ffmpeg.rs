//! # ffmpeg 转换器
//!
//! 把单个 MTS 文件转码为 MP4，并叠加随播放推进的录制时间戳
//! （精确到分钟）。
//!
//! ## 依赖关系
//! - 实现 `transcode::Converter`
//! - 使用 `transcode/probe.rs` 获取录制时间
//! - 使用 `transcode/tools.rs` 定位的可执行文件

use super::probe;
use super::tools::Toolchain;
use super::{ConversionConfig, ConversionError, Converter};

use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};

/// 诊断信息保留的 stderr 尾部行数
const STDERR_TAIL_LINES: usize = 10;

/// 基于外部 ffmpeg 进程的转换器
pub struct FfmpegConverter {
    tools: Toolchain,
}

impl FfmpegConverter {
    pub fn new(tools: Toolchain) -> Self {
        Self { tools }
    }
}

impl Converter for FfmpegConverter {
    fn convert(
        &self,
        input: &Path,
        output: &Path,
        config: &ConversionConfig,
    ) -> Result<(), ConversionError> {
        if !input.is_file() {
            return Err(ConversionError::InputMissing {
                path: input.to_path_buf(),
            });
        }

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ConversionError::OutputWrite {
                path: output.to_path_buf(),
                reason: e.to_string(),
            })?;
        }

        let started_at = probe::recording_time(&self.tools.ffprobe, input)?;
        tracing::debug!(path = %input.display(), started_at, "recording time");

        let filter = drawtext_filter(started_at, config);
        let program = self.tools.ffmpeg.display().to_string();

        let result = Command::new(&self.tools.ffmpeg)
            .arg("-i")
            .arg(input)
            .args(["-vf", filter.as_str()])
            .args(["-c:v", "libx264", "-preset", config.preset.as_str()])
            .arg("-crf")
            .arg(config.crf.to_string())
            .args(["-c:a", "aac", "-b:a", config.audio_bitrate.as_str()])
            .args(["-movflags", "+faststart", "-y"])
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| ConversionError::ProcessLaunch {
                program: program.clone(),
                reason: e.to_string(),
            })?;

        if !result.status.success() {
            return Err(ConversionError::NonZeroExit {
                program,
                code: result.status.code(),
                stderr: stderr_tail(&result.stderr),
            });
        }

        if !output.is_file() {
            return Err(ConversionError::OutputWrite {
                path: output.to_path_buf(),
                reason: "ffmpeg reported success but produced no file".to_string(),
            });
        }

        Ok(())
    }
}

/// 构建 drawtext 滤镜
///
/// 时间戳以 `started_at` 为起点，随 pts 推进，格式 `%Y-%m-%d %H:%M`。
pub fn drawtext_filter(started_at: i64, config: &ConversionConfig) -> String {
    format!(
        r"drawtext=text='%{{pts\:localtime\:{}\:%Y-%m-%d %H\\\:%M}}':fontsize={}:fontcolor={}:borderw={}:bordercolor={}:{}",
        started_at,
        config.font_size,
        config.font_color,
        config.border_width,
        config.border_color,
        config.position.coordinates(config.margin),
    )
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcode::{FailureKind, OverlayPosition};
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_drawtext_filter() {
        let config = ConversionConfig {
            position: OverlayPosition::TopLeft,
            ..ConversionConfig::default()
        };
        let filter = drawtext_filter(1_709_634_030, &config);
        assert_eq!(
            filter,
            r"drawtext=text='%{pts\:localtime\:1709634030\:%Y-%m-%d %H\\\:%M}':fontsize=24:fontcolor=white:borderw=2:bordercolor=black:x=20:y=20"
        );
    }

    #[test]
    fn test_stderr_tail_keeps_last_lines() {
        let raw: String = (0..15).map(|i| format!("line {}\n\n", i)).collect();
        let tail = stderr_tail(raw.as_bytes());
        assert_eq!(tail.lines().count(), STDERR_TAIL_LINES);
        assert!(tail.starts_with("line 5"));
        assert!(tail.ends_with("line 14"));
    }

    #[test]
    fn test_missing_input_fails_before_launch() {
        let dir = TempDir::new().unwrap();
        let converter = FfmpegConverter::new(Toolchain {
            ffmpeg: PathBuf::from("/nonexistent/ffmpeg"),
            ffprobe: PathBuf::from("/nonexistent/ffprobe"),
        });
        let err = converter
            .convert(
                &dir.path().join("gone.mts"),
                &dir.path().join("gone.mp4"),
                &ConversionConfig::default(),
            )
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::InputMissing);
    }

    #[test]
    fn test_unlaunchable_ffmpeg_is_process_launch() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("clip.mts");
        fs::write(&input, b"not really video").unwrap();
        let converter = FfmpegConverter::new(Toolchain {
            ffmpeg: dir.path().join("no-ffmpeg"),
            ffprobe: dir.path().join("no-ffprobe"),
        });
        let err = converter
            .convert(
                &input,
                &dir.path().join("out").join("clip.mp4"),
                &ConversionConfig::default(),
            )
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::ProcessLaunch);
        assert!(dir.path().join("out").is_dir());
    }
}
