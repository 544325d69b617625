//! # 录制时间提取
//!
//! 通过 ffprobe 读取容器/视频流的 `creation_time` 标签，
//! 读取失败时回退到文件修改时间。
//!
//! ## 依赖关系
//! - 被 `transcode/ffmpeg.rs` 调用
//! - 使用 `chrono` 解析时间

use super::ConversionError;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};

/// 以 `Z` 结尾的 UTC 时间格式
const UTC_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.fZ", "%Y-%m-%dT%H:%M:%SZ"];

/// 无时区信息的本地时间格式
const LOCAL_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
];

/// 获取录制时间（Unix 秒）
pub fn recording_time(ffprobe: &Path, input: &Path) -> Result<i64, ConversionError> {
    match probe_creation_time(ffprobe, input) {
        Some(time) => Ok(time.timestamp()),
        None => {
            tracing::debug!(path = %input.display(), "no creation_time tag, using mtime");
            modification_time(input).map(|t| t.timestamp())
        }
    }
}

fn probe_creation_time(ffprobe: &Path, input: &Path) -> Option<DateTime<Local>> {
    let output = Command::new(ffprobe)
        .args([
            "-v",
            "quiet",
            "-select_streams",
            "v:0",
            "-show_entries",
            "format_tags=creation_time:stream_tags=creation_time",
            "-of",
            "csv=p=0",
        ])
        .arg(input)
        .stdin(Stdio::null())
        .output();

    let output = match output {
        Ok(o) => o,
        Err(e) => {
            tracing::warn!(error = %e, "could not run ffprobe");
            return None;
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    let first = stdout.trim().lines().next()?;
    parse_creation_time(first)
}

/// 解析 ffprobe 输出的第一行
pub fn parse_creation_time(line: &str) -> Option<DateTime<Local>> {
    let text = line.trim().trim_matches(',');
    if text.is_empty() {
        return None;
    }

    for fmt in UTC_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(Utc.from_utc_datetime(&naive).with_timezone(&Local));
        }
    }

    for fmt in LOCAL_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Local.from_local_datetime(&naive).earliest();
        }
    }

    None
}

fn modification_time(input: &Path) -> Result<DateTime<Local>, ConversionError> {
    fs::metadata(input)
        .and_then(|m| m.modified())
        .map(DateTime::<Local>::from)
        .map_err(|e| ConversionError::MetadataUnavailable {
            path: input.to_path_buf(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_utc_formats() {
        let t = parse_creation_time("2024-03-05T10:20:30.000000Z").unwrap();
        assert_eq!(t.timestamp(), 1_709_634_030);
        let t = parse_creation_time("2024-03-05T10:20:30Z,").unwrap();
        assert_eq!(t.timestamp(), 1_709_634_030);
    }

    #[test]
    fn test_parse_local_formats() {
        let expected = Local
            .with_ymd_and_hms(2024, 3, 5, 10, 20, 30)
            .earliest()
            .unwrap();
        assert_eq!(parse_creation_time("2024-03-05 10:20:30"), Some(expected));
        assert_eq!(parse_creation_time("2024-03-05T10:20:30"), Some(expected));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_creation_time("").is_none());
        assert!(parse_creation_time(",,").is_none());
        assert!(parse_creation_time("yesterday").is_none());
    }

    #[test]
    fn test_missing_file_is_metadata_unavailable() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone.mts");
        let err = modification_time(&missing).unwrap_err();
        assert_eq!(err.kind(), super::super::FailureKind::MetadataUnavailable);
    }
}
