//! # 外部工具定位
//!
//! 查找 ffmpeg / ffprobe 可执行文件。
//!
//! ## 查找顺序
//! 1. 显式指定的路径（`--ffmpeg` / `MTSCONV_FFMPEG`）
//! 2. 与当前可执行文件同目录
//! 3. 同目录下的 `ffmpeg/` 子目录
//! 4. `PATH`（使用 `which`）
//!
//! ## 依赖关系
//! - 被 `transcode/ffmpeg.rs` 和 `commands/check.rs` 使用

use crate::error::{MtsConvError, Result};

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// 定位到的 ffmpeg 工具对
#[derive(Debug, Clone)]
pub struct Toolchain {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl Toolchain {
    /// 按查找顺序定位两个工具
    pub fn locate(ffmpeg: Option<&Path>, ffprobe: Option<&Path>) -> Result<Self> {
        Ok(Self {
            ffmpeg: find_executable("ffmpeg", ffmpeg)?,
            ffprobe: find_executable("ffprobe", ffprobe)?,
        })
    }

    /// 两个工具都能以 `-version` 正常运行
    pub fn check_available(&self) -> bool {
        runs_ok(&self.ffmpeg) && runs_ok(&self.ffprobe)
    }
}

/// 查找单个可执行文件
pub fn find_executable(name: &str, explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(MtsConvError::CommandNotFound {
            command: path.display().to_string(),
        });
    }

    if let Some(base) = bundle_dir() {
        if let Some(path) = find_in_bundle(&base, name) {
            tracing::debug!(tool = name, path = %path.display(), "using bundled executable");
            return Ok(path);
        }
    }

    which::which(name).map_err(|_| MtsConvError::CommandNotFound {
        command: name.to_string(),
    })
}

/// 在打包目录及其 `ffmpeg/` 子目录中查找
fn find_in_bundle(base: &Path, name: &str) -> Option<PathBuf> {
    let exe_name = format!("{}{}", name, std::env::consts::EXE_SUFFIX);
    [base.join(&exe_name), base.join("ffmpeg").join(&exe_name)]
        .into_iter()
        .find(|p| p.is_file())
}

fn bundle_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

fn runs_ok(program: &Path) -> bool {
    Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
