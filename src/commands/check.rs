//! # check 命令实现
//!
//! 报告 ffmpeg / ffprobe 的定位结果以及能否运行。
//!
//! ## 依赖关系
//! - 使用 `cli/check.rs` 定义的参数
//! - 使用 `transcode/tools.rs`, `utils/output.rs`

use crate::cli::check::CheckArgs;
use crate::error::Result;
use crate::transcode::tools::Toolchain;
use crate::utils::output;

/// 执行 check 命令
pub fn execute(args: CheckArgs) -> Result<bool> {
    output::print_header("Checking conversion tools");

    let tools = Toolchain::locate(args.tools.ffmpeg.as_deref(), args.tools.ffprobe.as_deref())?;
    output::print_info(&format!("ffmpeg:  {}", tools.ffmpeg.display()));
    output::print_info(&format!("ffprobe: {}", tools.ffprobe.display()));

    if tools.check_available() {
        output::print_success("ffmpeg and ffprobe are available");
        Ok(true)
    } else {
        output::print_error("ffmpeg or ffprobe was found but failed to run");
        Ok(false)
    }
}
