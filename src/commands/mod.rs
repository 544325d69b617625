//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `batch/`, `transcode/`, `utils/`
//! - 子模块: convert, check

pub mod check;
pub mod convert;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
///
/// 返回 `Ok(false)` 表示命令本身完成但有文件失败（退出码 1）。
pub fn run(cmd: Commands) -> Result<bool> {
    match cmd {
        Commands::Convert(args) => convert::execute(args),
        Commands::Check(args) => check::execute(args),
    }
}
