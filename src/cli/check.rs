//! # check 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/check.rs`

use super::ToolArgs;
use clap::Args;

/// check 子命令参数
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub tools: ToolArgs,
}
