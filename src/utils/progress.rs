//! # 进度条工具
//!
//! 封装 `indicatif`，把批处理引擎的进度事件渲染为进度条。
//!
//! ## 依赖关系
//! - 被 `commands/convert.rs` 使用
//! - 使用 `indicatif` crate

use crate::batch::{ConversionOutcome, ProgressEvent};
use crate::utils::output;

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}";

/// 创建批处理进度条
pub fn create_batch_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::with_template(BAR_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    // 单个文件可能转码很久，保持 spinner 转动
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// 把一个进度事件渲染到进度条
pub fn render_event(pb: &ProgressBar, event: &ProgressEvent) {
    match event {
        ProgressEvent::Started { index, total, path } => {
            pb.set_message(format!(
                "Converting {}/{}: {}",
                index,
                total,
                output::file_name(path)
            ));
        }
        ProgressEvent::Completed {
            index,
            total,
            path,
            outcome,
        } => {
            pb.suspend(|| match outcome {
                ConversionOutcome::Success { output: target, .. } => {
                    output::print_converted(*index, *total, path, target)
                }
                ConversionOutcome::Failure { message, .. } => {
                    output::print_failed(*index, *total, path, message)
                }
            });
            pb.inc(1);
        }
    }
}
