//! # convert 命令实现
//!
//! 批量转换 MTS 为 MP4。
//!
//! ## 功能
//! - 解析输入文件/目录/模式
//! - 顺序转换，进度条显示每个文件的结果
//! - `--stop-on-error` 在第一个失败后请求取消
//! - 汇总统计、失败列表、可选 CSV 报告
//!
//! ## 依赖关系
//! - 使用 `cli/convert.rs` 定义的参数
//! - 使用 `batch/`, `transcode/`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::batch::{
    BatchEngine, BatchReport, CancellationFlag, ConversionOutcome, FileResolver, ProgressEvent,
};
use crate::cli::convert::ConvertArgs;
use crate::error::{MtsConvError, Result};
use crate::transcode::tools::Toolchain;
use crate::transcode::FfmpegConverter;
use crate::utils::{output, progress};

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tabled::{Table, Tabled};

/// 失败列表行
#[derive(Debug, Clone, Tabled)]
struct FailureRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

/// 执行 convert 命令
pub fn execute(args: ConvertArgs) -> Result<bool> {
    output::print_header("Converting MTS to MP4");

    let explicit = args.explicit_output();
    if explicit.is_some() && args.output_dir.is_some() {
        return Err(MtsConvError::InvalidArgument(
            "--output-dir cannot be combined with an explicit OUTPUT.mp4".to_string(),
        ));
    }

    // 解析输入
    let files = match &explicit {
        Some((input, _)) => {
            if !input.is_file() {
                return Err(MtsConvError::FileNotFound {
                    path: input.display().to_string(),
                });
            }
            vec![input.clone()]
        }
        None => resolve_inputs(&args)?,
    };

    if files.is_empty() {
        output::print_warning("No MTS files found.");
        return Ok(true);
    }

    output::print_info(&format!("Found {} file(s) to convert", files.len()));

    // 定位外部工具
    let tools = Toolchain::locate(args.tools.ffmpeg.as_deref(), args.tools.ffprobe.as_deref())?;
    if !tools.check_available() {
        return Err(MtsConvError::CommandNotFound {
            command: "ffmpeg/ffprobe".to_string(),
        });
    }
    tracing::debug!(ffmpeg = %tools.ffmpeg.display(), ffprobe = %tools.ffprobe.display(), "tools located");

    if let Some(dir) = &args.output_dir {
        fs::create_dir_all(dir).map_err(|e| MtsConvError::FileWriteError {
            path: dir.display().to_string(),
            source: e,
        })?;
    }

    let engine = BatchEngine::new(
        Arc::new(FfmpegConverter::new(tools)),
        args.conversion_config(),
    )
    .with_output_dir(args.output_dir.clone());

    let pb = progress::create_batch_bar(files.len() as u64);
    let cancel = CancellationFlag::new();
    let stop_on_error = args.stop_on_error;

    let on_progress = |event: &ProgressEvent| {
        progress::render_event(&pb, event);
        if stop_on_error {
            stop_on_failure(&cancel, event);
        }
    };

    let report = match &explicit {
        Some((input, target)) => engine.run_to(input, target, on_progress),
        None => engine.run(&files, on_progress, || cancel.is_cancelled()),
    };

    pb.finish_and_clear();

    print_summary(&report, files.len());

    if let Some(path) = &args.report {
        report.write_csv(path)?;
        output::print_info(&format!("Report written to '{}'", path.display()));
    }

    Ok(report.all_succeeded())
}

/// 第一个失败完成时请求取消，批次在下一个文件边界停止
fn stop_on_failure(cancel: &CancellationFlag, event: &ProgressEvent) {
    if let ProgressEvent::Completed {
        outcome: ConversionOutcome::Failure { .. },
        ..
    } = event
    {
        cancel.cancel();
    }
}

/// 解析输入并打印被排除的文件
fn resolve_inputs(args: &ConvertArgs) -> Result<Vec<PathBuf>> {
    let resolution = FileResolver::new()
        .with_extensions(&args.extensions)
        .resolve(&args.inputs)?;

    for err in &resolution.errors {
        output::print_warning(&format!("Skipping {}", err));
    }

    Ok(resolution.files)
}

/// 打印汇总
fn print_summary(report: &BatchReport, planned: usize) {
    println!();
    output::print_separator();
    output::print_stat("Total", report.total());
    output::print_stat("Successful", report.succeeded());
    output::print_stat("Failed", report.failed());
    output::print_separator();

    let rows = failure_rows(report);
    if !rows.is_empty() {
        println!("\nFailed files:");
        println!("{}", Table::new(&rows));
    }

    if report.cancelled() {
        output::print_warning(&format!(
            "Stopped early: {} of {} file(s) not attempted",
            planned - report.total(),
            planned
        ));
    }

    if report.succeeded() > 0 {
        output::print_done(&format!("Converted {} file(s)", report.succeeded()));
    }
}

/// 失败列表，序号为该文件在批次中的位置
fn failure_rows(report: &BatchReport) -> Vec<FailureRow> {
    report
        .outcomes()
        .iter()
        .enumerate()
        .filter_map(|(i, outcome)| match outcome {
            ConversionOutcome::Failure { input, message, .. } => Some(FailureRow {
                index: i + 1,
                file: output::file_name(input),
                reason: message.clone(),
            }),
            ConversionOutcome::Success { .. } => None,
        })
        .collect()
}
