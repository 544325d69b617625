//! # 批处理引擎
//!
//! 严格顺序地逐个转换文件。
//!
//! ## 功能
//! - 每个文件前检查取消标志，取消只在文件边界生效
//! - 单个文件失败不会中断批次（continue-on-error）
//! - 每个文件发出 `Started` / `Completed` 两个进度事件，严格按输入顺序
//! - 可在后台线程运行，通过 channel 回传进度
//!
//! ## 依赖关系
//! - 被 `commands/convert.rs` 调用
//! - 使用 `batch/planner.rs` 规划输出路径
//! - 通过 `transcode::Converter` trait 调用转换器

use super::planner::OutputPathPlanner;
use super::report::{BatchReport, ConversionOutcome, ProgressEvent};
use crate::transcode::{ConversionConfig, Converter};

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// 协作式取消标志，可跨线程克隆
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// 请求取消；正在进行的文件会先完成
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// 批处理引擎
pub struct BatchEngine {
    converter: Arc<dyn Converter>,
    config: ConversionConfig,
    output_dir: Option<PathBuf>,
}

impl BatchEngine {
    /// 创建新的批处理引擎
    pub fn new(converter: Arc<dyn Converter>, config: ConversionConfig) -> Self {
        Self {
            converter,
            config,
            output_dir: None,
        }
    }

    /// 设置输出目录（为空时输出到输入文件所在目录）
    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    /// 顺序转换 `files`
    ///
    /// `on_progress` 在调用线程上同步调用；`is_cancelled` 在每个文件开始前检查一次。
    pub fn run<P, C>(&self, files: &[PathBuf], on_progress: P, is_cancelled: C) -> BatchReport
    where
        P: FnMut(&ProgressEvent),
        C: Fn() -> bool,
    {
        let mut planner = OutputPathPlanner::new(self.output_dir.clone());
        let jobs = files.iter().map(|f| (f.as_path(), None));
        self.drive(jobs, files.len(), &mut planner, on_progress, is_cancelled)
    }

    /// 把单个文件转换到显式指定的输出路径，不经过规划器
    pub fn run_to<P>(&self, input: &Path, output: &Path, on_progress: P) -> BatchReport
    where
        P: FnMut(&ProgressEvent),
    {
        let mut planner = OutputPathPlanner::new(self.output_dir.clone());
        let jobs = std::iter::once((input, Some(output.to_path_buf())));
        self.drive(jobs, 1, &mut planner, on_progress, || false)
    }

    /// 在后台线程运行批次
    ///
    /// 进度事件经 channel 发回调用方；报告通过 `JoinHandle` 取回。
    pub fn spawn(
        self,
        files: Vec<PathBuf>,
        cancel: CancellationFlag,
    ) -> (Receiver<ProgressEvent>, JoinHandle<BatchReport>) {
        let (tx, rx) = mpsc::channel();
        let handle = thread::spawn(move || {
            self.run(
                &files,
                |event| {
                    // 接收端已关闭时继续转换，只是不再上报
                    let _ = tx.send(event.clone());
                },
                || cancel.is_cancelled(),
            )
        });
        (rx, handle)
    }

    fn drive<'a, I, P, C>(
        &self,
        jobs: I,
        total: usize,
        planner: &mut OutputPathPlanner,
        mut on_progress: P,
        is_cancelled: C,
    ) -> BatchReport
    where
        I: Iterator<Item = (&'a Path, Option<PathBuf>)>,
        P: FnMut(&ProgressEvent),
        C: Fn() -> bool,
    {
        let mut report = BatchReport::default();

        for (i, (input, explicit_output)) in jobs.enumerate() {
            let index = i + 1;

            if is_cancelled() {
                tracing::info!(
                    attempted = i,
                    remaining = total - i,
                    "batch cancelled at file boundary"
                );
                return report.finish(true);
            }

            on_progress(&ProgressEvent::Started {
                index,
                total,
                path: input.to_path_buf(),
            });

            let output = explicit_output.unwrap_or_else(|| planner.plan(input));
            tracing::info!(index, total, input = %input.display(), output = %output.display(), "converting");

            let outcome = match self.converter.convert(input, &output, &self.config) {
                Ok(()) => ConversionOutcome::Success {
                    input: input.to_path_buf(),
                    output,
                },
                Err(e) => {
                    tracing::warn!(index, input = %input.display(), kind = %e.kind(), "conversion failed: {}", e);
                    ConversionOutcome::Failure {
                        input: input.to_path_buf(),
                        kind: e.kind(),
                        message: e.user_message(),
                    }
                }
            };

            report.record(outcome.clone());
            on_progress(&ProgressEvent::Completed {
                index,
                total,
                path: input.to_path_buf(),
                outcome,
            });
        }

        report.finish(false)
    }
}
