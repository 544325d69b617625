//! # 批处理结果
//!
//! 单个文件的转换结果、整批汇总报告，以及进度事件。
//!
//! ## 依赖关系
//! - 由 `batch/engine.rs` 生成
//! - 被 `commands/convert.rs` 渲染和导出
//! - 使用 `csv` + `serde` 导出 CSV

use crate::error::{MtsConvError, Result};
use crate::transcode::FailureKind;

use serde::Serialize;
use std::path::{Path, PathBuf};

/// 单个文件的转换结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// 转换成功
    Success { input: PathBuf, output: PathBuf },
    /// 转换失败
    Failure {
        input: PathBuf,
        kind: FailureKind,
        /// 面向用户的说明
        message: String,
    },
}

impl ConversionOutcome {
    pub fn input(&self) -> &Path {
        match self {
            ConversionOutcome::Success { input, .. } => input,
            ConversionOutcome::Failure { input, .. } => input,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ConversionOutcome::Success { .. })
    }
}

/// 进度事件，每个文件状态转换发出一次
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// 即将开始转换第 `index` 个文件（从 1 开始）
    Started {
        index: usize,
        total: usize,
        path: PathBuf,
    },
    /// 第 `index` 个文件已有最终结果
    Completed {
        index: usize,
        total: usize,
        path: PathBuf,
        outcome: ConversionOutcome,
    },
}

impl ProgressEvent {
    pub fn index(&self) -> usize {
        match self {
            ProgressEvent::Started { index, .. } | ProgressEvent::Completed { index, .. } => *index,
        }
    }

    pub fn total(&self) -> usize {
        match self {
            ProgressEvent::Started { total, .. } | ProgressEvent::Completed { total, .. } => *total,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ProgressEvent::Started { path, .. } | ProgressEvent::Completed { path, .. } => path,
        }
    }
}

/// 整批汇总报告
///
/// 只能由批处理引擎追加；引擎返回后即不可变。
#[derive(Debug, Default, Clone)]
pub struct BatchReport {
    outcomes: Vec<ConversionOutcome>,
    cancelled: bool,
}

impl BatchReport {
    pub(super) fn record(&mut self, outcome: ConversionOutcome) {
        self.outcomes.push(outcome);
    }

    pub(super) fn finish(mut self, cancelled: bool) -> Self {
        self.cancelled = cancelled;
        self
    }

    /// 按输入顺序的全部结果
    pub fn outcomes(&self) -> &[ConversionOutcome] {
        &self.outcomes
    }

    /// 成功数量
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// 失败数量
    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// 实际尝试的文件数量
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// 是否因取消而提前结束
    pub fn cancelled(&self) -> bool {
        self.cancelled
    }

    /// 全部尝试的文件都成功
    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }

    /// 失败结果
    pub fn failures(&self) -> impl Iterator<Item = &ConversionOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// 失败文件的输入路径，可直接作为重试批次的输入
    pub fn failed_inputs(&self) -> Vec<PathBuf> {
        self.failures().map(|o| o.input().to_path_buf()).collect()
    }

    /// 导出为 CSV
    pub fn write_csv(&self, output_path: &Path) -> Result<()> {
        let mut wtr = csv::Writer::from_path(output_path)?;

        for (i, outcome) in self.outcomes.iter().enumerate() {
            wtr.serialize(ReportRow::new(i + 1, outcome))?;
        }

        wtr.flush().map_err(|e| MtsConvError::FileWriteError {
            path: output_path.display().to_string(),
            source: e,
        })?;

        Ok(())
    }
}

/// CSV 行
#[derive(Serialize)]
struct ReportRow {
    index: usize,
    input: String,
    status: &'static str,
    output: String,
    kind: Option<FailureKind>,
    message: String,
}

impl ReportRow {
    fn new(index: usize, outcome: &ConversionOutcome) -> Self {
        match outcome {
            ConversionOutcome::Success { input, output } => ReportRow {
                index,
                input: input.display().to_string(),
                status: "success",
                output: output.display().to_string(),
                kind: None,
                message: String::new(),
            },
            ConversionOutcome::Failure {
                input,
                kind,
                message,
            } => ReportRow {
                index,
                input: input.display().to_string(),
                status: "failure",
                output: String::new(),
                kind: Some(*kind),
                message: message.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn success(name: &str) -> ConversionOutcome {
        ConversionOutcome::Success {
            input: PathBuf::from(format!("{}.mts", name)),
            output: PathBuf::from(format!("{}.mp4", name)),
        }
    }

    fn failure(name: &str) -> ConversionOutcome {
        ConversionOutcome::Failure {
            input: PathBuf::from(format!("{}.mts", name)),
            kind: FailureKind::NonZeroExit,
            message: "ffmpeg failed with exit code 1".to_string(),
        }
    }

    #[test]
    fn test_counts() {
        let mut report = BatchReport::default();
        report.record(success("a"));
        report.record(failure("b"));
        report.record(success("c"));
        let report = report.finish(false);

        assert_eq!(report.total(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.succeeded() + report.failed(), report.outcomes().len());
        assert!(!report.all_succeeded());
        assert!(!report.cancelled());
        assert_eq!(report.failed_inputs(), vec![PathBuf::from("b.mts")]);
    }

    #[test]
    fn test_empty_report_is_clean() {
        let report = BatchReport::default().finish(true);
        assert_eq!(report.total(), 0);
        assert!(report.all_succeeded());
        assert!(report.cancelled());
    }

    #[test]
    fn test_event_accessors() {
        let event = ProgressEvent::Completed {
            index: 2,
            total: 5,
            path: PathBuf::from("b.mts"),
            outcome: failure("b"),
        };
        assert_eq!(event.index(), 2);
        assert_eq!(event.total(), 5);
        assert_eq!(event.path(), Path::new("b.mts"));
    }

    #[test]
    fn test_write_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.csv");
        let mut report = BatchReport::default();
        report.record(success("a"));
        report.record(failure("b"));
        report.finish(false).write_csv(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "index,input,status,output,kind,message");
        assert_eq!(lines[1], "1,a.mts,success,a.mp4,,");
        assert_eq!(
            lines[2],
            "2,b.mts,failure,,non_zero_exit,ffmpeg failed with exit code 1"
        );
    }
}
