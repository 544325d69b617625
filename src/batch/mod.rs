//! # 批量处理模块
//!
//! 批量转换的编排核心。
//!
//! ## 功能
//! - 解析混合输入（文件/目录/模式）为有序文件列表
//! - 规划无冲突的输出路径
//! - 顺序转换、进度事件、协作式取消
//! - 汇总报告
//!
//! ## 数据流
//! ```text
//! inputs ─▶ FileResolver ─▶ files ─▶ BatchEngine ─▶ BatchReport
//!                                      │  ├── OutputPathPlanner
//!                                      │  └── transcode::Converter
//!                                      └─▶ ProgressEvent
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/convert.rs` 使用
//! - 使用 `transcode/` 的 `Converter` trait

pub mod engine;
pub mod planner;
pub mod report;
pub mod resolver;

pub use engine::{BatchEngine, CancellationFlag};
pub use planner::OutputPathPlanner;
pub use report::{BatchReport, ConversionOutcome, ProgressEvent};
pub use resolver::{FileResolver, Resolution, ResolutionError};
