//! # mtsconv
//!
//! MTS 批量转换库：批处理编排核心 (`batch`) 与 ffmpeg 转换器 (`transcode`)。
//! 命令行入口见 `main.rs`；其他前端可以直接驱动 `batch::BatchEngine`，
//! 例如用 `BatchEngine::spawn` 在后台线程运行并通过 channel 接收进度。
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/     (解析、规划、顺序转换、报告)
//!   │     └── transcode/ (ffmpeg 转换器)
//!   ├── utils/      (输出与进度条)
//!   └── error.rs    (错误处理)
//! ```

pub mod batch;
pub mod cli;
pub mod commands;
pub mod error;
pub mod transcode;
pub mod utils;
