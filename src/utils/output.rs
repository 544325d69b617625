//! # 美化输出工具
//!
//! 提供统一的终端输出样式。诊断日志走 `tracing`（stderr），
//! 这里只负责面向用户的结果展示。
//!
//! ## 依赖关系
//! - 被所有 `commands/` 模块使用
//! - 使用 `colored` crate

use colored::Colorize;
use std::path::Path;

/// 打印成功消息
pub fn print_success(msg: &str) {
    println!("{} {}", "[OK]".green().bold(), msg);
}

/// 打印错误消息
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

/// 打印警告消息
pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// 打印信息消息
pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

/// 打印完成消息
pub fn print_done(msg: &str) {
    println!("{} {}", "[DONE]".green().bold(), msg);
}

/// 打印单个文件转换成功
pub fn print_converted(index: usize, total: usize, from: &Path, to: &Path) {
    println!(
        "{} {} {} {} {}",
        "[OK]".green().bold(),
        format!("{}/{}", index, total).dimmed(),
        file_name(from).dimmed(),
        "->".cyan(),
        to.display()
    );
}

/// 打印单个文件转换失败
pub fn print_failed(index: usize, total: usize, from: &Path, reason: &str) {
    eprintln!(
        "{} {} {}: {}",
        "[ERR]".red().bold(),
        format!("{}/{}", index, total).dimmed(),
        file_name(from),
        reason
    );
}

/// 打印一行统计
pub fn print_stat(label: &str, value: usize) {
    println!("  {:<12} {}", format!("{}:", label).bold(), value);
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(60);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}

/// 打印分隔线
pub fn print_separator() {
    println!("{}", "─".repeat(60).dimmed());
}

/// 文件名（无文件名时退回完整路径）
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
