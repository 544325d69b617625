//! # 输出路径规划
//!
//! 为每个输入计算 `.mp4` 输出路径，同一批次内保证不重复：
//! 冲突时依次尝试 `stem_1.mp4`、`stem_2.mp4`……
//!
//! 只在内存中记录本批次已分配的路径，不检查磁盘上已有的同名文件
//! （那由转换器覆盖写入）。
//!
//! ## 依赖关系
//! - 被 `batch/engine.rs` 使用，每次运行新建一个

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// 输出文件扩展名
pub const OUTPUT_EXTENSION: &str = "mp4";

/// 输出路径规划器
#[derive(Debug)]
pub struct OutputPathPlanner {
    output_dir: Option<PathBuf>,
    issued: HashSet<PathBuf>,
}

impl OutputPathPlanner {
    /// `output_dir` 为空时输出到输入文件所在目录
    pub fn new(output_dir: Option<PathBuf>) -> Self {
        Self {
            output_dir,
            issued: HashSet::new(),
        }
    }

    /// 分配 `input` 的输出路径并记录
    pub fn plan(&mut self, input: &Path) -> PathBuf {
        let dir = match &self.output_dir {
            Some(dir) => dir.clone(),
            None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        let stem = input.file_stem().unwrap_or(input.as_os_str());

        // 至多 issued.len() 次冲突
        let mut suffix = 0usize;
        loop {
            let candidate = dir.join(file_name(stem, suffix));
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
            suffix += 1;
        }
    }

    /// 已分配的路径数
    pub fn issued_count(&self) -> usize {
        self.issued.len()
    }
}

fn file_name(stem: &std::ffi::OsStr, suffix: usize) -> OsString {
    let mut name = stem.to_os_string();
    if suffix > 0 {
        name.push(format!("_{}", suffix));
    }
    name.push(".");
    name.push(OUTPUT_EXTENSION);
    name
}
