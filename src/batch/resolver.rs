//! # 输入文件解析器
//!
//! 把命令行给出的混合输入（文件、目录、glob 模式）展开为
//! 去重、有序、已验证的输入文件列表。
//!
//! ## 规则
//! - 直接给出的文件：扩展名匹配（不区分大小写）则保留，否则记为 `UnsupportedExtension`
//! - 目录：只取第一层子文件（不递归），扩展名不匹配的静默忽略
//! - 模式：展开时扩展名不区分大小写，每个匹配按上面两条规则处理
//!   （匹配到的子目录只取其第一层）
//! - 直接给出的路径不存在时整个解析失败；目录/模式匹配为空不算错误。
//!   只含 `[` 而无 `*`/`?` 的输入若什么都没匹配到，按缺失的直接文件处理
//! - 结果按输入顺序拼接，目录/模式内部按名称字典序；重复文件保留第一次出现的位置
//!
//! ## 依赖关系
//! - 被 `commands/convert.rs` 调用
//! - 使用 `walkdir` 列目录，`glob` 展开模式

use crate::error::{MtsConvError, Result};

use std::collections::HashSet;
use std::fs;
use glob::MatchOptions;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// 默认识别的扩展名
pub const DEFAULT_EXTENSIONS: [&str; 2] = ["mts", "m2ts"];

/// 非致命的解析问题
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("unsupported extension: {}", .0.display())]
    UnsupportedExtension(PathBuf),
}

/// 解析结果
#[derive(Debug, Default)]
pub struct Resolution {
    /// 绝对路径，按解析顺序
    pub files: Vec<PathBuf>,
    pub errors: Vec<ResolutionError>,
}

/// 输入文件解析器
pub struct FileResolver {
    /// 小写、不带点的扩展名
    extensions: Vec<String>,
}

impl Default for FileResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl FileResolver {
    /// 使用默认扩展名集合
    pub fn new() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// 替换识别的扩展名集合（空列表时保持默认）
    pub fn with_extensions<S: AsRef<str>>(mut self, extensions: &[S]) -> Self {
        let exts: Vec<String> = extensions
            .iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        if !exts.is_empty() {
            self.extensions = exts;
        }
        self
    }

    /// 解析全部输入
    pub fn resolve<S: AsRef<str>>(&self, inputs: &[S]) -> Result<Resolution> {
        let mut resolution = Resolution::default();
        let mut seen = HashSet::new();

        for input in inputs {
            let input = input.as_ref();
            let path = Path::new(input);

            let (candidates, direct) = if path.is_dir() {
                (self.expand_directory(path), false)
            } else if path.is_file() {
                (vec![path.to_path_buf()], true)
            } else if is_pattern(input) {
                (self.expand_pattern(input, &mut resolution.errors)?, false)
            } else {
                return Err(MtsConvError::FileNotFound {
                    path: input.to_string(),
                });
            };

            for candidate in candidates {
                if !self.is_recognized(&candidate) {
                    resolution
                        .errors
                        .push(ResolutionError::UnsupportedExtension(candidate));
                    continue;
                }
                let Some(absolute) = absolutize(&candidate, direct)? else {
                    continue;
                };
                if seen.insert(absolute.clone()) {
                    resolution.files.push(absolute);
                } else {
                    tracing::debug!(path = %absolute.display(), "duplicate input collapsed");
                }
            }
        }

        // 结束前再确认一次存在性
        resolution.files.retain(|p| {
            let exists = p.is_file();
            if !exists {
                tracing::warn!(path = %p.display(), "input vanished during resolution");
            }
            exists
        });

        Ok(resolution)
    }

    /// 目录第一层中扩展名匹配的文件
    fn expand_directory(&self, dir: &Path) -> Vec<PathBuf> {
        WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| match e {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::warn!(dir = %dir.display(), error = %err, "skipping unreadable entry");
                    None
                }
            })
            .map(|e| e.into_path())
            .filter(|p| p.is_file() && self.is_recognized(p))
            .collect()
    }

    /// 展开 glob 模式；匹配到的目录按目录规则展开
    fn expand_pattern(
        &self,
        pattern: &str,
        errors: &mut Vec<ResolutionError>,
    ) -> Result<Vec<PathBuf>> {
        let options = MatchOptions {
            case_sensitive: false,
            ..MatchOptions::new()
        };
        let paths =
            glob::glob_with(pattern, options).map_err(|e| MtsConvError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.msg.to_string(),
            })?;

        let mut matches: Vec<PathBuf> = paths
            .filter_map(|p| match p {
                Ok(path) => Some(path),
                Err(err) => {
                    tracing::warn!(pattern, error = %err, "skipping unreadable match");
                    None
                }
            })
            .collect();
        matches.sort();

        // `clip[1].mts` 这类带方括号的文件名
        if matches.is_empty() && !pattern.contains(['*', '?']) {
            return Err(MtsConvError::FileNotFound {
                path: pattern.to_string(),
            });
        }

        let mut files = Vec::new();
        for path in matches {
            if path.is_dir() {
                files.extend(self.expand_directory(&path));
            } else if self.is_recognized(&path) {
                files.push(path);
            } else {
                errors.push(ResolutionError::UnsupportedExtension(path));
            }
        }

        if files.is_empty() {
            tracing::info!(pattern, "pattern matched no media files");
        }
        Ok(files)
    }

    fn is_recognized(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }
}

/// 规范化为绝对路径
///
/// 直接给出的文件失败时整个解析失败；展开得到的候选只记录并跳过。
fn absolutize(candidate: &Path, direct: bool) -> Result<Option<PathBuf>> {
    match fs::canonicalize(candidate) {
        Ok(path) => Ok(Some(path)),
        Err(_) if direct => Err(MtsConvError::FileNotFound {
            path: candidate.display().to_string(),
        }),
        Err(err) => {
            tracing::warn!(path = %candidate.display(), error = %err, "skipping unresolvable match");
            Ok(None)
        }
    }
}

/// 是否含有 glob 通配符
fn is_pattern(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"").unwrap();
    }

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    fn arg(path: &Path) -> String {
        path.display().to_string()
    }

    #[test]
    fn test_directory_filters_extension_and_sorts() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("clip2.MTS"));
        touch(&dir.path().join("notes.txt"));
        touch(&dir.path().join("clip1.mts"));

        let res = FileResolver::new().resolve(&[arg(dir.path())]).unwrap();
        assert_eq!(names(&res.files), vec!["clip1.mts", "clip2.MTS"]);
        assert!(res.errors.is_empty());
    }

    #[test]
    fn test_directory_is_not_recursive() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("top.mts"));
        touch(&dir.path().join("nested").join("deep.mts"));

        let res = FileResolver::new().resolve(&[arg(dir.path())]).unwrap();
        assert_eq!(names(&res.files), vec!["top.mts"]);
    }

    #[test]
    fn test_empty_directory_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let res = FileResolver::new().resolve(&[arg(dir.path())]).unwrap();
        assert!(res.files.is_empty());
        assert!(res.errors.is_empty());
    }

    #[test]
    fn test_missing_direct_file_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.mts");
        let err = FileResolver::new().resolve(&[arg(&missing)]).unwrap_err();
        assert!(matches!(err, MtsConvError::FileNotFound { .. }));
    }

    #[test]
    fn test_unsupported_direct_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let txt = dir.path().join("notes.txt");
        let clip = dir.path().join("a.mts");
        touch(&txt);
        touch(&clip);

        let res = FileResolver::new()
            .resolve(&[arg(&txt), arg(&clip)])
            .unwrap();
        assert_eq!(names(&res.files), vec!["a.mts"]);
        assert_eq!(res.errors, vec![ResolutionError::UnsupportedExtension(txt)]);
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.mts");
        let b = dir.path().join("b.mts");
        touch(&a);
        touch(&b);

        let res = FileResolver::new()
            .resolve(&[arg(&b), arg(dir.path()), arg(&b)])
            .unwrap();
        assert_eq!(names(&res.files), vec!["b.mts", "a.mts"]);
    }

    #[test]
    fn test_pattern_expansion() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("b.mts"));
        touch(&dir.path().join("a.mts"));
        touch(&dir.path().join("c.txt"));

        let pattern = arg(&dir.path().join("*.mts"));
        let res = FileResolver::new().resolve(&[pattern]).unwrap();
        assert_eq!(names(&res.files), vec!["a.mts", "b.mts"]);

        let everything = arg(&dir.path().join("*"));
        let res = FileResolver::new().resolve(&[everything]).unwrap();
        assert_eq!(names(&res.files), vec!["a.mts", "b.mts"]);
        assert_eq!(res.errors.len(), 1);
    }

    #[test]
    fn test_pattern_ignores_extension_case() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("clip1.mts"));
        touch(&dir.path().join("clip2.MTS"));

        let pattern = arg(&dir.path().join("*.mts"));
        let res = FileResolver::new().resolve(&[pattern]).unwrap();
        assert_eq!(names(&res.files), vec!["clip1.mts", "clip2.MTS"]);
    }

    #[test]
    fn test_pattern_expands_matched_subdirectory_one_level() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("top.mts"));
        touch(&dir.path().join("nested").join("deep.mts"));
        touch(&dir.path().join("nested").join("inner").join("deeper.mts"));

        let res = FileResolver::new()
            .resolve(&[arg(&dir.path().join("*"))])
            .unwrap();
        assert_eq!(names(&res.files), vec!["deep.mts", "top.mts"]);
    }

    #[test]
    fn test_missing_bracketed_file_fails() {
        let dir = TempDir::new().unwrap();
        let missing = arg(&dir.path().join("clip[1].mts"));
        let err = FileResolver::new().resolve(&[missing]).unwrap_err();
        assert!(matches!(err, MtsConvError::FileNotFound { .. }));
    }

    #[test]
    fn test_existing_bracketed_file_is_direct() {
        let dir = TempDir::new().unwrap();
        let clip = dir.path().join("clip[1].mts");
        touch(&clip);

        let res = FileResolver::new().resolve(&[arg(&clip)]).unwrap();
        assert_eq!(names(&res.files), vec!["clip[1].mts"]);
    }

    #[test]
    fn test_unresolvable_candidate_is_skipped_unless_direct() {
        let dir = TempDir::new().unwrap();
        let gone = dir.path().join("gone.mts");

        assert_eq!(absolutize(&gone, false).unwrap(), None);
        assert!(matches!(
            absolutize(&gone, true).unwrap_err(),
            MtsConvError::FileNotFound { .. }
        ));
    }

    #[test]
    fn test_pattern_without_matches_is_empty() {
        let dir = TempDir::new().unwrap();
        let pattern = arg(&dir.path().join("*.mts"));
        let res = FileResolver::new().resolve(&[pattern]).unwrap();
        assert!(res.files.is_empty());
    }

    #[test]
    fn test_invalid_pattern() {
        let err = FileResolver::new()
            .resolve(&["/definitely/not/here/[".to_string()])
            .unwrap_err();
        assert!(matches!(err, MtsConvError::InvalidPattern { .. }));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let dir = TempDir::new().unwrap();
        for name in ["z.mts", "m.m2ts", "a.MTS"] {
            touch(&dir.path().join(name));
        }
        let inputs = vec![arg(dir.path()), arg(&dir.path().join("*.mts"))];
        let resolver = FileResolver::new();
        let first = resolver.resolve(&inputs).unwrap();
        let second = resolver.resolve(&inputs).unwrap();
        assert_eq!(first.files, second.files);
        assert_eq!(names(&first.files), vec!["a.MTS", "m.m2ts", "z.mts"]);
    }

    #[test]
    fn test_custom_extensions() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("a.mts"));
        touch(&dir.path().join("b.avi"));

        let res = FileResolver::new()
            .with_extensions(&[".AVI"])
            .resolve(&[arg(dir.path())])
            .unwrap();
        assert_eq!(names(&res.files), vec!["b.avi"]);
    }
}
