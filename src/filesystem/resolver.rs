// 路径安全解析
//
// 将客户端提交的相对路径解析为服务根目录内的绝对路径，防止路径穿越

use std::path::{Path, PathBuf};

use super::types::{FsError, FsErrorCode};

/// 路径解析器
///
/// 持有进程启动时固定的服务根目录（绝对路径），之后不再变更。
/// 所有触及文件系统的路径都必须经由 [`resolve`](Self::resolve) 产生。
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// 创建新的路径解析器
    ///
    /// `root` 必须是已规范化的绝对路径（见 `AppState::new`）
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// 服务根目录
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 解析客户端相对路径为根目录内的绝对路径
    ///
    /// 纯词法处理，不访问文件系统：
    /// 1. 按两种平台分隔符切分，折叠 `.` / `..` 段，跳过空段（前导分隔符随之失效）
    /// 2. `..` 回退越过根即判定为逃逸
    /// 3. 拼接到根目录并用 `strip_prefix` 复核包含关系
    ///
    /// 空字符串解析为根目录本身。等价的归一化写法
    /// （`a//b` 与 `a/b`、前导斜杠与无前导斜杠、`\` 与 `/`）解析结果一致。
    pub fn resolve(&self, user_path: &str) -> Result<PathBuf, FsError> {
        let relative = normalize_relative(user_path)
            .ok_or_else(|| FsError::new(FsErrorCode::PathEscape).with_path(user_path))?;

        let joined = if relative.as_os_str().is_empty() {
            self.root.clone()
        } else {
            self.root.join(&relative)
        };

        // 词法折叠后不应再出现根外路径，此处复核一次包含关系
        if joined.strip_prefix(&self.root).is_err() {
            return Err(FsError::new(FsErrorCode::PathEscape).with_path(user_path));
        }

        Ok(joined)
    }

    /// 解析并返回归一化后的相对路径字符串（正斜杠分隔，无前导斜杠）
    ///
    /// 供列表与上传定位共用，保证两条路径走同一套包含检查
    pub fn normalize(&self, user_path: &str) -> Result<String, FsError> {
        let relative = normalize_relative(user_path)
            .ok_or_else(|| FsError::new(FsErrorCode::PathEscape).with_path(user_path))?;

        let mut out = String::new();
        for part in relative.iter() {
            if !out.is_empty() {
                out.push('/');
            }
            out.push_str(&part.to_string_lossy());
        }
        Ok(out)
    }
}

/// 词法归一化：折叠 `.` / `..`，跳过空段，两种分隔符同等处理
///
/// `..` 越过起点（即逃逸出根）时返回 `None`
fn normalize_relative(user_path: &str) -> Option<PathBuf> {
    let mut stack: Vec<&str> = Vec::new();

    for part in user_path.split(['/', '\\']) {
        match part {
            "" | "." => continue,
            ".." => {
                if stack.pop().is_none() {
                    return None;
                }
            }
            other => stack.push(other),
        }
    }

    let mut path = PathBuf::new();
    for part in stack {
        path.push(part);
    }
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::path::PathBuf;

    fn resolver() -> PathResolver {
        PathResolver::new(PathBuf::from("/srv/files"))
    }

    #[test]
    fn test_empty_path_resolves_to_root() {
        let r = resolver();
        assert_eq!(r.resolve("").unwrap(), PathBuf::from("/srv/files"));
    }

    #[test]
    fn test_simple_subpath() {
        let r = resolver();
        assert_eq!(
            r.resolve("projects/2024").unwrap(),
            PathBuf::from("/srv/files/projects/2024")
        );
    }

    #[test]
    fn test_parent_escape_rejected() {
        let r = resolver();
        assert!(r.resolve("..").is_err());
        assert!(r.resolve("../etc/passwd").is_err());
        assert!(r.resolve("a/../../etc").is_err());
        assert!(r.resolve("..\\..\\windows").is_err());
    }

    #[test]
    fn test_internal_dotdot_collapses() {
        let r = resolver();
        assert_eq!(
            r.resolve("a/b/../c").unwrap(),
            PathBuf::from("/srv/files/a/c")
        );
    }

    #[test]
    fn test_equivalent_forms_resolve_identically() {
        let r = resolver();
        let canonical = r.resolve("a/b").unwrap();
        assert_eq!(r.resolve("a//b").unwrap(), canonical);
        assert_eq!(r.resolve("/a/b").unwrap(), canonical);
        assert_eq!(r.resolve("a\\b").unwrap(), canonical);
        assert_eq!(r.resolve("./a/./b").unwrap(), canonical);
    }

    #[test]
    fn test_leading_separators_stripped() {
        let r = resolver();
        assert_eq!(r.resolve("/").unwrap(), PathBuf::from("/srv/files"));
        assert_eq!(
            r.resolve("///x").unwrap(),
            PathBuf::from("/srv/files/x")
        );
    }

    #[test]
    fn test_normalize_relative_string() {
        let r = resolver();
        assert_eq!(r.normalize("/a//b\\c/").unwrap(), "a/b/c");
        assert_eq!(r.normalize("").unwrap(), "");
        assert!(r.normalize("../x").is_err());
    }

    proptest! {
        // 任意含 .. 的路径：要么解析到根目录内，要么报逃逸错误，绝不产出根外路径
        #[test]
        fn prop_resolved_path_stays_within_root(
            parts in prop::collection::vec(
                prop_oneof![
                    Just("..".to_string()),
                    Just(".".to_string()),
                    Just(String::new()),
                    prop::string::string_regex("[a-z]{1,4}").unwrap(),
                ].boxed(),
                0..8,
            )
        ) {
            let user_path = parts.join("/");
            let r = resolver();
            if let Ok(resolved) = r.resolve(&user_path) {
                prop_assert!(resolved.starts_with("/srv/files"));
            }
        }

        // 归一化等价形式（重复分隔符、前导斜杠）解析结果一致
        #[test]
        fn prop_equivalent_forms_agree(parts in prop::collection::vec("[a-z]{1,4}", 1..6)) {
            let clean = parts.join("/");
            let doubled = parts.join("//");
            let leading = format!("/{}", clean);
            let r = resolver();
            let canonical = r.resolve(&clean).unwrap();
            prop_assert_eq!(r.resolve(&doubled).unwrap(), canonical.clone());
            prop_assert_eq!(r.resolve(&leading).unwrap(), canonical);
        }
    }
}
