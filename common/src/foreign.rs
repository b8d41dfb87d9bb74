//! 外国籍選手の判定

use crate::error::Result;
use crate::normalize::normalize_name;
use std::collections::HashSet;

/// 外国籍選手の表示名に付けるマーカー
pub const FOREIGN_MARKER: &str = " *";

/// 外国籍選手の氏名セット（正規化済み）
#[derive(Debug, Clone, Default)]
pub struct ForeignSwimmerSet {
    names: HashSet<String>,
}

impl ForeignSwimmerSet {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for name in names {
            set.insert(name.as_ref());
        }
        set
    }

    /// JSON配列（`["Name A", "Name B"]`）から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let names: Vec<String> = serde_json::from_str(json)?;
        Ok(Self::from_names(names))
    }

    /// 1行1名のテキストから読み込み（空行・`#`行は無視）
    pub fn from_lines(text: &str) -> Self {
        Self::from_names(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    /// 拡張子で形式を判定して読み込み
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json {
            Self::from_json(&content)
        } else {
            Ok(Self::from_lines(&content))
        }
    }

    pub fn insert(&mut self, name: &str) {
        let key = normalize_name(name);
        if !key.is_empty() {
            self.names.insert(key);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&normalize_name(name))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_ignores_punctuation_and_case() {
        let set = ForeignSwimmerSet::from_names(["Lee, Jun-Ho"]);
        assert!(set.contains("LEE JUN HO"));
        assert!(set.contains("lee   jun-ho"));
        assert!(!set.contains("Lee Jun"));
    }

    #[test]
    fn test_from_lines_skips_comments() {
        let set = ForeignSwimmerSet::from_lines("# 2024\nNguyen Van A\n\n  Smith John  \n");
        assert_eq!(set.len(), 2);
        assert!(set.contains("smith john"));
    }

    #[test]
    fn test_from_json() {
        let set = ForeignSwimmerSet::from_json(r#"["Tanaka Ken", "Wong K. L."]"#).unwrap();
        assert!(set.contains("Wong K L"));
        assert!(ForeignSwimmerSet::from_json("{").is_err());
    }
}
