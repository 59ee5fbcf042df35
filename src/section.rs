//! Section Tracker Module
//!
//! レコードストリームを順に読みながら、現在のセクションと分割対象列を追跡し、
//! 分割対象セクション内の指定列を2列に展開するモジュール。
//!
//! 状態は1回の変換処理の間だけ有効な`SectionTracker`に閉じ込め、
//! レコードごとに明示的に受け渡します。

use tracing::debug;

use crate::api::ColumnSplit;
use crate::types::{Record, Section};

/// 列分割の状態追跡器
#[derive(Debug)]
pub(crate) struct SectionTracker<'r> {
    rule: &'r ColumnSplit,
    split_marker: String,
    other_markers: Vec<String>,
    column_name: String,
    section: Section,
    split_target: Option<usize>,
}

impl<'r> SectionTracker<'r> {
    pub fn new(rule: &'r ColumnSplit) -> Self {
        Self {
            split_marker: normalize_name(&rule.section_marker),
            other_markers: rule.other_markers.iter().map(|m| normalize_name(m)).collect(),
            column_name: normalize_name(&rule.column_name),
            rule,
            section: Section::None,
            split_target: None,
        }
    }

    #[cfg(test)]
    fn section(&self) -> Section {
        self.section
    }

    #[cfg(test)]
    fn split_target(&self) -> Option<usize> {
        self.split_target
    }

    /// 1レコード分の状態遷移を行い、必要であれば分割対象列を2列に展開する
    ///
    /// # 戻り値
    ///
    /// レコードを展開した場合は`true`
    pub fn process(&mut self, record: &mut Record) -> bool {
        // 1. セクションマーカーの判定
        if let Some(first) = record.first() {
            let first = normalize_name(first);
            let next = if first == self.split_marker {
                Some(Section::Split)
            } else if self.other_markers.contains(&first) {
                Some(Section::Other)
            } else {
                None
            };

            if let Some(section) = next {
                debug!(from = ?self.section, to = ?section, "entering section");
                self.section = section;
                self.split_target = None;
            }
        }

        if self.section != Section::Split {
            return false;
        }

        // 2. 分割対象列の探索
        let mut is_header = false;
        if self.split_target.is_none() {
            self.split_target = record
                .iter()
                .position(|field| normalize_name(field) == self.column_name);
            if let Some(index) = self.split_target {
                debug!(index, column = %self.rule.column_name, "found split column");
                is_header = true;
            }
        }

        // 3. 展開（列数が足りないレコードはそのまま通す）
        let index = match self.split_target {
            Some(index) if index < record.len() => index,
            _ => return false,
        };

        let (left, right) = if is_header {
            self.rule.replacement_headers.clone()
        } else {
            split_value(&record[index], self.rule.separator)
        };

        record[index] = left;
        record.insert(index + 1, right);
        true
    }
}

/// 値を区切り文字の最初の出現位置で2つに分ける
///
/// 区切り文字は左側に残します。区切り文字がなければ右側は空文字列です。
pub(crate) fn split_value(value: &str, separator: char) -> (String, String) {
    match value.split_once(separator) {
        Some((head, tail)) => {
            let mut left = String::with_capacity(head.len() + separator.len_utf8());
            left.push_str(head);
            left.push(separator);
            (left, tail.to_string())
        }
        None => (value.to_string(), String::new()),
    }
}

/// マーカーや列名の比較用に正規化する
///
/// 前後の空白と、寛容モードで残る外側の引用符を取り除き、小文字化します。
pub(crate) fn normalize_name(value: &str) -> String {
    let trimmed = value.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    unquoted.trim().to_lowercase()
}
