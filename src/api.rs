//! Public API Types
//!
//! 公開APIで使用する設定型を定義するモジュール。

/// フィールドのエスケープ方針
///
/// 表計算ソフトへの貼り付け時に自動変換（数値化、日付化、数式解釈）を
/// 防ぐため、どのフィールドを数式リテラル `="..."` で包むかを指定します。
///
/// 2つの方針は出力が互換ではないため、必ずどちらか一方を明示的に選択します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum EscapePolicy {
    /// 先頭が`0`で、残りがすべて数字のフィールドのみを包む（デフォルト）
    ///
    /// `"0"`、`"007"`、`"0123"`が対象です。その他のフィールドは
    /// 入力と同一のバイト列のまま出力されます。
    ///
    /// # 出力例
    ///
    /// ```text
    /// 1,Alice,00100  →  1<TAB>Alice<TAB>"=""00100"""
    /// ```
    #[default]
    LeadingZero,

    /// すべてのフィールドを無条件に包む
    ///
    /// ヘッダー行を含むすべての値が `="..."` 形式になります。
    ///
    /// # 出力例
    ///
    /// ```text
    /// id,name  →  "=""id"""<TAB>"=""name"""
    /// ```
    Always,
}

/// CSVレコードの読み取り方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum ReaderMode {
    /// 寛容なヒューリスティックパーサー（デフォルト）
    ///
    /// 1行を1レコードとして扱い、引用符の数の偶奇で区切り文字がフィールド内の
    /// 文字かどうかを判定します。引用符はフィールド内にそのまま残ります。
    /// パースエラーは一切発生しません。
    #[default]
    Permissive,

    /// `csv`クレートによる標準準拠のデコーダー
    ///
    /// 列数の不一致は許容します（`flexible`）。引用符は取り除かれ、
    /// 改行を含むフィールドも1つのレコードとして扱います。
    Strict,
}

/// 出力の改行コード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum LineTerminator {
    /// CRLF（`\r\n`、デフォルト）
    #[default]
    CrLf,

    /// LF（`\n`）
    Lf,
}

impl LineTerminator {
    /// 改行コードの文字列表現
    pub fn as_str(&self) -> &'static str {
        match self {
            LineTerminator::CrLf => "\r\n",
            LineTerminator::Lf => "\n",
        }
    }
}

/// セクション単位の列分割ルール
///
/// 先頭フィールドが`section_marker`と一致するレコード以降を分割対象セクションとし、
/// そのセクション内で`column_name`という名前の列を見つけたら、以降のレコードで
/// その列を区切り文字の最初の出現位置で2列に分割します。
///
/// # 使用例
///
/// ```rust
/// use csvpaste::{ColumnSplit, ConverterBuilder};
///
/// # fn main() -> Result<(), csvpaste::CsvPasteError> {
/// let converter = ConverterBuilder::new()
///     .with_column_split(
///         ColumnSplit::new("detail", "code")
///             .with_other_sections(["summary"])
///             .with_replacement_headers("code_prefix", "code_body"),
///     )
///     .build()?;
///
/// let tsv = converter.convert_str("detail\nid,code\n1,01_zzzz\n")?;
/// assert!(tsv.contains("1\t01_\tzzzz"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSplit {
    pub(crate) section_marker: String,
    pub(crate) other_markers: Vec<String>,
    pub(crate) column_name: String,
    pub(crate) separator: char,
    pub(crate) replacement_headers: (String, String),
}

impl ColumnSplit {
    /// 既定の区切り文字
    pub const DEFAULT_SEPARATOR: char = '_';

    /// 分割対象セクションのマーカーと列名を指定してルールを生成する
    ///
    /// 区切り文字は`_`、置換後の列名は`<列名>_1`と`<列名>_2`が既定値です。
    pub fn new(section_marker: impl Into<String>, column_name: impl Into<String>) -> Self {
        let column_name = column_name.into();
        let replacement_headers = (format!("{}_1", column_name), format!("{}_2", column_name));
        Self {
            section_marker: section_marker.into(),
            other_markers: Vec::new(),
            column_name,
            separator: Self::DEFAULT_SEPARATOR,
            replacement_headers,
        }
    }

    /// 分割対象外のセクションマーカーを指定する
    ///
    /// これらのマーカーが現れると分割対象セクションから抜けます。
    pub fn with_other_sections<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.other_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    /// 分割に使う区切り文字を指定する
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// ヘッダー行で分割対象列を置き換える2つの列名を指定する
    pub fn with_replacement_headers(
        mut self,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        self.replacement_headers = (left.into(), right.into());
        self
    }

    /// 分割対象セクションのマーカー
    pub fn section_marker(&self) -> &str {
        &self.section_marker
    }

    /// 分割対象の列名
    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    /// 区切り文字
    pub fn separator(&self) -> char {
        self.separator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(EscapePolicy::default(), EscapePolicy::LeadingZero);
        assert_eq!(ReaderMode::default(), ReaderMode::Permissive);
        assert_eq!(LineTerminator::default(), LineTerminator::CrLf);
    }

    #[test]
    fn test_line_terminator_as_str() {
        assert_eq!(LineTerminator::CrLf.as_str(), "\r\n");
        assert_eq!(LineTerminator::Lf.as_str(), "\n");
    }

    #[test]
    fn test_column_split_defaults() {
        let split = ColumnSplit::new("detail", "code");
        assert_eq!(split.section_marker(), "detail");
        assert_eq!(split.column_name(), "code");
        assert_eq!(split.separator(), '_');
        assert!(split.other_markers.is_empty());
        assert_eq!(
            split.replacement_headers,
            ("code_1".to_string(), "code_2".to_string())
        );
    }

    #[test]
    fn test_column_split_chaining() {
        let split = ColumnSplit::new("B", "item")
            .with_other_sections(["A", "C"])
            .with_separator('-')
            .with_replacement_headers("prefix", "body");

        assert_eq!(split.other_markers, vec!["A".to_string(), "C".to_string()]);
        assert_eq!(split.separator(), '-');
        assert_eq!(
            split.replacement_headers,
            ("prefix".to_string(), "body".to_string())
        );
    }
}
