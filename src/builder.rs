//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。

use std::io::{Read, Write};
use std::path::Path;

use tracing::info;

use crate::api::{ColumnSplit, EscapePolicy, LineTerminator, ReaderMode};
use crate::clipboard::ClipboardSink;
use crate::error::CsvPasteError;
use crate::formatter::FieldEscaper;
use crate::output::TsvWriter;
use crate::parser::RecordReader;
use crate::section::{normalize_name, SectionTracker};
use crate::security::SecurityConfig;
use crate::types::ConversionSummary;

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct ConversionConfig {
    /// フィールドのエスケープ方針
    pub escape_policy: EscapePolicy,

    /// レコードの読み取り方式
    pub reader_mode: ReaderMode,

    /// 出力の改行コード
    pub line_terminator: LineTerminator,

    /// 入力の区切り文字
    pub delimiter: u8,

    /// 列分割ルール（Noneの場合は分割しない）
    pub column_split: Option<ColumnSplit>,

    /// セキュリティ設定
    pub security: SecurityConfig,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            escape_policy: EscapePolicy::LeadingZero,
            reader_mode: ReaderMode::Permissive,
            line_terminator: LineTerminator::CrLf,
            delimiter: b',',
            column_split: None,
            security: SecurityConfig::default(),
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// `Converter`インスタンスを段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust
/// use csvpaste::{ConverterBuilder, EscapePolicy, LineTerminator};
///
/// # fn main() -> Result<(), csvpaste::CsvPasteError> {
/// let converter = ConverterBuilder::new()
///     .with_escape_policy(EscapePolicy::Always)
///     .with_line_terminator(LineTerminator::Lf)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConverterBuilder {
    /// 内部設定（構築中）
    config: ConversionConfig,
}

impl Default for ConverterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - エスケープ方針: 先頭ゼロの数字列のみ
    /// - 読み取り方式: 寛容モード
    /// - 改行コード: CRLF
    /// - 区切り文字: `,`
    /// - 列分割: なし
    /// - 入力サイズ上限: 256MB
    pub fn new() -> Self {
        Self {
            config: ConversionConfig::default(),
        }
    }

    /// フィールドのエスケープ方針を指定する
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use csvpaste::{ConverterBuilder, EscapePolicy};
    ///
    /// let builder = ConverterBuilder::new()
    ///     .with_escape_policy(EscapePolicy::Always);
    /// ```
    pub fn with_escape_policy(mut self, policy: EscapePolicy) -> Self {
        self.config.escape_policy = policy;
        self
    }

    /// レコードの読み取り方式を指定する
    pub fn with_reader_mode(mut self, mode: ReaderMode) -> Self {
        self.config.reader_mode = mode;
        self
    }

    /// 出力の改行コードを指定する
    pub fn with_line_terminator(mut self, terminator: LineTerminator) -> Self {
        self.config.line_terminator = terminator;
        self
    }

    /// 入力の区切り文字を指定する
    ///
    /// # 制約
    ///
    /// * ASCII文字であること
    /// * `"`、`\r`、`\n`でないこと
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    /// セクション単位の列分割ルールを指定する
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use csvpaste::{ColumnSplit, ConverterBuilder};
    ///
    /// let builder = ConverterBuilder::new()
    ///     .with_column_split(ColumnSplit::new("detail", "code").with_separator('-'));
    /// ```
    pub fn with_column_split(mut self, split: ColumnSplit) -> Self {
        self.config.column_split = Some(split);
        self
    }

    /// 入力サイズの上限（バイト）を指定する
    pub fn with_max_input_size(mut self, max_bytes: u64) -> Self {
        self.config.security.max_input_size = max_bytes;
        self
    }

    /// 設定を検証し、`Converter`インスタンスを生成する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Converter)`: 設定が有効な場合
    /// * `Err(CsvPasteError::Config)`: 設定が無効な場合
    pub fn build(self) -> Result<Converter, CsvPasteError> {
        // 1. 区切り文字の検証
        let delimiter = self.config.delimiter;
        if !delimiter.is_ascii() || matches!(delimiter, b'"' | b'\r' | b'\n') {
            return Err(CsvPasteError::Config(format!(
                "Invalid delimiter: {:?}",
                delimiter as char
            )));
        }

        // 2. 列分割ルールの検証
        if let Some(split) = &self.config.column_split {
            validate_column_split(split)?;
        }

        // 3. 入力サイズ上限の検証
        if self.config.security.max_input_size == 0 {
            return Err(CsvPasteError::Config(
                "Maximum input size must be greater than 0".to_string(),
            ));
        }

        Ok(Converter::new(self.config))
    }
}

fn validate_column_split(split: &ColumnSplit) -> Result<(), CsvPasteError> {
    if split.section_marker.trim().is_empty() {
        return Err(CsvPasteError::Config(
            "Split section marker must not be blank".to_string(),
        ));
    }

    if split.column_name.trim().is_empty() {
        return Err(CsvPasteError::Config(
            "Split column name must not be blank".to_string(),
        ));
    }

    let (left, right) = &split.replacement_headers;
    if left.trim().is_empty() || right.trim().is_empty() {
        return Err(CsvPasteError::Config(
            "Replacement column names must not be blank".to_string(),
        ));
    }

    let marker = normalize_name(&split.section_marker);
    if split
        .other_markers
        .iter()
        .any(|other| normalize_name(other) == marker)
    {
        return Err(CsvPasteError::Config(format!(
            "Section marker '{}' is listed both as split section and other section",
            split.section_marker
        )));
    }

    Ok(())
}

/// 変換処理のファサード
///
/// CSVテキストを表計算ソフト貼り付け用のタブ区切りテキストに変換するための
/// メインエントリーポイントです。1回の呼び出しの中で処理が完結し、
/// 呼び出し間で状態を共有しません。
///
/// # 使用例
///
/// ```rust
/// use csvpaste::ConverterBuilder;
///
/// # fn main() -> Result<(), csvpaste::CsvPasteError> {
/// let converter = ConverterBuilder::new().build()?;
/// let tsv = converter.convert_str("id,name,code\n1,Alice,00100\n")?;
/// assert_eq!(tsv, "id\tname\tcode\r\n1\tAlice\t\"=\"\"00100\"\"\"\r\n");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Converter {
    /// 変換設定
    config: ConversionConfig,
}

impl Converter {
    pub(crate) fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    /// UTF-8テキストを変換する
    ///
    /// 文字コードの判定は行いません。パイプラインの中核部分のみを実行します。
    pub fn convert_str(&self, text: &str) -> Result<String, CsvPasteError> {
        self.run(text).map(|(output, _)| output)
    }

    /// 文字コード不明のバイト列を変換する
    ///
    /// # 処理フロー
    ///
    /// 1. 入力サイズの検査
    /// 2. 文字コードの判定とUTF-8への変換
    /// 3. レコードの読み取り、列分割、エスケープ、TSV書き出し
    pub fn convert_bytes(&self, bytes: &[u8]) -> Result<String, CsvPasteError> {
        self.convert_bytes_with_summary(bytes)
            .map(|(output, _)| output)
    }

    /// リーダーから入力全体を読み込んで変換する
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use csvpaste::ConverterBuilder;
    /// use std::io::Cursor;
    ///
    /// # fn main() -> Result<(), csvpaste::CsvPasteError> {
    /// let converter = ConverterBuilder::new().build()?;
    /// let tsv = converter.convert(Cursor::new(b"a,007\n".to_vec()))?;
    /// assert_eq!(tsv, "a\t\"=\"\"007\"\"\"\r\n");
    /// # Ok(())
    /// # }
    /// ```
    pub fn convert<R: Read>(&self, input: R) -> Result<String, CsvPasteError> {
        self.convert_with_summary(input).map(|(output, _)| output)
    }

    /// リーダーから入力全体を読み込んで変換し、集計と共に返す
    pub fn convert_with_summary<R: Read>(
        &self,
        input: R,
    ) -> Result<(String, ConversionSummary), CsvPasteError> {
        let bytes = self.config.security.read_limited(input)?;
        self.convert_bytes_with_summary(&bytes)
    }

    /// ファイルを読み込んで変換する
    pub fn convert_file<P: AsRef<Path>>(&self, path: P) -> Result<String, CsvPasteError> {
        let file = std::fs::File::open(path.as_ref())?;
        self.convert(file)
    }

    /// 変換結果をライターに書き出す
    ///
    /// 変換がすべて成功してから1回で書き込みます。
    pub fn convert_to_writer<R: Read, W: Write>(
        &self,
        input: R,
        mut output: W,
    ) -> Result<ConversionSummary, CsvPasteError> {
        let (text, summary) = self.convert_with_summary(input)?;
        output.write_all(text.as_bytes())?;
        output.flush()?;
        Ok(summary)
    }

    /// 変換結果をクリップボードに書き込む
    ///
    /// 変換中にエラーが発生した場合、クリップボードには何も書き込みません。
    pub fn convert_to_clipboard<R: Read, S: ClipboardSink>(
        &self,
        input: R,
        mut sink: S,
    ) -> Result<ConversionSummary, CsvPasteError> {
        let (text, summary) = self.convert_with_summary(input)?;
        sink.write_text(&text)?;
        info!(bytes = text.len(), "copied to clipboard");
        Ok(summary)
    }

    fn convert_bytes_with_summary(
        &self,
        bytes: &[u8],
    ) -> Result<(String, ConversionSummary), CsvPasteError> {
        self.config.security.check_input_size(bytes.len() as u64)?;

        let normalized = crate::encoding::normalize(bytes)?;
        let (output, mut summary) = self.run(&normalized.text)?;
        summary.encoding = Some(normalized.encoding);
        Ok((output, summary))
    }

    /// 変換パイプライン本体
    ///
    /// 1レコード読むごとに、列分割の状態更新、エスケープ、1行の書き出しを順に行います。
    fn run(&self, text: &str) -> Result<(String, ConversionSummary), CsvPasteError> {
        let escaper = FieldEscaper::new(self.config.escape_policy);
        let mut tracker = self.config.column_split.as_ref().map(SectionTracker::new);
        let mut writer = TsvWriter::new(self.config.line_terminator);
        let mut summary = ConversionSummary::default();

        let records = RecordReader::new(self.config.reader_mode, text, self.config.delimiter);
        for record in records {
            let mut record = record?;

            if let Some(tracker) = tracker.as_mut() {
                if tracker.process(&mut record) {
                    summary.split_records += 1;
                }
            }

            summary.wrapped_fields += record
                .iter()
                .filter(|field| escaper.should_wrap(field))
                .count();
            let escaped: Vec<_> = record.iter().map(|field| escaper.escape(field)).collect();
            writer.write_record(escaped.iter().map(|field| field.as_bytes()))?;
            summary.records += 1;
        }

        let output = writer.finish()?;
        summary.output_bytes = output.len();

        info!(
            records = summary.records,
            wrapped = summary.wrapped_fields,
            split = summary.split_records,
            bytes = summary.output_bytes,
            "conversion finished"
        );

        Ok((output, summary))
    }
}
