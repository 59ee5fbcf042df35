//! TSV Writer
//!
//! `csv`クレートのライターをタブ区切りに設定して使用します。
//! タブ、引用符、改行を含むフィールドのみ引用符で囲み、内部の引用符は二重化します。
//! 出力はすべてメモリ上に蓄積し、最後にまとめて文字列として取り出します。

use crate::api::LineTerminator;
use crate::error::CsvPasteError;

/// タブ区切りテキストのライター
pub(crate) struct TsvWriter {
    writer: csv::Writer<Vec<u8>>,
}

impl TsvWriter {
    pub fn new(line_terminator: LineTerminator) -> Self {
        let terminator = match line_terminator {
            LineTerminator::CrLf => csv::Terminator::CRLF,
            LineTerminator::Lf => csv::Terminator::Any(b'\n'),
        };

        let writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(csv::QuoteStyle::Necessary)
            .terminator(terminator)
            .flexible(true)
            .has_headers(false)
            .from_writer(Vec::new());

        Self { writer }
    }

    /// 1レコードを1行として書き込む
    pub fn write_record<I, T>(&mut self, fields: I) -> Result<(), CsvPasteError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.writer
            .write_record(fields)
            .map_err(|e| CsvPasteError::Serialization(e.to_string()))
    }

    /// バッファをフラッシュし、蓄積したテキストを返す
    pub fn finish(self) -> Result<String, CsvPasteError> {
        let buffer = self
            .writer
            .into_inner()
            .map_err(|e| CsvPasteError::Serialization(e.error().to_string()))?;

        String::from_utf8(buffer).map_err(|e| CsvPasteError::Serialization(e.to_string()))
    }
}
