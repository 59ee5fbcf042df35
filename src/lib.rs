//! csvpaste - Spreadsheet-safe CSV to TSV converter for clipboard pasting
//!
//! 文字コード不明のCSVファイルを、表計算ソフトに貼り付けても値が自動変換されない
//! タブ区切りテキストに変換するクレートです。先頭ゼロ（`007`）、引用符、数式と
//! 解釈されうる値などを、貼り付け後も入力どおりに表示させることを目的とします。
//!
//! # Quick Start
//!
//! ```rust
//! use csvpaste::ConverterBuilder;
//!
//! fn main() -> Result<(), csvpaste::CsvPasteError> {
//!     // Create a converter with default settings
//!     let converter = ConverterBuilder::new().build()?;
//!
//!     let tsv = converter.convert_str("id,name,code\n1,Alice,00100\n")?;
//!     assert!(tsv.starts_with("id\tname\tcode\r\n"));
//!     assert!(tsv.contains("\"=\"\"00100\"\"\""));
//!
//!     Ok(())
//! }
//! ```
//!
//! # Converting a file to the clipboard
//!
//! ```rust,no_run
//! use csvpaste::{copy_file_to_clipboard, ConverterBuilder, SystemClipboard};
//!
//! fn main() -> Result<(), csvpaste::CsvPasteError> {
//!     let converter = ConverterBuilder::new().build()?;
//!     let clipboard = SystemClipboard::new()?;
//!
//!     // Shift_JISのファイルは自動的にUTF-8へ変換される
//!     let summary = copy_file_to_clipboard(&converter, "data.csv", clipboard)?;
//!     println!("{} records copied", summary.records);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Section-aware column splitting
//!
//! ```rust
//! use csvpaste::{ColumnSplit, ConverterBuilder, LineTerminator};
//!
//! fn main() -> Result<(), csvpaste::CsvPasteError> {
//!     let converter = ConverterBuilder::new()
//!         .with_line_terminator(LineTerminator::Lf)
//!         .with_column_split(
//!             ColumnSplit::new("detail", "code")
//!                 .with_other_sections(["summary"])
//!                 .with_replacement_headers("code_prefix", "code_body"),
//!         )
//!         .build()?;
//!
//!     let tsv = converter.convert_str("detail\nid,code\n1,01_zzzz\n")?;
//!     assert_eq!(tsv, "detail\nid\tcode_prefix\tcode_body\n1\t01_\tzzzz\n");
//!
//!     Ok(())
//! }
//! ```

mod api;
mod builder;
mod clipboard;
mod encoding;
mod error;
mod formatter;
mod output;
mod parser;
mod section;
mod security;
mod types;

use std::path::Path;

// 公開API
pub use api::{ColumnSplit, EscapePolicy, LineTerminator, ReaderMode};
pub use builder::{Converter, ConverterBuilder};
#[cfg(feature = "clipboard")]
pub use clipboard::SystemClipboard;
pub use clipboard::{ClipboardSink, MemoryClipboard};
pub use encoding::{detect, normalize, DetectedEncoding, Normalized};
pub use error::CsvPasteError;
pub use types::ConversionSummary;

/// ファイルを変換し、結果をクリップボードに書き込む
///
/// ファイルの読み込み、文字コード変換、TSV変換、クリップボードへの書き込みを
/// 順に行います。いずれかの段階で失敗した場合、それ以降の処理は行いません。
pub fn copy_file_to_clipboard<P, S>(
    converter: &Converter,
    path: P,
    sink: S,
) -> Result<ConversionSummary, CsvPasteError>
where
    P: AsRef<Path>,
    S: ClipboardSink,
{
    let file = std::fs::File::open(path.as_ref())?;
    converter.convert_to_clipboard(file, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_copy_file_to_clipboard_file_not_found() {
        let converter = ConverterBuilder::new().build().unwrap();
        let mut clipboard = MemoryClipboard::new();
        let result = copy_file_to_clipboard(&converter, "/nonexistent/file.csv", &mut clipboard);

        assert!(matches!(result, Err(CsvPasteError::Io(_))));
        assert_eq!(clipboard.content(), None);
    }

    #[test]
    fn test_copy_file_to_clipboard_success() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("codes.csv");
        let mut file = File::create(&file_path).unwrap();
        file.write_all(b"code\n007\n").unwrap();

        let converter = ConverterBuilder::new().build().unwrap();
        let mut clipboard = MemoryClipboard::new();
        let summary = copy_file_to_clipboard(&converter, &file_path, &mut clipboard).unwrap();

        assert_eq!(summary.records, 2);
        assert_eq!(clipboard.content(), Some("code\r\n\"=\"\"007\"\"\"\r\n"));
    }
}
