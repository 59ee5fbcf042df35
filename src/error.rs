//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// csvpasteクレート全体で使用するエラー型
///
/// CSVファイルの読み込み、文字コード変換、TSV書き出し、クリップボード書き込み中に
/// 発生するすべての致命的エラーを統一的に扱うために使用されます。
///
/// 列数の不一致や閉じられていない引用符は**エラーではありません**。
/// これらはパーサー内部で回復され、呼び出し元には伝播しません。
///
/// # 使用例
///
/// ```rust,no_run
/// use csvpaste::CsvPasteError;
/// use std::fs::File;
///
/// fn open_csv(path: &str) -> Result<(), CsvPasteError> {
///     let _file = File::open(path)?;  // Ioエラーが自動的に変換される
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum CsvPasteError {
    /// I/O操作中に発生したエラー
    ///
    /// 入力ファイルが存在しない、読み込み権限がないなどの場合に使用されます。
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 文字コード変換に失敗したエラー
    ///
    /// Shift_JISと判定された入力に不正なバイト列が含まれていた場合に発生します。
    /// パース開始前に処理が中断されます。
    #[error("Failed to decode input as {encoding}: {message}")]
    Decoding {
        /// 判定された文字コード名
        encoding: &'static str,
        /// エラーの詳細メッセージ
        message: String,
    },

    /// 厳格モードのCSVデコーダーが報告したエラー
    #[error("CSV decode error: {0}")]
    Csv(#[from] csv::Error),

    /// TSVライターのバッファをフラッシュできなかったエラー
    #[error("Failed to serialize TSV output: {0}")]
    Serialization(String),

    /// クリップボードへの書き込みに失敗したエラー
    ///
    /// 変換自体は成功した後に発生します。変換結果は失われます。
    #[error("Failed to write to clipboard: {0}")]
    Clipboard(String),

    /// 設定の検証に失敗したエラー
    ///
    /// `ConverterBuilder::build()`時に設定を検証し、無効な設定が検出された
    /// 場合に発生します。
    ///
    /// # 例
    ///
    /// ```rust
    /// use csvpaste::{ConverterBuilder, CsvPasteError};
    ///
    /// let result = ConverterBuilder::new()
    ///     .with_delimiter(b'"')
    ///     .build();
    ///
    /// assert!(matches!(result, Err(CsvPasteError::Config(_))));
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// 入力サイズが上限を超えたエラー
    #[error("Input size {size} bytes exceeds maximum of {max} bytes")]
    InputTooLarge {
        /// 実際の入力サイズ（バイト）
        size: u64,
        /// 許容される最大サイズ（バイト）
        max: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_missing_input_file_is_io_error() {
        let error: CsvPasteError = std::fs::File::open("nonexistent_input.csv")
            .map_err(CsvPasteError::from)
            .unwrap_err();

        match &error {
            CsvPasteError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            other => panic!("Expected Io error, got {:?}", other),
        }
        assert!(error.to_string().starts_with("IO error"));
    }

    #[test]
    fn test_decoding_error_display() {
        let error = CsvPasteError::Decoding {
            encoding: "Shift_JIS",
            message: "malformed sequence".to_string(),
        };

        let error_msg = error.to_string();
        assert!(error_msg.starts_with("Failed to decode input as Shift_JIS"));
        assert!(error_msg.contains("malformed sequence"));
    }

    #[test]
    fn test_csv_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::UnexpectedEof, "truncated");
        let error: CsvPasteError = csv::Error::from(io_err).into();

        match error {
            CsvPasteError::Csv(e) => assert!(e.is_io_error()),
            _ => panic!("Expected Csv error"),
        }
    }

    #[test]
    fn test_input_too_large_display() {
        let error = CsvPasteError::InputTooLarge { size: 2048, max: 1024 };
        assert_eq!(
            error.to_string(),
            "Input size 2048 bytes exceeds maximum of 1024 bytes"
        );
    }

    #[test]
    fn test_clipboard_error_keeps_context() {
        let error = CsvPasteError::Clipboard(
            "opening clipboard: X11 server connection timed out".to_string(),
        );
        assert_eq!(
            error.to_string(),
            "Failed to write to clipboard: opening clipboard: X11 server connection timed out"
        );
    }

    #[test]
    fn test_csv_error_display() {
        let io_err = io::Error::new(io::ErrorKind::UnexpectedEof, "truncated");
        let error: CsvPasteError = csv::Error::from(io_err).into();
        assert!(error.to_string().starts_with("CSV decode error"));
        assert!(error.to_string().contains("truncated"));
    }

    // エラーメッセージのフォーマット確認
    #[test]
    fn test_all_error_formats() {
        let io_err: CsvPasteError = io::Error::other("test io").into();
        assert!(io_err.to_string().starts_with("IO error"));

        let ser_err = CsvPasteError::Serialization("buffer closed".to_string());
        assert!(ser_err.to_string().starts_with("Failed to serialize TSV output"));

        let clip_err = CsvPasteError::Clipboard("no display".to_string());
        assert!(clip_err.to_string().starts_with("Failed to write to clipboard"));

        let config_err = CsvPasteError::Config("test config".to_string());
        assert!(config_err.to_string().starts_with("Configuration error"));
    }
}
