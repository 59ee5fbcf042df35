//! Clipboard Module
//!
//! 変換結果を書き込む先を抽象化するモジュール。
//! 実際のシステムクリップボードは`clipboard`フィーチャー（デフォルト有効）で`arboard`を使用します。

use crate::error::CsvPasteError;

/// 変換結果の書き込み先
///
/// テキスト全体を1回で書き込みます。部分的な書き込みは行いません。
pub trait ClipboardSink {
    /// テキストを書き込む
    fn write_text(&mut self, text: &str) -> Result<(), CsvPasteError>;
}

/// システムクリップボード
#[cfg(feature = "clipboard")]
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

#[cfg(feature = "clipboard")]
impl SystemClipboard {
    /// システムクリップボードを開く
    ///
    /// ディスプレイサーバーがない環境などでは`CsvPasteError::Clipboard`を返します。
    pub fn new() -> Result<Self, CsvPasteError> {
        let inner = arboard::Clipboard::new()
            .map_err(|e| CsvPasteError::Clipboard(format!("opening clipboard: {}", e)))?;
        Ok(Self { inner })
    }
}

#[cfg(feature = "clipboard")]
impl ClipboardSink for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), CsvPasteError> {
        self.inner
            .set_text(text)
            .map_err(|e| CsvPasteError::Clipboard(e.to_string()))
    }
}

/// メモリ上のクリップボード
///
/// テストや、ディスプレイのない環境での利用を想定しています。
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    content: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// 最後に書き込まれたテキスト
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

impl ClipboardSink for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), CsvPasteError> {
        self.content = Some(text.to_string());
        Ok(())
    }
}

impl<S: ClipboardSink + ?Sized> ClipboardSink for &mut S {
    fn write_text(&mut self, text: &str) -> Result<(), CsvPasteError> {
        (**self).write_text(text)
    }
}
