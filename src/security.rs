//! Security Module
//!
//! 入力全体をメモリに読み込む前提のため、入力サイズの上限を検査するモジュール。

use std::io::Read;

use crate::error::CsvPasteError;

/// 入力サイズ上限の既定値（256MB）
pub(crate) const DEFAULT_MAX_INPUT_SIZE: u64 = 268_435_456;

/// セキュリティ設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SecurityConfig {
    /// 入力の最大サイズ（バイト）
    pub max_input_size: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
        }
    }
}

impl SecurityConfig {
    /// 入力サイズが上限以内かを検査する
    pub fn check_input_size(&self, size: u64) -> Result<(), CsvPasteError> {
        if size > self.max_input_size {
            return Err(CsvPasteError::InputTooLarge {
                size,
                max: self.max_input_size,
            });
        }
        Ok(())
    }

    /// 上限を1バイト超えるところまでリーダーを読み込む
    ///
    /// 上限を超える入力は全体を読み込まずにエラーにします。
    pub fn read_limited<R: Read>(&self, input: R) -> Result<Vec<u8>, CsvPasteError> {
        let mut buffer = Vec::new();
        input
            .take(self.max_input_size.saturating_add(1))
            .read_to_end(&mut buffer)?;
        self.check_input_size(buffer.len() as u64)?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_default_limit() {
        assert_eq!(SecurityConfig::default().max_input_size, 268_435_456);
    }

    #[test]
    fn test_check_input_size_boundary() {
        let config = SecurityConfig { max_input_size: 10 };
        assert!(config.check_input_size(10).is_ok());
        assert!(matches!(
            config.check_input_size(11),
            Err(CsvPasteError::InputTooLarge { size: 11, max: 10 })
        ));
    }

    #[test]
    fn test_read_limited_within_limit() {
        let config = SecurityConfig { max_input_size: 5 };
        let data = config.read_limited(Cursor::new(b"a,b,c".to_vec())).unwrap();
        assert_eq!(data, b"a,b,c");
    }

    #[test]
    fn test_read_limited_over_limit() {
        let config = SecurityConfig { max_input_size: 4 };
        let result = config.read_limited(Cursor::new(b"a,b,c,d,e".to_vec()));
        assert!(matches!(
            result,
            Err(CsvPasteError::InputTooLarge { size: 5, max: 4 })
        ));
    }
}
