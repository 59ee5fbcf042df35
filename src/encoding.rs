//! Encoding Module
//!
//! 入力バイト列の文字コードを推定し、UTF-8テキストに正規化するモジュール。
//! Shift_JISと判定された入力のみを`encoding_rs`で変換し、それ以外はそのまま通します。

use std::borrow::Cow;

use encoding_rs::{Encoding, SHIFT_JIS, UTF_8};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::CsvPasteError;

/// Shift_JISと判定するために必要な、妥当なバイト列が占める上位バイトの割合
const SHIFT_JIS_CONFIDENCE: f64 = 0.9;

/// 上位バイトのうちこの割合以上が妥当なUTF-8の多バイト文字であれば、
/// 一部が壊れたUTF-8とみなしてShift_JISの判定を行わない
const UTF8_CONFIDENCE: f64 = 0.9;

/// 推定された入力の文字コード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DetectedEncoding {
    /// UTF-8（ASCIIを含む）
    #[serde(rename = "UTF-8")]
    Utf8,

    /// Shift_JIS
    #[serde(rename = "Shift_JIS")]
    ShiftJis,

    /// 判定不能
    #[serde(rename = "unknown")]
    Unknown,
}

impl DetectedEncoding {
    /// 文字コード名
    pub fn name(&self) -> &'static str {
        match self {
            DetectedEncoding::Utf8 => UTF_8.name(),
            DetectedEncoding::ShiftJis => SHIFT_JIS.name(),
            DetectedEncoding::Unknown => "unknown",
        }
    }
}

/// 正規化済みのテキスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized<'a> {
    /// UTF-8テキスト（BOMは除去済み）
    pub text: Cow<'a, str>,

    /// 推定された元の文字コード
    pub encoding: DetectedEncoding,
}

/// バイト列の文字コードを推定する
///
/// # 判定順序
///
/// 1. UTF-8 BOMがあれば`Utf8`
/// 2. UTF-8として妥当であれば`Utf8`
/// 3. 上位バイトの大半がUTF-8の多バイト文字として妥当であれば`Unknown`
///    （一部だけ壊れたUTF-8。Shift_JISとして厳密に変換すると失敗するため）
/// 4. 上位バイトの大半がShift_JISのバイト列として解釈できれば`ShiftJis`
/// 5. それ以外は`Unknown`
pub fn detect(bytes: &[u8]) -> DetectedEncoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        if encoding == UTF_8 {
            return DetectedEncoding::Utf8;
        }
        return DetectedEncoding::Unknown;
    }

    if std::str::from_utf8(bytes).is_ok() {
        return DetectedEncoding::Utf8;
    }

    if mostly_utf8(bytes) {
        return DetectedEncoding::Unknown;
    }

    if looks_like_shift_jis(bytes) {
        DetectedEncoding::ShiftJis
    } else {
        DetectedEncoding::Unknown
    }
}

/// バイト列をUTF-8テキストに正規化する
///
/// # 戻り値
///
/// * `Ok(Normalized)` - 正規化に成功した場合
/// * `Err(CsvPasteError::Decoding)` - Shift_JISと判定されたが不正なバイト列を含む場合
///
/// 判定不能な入力は変換せずに通します。UTF-8として不正な部分は置換文字になります。
pub fn normalize(bytes: &[u8]) -> Result<Normalized<'_>, CsvPasteError> {
    let encoding = detect(bytes);
    debug!(encoding = encoding.name(), bytes = bytes.len(), "detected input encoding");

    let text = match encoding {
        DetectedEncoding::Utf8 => {
            let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
            String::from_utf8_lossy(body)
        }
        DetectedEncoding::ShiftJis => SHIFT_JIS
            .decode_without_bom_handling_and_without_replacement(bytes)
            .ok_or_else(|| CsvPasteError::Decoding {
                encoding: SHIFT_JIS.name(),
                message: "input contains byte sequences that are not valid Shift_JIS".to_string(),
            })?,
        DetectedEncoding::Unknown => {
            warn!("could not detect input encoding; passing bytes through unchanged");
            String::from_utf8_lossy(bytes)
        }
    };

    Ok(Normalized { text, encoding })
}

/// 上位バイトの大半が妥当なUTF-8の多バイト文字に含まれるか
fn mostly_utf8(bytes: &[u8]) -> bool {
    let mut valid_bytes = 0usize;
    let mut invalid_bytes = 0usize;

    for chunk in bytes.utf8_chunks() {
        valid_bytes += chunk.valid().bytes().filter(|b| !b.is_ascii()).count();
        invalid_bytes += chunk.invalid().len();
    }

    let high_bytes = valid_bytes + invalid_bytes;
    high_bytes > 0 && valid_bytes as f64 / high_bytes as f64 >= UTF8_CONFIDENCE
}

/// 上位バイトの大半がShift_JISの2バイト文字または半角カナとして解釈できるか
fn looks_like_shift_jis(bytes: &[u8]) -> bool {
    let mut high_bytes = 0usize;
    let mut valid_bytes = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b < 0x80 {
            i += 1;
            continue;
        }

        if is_lead_byte(b) {
            match bytes.get(i + 1) {
                Some(&trail) if is_trail_byte(trail) => {
                    // 2バイト目はASCII範囲の場合もあるため、上位バイトとしては1つ分のみ数える
                    high_bytes += 1;
                    valid_bytes += 1;
                    i += 2;
                    continue;
                }
                _ => high_bytes += 1,
            }
        } else if (0xA1..=0xDF).contains(&b) {
            high_bytes += 1;
            valid_bytes += 1;
        } else {
            high_bytes += 1;
        }
        i += 1;
    }

    high_bytes > 0 && valid_bytes as f64 / high_bytes as f64 >= SHIFT_JIS_CONFIDENCE
}

fn is_lead_byte(b: u8) -> bool {
    matches!(b, 0x81..=0x9F | 0xE0..=0xFC)
}

fn is_trail_byte(b: u8) -> bool {
    matches!(b, 0x40..=0x7E | 0x80..=0xFC)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_shift_jis(s: &str) -> Vec<u8> {
        let (bytes, _, had_errors) = SHIFT_JIS.encode(s);
        assert!(!had_errors);
        bytes.into_owned()
    }

    #[test]
    fn test_detect_ascii_as_utf8() {
        assert_eq!(detect(b"id,name\n1,Alice\n"), DetectedEncoding::Utf8);
    }

    #[test]
    fn test_detect_utf8_japanese() {
        assert_eq!(detect("氏名,住所\n".as_bytes()), DetectedEncoding::Utf8);
    }

    #[test]
    fn test_detect_utf8_bom() {
        assert_eq!(detect(b"\xEF\xBB\xBFa,b"), DetectedEncoding::Utf8);
    }

    #[test]
    fn test_detect_utf16_bom_is_unknown() {
        assert_eq!(detect(b"\xFF\xFEa\x00"), DetectedEncoding::Unknown);
    }

    #[test]
    fn test_detect_shift_jis() {
        let bytes = to_shift_jis("氏名,住所,ｶﾅ\n山田,東京,ﾃｽﾄ\n");
        assert_eq!(detect(&bytes), DetectedEncoding::ShiftJis);
    }

    #[test]
    fn test_detect_unknown_binary() {
        // Shift_JISとしても解釈できない上位バイトの連続
        let bytes = [0x61, 0xFD, 0xFE, 0xFF, 0xFD, 0x62];
        assert_eq!(detect(&bytes), DetectedEncoding::Unknown);
    }

    #[test]
    fn test_normalize_strips_utf8_bom() {
        let normalized = normalize(b"\xEF\xBB\xBFid,name").unwrap();
        assert_eq!(normalized.text, "id,name");
        assert_eq!(normalized.encoding, DetectedEncoding::Utf8);
    }

    #[test]
    fn test_normalize_utf8_is_borrowed() {
        let normalized = normalize(b"a,b,c").unwrap();
        assert!(matches!(normalized.text, Cow::Borrowed("a,b,c")));
    }

    #[test]
    fn test_normalize_transcodes_shift_jis() {
        let bytes = to_shift_jis("コード,名前\n007,山田\n");
        let normalized = normalize(&bytes).unwrap();
        assert_eq!(normalized.encoding, DetectedEncoding::ShiftJis);
        assert_eq!(normalized.text, "コード,名前\n007,山田\n");
    }

    #[test]
    fn test_normalize_shift_jis_truncated_lead_byte_fails() {
        // 末尾に対になる2バイト目のない先行バイトを付加する
        let mut bytes = to_shift_jis("山田太郎,東京都千代田区,営業部,課長");
        bytes.push(0x93);

        match normalize(&bytes) {
            Err(CsvPasteError::Decoding { encoding, .. }) => assert_eq!(encoding, "Shift_JIS"),
            other => panic!("Expected Decoding error, got {:?}", other),
        }
    }

    #[test]
    fn test_detect_utf8_with_stray_byte_is_unknown() {
        let mut bytes = "氏名,住所,部署,役職\n山田太郎,東京都千代田区,営業部,課長\n"
            .as_bytes()
            .to_vec();
        bytes.push(0xFF);

        assert_eq!(detect(&bytes), DetectedEncoding::Unknown);
    }

    #[test]
    fn test_normalize_utf8_with_stray_byte_passes_through() {
        let mut bytes = "氏名,部署\n山田太郎,営業部\n".as_bytes().to_vec();
        bytes.insert(bytes.len() - 1, 0xFF);

        let normalized = normalize(&bytes).unwrap();
        assert_eq!(normalized.encoding, DetectedEncoding::Unknown);
        assert_eq!(normalized.text, "氏名,部署\n山田太郎,営業部\u{FFFD}\n");
    }

    #[test]
    fn test_normalize_unknown_passes_through() {
        let bytes = [b'a', 0xFF, b'b'];
        let normalized = normalize(&bytes).unwrap();
        assert_eq!(normalized.encoding, DetectedEncoding::Unknown);
        assert_eq!(normalized.text, "a\u{FFFD}b");
    }
}
