//! Formatter Module
//!
//! フィールド値を表計算ソフトに貼り付けても自動変換されない形式に整えるモジュール。
//! 対象フィールドは数式リテラル `="..."` で包み、文字列として解釈させます。

use std::borrow::Cow;

use crate::api::EscapePolicy;

/// 数式リテラルの接頭辞
const FORMULA_PREFIX: &str = "=\"";

/// 数式リテラルの接尾辞
const FORMULA_SUFFIX: &str = "\"";

/// フィールドエスケーパー
#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldEscaper {
    policy: EscapePolicy,
}

impl FieldEscaper {
    pub fn new(policy: EscapePolicy) -> Self {
        Self { policy }
    }

    /// フィールドを方針に従ってエスケープする
    ///
    /// 対象外のフィールドは借用のまま返し、内容を一切変更しません。
    pub fn escape<'a>(&self, field: &'a str) -> Cow<'a, str> {
        if self.should_wrap(field) {
            Cow::Owned(wrap_formula(field))
        } else {
            Cow::Borrowed(field)
        }
    }

    /// フィールドが数式リテラルで包む対象かどうか
    pub fn should_wrap(&self, field: &str) -> bool {
        match self.policy {
            EscapePolicy::Always => true,
            EscapePolicy::LeadingZero => is_zero_padded(field),
        }
    }
}

/// 値全体が「0に続く0個以上の数字」かどうかを判定する
///
/// `"0"`、`"007"`、`"0123"`は対象、`"100"`、`"0.5"`、`"0x1F"`は対象外です。
pub(crate) fn is_zero_padded(value: &str) -> bool {
    match value.as_bytes().split_first() {
        Some((b'0', rest)) => rest.iter().all(u8::is_ascii_digit),
        _ => false,
    }
}

/// 値を数式リテラルで包む
///
/// 値に含まれる引用符は数式内で表示されるよう二重化します。
pub(crate) fn wrap_formula(value: &str) -> String {
    let escaped = value.replace('"', "\"\"");
    let mut wrapped =
        String::with_capacity(FORMULA_PREFIX.len() + escaped.len() + FORMULA_SUFFIX.len());
    wrapped.push_str(FORMULA_PREFIX);
    wrapped.push_str(&escaped);
    wrapped.push_str(FORMULA_SUFFIX);
    wrapped
}
