//! Permissive Parser
//!
//! CSV文法に厳密には従わない行を、引用符の偶奇だけを頼りに分解するパーサー。
//! 入力を読み込んだままの形で保持するため、引用符の除去やエスケープ解除は行いません。

use std::str::Lines;

use crate::types::Record;

/// 区切り文字で分割した断片ごとに遷移する状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    /// 引用符の外側
    Unquoted,

    /// 奇数個の引用符が現れ、引用符の内側にいる
    InQuotedSpan,
}

impl QuoteState {
    fn toggled(self) -> Self {
        match self {
            QuoteState::Unquoted => QuoteState::InQuotedSpan,
            QuoteState::InQuotedSpan => QuoteState::Unquoted,
        }
    }
}

/// 1行をフィールド列に分解する
///
/// 行を区切り文字で単純に分割し、左から順に断片を現在のフィールドへ蓄積します。
/// 断片に含まれる引用符が奇数個であれば状態を反転し、引用符の外側にいるとき、
/// または最後の断片に到達したときにフィールドを確定します。
///
/// 閉じられていない引用符は行末で打ち切られ、エラーにはなりません。
pub(crate) fn parse_line(line: &str, delimiter: char) -> Record {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut state = QuoteState::Unquoted;
    let mut parts = line.split(delimiter).peekable();

    while let Some(part) = parts.next() {
        if state == QuoteState::InQuotedSpan {
            current.push(delimiter);
        }
        current.push_str(part);

        if part.matches('"').count() % 2 != 0 {
            state = state.toggled();
        }

        let is_last = parts.peek().is_none();
        if state == QuoteState::Unquoted || is_last {
            fields.push(std::mem::take(&mut current));
            state = QuoteState::Unquoted;
        }
    }

    fields
}

/// テキストを1行1レコードとして読み進めるリーダー
///
/// 空白のみの行は読み飛ばします。
pub(crate) struct PermissiveReader<'a> {
    lines: Lines<'a>,
    delimiter: char,
}

impl<'a> PermissiveReader<'a> {
    pub fn new(text: &'a str, delimiter: char) -> Self {
        Self {
            lines: text.lines(),
            delimiter,
        }
    }
}

impl Iterator for PermissiveReader<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        let delimiter = self.delimiter;
        self.lines
            .by_ref()
            .find(|line| !line.trim().is_empty())
            .map(|line| parse_line(line, delimiter))
    }
}
