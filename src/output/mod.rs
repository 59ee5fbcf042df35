//! Output Module
//!
//! 変換済みレコードをタブ区切りテキストとして書き出すモジュール。

mod tsv;

pub(crate) use tsv::TsvWriter;
