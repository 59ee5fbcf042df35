//! Parser Module
//!
//! CSVテキストをレコード列に分解するモジュール。
//! 寛容なヒューリスティックパーサーと、`csv`クレートによる厳格なパーサーを提供します。

mod permissive;
mod strict;

pub(crate) use permissive::PermissiveReader;
pub(crate) use strict::StrictReader;

use crate::api::ReaderMode;
use crate::error::CsvPasteError;
use crate::types::Record;

/// 読み取り方式に応じたレコードリーダー
pub(crate) enum RecordReader<'a> {
    Permissive(PermissiveReader<'a>),
    Strict(StrictReader<'a>),
}

impl<'a> RecordReader<'a> {
    pub fn new(mode: ReaderMode, text: &'a str, delimiter: u8) -> Self {
        match mode {
            ReaderMode::Permissive => {
                RecordReader::Permissive(PermissiveReader::new(text, delimiter as char))
            }
            ReaderMode::Strict => RecordReader::Strict(StrictReader::new(text, delimiter)),
        }
    }
}

impl Iterator for RecordReader<'_> {
    type Item = Result<Record, CsvPasteError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            RecordReader::Permissive(reader) => reader.next().map(Ok),
            RecordReader::Strict(reader) => reader.next(),
        }
    }
}
