//! Strict Parser
//!
//! `csv`クレートによる標準準拠のデコーダー。
//! 列数の不一致は許容し、I/Oレベルのエラーのみを報告します。

use crate::error::CsvPasteError;
use crate::types::Record;

pub(crate) struct StrictReader<'a> {
    records: csv::StringRecordsIntoIter<&'a [u8]>,
}

impl<'a> StrictReader<'a> {
    pub fn new(text: &'a str, delimiter: u8) -> Self {
        let reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        Self {
            records: reader.into_records(),
        }
    }
}

impl Iterator for StrictReader<'_> {
    type Item = Result<Record, CsvPasteError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(e) => return Some(Err(e.into())),
            };

            // 空白のみの行は寛容モードと同様に読み飛ばす
            if record.len() <= 1 && record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }

            return Some(Ok(record.iter().map(str::to_string).collect()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(text: &str) -> Vec<Vec<String>> {
        StrictReader::new(text, b',')
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_strict_unquotes_fields() {
        let records = read_all("2,\"Bob, Jr\",050\n");
        assert_eq!(records, vec![vec!["2", "Bob, Jr", "050"]]);
    }

    #[test]
    fn test_strict_unescapes_doubled_quotes() {
        let records = read_all("\"say \"\"hi\"\"\",x\n");
        assert_eq!(records, vec![vec!["say \"hi\"", "x"]]);
    }

    #[test]
    fn test_strict_accepts_ragged_rows() {
        let records = read_all("id,name,code\n1,Alice,00100\n4,Dave\n");
        assert_eq!(records.len(), 3);
        assert_eq!(records[2], vec!["4", "Dave"]);
    }

    #[test]
    fn test_strict_multiline_field() {
        let records = read_all("a,\"line1\nline2\",c\n");
        assert_eq!(records, vec![vec!["a", "line1\nline2", "c"]]);
    }

    #[test]
    fn test_strict_skips_blank_lines() {
        let records = read_all("a,b\n\n   \nc,d\n");
        assert_eq!(records, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn test_strict_semicolon_delimiter() {
        let records = StrictReader::new("a;b\n", b';')
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(records, vec![vec!["a", "b"]]);
    }
}
