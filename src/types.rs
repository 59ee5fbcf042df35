//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use serde::Serialize;

use crate::encoding::DetectedEncoding;

/// 1行分のフィールド列
///
/// レコードごとにフィールド数が異なってもかまいません。
pub(crate) type Record = Vec<String>;

/// レコードストリーム上の現在のセクション
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Section {
    /// まだセクションマーカーが現れていない
    #[default]
    None,

    /// 分割対象外のセクション
    Other,

    /// 列分割の対象セクション
    Split,
}

/// 変換結果の集計
///
/// `Converter::convert_with_summary()`が変換後のテキストと共に返します。
/// CLIの`--summary`オプションではJSONとして出力されます。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionSummary {
    /// 判定された入力の文字コード（文字列入力の場合は`None`）
    pub encoding: Option<DetectedEncoding>,

    /// 出力したレコード数（ヘッダー行を含む）
    pub records: usize,

    /// 数式リテラルで包んだフィールド数
    pub wrapped_fields: usize,

    /// 2列に分割したレコード数（ヘッダー行を含む）
    pub split_records: usize,

    /// 出力テキストのバイト数
    pub output_bytes: usize,
}
