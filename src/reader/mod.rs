//! Reader Module
//!
//! CSV・Excel・行区切りJSONの各フォーマットをインメモリテーブルに
//! 読み込むリーダー群。

mod csv;
mod excel;
mod json;

pub(crate) use csv::read_csv;
pub(crate) use excel::read_excel;
pub(crate) use json::read_jsonl;

use std::path::Path;

use crate::api::Format;
use crate::builder::ConversionConfig;
use crate::error::ConvertError;
use crate::report::Reporter;
use crate::types::Workbook;

/// パスの拡張子に応じてファイルをワークブックに読み込む
///
/// CSV・JSON入力は、入力ファイルのベース名をシート名とする
/// 単一シートのワークブックになります。
pub(crate) fn read_path(
    path: &Path,
    config: &ConversionConfig,
    reporter: &dyn Reporter,
) -> Result<Workbook, ConvertError> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Sheet1")
        .to_string();

    match Format::from_path(path)? {
        Format::Csv => {
            let dataset = read_csv(path, config.delimiter, config.quote, reporter)?;
            Ok(Workbook::single(stem, dataset))
        }
        Format::Xlsx => read_excel(path, &config.sheet_selector, reporter),
        Format::Json => {
            let dataset = read_jsonl(path, config.line_policy, reporter)?;
            Ok(Workbook::single(stem, dataset))
        }
    }
}
