//! Writer Module
//!
//! インメモリテーブルをCSV・Excel・行区切りJSONの各フォーマットに
//! 書き出すライター群。出力ファイルは作成または上書きされ、途中で
//! 失敗した場合の部分的な書き込みはロールバックされません
//! （既知のギャップとして文書化）。

mod csv;
mod excel;
mod json;

pub(crate) use csv::write_csv;
pub(crate) use excel::{sanitize_sheet_name, write_xlsx};
pub(crate) use json::write_jsonl;

use std::path::Path;

use crate::api::Format;
use crate::error::ConvertError;
use crate::types::Workbook;

/// パスの拡張子に応じてワークブックを書き出す
///
/// CSV・JSON出力は単一シートのワークブックを要求します。複数シートを
/// 1つのフラットファイルに書き出すことはできないためです。
pub(crate) fn write_path(
    path: &Path,
    workbook: &Workbook,
    delimiter: u8,
    quote: u8,
) -> Result<(), ConvertError> {
    match Format::from_path(path)? {
        Format::Csv => {
            let dataset = single_sheet(workbook, path)?;
            write_csv(path, dataset, delimiter, quote)
        }
        Format::Json => {
            let dataset = single_sheet(workbook, path)?;
            write_jsonl(path, dataset)
        }
        Format::Xlsx => write_xlsx(path, workbook),
    }
}

/// フラットな出力フォーマット用に唯一のシートを取り出す
fn single_sheet<'a>(
    workbook: &'a Workbook,
    path: &Path,
) -> Result<&'a crate::types::Dataset, ConvertError> {
    match workbook.sheets() {
        [(_, dataset)] => Ok(dataset),
        [] => Err(ConvertError::Validation(format!(
            "Nothing to write to {}",
            path.display()
        ))),
        _ => Err(ConvertError::Config(format!(
            "Cannot write {} sheets to flat output {}",
            workbook.sheet_count(),
            path.display()
        ))),
    }
}
