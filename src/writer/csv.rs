//! CSV Writer
//!
//! csvクレートを使用したCSV書き出し。ヘッダー行1行に続けて
//! レコードごとに1行を出力します。区切り文字を含むフィールドは
//! csvクレートにより一貫して引用符で囲まれます。

use std::path::Path;

use csv::WriterBuilder;

use crate::error::ConvertError;
use crate::types::Dataset;

/// データセットをCSVファイルに書き出す
///
/// セル値はテキスト表現（`Value`の`Display`実装）で出力されます。
/// nullは空フィールドになります。
pub(crate) fn write_csv(
    path: &Path,
    dataset: &Dataset,
    delimiter: u8,
    quote: u8,
) -> Result<(), ConvertError> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .quote(quote)
        .from_path(path)?;

    // 列のないテーブル（空のJSON Lines入力など）は空ファイルになる
    if dataset.columns().is_empty() {
        return Ok(());
    }

    writer.write_record(dataset.columns())?;

    for row in dataset.rows() {
        let fields: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        writer.write_record(&fields)?;
    }

    writer.flush()?;
    Ok(())
}
