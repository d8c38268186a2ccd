//! Excel Writer
//!
//! rust_xlsxwriterを使用したExcelワークブックの書き出し。コレクション
//! 内のデータセットごとに1シートを挿入順で出力します。シート名は
//! Excelの命名制約に合わせてサニタイズされます。

use std::path::Path;

use rust_xlsxwriter::Workbook as XlsxWorkbook;

use crate::error::ConvertError;
use crate::types::{Dataset, Value, Workbook};

/// Excelのシート名の最大長（文字数）
const MAX_SHEET_NAME_LEN: usize = 31;

/// ワークブックをExcelファイルに書き出す
///
/// # シート名の扱い
///
/// * 禁止文字（`[ ] : * ? / \`）は`_`に置換
/// * 31文字を超える名前は切り詰め
/// * 空の名前は`Sheet1`にフォールバック
/// * サニタイズ後に重複した名前は`_2`, `_3`, ...で一意化
pub(crate) fn write_xlsx(path: &Path, workbook: &Workbook) -> Result<(), ConvertError> {
    if workbook.sheet_count() == 0 {
        return Err(ConvertError::Validation(format!(
            "Nothing to write to {}",
            path.display()
        )));
    }

    let mut xlsx = XlsxWorkbook::new();
    let mut used_names: Vec<String> = Vec::new();

    for (name, dataset) in workbook.sheets() {
        let sheet_name = unique_sheet_name(&sanitize_sheet_name(name), &used_names);
        used_names.push(sheet_name.clone());

        let worksheet = xlsx.add_worksheet();
        worksheet.set_name(&sheet_name)?;
        write_dataset(worksheet, dataset)?;
    }

    xlsx.save(path)?;
    Ok(())
}

/// 1つのデータセットをワークシートに書き込む
fn write_dataset(
    worksheet: &mut rust_xlsxwriter::Worksheet,
    dataset: &Dataset,
) -> Result<(), ConvertError> {
    for (col_idx, column) in dataset.columns().iter().enumerate() {
        worksheet.write_string(0, col_idx as u16, column)?;
    }

    for (row_idx, row) in dataset.rows().iter().enumerate() {
        let out_row = (row_idx + 1) as u32;
        for (col_idx, value) in row.iter().enumerate() {
            let out_col = col_idx as u16;
            match value {
                Value::Null => {}
                Value::Bool(b) => {
                    worksheet.write_boolean(out_row, out_col, *b)?;
                }
                Value::Number(n) => {
                    worksheet.write_number(out_row, out_col, *n)?;
                }
                Value::Str(s) => {
                    worksheet.write_string(out_row, out_col, s)?;
                }
            }
        }
    }

    Ok(())
}

/// シート名をExcelの命名制約に合わせてサニタイズ
pub(crate) fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            _ => c,
        })
        .collect();

    let truncated: String = cleaned.chars().take(MAX_SHEET_NAME_LEN).collect();

    if truncated.trim().is_empty() {
        "Sheet1".to_string()
    } else {
        truncated
    }
}

/// 既に使用された名前と衝突しない名前を生成
fn unique_sheet_name(candidate: &str, used: &[String]) -> String {
    if !used.iter().any(|u| u == candidate) {
        return candidate.to_string();
    }

    let mut counter = 2;
    loop {
        let suffix = format!("_{}", counter);
        // 接尾辞を付けても31文字に収まるように切り詰める
        let base: String = candidate
            .chars()
            .take(MAX_SHEET_NAME_LEN.saturating_sub(suffix.len()))
            .collect();
        let renamed = format!("{}{}", base, suffix);
        if !used.iter().any(|u| u == &renamed) {
            return renamed;
        }
        counter += 1;
    }
}
