//! Excel Reader
//!
//! calamineを使用したExcelワークブックの読み込み。シート選択方式に
//! 基づいて1シート・全シート・明示リストのいずれかを読み込みます。

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};

use crate::api::SheetSelector;
use crate::error::ConvertError;
use crate::report::Reporter;
use crate::types::{Dataset, Value, Workbook};

/// Excelファイルをワークブックに読み込む
///
/// 各シートの最初の行をヘッダー（列名）として扱います。ヘッダーが
/// 空のセルには、Excelの列名（A, B, ..., AA, ...）が割り当てられます。
///
/// # 戻り値
///
/// * `Ok(Workbook)` - 選択されたシートの順序付きコレクション
/// * `Err(ConvertError::Parse)` - ファイルが読み込めない場合
/// * `Err(ConvertError::Config)` - 指定されたシートが存在しない場合
pub(crate) fn read_excel(
    path: &Path,
    selector: &SheetSelector,
    reporter: &dyn Reporter,
) -> Result<Workbook, ConvertError> {
    let mut excel = open_workbook_auto(path)?;
    let all_sheet_names = excel.sheet_names().to_vec();

    let selected = select_sheets(&all_sheet_names, selector)?;

    let mut workbook = Workbook::new();
    for name in selected {
        let range = excel.worksheet_range(&name)?;
        let dataset = range_to_dataset(&range);

        if dataset.is_empty() && dataset.columns().is_empty() {
            reporter.warn(&format!(
                "Sheet '{}' in {} is empty",
                name,
                path.display()
            ));
        }

        workbook.push_sheet(name, dataset);
    }

    Ok(workbook)
}

/// シート選択方式に基づいてシート名を解決
fn select_sheets(
    all_sheet_names: &[String],
    selector: &SheetSelector,
) -> Result<Vec<String>, ConvertError> {
    match selector {
        SheetSelector::All => Ok(all_sheet_names.to_vec()),

        SheetSelector::Index(index) => {
            if *index >= all_sheet_names.len() {
                return Err(ConvertError::Config(format!(
                    "Sheet index {} is out of range (total: {})",
                    index,
                    all_sheet_names.len()
                )));
            }
            Ok(vec![all_sheet_names[*index].clone()])
        }

        SheetSelector::Name(name) => {
            if !all_sheet_names.contains(name) {
                return Err(ConvertError::Config(format!("Sheet '{}' not found", name)));
            }
            Ok(vec![name.clone()])
        }

        SheetSelector::Names(names) => {
            let mut result = Vec::with_capacity(names.len());
            for name in names {
                if !all_sheet_names.contains(name) {
                    return Err(ConvertError::Config(format!(
                        "Sheet '{}' not found",
                        name
                    )));
                }
                result.push(name.clone());
            }
            Ok(result)
        }
    }
}

/// calamineのセル範囲をデータセットに変換
///
/// 最初の行がヘッダー、残りがデータ行になります。
fn range_to_dataset(range: &Range<Data>) -> Dataset {
    let (row_count, col_count) = range.get_size();
    if row_count == 0 || col_count == 0 {
        return Dataset::default();
    }

    let columns: Vec<String> = (0..col_count)
        .map(|col| {
            let header = range
                .get((0, col))
                .map(|cell| convert_cell(cell).to_string())
                .unwrap_or_default();
            if header.is_empty() {
                column_index_to_letter(col as u32)
            } else {
                header
            }
        })
        .collect();

    let mut dataset = Dataset::new(columns);
    for row_idx in 1..row_count {
        let row: Vec<Value> = (0..col_count)
            .map(|col_idx| {
                range
                    .get((row_idx, col_idx))
                    .map(convert_cell)
                    .unwrap_or(Value::Null)
            })
            .collect();
        dataset.push_row(row);
    }

    dataset
}

/// calamineのセルデータをセル値に変換
fn convert_cell(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) => Value::Str(s.clone()),
        Data::Float(f) => Value::Number(*f),
        Data::Int(i) => Value::Number(*i as f64),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => Value::Str(format_excel_datetime(dt.as_f64())),
        Data::DateTimeIso(s) => Value::Str(s.clone()),
        Data::DurationIso(s) => Value::Str(s.clone()),
        Data::Error(e) => Value::Str(format!("{:?}", e)),
    }
}

/// Excelのシリアル日付値（1899-12-30起点の日数）をISO 8601文字列に変換
fn format_excel_datetime(value: f64) -> String {
    let days = value.floor() as i64;
    let time_fraction = value.fract();

    let epoch = chrono::NaiveDate::from_ymd_opt(1899, 12, 30)
        .unwrap_or(chrono::NaiveDate::MIN);
    let date = epoch + chrono::Duration::days(days);

    let total_seconds = (time_fraction * 86400.0).round() as u32;
    if total_seconds == 0 {
        return date.format("%Y-%m-%d").to_string();
    }

    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    let time =
        chrono::NaiveTime::from_hms_opt(hours, minutes, seconds).unwrap_or_default();

    chrono::NaiveDateTime::new(date, time)
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
}

/// 列インデックス（0始まり）をExcelの列名（A, B, ..., Z, AA, ...）に変換
fn column_index_to_letter(index: u32) -> String {
    let mut result = String::new();
    let mut n = index + 1;

    while n > 0 {
        n -= 1;
        let c = (b'A' + (n % 26) as u8) as char;
        result.insert(0, c);
        n /= 26;
    }

    result
}
