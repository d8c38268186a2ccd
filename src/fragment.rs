//! Fragment Module
//!
//! サイズ上限を超えるテーブルファイルを複数のパートに分割する
//! モジュール。行ベース分割のみをサポートします（平均行サイズから
//! 1パートあたりの行数を算出し、行境界でのみ分割する方式）。
//! 各パートは元ファイルと同じヘッダー行を持ちます。

use std::path::{Path, PathBuf};

use crate::api::{Format, SheetSelector};
use crate::error::ConvertError;
use crate::report::{NullReporter, Reporter};
use crate::types::{Dataset, Workbook};
use crate::{reader, writer};

/// ファイルをサイズ上限以下のパートに分割する
///
/// # 引数
///
/// * `path` - 入力パス（`.csv`または`.xlsx`。`.xlsx`は最初のシートのみ
///   を対象とします）
/// * `fragment_size_mb` - 1パートあたりのおおよその上限（MB）
///
/// # 戻り値
///
/// 生成されたパートのパスのリスト。パートは入力と同じディレクトリに
/// `<元の名前>_part1.<拡張子>`, `<元の名前>_part2.<拡張子>`, ...として
/// 書き出されます。分割が不要な場合（ファイルが上限以下、または
/// データ行が0行）は元のパスだけを含むリストを返し、パートファイルは
/// 作成しません。
///
/// # CSVの区切り文字
///
/// CSVの読み書きはデフォルトの区切り文字（`,`）と引用符（`"`）で
/// 行われます。別の区切り文字で書かれたCSVは1列のテーブルとして
/// 扱われますが、各行のテキストは変更されないため、パートを順に
/// 連結した結果は元のファイルと行単位で一致します。
///
/// # 発生し得るエラー
///
/// * `ConvertError::Validation` - `fragment_size_mb`が0以下の場合
/// * `ConvertError::UnsupportedFormat` - JSONなど分割対象外の
///   フォーマットの場合
pub fn fragment(
    path: impl AsRef<Path>,
    fragment_size_mb: f64,
) -> Result<Vec<PathBuf>, ConvertError> {
    fragment_with_reporter(path, fragment_size_mb, &NullReporter)
}

/// レポーターを指定してファイルを分割する
///
/// 分割の進捗（パート数の決定など）がレポーターに通知されます。
pub fn fragment_with_reporter(
    path: impl AsRef<Path>,
    fragment_size_mb: f64,
    reporter: &dyn Reporter,
) -> Result<Vec<PathBuf>, ConvertError> {
    let path = path.as_ref();

    if fragment_size_mb <= 0.0 {
        return Err(ConvertError::Validation(format!(
            "Fragment size must be positive, got {} MB",
            fragment_size_mb
        )));
    }

    let format = Format::from_path(path)?;
    let dataset = match format {
        Format::Csv => reader::read_csv(path, b',', b'"', reporter)?,
        Format::Xlsx => {
            let workbook = reader::read_excel(path, &SheetSelector::Index(0), reporter)?;
            workbook
                .first()
                .cloned()
                .ok_or_else(|| ConvertError::Validation(format!(
                    "No sheets in {}",
                    path.display()
                )))?
        }
        Format::Json => {
            return Err(ConvertError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    let limit_bytes = (fragment_size_mb * 1024.0 * 1024.0) as usize;
    let file_size = std::fs::metadata(path)?.len() as usize;

    if dataset.is_empty() || file_size <= limit_bytes {
        return Ok(vec![path.to_path_buf()]);
    }

    let rows_per_fragment = rows_per_fragment(&dataset, limit_bytes);
    let part_count = dataset.row_count().div_ceil(rows_per_fragment);
    reporter.info(&format!(
        "Splitting {} into {} parts ({} rows each)",
        path.display(),
        part_count,
        rows_per_fragment
    ));

    let mut parts = Vec::with_capacity(part_count);
    for (part_idx, start) in (0..dataset.row_count())
        .step_by(rows_per_fragment)
        .enumerate()
    {
        let slice = dataset.slice_rows(start, start + rows_per_fragment);
        let part_path = part_path(path, part_idx + 1);
        write_part(&part_path, format, &slice)?;
        parts.push(part_path);
    }

    Ok(parts)
}

/// 平均行サイズの見積りから1パートあたりの行数を算出
///
/// 行数・平均行サイズがどれだけ小さくても、1パートには最低1行が
/// 含まれます。
fn rows_per_fragment(dataset: &Dataset, limit_bytes: usize) -> usize {
    let avg_row_bytes = (dataset.approx_byte_size() / dataset.row_count()).max(1);
    (limit_bytes / avg_row_bytes).max(1)
}

/// パートファイルのパスを生成（`<stem>_partN.<ext>`、Nは1始まり）
fn part_path(original: &Path, part_number: usize) -> PathBuf {
    let stem = original
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("part");
    let extension = original
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("dat");

    original.with_file_name(format!("{}_part{}.{}", stem, part_number, extension))
}

/// 1パートを入力と同じフォーマットで書き出す
fn write_part(path: &Path, format: Format, dataset: &Dataset) -> Result<(), ConvertError> {
    match format {
        Format::Csv => writer::write_csv(path, dataset, b',', b'"'),
        Format::Xlsx => {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Sheet1");
            let workbook = Workbook::single(writer::sanitize_sheet_name(stem), dataset.clone());
            writer::write_xlsx(path, &workbook)
        }
        Format::Json => unreachable!("rejected before reading"),
    }
}
