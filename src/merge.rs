//! Merge Module
//!
//! 複数のテーブルファイルを1つの出力ファイルに統合するモジュール。
//! 統合方式は`MergeMode`で明示的に選択します。読み込めない入力や
//! 未対応フォーマットの入力は警告付きでスキップされ、レポートに
//! 記録されます（1ファイルの失敗で全体を失敗させません）。

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::api::{Format, MergeMode};
use crate::builder::ConversionConfig;
use crate::error::ConvertError;
use crate::report::{NullReporter, Reporter};
use crate::types::{Dataset, Value, Workbook};
use crate::{reader, writer};

/// 統合処理の結果レポート
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeReport {
    /// 統合された入力ファイルの数
    pub merged: usize,

    /// スキップされた入力と理由のリスト
    pub skipped: Vec<(PathBuf, String)>,
}

impl MergeReport {
    /// すべての入力が統合されたかどうかを判定
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// 複数の入力ファイルを1つの出力ファイルに統合する
///
/// # 引数
///
/// * `inputs` - 入力パスのリスト（CSV・Excel・行区切りJSON混在可）
/// * `output` - 出力パス。`MergeMode::SheetPerFile`の場合は`.xlsx`必須
/// * `mode` - 統合方式
///
/// # 統合方式
///
/// * `MergeMode::SingleSheet` - すべての入力の行を縦に連結します。
///   列は初出順の和集合になり、ある入力に存在しない列は欠損値で
///   埋められます。
/// * `MergeMode::SheetPerFile` - 入力ごとに1シートを作成します。
///   シート名はファイルのベース名から生成され、Excelの命名制約に
///   合わせてサニタイズ・一意化されます。
///
/// # 発生し得るエラー
///
/// * `ConvertError::Validation` - 入力リストが空、すべての入力が
///   スキップされた、または`SheetPerFile`で出力が`.xlsx`でない場合
pub fn merge(
    inputs: &[PathBuf],
    output: impl AsRef<Path>,
    mode: MergeMode,
) -> Result<MergeReport, ConvertError> {
    merge_with_reporter(inputs, output, mode, &NullReporter)
}

/// レポーターを指定して統合する
///
/// スキップされた入力が警告としてレポーターに通知されます。
pub fn merge_with_reporter(
    inputs: &[PathBuf],
    output: impl AsRef<Path>,
    mode: MergeMode,
    reporter: &dyn Reporter,
) -> Result<MergeReport, ConvertError> {
    let output = output.as_ref();

    if inputs.is_empty() {
        return Err(ConvertError::Validation(
            "No input files to merge".to_string(),
        ));
    }

    let output_format = Format::from_path(output)?;
    if mode == MergeMode::SheetPerFile && output_format != Format::Xlsx {
        return Err(ConvertError::Validation(format!(
            "Sheet-per-file merge requires an .xlsx output, got {}",
            output.display()
        )));
    }

    let mut report = MergeReport::default();
    let mut loaded: Vec<(PathBuf, Workbook)> = Vec::new();
    let config = ConversionConfig::default();

    for input in inputs {
        match reader::read_path(input, &config, reporter) {
            Ok(workbook) => {
                report.merged += 1;
                loaded.push((input.clone(), workbook));
            }
            Err(e) => {
                reporter.warn(&format!("Skipping {}: {}", input.display(), e));
                report.skipped.push((input.clone(), e.to_string()));
            }
        }
    }

    if loaded.is_empty() {
        return Err(ConvertError::Validation(
            "All input files were skipped".to_string(),
        ));
    }

    let merged = match mode {
        MergeMode::SingleSheet => {
            let name = output
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Merged");
            Workbook::single(name, concat_rows(&loaded))
        }
        MergeMode::SheetPerFile => sheet_per_file(&loaded),
    };

    writer::write_path(output, &merged, config.delimiter, config.quote)?;
    Ok(report)
}

/// すべての入力の行を列の和集合に揃えて縦に連結
///
/// 列の順序は全入力を通した初出順です。入力に存在しない列のセルは
/// `Value::Null`になります。
fn concat_rows(loaded: &[(PathBuf, Workbook)]) -> Dataset {
    let mut columns: Vec<String> = Vec::new();
    for (_, workbook) in loaded {
        for (_, dataset) in workbook.sheets() {
            for column in dataset.columns() {
                if !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
        }
    }

    let mut merged = Dataset::new(columns.clone());
    for (_, workbook) in loaded {
        for (_, dataset) in workbook.sheets() {
            // 入力ごとの列位置を出力の列位置に対応付ける
            let mapping: Vec<Option<usize>> = columns
                .iter()
                .map(|c| dataset.column_index(c))
                .collect();

            for row in dataset.rows() {
                let new_row: Vec<Value> = mapping
                    .iter()
                    .map(|idx| idx.map_or(Value::Null, |i| row[i].clone()))
                    .collect();
                merged.push_row(new_row);
            }
        }
    }

    merged
}

/// 入力ごとに1シートを持つワークブックを構築
///
/// 単一シートの入力はファイルのベース名がシート名になります。複数
/// シートのExcel入力は`<ベース名>_<シート名>`の形で展開されます。
/// 名前の衝突は書き出し時に一意化されます。
fn sheet_per_file(loaded: &[(PathBuf, Workbook)]) -> Workbook {
    let mut merged = Workbook::new();

    for (path, workbook) in loaded {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Sheet");

        if workbook.sheet_count() == 1 {
            let (_, dataset) = &workbook.sheets()[0];
            merged.push_sheet(writer::sanitize_sheet_name(stem), dataset.clone());
        } else {
            for (sheet_name, dataset) in workbook.sheets() {
                let name = format!("{}_{}", stem, sheet_name);
                merged.push_sheet(writer::sanitize_sheet_name(&name), dataset.clone());
            }
        }
    }

    merged
}
