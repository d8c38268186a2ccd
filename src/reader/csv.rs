//! CSV Reader
//!
//! csvクレートを使用したCSV読み込み。区切り文字と引用符は設定可能で、
//! 不正な行は読み込み全体を中断せず、報告の上スキップされます。

use std::path::Path;

use csv::ReaderBuilder;

use crate::error::ConvertError;
use crate::report::Reporter;
use crate::types::{Dataset, Value};

/// CSVファイルをデータセットに読み込む
///
/// 最初の行をヘッダー（列名）として扱います。列数が一致しない行や
/// 引用符の壊れた行はレポーターに警告を通知してスキップされます。
///
/// # フィールドの型付け
///
/// * 空フィールド → `Value::Null`
/// * f64として解析できるフィールド → `Value::Number`
/// * それ以外 → `Value::Str`
pub(crate) fn read_csv(
    path: &Path,
    delimiter: u8,
    quote: u8,
    reporter: &dyn Reporter,
) -> Result<Dataset, ConvertError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .quote(quote)
        .has_headers(true)
        .flexible(false)
        .from_path(path)?;

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut dataset = Dataset::new(headers);

    for (line_idx, result) in reader.records().enumerate() {
        match result {
            Ok(record) => {
                let row: Vec<Value> = record.iter().map(parse_field).collect();
                dataset.push_row(row);
            }
            Err(e) => {
                // 不正な行は読み込みを中断しない
                reporter.warn(&format!(
                    "Skipping malformed CSV row {} in {}: {}",
                    line_idx + 2,
                    path.display(),
                    e
                ));
            }
        }
    }

    Ok(dataset)
}

/// 1つのCSVフィールドをセル値に変換
fn parse_field(field: &str) -> Value {
    if field.is_empty() {
        return Value::Null;
    }
    match field.parse::<f64>() {
        Ok(n) if n.is_finite() => Value::Number(n),
        _ => Value::Str(field.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CollectingReporter;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_read_simple_csv() {
        let file = csv_file("a,b\n1,x\n2,y\n");
        let reporter = CollectingReporter::new();

        let dataset = read_csv(file.path(), b',', b'"', &reporter).unwrap();

        assert_eq!(dataset.columns(), ["a", "b"]);
        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.rows()[0][0], Value::Number(1.0));
        assert_eq!(dataset.rows()[0][1], Value::Str("x".to_string()));
        assert!(reporter.warnings().is_empty());
    }

    #[test]
    fn test_read_csv_with_custom_delimiter() {
        let file = csv_file("a;b\n1;2\n");
        let reporter = CollectingReporter::new();

        let dataset = read_csv(file.path(), b';', b'"', &reporter).unwrap();

        assert_eq!(dataset.columns(), ["a", "b"]);
        assert_eq!(dataset.rows()[0][1], Value::Number(2.0));
    }

    #[test]
    fn test_empty_fields_become_null() {
        let file = csv_file("a,b\n1,\n");
        let reporter = CollectingReporter::new();

        let dataset = read_csv(file.path(), b',', b'"', &reporter).unwrap();

        assert_eq!(dataset.rows()[0][1], Value::Null);
    }

    #[test]
    fn test_quoted_field_with_delimiter() {
        let file = csv_file("a,b\n\"1,5\",\"x, y\"\n");
        let reporter = CollectingReporter::new();

        let dataset = read_csv(file.path(), b',', b'"', &reporter).unwrap();

        assert_eq!(dataset.rows()[0][1], Value::Str("x, y".to_string()));
    }

    #[test]
    fn test_malformed_row_is_skipped_with_warning() {
        // 2行目は列数が一致しないため不正
        let file = csv_file("a,b\n1,2,3\n4,5\n");
        let reporter = CollectingReporter::new();

        let dataset = read_csv(file.path(), b',', b'"', &reporter).unwrap();

        assert_eq!(dataset.row_count(), 1);
        assert_eq!(dataset.rows()[0][0], Value::Number(4.0));
        assert_eq!(reporter.warnings().len(), 1);
        assert!(reporter.warnings()[0].contains("malformed CSV row"));
    }

    #[test]
    fn test_missing_file_fails() {
        let reporter = CollectingReporter::new();
        let result = read_csv(Path::new("does_not_exist.csv"), b',', b'"', &reporter);
        assert!(result.is_err());
    }
}
