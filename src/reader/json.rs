//! JSON Lines Reader
//!
//! 行区切りJSON（1行につき1つのJSONオブジェクト、JSON配列ではない）の
//! 読み込み。ネストされたオブジェクトはドット区切りの列名に平坦化
//! されます。

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::api::LinePolicy;
use crate::error::ConvertError;
use crate::report::Reporter;
use crate::types::{Dataset, Value};

/// 行区切りJSONファイルをデータセットに読み込む
///
/// 列は出現順に発見され、その行に存在しない列の値は`Value::Null`に
/// なります。ネストされたオブジェクトは`parent.child`形式の列名に
/// 平坦化されます。空行は無視されます。
///
/// # 不正な行の扱い
///
/// JSONとして解析できない行と、JSONオブジェクト以外の行
/// （配列・スカラー）は不正な行として扱われます。
///
/// * `LinePolicy::Tolerant` - その行だけを報告してスキップ
/// * `LinePolicy::Strict` - `ConvertError::Json`で読み込み全体を失敗
///   （行番号と原因を含む）
pub(crate) fn read_jsonl(
    path: &Path,
    policy: LinePolicy,
    reporter: &dyn Reporter,
) -> Result<Dataset, ConvertError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    // (列名, 値) ペアの行ごとのリストと、出現順の列リストを収集
    let mut columns: Vec<String> = Vec::new();
    let mut records: Vec<Vec<(String, Value)>> = Vec::new();

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let line_number = line_idx + 1;

        let flat = match serde_json::from_str::<serde_json::Value>(&line) {
            Ok(serde_json::Value::Object(map)) => {
                let mut flat = Vec::new();
                flatten_object("", &map, &mut flat);
                flat
            }
            Ok(_) => match policy {
                LinePolicy::Strict => {
                    return Err(ConvertError::Json {
                        path: path.to_path_buf(),
                        line: line_number,
                        message: "expected a JSON object".to_string(),
                    });
                }
                LinePolicy::Tolerant => {
                    reporter.warn(&format!(
                        "Skipping malformed JSON line {} in {}: expected a JSON object",
                        line_number,
                        path.display()
                    ));
                    continue;
                }
            },
            Err(e) => match policy {
                LinePolicy::Strict => {
                    return Err(ConvertError::Json {
                        path: path.to_path_buf(),
                        line: line_number,
                        message: e.to_string(),
                    });
                }
                LinePolicy::Tolerant => {
                    reporter.warn(&format!(
                        "Skipping malformed JSON line {} in {}: {}",
                        line_number,
                        path.display(),
                        e
                    ));
                    continue;
                }
            },
        };

        for (name, _) in &flat {
            if !columns.iter().any(|c| c == name) {
                columns.push(name.clone());
            }
        }
        records.push(flat);
    }

    Ok(materialize(columns, records))
}

/// 収集した列と行からデータセットを構築
fn materialize(columns: Vec<String>, records: Vec<Vec<(String, Value)>>) -> Dataset {
    let mut dataset = Dataset::new(columns);
    for record in records {
        let row: Vec<Value> = dataset
            .columns()
            .iter()
            .map(|col| {
                record
                    .iter()
                    .find(|(name, _)| name == col)
                    .map(|(_, value)| value.clone())
                    .unwrap_or(Value::Null)
            })
            .collect();
        dataset.push_row(row);
    }
    dataset
}

/// ネストされたJSONオブジェクトをドット区切りの列名に平坦化
///
/// 例: `{"user": {"name": "x"}}` → `[("user.name", Str("x"))]`
/// 配列はネスト構造を展開せず、値として文字列化されます。
fn flatten_object(
    prefix: &str,
    map: &serde_json::Map<String, serde_json::Value>,
    out: &mut Vec<(String, Value)>,
) {
    for (key, value) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            serde_json::Value::Object(nested) => flatten_object(&name, nested, out),
            other => out.push((name, Value::from_json(other))),
        }
    }
}
