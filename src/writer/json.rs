//! JSON Lines Writer
//!
//! 行区切りJSON（1行につき1つのJSONオブジェクト）の書き出し。
//! 読み込み時と対になるフォーマットで、単一のJSON配列ドキュメントは
//! 出力しません。

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::ConvertError;
use crate::types::{Dataset, Value};

/// データセットを行区切りJSONファイルに書き出す
///
/// 各行は列名をキーとするJSONオブジェクトになります。整数値の数値は
/// JSON整数として出力されます（`2.0` → `2`）。
pub(crate) fn write_jsonl(path: &Path, dataset: &Dataset) -> Result<(), ConvertError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    for row in dataset.rows() {
        let mut object = serde_json::Map::new();
        for (column, value) in dataset.columns().iter().zip(row) {
            object.insert(column.clone(), value_to_json(value));
        }

        let line = serde_json::to_string(&serde_json::Value::Object(object))
            .map_err(|e| ConvertError::Validation(format!("JSON serialization: {}", e)))?;
        writeln!(writer, "{}", line)?;
    }

    writer.flush()?;
    Ok(())
}

/// セル値をJSON値に変換
fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                serde_json::Value::from(*n as i64)
            } else {
                serde_json::Number::from_f64(*n)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null)
            }
        }
        Value::Str(s) => serde_json::Value::String(s.clone()),
    }
}
