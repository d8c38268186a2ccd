//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。
//! リーダーとライターの中間表現となるインメモリテーブルを提供します。

use std::fmt;

use crate::error::ConvertError;

/// セルの値を表す列挙型
///
/// データセットの各セルは異種混在（文字列・数値・論理値・null）で
/// 格納されます。
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 欠損値・空セル
    Null,

    /// 論理値
    Bool(bool),

    /// 数値（f64）
    Number(f64),

    /// 文字列
    Str(String),
}

impl Value {
    /// 値が欠損値かどうかを判定
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// 値の推定メモリフットプリント（バイト）
    ///
    /// 行ベース分割の平均行サイズ見積りに使用されます。厳密な値では
    /// なく、enum本体と文字列ヒープ分の概算です。
    pub fn approx_byte_size(&self) -> usize {
        let base = std::mem::size_of::<Value>();
        match self {
            Value::Str(s) => base + s.len(),
            _ => base,
        }
    }

    /// serde_jsonの値から変換
    ///
    /// オブジェクト・配列はここには渡らない前提（リーダー側で
    /// ドット区切り列名に平坦化済み）。渡された場合は文字列化します。
    pub(crate) fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::Str(s.clone()),
            other => Value::Str(other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    /// セル値のテキスト表現
    ///
    /// CSV出力とシリアライズに使用します。整数値の数値は小数点なしで
    /// 出力します（例: `2.0` → `"2"`）。Nullは空文字列です。
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

/// 名前付き列の順序付き集合としてのインメモリテーブル
///
/// リーダーとライターの中間表現です。変換呼び出しごとに新規に構築され、
/// 射影・変換を適用した後に書き出され、破棄されます（呼び出し間で
/// 永続化されません）。
///
/// # 不変条件
///
/// すべての行は宣言された列数とちょうど同じ数の値を持ちます。
/// `push_row`が不足分を`Value::Null`でパディングし、超過分を切り捨てる
/// ことでこの不変条件を維持します。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// 列名（順序付き）
    columns: Vec<String>,
    /// 行データ（各行は列数と同じ長さ）
    rows: Vec<Vec<Value>>,
}

impl Dataset {
    /// 列名を指定して空のデータセットを生成
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// 列名のスライスを取得
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// 行データのスライスを取得
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// 行数を取得
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// データセットが空（行なし）かどうかを判定
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 行を追加する
    ///
    /// 列数に満たない行は`Value::Null`でパディングされ、超過した値は
    /// 切り捨てられます（不変条件の維持）。
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
    }

    /// 列名から列インデックスを検索
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// 指定された列だけを指定順で含む新しいデータセットを返す（射影）
    ///
    /// # 引数
    ///
    /// * `selected` - 列名の順序付きリスト。空の場合は全列を元の順序で
    ///   保持した複製を返します。
    ///
    /// # 戻り値
    ///
    /// * `Ok(Dataset)` - 射影されたデータセット
    /// * `Err(ConvertError::ColumnNotFound)` - 存在しない列が指定された
    ///   場合。欠落した列名をエラーに含めます（暗黙の無視はしない）。
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use tabzero::{Dataset, Value};
    ///
    /// # fn main() -> Result<(), tabzero::ConvertError> {
    /// let mut dataset = Dataset::new(vec!["a".to_string(), "b".to_string()]);
    /// dataset.push_row(vec![Value::Number(1.0), Value::Number(2.0)]);
    ///
    /// let projected = dataset.project(&["b".to_string()])?;
    /// assert_eq!(projected.columns(), ["b"]);
    /// assert_eq!(projected.rows()[0], vec![Value::Number(2.0)]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn project(&self, selected: &[String]) -> Result<Dataset, ConvertError> {
        if selected.is_empty() {
            return Ok(self.clone());
        }

        let mut indices = Vec::with_capacity(selected.len());
        for name in selected {
            let index = self
                .column_index(name)
                .ok_or_else(|| ConvertError::ColumnNotFound {
                    column: name.clone(),
                })?;
            indices.push(index);
        }

        let mut projected = Dataset::new(selected.to_vec());
        for row in &self.rows {
            let new_row: Vec<Value> = indices.iter().map(|&i| row[i].clone()).collect();
            projected.push_row(new_row);
        }

        Ok(projected)
    }

    /// 連続した行範囲の複製を返す（分割用のスライス）
    ///
    /// 範囲はデータセットの行数にクランプされます。
    pub fn slice_rows(&self, start: usize, end: usize) -> Dataset {
        let end = end.min(self.rows.len());
        let start = start.min(end);

        Dataset {
            columns: self.columns.clone(),
            rows: self.rows[start..end].to_vec(),
        }
    }

    /// データセット全体の推定メモリフットプリント（バイト）
    ///
    /// 行ベース分割の平均行サイズの算出元です。
    pub fn approx_byte_size(&self) -> usize {
        let header: usize = self.columns.iter().map(|c| 24 + c.len()).sum();
        let body: usize = self
            .rows
            .iter()
            .map(|row| row.iter().map(Value::approx_byte_size).sum::<usize>())
            .sum();
        header + body
    }
}

/// 名前付きデータセットの順序付きコレクション
///
/// 複数シートのExcelワークブックに対応する中間表現です。挿入順が
/// 出力時のシート順になります。
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<(String, Dataset)>,
}

impl Workbook {
    /// 空のワークブックを生成
    pub fn new() -> Self {
        Self::default()
    }

    /// 単一のデータセットからワークブックを生成
    pub fn single(name: impl Into<String>, dataset: Dataset) -> Self {
        Self {
            sheets: vec![(name.into(), dataset)],
        }
    }

    /// シートを末尾に追加
    pub fn push_sheet(&mut self, name: impl Into<String>, dataset: Dataset) {
        self.sheets.push((name.into(), dataset));
    }

    /// シートの順序付きリストを取得
    pub fn sheets(&self) -> &[(String, Dataset)] {
        &self.sheets
    }

    /// シート数を取得
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// 最初のシートのデータセットを取得
    pub fn first(&self) -> Option<&Dataset> {
        self.sheets.first().map(|(_, d)| d)
    }

    /// すべてのシートに同じ射影を適用した新しいワークブックを返す
    pub fn project(&self, selected: &[String]) -> Result<Workbook, ConvertError> {
        let mut projected = Workbook::new();
        for (name, dataset) in &self.sheets {
            projected.push_sheet(name.clone(), dataset.project(selected)?);
        }
        Ok(projected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dataset() -> Dataset {
        let mut dataset = Dataset::new(vec![
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
        ]);
        dataset.push_row(vec![
            Value::Number(1.0),
            Value::Str("x".to_string()),
            Value::Bool(true),
        ]);
        dataset.push_row(vec![
            Value::Number(2.0),
            Value::Str("y".to_string()),
            Value::Null,
        ]);
        dataset
    }

    // Value のテスト
    #[test]
    fn test_value_is_null() {
        assert!(Value::Null.is_null());
        assert!(!Value::Number(0.0).is_null());
        assert!(!Value::Str(String::new()).is_null());
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Number(2.0).to_string(), "2");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Str("hello".to_string()).to_string(), "hello");
    }

    #[test]
    fn test_value_from_json() {
        use serde_json::json;

        assert_eq!(Value::from_json(&json!(null)), Value::Null);
        assert_eq!(Value::from_json(&json!(true)), Value::Bool(true));
        assert_eq!(Value::from_json(&json!(42)), Value::Number(42.0));
        assert_eq!(
            Value::from_json(&json!("text")),
            Value::Str("text".to_string())
        );
    }

    // Dataset のテスト
    #[test]
    fn test_push_row_pads_missing_values() {
        let mut dataset = Dataset::new(vec!["a".to_string(), "b".to_string()]);
        dataset.push_row(vec![Value::Number(1.0)]);

        assert_eq!(dataset.rows()[0].len(), 2);
        assert_eq!(dataset.rows()[0][1], Value::Null);
    }

    #[test]
    fn test_push_row_truncates_excess_values() {
        let mut dataset = Dataset::new(vec!["a".to_string()]);
        dataset.push_row(vec![Value::Number(1.0), Value::Number(2.0)]);

        assert_eq!(dataset.rows()[0].len(), 1);
    }

    #[test]
    fn test_project_subset_and_reorder() {
        let dataset = sample_dataset();
        let projected = dataset
            .project(&["c".to_string(), "a".to_string()])
            .unwrap();

        assert_eq!(projected.columns(), ["c", "a"]);
        assert_eq!(
            projected.rows()[0],
            vec![Value::Bool(true), Value::Number(1.0)]
        );
        assert_eq!(projected.rows()[1], vec![Value::Null, Value::Number(2.0)]);
    }

    #[test]
    fn test_project_empty_selection_is_identity() {
        let dataset = sample_dataset();
        let projected = dataset.project(&[]).unwrap();

        assert_eq!(projected, dataset);
    }

    #[test]
    fn test_project_missing_column_fails() {
        let dataset = sample_dataset();
        let result = dataset.project(&["a".to_string(), "zzz".to_string()]);

        match result {
            Err(ConvertError::ColumnNotFound { column }) => {
                assert_eq!(column, "zzz");
            }
            _ => panic!("Expected ColumnNotFound error"),
        }
    }

    #[test]
    fn test_slice_rows_clamps_range() {
        let dataset = sample_dataset();

        let slice = dataset.slice_rows(1, 100);
        assert_eq!(slice.row_count(), 1);
        assert_eq!(slice.columns(), dataset.columns());

        let empty = dataset.slice_rows(5, 10);
        assert_eq!(empty.row_count(), 0);
    }

    #[test]
    fn test_approx_byte_size_grows_with_rows() {
        let mut dataset = Dataset::new(vec!["a".to_string()]);
        let empty_size = dataset.approx_byte_size();

        dataset.push_row(vec![Value::Str("some text".to_string())]);
        assert!(dataset.approx_byte_size() > empty_size);
    }

    // Workbook のテスト
    #[test]
    fn test_workbook_preserves_insertion_order() {
        let mut workbook = Workbook::new();
        workbook.push_sheet("second", Dataset::default());
        workbook.push_sheet("first", Dataset::default());

        let names: Vec<&str> = workbook.sheets().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["second", "first"]);
    }

    #[test]
    fn test_workbook_project_applies_to_all_sheets() {
        let mut workbook = Workbook::new();
        workbook.push_sheet("s1", sample_dataset());
        workbook.push_sheet("s2", sample_dataset());

        let projected = workbook.project(&["b".to_string()]).unwrap();
        for (_, dataset) in projected.sheets() {
            assert_eq!(dataset.columns(), ["b"]);
        }
    }

    // プロパティベーステスト: 射影の順序・値の保存
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// 任意の列の部分集合・並べ替えで射影しても、選択した列が
            /// その順序のまま、値が変化せずに得られることを検証する。
            #[test]
            fn test_projection_preserves_order_and_values(
                indices in proptest::collection::vec(0usize..4, 1..4),
                rows in proptest::collection::vec(
                    proptest::collection::vec(-1000.0f64..1000.0, 4),
                    0..20
                ),
            ) {
                let columns: Vec<String> =
                    (0..4).map(|i| format!("col{}", i)).collect();
                let mut dataset = Dataset::new(columns.clone());
                for row in &rows {
                    dataset.push_row(row.iter().map(|&n| Value::Number(n)).collect());
                }

                let selected: Vec<String> =
                    indices.iter().map(|&i| columns[i].clone()).collect();
                let projected = dataset.project(&selected).unwrap();

                prop_assert_eq!(projected.columns(), selected.as_slice());
                prop_assert_eq!(projected.row_count(), rows.len());
                for (row_idx, row) in rows.iter().enumerate() {
                    for (out_idx, &src_idx) in indices.iter().enumerate() {
                        prop_assert_eq!(
                            &projected.rows()[row_idx][out_idx],
                            &Value::Number(row[src_idx])
                        );
                    }
                }
            }
        }
    }
}
