//! Transform Module
//!
//! セル値に適用する固定の文字列変換ミニ言語を定義するモジュール。
//! 任意コードの動的評価は行わず、名前付きの安全な操作のみを
//! 提供します。

use crate::error::ConvertError;
use crate::types::{Dataset, Value};

/// 文字列セルに適用できる名前付き変換操作
///
/// 変換は文字列セルにのみ作用し、数値・論理値・nullはそのまま
/// 通過します。
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StringOp {
    /// 先頭・末尾の空白を除去
    Trim,

    /// 大文字化
    Uppercase,

    /// 小文字化
    Lowercase,

    /// 部分文字列の置換（すべての出現箇所）
    Replace {
        /// 置換対象
        from: String,
        /// 置換後の文字列
        to: String,
    },

    /// 先頭に文字列を付加
    Prefix(String),

    /// 末尾に文字列を付加
    Suffix(String),
}

impl StringOp {
    /// 単一の文字列に操作を適用
    fn apply(&self, input: &str) -> String {
        match self {
            StringOp::Trim => input.trim().to_string(),
            StringOp::Uppercase => input.to_uppercase(),
            StringOp::Lowercase => input.to_lowercase(),
            StringOp::Replace { from, to } => input.replace(from.as_str(), to),
            StringOp::Prefix(prefix) => format!("{}{}", prefix, input),
            StringOp::Suffix(suffix) => format!("{}{}", input, suffix),
        }
    }
}

/// 特定の列に対する変換ルール
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnTransform {
    /// 対象の列名
    pub column: String,
    /// 適用する操作
    pub op: StringOp,
}

impl ColumnTransform {
    /// 変換ルールを生成
    pub fn new(column: impl Into<String>, op: StringOp) -> Self {
        Self {
            column: column.into(),
            op,
        }
    }
}

/// データセットに変換ルール群を順に適用する
///
/// # 引数
///
/// * `dataset` - 変換対象のデータセット（インプレースで書き換え）
/// * `transforms` - 適用する変換ルールのリスト（指定順に適用）
///
/// # 戻り値
///
/// * `Ok(())` - すべての変換を適用した場合
/// * `Err(ConvertError::ColumnNotFound)` - ルールの対象列が存在しない
///   場合（射影と同じく暗黙の無視はしない）
pub fn apply_transforms(
    dataset: &mut Dataset,
    transforms: &[ColumnTransform],
) -> Result<(), ConvertError> {
    for transform in transforms {
        let index = dataset
            .column_index(&transform.column)
            .ok_or_else(|| ConvertError::ColumnNotFound {
                column: transform.column.clone(),
            })?;

        let rows = dataset.rows().to_vec();
        let columns = dataset.columns().to_vec();
        let mut rebuilt = Dataset::new(columns);
        for mut row in rows {
            if let Value::Str(s) = &row[index] {
                row[index] = Value::Str(transform.op.apply(s));
            }
            rebuilt.push_row(row);
        }
        *dataset = rebuilt;
    }
    Ok(())
}
