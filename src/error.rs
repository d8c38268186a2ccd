//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use std::path::PathBuf;
use thiserror::Error;

/// tabzeroクレート全体で使用するエラー型
///
/// 読み込み、射影、書き出し、分割、結合の各処理で発生するエラーを
/// 統一的に扱うために使用されます。
///
/// # エラーの種類
///
/// - `Io`: I/O操作中に発生したエラー（ファイル読み込み失敗など）
/// - `Parse` / `Csv` / `Json`: 入力ファイルの解析に失敗したエラー
/// - `Xlsx`: Excelファイルの書き出しに失敗したエラー
/// - `ColumnNotFound`: 要求された列がデータセットに存在しないエラー
/// - `UnsupportedFormat`: 拡張子がサポート対象外のエラー
/// - `Config`: 設定の検証に失敗したエラー（`ConverterBuilder::build()`時）
/// - `Validation`: 操作パラメータが無効なエラー（分割サイズが非正など）
///
/// # 使用例
///
/// ```rust,no_run
/// use tabzero::{ConvertError, ConverterBuilder};
///
/// fn convert_file() -> Result<(), ConvertError> {
///     let converter = ConverterBuilder::new().build()?;
///     converter.convert("input.xlsx", "output.csv")?;
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum ConvertError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Excelファイルの解析中に発生したエラー（calamine由来）
    #[error("Failed to parse Excel file: {0}")]
    Parse(#[from] calamine::Error),

    /// CSVファイルの読み書き中に発生したエラー（csvクレート由来）
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Excelファイルの書き出し中に発生したエラー（rust_xlsxwriter由来）
    #[error("Failed to write Excel file: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// 行区切りJSONの解析に失敗したエラー
    ///
    /// `LinePolicy::Strict`の場合に、不正な行の位置（1始まり）と
    /// 原因メッセージを保持して返されます。
    #[error("Malformed JSON at {path}:{line}: {message}", path = .path.display())]
    Json {
        /// エラーが発生した入力ファイル
        path: PathBuf,
        /// 不正な行の行番号（1始まり）
        line: usize,
        /// serde_json由来の詳細メッセージ
        message: String,
    },

    /// 要求された列がデータセットに存在しないエラー
    ///
    /// 列射影で存在しない列名を指定した場合に、その列名を保持して
    /// 返されます。列を暗黙に無視することはありません。
    #[error("Column not found: '{column}'")]
    ColumnNotFound {
        /// 見つからなかった列名
        column: String,
    },

    /// パスの拡張子がサポート対象外のエラー
    ///
    /// サポート対象: `.csv`, `.xlsx`, `.json` / `.jsonl`
    #[error("Unsupported file format: {path}", path = .path.display())]
    UnsupportedFormat {
        /// 対象のファイルパス
        path: PathBuf,
    },

    /// 設定の検証に失敗したエラー
    ///
    /// `ConverterBuilder::build()`時に設定を検証し、無効な設定
    /// （区切り文字と引用符が同一など）が検出された場合に発生します。
    #[error("Configuration error: {0}")]
    Config(String),

    /// 操作パラメータの検証に失敗したエラー
    ///
    /// 分割サイズが非正、入力リストが空など、個々の操作に渡された
    /// パラメータが無効な場合に発生します。
    #[error("Validation error: {0}")]
    Validation(String),
}
