//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

use std::path::Path;

use crate::error::ConvertError;

/// パスの拡張子から判定されるファイルフォーマット
///
/// 入出力のディスパッチは、入力パスと出力パスの両方の拡張子に
/// 基づいて行われます。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Format {
    /// CSV形式（RFC 4180準拠、区切り文字・引用符は設定可能）
    Csv,

    /// Excelワークブック形式（.xlsx）
    Xlsx,

    /// 行区切りJSON形式（1行につき1つのJSONオブジェクト）
    ///
    /// 単一のJSON配列ドキュメントではない点に注意してください。
    /// `.json`と`.jsonl`の両方の拡張子を受け付けます。
    Json,
}

impl Format {
    /// パスの拡張子からフォーマットを判定
    ///
    /// # 戻り値
    ///
    /// * `Ok(Format)` - 拡張子がサポート対象の場合
    /// * `Err(ConvertError::UnsupportedFormat)` - 拡張子が未知、または
    ///   拡張子がない場合。対象のパスをエラーに含めます。
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use tabzero::Format;
    ///
    /// assert_eq!(Format::from_path("data.csv").unwrap(), Format::Csv);
    /// assert_eq!(Format::from_path("data.XLSX").unwrap(), Format::Xlsx);
    /// assert_eq!(Format::from_path("data.jsonl").unwrap(), Format::Json);
    /// assert!(Format::from_path("data.pdf").is_err());
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("csv") => Ok(Format::Csv),
            Some("xlsx") => Ok(Format::Xlsx),
            Some("json") | Some("jsonl") => Ok(Format::Json),
            _ => Err(ConvertError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// シート選択方式
///
/// Excel入力の変換対象シートを選択する方法を指定します。
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SheetSelector {
    /// すべてのシートを対象とする（デフォルト）
    ///
    /// CSV出力の場合は最初のシートのみが使用されます
    /// （`Converter::convert`のドキュメントを参照）。
    All,

    /// インデックス指定（0始まり）
    ///
    /// 例: `SheetSelector::Index(0)` は最初のシートを選択
    Index(usize),

    /// シート名指定
    ///
    /// 例: `SheetSelector::Name("Sheet1".to_string())`
    Name(String),

    /// 複数のシート名指定
    ///
    /// 例: `SheetSelector::Names(vec!["Sheet1".to_string(), "Sheet2".to_string()])`
    Names(Vec<String>),
}

/// シート結合の処理戦略
///
/// 複数の入力ファイルを1つの出力に結合する方法を指定します。
/// どちらか一方が暗黙に選ばれることはなく、呼び出し側が明示的に
/// 指定します。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum MergeMode {
    /// すべての入力の行を1つのデータセットに連結して1シートに出力
    ///
    /// 列は最初に出現した順の和集合になり、入力に存在しない列の値は
    /// nullになります。読み込めない入力は警告の上スキップされます。
    SingleSheet,

    /// 入力ファイルごとに1シートとして1つのワークブックに出力
    ///
    /// シート名は入力ファイルのベース名から導出されます（Excelの
    /// 命名制約に合わせてサニタイズ・重複除去されます）。
    /// 出力は`.xlsx`でなければなりません。
    SheetPerFile,
}

/// 行区切りJSONの不正行の処理方針
///
/// どちらを選んでも動作は決定的です。デフォルトは`Tolerant`です。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum LinePolicy {
    /// 不正な行を報告してスキップし、読み込みを継続する（デフォルト）
    #[default]
    Tolerant,

    /// 最初の不正な行で読み込み全体を失敗させる
    ///
    /// `ConvertError::Json`に行番号と原因が含まれます。
    Strict,
}
