//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。

use std::path::Path;
use std::sync::Arc;

use crate::api::{Format, LinePolicy, SheetSelector};
use crate::error::ConvertError;
use crate::report::{Reporter, SharedReporter, TracingReporter};
use crate::transform::{apply_transforms, ColumnTransform};
use crate::types::{Dataset, Workbook};
use crate::{reader, writer};

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct ConversionConfig {
    /// CSVの区切り文字
    pub delimiter: u8,

    /// CSVの引用符
    pub quote: u8,

    /// 射影対象の列名（空 = 全列を元の順序で）
    pub selected_columns: Vec<String>,

    /// Excel入力のシート選択方式
    pub sheet_selector: SheetSelector,

    /// 出力シート名の上書き（空 = 入力由来の名前を維持）
    pub sheet_names: Vec<String>,

    /// 行区切りJSONの不正行ポリシー
    pub line_policy: LinePolicy,

    /// 列ごとの文字列変換ルール
    pub transforms: Vec<ColumnTransform>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            selected_columns: Vec::new(),
            sheet_selector: SheetSelector::All,
            sheet_names: Vec::new(),
            line_policy: LinePolicy::Tolerant,
            transforms: Vec::new(),
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// `Converter`インスタンスを段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみを
/// オーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use tabzero::{ConverterBuilder, SheetSelector};
///
/// # fn main() -> Result<(), tabzero::ConvertError> {
/// let converter = ConverterBuilder::new()
///     .with_delimiter(b';')
///     .with_sheet_selector(SheetSelector::Index(0))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ConverterBuilder {
    /// 内部設定（構築中）
    config: ConversionConfig,
    /// 注入されたレポーター（未指定時はTracingReporter）
    reporter: Option<SharedReporter>,
}

impl std::fmt::Debug for ConverterBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterBuilder")
            .field("config", &self.config)
            .field("reporter", &self.reporter.as_ref().map(|_| "<dyn Reporter>"))
            .finish()
    }
}

impl Default for ConverterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - 区切り文字: `,` / 引用符: `"`
    /// - 列選択: すべての列
    /// - シート選択: すべてのシート
    /// - JSON不正行ポリシー: Tolerant（スキップして継続）
    /// - レポーター: `TracingReporter`
    pub fn new() -> Self {
        Self {
            config: ConversionConfig::default(),
            reporter: None,
        }
    }

    /// CSVの区切り文字を指定する
    ///
    /// # 制約
    ///
    /// 印字可能なASCII文字で、引用符と異なる必要があります。
    /// 制約違反は`build()`時に`ConvertError::Config`になります。
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    /// CSVの引用符を指定する
    pub fn with_quote(mut self, quote: u8) -> Self {
        self.config.quote = quote;
        self
    }

    /// 射影対象の列を指定する
    ///
    /// 空リストは「すべての列を元の順序で」を意味します。存在しない
    /// 列名は変換時に`ConvertError::ColumnNotFound`になります。
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use tabzero::ConverterBuilder;
    ///
    /// let builder = ConverterBuilder::new()
    ///     .with_selected_columns(vec!["b".to_string(), "a".to_string()]);
    /// ```
    pub fn with_selected_columns(mut self, columns: Vec<String>) -> Self {
        self.config.selected_columns = columns;
        self
    }

    /// Excel入力の変換対象シートを選択する
    pub fn with_sheet_selector(mut self, selector: SheetSelector) -> Self {
        self.config.sheet_selector = selector;
        self
    }

    /// 出力シート名を上書きする
    ///
    /// 出力ワークブックの先頭から順に適用されます。シート数より多い
    /// 分は無視されます。
    pub fn with_sheet_names(mut self, names: Vec<String>) -> Self {
        self.config.sheet_names = names;
        self
    }

    /// 行区切りJSONの不正行ポリシーを指定する
    pub fn with_line_policy(mut self, policy: LinePolicy) -> Self {
        self.config.line_policy = policy;
        self
    }

    /// 列ごとの文字列変換ルールを追加する
    ///
    /// 変換は射影の後、書き出しの前に追加順で適用されます。
    pub fn with_transform(mut self, transform: ColumnTransform) -> Self {
        self.config.transforms.push(transform);
        self
    }

    /// レポーターを注入する
    ///
    /// 警告（スキップされた行・ファイルなど）の通知先です。
    /// ライフサイクルは呼び出し側が所有します。
    pub fn with_reporter(mut self, reporter: SharedReporter) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// 設定を検証し、`Converter`インスタンスを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `ConvertError::Config` - 区切り文字・引用符が不正な場合
    ///   （同一、非ASCII、改行文字など）
    pub fn build(self) -> Result<Converter, ConvertError> {
        if self.config.delimiter == self.config.quote {
            return Err(ConvertError::Config(
                "Delimiter and quote character must differ".to_string(),
            ));
        }

        for (label, byte) in [
            ("delimiter", self.config.delimiter),
            ("quote character", self.config.quote),
        ] {
            if !byte.is_ascii() || byte == b'\n' || byte == b'\r' {
                return Err(ConvertError::Config(format!(
                    "Invalid {}: 0x{:02x}",
                    label, byte
                )));
            }
        }

        Ok(Converter {
            config: self.config,
            reporter: self
                .reporter
                .unwrap_or_else(|| Arc::new(TracingReporter)),
        })
    }
}

/// 変換処理のファサード
///
/// CSV・Excel・行区切りJSONの間でファイルを変換するメインエントリー
/// ポイントです。入力・出力それぞれのパスの拡張子に基づいて
/// ディスパッチします。エンコーディングはUTF-8固定です。
///
/// # 使用例
///
/// ```rust,no_run
/// use tabzero::ConverterBuilder;
///
/// # fn main() -> Result<(), tabzero::ConvertError> {
/// let converter = ConverterBuilder::new().build()?;
/// converter.convert("input.xlsx", "output.csv")?;
/// # Ok(())
/// # }
/// ```
pub struct Converter {
    /// 変換設定
    config: ConversionConfig,

    /// 警告・進捗の通知先
    reporter: SharedReporter,
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("config", &self.config)
            .field("reporter", &"<dyn Reporter>")
            .finish()
    }
}

impl Converter {
    /// 入力ファイルを読み込み、射影・変換を適用して出力ファイルに書き出す
    ///
    /// # 処理フロー
    ///
    /// 1. 入出力フォーマットの判定（拡張子ディスパッチ）
    /// 2. 入力の読み込み（シート選択を適用）
    /// 3. 列射影（選択列が指定されている場合）
    /// 4. 文字列変換ルールの適用
    /// 5. 出力シート名の上書き
    /// 6. 書き出し
    ///
    /// # フラット出力とシート数
    ///
    /// CSV・JSON出力は1シートしか持てません。シート選択が`All`で入力が
    /// 複数シートの場合は最初のシートだけが使用されます（元の
    /// `sheet_name=0`相当の挙動）。明示的に複数シートを選択した上で
    /// フラット出力を指定した場合は`ConvertError::Config`になります。
    ///
    /// # エラー
    ///
    /// 部分的に書き込まれた出力は失敗時に削除されません
    /// （既知のギャップ）。
    pub fn convert(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<(), ConvertError> {
        let input = input.as_ref();
        let output = output.as_ref();

        let output_format = Format::from_path(output)?;
        let workbook = reader::read_path(input, &self.config, self.reporter.as_ref())?;

        let workbook = self.reduce_for_flat_output(workbook, output_format, output)?;
        let workbook = workbook.project(&self.config.selected_columns)?;
        let workbook = self.apply_transforms(workbook)?;
        let workbook = self.rename_sheets(workbook);

        writer::write_path(output, &workbook, self.config.delimiter, self.config.quote)?;

        self.reporter.info(&format!(
            "Converted {} -> {}",
            input.display(),
            output.display()
        ));
        Ok(())
    }

    /// 単一のデータセットを直接変換して出力する
    ///
    /// ファイルを経由せずに構築したデータセットを書き出すための
    /// 低レベルAPIです。射影・変換は`convert`と同様に適用されます。
    pub fn write_dataset(
        &self,
        dataset: &Dataset,
        output: impl AsRef<Path>,
    ) -> Result<(), ConvertError> {
        let output = output.as_ref();
        let projected = dataset.project(&self.config.selected_columns)?;
        let workbook = Workbook::single(self.default_sheet_name(), projected);
        let workbook = self.apply_transforms(workbook)?;
        let workbook = self.rename_sheets(workbook);
        writer::write_path(output, &workbook, self.config.delimiter, self.config.quote)
    }

    /// フラット出力（CSV・JSON）のためにワークブックを1シートに縮約
    fn reduce_for_flat_output(
        &self,
        workbook: Workbook,
        output_format: Format,
        output: &Path,
    ) -> Result<Workbook, ConvertError> {
        if output_format == Format::Xlsx || workbook.sheet_count() <= 1 {
            return Ok(workbook);
        }

        match self.config.sheet_selector {
            SheetSelector::All => {
                // 複数シートの入力をフラット出力へ: 最初のシートを使用
                self.reporter.warn(&format!(
                    "Input has {} sheets; only the first is written to {}",
                    workbook.sheet_count(),
                    output.display()
                ));
                let (name, dataset) = workbook.sheets()[0].clone();
                Ok(Workbook::single(name, dataset))
            }
            _ => Err(ConvertError::Config(format!(
                "Cannot write multiple selected sheets to flat output {}",
                output.display()
            ))),
        }
    }

    /// すべてのシートに文字列変換ルールを適用
    fn apply_transforms(&self, workbook: Workbook) -> Result<Workbook, ConvertError> {
        if self.config.transforms.is_empty() {
            return Ok(workbook);
        }

        let mut transformed = Workbook::new();
        for (name, dataset) in workbook.sheets() {
            let mut dataset = dataset.clone();
            apply_transforms(&mut dataset, &self.config.transforms)?;
            transformed.push_sheet(name.clone(), dataset);
        }
        Ok(transformed)
    }

    /// 設定されたシート名で出力シートを先頭から順にリネーム
    fn rename_sheets(&self, workbook: Workbook) -> Workbook {
        if self.config.sheet_names.is_empty() {
            return workbook;
        }

        let mut renamed = Workbook::new();
        for (index, (name, dataset)) in workbook.sheets().iter().enumerate() {
            let new_name = self
                .config
                .sheet_names
                .get(index)
                .cloned()
                .unwrap_or_else(|| name.clone());
            renamed.push_sheet(new_name, dataset.clone());
        }
        renamed
    }

    fn default_sheet_name(&self) -> String {
        self.config
            .sheet_names
            .first()
            .cloned()
            .unwrap_or_else(|| "Sheet1".to_string())
    }

    /// 注入されたレポーターへの参照を取得
    pub fn reporter(&self) -> &dyn Reporter {
        self.reporter.as_ref()
    }
}

/// デフォルト設定で1ファイルを変換する簡易関数
///
/// # 引数
///
/// * `input` - 入力パス（`.csv`, `.xlsx`, `.json` / `.jsonl`）
/// * `output` - 出力パス（同上）
/// * `selected_columns` - 射影対象の列名（空 = 全列）
///
/// # 使用例
///
/// ```rust,no_run
/// # fn main() -> Result<(), tabzero::ConvertError> {
/// tabzero::convert("data.jsonl", "out.csv", &["b".to_string()])?;
/// # Ok(())
/// # }
/// ```
pub fn convert(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    selected_columns: &[String],
) -> Result<(), ConvertError> {
    ConverterBuilder::new()
        .with_selected_columns(selected_columns.to_vec())
        .build()?
        .convert(input, output)
}
