//! Reporter Module
//!
//! 変換中の警告・進捗を呼び出し側に届けるための注入可能な
//! レポーターを定義するモジュール。プロセス全体のロギング設定には
//! 依存せず、ライフサイクルは呼び出し側が所有します。

use std::sync::{Arc, Mutex};

/// 変換中の警告・情報を受け取るトレイト
///
/// 不正なCSV行や読み込めない結合入力のスキップなど、処理を中断
/// しない問題の通知に使用されます。各操作に明示的に渡され、
/// グローバル状態を持ちません。
pub trait Reporter: Send + Sync {
    /// 警告を通知する（スキップされた行・ファイルなど）
    fn warn(&self, message: &str);

    /// 情報を通知する（完了したファイルなど）
    fn info(&self, _message: &str) {}
}

/// `tracing`クレートに委譲するデフォルトのレポーター
///
/// `ConverterBuilder`で何も注入しなかった場合に使用されます。
#[derive(Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }
}

/// すべての通知を破棄するレポーター
#[derive(Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn warn(&self, _message: &str) {}
}

/// 通知をメモリに蓄積するレポーター
///
/// テストと、バッチ実行後の失敗サマリー収集に使用されます。
#[derive(Debug, Default)]
pub struct CollectingReporter {
    warnings: Mutex<Vec<String>>,
}

impl CollectingReporter {
    /// 空のレポーターを生成
    pub fn new() -> Self {
        Self::default()
    }

    /// これまでに受け取った警告の複製を返す
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().expect("reporter mutex poisoned").clone()
    }
}

impl Reporter for CollectingReporter {
    fn warn(&self, message: &str) {
        self.warnings
            .lock()
            .expect("reporter mutex poisoned")
            .push(message.to_string());
    }
}

/// 共有可能なレポーターハンドル
pub type SharedReporter = Arc<dyn Reporter>;
