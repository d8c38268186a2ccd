//! Batch Module
//!
//! 複数の変換ジョブをバックグラウンドの単一ワーカースレッドで
//! 順次実行するモジュール。ジョブは投入順に厳密に逐次処理され、
//! 同時に実行される変換は常に1つだけです。個々のジョブの失敗は
//! 記録した上で次のジョブに進みます。キャンセルは各ジョブの開始前に
//! 判定され、実行中のジョブは中断されません。

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::JoinHandle;

use serde::Serialize;

use crate::builder::Converter;

/// 1件の変換ジョブ（入力パスと出力パスの組）
#[derive(Debug, Clone)]
pub struct ConversionJob {
    /// 入力パス
    pub input: PathBuf,

    /// 出力パス
    pub output: PathBuf,
}

impl ConversionJob {
    /// ジョブを生成
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

/// ジョブの状態
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum JobStatus {
    /// 未実行
    Pending,

    /// 実行中
    Running,

    /// 正常終了
    Done,

    /// 失敗（エラーメッセージ付き）
    Failed(String),

    /// キャンセルにより未実行のまま終了
    Cancelled,
}

/// ワーカーから通知される状態遷移イベント
#[derive(Debug, Clone, Serialize)]
pub struct BatchEvent {
    /// ジョブのインデックス（投入順、0始まり）
    pub index: usize,

    /// ジョブの入力パス
    pub input: PathBuf,

    /// 遷移後の状態
    pub status: JobStatus,
}

/// バッチ実行の最終結果
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    /// 全ジョブの最終状態（投入順）
    pub statuses: Vec<JobStatus>,
}

impl BatchSummary {
    /// 正常終了したジョブの数
    pub fn done_count(&self) -> usize {
        self.statuses
            .iter()
            .filter(|s| **s == JobStatus::Done)
            .count()
    }

    /// 失敗したジョブのインデックスとエラーメッセージのリスト
    pub fn failures(&self) -> Vec<(usize, &str)> {
        self.statuses
            .iter()
            .enumerate()
            .filter_map(|(i, s)| match s {
                JobStatus::Failed(msg) => Some((i, msg.as_str())),
                _ => None,
            })
            .collect()
    }

    /// キャンセルされたジョブの数
    pub fn cancelled_count(&self) -> usize {
        self.statuses
            .iter()
            .filter(|s| **s == JobStatus::Cancelled)
            .count()
    }

    /// すべてのジョブが正常終了したかどうかを判定
    pub fn is_success(&self) -> bool {
        self.statuses.iter().all(|s| *s == JobStatus::Done)
    }
}

/// 実行中のバッチへのハンドル
///
/// イベントの受信・キャンセル要求・完了待ちを提供します。ハンドルを
/// ドロップしてもワーカーは停止しません（デタッチされます）。
#[derive(Debug)]
pub struct BatchHandle {
    /// 状態遷移イベントの受信側
    events: Receiver<BatchEvent>,

    /// キャンセルフラグ（ワーカーと共有）
    cancel_flag: Arc<AtomicBool>,

    /// ワーカースレッドのハンドル
    worker: JoinHandle<BatchSummary>,
}

impl BatchHandle {
    /// キャンセルを要求する
    ///
    /// 実行中のジョブは完了まで継続されます。未実行のジョブは
    /// `JobStatus::Cancelled`になります。
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::SeqCst);
    }

    /// イベント受信側への参照を取得
    ///
    /// ワーカーが1件処理するたびに`Running`と終了状態（`Done`・
    /// `Failed`・`Cancelled`）のイベントが届きます。
    pub fn events(&self) -> &Receiver<BatchEvent> {
        &self.events
    }

    /// バッチの完了を待ち、最終結果を取得する
    pub fn wait(self) -> BatchSummary {
        self.worker
            .join()
            .expect("batch worker thread panicked")
    }
}

/// ジョブのリストをバックグラウンドで順次実行する
///
/// # 引数
///
/// * `converter` - 全ジョブに適用される変換器（設定を共有）
/// * `jobs` - 投入順に実行されるジョブのリスト
///
/// # 実行モデル
///
/// ワーカースレッドは1本だけ生成され、ジョブを投入順に1件ずつ
/// 処理します。各ジョブの開始前にキャンセルフラグを判定し、要求が
/// あれば残りのジョブをすべて`Cancelled`として終了します。ジョブの
/// 失敗はエラーメッセージとして記録され、後続のジョブは継続されます。
///
/// # 使用例
///
/// ```rust,no_run
/// use tabzero::{ConverterBuilder, ConversionJob, run_batch};
///
/// # fn main() -> Result<(), tabzero::ConvertError> {
/// let converter = ConverterBuilder::new().build()?;
/// let jobs = vec![
///     ConversionJob::new("a.csv", "a.xlsx"),
///     ConversionJob::new("b.csv", "b.xlsx"),
/// ];
///
/// let handle = run_batch(converter, jobs);
/// let summary = handle.wait();
/// assert_eq!(summary.statuses.len(), 2);
/// # Ok(())
/// # }
/// ```
pub fn run_batch(converter: Converter, jobs: Vec<ConversionJob>) -> BatchHandle {
    let (tx, rx) = mpsc::channel();
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let worker_flag = Arc::clone(&cancel_flag);

    let worker = std::thread::spawn(move || {
        let mut statuses = vec![JobStatus::Pending; jobs.len()];

        for (index, job) in jobs.iter().enumerate() {
            if worker_flag.load(Ordering::SeqCst) {
                statuses[index] = JobStatus::Cancelled;
                // 受信側がドロップ済みでも処理は続行する
                let _ = tx.send(BatchEvent {
                    index,
                    input: job.input.clone(),
                    status: JobStatus::Cancelled,
                });
                continue;
            }

            statuses[index] = JobStatus::Running;
            let _ = tx.send(BatchEvent {
                index,
                input: job.input.clone(),
                status: JobStatus::Running,
            });

            let status = match converter.convert(&job.input, &job.output) {
                Ok(()) => JobStatus::Done,
                Err(e) => JobStatus::Failed(e.to_string()),
            };

            statuses[index] = status.clone();
            let _ = tx.send(BatchEvent {
                index,
                input: job.input.clone(),
                status,
            });
        }

        BatchSummary { statuses }
    });

    BatchHandle {
        events: rx,
        cancel_flag,
        worker,
    }
}
