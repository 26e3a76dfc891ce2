//! 定时保存队列
//!
//! 每个文件按 `序号 × 间隔` 的延迟依次保存，避免宿主环境把同时发起的
//! 多个下载当作批量下载拦截。队列在后台任务中执行，通过句柄等待完成。

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info};

use crate::error::{AppError, AppResult};
use crate::utils::is_plain_file_name;

/// 单个文件相对队列启动的最长延迟
const MAX_QUEUE_DELAY: Duration = Duration::from_secs(24 * 60 * 60);

/// 一个待保存的文件
#[derive(Debug, Clone)]
pub struct DownloadTask {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// 保存结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    pub saved: Vec<PathBuf>,
    pub failed: Vec<String>,
}

/// 定时保存队列
#[derive(Debug)]
pub struct DownloadQueue {
    interval: Duration,
    tasks: Vec<DownloadTask>,
}

impl DownloadQueue {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            tasks: Vec::new(),
        }
    }

    pub fn push(&mut self, task: DownloadTask) {
        self.tasks.push(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// 启动队列
    ///
    /// 第 `i` 个文件在启动后 `i × interval` 时保存。单个文件保存失败只记录日志，
    /// 不影响后续文件。
    pub fn start(self, target_dir: impl Into<PathBuf>) -> DownloadHandle {
        let target_dir = target_dir.into();
        let total = self.tasks.len();
        let interval = self.interval;

        let join = tokio::spawn(async move {
            let started = Instant::now();
            let mut report = DownloadReport::default();

            for (index, task) in self.tasks.into_iter().enumerate() {
                sleep_until(scheduled_at(started, interval, index)).await;
                match save_file(&target_dir, &task).await {
                    Ok(path) => {
                        debug!("✓ 已保存 ({}/{}): {}", index + 1, total, path.display());
                        report.saved.push(path);
                    }
                    Err(e) => {
                        error!("保存文件失败 {}: {}", task.file_name, e);
                        report.failed.push(task.file_name);
                    }
                }
            }

            info!(
                "📥 逐个保存完成: 成功 {}, 失败 {}",
                report.saved.len(),
                report.failed.len()
            );
            report
        });

        DownloadHandle { join, total }
    }
}

/// 第 `index` 个文件的保存时刻，延迟不超过 `MAX_QUEUE_DELAY`
fn scheduled_at(started: Instant, interval: Duration, index: usize) -> Instant {
    let factor = u32::try_from(index).unwrap_or(u32::MAX);
    started + interval.saturating_mul(factor).min(MAX_QUEUE_DELAY)
}

async fn save_file(target_dir: &Path, task: &DownloadTask) -> std::io::Result<PathBuf> {
    if !is_plain_file_name(&task.file_name) {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("文件名不能包含目录: {}", task.file_name),
        ));
    }
    let path = target_dir.join(&task.file_name);
    tokio::fs::write(&path, &task.bytes).await?;
    Ok(path)
}

/// 队列完成信号
#[derive(Debug)]
pub struct DownloadHandle {
    join: JoinHandle<DownloadReport>,
    total: usize,
}

impl DownloadHandle {
    /// 排队的文件总数
    pub fn total(&self) -> usize {
        self.total
    }

    /// 等待所有文件保存完毕
    pub async fn completed(self) -> AppResult<DownloadReport> {
        self.join
            .await
            .map_err(|e| AppError::Unexpected(format!("保存队列任务异常退出: {}", e)))
    }
}
