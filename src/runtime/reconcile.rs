//! 后台清理已过期的班干部任命
//!
//! 列表加载时过滤掉的过期记录在这里逐条发出 DELETE，互不等待；
//! 失败只记录日志并计入报告，不影响列表本身。

use futures_util::future::join_all;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::client::ApiClient;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub deleted: Vec<i64>,
    pub failed: Vec<(i64, String)>,
}

impl ReconcileReport {
    pub fn attempted(&self) -> usize {
        self.deleted.len() + self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// 并发删除给定 ID，等待全部完成后返回汇总
pub async fn delete_expired(client: &ApiClient, endpoint: &str, ids: &[i64]) -> ReconcileReport {
    let requests = ids.iter().map(|&id| async move {
        let result = client.delete(&format!("{endpoint}/{id}")).await;
        (id, result)
    });

    let mut report = ReconcileReport::default();
    for (id, result) in join_all(requests).await {
        match result {
            Ok(()) => report.deleted.push(id),
            Err(e) => {
                warn!("Failed to delete expired record {}/{}: {}", endpoint, id, e);
                report.failed.push((id, e.message().to_string()));
            }
        }
    }

    info!(
        "Expired record cleanup on {}: {} deleted, {} failed",
        endpoint,
        report.deleted.len(),
        report.failed.len()
    );
    report
}

/// 在后台启动清理任务，返回句柄供调用方按需等待
pub fn spawn_expired_cleanup(
    client: ApiClient,
    endpoint: String,
    ids: Vec<i64>,
) -> JoinHandle<ReconcileReport> {
    tokio::spawn(async move { delete_expired(&client, &endpoint, &ids).await })
}
