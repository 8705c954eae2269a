//! 중복 제거 원장 -- 이미 집계한 라인의 영속 집합
//!
//! 원장 파일은 한 줄에 하나씩 원본 라인 텍스트를 담는 append-only 텍스트 파일입니다.
//! 스크레이프 시작 시 [`DedupLedger::load`]로 전체를 메모리에 읽고,
//! 스크레이프 끝에 [`DedupLedger::commit`]으로 새 항목을 덧붙인 뒤 디스크까지 동기화합니다.
//!
//! 커밋에 실패한 항목은 메모리에 남아 `contains`에서 계속 "이미 집계됨"으로 보이며,
//! 다음 커밋 때 새 항목과 함께 다시 기록을 시도합니다.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::error::AlertPipelineError;

/// 중복 제거 원장
#[derive(Debug)]
pub struct DedupLedger {
    /// 원장 파일 경로 (`None`이면 파일 없이 메모리에만 유지)
    path: Option<PathBuf>,
    /// 이미 집계된 라인 식별자
    seen: HashSet<String>,
    /// 집계되었지만 아직 파일에 기록되지 못한 식별자 (기록 순서 유지)
    pending: Vec<String>,
    /// 파일 끝이 개행으로 끝나지 않음 (기록 도중 잘린 꼬리)
    needs_separator: bool,
}

impl DedupLedger {
    /// 파일 기반 원장을 생성합니다. 파일은 [`load`](Self::load) 전까지 읽지 않습니다.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            seen: HashSet::new(),
            pending: Vec::new(),
            needs_separator: false,
        }
    }

    /// 파일 없이 메모리에서만 동작하는 원장을 생성합니다 (`--dry-run`).
    pub fn ephemeral() -> Self {
        Self {
            path: None,
            seen: HashSet::new(),
            pending: Vec::new(),
            needs_separator: false,
        }
    }

    /// 원장 파일 경로
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// 원장 파일 전체를 메모리 집합으로 읽어들이고 항목 수를 반환합니다.
    ///
    /// 파일이 없으면 첫 실행으로 보고 빈 집합에서 시작합니다.
    /// 아직 기록되지 못한 항목은 읽은 집합에 다시 합쳐집니다.
    pub async fn load(&mut self) -> Result<usize, AlertPipelineError> {
        let Some(path) = &self.path else {
            return Ok(self.seen.len());
        };

        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "ledger not found, starting empty");
                String::new()
            }
            Err(e) => {
                return Err(AlertPipelineError::LedgerUnavailable {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        };

        self.needs_separator = !contents.is_empty() && !contents.ends_with('\n');
        self.seen = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect();
        self.seen.extend(self.pending.iter().cloned());

        tracing::debug!(
            path = %path.display(),
            entries = self.seen.len(),
            pending = self.pending.len(),
            "ledger loaded"
        );
        Ok(self.seen.len())
    }

    /// 식별자가 이미 집계되었는지 확인합니다.
    pub fn contains(&self, identity: &str) -> bool {
        self.seen.contains(identity)
    }

    /// 새 식별자를 원장에 덧붙이고 디스크까지 동기화합니다.
    ///
    /// 이전 커밋에서 남은 항목도 함께 기록하며, 성공 시 기록한 항목 수를 반환합니다.
    /// 실패하면 모든 항목이 메모리에 남고 [`AlertPipelineError::LedgerWrite`]를 반환합니다.
    /// 어느 경우든 새 식별자는 메모리 집합에 합쳐집니다.
    pub async fn commit(&mut self, new: Vec<String>) -> Result<usize, AlertPipelineError> {
        self.seen.extend(new.iter().cloned());

        let mut batch = std::mem::take(&mut self.pending);
        batch.extend(new);
        if batch.is_empty() {
            return Ok(0);
        }

        let Some(path) = self.path.clone() else {
            return Ok(batch.len());
        };

        match self.append(&path, &batch).await {
            Ok(()) => {
                self.needs_separator = false;
                tracing::debug!(path = %path.display(), written = batch.len(), "ledger committed");
                Ok(batch.len())
            }
            Err(e) => {
                let pending = batch.len();
                self.pending = batch;
                Err(AlertPipelineError::LedgerWrite {
                    path: path.display().to_string(),
                    pending,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// 한 번의 쓰기로 항목들을 덧붙이고 `fsync`합니다.
    async fn append(&self, path: &Path, entries: &[String]) -> std::io::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut buf = String::with_capacity(entries.iter().map(|e| e.len() + 1).sum::<usize>() + 1);
        if self.needs_separator {
            buf.push('\n');
        }
        for entry in entries {
            buf.push_str(entry);
            buf.push('\n');
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        file.write_all(buf.as_bytes()).await?;
        file.flush().await?;
        file.sync_data().await?;
        Ok(())
    }

    /// 메모리에 있는 식별자 수
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// 식별자가 하나도 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// 파일에 기록되지 못하고 남은 식별자 수
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
