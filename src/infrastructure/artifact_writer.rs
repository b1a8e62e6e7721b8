//! 试卷文件写入 - 基础设施层
//!
//! 只负责"把渲染好的试卷写到输出目录"，不关心内容

use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult, ExportError};
use crate::models::ExportedArtifact;

/// 试卷文件写入器
pub struct ArtifactWriter {
    output_dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// 写入文件，失败时不会留下半成品
    pub async fn write(&self, file_name: &str, content: &[u8]) -> AppResult<ExportedArtifact> {
        fs::create_dir_all(&self.output_dir).await.map_err(|source| {
            AppError::Export(ExportError::OutputDirUnavailable {
                path: self.output_dir.display().to_string(),
                source,
            })
        })?;

        let target = self.output_dir.join(file_name);
        let partial = self.output_dir.join(format!(".{}.partial", file_name));
        let target_display = target.display().to_string();

        debug!("写入试卷文件: {} ({} 字节)", target_display, content.len());

        if let Err(e) = fs::write(&partial, content).await {
            let _ = fs::remove_file(&partial).await;
            return Err(AppError::export_write_failed(&target_display, e));
        }
        if let Err(e) = fs::rename(&partial, &target).await {
            let _ = fs::remove_file(&partial).await;
            return Err(AppError::export_write_failed(&target_display, e));
        }

        Ok(ExportedArtifact {
            file_name: file_name.to_string(),
            uri: target_display,
            bytes_written: content.len(),
        })
    }

    /// 删除已写出的文件，失败只记录警告
    pub async fn remove(&self, artifact: &ExportedArtifact) {
        match fs::remove_file(&artifact.uri).await {
            Ok(()) => debug!("已删除试卷文件: {}", artifact.uri),
            Err(e) => warn!("⚠️ 无法删除试卷文件 {}: {}", artifact.uri, e),
        }
    }
}
