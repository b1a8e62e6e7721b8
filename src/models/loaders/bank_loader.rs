use crate::models::bank::{count_entries, merge_bank_files, BankFile};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 JSON 或 TOML 文件加载题库
pub async fn load_bank_file(bank_file_path: &Path) -> Result<BankFile> {
    let content = fs::read_to_string(bank_file_path)
        .await
        .with_context(|| format!("无法读取题库文件: {}", bank_file_path.display()))?;

    let bank: BankFile = match bank_file_path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&content)
            .with_context(|| format!("无法解析TOML文件: {}", bank_file_path.display()))?,
        _ => serde_json::from_str(&content)
            .with_context(|| format!("无法解析JSON文件: {}", bank_file_path.display()))?,
    };

    Ok(bank)
}

/// 从文件夹中加载所有题库文件并合并
pub async fn load_bank_folder(folder_path: &str) -> Result<BankFile> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("json") | Some("toml")
        ) {
            paths.push(path);
        }
    }

    // 按文件名排序，保证合并顺序稳定
    paths.sort();

    let mut bank = BankFile::new();
    for path in paths {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_bank_file(&path).await {
            Ok(file) => {
                tracing::info!("成功加载 {} 道题目", count_entries(&file));
                merge_bank_files(&mut bank, file);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {:#}", path.display(), e);
            }
        }
    }

    Ok(bank)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("paper-bank-{}-{}", tag, uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn loads_json_and_toml_and_skips_broken_files() {
        let dir = temp_dir("mixed");

        std::fs::write(
            dir.join("a.json"),
            r#"{ "biology-9th": { "CHAP 1": { "mcq": [
                { "id": 1, "english": "Q", "urdu": "س",
                  "options": [{ "value": "a", "english": "A", "urdu": "ا" }],
                  "correct": "a" }
            ] } } }"#,
        )
        .unwrap();

        std::fs::write(
            dir.join("b.toml"),
            r#"
[[biology-9th."CHAP 2".short]]
id = "s1"
english = "Define cell."
urdu = "خلیہ کی تعریف کریں۔"
answer = { english = "Unit of life.", urdu = "زندگی کی اکائی۔" }
"#,
        )
        .unwrap();

        std::fs::write(dir.join("c.json"), "{ not json").unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let bank = load_bank_folder(dir.to_str().unwrap()).await.unwrap();

        let biology = &bank["biology-9th"];
        assert_eq!(biology["CHAP 1"].mcq.len(), 1);
        assert_eq!(biology["CHAP 2"].short.len(), 1);
        assert_eq!(count_entries(&bank), 2);

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn entry_without_urdu_does_not_reject_the_file() {
        let dir = temp_dir("partial");
        let path = dir.join("partial.json");

        std::fs::write(
            &path,
            r#"{ "biology-9th": { "CHAP 1": { "short": [
                { "id": "s1", "english": "Define cell.", "urdu": "خلیہ کی تعریف کریں۔",
                  "answer": { "english": "Unit of life.", "urdu": "زندگی کی اکائی۔" } },
                { "id": "s2", "english": "Define tissue.",
                  "answer": { "english": "Group of cells.", "urdu": "خلیوں کا گروہ۔" } }
            ] } } }"#,
        )
        .unwrap();

        let file = load_bank_file(&path).await.unwrap();
        assert_eq!(count_entries(&file), 2);

        // 缺少乌尔都语文本的条目在建库时被丢弃，其余保留
        let bank = crate::clients::StaticQuestionBank::from_bank_file(file);
        assert_eq!(bank.question_count(), 1);

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn missing_folder_is_an_error() {
        let result = load_bank_folder("/definitely/not/here").await;
        assert!(result.is_err());
    }
}
