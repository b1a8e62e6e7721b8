use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::question::{BankEntry, QuestionType};

/// 单个章节下按题型划分的题目
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChapterEntries {
    #[serde(default)]
    pub mcq: Vec<BankEntry>,
    #[serde(default)]
    pub short: Vec<BankEntry>,
    #[serde(default)]
    pub long: Vec<BankEntry>,
}

impl ChapterEntries {
    pub fn entries(&self, question_type: QuestionType) -> &[BankEntry] {
        match question_type {
            QuestionType::Mcq => &self.mcq,
            QuestionType::Short => &self.short,
            QuestionType::Long => &self.long,
        }
    }

    pub fn extend(&mut self, other: ChapterEntries) {
        self.mcq.extend(other.mcq);
        self.short.extend(other.short);
        self.long.extend(other.long);
    }

    pub fn len(&self) -> usize {
        self.mcq.len() + self.short.len() + self.long.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 题库文件内容：`科目-年级` → 章节 → 题型 → 题目列表
pub type BankFile = BTreeMap<String, BTreeMap<String, ChapterEntries>>;

/// 题库键，例如 `biology-9th`
pub fn bank_key(subject: &str, grade: &str) -> String {
    format!("{}-{}", subject, grade)
}

/// 合并两个题库文件，同名章节的题目依次追加
pub fn merge_bank_files(target: &mut BankFile, other: BankFile) {
    for (key, chapters) in other {
        let bank = target.entry(key).or_default();
        for (chapter, entries) in chapters {
            bank.entry(chapter).or_default().extend(entries);
        }
    }
}

/// 题库中的题目总数
pub fn count_entries(bank: &BankFile) -> usize {
    bank.values()
        .flat_map(|chapters| chapters.values())
        .map(ChapterEntries::len)
        .sum()
}
