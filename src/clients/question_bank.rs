//! 题库客户端
//!
//! 题库对组卷逻辑而言是只读的外部协作者，只暴露"按条件取题"的能力

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::AppResult;
use crate::models::{bank_key, BankFile, Question, QuestionType};

/// 题库查询能力
///
/// 返回的题目数量可能少于 `count`（库存不足），由调用方判定是否满足需求
pub trait QuestionBank {
    fn query(
        &self,
        subject: &str,
        grade: &str,
        chapters: &[String],
        count: usize,
        question_type: QuestionType,
    ) -> impl Future<Output = AppResult<Vec<Question>>> + Send;
}

type ChapterQuestions = HashMap<QuestionType, Vec<Question>>;

/// 基于静态题库文件的题库
///
/// 查询时汇总所选章节中该题型的全部题目，打乱后截取所需数量
pub struct StaticQuestionBank {
    banks: HashMap<String, BTreeMap<String, ChapterQuestions>>,
    latency: Duration,
    rng: Mutex<StdRng>,
}

impl StaticQuestionBank {
    /// 从题库文件内容构建，丢弃字段不完整的题目
    pub fn from_bank_file(file: BankFile) -> Self {
        let mut banks = HashMap::new();

        for (key, chapters) in file {
            let mut chapter_map = BTreeMap::new();
            for (chapter, entries) in chapters {
                let mut by_type: ChapterQuestions = HashMap::new();
                for question_type in QuestionType::ALL {
                    let questions: Vec<Question> = entries
                        .entries(question_type)
                        .iter()
                        .cloned()
                        .filter_map(|entry| {
                            let id = entry.id.clone();
                            let question = entry.into_question(question_type);
                            if question.is_none() {
                                warn!(
                                    "⚠️ 题库 {} / {} 中的{}题 {} 字段不完整，已忽略",
                                    key, chapter, question_type, id
                                );
                            }
                            question
                        })
                        .collect();
                    by_type.insert(question_type, questions);
                }
                chapter_map.insert(chapter, by_type);
            }
            banks.insert(key, chapter_map);
        }

        Self {
            banks,
            latency: Duration::ZERO,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// 设置模拟查询延迟
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// 使用固定种子打乱题目
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// 题库数量（科目-年级）
    pub fn bank_count(&self) -> usize {
        self.banks.len()
    }

    /// 题目总数
    pub fn question_count(&self) -> usize {
        self.banks
            .values()
            .flat_map(|chapters| chapters.values())
            .flat_map(|by_type| by_type.values())
            .map(Vec::len)
            .sum()
    }

    /// 某科目年级下的章节列表
    pub fn chapters(&self, subject: &str, grade: &str) -> Vec<String> {
        self.banks
            .get(&bank_key(subject, grade))
            .map(|chapters| chapters.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// 某科目年级、章节范围内某题型的库存
    pub fn available(&self, subject: &str, grade: &str, chapters: &[String], question_type: QuestionType) -> usize {
        self.collect(subject, grade, chapters, question_type).len()
    }

    fn collect(&self, subject: &str, grade: &str, chapters: &[String], question_type: QuestionType) -> Vec<Question> {
        let Some(bank) = self.banks.get(&bank_key(subject, grade)) else {
            return Vec::new();
        };

        chapters
            .iter()
            .filter_map(|chapter| bank.get(chapter))
            .filter_map(|by_type| by_type.get(&question_type))
            .flat_map(|questions| questions.iter().cloned())
            .collect()
    }
}

impl QuestionBank for StaticQuestionBank {
    async fn query(
        &self,
        subject: &str,
        grade: &str,
        chapters: &[String],
        count: usize,
        question_type: QuestionType,
    ) -> AppResult<Vec<Question>> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let mut questions = self.collect(subject, grade, chapters, question_type);
        {
            let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            questions.shuffle(&mut *rng);
        }
        questions.truncate(count);

        debug!(
            "题库查询 {} | 题型 {} | 需要 {} 道, 返回 {} 道",
            bank_key(subject, grade),
            question_type,
            count,
            questions.len()
        );

        Ok(questions)
    }
}
