use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{AppError, AssemblyError};
use crate::models::question::{Question, QuestionType};

/// 题目分区请求：某一题型的题目数量与每题分值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRequest {
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub count: u32,
    #[serde(rename = "marks")]
    pub marks_per_question: u32,
}

impl SectionRequest {
    /// 创建分区，数量与分值都必须为正
    pub fn new(question_type: QuestionType, count: u32, marks_per_question: u32) -> Result<Self, AppError> {
        if count == 0 || marks_per_question == 0 {
            return Err(AssemblyError::InvalidSection {
                count,
                marks: marks_per_question,
            }
            .into());
        }
        Ok(Self {
            question_type,
            count,
            marks_per_question,
        })
    }

    /// 本分区总分，按 u64 计算不会溢出
    pub fn subtotal(&self) -> u64 {
        u64::from(self.count) * u64::from(self.marks_per_question)
    }
}

impl std::fmt::Display for SectionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} questions × {} marks = {} marks",
            self.question_type.key().to_uppercase(),
            self.count,
            self.marks_per_question,
            self.subtotal()
        )
    }
}

/// 解析 `题型:数量:分值`，例如 `mcq:10:1`
impl FromStr for SectionRequest {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::from(AssemblyError::InvalidSectionSpec { spec: s.to_string() });

        let parts: Vec<&str> = s.trim().split(':').collect();
        let [ty, count, marks] = parts.as_slice() else {
            return Err(invalid());
        };

        let question_type = QuestionType::from_key(ty).ok_or_else(invalid)?;
        let count = count.trim().parse().map_err(|_| invalid())?;
        let marks = marks.trim().parse().map_err(|_| invalid())?;

        Self::new(question_type, count, marks)
    }
}

/// 解析以逗号分隔的多个分区
pub fn parse_sections(spec: &str) -> Result<Vec<SectionRequest>, AppError> {
    spec.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(SectionRequest::from_str)
        .collect()
}

/// 试卷总分与总题数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PaperTotals {
    pub total_marks: u64,
    pub total_questions: u64,
}

/// 按题型汇总请求数量（同题型分区累加），顺序为题型首次出现的顺序
pub fn required_counts(sections: &[SectionRequest]) -> Vec<(QuestionType, usize)> {
    let mut counts: Vec<(QuestionType, usize)> = Vec::new();
    for section in sections {
        match counts.iter_mut().find(|(ty, _)| *ty == section.question_type) {
            Some((_, total)) => *total += section.count as usize,
            None => counts.push((section.question_type, section.count as usize)),
        }
    }
    counts
}

/// 题目集合中各题型的数量
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionSummary {
    pub mcq: usize,
    pub short: usize,
    pub long: usize,
}

impl SelectionSummary {
    pub fn from_questions(questions: &[Question]) -> Self {
        questions
            .iter()
            .fold(Self::default(), |mut acc, q| {
                match q.question_type() {
                    QuestionType::Mcq => acc.mcq += 1,
                    QuestionType::Short => acc.short += 1,
                    QuestionType::Long => acc.long += 1,
                }
                acc
            })
    }

    pub fn count_of(&self, question_type: QuestionType) -> usize {
        match question_type {
            QuestionType::Mcq => self.mcq,
            QuestionType::Short => self.short,
            QuestionType::Long => self.long,
        }
    }

    pub fn total(&self) -> usize {
        self.mcq + self.short + self.long
    }
}

impl std::fmt::Display for SelectionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}, {} {}, {} {}",
            self.mcq,
            QuestionType::Mcq.plural_label(),
            self.short,
            QuestionType::Short.plural_label(),
            self.long,
            QuestionType::Long.plural_label()
        )
    }
}
