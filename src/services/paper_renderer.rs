//! 试卷排版服务 - 业务能力层
//!
//! 把已选题目排成双语（英语 / 乌尔都语）纸面版式，只生成文本，不关心输出到哪里

use crate::models::{PaperHeader, PaperTotals, Question, QuestionKind, QuestionType};

/// 分页符
pub const PAGE_BREAK: char = '\u{000C}';

const MCQ_NO_ANSWER: &str = "See detailed answer key";

/// 答案表中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerKeyRow {
    pub number: usize,
    pub answer: String,
}

/// 试卷排版服务
pub struct PaperRenderer {
    dual_medium: bool,
}

impl PaperRenderer {
    pub fn new(dual_medium: bool) -> Self {
        Self { dual_medium }
    }

    /// 导出用的完整试卷：题目页 + 单独一页答案表
    pub fn render_document(&self, header: &PaperHeader, selection: &[Question], totals: &PaperTotals) -> String {
        let mut out = self.render_header(header, totals);
        out.push_str(&self.render_sections(selection, false));
        out.push(PAGE_BREAK);
        out.push('\n');
        out.push_str(&render_answer_key(&answer_key(selection)));
        out
    }

    /// 预览：题目下附带参考答案与答题要点，末尾附答案表
    pub fn render_preview(&self, header: &PaperHeader, selection: &[Question], totals: &PaperTotals) -> String {
        let mut out = self.render_header(header, totals);
        out.push_str(&self.render_sections(selection, true));
        out.push('\n');
        out.push_str(&render_answer_key(&answer_key(selection)));
        out
    }

    fn render_header(&self, header: &PaperHeader, totals: &PaperTotals) -> String {
        let title = header.title();
        let mut out = String::new();
        out.push_str(&format!("{:^72}\n", title));
        out.push_str(&format!("{}\n", "=".repeat(72)));
        out.push_str(&format!("Total Marks: {}\n", totals.total_marks));
        if !header.chapters.is_empty() {
            out.push_str(&format!("Chapters: {}\n", header.chapters.join(", ")));
        }
        out.push('\n');
        out
    }

    /// 按选择题、简答题、论述题的顺序输出非空大题，大题编号连续，小题编号每题重新开始
    pub fn render_sections(&self, selection: &[Question], show_answers: bool) -> String {
        let mut out = String::new();
        let mut section_number = 1;

        for question_type in QuestionType::ALL {
            let questions: Vec<&Question> = selection
                .iter()
                .filter(|q| q.question_type() == question_type)
                .collect();
            if questions.is_empty() {
                continue;
            }

            out.push_str(&format!(
                "Q{}. {}\n\n",
                section_number,
                question_type.section_heading()
            ));

            for (index, question) in questions.iter().enumerate() {
                for line in self.render_question(question, index, show_answers) {
                    out.push_str(&line);
                    out.push('\n');
                }
                out.push('\n');
            }

            section_number += 1;
        }

        out
    }

    /// 单道题目的行
    pub fn render_question(&self, question: &Question, index: usize, show_answers: bool) -> Vec<String> {
        let number = index + 1;
        let mut lines = vec![format!("{}. {} ({} Marks)", number, question.english, question.marks)];
        if self.dual_medium {
            // 乌尔都语从右往左书写，编号放在行尾
            lines.push(format!("{} .{}", question.urdu, number));
        }

        match &question.kind {
            QuestionKind::Mcq { options, .. } => {
                for option in options {
                    if self.dual_medium {
                        lines.push(format!(
                            "    {}) {}    {} ({}",
                            option.value, option.english, option.urdu, option.value
                        ));
                    } else {
                        lines.push(format!("    {}) {}", option.value, option.english));
                    }
                }
            }
            QuestionKind::Short { answer } | QuestionKind::Long { answer, .. } if show_answers => {
                lines.push(format!("    Answer: {}", answer.english));
                if self.dual_medium {
                    lines.push(format!("    :جواب {}", answer.urdu));
                }
            }
            _ => {}
        }

        if show_answers {
            if let QuestionKind::Long {
                outline: Some(outline),
                ..
            } = &question.kind
            {
                lines.push("    Outline:".to_string());
                lines.extend(outline.english.iter().map(|p| format!("      • {}", p)));
                if self.dual_medium {
                    lines.push("    :خاکہ".to_string());
                    lines.extend(outline.urdu.iter().map(|p| format!("      • {}", p)));
                }
            }
        }

        lines
    }
}

/// 答案表，编号贯穿整份试卷
pub fn answer_key(selection: &[Question]) -> Vec<AnswerKeyRow> {
    selection
        .iter()
        .enumerate()
        .map(|(i, q)| AnswerKeyRow {
            number: i + 1,
            answer: q
                .correct_value()
                .map(str::to_string)
                .unwrap_or_else(|| MCQ_NO_ANSWER.to_string()),
        })
        .collect()
}

fn render_answer_key(rows: &[AnswerKeyRow]) -> String {
    let mut out = format!("{:^72}\n", "Answer Key");
    out.push_str(&format!("{:<14}| {}\n", "Question No.", "Answer"));
    out.push_str(&format!("{}+{}\n", "-".repeat(14), "-".repeat(30)));
    for row in rows {
        out.push_str(&format!("{:<14}| {}\n", row.number, row.answer));
    }
    out
}
