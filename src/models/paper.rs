use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::grade::Grade;
use crate::models::question::{Question, QuestionType};
use crate::models::subject::Subject;

/// 试卷抬头信息：科目、年级与选用章节
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperHeader {
    pub subject: Subject,
    pub grade: Grade,
    pub chapters: Vec<String>,
}

impl PaperHeader {
    pub fn new(subject: Subject, grade: Grade, chapters: Vec<String>) -> Self {
        Self {
            subject,
            grade,
            chapters,
        }
    }

    /// 例如 `Biology Paper - 9th`
    pub fn title(&self) -> String {
        format!("{} Paper - {}", self.subject.name(), self.grade.label())
    }
}

/// 导出得到的试卷文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedArtifact {
    pub file_name: String,
    /// 文件位置（本地路径）
    pub uri: String,
    pub bytes_written: usize,
}

/// 已保存试卷的元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperMetadata {
    pub grade: String,
    pub subject: String,
    #[serde(alias = "chapter")]
    pub chapters: Vec<String>,
    pub question_types: Vec<QuestionType>,
    pub total_questions: usize,
}

/// 已保存的试卷，创建后不可变
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPaper {
    pub id: String,
    pub title: String,
    pub file_name: String,
    pub artifact: String,
    pub created_at: DateTime<Utc>,
    pub metadata: PaperMetadata,
}

impl SavedPaper {
    /// 根据导出结果与最终选题生成试卷记录
    pub fn from_export(header: &PaperHeader, selection: &[Question], artifact: &ExportedArtifact) -> Self {
        let mut question_types: Vec<QuestionType> = Vec::new();
        for ty in selection.iter().map(Question::question_type) {
            if !question_types.contains(&ty) {
                question_types.push(ty);
            }
        }

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: header.title(),
            file_name: artifact.file_name.clone(),
            artifact: artifact.uri.clone(),
            created_at: Utc::now(),
            metadata: PaperMetadata {
                grade: header.grade.label().to_string(),
                subject: header.subject.name().to_string(),
                chapters: header.chapters.clone(),
                question_types,
                total_questions: selection.len(),
            },
        }
    }
}

impl std::fmt::Display for SavedPaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let types: Vec<&str> = self.metadata.question_types.iter().map(|t| t.key()).collect();
        write!(
            f,
            "{} [{}] 创建于 {} | 章节: {} | 题型: {} | 题数: {}",
            self.title,
            self.id,
            self.created_at.format("%Y-%m-%d"),
            self.metadata.chapters.join(", "),
            types.join(", "),
            self.metadata.total_questions
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::{BilingualText, QuestionKind};

    fn short(id: &str) -> Question {
        Question {
            id: id.to_string(),
            english: "Define biology.".to_string(),
            urdu: "حیاتیات کی تعریف کریں۔".to_string(),
            marks: 2,
            kind: QuestionKind::Short {
                answer: BilingualText::default(),
            },
        }
    }

    #[test]
    fn saved_paper_metadata_from_selection() {
        let header = PaperHeader::new(
            Subject::Biology,
            Grade::Ninth,
            vec!["CHAP 1 Introduction to Biology".to_string()],
        );
        let artifact = ExportedArtifact {
            file_name: "biology-9th-1.txt".to_string(),
            uri: "out/biology-9th-1.txt".to_string(),
            bytes_written: 10,
        };

        let paper = SavedPaper::from_export(&header, &[short("1"), short("2")], &artifact);

        assert_eq!(paper.title, "Biology Paper - 9th");
        assert_eq!(paper.metadata.grade, "9th");
        assert_eq!(paper.metadata.subject, "Biology");
        assert_eq!(paper.metadata.question_types, vec![QuestionType::Short]);
        assert_eq!(paper.metadata.total_questions, 2);
        assert_eq!(paper.artifact, "out/biology-9th-1.txt");
    }

    #[test]
    fn metadata_accepts_legacy_chapter_key() {
        let meta: PaperMetadata = serde_json::from_value(serde_json::json!({
            "grade": "9th",
            "subject": "Biology",
            "chapter": ["CHAP 2 Biodiversity"],
            "questionTypes": ["mcq"],
            "totalQuestions": 5
        }))
        .unwrap();
        assert_eq!(meta.chapters, vec!["CHAP 2 Biodiversity".to_string()]);
    }
}
