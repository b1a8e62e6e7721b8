use serde::{Deserialize, Serialize};

/// 题型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    /// 选择题
    Mcq,
    /// 简答题
    Short,
    /// 论述题
    Long,
}

impl QuestionType {
    pub const ALL: [QuestionType; 3] = [QuestionType::Mcq, QuestionType::Short, QuestionType::Long];

    /// 题库中的键名
    pub fn key(self) -> &'static str {
        match self {
            QuestionType::Mcq => "mcq",
            QuestionType::Short => "short",
            QuestionType::Long => "long",
        }
    }

    /// 统计提示中使用的名称
    pub fn plural_label(self) -> &'static str {
        match self {
            QuestionType::Mcq => "MCQs",
            QuestionType::Short => "Short",
            QuestionType::Long => "Long",
        }
    }

    /// 试卷中该大题的标题
    pub fn section_heading(self) -> &'static str {
        match self {
            QuestionType::Mcq => "Choose the correct answer:",
            QuestionType::Short => "Answer the following short questions:",
            QuestionType::Long => "Answer the following in detail:",
        }
    }

    /// 从字符串解析题型
    pub fn from_key(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mcq" | "mcqs" | "multiple choice" => Some(QuestionType::Mcq),
            "short" => Some(QuestionType::Short),
            "long" => Some(QuestionType::Long),
            _ => None,
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// 选择题选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McqOption {
    /// 选项标号（如 a / b / c / d）
    pub value: String,
    pub english: String,
    pub urdu: String,
}

/// 双语文本
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BilingualText {
    pub english: String,
    pub urdu: String,
}

/// 论述题答题要点
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    #[serde(default)]
    pub english: Vec<String>,
    #[serde(default)]
    pub urdu: Vec<String>,
}

/// 题型相关字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QuestionKind {
    Mcq {
        options: Vec<McqOption>,
        correct: String,
    },
    Short {
        answer: BilingualText,
    },
    Long {
        answer: BilingualText,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        outline: Option<Outline>,
    },
}

/// 题目
///
/// `marks` 在入库时为 0，选题时才按分区赋值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub english: String,
    pub urdu: String,
    #[serde(default)]
    pub marks: u32,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

impl Question {
    pub fn question_type(&self) -> QuestionType {
        match self.kind {
            QuestionKind::Mcq { .. } => QuestionType::Mcq,
            QuestionKind::Short { .. } => QuestionType::Short,
            QuestionKind::Long { .. } => QuestionType::Long,
        }
    }

    /// 生成一份赋好分值的副本
    pub fn with_marks(&self, marks: u32) -> Self {
        Self {
            marks,
            ..self.clone()
        }
    }

    /// 选择题的正确选项
    pub fn correct_value(&self) -> Option<&str> {
        match &self.kind {
            QuestionKind::Mcq { correct, .. } => Some(correct),
            _ => None,
        }
    }

    /// 简答/论述题的参考答案
    pub fn answer(&self) -> Option<&BilingualText> {
        match &self.kind {
            QuestionKind::Short { answer } | QuestionKind::Long { answer, .. } => Some(answer),
            QuestionKind::Mcq { .. } => None,
        }
    }

    /// 选择题的正确选项必须是某个选项的标号
    pub fn is_well_formed(&self) -> bool {
        match &self.kind {
            QuestionKind::Mcq { options, correct } => options.iter().any(|o| &o.value == correct),
            _ => true,
        }
    }
}

// Helper function to deserialize id as either string or integer
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer question id")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

/// 题库中的原始题目条目
///
/// 题型由其在题库中的位置决定；缺少该题型必需字段的条目会被丢弃
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BankEntry {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub english: String,
    #[serde(default)]
    pub urdu: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<McqOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<BilingualText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<Outline>,
}

impl BankEntry {
    pub fn into_question(self, question_type: QuestionType) -> Option<Question> {
        if [&self.id, &self.english, &self.urdu].iter().any(|text| text.trim().is_empty()) {
            return None;
        }

        let kind = match question_type {
            QuestionType::Mcq => QuestionKind::Mcq {
                options: self.options?,
                correct: self.correct?,
            },
            QuestionType::Short => QuestionKind::Short {
                answer: self.answer?,
            },
            QuestionType::Long => QuestionKind::Long {
                answer: self.answer?,
                outline: self.outline,
            },
        };

        let question = Question {
            id: self.id,
            english: self.english,
            urdu: self.urdu,
            marks: 0,
            kind,
        };

        question.is_well_formed().then_some(question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mcq_entry(correct: &str) -> BankEntry {
        serde_json::from_value(serde_json::json!({
            "id": 7,
            "english": "Which is the basic unit of life?",
            "urdu": "زندگی کی بنیادی اکائی کون سی ہے؟",
            "options": [
                { "value": "a", "english": "Cell", "urdu": "خلیہ" },
                { "value": "b", "english": "Tissue", "urdu": "بافت" }
            ],
            "correct": correct
        }))
        .unwrap()
    }

    #[test]
    fn numeric_id_is_accepted() {
        let entry = mcq_entry("a");
        assert_eq!(entry.id, "7");
    }

    #[test]
    fn mcq_with_unknown_correct_value_is_dropped() {
        assert!(mcq_entry("a").into_question(QuestionType::Mcq).is_some());
        assert!(mcq_entry("z").into_question(QuestionType::Mcq).is_none());
    }

    #[test]
    fn entry_missing_text_is_dropped() {
        let entry: BankEntry = serde_json::from_value(serde_json::json!({
            "id": "s9",
            "english": "What is a cell?",
            "answer": { "english": "Unit of life.", "urdu": "زندگی کی اکائی۔" }
        }))
        .unwrap();
        assert!(entry.urdu.is_empty());
        assert!(entry.into_question(QuestionType::Short).is_none());

        let entry: BankEntry = serde_json::from_value(serde_json::json!({
            "english": "No id",
            "urdu": "شناخت نہیں",
            "answer": { "english": "-", "urdu": "-" }
        }))
        .unwrap();
        assert!(entry.into_question(QuestionType::Short).is_none());
    }

    #[test]
    fn entry_missing_answer_cannot_be_short() {
        assert!(mcq_entry("a").into_question(QuestionType::Short).is_none());
    }

    #[test]
    fn question_serializes_with_type_tag() {
        let q = mcq_entry("b").into_question(QuestionType::Mcq).unwrap().with_marks(2);
        let value = serde_json::to_value(&q).unwrap();
        assert_eq!(value["type"], "mcq");
        assert_eq!(value["marks"], 2);
        assert_eq!(q.correct_value(), Some("b"));

        let back: Question = serde_json::from_value(value).unwrap();
        assert_eq!(back, q);
    }
}
