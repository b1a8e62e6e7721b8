/// 科目枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    /// 生物
    Biology,
    /// 物理
    Physics,
    /// 化学
    Chemistry,
    /// 数学
    Mathematics,
    /// 英语
    English,
    /// 乌尔都语
    Urdu,
    /// 计算机
    Computer,
}

impl Subject {
    /// 题库键名（小写）
    pub fn key(self) -> &'static str {
        match self {
            Subject::Biology => "biology",
            Subject::Physics => "physics",
            Subject::Chemistry => "chemistry",
            Subject::Mathematics => "mathematics",
            Subject::English => "english",
            Subject::Urdu => "urdu",
            Subject::Computer => "computer",
        }
    }

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            Subject::Biology => "Biology",
            Subject::Physics => "Physics",
            Subject::Chemistry => "Chemistry",
            Subject::Mathematics => "Mathematics",
            Subject::English => "English",
            Subject::Urdu => "Urdu",
            Subject::Computer => "Computer Science",
        }
    }

    /// 尝试从字符串解析科目（精确匹配，忽略大小写）
    pub fn from_key(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "biology" | "bio" => Some(Subject::Biology),
            "physics" | "phy" => Some(Subject::Physics),
            "chemistry" | "chem" => Some(Subject::Chemistry),
            "mathematics" | "math" | "maths" => Some(Subject::Mathematics),
            "english" | "eng" => Some(Subject::English),
            "urdu" => Some(Subject::Urdu),
            "computer" | "computer science" | "cs" => Some(Subject::Computer),
            _ => None,
        }
    }

    /// 智能查找科目（支持模糊匹配）
    pub fn find(s: &str) -> Option<Self> {
        if let Some(subject) = Self::from_key(s) {
            return Some(subject);
        }

        let s_lower = s.to_lowercase();
        [
            Subject::Biology,
            Subject::Physics,
            Subject::Chemistry,
            Subject::Mathematics,
            Subject::English,
            Subject::Urdu,
            Subject::Computer,
        ]
        .into_iter()
        .find(|subject| s_lower.contains(subject.key()))
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
