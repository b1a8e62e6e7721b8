/// 年级枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Grade {
    /// 九年级
    Ninth,
    /// 十年级
    Tenth,
    /// 高一（Intermediate Part I）
    InterI,
    /// 高二（Intermediate Part II）
    InterII,
}

impl Grade {
    /// 题库键名
    pub fn key(self) -> &'static str {
        match self {
            Grade::Ninth => "9th",
            Grade::Tenth => "10th",
            Grade::InterI => "inter-1",
            Grade::InterII => "inter-2",
        }
    }

    /// 显示名称，同时作为已存试卷的分组键
    pub fn label(self) -> &'static str {
        match self {
            Grade::Ninth => "9th",
            Grade::Tenth => "10th",
            Grade::InterI => "Inter-I",
            Grade::InterII => "Inter-II",
        }
    }

    /// 从字符串解析年级
    pub fn from_key(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "9th" | "9" | "ninth" => Some(Grade::Ninth),
            "10th" | "10" | "tenth" => Some(Grade::Tenth),
            "inter-1" | "inter-i" | "inter1" | "11th" => Some(Grade::InterI),
            "inter-2" | "inter-ii" | "inter2" | "12th" => Some(Grade::InterII),
            _ => None,
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_and_labels() {
        assert_eq!(Grade::from_key("9TH"), Some(Grade::Ninth));
        assert_eq!(Grade::from_key("INTER-I"), Some(Grade::InterI));
        assert_eq!(Grade::InterII.key(), "inter-2");
        assert_eq!(Grade::InterII.label(), "Inter-II");
        assert_eq!(Grade::from_key("kindergarten"), None);
    }
}
