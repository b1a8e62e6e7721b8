//! 组卷服务 - 业务能力层
//!
//! 负责把分区请求变成题库查询、校验数量、随机抽题、确认选题与统计总分。
//! 除取题外都是纯函数，不持有任何会话状态。

use futures::future::try_join_all;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::clients::QuestionBank;
use crate::error::{AppResult, AssemblyError, TypeTally};
use crate::models::{
    required_counts, PaperTotals, Question, QuestionType, SectionRequest, SelectionSummary,
};

/// 组卷服务
pub struct PaperAssembler {
    verbose_logging: bool,
}

impl PaperAssembler {
    pub fn new(verbose_logging: bool) -> Self {
        Self { verbose_logging }
    }

    /// 按分区从题库取题，得到候选题目池
    ///
    /// 每个分区各发起一次查询（并发），结果按分区顺序拼接；
    /// 每道题都是带有该分区分值的独立副本。
    /// 任一题型的数量与请求总数不符时返回 `CountMismatch`，整个结果作废。
    pub async fn fetch_candidates<B: QuestionBank>(
        &self,
        bank: &B,
        sections: &[SectionRequest],
        subject: &str,
        grade: &str,
        chapters: &[String],
    ) -> AppResult<Vec<Question>> {
        if sections.is_empty() {
            return Err(AssemblyError::EmptySections.into());
        }

        info!(
            "🔍 正在从题库 {}-{} 取题 ({} 个分区, {} 个章节)...",
            subject,
            grade,
            sections.len(),
            chapters.len()
        );

        let queries = sections.iter().map(|section| async move {
            let fetched = bank
                .query(
                    subject,
                    grade,
                    chapters,
                    section.count as usize,
                    section.question_type,
                )
                .await?;

            Ok::<_, crate::error::AppError>(
                fetched
                    .iter()
                    .map(|q| q.with_marks(section.marks_per_question))
                    .collect::<Vec<_>>(),
            )
        });

        let pool: Vec<Question> = try_join_all(queries).await?.into_iter().flatten().collect();

        check_counts(&pool, sections)?;

        if self.verbose_logging {
            for (i, q) in pool.iter().enumerate() {
                debug!(
                    "  {}. [{}] {} ({} 分)",
                    i + 1,
                    q.question_type(),
                    crate::utils::logging::truncate_text(&q.english, 60),
                    q.marks
                );
            }
        }

        info!("✓ 取题完成: Selected: {}", SelectionSummary::from_questions(&pool));
        Ok(pool)
    }
}

/// 校验候选池中各题型数量与请求总数完全一致
pub fn check_counts(pool: &[Question], sections: &[SectionRequest]) -> AppResult<()> {
    let summary = SelectionSummary::from_questions(pool);
    let requested = required_counts(sections);

    let mismatches: Vec<TypeTally> = QuestionType::ALL
        .into_iter()
        .filter_map(|question_type| {
            let requested = requested
                .iter()
                .find(|(ty, _)| *ty == question_type)
                .map(|(_, count)| *count)
                .unwrap_or(0);
            let fetched = summary.count_of(question_type);
            (requested != fetched).then_some(TypeTally {
                question_type,
                requested,
                fetched,
            })
        })
        .collect();

    if mismatches.is_empty() {
        Ok(())
    } else {
        warn!("⚠️ 题库数量不足: {:?}", mismatches);
        Err(AssemblyError::CountMismatch { mismatches }.into())
    }
}

/// 随机抽题
///
/// 按题型分组，组内独立洗牌（Fisher–Yates），各取该题型请求总数的前缀；
/// 某组不足时全部取出。不修改输入，每次调用结果不同。
pub fn randomize<R: Rng + ?Sized>(pool: &[Question], sections: &[SectionRequest], rng: &mut R) -> Vec<Question> {
    required_counts(sections)
        .into_iter()
        .flat_map(|(question_type, count)| {
            let mut group: Vec<Question> = pool
                .iter()
                .filter(|q| q.question_type() == question_type)
                .cloned()
                .collect();
            group.shuffle(&mut *rng);
            group.truncate(count);
            group
        })
        .collect()
}

/// 确认选题
///
/// 按题型过滤并截断到请求数量；输入为空时不做任何改变，原样返回 `prior`
pub fn commit(pool: &[Question], sections: &[SectionRequest], prior: &[Question]) -> Vec<Question> {
    if pool.is_empty() {
        debug!("确认选题: 输入为空，保留原有选题");
        return prior.to_vec();
    }

    required_counts(sections)
        .into_iter()
        .flat_map(|(question_type, count)| {
            pool.iter()
                .filter(move |q| q.question_type() == question_type)
                .take(count)
                .cloned()
        })
        .collect()
}

/// 统计总分与总题数（到达上限后饱和，不会溢出）
pub fn compute_totals(sections: &[SectionRequest]) -> PaperTotals {
    sections.iter().fold(PaperTotals::default(), |mut totals, section| {
        totals.total_marks = totals.total_marks.saturating_add(section.subtotal());
        totals.total_questions = totals.total_questions.saturating_add(u64::from(section.count));
        totals
    })
}

/// 导出前校验：每个分区要求的数量必须与已选题目中该题型的数量完全一致
pub fn validate_for_export(selection: &[Question], sections: &[SectionRequest]) -> AppResult<()> {
    let summary = SelectionSummary::from_questions(selection);

    for section in sections {
        let expected = section.count as usize;
        let actual = summary.count_of(section.question_type);
        if actual != expected {
            return Err(AssemblyError::IncompleteSelection {
                question_type: section.question_type,
                expected,
                actual,
            }
            .into());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{BilingualText, McqOption, QuestionKind};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use std::sync::Mutex;

    fn mcq(id: &str) -> Question {
        Question {
            id: id.to_string(),
            english: format!("MCQ {}", id),
            urdu: format!("سوال {}", id),
            marks: 0,
            kind: QuestionKind::Mcq {
                options: vec![McqOption {
                    value: "a".to_string(),
                    english: "A".to_string(),
                    urdu: "ا".to_string(),
                }],
                correct: "a".to_string(),
            },
        }
    }

    fn short(id: &str) -> Question {
        Question {
            id: id.to_string(),
            english: format!("Short {}", id),
            urdu: format!("مختصر {}", id),
            marks: 0,
            kind: QuestionKind::Short {
                answer: BilingualText::default(),
            },
        }
    }

    fn long(id: &str) -> Question {
        Question {
            id: id.to_string(),
            english: format!("Long {}", id),
            urdu: format!("تفصیلی {}", id),
            marks: 0,
            kind: QuestionKind::Long {
                answer: BilingualText::default(),
                outline: None,
            },
        }
    }

    fn section(question_type: QuestionType, count: u32, marks: u32) -> SectionRequest {
        SectionRequest::new(question_type, count, marks).unwrap()
    }

    /// 固定返回预设题目的题库，记录每次查询
    struct FakeBank {
        mcq: Vec<Question>,
        short: Vec<Question>,
        long: Vec<Question>,
        calls: Mutex<Vec<(QuestionType, usize)>>,
    }

    impl FakeBank {
        fn new(mcq: usize, short_n: usize, long_n: usize) -> Self {
            Self {
                mcq: (0..mcq).map(|i| self::mcq(&format!("m{}", i))).collect(),
                short: (0..short_n).map(|i| self::short(&format!("s{}", i))).collect(),
                long: (0..long_n).map(|i| self::long(&format!("l{}", i))).collect(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl QuestionBank for FakeBank {
        async fn query(
            &self,
            _subject: &str,
            _grade: &str,
            _chapters: &[String],
            count: usize,
            question_type: QuestionType,
        ) -> AppResult<Vec<Question>> {
            self.calls.lock().unwrap().push((question_type, count));
            let source = match question_type {
                QuestionType::Mcq => &self.mcq,
                QuestionType::Short => &self.short,
                QuestionType::Long => &self.long,
            };
            Ok(source.iter().take(count).cloned().collect())
        }
    }

    struct FailingBank;

    impl QuestionBank for FailingBank {
        async fn query(
            &self,
            subject: &str,
            grade: &str,
            _chapters: &[String],
            _count: usize,
            _question_type: QuestionType,
        ) -> AppResult<Vec<Question>> {
            Err(AppError::bank_query_failed(
                subject,
                grade,
                std::io::Error::new(std::io::ErrorKind::TimedOut, "timeout"),
            ))
        }
    }

    fn chapters() -> Vec<String> {
        vec!["CHAP 1".to_string()]
    }

    #[test]
    fn totals_sum_sections() {
        let sections = vec![
            section(QuestionType::Mcq, 10, 1),
            section(QuestionType::Short, 5, 2),
            section(QuestionType::Long, 2, 8),
        ];
        let totals = compute_totals(&sections);
        assert_eq!(totals.total_marks, 10 + 10 + 16);
        assert_eq!(totals.total_questions, 17);
        assert_eq!(compute_totals(&sections), totals);
        assert_eq!(compute_totals(&[]), PaperTotals::default());
    }

    #[test]
    fn totals_of_large_sections_do_not_overflow() {
        let big: SectionRequest = "mcq:100000:100000".parse().unwrap();
        let totals = compute_totals(&[big, big]);
        assert_eq!(totals.total_marks, 20_000_000_000);
        assert_eq!(totals.total_questions, 200_000);

        let max = section(QuestionType::Long, u32::MAX, u32::MAX);
        assert_eq!(max.subtotal(), u64::from(u32::MAX) * u64::from(u32::MAX));
        assert_eq!(compute_totals(&[max; 3]).total_marks, u64::MAX);
    }

    #[tokio::test]
    async fn fetch_assigns_marks_and_keeps_section_order() {
        let bank = FakeBank::new(5, 5, 5);
        let sections = vec![
            section(QuestionType::Short, 1, 5),
            section(QuestionType::Mcq, 2, 1),
            section(QuestionType::Short, 1, 3),
        ];

        let pool = PaperAssembler::new(true)
            .fetch_candidates(&bank, &sections, "biology", "9th", &chapters())
            .await
            .unwrap();

        let shape: Vec<(QuestionType, u32)> = pool.iter().map(|q| (q.question_type(), q.marks)).collect();
        assert_eq!(
            shape,
            vec![
                (QuestionType::Short, 5),
                (QuestionType::Mcq, 1),
                (QuestionType::Mcq, 1),
                (QuestionType::Short, 3),
            ]
        );
        assert_eq!(bank.calls.lock().unwrap().len(), 3);
        // 题库中的原题不受影响
        assert_eq!(bank.short[0].marks, 0);
    }

    #[tokio::test]
    async fn fetch_fails_when_bank_is_short() {
        let bank = FakeBank::new(4, 2, 0);
        let sections = vec![section(QuestionType::Mcq, 5, 1), section(QuestionType::Short, 2, 3)];

        let err = PaperAssembler::new(false)
            .fetch_candidates(&bank, &sections, "biology", "9th", &chapters())
            .await
            .unwrap_err();

        match err {
            AppError::Assembly(AssemblyError::CountMismatch { mismatches }) => {
                assert_eq!(
                    mismatches,
                    vec![TypeTally {
                        question_type: QuestionType::Mcq,
                        requested: 5,
                        fetched: 4
                    }]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn fetch_with_no_sections_is_rejected() {
        let bank = FakeBank::new(1, 1, 1);
        let err = PaperAssembler::new(false)
            .fetch_candidates(&bank, &[], "biology", "9th", &chapters())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Assembly(AssemblyError::EmptySections)));
    }

    #[tokio::test]
    async fn bank_failure_propagates() {
        let err = PaperAssembler::new(false)
            .fetch_candidates(&FailingBank, &[section(QuestionType::Mcq, 1, 1)], "biology", "9th", &chapters())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Bank(_)));
    }

    #[test]
    fn check_counts_detects_extra_types() {
        let pool = vec![mcq("1"), long("2")];
        let err = check_counts(&pool, &[section(QuestionType::Mcq, 1, 1)]).unwrap_err();
        assert!(err.is_count_mismatch());
    }

    #[test]
    fn randomize_is_a_per_type_subset() {
        let pool: Vec<Question> = (0..8)
            .map(|i| mcq(&format!("m{}", i)))
            .chain((0..4).map(|i| short(&format!("s{}", i))))
            .chain((0..3).map(|i| long(&format!("l{}", i))))
            .collect();
        let sections = vec![
            section(QuestionType::Mcq, 3, 1),
            section(QuestionType::Short, 2, 2),
            section(QuestionType::Mcq, 2, 1),
        ];

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let picked = randomize(&pool, &sections, &mut rng);
            let summary = SelectionSummary::from_questions(&picked);
            assert_eq!(summary.mcq, 5);
            assert_eq!(summary.short, 2);
            assert_eq!(summary.long, 0);

            let ids: HashSet<&str> = picked.iter().map(|q| q.id.as_str()).collect();
            assert_eq!(ids.len(), picked.len(), "no duplicates");
            for q in &picked {
                assert!(pool.contains(q), "no fabricated questions");
            }
            // 同题型成组出现，顺序为题型在分区中首次出现的顺序
            assert!(picked[..5].iter().all(|q| q.question_type() == QuestionType::Mcq));
        }
        assert_eq!(pool.len(), 15, "pool is untouched");
    }

    #[test]
    fn randomize_takes_all_when_group_is_short() {
        let pool = vec![mcq("1"), mcq("2")];
        let mut rng = StdRng::seed_from_u64(1);
        let picked = randomize(&pool, &[section(QuestionType::Mcq, 5, 1)], &mut rng);
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn randomize_is_deterministic_for_a_seed_and_varies_across_seeds() {
        let pool: Vec<Question> = (0..20).map(|i| mcq(&format!("m{}", i))).collect();
        let sections = vec![section(QuestionType::Mcq, 20, 1)];

        let a = randomize(&pool, &sections, &mut StdRng::seed_from_u64(3));
        let b = randomize(&pool, &sections, &mut StdRng::seed_from_u64(3));
        let c = randomize(&pool, &sections, &mut StdRng::seed_from_u64(4));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn randomize_then_commit_preserves_cardinality() {
        let pool: Vec<Question> = (0..6)
            .map(|i| mcq(&format!("m{}", i)))
            .chain((0..6).map(|i| short(&format!("s{}", i))))
            .collect();
        let sections = vec![section(QuestionType::Mcq, 4, 1), section(QuestionType::Short, 3, 2)];

        let mut rng = StdRng::seed_from_u64(11);
        let randomized = randomize(&pool, &sections, &mut rng);
        let selection = commit(&randomized, &sections, &[]);

        let summary = SelectionSummary::from_questions(&selection);
        assert_eq!(summary.mcq, 4);
        assert_eq!(summary.short, 3);
        assert!(validate_for_export(&selection, &sections).is_ok());
    }

    #[test]
    fn commit_truncates_per_type() {
        let pool = vec![mcq("1"), short("2"), mcq("3"), mcq("4"), short("5")];
        let sections = vec![section(QuestionType::Mcq, 2, 1), section(QuestionType::Short, 1, 2)];

        let ids: Vec<String> = commit(&pool, &sections, &[]).into_iter().map(|q| q.id).collect();
        assert_eq!(ids, vec!["1", "3", "2"]);
    }

    #[test]
    fn commit_of_empty_pool_keeps_prior_selection() {
        let prior = vec![mcq("1")];
        let selection = commit(&[], &[section(QuestionType::Mcq, 1, 1)], &prior);
        assert_eq!(selection, prior);
    }

    #[test]
    fn validate_requires_exact_counts() {
        let sections = vec![section(QuestionType::Mcq, 3, 1)];

        assert!(validate_for_export(&[mcq("1"), mcq("2"), mcq("3")], &sections).is_ok());

        let err = validate_for_export(&[mcq("1"), mcq("2"), short("3")], &sections).unwrap_err();
        assert!(err.is_incomplete_selection());

        let err = validate_for_export(&[mcq("1"), mcq("2"), mcq("3"), mcq("4")], &sections).unwrap_err();
        assert!(err.is_incomplete_selection());
    }

    #[test]
    fn validate_checks_each_section_of_a_repeated_type() {
        // 同题型的每个分区都要与该题型的已选数量相等
        let sections = vec![section(QuestionType::Mcq, 2, 1), section(QuestionType::Mcq, 3, 1)];
        let five: Vec<Question> = (0..5).map(|i| mcq(&i.to_string())).collect();
        assert!(validate_for_export(&five, &sections).unwrap_err().is_incomplete_selection());

        let sections = vec![section(QuestionType::Mcq, 2, 1), section(QuestionType::Mcq, 2, 1)];
        assert!(validate_for_export(&[mcq("1"), mcq("2")], &sections).is_ok());
        assert!(validate_for_export(&[mcq("1"), mcq("2"), mcq("3"), mcq("4")], &sections).is_err());
    }

    #[tokio::test]
    async fn end_to_end_without_randomize() {
        let bank = FakeBank::new(2, 1, 0);
        let sections = vec![section(QuestionType::Mcq, 2, 1), section(QuestionType::Short, 1, 5)];

        let pool = PaperAssembler::new(false)
            .fetch_candidates(&bank, &sections, "biology", "9th", &chapters())
            .await
            .unwrap();
        let selection = commit(&pool, &sections, &pool);

        let marks: Vec<(QuestionType, u32)> = selection.iter().map(|q| (q.question_type(), q.marks)).collect();
        assert_eq!(
            marks,
            vec![(QuestionType::Mcq, 1), (QuestionType::Mcq, 1), (QuestionType::Short, 5)]
        );
        assert!(validate_for_export(&selection, &sections).is_ok());

        let totals = compute_totals(&sections);
        assert_eq!(totals.total_marks, 7);
        assert_eq!(totals.total_questions, 3);
    }
}
