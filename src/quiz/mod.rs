use serde::{Deserialize, Serialize};

/// 所有题型数量均未指定时使用的通用说明
pub const DEFAULT_QUIZ_INSTRUCTION: &str = "Determine appropriate number of questions for each type based on the content complexity and importance of different topics. Aim for a comprehensive assessment that can be completed in 30-45 minutes.";

/// 测验题目数量配置
///
/// 每种题型都是可选的；`Some(0)` 是一个明确的数量，只有 `None` 视为未指定。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizConfig {
    #[serde(default)]
    pub multiple_choice_count: Option<u32>,
    #[serde(default)]
    pub true_false_count: Option<u32>,
    #[serde(default)]
    pub short_answer_count: Option<u32>,
    #[serde(default)]
    pub scenario_count: Option<u32>,
}

impl QuizConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_multiple_choice(mut self, count: u32) -> Self {
        self.multiple_choice_count = Some(count);
        self
    }

    pub fn with_true_false(mut self, count: u32) -> Self {
        self.true_false_count = Some(count);
        self
    }

    pub fn with_short_answer(mut self, count: u32) -> Self {
        self.short_answer_count = Some(count);
        self
    }

    pub fn with_scenario(mut self, count: u32) -> Self {
        self.scenario_count = Some(count);
        self
    }

    fn entries(&self) -> [(&'static str, Option<u32>); 4] {
        [
            ("Multiple Choice Questions", self.multiple_choice_count),
            ("True/False Questions", self.true_false_count),
            ("Short Answer Questions", self.short_answer_count),
            ("Scenario Questions", self.scenario_count),
        ]
    }

    pub fn is_unspecified(&self) -> bool {
        self.entries().iter().all(|(_, count)| count.is_none())
    }

    pub fn total(&self) -> Option<u64> {
        if self.is_unspecified() {
            return None;
        }
        Some(
            self.entries()
                .iter()
                .filter_map(|(_, count)| count.map(u64::from))
                .sum(),
        )
    }

    pub fn get_config_text(&self) -> String {
        let lines: Vec<String> = self
            .entries()
            .iter()
            .filter_map(|(label, count)| count.map(|n| format!("- {}: Exactly {}", label, n)))
            .collect();

        if lines.is_empty() {
            DEFAULT_QUIZ_INSTRUCTION.to_string()
        } else {
            lines.join("\n")
        }
    }
}
