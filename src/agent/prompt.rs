use crate::schema::Schema;

use super::descriptor::AgentDescriptor;

/// 上游任务的输出，作为下游任务的上下文
#[derive(Debug, Clone, Copy)]
pub struct ContextEntry<'a> {
    pub task: &'a str,
    pub output: &'a str,
}

/// Prompt 构建服务
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn build_system_prompt(agent: &AgentDescriptor) -> String {
        format!(
            "You are {}. {}\nYour personal goal is: {}",
            agent.role.trim(),
            agent.backstory.trim(),
            agent.goal.trim()
        )
    }

    /// 构建任务 prompt
    ///
    /// 依次包含：渲染后的任务描述、期望输出、上游上下文、结构化输出要求
    pub fn build_task_prompt(
        description: &str,
        expected_output: &str,
        context: &[ContextEntry<'_>],
        schema: Option<&Schema>,
    ) -> String {
        let mut prompt = String::new();
        prompt.push_str(description.trim_end());
        prompt.push_str("\n\nThis is the expected criteria for your final answer: ");
        prompt.push_str(expected_output.trim());

        if !context.is_empty() {
            prompt.push_str("\n\n<context>\n");
            for entry in context {
                prompt.push_str(&format!("## Output of `{}`\n{}\n\n", entry.task, entry.output.trim()));
            }
            prompt.push_str("</context>");
        }

        if let Some(schema) = schema {
            prompt.push_str(
                "\n\nRespond with a single JSON object (no prose) that matches this schema:\n",
            );
            prompt.push_str(&schema.to_prompt_json());
        }

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmSettings;
    use crate::schema::ExtractedInfo;

    #[test]
    fn system_prompt_mentions_role_goal_and_backstory() {
        let agent = AgentDescriptor::new(
            "writer",
            "Content Writer",
            "Write clear summaries",
            "You have years of technical writing experience.",
            LlmSettings::default(),
        );
        let prompt = PromptBuilder::build_system_prompt(&agent);
        assert!(prompt.starts_with("You are Content Writer."));
        assert!(prompt.contains("years of technical writing"));
        assert!(prompt.ends_with("Your personal goal is: Write clear summaries"));
    }

    #[test]
    fn task_prompt_includes_context_in_order() {
        let context = [
            ContextEntry { task: "extract_info", output: "{\"facts\":[]}" },
            ContextEntry { task: "create_summary", output: "# Summary" },
        ];
        let prompt = PromptBuilder::build_task_prompt("Write a guide", "Markdown", &context, None);
        let first = prompt.find("extract_info").unwrap();
        let second = prompt.find("create_summary").unwrap();
        assert!(first < second);
        assert!(prompt.contains("expected criteria for your final answer: Markdown"));
        assert!(!prompt.contains("JSON object"));
    }

    #[test]
    fn task_prompt_appends_schema() {
        let schema = ExtractedInfo::schema();
        let prompt = PromptBuilder::build_task_prompt("Extract", "JSON", &[], Some(&schema));
        assert!(prompt.contains("single JSON object"));
        assert!(prompt.contains("technical_terms"));
        assert!(!prompt.contains("<context>"));
    }
}
