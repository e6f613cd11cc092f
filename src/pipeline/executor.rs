use std::path::Path;
use std::sync::Arc;

use tracing::Instrument;

use crate::agent::{ContextEntry, PromptBuilder};
use crate::config::TaskPlan;
use crate::error::{Result, StudyFlowError};

use super::runtime::RuntimeContext;
use super::structured::parse_structured;
use super::task::TaskDescriptor;
use super::types::{PipelineRun, TaskOutput};

/// 顺序执行任务列表
///
/// 每个任务在其所有上下文任务完成之后执行；任一任务失败即终止整个运行。
#[derive(Debug, Clone)]
pub struct PipelineExecutor {
    tasks: Vec<Arc<TaskDescriptor>>,
}

impl PipelineExecutor {
    pub fn new(plan: &TaskPlan) -> Self {
        Self::from_tasks(plan.tasks.clone())
    }

    pub fn from_tasks(tasks: Vec<Arc<TaskDescriptor>>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Arc<TaskDescriptor>] {
        &self.tasks
    }

    pub async fn run(&self, runtime: &RuntimeContext) -> Result<PipelineRun> {
        // 在发起第一次模型调用之前确认每个 agent 都有客户端
        let agents = self
            .tasks
            .iter()
            .map(|task| runtime.agent(&task.agent))
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(tasks = self.tasks.len(), "pipeline started");

        let mut run = PipelineRun::default();
        for (task, agent) in self.tasks.iter().zip(agents) {
            let span = tracing::info_span!("task", name = %task.name, agent = %agent.descriptor().role);
            let output = async {
                let prompt = build_prompt(task, &run)?;
                tracing::debug!(model = agent.model(), prompt_bytes = prompt.len(), "task started");

                let schema = task.output_schema.as_ref();
                let raw = agent
                    .execute(prompt, schema.map(|s| &s.schema))
                    .await
                    .map_err(|e| StudyFlowError::execution(&task.name, e))?;

                let structured = match schema {
                    Some(schema) => Some(parse_structured(&task.name, &raw, schema)?),
                    None => None,
                };

                if let Some(path) = &task.output_file {
                    write_output_file(path, &raw).await?;
                }

                tracing::info!(bytes = raw.len(), structured = structured.is_some(), "task finished");
                Ok::<_, StudyFlowError>(TaskOutput {
                    task: task.name.clone(),
                    agent_role: agent.descriptor().role.clone(),
                    raw,
                    structured,
                    schema: schema.map(|s| s.name.clone()),
                    output_file: task.output_file.clone(),
                })
            }
            .instrument(span)
            .await?;

            run.push(output);
        }

        tracing::info!(tasks = run.len(), "pipeline finished");
        Ok(run)
    }
}

fn build_prompt(task: &TaskDescriptor, run: &PipelineRun) -> Result<String> {
    let context_text = task
        .context
        .iter()
        .map(|dependency| {
            run.get(&dependency.name)
                .map(|output| (dependency.name.as_str(), output.as_context()))
                .ok_or_else(|| StudyFlowError::UnknownTask {
                    task: task.name.clone(),
                    dependency: dependency.name.clone(),
                })
        })
        .collect::<Result<Vec<_>>>()?;

    let context: Vec<ContextEntry<'_>> = context_text
        .iter()
        .map(|(name, output)| ContextEntry {
            task: name,
            output: output.as_str(),
        })
        .collect();

    Ok(PromptBuilder::build_task_prompt(
        &task.description,
        &task.expected_output,
        &context,
        task.output_schema.as_ref().map(|s| &s.schema),
    ))
}

async fn write_output_file(path: &Path, content: &str) -> Result<()> {
    let io_error = |source| StudyFlowError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
    }
    tokio::fs::write(path, content).await.map_err(io_error)?;
    tracing::info!(path = %path.display(), "artifact written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentDescriptor;
    use crate::llm::{LlmClient, LlmRequest, LlmResponse, LlmSettings};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LlmClient for Recorder {
        async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
            let mut prompts = self.prompts.lock();
            prompts.push(request.user);
            Ok(LlmResponse::text(format!("answer {}", prompts.len())))
        }
    }

    struct Failing;

    #[async_trait]
    impl LlmClient for Failing {
        async fn complete(&self, _request: LlmRequest) -> Result<LlmResponse> {
            Err(StudyFlowError::Other(anyhow::anyhow!("service unavailable")))
        }
    }

    fn task(name: &str, context: Vec<Arc<TaskDescriptor>>) -> Arc<TaskDescriptor> {
        let agent = Arc::new(AgentDescriptor::new("writer", "Writer", "Write", "Writes", LlmSettings::default()));
        Arc::new(TaskDescriptor {
            name: name.into(),
            description: format!("do {name}"),
            expected_output: "text".into(),
            agent,
            context,
            output_file: None,
            output_schema: None,
        })
    }

    #[tokio::test]
    async fn upstream_output_is_passed_as_context() {
        let first = task("first", vec![]);
        let second = task("second", vec![Arc::clone(&first)]);
        let recorder = Arc::new(Recorder::default());
        let runtime = RuntimeContext::with_client(recorder.clone());

        let run = PipelineExecutor::from_tasks(vec![first, second])
            .run(&runtime)
            .await
            .unwrap();

        assert_eq!(run.len(), 2);
        assert_eq!(run.final_output().unwrap().raw, "answer 2");
        let prompts = recorder.prompts.lock();
        assert!(!prompts[0].contains("<context>"));
        assert!(prompts[1].contains("## Output of `first`\nanswer 1"));
    }

    #[tokio::test]
    async fn context_declared_out_of_order_is_rejected() {
        let first = task("first", vec![]);
        let second = task("second", vec![Arc::clone(&first)]);
        let runtime = RuntimeContext::with_client(Arc::new(Recorder::default()));

        let err = PipelineExecutor::from_tasks(vec![second, first])
            .run(&runtime)
            .await
            .unwrap_err();
        assert!(matches!(err, StudyFlowError::UnknownTask { ref dependency, .. } if dependency == "first"));
    }

    #[tokio::test]
    async fn client_failure_names_the_task() {
        let runtime = RuntimeContext::with_client(Arc::new(Failing));
        let err = PipelineExecutor::from_tasks(vec![task("only", vec![])])
            .run(&runtime)
            .await
            .unwrap_err();
        assert!(matches!(err, StudyFlowError::Execution { ref task, .. } if task == "only"));
        assert!(err.to_string().contains("service unavailable"));
    }

    #[tokio::test]
    async fn missing_client_fails_before_any_call() {
        let err = PipelineExecutor::from_tasks(vec![task("only", vec![])])
            .run(&RuntimeContext::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StudyFlowError::UnknownAgent { .. }));
    }

    #[tokio::test]
    async fn output_file_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/summary.md");
        let mut descriptor = (*task("summary", vec![])).clone();
        descriptor.output_file = Some(path.clone());

        let runtime = RuntimeContext::with_client(Arc::new(Recorder::default()));
        let run = PipelineExecutor::from_tasks(vec![Arc::new(descriptor)])
            .run(&runtime)
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "answer 1");
        assert_eq!(run.written_files(), vec![path.as_path()]);
    }
}
