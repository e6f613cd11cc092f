//! 命令行入口使用的流程编排

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use crate::agent::AgentRegistry;
use crate::config::{load_agents, load_tasks, PipelineSettings, TaskPlan, TemplateValues};
use crate::error::Result;
use crate::llm::LocalEchoClient;
use crate::output::{combine_markdown_files, run_record, write_record, CombineReport};
use crate::pipeline::{PipelineExecutor, PipelineRun, RuntimeContext};
use crate::schema::SchemaRegistry;

/// `check` 时代替源文档的占位文本
pub const PLACEHOLDER_SOURCE: &str = "<source document>";

/// LLM 客户端来源
pub enum ClientMode {
    /// 按 agents.yaml 的模型配置创建 HTTP 客户端
    Configured,
    /// 所有 agent 使用本地回显客户端
    DryRun,
    /// 调用方提供的运行时
    Custom(RuntimeContext),
}

/// 已加载的 agents 与任务计划
pub struct LoadedPipeline {
    pub agents: AgentRegistry,
    pub plan: TaskPlan,
}

/// 一次完整运行的产物
pub struct RunSummary {
    pub run: PipelineRun,
    pub record_path: PathBuf,
    pub combined: CombineReport,
}

/// 加载 agents 与 tasks，源文档内容作为模板值
pub fn load_pipeline(settings: &PipelineSettings, source_content: String) -> Result<LoadedPipeline> {
    let quiz_text = settings.quiz.get_config_text();
    if let Some(total) = settings.quiz.total() {
        tracing::info!(questions = total, "quiz counts configured");
    }

    let agents = load_agents(&settings.agents_config, &settings.agent_options())?;
    let values = TemplateValues::new(source_content, quiz_text);
    let plan = load_tasks(
        &settings.tasks_config,
        &agents,
        &values,
        &SchemaRegistry::with_builtin(),
    )?;
    tracing::info!(agents = agents.len(), tasks = plan.len(), "configuration loaded");
    Ok(LoadedPipeline { agents, plan })
}

/// 读取输入、执行全部任务、写出 JSON 记录并合并 markdown
pub async fn run_pipeline(settings: &PipelineSettings, mode: ClientMode) -> Result<RunSummary> {
    let source = settings.read_source_document()?;
    tracing::info!(
        path = %settings.input_file.display(),
        bytes = source.len(),
        "source document loaded"
    );

    let loaded = load_pipeline(settings, source)?;
    let runtime = match mode {
        ClientMode::Configured => RuntimeContext::from_agents(&loaded.agents)?,
        ClientMode::DryRun => RuntimeContext::with_client(Arc::new(LocalEchoClient)),
        ClientMode::Custom(runtime) => runtime,
    };

    let run = PipelineExecutor::new(&loaded.plan).run(&runtime).await?;

    let record_path = settings.extracted_info_path();
    write_record(&record_path, &run_record(&run)?)?;

    let combined = combine_markdown_files(
        &loaded.plan.output_paths.artifact_files(),
        settings.combined_output_path(),
    )?;

    Ok(RunSummary {
        run,
        record_path,
        combined,
    })
}

/// 只加载配置，不调用模型
pub fn check_pipeline(settings: &PipelineSettings) -> Result<LoadedPipeline> {
    load_pipeline(settings, PLACEHOLDER_SOURCE.to_string())
}

/// 以文本形式列出任务计划
pub fn render_plan(plan: &TaskPlan) -> String {
    let mut out = String::new();
    for (index, task) in plan.tasks.iter().enumerate() {
        let _ = writeln!(out, "{}. {} ({})", index + 1, task.name, task.agent.role);
        let context: Vec<&str> = task.context_names().collect();
        if !context.is_empty() {
            let _ = writeln!(out, "   context: {}", context.join(", "));
        }
        if let Some(path) = &task.output_file {
            let _ = writeln!(out, "   output:  {}", path.display());
        }
        if let Some(schema) = &task.output_schema {
            let _ = writeln!(out, "   schema:  {}", schema.name);
        }
    }
    out
}
