use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use crate::agent::AgentRegistry;
use crate::error::{Result, StudyFlowError};
use crate::pipeline::{OutputSchema, TaskDescriptor};
use crate::schema::{SchemaRegistry, EXTRACTED_INFO_SCHEMA};

use super::template::Substitutions;
use super::yaml::{from_yaml_value, key_to_string, parse_yaml, read_config};

/// 自动附加 Extracted-Info schema 的抽取任务名
pub const EXTRACTION_TASK: &str = "extract_info";
pub const SOURCE_CONTENT_KEY: &str = "source_content";
pub const QUIZ_CONFIG_KEY: &str = "quiz_config";
const OUTPUT_PATHS_KEY: &str = "output_paths";
const TASKS_KEY: &str = "tasks";

#[derive(Debug, Deserialize)]
struct TaskEntry {
    #[serde(default, alias = "description")]
    description_template: Option<String>,
    #[serde(default)]
    expected_output: Option<String>,
    #[serde(default)]
    agent: Option<String>,
    #[serde(default)]
    context: Vec<String>,
    #[serde(default)]
    output_file: Option<String>,
    #[serde(default)]
    output_schema: Option<String>,
}

/// 描述模板的替换值
#[derive(Debug, Clone)]
pub struct TemplateValues {
    pub source_content: String,
    pub quiz_config: String,
}

impl TemplateValues {
    pub fn new(source_content: impl Into<String>, quiz_config: impl Into<String>) -> Self {
        Self {
            source_content: source_content.into(),
            quiz_config: quiz_config.into(),
        }
    }

    fn substitutions(&self) -> Substitutions {
        Substitutions::new()
            .with(SOURCE_CONTENT_KEY, self.source_content.as_str())
            .with(QUIZ_CONFIG_KEY, self.quiz_config.as_str())
    }
}

/// `output_paths` 映射，保持定义顺序
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputPaths {
    entries: Vec<(String, PathBuf)>,
}

impl OutputPaths {
    pub fn new(entries: Vec<(String, PathBuf)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&Path> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, path)| path.as_path())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries.iter().map(|(k, p)| (k.as_str(), p.as_path()))
    }

    /// 需要合并的 markdown 文件，按定义顺序
    pub fn artifact_files(&self) -> Vec<PathBuf> {
        self.entries.iter().map(|(_, path)| path.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn substitutions(&self) -> Substitutions {
        let mut subs = Substitutions::new();
        for (key, path) in &self.entries {
            subs.insert(format!("{OUTPUT_PATHS_KEY}.{key}"), path.to_string_lossy());
        }
        subs
    }
}

/// 加载结果：按定义顺序排列的任务与输出路径映射
#[derive(Debug, Clone)]
pub struct TaskPlan {
    pub tasks: Vec<Arc<TaskDescriptor>>,
    pub output_paths: OutputPaths,
}

impl TaskPlan {
    pub fn get(&self, name: &str) -> Option<&Arc<TaskDescriptor>> {
        self.tasks.iter().find(|task| task.name == name)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

pub fn load_tasks(
    path: impl AsRef<Path>,
    agents: &AgentRegistry,
    values: &TemplateValues,
    schemas: &SchemaRegistry,
) -> Result<TaskPlan> {
    let path = path.as_ref();
    let contents = read_config(path)?;
    load_tasks_from_str(&contents, &path.display().to_string(), agents, values, schemas)
}

pub fn load_tasks_from_str(
    contents: &str,
    origin: &str,
    agents: &AgentRegistry,
    values: &TemplateValues,
    schemas: &SchemaRegistry,
) -> Result<TaskPlan> {
    let mut root: serde_yaml::Mapping = parse_yaml(origin, contents)?;

    let output_paths = match root.remove(OUTPUT_PATHS_KEY) {
        Some(value) => parse_output_paths(origin, value)?,
        None => OutputPaths::default(),
    };

    let task_entries = match root.remove(TASKS_KEY) {
        Some(serde_yaml::Value::Mapping(mapping)) => mapping,
        Some(_) => {
            return Err(StudyFlowError::MissingKey {
                owner: origin.to_string(),
                key: format!("{TASKS_KEY} (expected a mapping of task name to task)"),
            })
        }
        None => {
            return Err(StudyFlowError::MissingKey {
                owner: origin.to_string(),
                key: TASKS_KEY.to_string(),
            })
        }
    };

    let description_subs = values.substitutions();
    let path_subs = output_paths.substitutions();
    let mut registry: HashMap<String, Arc<TaskDescriptor>> = HashMap::new();
    let mut tasks = Vec::with_capacity(task_entries.len());

    for (key, value) in task_entries {
        let name = key_to_string(&key).ok_or_else(|| StudyFlowError::MissingKey {
            owner: origin.to_string(),
            key: "task name".into(),
        })?;
        let entry: TaskEntry = from_yaml_value(&format!("task `{name}`"), value)?;
        let task = build_task(&name, entry, agents, &description_subs, &path_subs, &registry, schemas)?;
        let task = Arc::new(task);
        registry.insert(name, Arc::clone(&task));
        tasks.push(task);
    }

    tracing::info!(count = tasks.len(), "tasks loaded");
    Ok(TaskPlan { tasks, output_paths })
}

fn parse_output_paths(origin: &str, value: serde_yaml::Value) -> Result<OutputPaths> {
    let mapping: serde_yaml::Mapping = from_yaml_value(&format!("{origin} ({OUTPUT_PATHS_KEY})"), value)?;
    let mut entries = Vec::with_capacity(mapping.len());
    for (key, value) in mapping {
        let key = key_to_string(&key).ok_or_else(|| StudyFlowError::MissingKey {
            owner: OUTPUT_PATHS_KEY.to_string(),
            key: "path name".into(),
        })?;
        let path: String = from_yaml_value(&format!("{OUTPUT_PATHS_KEY}.{key}"), value)?;
        entries.push((key, PathBuf::from(path)));
    }
    Ok(OutputPaths::new(entries))
}

fn build_task(
    name: &str,
    entry: TaskEntry,
    agents: &AgentRegistry,
    description_subs: &Substitutions,
    path_subs: &Substitutions,
    registry: &HashMap<String, Arc<TaskDescriptor>>,
    schemas: &SchemaRegistry,
) -> Result<TaskDescriptor> {
    let owner = format!("task `{name}`");
    let missing = |key: &str| StudyFlowError::MissingKey {
        owner: owner.clone(),
        key: key.to_string(),
    };

    let template = entry
        .description_template
        .ok_or_else(|| missing("description_template"))?;
    let description = description_subs.render(&format!("{owner} description"), &template)?;
    let expected_output = entry.expected_output.ok_or_else(|| missing("expected_output"))?;

    let agent_name = entry.agent.ok_or_else(|| missing("agent"))?;
    let agent = agents
        .get(&agent_name)
        .cloned()
        .ok_or_else(|| StudyFlowError::UnknownAgent {
            owner: owner.clone(),
            agent: agent_name.clone(),
        })?;

    let context = entry
        .context
        .iter()
        .map(|dependency| {
            registry
                .get(dependency)
                .cloned()
                .ok_or_else(|| StudyFlowError::UnknownTask {
                    task: name.to_string(),
                    dependency: dependency.clone(),
                })
        })
        .collect::<Result<Vec<_>>>()?;

    let output_file = entry
        .output_file
        .map(|template| path_subs.render(&format!("{owner} output_file"), &template))
        .transpose()?
        .map(PathBuf::from);

    let schema_name = entry
        .output_schema
        .or_else(|| (name == EXTRACTION_TASK).then(|| EXTRACTED_INFO_SCHEMA.to_string()));
    let output_schema = schema_name
        .map(|schema_name| {
            let schema = schemas.get(&schema_name)?.clone();
            Ok::<_, StudyFlowError>(OutputSchema {
                name: schema_name,
                schema,
            })
        })
        .transpose()?;

    Ok(TaskDescriptor {
        name: name.to_string(),
        description,
        expected_output,
        agent,
        context,
        output_file,
        output_schema,
    })
}
