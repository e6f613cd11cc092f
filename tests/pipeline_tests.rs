use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tempfile::TempDir;

use studyflow::cli::{run_pipeline, ClientMode};
use studyflow::output::SECTION_SEPARATOR;
use studyflow::{
    combine_markdown_files, ErrorKind, ExtractedInfo, LlmClient, LlmRequest, LlmResponse,
    PipelineSettings, QuizConfig, RuntimeContext, StudyFlowError,
};

const EXTRACTED: &str = r#"```json
{
  "main_concepts": ["Photosynthesis"],
  "supporting_details": {"Photosynthesis": ["Converts light into chemical energy"]},
  "technical_terms": {"Chlorophyll": "Pigment that absorbs light"},
  "relationships": ["Light reactions feed the Calvin cycle"],
  "facts": ["Oxygen is released"]
}
```"#;

/// 按调用顺序返回预设回答，并记录收到的请求
struct ScriptedClient {
    responses: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedClient {
    fn new(responses: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.iter().map(|r| r.to_string()).collect()),
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait::async_trait]
impl LlmClient for ScriptedClient {
    async fn complete(&self, request: LlmRequest) -> studyflow::Result<LlmResponse> {
        self.requests.lock().push(request);
        let next = self
            .responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| "unexpected call".to_string());
        Ok(LlmResponse::text(next))
    }
}

const AGENTS: &str = r#"
llm_configs:
  main:
    model: openrouter/google/gemini-pro-1.5
extractor:
  role: Content Extractor
  goal: Extract information
  backstory: Careful reader
  llm: main
writer:
  role: Content Writer
  goal: Write study material
  backstory: Experienced teacher
  llm: main
"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Self { dir };
        std::fs::write(workspace.path("agents.yaml"), AGENTS).unwrap();
        std::fs::write(workspace.path("tasks.yaml"), workspace.tasks_yaml()).unwrap();
        std::fs::write(workspace.path("source.md"), "# Photosynthesis\nPlants make sugar.").unwrap();
        workspace
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn artifact(&self, name: &str) -> PathBuf {
        self.path("out").join(name)
    }

    fn tasks_yaml(&self) -> String {
        let out = |name: &str| self.artifact(name).display().to_string();
        format!(
            r##"
output_paths:
  summary: "{summary}"
  study_guide: "{guide}"
  quiz_questions: "{questions}"
  quiz_answers: "{answers}"
tasks:
  extract_info:
    description_template: "Extract from: {{source_content}}"
    expected_output: Structured record
    agent: extractor
  create_summary:
    description_template: Summarize the material
    expected_output: Markdown starting with "# Summary"
    agent: writer
    context: [extract_info]
    output_file: "{{output_paths.summary}}"
  create_study_guide:
    description_template: Write a study guide
    expected_output: Markdown starting with "# Study Guide"
    agent: writer
    context: [extract_info, create_summary]
    output_file: "{{output_paths.study_guide}}"
  create_quiz:
    description_template: "Write a quiz. {{quiz_config}}"
    expected_output: Markdown starting with "# Quiz Questions"
    agent: writer
    context: [extract_info, create_study_guide]
    output_file: "{{output_paths.quiz_questions}}"
  create_quiz_answers:
    description_template: Answer the quiz
    expected_output: Markdown starting with "# Quiz Answers"
    agent: writer
    context: [create_quiz]
    output_file: "{{output_paths.quiz_answers}}"
"##,
            summary = out("summary.md"),
            guide = out("study_guide.md"),
            questions = out("quiz_questions.md"),
            answers = out("quiz_answers.md"),
        )
    }

    fn settings(&self) -> PipelineSettings {
        PipelineSettings {
            input_file: self.path("source.md"),
            output_dir: self.path("out"),
            agents_config: self.path("agents.yaml"),
            tasks_config: self.path("tasks.yaml"),
            quiz: QuizConfig::new().with_multiple_choice(2).with_true_false(1),
            ..PipelineSettings::default()
        }
    }

    fn artifacts(&self) -> Vec<PathBuf> {
        ["summary.md", "study_guide.md", "quiz_questions.md", "quiz_answers.md"]
            .iter()
            .map(|name| self.artifact(name))
            .collect()
    }
}

fn happy_script() -> Arc<ScriptedClient> {
    ScriptedClient::new(&[
        EXTRACTED,
        "# Summary\nPlants turn light into sugar.",
        "# Study Guide\n## Key concepts\n- Photosynthesis",
        "# Quiz Questions\n1. What absorbs light?",
        "# Quiz Answers\n1. Chlorophyll",
    ])
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[tokio::test]
async fn full_run_writes_record_artifacts_and_combined_document() {
    let ws = Workspace::new();
    let client = happy_script();
    let summary = run_pipeline(
        &ws.settings(),
        ClientMode::Custom(RuntimeContext::with_client(client.clone())),
    )
    .await
    .unwrap();

    assert_eq!(summary.run.len(), 5);
    assert_eq!(summary.run.written_files().len(), 4);

    let record: serde_json::Value = serde_json::from_str(&read(&summary.record_path)).unwrap();
    let mut keys: Vec<&str> = record.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort();
    let mut expected = ExtractedInfo::FIELDS.to_vec();
    expected.sort();
    assert_eq!(keys, expected);
    assert_eq!(record["technical_terms"]["Chlorophyll"], "Pigment that absorbs light");
    assert!(read(&summary.record_path).contains("\n    \"facts\""));

    let headings = ["# Summary", "# Study Guide", "# Quiz Questions", "# Quiz Answers"];
    for (path, heading) in ws.artifacts().iter().zip(headings) {
        assert!(read(path).starts_with(heading), "{} should start with {heading}", path.display());
    }

    let combined = read(&ws.path("out/combined_output.md"));
    let sections: Vec<&str> = combined.split(SECTION_SEPARATOR).collect();
    assert_eq!(sections.len(), 4);
    for (section, heading) in sections.iter().zip(headings) {
        assert!(section.starts_with(heading));
    }
    assert!(!combined.ends_with("---"));
    assert_eq!(summary.combined.included, ws.artifacts());
}

#[tokio::test]
async fn extra_model_keys_do_not_reach_the_record() {
    let ws = Workspace::new();
    let noisy = EXTRACTED.replacen('{', "{\n  \"notes\": \"extra\",\n  \"confidence\": 0.8,", 1);
    let client = ScriptedClient::new(&[
        noisy.as_str(),
        "# Summary",
        "# Study Guide",
        "# Quiz Questions",
        "# Quiz Answers",
    ]);
    let summary = run_pipeline(
        &ws.settings(),
        ClientMode::Custom(RuntimeContext::with_client(client)),
    )
    .await
    .unwrap();

    let record: serde_json::Value = serde_json::from_str(&read(&summary.record_path)).unwrap();
    let mut keys: Vec<&str> = record.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort();
    let mut expected = ExtractedInfo::FIELDS.to_vec();
    expected.sort();
    assert_eq!(keys, expected);
    assert!(summary.run.structured("extract_info").unwrap().get("notes").is_none());
}

#[tokio::test]
async fn prompts_carry_source_quiz_text_and_upstream_context() {
    let ws = Workspace::new();
    let client = happy_script();
    run_pipeline(
        &ws.settings(),
        ClientMode::Custom(RuntimeContext::with_client(client.clone())),
    )
    .await
    .unwrap();

    let requests = client.requests.lock();
    assert_eq!(requests.len(), 5);

    assert!(requests[0].user.contains("Plants make sugar."));
    assert!(requests[0].response_schema.is_some());
    assert!(requests[0]
        .system
        .as_deref()
        .unwrap()
        .starts_with("You are Content Extractor."));

    assert!(requests[1].user.contains("## Output of `extract_info`"));
    assert!(requests[1].response_schema.is_none());

    assert!(requests[3]
        .user
        .contains("- Multiple Choice Questions: Exactly 2\n- True/False Questions: Exactly 1"));
    assert!(requests[3].user.contains("## Output of `create_study_guide`\n# Study Guide"));
    assert!(!requests[3].user.contains("## Output of `create_summary`"));
}

#[tokio::test]
async fn combined_document_tolerates_a_deleted_artifact() {
    let ws = Workspace::new();
    run_pipeline(
        &ws.settings(),
        ClientMode::Custom(RuntimeContext::with_client(happy_script())),
    )
    .await
    .unwrap();

    std::fs::remove_file(ws.artifact("study_guide.md")).unwrap();
    let destination = ws.path("recombined.md");
    let report = combine_markdown_files(&ws.artifacts(), &destination).unwrap();

    assert_eq!(report.missing, vec![ws.artifact("study_guide.md")]);
    let combined = read(&destination);
    assert_eq!(combined.split(SECTION_SEPARATOR).count(), 3);
    assert!(!combined.contains("# Study Guide"));
}

#[tokio::test]
async fn invalid_structured_output_stops_the_run() {
    let ws = Workspace::new();
    let client = ScriptedClient::new(&["I am not able to produce JSON today.", "# Summary"]);
    let err = run_pipeline(
        &ws.settings(),
        ClientMode::Custom(RuntimeContext::with_client(client.clone())),
    )
    .await
    .err()
    .unwrap();

    assert!(matches!(err, StudyFlowError::StructuredOutput { ref task, .. } if task == "extract_info"));
    assert_eq!(err.kind(), ErrorKind::Execution);
    assert_eq!(client.requests.lock().len(), 1);
    assert!(!ws.artifact("summary.md").exists());
    assert!(!ws.path("out/extracted_info.json").exists());
}

#[tokio::test]
async fn missing_source_document_is_an_input_error() {
    let ws = Workspace::new();
    let mut settings = ws.settings();
    settings.input_file = ws.path("nowhere.md");

    let client = happy_script();
    let err = run_pipeline(
        &settings,
        ClientMode::Custom(RuntimeContext::with_client(client.clone())),
    )
    .await
    .err()
    .unwrap();

    assert_eq!(err.kind(), ErrorKind::Input);
    assert!(client.requests.lock().is_empty());
}

#[tokio::test]
async fn dry_run_completes_without_a_model() {
    let ws = Workspace::new();
    let summary = run_pipeline(&ws.settings(), ClientMode::DryRun).await.unwrap();

    let info = summary
        .run
        .structured_as::<ExtractedInfo>("extract_info")
        .unwrap()
        .unwrap();
    assert_eq!(info, ExtractedInfo::default());
    assert!(read(&ws.artifact("summary.md")).starts_with("[Echo] Summarize the material"));
    assert_eq!(summary.combined.included.len(), 4);
}
