use crate::error::{Result, StudyFlowError};

/// 占位符替换表
///
/// 只有声明过的键会被识别，模板中出现未声明的键直接报错。
/// `{{` 与 `}}` 渲染为字面量花括号。
#[derive(Debug, Clone, Default)]
pub struct Substitutions {
    entries: Vec<(String, String)>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn render(&self, owner: &str, template: &str) -> Result<String> {
        let fail = |message: String| StudyFlowError::Template {
            owner: owner.to_string(),
            message,
        };

        let mut out = String::with_capacity(template.len());
        let mut chars = template.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    out.push('{');
                }
                '{' => {
                    let mut key = String::new();
                    let mut closed = false;
                    for next in chars.by_ref() {
                        if next == '}' {
                            closed = true;
                            break;
                        }
                        key.push(next);
                    }
                    if !closed {
                        return Err(fail(format!("unterminated placeholder `{{{}`", key)));
                    }
                    let key = key.as_str();
                    let value = self.get(key).ok_or_else(|| {
                        let known: Vec<&str> = self.keys().collect();
                        fail(format!(
                            "unrecognized placeholder `{{{}}}` (known: {})",
                            key,
                            if known.is_empty() { "none".to_string() } else { known.join(", ") }
                        ))
                    })?;
                    out.push_str(value);
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    out.push('}');
                }
                '}' => return Err(fail("single `}` encountered".to_string())),
                other => out.push(other),
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subs() -> Substitutions {
        Substitutions::new()
            .with("source_content", "DOC")
            .with("quiz_config", "Exactly 5 Multiple Choice Questions")
    }

    #[test]
    fn renders_known_placeholders() {
        let out = subs()
            .render("task `t`", "Read {source_content}\nQuiz: {quiz_config}")
            .unwrap();
        assert_eq!(out, "Read DOC\nQuiz: Exactly 5 Multiple Choice Questions");
    }

    #[test]
    fn double_braces_are_literals() {
        let out = subs().render("t", "{{\"facts\": []}} {source_content}").unwrap();
        assert_eq!(out, "{\"facts\": []} DOC");
    }

    #[test]
    fn unknown_placeholder_fails() {
        let err = subs().render("task `t`", "hello {audience}").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("audience"));
        assert!(message.contains("task `t`"));
    }

    #[test]
    fn padded_key_is_not_recognized() {
        let err = subs().render("task `t`", "Read { source_content }").unwrap_err();
        assert!(matches!(err, StudyFlowError::Template { .. }));
        assert!(err.to_string().contains("{ source_content }"));
    }

    #[test]
    fn unbalanced_braces_fail() {
        assert!(subs().render("t", "open {source_content").is_err());
        assert!(subs().render("t", "close } here").is_err());
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let subs = Substitutions::new().with("source_content", "has {braces}");
        assert_eq!(subs.render("t", "{source_content}").unwrap(), "has {braces}");
    }
}
