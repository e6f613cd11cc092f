/// 模型提供商
///
/// 由模型 id 的第一段决定，例如 `openrouter/google/gemini-pro-1.5`
/// 解析为 `OpenRouter` 与线上模型名 `google/gemini-pro-1.5`。
/// 没有前缀的模型 id 视为 OpenAI；无法识别的前缀走 `Generic`，必须显式配置 `base_url`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenRouter,
    OpenAi,
    Anthropic,
    Gemini,
    DeepSeek,
    Groq,
    Ollama,
    Generic,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenRouter => "openrouter",
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Gemini => "gemini",
            Provider::DeepSeek => "deepseek",
            Provider::Groq => "groq",
            Provider::Ollama => "ollama",
            Provider::Generic => "generic",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "openrouter" => Some(Provider::OpenRouter),
            "openai" => Some(Provider::OpenAi),
            "anthropic" => Some(Provider::Anthropic),
            "gemini" => Some(Provider::Gemini),
            "deepseek" => Some(Provider::DeepSeek),
            "groq" => Some(Provider::Groq),
            "ollama" => Some(Provider::Ollama),
            _ => None,
        }
    }

    /// 拆分模型 id，返回提供商和发送给 API 的模型名
    pub fn resolve(model: &str) -> (Provider, String) {
        match model.split_once('/') {
            Some((prefix, rest)) => match Self::from_prefix(prefix) {
                Some(provider) => (provider, rest.to_string()),
                None => (Provider::Generic, model.to_string()),
            },
            None => (Provider::OpenAi, model.to_string()),
        }
    }

    pub fn default_endpoint(&self) -> Option<&'static str> {
        match self {
            Provider::OpenRouter => Some("https://openrouter.ai/api/v1"),
            Provider::OpenAi => Some("https://api.openai.com/v1"),
            Provider::Anthropic => Some("https://api.anthropic.com/v1"),
            Provider::Gemini => Some("https://generativelanguage.googleapis.com/v1beta/openai"),
            Provider::DeepSeek => Some("https://api.deepseek.com/v1"),
            Provider::Groq => Some("https://api.groq.com/openai/v1"),
            Provider::Ollama => Some("http://localhost:11434/v1"),
            Provider::Generic => None,
        }
    }

    /// 获取默认的 API key 环境变量名
    pub fn default_env_key(&self) -> Option<&'static str> {
        match self {
            Provider::OpenRouter => Some("OPENROUTER_API_KEY"),
            Provider::OpenAi => Some("OPENAI_API_KEY"),
            Provider::Anthropic => Some("ANTHROPIC_API_KEY"),
            Provider::Gemini => Some("GEMINI_API_KEY"),
            Provider::DeepSeek => Some("DEEPSEEK_API_KEY"),
            Provider::Groq => Some("GROQ_API_KEY"),
            Provider::Ollama | Provider::Generic => None,
        }
    }

    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Provider::Ollama | Provider::Generic)
    }
}
