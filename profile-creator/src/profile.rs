//! Agent profile prompt composition and generation.

use anyhow::{Context, Result, bail};
use gptunnel_client::{ChatBackend, ChatMessage, ChatRequest, GenerationParams};
use log::info;

pub const DEFAULT_TEMPERATURE: f64 = 0.75;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

const DEFAULT_SYSTEM_PROMPT: &str = "Ты — ИИ-сценарист и психолог, мастер создания уникальных и глубоко проработанных персонажей. \
Твоя задача — на основе предоставленной краткой информации создать полный, многогранный и креативный профиль для нового ИИ-агента. \
Этот профиль будет служить основой его личности и поведения.\n\n\
Включи в профиль следующие аспекты:\n\
- **Предыстория и происхождение:** Откуда он появился? Какие ключевые события сформировали его?\n\
- **Личность и характер:** Какие у него доминирующие черты? Экстраверт/интроверт? Эмоциональный/логичный? Оптимист/пессимист?\n\
- **Мировоззрение и философия:** Во что он верит? Каковы его основные принципы и ценности?\n\
- **Мотивация и цели:** Что им движет? К чему он стремится (в рамках своей роли и задач)?\n\
- **Сильные стороны:** В чем он особенно хорош? Какие у него таланты и уникальные способности?\n\
- **Слабые стороны или уязвимости:** Какие у него есть недостатки или ограничения? (Это делает персонажа более реалистичным)\n\
- **Стиль общения:** Как он обычно говорит? Формально, неформально, саркастично, поэтично, прямолинейно?\n\
- **Увлечения и интересы (если применимо):** Чем он занимается в 'свободное время' или что его особенно увлекает вне основных задач?\n\
- **Внешний вид (на основе описания, если есть):** Как он мог бы выглядеть или восприниматься, если бы имел физическое или визуальное воплощение?\n\
- **Отношение к задачам и роли:** Как он относится к своей работе и предназначению?\n\n\
Профиль должен быть написан увлекательным, повествовательным стилем от третьего лица. \
Избегай простого перечисления фактов; вместо этого создай целостный образ.";

const USER_PROMPT_HEADER: &str = "Вот исходные данные для создания профиля ИИ-агента:";
const USER_PROMPT_FOOTER: &str =
    "\nПожалуйста, разработай на основе этого детальный профиль, следуя инструкциям из системного сообщения.";

/// What the user knows about the agent. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentDetails {
    pub name: Option<String>,
    pub role: Option<String>,
    pub tasks: Option<String>,
    pub age: Option<String>,
    pub education: Option<String>,
    pub photo_description: Option<String>,
}

impl AgentDetails {
    /// Name for log lines.
    pub fn display_name(&self) -> &str {
        present(&self.name).unwrap_or("N/A")
    }

    /// Labelled lines for the fields that are filled in, in a fixed order.
    fn lines(&self) -> Vec<String> {
        [
            ("Имя (или кодовое имя)", &self.name),
            ("Основная роль", &self.role),
            ("Ключевые задачи", &self.tasks),
            ("Возраст (или как воспринимается)", &self.age),
            ("Образование/Источник знаний", &self.education),
            (
                "Внешние черты или атмосфера (на основе предоставленного описания)",
                &self.photo_description,
            ),
        ]
        .into_iter()
        .filter_map(|(label, value)| present(value).map(|v| format!("- {}: {}", label, v)))
        .collect()
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Caller overrides for a generation run.
#[derive(Debug, Clone, Default)]
pub struct ProfileOptions {
    /// Replaces the default system prompt verbatim
    pub system_template: Option<String>,
    /// Replaces the default user prompt verbatim
    pub user_template: Option<String>,
    /// Overlaid on the default temperature and token limit
    pub params: GenerationParams,
}

/// Build the `[system, user]` message pair.
pub fn build_messages(
    details: &AgentDetails,
    system_template: Option<&str>,
    user_template: Option<&str>,
) -> Vec<ChatMessage> {
    let system = system_template.unwrap_or(DEFAULT_SYSTEM_PROMPT).to_string();

    let user = match user_template {
        Some(template) => template.to_string(),
        None => {
            let mut parts = vec![USER_PROMPT_HEADER.to_string()];
            parts.extend(details.lines());
            parts.push(USER_PROMPT_FOOTER.to_string());
            parts.join("\n")
        }
    };

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

/// Default generation parameters for profile text.
pub fn default_params() -> GenerationParams {
    GenerationParams::new()
        .temperature(DEFAULT_TEMPERATURE)
        .max_tokens(DEFAULT_MAX_TOKENS)
}

/// Generate a profile and return the model's reply.
pub async fn generate_profile(
    backend: &dyn ChatBackend,
    model_id: &str,
    details: &AgentDetails,
    use_wallet_balance: bool,
    options: &ProfileOptions,
) -> Result<String> {
    if model_id.trim().is_empty() {
        bail!("Model id is required");
    }

    let messages = build_messages(
        details,
        options.system_template.as_deref(),
        options.user_template.as_deref(),
    );
    let request = ChatRequest::new(model_id, messages)
        .use_wallet_balance(use_wallet_balance)
        .params(default_params().merged(&options.params));

    info!(
        "Generating profile for '{}' with {} ({})",
        details.display_name(),
        model_id,
        backend.name()
    );

    let profile = backend
        .chat_completion(request)
        .await
        .with_context(|| format!("Profile generation failed for '{}'", details.display_name()))?;

    info!("Profile for '{}' generated", details.display_name());
    Ok(profile)
}
