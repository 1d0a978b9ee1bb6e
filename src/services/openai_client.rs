use std::error::Error;

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};

const COMPLETION_MODEL: &str = "gpt-4o-mini";
const SYSTEM_PROMPT: &str = "You are a helpful assistant analyzing supplier website content.";

pub struct OpenaiClient {
    client: Client<OpenAIConfig>,
}

impl Default for OpenaiClient {
    fn default() -> Self {
        OpenaiClient {
            client: Client::new(),
        }
    }
}

impl OpenaiClient {
    pub fn new(api_key: String) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        OpenaiClient {
            client: Client::with_config(config),
        }
    }

    /// One-shot completion over an explicitly supplied context string.
    /// Provider errors surface as-is; callers decide how to degrade.
    pub async fn chat_about_supplier(
        &self,
        question: &str,
        context: &str,
    ) -> Result<String, Box<dyn Error>> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(COMPLETION_MODEL)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(SYSTEM_PROMPT)
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(format!("Context: {}\n\nQuestion: {}", context, question))
                    .build()?
                    .into(),
            ])
            .max_tokens(500_u32)
            .temperature(0.7)
            .build()?;

        let response = self.client.chat().create(request).await?;

        let first_choice = response
            .choices
            .first()
            .ok_or("No choices in Openai response")?
            .message
            .content
            .clone()
            .ok_or("No content")?;

        Ok(first_choice.trim().to_string())
    }
}
