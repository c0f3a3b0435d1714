//! Queue-style REST backend.
//!
//! Generation requests are submitted to `{base_url}/{model}`, the returned status URL is polled
//! until the request completes, and the result is read from the returned response URL. Caption
//! suggestions go to an OpenAI-compatible chat completions endpoint.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde_json::{Value, json};

use crate::config::ProviderConfig;
use crate::foundation::error::ForgeResult;
use crate::provider::{
    ExternalCallError, GenerationRequest, GenerativeBackend, SourceImage, TextStickerIdea, bounded,
};

const IMAGE_NEGATIVE_SUFFIX: &str = ", low quality, jpeg artifacts, watermark, signature";
const TITLE_PROMPT: &str = "Describe the person in this image in 2-4 words for a sticker pack title. Examples: 'Girl with Blue Hair', 'Guy in Suit', 'Happy Gamer'. Return ONLY the title, nothing else.";
const MAX_SUGGESTIONS: usize = 4;

pub struct HttpBackend {
    client: reqwest::Client,
    cfg: ProviderConfig,
}

impl HttpBackend {
    pub fn new(cfg: ProviderConfig) -> ForgeResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(cfg.call_timeout())
            .build()
            .context("build http client")?;
        Ok(Self { client, cfg })
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.cfg.poll_interval_ms.max(50))
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.cfg.api_key {
            Some(key) => req.header(AUTHORIZATION, format!("Key {key}")),
            None => req,
        }
    }

    async fn read_json(resp: reqwest::Response) -> Result<Value, ExternalCallError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(ExternalCallError::Status {
                code: status.as_u16(),
            });
        }
        Ok(resp.json::<Value>().await?)
    }

    async fn get_json(&self, url: &str) -> Result<Value, ExternalCallError> {
        let resp = self.authorize(self.client.get(url)).send().await?;
        Self::read_json(resp).await
    }

    /// Submit to the queue, poll until completion, and return the result document.
    async fn run_queued(&self, model: &str, payload: Value) -> Result<Value, ExternalCallError> {
        let url = format!("{}/{}", self.cfg.base_url.trim_end_matches('/'), model);
        bounded(self.cfg.call_timeout(), async {
            let resp = self
                .authorize(self.client.post(&url))
                .json(&payload)
                .send()
                .await?;
            let submitted = Self::read_json(resp).await?;
            let status_url = str_field(&submitted, "status_url")?;
            let response_url = str_field(&submitted, "response_url")?;

            loop {
                let status = self.get_json(&status_url).await?;
                match status.get("status").and_then(Value::as_str).unwrap_or("") {
                    "COMPLETED" => break,
                    "FAILED" | "ERROR" | "CANCELLED" => {
                        return Err(ExternalCallError::malformed(format!(
                            "{model} request failed: {status}"
                        )));
                    }
                    _ => tokio::time::sleep(self.poll_interval()).await,
                }
            }

            self.get_json(&response_url).await
        })
        .await
    }
}

#[async_trait]
impl GenerativeBackend for HttpBackend {
    #[tracing::instrument(skip_all, fields(model = %self.cfg.image_to_image_model))]
    async fn generate_from_image(
        &self,
        source: &SourceImage,
        request: &GenerationRequest,
    ) -> Result<String, ExternalCallError> {
        let payload = json!({
            "image_urls": [source.data_uri()],
            "prompt": request.prompt,
            "negative_prompt": format!("{}{}", request.negative_prompt, IMAGE_NEGATIVE_SUFFIX),
            "strength": request.params.strength,
            "guidance_scale": request.params.guidance_scale,
            "seed": 42,
            "num_inference_steps": 20,
        });
        let result = self
            .run_queued(&self.cfg.image_to_image_model, payload)
            .await?;
        extract_image_url(&result).ok_or(ExternalCallError::NoImage)
    }

    #[tracing::instrument(skip_all, fields(model = %self.cfg.text_to_image_model))]
    async fn generate_from_text(
        &self,
        request: &GenerationRequest,
    ) -> Result<String, ExternalCallError> {
        let payload = json!({
            "prompt": request.prompt,
            "negative_prompt": request.negative_prompt,
            "image_size": "square_hd",
            "seed": rand::random_range(1..1_000_000u32),
            "num_inference_steps": 20,
            "guidance_scale": request.params.guidance_scale,
        });
        let result = self
            .run_queued(&self.cfg.text_to_image_model, payload)
            .await?;
        extract_image_url(&result).ok_or(ExternalCallError::NoImage)
    }

    async fn remove_background(&self, image_ref: &str) -> Result<String, ExternalCallError> {
        let result = self
            .run_queued(&self.cfg.background_model, json!({ "image_url": image_ref }))
            .await?;
        extract_image_url(&result).ok_or(ExternalCallError::NoImage)
    }

    async fn describe_for_title(&self, source: &SourceImage) -> Result<String, ExternalCallError> {
        let payload = json!({
            "image_url": source.data_uri(),
            "prompt": TITLE_PROMPT,
            "max_tokens": 20,
        });
        let result = self.run_queued(&self.cfg.vision_model, payload).await?;
        let raw = result
            .get("output")
            .and_then(Value::as_str)
            .ok_or_else(|| ExternalCallError::malformed("title response has no output"))?;
        clean_title(raw).ok_or_else(|| ExternalCallError::malformed("empty title"))
    }

    #[tracing::instrument(skip(self))]
    async fn suggest_text_stickers(
        &self,
        subject: &str,
        mood: &str,
        style: &str,
        language: &str,
    ) -> Result<Vec<TextStickerIdea>, ExternalCallError> {
        let Some(key) = &self.cfg.llm_api_key else {
            return Err(ExternalCallError::Unsupported("suggest_text_stickers"));
        };
        let url = format!(
            "{}/chat/completions",
            self.cfg.llm_base_url.trim_end_matches('/')
        );
        let body = json!({
            "model": self.cfg.llm_model,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": suggestion_system_prompt(language) },
                { "role": "user", "content": format!(
                    "Subject: {subject}\nMood: {mood}\nStyle: {style}\nReturn {MAX_SUGGESTIONS} stickers."
                ) },
            ],
        });

        bounded(self.cfg.call_timeout(), async {
            let resp = self
                .client
                .post(&url)
                .bearer_auth(key)
                .json(&body)
                .send()
                .await?;
            let doc = Self::read_json(resp).await?;
            let content = doc["choices"][0]["message"]["content"]
                .as_str()
                .ok_or_else(|| ExternalCallError::malformed("completion has no content"))?;
            parse_suggestions(content)
        })
        .await
    }

    async fn fetch_image(&self, image_ref: &str) -> Result<Vec<u8>, ExternalCallError> {
        if let Some((_, bytes)) = crate::compositor::codec::parse_data_uri(image_ref) {
            return Ok(bytes);
        }
        bounded(self.cfg.call_timeout(), async {
            let resp = self.client.get(image_ref).send().await?;
            let status = resp.status();
            if !status.is_success() {
                return Err(ExternalCallError::Status {
                    code: status.as_u16(),
                });
            }
            Ok(resp.bytes().await?.to_vec())
        })
        .await
    }
}

fn str_field(doc: &Value, key: &str) -> Result<String, ExternalCallError> {
    doc.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ExternalCallError::malformed(format!("queue response missing {key}")))
}

/// First image reference in a result document: `images[0].url`, `image.url`, or `output`.
pub(crate) fn extract_image_url(doc: &Value) -> Option<String> {
    let candidates = [
        doc.pointer("/images/0/url"),
        doc.pointer("/image/url"),
        doc.get("output"),
    ];
    candidates
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| s.starts_with("http") || s.starts_with("data:"))
        .map(str::to_string)
}

pub(crate) fn clean_title(raw: &str) -> Option<String> {
    let t = raw.trim().trim_matches(|c: char| c == '"' || c == '\'').trim();
    (!t.is_empty()).then(|| t.to_string())
}

/// Accepts `{"stickers": [...]}` or a bare array of `{caption, prompt}` objects.
pub(crate) fn parse_suggestions(content: &str) -> Result<Vec<TextStickerIdea>, ExternalCallError> {
    let doc: Value =
        serde_json::from_str(content).map_err(|e| ExternalCallError::malformed(e.to_string()))?;
    let list = match &doc {
        Value::Array(_) => doc.clone(),
        Value::Object(obj) => obj
            .get("stickers")
            .cloned()
            .ok_or_else(|| ExternalCallError::malformed("suggestions missing stickers"))?,
        _ => return Err(ExternalCallError::malformed("suggestions must be json")),
    };
    let ideas: Vec<TextStickerIdea> =
        serde_json::from_value(list).map_err(|e| ExternalCallError::malformed(e.to_string()))?;
    let ideas: Vec<TextStickerIdea> = ideas
        .into_iter()
        .filter(|i| !i.prompt.trim().is_empty())
        .take(MAX_SUGGESTIONS)
        .collect();
    if ideas.is_empty() {
        return Err(ExternalCallError::malformed("no usable suggestions"));
    }
    Ok(ideas)
}

fn suggestion_system_prompt(language: &str) -> String {
    format!(
        "You are a viral WhatsApp sticker caption expert. For the given subject, propose short \
         sticker captions written the way people actually type in chat, in language '{language}'. \
         For each caption write an image prompt for a cute mascot character themed on the \
         subject, isolated on a pure white background, with no text in the image. Respond with \
         JSON: {{\"stickers\": [{{\"caption\": \"...\", \"prompt\": \"...\"}}]}}."
    )
}

#[cfg(test)]
#[path = "../../tests/unit/provider/http.rs"]
mod tests;
