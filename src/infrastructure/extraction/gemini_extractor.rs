//! Smart fill backed by the Gemini `generateContent` endpoint.
//!
//! The model is asked for JSON constrained by a response schema, which is
//! then decoded straight into an [`ExtractedInvoice`].

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;

use crate::domain::invoice::{ExtractedInvoice, errors::InvoiceError, ports::InvoiceExtractor};

/// Gemini extractor configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
  pub api_key: String,
  pub model: String,
  pub base_url: String,
  pub timeout: Duration,
}

pub struct GeminiExtractor {
  config: GeminiConfig,
  client: Client,
}

impl GeminiExtractor {
  pub fn new(config: GeminiConfig) -> Result<Self, InvoiceError> {
    let client = Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(|e| InvoiceError::Internal(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Self { config, client })
  }

  fn api_url(&self) -> String {
    format!(
      "{}/models/{}:generateContent?key={}",
      self.config.base_url.trim_end_matches('/'),
      self.config.model,
      self.config.api_key
    )
  }
}

#[async_trait]
impl InvoiceExtractor for GeminiExtractor {
  async fn extract(&self, text: &str, today: NaiveDate) -> Result<ExtractedInvoice, InvoiceError> {
    let request = build_request(text, today);

    tracing::debug!(
      model = %self.config.model,
      prompt_len = text.len(),
      "Sending extraction request to Gemini API"
    );

    let response = self
      .client
      .post(self.api_url())
      .json(&request)
      .send()
      .await
      .map_err(|e| InvoiceError::ExtractionFailed(format!("Network error: {}", e)))?;

    if !response.status().is_success() {
      let status = response.status();
      let error_text = response.text().await.unwrap_or_default();
      return Err(InvoiceError::ExtractionFailed(format!(
        "Gemini API error {}: {}",
        status, error_text
      )));
    }

    let body: GenerateContentResponse = response
      .json()
      .await
      .map_err(|e| InvoiceError::ExtractionFailed(format!("Failed to parse response: {}", e)))?;

    if let Some(usage) = &body.usage_metadata {
      tracing::debug!(
        input_tokens = usage.prompt_token_count.unwrap_or(0),
        output_tokens = usage.candidates_token_count.unwrap_or(0),
        "Gemini extraction finished"
      );
    }

    parse_response(body)
  }
}

fn extraction_prompt(text: &str, today: NaiveDate) -> String {
  format!(
    r#"Extract invoice details from the text below.

Rules:
1. Raw data or lists become line items.
2. A comma may be the decimal separator (Indonesian/European style): "0,5" is 0.5.
3. Capture units of measurement such as kg, liter, pcs or pack when given.
4. Capture dates of individual line items when given.
5. Generate the invoice number as "INV-{{YYYYMMDD}}-{{Sequence}}" (e.g. INV-20231025-001) from the invoice date.
6. A line item without a date gets one between the invoice date and the due date, inclusive.
7. Today's date is {today}.

Text: "{text}""#,
    today = today.format("%Y-%m-%d"),
    text = text,
  )
}

fn response_schema() -> Value {
  json!({
    "type": "OBJECT",
    "properties": {
      "invoiceNumber": { "type": "STRING" },
      "date": { "type": "STRING", "description": "YYYY-MM-DD format" },
      "dueDate": { "type": "STRING", "description": "YYYY-MM-DD format" },
      "senderName": { "type": "STRING" },
      "senderAddress": { "type": "STRING" },
      "clientName": { "type": "STRING" },
      "clientAddress": { "type": "STRING" },
      "currency": { "type": "STRING", "description": "Currency code e.g. IDR, USD" },
      "notes": { "type": "STRING" },
      "items": {
        "type": "ARRAY",
        "items": {
          "type": "OBJECT",
          "properties": {
            "date": {
              "type": "STRING",
              "description": "Item date in YYYY-MM-DD format, between the invoice date and the due date"
            },
            "description": { "type": "STRING" },
            "quantity": { "type": "NUMBER" },
            "unit": { "type": "STRING", "description": "Unit like kg, liter, pcs" },
            "rate": { "type": "NUMBER" }
          },
          "required": ["description", "quantity", "rate"]
        }
      }
    }
  })
}

fn build_request(text: &str, today: NaiveDate) -> GenerateContentRequest {
  GenerateContentRequest {
    contents: vec![Content {
      role: Some("user".to_string()),
      parts: vec![ContentPart {
        text: extraction_prompt(text, today),
      }],
    }],
    generation_config: GenerationConfig {
      response_mime_type: "application/json".to_string(),
      response_schema: response_schema(),
    },
  }
}

fn parse_response(body: GenerateContentResponse) -> Result<ExtractedInvoice, InvoiceError> {
  let text = body
    .candidates
    .into_iter()
    .next()
    .and_then(|candidate| candidate.content.parts.into_iter().next())
    .map(|part| part.text)
    .filter(|text| !text.trim().is_empty())
    .ok_or_else(|| InvoiceError::ExtractionFailed("No data returned from Gemini".to_string()))?;

  serde_json::from_str(text.trim()).map_err(|e| {
    InvoiceError::ExtractionFailed(format!("Failed to parse invoice data from response: {}", e))
  })
}

// Gemini API request/response types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
  contents: Vec<Content>,
  generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
  #[serde(skip_serializing_if = "Option::is_none")]
  role: Option<String>,
  #[serde(default)]
  parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ContentPart {
  #[serde(default)]
  text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
  response_mime_type: String,
  response_schema: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
  #[serde(default)]
  usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
  content: Content,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
  prompt_token_count: Option<i32>,
  candidates_token_count: Option<i32>,
}
