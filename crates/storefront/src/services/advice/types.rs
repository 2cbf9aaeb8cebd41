//! Request and response types for `generateContent`.

use serde::{Deserialize, Serialize};

/// Request body.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// A single user turn containing `prompt`.
    #[must_use]
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.into()),
                }],
            }],
        }
    }
}

/// One turn of a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A piece of a turn. Only text parts are used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Response body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One generated answer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts concatenated and trimmed.
    ///
    /// `None` when there is no candidate or it holds only whitespace.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

/// What the shopper asked about which product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylingRequest<'a> {
    pub product_name: &'a str,
    pub product_description: &'a str,
    pub question: &'a str,
}

impl StylingRequest<'_> {
    /// Prompt framing the model as the in-house stylist.
    #[must_use]
    pub fn prompt(&self) -> String {
        format!(
            "You are a world-class men's fashion stylist working for \"Home of Suits\".\n\
             The customer is looking at this product:\n\
             Name: {name}\n\
             Description: {description}\n\
             \n\
             The customer asks: \"{question}\"\n\
             \n\
             Provide a helpful, sophisticated, and concise answer (max 100 words).\n\
             Suggest matching accessories (ties, shoes, pocket squares) if relevant.\n\
             Maintain a luxury, helpful tone.",
            name = self.product_name,
            description = self.product_description,
            question = self.question.trim(),
        )
    }
}
