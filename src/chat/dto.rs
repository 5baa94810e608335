use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

// --- generateContent wire format (request) ---

#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Content<'a> {
    pub parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Part<'a> {
    pub text: &'a str,
}

impl<'a> GenerateRequest<'a> {
    pub fn from_prompt(prompt: &'a str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        }
    }
}

// --- generateContent wire format (response) ---

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpstreamErrorBody {
    pub error: Option<UpstreamErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct UpstreamErrorDetail {
    pub message: Option<String>,
}

impl GenerateResponse {
    /// First candidate text, mirroring `candidates[0].content.parts[0].text`.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_candidate_text() {
        let body = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "hello there" }] }
            }]
        });
        let resp: GenerateResponse = serde_json::from_value(body).unwrap();
        assert_eq!(resp.first_text(), Some("hello there"));
    }

    #[test]
    fn missing_candidates_yield_none() {
        let resp: GenerateResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(resp.first_text(), None);

        let resp: GenerateResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{ "content": { "parts": [] } }]
        }))
        .unwrap();
        assert_eq!(resp.first_text(), None);
    }

    #[test]
    fn request_shape_matches_wire_format() {
        let req = GenerateRequest::from_prompt("hi");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
    }

    #[test]
    fn upstream_error_message_is_parsed() {
        let body: UpstreamErrorBody = serde_json::from_value(serde_json::json!({
            "error": { "message": "quota exceeded", "code": 429 }
        }))
        .unwrap();
        assert_eq!(
            body.error.and_then(|e| e.message).as_deref(),
            Some("quota exceeded")
        );
    }
}
