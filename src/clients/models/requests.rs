use serde::Serialize;

/// Body of a `generateContent` call carrying a single text prompt.
#[derive(Debug, Serialize)]
pub struct GenerateContentRequest<'a> {
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

impl<'a> GenerateContentRequest<'a> {
    pub fn from_prompt(prompt: &'a str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        }
    }
}
