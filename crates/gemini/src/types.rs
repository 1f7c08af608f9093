use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declaration of a callable function offered to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON schema for the function parameters
    pub parameters: Value,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// A structured function call returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    pub args: Value,
}

/// A resolved tool call fed back to the model for a follow-up turn.
#[derive(Debug, Clone)]
pub struct ToolResult {
    pub call: ToolCall,
    pub response: Value,
}

/// One inference request against the backend.
#[derive(Debug, Clone, Default)]
pub struct InferenceRequest {
    pub system_instruction: String,
    pub prompt: String,
    pub tools: Vec<ToolSpec>,
    pub temperature: Option<f32>,
    /// When present, the request replays the model's earlier function call
    /// together with its result so the model can compose a final answer.
    pub tool_result: Option<ToolResult>,
}

impl InferenceRequest {
    pub fn new(system_instruction: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_tool_result(mut self, result: ToolResult) -> Self {
        self.tool_result = Some(result);
        self
    }
}

/// The backend's answer: free text plus at most one structured tool call.
#[derive(Debug, Clone)]
pub struct InferenceResponse {
    pub text: String,
    pub tool_call: Option<ToolCall>,
}

// --- Wire types for the generateContent REST API ---

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,
}

impl Part {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            text: Some(content.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct FunctionResponse {
    pub name: String,
    pub response: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts,
        }
    }

    pub fn model(parts: Vec<Part>) -> Self {
        Self {
            role: Some("model".to_string()),
            parts,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FunctionDeclarations {
    pub function_declarations: Vec<ToolSpec>,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<FunctionDeclarations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Lower an [`InferenceRequest`] to the wire format.
    pub fn from_inference(request: &InferenceRequest) -> Self {
        let mut contents = vec![Content::user(vec![Part::text(request.prompt.as_str())])];

        if let Some(ref result) = request.tool_result {
            contents.push(Content::model(vec![Part {
                function_call: Some(FunctionCall {
                    name: result.call.name.clone(),
                    args: result.call.args.clone(),
                }),
                ..Default::default()
            }]));
            contents.push(Content::user(vec![Part {
                function_response: Some(FunctionResponse {
                    name: result.call.name.clone(),
                    response: result.response.clone(),
                }),
                ..Default::default()
            }]));
        }

        let system_instruction = if request.system_instruction.is_empty() {
            None
        } else {
            Some(Content {
                role: None,
                parts: vec![Part::text(request.system_instruction.as_str())],
            })
        };

        let tools = if request.tools.is_empty() {
            Vec::new()
        } else {
            vec![FunctionDeclarations {
                function_declarations: request.tools.clone(),
            }]
        };

        Self {
            system_instruction,
            contents,
            tools,
            generation_config: request.temperature.map(|temperature| GenerationConfig {
                temperature: Some(temperature),
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Candidate {
    pub content: Content,
}

impl GenerateContentResponse {
    /// Extract text and the first function call from the top candidate.
    pub fn into_inference(self) -> Option<InferenceResponse> {
        let candidate = self.candidates.into_iter().next()?;

        let mut text_parts: Vec<String> = Vec::new();
        let mut tool_call = None;
        for part in candidate.content.parts {
            if let Some(text) = part.text {
                text_parts.push(text);
            }
            if tool_call.is_none() {
                if let Some(call) = part.function_call {
                    tool_call = Some(ToolCall {
                        name: call.name,
                        args: call.args,
                    });
                }
            }
        }

        Some(InferenceResponse {
            text: text_parts.join(""),
            tool_call,
        })
    }
}
