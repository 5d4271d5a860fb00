use serde::Serialize;

/// Envelope for `/api/chatbot`. Failures from the intent service are replies,
/// not HTTP errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChatReply {
    #[serde(rename_all = "camelCase")]
    Answered {
        success: bool,
        response: String,
        intent: String,
        session_id: String,
    },
    Failed { success: bool, error: String },
}

impl ChatReply {
    pub fn answered(response: String, intent: String, session_id: String) -> Self {
        ChatReply::Answered {
            success: true,
            response,
            intent,
            session_id,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        ChatReply::Failed {
            success: false,
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ChatReply::Answered { .. })
    }
}

/// Envelope for `/api/gemini`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GenerateReply {
    Generated { success: bool, response: String },
    Failed { success: bool, error: String },
}

impl GenerateReply {
    pub fn generated(response: String) -> Self {
        GenerateReply::Generated {
            success: true,
            response,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        GenerateReply::Failed {
            success: false,
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, GenerateReply::Generated { .. })
    }
}
