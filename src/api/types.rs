use serde::{Deserialize, Serialize};

use crate::error::AnalyzeError;

#[derive(Clone, Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub url: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

/// JSON body of every non-2xx response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: None,
        }
    }
}

impl From<&AnalyzeError> for ErrorBody {
    fn from(err: &AnalyzeError) -> Self {
        Self {
            message: err.to_string(),
            kind: Some(err.kind().to_string()),
        }
    }
}
