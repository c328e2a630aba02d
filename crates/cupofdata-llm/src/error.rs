use cupofdata_extract::{Capability, ClassifierError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("completion response has no message content")]
    MissingContent,

    #[error("could not decode completion: {0}")]
    Decode(String),
}

impl LlmError {
    /// Map onto the pipeline's error type for `capability`.
    ///
    /// Auth and quota statuses mean the service is unusable for the rest of
    /// the run; other transport failures are per-request.
    #[must_use]
    pub fn into_classifier(self, capability: Capability) -> ClassifierError {
        match self {
            LlmError::Status { status, body } if matches!(status, 401 | 403 | 429) => {
                ClassifierError::Unavailable {
                    capability,
                    reason: format!("HTTP {status}: {body}"),
                }
            }
            e @ (LlmError::Http(_) | LlmError::Status { .. }) => ClassifierError::Request {
                capability,
                reason: e.to_string(),
            },
            e @ (LlmError::MissingContent | LlmError::Decode(_)) => {
                ClassifierError::MalformedResponse {
                    capability,
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_status_is_unavailable() {
        let err = LlmError::Status {
            status: 429,
            body: "quota".to_owned(),
        }
        .into_classifier(Capability::Relevance);
        assert!(matches!(err, ClassifierError::Unavailable { .. }));
    }

    #[test]
    fn server_status_is_request_error() {
        let err = LlmError::Status {
            status: 502,
            body: String::new(),
        }
        .into_classifier(Capability::Summary);
        assert!(matches!(err, ClassifierError::Request { .. }));
    }

    #[test]
    fn decode_failure_is_malformed() {
        let err = LlmError::Decode("maybe".to_owned()).into_classifier(Capability::Opinion);
        assert!(matches!(
            err,
            ClassifierError::MalformedResponse {
                capability: Capability::Opinion,
                ..
            }
        ));
    }
}
