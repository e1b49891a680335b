use crate::protocol::Action;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why a call to the endpoint did not produce the expected payload.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The endpoint answered `success: false`.
    #[error("{action} rejected: {message}")]
    Rejected { action: Action, message: String },

    /// The request never got a response body.
    #[error("{action} request failed: {source}")]
    Transport {
        action: Action,
        #[source]
        source: BoxError,
    },

    /// The response body was not the JSON shape the action expects.
    #[error("{action} response was malformed: {detail}")]
    Malformed { action: Action, detail: String },
}

impl ClientError {
    /// Build a rejection, substituting the action's fallback text when the
    /// server sent no message (or an empty one).
    pub fn rejected(action: Action, server_message: Option<String>) -> Self {
        let message = server_message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| action.failure_message().to_string());
        ClientError::Rejected { action, message }
    }

    pub fn transport(action: Action, source: impl Into<BoxError>) -> Self {
        ClientError::Transport {
            action,
            source: source.into(),
        }
    }

    pub fn malformed(action: Action, detail: impl std::fmt::Display) -> Self {
        ClientError::Malformed {
            action,
            detail: detail.to_string(),
        }
    }

    pub fn action(&self) -> Action {
        match self {
            ClientError::Rejected { action, .. }
            | ClientError::Transport { action, .. }
            | ClientError::Malformed { action, .. } => *action,
        }
    }

    /// Text to put in front of the user.
    pub fn alert_message(&self) -> String {
        match self {
            ClientError::Rejected { message, .. } => message.clone(),
            ClientError::Transport { action, .. } | ClientError::Malformed { action, .. } => {
                action.transport_message().to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_failures_get_generic_text() {
        let err = ClientError::transport(
            Action::Login,
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
        );
        assert_eq!(
            err.alert_message(),
            "An error occurred during login. Please try again."
        );
        assert_eq!(err.action(), Action::Login);
        assert!(err.to_string().contains("refused"));
    }

    #[test]
    fn rejected_keeps_server_text() {
        let err = ClientError::rejected(Action::Signup, Some("Username already exists.".into()));
        assert_eq!(err.alert_message(), "Username already exists.");
    }
}
