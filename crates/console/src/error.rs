//! Unified error handling for the console.
//!
//! Every console operation fails with a [`ConsoleError`]. Errors are
//! recovered at the component boundary and turned into a user-visible
//! [`Notification`]; none of them is retried.

use thiserror::Error;

use crate::api::ApiError;

/// Console-level error type.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// A client-side precondition failed; no request was sent.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The user directory has no user with this email.
    #[error("No user found with email {0}")]
    OwnerNotFound(String),

    /// A remote call failed (transport error or non-2xx response).
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(#[source] ApiError),

    /// Registration rejected because the email is already taken.
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<ApiError> for ConsoleError {
    fn from(err: ApiError) -> Self {
        Self::ServiceUnavailable(err)
    }
}

impl ConsoleError {
    /// The notification shown to the user for this error.
    #[must_use]
    pub fn notification(&self) -> Notification {
        match self {
            Self::Validation(reason) => Notification::error("Invalid Input", reason.clone()),
            Self::OwnerNotFound(email) => Notification::error(
                "User Not Found",
                format!("No user found with email {email}."),
            ),
            Self::ServiceUnavailable(_) => Notification::error(
                "Error",
                "The parcel service could not complete the request. Please try again.",
            ),
            Self::Conflict(_) => Notification::error(
                "Email Already Exists",
                "Email already exists. Please use a different email.",
            ),
        }
    }

    /// Logs the error and returns its notification.
    ///
    /// Remote failures are also forwarded to Sentry (a no-op when Sentry is
    /// not initialised).
    pub fn report(&self) -> Notification {
        if matches!(self, Self::ServiceUnavailable(_)) {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Parcel service request failed"
            );
        } else {
            tracing::warn!(error = %self, "Console action rejected");
        }

        self.notification()
    }
}

/// Severity of a [`Notification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// The action completed.
    Success,
    /// The action failed; nothing changed locally.
    Error,
}

/// A user-visible outcome of a console action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Short headline.
    pub title: String,
    /// One-sentence explanation.
    pub description: String,
}

impl Notification {
    /// A success notification.
    #[must_use]
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    /// An error notification.
    #[must_use]
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Returns `true` for error notifications.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_error_display() {
        let err = ConsoleError::OwnerNotFound("ops@depot.io".to_string());
        assert_eq!(err.to_string(), "No user found with email ops@depot.io");

        let err = ConsoleError::Validation("description is required".to_string());
        assert_eq!(err.to_string(), "Validation failed: description is required");
    }

    #[test]
    fn test_api_errors_become_service_unavailable() {
        let err: ConsoleError = ApiError::Unauthorized.into();
        assert!(matches!(err, ConsoleError::ServiceUnavailable(_)));
    }

    #[test]
    fn test_notifications() {
        let note = ConsoleError::OwnerNotFound("x@y.z".to_string()).notification();
        assert!(note.is_error());
        assert_eq!(note.title, "User Not Found");
        assert_eq!(note.description, "No user found with email x@y.z.");

        let note = ConsoleError::Conflict("x@y.z".to_string()).notification();
        assert_eq!(note.title, "Email Already Exists");

        let note = Notification::success("Parcel Added", "Parcel has been successfully added.");
        assert!(!note.is_error());
        assert_eq!(
            note.to_string(),
            "Parcel Added: Parcel has been successfully added."
        );
    }
}
