//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert, internal_server_error::InternalServerError, not_found::NotFoundError,
    transaction::TransactionId,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The remote API failed or rejected a request.
    ///
    /// Holds the message sent by the server, or a generic fallback when the
    /// server could not be reached or did not say what went wrong.
    #[error("{0}")]
    Server(String),

    /// A transaction draft was malformed and was not sent to the server.
    #[error("{0}")]
    Validation(String),

    /// Tried to update a transaction after its edit window closed.
    #[error("transaction {0} can only be edited within 12 hours of being created")]
    EditWindowExpired(TransactionId),

    /// Tried to change a transaction while another change to it was still in
    /// flight.
    #[error("another change to transaction {0} is still in progress")]
    MutationInProgress(TransactionId),

    /// The requested resource was not found.
    ///
    /// For transactions, this means the ID is not in the local collection.
    /// Reloading the collection may help if it was created elsewhere.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// The base URL of the remote API could not be used.
    #[error("invalid API URL {0}")]
    InvalidApiUrl(String),

    /// The HTTP client for the remote API could not be created.
    #[error("could not create the HTTP client: {0}")]
    HttpClient(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::EditWindowExpired(_) => InternalServerError {
                status: StatusCode::FORBIDDEN,
                header: "403",
                description: "Editing Locked",
                fix: "Transactions can only be edited within 12 hours of being created.",
            }
            .into_response(),
            Error::InvalidTimezone(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
                ..Default::default()
            }
            .into_response(),
            Error::Server(message) => InternalServerError {
                status: StatusCode::BAD_GATEWAY,
                header: "502",
                description: "Could not reach the transactions server.",
                fix: &message,
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::Server(message) => (
                StatusCode::BAD_GATEWAY,
                Alert::Error {
                    message,
                    details: "The transactions server did not accept the change. \
                    Try again, or reload the transactions if the problem persists."
                        .to_owned(),
                },
            ),
            Error::Validation(details) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::Error {
                    message: "Invalid transaction".to_owned(),
                    details,
                },
            ),
            Error::EditWindowExpired(_) => (
                StatusCode::FORBIDDEN,
                Alert::Error {
                    message: "Could not update transaction".to_owned(),
                    details: "Transactions can only be edited within 12 hours of being created."
                        .to_owned(),
                },
            ),
            Error::MutationInProgress(_) => (
                StatusCode::CONFLICT,
                Alert::Error {
                    message: "Change already in progress".to_owned(),
                    details: "Another change to this transaction is still being saved. \
                    Wait for it to finish and try again."
                        .to_owned(),
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not find transaction".to_owned(),
                    details: "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted."
                        .to_owned(),
                },
            ),
            Error::InvalidTimezone(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::{Error, transaction::TransactionId};

    #[test]
    fn server_error_displays_server_message() {
        assert_eq!(
            Error::Server("Please add a title".to_owned()).to_string(),
            "Please add a title"
        );
    }

    #[test]
    fn alert_status_codes() {
        let id = TransactionId::new("abc");
        let cases = [
            (Error::Server("Server Error".to_owned()), StatusCode::BAD_GATEWAY),
            (
                Error::Validation("Title cannot be empty".to_owned()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (Error::EditWindowExpired(id.clone()), StatusCode::FORBIDDEN),
            (Error::MutationInProgress(id), StatusCode::CONFLICT),
            (Error::NotFound, StatusCode::NOT_FOUND),
            (
                Error::HttpClient("no TLS backend".to_owned()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, want_status) in cases {
            let description = error.to_string();
            let response = error.into_alert_response();

            assert_eq!(response.status(), want_status, "for error {description:?}");
        }
    }
}
