//! Alert system for displaying success and error messages to users.
//!
//! Alerts are rendered as HTML fragments that htmx swaps into the
//! `#alert-container` element of the base page.

use maud::{Markup, html};

/// An alert message with its styling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    /// A success message with more detail underneath.
    Success { message: String, details: String },
    /// An error message with an explanation of how to fix it.
    Error { message: String, details: String },
}

impl Alert {
    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Markup {
        let (is_error, message, details) = match self {
            Alert::Success { message, details } => (false, message, details),
            Alert::Error { message, details } => (true, message, details),
        };

        let style = if is_error {
            "flex items-start p-4 mb-4 rounded-lg shadow-lg border text-red-800 \
            border-red-300 bg-red-50 dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
        } else {
            "flex items-start p-4 mb-4 rounded-lg shadow-lg border text-green-800 \
            border-green-300 bg-green-50 dark:bg-gray-800 dark:text-green-400 dark:border-green-800"
        };

        // Template adapted from https://flowbite.com/docs/components/alerts/
        html! {
            div class=(style) role="alert"
            {
                div class="flex-1"
                {
                    span class="font-semibold" { (message) }

                    @if !details.is_empty() {
                        p class="mt-1 text-sm" { (details) }
                    }
                }

                button
                    type="button"
                    class="ms-3 -my-1.5 rounded-lg p-1.5 inline-flex items-center justify-center h-8 w-8 hover:opacity-75"
                    aria-label="Close"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    span class="sr-only" { "Close" }
                    "✕"
                }
            }
        }
    }
}
