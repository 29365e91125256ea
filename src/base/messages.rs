//! Fixed user-facing messages.
//!
//! Each of these can be overridden through configuration.

/// Sent once when the webhook call fails for any reason.
pub const APOLOGY_MESSAGE: &str = "Sorry, something went wrong while processing your question. Please try again later.";

/// Sent when the webhook answered, but nothing usable could be extracted from the reply.
pub const NO_ANSWER_MESSAGE: &str = "Sorry, no valid answer was received.";

/// Sent once when the webhook is taking longer than the slow-notice delay.
pub const SLOW_NOTICE_MESSAGE: &str = "Still working on it, this one is taking a little longer than usual ...";

/// Sent on an empty question when usage hints are enabled.
pub const USAGE_HINT_MESSAGE: &str = "Mention me followed by your question, and I will look into it.";
