//! Canned bot replies.
//!
//! Everything the bot says without consulting the free-text responder lives
//! here, so routing logic and wording stay separate.

use concierge_core::ProfileRecord;

// =============================================================================
// Reply
// =============================================================================

/// A bot reply before it is appended to the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub options: Vec<String>,
}

impl Reply {
    /// A reply with no quick-reply options.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            options: Vec::new(),
        }
    }

    pub fn with_options(text: impl Into<String>, options: &[&str]) -> Self {
        Self {
            text: text.into(),
            options: options.iter().map(|o| o.to_string()).collect(),
        }
    }
}

// =============================================================================
// Fixed texts
// =============================================================================

/// Scripted bot messages shown when an empty session is opened.
pub const WELCOME: [&str; 3] = [
    "Hi there! Welcome to our support chat.",
    "I can check your account verification status, review your credit spend, or put you in touch with our support team.",
    "Pick a quick action below or type your question to get started.",
];

pub const FAREWELL: &str = "Thanks for chatting with us! This conversation has ended. Close the chat and open it again whenever you need more help.";

pub const HELP_OPTIONS: [&str; 2] = ["Report an issue", "Contact support team"];

pub const MAIN_MENU: &str = "What else can I help you with? Choose a quick action or type your question.";

pub const REPORT_ISSUE: &str = "Please describe the issue you're experiencing in your next message. Include any booking or transaction reference so we can look into it quickly.";

pub const LOGIN_REQUIRED: &str = "Please log in to your account so I can look up your details.";

pub const SETUP_INCOMPLETE: &str = "Your account setup is incomplete. Finish your business profile to unlock verification and credit.";

pub const VERIFIED: &str = "Verified: your account has been verified and you have full access to travel now, pay later.";

pub const PENDING: &str = "Pending: your verification documents are under review. We'll notify you as soon as the review is complete.";

pub const UNVERIFIED: &str = "Unverified: your account has not been verified yet. Submit your business documents from the dashboard to start verification.";

pub const UNABLE_TO_CHECK: &str = "Sorry, I'm unable to check your account details right now. Please try again in a few minutes.";

pub const HELP_GREETING: &str = "I'm here to help! What do you need assistance with?";

pub const NOT_SURE: &str = "I'm not sure how to help with that. Would you like to report an issue or contact our support team?";

pub const PROCESSING_TROUBLE: &str = "Sorry, I'm having trouble processing your request right now. Please try again or reach out to our support team.";

/// Used by responders when the service answers without usable text.
pub const RESPONDER_EMPTY: &str = "I'm sorry, I couldn't come up with an answer to that. Could you rephrase your question?";

// =============================================================================
// Builders
// =============================================================================

pub fn contact_support(email: &str) -> Reply {
    Reply::text(format!(
        "You can reach our support team here:\nEmail: {}\nHours: Monday to Friday, 9:00 to 18:00\nWe usually reply within one business day.",
        email
    ))
}

pub fn help() -> Reply {
    Reply::with_options(HELP_GREETING, &HELP_OPTIONS)
}

pub fn not_sure() -> Reply {
    Reply::with_options(NOT_SURE, &HELP_OPTIONS)
}

pub fn processing_trouble() -> Reply {
    Reply::with_options(PROCESSING_TROUBLE, &HELP_OPTIONS)
}

/// Credit summary for a profile.
///
/// The "available credit" line shows the profile's credited amount as
/// stored; the limit minus credited remainder is only logged.
pub fn credit_summary(profile: &ProfileRecord) -> Reply {
    let remaining = (profile.credit_limit - profile.credited_amount).max(0.0);
    tracing::debug!(remaining, "Computed remaining credit");
    Reply::text(format!(
        "Credit summary\nCredit limit: {}\nAvailable credit: {}",
        format_amount(profile.credit_limit),
        format_amount(profile.credited_amount)
    ))
}

// =============================================================================
// Helpers
// =============================================================================

/// Format an amount with two decimals and thousands separators.
pub fn format_amount(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, cents)
}

// =============================================================================
// Tests
// =============================================================================
