//! Fallback responder
//!
//! Local canned replies used while the provider is degraded or unconfigured.
//! Selection is round-robin so test runs are reproducible.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Canned career-guidance replies, served in order
pub const FALLBACK_RESPONSES: &[&str] = &[
    "Start by listing the roles that interest you, then compare the skills they ask for with what you already know. The gap between the two is your learning plan.",
    "Recruiters look for proof of work. One or two solid projects on GitHub with a clear README often matter more than a long list of certificates.",
    "Keep your resume to one page: education, skills, two or three projects with measurable outcomes, and any internships. Tailor the summary to each role you apply for.",
    "Practice data structures and aptitude for 30 to 45 minutes daily. Consistency over a few months beats cramming before placement season.",
    "Reach out to alumni from your college on LinkedIn. A short, specific message asking about their role gets far more replies than a generic request.",
    "If you are unsure between two paths, pick a small project in each and spend a week on it. Hands-on work tells you more than any aptitude test.",
];

/// Round-robin selector over a fixed, non-empty set of responses
#[derive(Debug)]
pub struct FallbackResponder {
    responses: &'static [&'static str],
    cursor: AtomicUsize,
}

impl FallbackResponder {
    /// Create a responder over the built-in replies
    pub fn new() -> Self {
        Self::with_responses(FALLBACK_RESPONSES)
    }

    /// Create a responder over a custom list
    ///
    /// An empty list falls back to the built-in replies.
    pub fn with_responses(responses: &'static [&'static str]) -> Self {
        let responses = if responses.is_empty() {
            FALLBACK_RESPONSES
        } else {
            responses
        };
        Self {
            responses,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Next reply in rotation. Never fails.
    pub fn next_response(&self) -> &'static str {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.responses.len();
        self.responses[index]
    }

    /// Whether `text` is one of this responder's replies
    pub fn contains(&self, text: &str) -> bool {
        self.responses.iter().any(|r| *r == text)
    }

    /// The full reply set
    pub fn responses(&self) -> &'static [&'static str] {
        self.responses
    }
}

impl Default for FallbackResponder {
    fn default() -> Self {
        Self::new()
    }
}
