//! Rule-based responder used when no intent service is configured.

use crate::services::providers::IntentMatch;
use rand::seq::SliceRandom;

pub const DEFAULT_INTENT: &str = "default";

struct Rule {
    intent: &'static str,
    keywords: &'static [&'static str],
    response: &'static str,
}

// Checked in order; emergencies win over everything else.
const RULES: &[Rule] = &[
    Rule {
        intent: "emergency",
        keywords: &["emergency", "urgent", "ambulance", "chest pain", "unconscious"],
        response: "If this is a medical emergency, call your local emergency number (112 or 911) right away. Do not wait for an online reply.",
    },
    Rule {
        intent: "greeting",
        keywords: &["hello", "hi", "hey", "namaste", "good morning", "good evening"],
        response: "Hello! I'm your SwasthyaLink health assistant. How can I help you today?",
    },
    Rule {
        intent: "farewell",
        keywords: &["bye", "goodbye", "see you", "thanks", "thank you"],
        response: "Take care and stay healthy! Reach out any time you need help.",
    },
    Rule {
        intent: "appointment",
        keywords: &["appointment", "appointments", "booking", "schedule"],
        response: "I can help with appointments. Open the Appointments tab to book, reschedule or cancel a visit with your doctor.",
    },
    Rule {
        intent: "doctor",
        keywords: &["doctor", "doctors", "physician", "specialist"],
        response: "You can find doctors by speciality and location in the Doctors section, or ask your family network for a recommendation.",
    },
    Rule {
        intent: "medicine",
        keywords: &["medicine", "medicines", "medication", "prescription", "prescriptions", "pill", "pills"],
        response: "Always take medicines exactly as prescribed. You can view your prescriptions and set reminders from your health records.",
    },
    Rule {
        intent: "help",
        keywords: &["help", "support", "assist"],
        response: "I can answer general health questions, help you find a doctor, manage appointments and prescriptions, or connect you with your family network.",
    },
];

pub const HEALTH_TIPS: &[&str] = &[
    "Stay hydrated: aim for around eight glasses of water a day.",
    "Regular exercise, even a 30 minute walk, keeps your heart healthy.",
    "Getting 7 to 8 hours of sleep helps your body recover and your mind stay sharp.",
    "A balanced diet with plenty of fruits and vegetables supports your immune system.",
    "Regular check-ups help catch health issues early. Have you scheduled yours?",
    "Take short breaks from screens to rest your eyes and stretch.",
];

/// Keyword-dispatch responder. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackResponder;

impl FallbackResponder {
    pub fn new() -> Self {
        Self
    }

    pub fn respond(&self, message: &str) -> IntentMatch {
        let normalized = normalize(message);

        RULES
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| contains_phrase(&normalized, k)))
            .map(|rule| IntentMatch {
                fulfillment_text: rule.response.to_string(),
                intent: rule.intent.to_string(),
            })
            .unwrap_or_else(|| IntentMatch {
                fulfillment_text: HEALTH_TIPS
                    .choose(&mut rand::thread_rng())
                    .copied()
                    .unwrap_or(HEALTH_TIPS[0])
                    .to_string(),
                intent: DEFAULT_INTENT.to_string(),
            })
    }
}

/// Lower-case and collapse everything that is not a letter or digit into
/// single spaces, padded so whole-word lookups can use ` word `.
fn normalize(message: &str) -> String {
    let words: Vec<String> = message
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect();
    format!(" {} ", words.join(" "))
}

fn contains_phrase(normalized: &str, phrase: &str) -> bool {
    normalized.contains(&format!(" {} ", phrase))
}
