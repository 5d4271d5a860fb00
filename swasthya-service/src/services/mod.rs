pub mod chat;
pub mod directory;
pub mod error;
pub mod fallback;
pub mod family;
pub mod metrics;
pub mod providers;

pub use chat::{ChatGateway, IntentBackend};
pub use directory::{DirectoryError, SearchType, UserDirectory};
pub use fallback::FallbackResponder;
pub use family::{FamilyError, FamilyRequestDraft, FamilyStore, MemberNetwork, MutualNetwork, RequestsFor};
pub use metrics::{get_metrics, init_metrics};
pub use providers::{
    dialogflow::{DialogflowConfig, DialogflowProvider},
    gemini::{GeminiConfig, GeminiTextProvider},
    mock::{MockIntentProvider, MockTextProvider},
    GenerationParams, IntentMatch, IntentProvider, ProviderError, TextProvider,
};
