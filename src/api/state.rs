use std::sync::Arc;

use crate::i18n::{Language, Translator};
use crate::models::Match;
use crate::session::Session;

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<tokio::sync::RwLock<Session>>,
    /// Used when a request carries no `lang`
    pub default_language: Language,
}

impl AppState {
    pub fn new(session: Session, default_language: Language) -> Self {
        Self {
            session: Arc::new(tokio::sync::RwLock::new(session)),
            default_language,
        }
    }

    /// Snapshot of the current match list.
    pub async fn matches(&self) -> Arc<Vec<Match>> {
        self.session.read().await.matches.clone()
    }

    pub fn translator(&self, lang: Option<Language>) -> Translator {
        Translator::new(lang.unwrap_or(self.default_language))
    }
}
