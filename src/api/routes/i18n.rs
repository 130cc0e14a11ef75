use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::i18n::Language;

#[derive(Debug, Deserialize)]
pub struct LangParams {
    pub lang: Option<Language>,
}

#[derive(Debug, Serialize)]
pub struct TranslationsResponse {
    pub language: Language,
    pub entries: BTreeMap<&'static str, &'static str>,
}

/// Label table for the requested (or default) language.
pub async fn translations(
    State(state): State<AppState>,
    Query(params): Query<LangParams>,
) -> Json<TranslationsResponse> {
    let translator = state.translator(params.lang);
    Json(TranslationsResponse {
        language: translator.language(),
        entries: translator.entries(),
    })
}
