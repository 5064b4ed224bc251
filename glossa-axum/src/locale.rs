use axum::extract::Request;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use glossa_core::Localizable;
use tokio::task_local;
use tracing::debug;
use unic_langid::LanguageIdentifier;

task_local! {
    /// Ranked language preferences of the request currently being served.
    pub static PREFERRED_LANGUAGES: Vec<LanguageIdentifier>;
}

/// Middleware scoping the request's `Accept-Language` preferences so that
/// [`preferred_languages`] and [`localize`] can read them further down the
/// handler stack.
pub async fn handle_locale(req: Request, next: Next) -> Response {
    let preferred = resolve_preferences(req.headers());
    PREFERRED_LANGUAGES.scope(preferred, next.run(req)).await
}

/// Preferences scoped by [`handle_locale`].
///
/// Empty outside the middleware or when the client sent none, which
/// downstream negotiation treats as "use the default language".
pub fn preferred_languages() -> Vec<LanguageIdentifier> {
    PREFERRED_LANGUAGES
        .try_with(Clone::clone)
        .unwrap_or_default()
}

/// Localize `target` with the process-wide translator and the ambient
/// request preferences.
pub fn localize<T: Localizable>(target: &mut T) {
    glossa_core::localize(target, &preferred_languages());
}

/// Parse: "da, en-GB;q=0.8, en;q=0.7" -> [da, en-GB, en], ranked by weight.
fn resolve_preferences(headers: &HeaderMap) -> Vec<LanguageIdentifier> {
    let Some(header) = headers
        .get("accept-language")
        .and_then(|v| v.to_str().ok())
    else {
        return Vec::new();
    };

    let mut ranked: Vec<(f32, LanguageIdentifier)> = header
        .split(',')
        .filter_map(|part| {
            let mut sections = part.split(';');
            let tag = sections.next()?.trim();
            if tag.is_empty() || tag == "*" {
                return None;
            }
            let weight = sections
                .next()
                .and_then(|q| q.trim().strip_prefix("q="))
                .and_then(|v| v.parse::<f32>().ok())
                .unwrap_or(1.0);
            Some((weight, glossa_core::tag::resolve(tag)))
        })
        .collect();

    // Stable sort: equal weights keep the header's order.
    ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    debug!("resolved {} language preferences", ranked.len());
    ranked.into_iter().map(|(_, tag)| tag).collect()
}
