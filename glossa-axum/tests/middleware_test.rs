use axum::{Router, body::Body, middleware::from_fn, routing::get};
use glossa_axum::{handle_locale, localize, preferred_languages};
use glossa_core::TranslationTable;
use glossa_derive::Localizable;
use http::Request;
use tower::util::ServiceExt;

#[derive(Default, Localizable)]
struct Character {
    #[localize(key = "name")]
    name: String,
    #[localize(table)]
    translations: TranslationTable,
}

async fn show_name() -> String {
    let mut character = Character::default();
    character
        .translations
        .set("name", "en", "John")
        .set("name", "ru", "Джон");

    localize(&mut character);
    character.name
}

async fn show_preferences() -> String {
    preferred_languages()
        .iter()
        .map(|tag| tag.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn app() -> Router {
    Router::new()
        .route("/name", get(show_name))
        .route("/preferences", get(show_preferences))
        .layer(from_fn(handle_locale))
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_preferences_are_scoped_from_header() {
    let req = Request::builder()
        .uri("/preferences")
        .header("accept-language", "ru, en;q=0.8")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(req).await.unwrap();

    assert_eq!(body_string(response).await, "ru,en");
}

#[tokio::test]
async fn test_record_localized_from_request_language() {
    let req = Request::builder()
        .uri("/name")
        .header("accept-language", "ru, en;q=0.8")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(req).await.unwrap();

    assert_eq!(body_string(response).await, "Джон");
}

#[tokio::test]
async fn test_missing_header_uses_default_language() {
    let req = Request::builder().uri("/name").body(Body::empty()).unwrap();
    let response = app().oneshot(req).await.unwrap();

    assert_eq!(body_string(response).await, "John");
}

#[tokio::test]
async fn test_unsupported_language_falls_back_to_default() {
    let req = Request::builder()
        .uri("/name")
        .header("accept-language", "ja, pt;q=0.9")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(req).await.unwrap();

    assert_eq!(body_string(response).await, "John");
}
