//! The error pages shown when a request cannot be completed.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// A full error page with a status code, what went wrong and how to fix it.
pub struct ErrorPage<'a> {
    pub status_code: StatusCode,
    pub description: &'a str,
    pub fix: &'a str,
}

impl Default for ErrorPage<'_> {
    fn default() -> Self {
        Self {
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
            description: "Sorry, something went wrong.",
            fix: "Try again later or check the server logs",
        }
    }
}

impl ErrorPage<'_> {
    pub fn into_html(self) -> Html<String> {
        let title = self
            .status_code
            .canonical_reason()
            .unwrap_or("Internal Server Error");

        Html(
            error_view(
                title,
                self.status_code.as_str(),
                self.description,
                self.fix,
            )
            .into_string(),
        )
    }
}

impl IntoResponse for ErrorPage<'_> {
    fn into_response(self) -> Response {
        let status_code = self.status_code;

        (status_code, self.into_html()).into_response()
    }
}

/// The fallback handler for routes that do not exist.
pub async fn get_404_not_found() -> Response {
    ErrorPage {
        status_code: StatusCode::NOT_FOUND,
        description: "Page not found.",
        fix: "Check the address or go back to the dashboard.",
    }
    .into_response()
}

#[cfg(test)]
mod error_page_tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use scraper::Selector;

    use crate::test_utils::{assert_content_type, assert_valid_html, parse_html_document};

    use super::{ErrorPage, get_404_not_found};

    #[tokio::test]
    async fn default_page_is_internal_server_error() {
        let response = ErrorPage::default().into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let header = html
            .select(&Selector::parse("h1").unwrap())
            .next()
            .expect("No h1 found")
            .text()
            .collect::<String>();
        assert_eq!(header.trim(), "500");
    }

    #[tokio::test]
    async fn not_found_page() {
        let response = get_404_not_found().await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
    }
}
