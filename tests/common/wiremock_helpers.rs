use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Wiki path for an entry slug, exactly as the fetcher requests it
pub fn entry_path(slug: &str) -> String {
    format!("/wiki/{}_(Pok%C3%A9mon)", slug)
}

/// Serves `html` for the entry page of `slug` on an existing server.
pub async fn mount_entry_page(server: &MockServer, slug: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(entry_path(slug)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html.to_string())
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

/// Delays the entry page of `slug` long enough to trip a short client timeout.
pub async fn mount_slow_entry_page(server: &MockServer, slug: &str, delay: Duration) {
    Mock::given(method("GET"))
        .and(path(entry_path(slug)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body>too late</body></html>")
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

/// Answers the entry page of `slug` with an HTTP error status.
pub async fn mount_error_page(server: &MockServer, slug: &str, status_code: u16) {
    Mock::given(method("GET"))
        .and(path(entry_path(slug)))
        .respond_with(ResponseTemplate::new(status_code))
        .mount(server)
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mount_entry_page_serves_html() {
        let server = MockServer::start().await;
        mount_entry_page(&server, "Pinsir", "<html><body>Pinsir</body></html>").await;

        let response = reqwest::get(format!("{}{}", server.uri(), entry_path("Pinsir")))
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert!(response.text().await.unwrap().contains("Pinsir"));
    }

    #[tokio::test]
    async fn test_mount_error_page_returns_status() {
        let server = MockServer::start().await;
        mount_error_page(&server, "Missingno", 404).await;

        let response = reqwest::get(format!("{}{}", server.uri(), entry_path("Missingno")))
            .await
            .unwrap();

        assert_eq!(response.status(), 404);
    }
}
