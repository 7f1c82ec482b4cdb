use crate::options::Cli;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Status and body of a finished GET request.
#[derive(Debug)]
pub struct UrlContent {
    pub status: StatusCode,
    pub body: String,
}

/// Builds and configures the HTTP client based on the provided CLI options.
///
/// Requests carry the configured user agent. A timeout is only set when
/// `--request-timeout` was given; otherwise a stalled request stalls the run.
pub fn build_client(options: &Cli) -> Result<Client, reqwest::Error> {
    let mut client_builder = Client::builder().user_agent(options.user_agent.as_str());

    if let Some(timeout) = options.request_timeout {
        client_builder = client_builder.timeout(Duration::from_secs(timeout));
    }

    client_builder.build()
}

/// Sends one GET request and returns its status together with the body.
///
/// The body is only read for successful responses; for any other status it is
/// left empty.
///
/// # Errors
///
/// Returns the `reqwest::Error` when the request cannot be sent (connection
/// refused, DNS failure, timeout) or when a successful body cannot be read.
pub async fn get_url_content(url: &Url, client: &Client) -> Result<UrlContent, reqwest::Error> {
    let response = client.get(url.clone()).send().await?;
    let status = response.status();

    let body = if status.is_success() {
        response.text().await?
    } else {
        String::new()
    };

    Ok(UrlContent { status, body })
}
