use anyhow::{Context, bail};
use gloo::net::http::Request;
use memento_core::{ImageId, ImageSource};
use serde::Deserialize;

pub(crate) const DEFAULT_ENDPOINT: &str = "https://api.lummi.com/v1/illustrations/random";

#[derive(Deserialize, Debug)]
struct IllustrationsResponse {
    illustrations: Vec<Illustration>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Illustration {
    image_url: String,
}

/// Random illustrations from a JSON endpoint answering `{ "illustrations": [{ "imageUrl": .. }] }`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct HttpImageSource {
    endpoint: String,
}

impl HttpImageSource {
    pub(crate) fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    fn request_url(&self, count: usize) -> String {
        format!("{}?count={}", self.endpoint, count)
    }
}

fn parse_illustrations(body: &str) -> anyhow::Result<Vec<ImageId>> {
    let response: IllustrationsResponse =
        serde_json::from_str(body).context("malformed illustrations response")?;
    Ok(response
        .illustrations
        .into_iter()
        .map(|illustration| ImageId::from(illustration.image_url))
        .collect())
}

impl ImageSource for HttpImageSource {
    type Error = anyhow::Error;

    async fn fetch(&self, count: usize) -> anyhow::Result<Vec<ImageId>> {
        let url = self.request_url(count);
        log::debug!("fetching illustrations: {}", url);

        let response = Request::get(&url)
            .header("Content-Type", "application/json")
            .send()
            .await
            .context("illustrations request failed")?;
        if !response.ok() {
            bail!("illustrations request returned status {}", response.status());
        }

        let body = response.text().await.context("unreadable response body")?;
        parse_illustrations(&body)
    }
}
