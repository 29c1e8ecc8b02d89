//! One-shot registration of this channel with the hub.

use std::time::Duration;

use anyhow::{Context, bail};
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use tracing::{error, info};

use crate::config::Config;

/// Body of `POST {hub}/channels`.
#[derive(Debug, Serialize)]
pub struct Registration<'a> {
    pub name: &'a str,
    pub endpoint: &'a str,
    pub authkey: &'a str,
    pub type_of_service: &'a str,
}

impl<'a> Registration<'a> {
    pub fn from_config(cfg: &'a Config) -> Self {
        Self {
            name: &cfg.channel_name,
            endpoint: &cfg.channel_endpoint,
            authkey: &cfg.channel_authkey,
            type_of_service: &cfg.type_of_service,
        }
    }
}

/// Announce this channel to the hub. Anything but HTTP 200 is an error.
pub async fn register(cfg: &Config) -> anyhow::Result<()> {
    let url = format!("{}/channels", cfg.hub_url.trim_end_matches('/'));
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    let response = client
        .post(&url)
        .header(AUTHORIZATION, format!("authkey {}", cfg.hub_authkey))
        .json(&Registration::from_config(cfg))
        .send()
        .await
        .with_context(|| format!("failed to reach hub at {url}"))?;

    let status = response.status();
    if status != StatusCode::OK {
        let body = response.text().await.unwrap_or_default();
        error!(%url, status = status.as_u16(), %body, "hub rejected channel registration");
        bail!("Error creating channel: {}: {body}", status.as_u16());
    }

    info!(%url, name = %cfg.channel_name, "channel registered with hub");
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(hub_url: String) -> Config {
        let mut cfg = Config::from_lookup(|_| None);
        cfg.hub_url = hub_url;
        cfg.hub_authkey = "hub-secret".into();
        cfg.channel_authkey = "chan-secret".into();
        cfg
    }

    #[test]
    fn registration_body_fields() {
        let cfg = config("http://hub".into());
        let json = serde_json::to_value(Registration::from_config(&cfg)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Coxi Movies",
                "endpoint": "http://localhost:5001",
                "authkey": "chan-secret",
                "type_of_service": "aiweb24:chat",
            })
        );
    }

    #[tokio::test]
    async fn registers_with_hub() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/channels"))
            .and(header("authorization", "authkey hub-secret"))
            .and(body_json(serde_json::json!({
                "name": "Coxi Movies",
                "endpoint": "http://localhost:5001",
                "authkey": "chan-secret",
                "type_of_service": "aiweb24:chat",
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        register(&config(format!("{}/", server.uri()))).await.unwrap();
    }

    #[tokio::test]
    async fn hub_rejection_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/channels"))
            .respond_with(ResponseTemplate::new(403).set_body_string("bad key"))
            .mount(&server)
            .await;

        let err = register(&config(server.uri())).await.unwrap_err();
        let text = err.to_string();
        assert!(text.contains("403"), "{text}");
        assert!(text.contains("bad key"), "{text}");
    }
}
