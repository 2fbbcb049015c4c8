use anyhow::{Context, Result};
use reqwest::{header, Client};
use std::future::Future;
use std::sync::Arc;

use super::{Probe, ProbeOutcome};
use crate::config::HttpFormConfig;
use crate::error::ProbeError;

/// Submits each candidate to an HTTP form and judges the response text.
///
/// One client (and its connection pool) is shared by every probe; each
/// submission builds its own form body.
#[derive(Debug, Clone)]
pub struct HttpFormProbe {
    client: Client,
    config: Arc<HttpFormConfig>,
}

impl HttpFormProbe {
    pub fn new(config: HttpFormConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = header::HeaderMap::new();
        for (name, value) in &config.headers {
            let name = header::HeaderName::from_bytes(name.as_bytes())
                .with_context(|| format!("Invalid header name '{}'", name))?;
            let value = header::HeaderValue::from_str(value)
                .with_context(|| format!("Invalid value for header '{}'", name))?;
            headers.insert(name, value);
        }
        if let Some(cookie) = &config.cookie {
            headers.insert(header::COOKIE, cookie.parse().context("Invalid cookie string")?);
        }

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    async fn submit(&self, code: &str) -> Result<String, ProbeError> {
        let timeout = self.config.timeout();
        let mut form: Vec<(&str, &str)> = Vec::with_capacity(self.config.extra_fields.len() + 1);
        form.push((self.config.code_field.as_str(), code));
        form.extend(
            self.config
                .extra_fields
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        );

        let resp = self
            .client
            .post(&self.config.url)
            .form(&form)
            .send()
            .await
            .map_err(|e| ProbeError::from_reqwest(e, timeout))?;

        resp.text()
            .await
            .map_err(|e| ProbeError::from_reqwest(e, timeout))
    }

    fn judge(&self, code: String, body: &str) -> ProbeOutcome<String, String> {
        if body.contains(&self.config.failure_marker) {
            ProbeOutcome::Failure { candidate: code }
        } else {
            ProbeOutcome::Success {
                candidate: code,
                payload: preview(body, self.config.preview_len),
            }
        }
    }
}

impl Probe<String, String> for HttpFormProbe {
    fn probe(&self, candidate: String) -> impl Future<Output = ProbeOutcome<String, String>> + Send {
        async move {
            match self.submit(&candidate).await {
                Ok(body) => self.judge(candidate, &body),
                Err(cause) => ProbeOutcome::Indeterminate { candidate, cause },
            }
        }
    }
}

/// First `max` bytes of `body`, cut back to a char boundary.
fn preview(body: &str, max: usize) -> String {
    if body.len() <= max {
        return body.to_string();
    }
    let mut end = max;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body[..end].to_string()
}
