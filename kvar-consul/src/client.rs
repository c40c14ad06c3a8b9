use std::time::Duration;

use async_trait::async_trait;
use kvar_core::{
    client::KeyValueClient,
    config,
    constants::ConsulConstants,
    errors::{Error, ToRemoteStoreErrorResult},
    metric, types,
};
use reqwest::{Method, RequestBuilder, StatusCode, Url};

/// Key-value client speaking the Consul HTTP KV API.
#[derive(Clone)]
pub struct ConsulClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
    datacenter: Option<String>,
    namespace: Option<String>,
}

#[async_trait]
impl KeyValueClient for ConsulClient {
    async fn read(&self, key: &str) -> types::Result<Option<types::Value>> {
        let result = self.read_raw(key).await;

        let outcome = match &result {
            Ok(Some(_)) => "ok",
            Ok(None) => "absent",
            Err(_) => "error",
        };
        metric::kv_read_count_metric()
            .with_label_values(&["consul", outcome])
            .inc();

        result
    }

    async fn write(&self, key: &str, value: &[u8]) -> types::Result<()> {
        let result = self.write_raw(key, value).await;

        let outcome = if result.is_ok() { "ok" } else { "error" };
        metric::kv_write_count_metric()
            .with_label_values(&["consul", outcome])
            .inc();

        result
    }
}

impl ConsulClient {
    pub fn new(config: &config::consul::Consul) -> types::Result<Self> {
        let mut base_url = Url::parse(&config.address).map_err(|e| Error::ClientInitFailed {
            message: format!("invalid consul address '{}'", config.address),
            source: e.into(),
        })?;

        if base_url.cannot_be_a_base() {
            return Err(Error::ClientInitFailed {
                message: format!("consul address '{}' cannot be a base url", config.address),
                source: anyhow::anyhow!("url has no path segments"),
            });
        }

        base_url.set_query(None);

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout_millis {
            builder = builder.timeout(Duration::from_millis(timeout));
        }

        let http = builder.build().map_err(|e| Error::ClientInitFailed {
            message: "failed to build http client".to_string(),
            source: e.into(),
        })?;

        tracing::info!("initialized consul client for address: '{}'", base_url);

        Ok(Self {
            http,
            base_url,
            token: config.token.clone(),
            datacenter: config.datacenter.clone(),
            namespace: config.namespace.clone(),
        })
    }

    /// `{base}/v1/kv/{key}`, with each key segment percent-encoded. One
    /// leading `/` is dropped. Keys with `.` or `..` segments are refused,
    /// since a url path cannot carry them without resolving them.
    fn kv_url(&self, key: &str) -> types::Result<Url> {
        let path = key.strip_prefix('/').unwrap_or(key);

        if path.split('/').any(|segment| segment == "." || segment == "..") {
            return Err(Error::remote_store(
                key,
                "key cannot be addressed over http",
                "'.' and '..' path segments are resolved away by the url",
            ));
        }

        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|_| {
                Error::remote_store(
                    key,
                    "consul address cannot be a base url",
                    "url has no path segments",
                )
            })?
            .pop_if_empty()
            .extend(ConsulConstants::KvEndpoint.to_string().split('/'))
            .extend(path.split('/'));

        Ok(url)
    }

    fn request(&self, method: Method, key: &str) -> types::Result<RequestBuilder> {
        let mut builder = self.http.request(method, self.kv_url(key)?);

        if let Some(token) = &self.token {
            builder = builder.header(ConsulConstants::TokenHeader.to_string(), token);
        }

        if let Some(dc) = &self.datacenter {
            builder = builder.query(&[(ConsulConstants::DatacenterParam.to_string(), dc)]);
        }

        if let Some(ns) = &self.namespace {
            builder = builder.query(&[(ConsulConstants::NamespaceParam.to_string(), ns)]);
        }

        Ok(builder)
    }

    async fn read_raw(&self, key: &str) -> types::Result<Option<types::Value>> {
        tracing::debug!("reading consul key: '{}'", key);

        let response = self
            .request(Method::GET, key)?
            .query(&[(ConsulConstants::RawParam.to_string(), "true")])
            .send()
            .await
            .to_remote_store_err(key, "failed to send read request")?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let data = response
                    .bytes()
                    .await
                    .to_remote_store_err(key, "failed to read response body")?;

                Ok(Some(data.to_vec()))
            }
            status => {
                let body = response.text().await.unwrap_or_default();

                Err(Error::remote_store(
                    key,
                    format!("consul responded to read with status {}", status),
                    response_detail(&body),
                ))
            }
        }
    }

    async fn write_raw(&self, key: &str, value: &[u8]) -> types::Result<()> {
        tracing::debug!("writing consul key: '{}', size: {}", key, value.len());

        let response = self
            .request(Method::PUT, key)?
            .body(value.to_vec())
            .send()
            .await
            .to_remote_store_err(key, "failed to send write request")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .to_remote_store_err(key, "failed to read response body")?;

        if !status.is_success() {
            return Err(Error::remote_store(
                key,
                format!("consul responded to write with status {}", status),
                response_detail(&body),
            ));
        }

        if body.trim() != "true" {
            return Err(Error::remote_store(
                key,
                "consul rejected write",
                response_detail(&body),
            ));
        }

        Ok(())
    }
}

fn response_detail(body: &str) -> String {
    match body.trim() {
        "" => "empty response body".to_string(),
        body => body.to_string(),
    }
}
