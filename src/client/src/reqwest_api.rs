use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use common::error::SnmpCfgResult;
use reqwest::{header::CONTENT_TYPE, Client, Method};
use tracing::{debug, trace};
use types::HttpApiConf;
use url::Url;

use crate::{ApiPath, ApiResponse, HttpApi};

pub struct ReqwestApi {
    client: Client,
    base: Url,
    conf: HttpApiConf,
}

impl ReqwestApi {
    pub fn new(conf: HttpApiConf) -> SnmpCfgResult<Self> {
        let base = Url::parse(&conf.base_url())?;
        Self::with_base(base, conf)
    }

    /// Uses `base` instead of the host/port/base_path of `conf`. Auth, headers
    /// and timeout still come from `conf`.
    pub fn with_base(base: Url, conf: HttpApiConf) -> SnmpCfgResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = conf.timeout {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        Ok(Self {
            client: builder.build()?,
            base,
            conf,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    async fn send(
        &self,
        method: Method,
        path: &ApiPath,
        body: Option<Bytes>,
    ) -> SnmpCfgResult<ApiResponse> {
        let url = path.resolve(&self.base)?;
        debug!("{} {}", method, url);

        let mut builder = self.client.request(method, url);
        if let Some(basic_auth) = &self.conf.basic_auth {
            builder = builder.basic_auth(&basic_auth.username, basic_auth.password.as_ref());
        }
        if let Some(headers) = &self.conf.headers {
            for (key, value) in headers.iter() {
                builder = builder.header(key, value);
            }
        }
        if let Some(body) = body {
            trace!("request body: {}", String::from_utf8_lossy(&body));
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await?;
        Ok(ApiResponse { status, body })
    }
}

#[async_trait]
impl HttpApi for ReqwestApi {
    async fn get(&self, path: &ApiPath) -> SnmpCfgResult<ApiResponse> {
        self.send(Method::GET, path, None).await
    }

    async fn post(&self, path: &ApiPath, body: Bytes) -> SnmpCfgResult<ApiResponse> {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn put(&self, path: &ApiPath, body: Bytes) -> SnmpCfgResult<ApiResponse> {
        self.send(Method::PUT, path, Some(body)).await
    }

    async fn delete(&self, path: &ApiPath) -> SnmpCfgResult<ApiResponse> {
        self.send(Method::DELETE, path, None).await
    }
}
