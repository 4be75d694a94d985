use serde::{Deserialize, Serialize};

pub mod console;
pub mod devices;
pub mod json;

/// Where the configuration API lives and how to talk to it.
#[derive(Deserialize, Serialize, PartialEq, Clone, Debug)]
pub struct HttpApiConf {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub ssl_enable: bool,
    // prefix placed in front of /api, e.g. "/snmpcollector"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_auth: Option<BasicAuth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<(String, String)>>,
    // request timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

fn default_port() -> u16 {
    8090
}

impl Default for HttpApiConf {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: default_port(),
            ssl_enable: false,
            base_path: None,
            basic_auth: None,
            headers: None,
            timeout: None,
        }
    }
}

impl HttpApiConf {
    pub fn base_url(&self) -> String {
        let scheme = if self.ssl_enable { "https" } else { "http" };
        let base_path = match &self.base_path {
            Some(base_path) => base_path.trim_end_matches('/'),
            None => "",
        };
        // ipv6 literals need brackets before the port
        let host = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        if base_path.is_empty() || base_path.starts_with('/') {
            format!("{}://{}:{}{}/", scheme, host, self.port, base_path)
        } else {
            format!("{}://{}:{}/{}/", scheme, host, self.port, base_path)
        }
    }
}

#[derive(Deserialize, Serialize, PartialEq, Clone, Debug)]
pub struct BasicAuth {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}
