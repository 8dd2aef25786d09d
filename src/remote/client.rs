//! Remote classification client
//! 远程分类接口客户端
//! GET <base_url>?user-agent=<ua>&version=<api_version>，返回原始响应字节
//! 测试/生产地址的选择由调用方决定

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::config::DetectOptions;
use crate::error::NetworkError;

/// 远程分类接口抽象，便于替换传输实现
#[async_trait]
pub trait RemoteClient: Send + Sync {
    async fn fetch(
        &self,
        endpoint: &str,
        user_agent: &str,
        api_version: &str,
    ) -> Result<Vec<u8>, NetworkError>;
}

/// 基于 reqwest 的默认实现
#[derive(Debug, Clone)]
pub struct HttpRemoteClient {
    client: Client,
}

impl HttpRemoteClient {
    /// 构建客户端：显式超时；证书校验默认开启，仅在 accept_invalid_certs 时关闭
    pub fn new(timeout: Duration, accept_invalid_certs: bool) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(|e| NetworkError::Transport(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn from_options(options: &DetectOptions) -> Result<Self, NetworkError> {
        Self::new(
            Duration::from_secs(options.http_timeout_secs),
            options.accept_invalid_certs,
        )
    }

    /// 拼接请求地址
    pub fn build_url(endpoint: &str, user_agent: &str, api_version: &str) -> Result<Url, NetworkError> {
        Url::parse_with_params(endpoint, &[("user-agent", user_agent), ("version", api_version)])
            .map_err(|e| NetworkError::InvalidEndpoint(format!("{}: {}", endpoint, e)))
    }
}

#[async_trait]
impl RemoteClient for HttpRemoteClient {
    async fn fetch(
        &self,
        endpoint: &str,
        user_agent: &str,
        api_version: &str,
    ) -> Result<Vec<u8>, NetworkError> {
        let url = Self::build_url(endpoint, user_agent, api_version)?;
        debug!("Fetching remote classification: {}", url);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(NetworkError::Status(response.status().as_u16()));
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_encodes_query() {
        let url = HttpRemoteClient::build_url(
            "https://modolabs-device.appspot.com/api/",
            "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X)",
            "2",
        )
        .unwrap();
        assert_eq!(url.path(), "/api/");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                (
                    "user-agent".to_string(),
                    "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X)".to_string()
                ),
                ("version".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_build_url_rejects_bad_endpoint() {
        let err = HttpRemoteClient::build_url("not a url", "ua", "2").unwrap_err();
        assert!(matches!(err, NetworkError::InvalidEndpoint(_)));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host() {
        // 保留端口 0 上无服务，必然是传输层失败
        let client = HttpRemoteClient::new(Duration::from_secs(2), false).unwrap();
        let err = client.fetch("http://127.0.0.1:0/api/", "ua", "2").await.unwrap_err();
        assert!(matches!(err, NetworkError::Transport(_) | NetworkError::Timeout));
    }
}
