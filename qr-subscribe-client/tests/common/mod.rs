//! 共享测试工具和辅助函数

#![allow(dead_code)]

use qr_subscribe_client::{AuthCheckClient, ClientOptions};
use std::time::Duration;
use wiremock::MockServer;

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// Basic auth header for `phil:secret`.
pub const PHIL_BASIC_AUTH: &str = "Basic cGhpbDpzZWNyZXQ=";

/// 测试上下文 - 封装 mock 服务器和客户端
pub struct TestContext {
    pub server: MockServer,
    pub client: AuthCheckClient,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_request_timeout(Duration::from_secs(2)).await
    }

    pub async fn with_request_timeout(request_timeout: Duration) -> Self {
        let server = MockServer::start().await;
        let client = require_client(ClientOptions {
            connect_timeout: Duration::from_secs(2),
            request_timeout,
        });
        Self { server, client }
    }

    pub fn base_url(&self) -> String {
        self.server.uri()
    }
}

fn require_client(options: ClientOptions) -> AuthCheckClient {
    match AuthCheckClient::with_options(options) {
        Ok(c) => c,
        Err(e) => panic!("failed to build client: {e}"),
    }
}
