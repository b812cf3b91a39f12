//! Zig download index resolution
//!
//! Fetches the public download index, picks the nightly (`master`) build for
//! a platform, and derives the archive name the tarball extracts to.

pub mod http;
pub mod metadata;
pub mod platform;

pub use http::{HttpIndexSource, DEFAULT_INDEX_URL};
pub use metadata::{parse_index, BuildMetadata, BUILDS_URL_PREFIX};
pub use platform::Platform;

use crate::error::{ZigboxError, ZigboxResult};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Where the raw index document comes from
#[async_trait]
pub trait IndexSource: Send + Sync {
    /// Location reported in logs and errors
    fn url(&self) -> &str;

    /// Fetch the raw index body
    async fn fetch(&self) -> ZigboxResult<String>;
}

/// Resolves nightly build metadata for a platform
pub struct IndexResolver<'a> {
    source: &'a dyn IndexSource,
    builds_prefix: String,
}

impl<'a> IndexResolver<'a> {
    /// Create a resolver expecting tarballs under the official builds URL
    pub fn new(source: &'a dyn IndexSource) -> Self {
        Self {
            source,
            builds_prefix: BUILDS_URL_PREFIX.to_string(),
        }
    }

    /// Expect tarball URLs under a different prefix (mirrors, tests)
    pub fn with_builds_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.builds_prefix = prefix.into();
        self
    }

    /// Resolve the nightly build for `platform`.
    ///
    /// Unsupported platforms fail before any fetch. Cancelling `cancel`
    /// abandons an in-flight fetch and returns [`ZigboxError::Cancelled`].
    pub async fn resolve(
        &self,
        platform: &Platform,
        cancel: &CancellationToken,
    ) -> ZigboxResult<BuildMetadata> {
        let key = platform.index_key()?;
        debug!("Resolving nightly build for {} ({})", platform, key);

        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Index fetch cancelled: {}", self.source.url());
                return Err(ZigboxError::Cancelled);
            }
            body = self.source.fetch() => body?,
        };

        let meta = parse_index(&body, key, &self.builds_prefix)?;
        info!("Resolved {} -> {}", platform, meta.archive_name);
        Ok(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const SYNTHETIC_INDEX: &str = r#"{"master": {"x86_64-linux": {"tarball": "https://example.test/builds/zig-x86_64-linux-0.1.0-dev.tar.xz"}}}"#;

    /// Serves a canned body and counts fetches
    struct StaticSource {
        body: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl StaticSource {
        fn ok(body: &'static str) -> Self {
            Self {
                body: Some(body),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                body: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl IndexSource for StaticSource {
        fn url(&self) -> &str {
            "https://example.test/download/index.json"
        }

        async fn fetch(&self) -> ZigboxResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.body {
                Some(body) => Ok(body.to_string()),
                None => Err(ZigboxError::fetch(
                    self.url(),
                    std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset"),
                )),
            }
        }
    }

    /// Never answers
    struct HangingSource;

    #[async_trait]
    impl IndexSource for HangingSource {
        fn url(&self) -> &str {
            "https://example.test/hang"
        }

        async fn fetch(&self) -> ZigboxResult<String> {
            std::future::pending().await
        }
    }

    fn resolver(source: &dyn IndexSource) -> IndexResolver<'_> {
        IndexResolver::new(source).with_builds_prefix("https://example.test/builds/")
    }

    #[tokio::test]
    async fn resolves_synthetic_index() {
        let source = StaticSource::ok(SYNTHETIC_INDEX);
        let meta = resolver(&source)
            .resolve(&Platform::LinuxAmd64, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(meta.archive_name, "zig-x86_64-linux-0.1.0-dev");
        assert_eq!(
            meta.download_url,
            "https://example.test/builds/zig-x86_64-linux-0.1.0-dev.tar.xz"
        );
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn unsupported_platform_skips_fetch() {
        let source = StaticSource::ok(SYNTHETIC_INDEX);
        let err = resolver(&source)
            .resolve(&Platform::parse("linux/riscv64"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ZigboxError::UnsupportedPlatform(_)));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn transport_failure_surfaces_cause() {
        let source = StaticSource::failing();
        let err = resolver(&source)
            .resolve(&Platform::LinuxAmd64, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ZigboxError::Fetch { .. }));
        assert!(err.to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn official_prefix_rejects_foreign_urls() {
        let source = StaticSource::ok(SYNTHETIC_INDEX);
        let err = IndexResolver::new(&source)
            .resolve(&Platform::LinuxAmd64, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ZigboxError::MalformedIndex { .. }));
    }

    #[tokio::test]
    async fn cancelled_before_fetch_returns_promptly() {
        let source = HangingSource;
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = tokio::time::timeout(
            Duration::from_secs(1),
            resolver(&source).resolve(&Platform::LinuxAmd64, &cancel),
        )
        .await
        .expect("resolve should not hang");

        assert!(matches!(result, Err(ZigboxError::Cancelled)));
    }

    #[tokio::test]
    async fn cancelled_during_fetch_returns_promptly() {
        let source = HangingSource;
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let result = tokio::time::timeout(
            Duration::from_secs(1),
            resolver(&source).resolve(&Platform::LinuxAmd64, &cancel),
        )
        .await
        .expect("resolve should not hang");

        assert!(matches!(result, Err(ZigboxError::Cancelled)));
    }
}
