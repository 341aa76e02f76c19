pub mod claude;

use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by `CompletionBackend::complete`.
pub type CompletionFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>>;

/// A language model that turns a system instruction and a user message into
/// free-form text.
pub trait CompletionBackend: Send + Sync {
    /// Model identifier, recorded with every call.
    fn model(&self) -> &str;

    fn complete<'a>(&'a self, system: &'a str, user: &'a str) -> CompletionFuture<'a>;
}

/// Validate that a resolved endpoint URL uses HTTPS.
///
/// Endpoint overrides must pass this before an API key is sent to them.
pub fn validate_endpoint(url: &str) -> anyhow::Result<()> {
    if !url.starts_with("https://") {
        anyhow::bail!("endpoint must use HTTPS, got: {}", url);
    }
    Ok(())
}
