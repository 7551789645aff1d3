use async_trait::async_trait;
use std::fmt::Debug;

/// Observer handed every prompt/response pair the generator exchanges with the model.
#[async_trait]
pub trait Interceptor: Send + Sync + Debug {
    async fn save(&self, attempt: usize, prompt: &str, response: &str) -> std::io::Result<()>;
}

pub mod file;
pub use file::FileInterceptor;
