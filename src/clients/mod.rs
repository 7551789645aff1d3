#[cfg(any(feature = "deepseek", feature = "openai"))]
pub mod chat;
#[cfg(feature = "deepseek")]
pub mod deepseek;
pub mod flexible;
#[cfg(feature = "gemini")]
pub mod gemini;
pub mod mock;
#[cfg(feature = "openai")]
pub mod openai;

#[cfg(any(feature = "deepseek", feature = "openai"))]
pub use chat::ChatConfig;
#[cfg(feature = "deepseek")]
pub use deepseek::*;
pub use flexible::*;
#[cfg(feature = "gemini")]
pub use gemini::*;
pub use mock::*;
#[cfg(feature = "openai")]
pub use openai::*;
