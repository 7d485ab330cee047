//! Defaults shared by the config layer and the clients.

pub mod endpoints {
    pub const CLAUDE_BASE_URL: &str = "https://api.anthropic.com";
    pub const ANTHROPIC_VERSION: &str = "2023-06-01";
}

pub mod defaults {
    pub const MODEL: &str = "claude-3-haiku-20240307";
    pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
    pub const MAX_TOKENS: u32 = 1000;
    pub const TEMPERATURE: f32 = 0.5;
    /// Matches the hosting platform's invocation deadline.
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
    pub const DEFAULT_USE_CASE: &str = "use-case-2";
    pub const IDENTITY_ENV: &str = "TESTMATE_USER";
    pub const SERVER_BIND: &str = "127.0.0.1:8787";
}
