//! Shared constants and defaults

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: &str = "6001";
pub const DEFAULT_METRICS_PATH: &str = "/metrics";
pub const DEFAULT_STATIC_DIR: &str = "public";
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;

// Speech to text
pub const SPEECH_URL_DEFAULT: &str = "https://stream.watsonplatform.net/speech-to-text/api";
pub const AUTHORIZATION_URL_DEFAULT: &str = "https://stream.watsonplatform.net/authorization/api";
pub const AUTHORIZATION_PATH: &str = "/authorization/api";

// Tone analyzer
pub const TONE_URL_DEFAULT: &str = "https://gateway.watsonplatform.net/tone-analyzer/api";
pub const IAM_URL_DEFAULT: &str = "https://iam.bluemix.net/identity/token";

// IAM apikey grant
pub const IAM_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";
pub const IAM_RESPONSE_TYPE: &str = "cloud_iam";
pub const IAM_CLIENT_ID: &str = "bx";
pub const IAM_CLIENT_SECRET: &str = "bx";

// Upstream labels
pub const UPSTREAM_SPEECH: &str = "speech_token";
pub const UPSTREAM_TONE: &str = "tone";
