//! Quote of the day.

use serde::Deserialize;

/// Placeholder text used when the quote service is unavailable.
pub const PLACEHOLDER_TEXT: &str = "今日一言获取失败";

/// Placeholder source used when the quote service is unavailable.
pub const PLACEHOLDER_SOURCE: &str = "未知来源";

/// A short text and where it comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub text: String,
    pub source: String,
}

impl Quote {
    /// The fixed pair substituted on any failure.
    pub fn placeholder() -> Self {
        Self {
            text: PLACEHOLDER_TEXT.to_string(),
            source: PLACEHOLDER_SOURCE.to_string(),
        }
    }
}

/// Response body of the Hitokoto API.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct HitokotoResponse {
    #[serde(default)]
    pub hitokoto: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
}

impl From<HitokotoResponse> for Quote {
    fn from(resp: HitokotoResponse) -> Self {
        Self {
            text: resp.hitokoto.unwrap_or_else(|| PLACEHOLDER_TEXT.to_string()),
            source: resp.from.unwrap_or_else(|| PLACEHOLDER_SOURCE.to_string()),
        }
    }
}
