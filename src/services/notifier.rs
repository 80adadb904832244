// src/services/notifier.rs

//! DingTalk robot notifier.
//!
//! Sends one plain-text message per newly downloaded wallpaper. The webhook
//! answers `{"errcode": 0, "errmsg": "ok"}` on success.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{AppError, Result};
use crate::models::{NotifierConfig, Quote, WallpaperRecord};
use crate::utils::HttpGateway;

/// Response body of the DingTalk robot API.
#[derive(Debug, Deserialize)]
struct RobotResponse {
    #[serde(default)]
    errcode: Option<i64>,
    #[serde(default)]
    errmsg: Option<String>,
}

/// Summary of a notification pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NotifyReport {
    pub sent: usize,
    pub failed: usize,
}

/// Render the message announcing `record`.
///
/// Quote text is inserted verbatim; the robot renders `text` messages without markup.
pub fn render_message(record: &WallpaperRecord, quote: &Quote) -> String {
    format!(
        "📢 {} bing壁纸已下载更新！\n\
         📷 壁纸地址：{}\n\
         📝 版权信息：{}\n\
         🔗 详情: {}\n\
         \n\
         💬 今日一言：『{}』- {}",
        record.enddate, record.url, record.copyright, record.copyrightlink, quote.text, quote.source
    )
}

/// Wrap `content` in a DingTalk `text` message.
pub fn text_payload(content: &str) -> Value {
    json!({
        "msgtype": "text",
        "text": { "content": content }
    })
}

/// Posts wallpaper announcements to a DingTalk robot webhook.
pub struct Notifier {
    webhook: Option<String>,
    timeout: Duration,
    gateway: Arc<dyn HttpGateway>,
}

impl Notifier {
    pub fn new(config: &NotifierConfig, gateway: Arc<dyn HttpGateway>) -> Self {
        Self {
            webhook: config.webhook().map(str::to_string),
            timeout: config.webhook_timeout(),
            gateway,
        }
    }

    /// Whether a webhook is configured.
    pub fn is_enabled(&self) -> bool {
        self.webhook.is_some()
    }

    /// Send one announcement. Does nothing when no webhook is configured.
    pub async fn send(&self, record: &WallpaperRecord, quote: &Quote) -> Result<()> {
        let Some(webhook) = self.webhook.as_deref() else {
            return Ok(());
        };

        let payload = text_payload(&render_message(record, quote));
        let body = self.gateway.post_json(webhook, &payload, self.timeout).await?;
        let response: RobotResponse = serde_json::from_value(body)?;

        match response.errcode {
            Some(0) => Ok(()),
            code => Err(AppError::webhook(
                code.unwrap_or(-1),
                response.errmsg.unwrap_or_default(),
            )),
        }
    }

    /// Announce each record independently; a failed send does not stop the rest.
    pub async fn notify_all(&self, records: &[WallpaperRecord], quote: &Quote) -> NotifyReport {
        let mut report = NotifyReport::default();
        if !self.is_enabled() {
            log::info!("Webhook not configured, skipping notifications");
            return report;
        }

        for record in records {
            log::info!("Sending notification for {}", record.enddate);
            match self.send(record, quote).await {
                Ok(()) => {
                    log::info!("Notification for {} sent", record.enddate);
                    report.sent += 1;
                }
                Err(e) => {
                    log::warn!("Notification for {} failed: {}", record.enddate, e);
                    report.failed += 1;
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::http::mock::{Call, MockGateway};

    const WEBHOOK: &str = "https://oapi.dingtalk.com/robot/send?access_token=t";

    fn record(enddate: &str) -> WallpaperRecord {
        WallpaperRecord {
            enddate: enddate.to_string(),
            url: "https://x/img.jpg".to_string(),
            copyright: "c".to_string(),
            copyrightlink: "https://x/link".to_string(),
        }
    }

    fn quote() -> Quote {
        Quote {
            text: "海内存知己".to_string(),
            source: "送杜少府之任蜀州".to_string(),
        }
    }

    fn enabled_config() -> NotifierConfig {
        NotifierConfig {
            webhook_url: Some(WEBHOOK.to_string()),
            ..NotifierConfig::default()
        }
    }

    #[test]
    fn test_render_message() {
        let message = render_message(&record("20240101"), &quote());
        assert_eq!(
            message,
            "📢 20240101 bing壁纸已下载更新！\n\
             📷 壁纸地址：https://x/img.jpg\n\
             📝 版权信息：c\n\
             🔗 详情: https://x/link\n\
             \n\
             💬 今日一言：『海内存知己』- 送杜少府之任蜀州"
        );
    }

    #[tokio::test]
    async fn test_send_posts_text_message() {
        let gateway = Arc::new(
            MockGateway::new().with_post_response(json!({"errcode": 0, "errmsg": "ok"})),
        );
        let notifier = Notifier::new(&enabled_config(), gateway.clone());

        notifier.send(&record("20240101"), &quote()).await.unwrap();

        let calls = gateway.calls();
        assert_eq!(calls.len(), 1);
        let Call::Post(url, body) = &calls[0] else {
            panic!("expected a POST, got {:?}", calls[0]);
        };
        assert_eq!(url, WEBHOOK);
        assert_eq!(body["msgtype"], "text");
        assert!(
            body["text"]["content"]
                .as_str()
                .unwrap()
                .starts_with("📢 20240101")
        );
    }

    #[tokio::test]
    async fn test_nonzero_errcode_is_error() {
        let gateway = Arc::new(
            MockGateway::new().with_post_response(json!({"errcode": 310000, "errmsg": "keywords not in content"})),
        );
        let notifier = Notifier::new(&enabled_config(), gateway.clone());

        let err = notifier.send(&record("20240101"), &quote()).await.unwrap_err();
        assert!(matches!(err, AppError::Webhook { code: 310000, .. }));
    }

    #[tokio::test]
    async fn test_failures_do_not_block_later_sends() {
        let gateway = Arc::new(
            MockGateway::new().with_post_response(json!({"errcode": 130101, "errmsg": "send too fast"})),
        );
        let notifier = Notifier::new(&enabled_config(), gateway.clone());
        let records = vec![record("20240101"), record("20240102"), record("20240103")];

        let report = notifier.notify_all(&records, &quote()).await;

        assert_eq!(report, NotifyReport { sent: 0, failed: 3 });
        assert_eq!(gateway.posts().len(), 3);
    }

    #[tokio::test]
    async fn test_disabled_makes_no_calls() {
        let gateway = Arc::new(MockGateway::new());
        let notifier = Notifier::new(&NotifierConfig::default(), gateway.clone());

        assert!(!notifier.is_enabled());
        notifier.send(&record("20240101"), &quote()).await.unwrap();
        let report = notifier.notify_all(&[record("20240101")], &quote()).await;

        assert_eq!(report, NotifyReport::default());
        assert!(gateway.calls().is_empty());
    }
}
