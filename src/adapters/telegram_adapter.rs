//! Telegram Bot API notifier.

use crate::domain::error::SigtraderError;
use crate::domain::metrics::Summary;
use crate::ports::notify_port::{format_summary_message, Notifier};
use chrono::NaiveDateTime;
use log::info;
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

pub struct TelegramNotifier {
    client: reqwest::blocking::Client,
    api_url: String,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(token: &str, chat_id: &str) -> Result<Self, SigtraderError> {
        Self::with_api_url(DEFAULT_API_URL, token, chat_id)
    }

    pub fn with_api_url(api_url: &str, token: &str, chat_id: &str) -> Result<Self, SigtraderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| SigtraderError::Notify {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.trim().to_string(),
            chat_id: chat_id.trim().to_string(),
        })
    }

    fn send_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_url, self.token)
    }

    pub fn send_text(&self, text: &str) -> Result<(), SigtraderError> {
        let body = SendMessage {
            chat_id: &self.chat_id,
            text,
        };
        // the URL embeds the bot token, keep it out of error messages
        let resp = self
            .client
            .post(self.send_url())
            .json(&body)
            .send()
            .map_err(|e| SigtraderError::Notify {
                reason: e.without_url().to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().unwrap_or_default();
            return Err(SigtraderError::Notify {
                reason: format!("HTTP {status}: {}", detail.trim()),
            });
        }
        Ok(())
    }
}

impl Notifier for TelegramNotifier {
    fn notify(&self, summary: &Summary, timestamp: NaiveDateTime) -> Result<(), SigtraderError> {
        self.send_text(&format_summary_message(summary, timestamp))?;
        info!("summary sent to Telegram chat {}", self.chat_id);
        Ok(())
    }
}
