//! Payment QR links.
//!
//! The image itself is rendered by an external service, the engine only
//! builds its URL:
//!
//! `<base_url>/image/<settlement id>-<account>-<template>.png?amount=<amount>`

use crate::{DISPLAY_TEXT_LIMIT, EngineError, ResultEngine, normalize_display_text};

pub const DEFAULT_QR_BASE_URL: &str = "https://img.vietqr.io";
pub const DEFAULT_QR_TEMPLATE: &str = "compact2";

/// Builds a QR link on the default service.
///
/// ```rust
/// use engine::build_qr_url;
///
/// assert_eq!(
///     build_qr_url("970423", "0123456789", 50_000),
///     "https://img.vietqr.io/image/970423-0123456789-compact2.png?amount=50000"
/// );
/// ```
#[must_use]
pub fn build_qr_url(settlement_id: &str, account: &str, amount: u64) -> String {
    QrService::default().url(settlement_id, account, amount, None)
}

/// Location and style of the QR image service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QrService {
    base_url: String,
    template: String,
    include_memo: bool,
}

impl Default for QrService {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_QR_BASE_URL.to_string(),
            template: DEFAULT_QR_TEMPLATE.to_string(),
            include_memo: false,
        }
    }
}

impl QrService {
    pub fn new(base_url: &str, template: &str) -> ResultEngine<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(EngineError::InvalidConfig("empty QR base url".to_string()));
        }
        let template = template.trim();
        if template.is_empty() || template.contains('/') {
            return Err(EngineError::InvalidConfig(format!(
                "invalid QR template: {template:?}"
            )));
        }

        Ok(Self {
            base_url: base_url.to_string(),
            template: template.to_string(),
            include_memo: false,
        })
    }

    /// Also pass the memo to the service as transfer content (`addInfo`).
    #[must_use]
    pub fn include_memo(mut self, include: bool) -> Self {
        self.include_memo = include;
        self
    }

    /// Settlement id and account are used verbatim as path segments, callers
    /// must not pass values containing `/`, `?` or `#`.
    #[must_use]
    pub fn url(&self, settlement_id: &str, account: &str, amount: u64, memo: Option<&str>) -> String {
        let mut url = format!(
            "{}/image/{settlement_id}-{account}-{}.png?amount={}",
            self.base_url,
            self.template,
            urlencoding::encode(&amount.to_string())
        );

        if self.include_memo
            && let Some(info) = memo
                .map(|memo| normalize_display_text(memo, DISPLAY_TEXT_LIMIT))
                .filter(|info| !info.is_empty())
        {
            url.push_str("&addInfo=");
            url.push_str(&urlencoding::encode(&info));
        }

        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_service_shape() {
        assert_eq!(
            build_qr_url("970423", "0123456789", 33_333),
            "https://img.vietqr.io/image/970423-0123456789-compact2.png?amount=33333"
        );
    }

    #[test]
    fn custom_service_strips_trailing_slash() {
        let service = QrService::new("http://qr.local/", "print").unwrap();
        assert_eq!(
            service.url("1", "2", 3, None),
            "http://qr.local/image/1-2-print.png?amount=3"
        );
    }

    #[test]
    fn rejects_bad_configuration() {
        assert!(QrService::new("  ", "compact2").is_err());
        assert!(QrService::new("https://img.vietqr.io", "").is_err());
        assert!(QrService::new("https://img.vietqr.io", "a/b").is_err());
    }

    #[test]
    fn memo_is_ignored_unless_enabled() {
        let service = QrService::default();
        assert!(!service.url("1", "2", 3, Some("tien an")).contains("addInfo"));
    }

    #[test]
    fn memo_is_normalized_and_encoded() {
        let service = QrService::default().include_memo(true);
        assert_eq!(
            service.url("970423", "01", 50_000, Some("Tiền ăn trưa!!!")),
            "https://img.vietqr.io/image/970423-01-compact2.png?amount=50000&addInfo=TIEN%20AN%20TRUA"
        );
        assert!(!service.url("1", "2", 3, Some("!!!")).contains("addInfo"));
        assert!(!service.url("1", "2", 3, None).contains("addInfo"));
    }
}
