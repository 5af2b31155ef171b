//! Bill splitting core.
//!
//! Turns the tokens of a chat command into a [`BillQuote`]: the amount each
//! payer owes, the bank to pay into and a link to the payment QR image.
//!
//! ```rust,no_run
//! use engine::{BillRequest, Engine, RenderMode};
//!
//! let engine = Engine::builder().registry_path("data.txt").build()?;
//! let request = BillRequest::split_from_args(&["tpb", "0123456789", "100k", "3"])?;
//! let quote = engine.quote(&request)?;
//! println!("{}\n{}", quote.render(RenderMode::Plain), quote.qr_url);
//! # Ok::<(), engine::EngineError>(())
//! ```

use std::path::{Path, PathBuf};

pub use amount::{Amount, HeadCount, parse_amount, parse_positive_int, split_evenly};
pub use bank::{BankDirectory, BankRecord};
pub use error::EngineError;
pub use format::{
    DISPLAY_TEXT_LIMIT, MARKDOWN_V2_SPECIAL, RenderMode, escape_markdown_v2,
    normalize_display_text, render_summary,
};
pub use qr::{DEFAULT_QR_BASE_URL, DEFAULT_QR_TEMPLATE, QrService, build_qr_url};
pub use request::{BillDetails, BillKind, BillQuote, BillRequest};

mod amount;
mod bank;
mod error;
mod format;
mod qr;
mod request;

type ResultEngine<T> = Result<T, EngineError>;

/// Default location of the bank registry.
pub const DEFAULT_REGISTRY_PATH: &str = "data.txt";

/// Resolves bill requests against the bank registry.
///
/// The registry is read again on every [`Engine::quote`], edits to the file
/// are visible to the next request without a restart.
#[derive(Clone, Debug)]
pub struct Engine {
    registry_path: PathBuf,
    qr: QrService,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    #[must_use]
    pub fn registry_path(&self) -> &Path {
        &self.registry_path
    }

    /// Current registry contents.
    pub fn banks(&self) -> ResultEngine<BankDirectory> {
        BankDirectory::load(&self.registry_path)
    }

    /// Resolves the bank, computes the amount due and builds the QR link.
    pub fn quote(&self, request: &BillRequest) -> ResultEngine<BillQuote> {
        let details = request.details();
        let banks = self.banks()?;
        let bank = banks
            .get(&details.bank_alias)
            .cloned()
            .ok_or_else(|| EngineError::UnknownBank(details.bank_alias.clone()))?;

        let people = request.people();
        let amount_due = match people {
            Some(people) => split_evenly(details.total, people),
            None => details.total.get(),
        };
        let qr_url = self.qr.url(
            &bank.settlement_id,
            &details.account,
            amount_due,
            details.memo.as_deref(),
        );

        tracing::debug!(
            "{} bill via {}: total {}, due {amount_due}",
            request.kind(),
            bank.alias,
            details.total
        );

        Ok(BillQuote {
            bank,
            account: details.account.clone(),
            total: details.total,
            people,
            amount_due,
            memo: details.memo.clone(),
            qr_url,
        })
    }
}

#[derive(Debug, Default)]
pub struct EngineBuilder {
    registry_path: Option<PathBuf>,
    qr: Option<QrService>,
}

impl EngineBuilder {
    /// Where the bank registry lives, `data.txt` when not set.
    pub fn registry_path(mut self, path: impl Into<PathBuf>) -> EngineBuilder {
        self.registry_path = Some(path.into());
        self
    }

    pub fn qr_service(mut self, qr: QrService) -> EngineBuilder {
        self.qr = Some(qr);
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> ResultEngine<Engine> {
        let registry_path = self
            .registry_path
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REGISTRY_PATH));
        if registry_path.as_os_str().is_empty() {
            return Err(EngineError::InvalidConfig(
                "empty bank registry path".to_string(),
            ));
        }

        Ok(Engine {
            registry_path,
            qr: self.qr.unwrap_or_default(),
        })
    }
}
