//! Bill requests built from command tokens, and the quotes answering them.

use std::fmt;

use crate::{Amount, BankRecord, EngineError, HeadCount, RenderMode, ResultEngine, render_summary};

/// The two command shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BillKind {
    /// One payer owes the whole total.
    Single,
    /// The total is shared evenly.
    Split,
}

impl BillKind {
    /// Minimum number of tokens the command needs.
    #[must_use]
    pub const fn min_args(self) -> usize {
        match self {
            BillKind::Single => 3,
            BillKind::Split => 4,
        }
    }
}

impl fmt::Display for BillKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillKind::Single => f.write_str("single"),
            BillKind::Split => f.write_str("split"),
        }
    }
}

/// Fields shared by both request shapes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BillDetails {
    /// Lower-cased bank alias.
    pub bank_alias: String,
    /// Receiving account, not validated.
    pub account: String,
    pub total: Amount,
    pub memo: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BillRequest {
    Single(BillDetails),
    Split {
        details: BillDetails,
        people: HeadCount,
    },
}

impl BillRequest {
    /// `<bank> <account> <amount>[k] [memo...]`
    pub fn single_from_args<S: AsRef<str>>(args: &[S]) -> ResultEngine<Self> {
        ensure_args(BillKind::Single, args)?;
        let details = details(args[0].as_ref(), args[1].as_ref(), args[2].as_ref(), &args[3..])?;
        Ok(BillRequest::Single(details))
    }

    /// `<bank> <account> <amount>[k] <people> [memo...]`
    pub fn split_from_args<S: AsRef<str>>(args: &[S]) -> ResultEngine<Self> {
        ensure_args(BillKind::Split, args)?;
        let details = details(args[0].as_ref(), args[1].as_ref(), args[2].as_ref(), &args[4..])?;
        let people = args[3].as_ref().parse::<HeadCount>()?;
        Ok(BillRequest::Split { details, people })
    }

    #[must_use]
    pub fn kind(&self) -> BillKind {
        match self {
            BillRequest::Single(_) => BillKind::Single,
            BillRequest::Split { .. } => BillKind::Split,
        }
    }

    #[must_use]
    pub fn details(&self) -> &BillDetails {
        match self {
            BillRequest::Single(details) | BillRequest::Split { details, .. } => details,
        }
    }

    #[must_use]
    pub fn people(&self) -> Option<HeadCount> {
        match self {
            BillRequest::Single(_) => None,
            BillRequest::Split { people, .. } => Some(*people),
        }
    }
}

fn ensure_args<S: AsRef<str>>(kind: BillKind, args: &[S]) -> ResultEngine<()> {
    if args.len() < kind.min_args() {
        return Err(EngineError::MissingArguments(kind));
    }
    Ok(())
}

fn details<S: AsRef<str>>(
    bank: &str,
    account: &str,
    amount: &str,
    memo: &[S],
) -> ResultEngine<BillDetails> {
    let total = amount.parse::<Amount>()?;
    let memo = memo
        .iter()
        .map(S::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string();

    Ok(BillDetails {
        bank_alias: bank.to_lowercase(),
        account: account.to_string(),
        total,
        memo: (!memo.is_empty()).then_some(memo),
    })
}

/// A resolved request, ready to be shown and paid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BillQuote {
    pub bank: BankRecord,
    pub account: String,
    pub total: Amount,
    /// Present for split requests.
    pub people: Option<HeadCount>,
    /// What each payer transfers: the total, or the per-person share.
    pub amount_due: u64,
    pub memo: Option<String>,
    pub qr_url: String,
}

impl BillQuote {
    #[must_use]
    pub fn render(&self, mode: RenderMode) -> String {
        render_summary(self, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_joins_memo_and_lowercases_alias() {
        let request =
            BillRequest::single_from_args(&["TPB", "0123456789", "50k", "tien", "an"]).unwrap();
        let details = request.details();
        assert_eq!(request.kind(), BillKind::Single);
        assert_eq!(details.bank_alias, "tpb");
        assert_eq!(details.account, "0123456789");
        assert_eq!(details.total.get(), 50_000);
        assert_eq!(details.memo.as_deref(), Some("tien an"));
        assert_eq!(request.people(), None);
    }

    #[test]
    fn single_without_memo() {
        let request = BillRequest::single_from_args(&["tpb", "01", "5"]).unwrap();
        assert_eq!(request.details().memo, None);
    }

    #[test]
    fn split_reads_head_count() {
        let request =
            BillRequest::split_from_args(&["tpb", "01", "100000", "3", "tien", "an"]).unwrap();
        assert_eq!(request.kind(), BillKind::Split);
        assert_eq!(request.people().map(HeadCount::get), Some(3));
        assert_eq!(request.details().memo.as_deref(), Some("tien an"));
    }

    #[test]
    fn too_few_arguments() {
        assert_eq!(
            BillRequest::single_from_args(&["tpb", "01"]).unwrap_err(),
            EngineError::MissingArguments(BillKind::Single)
        );
        assert_eq!(
            BillRequest::split_from_args(&["tpb", "01", "100000"]).unwrap_err(),
            EngineError::MissingArguments(BillKind::Split)
        );
        let empty: [&str; 0] = [];
        assert!(BillRequest::single_from_args(&empty).is_err());
    }

    #[test]
    fn amount_is_checked_before_head_count() {
        assert_eq!(
            BillRequest::split_from_args(&["tpb", "01", "abc", "0"]).unwrap_err(),
            EngineError::InvalidAmount("abc".to_string())
        );
        assert_eq!(
            BillRequest::split_from_args(&["tpb", "01", "100", "0"]).unwrap_err(),
            EngineError::InvalidHeadCount("0".to_string())
        );
    }
}
