use std::fmt::Display;

use engine::{BillKind, BillQuote, BillRequest, EngineError, RenderMode};
use teloxide::{
    prelude::*,
    types::{ChatId, InputFile, ParseMode, User},
};

use crate::{
    ConfigParameters,
    commands::{Command, help_text, parse_command, usage},
};

const QR_FAILED: &str = "Khong gui duoc anh QR. Vui long thu lai.";

#[derive(Debug, thiserror::Error)]
enum DeliveryError {
    #[error("invalid QR url {url}: {message}")]
    InvalidUrl { url: String, message: String },
    #[error(transparent)]
    Telegram(#[from] teloxide::RequestError),
}

pub(crate) async fn handle_message(
    bot: Bot,
    msg: Message,
    cfg: ConfigParameters,
) -> ResponseResult<()> {
    if !is_allowed(&cfg, msg.from.as_ref()) {
        return Ok(());
    }

    let username = cfg.bot_username.as_deref();
    let Some(cmd) = msg.text().and_then(|text| parse_command(text, username)) else {
        return Ok(());
    };

    match cmd {
        Command::Help => {
            bot.send_message(msg.chat.id, help_text()).await?;
        }
        Command::Bill { kind, args } => handle_bill(&bot, &msg, &cfg, kind, &args).await?,
    }

    Ok(())
}

async fn handle_bill(
    bot: &Bot,
    msg: &Message,
    cfg: &ConfigParameters,
    kind: BillKind,
    args: &[String],
) -> ResponseResult<()> {
    let chat_id = msg.chat.id;

    let request = match kind {
        BillKind::Single => BillRequest::single_from_args(args),
        BillKind::Split => BillRequest::split_from_args(args),
    };
    let quote = match request.and_then(|request| cfg.engine.quote(&request)) {
        Ok(quote) => quote,
        Err(err) => {
            tracing::debug!(chat_id = chat_id.0, "{kind} request rejected: {err}");
            let text = user_message_for_engine_error(&err, kind, &registry_name(cfg));
            bot.send_message(chat_id, text).await?;
            return Ok(());
        }
    };

    let mode = render_mode(kind);
    let mut reply = bot.send_message(chat_id, quote.render(mode));
    if mode == RenderMode::Escaped {
        reply = reply.parse_mode(ParseMode::MarkdownV2);
    }
    reply.await?;

    let request_id = msg.id;
    deliver_qr(
        chat_id,
        send_qr(bot, chat_id, &quote),
        || async move { bot.send_message(chat_id, QR_FAILED).await.map(drop) },
        || async move { bot.delete_message(chat_id, request_id).await.map(drop) },
    )
    .await
}

/// Runs the steps that follow the summary reply.
///
/// When the photo fails the fallback text is sent and the request message is
/// left alone. Otherwise the request message is deleted; a failed delete is
/// only logged.
async fn deliver_qr<E, F, FFut, C, CFut, CE>(
    chat_id: ChatId,
    photo: impl Future<Output = Result<(), E>>,
    fallback: F,
    cleanup: C,
) -> ResponseResult<()>
where
    E: Display,
    F: FnOnce() -> FFut,
    FFut: Future<Output = ResponseResult<()>>,
    C: FnOnce() -> CFut,
    CFut: Future<Output = Result<(), CE>>,
    CE: Display,
{
    if let Err(err) = photo.await {
        tracing::warn!(chat_id = chat_id.0, "failed to send QR image: {err}");
        return fallback().await;
    }

    if let Err(err) = cleanup().await {
        tracing::debug!(chat_id = chat_id.0, "could not delete request message: {err}");
    }

    Ok(())
}

async fn send_qr(bot: &Bot, chat_id: ChatId, quote: &BillQuote) -> Result<(), DeliveryError> {
    let url = reqwest::Url::parse(&quote.qr_url).map_err(|err| DeliveryError::InvalidUrl {
        url: quote.qr_url.clone(),
        message: err.to_string(),
    })?;
    bot.send_photo(chat_id, InputFile::url(url)).await?;
    Ok(())
}

/// `/b` answers in plain text, `/s` in MarkdownV2.
fn render_mode(kind: BillKind) -> RenderMode {
    match kind {
        BillKind::Single => RenderMode::Plain,
        BillKind::Split => RenderMode::Escaped,
    }
}

fn is_allowed(cfg: &ConfigParameters, from: Option<&User>) -> bool {
    let Some(from) = from else {
        return false;
    };
    match &cfg.allowed_users {
        None => true,
        Some(ids) => ids.contains(&from.id),
    }
}

fn registry_name(cfg: &ConfigParameters) -> String {
    cfg.engine
        .registry_path()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| engine::DEFAULT_REGISTRY_PATH.to_string())
}

fn user_message_for_engine_error(err: &EngineError, kind: BillKind, registry: &str) -> String {
    match (err, kind) {
        (EngineError::MissingArguments(kind), _) => usage(*kind).to_string(),
        (EngineError::InvalidAmount(_) | EngineError::InvalidHeadCount(_), BillKind::Split) => {
            "So tien va so nguoi phai la so nguyen duong.".to_string()
        }
        (EngineError::InvalidAmount(_) | EngineError::InvalidHeadCount(_), BillKind::Single) => {
            "So tien khong hop le.".to_string()
        }
        (EngineError::UnknownBank(alias), _) => {
            format!("Khong tim thay ngan hang: {alias}. Kiem tra {registry}.")
        }
        (EngineError::Registry { .. } | EngineError::InvalidConfig(_), _) => {
            "Khong doc duoc danh sach ngan hang. Vui long thu lai sau.".to_string()
        }
    }
}
