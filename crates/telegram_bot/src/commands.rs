//! Chat commands understood by the bot.

use engine::BillKind;
use teloxide::types::BotCommand;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Help,
    Bill { kind: BillKind, args: Vec<String> },
}

/// Parses `/name[@bot] arg...`. Command names are case-insensitive,
/// arguments keep the case they were typed with.
///
/// The name must follow the slash directly. A `@bot` mention must name
/// `bot_username`; while the username is unknown any mention is accepted.
pub(crate) fn parse_command(text: &str, bot_username: Option<&str>) -> Option<Command> {
    let rest = text.trim().strip_prefix('/')?;
    let (head, tail) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let name = match head.split_once('@') {
        Some((name, mention)) => {
            if bot_username.is_some_and(|me| !me.eq_ignore_ascii_case(mention)) {
                return None;
            }
            name
        }
        None => head,
    };
    let args = tail.split_whitespace().map(str::to_string).collect();

    match name.to_lowercase().as_str() {
        "b" | "generate" => Some(Command::Bill {
            kind: BillKind::Single,
            args,
        }),
        "s" | "split" => Some(Command::Bill {
            kind: BillKind::Split,
            args,
        }),
        "help" | "start" => Some(Command::Help),
        _ => None,
    }
}

/// Menu registered with Telegram at startup.
pub(crate) fn bot_commands() -> Vec<BotCommand> {
    vec![
        BotCommand::new("b", "Tao QR: /b <bank> <stk> <sotien> [noidung]"),
        BotCommand::new("s", "Chia deu: /s <bank> <stk> <sotien> <songuoi>"),
        BotCommand::new("help", "Huong dan su dung"),
    ]
}

pub(crate) fn usage(kind: BillKind) -> &'static str {
    match kind {
        BillKind::Single => {
            "Dung: /b tpb stk sotien [noidung]\nVi du: /b tpb 0123456789 50000 tien an"
        }
        BillKind::Split => {
            "Dung: /s tpb stk sotien songuoi [noidung]\nVi du: /s tpb 0123456789 50000 3 tien an"
        }
    }
}

pub(crate) fn help_text() -> String {
    format!(
        "Cach su dung:\n/b de tao QR\n/s de chia bill\n{}\n{}",
        usage(BillKind::Single),
        usage(BillKind::Split)
    )
}
