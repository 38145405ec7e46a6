//! Reply formatting for the chat transports.
//!
//! Texts are written plain and escaped for the target dialect at render
//! time, so the same outcome renders correctly on Telegram and Discord.

use crate::dispatcher::BuildTriggered;
use crate::error::BuildError;

/// Reply to a build command without a URL.
pub const MISSING_LINK_TEXT: &str = "You need to supply a repository link with a branch.";

/// Reply to a build command whose URL could not be parsed.
pub const INVALID_URL_TEXT: &str =
    "Sorry. Was unable to get the repository and branch from the URL. Check your URL and try again.";

/// Reply when resolution or triggering fails.
pub const TRIGGER_FAILED_TEXT: &str =
    "Sorry. Was unable to trigger your build. Likely the repository is not supported.";

const TELEGRAM_SPECIAL: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!', '\\',
];

const DISCORD_SPECIAL: &[char] = &['\\', '*', '_', '~', '`', '|', '>'];

/// Markup dialect of a chat transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup {
    /// Telegram `MarkdownV2`.
    TelegramMarkdownV2,
    /// Discord message markdown.
    Discord,
    /// No markup.
    Plain,
}

impl Markup {
    /// Escapes free text.
    pub fn text(self, s: &str) -> String {
        match self {
            Markup::TelegramMarkdownV2 => escape_chars(s, TELEGRAM_SPECIAL),
            Markup::Discord => escape_chars(s, DISCORD_SPECIAL),
            Markup::Plain => s.to_string(),
        }
    }

    /// Renders a hyperlink.
    pub fn link(self, label: &str, url: &str) -> String {
        match self {
            Markup::TelegramMarkdownV2 => {
                format!("[{}]({})", self.text(label), escape_chars(url, &[')', '\\']))
            }
            Markup::Discord => format!("[{}]({})", self.text(label), url),
            Markup::Plain => format!("{}: {}", label, url),
        }
    }

    /// Renders inline code.
    pub fn code(self, s: &str) -> String {
        match self {
            Markup::TelegramMarkdownV2 => format!("`{}`", escape_chars(s, &['`', '\\'])),
            Markup::Discord => format!("`{}`", s.replace('`', "")),
            Markup::Plain => s.to_string(),
        }
    }
}

fn escape_chars(s: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Renders the reply for a failed command.
pub fn render_error(err: &BuildError, markup: Markup) -> String {
    let text = match err {
        BuildError::MissingRepositoryLink => MISSING_LINK_TEXT,
        BuildError::InvalidRepositoryUrl(_) => INVALID_URL_TEXT,
        _ => TRIGGER_FAILED_TEXT,
    };
    markup.text(text)
}

/// Renders the reply for a triggered build.
pub fn render_success(triggered: &BuildTriggered, markup: Markup) -> String {
    let images: Vec<String> = triggered.images.iter().map(|i| markup.code(i)).collect();
    format!(
        "{} {}\n{}\n{}",
        markup.text("Your build was triggered."),
        markup.link("View run on GitHub", &triggered.run_url),
        markup.text("Docker Image(s) once run completed:"),
        images.join("\n")
    )
}
