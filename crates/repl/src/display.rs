// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Colored message rendering for the human REPL.

use std::io::IsTerminal;

use chat_core::{clock_time, Message, MessageKind};

pub const RESET: &str = "\x1b[0m";
pub const GRAY: &str = "\x1b[90m";
pub const GREEN: &str = "\x1b[92m";
pub const YELLOW: &str = "\x1b[93m";
pub const BLUE: &str = "\x1b[94m";

/// Determine if color output should be enabled.
///
/// Priority: `NO_COLOR=1` disables → `COLOR=1` forces → TTY check.
pub fn should_colorize() -> bool {
    if std::env::var("NO_COLOR").is_ok_and(|v| v == "1") {
        return false;
    }
    if std::env::var("COLOR").is_ok_and(|v| v == "1") {
        return true;
    }
    std::io::stdout().is_terminal()
}

/// Wraps text in ANSI codes, or passes it through on non-terminals.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    colorize: bool,
}

impl Painter {
    pub fn new() -> Self {
        Self {
            colorize: should_colorize(),
        }
    }

    /// A painter that never emits color codes (tests, piped output).
    pub fn uncolored() -> Self {
        Self { colorize: false }
    }

    pub fn paint(&self, color: &str, text: &str) -> String {
        if self.colorize {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

impl Default for Painter {
    fn default() -> Self {
        Self::new()
    }
}

/// Remove backslash escapes that shells add to `!`, `?`, and `$`.
///
/// Messages sent through `chat` from a shell often arrive with these
/// escaped; displaying them raw reads badly.
pub fn unescape_content(content: &str) -> String {
    content
        .replace("\\!", "!")
        .replace("\\?", "?")
        .replace("\\$", "$")
}

/// Render one arrival the way the REPL prints it.
pub fn render_message(painter: &Painter, message: &Message) -> String {
    let time = clock_time(&message.timestamp);
    let name = &message.sender.name;

    match message.kind {
        MessageKind::Join => {
            let mut line = painter.paint(GREEN, &format!("[{time}] → {name} joined the chat"));
            if !message.sender.context.is_empty() {
                line.push('\n');
                line.push_str(
                    &painter.paint(GRAY, &format!("  Context: {}", message.sender.context)),
                );
            }
            line
        }
        MessageKind::Leave => painter.paint(YELLOW, &format!("[{time}] ← {name} left the chat")),
        MessageKind::Message => {
            let content = unescape_content(&message.content);
            painter.paint(BLUE, &format!("[{time}] {name}: {content}"))
        }
    }
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
