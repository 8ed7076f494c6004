//! Terminal output for the chat.

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone, Utc};

use friendbot_core::Message;

const BOT_NAME: &str = "Friendly Bot";

/// `h:mm AM/PM` in the given timezone.
pub fn format_time_in<Tz>(timestamp: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp.with_timezone(tz).format("%-I:%M %p").to_string()
}

/// `h:mm AM/PM` in local time.
pub fn format_time(timestamp: &DateTime<Utc>) -> String {
    format_time_in(timestamp, &Local)
}

/// One rendered message line.
pub fn format_message(message: &Message, time: &str) -> String {
    let author = if message.is_bot { BOT_NAME } else { "You" };
    format!("[{}] {}: {}", time, author, message.text)
}

pub fn print_message(message: &Message) {
    println!("{}", format_message(message, &format_time(&message.timestamp)));
}

pub fn print_banner(has_credential: bool) {
    println!("{} - always here to chat! 😊", BOT_NAME);
    if has_credential {
        println!("(AI replies on. Type /help for commands.)");
    } else {
        println!("(No API key set, using canned replies. Type /help for commands.)");
    }
    println!();
}

pub fn print_typing(pending: usize) {
    if pending > 1 {
        eprintln!("  {} is typing… ({} replies pending)", BOT_NAME, pending);
    } else {
        eprintln!("  {} is typing…", BOT_NAME);
    }
}

pub fn print_notice(text: &str) {
    println!("  * {}", text);
}

pub fn print_help() {
    println!("  /key <api-key>  use an API key for AI replies");
    println!("  /key            forget the API key");
    println!("  /help           show this help");
    println!("  /quit           leave the chat");
}
