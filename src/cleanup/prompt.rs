//! Confirmation prompts for actions that ask before running.

use super::action::CleanupAction;
use super::selection::Selection;
use anyhow::Result;
use async_trait::async_trait;
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Yes/no decision source. May wait indefinitely for the user.
#[async_trait]
pub trait ConfirmationPrompt: Send + Sync {
    async fn confirm(&self, message: &str) -> Result<bool>;
}

/// Message shown before running `action` on `selection`.
pub fn confirmation_message(action: &CleanupAction, selection: &Selection) -> String {
    let mut message = format!("Really execute \"{}\" on:\n", action.clean_title());
    for entry in selection {
        message.push_str("  ");
        message.push_str(&entry.describe());
        message.push('\n');
    }
    message
}

/// Asks on the terminal. Anything but `y`/`yes` counts as no.
#[derive(Debug, Default)]
pub struct StdinPrompter;

impl StdinPrompter {
    pub fn new() -> Self {
        Self
    }

    fn parse_answer(input: &str) -> bool {
        let input = input.trim().to_lowercase();
        input == "y" || input == "yes"
    }
}

#[async_trait]
impl ConfirmationPrompt for StdinPrompter {
    async fn confirm(&self, message: &str) -> Result<bool> {
        let message = message.to_string();
        let answer = tokio::task::spawn_blocking(move || -> Result<String> {
            print!("{message}[y/N]: ");
            io::stdout().flush()?;
            let mut input = String::new();
            let read = io::stdin().read_line(&mut input)?;
            if read == 0 {
                anyhow::bail!("stdin closed while waiting for confirmation");
            }
            Ok(input)
        })
        .await??;

        Ok(Self::parse_answer(&answer))
    }
}

/// Always gives the same answer; counts how often it was asked.
#[derive(Debug)]
pub struct FixedAnswer {
    answer: bool,
    asked: AtomicUsize,
}

impl FixedAnswer {
    pub fn yes() -> Self {
        Self::new(true)
    }

    pub fn no() -> Self {
        Self::new(false)
    }

    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: AtomicUsize::new(0),
        }
    }

    pub fn times_asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfirmationPrompt for FixedAnswer {
    async fn confirm(&self, message: &str) -> Result<bool> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("Auto-answering {} to: {}", self.answer, message.trim_end());
        Ok(self.answer)
    }
}
