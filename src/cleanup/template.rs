//! Command template parsing and shell-safe expansion.
//!
//! A template is a shell command line with placeholders:
//!
//! | Token | Expands to |
//! |-------|------------|
//! | `%p`  | absolute path of the entry |
//! | `%n`  | base name of the entry |
//! | `%d`  | directory containing the entry (the entry itself for directories and dot entries) |
//! | `%t`  | unused destination for the entry inside the trash directory |
//!
//! Literal template text is trusted configuration and is passed to the
//! shell verbatim. Every substituted value is single-quoted with
//! [`shell_words::quote`], so it always reaches the command as exactly one
//! word, whatever whitespace or metacharacters it contains. A base name
//! starting with `-` is prefixed with `./` so it cannot be read as an option.
//!
//! `%t` never names an existing file: the first free one of `<name>`,
//! `<name>.2`, `<name>.3`, ... is taken, checked against the disk and
//! against targets already handed out by the same [`ExpansionContext`].

use super::selection::SelectedEntry;
use crate::error::{CleanupError, Result};
use std::borrow::Cow;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Path,
    Name,
    Directory,
    TrashDir,
}

impl Placeholder {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'p' => Some(Placeholder::Path),
            'n' => Some(Placeholder::Name),
            'd' => Some(Placeholder::Directory),
            't' => Some(Placeholder::TrashDir),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Placeholder(Placeholder),
}

/// A parsed template, ready to be expanded against any number of entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate<'a> {
    source: &'a str,
    segments: Vec<Segment<'a>>,
}

/// Values that do not come from the entry itself.
///
/// Use one context per batch so that trash targets stay distinct within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionContext {
    pub trash_dir: PathBuf,
    claimed: HashSet<PathBuf>,
}

impl ExpansionContext {
    pub fn new(trash_dir: impl Into<PathBuf>) -> Self {
        Self {
            trash_dir: trash_dir.into(),
            claimed: HashSet::new(),
        }
    }

    /// Reserve a path in the trash directory for something called `name`.
    pub fn claim_trash_target(&mut self, name: &str) -> PathBuf {
        let mut candidate = self.trash_dir.join(name);
        let mut suffix = 2;
        while self.claimed.contains(&candidate) || candidate.symlink_metadata().is_ok() {
            candidate = self.trash_dir.join(format!("{name}.{suffix}"));
            suffix += 1;
        }
        self.claimed.insert(candidate.clone());
        candidate
    }
}

impl<'a> CommandTemplate<'a> {
    pub fn parse(source: &'a str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal_start = 0;
        let mut chars = source.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            if c != '%' {
                continue;
            }
            if literal_start < pos {
                segments.push(Segment::Literal(&source[literal_start..pos]));
            }
            match chars.next() {
                Some((next_pos, next)) => match Placeholder::from_char(next) {
                    Some(placeholder) => {
                        segments.push(Segment::Placeholder(placeholder));
                        literal_start = next_pos + next.len_utf8();
                    }
                    None => {
                        return Err(CleanupError::MalformedTemplate {
                            template: source.to_string(),
                            token: format!("%{next}"),
                            position: pos,
                        })
                    }
                },
                None => {
                    return Err(CleanupError::MalformedTemplate {
                        template: source.to_string(),
                        token: "%".to_string(),
                        position: pos,
                    })
                }
            }
        }
        if literal_start < source.len() {
            segments.push(Segment::Literal(&source[literal_start..]));
        }

        Ok(Self { source, segments })
    }

    pub fn source(&self) -> &str {
        self.source
    }

    pub fn uses(&self, placeholder: Placeholder) -> bool {
        self.segments
            .iter()
            .any(|segment| *segment == Segment::Placeholder(placeholder))
    }

    /// Expand against one entry into a single shell command line.
    pub fn expand(&self, entry: &SelectedEntry, context: &mut ExpansionContext) -> Result<String> {
        let mut line = String::with_capacity(self.source.len() + 64);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => line.push_str(text),
                Segment::Placeholder(placeholder) => {
                    let value = substitution(*placeholder, entry, context)?;
                    line.push_str(&shell_words::quote(&value));
                }
            }
        }
        Ok(line)
    }
}

fn substitution<'e>(
    placeholder: Placeholder,
    entry: &'e SelectedEntry,
    context: &mut ExpansionContext,
) -> Result<Cow<'e, str>> {
    match placeholder {
        Placeholder::Path => path_str(entry.path()).map(Cow::Borrowed),
        Placeholder::Directory => path_str(entry.directory_path()).map(Cow::Borrowed),
        Placeholder::TrashDir => {
            let name = match entry.path().file_name() {
                Some(_) => base_name(entry)?,
                None => "unnamed",
            };
            let target = context.claim_trash_target(name);
            Ok(Cow::Owned(path_str(&target)?.to_string()))
        }
        Placeholder::Name => {
            let name = base_name(entry)?;
            if name.starts_with('-') {
                Ok(Cow::Owned(format!("./{name}")))
            } else {
                Ok(Cow::Borrowed(name))
            }
        }
    }
}

fn base_name(entry: &SelectedEntry) -> Result<&str> {
    match entry.path().file_name() {
        Some(name) => name
            .to_str()
            .ok_or_else(|| CleanupError::NonUtf8Path(entry.path().to_path_buf())),
        None => path_str(entry.path()),
    }
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| CleanupError::NonUtf8Path(path.to_path_buf()))
}

/// Check that every `%` token in `template` is a known placeholder.
pub fn validate(template: &str) -> Result<()> {
    CommandTemplate::parse(template).map(|_| ())
}

/// Parse and expand in one step.
pub fn expand(
    template: &str,
    entry: &SelectedEntry,
    context: &mut ExpansionContext,
) -> Result<String> {
    CommandTemplate::parse(template)?.expand(entry, context)
}
