//! Bank registry.
//!
//! The registry is a plain UTF-8 text file, one bank per line:
//!
//! ```text
//! # alias, settlement id, display code
//! tpb, 970423, TPBank
//! vcb 970436
//! mb 970422 "MB Bank"
//! ```
//!
//! Lines containing a comma are split on commas, every other line is split
//! like a shell command line so quoted fields may contain spaces.

use std::{collections::HashMap, fs, io, path::Path};

use crate::{EngineError, ResultEngine};

/// A bank the users can refer to by a short alias.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BankRecord {
    /// Lower-cased lookup key.
    pub alias: String,
    /// Bank identification number embedded in the QR link.
    pub settlement_id: String,
    /// Code shown to humans, the upper-cased alias when the line has no
    /// third field.
    pub display_code: String,
}

/// Banks keyed by alias. The last line wins on duplicated aliases.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BankDirectory {
    banks: HashMap<String, BankRecord>,
}

impl BankDirectory {
    /// Reads the registry at `path`.
    ///
    /// A missing file is not an error: it yields an empty directory, so every
    /// lookup fails the same way as an unknown alias would.
    pub fn load(path: impl AsRef<Path>) -> ResultEngine<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => {
                let directory = Self::parse(&contents);
                tracing::debug!(
                    "loaded {} banks from {}",
                    directory.len(),
                    path.display()
                );
                Ok(directory)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("bank registry {} not found", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(EngineError::Registry {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Parses registry contents. Malformed lines are skipped.
    #[must_use]
    pub fn parse(contents: &str) -> Self {
        let mut banks = HashMap::new();
        for (idx, raw) in contents.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match parse_record(line) {
                Some(record) => {
                    banks.insert(record.alias.clone(), record);
                }
                None => tracing::warn!("skipping bank registry line {}: {line}", idx + 1),
            }
        }
        Self { banks }
    }

    /// Case-insensitive lookup.
    #[must_use]
    pub fn get(&self, alias: &str) -> Option<&BankRecord> {
        self.banks.get(&alias.to_lowercase())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.banks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BankRecord> {
        self.banks.values()
    }
}

fn parse_record(line: &str) -> Option<BankRecord> {
    let fields: Vec<String> = if line.contains(',') {
        line.split(',').map(|field| field.trim().to_string()).collect()
    } else {
        split_words(line)?
    };

    let [alias, settlement_id, rest @ ..] = fields.as_slice() else {
        return None;
    };

    // Empty fields are kept as written, only a missing third field defaults.
    let alias = alias.to_lowercase();
    let display_code = rest
        .first()
        .cloned()
        .unwrap_or_else(|| alias.to_uppercase());

    Some(BankRecord {
        alias,
        settlement_id: settlement_id.clone(),
        display_code,
    })
}

/// Shell-like word splitting.
///
/// Single quotes keep their content literally, double quotes allow `\"` and
/// `\\`, a backslash outside quotes escapes the next character. Returns
/// `None` on an unterminated quote or a trailing backslash.
fn split_words(line: &str) -> Option<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match ch {
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            '\'' => {
                in_word = true;
                loop {
                    match chars.next()? {
                        '\'' => break,
                        c => current.push(c),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next()? {
                        '"' => break,
                        '\\' => match chars.next()? {
                            c @ ('"' | '\\') => current.push(c),
                            c => {
                                current.push('\\');
                                current.push(c);
                            }
                        },
                        c => current.push(c),
                    }
                }
            }
            '\\' => {
                in_word = true;
                current.push(chars.next()?);
            }
            c => {
                in_word = true;
                current.push(c);
            }
        }
    }
    if in_word {
        words.push(current);
    }

    Some(words)
}
