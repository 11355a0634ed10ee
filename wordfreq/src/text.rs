//! Word extraction.
//!
//! A word is a whitespace-separated token which, once lowercased, consists of letters
//! (including the Latin-1 accented range) optionally joined by single hyphens or apostrophes:
//! `don't` and `well-known` are words, `'quoted'`, `--` and `abc123` are not.

use std::fs;
use std::path::Path;

use log::debug;
use regex::Regex;

use crate::error::AppError;

const WORD_PATTERN: &str = r"^[a-zà-ÿ]+(?:[-'][a-zà-ÿ]+)*$";

pub struct TextProcessor {
    text: String,
    word_regex: Regex,
}

impl TextProcessor {
    /// Reads the whole of `path`. Bytes that are not valid UTF-8 are replaced, so they only
    /// ever invalidate the token they appear in.
    pub fn open(path: &Path) -> Result<Self, AppError> {
        let bytes = fs::read(path).map_err(|source| AppError::Input {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("read {} bytes from {}", bytes.len(), path.display());
        Self::from_text(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn from_text(text: impl Into<String>) -> Result<Self, AppError> {
        Ok(Self {
            text: text.into(),
            word_regex: Regex::new(WORD_PATTERN)?,
        })
    }

    /// The lowercased token if it is a word.
    pub fn normalize(&self, token: &str) -> Option<String> {
        let lower = token.to_lowercase();
        self.word_regex.is_match(&lower).then_some(lower)
    }

    /// Calls `handler` once for every word, in text order.
    pub fn process<F>(&self, mut handler: F) -> Result<(), AppError>
    where
        F: FnMut(String) -> Result<(), AppError>,
    {
        for token in self.text.split_whitespace() {
            if let Some(word) = self.normalize(token) {
                handler(word)?;
            }
        }
        Ok(())
    }
}
