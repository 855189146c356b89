//! Daily quote card on the home screen.
//!
//! # Invariants
//! - The pick is stable for a (day, user) pair: the index is a 31-multiplier
//!   string hash over UTF-16 code units of `"{date}::{uid}::log-in-diary"`.
//! - Once a day's quote is cached it is reused for the rest of that day even
//!   if the built-in list changes.
//! - A malformed cache or close marker is ignored, never an error.

use crate::model::calendar::format_date;
use crate::model::user::UserId;
use crate::repo::settings_repo::SettingsRepository;
use crate::repo::{RepoError, RepoResult};
use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};

pub const KEY_DAILY_QUOTE: &str = "quote.daily_v1";
pub const KEY_QUOTE_CLOSED: &str = "quote.closed_v1";

const SEED_SUFFIX: &str = "log-in-diary";

/// Built-in quote list as `(text, author)`.
pub const QUOTES: &[(&str, &str)] = &[
    ("Well begun is half done.", "Aristotle"),
    ("It does not matter how slowly you go as long as you do not stop.", "Confucius"),
    ("The secret of getting ahead is getting started.", "Mark Twain"),
    ("Rest when you're weary. Refresh and renew yourself.", "Ralph Marston"),
    ("Nothing is worth more than this day.", "Goethe"),
    ("Small deeds done are better than great deeds planned.", "Peter Marshall"),
    ("Write it on your heart that every day is the best day in the year.", "Ralph Waldo Emerson"),
    ("Almost everything will work again if you unplug it for a few minutes, including you.", "Anne Lamott"),
    ("We are what we repeatedly do.", "Will Durant"),
    ("Keep your face always toward the sunshine.", "Walt Whitman"),
    ("The best way out is always through.", "Robert Frost"),
    ("One day at a time.", ""),
];

/// One quote; `author` is `None` when unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub author: Option<String>,
}

impl Quote {
    fn from_builtin(index: usize) -> Option<Self> {
        QUOTES.get(index).map(|(text, author)| Self {
            text: (*text).to_string(),
            author: (!author.is_empty()).then(|| (*author).to_string()),
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CachedQuote {
    date: NaiveDate,
    quote: Quote,
}

#[derive(Debug, Serialize, Deserialize)]
struct ClosedMarker {
    date: NaiveDate,
    closed: bool,
}

/// 31-multiplier hash over UTF-16 code units, wrapping at 2^32.
pub fn hash_seed(seed: &str) -> u32 {
    seed.encode_utf16().fold(0u32, |hash, unit| {
        hash.wrapping_mul(31).wrapping_add(u32::from(unit))
    })
}

/// Index into `QUOTES` for `today`; `0` when the list is empty.
pub fn quote_index(today: NaiveDate, uid: Option<UserId>, quote_count: usize) -> usize {
    if quote_count == 0 {
        return 0;
    }
    let uid = uid.map(|uid| uid.to_string()).unwrap_or_default();
    let seed = format!("{}::{uid}::{SEED_SUFFIX}", format_date(today));
    hash_seed(&seed) as usize % quote_count
}

pub struct QuoteService<R: SettingsRepository> {
    repo: R,
}

impl<R: SettingsRepository> QuoteService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Today's quote, from the cache when it was already picked today.
    /// A fresh pick is written to the cache.
    pub fn daily_quote(&self, uid: Option<UserId>, today: NaiveDate) -> RepoResult<Option<Quote>> {
        if let Some(quote) = self.cached_for(today)? {
            return Ok(Some(quote));
        }

        let Some(quote) = Quote::from_builtin(quote_index(today, uid, QUOTES.len())) else {
            return Ok(None);
        };
        let cached = CachedQuote {
            date: today,
            quote: quote.clone(),
        };
        self.write_json(KEY_DAILY_QUOTE, &cached)?;
        debug!("event=quote_pick module=quote status=ok date={today}");
        Ok(Some(quote))
    }

    /// Same pick as `daily_quote`, but never writes the cache.
    pub fn peek_quote(&self, uid: Option<UserId>, today: NaiveDate) -> RepoResult<Option<Quote>> {
        if let Some(quote) = self.cached_for(today)? {
            return Ok(Some(quote));
        }
        Ok(Quote::from_builtin(quote_index(today, uid, QUOTES.len())))
    }

    pub fn is_closed_today(&self, today: NaiveDate) -> RepoResult<bool> {
        Ok(self
            .read_json::<ClosedMarker>(KEY_QUOTE_CLOSED)?
            .is_some_and(|marker| marker.date == today && marker.closed))
    }

    pub fn close_for_today(&self, today: NaiveDate) -> RepoResult<()> {
        self.write_json(
            KEY_QUOTE_CLOSED,
            &ClosedMarker {
                date: today,
                closed: true,
            },
        )?;
        info!("event=quote_close module=quote status=ok date={today}");
        Ok(())
    }

    /// Clears the close marker so the card shows again.
    pub fn reopen_today(&self) -> RepoResult<()> {
        self.repo.remove(KEY_QUOTE_CLOSED)?;
        info!("event=quote_reopen module=quote status=ok");
        Ok(())
    }

    fn cached_for(&self, today: NaiveDate) -> RepoResult<Option<Quote>> {
        Ok(self
            .read_json::<CachedQuote>(KEY_DAILY_QUOTE)?
            .filter(|cached| cached.date == today && !cached.quote.text.is_empty())
            .map(|cached| cached.quote))
    }

    fn read_json<T: for<'de> Deserialize<'de>>(&self, key: &str) -> RepoResult<Option<T>> {
        let Some(raw) = self.repo.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                debug!("event=quote_cache module=quote status=ignored key={key} error={err}");
                Ok(None)
            }
        }
    }

    fn write_json<T: Serialize>(&self, key: &str, value: &T) -> RepoResult<()> {
        let raw = serde_json::to_string(value)
            .map_err(|err| RepoError::InvalidData(err.to_string()))?;
        self.repo.set(key, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::{hash_seed, quote_index, Quote, QUOTES};
    use chrono::NaiveDate;

    #[test]
    fn hash_uses_utf16_code_units_and_wraps() {
        assert_eq!(hash_seed(""), 0);
        assert_eq!(hash_seed("a"), 97);
        assert_eq!(hash_seed("ab"), 3105);
        assert_eq!(hash_seed("\u{d55c}"), 54620);
        // Surrogate pair: 0xD83D * 31 + 0xDE00.
        assert_eq!(hash_seed("\u{1F600}"), 1_772_899);
        assert_eq!(hash_seed("2026-10-19::::log-in-diary"), 3_141_397_007);
    }

    #[test]
    fn index_is_stable_for_a_day() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(quote_index(today, None, QUOTES.len()), 11);
        assert_eq!(quote_index(today, None, 0), 0);
    }

    #[test]
    fn blank_author_maps_to_none() {
        let last = Quote::from_builtin(QUOTES.len() - 1).unwrap();
        assert_eq!(last.author, None);
        assert!(Quote::from_builtin(QUOTES.len()).is_none());
    }
}
