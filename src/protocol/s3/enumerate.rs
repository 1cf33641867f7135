//! Lazy key enumeration under one or more prefixes
//!
//! Listing pages are flattened into a single forward-only stream. The
//! continuation token never leaves this module.

use super::error::S3Result;
use super::operations::S3Operations;
use futures::stream::{self, Stream, StreamExt};

/// A key produced by enumeration, tagged with the prefix it was listed under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumeratedKey {
    /// Prefix that was listed
    pub prefix: String,

    /// Object key, always starting with `prefix`
    pub key: String,
}

impl EnumeratedKey {
    /// Part of the key after the listed prefix
    pub fn relative_key(&self) -> &str {
        self.key.strip_prefix(self.prefix.as_str()).unwrap_or(&self.key)
    }
}

enum Cursor {
    Start,
    Next(String),
    Done,
}

/// Enumerate every key under `prefix`, in listing order.
///
/// Single pass, not restartable. A listing failure is yielded once as an
/// `Err` and ends the sequence.
pub fn enumerate_prefix<'a, S>(
    store: &'a S,
    bucket: &'a str,
    prefix: &'a str,
    page_size: Option<i32>,
) -> impl Stream<Item = S3Result<EnumeratedKey>> + 'a
where
    S: S3Operations + ?Sized,
{
    stream::unfold(Cursor::Start, move |cursor| async move {
        let token = match cursor {
            Cursor::Start => None,
            Cursor::Next(token) => Some(token),
            Cursor::Done => return None,
        };

        match store.list_page(bucket, prefix, token, page_size).await {
            Ok(page) => {
                let next = page.next_cursor.map_or(Cursor::Done, Cursor::Next);
                let keys: Vec<S3Result<EnumeratedKey>> = page
                    .keys
                    .into_iter()
                    .filter(|key| key.starts_with(prefix))
                    .map(|key| {
                        Ok(EnumeratedKey {
                            prefix: prefix.to_string(),
                            key,
                        })
                    })
                    .collect();
                Some((stream::iter(keys), next))
            }
            Err(e) => Some((stream::iter(vec![Err(e)]), Cursor::Done)),
        }
    })
    .flatten()
}

/// Enumerate several prefixes back to back.
///
/// All keys of `prefixes[0]` come first, then all keys of `prefixes[1]`, and
/// so on. A failed prefix does not stop the following ones.
pub fn enumerate_prefixes<'a, S>(
    store: &'a S,
    bucket: &'a str,
    prefixes: &'a [String],
    page_size: Option<i32>,
) -> impl Stream<Item = S3Result<EnumeratedKey>> + 'a
where
    S: S3Operations + ?Sized,
{
    stream::iter(prefixes)
        .map(move |prefix| enumerate_prefix(store, bucket, prefix.as_str(), page_size))
        .flatten()
}
