// Remote-first, local-fallback combinators
use std::future::Future;
use tracing::{debug, warn};

use crate::Result;

/// Which side of a fallback pair answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Primary,
    Fallback,
}

/// Run `primary`; if it fails or comes back empty, run `fallback` instead
///
/// Never fails outward: if even the fallback errors, the caller gets an
/// empty list and the error goes to the log.
pub async fn with_fallback<T, P, F, Fut>(label: &str, primary: P, fallback: F) -> Result<Vec<T>>
where
    P: Future<Output = Result<Vec<T>>>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let (_, items) = with_fallback_source(label, primary, fallback).await;
    Ok(items)
}

/// `with_fallback`, also reporting which source the items came from
pub async fn with_fallback_source<T, P, F, Fut>(
    label: &str,
    primary: P,
    fallback: F,
) -> (Source, Vec<T>)
where
    P: Future<Output = Result<Vec<T>>>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    match primary.await {
        Ok(items) if !items.is_empty() => return (Source::Primary, items),
        Ok(_) => debug!("{}: primary source empty, using fallback data", label),
        Err(e) => warn!("{}: primary source failed ({}), using fallback data", label, e),
    }

    match fallback().await {
        Ok(items) => (Source::Fallback, items),
        Err(e) => {
            warn!("{}: fallback failed too ({}), returning nothing", label, e);
            (Source::Fallback, Vec::new())
        }
    }
}

/// Single-entity flavour: the fallback decides whether the entity exists
///
/// Only a `NotFound` from the fallback reaches the caller, which is exactly
/// the "absent in both sources" case.
pub async fn with_fallback_one<T, P, F, Fut>(label: &str, primary: P, fallback: F) -> Result<T>
where
    P: Future<Output = Result<T>>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match primary.await {
        Ok(item) => return Ok(item),
        Err(e) if e.is_not_found() => debug!("{}: not in primary source, checking fallback", label),
        Err(e) => warn!("{}: primary source failed ({}), checking fallback", label, e),
    }

    fallback().await
}
