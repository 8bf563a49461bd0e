//! Field extraction
//!
//! A [`FieldExtractor`] turns the snapshot of one page into the records that
//! page lists. The crawler only knows the shape of what comes back; what each
//! column means is the extractor's business.

mod portal;

pub use portal::{DetailRowExtractor, LotRowExtractor, NoticeRowExtractor};

use crate::browser::PageSnapshot;
use crate::config::SelectorConfig;
use crate::model::{Lot, LotDetailRow, Notice};
use crate::ExtractError;

/// Maps a page snapshot to the records it contains
pub trait FieldExtractor: Send + Sync {
    type Record: Send;

    fn extract(&self, page: &PageSnapshot) -> Result<Vec<Self::Record>, ExtractError>;
}

/// Extractor backed by a closure
#[derive(Debug, Clone, Copy)]
pub struct FnExtractor<F>(F);

/// Wraps a closure as a [`FieldExtractor`]
pub fn extractor_fn<F, R>(f: F) -> FnExtractor<F>
where
    F: Fn(&PageSnapshot) -> Result<Vec<R>, ExtractError> + Send + Sync,
    R: Send,
{
    FnExtractor(f)
}

impl<F, R> FieldExtractor for FnExtractor<F>
where
    F: Fn(&PageSnapshot) -> Result<Vec<R>, ExtractError> + Send + Sync,
    R: Send,
{
    type Record = R;

    fn extract(&self, page: &PageSnapshot) -> Result<Vec<R>, ExtractError> {
        (self.0)(page)
    }
}

/// The three extractors the crawler needs, one per level of the hierarchy
#[derive(Debug, Clone)]
pub struct Extractors<N, L, D> {
    pub notices: N,
    pub lots: L,
    pub details: D,
}

impl<N, L, D> Extractors<N, L, D>
where
    N: FieldExtractor<Record = Notice>,
    L: FieldExtractor<Record = Lot>,
    D: FieldExtractor<Record = LotDetailRow>,
{
    pub fn new(notices: N, lots: L, details: D) -> Self {
        Self {
            notices,
            lots,
            details,
        }
    }
}

/// Extractors for the procurement portal's markup
pub type PortalExtractors = Extractors<NoticeRowExtractor, LotRowExtractor, DetailRowExtractor>;

impl PortalExtractors {
    /// Builds the portal extractors from the configured row selectors
    pub fn portal(selectors: &SelectorConfig) -> Result<Self, ExtractError> {
        Ok(Extractors::new(
            NoticeRowExtractor::new(&selectors.notice_rows)?,
            LotRowExtractor::new(&selectors.lot_rows)?,
            DetailRowExtractor::new(&selectors.detail_rows)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extractor_fn() {
        let lines = extractor_fn(|page: &PageSnapshot| {
            Ok(page.html.lines().map(String::from).collect::<Vec<_>>())
        });

        let page = PageSnapshot {
            url: "https://portal.test/".to_string(),
            html: "a\nb".to_string(),
        };

        assert_eq!(lines.extract(&page).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_portal_extractors_from_defaults() {
        assert!(PortalExtractors::portal(&SelectorConfig::default()).is_ok());
    }

    #[test]
    fn test_portal_extractors_invalid_selector() {
        let selectors = SelectorConfig {
            lot_rows: "tr[[".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            PortalExtractors::portal(&selectors),
            Err(ExtractError::Selector(_))
        ));
    }
}
