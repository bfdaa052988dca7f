//! Catalog queries.
//!
//! Read-only access to the medicine catalog: paged, searchable, with the
//! POS search niceties — a debounced input window and a latest-wins guard
//! so a slow stale response never clobbers a newer query's results. No
//! cache is kept beyond the current page.

use std::{sync::Arc, time::Instant};

use crate::api::{
    ApiError, Paged,
    medicines::{Medicine, MedicineQuery, MedicinesService},
};

pub mod debounce;

pub use debounce::{DEBOUNCE_WINDOW, SearchDebouncer};

/// Page size used by the POS terminal's catalog pane.
pub const POS_PAGE_SIZE: u32 = 20;

/// Opaque handle for one issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

/// Tracks which fetch is the newest; only its response may be applied.
#[derive(Debug, Default)]
pub struct LatestWins {
    issued: u64,
}

impl LatestWins {
    /// Stamp a new fetch, superseding all earlier ones.
    pub fn issue(&mut self) -> Generation {
        self.issued += 1;
        Generation(self.issued)
    }

    /// Whether the given fetch is still the newest.
    #[must_use]
    pub fn is_current(&self, generation: Generation) -> bool {
        generation.0 == self.issued
    }
}

/// Stateful catalog pane: current query, debounced search and the page
/// snapshot most recently applied.
pub struct CatalogBrowser {
    medicines: Arc<dyn MedicinesService>,
    query: MedicineQuery,
    debouncer: SearchDebouncer,
    fetches: LatestWins,
    page: Option<Paged<Medicine>>,
}

impl std::fmt::Debug for CatalogBrowser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogBrowser")
            .field("query", &self.query)
            .field("debouncer", &self.debouncer)
            .field("fetches", &self.fetches)
            .finish_non_exhaustive()
    }
}

impl CatalogBrowser {
    /// Create a browser over the medicines service with the POS page size.
    #[must_use]
    pub fn new(medicines: Arc<dyn MedicinesService>) -> Self {
        Self {
            medicines,
            query: MedicineQuery {
                page_size: POS_PAGE_SIZE,
                ..MedicineQuery::default()
            },
            debouncer: SearchDebouncer::default(),
            fetches: LatestWins::default(),
            page: None,
        }
    }

    /// The query the next fetch will use.
    #[must_use]
    pub fn query(&self) -> &MedicineQuery {
        &self.query
    }

    /// The page snapshot most recently applied, if any.
    #[must_use]
    pub fn current_page(&self) -> Option<&Paged<Medicine>> {
        self.page.as_ref()
    }

    /// Record a search keystroke; the query fires via [`Self::poll_search`]
    /// once the debounce window elapses.
    pub fn type_search(&mut self, term: &str, now: Instant) {
        self.debouncer.submit(term, now);
    }

    /// Fire the pending search once due: applies the term, rewinds to page
    /// 1 and fetches. Returns `Ok(None)` when no search is due yet.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the fetch fails; the pending term has
    /// been consumed either way.
    pub async fn poll_search(
        &mut self,
        now: Instant,
    ) -> Result<Option<&Paged<Medicine>>, ApiError> {
        let Some(term) = self.debouncer.fire(now) else {
            return Ok(None);
        };

        self.query.search_term = (!term.is_empty()).then_some(term);
        self.query.page_number = 1;

        self.refresh().await
    }

    /// Jump to a page of the current query.
    pub fn set_page(&mut self, page_number: u32) {
        self.query.page_number = page_number.max(1);
    }

    /// Restrict the catalog to one category (or clear the restriction);
    /// rewinds to page 1.
    pub fn set_category(&mut self, category_id: Option<i64>) {
        self.query.category_id = category_id;
        self.query.page_number = 1;
    }

    /// Apply a backend-defined filter such as `expired` or `lowstock`;
    /// rewinds to page 1.
    pub fn set_filter(&mut self, filter: Option<String>) {
        self.query.filter = filter;
        self.query.page_number = 1;
    }

    /// Drop the search term and any pending keystrokes, rewinding to page
    /// 1. Called after a successful checkout so the next fetch shows fresh
    /// stock numbers.
    pub fn reset_search(&mut self) {
        self.debouncer.cancel();
        self.query.search_term = None;
        self.query.page_number = 1;
    }

    /// Fetch the current query immediately.
    ///
    /// The response is applied only if no newer fetch was issued while this
    /// one was in flight; a superseded response yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the backend call fails.
    pub async fn refresh(&mut self) -> Result<Option<&Paged<Medicine>>, ApiError> {
        let generation = self.fetches.issue();
        let medicines = Arc::clone(&self.medicines);

        let page = medicines.list_medicines(&self.query).await?;

        if !self.fetches.is_current(generation) {
            return Ok(None);
        }

        self.page = Some(page);

        Ok(self.page.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::api::{PageMeta, medicines::MockMedicinesService};

    use super::*;

    fn one_page(names: &[&str]) -> Paged<Medicine> {
        let data = names
            .iter()
            .enumerate()
            .map(|(index, name)| Medicine {
                id: i64::try_from(index).unwrap_or_default() + 1,
                name: (*name).to_string(),
                description: None,
                category_id: 1,
                stock_quantity: 10,
                price: Decimal::new(500, 2),
                expiry_date: "2027-01-01T00:00:00".to_string(),
            })
            .collect::<Vec<_>>();

        Paged {
            meta: PageMeta {
                total_count: data.len() as u64,
                page_size: POS_PAGE_SIZE,
                current_page: 1,
                total_pages: 1,
            },
            data,
        }
    }

    #[test]
    fn latest_wins_rejects_superseded_generations() {
        let mut fetches = LatestWins::default();

        let first = fetches.issue();
        let second = fetches.issue();

        assert!(!fetches.is_current(first), "stale fetch must be rejected");
        assert!(fetches.is_current(second));
    }

    #[tokio::test]
    async fn typing_burst_fires_exactly_one_query() -> TestResult {
        let mut medicines = MockMedicinesService::new();
        medicines
            .expect_list_medicines()
            .withf(|query| query.search_term.as_deref() == Some("paracet"))
            .times(1)
            .returning(|_| Ok(one_page(&["Paracetamol 500mg"])));

        let mut browser = CatalogBrowser::new(Arc::new(medicines));
        let start = Instant::now();

        browser.type_search("para", start);
        browser.type_search("paracet", start + Duration::from_millis(200));

        // Not due yet: no query fires.
        assert!(browser.poll_search(start + Duration::from_millis(300)).await?.is_none());

        let page = browser.poll_search(start + Duration::from_millis(800)).await?;
        assert_eq!(page.map(|page| page.data.len()), Some(1));

        // Burst fully consumed.
        assert!(browser.poll_search(start + Duration::from_secs(5)).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn search_rewinds_to_page_one() -> TestResult {
        let mut medicines = MockMedicinesService::new();
        medicines
            .expect_list_medicines()
            .withf(|query| query.page_number == 1)
            .times(1)
            .returning(|_| Ok(one_page(&[])));

        let mut browser = CatalogBrowser::new(Arc::new(medicines));
        browser.set_page(4);

        let start = Instant::now();
        browser.type_search("amox", start);
        browser.poll_search(start + Duration::from_secs(1)).await?;

        Ok(())
    }

    #[tokio::test]
    async fn reset_search_clears_term_and_pending_input() -> TestResult {
        let mut medicines = MockMedicinesService::new();
        medicines
            .expect_list_medicines()
            .withf(|query| query.search_term.is_none() && query.page_number == 1)
            .times(1)
            .returning(|_| Ok(one_page(&["Paracetamol 500mg"])));

        let mut browser = CatalogBrowser::new(Arc::new(medicines));
        let start = Instant::now();

        browser.type_search("para", start);
        browser.reset_search();

        // The pending keystroke was cancelled outright.
        assert!(browser.poll_search(start + Duration::from_secs(1)).await?.is_none());

        browser.refresh().await?;

        Ok(())
    }

    #[tokio::test]
    async fn refresh_applies_the_page_snapshot() -> TestResult {
        let mut medicines = MockMedicinesService::new();
        medicines
            .expect_list_medicines()
            .returning(|_| Ok(one_page(&["Paracetamol 500mg", "Amoxicillin 250mg"])));

        let mut browser = CatalogBrowser::new(Arc::new(medicines));

        assert!(browser.current_page().is_none());

        browser.refresh().await?;

        assert_eq!(browser.current_page().map(|page| page.data.len()), Some(2));

        Ok(())
    }
}
