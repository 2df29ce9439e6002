//! Catalog - Product Store, Fetch Coordinator and Mutations
//!
//! Owns the [`CatalogState`] and keeps it in sync with the backend:
//!
//! ```text
//! setter ──► Query State ──► begin fetch (loading) ──► spawn backend call
//!                                                          │
//!        snapshot ◄── apply (if still current) ◄───────────┘
//! ```
//!
//! Every fetch carries a sequence number and the query it was issued for.
//! A response is applied only while that query is still current and no newer
//! fetch has been applied, so out-of-order responses never win.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::constants::{
    ADD_FAILED_MESSAGE, DELETE_FAILED_MESSAGE, FETCH_FAILED_MESSAGE, FIRST_PAGE,
    UPDATE_FAILED_MESSAGE,
};
use crate::domain::form::{FieldErrors, ProductForm};
use crate::domain::product::{Page, ProductDraft, ProductId};
use crate::domain::query::QueryState;
use crate::error::{Error, Result};
use crate::services::{CatalogEvent, ProductBackend};
use crate::state::catalog_state::CatalogState;

struct Inner {
    state: CatalogState,
    /// Last sequence number handed out
    next_seq: u64,
    /// Sequence number of the newest applied response
    applied_seq: u64,
}

struct Shared<B> {
    backend: B,
    inner: Mutex<Inner>,
    subscribers: Mutex<Vec<Sender<CatalogEvent>>>,
    runtime: Handle,
}

impl<B> Shared<B> {
    fn emit(&self, event: CatalogEvent) {
        self.subscribers
            .lock()
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn emit_all(&self, events: Vec<CatalogEvent>) {
        for event in events {
            self.emit(event);
        }
    }
}

/// An in-flight fetch
///
/// Only the newest ticket owns the loading flag. It clears the flag when it
/// settles, either together with the applied response or on drop, which also
/// covers a panicking backend or an aborted task. Superseded tickets settle
/// without touching it.
struct FetchTicket<B> {
    shared: Arc<Shared<B>>,
    seq: u64,
    query: QueryState,
    settled: bool,
}

impl<B> FetchTicket<B> {
    /// Settle under the store lock; returns true when loading was cleared
    fn settle(&mut self, inner: &mut Inner) -> bool {
        if self.settled {
            return false;
        }
        self.settled = true;

        let newest = self.seq == inner.next_seq && inner.state.loading();
        if newest {
            inner.state.set_loading(false);
        }
        newest
    }
}

impl<B> Drop for FetchTicket<B> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let shared = self.shared.clone();
        if self.settle(&mut shared.inner.lock()) {
            shared.emit(CatalogEvent::LoadingChanged { loading: false });
        }
    }
}

/// Product store handle
///
/// Cheap to clone; all clones share one store. Construct it explicitly and
/// hand it to the view.
pub struct Catalog<B> {
    shared: Arc<Shared<B>>,
}

impl<B> Clone for Catalog<B> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<B: ProductBackend> Catalog<B> {
    /// Create a catalog bound to the current tokio runtime
    ///
    /// Nothing is fetched until [`mount`](Self::mount) is called.
    pub fn new(backend: B, page_size: u32) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| Error::Invalid {
            message: format!("Catalog requires a tokio runtime: {e}"),
        })?;
        Ok(Self::with_runtime(backend, page_size, runtime))
    }

    /// Create a catalog that spawns fetches on the given runtime
    pub fn with_runtime(backend: B, page_size: u32, runtime: Handle) -> Self {
        Self {
            shared: Arc::new(Shared {
                backend,
                inner: Mutex::new(Inner {
                    state: CatalogState::new(page_size),
                    next_seq: 0,
                    applied_seq: 0,
                }),
                subscribers: Mutex::new(Vec::new()),
                runtime,
            }),
        }
    }

    /// Consistent copy of the whole store
    pub fn snapshot(&self) -> CatalogState {
        self.shared.inner.lock().state.clone()
    }

    /// Receive change notifications
    pub fn subscribe(&self) -> Receiver<CatalogEvent> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.shared.subscribers.lock().push(tx);
        rx
    }

    /// Initial fetch for the starting Query State
    pub fn mount(&self) -> JoinHandle<()> {
        info!(query = ?self.snapshot().query(), "Mounting catalog");
        self.spawn_fetch()
    }

    // ==================== Query State ====================

    /// Go to a page (clamped to at least 1)
    ///
    /// Returns the triggered fetch, or `None` when the page did not change.
    pub fn set_current_page(&self, page: u32) -> Option<JoinHandle<()>> {
        let page = page.max(FIRST_PAGE);
        self.update_query(|query| {
            if query.page_number == page {
                return false;
            }
            query.page_number = page;
            true
        })
    }

    /// Change the page size (clamped to at least 1)
    pub fn set_page_size(&self, page_size: u32) -> Option<JoinHandle<()>> {
        let page_size = page_size.max(1);
        self.update_query(|query| {
            if query.page_size == page_size {
                return false;
            }
            query.page_size = page_size;
            true
        })
    }

    /// Change the search term; an empty term goes back to the full listing
    pub fn set_search_term(&self, term: impl Into<String>) -> Option<JoinHandle<()>> {
        let term = term.into();
        self.update_query(|query| {
            if query.search_term == term {
                return false;
            }
            query.search_term = term;
            true
        })
    }

    fn update_query(
        &self,
        change: impl FnOnce(&mut QueryState) -> bool,
    ) -> Option<JoinHandle<()>> {
        let query = {
            let mut inner = self.shared.inner.lock();
            if !change(&mut inner.state.query) {
                return None;
            }
            inner.state.query.clone()
        };

        debug!(?query, "Query state changed");
        self.shared.emit(CatalogEvent::QueryChanged(query));
        Some(self.spawn_fetch())
    }

    // ==================== Fetch Coordinator ====================

    /// Mark a fetch as started for the current query
    fn begin_fetch(&self) -> FetchTicket<B> {
        let (ticket, started) = {
            let mut inner = self.shared.inner.lock();
            inner.next_seq += 1;
            let started = !inner.state.loading();
            inner.state.set_loading(true);
            inner.state.clear_error();

            let ticket = FetchTicket {
                shared: self.shared.clone(),
                seq: inner.next_seq,
                query: inner.state.query.clone(),
                settled: false,
            };
            (ticket, started)
        };

        if started {
            self.shared.emit(CatalogEvent::LoadingChanged { loading: true });
        }
        ticket
    }

    /// Begin a fetch now and run it in the background
    ///
    /// Loading is visible as soon as this returns.
    fn spawn_fetch(&self) -> JoinHandle<()> {
        let ticket = self.begin_fetch();
        let catalog = self.clone();
        self.shared
            .runtime
            .spawn(async move { catalog.run_fetch(ticket).await })
    }

    /// Begin a fetch and wait for it to settle
    async fn fetch(&self) {
        let ticket = self.begin_fetch();
        self.run_fetch(ticket).await;
    }

    async fn run_fetch(&self, ticket: FetchTicket<B>) {
        let mut ticket = ticket;
        loop {
            let request = ticket.query.request();
            debug!(seq = ticket.seq, ?request, "Issuing product request");

            let result = self.shared.backend.fetch_page(&request).await;
            if !self.finish_fetch(&mut ticket, result) {
                break;
            }

            // The page was reset; the next ticket supersedes the old one
            // before it drops, so loading stays set across the refetch.
            let next = self.begin_fetch();
            ticket = next;
        }
    }

    /// Apply a settled response; returns true when the page was reset to 1
    ///
    /// Loading clears under the same lock that applies the response.
    fn finish_fetch(&self, ticket: &mut FetchTicket<B>, result: Result<Page>) -> bool {
        let mut events = Vec::new();

        let reset = {
            let mut inner = self.shared.inner.lock();
            if inner.state.query != ticket.query || ticket.seq <= inner.applied_seq {
                debug!(
                    seq = ticket.seq,
                    applied = inner.applied_seq,
                    "Discarding stale product response"
                );
                return false;
            }
            inner.applied_seq = ticket.seq;

            let reset = match result {
                Ok(page) => {
                    let reset = ticket.query.is_search()
                        && page.items.is_empty()
                        && ticket.query.page_number != FIRST_PAGE;

                    events.push(CatalogEvent::PageLoaded {
                        page_number: page.page_number,
                        item_count: page.items.len(),
                        total_pages: page.total_pages,
                    });
                    inner.state.apply_page(page);

                    if reset {
                        inner.state.query.page_number = FIRST_PAGE;
                        events.push(CatalogEvent::QueryChanged(inner.state.query.clone()));
                    }
                    reset
                }
                Err(e) => {
                    warn!(error = %e, seq = ticket.seq, "Failed to fetch products");
                    let message: Arc<str> = Arc::from(FETCH_FAILED_MESSAGE);
                    inner.state.set_error(message.clone());
                    events.push(CatalogEvent::ErrorOccurred { message });
                    false
                }
            };

            if !reset && ticket.settle(&mut inner) {
                events.push(CatalogEvent::LoadingChanged { loading: false });
            }
            reset
        };

        if reset {
            info!("Search returned no products, back to first page");
        }
        self.shared.emit_all(events);
        reset
    }

    // ==================== Mutations ====================

    /// Create a product, then refetch the current view
    pub async fn add_product(&self, draft: &ProductDraft) {
        info!(name = %draft.name, "Adding product");
        let result = self.shared.backend.create_product(draft).await;
        self.complete_mutation(result, ADD_FAILED_MESSAGE).await;
    }

    /// Replace a product, then refetch the current view
    pub async fn update_product(&self, id: &ProductId, draft: &ProductDraft) {
        info!(%id, "Updating product");
        let result = self.shared.backend.update_product(id, draft).await;
        self.complete_mutation(result, UPDATE_FAILED_MESSAGE).await;
    }

    /// Delete a product, then refetch the current view
    pub async fn delete_product(&self, id: &ProductId) {
        info!(%id, "Deleting product");
        let result = self.shared.backend.delete_product(id).await;
        self.complete_mutation(result, DELETE_FAILED_MESSAGE).await;
    }

    /// Validate a form and submit it as a create or, with an id, an update
    ///
    /// Invalid forms are returned untouched and nothing is sent.
    pub async fn submit(
        &self,
        form: &ProductForm,
        editing: Option<&ProductId>,
    ) -> std::result::Result<(), FieldErrors> {
        let draft = form.validate().inspect_err(|errors| {
            debug!(%errors, "Product form rejected");
        })?;

        match editing {
            Some(id) => self.update_product(id, &draft).await,
            None => self.add_product(&draft).await,
        }
        Ok(())
    }

    /// Refetch after a mutation; a failure message is set after the refetch
    /// so the refetch does not clear it
    async fn complete_mutation(&self, result: Result<()>, failure: &'static str) {
        self.fetch().await;

        if let Err(e) = result {
            warn!(error = %e, "{failure}");
            let message: Arc<str> = Arc::from(failure);
            self.shared.inner.lock().state.set_error(message.clone());
            self.shared.emit(CatalogEvent::ErrorOccurred { message });
        }
    }
}

impl<B> std::fmt::Debug for Catalog<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.shared.inner.lock();
        f.debug_struct("Catalog")
            .field("query", &inner.state.query)
            .field("loading", &inner.state.loading())
            .field("next_seq", &inner.next_seq)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::form::Field;
    use crate::domain::product::Product;
    use crate::domain::query::ProductRequest;
    use crate::error::ServerSnafu;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::oneshot;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Fetch(ProductRequest),
        Create(ProductDraft),
        Update(ProductId, ProductDraft),
        Delete(ProductId),
    }

    /// In-memory backend with per-page gates for controlling response order
    #[derive(Default)]
    struct ScriptedBackend {
        products: Vec<Product>,
        calls: Mutex<Vec<Call>>,
        gates: Mutex<HashMap<u32, oneshot::Receiver<Result<Page>>>>,
        fail_fetch: AtomicBool,
        fail_mutations: AtomicBool,
    }

    impl ScriptedBackend {
        fn with_products(count: usize) -> Self {
            let products = (1..=count)
                .map(|i| Product {
                    id: ProductId::Number(i as i64),
                    name: format!("Product {i}"),
                    description: format!("Description {i}"),
                    price: 10.0 + i as f64,
                    stock: i as u32,
                })
                .collect();
            Self {
                products,
                ..Default::default()
            }
        }

        /// Hold responses for a page until the returned sender fires
        fn gate(&self, page_number: u32) -> oneshot::Sender<Result<Page>> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().insert(page_number, rx);
            tx
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().clone()
        }

        fn page_for(&self, request: &ProductRequest) -> Page {
            let matching: Vec<&Product> = match request {
                ProductRequest::List { .. } => self.products.iter().collect(),
                ProductRequest::Search { name, .. } => self
                    .products
                    .iter()
                    .filter(|p| p.name.to_lowercase().contains(&name.to_lowercase()))
                    .collect(),
            };
            let size = request.page_size() as usize;
            let start = (request.page_number() as usize - 1) * size;
            Page {
                items: matching.iter().skip(start).take(size).map(|p| (*p).clone()).collect(),
                page_number: request.page_number(),
                page_size: request.page_size(),
                total_pages: matching.len().div_ceil(size) as u32,
            }
        }

        fn mutation_result(&self, endpoint: &str) -> Result<()> {
            if self.fail_mutations.load(Ordering::SeqCst) {
                ServerSnafu {
                    endpoint,
                    status: 500u16,
                }
                .fail()
            } else {
                Ok(())
            }
        }
    }

    impl ProductBackend for ScriptedBackend {
        async fn fetch_page(&self, request: &ProductRequest) -> Result<Page> {
            self.calls.lock().push(Call::Fetch(request.clone()));
            let gate = self.gates.lock().remove(&request.page_number());
            if let Some(gate) = gate {
                return gate.await.expect("gate sender dropped");
            }
            if self.fail_fetch.load(Ordering::SeqCst) {
                return ServerSnafu {
                    endpoint: "fetch",
                    status: 503u16,
                }
                .fail();
            }
            Ok(self.page_for(request))
        }

        async fn create_product(&self, draft: &ProductDraft) -> Result<()> {
            self.calls.lock().push(Call::Create(draft.clone()));
            self.mutation_result("create")
        }

        async fn update_product(&self, id: &ProductId, draft: &ProductDraft) -> Result<()> {
            self.calls
                .lock()
                .push(Call::Update(id.clone(), draft.clone()));
            self.mutation_result("update")
        }

        async fn delete_product(&self, id: &ProductId) -> Result<()> {
            self.calls.lock().push(Call::Delete(id.clone()));
            self.mutation_result("delete")
        }
    }

    fn catalog(products: usize) -> (Catalog<Arc<ScriptedBackend>>, Arc<ScriptedBackend>) {
        let backend = Arc::new(ScriptedBackend::with_products(products));
        let catalog = Catalog::new(backend.clone(), 9).expect("runtime");
        (catalog, backend)
    }

    fn list(page_size: u32, page_number: u32) -> Call {
        Call::Fetch(ProductRequest::List {
            page_size,
            page_number,
        })
    }

    fn search(name: &str, page_size: u32, page_number: u32) -> Call {
        Call::Fetch(ProductRequest::Search {
            name: name.to_string(),
            page_size,
            page_number,
        })
    }

    fn draft(name: &str) -> ProductDraft {
        ProductDraft {
            name: name.into(),
            description: "B".into(),
            price: 10.0,
            stock: 5,
        }
    }

    #[test]
    fn new_requires_runtime() {
        let result = Catalog::new(ScriptedBackend::default(), 9);
        assert!(matches!(result, Err(Error::Invalid { .. })));
    }

    #[tokio::test]
    async fn mount_lists_first_page() {
        let (catalog, backend) = catalog(20);
        catalog.mount().await.expect("fetch task");

        let state = catalog.snapshot();
        assert_eq!(state.products().len(), 9);
        assert_eq!(state.total_pages(), 3);
        assert_eq!(state.current_page(), 1);
        assert!(!state.loading());
        assert_eq!(state.error(), None);
        assert_eq!(backend.calls(), vec![list(9, 1)]);
    }

    #[tokio::test]
    async fn search_term_selects_search_endpoint() {
        let (catalog, backend) = catalog(20);
        catalog.mount().await.expect("fetch task");

        catalog
            .set_current_page(2)
            .expect("page changed")
            .await
            .expect("fetch task");
        catalog
            .set_search_term("widget")
            .expect("term changed")
            .await
            .expect("fetch task");
        catalog
            .set_search_term("")
            .expect("term changed")
            .await
            .expect("fetch task");

        // "widget" matches nothing on page 2, so the page resets and refetches
        assert_eq!(
            backend.calls(),
            vec![
                list(9, 1),
                list(9, 2),
                search("widget", 9, 2),
                search("widget", 9, 1),
                list(9, 1),
            ]
        );
    }

    #[tokio::test]
    async fn unchanged_setters_do_not_fetch() {
        let (catalog, backend) = catalog(5);
        catalog.mount().await.expect("fetch task");

        assert!(catalog.set_current_page(1).is_none());
        assert!(catalog.set_current_page(0).is_none());
        assert!(catalog.set_page_size(9).is_none());
        assert!(catalog.set_search_term("").is_none());
        assert_eq!(backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn page_size_change_refetches() {
        let (catalog, backend) = catalog(20);
        catalog
            .set_page_size(5)
            .expect("size changed")
            .await
            .expect("fetch task");

        let state = catalog.snapshot();
        assert_eq!(state.page_size(), 5);
        assert_eq!(state.products().len(), 5);
        assert_eq!(state.total_pages(), 4);
        assert_eq!(backend.calls(), vec![list(5, 1)]);
    }

    #[tokio::test]
    async fn empty_search_resets_to_first_page() {
        let (catalog, backend) = catalog(30);
        catalog
            .set_current_page(3)
            .expect("page changed")
            .await
            .expect("fetch task");
        catalog
            .set_search_term("zzz")
            .expect("term changed")
            .await
            .expect("fetch task");

        let state = catalog.snapshot();
        assert_eq!(state.current_page(), 1);
        assert!(state.products().is_empty());
        assert_eq!(state.total_pages(), 0);
        assert!(!state.loading());
        assert_eq!(
            backend.calls(),
            vec![list(9, 3), search("zzz", 9, 3), search("zzz", 9, 1)]
        );
    }

    #[tokio::test]
    async fn empty_search_on_first_page_does_not_refetch() {
        let (catalog, backend) = catalog(3);
        catalog
            .set_search_term("zzz")
            .expect("term changed")
            .await
            .expect("fetch task");

        assert_eq!(catalog.snapshot().current_page(), 1);
        assert_eq!(backend.calls(), vec![search("zzz", 9, 1)]);
    }

    #[tokio::test]
    async fn loading_spans_the_request() {
        let (catalog, backend) = catalog(20);
        let release = backend.gate(1);

        let handle = catalog.mount();
        assert!(catalog.snapshot().loading());

        release
            .send(Ok(backend.page_for(&ProductRequest::List {
                page_size: 9,
                page_number: 1,
            })))
            .expect("fetch waiting");
        handle.await.expect("fetch task");

        assert!(!catalog.snapshot().loading());
    }

    #[tokio::test]
    async fn loading_clears_after_failure() {
        let (catalog, backend) = catalog(20);
        let release = backend.gate(1);

        let handle = catalog.mount();
        assert!(catalog.snapshot().loading());

        release
            .send(ServerSnafu {
                endpoint: "fetch",
                status: 500u16,
            }
            .fail())
            .expect("fetch waiting");
        handle.await.expect("fetch task");

        let state = catalog.snapshot();
        assert!(!state.loading());
        assert_eq!(state.error(), Some("Failed to fetch products"));
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_page() {
        let (catalog, backend) = catalog(20);
        catalog.mount().await.expect("fetch task");
        let before = catalog.snapshot();

        backend.fail_fetch.store(true, Ordering::SeqCst);
        catalog
            .set_current_page(2)
            .expect("page changed")
            .await
            .expect("fetch task");

        let after = catalog.snapshot();
        assert_eq!(after.error(), Some("Failed to fetch products"));
        assert_eq!(after.products(), before.products());
        assert_eq!(after.total_pages(), 3);
        assert!(!after.loading());
    }

    #[tokio::test]
    async fn next_successful_fetch_clears_error() {
        let (catalog, backend) = catalog(20);
        backend.fail_fetch.store(true, Ordering::SeqCst);
        catalog.mount().await.expect("fetch task");
        assert!(catalog.snapshot().error().is_some());

        backend.fail_fetch.store(false, Ordering::SeqCst);
        catalog
            .set_current_page(2)
            .expect("page changed")
            .await
            .expect("fetch task");
        assert_eq!(catalog.snapshot().error(), None);
    }

    #[tokio::test]
    async fn late_response_for_old_page_is_discarded() {
        let (catalog, backend) = catalog(20);
        let release_first = backend.gate(1);
        let release_second = backend.gate(2);

        let first = catalog.mount();
        let second = catalog.set_current_page(2).expect("page changed");

        let page_two = backend.page_for(&ProductRequest::List {
            page_size: 9,
            page_number: 2,
        });
        release_second.send(Ok(page_two.clone())).expect("fetch waiting");
        second.await.expect("fetch task");

        // Page 1 is still pending but no longer holds the loading flag
        let state = catalog.snapshot();
        assert_eq!(state.products(), page_two.items.as_slice());
        assert!(!state.loading());

        let page_one = backend.page_for(&ProductRequest::List {
            page_size: 9,
            page_number: 1,
        });
        release_first.send(Ok(page_one)).expect("fetch waiting");
        first.await.expect("fetch task");

        let state = catalog.snapshot();
        assert_eq!(state.current_page(), 2);
        assert_eq!(state.products(), page_two.items.as_slice());
        assert!(!state.loading());
    }

    #[tokio::test]
    async fn superseded_fetch_emits_nothing_when_it_lands() {
        let (catalog, backend) = catalog(20);
        let release_first = backend.gate(1);
        let events = catalog.subscribe();

        let first = catalog.mount();
        catalog
            .set_current_page(2)
            .expect("page changed")
            .await
            .expect("fetch task");

        let received: Vec<CatalogEvent> = events.try_iter().collect();
        assert_eq!(
            received.last(),
            Some(&CatalogEvent::LoadingChanged { loading: false })
        );
        assert!(received.contains(&CatalogEvent::PageLoaded {
            page_number: 2,
            item_count: 9,
            total_pages: 3,
        }));

        let page_one = backend.page_for(&ProductRequest::List {
            page_size: 9,
            page_number: 1,
        });
        release_first.send(Ok(page_one)).expect("fetch waiting");
        first.await.expect("fetch task");

        assert_eq!(events.try_iter().count(), 0);
        assert!(!catalog.snapshot().loading());
    }

    #[tokio::test]
    async fn page_reset_keeps_loading_until_refetch_settles() {
        let (catalog, backend) = catalog(30);
        catalog
            .set_current_page(3)
            .expect("page changed")
            .await
            .expect("fetch task");
        let events = catalog.subscribe();

        catalog
            .set_search_term("zzz")
            .expect("term changed")
            .await
            .expect("fetch task");

        let loading: Vec<bool> = events
            .try_iter()
            .filter_map(|event| match event {
                CatalogEvent::LoadingChanged { loading } => Some(loading),
                _ => None,
            })
            .collect();
        assert_eq!(loading, vec![true, false]);
        assert_eq!(backend.calls().len(), 3);
    }

    #[tokio::test]
    async fn late_failure_for_old_page_is_discarded() {
        let (catalog, backend) = catalog(20);
        let release_first = backend.gate(1);

        let first = catalog.mount();
        catalog
            .set_current_page(2)
            .expect("page changed")
            .await
            .expect("fetch task");

        release_first
            .send(ServerSnafu {
                endpoint: "fetch",
                status: 500u16,
            }
            .fail())
            .expect("fetch waiting");
        first.await.expect("fetch task");

        assert_eq!(catalog.snapshot().error(), None);
    }

    #[tokio::test]
    async fn same_query_twice_is_idempotent() {
        let (catalog, _backend) = catalog(20);
        catalog.mount().await.expect("fetch task");
        let first = catalog.snapshot();

        catalog
            .set_search_term("Product 1")
            .expect("term changed")
            .await
            .expect("fetch task");
        catalog
            .set_search_term("")
            .expect("term changed")
            .await
            .expect("fetch task");

        assert_eq!(catalog.snapshot(), first);
    }

    #[tokio::test]
    async fn add_product_posts_then_refetches_once() {
        let (catalog, backend) = catalog(20);
        catalog.mount().await.expect("fetch task");

        catalog.add_product(&draft("A")).await;

        assert_eq!(
            backend.calls(),
            vec![list(9, 1), Call::Create(draft("A")), list(9, 1)]
        );
        assert_eq!(catalog.snapshot().error(), None);
    }

    #[tokio::test]
    async fn update_and_delete_refetch_current_query() {
        let (catalog, backend) = catalog(20);
        catalog
            .set_search_term("Product")
            .expect("term changed")
            .await
            .expect("fetch task");

        let id = ProductId::Number(4);
        catalog.update_product(&id, &draft("Renamed")).await;
        catalog.delete_product(&id).await;

        assert_eq!(
            backend.calls(),
            vec![
                search("Product", 9, 1),
                Call::Update(id.clone(), draft("Renamed")),
                search("Product", 9, 1),
                Call::Delete(id),
                search("Product", 9, 1),
            ]
        );
    }

    #[tokio::test]
    async fn failed_mutation_sets_error_and_still_refetches() {
        let (catalog, backend) = catalog(20);
        catalog.mount().await.expect("fetch task");
        backend.fail_mutations.store(true, Ordering::SeqCst);

        catalog.delete_product(&ProductId::Number(1)).await;

        let state = catalog.snapshot();
        assert_eq!(state.error(), Some("Failed to delete product"));
        assert!(!state.loading());
        assert_eq!(
            backend.calls(),
            vec![list(9, 1), Call::Delete(ProductId::Number(1)), list(9, 1)]
        );
    }

    #[tokio::test]
    async fn failed_add_and_update_report_their_own_messages() {
        let (catalog, backend) = catalog(2);
        backend.fail_mutations.store(true, Ordering::SeqCst);

        catalog.add_product(&draft("A")).await;
        assert_eq!(catalog.snapshot().error(), Some("Failed to add product"));

        catalog.update_product(&ProductId::Number(1), &draft("A")).await;
        assert_eq!(catalog.snapshot().error(), Some("Failed to update product"));
    }

    #[tokio::test]
    async fn invalid_form_is_not_submitted() {
        let (catalog, backend) = catalog(2);
        let mut form = ProductForm::new();
        form.set(Field::Name, "A");

        let errors = catalog.submit(&form, None).await.expect_err("invalid");
        assert_eq!(errors.get(Field::Name), None);
        assert!(errors.get(Field::Price).is_some());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn valid_form_submits_update_when_editing() {
        let (catalog, backend) = catalog(2);
        let form = ProductForm {
            name: "A".into(),
            description: "B".into(),
            price: "10".into(),
            stock: "5".into(),
        };
        let id = ProductId::Text("sku-1".into());

        catalog.submit(&form, Some(&id)).await.expect("valid");

        assert_eq!(
            backend.calls(),
            vec![Call::Update(id, draft("A")), list(9, 1)]
        );
    }

    #[tokio::test]
    async fn subscribers_see_fetch_lifecycle() {
        let (catalog, _backend) = catalog(20);
        let events = catalog.subscribe();

        catalog.mount().await.expect("fetch task");

        let received: Vec<CatalogEvent> = events.try_iter().collect();
        assert_eq!(
            received,
            vec![
                CatalogEvent::LoadingChanged { loading: true },
                CatalogEvent::PageLoaded {
                    page_number: 1,
                    item_count: 9,
                    total_pages: 3,
                },
                CatalogEvent::LoadingChanged { loading: false },
            ]
        );
    }

    #[tokio::test]
    async fn dropped_subscribers_are_pruned() {
        let (catalog, _backend) = catalog(20);
        drop(catalog.subscribe());
        let live = catalog.subscribe();

        catalog.mount().await.expect("fetch task");

        assert_eq!(catalog.shared.subscribers.lock().len(), 1);
        assert!(live.try_iter().count() > 0);
    }
}
