//! Paginated data-fetching hook.
//!
//! [`UseQuery`] owns the current [`QueryParams`] and a [`QueryState`] snapshot.
//! Every parameter change that differs by value dispatches a fetch as a tokio
//! task. Each dispatch gets a new request id and aborts the previous in-flight
//! task; a completion whose id is no longer the latest is dropped, so the state
//! always reflects the most recent parameters.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::hooks::{DebouncedSearch, FilterSet, FilterValue, Pagination};
use crate::store::{Order, Paged, Remote, Select, StoreError, StoreResult};

/// What a screen asks for: page, search term and filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pub pagination: Pagination,
    pub search: String,
    pub filters: FilterSet,
}

impl QueryParams {
    pub fn new(pagination: Pagination) -> Self {
        Self {
            pagination,
            ..Default::default()
        }
    }

    /// Apply one filter and go back to the first page.
    pub fn apply_filter(&mut self, id: impl Into<String>, value: Option<FilterValue>) {
        self.filters.apply(id, value);
        self.pagination = self.pagination.with_page(1);
    }

    /// Remove one filter. The page is kept.
    pub fn clear_filter(&mut self, id: &str) {
        self.filters.remove(id);
    }

    pub fn clear_all_filters(&mut self) {
        self.filters.clear();
        self.pagination = self.pagination.with_page(1);
    }

    /// Replace the search term; a different term goes back to the first page.
    pub fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term != self.search {
            self.search = term;
            self.pagination = self.pagination.with_page(1);
        }
    }
}

/// Snapshot of a hook's data.
#[derive(Debug, Clone)]
pub struct QueryState<T> {
    /// Last successful result. Kept while a newer request is loading.
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<Arc<StoreError>>,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

/// The query contract a hook runs.
#[async_trait]
pub trait Fetch: Send + Sync + 'static {
    type Output: Clone + Send + Sync + 'static;

    async fn fetch(&self, remote: &dyn Remote, params: &QueryParams) -> StoreResult<Self::Output>;
}

/// Paged read of one table with a fixed set of searchable columns.
pub struct TableQuery<T> {
    table: String,
    columns: String,
    search_columns: Vec<String>,
    order: Vec<Order>,
    _row: PhantomData<fn() -> T>,
}

impl<T> TableQuery<T> {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: "*".to_string(),
            search_columns: Vec::new(),
            order: Vec::new(),
            _row: PhantomData,
        }
    }

    pub fn columns(mut self, columns: impl Into<String>) -> Self {
        self.columns = columns.into();
        self
    }

    pub fn search(mut self, columns: &[&str]) -> Self {
        self.search_columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order.push(order);
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// The select for one page of `params`.
    pub fn build(&self, params: &QueryParams) -> Select {
        let (from, to) = params.pagination.range();
        let columns: Vec<&str> = self.search_columns.iter().map(String::as_str).collect();
        let mut query = Select::table(self.table.as_str())
            .columns(self.columns.as_str())
            .exact_count()
            .ilike_any(&columns, &params.search);
        query = params.filters.apply_to(query);
        for order in &self.order {
            query = query.order(order.clone());
        }
        query.range(from, to)
    }
}

#[async_trait]
impl<T> Fetch for TableQuery<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    type Output = Paged<T>;

    async fn fetch(&self, remote: &dyn Remote, params: &QueryParams) -> StoreResult<Paged<T>> {
        let selection = remote.query().select(&self.build(params)).await?;
        let count = selection.count.unwrap_or(selection.rows.len());
        Ok(Paged {
            rows: selection.decode()?,
            count,
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Inner<F: Fetch> {
    remote: Arc<dyn Remote>,
    fetcher: F,
    params: Mutex<QueryParams>,
    state: watch::Sender<QueryState<F::Output>>,
    latest: AtomicU64,
    in_flight: Mutex<Option<AbortHandle>>,
    shutdown: CancellationToken,
}

impl<F: Fetch> Inner<F> {
    /// Ids are issued under the `in_flight` lock so the task stored last is
    /// always the one carrying the latest id.
    fn dispatch(self: &Arc<Self>) -> u64 {
        let mut in_flight = lock(&self.in_flight);
        let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let params = lock(&self.params).clone();
        debug!(
            request = id,
            page = params.pagination.page(),
            search = %params.search,
            filters = params.filters.count(),
            "dispatching fetch"
        );
        self.state.send_modify(|state| state.loading = true);

        if let Some(previous) = in_flight.take() {
            previous.abort();
        }
        let inner = Arc::clone(self);
        let task = tokio::spawn(async move {
            let result = inner.fetcher.fetch(inner.remote.as_ref(), &params).await;
            inner.complete(id, result);
        });
        *in_flight = Some(task.abort_handle());
        id
    }

    fn complete(&self, id: u64, result: StoreResult<F::Output>) {
        let applied = self.state.send_if_modified(|state| {
            if self.latest.load(Ordering::SeqCst) != id {
                return false;
            }
            match result {
                Ok(data) => {
                    state.data = Some(data);
                    state.error = None;
                }
                Err(err) => {
                    state.data = None;
                    state.error = Some(Arc::new(err));
                }
            }
            state.loading = false;
            true
        });
        if !applied {
            debug!(request = id, "discarding stale response");
        }
    }

    fn update(self: &Arc<Self>, change: impl FnOnce(&mut QueryParams)) -> bool {
        let mut next = lock(&self.params).clone();
        change(&mut next);
        self.set_params(next)
    }

    fn set_params(self: &Arc<Self>, next: QueryParams) -> bool {
        {
            let mut current = lock(&self.params);
            if *current == next {
                return false;
            }
            *current = next;
        }
        self.dispatch();
        true
    }
}

/// A live query bound to one [`Fetch`] implementation.
///
/// Must be created inside a tokio runtime. Dropping the hook aborts its
/// in-flight fetch and any search binding.
pub struct UseQuery<F: Fetch> {
    inner: Arc<Inner<F>>,
}

impl<F: Fetch> UseQuery<F> {
    /// Create the hook and dispatch the initial fetch.
    pub fn new(remote: Arc<dyn Remote>, fetcher: F, params: QueryParams) -> Self {
        let (state, _) = watch::channel(QueryState::default());
        let inner = Arc::new(Inner {
            remote,
            fetcher,
            params: Mutex::new(params),
            state,
            latest: AtomicU64::new(0),
            in_flight: Mutex::new(None),
            shutdown: CancellationToken::new(),
        });
        inner.dispatch();
        Self { inner }
    }

    pub fn remote(&self) -> &Arc<dyn Remote> {
        &self.inner.remote
    }

    pub fn fetcher(&self) -> &F {
        &self.inner.fetcher
    }

    pub fn state(&self) -> QueryState<F::Output> {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState<F::Output>> {
        self.inner.state.subscribe()
    }

    pub fn params(&self) -> QueryParams {
        lock(&self.inner.params).clone()
    }

    /// Replace the parameters. Returns whether a fetch was dispatched.
    pub fn set_params(&self, params: QueryParams) -> bool {
        self.inner.set_params(params)
    }

    pub fn set_page(&self, page: usize) -> bool {
        self.inner
            .update(|p| p.pagination = p.pagination.with_page(page))
    }

    pub fn set_page_size(&self, page_size: usize) -> bool {
        self.inner
            .update(|p| p.pagination = p.pagination.with_page_size(page_size))
    }

    pub fn set_search(&self, term: impl Into<String>) -> bool {
        let term = term.into();
        self.inner.update(|p| p.set_search(term))
    }

    pub fn apply_filter(&self, id: impl Into<String>, value: Option<FilterValue>) -> bool {
        let id = id.into();
        self.inner.update(|p| p.apply_filter(id, value))
    }

    pub fn clear_filter(&self, id: &str) -> bool {
        self.inner.update(|p| p.clear_filter(id))
    }

    pub fn clear_all_filters(&self) -> bool {
        self.inner.update(|p| p.clear_all_filters())
    }

    /// Re-run the query with the current parameters and wait for the result.
    pub async fn refetch(&self) -> QueryState<F::Output> {
        self.inner.dispatch();
        self.settled().await
    }

    /// Wait until no request is loading.
    pub async fn settled(&self) -> QueryState<F::Output> {
        let mut rx = self.inner.state.subscribe();
        match rx.wait_for(|state| !state.loading).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }

    /// Run one write and refetch when it succeeds.
    pub async fn after_write<T, W>(&self, write: W) -> StoreResult<T>
    where
        W: Future<Output = StoreResult<T>>,
    {
        let value = write.await?;
        self.refetch().await;
        Ok(value)
    }

    /// Forward every committed term of `search` into this hook.
    pub fn bind_search(&self, search: &DebouncedSearch) {
        let weak: Weak<Inner<F>> = Arc::downgrade(&self.inner);
        let shutdown = self.inner.shutdown.clone();
        let mut committed = search.subscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => return,
                    changed = committed.changed() => {
                        if changed.is_err() {
                            return;
                        }
                    }
                }
                let term = committed.borrow_and_update().clone();
                match weak.upgrade() {
                    Some(inner) => {
                        inner.update(|p| p.set_search(term));
                    }
                    None => return,
                }
            }
        });
    }
}

impl<F: Fetch> Drop for UseQuery<F> {
    fn drop(&mut self) {
        self.inner.shutdown.cancel();
        if let Some(task) = lock(&self.inner.in_flight).take() {
            task.abort();
        }
    }
}

#[cfg(test)]
#[path = "use_query_test.rs"]
mod use_query_test;
