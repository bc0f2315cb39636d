use std::sync::Arc;

use crate::hooks::{QueryParams, QueryState, TableQuery, UseQuery};
use crate::review::{Application, ApplicationKind, ApplicationStatus, ReviewResult, set_status};
use crate::store::{Order, Paged, Remote};

/// Paged list of one kind's applications that refreshes after each decision.
pub struct ReviewQueue {
    kind: ApplicationKind,
    hook: UseQuery<TableQuery<Application>>,
}

impl ReviewQueue {
    pub fn new(remote: Arc<dyn Remote>, kind: ApplicationKind, params: QueryParams) -> Self {
        let query = TableQuery::new(kind.source_table())
            .search(kind.search_columns())
            .order(Order::desc("created_at"));
        Self {
            kind,
            hook: UseQuery::new(remote, query, params),
        }
    }

    pub fn kind(&self) -> ApplicationKind {
        self.kind
    }

    pub fn hook(&self) -> &UseQuery<TableQuery<Application>> {
        &self.hook
    }

    pub async fn settled(&self) -> QueryState<Paged<Application>> {
        self.hook.settled().await
    }

    pub async fn approve(&self, id: &str) -> ReviewResult<()> {
        self.transition(id, ApplicationStatus::Approved).await
    }

    pub async fn reject(&self, id: &str) -> ReviewResult<()> {
        self.transition(id, ApplicationStatus::Rejected).await
    }

    /// Apply one decision and refetch the list.
    pub async fn transition(&self, id: &str, status: ApplicationStatus) -> ReviewResult<()> {
        set_status(self.hook.remote().as_ref(), self.kind, id, status).await?;
        self.hook.refetch().await;
        Ok(())
    }
}
