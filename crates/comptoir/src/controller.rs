//! The list screen controller.
//!
//! A [`ListScreen`] owns the last fetched collection, the user's
//! [`ListingState`] and the selection, and derives the visible page from
//! them on demand. It moves through these phases:
//!
//! ```text
//! Idle ──begin_fetch──▶ Loading ──ok──▶ Ready ◀──────────────┐
//!                          │              │                  │
//!                          └──err──▶ LoadFailed    begin_delete/update
//!                                                            │
//!                                         Ready ──▶ Mutating ┘
//! ```
//!
//! Every fetch and mutation is split in two: `begin_*` hands out a ticket
//! and `complete_*` applies the outcome. Only the completion carrying the
//! most recently issued fetch ticket is applied; older ones are discarded.
//! The `async` helpers ([`ListScreen::load`], [`ListScreen::resolve_delete`],
//! [`ListScreen::update`]) chain both halves around a [`DataSource`] call.

use std::fmt;

use comptoir_listing::{
    render, Dir, Listable, ListingState, ListingView, QueryMatcher, SearchQuery, SelectAllScope,
    SelectionTracker,
};

use crate::confirm::{Confirm, Decision};
use crate::error::{MutationKind, Result, ScreenError, SourceError};
use crate::source::{DataSource, Scope};
use crate::view::{Body, Message, PageFooter, RowPresenter, RowView, ScreenView};

/// Lifecycle phase of a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Built, nothing fetched yet.
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The collection is loaded.
    Ready,
    /// The last fetch failed. The collection is the one from the last
    /// successful fetch, empty if there was none.
    LoadFailed,
    /// A delete or update is in flight.
    Mutating,
}

/// Issued by [`ListScreen::begin_fetch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// What happened to a fetch completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// The fetched collection replaced the previous one.
    Applied,
    /// A newer fetch was issued since; the completion was ignored.
    Stale,
}

/// Issued when a delete or update starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationTicket<Id> {
    seq: u64,
    kind: MutationKind,
    id: Id,
}

impl<Id> MutationTicket<Id> {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn kind(&self) -> MutationKind {
        self.kind
    }

    pub fn id(&self) -> &Id {
        &self.id
    }
}

/// A delete waiting for the user's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete<Id> {
    id: Id,
    question: String,
}

impl<Id> PendingDelete<Id> {
    pub fn id(&self) -> &Id {
        &self.id
    }

    /// The question to put to the user.
    pub fn question(&self) -> &str {
        &self.question
    }
}

/// Result of a confirmed or cancelled delete.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome<R> {
    /// The user declined; no request was sent.
    Cancelled,
    /// The record was deleted and dropped from the collection.
    Deleted(R),
    /// The delete succeeded but the record had already left the collection,
    /// e.g. because a fetch replaced it in the meantime.
    Gone,
}

/// State and behavior of one list screen.
#[derive(Debug)]
pub struct ListScreen<R: Listable> {
    title: String,
    noun: &'static str,
    collection: Vec<R>,
    state: ListingState,
    selection: SelectionTracker<R::Id>,
    matcher: QueryMatcher<R>,
    select_all: SelectAllScope,
    scope: Option<Scope>,
    required_scope: Option<&'static str>,
    phase: Phase,
    /// Phase to return to once the last in-flight mutation completes.
    settled: Phase,
    fetch_seq: u64,
    latest_fetch: Option<u64>,
    mutation_seq: u64,
    mutations_in_flight: usize,
    messages: Vec<Message>,
}

impl<R> ListScreen<R>
where
    R: Listable,
    R::Id: fmt::Display,
{
    /// Creates an idle screen with an empty collection.
    pub fn new(matcher: QueryMatcher<R>, state: ListingState) -> Self {
        ListScreen {
            title: String::new(),
            noun: "record",
            collection: Vec::new(),
            state,
            selection: SelectionTracker::new(),
            matcher,
            select_all: SelectAllScope::default(),
            scope: None,
            required_scope: None,
            phase: Phase::Idle,
            settled: Phase::Idle,
            fetch_seq: 0,
            latest_fetch: None,
            mutation_seq: 0,
            mutations_in_flight: 0,
            messages: Vec::new(),
        }
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Noun used in confirmation questions ("this article").
    pub fn noun(mut self, noun: &'static str) -> Self {
        self.noun = noun;
        self
    }

    pub fn select_all_scope(mut self, scope: SelectAllScope) -> Self {
        self.select_all = scope;
        self
    }

    /// Sets the identity the collection is scoped to.
    pub fn with_scope(mut self, scope: Option<Scope>) -> Self {
        self.scope = scope;
        self
    }

    /// Makes fetching fail with [`ScreenError::PreconditionMissing`] while
    /// no scope is set. `what` names the missing identity.
    pub fn requiring_scope(mut self, what: &'static str) -> Self {
        self.required_scope = Some(what);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn state(&self) -> &ListingState {
        &self.state
    }

    /// The last fetched collection, in fetch order.
    pub fn collection(&self) -> &[R] {
        &self.collection
    }

    pub fn selection(&self) -> &SelectionTracker<R::Id> {
        &self.selection
    }

    pub fn scope(&self) -> Option<&Scope> {
        self.scope.as_ref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }

    fn position(&self, id: &R::Id) -> Option<usize> {
        self.collection.iter().position(|record| record.id() == id)
    }

    fn require(&self, id: &R::Id) -> Result<usize> {
        self.position(id)
            .ok_or_else(|| ScreenError::UnknownRecord(id.to_string()))
    }

    /// Moves to `phase`, or records it as the phase to return to while
    /// mutations are in flight.
    fn settle(&mut self, phase: Phase) {
        if self.mutations_in_flight > 0 {
            self.settled = phase;
        } else {
            self.phase = phase;
        }
    }

    // ------------------------------------------------------------------
    // Fetching
    // ------------------------------------------------------------------

    /// Starts a fetch and enters [`Phase::Loading`].
    ///
    /// Any earlier ticket becomes stale.
    pub fn begin_fetch(&mut self) -> Result<FetchTicket> {
        if let (Some(what), None) = (self.required_scope, &self.scope) {
            log::warn!("{}: not fetching without a {what}", self.title);
            return Err(ScreenError::PreconditionMissing(what));
        }

        self.fetch_seq += 1;
        self.latest_fetch = Some(self.fetch_seq);
        self.settle(Phase::Loading);
        log::info!("{}: fetch #{} started", self.title, self.fetch_seq);
        Ok(FetchTicket {
            seq: self.fetch_seq,
        })
    }

    /// Applies the outcome of a fetch.
    ///
    /// On success the collection is replaced and the selection reconciled
    /// against it; the listing state is kept. On failure the screen enters
    /// [`Phase::LoadFailed`], keeps the collection and selection of the last
    /// successful fetch, and returns the error. Completions for stale
    /// tickets change nothing.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: std::result::Result<Vec<R>, SourceError>,
    ) -> Result<FetchStatus> {
        if self.latest_fetch != Some(ticket.seq) {
            log::debug!(
                "{}: discarding stale fetch #{} (latest #{})",
                self.title,
                ticket.seq,
                self.fetch_seq
            );
            return Ok(FetchStatus::Stale);
        }
        self.latest_fetch = None;

        match result {
            Ok(records) => {
                log::info!(
                    "{}: fetch #{} returned {} records",
                    self.title,
                    ticket.seq,
                    records.len()
                );
                self.collection = records;
                self.selection
                    .reconcile(self.collection.iter().map(Listable::id));
                self.settle(Phase::Ready);
                Ok(FetchStatus::Applied)
            }
            Err(err) => {
                log::error!("{}: fetch #{} failed: {err}", self.title, ticket.seq);
                self.settle(Phase::LoadFailed);
                self.messages
                    .push(Message::error(format!("Could not load {}: {err}", self.title)));
                Err(ScreenError::FetchFailure(err))
            }
        }
    }

    /// Fetches from `source` and applies the result.
    pub async fn load<S>(&mut self, source: &S) -> Result<FetchStatus>
    where
        S: DataSource<R> + ?Sized,
    {
        let ticket = self.begin_fetch()?;
        let result = source.fetch(self.scope.as_ref()).await;
        self.complete_fetch(ticket, result)
    }

    // ------------------------------------------------------------------
    // Listing state
    // ------------------------------------------------------------------

    pub fn set_sort_key(&mut self, key: impl Into<String>) {
        self.state.set_sort_key(key);
    }

    pub fn set_sort_dir(&mut self, dir: Dir) {
        self.state.set_sort_dir(dir);
    }

    /// Flips the direction of the current sort.
    pub fn toggle_sort_dir(&mut self) {
        let dir = self.state.sort().dir.flipped();
        self.state.set_sort_dir(dir);
    }

    /// Handles a click on a column header.
    ///
    /// Clicking the active column while it is ascending sorts descending;
    /// any other click sorts ascending by the clicked column.
    pub fn request_sort(&mut self, key: &str) {
        self.state.request_sort(key);
    }

    pub fn set_query(&mut self, query: impl Into<SearchQuery>) {
        self.state.set_query(query);
    }

    /// Changes the page size. Sizes outside the allowed set are rejected and
    /// leave the state unchanged.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        self.state.set_page_size(page_size).map_err(|err| {
            log::warn!("{}: {err}", self.title);
            ScreenError::from(err)
        })
    }

    pub fn set_page_index(&mut self, page_index: usize) {
        self.state.set_page_index(page_index);
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Handles the header checkbox.
    ///
    /// Which records "all" covers depends on the screen's
    /// [`SelectAllScope`].
    pub fn toggle_all(&mut self, checked: bool) {
        match self.select_all {
            SelectAllScope::Fetched => self
                .selection
                .toggle_all(checked, self.collection.iter().map(Listable::id)),
            SelectAllScope::Page => {
                let view = render(&self.collection, &self.state, &self.matcher);
                self.selection
                    .toggle_all(checked, view.rows().iter().map(|record| Listable::id(*record)));
            }
        }
    }

    /// Flips one row's checkbox. Returns whether it is now selected.
    pub fn toggle(&mut self, id: &R::Id) -> Result<bool> {
        self.require(id)?;
        Ok(self.selection.toggle(id))
    }

    pub fn is_selected(&self, id: &R::Id) -> bool {
        self.selection.is_selected(id)
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    fn begin_mutation(&mut self, kind: MutationKind, id: R::Id) -> MutationTicket<R::Id> {
        self.mutation_seq += 1;
        if self.mutations_in_flight == 0 {
            self.settled = self.phase;
            self.phase = Phase::Mutating;
        }
        self.mutations_in_flight += 1;
        log::info!("{}: {kind} of '{id}' started", self.title);
        MutationTicket {
            seq: self.mutation_seq,
            kind,
            id,
        }
    }

    fn finish_mutation(&mut self) {
        self.mutations_in_flight = self.mutations_in_flight.saturating_sub(1);
        if self.mutations_in_flight == 0 {
            self.phase = self.settled;
        }
    }

    fn mutation_failed(&mut self, ticket: MutationTicket<R::Id>, source: SourceError) -> ScreenError {
        log::warn!(
            "{}: {} of '{}' failed: {source}",
            self.title,
            ticket.kind,
            ticket.id
        );
        self.messages.push(Message::error(format!(
            "Could not {} {} '{}': {source}",
            ticket.kind, self.noun, ticket.id
        )));
        ScreenError::MutationFailure {
            action: ticket.kind,
            id: ticket.id.to_string(),
            source,
        }
    }

    /// First step of a delete: checks the record exists and returns the
    /// question to ask.
    pub fn request_delete(&self, id: &R::Id) -> Result<PendingDelete<R::Id>> {
        self.require(id)?;
        Ok(PendingDelete {
            id: id.clone(),
            question: format!("Are you sure you want to delete this {}?", self.noun),
        })
    }

    /// Second step: acts on the user's decision. Returns a ticket when the
    /// delete request should be sent.
    pub fn begin_delete(
        &mut self,
        pending: PendingDelete<R::Id>,
        decision: Decision,
    ) -> Option<MutationTicket<R::Id>> {
        if !decision.is_proceed() {
            log::info!("{}: delete of '{}' cancelled", self.title, pending.id);
            return None;
        }
        Some(self.begin_mutation(MutationKind::Delete, pending.id))
    }

    /// Applies the outcome of a delete request.
    ///
    /// On success the record leaves the collection and the selection in the
    /// same step. On failure nothing changes.
    pub fn complete_delete(
        &mut self,
        ticket: MutationTicket<R::Id>,
        result: std::result::Result<(), SourceError>,
    ) -> Result<DeleteOutcome<R>> {
        self.finish_mutation();
        if let Err(source) = result {
            return Err(self.mutation_failed(ticket, source));
        }

        let Some(position) = self.position(&ticket.id) else {
            log::debug!("{}: deleted '{}' was no longer listed", self.title, ticket.id);
            self.selection.remove(&ticket.id);
            return Ok(DeleteOutcome::Gone);
        };
        let removed = self.collection.remove(position);
        self.selection.remove(&ticket.id);
        self.selection
            .reconcile(self.collection.iter().map(Listable::id));
        log::info!("{}: deleted '{}'", self.title, ticket.id);
        self.messages.push(Message::success(format!(
            "Deleted {} '{}'",
            self.noun, ticket.id
        )));
        Ok(DeleteOutcome::Deleted(removed))
    }

    /// Runs the second step of a delete and, if confirmed, sends it to
    /// `source`.
    pub async fn resolve_delete<S>(
        &mut self,
        pending: PendingDelete<R::Id>,
        decision: Decision,
        source: &S,
    ) -> Result<DeleteOutcome<R>>
    where
        S: DataSource<R> + ?Sized,
    {
        let Some(ticket) = self.begin_delete(pending, decision) else {
            return Ok(DeleteOutcome::Cancelled);
        };
        let result = source.delete(ticket.id()).await;
        self.complete_delete(ticket, result)
    }

    /// The whole delete protocol with `confirm` answering the question.
    pub async fn delete_with<S, C>(
        &mut self,
        id: &R::Id,
        confirm: &C,
        source: &S,
    ) -> Result<DeleteOutcome<R>>
    where
        S: DataSource<R> + ?Sized,
        C: Confirm + ?Sized,
    {
        let pending = self.request_delete(id)?;
        let decision = confirm.confirm(pending.question())?;
        self.resolve_delete(pending, decision, source).await
    }

    /// Starts an update of a listed record.
    pub fn begin_update(&mut self, id: &R::Id) -> Result<MutationTicket<R::Id>> {
        self.require(id)?;
        Ok(self.begin_mutation(MutationKind::Update, id.clone()))
    }

    /// Applies the outcome of an update request. On success the stored
    /// record replaces the listed one in place; returns `false` when it is no
    /// longer listed.
    pub fn complete_update(
        &mut self,
        ticket: MutationTicket<R::Id>,
        result: std::result::Result<R, SourceError>,
    ) -> Result<bool> {
        self.finish_mutation();
        let record = match result {
            Ok(record) => record,
            Err(source) => return Err(self.mutation_failed(ticket, source)),
        };

        let Some(position) = self.position(&ticket.id) else {
            log::debug!("{}: updated '{}' was no longer listed", self.title, ticket.id);
            return Ok(false);
        };
        self.collection[position] = record;
        log::info!("{}: updated '{}'", self.title, ticket.id);
        self.messages.push(Message::success(format!(
            "Updated {} '{}'",
            self.noun, ticket.id
        )));
        Ok(true)
    }

    /// Sends `patch` for one record to `source` and applies the result.
    pub async fn update<S>(
        &mut self,
        id: &R::Id,
        patch: &serde_json::Value,
        source: &S,
    ) -> Result<bool>
    where
        S: DataSource<R> + ?Sized,
    {
        let ticket = self.begin_update(id)?;
        let result = source.update(ticket.id(), patch).await;
        self.complete_update(ticket, result)
    }

    // ------------------------------------------------------------------
    // Derived view
    // ------------------------------------------------------------------

    /// Sorted, filtered and paged view of the collection.
    pub fn listing(&self) -> ListingView<'_, R> {
        render(&self.collection, &self.state, &self.matcher)
    }

    /// Snapshot of the screen for rendering.
    pub fn view<P>(&self, presenter: &P) -> ScreenView
    where
        P: RowPresenter<R> + ?Sized,
    {
        let listing = self.listing();
        let body = if self.is_loading() {
            Body::Loading
        } else if listing.is_empty_result() {
            Body::NotFound
        } else {
            Body::Rows
        };

        let rows = match body {
            Body::Rows => listing
                .rows()
                .iter()
                .map(|record| RowView {
                    id: record.id().to_string(),
                    cells: presenter.cells(record),
                    selected: self.selection.is_selected(record.id()),
                    tone: presenter.tone(record),
                })
                .collect(),
            Body::Loading | Body::NotFound => Vec::new(),
        };

        ScreenView {
            title: self.title.clone(),
            headers: ScreenView::headers_for(presenter.columns(), self.state.sort()),
            body,
            rows,
            filler_rows: listing.filler_rows(),
            sort: self.state.sort().clone(),
            query: self.state.query().as_str().to_string(),
            selected: self.selection.len(),
            footer: PageFooter::new(
                self.state.page_index(),
                self.state.page_size(),
                self.state.page_sizes().as_slice(),
                listing.total_filtered(),
                self.collection.len(),
            ),
            messages: self.messages.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comptoir_listing::{Number, Value};

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: String,
        n: i64,
    }

    impl Listable for Row {
        type Id = String;

        fn id(&self) -> &String {
            &self.id
        }

        fn field(&self, name: &str) -> Value<'_> {
            match name {
                "n" => Value::Number(Number::I64(self.n)),
                _ => Value::None,
            }
        }
    }

    fn rows(n: i64) -> Vec<Row> {
        (1..=n)
            .map(|i| Row {
                id: format!("r{i}"),
                n: i,
            })
            .collect()
    }

    fn screen() -> ListScreen<Row> {
        ListScreen::new(QueryMatcher::new(), ListingState::with_sort_key("n")).titled("Rows")
    }

    #[test]
    fn starts_idle() {
        let screen = screen();
        assert_eq!(screen.phase(), Phase::Idle);
        assert!(screen.collection().is_empty());
    }

    #[test]
    fn fetch_round_trip() {
        let mut screen = screen();
        let ticket = screen.begin_fetch().unwrap();
        assert!(screen.is_loading());
        assert_eq!(screen.complete_fetch(ticket, Ok(rows(3))).unwrap(), FetchStatus::Applied);
        assert_eq!(screen.phase(), Phase::Ready);
        assert_eq!(screen.collection().len(), 3);
    }

    #[test]
    fn only_latest_fetch_applies() {
        let mut screen = screen();
        let first = screen.begin_fetch().unwrap();
        let second = screen.begin_fetch().unwrap();

        assert_eq!(screen.complete_fetch(second, Ok(rows(2))).unwrap(), FetchStatus::Applied);
        assert_eq!(screen.complete_fetch(first, Ok(rows(9))).unwrap(), FetchStatus::Stale);
        assert_eq!(screen.collection().len(), 2);
    }

    #[test]
    fn completion_is_applied_once() {
        let mut screen = screen();
        let ticket = screen.begin_fetch().unwrap();
        screen.complete_fetch(ticket, Ok(rows(2))).unwrap();
        assert_eq!(screen.complete_fetch(ticket, Ok(rows(5))).unwrap(), FetchStatus::Stale);
        assert_eq!(screen.collection().len(), 2);
    }

    #[test]
    fn fetch_during_mutation_settles_after_it() {
        let mut screen = screen();
        let ticket = screen.begin_fetch().unwrap();
        screen.complete_fetch(ticket, Ok(rows(3))).unwrap();

        let update = screen.begin_update(&"r1".to_string()).unwrap();
        let fetch = screen.begin_fetch().unwrap();
        assert_eq!(screen.phase(), Phase::Mutating);
        screen.complete_fetch(fetch, Ok(rows(3))).unwrap();
        assert_eq!(screen.phase(), Phase::Mutating);

        screen
            .complete_update(update, Ok(Row { id: "r1".into(), n: 10 }))
            .unwrap();
        assert_eq!(screen.phase(), Phase::Ready);
        assert_eq!(screen.collection()[0].n, 10);
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let mut screen = screen();
        let ticket = screen.begin_fetch().unwrap();
        screen.complete_fetch(ticket, Ok(rows(1))).unwrap();

        let missing = "zz".to_string();
        assert!(matches!(screen.toggle(&missing), Err(ScreenError::UnknownRecord(_))));
        assert!(matches!(screen.request_delete(&missing), Err(ScreenError::UnknownRecord(_))));
        assert!(matches!(screen.begin_update(&missing), Err(ScreenError::UnknownRecord(_))));
        assert_eq!(screen.phase(), Phase::Ready);
    }
}
