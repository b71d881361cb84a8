//! One display area and its fetch/render cycle.
//!
//! A view moves `Idle → Loading → {Rendered | Empty | Error}` and goes back to
//! `Loading` on every refresh. Each refresh hands out a [`Ticket`]; only the
//! newest ticket may change what is shown, so an older fetch that finishes
//! late is dropped.

use crate::client::NoticeClient;
use crate::error::NoticeError;
use crate::render::{self, Layout, Region};
use crate::structures::Notice;

pub const LOADING: &str = "Loading notices…";
pub const NO_NOTICES_YET: &str = "No notices yet.";
pub const NO_NOTICES_FOUND: &str = "No notices found.";
pub const FAILED_TO_LOAD: &str = "Failed to load notices";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    /// Latest notice plus a count.
    Home,
    Notices,
    Admin,
}

impl ViewKind {
    fn layout(self) -> Layout {
        match self {
            ViewKind::Home => Layout::Summary,
            ViewKind::Notices => Layout::Grid,
            ViewKind::Admin => Layout::Admin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    Loading,
    Rendered { count: usize },
    Empty,
    Error(String),
}

impl ViewState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ViewState::Idle | ViewState::Loading)
    }
}

/// Filters for the full notices view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub category: Option<String>,
    pub search: Option<String>,
}

impl Query {
    pub fn is_filtered(&self) -> bool {
        let set = |v: &Option<String>| v.as_deref().map_or(false, |s| !s.trim().is_empty());
        set(&self.category) || set(&self.search)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone)]
pub struct View {
    kind: ViewKind,
    state: ViewState,
    region: Region,
    query: Query,
    generation: u64,
    total: Option<usize>,
}

impl View {
    pub fn new(kind: ViewKind) -> Self {
        View {
            kind,
            state: ViewState::Idle,
            region: Region::new(),
            query: Query::default(),
            generation: 0,
            total: None,
        }
    }

    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn html(&self) -> &str {
        self.region.html()
    }

    /// Number of notices the last successful fetch returned. Shown on the home view.
    pub fn total(&self) -> Option<usize> {
        self.total
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Only the notices view is filtered; other views ignore the query.
    pub fn set_query(&mut self, query: Query) {
        if self.kind == ViewKind::Notices {
            self.query = query;
        }
    }

    pub fn begin(&mut self) -> Ticket {
        self.generation += 1;
        self.state = ViewState::Loading;
        render::render_message(LOADING, &mut self.region);
        Ticket(self.generation)
    }

    /// Show `outcome` if `ticket` is still the newest. Returns whether it was shown.
    pub fn apply(&mut self, ticket: Ticket, outcome: Result<Vec<Notice>, NoticeError>) -> bool {
        if ticket.0 != self.generation {
            log::debug!(
                "Dropping stale {:?} fetch #{} (current #{})",
                self.kind,
                ticket.0,
                self.generation
            );
            return false;
        }
        match outcome {
            Ok(notices) => {
                self.total = Some(notices.len());
                let shown = match self.kind {
                    ViewKind::Home => &notices[..notices.len().min(1)],
                    _ => &notices[..],
                };
                render::render_list(shown, self.kind.layout(), self.placeholder(), &mut self.region);
                self.state = if notices.is_empty() {
                    ViewState::Empty
                } else {
                    ViewState::Rendered {
                        count: notices.len(),
                    }
                };
            }
            Err(e) => {
                let text = e.user_message(FAILED_TO_LOAD);
                render::render_message(&text, &mut self.region);
                self.state = ViewState::Error(text);
            }
        }
        true
    }

    pub async fn refresh(&mut self, client: &NoticeClient) -> &ViewState {
        let ticket = self.begin();
        let outcome = client
            .fetch_notices(self.query.category.as_deref(), self.query.search.as_deref())
            .await;
        self.apply(ticket, outcome);
        &self.state
    }

    fn placeholder(&self) -> &'static str {
        if self.kind == ViewKind::Notices && self.query.is_filtered() {
            NO_NOTICES_FOUND
        } else {
            NO_NOTICES_YET
        }
    }
}
