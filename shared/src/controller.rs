//! Filter state for the rankings panel.
//!
//! The controller owns `{job, search, page}` and turns user intents into
//! filter commits. Each commit notifies subscribers (who refetch) and opens a
//! short cosmetic transition window. The host owns the clock: it schedules
//! [`RankingQueryController::finish_transition`] once [`TRANSITION_DEBOUNCE`]
//! has elapsed for the returned [`Transition`].

use std::fmt;
use std::time::Duration;

use crate::rankings::{FilterPatch, RankingFilters};

/// How long the transition flag stays up after a commit.
pub const TRANSITION_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionTicket(u64);

/// Handed back for every committed change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub ticket: TransitionTicket,
    pub filters: RankingFilters,
    pub clear_after: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPhase {
    #[default]
    Idle,
    Transitioning(TransitionTicket),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&RankingFilters) + Send + Sync>;

pub struct RankingQueryController {
    filters: RankingFilters,
    search_input: String,
    phase: TransitionPhase,
    next_ticket: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl Default for RankingQueryController {
    fn default() -> Self {
        Self::new(RankingFilters::default())
    }
}

impl fmt::Debug for RankingQueryController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RankingQueryController")
            .field("filters", &self.filters)
            .field("search_input", &self.search_input)
            .field("phase", &self.phase)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl RankingQueryController {
    pub fn new(filters: RankingFilters) -> Self {
        Self {
            filters,
            search_input: String::new(),
            phase: TransitionPhase::Idle,
            next_ticket: 0,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn filters(&self) -> &RankingFilters {
        &self.filters
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, TransitionPhase::Transitioning(_))
    }

    /// Register a listener called with the new filters after every commit.
    pub fn subscribe(&mut self, listener: impl FnMut(&RankingFilters) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn set_job_filter(&mut self, job: impl Into<String>) -> Option<Transition> {
        let job = job.into();
        if job == self.filters.job {
            return None;
        }
        Some(self.commit(FilterPatch {
            job: Some(job),
            page: Some(1),
            ..FilterPatch::default()
        }))
    }

    /// Commit a trimmed search term. Repeating the committed term is a no-op.
    pub fn set_search(&mut self, term: &str) -> Option<Transition> {
        let trimmed = term.trim();
        if trimmed == self.filters.search {
            return None;
        }
        Some(self.commit(FilterPatch {
            search: Some(trimmed.to_string()),
            page: Some(1),
            ..FilterPatch::default()
        }))
    }

    /// Update the uncommitted search box contents.
    pub fn set_search_input(&mut self, text: impl Into<String>) {
        self.search_input = text.into();
    }

    pub fn submit_search(&mut self) -> Option<Transition> {
        let input = std::mem::take(&mut self.search_input);
        let transition = self.set_search(&input);
        self.search_input = input;
        transition
    }

    /// Empty the search box and commit an empty search, even if already empty.
    pub fn clear_search(&mut self) -> Transition {
        self.search_input.clear();
        self.commit(FilterPatch {
            search: Some(String::new()),
            page: Some(1),
            ..FilterPatch::default()
        })
    }

    /// Move to page `page` keeping job and search. Page 0 is rejected.
    pub fn set_page(&mut self, page: u32) -> Option<Transition> {
        if page == 0 {
            return None;
        }
        Some(self.commit(FilterPatch {
            page: Some(page),
            ..FilterPatch::default()
        }))
    }

    /// Close the transition window. Any timer from the current or an earlier
    /// commit ends it; a ticket issued later than the current one is ignored.
    pub fn finish_transition(&mut self, ticket: TransitionTicket) -> bool {
        match self.phase {
            TransitionPhase::Transitioning(current) if ticket.0 <= current.0 => {
                self.phase = TransitionPhase::Idle;
                true
            }
            _ => false,
        }
    }

    fn commit(&mut self, patch: FilterPatch) -> Transition {
        self.filters = self.filters.merge(patch);

        let ticket = TransitionTicket(self.next_ticket);
        self.next_ticket += 1;
        self.phase = TransitionPhase::Transitioning(ticket);

        for (_, listener) in &mut self.listeners {
            listener(&self.filters);
        }

        Transition {
            ticket,
            filters: self.filters.clone(),
            clear_after: TRANSITION_DEBOUNCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn recording() -> (RankingQueryController, Arc<Mutex<Vec<RankingFilters>>>) {
        let mut controller = RankingQueryController::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        controller.subscribe(move |filters| sink.lock().expect("listener lock").push(filters.clone()));
        (controller, seen)
    }

    #[test]
    fn same_job_is_a_no_op() {
        let (mut controller, seen) = recording();
        assert!(controller.set_job_filter("all").is_none());
        assert!(!controller.is_transitioning());
        assert!(seen.lock().expect("listener lock").is_empty());
        assert_eq!(controller.filters(), &RankingFilters::default());
    }

    #[test]
    fn job_change_resets_page_and_notifies() {
        let (mut controller, seen) = recording();
        controller.set_page(4);
        let transition = controller.set_job_filter("pirate").expect("committed");
        assert_eq!(transition.filters.job, "pirate");
        assert_eq!(transition.filters.page, 1);
        assert_eq!(transition.clear_after, Duration::from_millis(300));
        assert!(controller.is_transitioning());
        assert_eq!(seen.lock().expect("listener lock").len(), 2);
    }

    #[test]
    fn repeated_search_is_suppressed_after_trimming() {
        let (mut controller, seen) = recording();
        controller.set_search("Dan").expect("first commit");
        assert!(controller.set_search("  Dan ").is_none());
        assert_eq!(seen.lock().expect("listener lock").len(), 1);
    }

    #[test]
    fn submitting_search_keeps_job_and_resets_page() {
        let (mut controller, _) = recording();
        controller.set_job_filter("warrior");
        controller.set_page(3);
        controller.set_search_input("Dan");
        controller.submit_search().expect("commit");
        assert_eq!(
            controller.filters(),
            &RankingFilters {
                job: "warrior".into(),
                search: "Dan".into(),
                page: 1,
            }
        );
        assert_eq!(controller.search_input(), "Dan");
    }

    #[test]
    fn clear_search_always_commits() {
        let (mut controller, seen) = recording();
        controller.set_search_input("abc");
        let transition = controller.clear_search();
        assert_eq!(transition.filters.search, "");
        assert_eq!(transition.filters.page, 1);
        assert!(controller.search_input().is_empty());
        assert_eq!(seen.lock().expect("listener lock").len(), 1);
    }

    #[test]
    fn clear_search_resets_page_and_keeps_job() {
        let mut controller = RankingQueryController::new(RankingFilters {
            job: "warrior".into(),
            search: "abc".into(),
            page: 4,
        });
        controller.set_search_input("abc");
        let transition = controller.clear_search();
        let expected = RankingFilters {
            job: "warrior".into(),
            search: String::new(),
            page: 1,
        };
        assert_eq!(transition.filters, expected);
        assert_eq!(controller.filters(), &expected);
        assert!(controller.is_transitioning());
    }

    #[test]
    fn set_page_preserves_other_filters() {
        let mut controller = RankingQueryController::new(RankingFilters {
            job: "warrior".into(),
            search: "abc".into(),
            page: 1,
        });
        controller.set_page(3).expect("commit");
        assert_eq!(
            controller.filters(),
            &RankingFilters {
                job: "warrior".into(),
                search: "abc".into(),
                page: 3,
            }
        );
        assert!(controller.set_page(0).is_none());
        assert_eq!(controller.filters().page, 3);
    }

    #[test]
    fn first_timer_ends_transition_after_rapid_commits() {
        let mut controller = RankingQueryController::default();
        let first = controller.set_job_filter("thief").expect("first");
        let second = controller.set_job_filter("pirate").expect("second");
        assert!(controller.finish_transition(first.ticket));
        assert_eq!(controller.phase(), TransitionPhase::Idle);
        assert!(!controller.finish_transition(second.ticket));
        assert_eq!(controller.filters().job, "pirate");
    }

    #[test]
    fn finishing_while_idle_is_a_no_op() {
        let mut controller = RankingQueryController::default();
        let transition = controller.set_page(2).expect("commit");
        assert!(controller.finish_transition(transition.ticket));
        assert!(!controller.finish_transition(transition.ticket));
        assert!(!controller.is_transitioning());
    }

    #[test]
    fn unsubscribed_listeners_stop_receiving() {
        let mut controller = RankingQueryController::default();
        let seen = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&seen);
        let id = controller.subscribe(move |_| *sink.lock().expect("listener lock") += 1);
        controller.set_page(2);
        assert!(controller.unsubscribe(id));
        controller.set_page(3);
        assert_eq!(*seen.lock().expect("listener lock"), 1);
        assert!(!controller.unsubscribe(id));
    }
}
