//! Storefront view-state machine.
//!
//! The storefront shows exactly one view at a time. Views change only through
//! [`NavEvent`]s, and [`transition`] is the single table of allowed moves.
//!
//! ```text
//! Landing ─GetStarted─► Home ─SubmitSearch─► Search
//!                        │                     │
//!                        └──SelectService──────┴─► ServiceDetail ─Book─► Payment
//!                                                                          │
//!                        Home ◄─Done── BookingSuccess ◄──ConfirmPayment────┘
//! ```
//!
//! Tabs (home, search, messages, profile) are reachable from every view except
//! the landing page.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A storefront view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    /// Marketing splash shown before entering the app.
    #[default]
    Landing,
    /// Featured listings and categories.
    Home,
    /// Search results.
    Search,
    /// Conversations with providers.
    Messages,
    /// The user's profile and seller dashboard.
    Profile,
    /// A single listing.
    ServiceDetail,
    /// Payment method selection and fee breakdown.
    Payment,
    /// Booking confirmation.
    BookingSuccess,
}

impl ViewState {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Landing => "landing",
            Self::Home => "home",
            Self::Search => "search",
            Self::Messages => "messages",
            Self::Profile => "profile",
            Self::ServiceDetail => "service_detail",
            Self::Payment => "payment",
            Self::BookingSuccess => "booking_success",
        }
    }

    /// Parses a view name. Case-insensitive, accepts `-` for `_`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "landing" => Some(Self::Landing),
            "home" => Some(Self::Home),
            "search" => Some(Self::Search),
            "messages" => Some(Self::Messages),
            "profile" => Some(Self::Profile),
            "service_detail" | "detail" => Some(Self::ServiceDetail),
            "payment" => Some(Self::Payment),
            "booking_success" | "success" => Some(Self::BookingSuccess),
            _ => None,
        }
    }
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Navigation tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    /// Home tab.
    Home,
    /// Search tab.
    Search,
    /// Messages tab.
    Messages,
    /// Profile tab.
    Profile,
}

impl Tab {
    /// The view a tab opens.
    #[must_use]
    pub const fn view(self) -> ViewState {
        match self {
            Self::Home => ViewState::Home,
            Self::Search => ViewState::Search,
            Self::Messages => ViewState::Messages,
            Self::Profile => ViewState::Profile,
        }
    }
}

/// User actions that move between views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavEvent {
    /// Leave the landing page.
    GetStarted,
    /// Pick a navigation tab.
    OpenTab(Tab),
    /// Submit the search box or tap a category chip.
    SubmitSearch,
    /// Open a listing card.
    SelectService,
    /// Start booking the open listing.
    Book,
    /// Pay for the booking.
    ConfirmPayment,
    /// Back arrow.
    Back,
    /// Dismiss the confirmation.
    Done,
}

impl NavEvent {
    /// Parses an event name; tabs are written `open:<tab>`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase().replace('-', "_");
        if let Some(tab) = lower.strip_prefix("open:") {
            let tab = match tab {
                "home" => Tab::Home,
                "search" => Tab::Search,
                "messages" => Tab::Messages,
                "profile" => Tab::Profile,
                _ => return None,
            };
            return Some(Self::OpenTab(tab));
        }
        match lower.as_str() {
            "get_started" | "start" => Some(Self::GetStarted),
            "submit_search" | "search" => Some(Self::SubmitSearch),
            "select_service" | "select" => Some(Self::SelectService),
            "book" => Some(Self::Book),
            "confirm_payment" | "confirm" | "pay" => Some(Self::ConfirmPayment),
            "back" => Some(Self::Back),
            "done" => Some(Self::Done),
            _ => None,
        }
    }

    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GetStarted => "get_started",
            Self::OpenTab(Tab::Home) => "open:home",
            Self::OpenTab(Tab::Search) => "open:search",
            Self::OpenTab(Tab::Messages) => "open:messages",
            Self::OpenTab(Tab::Profile) => "open:profile",
            Self::SubmitSearch => "submit_search",
            Self::SelectService => "select_service",
            Self::Book => "book",
            Self::ConfirmPayment => "confirm_payment",
            Self::Back => "back",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for NavEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The transition table.
///
/// Returns `None` for pairs the storefront does not allow.
#[must_use]
pub const fn transition(from: ViewState, event: NavEvent) -> Option<ViewState> {
    use NavEvent as E;
    use ViewState as V;

    match (from, event) {
        (V::Landing, E::GetStarted) => Some(V::Home),
        (V::Landing, _) => None,
        (_, E::OpenTab(tab)) => Some(tab.view()),
        (V::Home | V::Search, E::SubmitSearch) => Some(V::Search),
        (V::Home | V::Search, E::SelectService) => Some(V::ServiceDetail),
        (V::Search | V::ServiceDetail, E::Back) => Some(V::Home),
        (V::ServiceDetail, E::Book) => Some(V::Payment),
        (V::Payment, E::Back) => Some(V::ServiceDetail),
        (V::Payment, E::ConfirmPayment) => Some(V::BookingSuccess),
        (V::BookingSuccess, E::Done) => Some(V::Home),
        _ => None,
    }
}

/// Holds the current view and applies events against the table.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    current: ViewState,
}

impl Navigator {
    /// Starts on the landing page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts on an arbitrary view.
    #[must_use]
    pub const fn starting_at(view: ViewState) -> Self {
        Self { current: view }
    }

    /// Returns the current view.
    #[must_use]
    pub const fn current(&self) -> ViewState {
        self.current
    }

    /// Applies an event.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] and leaves the view unchanged when
    /// the table has no entry for the pair.
    pub fn apply(&mut self, event: NavEvent) -> Result<ViewState> {
        let next = transition(self.current, event).ok_or_else(|| Error::InvalidTransition {
            from: self.current.to_string(),
            event: event.to_string(),
        })?;
        tracing::debug!(from = %self.current, to = %next, event = %event, "view transition");
        self.current = next;
        Ok(next)
    }
}
