//! Navigation state machine
//!
//! Four states, one per view. Input is either a location fragment
//! (`#nodes`, `settings`, ...) or an explicit re-enter request issued after a
//! successful mutation. [`transition`] is pure; [`Router`] adds the load
//! bookkeeping: every dispatch issues a [`LoadTicket`] with a fresh generation,
//! and only the newest ticket may paint. Overlapping loads therefore resolve
//! as "latest dispatch wins" regardless of which one completes last.

/// Navigation states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Route {
    #[default]
    Dashboard,
    Nodes,
    Logs,
    Settings,
}

impl Route {
    /// Tab order
    pub const ALL: [Route; 4] = [Route::Dashboard, Route::Nodes, Route::Logs, Route::Settings];

    /// Resolve a location fragment
    ///
    /// A leading `#` and surrounding whitespace are ignored, matching is
    /// case-insensitive. Absent or unrecognized fragments resolve to
    /// [`Route::Dashboard`]; that is the default state, not an error.
    pub fn from_fragment(fragment: &str) -> Route {
        let name = fragment.trim().trim_start_matches('#');
        Route::ALL
            .into_iter()
            .find(|route| route.fragment().eq_ignore_ascii_case(name))
            .unwrap_or_default()
    }

    pub fn fragment(&self) -> &'static str {
        match self {
            Route::Dashboard => "dashboard",
            Route::Nodes => "nodes",
            Route::Logs => "logs",
            Route::Settings => "settings",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Nodes => "Nodes",
            Route::Logs => "Logs",
            Route::Settings => "Settings",
        }
    }

    fn index(&self) -> usize {
        Route::ALL.iter().position(|r| r == self).unwrap_or(0)
    }

    pub fn next(self) -> Route {
        Route::ALL[(self.index() + 1) % Route::ALL.len()]
    }

    pub fn prev(self) -> Route {
        Route::ALL[(self.index() + Route::ALL.len() - 1) % Route::ALL.len()]
    }
}

/// Router input alphabet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    /// Location fragment changed (or was set at startup)
    Navigate(String),
    /// Reload the current state from the server
    Reenter,
}

impl NavEvent {
    pub fn to(route: Route) -> Self {
        NavEvent::Navigate(route.fragment().to_string())
    }
}

/// Pure transition function
pub fn transition(current: Route, event: &NavEvent) -> Route {
    match event {
        NavEvent::Navigate(fragment) => Route::from_fragment(fragment),
        NavEvent::Reenter => current,
    }
}

/// Carried by a spawned view load; identifies which dispatch it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub route: Route,
    pub generation: u64,
}

/// Owns the current state and the load generation counter
#[derive(Debug, Default)]
pub struct Router {
    current: Route,
    generation: u64,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Route {
        self.current
    }

    /// Apply an event and issue the ticket for the load it triggers
    ///
    /// Never waits for the previous load; an older in-flight ticket simply
    /// stops being accepted.
    pub fn dispatch(&mut self, event: &NavEvent) -> LoadTicket {
        let next = transition(self.current, event);
        self.generation += 1;
        tracing::debug!(
            "Route {} -> {} (generation {})",
            self.current.fragment(),
            next.fragment(),
            self.generation
        );
        self.current = next;
        LoadTicket {
            route: next,
            generation: self.generation,
        }
    }

    /// Stop accepting every ticket issued so far (session lost)
    pub fn invalidate(&mut self) {
        self.generation += 1;
    }

    /// Whether a completed load may still paint
    pub fn accepts(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation && ticket.route == self.current
    }
}
