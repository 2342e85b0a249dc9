use thiserror::Error;

use crate::calc::ReportScope;
use crate::config::Fixtures;
use crate::roster::{Roster, ALL_CLASSES};
use crate::session::{AttendanceSession, SessionCounts};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Splash,
    Login,
    Dashboard,
    MarkAttendance,
    Students,
    Reports,
}

impl Route {
    pub const ALL: [Route; 6] = [
        Route::Splash,
        Route::Login,
        Route::Dashboard,
        Route::MarkAttendance,
        Route::Students,
        Route::Reports,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        Route::ALL.into_iter().find(|r| r.as_str() == name.trim())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Route::Splash => "SplashScreen",
            Route::Login => "LoginScreen",
            Route::Dashboard => "DashboardScreen",
            Route::MarkAttendance => "MarkAttendanceScreen",
            Route::Students => "StudentsScreen",
            Route::Reports => "ReportsAnalytics",
        }
    }

    pub fn requires_login(self) -> bool {
        !matches!(self, Route::Splash | Route::Login)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavError {
    #[error("unknown route: {0}")]
    UnknownRoute(String),

    #[error("log in before opening {0}")]
    NotLoggedIn(&'static str),

    #[error("Please enter email and password")]
    MissingCredentials,
}

impl NavError {
    pub fn code(&self) -> &'static str {
        match self {
            NavError::UnknownRoute(_) => "unknown_route",
            NavError::NotLoggedIn(_) => "not_logged_in",
            NavError::MissingCredentials => "bad_params",
        }
    }
}

#[derive(Debug, Clone)]
pub struct StudentsScreen {
    pub roster: Roster,
    pub query: String,
    pub class_filter: String,
}

#[derive(Debug, Clone)]
pub struct ReportsScreen {
    pub scope: ReportScope,
}

/// State owned by the mounted screen. Rebuilt from the fixtures on every
/// mount, so leaving a screen discards its edits.
#[derive(Debug, Clone)]
pub enum Screen {
    Splash,
    Login,
    Dashboard,
    MarkAttendance(AttendanceSession),
    Students(StudentsScreen),
    Reports(ReportsScreen),
}

impl Screen {
    fn mount(route: Route, fixtures: &Fixtures, today: &str) -> Self {
        match route {
            Route::Splash => Screen::Splash,
            Route::Login => Screen::Login,
            Route::Dashboard => Screen::Dashboard,
            Route::MarkAttendance => {
                Screen::MarkAttendance(AttendanceSession::start(&fixtures.roster, today))
            }
            Route::Students => Screen::Students(StudentsScreen {
                roster: Roster::new(fixtures.roster.clone()),
                query: String::new(),
                class_filter: ALL_CLASSES.to_string(),
            }),
            Route::Reports => Screen::Reports(ReportsScreen {
                scope: ReportScope::All,
            }),
        }
    }
}

#[derive(Debug)]
pub struct Shell {
    route: Route,
    logged_in: bool,
    screen: Screen,
    last_session: Option<SessionCounts>,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    pub fn new() -> Self {
        Self {
            route: Route::Splash,
            logged_in: false,
            screen: Screen::Splash,
            last_session: None,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn logged_in(&self) -> bool {
        self.logged_in
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    /// Totals of the marking screen last left, for the dashboard.
    pub fn last_session(&self) -> Option<SessionCounts> {
        self.last_session
    }

    pub fn navigate(
        &mut self,
        name: &str,
        fixtures: &Fixtures,
        today: &str,
    ) -> Result<Route, NavError> {
        let route = Route::parse(name).ok_or_else(|| NavError::UnknownRoute(name.to_string()))?;
        if route.requires_login() && !self.logged_in {
            return Err(NavError::NotLoggedIn(route.as_str()));
        }
        self.mount(route, fixtures, today);
        Ok(route)
    }

    fn mount(&mut self, route: Route, fixtures: &Fixtures, today: &str) {
        if let Screen::MarkAttendance(session) = &self.screen {
            self.last_session = Some(session.counts());
        }
        tracing::debug!(from = self.route.as_str(), to = route.as_str(), "navigate");
        self.route = route;
        self.screen = Screen::mount(route, fixtures, today);
    }

    /// Any non-empty email and password is accepted.
    pub fn login(
        &mut self,
        email: &str,
        password: &str,
        fixtures: &Fixtures,
        today: &str,
    ) -> Result<(), NavError> {
        if email.trim().is_empty() || password.trim().is_empty() {
            return Err(NavError::MissingCredentials);
        }
        self.logged_in = true;
        self.mount(Route::Dashboard, fixtures, today);
        Ok(())
    }

    pub fn logout(&mut self, fixtures: &Fixtures, today: &str) {
        self.logged_in = false;
        self.last_session = None;
        self.mount(Route::Login, fixtures, today);
    }
}
