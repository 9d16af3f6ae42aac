use serde::{Deserialize, Serialize};

use crate::auth::LoginForm;
use crate::catalog::{EditSession, ProductCatalog, ProductDraft};
use crate::clock::Clock;
use crate::session::{Hydration, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Waiting for the start-up reads to come back.
    #[default]
    Starting,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    #[default]
    Login,
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    #[default]
    Overview,
    Products,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    WrongCredentials,
}

/// A blocking alert. `id` grows with every alert raised so the shell can tell
/// two identical alerts in a row apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub id: u64,
    pub kind: AlertKind,
}

#[derive(Debug)]
pub struct Model {
    pub phase: Phase,
    pub hydration: Hydration,
    pub session: Session,
    pub route: Route,
    pub section: Section,
    pub profile_menu_open: bool,
    pub login_form: LoginForm,
    pub alert: Option<Alert>,
    pub alerts_raised: u64,
    pub catalog: ProductCatalog,
    pub new_product: ProductDraft,
    pub editing: Option<EditSession>,
    pub clock: Clock,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            phase: Phase::Starting,
            hydration: Hydration::default(),
            session: Session::default(),
            route: Route::Login,
            section: Section::Overview,
            profile_menu_open: false,
            login_form: LoginForm::default(),
            alert: None,
            alerts_raised: 0,
            catalog: ProductCatalog::seeded(),
            new_product: ProductDraft::default(),
            editing: None,
            clock: Clock::default(),
        }
    }
}

impl Model {
    /// Moves to `requested`, redirecting to whichever route matches the
    /// session: the dashboard needs one, the login screen needs none.
    /// Returns the route entered.
    pub fn enter_route(&mut self, requested: Route) -> Route {
        let route = match (requested, self.session.is_logged_in()) {
            (Route::Dashboard, false) => Route::Login,
            (Route::Login, true) => Route::Dashboard,
            (other, _) => other,
        };

        self.route = route;
        match route {
            Route::Dashboard => self.clock.start(),
            Route::Login => {
                self.clock.stop();
                self.profile_menu_open = false;
            }
        }
        route
    }

    pub fn raise_alert(&mut self, kind: AlertKind) -> Alert {
        self.alerts_raised += 1;
        let alert = Alert {
            id: self.alerts_raised,
            kind,
        };
        self.alert = Some(alert);
        alert
    }

    /// Drops per-session UI state: open menus, modals and half-typed forms.
    pub fn reset_session_ui(&mut self) {
        self.profile_menu_open = false;
        self.section = Section::Overview;
        self.new_product.clear();
        self.editing = None;
        self.login_form.clear();
    }
}
