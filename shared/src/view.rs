//! The view model: everything the shell needs to paint one frame.

use serde::{Deserialize, Serialize};

use crate::catalog::{EditSession, Product, ProductDraft};
use crate::i18n::{text, Labels, Language, Text};
use crate::model::{Alert, AlertKind, Model, Phase, Route, Section};
use crate::session::UserProfile;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ViewModel {
    pub screen: Screen,
    pub dark_mode: bool,
    pub language: String,
    pub labels: Labels,
    /// While set, the shell sends `ClockTicked` every `TICK_INTERVAL_MS`.
    pub clock_running: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Screen {
    Loading,
    Login {
        username: String,
        alert: Option<AlertView>,
    },
    Dashboard(DashboardView),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AlertView {
    pub id: u64,
    pub message: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DashboardView {
    pub section: Section,
    pub profile: UserProfile,
    pub profile_menu_open: bool,
    pub cards: SummaryCards,
    pub products: Vec<ProductRow>,
    pub new_product: DraftView,
    pub editing: Option<EditView>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SummaryCards {
    pub product_count: usize,
    pub admin_count: usize,
    /// Empty until the first clock sample arrives.
    pub date: String,
    pub time: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ProductRow {
    pub id: u64,
    pub name: String,
    pub price: f64,
    pub price_label: String,
    pub image: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DraftView {
    pub name: String,
    pub price: String,
    pub image: Option<String>,
    pub can_submit: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EditView {
    pub id: u64,
    pub draft: DraftView,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.0,
            name: product.name.clone(),
            price: product.price.value(),
            price_label: product.price.to_string(),
            image: product.image.as_ref().map(|image| image.as_str().to_string()),
        }
    }
}

impl From<&ProductDraft> for DraftView {
    fn from(draft: &ProductDraft) -> Self {
        Self {
            name: draft.name.clone(),
            price: draft.price.clone(),
            image: draft.image.as_ref().map(|image| image.as_str().to_string()),
            can_submit: draft.can_submit(),
        }
    }
}

impl From<&EditSession> for EditView {
    fn from(edit: &EditSession) -> Self {
        Self {
            id: edit.id.0,
            draft: DraftView::from(&edit.draft),
        }
    }
}

fn alert_view(alert: Alert, language: Language) -> AlertView {
    let message = match alert.kind {
        AlertKind::WrongCredentials => text(language, Text::WrongCredentials),
    };
    AlertView {
        id: alert.id,
        message: message.to_string(),
    }
}

#[must_use]
pub fn build(model: &Model, admin_count: usize) -> ViewModel {
    let preferences = model.session.preferences();
    let language = preferences.language;

    let screen = match (model.phase, model.route) {
        (Phase::Starting, _) => Screen::Loading,
        (Phase::Ready, Route::Login) => Screen::Login {
            username: model.login_form.username.clone(),
            alert: model.alert.map(|alert| alert_view(alert, language)),
        },
        (Phase::Ready, Route::Dashboard) => {
            let (date, time) = model.clock.latest().map_or_else(
                || (String::new(), String::new()),
                |sample| (sample.date_label(language), sample.time_label(language)),
            );
            Screen::Dashboard(DashboardView {
                section: model.section,
                profile: model.session.profile().clone(),
                profile_menu_open: model.profile_menu_open,
                cards: SummaryCards {
                    product_count: model.catalog.len(),
                    admin_count,
                    date,
                    time,
                },
                products: model.catalog.products().iter().map(ProductRow::from).collect(),
                new_product: DraftView::from(&model.new_product),
                editing: model.editing.as_ref().map(EditView::from),
            })
        }
    };

    ViewModel {
        screen,
        dark_mode: preferences.dark_mode,
        language: language.code().to_string(),
        labels: Labels::new(language, preferences.dark_mode),
        clock_running: model.clock.is_running(),
    }
}
