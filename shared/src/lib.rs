#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod auth;
pub mod capabilities;
pub mod catalog;
pub mod clock;
pub mod event;
pub mod i18n;
pub mod local_store;
pub mod model;
pub mod session;
pub mod view;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use event::Event;
pub use model::Model;
pub use view::ViewModel;

pub const TICK_INTERVAL_MS: u64 = 1000;

pub const ADMIN_USERNAME: &str = "mcs-ilya's-sponsor";
pub const ADMIN_PASSWORD: &str = "ybanshka";

pub const SIGNED_IN_NAME: &str = "Admin";
pub const SIGNED_IN_EMAIL: &str = "admin@example.com";
pub const GUEST_NAME: &str = "Guest";
pub const GUEST_EMAIL: &str = "guest@example.com";

pub const SEED_PRODUCTS: [(u64, &str, f64); 2] = [(1, "Laptop", 1200.0), (2, "Smartphone", 800.0)];
pub const MAX_PRODUCT_NAME_LENGTH: usize = 200;
pub const MAX_IMAGE_REF_LENGTH: usize = 2048;

pub mod app {
    use crate::auth::{CredentialVerifier, StaticCredentials};
    use crate::capabilities::{Capabilities, StorageKey, StoreWrite};
    use crate::catalog::{EditSession, ImageRef};
    use crate::clock::ClockSample;
    use crate::event::Event;
    use crate::model::{AlertKind, Model, Phase, Route};
    use crate::session::Session;
    use crate::view::{self, ViewModel};

    pub struct App {
        verifier: Box<dyn CredentialVerifier>,
    }

    impl Default for App {
        fn default() -> Self {
            Self::with_verifier(StaticCredentials::default())
        }
    }

    impl App {
        #[must_use]
        pub fn with_verifier(verifier: impl CredentialVerifier + 'static) -> Self {
            Self {
                verifier: Box::new(verifier),
            }
        }

        fn hydrate(caps: &Capabilities) {
            for key in StorageKey::ALL {
                caps.key_value
                    .get(key.as_str().to_string(), move |result| {
                        Event::StoredValueLoaded { key, result }
                    });
            }
        }

        fn persist(caps: &Capabilities, writes: Vec<StoreWrite>) {
            for StoreWrite { key, value } in writes {
                caps.key_value
                    .set(key.as_str().to_string(), value, move |result| {
                        Event::StoredValueWritten { key, result }
                    });
            }
        }

        fn on_dashboard(model: &Model) -> bool {
            model.route == Route::Dashboard && model.session.is_logged_in()
        }

        fn select_image(uri: String) -> Option<ImageRef> {
            match ImageRef::new(uri) {
                Ok(image) => Some(image),
                Err(e) => {
                    tracing::warn!(error = %e, "rejected image selection");
                    None
                }
            }
        }

        fn finish_hydration(model: &mut Model) {
            let stored = std::mem::take(&mut model.hydration).into_stored();
            model.session = Session::restore(&stored);
            model.phase = Phase::Ready;

            let landing = if model.session.is_logged_in() {
                Route::Dashboard
            } else {
                Route::Login
            };
            let route = model.enter_route(landing);
            tracing::info!(
                logged_in = model.session.is_logged_in(),
                route = ?route,
                "session restored"
            );
        }

        fn submit_login(&self, model: &mut Model, caps: &Capabilities) {
            let accepted = model.login_form.check(self.verifier.as_ref());
            model.login_form.clear();

            if !accepted {
                let alert = model.raise_alert(AlertKind::WrongCredentials);
                tracing::warn!(alert = alert.id, "login rejected");
                return;
            }

            match model.session.login() {
                Ok(writes) => Self::persist(caps, writes),
                Err(e) => tracing::warn!(error = %e, "could not encode session for storage"),
            }
            model.alert = None;
            model.enter_route(Route::Dashboard);
            tracing::info!("logged in");
        }

        fn logout(model: &mut Model, caps: &Capabilities) {
            match model.session.logout() {
                Ok(writes) => Self::persist(caps, writes),
                Err(e) => tracing::warn!(error = %e, "could not encode session for storage"),
            }
            model.reset_session_ui();
            model.enter_route(Route::Login);
            tracing::info!("logged out");
        }
    }

    impl crux_core::App for App {
        type Event = Event;
        type Model = Model;
        type ViewModel = ViewModel;
        type Capabilities = Capabilities;

        fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
            tracing::debug!(event = event.name(), "update");

            if model.phase == Phase::Starting && event.is_user_initiated() {
                tracing::debug!(event = event.name(), "ignoring event before start-up");
                return;
            }

            match event {
                Event::Startup => {
                    if model.phase == Phase::Ready {
                        tracing::debug!("already started");
                        return;
                    }
                    Self::hydrate(caps);
                    caps.render.render();
                }

                Event::StoredValueLoaded { key, result } => {
                    if model.phase == Phase::Ready {
                        tracing::debug!(key = %key, "dropping stored value read after start-up");
                        return;
                    }
                    let value = result.unwrap_or_else(|e| {
                        tracing::warn!(key = %key, error = ?e, "failed to read stored value");
                        None
                    });
                    model.hydration.record(key, value);

                    if model.hydration.is_complete() {
                        Self::finish_hydration(model);
                        caps.render.render();
                    } else {
                        tracing::debug!(
                            pending = ?model.hydration.pending(),
                            "waiting for stored values"
                        );
                    }
                }

                Event::StoredValueWritten { key, result } => match result {
                    Ok(_) => tracing::debug!(key = %key, "stored value written"),
                    Err(e) => tracing::warn!(key = %key, error = ?e, "failed to write stored value"),
                },

                Event::Navigate { route } => {
                    let entered = model.enter_route(route);
                    if entered != route {
                        tracing::debug!(requested = ?route, entered = ?entered, "route redirected");
                    }
                    caps.render.render();
                }

                Event::SectionSelected { section } => {
                    if Self::on_dashboard(model) {
                        model.section = section;
                        caps.render.render();
                    }
                }

                Event::UsernameChanged { value } => {
                    model.login_form.username = value;
                    caps.render.render();
                }

                Event::PasswordChanged { value } => {
                    model.login_form.set_password(value);
                }

                Event::LoginSubmitted => {
                    if model.session.is_logged_in() {
                        tracing::debug!("login submitted while already logged in");
                        model.login_form.clear();
                        return;
                    }
                    self.submit_login(model, caps);
                    caps.render.render();
                }

                Event::AlertDismissed => {
                    model.alert = None;
                    caps.render.render();
                }

                Event::LogoutRequested => {
                    if !model.session.is_logged_in() {
                        return;
                    }
                    Self::logout(model, caps);
                    caps.render.render();
                }

                Event::ProfileMenuToggled => {
                    if Self::on_dashboard(model) {
                        model.profile_menu_open = !model.profile_menu_open;
                        caps.render.render();
                    }
                }

                Event::DarkModeToggled => {
                    let write = model.session.toggle_dark_mode();
                    Self::persist(caps, vec![write]);
                    caps.render.render();
                }

                Event::LanguageToggled => {
                    let write = model.session.toggle_language();
                    Self::persist(caps, vec![write]);
                    caps.render.render();
                }

                Event::ClockTicked {
                    timestamp_ms,
                    utc_offset_minutes,
                } => match ClockSample::new(timestamp_ms, utc_offset_minutes) {
                    Ok(sample) => {
                        if model.clock.accept(sample) {
                            caps.render.render();
                        } else {
                            tracing::debug!("clock stopped, dropping tick");
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "invalid clock sample"),
                },

                Event::NewProductNameChanged { value } => {
                    if Self::on_dashboard(model) {
                        model.new_product.name = value;
                        caps.render.render();
                    }
                }

                Event::NewProductPriceChanged { value } => {
                    if Self::on_dashboard(model) {
                        model.new_product.price = value;
                        caps.render.render();
                    }
                }

                Event::NewProductImageSelected { uri } => {
                    if Self::on_dashboard(model) {
                        if let Some(image) = Self::select_image(uri) {
                            model.new_product.image = Some(image);
                            caps.render.render();
                        }
                    }
                }

                Event::AddProductSubmitted { timestamp_ms } => {
                    if !Self::on_dashboard(model) {
                        return;
                    }
                    match model.new_product.validate() {
                        Ok((name, price)) => {
                            let image = model.new_product.image.take();
                            let now_ms = u64::try_from(timestamp_ms).unwrap_or_else(|_| {
                                tracing::warn!(timestamp_ms, "negative submit timestamp");
                                0
                            });
                            let id = model.catalog.add(name, price, image, now_ms);
                            model.new_product.clear();
                            tracing::info!(id = %id, "product added");
                            caps.render.render();
                        }
                        Err(e) => tracing::debug!(error = %e, "add product ignored"),
                    }
                }

                Event::EditProductRequested { id } => {
                    if !Self::on_dashboard(model) {
                        return;
                    }
                    match model.catalog.get(id) {
                        Some(product) => {
                            model.editing = Some(EditSession::open(product));
                            caps.render.render();
                        }
                        None => tracing::warn!(id = %id, "edit requested for unknown product"),
                    }
                }

                Event::EditNameChanged { value } => {
                    if let Some(edit) = model.editing.as_mut() {
                        edit.draft.name = value;
                        caps.render.render();
                    }
                }

                Event::EditPriceChanged { value } => {
                    if let Some(edit) = model.editing.as_mut() {
                        edit.draft.price = value;
                        caps.render.render();
                    }
                }

                Event::EditImageSelected { uri } => {
                    if model.editing.is_none() {
                        return;
                    }
                    if let Some(image) = Self::select_image(uri) {
                        if let Some(edit) = model.editing.as_mut() {
                            edit.draft.image = Some(image);
                        }
                        caps.render.render();
                    }
                }

                Event::EditSaved => {
                    let Some(edit) = model.editing.take() else {
                        return;
                    };
                    match edit.to_patch() {
                        Ok(patch) => {
                            if model.catalog.update(edit.id, patch) {
                                tracing::info!(id = %edit.id, "product updated");
                            } else {
                                tracing::warn!(id = %edit.id, "edited product no longer exists");
                            }
                        }
                        Err(e) => {
                            tracing::debug!(error = %e, "edit not saved");
                            model.editing = Some(edit);
                        }
                    }
                    caps.render.render();
                }

                Event::EditCancelled => {
                    if model.editing.take().is_some() {
                        caps.render.render();
                    }
                }

                Event::DeleteProductRequested { id } => {
                    if !Self::on_dashboard(model) {
                        return;
                    }
                    if model.catalog.remove(id) {
                        if model.editing.as_ref().is_some_and(|edit| edit.id == id) {
                            model.editing = None;
                        }
                        tracing::info!(id = %id, "product removed");
                        caps.render.render();
                    }
                }
            }
        }

        fn view(&self, model: &Model) -> ViewModel {
            view::build(model, self.verifier.account_count())
        }
    }

}
