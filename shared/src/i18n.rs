//! Two static string tables (English, Russian) and the language selector.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    En,
    Ru,
}

impl Language {
    /// Stored and wire form: `"en"` / `"ru"`.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ru => "ru",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Self::En),
            "ru" => Some(Self::Ru),
            _ => None,
        }
    }

    /// Cycles through the two supported languages.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::En => Self::Ru,
            Self::Ru => Self::En,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Text {
    AppTitle,
    LoginTitle,
    UsernamePlaceholder,
    PasswordPlaceholder,
    LoginButton,
    WrongCredentials,
    Loading,
    NavOverview,
    NavProducts,
    Logout,
    Profile,
    ProductsCard,
    AdminsCard,
    DateCard,
    TimeCard,
    AddProductTitle,
    ProductNamePlaceholder,
    PricePlaceholder,
    UploadImage,
    AddProduct,
    ImageColumn,
    NameColumn,
    PriceColumn,
    ActionsColumn,
    Edit,
    Delete,
    EditProductTitle,
    SaveChanges,
    Close,
    DarkMode,
    LightMode,
    SwitchLanguage,
}

#[must_use]
pub const fn text(language: Language, key: Text) -> &'static str {
    match language {
        Language::En => english(key),
        Language::Ru => russian(key),
    }
}

const fn english(key: Text) -> &'static str {
    match key {
        Text::AppTitle => "Admin Dashboard",
        Text::LoginTitle => "Admin Login",
        Text::UsernamePlaceholder => "Username",
        Text::PasswordPlaceholder => "Password",
        Text::LoginButton => "Login",
        Text::WrongCredentials => "Wrong username or password!",
        Text::Loading => "Loading...",
        Text::NavOverview => "Dashboard",
        Text::NavProducts => "Products",
        Text::Logout => "Logout",
        Text::Profile => "Profile",
        Text::ProductsCard => "Products",
        Text::AdminsCard => "Admins",
        Text::DateCard => "Date",
        Text::TimeCard => "Time",
        Text::AddProductTitle => "Add New Product",
        Text::ProductNamePlaceholder => "Product Name",
        Text::PricePlaceholder => "Price",
        Text::UploadImage => "Upload Image",
        Text::AddProduct => "Add Product",
        Text::ImageColumn => "Image",
        Text::NameColumn => "Name",
        Text::PriceColumn => "Price",
        Text::ActionsColumn => "Actions",
        Text::Edit => "Edit",
        Text::Delete => "Delete",
        Text::EditProductTitle => "Edit Product",
        Text::SaveChanges => "Save Changes",
        Text::Close => "Close",
        Text::DarkMode => "Dark mode",
        Text::LightMode => "Light mode",
        Text::SwitchLanguage => "RU",
    }
}

const fn russian(key: Text) -> &'static str {
    match key {
        Text::AppTitle => "Панель администратора",
        Text::LoginTitle => "Вход администратора",
        Text::UsernamePlaceholder => "Имя пользователя",
        Text::PasswordPlaceholder => "Пароль",
        Text::LoginButton => "Войти",
        Text::WrongCredentials => "Неверное имя пользователя или пароль!",
        Text::Loading => "Загрузка...",
        Text::NavOverview => "Панель",
        Text::NavProducts => "Товары",
        Text::Logout => "Выйти",
        Text::Profile => "Профиль",
        Text::ProductsCard => "Товары",
        Text::AdminsCard => "Администраторы",
        Text::DateCard => "Дата",
        Text::TimeCard => "Время",
        Text::AddProductTitle => "Добавить товар",
        Text::ProductNamePlaceholder => "Название товара",
        Text::PricePlaceholder => "Цена",
        Text::UploadImage => "Загрузить изображение",
        Text::AddProduct => "Добавить",
        Text::ImageColumn => "Изображение",
        Text::NameColumn => "Название",
        Text::PriceColumn => "Цена",
        Text::ActionsColumn => "Действия",
        Text::Edit => "Изменить",
        Text::Delete => "Удалить",
        Text::EditProductTitle => "Редактирование товара",
        Text::SaveChanges => "Сохранить",
        Text::Close => "Закрыть",
        Text::DarkMode => "Тёмная тема",
        Text::LightMode => "Светлая тема",
        Text::SwitchLanguage => "EN",
    }
}

/// Every label the shell renders, resolved for one language.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Labels {
    pub app_title: String,
    pub login_title: String,
    pub username_placeholder: String,
    pub password_placeholder: String,
    pub login_button: String,
    pub loading: String,
    pub nav_overview: String,
    pub nav_products: String,
    pub logout: String,
    pub profile: String,
    pub products_card: String,
    pub admins_card: String,
    pub date_card: String,
    pub time_card: String,
    pub add_product_title: String,
    pub product_name_placeholder: String,
    pub price_placeholder: String,
    pub upload_image: String,
    pub add_product: String,
    pub image_column: String,
    pub name_column: String,
    pub price_column: String,
    pub actions_column: String,
    pub edit: String,
    pub delete: String,
    pub edit_product_title: String,
    pub save_changes: String,
    pub close: String,
    /// Label for the theme button: names the theme it switches *to*.
    pub theme_toggle: String,
    pub language_toggle: String,
}

impl Labels {
    #[must_use]
    pub fn new(language: Language, dark_mode: bool) -> Self {
        let t = |key| text(language, key).to_string();
        Self {
            app_title: t(Text::AppTitle),
            login_title: t(Text::LoginTitle),
            username_placeholder: t(Text::UsernamePlaceholder),
            password_placeholder: t(Text::PasswordPlaceholder),
            login_button: t(Text::LoginButton),
            loading: t(Text::Loading),
            nav_overview: t(Text::NavOverview),
            nav_products: t(Text::NavProducts),
            logout: t(Text::Logout),
            profile: t(Text::Profile),
            products_card: t(Text::ProductsCard),
            admins_card: t(Text::AdminsCard),
            date_card: t(Text::DateCard),
            time_card: t(Text::TimeCard),
            add_product_title: t(Text::AddProductTitle),
            product_name_placeholder: t(Text::ProductNamePlaceholder),
            price_placeholder: t(Text::PricePlaceholder),
            upload_image: t(Text::UploadImage),
            add_product: t(Text::AddProduct),
            image_column: t(Text::ImageColumn),
            name_column: t(Text::NameColumn),
            price_column: t(Text::PriceColumn),
            actions_column: t(Text::ActionsColumn),
            edit: t(Text::Edit),
            delete: t(Text::Delete),
            edit_product_title: t(Text::EditProductTitle),
            save_changes: t(Text::SaveChanges),
            close: t(Text::Close),
            theme_toggle: t(if dark_mode { Text::LightMode } else { Text::DarkMode }),
            language_toggle: t(Text::SwitchLanguage),
        }
    }
}
