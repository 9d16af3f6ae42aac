//! In-memory product catalog with add / update / remove.
//!
//! Nothing here touches storage: the list lives for one session and a fresh
//! model starts from the seeded rows again.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::{MAX_IMAGE_REF_LENGTH, MAX_PRODUCT_NAME_LENGTH, SEED_PRODUCTS};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} exceeds maximum length of {max} bytes")]
    TooLong { field: &'static str, max: usize },

    #[error("invalid price: {input:?}")]
    InvalidPrice { input: String },

    #[error("price cannot be negative")]
    NegativePrice,

    #[error("invalid image reference: {reason}")]
    InvalidImageRef { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Finite, non-negative price.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Price(f64);

impl Price {
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::InvalidPrice {
                input: value.to_string(),
            });
        }
        if value < 0.0 {
            return Err(ValidationError::NegativePrice);
        }
        // `-0.0` passes the sign check; `abs` turns it into `0.0`.
        Ok(Self(value.abs()))
    }

    /// Parses the text of a price input. Blank input counts as missing.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Required { field: "price" });
        }
        let value: f64 = trimmed
            .parse()
            .map_err(|_| ValidationError::InvalidPrice {
                input: input.to_string(),
            })?;
        Self::new(value)
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Price {
    // `1200` rather than `1200.0`, `12.5` stays `12.5`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

/// Handle to a locally selected image (object URL or similar).
///
/// Only used for preview; it is never uploaded or persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRef(String);

impl ImageRef {
    const ALLOWED_SCHEMES: [&'static str; 5] = ["blob", "http", "https", "file", "data"];

    pub fn new(uri: impl Into<String>) -> Result<Self, ValidationError> {
        let uri = uri.into();
        if uri.trim().is_empty() {
            return Err(ValidationError::Required { field: "image" });
        }
        if uri.len() > MAX_IMAGE_REF_LENGTH {
            return Err(ValidationError::TooLong {
                field: "image",
                max: MAX_IMAGE_REF_LENGTH,
            });
        }
        let parsed = url::Url::parse(&uri).map_err(|e| ValidationError::InvalidImageRef {
            reason: e.to_string(),
        })?;
        if !Self::ALLOWED_SCHEMES.contains(&parsed.scheme()) {
            return Err(ValidationError::InvalidImageRef {
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        Ok(Self(uri))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: Option<ImageRef>,
}

/// Fields to overwrite on an existing product; `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<Price>,
    pub image: Option<Option<ImageRef>>,
}

impl ProductPatch {
    #[must_use]
    pub fn price(price: Price) -> Self {
        Self {
            price: Some(price),
            ..Self::default()
        }
    }

    /// Whole-record replacement, as the edit form submits it.
    #[must_use]
    pub fn replace(name: String, price: Price, image: Option<ImageRef>) -> Self {
        Self {
            name: Some(name),
            price: Some(price),
            image: Some(image),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductCatalog {
    products: Vec<Product>,
    last_id: u64,
}

impl Default for ProductCatalog {
    fn default() -> Self {
        Self::seeded()
    }
}

impl ProductCatalog {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            products: Vec::new(),
            last_id: 0,
        }
    }

    #[must_use]
    pub fn seeded() -> Self {
        let mut catalog = Self::empty();
        for (id, name, price) in SEED_PRODUCTS {
            catalog.products.push(Product {
                id: ProductId(id),
                name: name.to_string(),
                price: Price(price),
                image: None,
            });
            catalog.last_id = catalog.last_id.max(id);
        }
        catalog
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Appends a product and returns its freshly minted id.
    ///
    /// Ids follow the clock but never repeat: two adds in the same
    /// millisecond (or with a clock that went backwards) still get distinct,
    /// increasing ids.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        price: Price,
        image: Option<ImageRef>,
        now_ms: u64,
    ) -> ProductId {
        let id = ProductId(now_ms.max(self.last_id.saturating_add(1)));
        self.last_id = id.0;
        self.products.push(Product {
            id,
            name: name.into(),
            price,
            image,
        });
        id
    }

    /// Returns `false` (and changes nothing) when no product has `id`.
    pub fn update(&mut self, id: ProductId, patch: ProductPatch) -> bool {
        let Some(product) = self.products.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        if let Some(name) = patch.name {
            product.name = name;
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(image) = patch.image {
            product.image = image;
        }
        true
    }

    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.products.len();
        self.products.retain(|p| p.id != id);
        self.products.len() != before
    }
}

/// Raw text of the add / edit forms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub price: String,
    pub image: Option<ImageRef>,
}

impl ProductDraft {
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price.value().to_string(),
            image: product.image.clone(),
        }
    }

    pub fn validate(&self) -> Result<(String, Price), ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::Required { field: "name" });
        }
        if name.len() > MAX_PRODUCT_NAME_LENGTH {
            return Err(ValidationError::TooLong {
                field: "name",
                max: MAX_PRODUCT_NAME_LENGTH,
            });
        }
        let price = Price::parse(&self.price)?;
        Ok((name.to_string(), price))
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// The edit modal: which product is open and its unsaved fields.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub id: ProductId,
    pub draft: ProductDraft,
}

impl EditSession {
    #[must_use]
    pub fn open(product: &Product) -> Self {
        Self {
            id: product.id,
            draft: ProductDraft::from_product(product),
        }
    }

    pub fn to_patch(&self) -> Result<ProductPatch, ValidationError> {
        let (name, price) = self.draft.validate()?;
        Ok(ProductPatch::replace(name, price, self.draft.image.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn price(value: f64) -> Price {
        Price::new(value).unwrap()
    }

    #[test]
    fn seeded_catalog_has_two_rows() {
        let catalog = ProductCatalog::seeded();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.products()[0].name, "Laptop");
        assert_eq!(catalog.products()[0].price, price(1200.0));
        assert_eq!(catalog.products()[1].name, "Smartphone");
        assert_eq!(catalog.products()[1].price, price(800.0));
    }

    #[test]
    fn add_then_remove_restores_list() {
        let mut catalog = ProductCatalog::seeded();
        let before = catalog.products().to_vec();

        let id = catalog.add("Tablet", price(500.0), None, 1_700_000_000_000);
        assert_eq!(catalog.len(), 3);
        assert!(catalog.remove(id));

        assert_eq!(catalog.products(), before.as_slice());
    }

    #[test]
    fn ids_follow_clock_and_never_repeat() {
        let mut catalog = ProductCatalog::seeded();
        let a = catalog.add("A", price(1.0), None, 5_000);
        let b = catalog.add("B", price(1.0), None, 5_000);
        let c = catalog.add("C", price(1.0), None, 4_000);

        assert_eq!(a, ProductId(5_000));
        assert_eq!(b, ProductId(5_001));
        assert_eq!(c, ProductId(5_002));
    }

    #[test]
    fn ids_without_clock_do_not_collide_with_seeds() {
        let mut catalog = ProductCatalog::seeded();
        let id = catalog.add("A", price(1.0), None, 0);
        assert_eq!(id, ProductId(3));
    }

    #[test]
    fn removed_ids_are_not_reused() {
        let mut catalog = ProductCatalog::seeded();
        let first = catalog.add("A", price(1.0), None, 0);
        catalog.remove(first);
        let second = catalog.add("B", price(1.0), None, 0);
        assert_ne!(first, second);
    }

    #[test]
    fn update_price_changes_only_that_field() {
        let mut catalog = ProductCatalog::seeded();
        let before = catalog.products().to_vec();

        assert!(catalog.update(ProductId(1), ProductPatch::price(price(999.0))));

        let after = catalog.products();
        assert_eq!(after[0].price, price(999.0));
        assert_eq!(after[0].name, before[0].name);
        assert_eq!(after[0].image, before[0].image);
        assert_eq!(after[1], before[1]);
    }

    #[test]
    fn update_unknown_id_is_noop() {
        let mut catalog = ProductCatalog::seeded();
        let before = catalog.clone();
        assert!(!catalog.update(ProductId(42), ProductPatch::price(price(999.0))));
        assert_eq!(catalog, before);
    }

    #[test]
    fn replace_patch_can_clear_image() {
        let mut catalog = ProductCatalog::empty();
        let image = ImageRef::new("blob:http://localhost/abc").unwrap();
        let id = catalog.add("Camera", price(300.0), Some(image), 10);

        catalog.update(id, ProductPatch::replace("Camera".into(), price(250.0), None));

        let product = catalog.get(id).unwrap();
        assert_eq!(product.image, None);
        assert_eq!(product.price, price(250.0));
    }

    #[test]
    fn remove_unknown_id_returns_false() {
        let mut catalog = ProductCatalog::seeded();
        assert!(!catalog.remove(ProductId(99)));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn price_parsing() {
        assert_eq!(Price::parse("12.5"), Ok(price(12.5)));
        assert_eq!(Price::parse(" 0 "), Ok(price(0.0)));
        assert_eq!(Price::parse(""), Err(ValidationError::Required { field: "price" }));
        assert!(matches!(Price::parse("abc"), Err(ValidationError::InvalidPrice { .. })));
        assert_eq!(Price::parse("-1"), Err(ValidationError::NegativePrice));
        assert!(Price::parse("inf").is_err());
        assert!(Price::parse("NaN").is_err());
    }

    #[test]
    fn price_display() {
        assert_eq!(price(1200.0).to_string(), "$1200");
        assert_eq!(price(12.5).to_string(), "$12.5");
    }

    #[test]
    fn negative_zero_is_plain_zero() {
        let zero = Price::parse("-0").unwrap();
        assert_eq!(zero.to_string(), "$0");
        assert!(zero.value().is_sign_positive());
        assert_eq!(Price::new(-0.0).unwrap().to_string(), "$0");
    }

    #[test]
    fn image_ref_validation() {
        assert!(ImageRef::new("blob:http://localhost:5173/0b1c").is_ok());
        assert!(ImageRef::new("https://cdn.example.com/p.png").is_ok());
        assert!(ImageRef::new("").is_err());
        assert!(ImageRef::new("not a url").is_err());
        assert!(ImageRef::new("javascript:alert(1)").is_err());
        assert!(ImageRef::new(format!("https://x/{}", "a".repeat(MAX_IMAGE_REF_LENGTH))).is_err());
    }

    #[test]
    fn draft_requires_name_and_price() {
        let mut draft = ProductDraft::default();
        assert!(!draft.can_submit());

        draft.name = "Tablet".into();
        assert!(!draft.can_submit());

        draft.price = "500".into();
        assert!(draft.can_submit());

        draft.name = "   ".into();
        assert_eq!(draft.validate(), Err(ValidationError::Required { field: "name" }));
    }

    #[test]
    fn draft_from_product_round_trips_price_text() {
        let catalog = ProductCatalog::seeded();
        let draft = ProductDraft::from_product(&catalog.products()[0]);
        assert_eq!(draft.price, "1200");
        assert_eq!(draft.validate(), Ok(("Laptop".to_string(), price(1200.0))));
    }

    proptest! {
        #[test]
        fn add_remove_round_trip(name in "[A-Za-z ]{1,20}", value in 0.0f64..100_000.0, now in any::<u64>()) {
            let mut catalog = ProductCatalog::seeded();
            let before = catalog.products().to_vec();
            let id = catalog.add(name, price(value), None, now);
            prop_assert!(catalog.remove(id));
            prop_assert_eq!(catalog.products(), before.as_slice());
        }

        #[test]
        fn minted_ids_are_unique(clock in proptest::collection::vec(0u64..10, 1..50)) {
            let mut catalog = ProductCatalog::seeded();
            for now in clock {
                catalog.add("x", price(1.0), None, now);
            }
            let mut ids: Vec<_> = catalog.products().iter().map(|p| p.id).collect();
            let total = ids.len();
            ids.sort();
            ids.dedup();
            prop_assert_eq!(ids.len(), total);
        }
    }
}
