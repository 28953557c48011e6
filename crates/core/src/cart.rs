//! The shopper cart state container.
//!
//! A [`Cart`] is constructed once per shopper session over an injected
//! [`CartStorage`] backend and passed by reference to whatever needs it.
//! Every mutation writes the full line-item set back to storage, and the
//! item set is rehydrated from storage on construction, so a cart survives
//! process restarts.
//!
//! Consumers that need to react to changes register a callback with
//! [`Cart::subscribe`]; callbacks run after each mutation with the current
//! line items.
//!
//! Failure semantics: no operation raises a user-visible error. Malformed
//! input is coerced or dropped. Corrupted cached entries are silently
//! discarded during rehydration in favor of a clean cart.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::types::id::{ProductId, parse_product_id};

/// Storage key under which the line-item set is persisted.
pub const STORAGE_KEY: &str = "cart-storage";

/// Synchronous key-to-string durable storage, the cart's only collaborator.
///
/// Implementations are expected to be reliable and available; this is
/// single-device, single-shopper convenience state with no conflict
/// resolution.
pub trait CartStorage {
    /// Fetch the value stored under `key`, if any.
    fn load(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn store(&self, key: &str, value: &str);
}

impl<T: CartStorage + ?Sized> CartStorage for Rc<T> {
    fn load(&self, key: &str) -> Option<String> {
        (**self).load(key)
    }

    fn store(&self, key: &str, value: &str) {
        (**self).store(key, value);
    }
}

/// In-memory [`CartStorage`] backend for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    cells: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self, key: &str) -> Option<String> {
        self.cells.borrow().get(key).cloned()
    }

    fn store(&self, key: &str, value: &str) {
        self.cells.borrow_mut().insert(key.to_owned(), value.to_owned());
    }
}

/// A line in the cart: one catalog product plus how many of it.
///
/// `title`, `price`, and `image_url` are snapshots taken when the product is
/// first added; later adds of the same product only bump `quantity`.
/// `price` already includes any variant price adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub title: String,
    #[serde(deserialize_with = "deserialize_price")]
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
    pub quantity: u32,
    #[serde(
        default,
        rename = "selectedVariant",
        deserialize_with = "deserialize_variant",
        skip_serializing_if = "Option::is_none"
    )]
    pub selected_variant: Option<String>,
}

impl CartItem {
    /// Line subtotal: unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Candidate for [`Cart::add_item`]: a [`CartItem`] without a quantity.
///
/// Deserialization coerces `price` from numeric strings (form inputs) and
/// discards a `selectedVariant` that is not a plain string, so structured
/// variant descriptors never reach storage.
#[derive(Debug, Clone, Deserialize)]
pub struct CartItemInput {
    pub id: ProductId,
    pub title: String,
    #[serde(deserialize_with = "deserialize_price")]
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(
        default,
        rename = "selectedVariant",
        deserialize_with = "deserialize_variant"
    )]
    pub selected_variant: Option<String>,
}

/// Coerce a JSON value into a price.
///
/// Numbers and numeric strings are accepted; everything else is rejected.
fn coerce_price(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n.to_string().parse().ok(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Serde helper: deserialize a price from a JSON number or numeric string.
///
/// For use with `#[serde(deserialize_with = ...)]` on any wire type that
/// accepts prices from form input.
pub fn deserialize_price<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    coerce_price(&value).ok_or_else(|| serde::de::Error::custom("price must be numeric"))
}

/// Serde helper: keep a variant descriptor only when it is a plain string.
pub fn deserialize_variant<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

type Subscriber = Box<dyn Fn(&[CartItem])>;

/// The shopper's pending selections, durable across reloads.
///
/// Line items are keyed by product id alone: adding the same product with a
/// different `selected_variant` merges quantity into the existing line and
/// keeps the first variant descriptor. See DESIGN.md before "fixing" this.
pub struct Cart {
    items: Vec<CartItem>,
    storage: Box<dyn CartStorage>,
    subscribers: Vec<Subscriber>,
}

impl Cart {
    /// Construct a cart over `storage`, rehydrating any persisted item set.
    ///
    /// Entries whose `id`, `title`, or `price` are missing or unparsable are
    /// dropped; a cached `selectedVariant` that is not a plain string
    /// becomes absent.
    #[must_use]
    pub fn new(storage: Box<dyn CartStorage>) -> Self {
        let items = storage
            .load(STORAGE_KEY)
            .map(|raw| rehydrate(&raw))
            .unwrap_or_default();

        Self {
            items,
            storage,
            subscribers: Vec::new(),
        }
    }

    /// The current line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart holds no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of `price * quantity` over all line items.
    ///
    /// Always recomputed from current state, never cached.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    /// Add a product to the cart.
    ///
    /// If a line item with the same product id already exists, its quantity
    /// is incremented and every other field keeps the first-inserted
    /// snapshot. Otherwise a new line with quantity 1 is inserted.
    pub fn add_item(&mut self, input: CartItemInput) {
        if let Some(existing) = self.items.iter_mut().find(|item| item.id == input.id) {
            existing.quantity += 1;
        } else {
            self.items.push(CartItem {
                id: input.id,
                title: input.title,
                price: input.price,
                image_url: input.image_url,
                quantity: 1,
                selected_variant: input.selected_variant,
            });
        }
        self.commit();
    }

    /// Remove the line item for `id`. A no-op when the product is not in
    /// the cart.
    pub fn remove_item(&mut self, id: ProductId) {
        self.items.retain(|item| item.id != id);
        self.commit();
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.commit();
    }

    /// Register a callback invoked after every mutation with the current
    /// line items.
    pub fn subscribe(&mut self, callback: impl Fn(&[CartItem]) + 'static) {
        self.subscribers.push(Box::new(callback));
    }

    /// Persist the item set and notify subscribers.
    fn commit(&self) {
        if let Ok(json) = serde_json::to_string(&self.items) {
            self.storage.store(STORAGE_KEY, &json);
        }
        for subscriber in &self.subscribers {
            subscriber(&self.items);
        }
    }
}

/// Parse a persisted item set, dropping anything malformed.
fn rehydrate(raw: &str) -> Vec<CartItem> {
    let Ok(Value::Array(entries)) = serde_json::from_str::<Value>(raw) else {
        return Vec::new();
    };
    entries.iter().filter_map(revive_entry).collect()
}

fn revive_entry(entry: &Value) -> Option<CartItem> {
    let id = parse_product_id(entry.get("id")?.as_str()?)?;
    let title = entry.get("title")?.as_str()?;
    if title.is_empty() {
        return None;
    }
    let price = coerce_price(entry.get("price")?)?;

    let quantity = entry
        .get("quantity")
        .and_then(Value::as_u64)
        .and_then(|q| u32::try_from(q).ok())
        .map_or(1, |q| q.max(1));

    Some(CartItem {
        id,
        title: title.to_owned(),
        price,
        image_url: entry
            .get("image_url")
            .and_then(Value::as_str)
            .map(str::to_owned),
        quantity,
        selected_variant: entry
            .get("selectedVariant")
            .and_then(Value::as_str)
            .map(str::to_owned),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn input(id: ProductId, title: &str, price: i64) -> CartItemInput {
        CartItemInput {
            id,
            title: title.to_owned(),
            price: Decimal::from(price),
            image_url: None,
            selected_variant: None,
        }
    }

    fn cart_with_shared_storage() -> (Cart, Rc<MemoryStorage>) {
        let storage = Rc::new(MemoryStorage::new());
        let cart = Cart::new(Box::new(Rc::clone(&storage)));
        (cart, storage)
    }

    #[test]
    fn test_starts_empty() {
        let (cart, _) = cart_with_shared_storage();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_add_inserts_with_quantity_one() {
        let (mut cart, _) = cart_with_shared_storage();
        let id = ProductId::generate();

        cart.add_item(input(id, "Producto 1", 100));

        assert_eq!(cart.len(), 1);
        let item = &cart.items()[0];
        assert_eq!(item.id, id);
        assert_eq!(item.quantity, 1);
        assert_eq!(item.price, Decimal::from(100));
    }

    #[test]
    fn test_merge_quantity_equals_add_count_first_snapshot_wins() {
        let (mut cart, _) = cart_with_shared_storage();
        let id = ProductId::generate();

        cart.add_item(input(id, "Primera", 100));
        let mut second = input(id, "Renamed", 999);
        second.image_url = Some("https://example.com/other.jpg".to_owned());
        cart.add_item(second);
        cart.add_item(input(id, "Renamed again", 1));

        assert_eq!(cart.len(), 1);
        let item = &cart.items()[0];
        assert_eq!(item.quantity, 3);
        assert_eq!(item.title, "Primera");
        assert_eq!(item.price, Decimal::from(100));
        assert_eq!(item.image_url, None);
    }

    #[test]
    fn test_merge_ignores_selected_variant() {
        // Keyed on product id alone: a different variant of the same product
        // merges into the existing line and the first descriptor sticks.
        let (mut cart, _) = cart_with_shared_storage();
        let id = ProductId::generate();

        let mut small = input(id, "Camisa", 75);
        small.selected_variant = Some("Talla: S".to_owned());
        cart.add_item(small);

        let mut medium = input(id, "Camisa", 75);
        medium.selected_variant = Some("Talla: M".to_owned());
        cart.add_item(medium);

        assert_eq!(cart.len(), 1);
        let item = &cart.items()[0];
        assert_eq!(item.quantity, 2);
        assert_eq!(item.selected_variant.as_deref(), Some("Talla: S"));
    }

    #[test]
    fn test_price_coerced_from_string_input() {
        let json = format!(
            r#"{{"id":"{}","title":"Producto 1","price":"100","image_url":null}}"#,
            ProductId::generate()
        );
        let parsed: CartItemInput = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.price, Decimal::from(100));
    }

    #[test]
    fn test_non_numeric_price_rejected() {
        let json = format!(
            r#"{{"id":"{}","title":"Producto 1","price":"gratis"}}"#,
            ProductId::generate()
        );
        assert!(serde_json::from_str::<CartItemInput>(&json).is_err());
    }

    #[test]
    fn test_structured_variant_discarded() {
        let json = format!(
            r#"{{"id":"{}","title":"Camisa","price":75,"selectedVariant":{{"type":"Size","value":"M"}}}}"#,
            ProductId::generate()
        );
        let parsed: CartItemInput = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.selected_variant, None);

        let json = format!(
            r#"{{"id":"{}","title":"Camisa","price":75,"selectedVariant":"Talla: M"}}"#,
            ProductId::generate()
        );
        let parsed: CartItemInput = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.selected_variant.as_deref(), Some("Talla: M"));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (mut cart, _) = cart_with_shared_storage();
        let kept = ProductId::generate();
        cart.add_item(input(kept, "Producto 1", 100));

        cart.remove_item(ProductId::generate());
        assert_eq!(cart.len(), 1);

        cart.remove_item(kept);
        cart.remove_item(kept);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total_recomputed_from_state() {
        let (mut cart, _) = cart_with_shared_storage();
        let a = ProductId::generate();

        cart.add_item(input(a, "Hamburguesa Doble", 50));
        cart.add_item(input(a, "Hamburguesa Doble", 50));
        cart.add_item(input(ProductId::generate(), "Pizza Familiar", 100));

        assert_eq!(cart.total(), Decimal::from(200));
    }

    #[test]
    fn test_clear_empties_cart_and_storage() {
        let (mut cart, storage) = cart_with_shared_storage();
        cart.add_item(input(ProductId::generate(), "Producto 1", 100));

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(storage.load(STORAGE_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn test_persists_on_every_mutation_and_rehydrates() {
        let storage = Rc::new(MemoryStorage::new());
        let id = ProductId::generate();
        {
            let mut cart = Cart::new(Box::new(Rc::clone(&storage)));
            cart.add_item(input(id, "Producto 1", 100));
            cart.add_item(input(id, "Producto 1", 100));
        }

        let revived = Cart::new(Box::new(Rc::clone(&storage)));
        assert_eq!(revived.len(), 1);
        assert_eq!(revived.items()[0].quantity, 2);
        assert_eq!(revived.items()[0].price, Decimal::from(100));
    }

    #[test]
    fn test_rehydration_drops_malformed_entries() {
        let storage = Rc::new(MemoryStorage::new());
        let good = ProductId::generate();
        storage.store(
            STORAGE_KEY,
            &format!(
                r#"[
                    {{"id":"{good}","title":"Valida","price":"25","quantity":2}},
                    {{"id":"not-a-uuid","title":"Sin id","price":10,"quantity":1}},
                    {{"id":"{}","price":10,"quantity":1}},
                    {{"id":"{}","title":"Sin precio","quantity":1}},
                    {{"id":"{}","title":"Precio raro","price":{{"amount":5}},"quantity":1}},
                    "garbage"
                ]"#,
                ProductId::generate(),
                ProductId::generate(),
                ProductId::generate(),
            ),
        );

        let cart = Cart::new(Box::new(Rc::clone(&storage)));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].id, good);
        assert_eq!(cart.items()[0].price, Decimal::from(25));
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_rehydration_coerces_structured_variant_to_absent() {
        let storage = Rc::new(MemoryStorage::new());
        storage.store(
            STORAGE_KEY,
            &format!(
                r#"[{{"id":"{}","title":"Camisa","price":75,"quantity":1,"selectedVariant":{{"type":"Size","value":"M"}}}}]"#,
                ProductId::generate()
            ),
        );

        let cart = Cart::new(Box::new(Rc::clone(&storage)));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].selected_variant, None);
    }

    #[test]
    fn test_corrupt_storage_yields_empty_cart() {
        let storage = Rc::new(MemoryStorage::new());
        storage.store(STORAGE_KEY, "{not json");

        let cart = Cart::new(Box::new(Rc::clone(&storage)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_subscribers_run_after_each_mutation() {
        let (mut cart, _) = cart_with_shared_storage();
        let seen: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        cart.subscribe(move |items| sink.borrow_mut().push(items.len()));

        let id = ProductId::generate();
        cart.add_item(input(id, "Producto 1", 100));
        cart.add_item(input(ProductId::generate(), "Producto 2", 200));
        cart.remove_item(id);
        cart.clear();

        assert_eq!(*seen.borrow(), vec![1, 2, 1, 0]);
    }
}
