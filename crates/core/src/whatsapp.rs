//! Order message composition and `wa.me` deep links.
//!
//! Renders cart contents into a human-readable order summary and a link that
//! opens a WhatsApp chat with the merchant, pre-filled with that summary.
//! Two variants exist:
//!
//! - [`order_link`] - the quick variant used straight from the cart sidebar:
//!   the shopper fills in their delivery details inside the chat.
//! - [`checkout_link`] - the structured variant used after the checkout
//!   form: customer details are already populated from form input.
//!
//! This layer trusts the cart's invariants and performs no validation of
//! quantities, titles, or prices. Destination phones are always run through
//! [`crate::types::phone::normalize`] before landing in the URL.

use rust_decimal::Decimal;

use crate::cart::CartItem;
use crate::types::phone;

/// Base URL of the WhatsApp click-to-chat scheme.
pub const WHATSAPP_BASE_URL: &str = "https://wa.me";

/// One order line as rendered into a message.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub title: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub variant: Option<String>,
}

impl OrderLine {
    /// Line subtotal: unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

impl From<&CartItem> for OrderLine {
    fn from(item: &CartItem) -> Self {
        Self {
            title: item.title.clone(),
            quantity: item.quantity,
            unit_price: item.price,
            variant: item.selected_variant.clone(),
        }
    }
}

/// Customer details collected by the checkout form.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerDetails {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Format an amount with the quetzal prefix, without padded decimals.
fn q_amount(amount: Decimal) -> String {
    format!("Q{}", amount.normalize())
}

/// Build the quick order summary for a set of lines.
///
/// Ends with an empty delivery-details block the shopper fills in within
/// the chat before sending.
#[must_use]
pub fn order_message(lines: &[OrderLine]) -> String {
    let total: Decimal = lines.iter().map(OrderLine::subtotal).sum();

    let mut message = String::from("Hola! \u{1f44b} Quiero hacer un pedido:\n\n");
    for line in lines {
        message.push_str(&format!(
            "\u{25aa}\u{fe0f} *{}x {}* - {}\n",
            line.quantity,
            line.title,
            q_amount(line.subtotal()),
        ));
    }
    message.push_str(&format!(
        "\n\u{1f4b0} *TOTAL A PAGAR: {}*\n",
        q_amount(total)
    ));
    message.push_str("\n\u{1f4cd} *Mis Datos de Env\u{ed}o:*");
    message.push_str("\nNombre: ");
    message.push_str("\nDirecci\u{f3}n: ");
    message.push_str("\nNota Adicional: ");
    message
}

/// Build the quick order link: [`order_message`] addressed to `phone`.
#[must_use]
pub fn order_link(phone: &str, lines: &[OrderLine]) -> String {
    link(phone, &order_message(lines))
}

/// Build the structured checkout summary with populated customer details.
///
/// Amounts render with two decimals, matching what the merchant sees on
/// the dashboard.
#[must_use]
pub fn checkout_message(
    customer: &CustomerDetails,
    lines: &[OrderLine],
    total: Decimal,
) -> String {
    let mut message = String::from("*NUEVO PEDIDO*\n\n");
    message.push_str(&format!("*Cliente:* {}\n", customer.name));
    if let Some(phone) = customer.phone.as_deref().filter(|p| !p.is_empty()) {
        message.push_str(&format!("*Telefono:* {phone}\n"));
    }
    if let Some(address) = customer.address.as_deref().filter(|a| !a.is_empty()) {
        message.push_str(&format!("*Direccion:* {address}\n"));
    }
    message.push_str("\n-------------------\n\n");
    message.push_str("*PRODUCTOS:*\n");

    for (index, line) in lines.iter().enumerate() {
        message.push_str(&format!("{}. {}\n", index + 1, line.title));
        message.push_str(&format!("   Cantidad: {}\n", line.quantity));
        message.push_str(&format!("   Precio: Q{:.2}\n", line.unit_price));
        if let Some(variant) = line.variant.as_deref() {
            message.push_str(&format!("   Variante: {variant}\n"));
        }
        message.push_str(&format!("   Subtotal: Q{:.2}\n\n", line.subtotal()));
    }

    message.push_str("-------------------\n");
    message.push_str(&format!("*TOTAL: Q{total:.2}*\n\n"));
    message.push_str("Gracias por tu compra!");
    message
}

/// Build the structured checkout link addressed to the store's phone.
#[must_use]
pub fn checkout_link(
    store_phone: &str,
    customer: &CustomerDetails,
    lines: &[OrderLine],
    total: Decimal,
) -> String {
    link(store_phone, &checkout_message(customer, lines, total))
}

/// Percent-encode `message` and address it to the normalized `phone`.
fn link(phone: &str, message: &str) -> String {
    format!(
        "{WHATSAPP_BASE_URL}/{}?text={}",
        phone::normalize(Some(phone)),
        urlencoding::encode(message),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(title: &str, price: i64, quantity: u32) -> OrderLine {
        OrderLine {
            title: title.to_owned(),
            quantity,
            unit_price: Decimal::from(price),
            variant: None,
        }
    }

    fn sample_lines() -> Vec<OrderLine> {
        vec![
            line("Hamburguesa Doble", 50, 2),
            line("Pizza Familiar", 100, 1),
        ]
    }

    fn decoded_text(link: &str) -> String {
        let (_, encoded) = link.split_once("?text=").unwrap();
        urlencoding::decode(encoded).unwrap().into_owned()
    }

    #[test]
    fn test_order_link_shape() {
        let link = order_link("12345678", &sample_lines());
        assert!(link.starts_with("https://wa.me/50212345678?text="));
    }

    #[test]
    fn test_order_link_normalizes_phone() {
        let link = order_link("+502 1234-5678", &sample_lines());
        assert!(link.contains("wa.me/50212345678"));
    }

    #[test]
    fn test_order_message_lines_and_totals() {
        let message = decoded_text(&order_link("12345678", &sample_lines()));

        assert!(message.contains("2x Hamburguesa Doble"));
        assert!(message.contains("1x Pizza Familiar"));
        // line subtotals: 2 x 50 and 1 x 100
        assert!(message.contains("*2x Hamburguesa Doble* - Q100"));
        assert!(message.contains("*1x Pizza Familiar* - Q100"));
        assert!(message.contains("TOTAL A PAGAR: Q200"));
    }

    #[test]
    fn test_order_message_greeting_and_delivery_block() {
        let message = order_message(&sample_lines());

        assert!(message.starts_with("Hola! \u{1f44b}"));
        assert!(message.contains("Mis Datos de Env\u{ed}o"));
        assert!(message.contains("Nombre: "));
        assert!(message.contains("Direcci\u{f3}n: "));
        assert!(message.contains("Nota Adicional: "));
    }

    #[test]
    fn test_order_message_empty_cart() {
        let message = order_message(&[]);
        assert!(message.contains("TOTAL A PAGAR: Q0"));
    }

    #[test]
    fn test_decimal_prices_render_unpadded() {
        let lines = vec![OrderLine {
            title: "Producto".to_owned(),
            quantity: 1,
            unit_price: "99.99".parse().unwrap(),
            variant: None,
        }];
        let message = order_message(&lines);
        assert!(message.contains("Q99.99"));
    }

    #[test]
    fn test_encoded_text_has_no_raw_spaces() {
        let link = order_link("12345678", &sample_lines());
        let (_, encoded) = link.split_once("?text=").unwrap();
        assert!(!encoded.contains(' '));
        assert!(encoded.contains("%20"));
    }

    #[test]
    fn test_checkout_message_structure() {
        let customer = CustomerDetails {
            name: "Ana".to_owned(),
            phone: Some("5555 1234".to_owned()),
            address: Some("Zona 1".to_owned()),
        };
        let lines = vec![OrderLine {
            title: "Camisa".to_owned(),
            quantity: 2,
            unit_price: Decimal::from(75),
            variant: Some("Talla: M".to_owned()),
        }];
        let message = checkout_message(&customer, &lines, Decimal::from(150));

        assert!(message.starts_with("*NUEVO PEDIDO*"));
        assert!(message.contains("*Cliente:* Ana"));
        assert!(message.contains("*Telefono:* 5555 1234"));
        assert!(message.contains("*Direccion:* Zona 1"));
        assert!(message.contains("1. Camisa"));
        assert!(message.contains("Cantidad: 2"));
        assert!(message.contains("Precio: Q75.00"));
        assert!(message.contains("Variante: Talla: M"));
        assert!(message.contains("Subtotal: Q150.00"));
        assert!(message.contains("*TOTAL: Q150.00*"));
        assert!(message.ends_with("Gracias por tu compra!"));
    }

    #[test]
    fn test_checkout_message_omits_blank_optionals() {
        let customer = CustomerDetails {
            name: "Ana".to_owned(),
            phone: None,
            address: Some(String::new()),
        };
        let message = checkout_message(&customer, &[], Decimal::ZERO);

        assert!(!message.contains("*Telefono:*"));
        assert!(!message.contains("*Direccion:*"));
    }

    #[test]
    fn test_checkout_link_addresses_store_phone() {
        let customer = CustomerDetails {
            name: "Ana".to_owned(),
            phone: None,
            address: None,
        };
        let link = checkout_link("12345678", &customer, &[], Decimal::ZERO);
        assert!(link.starts_with("https://wa.me/50212345678?text="));
    }

    #[test]
    fn test_cart_checkout_flow_end_to_end() {
        use crate::cart::{Cart, CartItemInput, MemoryStorage};
        use crate::types::ProductId;

        let mut cart = Cart::new(Box::new(MemoryStorage::new()));
        let a = CartItemInput {
            id: ProductId::generate(),
            title: "Producto A".to_owned(),
            price: Decimal::from(25),
            image_url: None,
            selected_variant: None,
        };
        cart.add_item(a.clone());
        cart.add_item(a);
        cart.add_item(CartItemInput {
            id: ProductId::generate(),
            title: "Producto B".to_owned(),
            price: Decimal::from(40),
            image_url: None,
            selected_variant: None,
        });

        assert_eq!(cart.total(), Decimal::from(90));

        let customer = CustomerDetails {
            name: "Ana".to_owned(),
            phone: None,
            address: None,
        };
        let lines: Vec<OrderLine> = cart.items().iter().map(OrderLine::from).collect();
        let link = checkout_link("12345678", &customer, &lines, cart.total());

        let message = decoded_text(&link);
        assert!(message.contains("*Cliente:* Ana"));
        assert!(message.contains("*TOTAL: Q90.00*"));

        // The cart is cleared only after a confirmed submission.
        cart.clear();
        assert!(cart.is_empty());
    }
}
