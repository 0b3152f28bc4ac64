//! User-facing texts and keyboards of each screen.

use crate::domain::catalog::{CartLine, Product, ProductDetail};
use crate::domain::delivery::{Coordinates, DeliveryDecision, NearestPizzeria, DELIVERY_TIERS};

use super::effect::{Button, Keyboard};
use super::event::payloads;

pub const MENU_PROMPT: &str = "Выберите продукт:";
pub const EMPTY_CART: &str = "Корзина пуста";
pub const LOCATION_PROMPT: &str = "Хорошо, пришлите нам Ваш адрес текстом или геолокацию.";
pub const ADDRESS_NOT_RECOGNIZED: &str =
    "Не могу распознать адрес. Пожалуйста, проверьте правильность ввода";
pub const ORDER_ACCEPTED: &str = "Ваш заказ принят. Ожидайте доставки";
pub const FOLLOW_UP: &str = "Приятного аппетита! *место для рекламы*\n\n\
    *сообщение что делать если пицца не пришла*";

const CART_LABEL: &str = "Корзина";
const ADD_TO_CART_LABEL: &str = "Положить в корзину";
const BACK_LABEL: &str = "Назад";
const TO_MENU_LABEL: &str = "В меню";
const PAY_LABEL: &str = "Оплатить";
const SHARE_LOCATION_LABEL: &str = "Отправить геопозицию";
const SHIPPING_LABEL: &str = "Доставка";
const PICKUP_LABEL: &str = "Самовывоз";

/// Product list with a trailing cart shortcut.
pub fn menu_keyboard(products: &[Product]) -> Keyboard {
    Keyboard::column(
        products
            .iter()
            .map(|p| Button::new(p.name.clone(), p.id.clone()))
            .chain(std::iter::once(Button::new(CART_LABEL, payloads::CART))),
    )
}

pub fn product_caption(product: &ProductDetail) -> String {
    format!(
        "{}\nСтоимость: {}\n\n{}",
        product.name,
        product.formatted_price,
        product.description.trim()
    )
}

pub fn product_keyboard() -> Keyboard {
    Keyboard::Inline(vec![vec![
        Button::new(ADD_TO_CART_LABEL, payloads::ADD_TO_CART),
        Button::new(BACK_LABEL, payloads::BACK),
    ]])
}

/// Itemized cart text; the total is appended when the cart is not empty.
pub fn cart_text(lines: &[CartLine], total: Option<&str>) -> String {
    if lines.is_empty() {
        return EMPTY_CART.to_string();
    }
    let mut blocks: Vec<String> = lines
        .iter()
        .map(|line| {
            format!(
                "{}\n{}\n{} пицц в корзине на сумму {}",
                line.name,
                line.description.trim(),
                line.quantity,
                line.formatted_total
            )
        })
        .collect();
    if let Some(total) = total {
        blocks.push(format!("К оплате: {}", total));
    }
    blocks.join("\n\n")
}

/// One remove button per line, a way back to the menu, and payment when
/// there is something to pay for.
pub fn cart_keyboard(lines: &[CartLine]) -> Keyboard {
    let mut buttons: Vec<Button> = lines
        .iter()
        .map(|line| Button::new(format!("Убрать из корзины '{}'", line.name), line.id.clone()))
        .collect();
    buttons.push(Button::new(TO_MENU_LABEL, payloads::MENU));
    if !lines.is_empty() {
        buttons.push(Button::new(PAY_LABEL, payloads::PAYMENT));
    }
    Keyboard::column(buttons)
}

pub fn location_keyboard() -> Keyboard {
    Keyboard::RequestLocation {
        label: SHARE_LOCATION_LABEL.to_string(),
    }
}

pub fn delivery_terms_text(decision: DeliveryDecision, nearest: &NearestPizzeria) -> String {
    match decision {
        DeliveryDecision::PickupSuggested => format!(
            "Может, заберёте пиццу из нашей пиццерии неподалёку? \
             Она всего в {} метрах от вас! Вот её адрес: {}.\n\
             А можем и бесплатно доставить, нам не сложно",
            nearest.distance_m().round() as i64,
            nearest.address
        ),
        DeliveryDecision::Delivery { price_rubles } if price_rubles == DELIVERY_TIERS[0].price_rubles => {
            format!(
                "Похоже, придётся ехать до вас на самокате. Доставка будет стоить {} рублей. \
                 Доставляем или самовывоз?\n\nАдрес для самовывоза:\n{}",
                price_rubles, nearest.address
            )
        }
        DeliveryDecision::Delivery { price_rubles } => format!(
            "Доставка будет стоить {} рублей. Доставляем или самовывоз?\n\n\
             Адрес для самовывоза:\n{}",
            price_rubles, nearest.address
        ),
        DeliveryDecision::OutOfRange => format!(
            "Простите, но так далеко мы пиццу не доставим. \
             Ближайшая пиццерия аж в {} километрах от вас!",
            nearest.rounded_km()
        ),
    }
}

/// Delivery/pickup choice; absent when the customer is out of range.
pub fn shipping_keyboard(decision: DeliveryDecision) -> Option<Keyboard> {
    decision.offers_shipping().then(|| {
        Keyboard::column([
            Button::new(SHIPPING_LABEL, payloads::SHIPPING),
            Button::new(PICKUP_LABEL, payloads::PICKUP),
        ])
    })
}

pub fn pickup_text(address: &str) -> String {
    format!("Адрес для самовывоза:\n{}", address)
}

/// What the courier receives.
pub fn courier_order_text(cart: &str, customer: Option<&Coordinates>) -> String {
    match customer {
        Some(c) => format!(
            "{}\n\nКоординаты клиента: {:.6}, {:.6}",
            cart,
            c.latitude(),
            c.longitude()
        ),
        None => cart.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, name: &str) -> CartLine {
        CartLine {
            id: id.to_string(),
            product_id: format!("product-{}", id),
            name: name.to_string(),
            description: "  Тонкое тесто  ".to_string(),
            quantity: 2,
            formatted_total: "1 200 ₽".to_string(),
        }
    }

    fn nearest(km: f64) -> NearestPizzeria {
        NearestPizzeria {
            address: "Москва, ул. Пушкина, 1".to_string(),
            distance_km: km,
        }
    }

    mod menu {
        use super::*;

        #[test]
        fn lists_products_then_cart() {
            let products = vec![
                Product {
                    id: "p1".to_string(),
                    name: "Маргарита".to_string(),
                },
                Product {
                    id: "p2".to_string(),
                    name: "Пепперони".to_string(),
                },
            ];
            assert_eq!(menu_keyboard(&products).payloads(), vec!["p1", "p2", "cart"]);
        }

        #[test]
        fn empty_catalog_still_offers_cart() {
            assert_eq!(menu_keyboard(&[]).payloads(), vec!["cart"]);
        }

        #[test]
        fn caption_contains_name_price_and_description() {
            let caption = product_caption(&ProductDetail {
                id: "p1".to_string(),
                name: "Маргарита".to_string(),
                description: "Сыр и томаты".to_string(),
                formatted_price: "500 ₽".to_string(),
            });
            assert_eq!(caption, "Маргарита\nСтоимость: 500 ₽\n\nСыр и томаты");
        }
    }

    mod cart {
        use super::*;

        #[test]
        fn empty_cart_has_no_payment_button() {
            assert_eq!(cart_text(&[], None), EMPTY_CART);
            assert_eq!(cart_keyboard(&[]).payloads(), vec!["/start"]);
        }

        #[test]
        fn itemizes_lines_and_appends_total() {
            let text = cart_text(&[line("l1", "Маргарита")], Some("1 200 ₽"));
            assert_eq!(
                text,
                "Маргарита\nТонкое тесто\n2 пицц в корзине на сумму 1 200 ₽\n\nК оплате: 1 200 ₽"
            );
        }

        #[test]
        fn remove_buttons_carry_line_ids() {
            let kb = cart_keyboard(&[line("l1", "A"), line("l2", "B")]);
            assert_eq!(kb.payloads(), vec!["l1", "l2", "/start", "payment"]);
        }
    }

    mod delivery_terms {
        use super::*;

        #[test]
        fn pickup_text_shows_distance_in_metres() {
            let text = delivery_terms_text(DeliveryDecision::PickupSuggested, &nearest(0.3));
            assert!(text.contains("300 метрах"));
            assert!(text.contains("ул. Пушкина"));
        }

        #[test]
        fn cheap_tier_mentions_price_and_pickup_address() {
            let decision = DeliveryDecision::for_distance(4.0);
            let text = delivery_terms_text(decision, &nearest(4.0));
            assert!(text.contains("100 рублей"));
            assert!(text.contains("Адрес для самовывоза"));
        }

        #[test]
        fn standard_tier_mentions_price() {
            let decision = DeliveryDecision::for_distance(12.0);
            let text = delivery_terms_text(decision, &nearest(12.0));
            assert!(text.contains("300 рублей"));
        }

        #[test]
        fn refusal_shows_rounded_kilometres() {
            let text = delivery_terms_text(DeliveryDecision::OutOfRange, &nearest(25.4));
            assert!(text.contains("25 километрах"));
        }

        #[test]
        fn refusal_has_no_buttons() {
            assert!(shipping_keyboard(DeliveryDecision::OutOfRange).is_none());
        }

        #[test]
        fn in_range_offers_delivery_and_pickup() {
            let kb = shipping_keyboard(DeliveryDecision::Delivery { price_rubles: 100 }).unwrap();
            assert_eq!(kb.payloads(), vec!["shipping", "pickup"]);
        }
    }

    #[test]
    fn courier_text_includes_coordinates_when_known() {
        let c = Coordinates::new(55.5, 37.25).unwrap();
        let text = courier_order_text("cart", Some(&c));
        assert!(text.starts_with("cart"));
        assert!(text.contains("55.500000, 37.250000"));
        assert_eq!(courier_order_text("cart", None), "cart");
    }
}
