use std::sync::LazyLock;

use fake::Fake;
use fake::faker::address::en::{CityName, SecondaryAddress, StateName, StreetName};
use fake::faker::company::en::{CatchPhrase, CompanyName, Industry};
use fake::faker::currency::en::CurrencyCode;
use fake::faker::internet::en::{SafeEmail, Username};
use fake::faker::job::en::Title as JobTitle;
use fake::faker::lorem::en::{Paragraph, Sentence, Words};
use fake::faker::name::en::Name;

use super::generic::{product_name, street_address, web_url};
use super::{EntityMatcher, Produce, alphanumeric, compile, pick_str};

const USERS: &str = r"\b(user|customer|member|account|person|people|employee|author|client|patient|student|profile)s?\b";
const PRODUCTS: &str = r"\b(product|item|sku|inventory|catalog|good)s?\b";
const ORDERS: &str = r"\b(order|invoice|cart|purchase|payment|transaction|shipment)s?\b";
const COMPANIES: &str = r"\b(company|companies|organi[sz]ation|business|vendor|supplier|merchant|brand)s?\b";
const POSTS: &str = r"\b(post|article|blog|comment|review|story|page|note)s?\b";
const PLACES: &str = r"\b(address|location|venue|store|shop|warehouse|branch|office)(es|s)?\b";
const EVENTS: &str = r"\b(event|meeting|appointment|booking|reservation|session)s?\b";

const fn rule(
    entity: &'static str,
    field: &'static str,
    produce: Produce,
) -> (&'static str, &'static str, Produce) {
    (entity, field, produce)
}

pub(super) const TABLE: &[(&str, &str, Produce)] = &[
    rule(USERS, r"email", |rng| SafeEmail().fake_with_rng(rng)),
    rule(USERS, r"\b(user ?name|handle|login|nick ?name)\b", |rng| {
        Username().fake_with_rng(rng)
    }),
    rule(USERS, r"^(display |full )?name$", |rng| Name().fake_with_rng(rng)),
    rule(USERS, r"\b(bio|about)\b", |rng| Paragraph(1..3).fake_with_rng(rng)),
    rule(USERS, r"\brole\b", |rng| {
        pick_str(rng, &["admin", "editor", "member", "viewer"])
    }),
    rule(USERS, r"\bstatus\b", |rng| {
        pick_str(rng, &["active", "inactive", "pending", "suspended"])
    }),
    rule(USERS, r"\b(title|position)\b", |rng| JobTitle().fake_with_rng(rng)),
    rule(PRODUCTS, r"^(name|title)$", product_name),
    rule(PRODUCTS, r"\bdescription\b", |rng| Sentence(6..14).fake_with_rng(rng)),
    rule(PRODUCTS, r"\b(sku|code)\b", |rng| alphanumeric(rng, 10).to_uppercase()),
    rule(PRODUCTS, r"\b(brand|manufacturer|vendor)\b", |rng| {
        CompanyName().fake_with_rng(rng)
    }),
    rule(PRODUCTS, r"\bcategory\b", |rng| {
        pick_str(rng, &["apparel", "books", "electronics", "grocery", "home", "toys"])
    }),
    rule(PRODUCTS, r"\bstatus\b", |rng| {
        pick_str(rng, &["active", "discontinued", "draft", "out of stock"])
    }),
    rule(ORDERS, r"\bstatus\b", |rng| {
        pick_str(
            rng,
            &["pending", "paid", "shipped", "delivered", "cancelled", "refunded"],
        )
    }),
    rule(ORDERS, r"\b(number|reference|code)\b", |rng| {
        format!("ORD-{}", alphanumeric(rng, 8).to_uppercase())
    }),
    rule(ORDERS, r"\bcurrency\b", |rng| CurrencyCode().fake_with_rng(rng)),
    rule(ORDERS, r"\b(method|payment method)\b", |rng| {
        pick_str(rng, &["card", "bank transfer", "cash", "paypal", "voucher"])
    }),
    rule(ORDERS, r"\b(notes?|instructions)\b", |rng| Sentence(4..10).fake_with_rng(rng)),
    rule(ORDERS, r"\btracking( (number|code))?\b", |rng| {
        format!("1Z{}", alphanumeric(rng, 16).to_uppercase())
    }),
    rule(COMPANIES, r"^name$", |rng| CompanyName().fake_with_rng(rng)),
    rule(COMPANIES, r"\b(industry|sector)\b", |rng| Industry().fake_with_rng(rng)),
    rule(COMPANIES, r"\b(slogan|tagline|motto)\b", |rng| CatchPhrase().fake_with_rng(rng)),
    rule(COMPANIES, r"\b(website|url|homepage)\b", web_url),
    rule(POSTS, r"\b(title|headline)\b", |rng| Sentence(3..8).fake_with_rng(rng)),
    rule(POSTS, r"\b(body|content|text)\b", |rng| Paragraph(3..6).fake_with_rng(rng)),
    rule(POSTS, r"\bslug\b", |rng| {
        let words: Vec<String> = Words(2..5).fake_with_rng(rng);
        words.join("-").to_lowercase()
    }),
    rule(POSTS, r"\bstatus\b", |rng| {
        pick_str(rng, &["draft", "published", "archived"])
    }),
    rule(PLACES, r"^name$", |rng| {
        let city: String = CityName().fake_with_rng(rng);
        format!("{city} {}", pick_str(rng, &["Center", "Hub", "Plaza", "Point"]))
    }),
    rule(PLACES, r"\b(street|line ?1)\b", street_address),
    rule(PLACES, r"\bline ?2\b", |rng| SecondaryAddress().fake_with_rng(rng)),
    rule(PLACES, r"\b(region|state)\b", |rng| StateName().fake_with_rng(rng)),
    rule(EVENTS, r"^(name|title)$", |rng| {
        let words: Vec<String> = Words(2..4).fake_with_rng(rng);
        let street: String = StreetName().fake_with_rng(rng);
        format!("{} at {street}", words.join(" "))
    }),
    rule(EVENTS, r"\b(location|venue|place)\b", |rng| CityName().fake_with_rng(rng)),
    rule(EVENTS, r"\bstatus\b", |rng| {
        pick_str(rng, &["scheduled", "confirmed", "completed", "cancelled"])
    }),
];

pub(super) static MATCHERS: LazyLock<Vec<EntityMatcher>> = LazyLock::new(|| {
    TABLE
        .iter()
        .filter_map(|(entity, field, produce)| {
            Some(EntityMatcher {
                entity: compile(entity)?,
                field: compile(field)?,
                produce: *produce,
            })
        })
        .collect()
});

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::super::{entity_text, normalize_key};

    #[test]
    fn entity_rules_win_over_field_name_alone() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let status = entity_text(&normalize_key("Order"), "status", &mut rng).expect("order status");
        assert!(
            ["pending", "paid", "shipped", "delivered", "cancelled", "refunded"]
                .contains(&status.as_str())
        );

        let number = entity_text(&normalize_key("PurchaseOrder"), "number", &mut rng)
            .expect("order number");
        assert!(number.starts_with("ORD-"));
        assert_eq!(number.len(), 12);
    }

    #[test]
    fn unknown_entities_fall_through() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert!(entity_text("telemetry", "status", &mut rng).is_none());
        assert!(entity_text("user", "favourite planet", &mut rng).is_none());
    }

    #[test]
    fn slugs_are_kebab_case() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let slug = entity_text("article", "slug", &mut rng).expect("slug");
        assert!(!slug.contains(' '));
        assert_eq!(slug, slug.to_lowercase());
    }
}
