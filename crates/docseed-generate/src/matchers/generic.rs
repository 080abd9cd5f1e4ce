use std::sync::LazyLock;

use chrono::{Duration, Utc};
use fake::Fake;
use fake::faker::address::en::{
    BuildingNumber, CityName, CountryName, StateName, StreetName, TimeZone, ZipCode,
};
use fake::faker::barcode::en::Isbn13;
use fake::faker::color::en::HexColor;
use fake::faker::company::en::{CatchPhrase, CompanyName};
use fake::faker::creditcard::en::CreditCardNumber;
use fake::faker::currency::en::CurrencyCode;
use fake::faker::internet::en::{IPv4, IPv6, MACAddress, SafeEmail, UserAgent, Username};
use fake::faker::job::en::Title as JobTitle;
use fake::faker::lorem::en::{Paragraph, Sentence, Word, Words};
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::faker::phone_number::en::PhoneNumber;
use rand::{Rng, RngCore};

use super::{
    Produce, TextMatcher, alphanumeric, compile, digits, entry, pick_str, upper_alpha,
};

const DEPARTMENTS: &[&str] = &[
    "Books", "Clothing", "Electronics", "Garden", "Grocery", "Health", "Home", "Music", "Outdoors",
    "Sports", "Toys",
];
const MATERIALS: &[&str] = &[
    "Bamboo", "Cotton", "Granite", "Leather", "Metal", "Plastic", "Rubber", "Steel", "Wood",
];
const PRODUCT_ADJECTIVES: &[&str] = &[
    "Ergonomic", "Handcrafted", "Licensed", "Practical", "Refined", "Rustic", "Sleek", "Smart",
    "Tasty", "Unbranded",
];
const PRODUCT_NOUNS: &[&str] = &[
    "Bike", "Chair", "Computer", "Gloves", "Hat", "Keyboard", "Lamp", "Shirt", "Shoes", "Table",
];
const CONTENT_TYPES: &[&str] = &["text/html", "application/json", "text/plain", "application/xml"];

pub(super) const TABLE: &[(&str, Produce)] = &[
    // people
    entry(r"\bfirst( name)?\b", |rng| FirstName().fake_with_rng(rng)),
    entry(r"\bmiddle( name)?\b", |rng| FirstName().fake_with_rng(rng)),
    entry(r"\b(last( name)?|surname)\b", |rng| LastName().fake_with_rng(rng)),
    entry(r"\buser ?name\b", |rng| Username().fake_with_rng(rng)),
    entry(r"\bbook ?title\b", |rng| title_case(&words(rng, 2, 5))),
    entry(r"\b(job|profession|occupation)( title)?\b", |rng| JobTitle().fake_with_rng(rng)),
    entry(r"^product( name)?$", product_name),
    entry(r"email", |rng| SafeEmail().fake_with_rng(rng)),
    entry(r"\b(ip( address)?|ipv4)\b", |rng| IPv4().fake_with_rng(rng)),
    entry(r"\bipv6\b", |rng| IPv6().fake_with_rng(rng)),
    entry(r"\bmac( address)?\b", |rng| MACAddress().fake_with_rng(rng)),
    entry(r"\bgender\b", |rng| pick_str(rng, &["female", "male"])),
    // contact
    entry(r"phone|mobile|\btel\b|\bfax\b", |rng| PhoneNumber().fake_with_rng(rng)),
    entry(r"\b(postal|post|zip) ?code\b|\bzip\b", |rng| ZipCode().fake_with_rng(rng)),
    entry(r"\btime ?zone\b", |rng| TimeZone().fake_with_rng(rng)),
    entry(r"\b(building|apartment|suite|unit)( (number|num|no))?\b", |rng| {
        BuildingNumber().fake_with_rng(rng)
    }),
    entry(r"address", street_address),
    entry(r"\bstreet\b", |rng| StreetName().fake_with_rng(rng)),
    entry(r"\bcity\b", |rng| CityName().fake_with_rng(rng)),
    entry(r"\bcounty\b", |rng| {
        let name: String = LastName().fake_with_rng(rng);
        format!("{name} County")
    }),
    entry(r"\b(state|province|region)\b", |rng| StateName().fake_with_rng(rng)),
    entry(r"\bcountry\b", |rng| CountryName().fake_with_rng(rng)),
    entry(r"\b(latitude|lat)\b", |rng| format!("{:.6}", rng.random_range(-90.0..=90.0))),
    entry(r"\b(longitude|lng|lon)\b", |rng| {
        format!("{:.6}", rng.random_range(-180.0..=180.0))
    }),
    entry(r"\bcoordinates?\b", |rng| {
        let lat: f64 = rng.random_range(-90.0..=90.0);
        let lng: f64 = rng.random_range(-180.0..=180.0);
        format!("{lat:.6},{lng:.6}")
    }),
    // web
    entry(r"\bcontent ?type\b|\bmime( type)?\b", |rng| pick_str(rng, CONTENT_TYPES)),
    entry(r"\buser ?agent\b", |rng| UserAgent().fake_with_rng(rng)),
    entry(r"\bapi ?key\b", |rng| alphanumeric(rng, 32)),
    entry(r"\b(access|refresh) ?token\b", |rng| alphanumeric(rng, 64)),
    entry(r"\bsalt\b", |rng| alphanumeric(rng, 16)),
    entry(r"\b(twitter|x|github|linkedin|facebook|instagram)\b", |rng| {
        let site = pick_str(rng, &["twitter", "github", "linkedin", "facebook", "instagram"]);
        let handle: String = Username().fake_with_rng(rng);
        format!("https://{site}.com/{handle}")
    }),
    entry(r"\b(image|avatar|photo|picture|thumbnail)( url)?\b", |rng| {
        let seed: String = Word().fake_with_rng(rng);
        format!("https://picsum.photos/seed/{seed}/640/480")
    }),
    entry(r"\bvideo\b", |rng| {
        format!("https://example.com/videos/{}", crate::generators::random_uuid(rng))
    }),
    entry(r"\baudio\b", |rng| {
        format!("https://example.com/audio/{}", crate::generators::random_uuid(rng))
    }),
    entry(r"\b(url|website|homepage|link|domain)\b", web_url),
    // finance
    entry(r"\baccount ?number\b", |rng| digits(rng, 10)),
    entry(r"\brouting ?number\b", |rng| digits(rng, 9)),
    entry(r"\biban\b", |rng| {
        format!("GB{}{}{}", digits(rng, 2), upper_alpha(rng, 4), digits(rng, 14))
    }),
    entry(r"\b(card exp(iry)?|expiration)\b", |rng| {
        let days = rng.random_range(30..=5 * 365);
        (Utc::now() + Duration::days(days)).format("%Y-%m").to_string()
    }),
    entry(r"\b(cvv|cvc|card verification)\b", |rng| digits(rng, 3)),
    entry(r"\b(credit ?card|card)( number)?\b", |rng| CreditCardNumber().fake_with_rng(rng)),
    entry(r"\bcurrency( code)?\b", |rng| CurrencyCode().fake_with_rng(rng)),
    entry(r"\b(price|cost|amount|total|fee)\b", |rng| {
        format!("{:.2}", rng.random_range(0.99..=999.99))
    }),
    entry(r"\btransaction( type)?\b", |rng| {
        pick_str(rng, &["deposit", "withdrawal", "payment", "invoice"])
    }),
    entry(r"\binvoice\b", |rng| format!("INV-{}", alphanumeric(rng, 8).to_uppercase())),
    // organisations
    entry(r"\b(company|organi[sz]ation|employer|publisher|brand)\b", |rng| {
        CompanyName().fake_with_rng(rng)
    }),
    entry(r"\bhealth ?(insurance|provider)\b", |rng| CompanyName().fake_with_rng(rng)),
    entry(r"\b(slogan|tagline|motto)\b", |rng| CatchPhrase().fake_with_rng(rng)),
    entry(r"\b(category|department)\b", |rng| pick_str(rng, DEPARTMENTS)),
    entry(r"\bmaterial\b", |rng| pick_str(rng, MATERIALS)),
    entry(r"\bsku\b", |rng| alphanumeric(rng, 8).to_uppercase()),
    entry(r"\b(barcode|ean|upc)\b", |rng| digits(rng, 13)),
    entry(r"\bisbn\b", |rng| Isbn13().fake_with_rng(rng)),
    entry(r"\bmodel\b", |rng| format!("{}-{}", upper_alpha(rng, 2), digits(rng, 4))),
    entry(r"\bserial ?num(ber)?\b", |rng| {
        format!("{}-{}", upper_alpha(rng, 3), digits(rng, 5))
    }),
    entry(r"\breference ?id\b", |rng| alphanumeric(rng, 8).to_uppercase()),
    entry(r"\blicen[cs]e( ?key)?\b", license_key),
    entry(r"\bversion\b", |rng| {
        format!(
            "{}.{}.{}",
            rng.random_range(1..=5),
            rng.random_range(0..=20),
            rng.random_range(0..=99)
        )
    }),
    entry(r"\b(uuid|guid|id|slug|token|secret)\b", |rng| {
        crate::generators::random_uuid(rng).to_string()
    }),
    entry(r"\b(full )?name\b", |rng| Name().fake_with_rng(rng)),
    entry(r"\bauthor\b", |rng| Name().fake_with_rng(rng)),
    // dates rendered as text
    entry(r"\b(dob|birth ?(day|date))\b", |rng| {
        let days = rng.random_range(18 * 365..=80 * 365);
        (Utc::now() - Duration::days(days)).format("%Y-%m-%d").to_string()
    }),
    entry(r"\bappointment\b", |rng| {
        let minutes = rng.random_range(60..=365 * 24 * 60);
        (Utc::now() + Duration::minutes(minutes)).to_rfc3339()
    }),
    entry(r"\bevent ?date\b", |rng| {
        let days = rng.random_range(1..=365);
        (Utc::now() + Duration::days(days)).format("%Y-%m-%d").to_string()
    }),
    entry(r"\btime\b", |rng| {
        format!(
            "{:02}:{:02}:{:02}",
            rng.random_range(0..24),
            rng.random_range(0..60),
            rng.random_range(0..60)
        )
    }),
    // content
    entry(r"\b(description|bio|summary|about)\b", |rng| Paragraph(1..3).fake_with_rng(rng)),
    entry(r"\b(title|subject|headline)\b", |rng| Sentence(3..8).fake_with_rng(rng)),
    entry(r"\b(message|content|body)\b", |rng| Paragraph(3..6).fake_with_rng(rng)),
    entry(r"\bcomment\b", |rng| Paragraph(1..3).fake_with_rng(rng)),
    entry(r"\btags?\b", |rng| words(rng, 3, 4).join(",")),
    entry(r"\bcolou?r\b", |rng| HexColor().fake_with_rng(rng)),
    // health and education
    entry(r"\bdiagnosis\b", |rng| words(rng, 2, 4).join(" ")),
    entry(r"\bmedication\b", |rng| {
        let word: String = Word().fake_with_rng(rng);
        format!("{word} {}mg", rng.random_range(5..=500))
    }),
    entry(r"\bblood ?type\b", |rng| {
        pick_str(rng, &["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"])
    }),
    entry(r"\bheight\b", |rng| format!("{} cm", rng.random_range(150..=200))),
    entry(r"\bweight\b", |rng| format!("{} kg", rng.random_range(45..=120))),
    entry(r"\bcourse\b", |rng| {
        format!("{} {}", words(rng, 2, 3).join(" "), rng.random_range(101..=499))
    }),
    entry(r"\bdegree\b", |rng| pick_str(rng, &["BA", "BS", "MA", "MS", "PhD", "MD", "JD"])),
    entry(r"\bmajor\b", |rng| words(rng, 1, 3).join(" ")),
    entry(r"\bgpa\b", |rng| format!("{:.2}", rng.random_range(2.0..=4.0))),
];

pub(super) static MATCHERS: LazyLock<Vec<TextMatcher>> = LazyLock::new(|| {
    TABLE
        .iter()
        .filter_map(|(pattern, produce)| {
            compile(pattern).map(|field| TextMatcher {
                field,
                produce: *produce,
            })
        })
        .collect()
});

fn words(rng: &mut dyn RngCore, min: usize, max: usize) -> Vec<String> {
    Words(min..max).fake_with_rng(rng)
}

fn title_case(words: &[String]) -> String {
    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub(super) fn product_name(rng: &mut dyn RngCore) -> String {
    format!(
        "{} {} {}",
        pick_str(rng, PRODUCT_ADJECTIVES),
        pick_str(rng, MATERIALS),
        pick_str(rng, PRODUCT_NOUNS)
    )
}

pub(super) fn street_address(rng: &mut dyn RngCore) -> String {
    let number: String = BuildingNumber().fake_with_rng(rng);
    let street: String = StreetName().fake_with_rng(rng);
    format!("{number} {street}")
}

pub(super) fn web_url(rng: &mut dyn RngCore) -> String {
    let host: String = Word().fake_with_rng(rng);
    let path: String = Word().fake_with_rng(rng);
    format!("https://{host}.example.com/{path}")
}

fn license_key(rng: &mut dyn RngCore) -> String {
    let raw = alphanumeric(rng, 24).to_uppercase();
    raw.as_bytes()
        .chunks(4)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join("-")
}
