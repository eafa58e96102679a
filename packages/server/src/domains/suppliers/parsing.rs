//! Pure parsing of knowledge-provider answers.
//!
//! Two stages, both side-effect free:
//! 1. structured: find the first well-formed JSON array in the answer and
//!    read supplier entries from it
//! 2. sanitizing: pull a single contact address out of free text, falling
//!    back to a line scan when the strict pattern does not match

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::common::utils::website_host;
use crate::domains::suppliers::models::SupplierCandidate;

/// Marketplace, classifieds and auction brands. A host matches when any of
/// its dot-separated labels equals an entry (so `amazon.de` and
/// `market.yandex.ru` are both caught).
pub const AGGREGATOR_DENYLIST: &[&str] = &[
    "alibaba",
    "aliexpress",
    "amazon",
    "avito",
    "craigslist",
    "dhgate",
    "ebay",
    "etsy",
    "globalsources",
    "indiamart",
    "made-in-china",
    "mercadolibre",
    "olx",
    "ozon",
    "rakuten",
    "tradeindia",
    "walmart",
    "wildberries",
    "yandex",
];

static RE_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9.-]+").unwrap()
});

static RE_DISALLOWED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9@.-]").unwrap());

/// Whether a (normalised) host belongs to a generic marketplace.
pub fn is_aggregator(host: &str) -> bool {
    host.split('.')
        .any(|label| AGGREGATOR_DENYLIST.contains(&label))
}

/// The first well-formed JSON array literal in `text`, if any.
///
/// Tries every `[` in order and returns the first one that opens a complete,
/// valid array. Surrounding prose and code fences are ignored.
pub fn extract_json_array(text: &str) -> Option<Vec<Value>> {
    for (start, _) in text.match_indices('[') {
        let mut stream = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        if let Some(Ok(Value::Array(items))) = stream.next() {
            return Some(items);
        }
    }
    None
}

fn field<'a>(entry: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| entry.get(*k))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
}

/// Supplier entries from one region's answer.
///
/// Entries need a non-empty name and a website with a parseable host.
/// A missing country falls back to `region`; addresses are sanitized and
/// left empty when unusable. Dedup is the caller's job.
pub fn parse_candidates(answer: &str, region: &str) -> Vec<SupplierCandidate> {
    let Some(items) = extract_json_array(answer) else {
        return Vec::new();
    };

    items
        .iter()
        .filter(|entry| entry.is_object())
        .filter_map(|entry| {
            let name = field(entry, &["name", "company"])?;
            let website = field(entry, &["website", "url", "site"])?;
            website_host(website)?;

            let email = field(entry, &["email", "contact_email", "contact", "address"])
                .map(sanitize_address)
                .unwrap_or_default();
            let country = field(entry, &["country"]).unwrap_or(region);

            Some(SupplierCandidate {
                name: name.to_string(),
                website: website.to_string(),
                email,
                country: country.to_string(),
            })
        })
        .collect()
}

fn is_plausible_address(candidate: &str) -> bool {
    match candidate.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
        }
        None => false,
    }
}

/// A single contact address from free text, or an empty string.
///
/// The result always contains an `@` with a `.` somewhere after it.
pub fn sanitize_address(raw: &str) -> String {
    let content = raw.trim();

    if let Some(found) = RE_ADDRESS.find(content) {
        let address = found.as_str().trim_end_matches('.');
        if is_plausible_address(address) {
            return address.to_string();
        }
    }

    if content.contains('@') {
        for line in content.lines().map(str::trim) {
            let has_dotted_domain = line
                .split_once('@')
                .map(|(_, after)| after.contains('.'))
                .unwrap_or(false);
            if !has_dotted_domain {
                continue;
            }

            let cleaned = RE_DISALLOWED.replace_all(line, "");
            let cleaned = cleaned.trim_matches('.');
            if is_plausible_address(cleaned) {
                return cleaned.to_string();
            }
        }
    }

    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_array_surrounded_by_prose() {
        let answer = r#"Here are the companies:
```json
[{"name": "Acme", "website": "acme.com"}]
```
Let me know if you need more."#;
        let items = extract_json_array(answer).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_extract_skips_malformed_bracket_text() {
        let answer = r#"Sources [1] and [2, say: [{"name": "Acme", "website": "acme.com"}]"#;
        let items = extract_json_array(answer).unwrap();
        // "[1]" is itself a well-formed array and comes first
        assert_eq!(items, vec![serde_json::json!(1)]);

        let answer = r#"Note [see below: [{"name": "Acme", "website": "acme.com"}]"#;
        let items = extract_json_array(answer).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_extract_handles_nested_arrays() {
        let answer = r#"[{"name": "Acme", "website": "acme.com", "tags": ["a", "b"]}]"#;
        let items = extract_json_array(answer).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_no_array_yields_nothing() {
        assert!(extract_json_array("I could not find any suppliers.").is_none());
        assert!(parse_candidates("[{\"name\": \"Acme\", ", "Europe").is_empty());
    }

    #[test]
    fn test_parse_requires_name_and_website() {
        let answer = r#"[
            {"name": "Acme", "website": "https://acme.com", "email": "sales@acme.com", "country": "Germany"},
            {"name": "", "website": "https://noname.com"},
            {"name": "No Site"},
            {"name": "Bad Site", "website": "   "},
            "just a string"
        ]"#;
        let candidates = parse_candidates(answer, "Europe");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Acme");
        assert_eq!(candidates[0].country, "Germany");
        assert_eq!(candidates[0].email, "sales@acme.com");
    }

    #[test]
    fn test_parse_defaults_country_to_region() {
        let answer = r#"[{"name": "Acme", "website": "acme.com", "email": null, "country": ""}]"#;
        let candidates = parse_candidates(answer, "South America");
        assert_eq!(candidates[0].country, "South America");
        assert_eq!(candidates[0].email, "");
    }

    #[test]
    fn test_parse_sanitizes_decorated_email() {
        let answer = r#"[{"name": "Acme", "website": "acme.com", "email": "Sales: orders@acme.com (preferred)"}]"#;
        let candidates = parse_candidates(answer, "Asia");
        assert_eq!(candidates[0].email, "orders@acme.com");
    }

    #[test]
    fn test_aggregator_matches_any_label() {
        assert!(is_aggregator("ebay.com"));
        assert!(is_aggregator("amazon.de"));
        assert!(is_aggregator("market.yandex.ru"));
        assert!(is_aggregator("made-in-china.com"));
        assert!(!is_aggregator("ebayparts-supply.com"));
        assert!(!is_aggregator("acme.com"));
    }

    #[test]
    fn test_sanitize_plain_address() {
        assert_eq!(sanitize_address("sales@acme.com"), "sales@acme.com");
        assert_eq!(sanitize_address("  info@acme.co.uk.  "), "info@acme.co.uk");
    }

    #[test]
    fn test_sanitize_picks_address_out_of_prose() {
        assert_eq!(
            sanitize_address("The best contact is \"wholesale@parts-depot.de\", per their site."),
            "wholesale@parts-depot.de"
        );
    }

    #[test]
    fn test_sanitize_line_scan_fallback() {
        // Unicode local part defeats the strict pattern; the line scan strips it down
        let raw = "Контакт:\nпродажи_sales@завод.рф\n";
        assert_eq!(sanitize_address(raw), "");

        let raw = "contact:\n <sales>@<acme.com>\n";
        assert_eq!(sanitize_address(raw), "sales@acme.com");
    }

    #[test]
    fn test_sanitize_rejects_non_addresses() {
        for raw in ["", "not found", "sales@localhost", "@acme.com", "email: none", "a@b@c"] {
            let out = sanitize_address(raw);
            assert!(out.is_empty(), "expected empty for {:?}, got {:?}", raw, out);
        }
    }

    #[test]
    fn test_sanitize_output_always_has_dotted_domain() {
        let samples = [
            "sales@acme.com",
            "x <y@z.org>",
            "line one\nwrite to: ops@plant.example.net\n",
            "garbage @ stuff . here",
            "@.",
        ];
        for raw in samples {
            let out = sanitize_address(raw);
            if !out.is_empty() {
                let (_, domain) = out.split_once('@').unwrap();
                assert!(domain.contains('.'), "{:?} -> {:?}", raw, out);
            }
        }
    }
}
