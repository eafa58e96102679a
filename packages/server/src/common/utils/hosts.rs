//! Website host and contact address normalisation.

/// Parse a website that may lack a scheme (`acme.de/parts`).
fn parse_website(url_or_domain: &str) -> Option<url::Url> {
    let input = url_or_domain.trim();
    if input.is_empty() {
        return None;
    }

    if input.contains("://") {
        url::Url::parse(input).ok()
    } else {
        url::Url::parse(&format!("https://{}", input)).ok()
    }
}

/// Lower-cased host of a website, without a leading `www.`.
///
/// Accepts bare domains (`acme.de/parts`) as well as full URLs. Returns
/// `None` when no host can be extracted.
pub fn website_host(url_or_domain: &str) -> Option<String> {
    let parsed = parse_website(url_or_domain)?;
    let host = parsed.host_str()?.trim_end_matches('.').to_lowercase();
    if host.is_empty() {
        return None;
    }

    Some(
        host.strip_prefix("www.")
            .map(|s| s.to_string())
            .unwrap_or(host),
    )
}

/// Registrable domain of a website, the name a registry keeps records for.
///
/// `https://shop.acme.co.uk:8443/x` becomes `acme.co.uk`. IP addresses,
/// single-label hosts and bare public suffixes have no registrable domain.
pub fn registry_domain(url: &str) -> Option<String> {
    let parsed = parse_website(url)?;
    let url::Host::Domain(host) = parsed.host()? else {
        return None;
    };
    let host = host.trim_end_matches('.').to_lowercase();
    if !host.contains('.') {
        return None;
    }

    psl::domain_str(&host).map(str::to_string)
}

/// Grouping key for a contact address.
pub fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_website_host_from_url() {
        assert_eq!(
            website_host("https://www.Acme-Parts.DE/catalog?q=1"),
            Some("acme-parts.de".to_string())
        );
    }

    #[test]
    fn test_website_host_from_bare_domain() {
        assert_eq!(website_host("acme.com/contact"), Some("acme.com".to_string()));
        assert_eq!(website_host("  "), None);
    }

    #[test]
    fn test_website_host_keeps_subdomains() {
        assert_eq!(
            website_host("http://shop.acme.co.uk"),
            Some("shop.acme.co.uk".to_string())
        );
    }

    #[test]
    fn test_registry_domain_ignores_scheme_case() {
        assert_eq!(
            registry_domain("HTTPS://Acme.com/parts"),
            Some("acme.com".to_string())
        );
        assert_eq!(registry_domain("Http://ACME.com"), Some("acme.com".to_string()));
    }

    #[test]
    fn test_registry_domain_reduces_subdomains() {
        assert_eq!(
            registry_domain("https://shop.acme.co.uk/x"),
            Some("acme.co.uk".to_string())
        );
        assert_eq!(
            registry_domain("eu.store.acme.com"),
            Some("acme.com".to_string())
        );
    }

    #[test]
    fn test_registry_domain_rejects_hosts_without_registrable_domain() {
        assert_eq!(registry_domain("https://192.168.10.4/admin"), None);
        assert_eq!(registry_domain("co.uk"), None);
    }

    #[test]
    fn test_registry_domain_strips_scheme_path_and_port() {
        assert_eq!(
            registry_domain("https://www.example.org:8443/a/b"),
            Some("example.org".to_string())
        );
        assert_eq!(registry_domain("example.org"), Some("example.org".to_string()));
        assert_eq!(registry_domain("localhost"), None);
        assert_eq!(registry_domain(""), None);
    }

    #[test]
    fn test_normalize_address() {
        assert_eq!(normalize_address("  Sales@Acme.com "), "sales@acme.com");
    }
}
