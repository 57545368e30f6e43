/// Company name extraction for Consumer Rights Check
use url::Url;

/// Extract a best-guess company name from a page URL
///
/// Algorithm:
/// 1. Parse the URL and take its host
/// 2. Strip a single leading "www."
/// 3. Split the host by "."
/// 4. If there are at least 2 labels → return the first label
/// 5. Else → return the whole host
///
/// This is a first-label heuristic, not a registrable-domain parser:
/// hosts under country suffixes like ".co.uk" keep their subdomain.
///
/// Examples:
/// - https://www.volkswagen.de/path → volkswagen
/// - https://acme.com → acme
/// - https://shop.example.co.uk → shop
/// - http://localhost:3000 → localhost
pub fn extract_company_name(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?;
    if host.is_empty() {
        return None;
    }

    let host = host.strip_prefix("www.").unwrap_or(host);

    let parts: Vec<&str> = host.split('.').collect();
    let name = if parts.len() >= 2 { parts[0] } else { host };

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
