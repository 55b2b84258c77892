//! Registrable domain extraction

use std::net::IpAddr;

use url::Url;

/// Host of a URL, accepting bare domains without a scheme
pub fn host_of(input: &str) -> Option<String> {
    let trimmed = input.trim();
    let parsed = Url::parse(trimmed)
        .ok()
        .filter(|u| u.host_str().is_some())
        .or_else(|| Url::parse(&format!("http://{trimmed}")).ok())?;

    parsed
        .host_str()
        .map(|h| h.trim_end_matches('.').to_lowercase())
        .filter(|h| !h.is_empty())
}

/// Reduce a URL or host to its registrable `name.suffix` domain
///
/// Suffixes come from the Public Suffix List. Hosts without a registrable part (single
/// labels such as `localhost`, bare suffixes, or IP addresses) are returned as-is.
pub fn registrable_domain(input: &str) -> String {
    let Some(host) = host_of(input) else {
        return input.trim().to_lowercase();
    };

    if host.trim_matches(['[', ']']).parse::<IpAddr>().is_ok() {
        return host;
    }

    // Hosts that are themselves a public suffix have no registrable part
    match psl::domain_str(&host) {
        Some(domain) => domain.to_string(),
        None => host,
    }
}

/// First label of a domain (`lemonde` for `lemonde.fr`)
pub fn first_label(domain: &str) -> &str {
    domain.split('.').next().unwrap_or(domain)
}
