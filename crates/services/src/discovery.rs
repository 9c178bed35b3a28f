use url::Url;

use attest_core::model::ShareKey;

/// Parameters a client instance reads off its incoming URL.
///
/// `admin` switches the UI collaborators into administration mode, `key`
/// carries a share key to dereference, and `company` only prefills the
/// submission form's company field — it is never validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryParams {
    pub admin: bool,
    pub share_key: Option<ShareKey>,
    pub company_hint: Option<String>,
}

impl DiscoveryParams {
    /// Extracts discovery parameters from the request URL's query string.
    ///
    /// Unknown parameters are ignored; a bare `admin` flag counts as set.
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        let mut params = Self::default();
        for (name, value) in url.query_pairs() {
            match name.as_ref() {
                "admin" => {
                    params.admin = matches!(value.as_ref(), "" | "1" | "true");
                }
                "key" => {
                    if !value.trim().is_empty() {
                        params.share_key = Some(ShareKey::new(value.trim()));
                    }
                }
                "company" => {
                    let hint = value.trim();
                    if !hint.is_empty() {
                        params.company_hint = Some(hint.to_owned());
                    }
                }
                _ => {}
            }
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(query: &str) -> DiscoveryParams {
        let url = Url::parse(&format!("https://attest.example.com/?{query}")).unwrap();
        DiscoveryParams::from_url(&url)
    }

    #[test]
    fn empty_query_yields_defaults() {
        let params = parse("");
        assert_eq!(params, DiscoveryParams::default());
    }

    #[test]
    fn admin_flag_forms() {
        assert!(parse("admin").admin);
        assert!(parse("admin=1").admin);
        assert!(parse("admin=true").admin);
        assert!(!parse("admin=no").admin);
    }

    #[test]
    fn share_key_and_company_hint() {
        let params = parse("key=t1-abc123&company=Acme%20SL");
        assert_eq!(params.share_key, Some(ShareKey::new("t1-abc123")));
        assert_eq!(params.company_hint, Some("Acme SL".into()));
    }

    #[test]
    fn blank_values_are_dropped() {
        let params = parse("key=&company=%20%20");
        assert_eq!(params.share_key, None);
        assert_eq!(params.company_hint, None);
    }

    #[test]
    fn unknown_parameters_are_ignored() {
        let params = parse("utm_source=mail&admin=1");
        assert!(params.admin);
    }
}
