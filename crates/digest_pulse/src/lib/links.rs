//! # Link classification
//!
//! Maps a url to a [`LinkType`] by matching ordered substring rules against the
//! url path. The first rule that matches wins.

use url::Url;

use crate::LinkType;

/// Ordered classification rules. A new category needs one entry here and one
/// prompt template.
const RULES: &[(&[&str], LinkType)] = &[
    (&["/in/"], LinkType::Candidate),
    (&["/jobs/", "/view/"], LinkType::Job),
    (&["/company/"], LinkType::Company),
];

/// Classifies a url. Unparseable input is matched as a raw string.
pub fn classify_link(url: &str) -> LinkType {
    let parsed = Url::parse(url).ok();
    let haystack = parsed.as_ref().map(Url::path).unwrap_or(url);

    RULES
        .iter()
        .find(|(patterns, _)| patterns.iter().any(|p| haystack.contains(p)))
        .map(|(_, link_type)| *link_type)
        .unwrap_or(LinkType::Unknown)
}

/// Returns true when the url's host is, or is a subdomain of, one of `domains`
pub fn host_matches(url: &str, domains: &[String]) -> bool {
    match Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_ascii_lowercase)) {
        Some(host) => domains.iter().any(|d| {
            let d = d.to_ascii_lowercase();
            host == d || host.ends_with(&format!(".{d}"))
        }),
        None => {
            let lowered = url.to_ascii_lowercase();
            domains.iter().any(|d| lowered.contains(&d.to_ascii_lowercase()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_links_are_candidates() {
        assert_eq!(
            classify_link("https://www.linkedin.com/in/jane-doe-123/"),
            LinkType::Candidate
        );
    }

    #[test]
    fn test_job_links() {
        assert_eq!(
            classify_link("https://www.linkedin.com/jobs/view/3912345678/"),
            LinkType::Job
        );
        assert_eq!(classify_link("https://example.com/view/42"), LinkType::Job);
    }

    #[test]
    fn test_company_links() {
        assert_eq!(
            classify_link("https://www.linkedin.com/company/acme/"),
            LinkType::Company
        );
    }

    #[test]
    fn test_unmatched_links_are_unknown() {
        assert_eq!(
            classify_link("https://habr.com/ru/articles/123456/"),
            LinkType::Unknown
        );
    }

    #[test]
    fn test_first_rule_wins_on_multiple_matches() {
        assert_eq!(
            classify_link("https://example.com/in/jobs/company/"),
            LinkType::Candidate
        );
        assert_eq!(
            classify_link("https://example.com/company/acme/jobs/"),
            LinkType::Job
        );
    }

    #[test]
    fn test_query_string_is_not_classified() {
        assert_eq!(
            classify_link("https://example.com/search?next=/in/someone"),
            LinkType::Unknown
        );
    }

    #[test]
    fn test_unparseable_input_falls_back_to_raw_match() {
        assert_eq!(classify_link("linkedin.com/in/someone"), LinkType::Candidate);
    }

    #[test]
    fn test_host_matches_subdomains() {
        let domains = vec!["linkedin.com".to_string(), "lnkd.in".to_string()];
        assert!(host_matches("https://www.linkedin.com/in/x", &domains));
        assert!(host_matches("https://lnkd.in/abc", &domains));
        assert!(!host_matches("https://notlinkedin.com/in/x", &domains));
        assert!(!host_matches("https://example.com/linkedin.com", &domains));
    }
}
