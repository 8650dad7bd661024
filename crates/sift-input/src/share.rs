//! "Share this search" link.

use sift_core::ShareConfig;

/// Build a `mailto:` link sharing `url`, or `None` when sharing is off.
///
/// The body is the configured message followed by the URL on its own line.
pub fn share_link(config: &ShareConfig, url: &str) -> Option<String> {
    if !config.enabled {
        return None;
    }

    let body = if config.message.is_empty() {
        url.to_string()
    } else {
        format!("{}\n{}", config.message, url)
    };

    Some(format!(
        "mailto:{}?subject={}&body={}",
        urlencoding::encode(&config.recipient),
        urlencoding::encode(&config.subject),
        urlencoding::encode(&body)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_has_no_link() {
        assert_eq!(share_link(&ShareConfig::default(), "/results?q=jazz"), None);
    }

    #[test]
    fn test_link_encodes_fields() {
        let config = ShareConfig {
            enabled: true,
            message: "Have a look".to_string(),
            subject: "Search results".to_string(),
            recipient: "team@example.com".to_string(),
        };

        let link = share_link(&config, "https://search.example.com/results?q=jazz").unwrap();
        insta::assert_snapshot!(link, @"mailto:team%40example.com?subject=Search%20results&body=Have%20a%20look%0Ahttps%3A%2F%2Fsearch.example.com%2Fresults%3Fq%3Djazz");
    }
}
