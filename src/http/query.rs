//! Query string helpers

use url::form_urlencoded;

/// Last value of a query parameter, percent-decoded
pub fn query_param(query: Option<&str>, name: &str) -> Option<String> {
    form_urlencoded::parse(query?.as_bytes())
        .filter(|(key, _)| key == name)
        .last()
        .map(|(_, value)| value.into_owned())
}

/// Append `name=value` to a URL, encoding the value
pub fn append_query_param(url: &str, name: &str, value: &str) -> String {
    let encoded: String = form_urlencoded::Serializer::new(String::new())
        .append_pair(name, value)
        .finish();
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_param() {
        assert_eq!(query_param(Some("brand=acme&x=1"), "brand").as_deref(), Some("acme"));
        assert_eq!(query_param(Some("x=1&brand=a%2Db"), "brand").as_deref(), Some("a-b"));
        assert_eq!(query_param(Some("brand="), "brand").as_deref(), Some(""));
        assert_eq!(query_param(Some("x=1"), "brand"), None);
        assert_eq!(query_param(None, "brand"), None);
    }

    #[test]
    fn test_last_value_wins() {
        assert_eq!(query_param(Some("brand=a&brand=b"), "brand").as_deref(), Some("b"));
        assert_eq!(query_param(Some("brand=a&x=1&brand="), "brand").as_deref(), Some(""));
    }

    #[test]
    fn test_append_query_param() {
        assert_eq!(
            append_query_param("/auth/login/", "next", "/project/?tab=1"),
            "/auth/login/?next=%2Fproject%2F%3Ftab%3D1"
        );
        assert_eq!(
            append_query_param("/login?region=one", "next", "/"),
            "/login?region=one&next=%2F"
        );
    }
}
