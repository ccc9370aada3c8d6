//! Content length extraction utilities.
//!
//! A download only learns its total size from what the server advertises up
//! front. When nothing usable is advertised the size is unknown and no
//! percentage can be computed until the stream ends.

use reqwest::header::{HeaderMap, CONTENT_LENGTH};
use reqwest::Response;

/// Total size advertised by a response, if any.
///
/// Reads the `Content-Length` header. Returns `None` when the header is
/// missing or is not an unsigned integer, which is the case for chunked
/// transfer encoding.
///
/// # Example
///
/// ```rust,no_run
/// use fetchpool::utils::advertised_length;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let response = reqwest::get("https://example.com/file.zip").await?;
/// match advertised_length(&response) {
///     Some(total) => println!("{} bytes to go", total),
///     None => println!("size unknown"),
/// }
/// # Ok(())
/// # }
/// ```
pub fn advertised_length(response: &Response) -> Option<u64> {
    parse_content_length(response.headers())
}

/// Parse the `Content-Length` header out of a header map.
///
/// ```rust
/// use fetchpool::utils::parse_content_length;
/// use reqwest::header::{HeaderMap, HeaderValue, CONTENT_LENGTH};
///
/// let mut headers = HeaderMap::new();
/// headers.insert(CONTENT_LENGTH, HeaderValue::from_static("10240"));
/// assert_eq!(parse_content_length(&headers), Some(10240));
/// ```
pub fn parse_content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
}

/// Percentage of `total` covered by `transferred`, capped at 100.
///
/// A zero `total` counts as complete.
pub fn percent_of(transferred: u64, total: u64) -> f64 {
    if total == 0 {
        return 100.0;
    }
    (transferred as f64 / total as f64 * 100.0).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_parse_content_length() {
        assert_eq!(parse_content_length(&headers_with("2048")), Some(2048));
        assert_eq!(parse_content_length(&headers_with(" 0 ")), Some(0));
        assert_eq!(parse_content_length(&headers_with("-1")), None);
        assert_eq!(parse_content_length(&headers_with("abc")), None);
        assert_eq!(parse_content_length(&HeaderMap::new()), None);
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(0, 10240), 0.0);
        assert_eq!(percent_of(1024, 10240), 10.0);
        assert_eq!(percent_of(10240, 10240), 100.0);
        assert_eq!(percent_of(20000, 10240), 100.0);
        assert_eq!(percent_of(0, 0), 100.0);
    }
}
