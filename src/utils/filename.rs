//! Display name derivation.

use reqwest::Url;
use tracing::debug;

/// Derive a file name from the last path segment of `url`.
///
/// Parseable URLs use their last path segment, percent-decoded, with the query
/// and fragment left out. Anything else falls back to the text after the last
/// `/`. Path separators that appear after decoding are replaced so the name
/// can never leave the download directory.
///
/// An empty result is returned as is; writing to it fails once a worker picks
/// the task up.
///
/// ```rust
/// use fetchpool::utils::filename_from_url;
///
/// assert_eq!(filename_from_url("https://example.com/a/report%20v2.pdf?x=1"), "report v2.pdf");
/// assert_eq!(filename_from_url("not a url/notes.txt"), "notes.txt");
/// ```
pub fn filename_from_url(url: &str) -> String {
    let name = match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map(|segment| {
                urlencoding::decode(segment)
                    .map(|decoded| decoded.into_owned())
                    .unwrap_or_else(|e| {
                        debug!(segment, error = %e, "URL decoding failed, using raw segment");
                        segment.to_string()
                    })
            })
            .unwrap_or_default(),
        Err(_) => url.rsplit('/').next().unwrap_or_default().to_string(),
    };
    name.replace(['/', '\\'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_segment() {
        assert_eq!(filename_from_url("http://domain.com/file.zip"), "file.zip");
        assert_eq!(
            filename_from_url("https://example.com/a/b/c/archive.tar.gz"),
            "archive.tar.gz"
        );
    }

    #[test]
    fn test_query_and_fragment_dropped() {
        assert_eq!(
            filename_from_url("https://example.com/data.bin?seed=4#top"),
            "data.bin"
        );
    }

    #[test]
    fn test_percent_decoding() {
        assert_eq!(
            filename_from_url("https://example.com/my%20file.txt"),
            "my file.txt"
        );
    }

    #[test]
    fn test_query_characters_in_path_are_kept() {
        assert_eq!(filename_from_url("https://example.com/a=b.bin"), "a=b.bin");
        assert_eq!(filename_from_url("https://example.com/x&y.bin"), "x&y.bin");
        assert_eq!(filename_from_url("https://example.com/a+b.bin"), "a+b.bin");
    }

    #[test]
    fn test_invalid_utf8_keeps_raw_segment() {
        assert_eq!(filename_from_url("https://example.com/bad%FF.bin"), "bad%FF.bin");
    }

    #[test]
    fn test_encoded_separator_is_neutralised() {
        assert_eq!(
            filename_from_url("https://example.com/..%2Fescape.sh"),
            ".._escape.sh"
        );
    }

    #[test]
    fn test_no_path_segment() {
        assert_eq!(filename_from_url("https://example.com/"), "");
        assert_eq!(filename_from_url("https://example.com"), "");
    }

    #[test]
    fn test_unparseable_falls_back_to_raw_text() {
        assert_eq!(filename_from_url("ftp//broken/thing.iso"), "thing.iso");
        assert_eq!(filename_from_url("plain"), "plain");
    }
}
