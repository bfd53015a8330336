//! Utility functions

pub mod logger;
pub mod validation;

/// Percent-encode a string for use in a URL query component
fn url_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Placeholder photo URL embedding the product name
pub fn placeholder_photo_url(product_name: &str) -> String {
    format!(
        "https://via.placeholder.com/100x100?text={}",
        url_encode(product_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_encode_escapes_non_alphanumerics() {
        assert_eq!(url_encode("Impact Drill"), "Impact%20Drill");
        assert_eq!(url_encode("abc-123_~."), "abc-123_~.");
        assert_eq!(url_encode("50% off"), "50%25%20off");
    }

    #[test]
    fn placeholder_contains_encoded_name() {
        let url = placeholder_photo_url("Angle Grinder");
        assert_eq!(
            url,
            "https://via.placeholder.com/100x100?text=Angle%20Grinder"
        );
    }
}
