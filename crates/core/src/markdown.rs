/// Render a markdown image link: `![<alt>](<url>)`.
///
/// The alt text and URL are inserted verbatim.
pub fn image_link(alt: &str, url: &str) -> String {
    format!("![{alt}]({url})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_image_link() {
        assert_eq!(
            image_link("cat.png", "https://example.com/cat123.png"),
            "![cat.png](https://example.com/cat123.png)"
        );
    }

    #[test]
    fn empty_alt_is_allowed() {
        assert_eq!(image_link("", "https://x/y.png"), "![](https://x/y.png)");
    }
}
