//! Link and image URL resolution against a page's base link.

/// Markdown extensions whose links are rewritten to page URLs.
const MARKDOWN_EXTENSIONS: [&str; 2] = [".md", ".markdown"];

/// Whether a URL points outside the documentation tree (or nowhere at all).
fn is_external(url: &str) -> bool {
    url.is_empty()
        || url.contains("://")
        || url.starts_with("//")
        || url.starts_with("mailto:")
        || url.starts_with("tel:")
        || url.starts_with('#')
        || url.starts_with('/')
}

/// Split a URL into its path and `#fragment` parts.
fn split_fragment(url: &str) -> (&str, &str) {
    match url.find('#') {
        Some(pos) => (&url[..pos], &url[pos..]),
        None => (url, ""),
    }
}

/// Walk `relative` from the directory `base`, handling `.` and `..`.
///
/// Every segment added by `relative` goes through `clean`; segments the
/// cleaner maps to the empty string (such as `index` files) are dropped.
/// Walking above the root is clamped at the root.
fn walk(base: &str, relative: &str, clean: impl Fn(&str) -> String) -> String {
    let mut segments: Vec<String> = base
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect();

    for component in relative.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => {
                let cleaned = clean(component);
                if !cleaned.is_empty() {
                    segments.push(cleaned);
                }
            }
        }
    }

    let joined = segments.join("/");
    if base.starts_with('/') {
        format!("/{joined}")
    } else {
        joined
    }
}

/// Resolve a link found in a page against the page's base link.
///
/// `base_link` is the URL of the directory the page's source file lives in.
/// Links to markdown files are turned into page URLs: each path segment goes
/// through `clean_segment` (which is expected to strip the extension) and the
/// result gets a trailing slash. Other relative links are only re-rooted.
/// External, absolute and fragment-only links are returned unchanged.
///
/// # Examples
///
/// ```
/// use dv_renderer::resolve_link;
///
/// let strip = |s: &str| s.trim_end_matches(".md").to_lowercase();
/// assert_eq!(
///     resolve_link("../Setup.md#usage", "/docs/en/cms/topics/", strip),
///     "/docs/en/cms/setup/#usage"
/// );
/// assert_eq!(resolve_link("https://example.com", "/docs/", strip), "https://example.com");
/// ```
pub fn resolve_link(url: &str, base_link: &str, clean_segment: impl Fn(&str) -> String) -> String {
    if is_external(url) {
        return url.to_owned();
    }

    let (path, fragment) = split_fragment(url);
    let is_markdown = MARKDOWN_EXTENSIONS
        .iter()
        .any(|ext| path.to_ascii_lowercase().ends_with(ext));

    if is_markdown {
        let resolved = walk(base_link, path, clean_segment);
        format!("{}/{fragment}", resolved.trim_end_matches('/'))
    } else {
        let resolved = walk(base_link, path, str::to_owned);
        let trailing = if path.ends_with('/') && !resolved.ends_with('/') {
            "/"
        } else {
            ""
        };
        format!("{resolved}{trailing}{fragment}")
    }
}

/// Resolve an image source against the page's base link without rewriting
/// the file name.
#[must_use]
pub fn resolve_image(src: &str, base_link: &str) -> String {
    if is_external(src) {
        return src.to_owned();
    }
    walk(base_link, src, str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_md(segment: &str) -> String {
        let name = segment.strip_suffix(".md").unwrap_or(segment);
        if name == "index" {
            String::new()
        } else {
            name.to_owned()
        }
    }

    #[test]
    fn test_resolve_link_sibling() {
        assert_eq!(
            resolve_link("setup.md", "/docs/en/cms/guide/", strip_md),
            "/docs/en/cms/guide/setup/"
        );
    }

    #[test]
    fn test_resolve_link_parent() {
        assert_eq!(
            resolve_link("../other.md", "/docs/en/cms/guide/", strip_md),
            "/docs/en/cms/other/"
        );
    }

    #[test]
    fn test_resolve_link_current_dir() {
        assert_eq!(
            resolve_link("./sibling.md", "/docs/en/cms/", strip_md),
            "/docs/en/cms/sibling/"
        );
    }

    #[test]
    fn test_resolve_link_index_collapses() {
        assert_eq!(
            resolve_link("topics/index.md", "/docs/en/cms/", strip_md),
            "/docs/en/cms/topics/"
        );
    }

    #[test]
    fn test_resolve_link_with_fragment() {
        assert_eq!(
            resolve_link("./page.md#section", "/docs/", strip_md),
            "/docs/page/#section"
        );
    }

    #[test]
    fn test_resolve_link_external_unchanged() {
        assert_eq!(
            resolve_link("https://example.com", "/docs/", strip_md),
            "https://example.com"
        );
        assert_eq!(
            resolve_link("mailto:test@example.com", "/docs/", strip_md),
            "mailto:test@example.com"
        );
        assert_eq!(resolve_link("#section", "/docs/", strip_md), "#section");
        assert_eq!(resolve_link("/api/", "/docs/", strip_md), "/api/");
    }

    #[test]
    fn test_resolve_link_non_markdown_rerooted() {
        assert_eq!(
            resolve_link("files/archive.zip", "/docs/en/cms/", strip_md),
            "/docs/en/cms/files/archive.zip"
        );
        assert_eq!(
            resolve_link("../topics/", "/docs/en/cms/guide/", strip_md),
            "/docs/en/cms/topics/"
        );
    }

    #[test]
    fn test_resolve_link_traversal_clamped() {
        assert_eq!(resolve_link("../../../etc.md", "/a/b/", strip_md), "/etc/");
    }

    #[test]
    fn test_resolve_image() {
        assert_eq!(
            resolve_image("_images/diagram.png", "/docs/en/cms/"),
            "/docs/en/cms/_images/diagram.png"
        );
        assert_eq!(
            resolve_image("https://example.com/a.png", "/docs/"),
            "https://example.com/a.png"
        );
    }
}
