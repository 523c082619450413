//! Filename and URL helpers shared by the scanner and pages.
//!
//! All functions are total: any input produces a value.

/// Extensions recognised as documentation pages (compared case-insensitively).
pub const DOC_EXTENSIONS: [&str; 4] = ["md", "markdown", "mdown", "txt"];

/// Substring after the last `.` of `filename`, or `""` when there is none.
///
/// A leading dot alone (`.gitignore`) does not start an extension.
pub fn extension(filename: &str) -> &str {
    match filename.rfind('.') {
        None | Some(0) => "",
        Some(pos) => &filename[pos + 1..],
    }
}

/// Whether `filename` carries a recognised documentation extension.
pub fn is_doc_file(filename: &str) -> bool {
    let ext = extension(filename);
    DOC_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext))
}

/// Strip a recognised documentation extension, leaving other names untouched.
fn strip_doc_extension(segment: &str) -> &str {
    if is_doc_file(segment) {
        let ext = extension(segment);
        &segment[..segment.len() - ext.len() - 1]
    } else {
        segment
    }
}

/// Strip leading ordering prefixes such as `01-` or `2_` (repeated).
fn strip_ordering_prefix<'a>(mut name: &'a str, separators: &[char]) -> &'a str {
    loop {
        let digits = name.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return name;
        }
        match name[digits..].chars().next() {
            Some(c) if separators.contains(&c) => name = &name[digits + c.len_utf8()..],
            _ => return name,
        }
    }
}

/// Whether `filename` is a section index (`index.md`, `INDEX.txt`, ...).
pub fn is_index(filename: &str) -> bool {
    strip_doc_extension(filename).eq_ignore_ascii_case("index")
}

/// Human-readable title for a file or folder name.
///
/// `02_getting-started.md` becomes `Getting Started`. Index files take
/// `section_title`, the title of the section they introduce.
pub fn clean_page_name(segment: &str, section_title: &str) -> String {
    let name = strip_ordering_prefix(strip_doc_extension(segment), &['-', '_']);
    if name.eq_ignore_ascii_case("index") {
        return section_title.to_owned();
    }

    let mut title = String::with_capacity(name.len());
    for word in name.split(['-', '_', ' ', '\t']).filter(|w| !w.is_empty()) {
        if !title.is_empty() {
            title.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            title.extend(first.to_uppercase());
            title.push_str(chars.as_str());
        }
    }
    title
}

/// URL segment for a file or folder name.
///
/// Lowercase, runs of non-alphanumeric characters collapsed into one `-`,
/// ordering prefixes removed. Letters outside ASCII are kept, so `Über.md`
/// becomes `über`. Only index files map to the empty segment: a name made of
/// punctuation alone is spelled out as code points (`!?` becomes `x21-x3f`).
/// Applying it to its own output is a no-op.
pub fn clean_page_url(segment: &str) -> String {
    let name = strip_doc_extension(segment).to_lowercase();

    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    let slug = strip_ordering_prefix(&slug, &['-']);
    match slug {
        "index" => String::new(),
        "" => name
            .chars()
            .map(|c| format!("x{:x}", u32::from(c)))
            .collect::<Vec<_>>()
            .join("-"),
        _ => slug.to_owned(),
    }
}

/// Join URL parts with `/`, collapsing duplicate slashes.
///
/// A leading slash on the first part and a trailing slash on the last part
/// are kept.
pub fn join_links(parts: &[&str]) -> String {
    let leading = parts.first().is_some_and(|p| p.starts_with('/'));
    let trailing = parts.last().is_some_and(|p| p.ends_with('/'));

    let body = parts
        .iter()
        .flat_map(|p| p.split('/'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    let mut link = String::with_capacity(body.len() + 2);
    if leading {
        link.push('/');
    }
    link.push_str(&body);
    if trailing && !link.ends_with('/') {
        link.push('/');
    }
    link
}
