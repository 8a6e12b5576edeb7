// src/sow/rich_text.rs
//! Conversion between the editor's HTML-ish markup and plain text.

const BLOCK_TAGS: &[&str] = &["p", "div", "br", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "tr"];

/// Returns the text content of `markup` with all formatting dropped.
///
/// Block-level elements become line breaks. Malformed markup degrades to
/// best-effort text: an unterminated `<` is kept literally. Applying this to
/// its own output returns the output unchanged.
pub fn to_plain(markup: &str) -> String {
    let mut current = strip_pass(markup);
    // Every pass that changes the text makes it shorter, so this terminates.
    loop {
        let next = strip_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Wraps each line of `text` in a paragraph, escaping markup characters.
/// Blank lines become `<p><br></p>` so they survive `to_plain`.
pub fn from_plain(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    text.lines()
        .map(|line| {
            if line.is_empty() {
                "<p><br></p>".to_string()
            } else {
                format!("<p>{}</p>", escape(line))
            }
        })
        .collect()
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn strip_pass(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(ch) = rest.chars().next() {
        if ch == '<' {
            if let Some((tag_len, name)) = parse_tag(rest) {
                // `<br>` is an explicit line break; other blocks only end the current line.
                let is_break = name == "br";
                if BLOCK_TAGS.contains(&name.as_str()) && !out.is_empty() && (is_break || !out.ends_with('\n')) {
                    out.push('\n');
                }
                rest = &rest[tag_len..];
                continue;
            }
        } else if ch == '&' {
            if let Some((entity_len, decoded)) = parse_entity(rest) {
                out.push(decoded);
                rest = &rest[entity_len..];
                continue;
            }
        }
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    out.trim().to_string()
}

/// Recognizes `<name ...>`, `</name>`, `<!-- ... >` and `<? ... >` at the start
/// of `input`. Returns the byte length and lowercase tag name.
fn parse_tag(input: &str) -> Option<(usize, String)> {
    let after = input.get(1..)?;
    let first = after.chars().next()?;
    if !(first.is_ascii_alphabetic() || first == '/' || first == '!' || first == '?') {
        return None;
    }
    let close = after.find('>')?;
    let body = &after[..close];
    let name: String = body
        .trim_start_matches(['/', '!', '?'])
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    Some((close + 2, name))
}

fn parse_entity(input: &str) -> Option<(usize, char)> {
    let end = input.get(1..)?.find(';')? + 1;
    if end > 10 {
        return None;
    }
    let name = &input[1..end];
    let decoded = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" | "#39" => '\'',
        "nbsp" => ' ',
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse::<u32>().ok()?
            };
            char::from_u32(code)?
        }
    };
    Some((end + 1, decoded))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_simple_paragraph() {
        assert_eq!(to_plain("<p>Build API</p>"), "Build API");
        assert_eq!(to_plain("<p><strong>Bold</strong> and <em>italic</em></p>"), "Bold and italic");
    }

    #[test]
    fn test_block_elements_become_lines() {
        assert_eq!(to_plain("<p>one</p><p>two</p>"), "one\ntwo");
        assert_eq!(to_plain("<ul><li>a</li><li>b</li></ul>"), "a\nb");
        assert_eq!(to_plain("line<br>next"), "line\nnext");
    }

    #[test]
    fn test_entities() {
        assert_eq!(to_plain("<p>R&amp;D &lt;core&gt;</p>"), "R&D <core>");
        assert_eq!(to_plain("a&nbsp;b &#65;&#x42;"), "a b AB");
        assert_eq!(to_plain("fish & chips"), "fish & chips");
    }

    #[test]
    fn test_malformed_markup_does_not_fail() {
        assert_eq!(to_plain("<p>open"), "open");
        assert_eq!(to_plain("a < b"), "a < b");
        assert_eq!(to_plain("x<y"), "x<y");
        assert_eq!(to_plain("<"), "<");
        assert_eq!(to_plain(""), "");
    }

    #[test]
    fn test_decoded_tag_lookalikes_are_stripped_on_settle() {
        // Escaped markup decodes to something tag-shaped, which is then dropped.
        assert_eq!(to_plain("&lt;b&gt;bold&lt;/b&gt;"), "bold");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "<p>Build API</p>",
            "&amp;lt;b&amp;gt;hidden&amp;lt;/b&amp;gt;",
            "plain text",
            "  padded  ",
            "<div>x</div>&lt;p&gt;",
            "a < b > c",
            "&#0;&#xZZ;&bogus;",
        ];
        for sample in samples {
            let once = to_plain(sample);
            assert_eq!(to_plain(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_from_plain_round_trip() {
        let text = "first line\nuses 5 < 6 & amps";
        assert_eq!(from_plain(text), "<p>first line</p><p>uses 5 &lt; 6 &amp; amps</p>");
        assert_eq!(to_plain(&from_plain(text)), text);
        assert_eq!(from_plain(""), "");
    }

    #[test]
    fn test_blank_lines_survive_round_trip() {
        assert_eq!(from_plain("a\n\nb"), "<p>a</p><p><br></p><p>b</p>");
        assert_eq!(to_plain(&from_plain("a\n\nb")), "a\n\nb");
        assert_eq!(to_plain(&from_plain("a\n\n\nb")), "a\n\n\nb");
        assert_eq!(to_plain("<p>one</p><p><br></p><p>two</p>"), "one\n\ntwo");
        assert_eq!(to_plain("a<br><br>b"), "a\n\nb");
        assert_eq!(to_plain(&to_plain("a<br><br>b")), "a\n\nb");
    }
}
