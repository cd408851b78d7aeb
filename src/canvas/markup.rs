//! logos-based color tag parser.
//!
//! Text drawn with [`Canvas::put_markup`](super::Canvas::put_markup) may change
//! color mid-string with tags:
//!
//! - `<t:SPEC>` or `<f:SPEC>` set the text (foreground) attribute
//! - `<b:SPEC>` sets the background attribute
//!
//! `SPEC` is anything [`Attr`] parses (`"bold red"`, `"#ff8800"`), or
//! `default` to return to the attribute the string started with. A tag that
//! does not parse is drawn literally.

use logos::Logos;

use crate::theme::Attr;

/// Markup token produced by the lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum Token {
    /// A well-formed color tag: `<t:...>`, `<f:...>`, `<b:...>`.
    #[regex(r"<[tfb]:[^<>]*>")]
    Tag,

    /// A run of plain text.
    #[regex(r"[^<]+")]
    Text,

    /// A `<` that does not start a tag.
    #[token("<")]
    Lt,
}

/// One piece of parsed markup.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment<'a> {
    Text(&'a str),
    Fg(Attr),
    Bg(Attr),
    ResetFg,
    ResetBg,
}

/// Split `input` into text runs and color changes.
pub fn parse(input: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    for (token, span) in Token::lexer(input).spanned() {
        let slice = &input[span];
        match token {
            Ok(Token::Tag) => segments.push(parse_tag(slice)),
            Ok(Token::Text) | Ok(Token::Lt) => segments.push(Segment::Text(slice)),
            Err(()) => {}
        }
    }
    segments
}

fn parse_tag(tag: &str) -> Segment<'_> {
    let kind = tag.as_bytes()[1];
    let spec = tag[3..tag.len() - 1].trim();
    let is_fg = kind != b'b';
    if spec.eq_ignore_ascii_case("default") {
        return if is_fg { Segment::ResetFg } else { Segment::ResetBg };
    }
    match spec.parse::<Attr>() {
        Ok(attr) if is_fg => Segment::Fg(attr),
        Ok(attr) => Segment::Bg(attr),
        Err(_) => Segment::Text(tag),
    }
}

/// Number of cells the text occupies once tags are removed.
pub fn visible_len(input: &str) -> usize {
    parse(input)
        .iter()
        .map(|seg| match seg {
            Segment::Text(t) => t.chars().count(),
            _ => 0,
        })
        .sum()
}

/// The text with all valid tags removed.
pub fn strip_tags(input: &str) -> String {
    parse(input)
        .into_iter()
        .filter_map(|seg| match seg {
            Segment::Text(t) => Some(t),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Color;

    #[test]
    fn plain_text_is_one_segment() {
        assert_eq!(parse("hello"), vec![Segment::Text("hello")]);
    }

    #[test]
    fn foreground_and_background_tags() {
        let segs = parse("a<t:red>b<b:bold blue>c");
        assert_eq!(
            segs,
            vec![
                Segment::Text("a"),
                Segment::Fg(Attr::new(Color::Red)),
                Segment::Text("b"),
                Segment::Bg(Attr::new(Color::Blue).bold()),
                Segment::Text("c"),
            ]
        );
    }

    #[test]
    fn f_is_an_alias_for_t() {
        assert_eq!(parse("<f:green>"), vec![Segment::Fg(Attr::new(Color::Green))]);
    }

    #[test]
    fn default_resets() {
        assert_eq!(parse("<t:default><b:DEFAULT>"), vec![Segment::ResetFg, Segment::ResetBg]);
    }

    #[test]
    fn malformed_tags_are_literal() {
        assert_eq!(strip_tags("<t:nocolor>x"), "<t:nocolor>x");
        assert_eq!(strip_tags("a < b"), "a < b");
        assert_eq!(strip_tags("<x:red>"), "<x:red>");
        assert_eq!(strip_tags("<t:red"), "<t:red");
    }

    #[test]
    fn visible_len_ignores_tags() {
        assert_eq!(visible_len("<t:red>abc<t:default>de"), 5);
        assert_eq!(visible_len("ünï"), 3);
        assert_eq!(visible_len(""), 0);
    }
}
