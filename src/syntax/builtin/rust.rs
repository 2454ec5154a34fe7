//! Rust syntax definition

use crate::syntax::graph::{ByteSet, GraphBuilder, RuleGraph};
use crate::syntax::style::{Color, Style};

pub fn graph() -> RuleGraph {
    let mut b = GraphBuilder::new("rust");

    let comment_c = b.color(Style::fg(Color::BrightBlack).with_italic());
    let string_c = b.color(Style::fg(Color::Green));
    let char_c = b.color(Style::fg(Color::Green));
    let number_c = b.color(Style::fg(Color::Cyan));
    let keyword_c = b.color(Style::fg(Color::Magenta).with_bold());
    let type_c = b.color(Style::fg(Color::Yellow));
    let attr_c = b.color(Style::fg(Color::BrightBlue));
    let lifetime_c = b.color(Style::fg(Color::BrightMagenta));
    let special_c = b.color(Style::fg(Color::BrightYellow));

    let normal = b.state("normal");
    let word = b.state("word");
    let string = b.state("string");
    let string_esc = b.state("string-esc");
    let quote = b.state("quote");
    let quote_close = b.state("quote-close");
    let char_esc = b.state("char-esc");
    let comment = b.state("comment");
    let line_comment = b.state("line-comment");
    let attr = b.state("attr");
    let number = b.state("number");

    let ident_start = ByteSet::new()
        .with_range(b'a', b'z')
        .with_range(b'A', b'Z')
        .with_range(b'_', b'_');
    let ident = ident_start.clone().with_range(b'0', b'9');
    let digits = ByteSet::new().with_range(b'0', b'9');
    let num_cont = ByteSet::of("._xXoObBeE")
        .with_range(b'0', b'9')
        .with_range(b'a', b'f')
        .with_range(b'A', b'F');

    let keywords = b.words(
        &[
            "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else",
            "enum", "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop",
            "match", "mod", "move", "mut", "pub", "ref", "return", "self", "Self",
            "static", "struct", "super", "trait", "true", "type", "unsafe", "use",
            "where", "while",
        ],
        false,
    );
    let types = b.words(
        &[
            "bool", "char", "str", "u8", "u16", "u32", "u64", "u128", "usize", "i8",
            "i16", "i32", "i64", "i128", "isize", "f32", "f64", "String", "Vec", "Box",
            "Rc", "Arc", "Option", "Result", "Some", "None", "Ok", "Err",
        ],
        false,
    );

    b.on_str(normal, "//", Some(comment_c), line_comment);
    b.on_str(normal, "/*", Some(comment_c), comment);
    b.on_str(normal, "#![", Some(attr_c), attr);
    b.on_str(normal, "#[", Some(attr_c), attr);
    b.on_char(normal, ByteSet::of("\""), Some(string_c), string);
    b.on_char(normal, ByteSet::of("'"), Some(char_c), quote);
    b.accumulate(normal, ident_start, None, word);
    b.on_char(normal, digits, Some(number_c), number);
    b.eat(normal, None, normal);

    b.accumulate(word, ident, None, word);
    b.on_words(word, keywords, Some(keyword_c), normal);
    b.on_words(word, types, Some(type_c), normal);
    b.noeat(word, normal);

    // string literals span lines
    b.on_char(string, ByteSet::of("\""), Some(string_c), normal);
    b.on_char(string, ByteSet::of("\\"), Some(special_c), string_esc);
    b.eat(string, Some(string_c), string);
    b.eat(string_esc, Some(special_c), string);

    // a quote opens either a char literal or a lifetime; decided one
    // byte later, recoloring the opening quote when it was a lifetime
    b.on_char(quote, ByteSet::of("\\"), Some(special_c), char_esc);
    b.eat(quote, Some(char_c), quote_close);
    b.on_char(quote_close, ByteSet::of("'"), Some(char_c), normal);
    b.recolor(quote_close, 2, lifetime_c);
    b.noeat(quote_close, normal);
    b.eat(char_esc, Some(special_c), quote_close);

    b.on_str(comment, "*/", Some(comment_c), normal);
    b.eat(comment, Some(comment_c), comment);

    b.on_char(line_comment, ByteSet::of("\n"), Some(comment_c), normal);
    b.eat(line_comment, Some(comment_c), line_comment);

    b.on_char(attr, ByteSet::of("]"), Some(attr_c), normal);
    b.eat(attr, Some(attr_c), attr);

    b.on_char(number, num_cont, Some(number_c), number);
    b.noeat(number, normal);

    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::scanner::scan_line;

    #[test]
    fn test_keywords_colored() {
        let graph = graph();
        let mut colors = Vec::new();
        scan_line(&graph, graph.start(), b"fn main() {}", true, &mut colors);
        let plain = graph.plain();
        assert_ne!(colors[0], plain);
        assert_eq!(colors[0], colors[1]);
        assert_eq!(colors[3], plain);
    }

    #[test]
    fn test_string_spans_lines() {
        let graph = graph();
        let mut colors = Vec::new();
        let mid = scan_line(&graph, graph.start(), b"let s = \"multi", false, &mut colors);
        assert_ne!(mid, graph.start());
        let end = scan_line(&graph, mid, b"line\";", false, &mut colors);
        assert_eq!(end, graph.start());
    }

    #[test]
    fn test_char_literal_and_lifetime() {
        let graph = graph();
        let plain = graph.plain();

        // 'a' is a char literal: three uniformly colored bytes
        let mut colors = Vec::new();
        scan_line(&graph, graph.start(), b"x = 'a';", true, &mut colors);
        assert_ne!(colors[4], plain);
        assert_eq!(colors[4], colors[5]);
        assert_eq!(colors[5], colors[6]);

        // 'a with no closing quote is a lifetime, recolored after the
        // fact; the following '>' is plain
        let mut colors = Vec::new();
        scan_line(&graph, graph.start(), b"&'a>", true, &mut colors);
        assert_eq!(colors[0], plain);
        assert_ne!(colors[1], plain);
        assert_eq!(colors[1], colors[2]);
        assert_eq!(colors[3], plain);
    }

    #[test]
    fn test_attribute() {
        let graph = graph();
        let mut colors = Vec::new();
        scan_line(&graph, graph.start(), b"#[derive(Debug)] x", true, &mut colors);
        let plain = graph.plain();
        assert_ne!(colors[0], plain);
        assert_eq!(colors[0], colors[15]);
        assert_eq!(colors[17], plain);
    }

    #[test]
    fn test_line_comment_runs_to_eol() {
        let graph = graph();
        let mut colors = Vec::new();
        let end = scan_line(&graph, graph.start(), b"x // note", false, &mut colors);
        assert_eq!(end, graph.start());
        assert_ne!(colors[2], graph.plain());
        assert_eq!(colors[2], colors[8]);
    }
}
