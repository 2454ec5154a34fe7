//! Shell syntax definition

use crate::syntax::graph::{ByteSet, GraphBuilder, RuleGraph};
use crate::syntax::style::{Color, Style};

pub fn graph() -> RuleGraph {
    let mut b = GraphBuilder::new("sh");

    let comment_c = b.color(Style::fg(Color::BrightBlack).with_italic());
    let string_c = b.color(Style::fg(Color::Green));
    let var_c = b.color(Style::fg(Color::Cyan));
    let keyword_c = b.color(Style::fg(Color::Magenta).with_bold());
    let special_c = b.color(Style::fg(Color::BrightYellow));

    let normal = b.state("normal");
    let word = b.state("word");
    let comment = b.state("comment");
    let dstring = b.state("dstring");
    let dstring_esc = b.state("dstring-esc");
    let sstring = b.state("sstring");
    let dollar = b.state("dollar");
    let var_name = b.state("var-name");
    let var_brace = b.state("var-brace");

    let ident_start = ByteSet::new()
        .with_range(b'a', b'z')
        .with_range(b'A', b'Z')
        .with_range(b'_', b'_');
    let ident = ident_start.clone().with_range(b'0', b'9');
    // single-character parameters like $?, $#, $@ and positionals
    let var_chars = ByteSet::of("?#@*$!-")
        .with_range(b'a', b'z')
        .with_range(b'A', b'Z')
        .with_range(b'0', b'9')
        .with_range(b'_', b'_');

    let keywords = b.words(
        &[
            "if", "then", "else", "elif", "fi", "for", "in", "do", "done", "while",
            "until", "case", "esac", "function", "select", "return", "local", "export",
            "break", "continue",
        ],
        false,
    );

    b.on_char(normal, ByteSet::of("#"), Some(comment_c), comment);
    b.on_char(normal, ByteSet::of("\""), Some(string_c), dstring);
    b.on_char(normal, ByteSet::of("'"), Some(string_c), sstring);
    b.on_char(normal, ByteSet::of("$"), Some(var_c), dollar);
    b.accumulate(normal, ident_start, None, word);
    b.eat(normal, None, normal);

    b.accumulate(word, ident, None, word);
    b.on_words(word, keywords, Some(keyword_c), normal);
    b.noeat(word, normal);

    b.on_char(comment, ByteSet::of("\n"), Some(comment_c), normal);
    b.eat(comment, Some(comment_c), comment);

    b.on_char(dstring, ByteSet::of("\""), Some(string_c), normal);
    b.on_char(dstring, ByteSet::of("\\"), Some(special_c), dstring_esc);
    b.eat(dstring, Some(string_c), dstring);
    b.eat(dstring_esc, Some(special_c), dstring);

    b.on_char(sstring, ByteSet::of("'"), Some(string_c), normal);
    b.eat(sstring, Some(string_c), sstring);

    b.on_char(dollar, ByteSet::of("{"), Some(var_c), var_brace);
    b.noeat(dollar, var_name);

    b.on_char(var_name, var_chars, Some(var_c), var_name);
    b.noeat(var_name, normal);

    b.on_char(var_brace, ByteSet::of("}"), Some(var_c), normal);
    b.eat(var_brace, Some(var_c), var_brace);

    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::scanner::scan_line;

    #[test]
    fn test_comment_to_end_of_line() {
        let graph = graph();
        let mut colors = Vec::new();
        let end = scan_line(&graph, graph.start(), b"ls # list", false, &mut colors);
        assert_eq!(end, graph.start());
        let plain = graph.plain();
        assert_eq!(colors[0], plain);
        assert_ne!(colors[3], plain);
        assert_eq!(colors[3], colors[8]);
    }

    #[test]
    fn test_variables() {
        let graph = graph();
        let plain = graph.plain();

        let mut colors = Vec::new();
        scan_line(&graph, graph.start(), b"echo $HOME x", true, &mut colors);
        assert_eq!(colors[4], plain);
        assert_ne!(colors[5], plain);
        assert_eq!(colors[5], colors[9]);
        assert_eq!(colors[11], plain);

        let mut colors = Vec::new();
        scan_line(&graph, graph.start(), b"${a}b", true, &mut colors);
        assert_ne!(colors[0], plain);
        assert_eq!(colors[0], colors[3]);
        assert_eq!(colors[4], plain);

        let mut colors = Vec::new();
        scan_line(&graph, graph.start(), b"$? x", true, &mut colors);
        assert_ne!(colors[0], plain);
        assert_eq!(colors[0], colors[1]);
        assert_eq!(colors[2], plain);
    }

    #[test]
    fn test_single_quotes_have_no_escapes() {
        let graph = graph();
        let mut colors = Vec::new();
        let end = scan_line(&graph, graph.start(), b"'a\\' b", false, &mut colors);
        // the backslash does not escape; the string closed at byte 3
        assert_eq!(end, graph.start());
        assert_eq!(colors[4], graph.plain());
    }

    #[test]
    fn test_keywords() {
        let graph = graph();
        let mut colors = Vec::new();
        scan_line(&graph, graph.start(), b"if true", true, &mut colors);
        let plain = graph.plain();
        assert_ne!(colors[0], plain);
        assert_eq!(colors[0], colors[1]);
        assert_eq!(colors[3], plain);
    }
}
