//! C syntax definition

use crate::syntax::graph::{ByteSet, GraphBuilder, RuleGraph};
use crate::syntax::style::{Color, Style};

pub fn graph() -> RuleGraph {
    let mut b = GraphBuilder::new("c");

    let comment_c = b.color(Style::fg(Color::BrightBlack).with_italic());
    let string_c = b.color(Style::fg(Color::Green));
    let char_c = b.color(Style::fg(Color::Green));
    let number_c = b.color(Style::fg(Color::Cyan));
    let keyword_c = b.color(Style::fg(Color::Magenta).with_bold());
    let type_c = b.color(Style::fg(Color::Yellow));
    let preproc_c = b.color(Style::fg(Color::BrightMagenta));
    let special_c = b.color(Style::fg(Color::BrightYellow));

    let normal = b.state("normal");
    let word = b.state("word");
    let string = b.state("string");
    let string_esc = b.state("string-esc");
    let char_lit = b.state("char");
    let char_esc = b.state("char-esc");
    let comment = b.state("comment");
    let line_comment = b.state("line-comment");
    let preproc = b.state("preproc");
    let number = b.state("number");

    let ident_start = ByteSet::new()
        .with_range(b'a', b'z')
        .with_range(b'A', b'Z')
        .with_range(b'_', b'_');
    let ident = ident_start.clone().with_range(b'0', b'9');
    let digits = ByteSet::new().with_range(b'0', b'9');
    // hex digits, radix prefixes, float dot/exponent, integer suffixes
    let num_cont = ByteSet::of(".xXuUlLeEpP")
        .with_range(b'0', b'9')
        .with_range(b'a', b'f')
        .with_range(b'A', b'F');

    let keywords = b.words(
        &[
            "if", "else", "for", "while", "do", "switch", "case", "default", "break",
            "continue", "return", "goto", "sizeof", "struct", "union", "enum", "typedef",
            "static", "extern", "const", "volatile", "register", "inline", "restrict",
            "auto",
        ],
        false,
    );
    let types = b.words(
        &[
            "void", "char", "short", "int", "long", "float", "double", "signed",
            "unsigned", "bool", "size_t", "ssize_t", "ptrdiff_t", "intptr_t",
            "uintptr_t", "int8_t", "int16_t", "int32_t", "int64_t", "uint8_t",
            "uint16_t", "uint32_t", "uint64_t", "FILE",
        ],
        false,
    );

    b.on_str(normal, "/*", Some(comment_c), comment);
    b.on_str(normal, "//", Some(comment_c), line_comment);
    b.on_char(normal, ByteSet::of("\""), Some(string_c), string);
    b.on_char(normal, ByteSet::of("'"), Some(char_c), char_lit);
    b.on_char(normal, ByteSet::of("#"), Some(preproc_c), preproc);
    b.accumulate(normal, ident_start, None, word);
    b.on_char(normal, digits, Some(number_c), number);
    b.eat(normal, None, normal);

    b.accumulate(word, ident, None, word);
    b.on_words(word, keywords, Some(keyword_c), normal);
    b.on_words(word, types, Some(type_c), normal);
    b.noeat(word, normal);

    b.on_char(string, ByteSet::of("\""), Some(string_c), normal);
    b.on_char(string, ByteSet::of("\\"), Some(special_c), string_esc);
    // a plain C string does not survive the end of the line
    b.on_char(string, ByteSet::of("\n"), Some(string_c), normal);
    b.eat(string, Some(string_c), string);
    b.eat(string_esc, Some(special_c), string);

    b.on_char(char_lit, ByteSet::of("'"), Some(char_c), normal);
    b.on_char(char_lit, ByteSet::of("\\"), Some(special_c), char_esc);
    b.on_char(char_lit, ByteSet::of("\n"), Some(char_c), normal);
    b.eat(char_lit, Some(char_c), char_lit);
    b.eat(char_esc, Some(special_c), char_lit);

    b.on_str(comment, "*/", Some(comment_c), normal);
    b.eat(comment, Some(comment_c), comment);

    b.on_char(line_comment, ByteSet::of("\n"), Some(comment_c), normal);
    b.eat(line_comment, Some(comment_c), line_comment);

    b.on_char(preproc, ByteSet::of("\n"), Some(preproc_c), normal);
    b.eat(preproc, Some(preproc_c), preproc);

    b.on_char(number, num_cont, Some(number_c), number);
    b.noeat(number, normal);

    b.build()
}
