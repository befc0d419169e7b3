//! Integration tests for the block parser and inline tokenizer

use mdblocks_core::ast::{CodeBlock, Heading, List, ListItem, Paragraph, Quote};
use mdblocks_core::{
    parse, tokenize_inline, Block, BlockKind, DiagnosticKind, Parser, Span, Style,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn para(spans: Vec<Span<'static>>) -> Block<'static> {
    Block::Paragraph(Paragraph { spans })
}

fn plain(text: &'static str) -> Span<'static> {
    Span::plain(text)
}

fn texts(spans: &[Span<'_>]) -> Vec<String> {
    spans.iter().map(|s| s.text.to_string()).collect()
}

// ============================================================================
// Empty and Blank Input
// ============================================================================

#[test]
fn test_empty_input() {
    assert!(parse("").is_empty());
}

#[rstest]
#[case("\n")]
#[case("   \n\t\n")]
#[case("\r\n\r\n")]
fn test_blank_only_input(#[case] input: &str) {
    assert!(parse(input).is_empty());
}

// ============================================================================
// Paragraph Tests
// ============================================================================

#[test]
fn test_single_line_paragraph() {
    assert_eq!(parse("Hello world"), vec![para(vec![plain("Hello world")])]);
}

#[test]
fn test_consecutive_lines_merge_with_breaks() {
    let blocks = parse("first line\nsecond line\nthird");
    assert_eq!(
        blocks,
        vec![para(vec![
            plain("first line"),
            Span::line_break(),
            plain("second line"),
            Span::line_break(),
            plain("third"),
        ])]
    );
}

#[test]
fn test_paragraph_lines_are_trimmed() {
    assert_eq!(parse("   padded   "), vec![para(vec![plain("padded")])]);
}

#[test]
fn test_blank_line_separates_paragraphs() {
    let blocks = parse("one\n\ntwo");
    assert_eq!(blocks, vec![para(vec![plain("one")]), para(vec![plain("two")])]);
}

#[test]
fn test_blank_line_separation_matches_independent_parses() {
    let a = "Some **text**\nover two lines";
    let b = "# A heading";
    let joined = format!("{}\n\n{}", a, b);

    let mut expected = parse(a);
    expected.extend(parse(b));
    assert_eq!(parse(&joined), expected);
}

#[test]
fn test_paragraph_with_only_dropped_spans_is_skipped() {
    // The italic capture is a single space, which is dropped
    assert!(parse("_ _").is_empty());
}

// ============================================================================
// Heading Tests
// ============================================================================

#[test]
fn test_heading_levels() {
    let input = "# H1\n## H2\n### H3\n#### H4\n##### H5\n###### H6";
    let blocks = parse(input);
    assert_eq!(blocks.len(), 6);

    for (i, block) in blocks.iter().enumerate() {
        match block {
            Block::Heading(h) => assert_eq!(h.level, (i + 1) as u8),
            other => panic!("Expected heading, got {:?}", other),
        }
    }
}

#[test]
fn test_heading_content_is_tokenized() {
    let blocks = parse("## Hello **World**");
    assert_eq!(
        blocks,
        vec![Block::Heading(Heading {
            level: 2,
            spans: vec![plain("Hello "), Span::new("World", Style::BOLD)],
        })]
    );
}

#[test]
fn test_heading_level_too_deep_is_paragraph() {
    let blocks = parse("####### Too deep");
    assert_eq!(blocks, vec![para(vec![plain("####### Too deep")])]);
}

#[test]
fn test_heading_without_space_is_paragraph() {
    assert_eq!(parse("#NoSpace"), vec![para(vec![plain("#NoSpace")])]);
}

#[test]
fn test_heading_text_is_trimmed() {
    assert_eq!(
        parse("#   spaced   "),
        vec![Block::Heading(Heading {
            level: 1,
            spans: vec![plain("spaced")],
        })]
    );
}

#[test]
fn test_heading_closes_open_paragraph() {
    let blocks = parse("intro\n# Title\noutro");
    assert_eq!(blocks.len(), 3);
    assert!(matches!(blocks[0], Block::Paragraph(_)));
    assert!(matches!(blocks[1], Block::Heading(_)));
    assert!(matches!(blocks[2], Block::Paragraph(_)));
}

#[test]
fn test_indented_heading_is_recognized() {
    assert!(matches!(parse("   # Title")[0], Block::Heading(_)));
}

// ============================================================================
// List Tests
// ============================================================================

#[test]
fn test_unordered_list() {
    let blocks = parse("- one\n* two\n+ three");
    assert_eq!(
        blocks,
        vec![Block::List(List {
            ordered: false,
            items: vec![
                ListItem {
                    explicit_number: None,
                    spans: vec![plain("one")],
                },
                ListItem {
                    explicit_number: None,
                    spans: vec![plain("two")],
                },
                ListItem {
                    explicit_number: None,
                    spans: vec![plain("three")],
                },
            ],
        })]
    );
}

#[test]
fn test_ordered_list_keeps_explicit_numbers() {
    let blocks = parse("3. three\n7. seven");
    match &blocks[..] {
        [Block::List(list)] => {
            assert!(list.ordered);
            let numbers: Vec<_> = list.items.iter().map(|i| i.explicit_number).collect();
            assert_eq!(numbers, vec![Some(3), Some(7)]);
            assert_eq!(texts(&list.items[1].spans), vec!["seven"]);
        }
        other => panic!("Expected one list, got {:?}", other),
    }
}

#[test]
fn test_list_format_switch_starts_new_list() {
    let blocks = parse("1. a\n2. b\n- c\n- d\n3. e");
    let formats: Vec<(bool, usize)> = blocks
        .iter()
        .map(|b| match b {
            Block::List(l) => (l.ordered, l.items.len()),
            other => panic!("Expected list, got {:?}", other),
        })
        .collect();
    assert_eq!(formats, vec![(true, 2), (false, 2), (true, 1)]);
}

#[test]
fn test_plain_line_closes_list() {
    let blocks = parse("- item\nafter");
    assert_eq!(blocks.len(), 2);
    assert!(matches!(blocks[0], Block::List(_)));
    assert_eq!(blocks[1], para(vec![plain("after")]));
}

#[test]
fn test_list_item_closes_paragraph() {
    let blocks = parse("before\n- item");
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0], para(vec![plain("before")]));
    assert!(matches!(blocks[1], Block::List(_)));
}

#[test]
fn test_list_items_are_tokenized() {
    let blocks = parse("- a *b* c");
    match &blocks[0] {
        Block::List(l) => assert_eq!(
            l.items[0].spans,
            vec![plain("a "), Span::new("b", Style::ITALIC), plain(" c")]
        ),
        other => panic!("Expected list, got {:?}", other),
    }
}

#[rstest]
#[case("-   padded")]
#[case("+   padded  ")]
#[case("1.   padded")]
fn test_list_item_text_is_trimmed(#[case] input: &str) {
    match &parse(input)[..] {
        [Block::List(l)] => assert_eq!(l.items[0].spans, vec![plain("padded")]),
        other => panic!("Expected one list, got {:?}", other),
    }
}

#[rstest]
#[case("٣. item")]
#[case("３. item")]
#[case("1٣. item")]
fn test_non_ascii_digits_are_not_ordinals(#[case] input: &'static str) {
    assert_eq!(parse(input), vec![para(vec![plain(input)])]);
}

#[test]
fn test_huge_ordinal_has_no_explicit_number() {
    let blocks = parse("123456789012345678901234567890. big");
    match &blocks[0] {
        Block::List(l) => {
            assert!(l.ordered);
            assert_eq!(l.items[0].explicit_number, None);
        }
        other => panic!("Expected list, got {:?}", other),
    }
}

// ============================================================================
// Quote Tests
// ============================================================================

#[test]
fn test_quote_lines_become_separate_paragraphs() {
    let blocks = parse("> first\n> second");
    assert_eq!(
        blocks,
        vec![Block::Quote(Quote {
            level: 1,
            blocks: vec![para(vec![plain("first")]), para(vec![plain("second")])],
        })]
    );
}

#[test]
fn test_quote_nesting_change_forces_new_block() {
    let blocks = parse(">a\n>>b");
    assert_eq!(
        blocks,
        vec![
            Block::Quote(Quote {
                level: 1,
                blocks: vec![para(vec![plain("a")])],
            }),
            Block::Quote(Quote {
                level: 2,
                blocks: vec![para(vec![plain("b")])],
            }),
        ]
    );
}

#[test]
fn test_empty_quote_marker_opens_quote_without_children() {
    let blocks = parse(">\n> text");
    assert_eq!(
        blocks,
        vec![Block::Quote(Quote {
            level: 1,
            blocks: vec![para(vec![plain("text")])],
        })]
    );
}

#[test]
fn test_quote_line_with_only_dropped_spans_has_no_child() {
    assert_eq!(
        parse("> ** **\n> _ _"),
        vec![Block::Quote(Quote {
            level: 1,
            blocks: vec![],
        })]
    );
}

#[test]
fn test_non_quote_line_closes_quote() {
    let blocks = parse("> quoted\nplain");
    assert_eq!(blocks.len(), 2);
    assert!(matches!(blocks[0], Block::Quote(_)));
    assert_eq!(blocks[1], para(vec![plain("plain")]));
}

#[test]
fn test_quote_closes_paragraph_and_list() {
    let blocks = parse("text\n> q\n- item\n> q2");
    let kinds: Vec<_> = blocks.iter().map(Block::kind).collect();
    assert_eq!(
        kinds,
        vec![
            BlockKind::Paragraph,
            BlockKind::Quote,
            BlockKind::List,
            BlockKind::Quote
        ]
    );
}

// ============================================================================
// Code Block Tests
// ============================================================================

#[test]
fn test_code_block_verbatim() {
    let body = "let x = **not bold**;\n  indented\n\n# not a heading";
    let input = format!("```rust\n{}\n```", body);
    assert_eq!(
        parse(&input),
        vec![Block::Code(CodeBlock {
            language: "rust".into(),
            content: format!("{}\n", body).into(),
        })]
    );
}

#[test]
fn test_code_block_default_language() {
    match &parse("```\nx\n```")[0] {
        Block::Code(code) => {
            assert_eq!(code.language, "plaintext");
            assert_eq!(code.content, "x\n");
        }
        other => panic!("Expected code, got {:?}", other),
    }
}

#[test]
fn test_closing_fence_text_is_discarded() {
    let blocks = parse("```js\na\n```ignored\nafter");
    assert_eq!(blocks.len(), 2);
    match &blocks[0] {
        Block::Code(code) => assert_eq!(code.content, "a\n"),
        other => panic!("Expected code, got {:?}", other),
    }
    assert_eq!(blocks[1], para(vec![plain("after")]));
}

#[test]
fn test_code_fence_closes_open_containers() {
    let blocks = parse("para\n```\ncode\n```");
    assert_eq!(blocks.len(), 2);
    assert!(matches!(blocks[0], Block::Paragraph(_)));
    assert!(matches!(blocks[1], Block::Code(_)));
}

#[test]
fn test_unterminated_code_block_is_flushed() {
    let blocks = parse("```py\nprint(1)\n");
    // split semantics: the trailing empty line is a blank line inside code
    assert_eq!(
        blocks,
        vec![Block::Code(CodeBlock {
            language: "py".into(),
            content: "print(1)\n\n".into(),
        })]
    );
}

#[test]
fn test_code_block_spans_are_single_code_span() {
    let blocks = parse("```\nx\n```");
    match &blocks[0] {
        Block::Code(code) => assert_eq!(code.spans(), vec![Span::new("x\n", Style::CODE)]),
        other => panic!("Expected code, got {:?}", other),
    }
}

// ============================================================================
// Horizontal Rule Tests
// ============================================================================

#[rstest]
#[case("---")]
#[case("***")]
#[case("___")]
#[case("-----")]
#[case("_ _ _")]
fn test_horizontal_rules(#[case] input: &str) {
    assert_eq!(parse(input), vec![Block::HorizontalRule]);
}

#[test]
fn test_spaced_dashes_are_a_list_item() {
    // unordered items outrank rules
    assert!(matches!(parse("- - -")[0], Block::List(_)));
}

#[test]
fn test_rule_closes_paragraph() {
    let blocks = parse("text\n---\nmore");
    assert_eq!(
        blocks,
        vec![
            para(vec![plain("text")]),
            Block::HorizontalRule,
            para(vec![plain("more")]),
        ]
    );
}

// ============================================================================
// Inline Tokenizer Tests
// ============================================================================

#[test]
fn test_all_span_flags() {
    let spans = tokenize_inline("**a** *b* ***c*** __d__ ~~e~~ `f`");
    let styled: Vec<(String, Style)> = spans
        .into_iter()
        .map(|s| (s.text.into_owned(), s.style))
        .collect();
    assert_eq!(
        styled,
        vec![
            ("a".to_string(), Style::BOLD),
            ("b".to_string(), Style::ITALIC),
            ("c".to_string(), Style::BOLD_ITALIC),
            ("d".to_string(), Style::UNDERLINE),
            ("e".to_string(), Style::STRIKETHROUGH),
            ("f".to_string(), Style::CODE),
        ]
    );
}

#[rstest]
#[case("_word_", Style::ITALIC)]
#[case("*word*", Style::ITALIC)]
#[case("```word```", Style::CODE)]
#[case("`word`", Style::CODE)]
fn test_single_delimiter_styles(#[case] line: &str, #[case] style: Style) {
    assert_eq!(tokenize_inline(line), vec![Span::new("word", style)]);
}

#[test]
fn test_unmatched_delimiters_stay_literal() {
    assert_eq!(tokenize_inline("a ** b"), vec![plain("a ** b")]);
    assert_eq!(tokenize_inline("~single~"), vec![plain("~single~")]);
}

#[test]
fn test_tokenizer_never_emits_empty_spans() {
    for line in ["****", "``", "** **", "a__b", "`` ``", "~~~~~"] {
        for span in tokenize_inline(line) {
            assert!(!span.text.trim().is_empty(), "line {:?} gave {:?}", line, span);
        }
    }
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_parse_is_deterministic() {
    let input = "# T\n\n- a\n- b\n\n> q\n\n```\nc\n```\n\ntext **x**";
    assert_eq!(parse(input), parse(input));
}

#[test]
fn test_crlf_matches_lf() {
    let lf = "# T\n\npara\nline two\n\n- a\n- b\n\n```\ncode\n```\n";
    let crlf = lf.replace('\n', "\r\n");
    assert_eq!(parse(&crlf), parse(lf));
}

#[test]
fn test_diagnostics_do_not_change_blocks() {
    let input = "####### deep\n**open\n```\nunclosed";
    let result = Parser::new().parse_with_diagnostics(input);
    assert_eq!(result.blocks, parse(input));
}

#[test]
fn test_owned_blocks_outlive_input() {
    let owned = {
        let input = String::from("# Title\n\n> **q**");
        parse(&input)
            .into_iter()
            .map(Block::into_owned)
            .collect::<Vec<_>>()
    };
    assert_eq!(owned.len(), 2);
}

// ============================================================================
// Diagnostics Tests
// ============================================================================

#[test]
fn test_clean_input_has_no_diagnostics() {
    let result = Parser::new().parse_with_diagnostics("# Fine\n\n**all** closed");
    assert!(result.is_clean());
}

#[test]
fn test_diagnostic_kinds_and_lines() {
    let input = "####### deep\n\nsome **open\n\n```rust\nfn x() {}";
    let result = Parser::new().parse_with_diagnostics(input);

    let found: Vec<(DiagnosticKind, usize)> =
        result.diagnostics.iter().map(|d| (d.kind, d.line)).collect();
    assert_eq!(
        found,
        vec![
            (DiagnosticKind::HeadingTooDeep, 1),
            (DiagnosticKind::UnbalancedDelimiter, 3),
            (DiagnosticKind::UnclosedCodeFence, 5),
        ]
    );
}

#[test]
fn test_code_content_is_not_linted() {
    let result = Parser::new().parse_with_diagnostics("```\n**open\n```");
    assert!(result.is_clean());
}
