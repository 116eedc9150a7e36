use cms_export_core::{html_to_text, HtmlBody, HtmlNormalizer, NormalizeError};
use pretty_assertions::assert_eq;

fn convert(html: &str) -> String {
    HtmlNormalizer.convert(&HtmlBody::from(html)).unwrap()
}

#[test]
fn paragraph_with_strong_text() {
    assert_eq!(convert("<p>Hello, <strong>World!</strong></p>"), "Hello,\nWorld!");
}

#[test]
fn sibling_divs_become_lines() {
    assert_eq!(convert("<div>Line1</div><div>Line2</div>"), "Line1\nLine2");
}

#[test]
fn absent_and_empty_bodies_are_empty_text() {
    assert_eq!(HtmlNormalizer.convert(&HtmlBody::Absent).unwrap(), "");
    assert_eq!(convert(""), "");
    assert_eq!(convert("   \n\t "), "");
}

#[test]
fn non_text_body_is_rejected() {
    let err = HtmlNormalizer
        .convert(&HtmlBody::NonText { kind: "binary" })
        .unwrap_err();
    assert_eq!(err, NormalizeError::InvalidInputKind { kind: "binary" });
}

#[test]
fn full_page_keeps_only_body_text() {
    let html = r##"
    <html>
        <head><title>Test</title></head>
        <body>
            <h1>Header</h1>
            <p>Paragraph with <a href="#">link</a>.</p>
            <ul>
                <li>Item 1</li>
                <li>Item 2</li>
            </ul>
        </body>
    </html>
    "##;
    assert_eq!(
        convert(html),
        "Header\nParagraph with\nlink.\nItem 1\nItem 2"
    );
}

#[test]
fn line_break_and_list_items_only_open_a_line() {
    assert_eq!(convert("first<br>second<br/>third"), "first\nsecond\nthird");
    assert_eq!(
        convert("<ul><li>One<ul><li>Two</li></ul></li><li>Three</li></ul>"),
        "One\nTwo\nThree"
    );
}

#[test]
fn table_rows_headings_and_quotes_are_lines() {
    let html = "<h2>Prices</h2><table><tr><td>tea</td></tr><tr><td>coffee</td></tr></table>\
                <blockquote>quoted</blockquote>after";
    assert_eq!(convert(html), "Prices\ntea\ncoffee\nquoted\nafter");
}

#[test]
fn entities_are_decoded() {
    assert_eq!(convert("<p>Fish &amp; chips &lt;3</p>"), "Fish & chips <3");
}

#[test]
fn scripts_styles_and_comments_are_dropped() {
    let html = "<style>p { color: red; }</style><p>visible</p><!-- hidden --><script>var x = 1;</script>";
    assert_eq!(convert(html), "visible");
}

#[test]
fn spaces_inside_a_line_are_kept() {
    assert_eq!(html_to_text("plain   text without tags"), "plain   text without tags");
}

#[test]
fn malformed_markup_is_tolerated() {
    let text = convert("<p>unclosed <div>nested text</span></b> tail");
    assert!(!text.contains('<'), "raw tag syntax leaked: {text:?}");
    assert!(text.contains("unclosed"));
    assert!(text.contains("nested text"));
    assert!(text.contains("tail"));
}

#[test]
fn output_never_contains_blank_lines() {
    let fixtures = [
        "<p></p><p></p><div><br><br></div>",
        "<div>\n\n<p>a</p>\n\n<p>b</p>\n\n</div>",
        "<ul>\n  <li>\n    one\n  </li>\n\n  <li>two</li>\n</ul>",
        "<h1>t</h1>\r\n\r\n<blockquote><p>q</p></blockquote>",
        "text<br>\n<br>\n<br>more",
    ];
    for html in fixtures {
        let text = convert(html);
        assert!(!text.contains("\n\n"), "blank line in {text:?} from {html:?}");
        assert_eq!(text, text.trim());
    }
}
