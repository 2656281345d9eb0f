//! Parse/serialize round-trip tests and the documented tree properties.

#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;

use littlexml::serial::{serialize, serialize_with_options, SerializeOptions};
use littlexml::{Collection, Document, NodeId};

const DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n";

/// A comparable snapshot of a subtree: tag, attributes, text (leaves only)
/// and children.
#[derive(Debug, PartialEq)]
struct Shape {
    tag: Option<String>,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<Shape>,
}

fn shape(doc: &Document, id: NodeId) -> Shape {
    let children: Vec<Shape> = doc.children(id).map(|c| shape(doc, c)).collect();
    Shape {
        tag: doc.tag(id).map(str::to_string),
        attributes: doc
            .attributes(id)
            .iter()
            .map(|a| (a.key.clone(), a.value.clone()))
            .collect(),
        text: if children.is_empty() {
            doc.inner_text(id).map(str::to_string)
        } else {
            None
        },
        children,
    }
}

fn assert_round_trip(input: &str) {
    let first = Document::parse_str(input);
    assert!(first.success(), "{input}");
    let written = serialize(&first);

    let second = Document::parse_str(&written);
    assert!(second.success(), "{written}");
    assert_eq!(shape(&first, first.root()).children, shape(&second, second.root()).children);
    assert_eq!(first.version, second.version);
    assert_eq!(first.encoding, second.encoding);
}

// ---------------------------------------------------------------------------
// Round trips
// ---------------------------------------------------------------------------

#[test]
fn test_round_trip_reproduces_tree() {
    for input in [
        "<a/>",
        "<a>text</a>",
        r#"<a k="v" other="w"><b>1</b><c/><d><e x="y"/></d></a>"#,
        r#"<?xml version="1.1" encoding="ASCII" ?><r><s>t</s></r>"#,
        "<first/><second><third/></second>",
        "<unicode>héllo wörld</unicode>",
    ] {
        assert_round_trip(input);
    }
}

#[test]
fn test_serialize_is_idempotent() {
    let input = r#"<top a="1"><!-- dropped --><mid><leaf>x</leaf><leaf/></mid></top>"#;
    let once = serialize(&Document::parse_str(input));
    let twice = serialize(&Document::parse_str(&once));
    assert_eq!(once, twice);
}

#[test]
fn test_round_trip_with_indent_four() {
    let input = "<a><b><c>deep</c></b></a>";
    let options = SerializeOptions::default().indent(4);
    let written = serialize_with_options(&Document::parse_str(input), &options);
    assert_eq!(
        written,
        format!("{DECL}<a>\n    <b>\n        <c>deep</c>\n    </b>\n</a>\n")
    );
    let again = serialize_with_options(&Document::parse_str(&written), &options);
    assert_eq!(written, again);
}

// ---------------------------------------------------------------------------
// Documented properties
// ---------------------------------------------------------------------------

#[test]
fn test_empty_forms_serialize_identically() {
    let short = serialize(&Document::parse_str("<a/>"));
    let long = serialize(&Document::parse_str("<a></a>"));
    assert_eq!(short, long);
    assert_eq!(short, format!("{DECL}<a />\n"));
}

#[test]
fn test_empty_attribute_kept_but_not_written() {
    let doc = Document::parse_str(r#"<a attr="" keep="yes"/>"#);
    assert!(doc.success());
    let a = doc.root_element().unwrap();
    assert_eq!(doc.attribute(a, "attr").unwrap().value, "");
    assert_eq!(doc.attributes(a).len(), 2);
    assert_eq!(serialize(&doc), format!("{DECL}<a keep=\"yes\" />\n"));
}

#[test]
fn test_mismatched_end_tag_keeps_partial_tree() {
    let doc = Document::parse_str("<a><b></a>");
    assert!(!doc.success());
    let a = doc.root_element().unwrap();
    assert_eq!(doc.tag(a), Some("a"));
    let b = doc.child(a, 0).unwrap();
    assert_eq!(doc.tag(b), Some("b"));
    assert_eq!(doc.parent(b), Some(a));
    assert!(doc.into_result().is_err());
}

#[test]
fn test_immediate_lookup_ignores_descendants() {
    let input = "<top><foo/><bar/><baz/></top>\
                 <middle><child/><child/><child/></middle>\
                 <bottom><nest><nest><nest/></nest></nest></bottom>";
    let doc = Document::parse_str(input);
    assert!(doc.success());
    let root = doc.root();

    let top = doc.immediate_element_by_tag_name(root, "top").unwrap();
    let bottom = doc.immediate_element_by_tag_name(root, "bottom").unwrap();
    assert_eq!(doc.tag(top), Some("top"));
    assert_eq!(doc.tag(bottom), Some("bottom"));
    assert_eq!(doc.immediate_element_by_tag_name(root, "nest"), None);
    assert!(doc.immediate_element_by_tag_name(bottom, "nest").is_some());
}

#[test]
fn test_struct_definition_document() {
    let input = r#"<?xml version="1.0" encoding="UTF-8" ?><struct name="Person"><field name="name" type="string" /><field name="age" type="int" /><description>This defines a person</description></struct>"#;
    let doc = Document::parse_str(input);
    assert!(doc.success());
    assert_eq!(doc.version, "1.0");
    assert_eq!(doc.encoding, "UTF-8");

    let root = doc.root();
    assert_eq!(doc.child_count(root), 1);
    let item = doc.child(root, 0).unwrap();
    assert_eq!(doc.tag(item), Some("struct"));
    assert_eq!(doc.attribute_value(item, "name").as_deref(), Some("Person"));

    let tags: Vec<&str> = doc.children(item).filter_map(|c| doc.tag(c)).collect();
    assert_eq!(tags, vec!["field", "field", "description"]);

    let types: Vec<String> = doc
        .children_by_tag_name(item, "field")
        .filter_map(|f| doc.attribute_value(f, "type"))
        .collect();
    assert_eq!(types, vec!["string", "int"]);

    let description = doc.child(item, 2).unwrap();
    assert_eq!(doc.inner_text(description), Some("This defines a person"));
}

#[test]
fn test_missing_declaration_written_with_defaults() {
    let doc = Document::parse_str("<a/>");
    assert!(serialize(&doc).starts_with(DECL));
}

#[test]
fn test_first_text_run_wins() {
    let doc = Document::parse_str("<a>first<b/>second</a>");
    assert!(doc.success());
    let a = doc.root_element().unwrap();
    assert_eq!(doc.inner_text(a), Some("first"));
    // Elements with children are written without their text.
    assert_eq!(serialize(&doc), format!("{DECL}<a>\n  <b />\n</a>\n"));
}

#[test]
fn test_pretty_printed_input_parses_back() {
    let pretty = format!(
        "{DECL}<top>\n  <foo />\n  <bar />\n</top>\n<bottom>\n  <nest>\n    <nest />\n  </nest>\n</bottom>\n"
    );
    let doc = Document::parse_str(&pretty);
    assert!(doc.success());
    assert_eq!(serialize(&doc), pretty);
}
