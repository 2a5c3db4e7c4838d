//! In-memory PDF fixtures for the pdf-merger test suites.
//!
//! Every builder returns serialized bytes with uncompressed content streams,
//! one `Tj` text run per page so page order can be read back with
//! [`page_texts`].

// Test-only crate: a malformed fixture should abort the test.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::missing_panics_doc)]

use lopdf::content::{Content, Operation};
use lopdf::{
    Dictionary, Document, EncryptionState, EncryptionVersion, Object, ObjectId, Permissions,
    Stream, StringFormat,
};

fn font_resources(doc: &mut Document) -> Object {
    let font_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]));
    Object::Dictionary(Dictionary::from_iter([(
        "Font",
        Object::Dictionary(Dictionary::from_iter([("F1", Object::Reference(font_id))])),
    )]))
}

fn text_stream(doc: &mut Document, text: &str) -> Object {
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![100.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let id = doc.add_object(Stream::new(
        Dictionary::new(),
        content.encode().expect("encode content"),
    ));
    Object::Reference(id)
}

fn pages_node(kids: Vec<Object>, extra: Vec<(&str, Object)>) -> Object {
    #[allow(clippy::cast_possible_wrap)]
    let count = kids.len() as i64;
    let mut dict = Dictionary::from_iter([
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(count)),
    ]);
    for (key, value) in extra {
        dict.set(key, value);
    }
    Object::Dictionary(dict)
}

fn set_catalog(doc: &mut Document, pages_id: ObjectId) {
    let catalog_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));
}

fn save(mut doc: Document) -> Vec<u8> {
    let mut out = Vec::new();
    doc.save_to(&mut out).expect("save fixture");
    out
}

fn simple_document(texts: &[&str]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let resources = font_resources(&mut doc);

    let mut kids = Vec::new();
    for text in texts {
        let contents = text_stream(&mut doc, text);
        let page_id = doc.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", contents),
            ("Resources", resources.clone()),
            (
                "MediaBox",
                Object::Array(vec![0.into(), 0.into(), 612.into(), 792.into()]),
            ),
        ]));
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(pages_id, pages_node(kids, vec![]));
    set_catalog(&mut doc, pages_id);
    doc
}

/// One page per entry in `texts`, each showing that text.
pub fn simple_pdf(texts: &[&str]) -> Vec<u8> {
    save(simple_document(texts))
}

/// Single page whose `MediaBox` and `Resources` live on the `Pages` node.
pub fn inherited_media_box_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();
    let resources = font_resources(&mut doc);
    let contents = text_stream(&mut doc, "Inherited");

    let page_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_id)),
        ("Contents", contents),
    ]));

    doc.objects.insert(
        pages_id,
        pages_node(
            vec![Object::Reference(page_id)],
            vec![
                ("Resources", resources),
                (
                    "MediaBox",
                    Object::Array(vec![0.into(), 0.into(), 300.into(), 400.into()]),
                ),
            ],
        ),
    );
    set_catalog(&mut doc, pages_id);
    save(doc)
}

/// Two-level page tree: root -> [left(2 pages), right(1 page, Rotate 90)],
/// with texts `{prefix}1..3`. Page objects are created in reverse order so
/// object ids disagree with page order. `MediaBox` and `Resources` live on
/// the root.
pub fn nested_tree_pdf(prefix: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let root_id = doc.new_object_id();
    let left_id = doc.new_object_id();
    let right_id = doc.new_object_id();
    let resources = font_resources(&mut doc);

    let page = |doc: &mut Document, parent: ObjectId, n: u8| {
        let contents = text_stream(doc, &format!("{prefix}{n}"));
        doc.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(parent)),
            ("Contents", contents),
        ]))
    };
    let p3 = page(&mut doc, right_id, 3);
    let p2 = page(&mut doc, left_id, 2);
    let p1 = page(&mut doc, left_id, 1);

    doc.objects.insert(
        left_id,
        pages_node(
            vec![p1.into(), p2.into()],
            vec![("Parent", Object::Reference(root_id))],
        ),
    );
    doc.objects.insert(
        right_id,
        pages_node(
            vec![p3.into()],
            vec![
                ("Parent", Object::Reference(root_id)),
                ("Rotate", Object::Integer(90)),
            ],
        ),
    );

    let mut root = pages_node(
        vec![left_id.into(), right_id.into()],
        vec![
            (
                "MediaBox",
                Object::Array(vec![0.into(), 0.into(), 595.into(), 842.into()]),
            ),
            ("Resources", resources),
        ],
    );
    // Count covers leaves, not the two intermediate nodes
    root.as_dict_mut()
        .expect("pages dict")
        .set("Count", Object::Integer(3));
    doc.objects.insert(root_id, root);

    set_catalog(&mut doc, root_id);
    save(doc)
}

/// Pages as [`simple_pdf`], RC4-128 encrypted under `user_password`.
///
/// An empty `user_password` produces a file any reader can open without a
/// password.
pub fn encrypted_pdf(texts: &[&str], user_password: &str) -> Vec<u8> {
    let mut doc = simple_document(texts);
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String(b"pdf-merger-fixture-id".to_vec(), StringFormat::Hexadecimal),
            Object::String(b"pdf-merger-fixture-id".to_vec(), StringFormat::Hexadecimal),
        ]),
    );

    let state = EncryptionState::try_from(EncryptionVersion::V2 {
        document: &doc,
        owner_password: "owner-secret",
        user_password,
        key_length: 128,
        permissions: Permissions::default(),
    })
    .expect("encryption state");
    doc.encrypt(&state).expect("encrypt fixture");

    save(doc)
}

/// Text drawn by each page of `doc`, in page order.
pub fn document_page_texts(doc: &Document) -> Vec<String> {
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let raw = doc.get_page_content(page_id).expect("page content");
            let content = Content::decode(&raw).expect("decode content");
            content
                .operations
                .iter()
                .filter(|op| op.operator == "Tj")
                .filter_map(|op| match op.operands.first() {
                    Some(Object::String(text, _)) => {
                        Some(String::from_utf8_lossy(text).into_owned())
                    }
                    _ => None,
                })
                .collect()
        })
        .collect()
}

/// Text drawn by each page of `bytes`, in page order.
pub fn page_texts(bytes: &[u8]) -> Vec<String> {
    document_page_texts(&Document::load_mem(bytes).expect("load PDF"))
}

/// Stored (undecoded) bytes of each page's content streams, in page order.
pub fn raw_page_contents(bytes: &[u8]) -> Vec<Vec<u8>> {
    let doc = Document::load_mem(bytes).expect("load PDF");
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            doc.get_page_contents(page_id)
                .into_iter()
                .flat_map(|id| {
                    doc.get_object(id)
                        .and_then(Object::as_stream)
                        .expect("content stream")
                        .content
                        .clone()
                })
                .collect()
        })
        .collect()
}
