//! Composite document builder
//!
//! Owns the primary document for the length of one merge and appends evidence
//! pages at its end. Every page ends up as a direct child of the catalog's
//! root page node, so inheritable attributes are copied onto each page when it
//! is adopted instead of being left on intermediate tree nodes.
//!
//! Appending other documents uses the same approach as a plain merge:
//! 1. Parse the source document
//! 2. Resolve inherited page attributes while the source tree is intact
//! 3. Renumber every source object to consecutive ids past the destination's
//!    `max_id`
//! 4. Import the remapped objects and re-parent the source pages
//!
//! Steps 1-3 are the only fallible ones, so a broken source never leaves
//! half of its pages behind.

use crate::error::EvidenceError;
use crate::layout::PageLayout;
use crate::raster::PdfImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::collections::BTreeMap;

const MEDIA_BOX: &[u8] = b"MediaBox";
const INHERITABLE_KEYS: [&[u8]; 4] = [MEDIA_BOX, b"CropBox", b"Resources", b"Rotate"];
const MAX_TREE_DEPTH: usize = 64;

const FONT_RESOURCE: &str = "F1";
const IMAGE_RESOURCE: &str = "Im1";
/// Average Helvetica glyph width as a fraction of the font size
const AVERAGE_GLYPH_WIDTH: f32 = 0.5;
const LINE_SPACING: f32 = 1.4;

/// A line of text on a generated page
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub font_size: f32,
}

impl TextLine {
    pub fn new(text: impl Into<String>, font_size: f32) -> Self {
        Self {
            text: text.into(),
            font_size,
        }
    }
}

pub struct CompositeDocument {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    font_id: Option<ObjectId>,
    layout: PageLayout,
}

impl CompositeDocument {
    /// Load the primary document. Any failure here is fatal for the merge.
    pub fn load(bytes: &[u8], layout: PageLayout) -> Result<Self, EvidenceError> {
        let mut doc =
            Document::load_mem(bytes).map_err(|e| EvidenceError::PrimaryDocument(e.to_string()))?;
        let pages_id = page_tree_root(&doc).map_err(EvidenceError::PrimaryDocument)?;

        let page_ids: Vec<ObjectId> = doc.get_pages().values().copied().collect();
        let fallback = media_box(&layout);
        let inherited: Vec<_> = page_ids
            .iter()
            .map(|&id| inherited_attributes(&doc, id, &fallback))
            .collect();
        for (&page_id, attributes) in page_ids.iter().zip(inherited) {
            adopt_page(&mut doc, page_id, pages_id, attributes);
        }

        // appended pages must not pick up attributes from the primary's tree
        if let Ok(Object::Dictionary(root)) = doc.get_object_mut(pages_id) {
            for key in INHERITABLE_KEYS {
                root.remove(key);
            }
        }

        Ok(Self {
            doc,
            pages_id,
            page_ids,
            font_id: None,
            layout,
        })
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Append every page of `bytes`, in order. Returns the number of pages
    /// added.
    pub fn append_document(&mut self, bytes: &[u8]) -> Result<usize, String> {
        let source = Document::load_mem(bytes).map_err(|e| e.to_string())?;
        let source_pages: Vec<ObjectId> = source.get_pages().values().copied().collect();
        if source_pages.is_empty() {
            return Err("Document has no pages".into());
        }

        let fallback = media_box(&self.layout);
        let inherited: Vec<_> = source_pages
            .iter()
            .map(|&id| inherited_attributes(&source, id, &fallback))
            .collect();

        let renumbered = renumber_ids(source.objects.keys().copied(), self.doc.max_id)?;
        let pages = source_pages
            .iter()
            .zip(inherited)
            .map(|(page_id, attributes)| {
                let new_id = *renumbered
                    .get(page_id)
                    .ok_or_else(|| format!("Page {} {} R is missing", page_id.0, page_id.1))?;
                let attributes: Vec<_> = attributes
                    .into_iter()
                    .map(|(key, value)| (key, remap_object_refs(value, &renumbered)))
                    .collect();
                Ok((new_id, attributes))
            })
            .collect::<Result<Vec<_>, String>>()?;

        for (id, object) in source.objects {
            if let Some(&new_id) = renumbered.get(&id) {
                self.doc
                    .objects
                    .insert(new_id, remap_object_refs(object, &renumbered));
            }
        }
        if let Some(&(last, _)) = renumbered.values().max() {
            self.doc.max_id = self.doc.max_id.max(last);
        }

        for (new_id, attributes) in pages {
            adopt_page(&mut self.doc, new_id, self.pages_id, attributes);
            self.page_ids.push(new_id);
        }

        Ok(source_pages.len())
    }

    /// Append one page with `image` fitted into the printable area and
    /// `caption` in the top margin
    pub fn append_image_page(&mut self, image: &PdfImage, caption: &str) -> Result<(), String> {
        let placement = self
            .layout
            .fit_image(image.width, image.height)
            .ok_or_else(|| format!("Image has no area ({}x{})", image.width, image.height))?;

        let mut operations = vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(placement.width),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(placement.height),
                    Object::Real(placement.x),
                    Object::Real(placement.y),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_RESOURCE.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ];
        let caption_size = self.layout.caption_font_size;
        let caption = truncate_line(caption, self.max_chars(caption_size));
        let (x, y) = self.layout.caption_origin();
        operations.extend(text_operations(&[TextLine::new(caption, caption_size)], x, y));
        let content = Content { operations }
            .encode()
            .map_err(|e| e.to_string())?;

        let mut image_dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => image.width as i64,
            "Height" => image.height as i64,
            "ColorSpace" => image.color_space,
            "BitsPerComponent" => 8,
            "Filter" => image.filter,
        };
        if let Some(decode) = image.decode {
            let decode: Vec<Object> = decode.iter().map(|&v| Object::Integer(v)).collect();
            image_dict.set("Decode", decode);
        }
        if let Some(mask) = &image.soft_mask {
            let mask_id = self.doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => image.width as i64,
                    "Height" => image.height as i64,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8,
                    "Filter" => "FlateDecode",
                },
                mask.clone(),
            ));
            image_dict.set("SMask", Object::Reference(mask_id));
        }
        let image_id = self
            .doc
            .add_object(Stream::new(image_dict, image.data.clone()));

        let font_id = self.font_id();
        let resources = dictionary! {
            "XObject" => dictionary! { IMAGE_RESOURCE => Object::Reference(image_id) },
            "Font" => dictionary! { FONT_RESOURCE => Object::Reference(font_id) },
        };
        self.add_page(content, resources);
        Ok(())
    }

    /// Append a text-only page. Long lines are word-wrapped to the printable
    /// width.
    pub fn append_text_page(&mut self, lines: &[TextLine]) -> Result<(), String> {
        let wrapped: Vec<TextLine> = lines
            .iter()
            .flat_map(|line| {
                wrap_text(&line.text, self.max_chars(line.font_size))
                    .into_iter()
                    .map(move |text| TextLine::new(text, line.font_size))
            })
            .collect();

        let first_size = wrapped.first().map_or(0.0, |line| line.font_size);
        let (x, y) = self.layout.text_origin(first_size);
        let content = Content {
            operations: text_operations(&wrapped, x, y),
        }
        .encode()
        .map_err(|e| e.to_string())?;

        let font_id = self.font_id();
        let resources = dictionary! {
            "Font" => dictionary! { FONT_RESOURCE => Object::Reference(font_id) },
        };
        self.add_page(content, resources);
        Ok(())
    }

    /// Rebuild the root page node and serialize
    pub fn finish(mut self) -> Result<Vec<u8>, EvidenceError> {
        let kids: Vec<Object> = self
            .page_ids
            .iter()
            .map(|&id| Object::Reference(id))
            .collect();
        let count = kids.len() as i64;

        match self.doc.get_object_mut(self.pages_id) {
            Ok(Object::Dictionary(pages)) => {
                pages.set("Kids", Object::Array(kids));
                pages.set("Count", Object::Integer(count));
            }
            _ => {
                return Err(EvidenceError::Serialization(
                    "Invalid pages dictionary".into(),
                ))
            }
        }

        // drops source catalogs and page tree nodes left behind by re-parenting
        self.doc.prune_objects();
        self.doc.compress();

        let mut buffer = Vec::new();
        self.doc
            .save_to(&mut buffer)
            .map_err(|e| EvidenceError::Serialization(e.to_string()))?;
        Ok(buffer)
    }

    fn add_page(&mut self, content: Vec<u8>, resources: Dictionary) {
        let parent = self.pages_id;
        let media_box = media_box(&self.layout);
        let content_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), content));
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(parent),
            "MediaBox" => media_box,
            "Contents" => Object::Reference(content_id),
            "Resources" => resources,
        });
        self.page_ids.push(page_id);
    }

    fn font_id(&mut self) -> ObjectId {
        if let Some(id) = self.font_id {
            return id;
        }
        let id = self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        self.font_id = Some(id);
        id
    }

    fn max_chars(&self, font_size: f32) -> usize {
        let width = self.layout.printable_area().width;
        ((width / (font_size * AVERAGE_GLYPH_WIDTH)) as usize).max(8)
    }
}

/// Object id of the root page node referenced from the catalog
fn page_tree_root(doc: &Document) -> Result<ObjectId, String> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| "No Root in trailer".to_string())?;
    let catalog = doc
        .get_object(catalog_id)
        .and_then(Object::as_dict)
        .map_err(|_| "Catalog not found".to_string())?;
    let pages_id = catalog
        .get(b"Pages")
        .and_then(Object::as_reference)
        .map_err(|_| "No Pages in catalog".to_string())?;
    doc.get_object(pages_id)
        .and_then(Object::as_dict)
        .map_err(|_| "Invalid pages dictionary".to_string())?;
    Ok(pages_id)
}

fn media_box(layout: &PageLayout) -> Object {
    Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Real(layout.width),
        Object::Real(layout.height),
    ])
}

/// Inheritable attributes the page only has through its ancestors. A page
/// with no media box anywhere in its tree gets `fallback_media_box`.
fn inherited_attributes(
    doc: &Document,
    page_id: ObjectId,
    fallback_media_box: &Object,
) -> Vec<(&'static [u8], Object)> {
    let Ok(page) = doc.get_object(page_id).and_then(Object::as_dict) else {
        return Vec::new();
    };

    let mut missing: Vec<&'static [u8]> = INHERITABLE_KEYS
        .iter()
        .copied()
        .filter(|key| !page.has(key))
        .collect();
    let mut found = Vec::new();

    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;
    while let Some(node_id) = parent {
        if missing.is_empty() || depth >= MAX_TREE_DEPTH {
            break;
        }
        let Ok(node) = doc.get_object(node_id).and_then(Object::as_dict) else {
            break;
        };
        missing.retain(|&key| match node.get(key) {
            Ok(value) => {
                found.push((key, value.clone()));
                false
            }
            Err(_) => true,
        });
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }

    if missing.contains(&MEDIA_BOX) {
        found.push((MEDIA_BOX, fallback_media_box.clone()));
    }
    found
}

fn adopt_page(
    doc: &mut Document,
    page_id: ObjectId,
    parent_id: ObjectId,
    attributes: Vec<(&'static [u8], Object)>,
) {
    if let Ok(Object::Dictionary(page)) = doc.get_object_mut(page_id) {
        for (key, value) in attributes {
            page.set(key, value);
        }
        page.set("Parent", Object::Reference(parent_id));
    }
}

/// Consecutive ids after `max_id` for every source object
fn renumber_ids<I>(ids: I, max_id: u32) -> Result<BTreeMap<ObjectId, ObjectId>, String>
where
    I: IntoIterator<Item = ObjectId>,
{
    let mut next = max_id;
    let mut renumbered = BTreeMap::new();
    for id in ids {
        next = next
            .checked_add(1)
            .ok_or_else(|| "Composite document has run out of object ids".to_string())?;
        renumbered.insert(id, (next, 0));
    }
    Ok(renumbered)
}

/// Recursively rewrite object references. References to objects the source
/// does not contain become null.
fn remap_object_refs(obj: Object, renumbered: &BTreeMap<ObjectId, ObjectId>) -> Object {
    match obj {
        Object::Reference(id) => match renumbered.get(&id) {
            Some(&new_id) => Object::Reference(new_id),
            None => Object::Null,
        },
        Object::Array(arr) => Object::Array(
            arr.into_iter()
                .map(|o| remap_object_refs(o, renumbered))
                .collect(),
        ),
        Object::Dictionary(mut dict) => {
            remap_dictionary(&mut dict, renumbered);
            Object::Dictionary(dict)
        }
        Object::Stream(mut stream) => {
            remap_dictionary(&mut stream.dict, renumbered);
            Object::Stream(stream)
        }
        other => other,
    }
}

fn remap_dictionary(dict: &mut Dictionary, renumbered: &BTreeMap<ObjectId, ObjectId>) {
    for (_, value) in dict.iter_mut() {
        let taken = std::mem::replace(value, Object::Null);
        *value = remap_object_refs(taken, renumbered);
    }
}

fn text_operations(lines: &[TextLine], x: f32, top: f32) -> Vec<Operation> {
    let mut operations = Vec::with_capacity(lines.len() * 5);
    let mut y = top;
    for line in lines {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![
                Object::Name(FONT_RESOURCE.as_bytes().to_vec()),
                Object::Real(line.font_size),
            ],
        ));
        operations.push(Operation::new("Td", vec![Object::Real(x), Object::Real(y)]));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(pdf_text(&line.text), StringFormat::Literal)],
        ));
        operations.push(Operation::new("ET", vec![]));
        y -= line.font_size * LINE_SPACING;
    }
    operations
}

/// Helvetica with WinAnsi covers printable ASCII safely; anything else is
/// shown as `?`
fn pdf_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if c == ' ' || c.is_ascii_graphic() { c as u8 } else { b'?' })
        .collect()
}

fn truncate_line(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Greedy word wrap. Words longer than a line are split.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let needed = if current.is_empty() {
            word.len()
        } else {
            current.chars().count() + 1 + word.len()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> PageLayout {
        PageLayout {
            width: 612.0,
            height: 792.0,
            margin: 50.0,
            caption_font_size: 12.0,
        }
    }

    /// Two pages whose media box and resources live on an intermediate node
    fn nested_tree_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let root_id = doc.new_object_id();
        let middle_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });

        let mut kids = Vec::new();
        for i in 0..2 {
            let content = format!("BT /F9 10 Tf 20 20 Td (Nested {}) Tj ET", i);
            let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(middle_id),
                "Contents" => Object::Reference(content_id),
            });
            kids.push(Object::Reference(page_id));
        }

        doc.objects.insert(
            middle_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Parent" => Object::Reference(root_id),
                "Kids" => kids,
                "Count" => 2,
                "MediaBox" => vec![0.into(), 0.into(), 300.into(), 400.into()],
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F9" => Object::Reference(font_id) },
                },
            }),
        );
        doc.objects.insert(
            root_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(middle_id)],
                "Count" => 2,
                "Rotate" => 90,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(root_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    fn page_dicts(bytes: &[u8]) -> (Document, Vec<ObjectId>) {
        let doc = Document::load_mem(bytes).unwrap();
        let pages = doc.get_pages().values().copied().collect();
        (doc, pages)
    }

    #[test]
    fn test_load_rejects_garbage() {
        let result = CompositeDocument::load(b"definitely not a pdf", layout());
        assert!(matches!(result, Err(EvidenceError::PrimaryDocument(_))));
    }

    #[test]
    fn test_load_flattens_inherited_attributes() {
        let composite = CompositeDocument::load(&nested_tree_pdf(), layout()).unwrap();
        assert_eq!(composite.page_count(), 2);

        let bytes = composite.finish().unwrap();
        let (doc, pages) = page_dicts(&bytes);
        assert_eq!(pages.len(), 2);

        for id in pages {
            let page = doc.get_object(id).and_then(Object::as_dict).unwrap();
            let media_box = page.get(b"MediaBox").and_then(Object::as_array).unwrap();
            assert_eq!(media_box[2].as_i64().unwrap(), 300);
            assert_eq!(page.get(b"Rotate").and_then(Object::as_i64).unwrap(), 90);
            assert!(page.get(b"Resources").is_ok());
        }
    }

    #[test]
    fn test_append_document_reparents_and_keeps_resources() {
        let mut composite = CompositeDocument::load(&nested_tree_pdf(), layout()).unwrap();
        let added = composite.append_document(&nested_tree_pdf()).unwrap();
        assert_eq!(added, 2);
        assert_eq!(composite.page_count(), 4);

        let bytes = composite.finish().unwrap();
        let (doc, pages) = page_dicts(&bytes);
        assert_eq!(pages.len(), 4);

        let root = page_tree_root(&doc).unwrap();
        for id in pages {
            let page = doc.get_object(id).and_then(Object::as_dict).unwrap();
            assert_eq!(page.get(b"Parent").and_then(Object::as_reference).unwrap(), root);
            let resources = page.get(b"Resources").and_then(Object::as_dict).unwrap();
            let fonts = resources.get(b"Font").and_then(Object::as_dict).unwrap();
            let font_id = fonts.get(b"F9").and_then(Object::as_reference).unwrap();
            assert!(doc.get_object(font_id).is_ok(), "font reference must resolve");
        }
    }

    #[test]
    fn test_append_document_failure_leaves_composite_untouched() {
        let mut composite = CompositeDocument::load(&nested_tree_pdf(), layout()).unwrap();
        assert!(composite.append_document(b"%PDF-1.7 broken").is_err());
        assert_eq!(composite.page_count(), 2);
    }

    #[test]
    fn test_text_page_appended() {
        let mut composite = CompositeDocument::load(&nested_tree_pdf(), layout()).unwrap();
        composite
            .append_text_page(&[
                TextLine::new("Attachment: r\u{e9}sum\u{e9} (final).docx", 16.0),
                TextLine::new("word ".repeat(60), 11.0),
            ])
            .unwrap();

        let bytes = composite.finish().unwrap();
        let (doc, pages) = page_dicts(&bytes);
        assert_eq!(pages.len(), 3);

        let last = *pages.last().unwrap();
        let page = doc.get_object(last).and_then(Object::as_dict).unwrap();
        assert!(page.get(b"Rotate").is_err(), "generated pages are upright");
        let text = String::from_utf8_lossy(&doc.get_page_content(last).unwrap()).to_string();
        assert!(text.contains("Attachment: r?sum?"));
    }

    #[test]
    fn test_image_decode_array_is_written() {
        let mut composite = CompositeDocument::load(&nested_tree_pdf(), layout()).unwrap();
        let image = PdfImage {
            width: 2,
            height: 2,
            color_space: "DeviceCMYK",
            filter: "DCTDecode",
            data: vec![0; 16],
            soft_mask: None,
            decode: Some(&[1, 0, 1, 0, 1, 0, 1, 0]),
        };
        composite
            .append_image_page(&image, "Evidence: scan.jpg")
            .unwrap();

        let bytes = composite.finish().unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let image_dict = doc
            .objects
            .values()
            .filter_map(|object| match object {
                Object::Stream(stream) => Some(&stream.dict),
                _ => None,
            })
            .find(|dict| dict.get(b"Subtype").and_then(Object::as_name).ok() == Some(&b"Image"[..]))
            .unwrap();
        let decode = image_dict.get(b"Decode").and_then(Object::as_array).unwrap();
        assert_eq!(decode.len(), 8);
        assert_eq!(decode[0].as_i64().unwrap(), 1);
        assert_eq!(
            image_dict.get(b"ColorSpace").and_then(Object::as_name).unwrap(),
            b"DeviceCMYK"
        );
    }

    #[test]
    fn test_renumber_ids_is_compact() {
        let ids = [(7, 0), (u32::MAX - 1, 3), (u32::MAX, 0)];
        let renumbered = renumber_ids(ids, 10).unwrap();
        assert_eq!(renumbered[&(7, 0)], (11, 0));
        assert_eq!(renumbered[&(u32::MAX - 1, 3)], (12, 0));
        assert_eq!(renumbered[&(u32::MAX, 0)], (13, 0));
    }

    #[test]
    fn test_renumber_ids_exhausted() {
        assert!(renumber_ids([(1, 0), (2, 0)], u32::MAX - 1).is_err());
    }

    #[test]
    fn test_dangling_reference_becomes_null() {
        let renumbered = renumber_ids([(1, 0)], 5).unwrap();
        let remapped = remap_object_refs(
            Object::Array(vec![Object::Reference((1, 0)), Object::Reference((9, 0))]),
            &renumbered,
        );
        assert_eq!(
            remapped,
            Object::Array(vec![Object::Reference((6, 0)), Object::Null])
        );
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("a bb ccc dddd", 6), vec!["a bb", "ccc", "dddd"]);
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text("", 4), vec![""]);
    }

    #[test]
    fn test_truncate_line() {
        assert_eq!(truncate_line("short", 10), "short");
        assert_eq!(truncate_line("a-very-long-name.pdf", 10), "a-very-...");
    }

    #[test]
    fn test_pdf_text_replaces_non_ascii() {
        assert_eq!(pdf_text("caf\u{e9} (1)"), b"caf? (1)".to_vec());
    }
}
