//! Page-level PDF merge using lopdf
//!
//! Each source is parsed, its objects renumbered into a shared id space, and
//! its pages appended to a fresh page tree in source order. Document-level
//! structure of the sources (catalogs, page trees, outlines) is dropped.

use crate::error::MergeError;
use crate::merge::{MergeFormat, SourceDocument};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::io::Write;
use tracing::debug;

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Object types rebuilt for the merged document rather than copied
const REBUILT_TYPES: [&[u8]; 5] = [b"Catalog", b"Pages", b"Page", b"Outlines", b"Outline"];

/// Guards the parent walk against cyclic page trees
const MAX_TREE_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfFormat;

impl MergeFormat for PdfFormat {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn combine(&self, sources: &[SourceDocument], out: &mut dyn Write) -> Result<(), MergeError> {
        let mut merged = Document::with_version("1.5");
        let mut max_id: u32 = 1;
        let mut pages: Vec<(ObjectId, Dictionary)> = Vec::new();

        for source in sources {
            let unreadable = |reason: String| MergeError::SourceUnreadable {
                path: source.path.clone(),
                reason,
            };

            let mut doc = Document::load_mem(&source.bytes).map_err(|e| unreadable(e.to_string()))?;
            doc.renumber_objects_with(max_id);
            max_id = doc.max_id + 1;

            if doc.version > merged.version {
                merged.version = doc.version.clone();
            }

            let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
            if page_ids.is_empty() {
                return Err(unreadable("document has no pages".to_string()));
            }
            debug!(source = ?source.path, pages = page_ids.len(), "Appending PDF pages");

            for page_id in page_ids {
                let mut page = doc
                    .get_dictionary(page_id)
                    .map_err(|e| unreadable(e.to_string()))?
                    .clone();
                inherit_attributes(&doc, &mut page);
                pages.push((page_id, page));
            }

            for (object_id, object) in doc.objects {
                let rebuilt = type_of(&object)
                    .map(|t| REBUILT_TYPES.iter().any(|r| *r == t))
                    .unwrap_or(false);
                if !rebuilt {
                    merged.objects.insert(object_id, object);
                }
            }
        }

        merged.max_id = max_id;
        let pages_id = merged.new_object_id();
        let kids: Vec<Object> = pages.iter().map(|(id, _)| Object::Reference(*id)).collect();
        let count = pages.len() as i64;

        for (page_id, mut page) in pages {
            page.set("Parent", pages_id);
            merged.objects.insert(page_id, Object::Dictionary(page));
        }

        let mut tree = Dictionary::new();
        tree.set("Type", Object::Name(b"Pages".to_vec()));
        tree.set("Kids", kids);
        tree.set("Count", count);
        merged.objects.insert(pages_id, Object::Dictionary(tree));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", pages_id);
        let catalog_id = merged.add_object(catalog);
        merged.trailer.set("Root", catalog_id);

        merged.compress();

        let mut sink = out;
        merged
            .save_to(&mut sink)
            .map_err(|e| MergeError::Format(e.to_string()))
    }
}

fn type_of(object: &Object) -> Option<&[u8]> {
    object.as_dict().ok()?.get(b"Type").ok()?.as_name().ok()
}

/// Copy inheritable attributes down from the page tree onto the page itself,
/// since the source page tree is not carried into the merged document.
fn inherit_attributes(doc: &Document, page: &mut Dictionary) {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;

    while let Some(parent_id) = parent {
        if depth >= MAX_TREE_DEPTH {
            break;
        }
        let Ok(node) = doc.get_dictionary(parent_id) else {
            break;
        };
        for key in INHERITABLE {
            if !page.has(key) {
                if let Ok(value) = node.get(key) {
                    page.set(key.to_vec(), value.clone());
                }
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }
}
