//! Shared fixtures for integration tests
//!
//! A `Desk` is a throwaway inbox/output pair with a store over it. PDF
//! fixtures tell their pages apart by MediaBox width, so page order survives
//! a merge in a checkable way.

use lopdf::{Dictionary, Document, Object};
use scandesk::merge::{MergeEngine, MergeFormatKind};
use scandesk::store::DocumentStore;
use scandesk::types::{DocumentId, Location};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub struct Desk {
    // Held for its Drop; the directories vanish with it.
    _root: TempDir,
    pub inbox: PathBuf,
    pub output: PathBuf,
    pub store: Arc<DocumentStore>,
}

impl Desk {
    pub fn new(format: MergeFormatKind) -> Self {
        let root = TempDir::new().unwrap();
        let inbox = root.path().join("inbox");
        let output = root.path().join("out");
        fs::create_dir_all(&inbox).unwrap();
        fs::create_dir_all(&output).unwrap();
        let store =
            DocumentStore::new(&inbox, &output, MergeEngine::from_kind(format)).unwrap();
        Self {
            inbox: store.dir(Location::Inbox).to_path_buf(),
            output: store.dir(Location::Output).to_path_buf(),
            store: Arc::new(store),
            _root: root,
        }
    }

    pub fn pdf() -> Self {
        Self::new(MergeFormatKind::Pdf)
    }

    pub fn concat() -> Self {
        Self::new(MergeFormatKind::Concat)
    }

    /// Write `bytes` into the inbox and return the id the listing will report
    pub fn put(&self, name: &str, bytes: &[u8]) -> DocumentId {
        fs::write(self.inbox.join(name), bytes).unwrap();
        self.id_of(Location::Inbox, name)
    }

    /// Id of `name` as currently listed in `location`
    pub fn id_of(&self, location: Location, name: &str) -> DocumentId {
        self.store
            .list(location)
            .unwrap()
            .into_iter()
            .find(|e| e.name == name)
            .map(|e| e.id)
            .unwrap_or_else(|| panic!("{name} not listed in {location}"))
    }

    pub fn names(&self, location: Location) -> Vec<String> {
        let mut names: Vec<String> = self
            .store
            .list(location)
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        names.sort();
        names
    }
}

/// A PDF with one page per entry of `widths`
pub fn pdf_with_widths(widths: &[i64]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for width in widths {
        let mut page = Dictionary::new();
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", pages_id);
        page.set(
            "MediaBox",
            vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(*width),
                Object::Integer(792),
            ],
        );
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let mut tree = Dictionary::new();
    tree.set("Type", Object::Name(b"Pages".to_vec()));
    tree.set("Count", widths.len() as i64);
    tree.set("Kids", kids);
    doc.objects.insert(pages_id, Object::Dictionary(tree));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", pages_id);
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Page widths of the PDF at `path`, in page order
pub fn page_widths(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .into_values()
        .map(|id| {
            let page = doc.get_dictionary(id).unwrap();
            page.get(b"MediaBox").unwrap().as_array().unwrap()[2]
                .as_i64()
                .unwrap()
        })
        .collect()
}
