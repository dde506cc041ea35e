//! Copying objects between documents.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object, ObjectId};

/// Copies objects from one source document into a target document.
///
/// Every referenced object is copied once and renumbered into the target's
/// id space; later references to the same source object reuse the copy.
/// `Parent` entries are dropped so copying a resource never drags in the
/// source's page tree.
#[derive(Debug, Default)]
pub struct ObjectImporter {
    mapping: HashMap<ObjectId, ObjectId>,
}

impl ObjectImporter {
    /// Create an importer with an empty id mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of source objects copied so far.
    pub fn copied(&self) -> usize {
        self.mapping.len()
    }

    /// Deep copy `object` (which belongs to `source`) into `target`.
    ///
    /// Direct values are returned rewritten; referenced objects are added to
    /// `target` and the returned value points at the copies.
    pub fn import(
        &mut self,
        target: &mut Document,
        source: &Document,
        object: &Object,
    ) -> Object {
        match object {
            Object::Reference(id) => Object::Reference(self.import_reference(target, source, *id)),
            Object::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.import(target, source, item))
                    .collect(),
            ),
            Object::Dictionary(dict) => {
                Object::Dictionary(self.import_dictionary(target, source, dict))
            }
            Object::Stream(stream) => {
                let mut copy = stream.clone();
                copy.dict = self.import_dictionary(target, source, &stream.dict);
                Object::Stream(copy)
            }
            other => other.clone(),
        }
    }

    /// Copy a referenced object, returning its id in `target`.
    ///
    /// Dangling references are copied as `null` objects.
    pub fn import_reference(
        &mut self,
        target: &mut Document,
        source: &Document,
        id: ObjectId,
    ) -> ObjectId {
        if let Some(mapped) = self.mapping.get(&id) {
            return *mapped;
        }

        // Reserve the id first so reference cycles terminate.
        let new_id = target.new_object_id();
        self.mapping.insert(id, new_id);

        let copy = match source.get_object(id) {
            Ok(object) => self.import(target, source, object),
            Err(_) => {
                tracing::trace!(?id, "dangling reference copied as null");
                Object::Null
            }
        };
        target.objects.insert(new_id, copy);

        new_id
    }

    fn import_dictionary(
        &mut self,
        target: &mut Document,
        source: &Document,
        dict: &Dictionary,
    ) -> Dictionary {
        let mut copy = Dictionary::new();
        for (key, value) in dict.iter() {
            if key.as_slice() == b"Parent" {
                continue;
            }
            copy.set(key.clone(), self.import(target, source, value));
        }
        copy
    }
}
