use crate::commands::{CmdMessage, CmdResult, HeirloomUpdate};
use crate::error::Result;
use crate::store::backend::StorageBackend;
use crate::store::heirloom_store::HeirloomStore;

pub fn run<B: StorageBackend>(store: &HeirloomStore<B>, update: HeirloomUpdate) -> Result<CmdResult> {
    let empty_image = update.image.as_ref().is_some_and(|img| img.is_empty());
    let replaces_image = update.image.is_some() && !empty_image;
    store.update(&update.id, &update.description, update.image.as_deref())?;
    let heirloom = store.read(&update.id)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Heirloom updated ({}): {}",
        heirloom.id,
        heirloom.title()
    )));
    if empty_image {
        result.add_message(CmdMessage::warning("Empty image ignored, stored image kept"));
    } else if !replaces_image {
        result.add_message(CmdMessage::info("Image unchanged"));
    }
    Ok(result.with_affected_heirlooms(vec![heirloom]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{view, MessageLevel};
    use crate::error::HeirloomError;
    use crate::model::HeirloomId;
    use crate::store::mem_backend::MemBackend;

    #[test]
    fn updates_description_and_keeps_image() {
        let store = HeirloomStore::with_backend(MemBackend::new());
        let id = store.create("ring", b"PNG-A").unwrap();

        let update = HeirloomUpdate::new(id.clone(), "ring, 1952".into(), None);
        let result = run(&store, update).unwrap();
        assert!(result
            .messages
            .iter()
            .any(|m| m.content == "Image unchanged"));

        let viewed = view::run(&store, &id).unwrap().affected_heirlooms;
        assert_eq!(viewed[0].description, "ring, 1952");
        assert_eq!(viewed[0].image, b"PNG-A");
    }

    #[test]
    fn replaces_image_when_given() {
        let store = HeirloomStore::with_backend(MemBackend::new());
        let id = store.create("ring", b"PNG-A").unwrap();

        let update = HeirloomUpdate::new(id.clone(), "ring".into(), Some(b"PNG-B".to_vec()));
        let result = run(&store, update).unwrap();
        assert_eq!(result.affected_heirlooms[0].image, b"PNG-B");
        assert_eq!(result.messages.len(), 1);
    }

    #[test]
    fn empty_image_warns_and_keeps_stored_image() {
        let store = HeirloomStore::with_backend(MemBackend::new());
        let id = store.create("ring", b"PNG-A").unwrap();

        let update = HeirloomUpdate::new(id.clone(), "ring".into(), Some(Vec::new()));
        let result = run(&store, update).unwrap();
        assert_eq!(result.affected_heirlooms[0].image, b"PNG-A");
        assert!(result
            .messages
            .iter()
            .any(|m| m.level == MessageLevel::Warning && m.content.contains("Empty image")));
    }

    #[test]
    fn missing_heirloom_is_not_found() {
        let store = HeirloomStore::with_backend(MemBackend::new());
        let id: HeirloomId = "999999999999".parse().unwrap();
        let update = HeirloomUpdate::new(id, "x".into(), None);
        assert!(matches!(run(&store, update), Err(HeirloomError::NotFound(_))));
        assert_eq!(store.backend().location_count(), 0);
    }
}
