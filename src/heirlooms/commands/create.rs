use crate::commands::{CmdMessage, CmdResult};
use crate::error::{HeirloomError, Result};
use crate::store::backend::StorageBackend;
use crate::store::heirloom_store::HeirloomStore;

pub fn run<B: StorageBackend>(
    store: &HeirloomStore<B>,
    description: Option<String>,
    image: Option<Vec<u8>>,
) -> Result<CmdResult> {
    let description =
        description.ok_or_else(|| HeirloomError::InvalidInput("description is required".into()))?;
    let image = image
        .filter(|img| !img.is_empty())
        .ok_or_else(|| HeirloomError::InvalidInput("image is required".into()))?;

    let id = store.create(&description, &image)?;
    let heirloom = store.read(&id)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Heirloom created ({}): {}",
        id,
        heirloom.title()
    )));
    Ok(result.with_affected_heirlooms(vec![heirloom]))
}
