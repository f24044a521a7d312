use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::HeirloomId;
use crate::store::backend::StorageBackend;
use crate::store::heirloom_store::HeirloomStore;

pub fn run<B: StorageBackend>(store: &HeirloomStore<B>, id: &HeirloomId) -> Result<CmdResult> {
    let image = store.image(id)?;
    let path = store.image_path(id)?;
    Ok(CmdResult::default()
        .with_image(image)
        .with_image_paths(vec![path]))
}
