use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::HeirloomId;
use crate::store::backend::StorageBackend;
use crate::store::heirloom_store::HeirloomStore;

pub fn run<B: StorageBackend>(store: &HeirloomStore<B>, id: &HeirloomId) -> Result<CmdResult> {
    store.delete(id)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Heirloom deleted: {}", id)));
    Ok(result)
}
