use crate::commands::{CmdMessage, CmdResult};
use crate::error::{HeirloomError, Result};
use crate::model::{first_line, HeirloomSummary};
use crate::store::backend::StorageBackend;
use crate::store::heirloom_store::HeirloomStore;

pub fn run<B: StorageBackend>(store: &HeirloomStore<B>) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let mut summaries = Vec::new();
    for id in store.list()? {
        let description = match store.description(&id) {
            Ok(d) => d,
            // Deleted between listing and reading.
            Err(HeirloomError::NotFound(_)) => {
                result.add_message(CmdMessage::warning(format!(
                    "Heirloom {} was removed while listing",
                    id
                )));
                continue;
            }
            Err(e) => return Err(e),
        };
        let modified_at = store.modified_at(&id)?;
        summaries.push(HeirloomSummary {
            title: first_line(&description).to_string(),
            id,
            modified_at,
        });
    }
    Ok(result.with_listed_heirlooms(summaries))
}
