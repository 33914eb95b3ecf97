use parking_lot::Mutex;

use crate::notes::model::NoteFormValues;

/// Single slot for a note the user has started but not submitted.
#[derive(Debug, Default)]
pub struct DraftStore {
    draft: Mutex<Option<NoteFormValues>>,
}

impl DraftStore {
    pub fn get(&self) -> Option<NoteFormValues> {
        self.draft.lock().clone()
    }

    pub fn set(&self, draft: NoteFormValues) {
        *self.draft.lock() = Some(draft);
    }

    pub fn clear(&self) {
        self.draft.lock().take();
    }
}
