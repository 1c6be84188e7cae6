use crate::models::StudentRecord;
use crate::session::Session;

/// The authenticated view: the session plus the highlighted table row.
pub(crate) struct StudentsScreen {
    pub(crate) session: Session,
    pub(crate) selected: usize,
}

impl StudentsScreen {
    pub(crate) fn new(session: Session) -> Self {
        Self {
            session,
            selected: 0,
        }
    }

    pub(crate) fn students(&self) -> &[StudentRecord] {
        self.session.store.list()
    }

    pub(crate) fn current_student(&self) -> Option<&StudentRecord> {
        self.session.store.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        let len = self.session.store.len();
        if len == 0 {
            return;
        }
        let len = len as isize;
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len {
            new = len - 1;
        }
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.session.store.len().saturating_sub(1);
    }

    /// Pull the selection back inside the table after a delete.
    pub(crate) fn ensure_in_bounds(&mut self) {
        let len = self.session.store.len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}
