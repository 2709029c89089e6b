pub const TASK_ADDED: &str =
  "Task added successfully";
pub const TASK_ADD_FAILED: &str =
  "Failed to add task";
pub const TASK_COMPLETED: &str =
  "Task completed successfully";
pub const TASK_COMPLETE_FAILED: &str =
  "Failed to complete task";
pub const TASK_DELETED: &str =
  "Task deleted";
pub const TASK_DELETE_FAILED: &str =
  "Failed to delete task";
pub const TASK_MOVED: &str =
  "Task moved successfully";
pub const TASK_MOVE_FAILED: &str =
  "Failed to move task";

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum NoticeKind {
  Success,
  Error
}

impl NoticeKind {
  pub fn css_class(self) -> &'static str {
    match self {
      | NoticeKind::Success => "success",
      | NoticeKind::Error => "error"
    }
  }
}

/// One toast worth of user feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
  pub message: String,
  pub kind:    NoticeKind
}

impl Notice {
  pub fn success(
    message: impl Into<String>
  ) -> Self {
    Self {
      message: message.into(),
      kind:    NoticeKind::Success
    }
  }

  pub fn error(
    message: impl Into<String>
  ) -> Self {
    Self {
      message: message.into(),
      kind:    NoticeKind::Error
    }
  }

  pub fn is_error(&self) -> bool {
    self.kind == NoticeKind::Error
  }
}

/// Shows notices. Every call stands
/// alone: no de-duplication, no queue.
pub trait Notifier {
  fn notify(&self, notice: Notice);
}
