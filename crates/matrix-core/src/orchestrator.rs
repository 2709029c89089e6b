use std::rc::Rc;

use matrix_shared::{
  Quadrant,
  TaskId
};
use tracing::{
  debug,
  info,
  warn
};

use crate::api::TaskApi;
use crate::board::{
  AddTaskModal,
  BoardView,
  Delay
};
use crate::config::{
  ClientConfig,
  FailurePolicy
};
use crate::error::{
  ApiOp,
  BoardError,
  RequestFailed
};
use crate::form::AddDraft;
use crate::keyboard::Shortcut;
use crate::notice::{
  self,
  Notice,
  Notifier
};
use crate::quadrant_list::reconcile_quadrant;
use crate::render::render_task_card;
use crate::session::{
  DragState,
  InFlightGuard,
  SharedSession
};

/// Collaborators injected into the
/// orchestrator.
pub struct Ports {
  pub api:      Rc<dyn TaskApi>,
  pub board:    Rc<dyn BoardView>,
  pub modal:    Rc<dyn AddTaskModal>,
  pub notifier: Rc<dyn Notifier>,
  pub delay:    Rc<dyn Delay>
}

/// How a gesture that reached the
/// server-confirmed state ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled {
  Added(TaskId),
  Completed(TaskId),
  Deleted(TaskId),
  Moved {
    id:   TaskId,
    from: Quadrant,
    to:   Quadrant
  },
  Unchanged
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
enum Retire {
  Complete,
  Delete
}

impl Retire {
  fn op(self) -> ApiOp {
    match self {
      | Retire::Complete => ApiOp::Complete,
      | Retire::Delete => ApiOp::Delete
    }
  }

  fn success_message(
    self
  ) -> &'static str {
    match self {
      | Retire::Complete => {
        notice::TASK_COMPLETED
      }
      | Retire::Delete => {
        notice::TASK_DELETED
      }
    }
  }

  fn failure_message(
    self
  ) -> &'static str {
    match self {
      | Retire::Complete => {
        notice::TASK_COMPLETE_FAILED
      }
      | Retire::Delete => {
        notice::TASK_DELETE_FAILED
      }
    }
  }

  fn settled(self, id: TaskId) -> Settled {
    match self {
      | Retire::Complete => {
        Settled::Completed(id)
      }
      | Retire::Delete => {
        Settled::Deleted(id)
      }
    }
  }
}

/// Coordinates board changes, API calls
/// and user feedback for every mutation.
pub struct Orchestrator {
  api:            Rc<dyn TaskApi>,
  board:          Rc<dyn BoardView>,
  modal:          Rc<dyn AddTaskModal>,
  notifier:       Rc<dyn Notifier>,
  delay:          Rc<dyn Delay>,
  session:        SharedSession,
  card_fade_ms:   u32,
  failure_policy: FailurePolicy
}

impl Orchestrator {
  pub fn new(
    ports: Ports,
    session: SharedSession,
    config: &ClientConfig
  ) -> Self {
    Self {
      api: ports.api,
      board: ports.board,
      modal: ports.modal,
      notifier: ports.notifier,
      delay: ports.delay,
      session,
      card_fade_ms: config
        .timing
        .card_fade_ms,
      failure_policy: config
        .behavior
        .failure_policy
    }
  }

  pub fn session(&self) -> &SharedSession {
    &self.session
  }

  pub fn apply_shortcut(
    &self,
    shortcut: Shortcut
  ) {
    match shortcut {
      | Shortcut::CloseAddForm => {
        debug!("closing add form");
        self.modal.close();
      }
      | Shortcut::OpenAddForm(quadrant) => {
        debug!(%quadrant, "opening add form");
        self.modal.open(quadrant);
      }
    }
  }

  /// Pessimistic create: nothing touches
  /// the board until the server has
  /// handed back the task and its id.
  #[tracing::instrument(skip_all)]
  pub async fn add(
    &self,
    draft: &AddDraft
  ) -> Result<Settled, BoardError> {
    let args = match draft.validate() {
      | Ok(args) => args,
      | Err(error) => {
        warn!(%error, "add form rejected");
        self
          .notifier
          .notify(Notice::error(
            error.to_string()
          ));
        return Err(error.into());
      }
    };

    info!(
      quadrant = %args.quadrant,
      content_len = args.content.len(),
      "submitting new task"
    );

    let reply = self
      .api
      .add_task(&args)
      .await
      .and_then(|envelope| {
        envelope.data.ok_or_else(|| {
          RequestFailed::transport(
            ApiOp::Add,
            None,
            "response carried no task"
          )
        })
      });

    let task = match reply {
      | Ok(task) => task,
      | Err(error) => {
        warn!(%error, "add task failed");
        self.notifier.notify(
          Notice::error(
            notice::TASK_ADD_FAILED
          )
        );
        return Err(error.into());
      }
    };

    if let Some(existing) =
      self.board.card_quadrant(&task.id)
    {
      warn!(
        task_id = %task.id,
        %existing,
        "server returned an id that is \
         already on the board; not \
         rendering a duplicate"
      );
    } else {
      let card = render_task_card(&task);
      if !self.board.append_card(&card) {
        warn!(
          task_id = %task.id,
          quadrant = %task.quadrant,
          "no task list for quadrant; \
           card not rendered"
        );
      }
    }
    reconcile_quadrant(
      self.board.as_ref(),
      task.quadrant
    );

    self.modal.close();
    self.notifier.notify(Notice::success(
      notice::TASK_ADDED
    ));
    info!(
      task_id = %task.id,
      quadrant = %task.quadrant,
      label = task.quadrant.label(),
      "task added"
    );
    Ok(Settled::Added(task.id))
  }

  pub async fn complete(
    &self,
    id: TaskId
  ) -> Result<Settled, BoardError> {
    self.retire(Retire::Complete, id).await
  }

  pub async fn delete(
    &self,
    id: TaskId
  ) -> Result<Settled, BoardError> {
    self.retire(Retire::Delete, id).await
  }

  /// Fade first, request alongside the
  /// fade, remove once both are done.
  #[tracing::instrument(skip_all, fields(op = %kind.op(), task_id = %id))]
  async fn retire(
    &self,
    kind: Retire,
    id: TaskId
  ) -> Result<Settled, BoardError> {
    let Some(origin) =
      self.board.card_quadrant(&id)
    else {
      debug!(
        task_id = %id,
        "no card for task; ignoring"
      );
      return Err(
        BoardError::StaleReference(id)
      );
    };

    let Some(_claim) =
      InFlightGuard::claim(&self.session, &id)
    else {
      warn!(
        task_id = %id,
        "mutation already in flight; \
         ignoring"
      );
      return Err(BoardError::Busy(id));
    };

    self.board.set_card_fading(&id, true);

    let request = async {
      match kind {
        | Retire::Complete => {
          self.api.complete_task(&id).await
        }
        | Retire::Delete => {
          self.api.delete_task(&id).await
        }
      }
    };
    let (reply, ()) = futures::join!(
      request,
      self.delay.sleep(self.card_fade_ms)
    );

    match reply {
      | Ok(_) => {
        self.remove_and_reconcile(&id, origin);
        self.notifier.notify(
          Notice::success(
            kind.success_message()
          )
        );
        info!(task_id = %id, "task retired");
        Ok(kind.settled(id))
      }
      | Err(error) => {
        match self.failure_policy {
          | FailurePolicy::Rollback => {
            warn!(
              %error,
              "request failed; restoring \
               card"
            );
            if !self
              .board
              .set_card_fading(&id, false)
            {
              debug!(
                task_id = %id,
                "card vanished before \
                 rollback"
              );
            }
          }
          | FailurePolicy::Remove => {
            warn!(
              %error,
              "request failed; removing \
               card anyway"
            );
            self.remove_and_reconcile(&id, origin);
          }
        }
        self.notifier.notify(Notice::error(
          kind.failure_message()
        ));
        Err(error.into())
      }
    }
  }

  /// Removes the card from wherever it is
  /// now. A card that already vanished
  /// still gets its last known quadrant
  /// reconciled.
  fn remove_and_reconcile(
    &self,
    id: &TaskId,
    origin: Quadrant
  ) {
    let quadrant =
      match self.board.card_quadrant(id) {
        | Some(quadrant) => {
          self.board.remove_card(id);
          quadrant
        }
        | None => {
          debug!(
            task_id = %id,
            "card already gone"
          );
          origin
        }
      };
    reconcile_quadrant(
      self.board.as_ref(),
      quadrant
    );
  }

  /// Records the card being dragged.
  /// Returns false for a card that is
  /// not on the board.
  pub fn begin_drag(
    &self,
    id: &TaskId
  ) -> bool {
    let Some(source) =
      self.board.card_quadrant(id)
    else {
      debug!(
        task_id = %id,
        "drag start on unknown card"
      );
      return false;
    };

    let abandoned = self
      .session
      .borrow_mut()
      .begin_drag(DragState {
        task_id: id.clone(),
        source
      });
    if let Some(abandoned) = abandoned {
      self.board.set_card_dragging(
        &abandoned.task_id,
        false
      );
    }
    self.board.set_card_dragging(id, true);
    debug!(
      task_id = %id,
      %source,
      "drag started"
    );
    true
  }

  /// Pointer entered a quadrant. Returns
  /// whether a drop there would be
  /// accepted.
  pub fn drag_over(
    &self,
    quadrant: Quadrant
  ) -> bool {
    let previous = {
      let mut session =
        self.session.borrow_mut();
      if session.drag().is_none() {
        return false;
      }
      session.set_hover(quadrant)
    };
    if let Some(previous) = previous {
      self
        .board
        .set_drop_hint(previous, false);
    }
    self.board.set_drop_hint(quadrant, true);
    true
  }

  pub fn drag_leave(
    &self,
    quadrant: Quadrant
  ) {
    let left = {
      let mut session =
        self.session.borrow_mut();
      if session.hover() == Some(quadrant) {
        session.take_hover()
      } else {
        None
      }
    };
    self.board.set_drop_hint(quadrant, false);
    if left.is_some() {
      debug!(%quadrant, "drag left quadrant");
    }
  }

  /// Drag finished without a drop, or the
  /// dragend that follows a drop.
  pub fn end_drag(&self) {
    let (drag, hover) = {
      let mut session =
        self.session.borrow_mut();
      (session.take_drag(), session.take_hover())
    };
    if let Some(hover) = hover {
      self.board.set_drop_hint(hover, false);
    }
    if let Some(drag) = drag {
      self.board.set_card_dragging(
        &drag.task_id,
        false
      );
      debug!(
        task_id = %drag.task_id,
        "drag ended without drop"
      );
    }
  }

  pub async fn drop_on(
    &self,
    quadrant: Quadrant
  ) -> Result<Settled, BoardError> {
    let (drag, hover) = {
      let mut session =
        self.session.borrow_mut();
      (session.take_drag(), session.take_hover())
    };
    if let Some(hover) = hover {
      self.board.set_drop_hint(hover, false);
    }
    self.board.set_drop_hint(quadrant, false);

    let Some(drag) = drag else {
      debug!(
        %quadrant,
        "drop ignored; no drag in progress"
      );
      return Err(
        BoardError::NoDragInProgress
      );
    };
    self.board.set_card_dragging(
      &drag.task_id,
      false
    );

    self.move_task(drag.task_id, quadrant).await
  }

  /// Confirm first, relocate second: the
  /// card only moves once the server
  /// agrees.
  #[tracing::instrument(skip_all, fields(task_id = %id, to = %to))]
  pub async fn move_task(
    &self,
    id: TaskId,
    to: Quadrant
  ) -> Result<Settled, BoardError> {
    let Some(from) =
      self.board.card_quadrant(&id)
    else {
      debug!("no card for task; ignoring");
      return Err(
        BoardError::StaleReference(id)
      );
    };
    if from == to {
      debug!("dropped on its own quadrant");
      return Ok(Settled::Unchanged);
    }

    let Some(_claim) =
      InFlightGuard::claim(&self.session, &id)
    else {
      warn!(
        "mutation already in flight; \
         ignoring"
      );
      return Err(BoardError::Busy(id));
    };

    if let Err(error) =
      self.api.move_task(&id, to).await
    {
      warn!(%error, "move task failed");
      self.notifier.notify(Notice::error(
        notice::TASK_MOVE_FAILED
      ));
      return Err(error.into());
    }

    let Some(current) =
      self.board.card_quadrant(&id)
    else {
      debug!(
        "card vanished while the move \
         was in flight"
      );
      return Err(
        BoardError::StaleReference(id)
      );
    };

    self.board.relocate_card(&id, to);
    reconcile_quadrant(
      self.board.as_ref(),
      current
    );
    reconcile_quadrant(
      self.board.as_ref(),
      to
    );

    self.notifier.notify(Notice::success(
      notice::TASK_MOVED
    ));
    info!(
      from = %current,
      to_label = to.label(),
      "task moved"
    );
    Ok(Settled::Moved {
      id,
      from: current,
      to
    })
  }
}
