use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use matrix_shared::{
  Quadrant,
  TaskId
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragState {
  pub task_id: TaskId,
  pub source:  Quadrant
}

/// Transient UI state for one page
/// session: the drag in progress, the
/// quadrant under the pointer, and the
/// task ids with a request outstanding.
#[derive(Debug, Default)]
pub struct Session {
  drag:      Option<DragState>,
  hover:     Option<Quadrant>,
  in_flight: BTreeSet<TaskId>
}

pub type SharedSession =
  Rc<RefCell<Session>>;

impl Session {
  pub fn shared() -> SharedSession {
    Rc::new(RefCell::new(
      Session::default()
    ))
  }

  /// Starts a drag, handing back any drag
  /// that never saw its drop or dragend.
  pub fn begin_drag(
    &mut self,
    drag: DragState
  ) -> Option<DragState> {
    self.drag.replace(drag)
  }

  pub fn drag(&self) -> Option<&DragState> {
    self.drag.as_ref()
  }

  pub fn take_drag(
    &mut self
  ) -> Option<DragState> {
    self.drag.take()
  }

  /// Records the hovered quadrant and
  /// returns the previous one when it
  /// changed.
  pub fn set_hover(
    &mut self,
    quadrant: Quadrant
  ) -> Option<Quadrant> {
    match self.hover.replace(quadrant) {
      | Some(previous)
        if previous != quadrant =>
      {
        Some(previous)
      }
      | _ => None
    }
  }

  pub fn take_hover(
    &mut self
  ) -> Option<Quadrant> {
    self.hover.take()
  }

  pub fn hover(&self) -> Option<Quadrant> {
    self.hover
  }

  pub fn is_in_flight(
    &self,
    id: &TaskId
  ) -> bool {
    self.in_flight.contains(id)
  }

  pub fn in_flight_count(&self) -> usize {
    self.in_flight.len()
  }
}

/// Claim on a task id for the lifetime of
/// one mutation. Dropping it frees the id.
#[derive(Debug)]
pub struct InFlightGuard {
  session: SharedSession,
  id:      TaskId
}

impl InFlightGuard {
  /// `None` when the id is already
  /// claimed by another mutation.
  pub fn claim(
    session: &SharedSession,
    id: &TaskId
  ) -> Option<Self> {
    if !session
      .borrow_mut()
      .in_flight
      .insert(id.clone())
    {
      return None;
    }
    Some(Self {
      session: Rc::clone(session),
      id:      id.clone()
    })
  }
}

impl Drop for InFlightGuard {
  fn drop(&mut self) {
    self
      .session
      .borrow_mut()
      .in_flight
      .remove(&self.id);
  }
}
