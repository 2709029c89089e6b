use async_trait::async_trait;
use matrix_shared::{
  Quadrant,
  TaskId
};

use crate::render::TaskCard;

/// The mutable surface the orchestrator
/// reconciles. Every call addresses cards
/// by task id and quadrants by number;
/// implementations look elements up
/// afresh on each call, so nothing is
/// cached across an await.
pub trait BoardView {
  /// Quadrant currently holding the card,
  /// or `None` when no such card exists.
  fn card_quadrant(
    &self,
    id: &TaskId
  ) -> Option<Quadrant>;

  fn card_count(
    &self,
    quadrant: Quadrant
  ) -> usize;

  fn placeholder_count(
    &self,
    quadrant: Quadrant
  ) -> usize;

  fn insert_placeholder(
    &self,
    quadrant: Quadrant
  );

  fn remove_placeholders(
    &self,
    quadrant: Quadrant
  );

  /// Returns false when the card's
  /// quadrant has no list to append to.
  fn append_card(
    &self,
    card: &TaskCard
  ) -> bool;

  fn remove_card(&self, id: &TaskId)
  -> bool;

  /// Detaches the card from its list and
  /// appends it to `quadrant`'s list in
  /// one synchronous step.
  fn relocate_card(
    &self,
    id: &TaskId,
    quadrant: Quadrant
  ) -> bool;

  fn set_card_fading(
    &self,
    id: &TaskId,
    fading: bool
  ) -> bool;

  fn set_card_dragging(
    &self,
    id: &TaskId,
    dragging: bool
  );

  fn set_drop_hint(
    &self,
    quadrant: Quadrant,
    active: bool
  );
}

pub trait AddTaskModal {
  /// Shows the modal with `quadrant`
  /// preselected and the content field
  /// focused.
  fn open(&self, quadrant: Quadrant);

  /// Hides the modal and resets the form.
  fn close(&self);

  fn is_open(&self) -> bool;
}

/// Timer used to stage the card fade.
#[async_trait(?Send)]
pub trait Delay {
  async fn sleep(&self, millis: u32);
}
