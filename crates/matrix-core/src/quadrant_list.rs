use matrix_shared::Quadrant;
use tracing::debug;

use crate::board::BoardView;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum ListState {
  Empty,
  Populated(usize)
}

/// Brings one quadrant's list back to
/// "placeholder iff no cards". Safe to
/// call any number of times.
pub fn reconcile_quadrant(
  board: &dyn BoardView,
  quadrant: Quadrant
) -> ListState {
  let cards = board.card_count(quadrant);
  let placeholders =
    board.placeholder_count(quadrant);

  if cards > 0 {
    if placeholders > 0 {
      debug!(
        %quadrant,
        cards,
        "removing empty-state placeholder"
      );
      board.remove_placeholders(quadrant);
    }
    return ListState::Populated(cards);
  }

  match placeholders {
    | 1 => {}
    | 0 => {
      debug!(
        %quadrant,
        "quadrant emptied; inserting \
         placeholder"
      );
      board.insert_placeholder(quadrant);
    }
    | extra => {
      debug!(
        %quadrant,
        extra,
        "collapsing duplicate \
         placeholders"
      );
      board.remove_placeholders(quadrant);
      board.insert_placeholder(quadrant);
    }
  }
  ListState::Empty
}

pub fn reconcile_all(
  board: &dyn BoardView
) -> [ListState; 4] {
  Quadrant::ALL.map(|quadrant| {
    reconcile_quadrant(board, quadrant)
  })
}
