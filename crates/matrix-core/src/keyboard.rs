use matrix_shared::Quadrant;

use crate::config::ShortcutModifier;

/// The parts of a keydown the board cares
/// about.
#[derive(Debug, Clone, Default)]
pub struct KeyInput {
  pub key:  String,
  pub alt:  bool,
  pub ctrl: bool,
  pub meta: bool
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Shortcut {
  CloseAddForm,
  OpenAddForm(Quadrant)
}

pub fn shortcut_for(
  input: &KeyInput,
  modifier: ShortcutModifier,
  modal_open: bool
) -> Option<Shortcut> {
  if input.key == "Escape" {
    return modal_open
      .then_some(Shortcut::CloseAddForm);
  }

  let held = match modifier {
    | ShortcutModifier::Alt => input.alt,
    | ShortcutModifier::Ctrl => input.ctrl,
    | ShortcutModifier::Meta => input.meta
  };
  if !held {
    return None;
  }

  match input.key.as_str() {
    | "1" | "2" | "3" | "4" => {
      Quadrant::parse(&input.key)
        .map(Shortcut::OpenAddForm)
    }
    | _ => None
  }
}
