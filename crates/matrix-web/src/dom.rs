use matrix_core::render::{
  DRAG_OVER_CLASS,
  DRAGGING_CLASS,
  EMPTY_STATE_CLASS,
  EMPTY_STATE_MARKUP,
  FADE_OUT_CLASS,
  QUADRANT_ATTR,
  QUADRANT_CLASS,
  TASK_CARD_CLASS,
  TASK_ID_ATTR,
  TASK_LIST_CLASS,
  TaskCard
};
use matrix_core::{
  Quadrant,
  TaskId
};
use matrix_core::board::BoardView;
use wasm_bindgen::JsCast;
use web_sys::{
  Document,
  Element,
  NodeList
};

fn elements(
  list: NodeList
) -> impl Iterator<Item = Element> {
  (0..list.length())
    .filter_map(move |index| {
      list.item(index)
    })
    .filter_map(|node| {
      node.dyn_into::<Element>().ok()
    })
}

fn select_all(
  root: &Element,
  class: &str
) -> Vec<Element> {
  root
    .query_selector_all(&format!(
      ".{class}"
    ))
    .map(|list| elements(list).collect())
    .unwrap_or_default()
}

/// Quadrant of the nearest
/// `.matrix-quadrant` around `element`.
pub fn enclosing_quadrant(
  element: &Element
) -> Option<Quadrant> {
  element
    .closest(&format!(
      ".{QUADRANT_CLASS}"
    ))
    .ok()
    .flatten()
    .and_then(|quadrant| {
      quadrant
        .get_attribute(QUADRANT_ATTR)
    })
    .and_then(|raw| {
      Quadrant::parse(&raw)
    })
}

/// Task id of the nearest `.task-card`
/// around `element`.
pub fn enclosing_card_id(
  element: &Element
) -> Option<TaskId> {
  element
    .closest(&format!(
      ".{TASK_CARD_CLASS}"
    ))
    .ok()
    .flatten()
    .and_then(|card| {
      card.get_attribute(TASK_ID_ATTR)
    })
    .filter(|raw| !raw.is_empty())
    .map(TaskId::new)
}

/// `BoardView` over the live document.
/// Ids and quadrant numbers are compared
/// as attribute values, never spliced
/// into selectors.
pub struct DomBoard {
  document: Document
}

impl DomBoard {
  pub fn new(document: Document) -> Self {
    Self { document }
  }

  fn root(&self) -> Option<Element> {
    self.document.document_element()
  }

  fn all(
    &self,
    class: &str
  ) -> Vec<Element> {
    self
      .root()
      .map(|root| select_all(&root, class))
      .unwrap_or_default()
  }

  fn find_card(
    &self,
    id: &TaskId
  ) -> Option<Element> {
    self
      .all(TASK_CARD_CLASS)
      .into_iter()
      .find(|card| {
        card
          .get_attribute(TASK_ID_ATTR)
          .as_deref()
          == Some(id.as_str())
      })
  }

  fn quadrant_element(
    &self,
    quadrant: Quadrant
  ) -> Option<Element> {
    let wanted =
      quadrant.number().to_string();
    self
      .all(QUADRANT_CLASS)
      .into_iter()
      .find(|element| {
        element
          .get_attribute(QUADRANT_ATTR)
          .as_deref()
          == Some(wanted.as_str())
      })
  }

  fn task_list(
    &self,
    quadrant: Quadrant
  ) -> Option<Element> {
    self
      .quadrant_element(quadrant)?
      .query_selector(&format!(
        ".{TASK_LIST_CLASS}"
      ))
      .ok()
      .flatten()
  }

  fn count_in_list(
    &self,
    quadrant: Quadrant,
    class: &str
  ) -> usize {
    self
      .task_list(quadrant)
      .map(|list| {
        select_all(&list, class).len()
      })
      .unwrap_or(0)
  }

  /// Server-rendered cards arrive without
  /// `draggable`; every card gets it.
  pub fn mark_cards_draggable(&self) {
    for card in self.all(TASK_CARD_CLASS) {
      if let Err(error) = card
        .set_attribute("draggable", "true")
      {
        tracing::warn!(
          ?error,
          "failed marking card draggable"
        );
      }
    }
  }

  /// Quadrants without an accessible name
  /// get their human label.
  pub fn label_quadrants(&self) {
    for quadrant in Quadrant::ALL {
      let Some(element) =
        self.quadrant_element(quadrant)
      else {
        tracing::warn!(
          %quadrant,
          "quadrant missing from page"
        );
        continue;
      };
      if element.has_attribute("aria-label") {
        continue;
      }
      if let Err(error) = element
        .set_attribute(
          "aria-label",
          quadrant.label()
        )
      {
        tracing::debug!(
          ?error,
          %quadrant,
          "failed labelling quadrant"
        );
      }
    }
  }

  pub fn card_count_total(&self) -> usize {
    self.all(TASK_CARD_CLASS).len()
  }
}

impl BoardView for DomBoard {
  fn card_quadrant(
    &self,
    id: &TaskId
  ) -> Option<Quadrant> {
    self
      .find_card(id)
      .and_then(|card| {
        enclosing_quadrant(&card)
      })
  }

  fn card_count(
    &self,
    quadrant: Quadrant
  ) -> usize {
    self.count_in_list(
      quadrant,
      TASK_CARD_CLASS
    )
  }

  fn placeholder_count(
    &self,
    quadrant: Quadrant
  ) -> usize {
    self.count_in_list(
      quadrant,
      EMPTY_STATE_CLASS
    )
  }

  fn insert_placeholder(
    &self,
    quadrant: Quadrant
  ) {
    let Some(list) =
      self.task_list(quadrant)
    else {
      return;
    };
    let Ok(placeholder) =
      self.document.create_element("div")
    else {
      return;
    };
    placeholder
      .set_class_name(EMPTY_STATE_CLASS);
    placeholder
      .set_inner_html(EMPTY_STATE_MARKUP);
    if let Err(error) =
      list.append_child(&placeholder)
    {
      tracing::warn!(
        ?error,
        %quadrant,
        "failed inserting placeholder"
      );
    }
  }

  fn remove_placeholders(
    &self,
    quadrant: Quadrant
  ) {
    if let Some(list) =
      self.task_list(quadrant)
    {
      for placeholder in
        select_all(&list, EMPTY_STATE_CLASS)
      {
        placeholder.remove();
      }
    }
  }

  fn append_card(
    &self,
    card: &TaskCard
  ) -> bool {
    let Some(list) =
      self.task_list(card.quadrant)
    else {
      return false;
    };
    let Ok(element) =
      self.document.create_element("div")
    else {
      return false;
    };
    element.set_class_name(TASK_CARD_CLASS);
    let attributes = element
      .set_attribute(
        TASK_ID_ATTR,
        card.id.as_str()
      )
      .and_then(|()| {
        element.set_attribute(
          "draggable",
          "true"
        )
      });
    if let Err(error) = attributes {
      tracing::warn!(
        ?error,
        task_id = %card.id,
        "failed tagging card"
      );
      return false;
    }
    element.set_inner_html(&card.inner_html);
    list.append_child(&element).is_ok()
  }

  fn remove_card(
    &self,
    id: &TaskId
  ) -> bool {
    match self.find_card(id) {
      | Some(card) => {
        card.remove();
        true
      }
      | None => false
    }
  }

  fn relocate_card(
    &self,
    id: &TaskId,
    quadrant: Quadrant
  ) -> bool {
    let (Some(card), Some(list)) = (
      self.find_card(id),
      self.task_list(quadrant)
    ) else {
      return false;
    };
    // appendChild detaches from the old
    // parent in the same step.
    list.append_child(&card).is_ok()
  }

  fn set_card_fading(
    &self,
    id: &TaskId,
    fading: bool
  ) -> bool {
    self
      .find_card(id)
      .map(|card| {
        toggle(&card, FADE_OUT_CLASS, fading)
      })
      .is_some()
  }

  fn set_card_dragging(
    &self,
    id: &TaskId,
    dragging: bool
  ) {
    if let Some(card) = self.find_card(id)
    {
      toggle(&card, DRAGGING_CLASS, dragging);
    }
  }

  fn set_drop_hint(
    &self,
    quadrant: Quadrant,
    active: bool
  ) {
    if let Some(element) =
      self.quadrant_element(quadrant)
    {
      toggle(
        &element,
        DRAG_OVER_CLASS,
        active
      );
    }
  }
}

fn toggle(
  element: &Element,
  class: &str,
  on: bool
) {
  let classes = element.class_list();
  let result = if on {
    classes.add_1(class)
  } else {
    classes.remove_1(class)
  };
  if let Err(error) = result {
    tracing::warn!(
      ?error,
      class,
      "failed toggling class"
    );
  }
}
