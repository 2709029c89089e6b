use matrix_core::Quadrant;
use matrix_core::board::AddTaskModal;
use matrix_core::form::AddDraft;
use wasm_bindgen::JsCast;
use web_sys::{
  Document,
  Element,
  HtmlElement,
  HtmlFormElement,
  HtmlInputElement,
  HtmlSelectElement,
  HtmlTextAreaElement
};

pub const MODAL_ID: &str = "addTaskModal";
pub const FORM_ID: &str = "addTaskForm";
pub const CONTENT_ID: &str = "taskContent";
pub const QUADRANT_ID: &str = "taskQuadrant";

/// The server-rendered add-task dialog.
pub struct DomModal {
  document: Document
}

impl DomModal {
  pub fn new(document: Document) -> Self {
    Self { document }
  }

  fn by_id(
    &self,
    id: &str
  ) -> Option<Element> {
    self.document.get_element_by_id(id)
  }

  fn set_display(&self, value: &str) {
    let Some(modal) = self
      .by_id(MODAL_ID)
      .and_then(|element| {
        element.dyn_into::<HtmlElement>().ok()
      })
    else {
      tracing::warn!(
        "add task modal missing from page"
      );
      return;
    };
    if let Err(error) = modal
      .style()
      .set_property("display", value)
    {
      tracing::warn!(
        ?error,
        "failed toggling modal"
      );
    }
  }

  /// True when `element` is the backdrop
  /// itself rather than the dialog body.
  pub fn is_backdrop(
    &self,
    element: &Element
  ) -> bool {
    element.id() == MODAL_ID
  }

  /// Current field values, unvalidated.
  pub fn read_draft(&self) -> AddDraft {
    let content = self
      .by_id(CONTENT_ID)
      .map(|element| field_value(&element))
      .unwrap_or_default();
    let quadrant = self
      .by_id(QUADRANT_ID)
      .map(|element| field_value(&element))
      .unwrap_or_default();
    AddDraft::new(content, quadrant)
  }
}

fn field_value(element: &Element) -> String {
  if let Some(area) =
    element.dyn_ref::<HtmlTextAreaElement>()
  {
    return area.value();
  }
  if let Some(select) =
    element.dyn_ref::<HtmlSelectElement>()
  {
    return select.value();
  }
  element
    .dyn_ref::<HtmlInputElement>()
    .map(HtmlInputElement::value)
    .unwrap_or_default()
}

fn set_field_value(
  element: &Element,
  value: &str
) {
  if let Some(select) =
    element.dyn_ref::<HtmlSelectElement>()
  {
    select.set_value(value);
  } else if let Some(input) =
    element.dyn_ref::<HtmlInputElement>()
  {
    input.set_value(value);
  }
}

impl AddTaskModal for DomModal {
  fn open(&self, quadrant: Quadrant) {
    if let Some(field) =
      self.by_id(QUADRANT_ID)
    {
      set_field_value(
        &field,
        &quadrant.number().to_string()
      );
    }
    self.set_display("flex");

    if let Some(content) = self
      .by_id(CONTENT_ID)
      .and_then(|element| {
        element.dyn_into::<HtmlElement>().ok()
      })
      && let Err(error) = content.focus()
    {
      tracing::debug!(
        ?error,
        "could not focus task content"
      );
    }
  }

  fn close(&self) {
    self.set_display("none");
    if let Some(form) = self
      .by_id(FORM_ID)
      .and_then(|element| {
        element
          .dyn_into::<HtmlFormElement>()
          .ok()
      })
    {
      form.reset();
    }
  }

  fn is_open(&self) -> bool {
    self
      .by_id(MODAL_ID)
      .and_then(|element| {
        element.dyn_into::<HtmlElement>().ok()
      })
      .and_then(|modal| {
        modal
          .style()
          .get_property_value("display")
          .ok()
      })
      .is_some_and(|display| {
        display == "flex"
      })
  }
}
