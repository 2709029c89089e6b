use std::rc::Rc;

use async_trait::async_trait;
use gloo::events::{
  EventListener,
  EventListenerOptions
};
use gloo::timers::future::TimeoutFuture;
use matrix_core::board::{
  AddTaskModal,
  Delay
};
use matrix_core::config::BehaviorConfig;
use matrix_core::keyboard::{
  KeyInput,
  Shortcut,
  shortcut_for
};
use matrix_core::orchestrator::Orchestrator;
use matrix_core::render::{
  ACTION_ATTR,
  QUADRANT_ATTR,
  TASK_ID_ATTR
};
use matrix_core::{
  Quadrant,
  TaskId
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{
  JsCast,
  JsValue
};
use web_sys::{
  Document,
  DragEvent,
  Element,
  Event,
  KeyboardEvent,
  Window
};

use crate::dom::{
  enclosing_card_id,
  enclosing_quadrant
};
use crate::modal::{
  DomModal,
  FORM_ID
};

pub const DELETE_PROMPT: &str =
  "Are you sure you want to delete this \
   task?";

/// `Delay` backed by `setTimeout`.
pub struct TimerDelay;

#[async_trait(?Send)]
impl Delay for TimerDelay {
  async fn sleep(&self, millis: u32) {
    TimeoutFuture::new(millis).await;
  }
}

/// What a clicked control asks for.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Action {
  Complete,
  Delete,
  OpenAdd,
  CloseAdd
}

impl Action {
  pub fn parse(raw: &str) -> Option<Self> {
    match raw.trim() {
      | "complete" => Some(Self::Complete),
      | "delete" => Some(Self::Delete),
      | "open-add" => Some(Self::OpenAdd),
      | "close-add" => Some(Self::CloseAdd),
      | _ => None
    }
  }

  /// Legacy server markup carries button
  /// classes instead of `data-action`.
  /// Buttons with an inline `onclick` are
  /// left to the page functions.
  fn from_class(
    element: &Element
  ) -> Option<(Self, Element)> {
    [
      (".complete-btn", Self::Complete),
      (".delete-btn", Self::Delete)
    ]
    .into_iter()
    .find_map(|(selector, action)| {
      element
        .closest(selector)
        .ok()
        .flatten()
        .filter(|button| {
          !button.has_attribute("onclick")
        })
        .map(|button| (action, button))
    })
  }
}

/// Names server markup calls from inline
/// `onclick` handlers.
pub const SHOW_ADD_FORM_FN: &str =
  "showAddTaskForm";
pub const HIDE_ADD_FORM_FN: &str =
  "hideAddTaskForm";
pub const COMPLETE_TASK_FN: &str =
  "completeTask";
pub const DELETE_TASK_FN: &str =
  "deleteTask";

/// Quadrant passed to `showAddTaskForm`,
/// as a number or a numeric string.
pub fn quadrant_argument(
  number: Option<f64>,
  text: Option<String>
) -> Option<Quadrant> {
  let raw = number
    .filter(|value| value.fract() == 0.0)
    .map(|value| format!("{value:.0}"))
    .or(text)?;
  Quadrant::parse(&raw)
}

fn task_argument(
  value: &JsValue
) -> Option<TaskId> {
  value
    .as_string()
    .or_else(|| {
      value
        .as_f64()
        .map(|number| number.to_string())
    })
    .filter(|raw| !raw.trim().is_empty())
    .map(TaskId::new)
}

fn expose(
  window: &Window,
  name: &str,
  function: Closure<dyn Fn(JsValue)>
) -> anyhow::Result<()> {
  js_sys::Reflect::set(
    window,
    &JsValue::from_str(name),
    &function.into_js_value()
  )
  .map_err(|error| {
    anyhow::anyhow!(
      "failed exposing {name}: {error:?}"
    )
  })?;
  Ok(())
}

fn event_element(
  event: &Event
) -> Option<Element> {
  event
    .target()
    .and_then(|target| {
      target.dyn_into::<Element>().ok()
    })
}

/// Document-level listeners that turn
/// clicks, submits, keys and drags into
/// orchestrator calls.
pub struct Controller {
  orchestrator: Rc<Orchestrator>,
  modal:        Rc<DomModal>,
  behavior:     BehaviorConfig
}

impl Controller {
  pub fn new(
    orchestrator: Rc<Orchestrator>,
    modal: Rc<DomModal>,
    behavior: BehaviorConfig
  ) -> Rc<Self> {
    Rc::new(Self {
      orchestrator,
      modal,
      behavior
    })
  }

  /// Registers every listener on
  /// `document`. Listeners live for the
  /// page's lifetime.
  pub fn attach(
    self: &Rc<Self>,
    document: &Document
  ) {
    let listeners = [
      self.listen(document, "click", Self::on_click),
      self.listen_blocking(
        document,
        "submit",
        Self::on_submit
      ),
      self.listen_blocking(
        document,
        "keydown",
        Self::on_keydown
      ),
      self.listen(
        document,
        "dragstart",
        Self::on_drag_start
      ),
      self.listen(
        document,
        "dragend",
        Self::on_drag_end
      ),
      self.listen_blocking(
        document,
        "dragover",
        Self::on_drag_over
      ),
      self.listen(
        document,
        "dragleave",
        Self::on_drag_leave
      ),
      self.listen_blocking(
        document,
        "drop",
        Self::on_drop
      )
    ];
    for listener in listeners {
      listener.forget();
    }
    tracing::info!("board listeners attached");
  }

  /// Installs the page functions that
  /// server markup calls inline, so
  /// `onclick="showAddTaskForm(2)"` and
  /// friends reach the orchestrator.
  pub fn expose_page_functions(
    self: &Rc<Self>,
    window: &Window
  ) -> anyhow::Result<()> {
    let this = Rc::clone(self);
    expose(
      window,
      SHOW_ADD_FORM_FN,
      Closure::new(move |value: JsValue| {
        let quadrant = quadrant_argument(
          value.as_f64(),
          value.as_string()
        )
        .unwrap_or(Quadrant::UrgentImportant);
        this.orchestrator.apply_shortcut(
          Shortcut::OpenAddForm(quadrant)
        );
      })
    )?;

    let this = Rc::clone(self);
    expose(
      window,
      HIDE_ADD_FORM_FN,
      Closure::new(move |_: JsValue| {
        this
          .orchestrator
          .apply_shortcut(Shortcut::CloseAddForm);
      })
    )?;

    let this = Rc::clone(self);
    expose(
      window,
      COMPLETE_TASK_FN,
      Closure::new(move |value: JsValue| {
        if let Some(id) = task_argument(&value) {
          this.complete(id);
        }
      })
    )?;

    let this = Rc::clone(self);
    expose(
      window,
      DELETE_TASK_FN,
      Closure::new(move |value: JsValue| {
        if let Some(id) = task_argument(&value) {
          this.delete(id);
        }
      })
    )?;

    tracing::info!("page functions exposed");
    Ok(())
  }

  fn listen(
    self: &Rc<Self>,
    document: &Document,
    event_type: &'static str,
    handler: fn(&Self, &Event)
  ) -> EventListener {
    let this = Rc::clone(self);
    EventListener::new(
      document,
      event_type,
      move |event| handler(&this, event)
    )
  }

  /// Same as `listen`, for events whose
  /// default the handler may cancel.
  fn listen_blocking(
    self: &Rc<Self>,
    document: &Document,
    event_type: &'static str,
    handler: fn(&Self, &Event)
  ) -> EventListener {
    let this = Rc::clone(self);
    EventListener::new_with_options(
      document,
      event_type,
      EventListenerOptions::enable_prevent_default(),
      move |event| handler(&this, event)
    )
  }

  fn on_click(&self, event: &Event) {
    let Some(target) = event_element(event)
    else {
      return;
    };

    if self.modal.is_backdrop(&target) {
      self
        .orchestrator
        .apply_shortcut(Shortcut::CloseAddForm);
      return;
    }

    let tagged = target
      .closest(&format!("[{ACTION_ATTR}]"))
      .ok()
      .flatten()
      .and_then(|element| {
        element
          .get_attribute(ACTION_ATTR)
          .and_then(|raw| Action::parse(&raw))
          .map(|action| (action, element))
      });
    let Some((action, control)) =
      tagged.or_else(|| {
        Action::from_class(&target)
      })
    else {
      return;
    };

    event.prevent_default();
    match action {
      | Action::Complete => {
        if let Some(id) = control_task_id(&control)
        {
          self.complete(id);
        }
      }
      | Action::Delete => {
        if let Some(id) = control_task_id(&control)
        {
          self.delete(id);
        }
      }
      | Action::OpenAdd => {
        let quadrant = control
          .get_attribute(QUADRANT_ATTR)
          .and_then(|raw| Quadrant::parse(&raw))
          .or_else(|| {
            enclosing_quadrant(&control)
          })
          .unwrap_or(Quadrant::UrgentImportant);
        self.orchestrator.apply_shortcut(
          Shortcut::OpenAddForm(quadrant)
        );
      }
      | Action::CloseAdd => {
        self
          .orchestrator
          .apply_shortcut(Shortcut::CloseAddForm);
      }
    }
  }

  fn complete(&self, id: TaskId) {
    let orchestrator =
      Rc::clone(&self.orchestrator);
    wasm_bindgen_futures::spawn_local(
      async move {
        if let Err(error) =
          orchestrator.complete(id).await
        {
          tracing::debug!(%error, "complete settled with error");
        }
      }
    );
  }

  fn delete(&self, id: TaskId) {
    if self.behavior.confirm_delete
      && !gloo::dialogs::confirm(DELETE_PROMPT)
    {
      tracing::debug!(task_id = %id, "delete cancelled");
      return;
    }
    let orchestrator =
      Rc::clone(&self.orchestrator);
    wasm_bindgen_futures::spawn_local(
      async move {
        if let Err(error) =
          orchestrator.delete(id).await
        {
          tracing::debug!(%error, "delete settled with error");
        }
      }
    );
  }

  fn on_submit(&self, event: &Event) {
    let is_add_form = event_element(event)
      .is_some_and(|form| form.id() == FORM_ID);
    if !is_add_form {
      return;
    }
    event.prevent_default();

    let draft = self.modal.read_draft();
    let orchestrator =
      Rc::clone(&self.orchestrator);
    wasm_bindgen_futures::spawn_local(
      async move {
        if let Err(error) =
          orchestrator.add(&draft).await
        {
          tracing::debug!(%error, "add settled with error");
        }
      }
    );
  }

  fn on_keydown(&self, event: &Event) {
    let Some(key) =
      event.dyn_ref::<KeyboardEvent>()
    else {
      return;
    };
    let input = KeyInput {
      key:  key.key(),
      alt:  key.alt_key(),
      ctrl: key.ctrl_key(),
      meta: key.meta_key()
    };
    let Some(shortcut) = shortcut_for(
      &input,
      self.behavior.shortcut_modifier,
      self.modal.is_open()
    ) else {
      return;
    };
    if matches!(
      shortcut,
      Shortcut::OpenAddForm(_)
    ) {
      event.prevent_default();
    }
    self.orchestrator.apply_shortcut(shortcut);
  }

  fn on_drag_start(&self, event: &Event) {
    let Some(id) = event_element(event)
      .and_then(|target| {
        enclosing_card_id(&target)
      })
    else {
      return;
    };
    if !self.orchestrator.begin_drag(&id) {
      return;
    }
    if let Some(data_transfer) = event
      .dyn_ref::<DragEvent>()
      .and_then(DragEvent::data_transfer)
    {
      data_transfer.set_effect_allowed("move");
      if let Err(error) = data_transfer
        .set_data("text/plain", id.as_str())
      {
        tracing::debug!(
          ?error,
          "failed to set drag payload"
        );
      }
    }
  }

  fn on_drag_end(&self, _event: &Event) {
    self.orchestrator.end_drag();
  }

  fn on_drag_over(&self, event: &Event) {
    let Some(quadrant) =
      event_element(event).and_then(|target| {
        enclosing_quadrant(&target)
      })
    else {
      return;
    };
    if !self.orchestrator.drag_over(quadrant) {
      return;
    }
    event.prevent_default();
    if let Some(data_transfer) = event
      .dyn_ref::<DragEvent>()
      .and_then(DragEvent::data_transfer)
    {
      data_transfer.set_drop_effect("move");
    }
  }

  fn on_drag_leave(&self, event: &Event) {
    let Some(quadrant) =
      event_element(event).and_then(|target| {
        enclosing_quadrant(&target)
      })
    else {
      return;
    };
    // Moving onto a child of the same
    // quadrant also fires dragleave.
    let entered = event
      .dyn_ref::<DragEvent>()
      .and_then(|drag| drag.related_target())
      .and_then(|related| {
        related.dyn_into::<Element>().ok()
      })
      .and_then(|related| {
        enclosing_quadrant(&related)
      });
    if entered == Some(quadrant) {
      return;
    }
    self.orchestrator.drag_leave(quadrant);
  }

  fn on_drop(&self, event: &Event) {
    let Some(quadrant) =
      event_element(event).and_then(|target| {
        enclosing_quadrant(&target)
      })
    else {
      self.orchestrator.end_drag();
      return;
    };
    event.prevent_default();

    let orchestrator =
      Rc::clone(&self.orchestrator);
    wasm_bindgen_futures::spawn_local(
      async move {
        if let Err(error) =
          orchestrator.drop_on(quadrant).await
        {
          tracing::debug!(%error, "drop settled with error");
        }
      }
    );
  }
}

/// The card a button belongs to: its own
/// `data-task-id`, else the enclosing
/// card's.
fn control_task_id(
  control: &Element
) -> Option<TaskId> {
  control
    .get_attribute(TASK_ID_ATTR)
    .filter(|raw| !raw.is_empty())
    .map(TaskId::new)
    .or_else(|| enclosing_card_id(control))
}
