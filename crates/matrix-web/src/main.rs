mod api;
mod controller;
mod dom;
mod modal;
mod styles;
mod toast;

use std::rc::Rc;

use anyhow::Context;
use matrix_core::config::ClientConfig;
use matrix_core::orchestrator::{
  Orchestrator,
  Ports
};
use matrix_core::quadrant_list::reconcile_all;
use matrix_core::session::Session;
use web_sys::Document;

use crate::api::HttpTaskApi;
use crate::controller::{
  Controller,
  TimerDelay
};
use crate::dom::DomBoard;
use crate::modal::DomModal;
use crate::toast::DomNotifier;

const CONFIG_ELEMENT_ID: &str =
  "matrix-config";

fn main() {
  console_error_panic_hook::set_once();
  wasm_tracing::set_as_global_default();

  tracing::info!(
    "starting task matrix client"
  );

  if let Err(error) = boot() {
    tracing::error!(
      error = %format!("{error:#}"),
      "task matrix client failed to start"
    );
  }
}

fn embedded_config(
  document: &Document
) -> ClientConfig {
  let text = document
    .get_element_by_id(CONFIG_ELEMENT_ID)
    .and_then(|element| {
      element.text_content()
    });
  ClientConfig::load_or_default(
    text.as_deref()
  )
}

fn boot() -> anyhow::Result<()> {
  let window = web_sys::window()
    .context("no window to attach to")?;
  let document = window
    .document()
    .context("no document to attach to")?;

  let config = embedded_config(&document);
  styles::inject_board_styles(&document)
    .context("injecting board styles")?;

  let board =
    Rc::new(DomBoard::new(document.clone()));
  board.mark_cards_draggable();
  board.label_quadrants();
  let states = reconcile_all(board.as_ref());
  tracing::info!(
    cards = board.card_count_total(),
    ?states,
    "board reconciled"
  );

  let modal =
    Rc::new(DomModal::new(document.clone()));
  let ports = Ports {
    api:      Rc::new(HttpTaskApi::new(
      config.api.clone()
    )),
    board,
    modal:    modal.clone(),
    notifier: Rc::new(DomNotifier::new(
      document.clone(),
      &config.timing
    )),
    delay:    Rc::new(TimerDelay)
  };
  let orchestrator = Rc::new(
    Orchestrator::new(
      ports,
      Session::shared(),
      &config
    )
  );

  let controller = Controller::new(
    orchestrator,
    modal,
    config.behavior.clone()
  );
  controller.attach(&document);
  controller
    .expose_page_functions(&window)
    .context("exposing page functions")?;
  Ok(())
}
