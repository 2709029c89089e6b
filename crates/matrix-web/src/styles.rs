use web_sys::Document;

pub const STYLE_ELEMENT_ID: &str =
  "matrix-board-styles";

/// Toast, drag and empty-state rules the
/// page stylesheet leaves to the client.
pub const BOARD_CSS: &str = r#"
.notification {
  position: fixed;
  bottom: 20px;
  right: 20px;
  padding: 12px 24px;
  border-radius: 4px;
  background-color: var(--color-success);
  color: white;
  z-index: 1000;
  animation: slideIn 0.3s ease;
}

.notification.error {
  background-color: var(--color-danger);
}

.notification.fade-out {
  animation: fadeOut 0.3s ease;
}

.task-card.dragging {
  opacity: 0.5;
}

.matrix-quadrant.drag-over {
  background-color: var(--color-primary);
  opacity: 0.8;
}

.empty-state {
  text-align: center;
  padding: var(--spacing-xl);
  color: var(--color-text-light);
  font-style: italic;
}

@keyframes slideIn {
  from { transform: translateX(100%); }
  to { transform: translateX(0); }
}

@keyframes fadeOut {
  from { opacity: 1; }
  to { opacity: 0; }
}
"#;

/// Appends the board rules to `<head>`
/// once; a second call is a no-op.
pub fn inject_board_styles(
  document: &Document
) -> anyhow::Result<()> {
  if document
    .get_element_by_id(STYLE_ELEMENT_ID)
    .is_some()
  {
    return Ok(());
  }

  let head = document
    .head()
    .ok_or_else(|| {
      anyhow::anyhow!("document has no <head>")
    })?;
  let style = document
    .create_element("style")
    .map_err(|error| {
      anyhow::anyhow!(
        "failed creating <style>: {error:?}"
      )
    })?;
  style.set_id(STYLE_ELEMENT_ID);
  style.set_text_content(Some(BOARD_CSS));
  head.append_child(&style).map_err(
    |error| {
      anyhow::anyhow!(
        "failed appending <style>: {error:?}"
      )
    }
  )?;
  tracing::debug!("board styles injected");
  Ok(())
}
