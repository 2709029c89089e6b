use matrix_shared::{
  Quadrant,
  TaskDto,
  TaskId
};

pub const QUADRANT_CLASS: &str =
  "matrix-quadrant";
pub const TASK_LIST_CLASS: &str =
  "task-list";
pub const TASK_CARD_CLASS: &str =
  "task-card";
pub const EMPTY_STATE_CLASS: &str =
  "empty-state";
pub const FADE_OUT_CLASS: &str =
  "fade-out";
pub const DRAGGING_CLASS: &str =
  "dragging";
pub const DRAG_OVER_CLASS: &str =
  "drag-over";

pub const TASK_ID_ATTR: &str =
  "data-task-id";
pub const QUADRANT_ATTR: &str =
  "data-quadrant";
pub const ACTION_ATTR: &str =
  "data-action";

pub const EMPTY_STATE_MARKUP: &str =
  "<p>No tasks in this quadrant</p>";

/// Replaces the five markup-significant
/// characters with character references.
pub fn escape_text(text: &str) -> String {
  let mut out =
    String::with_capacity(text.len());
  for ch in text.chars() {
    match ch {
      | '&' => out.push_str("&amp;"),
      | '<' => out.push_str("&lt;"),
      | '>' => out.push_str("&gt;"),
      | '"' => out.push_str("&quot;"),
      | '\'' => out.push_str("&#039;"),
      | other => out.push(other)
    }
  }
  out
}

/// Everything a board needs to put one
/// task on screen. The affordances find
/// their task through `data-task-id`, so
/// the card stays valid wherever it is
/// moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCard {
  pub id:         TaskId,
  pub quadrant:   Quadrant,
  pub inner_html: String
}

pub fn render_task_card(
  task: &TaskDto
) -> TaskCard {
  let content = escape_text(&task.content);
  let id = escape_text(task.id.as_str());
  let inner_html = format!(
    "<p class=\"task-content\">{content}</p>\
     <div class=\"task-actions\">\
     <button type=\"button\" class=\"complete-btn\" \
     {ACTION_ATTR}=\"complete\" {TASK_ID_ATTR}=\"{id}\" \
     title=\"Complete\">\u{2713}</button>\
     <button type=\"button\" class=\"delete-btn\" \
     {ACTION_ATTR}=\"delete\" {TASK_ID_ATTR}=\"{id}\" \
     title=\"Delete\">\u{d7}</button>\
     </div>"
  );

  TaskCard {
    id: task.id.clone(),
    quadrant: task.quadrant,
    inner_html
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn task(
    id: &str,
    content: &str
  ) -> TaskDto {
    TaskDto {
      id:        TaskId::new(id),
      content:   content.to_string(),
      quadrant:  Quadrant::UrgentImportant,
      completed: false
    }
  }

  #[test]
  fn escape_text_covers_all_five_characters()
  {
    assert_eq!(
      escape_text(
        r#"Tom & "Jerry" <b>'s</b>"#
      ),
      "Tom &amp; &quot;Jerry&quot; \
       &lt;b&gt;&#039;s&lt;/b&gt;"
    );
    assert_eq!(
      escape_text("plain"),
      "plain"
    );
  }

  #[test]
  fn script_content_renders_as_literal_text()
  {
    let card = render_task_card(&task(
      "t1",
      "<script>alert('x')</script>"
    ));
    assert!(
      !card.inner_html.contains("<script>")
    );
    assert!(card.inner_html.contains(
      "&lt;script&gt;alert(&#039;x&#039;)\
       &lt;/script&gt;"
    ));
  }

  #[test]
  fn affordances_are_bound_to_the_task_id()
  {
    let card =
      render_task_card(&task("t9", "Plan"));
    assert_eq!(card.id.as_str(), "t9");
    assert_eq!(
      card
        .inner_html
        .matches("data-task-id=\"t9\"")
        .count(),
      2
    );
    assert!(card.inner_html.contains(
      "data-action=\"complete\""
    ));
    assert!(
      card
        .inner_html
        .contains("data-action=\"delete\"")
    );
  }

  #[test]
  fn quoted_ids_cannot_break_out_of_attributes()
  {
    let card = render_task_card(&task(
      "t\" onclick=\"boom",
      "x"
    ));
    assert!(
      !card.inner_html.contains(
        "onclick=\"boom"
      )
    );
  }
}
