use std::fmt;

use serde::{
  Deserialize,
  Serialize
};

/// Server-assigned task identifier.
/// The client only ever copies these
/// out of responses and card
/// attributes; it never mints one.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
  pub fn new(
    raw: impl Into<String>
  ) -> Self {
    Self(raw.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for TaskId {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(&self.0)
  }
}

#[derive(
  Debug, Clone, PartialEq, Eq,
  thiserror::Error,
)]
#[error(
  "quadrant must be 1, 2, 3 or 4 \
   (got {0})"
)]
pub struct QuadrantOutOfRange(pub i64);

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
)]
#[serde(
  try_from = "i64",
  into = "i64"
)]
pub enum Quadrant {
  UrgentImportant,
  NotUrgentImportant,
  UrgentNotImportant,
  NotUrgentNotImportant
}

impl Quadrant {
  pub const ALL: [Quadrant; 4] = [
    Quadrant::UrgentImportant,
    Quadrant::NotUrgentImportant,
    Quadrant::UrgentNotImportant,
    Quadrant::NotUrgentNotImportant
  ];

  pub fn number(self) -> u8 {
    match self {
      | Quadrant::UrgentImportant => 1,
      | Quadrant::NotUrgentImportant => {
        2
      }
      | Quadrant::UrgentNotImportant => {
        3
      }
      | Quadrant::NotUrgentNotImportant => {
        4
      }
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      | Quadrant::UrgentImportant => {
        "Urgent & Important"
      }
      | Quadrant::NotUrgentImportant => {
        "Not Urgent & Important"
      }
      | Quadrant::UrgentNotImportant => {
        "Urgent & Not Important"
      }
      | Quadrant::NotUrgentNotImportant => {
        "Not Urgent & Not Important"
      }
    }
  }

  /// Parses the textual form used by
  /// `data-quadrant` attributes and the
  /// form's quadrant field.
  pub fn parse(
    raw: &str
  ) -> Option<Quadrant> {
    raw
      .trim()
      .parse::<i64>()
      .ok()
      .and_then(|n| {
        Quadrant::try_from(n).ok()
      })
  }
}

impl TryFrom<i64> for Quadrant {
  type Error = QuadrantOutOfRange;

  fn try_from(
    value: i64
  ) -> Result<Self, Self::Error> {
    match value {
      | 1 => Ok(Quadrant::UrgentImportant),
      | 2 => {
        Ok(Quadrant::NotUrgentImportant)
      }
      | 3 => {
        Ok(Quadrant::UrgentNotImportant)
      }
      | 4 => Ok(
        Quadrant::NotUrgentNotImportant
      ),
      | other => {
        Err(QuadrantOutOfRange(other))
      }
    }
  }
}

impl From<Quadrant> for i64 {
  fn from(quadrant: Quadrant) -> Self {
    i64::from(quadrant.number())
  }
}

impl fmt::Display for Quadrant {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    write!(f, "{}", self.number())
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct TaskDto {
  pub id:        TaskId,
  #[serde(default)]
  pub content:   String,
  pub quadrant:  Quadrant,
  #[serde(default)]
  pub completed: bool
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
  PartialEq, Eq,
)]
pub struct TaskCreate {
  pub content:  String,
  pub quadrant: Quadrant
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
  PartialEq, Eq,
)]
pub struct TaskIdArg {
  pub id: TaskId
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
  PartialEq, Eq,
)]
pub struct TaskMoveArgs {
  pub id:       TaskId,
  pub quadrant: Quadrant
}

/// Body shape every `/api/tasks*`
/// endpoint answers with.
#[derive(
  Debug, Clone, Serialize, Deserialize,
  PartialEq,
)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
  #[serde(default = "envelope_success")]
  pub success: bool,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub data:    Option<T>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub error:   Option<String>
}

fn envelope_success() -> bool {
  true
}

impl<T> ApiEnvelope<T> {
  pub fn ok(data: T) -> Self {
    Self {
      success: true,
      data:    Some(data),
      error:   None
    }
  }

  pub fn empty() -> Self {
    Self {
      success: true,
      data:    None,
      error:   None
    }
  }

  pub fn failure(
    error: impl Into<String>
  ) -> Self {
    Self {
      success: false,
      data:    None,
      error:   Some(error.into())
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn quadrant_serializes_as_plain_number()
  {
    let args = TaskCreate {
      content:  "Plan sprint"
        .to_string(),
      quadrant:
        Quadrant::NotUrgentImportant
    };
    let json = serde_json::to_string(
      &args
    )
    .expect("serialize");
    assert_eq!(
      json,
      r#"{"content":"Plan sprint","quadrant":2}"#
    );
  }

  #[test]
  fn quadrant_outside_one_to_four_is_rejected()
  {
    let result = serde_json::from_str::<
      TaskDto,
    >(
      r#"{"id":"t1","content":"x","quadrant":5}"#
    );
    assert!(result.is_err());
    assert_eq!(
      Quadrant::try_from(0),
      Err(QuadrantOutOfRange(0))
    );
  }

  #[test]
  fn add_response_decodes_server_task() {
    let body = r#"{"success":true,"data":{"id":"t9","content":"Plan sprint","quadrant":2,"completed":false}}"#;
    let envelope: ApiEnvelope<TaskDto> =
      serde_json::from_str(body)
        .expect("decode");
    assert!(envelope.success);
    let task =
      envelope.data.expect("task");
    assert_eq!(task.id.as_str(), "t9");
    assert_eq!(
      task.quadrant,
      Quadrant::NotUrgentImportant
    );
  }

  #[test]
  fn delete_response_without_data_decodes()
  {
    let envelope: ApiEnvelope<
      serde_json::Value,
    > = serde_json::from_str(
      r#"{"success":true}"#
    )
    .expect("decode");
    assert!(envelope.success);
    assert!(envelope.data.is_none());

    let failed: ApiEnvelope<
      serde_json::Value,
    > = serde_json::from_str(
      r#"{"success":false,"error":"task not found: t3"}"#
    )
    .expect("decode");
    assert!(!failed.success);
    assert_eq!(
      failed.error.as_deref(),
      Some("task not found: t3")
    );
  }

  #[test]
  fn quadrant_parse_accepts_attribute_text()
  {
    assert_eq!(
      Quadrant::parse(" 3 "),
      Some(Quadrant::UrgentNotImportant)
    );
    assert_eq!(Quadrant::parse(""), None);
    assert_eq!(
      Quadrant::parse("four"),
      None
    );
    assert_eq!(
      Quadrant::NotUrgentNotImportant
        .label(),
      "Not Urgent & Not Important"
    );
  }
}
