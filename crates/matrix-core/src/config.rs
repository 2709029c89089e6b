use serde::Deserialize;
use tracing::{
  error,
  info,
  warn
};

use crate::error::ConfigError;

pub const DEFAULT_ADD_PATH: &str =
  "/api/tasks";
pub const DEFAULT_COMPLETE_PATH: &str =
  "/api/tasks/complete";
pub const DEFAULT_DELETE_PATH: &str =
  "/api/tasks";
pub const DEFAULT_MOVE_PATH: &str =
  "/api/tasks";

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
#[serde(default)]
pub struct ClientConfig {
  pub api:      ApiConfig,
  pub timing:   TimingConfig,
  pub behavior: BehaviorConfig
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
#[serde(default)]
pub struct ApiConfig {
  pub base:          String,
  pub add_path:      String,
  pub complete_path: String,
  pub delete_path:   String,
  pub move_path:     String,
  pub move_method:   MoveMethod
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Deserialize,
  Default,
)]
#[serde(rename_all = "lowercase")]
pub enum MoveMethod {
  #[default]
  Put,
  Post,
  Patch
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
#[serde(default)]
pub struct TimingConfig {
  pub card_fade_ms:     u32,
  pub toast_visible_ms: u32,
  pub toast_fade_ms:    u32
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
#[serde(default)]
pub struct BehaviorConfig {
  pub confirm_delete:    bool,
  pub failure_policy:    FailurePolicy,
  pub shortcut_modifier:
    ShortcutModifier
}

/// What complete/delete do with the
/// fading card when the server refuses.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Deserialize,
  Default,
)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
  /// Clear the fade and keep the card.
  #[default]
  Rollback,
  /// Drop the card anyway; the board
  /// may then disagree with the server.
  Remove
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Deserialize,
  Default,
)]
#[serde(rename_all = "lowercase")]
pub enum ShortcutModifier {
  #[default]
  Alt,
  Ctrl,
  Meta
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base:          String::new(),
      add_path:      DEFAULT_ADD_PATH
        .to_string(),
      complete_path:
        DEFAULT_COMPLETE_PATH
          .to_string(),
      delete_path:   DEFAULT_DELETE_PATH
        .to_string(),
      move_path:     DEFAULT_MOVE_PATH
        .to_string(),
      move_method:   MoveMethod::Put
    }
  }
}

impl Default for TimingConfig {
  fn default() -> Self {
    Self {
      card_fade_ms:     300,
      toast_visible_ms: 3_000,
      toast_fade_ms:    300
    }
  }
}

impl Default for BehaviorConfig {
  fn default() -> Self {
    Self {
      confirm_delete:    true,
      failure_policy:
        FailurePolicy::Rollback,
      shortcut_modifier:
        ShortcutModifier::Alt
    }
  }
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      api:      ApiConfig::default(),
      timing:   TimingConfig::default(),
      behavior: BehaviorConfig::default()
    }
  }
}

impl ApiConfig {
  pub fn add_url(&self) -> String {
    self.url(&self.add_path)
  }

  pub fn complete_url(&self) -> String {
    self.url(&self.complete_path)
  }

  pub fn delete_url(&self) -> String {
    self.url(&self.delete_path)
  }

  pub fn move_url(&self) -> String {
    self.url(&self.move_path)
  }

  fn url(&self, path: &str) -> String {
    let base =
      self.base.trim_end_matches('/');
    if path.starts_with('/') {
      format!("{base}{path}")
    } else {
      format!("{base}/{path}")
    }
  }
}

impl ClientConfig {
  pub fn from_toml_str(
    text: &str
  ) -> Result<Self, ConfigError> {
    let mut config =
      toml::from_str::<ClientConfig>(
        text
      )?;
    sanitize_client_config(&mut config);
    Ok(config)
  }

  /// Parses the embedded config block
  /// when the page carries one; any
  /// problem falls back to defaults.
  pub fn load_or_default(
    text: Option<&str>
  ) -> Self {
    let Some(text) = text else {
      info!(
        "no board config embedded; \
         using defaults"
      );
      return Self::default();
    };

    match Self::from_toml_str(text) {
      | Ok(config) => {
        info!(
          base = %config.api.base,
          move_method = ?config.api.move_method,
          failure_policy = ?config.behavior.failure_policy,
          "loaded board config"
        );
        config
      }
      | Err(error) => {
        error!(%error, "failed parsing board config; using defaults");
        Self::default()
      }
    }
  }
}

fn sanitize_client_config(
  config: &mut ClientConfig
) {
  let api = &mut config.api;
  for (path, fallback) in [
    (&mut api.add_path, DEFAULT_ADD_PATH),
    (
      &mut api.complete_path,
      DEFAULT_COMPLETE_PATH
    ),
    (
      &mut api.delete_path,
      DEFAULT_DELETE_PATH
    ),
    (&mut api.move_path, DEFAULT_MOVE_PATH)
  ] {
    if path.trim().is_empty() {
      warn!(
        fallback,
        "empty api path in config; \
         using default"
      );
      *path = fallback.to_string();
    } else {
      *path = path.trim().to_string();
    }
  }
  api.base = api.base.trim().to_string();

  let timing = &mut config.timing;
  if timing.toast_visible_ms == 0 {
    warn!(
      "toast_visible_ms of 0 would hide \
       every notification; using 3000"
    );
    timing.toast_visible_ms = 3_000;
  }
}
