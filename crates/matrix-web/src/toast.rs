use gloo::timers::callback::Timeout;
use matrix_core::config::TimingConfig;
use matrix_core::notice::{
  Notice,
  Notifier
};
use matrix_core::render::FADE_OUT_CLASS;
use web_sys::Document;

/// Fixed-position toasts appended to
/// `<body>`. Each one fades and removes
/// itself on its own timer.
pub struct DomNotifier {
  document:   Document,
  visible_ms: u32,
  fade_ms:    u32
}

impl DomNotifier {
  pub fn new(
    document: Document,
    timing: &TimingConfig
  ) -> Self {
    Self {
      document,
      visible_ms: timing.toast_visible_ms,
      fade_ms: timing.toast_fade_ms
    }
  }
}

impl Notifier for DomNotifier {
  fn notify(&self, notice: Notice) {
    if notice.is_error() {
      tracing::warn!(
        message = %notice.message,
        "showing error notice"
      );
    } else {
      tracing::info!(
        message = %notice.message,
        "showing notice"
      );
    }

    let Some(body) = self.document.body()
    else {
      tracing::warn!(
        "no <body>; notice dropped"
      );
      return;
    };
    let Ok(toast) =
      self.document.create_element("div")
    else {
      return;
    };
    toast.set_class_name(&format!(
      "notification {}",
      notice.kind.css_class()
    ));
    // Text only; messages never become
    // markup.
    toast.set_text_content(Some(
      &notice.message
    ));
    if body.append_child(&toast).is_err() {
      return;
    }

    let fade_ms = self.fade_ms;
    Timeout::new(self.visible_ms, move || {
      if let Err(error) = toast
        .class_list()
        .add_1(FADE_OUT_CLASS)
      {
        tracing::debug!(
          ?error,
          "failed fading notice"
        );
      }
      Timeout::new(fade_ms, move || {
        toast.remove();
      })
      .forget();
    })
    .forget();
  }
}
