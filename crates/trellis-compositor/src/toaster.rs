//! Auto-dismissing toast notifications.
//!
//! Showing a toast while one is visible replaces the text in place and
//! restarts the dismiss timer. The timer callback compares its own handle
//! with the stored one, so a timer superseded by a later `show` never hides
//! the newer toast.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tracing::debug;
use trellis_common::Orientation;
use trellis_config::schema::{ToastConfig, ToastPosition};
use trellis_ui::{
    Align, BoxWidget, LabelWidget, SharedFactory, SharedScheduler, TimerHandle, Widget, WidgetRef,
};

/// Visual severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastLevel {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl ToastLevel {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Info => "toast-info",
            Self::Success => "toast-success",
            Self::Warning => "toast-warning",
            Self::Error => "toast-error",
        }
    }
}

/// Per-call overrides merged over the configured defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToastOverrides {
    /// `Some(Duration::ZERO)` keeps the toast until it is hidden.
    pub duration: Option<Duration>,
    pub background: Option<String>,
    pub text_color: Option<String>,
    pub position: Option<ToastPosition>,
}

impl ToastOverrides {
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn persistent(self) -> Self {
        self.with_duration(Duration::ZERO)
    }

    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background = Some(color.into());
        self
    }

    pub fn with_text_color(mut self, color: impl Into<String>) -> Self {
        self.text_color = Some(color.into());
        self
    }

    pub fn with_position(mut self, position: ToastPosition) -> Self {
        self.position = Some(position);
        self
    }
}

/// Effective options of the most recent toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastOptions {
    pub duration: Duration,
    pub background: Option<String>,
    pub text_color: Option<String>,
    pub position: ToastPosition,
}

enum CustomStyle {
    None,
    Colors { replaces_level: bool },
    Mode(String),
}

struct ToasterState {
    visible: bool,
    level: ToastLevel,
    message: String,
    dismiss: Option<TimerHandle>,
    options: ToastOptions,
    custom: CustomStyle,
}

struct Shared {
    container: Arc<dyn BoxWidget>,
    label: Arc<dyn LabelWidget>,
    scheduler: SharedScheduler,
    state: Mutex<ToasterState>,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, ToasterState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn dismiss(&self, handle: TimerHandle) {
        let mut state = self.state();
        if state.dismiss != Some(handle) {
            return;
        }
        state.dismiss = None;
        self.hide_locked(&mut state);
        debug!(%handle, "toast auto-dismissed");
    }

    fn hide_locked(&self, state: &mut ToasterState) {
        if let Some(handle) = state.dismiss.take() {
            self.scheduler.cancel(handle);
        }
        if !state.visible {
            return;
        }
        self.clear_custom(state);
        state.visible = false;
        self.container.set_visible(false);
    }

    fn clear_custom(&self, state: &mut ToasterState) {
        let level_class = state.level.css_class();
        match std::mem::replace(&mut state.custom, CustomStyle::None) {
            CustomStyle::None => {}
            CustomStyle::Colors { replaces_level } => {
                self.container.remove_css_class("toast-custom");
                if replaces_level {
                    self.container.add_css_class(level_class);
                }
            }
            CustomStyle::Mode(class) => {
                self.container.remove_css_class(&class);
                self.container.add_css_class(level_class);
            }
        }
    }

    fn apply_position(&self, state: &ToasterState, position: ToastPosition) {
        self.container
            .remove_css_class(state.options.position.css_class());
        self.container.add_css_class(position.css_class());
        let (halign, valign) = match position {
            ToastPosition::TopLeft => (Align::Start, Align::Start),
            ToastPosition::TopRight => (Align::End, Align::Start),
            ToastPosition::BottomLeft => (Align::Start, Align::End),
            ToastPosition::BottomRight => (Align::End, Align::End),
        };
        self.container.set_halign(halign);
        self.container.set_valign(valign);
    }
}

pub struct Toaster {
    shared: Arc<Shared>,
    defaults: ToastConfig,
}

impl Toaster {
    pub fn new(factory: &SharedFactory, scheduler: SharedScheduler, config: &ToastConfig) -> Self {
        let container = factory.new_box(Orientation::Horizontal, 0);
        container.add_css_class("toast");
        container.add_css_class(ToastLevel::Info.css_class());
        container.set_expand(false);
        container.set_can_target(false);
        container.set_can_focus(false);
        container.set_visible(false);

        let label = factory.new_label("");
        label.set_can_target(false);
        label.set_can_focus(false);
        container.append(label.clone().as_widget());

        let options = ToastOptions {
            duration: config.duration(),
            background: None,
            text_color: None,
            position: config.position,
        };
        let shared = Arc::new(Shared {
            container,
            label,
            scheduler,
            state: Mutex::new(ToasterState {
                visible: false,
                level: ToastLevel::Info,
                message: String::new(),
                dismiss: None,
                options: options.clone(),
                custom: CustomStyle::None,
            }),
        });
        shared.apply_position(&shared.state(), options.position);

        Self {
            shared,
            defaults: config.clone(),
        }
    }

    pub fn widget(&self) -> WidgetRef {
        self.shared.container.clone().as_widget()
    }

    pub fn show(&self, message: &str, level: ToastLevel) {
        self.show_with(message, level, ToastOverrides::default());
    }

    pub fn show_with(&self, message: &str, level: ToastLevel, overrides: ToastOverrides) {
        let options = ToastOptions {
            duration: overrides.duration.unwrap_or_else(|| self.defaults.duration()),
            background: overrides.background,
            text_color: overrides.text_color,
            position: overrides.position.unwrap_or(self.defaults.position),
        };

        let shared = &self.shared;
        let mut state = shared.state();
        shared.clear_custom(&mut state);

        if state.level != level {
            shared.container.remove_css_class(state.level.css_class());
            shared.container.add_css_class(level.css_class());
            state.level = level;
        }

        if options.background.is_some() || options.text_color.is_some() {
            shared.container.add_css_class("toast-custom");
            let replaces_level = options.background.is_some();
            if replaces_level {
                shared.container.remove_css_class(level.css_class());
            }
            state.custom = CustomStyle::Colors { replaces_level };
        }

        shared.apply_position(&state, options.position);
        shared.label.set_text(message);
        state.message = message.to_string();

        if let Some(handle) = state.dismiss.take() {
            shared.scheduler.cancel(handle);
        }
        if !state.visible {
            state.visible = true;
            shared.container.set_visible(true);
        }
        if !options.duration.is_zero() {
            let weak = Arc::downgrade(shared);
            let handle = shared.scheduler.schedule_once(
                options.duration,
                Box::new(move |handle| {
                    if let Some(shared) = weak.upgrade() {
                        shared.dismiss(handle);
                    }
                }),
            );
            state.dismiss = Some(handle);
        }

        debug!(
            toast_message = message,
            level = level.css_class(),
            duration_ms = options.duration.as_millis() as u64,
            "toast shown"
        );
        state.options = options;
    }

    /// Show a zoom level such as `110%`.
    pub fn show_zoom(&self, percent: i32) {
        self.show(&format!("{percent}%"), ToastLevel::Info);
    }

    /// Replace the level styling with a mode class (for example
    /// `toast-pane-mode`) until the next `show` or `hide`.
    pub fn apply_mode_class(&self, class: &str) {
        let shared = &self.shared;
        let mut state = shared.state();
        shared.clear_custom(&mut state);
        shared.container.remove_css_class(state.level.css_class());
        shared.container.add_css_class(class);
        state.custom = CustomStyle::Mode(class.to_string());
    }

    pub fn hide(&self) {
        let mut state = self.shared.state();
        self.shared.hide_locked(&mut state);
    }

    pub fn is_visible(&self) -> bool {
        self.shared.state().visible
    }

    pub fn level(&self) -> ToastLevel {
        self.shared.state().level
    }

    pub fn message(&self) -> String {
        self.shared.state().message.clone()
    }

    pub fn options(&self) -> ToastOptions {
        self.shared.state().options.clone()
    }

    pub fn has_pending_dismiss(&self) -> bool {
        self.shared.state().dismiss.is_some()
    }
}
