use std::sync::Arc;

use trellis_common::Orientation;
use trellis_config::schema::LoadingConfig;
use trellis_ui::{Align, BoxWidget, LabelWidget, SharedFactory, SpinnerWidget, Widget, WidgetRef};

/// Centered app name, version and spinner shown until a pane's content
/// view paints. Visible from creation.
pub struct LoadingPlaceholder {
    container: Arc<dyn BoxWidget>,
    label: Arc<dyn LabelWidget>,
    spinner: Arc<dyn SpinnerWidget>,
}

impl LoadingPlaceholder {
    pub fn new(factory: &SharedFactory, config: &LoadingConfig) -> Self {
        let container = factory.new_box(Orientation::Vertical, 0);
        container.set_expand(true);
        container.set_halign(Align::Fill);
        container.set_valign(Align::Fill);
        container.set_can_focus(false);
        container.set_can_target(false);
        container.add_css_class("loading-skeleton");

        let content = factory.new_box(Orientation::Vertical, 6);
        content.set_halign(Align::Center);
        content.set_valign(Align::Center);
        content.set_can_focus(false);
        content.set_can_target(false);
        content.add_css_class("loading-skeleton-content");

        let label = factory.new_label(&config.label());
        label.set_can_focus(false);
        label.set_can_target(false);
        label.add_css_class("loading-skeleton-label");

        let spinner = factory.new_spinner();
        spinner.set_halign(Align::Center);
        spinner.set_valign(Align::Center);
        spinner.set_can_focus(false);
        spinner.set_can_target(false);
        spinner.add_css_class("loading-skeleton-spinner");

        content.append(label.clone().as_widget());
        content.append(spinner.clone().as_widget());
        container.append(content.as_widget());

        let placeholder = Self {
            container,
            label,
            spinner,
        };
        placeholder.set_visible(true);
        placeholder
    }

    pub fn widget(&self) -> WidgetRef {
        self.container.clone().as_widget()
    }

    /// Show or hide; the spinner only runs while shown.
    pub fn set_visible(&self, visible: bool) {
        self.container.set_visible(visible);
        if visible {
            self.spinner.start();
        } else {
            self.spinner.stop();
        }
    }

    pub fn is_visible(&self) -> bool {
        self.container.is_visible()
    }

    pub fn is_spinning(&self) -> bool {
        self.spinner.is_spinning()
    }

    pub fn label(&self) -> String {
        self.label.text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::test_support::Harness;

    #[test]
    fn shown_on_creation_with_configured_label() {
        let h = Harness::new();
        let config = LoadingConfig {
            app_name: "trellis".into(),
            version: "9.9.9".into(),
            ..Default::default()
        };
        let loading = LoadingPlaceholder::new(&h.factory, &config);
        assert!(loading.is_visible());
        assert!(loading.is_spinning());
        assert_eq!(loading.label(), "trellis 9.9.9");

        let node = h.headless.lookup(loading.widget().id()).unwrap();
        assert!(node.has_css_class("loading-skeleton"));
        assert!(!node.can_target());
    }

    #[test]
    fn hiding_stops_spinner() {
        let h = Harness::new();
        let loading = LoadingPlaceholder::new(&h.factory, &h.config.loading);
        loading.set_visible(false);
        assert!(!loading.is_visible());
        assert!(!loading.is_spinning());

        loading.set_visible(true);
        assert!(loading.is_spinning());
    }
}
