//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Trellis Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[toast]
# duration_ms = 1500        # 0-60000, 0 keeps the toast until dismissed
# position = "top-left"     # top-left, top-right, bottom-left, bottom-right

[progress]
# step = 0.02               # 0.001-1.0 per tick
# interval_ms = 16          # 1-1000
# snap_threshold = 0.3      # jumps above this skip the animation

[link_status]
# show_delay_ms = 100       # 0-5000
# max_chars = 80            # 8-1000, longer links are shortened in the middle

[hover]
# focus_follows_mouse = true
# delay_ms = 150            # 0-5000
# keyboard_suppress_ms = 300  # 0-10000

[loading]
# enabled = true
# app_name = "trellis"

[logging]
# level = "info"            # trace, debug, info, warn, error
"##
    .to_string()
}
