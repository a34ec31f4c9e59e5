use crate::types::ThemeMode;

pub struct ThemeDefinition {
    pub css: &'static str,
    /// Icon shown on the toggle button: what a click switches to.
    pub toggle_icon: &'static str,
}

pub fn theme_definition(mode: ThemeMode) -> ThemeDefinition {
    match mode {
        ThemeMode::Light => ThemeDefinition {
            css: LIGHT_THEME,
            toggle_icon: "\u{1F319}",
        },
        ThemeMode::Dark => ThemeDefinition {
            css: DARK_THEME,
            toggle_icon: "\u{2600}\u{FE0F}",
        },
    }
}

const LIGHT_THEME: &str = r#"
:root {
    --color-bg-primary: #f7f8fb;
    --color-bg-secondary: #ffffff;
    --color-bg-overlay: rgba(255, 255, 255, 0.92);
    --color-text-primary: #1a1d26;
    --color-text-secondary: #3c4150;
    --color-text-muted: #6b7180;
    --color-border: #d4d8e2;
    --color-surface-muted: #eceef4;
    --color-input-border: #c4c9d6;
    --color-input-bg: #ffffff;
    --color-chat-user-bg: #2d5bd1;
    --color-chat-user-text: #ffffff;
    --color-chat-assistant-bg: #ffffff;
    --color-chat-assistant-text: #1a1d26;
    --color-error-bg: #fdecec;
    --color-error-border: #d64545;
    --color-error-text: #8f1f1f;
    --color-link: #2d5bd1;
    --color-timestamp: #8a8f9d;
    --color-toast-bg: #1a1d26;
    --color-toast-text: #ffffff;
}
body { background: var(--color-bg-primary); color: var(--color-text-primary); }
.header { background: var(--color-bg-overlay); border-bottom: 1px solid var(--color-border); }
.btn:hover,
.btn-ghost:hover { background: var(--color-surface-muted); }
.composer textarea { background: var(--color-input-bg); color: var(--color-text-primary); border-color: var(--color-input-border); }
.composer textarea:focus { border-color: var(--color-link); }
"#;

const DARK_THEME: &str = r#"
:root {
    --color-bg-primary: #12141c;
    --color-bg-secondary: #1a1d28;
    --color-bg-overlay: rgba(18, 20, 28, 0.92);
    --color-text-primary: #e8eaf1;
    --color-text-secondary: #c3c7d4;
    --color-text-muted: #8a8f9d;
    --color-border: #323648;
    --color-surface-muted: #232736;
    --color-input-border: #3a3f52;
    --color-input-bg: #1a1d28;
    --color-chat-user-bg: #3d6bff;
    --color-chat-user-text: #ffffff;
    --color-chat-assistant-bg: #1e2230;
    --color-chat-assistant-text: #e8eaf1;
    --color-error-bg: #2c1a1d;
    --color-error-border: #b3483e;
    --color-error-text: #f0a8a0;
    --color-link: #7aa0ff;
    --color-timestamp: #6b7180;
    --color-toast-bg: #e8eaf1;
    --color-toast-text: #12141c;
}
body { background: var(--color-bg-primary); color: var(--color-text-primary); }
.header { background: var(--color-bg-overlay); border-bottom: 1px solid var(--color-border); }
.btn:hover,
.btn-ghost:hover { background: var(--color-surface-muted); }
.composer textarea { background: var(--color-input-bg); color: var(--color-text-primary); border-color: var(--color-input-border); }
.composer textarea:focus { border-color: var(--color-link); }
"#;
