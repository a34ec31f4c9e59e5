use crate::api::QaClient;
use crate::session::ChatSession;
use crate::storage::Store;
use crate::theme::theme_definition;
use crate::types::ThemeMode;
use crate::views::{ChatScreen, LandingScreen};
use dioxus::prelude::*;
use std::time::Duration;

const VIRTA_CSS: Asset = asset!("/assets/virta.css");
const TOAST_HIDE_DELAY: Duration = Duration::from_secs(5);

/// The session as the app runs it: the real HTTP client behind the trait.
pub type Session = ChatSession<QaClient>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Screen {
    Landing,
    Chat,
}

#[component]
pub fn App() -> Element {
    let session = use_signal(|| ChatSession::new(QaClient::from_env(), Store::open()));
    let mut screen = use_signal(|| Screen::Landing);
    let toast = use_signal(|| Option::<String>::None);
    let draft = use_signal(String::new);

    use_toast_dismiss(toast);

    let theme = session.read().theme();

    rsx! {
        ThemeStyles { theme }
        AppHeader { session, screen, toast }
        if screen() == Screen::Landing {
            LandingScreen {
                draft,
                on_start: move |_| screen.set(Screen::Chat),
            }
        } else {
            ChatScreen { session, toast, draft }
        }
        ToastOverlay { toast }
    }
}

fn use_toast_dismiss(toast: Signal<Option<String>>) {
    use_effect(move || {
        if toast().is_some() {
            let mut control = toast;
            spawn(async move {
                tokio::time::sleep(TOAST_HIDE_DELAY).await;
                control.set(None);
            });
        }
    });
}

#[component]
fn ThemeStyles(theme: ThemeMode) -> Element {
    let definition = theme_definition(theme);
    rsx! {
        document::Link { rel: "stylesheet", href: VIRTA_CSS }
        style { dangerous_inner_html: "{definition.css}" }
    }
}

#[component]
fn AppHeader(
    session: Signal<Session>,
    screen: Signal<Screen>,
    toast: Signal<Option<String>>,
) -> Element {
    let mut session = session;
    let mut screen = screen;
    let mut toast = toast;
    let definition = theme_definition(session.read().theme());

    rsx! {
        div { class: "header",
            div { class: "header-content",
                button {
                    class: "btn btn-ghost header-wordmark",
                    r#type: "button",
                    onclick: move |_| screen.set(Screen::Landing),
                    "Virta"
                }
                div { class: "header-actions",
                    if screen() == Screen::Landing {
                        button {
                            class: "btn btn-ghost",
                            r#type: "button",
                            onclick: move |_| screen.set(Screen::Chat),
                            "Open chat"
                        }
                    }
                    button {
                        class: "btn btn-ghost theme-toggle",
                        r#type: "button",
                        title: "Toggle theme",
                        onclick: move |_| {
                            let mode = session.write().toggle_theme();
                            toast.set(Some(format!("Theme changed to {} mode", mode.label())));
                        },
                        "{definition.toggle_icon}"
                    }
                }
            }
        }
    }
}

#[component]
fn ToastOverlay(toast: Signal<Option<String>>) -> Element {
    let mut toast = toast;
    rsx! {
        if let Some(text) = toast() {
            div { class: "toast-container",
                div { class: "toast",
                    span { class: "toast-message", "{text}" }
                    button {
                        class: "toast-close",
                        r#type: "button",
                        aria_label: "Close",
                        onclick: move |_| toast.set(None),
                        "\u{00D7}"
                    }
                }
            }
        }
    }
}
