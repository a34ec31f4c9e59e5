use crate::api::AnswerBackend;
use crate::attachment::mime_for_path;
use crate::export::ExportFormat;
use crate::render::{MessageBody, RenderedMessage, render_message};
use crate::session::MAX_QUESTION_CHARS;
use crate::types::Role;
use crate::ui::Session;
use dioxus::events::Key;
use dioxus::html::FileEngine;
use dioxus::prelude::*;

#[component]
pub fn ChatScreen(
    session: Signal<Session>,
    toast: Signal<Option<String>>,
    draft: Signal<String>,
) -> Element {
    let mut session = session;
    let mut toast = toast;
    let mut draft = draft;
    let mut confirm_clear = use_signal(|| false);

    let busy = session.read().is_busy();
    let rows: Vec<(String, RenderedMessage)> = session
        .read()
        .messages()
        .iter()
        .map(|message| (message.text.clone(), render_message(message)))
        .collect();
    let pending_preview = session
        .read()
        .pending_attachment()
        .map(|attachment| (attachment.file_name.clone(), attachment.preview_url()));
    let has_history = !rows.is_empty();
    let draft_chars = draft().chars().count();

    let mut send = move || {
        let text = draft();
        let outbound = match session.write().begin(&text) {
            Ok(outbound) => outbound,
            Err(err) => {
                toast.set(Some(err.to_string()));
                return;
            }
        };
        if let Some(notice) = session.write().take_notice() {
            toast.set(Some(notice));
        }
        draft.set(String::new());

        spawn(async move {
            let backend = { session.read().backend().clone() };
            let outcome = backend
                .ask(&outbound.question, outbound.image.as_deref())
                .await;
            let mut session = session;
            let mut toast = toast;
            session.write().complete(outcome);
            if let Some(notice) = session.write().take_notice() {
                toast.set(Some(notice));
            }
        });
    };

    let mut export = move |format: ExportFormat| {
        match session.read().export_to_downloads(format) {
            Ok(path) => toast.set(Some(format!("Exported to {}", path.display()))),
            Err(err) => toast.set(Some(err.to_string())),
        }
    };

    rsx! {
        div { class: "main-container",
            div { class: "chat-toolbar",
                button {
                    class: "btn btn-ghost",
                    r#type: "button",
                    disabled: !has_history,
                    onclick: move |_| export(ExportFormat::Json),
                    "Export JSON"
                }
                button {
                    class: "btn btn-ghost",
                    r#type: "button",
                    disabled: !has_history,
                    onclick: move |_| export(ExportFormat::Text),
                    "Export text"
                }
                button {
                    class: format_args!(
                        "btn {}",
                        if confirm_clear() { "btn-danger" } else { "btn-ghost" }
                    ),
                    r#type: "button",
                    disabled: !has_history && !confirm_clear(),
                    onclick: move |_| {
                        if confirm_clear() {
                            session.write().clear();
                            confirm_clear.set(false);
                            toast.set(Some("Chat history cleared".to_string()));
                        } else {
                            confirm_clear.set(true);
                        }
                    },
                    if confirm_clear() { "Really clear?" } else { "Clear history" }
                }
            }

            div { id: "chat-list", class: "chat-list",
                if !has_history {
                    div { class: "chat-welcome",
                        p { "Hello! I'm your virtual TA. Ask me anything about the course." }
                    }
                }
                for (raw_text, rendered) in rows {
                    MessageRow { raw_text, rendered }
                }
                if busy {
                    div { class: "message assistant",
                        div { class: "message-avatar", "\u{1F393}" }
                        div { class: "message-content typing-indicator",
                            span { class: "shimmer-text", "Thinking\u{2026}" }
                        }
                    }
                }
            }

            form { class: "composer",
                div { class: "composer-inner",
                    if let Some((file_name, preview_url)) = pending_preview {
                        div { class: "attachment-preview",
                            img { class: "attachment-thumb", src: "{preview_url}", alt: "Attached image" }
                            span { class: "attachment-name", "{file_name}" }
                            button {
                                class: "btn btn-ghost",
                                r#type: "button",
                                onclick: move |_| session.write().clear_attachment(),
                                "Remove"
                            }
                        }
                    }
                    div { class: "composer-row",
                        label { class: "btn btn-ghost attach-btn", r#for: "image-upload", title: "Attach an image",
                            "\u{1F4CE}"
                        }
                        input {
                            id: "image-upload",
                            class: "file-input",
                            r#type: "file",
                            accept: "image/*",
                            onchange: move |ev| {
                                if let Some(engine) = ev.files() {
                                    spawn(async move {
                                        let mut session = session;
                                        let mut toast = toast;
                                        let Some(name) = engine.files().into_iter().next() else {
                                            return;
                                        };
                                        if let Some(bytes) = engine.read_file(&name).await {
                                            let mime = mime_for_path(&name);
                                            let staged = session.write().attach(&name, mime, bytes);
                                            if let Err(err) = staged {
                                                toast.set(Some(err.to_string()));
                                            }
                                        }
                                    });
                                }
                            },
                        }
                        textarea {
                            rows: "1",
                            placeholder: "Ask a question\u{2026}",
                            value: "{draft}",
                            oninput: move |ev| draft.set(ev.value()),
                            onkeydown: move |ev| {
                                if ev.key() == Key::Enter && !ev.modifiers().shift() {
                                    ev.prevent_default();
                                    send();
                                }
                            },
                            disabled: busy,
                            autofocus: true,
                        }
                        button {
                            class: "btn btn-primary",
                            r#type: "button",
                            disabled: busy || draft().trim().is_empty(),
                            onclick: move |_| send(),
                            "Send"
                        }
                    }
                    if draft_chars > 0 {
                        div {
                            class: format_args!(
                                "char-counter {}",
                                if draft_chars > MAX_QUESTION_CHARS { "over-limit" } else { "" }
                            ),
                            "{draft_chars}/{MAX_QUESTION_CHARS} characters"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn MessageRow(raw_text: String, rendered: RenderedMessage) -> Element {
    let avatar = match rendered.role {
        Role::User => "\u{1F464}",
        Role::Assistant => "\u{1F393}",
    };
    let row_class = rendered.row_class();
    let content_class = rendered.content_class();
    let copy_payload = raw_text.clone();
    let on_copy = move |_| {
        let raw = copy_payload.clone();
        spawn(async move {
            #[cfg(any(feature = "desktop", feature = "mobile"))]
            {
                if let Ok(mut cb) = arboard::Clipboard::new() {
                    let _ = cb.set_text(raw);
                }
            }
            #[cfg(not(any(feature = "desktop", feature = "mobile")))]
            let _ = raw;
        });
    };

    rsx! {
        div { class: "{row_class}",
            div { class: "message-avatar", "{avatar}" }
            div { class: "{content_class}",
                if let MessageBody::Literal(text) = &rendered.body {
                    p { "{text}" }
                }
                if let MessageBody::Markdown(html) = &rendered.body {
                    div { class: "md", dangerous_inner_html: "{html}" }
                }
                if !rendered.links.is_empty() {
                    div { class: "message-links",
                        h4 { "Sources" }
                        for link in rendered.links.iter() {
                            a {
                                class: "source-link",
                                href: "{link.href}",
                                target: "_blank",
                                rel: "noopener noreferrer",
                                "{link.label}"
                            }
                        }
                    }
                }
                div { class: "message-meta",
                    if let Some(ts) = rendered.timestamp.as_ref() {
                        span { class: "message-timestamp", "{ts}" }
                    }
                    button { class: "copy-btn", r#type: "button", onclick: on_copy, "Copy" }
                }
            }
        }
    }
}
