use dioxus::prelude::*;

const EXAMPLE_QUESTIONS: &[&str] = &[
    "When is the next graded assignment due?",
    "How do I set up the course environment on Linux?",
    "What does the grading policy say about late submissions?",
    "Where can I find last week's lecture notes?",
];

#[component]
pub fn LandingScreen(draft: Signal<String>, on_start: EventHandler<()>) -> Element {
    let mut draft = draft;

    rsx! {
        div { class: "main-container landing",
            div { class: "hero",
                h1 { class: "hero-title", "Virta" }
                p { class: "hero-tagline",
                    "Your virtual teaching assistant. Ask anything about the course, attach a screenshot, and get an answer with sources."
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| on_start.call(()),
                    "Get started"
                }
            }
            div { class: "examples",
                h3 { class: "section-title", "Try asking" }
                div { class: "example-grid",
                    for question in EXAMPLE_QUESTIONS.iter() {
                        button {
                            class: "btn example-btn",
                            r#type: "button",
                            onclick: move |_| {
                                draft.set(question.to_string());
                                on_start.call(());
                            },
                            "{question}"
                        }
                    }
                }
            }
        }
    }
}
