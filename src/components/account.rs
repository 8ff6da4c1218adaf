use crate::{AppState, Screen};
use dioxus::prelude::*;
use photo_upload::SessionProvider;

#[component]
pub fn AccountScreen(on_navigate: EventHandler<Screen>) -> Element {
    let state = use_context::<AppState>();
    let mut current_user = use_signal(|| state.session.current_session().map(|s| s.user_id));
    let mut user_input = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);

    let sign_in = {
        let state = state.clone();
        move |_| {
            let result = state
                .open_database()
                .and_then(|conn| state.session.sign_in(&conn, &user_input()));
            match result {
                Ok(account) => {
                    current_user.set(Some(account.user_id));
                    user_input.set(String::new());
                    error.set(None);
                    on_navigate.call(Screen::Gallery);
                }
                Err(e) => {
                    log::warn!("Sign-in failed: {}", e);
                    error.set(Some(e.user_message()));
                }
            }
        }
    };

    let sign_out = {
        let state = state.clone();
        move |_| {
            match state
                .open_database()
                .and_then(|conn| state.session.sign_out(&conn))
            {
                Ok(()) => {
                    current_user.set(None);
                    error.set(None);
                }
                Err(e) => {
                    log::error!("Sign-out failed: {}", e);
                    error.set(Some(e.user_message()));
                }
            }
        }
    };

    rsx! {
        div { style: "padding: 16px; max-width: 600px; margin: 0 auto; min-height: 100vh; background: #f5f5f5;",
            h1 { style: "color: #0066cc; margin: 32px 0 24px 0; font-size: 24px; font-weight: 700;",
                "👤 Account"
            }

            div { class: "card",
                if let Some(user) = current_user() {
                    p { style: "margin: 0 0 16px 0; font-size: 15px; color: #333;",
                        "Signed in as "
                        strong { "{user}" }
                    }
                    button {
                        class: "btn-secondary",
                        style: "width: 100%; padding: 14px; font-size: 16px;",
                        onclick: sign_out,
                        "Sign out"
                    }
                } else {
                    label { style: "display: block; margin-bottom: 8px; font-size: 14px; color: #555;",
                        "User name"
                    }
                    input {
                        style: "width: 100%; padding: 14px 16px; font-size: 16px; border: 2px solid #e0e0e0; border-radius: 10px; background: white; margin-bottom: 12px; box-sizing: border-box;",
                        r#type: "text",
                        placeholder: "e.g. alice",
                        value: "{user_input}",
                        oninput: move |e| user_input.set(e.value()),
                    }
                    button {
                        class: "btn-primary",
                        style: "width: 100%; padding: 14px; font-size: 16px;",
                        disabled: user_input().trim().is_empty(),
                        onclick: sign_in,
                        "🔐 Sign in"
                    }
                }

                if let Some(message) = error() {
                    p { style: "margin: 12px 0 0 0; padding: 12px; background: #f8d7da; border-radius: 4px; color: #721c24; font-size: 14px;",
                        "{message}"
                    }
                }
            }

            div { style: "background: #f8f9fa; padding: 16px; margin: 16px 0; border-radius: 8px; border: 1px solid #e0e0e0;",
                h3 { style: "margin: 0 0 12px 0; font-size: 14px; color: #666; font-weight: 600;",
                    "ℹ️ Storage"
                }
                p { style: "font-size: 12px; color: #666; margin: 4px 0; word-break: break-all;",
                    "DB: {state.config.database_path().display()}"
                }
            }
        }
    }
}
