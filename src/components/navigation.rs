use crate::Screen;
use dioxus::prelude::*;

const TAB_STYLE: &str = "flex: 1; padding: 12px; margin: 0 5px; border: none; border-radius: 8px; cursor: pointer; font-size: 14px; text-align: center; background: #ffffff; color: #333;";
const TAB_ACTIVE_STYLE: &str = "flex: 1; padding: 12px; margin: 0 5px; border: none; border-radius: 8px; cursor: pointer; font-size: 14px; text-align: center; background: #0066cc; color: #ffffff;";

#[component]
pub fn NavigationBar(current_screen: Screen, on_navigate: EventHandler<Screen>) -> Element {
    rsx! {
        div {
            style: "display: flex; justify-content: space-around; padding: 10px; background: #f0f0f0; border-top: 1px solid #ddd;",

            button {
                style: if matches!(current_screen, Screen::Gallery) { TAB_ACTIVE_STYLE } else { TAB_STYLE },
                onclick: move |_| on_navigate.call(Screen::Gallery),
                "🖼️ Gallery"
            }

            button {
                style: if matches!(current_screen, Screen::Account) { TAB_ACTIVE_STYLE } else { TAB_STYLE },
                onclick: move |_| on_navigate.call(Screen::Account),
                "👤 Account"
            }
        }
    }
}
