use along_core::Toast;
use dioxus::prelude::*;

/// Bottom toast; stays mounted through its fade-out until the message clears.
#[component]
pub fn ToastBanner(toast: Toast) -> Element {
    if toast.message.is_empty() {
        return rsx! {};
    }

    rsx! {
        div {
            class: if toast.visible { "toast toast-in" } else { "toast toast-out" },
            "{toast.message}"
        }
    }
}
