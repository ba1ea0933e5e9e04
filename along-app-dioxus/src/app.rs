use crate::components::{
    Clouds, EndingCard, FloatingHearts, GrainOverlay, IntroCard, MoodPicker, Player, Sparkles,
    ToastBanner,
};
use crate::media::AUDIO_ELEMENT_ID;
use crate::state::SessionView;
use along_core::{MediaConfig, Section};
use dioxus::prelude::*;

/// Stylesheet compiled into the binary
const STYLE: &str = include_str!("../assets/along.css");

/// Root application component.
/// Renders the decorations, the audio element and whichever section is
/// mounted, plus the toast on top.
#[component]
pub fn App() -> Element {
    let view = use_context::<SessionView>();
    let media = use_context::<MediaConfig>();

    let snapshot = view.snapshot.read().clone();
    let audio_src = media.audio_path;

    let body = match snapshot.section {
        Section::Intro => rsx! { IntroCard { revealed: snapshot.revealed } },
        Section::Mood => rsx! { MoodPicker { revealed: snapshot.revealed } },
        Section::Player => rsx! { Player { snapshot: snapshot.clone() } },
        Section::Ending => rsx! { EndingCard { revealed: snapshot.revealed } },
    };

    rsx! {
        style { {STYLE} }

        Sparkles {}
        FloatingHearts {}
        Clouds {}
        GrainOverlay {}

        audio { id: AUDIO_ELEMENT_ID, src: "{audio_src}", preload: "auto" }

        main {
            class: "stage",
            {body}
        }

        ToastBanner { toast: snapshot.toast.clone() }
    }
}
