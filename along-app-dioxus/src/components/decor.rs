//! Background decorations: sparkles, floating hearts, drifting clouds and a
//! film-grain overlay. Purely cosmetic.

use dioxus::prelude::*;

const SPARKLE_COUNT: usize = 6;
const HEART_COUNT: usize = 4;

/// Uniform value in `0.0..=1.0`, or the midpoint if the OS has no entropy
fn unit_random() -> f64 {
    let mut bytes = [0u8; 4];
    if getrandom::getrandom(&mut bytes).is_err() {
        return 0.5;
    }
    f64::from(u32::from_le_bytes(bytes)) / f64::from(u32::MAX)
}

/// Value in `base..base + spread`
fn spread(base: f64, range: f64) -> f64 {
    base + unit_random() * range
}

fn sparkle_style() -> String {
    format!(
        "left: {:.1}%; top: {:.1}%; font-size: {:.1}px; animation: sparkle {:.2}s ease-in-out {:.2}s infinite;",
        spread(0.0, 100.0),
        spread(0.0, 100.0),
        spread(8.0, 6.0),
        spread(3.0, 4.0),
        spread(0.0, 5.0),
    )
}

fn heart_style() -> String {
    format!(
        "left: {:.1}%; bottom: {:.1}%; font-size: {:.1}px; animation: float-heart {:.2}s ease-in-out {:.2}s infinite;",
        spread(15.0, 70.0),
        -spread(5.0, 10.0),
        spread(10.0, 6.0),
        spread(7.0, 5.0),
        spread(0.0, 8.0),
    )
}

#[component]
pub fn Sparkles() -> Element {
    // Positions are rolled once per mount
    let styles = use_hook(|| (0..SPARKLE_COUNT).map(|_| sparkle_style()).collect::<Vec<_>>());

    rsx! {
        div {
            class: "decor-layer",
            for (i, style) in styles.iter().enumerate() {
                span { key: "{i}", class: "sparkle", style: "{style}", "✨" }
            }
        }
    }
}

#[component]
pub fn FloatingHearts() -> Element {
    let styles = use_hook(|| (0..HEART_COUNT).map(|_| heart_style()).collect::<Vec<_>>());

    rsx! {
        div {
            class: "decor-layer",
            for (i, style) in styles.iter().enumerate() {
                span { key: "{i}", class: "heart", style: "{style}", "💗" }
            }
        }
    }
}

#[component]
pub fn Clouds() -> Element {
    rsx! {
        div {
            class: "decor-layer",
            div { class: "cloud cloud-1" }
            div { class: "cloud cloud-2" }
            div { class: "cloud cloud-3" }
        }
    }
}

#[component]
pub fn GrainOverlay() -> Element {
    rsx! {
        div { class: "grain" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_random_in_range() {
        for _ in 0..100 {
            let value = unit_random();
            assert!((0.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn test_spread_bounds() {
        for _ in 0..100 {
            let value = spread(15.0, 70.0);
            assert!((15.0..=85.0).contains(&value));
        }
    }
}
