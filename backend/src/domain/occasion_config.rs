//! Occasion configuration lookup.
//!
//! Every occasion carries a static cosmetic configuration: label, emoji
//! palette, colors, microcopy, an easter egg and a set of vibe starters.
//! The table is built once per process and never mutated afterwards.
//!
//! Lookup is total: any identifier that isn't a known occasion resolves to
//! the `custom` configuration.

use once_cell::sync::Lazy;
use shared::{
    EasterEgg, EasterEggTrigger, EasterEggType, Microcopy, Occasion, OccasionConfig, VibeStarter,
};

static BIRTHDAY: Lazy<OccasionConfig> = Lazy::new(|| build_config(Occasion::Birthday));
static ANNIVERSARY: Lazy<OccasionConfig> = Lazy::new(|| build_config(Occasion::Anniversary));
static WEDDING: Lazy<OccasionConfig> = Lazy::new(|| build_config(Occasion::Wedding));
static CUSTOM: Lazy<OccasionConfig> = Lazy::new(|| build_config(Occasion::Custom));

/// Resolve the configuration for a raw occasion identifier
pub fn resolve_occasion_config(occasion: &str) -> &'static OccasionConfig {
    config_for(Occasion::parse_lossy(occasion))
}

/// Configuration of an already parsed occasion
pub fn config_for(occasion: Occasion) -> &'static OccasionConfig {
    match occasion {
        Occasion::Birthday => &BIRTHDAY,
        Occasion::Anniversary => &ANNIVERSARY,
        Occasion::Wedding => &WEDDING,
        Occasion::Custom => &CUSTOM,
    }
}

pub fn occasion_emojis(occasion: &str) -> &'static [String] {
    &resolve_occasion_config(occasion).emojis
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn starters(values: &[(&str, &str)]) -> Vec<VibeStarter> {
    values
        .iter()
        .map(|(label, text)| VibeStarter {
            label: label.to_string(),
            text: text.to_string(),
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn microcopy(
    heading: &str,
    subtitle: &str,
    name_placeholder: &str,
    message_placeholder: &str,
    cta_publish: &str,
    loading_emoji: &str,
    footer: &str,
    error_emoji: &str,
    error_message: &str,
) -> Microcopy {
    Microcopy {
        heading: heading.to_string(),
        subtitle: subtitle.to_string(),
        name_placeholder: name_placeholder.to_string(),
        message_placeholder: message_placeholder.to_string(),
        cta_publish: cta_publish.to_string(),
        loading_emoji: loading_emoji.to_string(),
        footer: footer.to_string(),
        error_emoji: error_emoji.to_string(),
        error_message: error_message.to_string(),
    }
}

fn build_config(occasion: Occasion) -> OccasionConfig {
    match occasion {
        Occasion::Birthday => OccasionConfig {
            label: "Birthday 🎂".to_string(),
            emojis: strings(&["🎂", "🎈", "🎉", "🎁", "🥳", "🎊", "🧁", "🕯️"]),
            gradient: "from-pink-200 via-rose-100 to-amber-100".to_string(),
            blob_colors: ["bg-pink-300/30".to_string(), "bg-amber-200/30".to_string()],
            primary_hue: 350,
            microcopy: microcopy(
                "Let's throw a party 🎉",
                "Who's the birthday star?",
                "e.g. Pookie, Bestie, Mom",
                "Blow out the candles and make a wish…",
                "Send Birthday Love 🎂",
                "🎂",
                "Make a wish! 🌠",
                "🎂",
                "This birthday wish got lost in the confetti 🎊",
            ),
            easter_egg: EasterEgg {
                kind: EasterEggType::Confetti,
                trigger: EasterEggTrigger::OnOpen,
            },
            vibe_starters: starters(&[
                ("Short & Hype", "HBD!!! Hope you have the best day ever! 🎂🎉"),
                (
                    "Sentimental",
                    "Happy Birthday to one of my favorite humans. So grateful for another year of you! ❤️",
                ),
                (
                    "Roast",
                    "Happy Birthday! I was going to get you a gift, but then I remembered my presence is enough. 🎁",
                ),
                (
                    "Memory Lane",
                    "Remember when we... wait, maybe we shouldn't talk about that. Happy Birthday! 😂",
                ),
            ]),
        },
        Occasion::Anniversary => OccasionConfig {
            label: "Anniversary 💖".to_string(),
            emojis: strings(&["💖", "💗", "💝", "💕", "🥂", "🌹", "💫", "✨"]),
            gradient: "from-rose-200 via-pink-100 to-purple-100".to_string(),
            blob_colors: ["bg-rose-300/30".to_string(), "bg-purple-200/30".to_string()],
            primary_hue: 330,
            microcopy: microcopy(
                "Celebrate your love story 💕",
                "Who's the lucky one?",
                "e.g. My Love, Babe, Partner",
                "From the day we met until forever…",
                "Send Anniversary Love 💖",
                "💖",
                "Forever & always 💫",
                "💔",
                "This love letter got lost in the stars 🌌",
            ),
            easter_egg: EasterEgg {
                kind: EasterEggType::Confetti,
                trigger: EasterEggTrigger::OnOpen,
            },
            vibe_starters: starters(&[
                ("Timeline", "From [Year] to forever. Happy Anniversary! 💑"),
                (
                    "Inside Joke",
                    "I love you more than [Coffee/Pizza/Gaming]. And you know that's a lot. 😉",
                ),
                ("First Sight", "I still remember the first time I saw you..."),
                (
                    "Short & Sweet",
                    "Happy Anniversary to my better half. Here's to us! 🥂",
                ),
            ]),
        },
        Occasion::Wedding => OccasionConfig {
            label: "Wedding 💍".to_string(),
            emojis: strings(&["💍", "💒", "🥂", "🤍", "💐", "🎊", "👰", "🤵"]),
            gradient: "from-amber-50 via-white to-rose-50".to_string(),
            blob_colors: ["bg-amber-200/30".to_string(), "bg-rose-100/30".to_string()],
            primary_hue: 30,
            microcopy: microcopy(
                "Aisle be there for you 💒",
                "Who are the lovebirds?",
                "e.g. The Happy Couple, Sarah & John",
                "Dear newlyweds, wishing you a lifetime of…",
                "Send Wedding Wishes 💍",
                "💍",
                "Happily ever after 💫",
                "💍",
                "This wedding wish took a wrong turn down the aisle 💒",
            ),
            easter_egg: EasterEgg {
                kind: EasterEggType::ConfettiGold,
                trigger: EasterEggTrigger::OnOpen,
            },
            vibe_starters: starters(&[
                ("Classic", "Wishing you a lifetime of love and happiness! 🥂"),
                (
                    "Fun",
                    "Congrats on finding the one person you want to annoy for the rest of your life! 💍",
                ),
                (
                    "Heartfelt",
                    "May your love grow stronger with each passing year. So happy for you both! ❤️",
                ),
            ]),
        },
        Occasion::Custom => OccasionConfig {
            label: "Just Because ✨".to_string(),
            emojis: strings(&["✨", "💫", "⭐", "🌟", "🎀", "💌", "🦋", "🌈"]),
            gradient: "from-violet-100 via-indigo-50 to-sky-100".to_string(),
            blob_colors: ["bg-violet-200/30".to_string(), "bg-sky-200/30".to_string()],
            primary_hue: 270,
            microcopy: microcopy(
                "Spread some magic ✨",
                "Who deserves a little sunshine?",
                "e.g. Bestie, Fam, My Person",
                "Just wanted to say…",
                "Send the Vibes ✨",
                "✨",
                "Sent with sparkles 💖",
                "🦋",
                "This magical moment flew away 🦋",
            ),
            easter_egg: EasterEgg {
                kind: EasterEggType::Sparkle,
                trigger: EasterEggTrigger::OnReveal,
            },
            vibe_starters: starters(&[
                (
                    "Support",
                    "Just wanted to remind you that you're doing great. 💪",
                ),
                ("Miss You", "Thinking of you and missing your face! 👋"),
                (
                    "Gratitude",
                    "Thank you for being you. That's it. That's the message. ✨",
                ),
                ("Just Because", "Sending some good vibes your way! 🌈"),
            ]),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_occasions_resolve_to_their_own_config() {
        assert_eq!(resolve_occasion_config("birthday").label, "Birthday 🎂");
        assert_eq!(resolve_occasion_config("anniversary").primary_hue, 330);
        assert_eq!(
            resolve_occasion_config("wedding").easter_egg.kind,
            EasterEggType::ConfettiGold
        );
        assert_eq!(resolve_occasion_config("custom").label, "Just Because ✨");
    }

    #[test]
    fn test_unknown_occasions_fall_back_to_custom() {
        let custom = config_for(Occasion::Custom);
        for raw in ["", "graduation", "BIRTHDAY", " wedding", "🎉"] {
            let resolved = resolve_occasion_config(raw);
            assert!(std::ptr::eq(resolved, custom), "{:?} should resolve to custom", raw);
            // Resolving again yields the same static entry.
            assert!(std::ptr::eq(resolve_occasion_config(raw), resolved));
        }
    }

    #[test]
    fn test_each_occasion_has_its_own_config() {
        let labels: Vec<&str> = Occasion::ALL
            .iter()
            .map(|occasion| config_for(*occasion).label.as_str())
            .collect();
        assert_eq!(labels, vec!["Birthday 🎂", "Anniversary 💖", "Wedding 💍", "Just Because ✨"]);
        assert!(std::ptr::eq(config_for(Occasion::Wedding), config_for(Occasion::Wedding)));
    }

    #[test]
    fn test_every_config_is_complete() {
        for occasion in Occasion::ALL {
            let config = config_for(occasion);
            assert!(!config.emojis.is_empty());
            assert!(!config.vibe_starters.is_empty());
            assert!(!config.microcopy.heading.is_empty());
            assert!(!config.microcopy.error_message.is_empty());
        }
    }

    #[test]
    fn test_occasion_emojis() {
        assert_eq!(occasion_emojis("wedding")[0], "💍");
        assert_eq!(occasion_emojis("nope")[0], "✨");
    }
}
