//! # Prompt Builders
//!
//! Text sent to the language and image models. Both builders take the
//! random source explicitly so tests can seed it.

use rand::Rng;
use rand::seq::IndexedRandom;

/// How many previous quotes the quote prompt asks the model to avoid.
pub const RECENT_QUOTES_IN_PROMPT: usize = 8;

pub const SYSTEM_MESSAGE: &str = "You craft concise, original inspirational quotes in English. \
Themes to draw from: faith, truth, light, family, dignity, hope, history, \
unity, sacrifice, work, freedom, justice, honor, education, future, \
roots, traditions, heritage, heroism, courage, solidarity, wisdom, resilience, gratitude. \
Alternate styles: solemn oath, moral verdict, poetic metaphor, rallying call, short blessing, historical lesson. \
Keep each quote under 180 characters, in 1–2 short sentences. \
Avoid clichés, vary the structure and opening, no quotation marks or attributions.";

pub const QUOTE_STYLES: [&str; 20] = [
    "jurământ mobilizator",
    "verdict moral tăios",
    "metaforă luminoasă",
    "îndemn scurt, imperativ",
    "binecuvântare/urare solemnă",
    "amintire istorică transformată în lecție",
    "declarație personală despre demnitate",
    "chemare la unitate și curaj",
    "exclamație de speranță",
    "sentință populară de tip proverb modern",
    "descriere poetică a familiei și rădăcinilor",
    "strigăt de libertate și dreptate",
    "mărturisire intimă de credință",
    "imaginație vizionară despre viitor",
    "elogiu adus eroilor și sacrificiului",
    "învățătură scurtă pentru tineri",
    "invocație către lumină și adevăr",
    "aforism despre muncă și demnitate",
    "memento al satului și tradiției",
    "binecuvântare pentru România",
];

/// Openings the model is told to avoid.
pub const BANNED_STARTS: [&str; 11] = [
    "România",
    "Fără",
    "Credința",
    "Adevărul",
    "Lumina",
    "Jur",
    "Cât timp",
    "Trebuie",
    "Întotdeauna",
    "Să fim",
    "Noi",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub name: &'static str,
    pub colors: [&'static str; 4],
}

pub const IMAGE_PALETTES: [Palette; 5] = [
    Palette {
        name: "lumina",
        colors: ["#F8F5E7", "#EDE7D1", "#C9C2A3", "#8F8A70"],
    },
    Palette {
        name: "tricolor discret",
        colors: ["#1C2E5A", "#B91D23", "#E7D9AC", "#0E1A33"],
    },
    Palette {
        name: "lemn și filigran",
        colors: ["#3E2C1C", "#A67C52", "#D9C7A4", "#F2E9DA"],
    },
    Palette {
        name: "piatră și aur",
        colors: ["#2C2C2C", "#6B6B6B", "#BCA46A", "#F1E7C8"],
    },
    Palette {
        name: "albastru de Voroneț",
        colors: ["#1C3A5E", "#3F6C9D", "#D7D3C8", "#A08E6A"],
    },
];

pub const IMAGE_MOTIFS: [&str; 8] = [
    "ray of light piercing through mist",
    "silhouettes of mountains at sunrise",
    "parchment texture with subtle decorative filigree",
    "cross suggested only by intersection of light rays",
    "traditional textiles rendered abstractly",
    "old stone with patina, obliquely illuminated",
    "stylized oak branches",
    "outlines of wooden churches, almost ghostly",
];

pub const IMAGE_STYLES: [&str; 6] = [
    "minimalist, clean, emphasis on light",
    "painterly realism, atmospheric depth",
    "modern illustration with natural textures",
    "conceptual photography with subtle bokeh",
    "modern engraving with clean contrasts",
    "fine-art, calm composition",
];

/// User prompt for one quote generation.
///
/// `recent` is most-recent-first (the order [`QuoteHistory`] keeps); the
/// first [`RECENT_QUOTES_IN_PROMPT`] entries are listed.
///
/// [`QuoteHistory`]: crate::store::history::QuoteHistory
pub fn quote_prompt<R: Rng + ?Sized>(recent: &[&str], rng: &mut R) -> String {
    let style = QUOTE_STYLES.choose(rng).copied().unwrap_or(QUOTE_STYLES[0]);

    let recent = recent
        .iter()
        .take(RECENT_QUOTES_IN_PROMPT)
        .enumerate()
        .map(|(i, q)| format!("{}. {}", i + 1, q))
        .collect::<Vec<_>>()
        .join("\n");

    let avoid_recent = if recent.is_empty() {
        String::new()
    } else {
        format!(
            "Evită să semene cu aceste citate recente (nu repeta structură, ritm, început sau imagini):\n{}",
            recent
        )
    };

    [
        "Scrie UN singur citat original, în limba română, fără ghilimele și fără atribuire.".to_string(),
        "Lungime: maxim 180 de caractere, 1–2 fraze.".to_string(),
        "Teme obligatorii (alege liber combinații): credință, adevăr, lumină, România, familie, demnitate, speranță, istorie.".to_string(),
        format!("Variază STRUCTURA și ÎNCEPUTUL. Stilul pentru această generație: {}.", style),
        format!("NU începe cu: {}.", BANNED_STARTS.join(", ")),
        avoid_recent,
        "Evită clișeele evidente și frazele lungi. Fără enumerări banale.".to_string(),
    ]
    .into_iter()
    .filter(|line| !line.is_empty())
    .collect::<Vec<_>>()
    .join("\n")
}

/// Prompt for a background image.
///
/// With a non-blank `seed` quote the image is inspired by the quote alone;
/// otherwise a theme, composition and palette are drawn at random.
pub fn image_prompt<R: Rng + ?Sized>(seed: &str, rng: &mut R) -> String {
    let palette = IMAGE_PALETTES.choose(rng).copied().unwrap_or(IMAGE_PALETTES[0]);
    let motifs: Vec<&str> = IMAGE_MOTIFS.choose_multiple(rng, 2).copied().collect();
    let style = IMAGE_STYLES.choose(rng).copied().unwrap_or(IMAGE_STYLES[0]);

    let seed = seed.trim();
    let mut lines = vec!["Background image only, no text, no watermark.".to_string()];

    if seed.is_empty() {
        lines.push(
            "Theme: credință, adevăr, lumină, România, familie, demnitate, speranță, istorie."
                .to_string(),
        );
        lines.push(format!(
            "Composition: {}; {}; spațiu negativ pentru tipografie.",
            style,
            motifs.join("; ")
        ));
        lines.push(format!(
            "Color palette: {} ({}).",
            palette.name,
            palette.colors.join(", ")
        ));
    } else {
        lines.push(format!("Inspiră-te vizual din mesajul: \"{}\".", seed));
    }

    lines.join(" ")
}
