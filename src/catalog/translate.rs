use crate::provider::fallback::{Capability, recover};

/// Languages with caption translations.
pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "tr", "es", "de", "fr"];

/// English caption -> (tr, es, de, fr).
const CAPTIONS: &[(&str, [&str; 4])] = &[
    ("I'm dead", ["Öldüm", "Me muero", "Ich bin tot", "Jsuis mort"]),
    ("Wait what?", ["Dur bi, ne?", "¿Qué dices?", "Warte, was?", "Attends quoi?"]),
    ("Be serious", ["Ciddi ol", "¿En serio?", "Echt jetzt", "Sois sérieux"]),
    ("Told you", ["Demiştim", "Te lo dije", "Hab ich doch gesagt", "Je te l'avais dit"]),
    ("I can't", ["Yapamam", "No puedo", "Ich kann nicht", "J'peux pas"]),
    ("Of course", ["E tabii", "Claro", "Na klar", "Évidemment"]),
    ("Slay", ["Yıktın", "Arrasas", "Läuft", "Tu gères"]),
    ("Bet", ["Tamamdır", "Vale", "Abgemacht", "Ça marche"]),
    ("Cap", ["Yalan", "Mentira", "Gelogen", "Mytho"]),
    ("Side eye", ["Yan bakış", "Te estoy viendo", "Seitenblick", "Regard en coin"]),
    ("Cringe", ["Utanç verici", "Qué vergüenza", "Fremdscham", "La gêne"]),
    ("Hype", ["Heyecan", "¡Qué emoción!", "Hype!", "Trop hâte"]),
    ("Clown", ["Palyaço", "Payaso", "Clown", "Clown"]),
    ("Mood", ["Aynen ben", "Mood", "Mood", "Mood"]),
    ("Sus", ["Şüpheli", "Sospechoso", "Verdächtig", "Chelou"]),
    ("Touch grass", ["Biraz dışarı çık", "Sal a la calle", "Geh mal raus", "Va dehors"]),
    ("Skill issue", ["Beceri sorunu", "Problema tuyo", "Skill Issue", "Skill issue"]),
    ("Based", ["Helal", "Crack", "Ehrenmann", "Respect"]),
    ("Sip tea", ["Çayımı içiyorum", "Yo solo miro", "Ich trink nur Tee", "Je bois mon thé"]),
    ("Working hard?", ["Çalışıyor muyuz?", "¿Trabajando duro?", "Fleißig?", "On bosse?"]),
    ("Food coma", ["Çok yedim", "Empachado", "Fresskoma", "Trop mangé"]),
    ("Broke", ["Meteliksiz", "Sin un duro", "Pleite", "Fauché"]),
    ("Party", ["Parti", "Fiesta", "Party", "Soirée"]),
    ("Monday", ["Pazartesi", "Lunes", "Montag", "Lundi"]),
    ("Coffee", ["Kahve", "Café", "Kaffee", "Café"]),
    ("Deadline", ["Son gün", "Fecha límite", "Deadline", "Deadline"]),
    ("This is fine", ["Her şey yolunda", "Todo bien", "Alles gut", "Tout va bien"]),
    ("Facepalm", ["Pes", "Madre mía", "Facepalm", "Consternant"]),
    ("Shocked", ["Şok oldum", "En shock", "Schockiert", "Choqué"]),
    ("Love you", ["Seni seviyorum", "Te quiero", "Hab dich lieb", "Je t'aime"]),
    ("Aww", ["Aa çok tatlı", "Qué mono", "Wie süß", "Trop mignon"]),
    ("Chill", ["Rahat", "Tranqui", "Entspannt", "Tranquille"]),
    ("Respect", ["Saygılar", "Respeto", "Respekt", "Respect"]),
];

fn column(language: &str) -> Option<usize> {
    match language.trim().to_lowercase().as_str() {
        "tr" => Some(0),
        "es" => Some(1),
        "de" => Some(2),
        "fr" => Some(3),
        _ => None,
    }
}

/// Translate a library caption; unknown languages or captions return the English text unchanged.
///
/// Misses outside English go through the caption-translation fallback and are logged.
pub fn translate_caption(english: &str, language: &str) -> String {
    if language.trim().eq_ignore_ascii_case("en") {
        return english.to_string();
    }
    let translated = lookup(english, language)
        .map(str::to_string)
        .ok_or_else(|| format!("no {language:?} translation for {english:?}"));
    recover(Capability::TranslateCaption, translated, || english.to_string())
}

/// Translation if the table has one.
pub fn lookup(english: &str, language: &str) -> Option<&'static str> {
    let col = column(language)?;
    CAPTIONS
        .iter()
        .find(|(en, _)| *en == english)
        .map(|(_, tr)| tr[col])
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/translate.rs"]
mod tests;
