//! Language selection, UI strings, narration subtitles, and the final title words.

use serde::{Deserialize, Serialize};

use crate::narrative::Subtitle;
use crate::prefs::PreferenceStore;

/// Preference key for the selected language.
pub const LANGUAGE_KEY: &str = "lang";

/// The closed set of supported languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    En,
    Tr,
}

/// UI string keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiText {
    InfoMove,
    MusicOn,
    MusicOff,
    Restart,
    Volume,
    Documentary,
    TryAgain,
    AudioStart,
    HeadingWin,
    HeadingLose,
    EndingWin,
    EndingLose,
    MoveForward,
    MoveBack,
}

/// Locale signals from the host used when nothing is stored.
#[derive(Debug, Clone, Default)]
pub struct LocaleHints {
    /// e.g. `"tr-TR"`, `"en_US.UTF-8"`.
    pub language: Option<String>,
    /// IANA zone, e.g. `"Europe/Istanbul"`.
    pub timezone: Option<String>,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Tr => "tr",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Language::En),
            "tr" => Some(Language::Tr),
            _ => None,
        }
    }

    /// Stored preference, then locale prefix, then timezone, then English.
    pub fn detect(store: Option<&dyn PreferenceStore>, hints: &LocaleHints) -> Self {
        if let Some(lang) = store
            .and_then(|s| s.get(LANGUAGE_KEY))
            .and_then(|code| Self::from_code(&code))
        {
            return lang;
        }
        if let Some(locale) = &hints.language {
            if locale.to_lowercase().starts_with("tr") {
                return Language::Tr;
            }
        }
        if hints.timezone.as_deref() == Some("Europe/Istanbul") {
            return Language::Tr;
        }
        Language::En
    }

    pub fn text(self, key: UiText) -> &'static str {
        use UiText::*;
        match (self, key) {
            (Language::En, InfoMove) => "Use W/S or the Up/Down Arrow to move.",
            (Language::En, MusicOn) => "🔊 Music",
            (Language::En, MusicOff) => "🔇 Music",
            (Language::En, Restart) => "⏮ Restart",
            (Language::En, Volume) => "Volume:",
            (Language::En, Documentary) => "Documentary",
            (Language::En, TryAgain) => "Try Again",
            (Language::En, AudioStart) => "Start",
            (Language::En, HeadingWin) => "You won",
            (Language::En, HeadingLose) => "Game over",
            (Language::En, EndingWin) => {
                "...Because he had a purpose. He never stopped until he reached it. Even if there is a chance of death, you can't give up trying for your dreams. Never give up!"
            }
            (Language::En, EndingLose) => {
                "Even if you have to walk a long and difficult road to achieve your dreams, you shouldn't stop trying. If you don't even try, you're going to fail anyway. So.. Never give up!"
            }
            (Language::En, MoveForward) => "TO TARGET",
            (Language::En, MoveBack) => "TO COLONY",
            (Language::Tr, InfoMove) => "W/S veya Yukarı/Aşağı ok tuşlarıyla hareket et.",
            (Language::Tr, MusicOn) => "🔊 Müzik",
            (Language::Tr, MusicOff) => "🔇 Müzik",
            (Language::Tr, Restart) => "⏮ Baştan",
            (Language::Tr, Volume) => "Ses:",
            (Language::Tr, Documentary) => "Belgesel",
            (Language::Tr, TryAgain) => "Tekrar Dene",
            (Language::Tr, AudioStart) => "Başlat",
            (Language::Tr, HeadingWin) => "Başardın",
            (Language::Tr, HeadingLose) => "Bitti",
            (Language::Tr, EndingWin) => {
                "...Çünkü bir amacı vardı. Vazgeçmedi ve sonunda ulaştı. Ölüm ihtimali olsa bile hayallerin için denemekten vazgeçemezsin. Asla vazgeçme!"
            }
            (Language::Tr, EndingLose) => {
                "Hayallerine ulaşmak için uzun ve zor bir yol yürümen gerekse bile denemeyi bırakmamalısın. Denemezsen zaten kaybedersin. Yani... Asla vazgeçme!"
            }
            (Language::Tr, MoveForward) => "HEDEFE",
            (Language::Tr, MoveBack) => "SÜRÜYE",
        }
    }

    /// Narration subtitles, ordered by start time.
    pub fn subtitles(self) -> Vec<Subtitle> {
        let table: &[(f64, f64, &str)] = match self {
            Language::En => &[
                (0.0, 4.0, "But one of them caught our eye, the one in the center."),
                (5.5, 10.0, "He would neither go towards the feeding grounds at the edge of the ice"),
                (10.0, 13.0, "nor return to the colony."),
                (14.0, 22.0, "Shortly afterwards, we saw him heading straight towards the mountains some 70 kilometers away."),
                (24.0, 30.0, "Dr. explained that even if he caught him and brought him back to the colony,"),
                (30.0, 33.0, "he would immediately head right back for the mountains."),
                (36.0, 38.0, "But why?"),
            ],
            Language::Tr => &[
                (0.0, 4.0, "Ama içlerinden biri dikkatimizi çekti, ortadaki."),
                (5.5, 10.0, "Ne buzun kenarındaki beslenme alanlarına gidiyordu"),
                (10.0, 13.0, "ne de koloniye geri dönüyordu."),
                (14.0, 22.0, "Kısa bir süre sonra onu 70 kilometre uzaktaki dağlara doğru yürürken gördük."),
                (24.0, 30.0, "Doktor, yakalayıp koloniye geri getirse bile,"),
                (30.0, 33.0, "hemen tekrar dağlara doğru yürümeye başlayacağını söyledi."),
                (36.0, 38.0, "Ama neden?"),
            ],
        };
        table
            .iter()
            .map(|&(start, end, text)| Subtitle::new(start, end, text))
            .collect()
    }

    /// The two words of the final title, left then right.
    pub fn title_words(self) -> [&'static str; 2] {
        match self {
            Language::En => ["BUT", "WHY?"],
            Language::Tr => ["AMA", "NEDEN?"],
        }
    }

    /// Horizontal nudge of the left title word. Turkish needs more room.
    pub fn left_word_extra_x(self, configured: f32) -> f32 {
        match self {
            Language::En => configured,
            Language::Tr => -13.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryPreferences;

    #[test]
    fn stored_value_wins() {
        let mut store = MemoryPreferences::default();
        store.set(LANGUAGE_KEY, "tr");
        let hints = LocaleHints {
            language: Some("en-US".into()),
            timezone: None,
        };
        assert_eq!(Language::detect(Some(&store), &hints), Language::Tr);
    }

    #[test]
    fn invalid_stored_value_is_ignored() {
        let mut store = MemoryPreferences::default();
        store.set(LANGUAGE_KEY, "de");
        assert_eq!(Language::detect(Some(&store), &LocaleHints::default()), Language::En);
    }

    #[test]
    fn locale_then_timezone_then_fallback() {
        let by_locale = LocaleHints {
            language: Some("TR-tr".into()),
            timezone: None,
        };
        assert_eq!(Language::detect(None, &by_locale), Language::Tr);

        let by_zone = LocaleHints {
            language: Some("en_GB.UTF-8".into()),
            timezone: Some("Europe/Istanbul".into()),
        };
        assert_eq!(Language::detect(None, &by_zone), Language::Tr);

        assert_eq!(Language::detect(None, &LocaleHints::default()), Language::En);
    }

    #[test]
    fn subtitle_tables_share_timing() {
        let en = Language::En.subtitles();
        let tr = Language::Tr.subtitles();
        assert_eq!(en.len(), tr.len());
        for (a, b) in en.iter().zip(&tr) {
            assert_eq!((a.start, a.end), (b.start, b.end));
        }
    }
}
