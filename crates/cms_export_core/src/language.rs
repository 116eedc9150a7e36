/// A language we hold a stopword list for.
struct StopwordLanguage {
    iso639_3: &'static str,
    iso639_1: &'static str,
    stopwords: &'static str,
}

#[rustfmt::skip]
const STOPWORD_LANGUAGES: &[StopwordLanguage] = &[
    StopwordLanguage { iso639_3: "ara", iso639_1: "ar", stopwords: "arabic" },
    StopwordLanguage { iso639_3: "ben", iso639_1: "bn", stopwords: "bangla" },
    StopwordLanguage { iso639_3: "dan", iso639_1: "da", stopwords: "danish" },
    StopwordLanguage { iso639_3: "nld", iso639_1: "nl", stopwords: "dutch" },
    StopwordLanguage { iso639_3: "eng", iso639_1: "en", stopwords: "english" },
    StopwordLanguage { iso639_3: "fin", iso639_1: "fi", stopwords: "finnish" },
    StopwordLanguage { iso639_3: "fra", iso639_1: "fr", stopwords: "french" },
    StopwordLanguage { iso639_3: "deu", iso639_1: "de", stopwords: "german" },
    StopwordLanguage { iso639_3: "ell", iso639_1: "el", stopwords: "greek" },
    StopwordLanguage { iso639_3: "ita", iso639_1: "it", stopwords: "italian" },
    StopwordLanguage { iso639_3: "nob", iso639_1: "no", stopwords: "norwegian" },
    StopwordLanguage { iso639_3: "por", iso639_1: "pt", stopwords: "portuguese" },
    StopwordLanguage { iso639_3: "spa", iso639_1: "es", stopwords: "spanish" },
    StopwordLanguage { iso639_3: "swe", iso639_1: "sv", stopwords: "swedish" },
    StopwordLanguage { iso639_3: "tur", iso639_1: "tr", stopwords: "turkish" },
    StopwordLanguage { iso639_3: "rus", iso639_1: "ru", stopwords: "russian" },
];

#[derive(Debug, Clone, PartialEq)]
pub struct DetectedLanguage {
    /// ISO 639-1 code when the language is in the stopword table, ISO 639-3 otherwise.
    pub code: &'static str,
    pub confidence: f64,
    /// Name of the stopword list for this language, if one exists.
    pub stopwords: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LanguageVerdict {
    Detected(DetectedLanguage),
    Undetectable,
}

/// Detects the language of the full normalized text.
///
/// Only a failed detection yields `Undetectable`; a missing stopword list is
/// reported through `DetectedLanguage::stopwords` and is not a rejection.
pub fn classify(text: &str) -> LanguageVerdict {
    let Some(info) = whatlang::detect(text) else {
        return LanguageVerdict::Undetectable;
    };
    let iso639_3 = info.lang().code();
    let entry = STOPWORD_LANGUAGES
        .iter()
        .find(|lang| lang.iso639_3 == iso639_3);
    LanguageVerdict::Detected(DetectedLanguage {
        code: entry.map_or(iso639_3, |lang| lang.iso639_1),
        confidence: info.confidence(),
        stopwords: entry.map(|lang| lang.stopwords),
    })
}

#[cfg(test)]
mod tests {
    use super::{classify, LanguageVerdict, STOPWORD_LANGUAGES};

    #[test]
    fn table_codes_are_unique() {
        for (i, a) in STOPWORD_LANGUAGES.iter().enumerate() {
            for b in &STOPWORD_LANGUAGES[i + 1..] {
                assert_ne!(a.iso639_1, b.iso639_1);
                assert_ne!(a.iso639_3, b.iso639_3);
            }
        }
    }

    #[test]
    fn detection_reports_confidence_and_stopwords() {
        let text = "Привет, как у тебя дела сегодня? Погода хорошая, и мы идём гулять в парк.";
        let LanguageVerdict::Detected(language) = classify(text) else {
            panic!("expected a detected language");
        };
        assert_eq!(language.code, "ru");
        assert_eq!(language.stopwords, Some("russian"));
        assert!(language.confidence > 0.0 && language.confidence <= 1.0);
    }
}
