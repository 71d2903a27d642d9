//! Definition scoring and classification

use crate::keywords::{
    Dictionary, ECLASS_MIN_SCORE, ISA95_MIN_SCORE, eclass_keywords, isa95_keywords,
};
use dpp_model::PartKind;

/// Keyword classifier over free-text definitions
///
/// A domain's score is the number of its distinct phrases occurring as a
/// case-insensitive substring of the text. The best-scoring domain wins if
/// it reaches `min_score`; on a tie the domain listed first in the
/// dictionary wins.
#[derive(Debug, Clone)]
pub struct Classifier {
    dictionary: Dictionary,
    min_score: usize,
}

impl Classifier {
    /// Build a classifier. Phrases are lower-cased and de-duplicated per
    /// domain, keeping their first position.
    #[must_use]
    pub fn new(dictionary: Dictionary, min_score: usize) -> Self {
        let dictionary = dictionary
            .into_iter()
            .map(|(kind, phrases)| {
                let mut distinct: Vec<String> = Vec::with_capacity(phrases.len());
                for phrase in phrases {
                    let phrase = phrase.to_lowercase();
                    if !distinct.contains(&phrase) {
                        distinct.push(phrase);
                    }
                }
                (kind, distinct)
            })
            .collect();
        Self {
            dictionary,
            min_score,
        }
    }

    /// Classifier for ECLASS definitions
    #[must_use]
    pub fn eclass() -> Self {
        Self::new(eclass_keywords(), ECLASS_MIN_SCORE)
    }

    /// Classifier for ISA-95 documentation
    #[must_use]
    pub fn isa95() -> Self {
        Self::new(isa95_keywords(), ISA95_MIN_SCORE)
    }

    #[must_use]
    pub fn min_score(&self) -> usize {
        self.min_score
    }

    /// Domains in dictionary order.
    pub fn domains(&self) -> impl Iterator<Item = PartKind> + '_ {
        self.dictionary.iter().map(|(kind, _)| *kind)
    }

    /// Score of one domain; zero for a domain not in the dictionary.
    #[must_use]
    pub fn score(&self, text: &str, domain: PartKind) -> usize {
        let text = text.to_lowercase();
        self.dictionary
            .iter()
            .find(|(kind, _)| *kind == domain)
            .map_or(0, |(_, phrases)| count_hits(&text, phrases))
    }

    /// Every domain's score, in dictionary order.
    #[must_use]
    pub fn scores(&self, text: &str) -> Vec<(PartKind, usize)> {
        let text = text.to_lowercase();
        self.dictionary
            .iter()
            .map(|(kind, phrases)| (*kind, count_hits(&text, phrases)))
            .collect()
    }

    /// Best domain for a definition, if any reaches the threshold.
    #[must_use]
    pub fn classify(&self, text: &str) -> Option<PartKind> {
        let mut best: Option<(PartKind, usize)> = None;
        for (kind, score) in self.scores(text) {
            if score > best.map_or(0, |(_, s)| s) {
                best = Some((kind, score));
            }
        }

        best.filter(|(_, score)| *score >= self.min_score)
            .map(|(kind, _)| kind)
    }
}

fn count_hits(lowered_text: &str, phrases: &[String]) -> usize {
    phrases
        .iter()
        .filter(|phrase| lowered_text.contains(phrase.as_str()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRANSDUCER: &str = "High-precision pressure transducer for process measurement";

    #[test]
    fn test_transducer_definition_is_sensor() {
        for classifier in [Classifier::eclass(), Classifier::isa95()] {
            assert_eq!(classifier.score(TRANSDUCER, PartKind::Sensor), 2);
            for (kind, score) in classifier.scores(TRANSDUCER) {
                if kind != PartKind::Sensor {
                    assert_eq!(score, 0, "{kind} scored {score}");
                }
            }
            assert_eq!(classifier.classify(TRANSDUCER), Some(PartKind::Sensor));
        }
    }

    #[test]
    fn test_scoring_is_case_insensitive() {
        let classifier = Classifier::eclass();
        assert_eq!(
            classifier.score("Battery", PartKind::EnergyStorage),
            classifier.score("battery", PartKind::EnergyStorage)
        );
        assert_eq!(classifier.score("BATTERY CELL", PartKind::EnergyStorage), 2);
    }

    #[test]
    fn test_repeated_phrase_counts_once() {
        let classifier = Classifier::eclass();
        assert_eq!(classifier.score("fuse fuse fuse", PartKind::Protection), 1);
    }

    #[test]
    fn test_scoring_is_monotonic() {
        let classifier = Classifier::isa95();
        let mut text = String::from("device");
        let mut previous = classifier.score(&text, PartKind::Thermal);
        for phrase in ["heater", "heater", "cooler", "kiln", "temperature"] {
            text.push(' ');
            text.push_str(phrase);
            let current = classifier.score(&text, PartKind::Thermal);
            assert!(current >= previous);
            previous = current;
        }
        assert_eq!(previous, 4);
    }

    #[test]
    fn test_below_threshold_is_unclassified() {
        // Only one ECLASS hit ("fuse"), threshold is two
        assert_eq!(Classifier::eclass().classify("A fuse"), None);
        assert_eq!(Classifier::isa95().classify("A fuse"), Some(PartKind::Protection));
        assert_eq!(Classifier::isa95().classify("nothing relevant here"), None);
    }

    #[test]
    fn test_tie_goes_to_first_domain_in_dictionary() {
        let dictionary = vec![
            (PartKind::Fastener, vec!["bolt".to_string()]),
            (PartKind::Actuator, vec!["drive".to_string()]),
        ];
        let classifier = Classifier::new(dictionary, 1);
        assert_eq!(classifier.classify("drive bolt"), Some(PartKind::Fastener));

        let reversed = vec![
            (PartKind::Actuator, vec!["drive".to_string()]),
            (PartKind::Fastener, vec!["bolt".to_string()]),
        ];
        let classifier = Classifier::new(reversed, 1);
        assert_eq!(classifier.classify("drive bolt"), Some(PartKind::Actuator));
    }

    #[test]
    fn test_custom_phrases_are_normalized() {
        let dictionary = vec![(
            PartKind::Sensor,
            vec!["Probe".to_string(), "probe".to_string()],
        )];
        let classifier = Classifier::new(dictionary, 1);
        assert_eq!(classifier.score("probe", PartKind::Sensor), 1);
        assert_eq!(classifier.score("probe", PartKind::Thermal), 0);
        assert_eq!(classifier.domains().collect::<Vec<_>>(), vec![PartKind::Sensor]);
    }
}
