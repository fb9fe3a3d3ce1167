use crate::core::text::normalize;
use std::collections::HashMap;

/// Resolves free-text skill labels to canonical skill keys.
///
/// The alias table maps normalized phrases ("guitarrist", "lead vocals") to
/// a canonical key ("guitar", "voice"). Labels outside the table are their
/// own canonical key, so unknown instruments still compare consistently.
#[derive(Debug, Clone)]
pub struct AliasResolver {
    aliases: HashMap<String, String>,
}

impl AliasResolver {
    /// Build a resolver from an alias table. Keys and values are normalized
    /// on ingestion so callers can pass display-form phrases.
    pub fn new<I, K, V>(aliases: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let aliases = aliases
            .into_iter()
            .map(|(alias, key)| (normalize(alias.as_ref()), normalize(key.as_ref())))
            .filter(|(alias, key)| !alias.is_empty() && !key.is_empty())
            .collect();
        Self { aliases }
    }

    /// Add or replace alias entries, e.g. from configuration.
    pub fn extend<I, K, V>(&mut self, extra: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (alias, key) in extra {
            let alias = normalize(alias.as_ref());
            let key = normalize(key.as_ref());
            if !alias.is_empty() && !key.is_empty() {
                self.aliases.insert(alias, key);
            }
        }
    }

    /// Canonical key for a skill label: direct alias hit, then the naive
    /// singular (one trailing `s` dropped when longer than 3 chars), then
    /// the normalized label itself.
    pub fn canonical_key(&self, label: &str) -> String {
        let norm = normalize(label);
        if norm.is_empty() {
            return norm;
        }
        if let Some(key) = self.aliases.get(&norm) {
            return key.clone();
        }
        if norm.chars().count() > 3 {
            if let Some(singular) = norm.strip_suffix('s') {
                if let Some(key) = self.aliases.get(singular) {
                    return key.clone();
                }
            }
        }
        norm
    }
}

impl Default for AliasResolver {
    /// Resolver over the built-in instrument synonym families.
    fn default() -> Self {
        let families: &[(&str, &[&str])] = &[
            (
                "voice",
                &[
                    "vocal",
                    "vocals",
                    "vocalist",
                    "singer",
                    "lead vocals",
                    "backing vocals",
                    "voz",
                    "canto",
                ],
            ),
            (
                "guitar",
                &[
                    "guitarist",
                    "guitarrist",
                    "electric guitar",
                    "acoustic guitar",
                    "classical guitar",
                    "lead guitar",
                    "rhythm guitar",
                    "guitarra",
                    "guitarra eletrica",
                    "guitarra acustica",
                    "violao",
                ],
            ),
            (
                "bass",
                &[
                    "bassist",
                    "bass guitar",
                    "electric bass",
                    "double bass",
                    "upright bass",
                    "contrabass",
                    "baixo",
                ],
            ),
            (
                "drums",
                &[
                    "drum",
                    "drummer",
                    "drum kit",
                    "percussion",
                    "percussionist",
                    "bateria",
                ],
            ),
            (
                "keyboard",
                &[
                    "keys",
                    "keyboards",
                    "piano",
                    "pianist",
                    "synth",
                    "synthesizer",
                    "teclado",
                ],
            ),
            ("saxophone", &["sax", "saxophonist", "saxofone"]),
            ("violin", &["violinist", "fiddle", "violino"]),
        ];

        let table = families.iter().flat_map(|(key, aliases)| {
            std::iter::once((*key, *key)).chain(aliases.iter().map(move |alias| (*alias, *key)))
        });
        Self::new(table)
    }
}
