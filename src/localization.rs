use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource};
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::warn;
use unic_langid::LanguageIdentifier;

const FALLBACK_LANGUAGE: &str = "en";

/// Embedded message catalogs, keyed by language code
const RESOURCES: &[(&str, &str)] = &[
    ("en", include_str!("../locales/en/main.ftl")),
    ("fr", include_str!("../locales/fr/main.ftl")),
];

/// Localization manager for user-visible notices
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
}

impl LocalizationManager {
    /// Create a new localization manager with every embedded language loaded
    pub fn new() -> Self {
        let mut bundles = HashMap::new();

        for (code, source) in RESOURCES {
            let locale: LanguageIdentifier = match code.parse() {
                Ok(locale) => locale,
                Err(e) => {
                    warn!("Skipping invalid locale {code}: {e}");
                    continue;
                }
            };
            bundles.insert(code.to_string(), Self::create_bundle(locale, source));
        }

        Self { bundles }
    }

    /// Create a fluent bundle for a specific locale
    fn create_bundle(locale: LanguageIdentifier, source: &str) -> FluentBundle<FluentResource> {
        let mut bundle = FluentBundle::new_concurrent(vec![locale.clone()]);
        // Notices are plain text, no bidi isolation marks around placeables
        bundle.set_use_isolating(false);

        let resource = match FluentResource::try_new(source.to_string()) {
            Ok(resource) => resource,
            Err((resource, errors)) => {
                warn!("Locale {locale} has {} syntax error(s)", errors.len());
                resource
            }
        };
        if let Err(errors) = bundle.add_resource(resource) {
            warn!("Locale {locale} has {} duplicate message(s)", errors.len());
        }

        bundle
    }

    /// Check whether a language code has a bundle
    pub fn is_language_supported(&self, language_code: &str) -> bool {
        self.bundles.contains_key(&normalize_language(language_code))
    }

    /// Get a localized message
    pub fn get_message_in_language(
        &self,
        key: &str,
        language_code: Option<&str>,
        args: &[(&str, &str)],
    ) -> String {
        let language = language_code
            .map(normalize_language)
            .filter(|code| self.bundles.contains_key(code))
            .unwrap_or_else(|| FALLBACK_LANGUAGE.to_string());

        let Some(bundle) = self.bundles.get(&language) else {
            return format!("Missing translation: {key}");
        };

        let pattern = match bundle.get_message(key).and_then(|msg| msg.value()) {
            Some(pattern) => pattern,
            None => return format!("Missing translation: {key}"),
        };

        let mut errors = vec![];
        let value = if args.is_empty() {
            bundle.format_pattern(pattern, None, &mut errors)
        } else {
            let mut fluent_args = FluentArgs::new();
            for (name, value) in args {
                fluent_args.set(*name, *value);
            }
            bundle.format_pattern(pattern, Some(&fluent_args), &mut errors)
        };

        if !errors.is_empty() {
            warn!("Formatting {key} in {language} produced {} error(s)", errors.len());
        }

        value.into_owned()
    }
}

impl Default for LocalizationManager {
    fn default() -> Self {
        Self::new()
    }
}

/// "fr-FR" and "FR" both resolve to the "fr" bundle
fn normalize_language(language_code: &str) -> String {
    language_code
        .split(['-', '_'])
        .next()
        .unwrap_or(language_code)
        .to_lowercase()
}

static LOCALIZATION_MANAGER: LazyLock<LocalizationManager> = LazyLock::new(LocalizationManager::new);

/// Get the global localization manager
pub fn get_localization_manager() -> &'static LocalizationManager {
    &LOCALIZATION_MANAGER
}

/// Convenience function to get a localized message in a language
pub fn t_lang(key: &str, language_code: Option<&str>) -> String {
    get_localization_manager().get_message_in_language(key, language_code, &[])
}

/// Convenience function to get a localized message with arguments in a language
pub fn t_args_lang(key: &str, args: &[(&str, &str)], language_code: Option<&str>) -> String {
    get_localization_manager().get_message_in_language(key, language_code, args)
}
