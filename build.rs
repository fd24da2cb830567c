// build.rs

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

const FALLBACK_LANG: &str = "en";

/// A `lang_*` feature wins over `TOOLWRAP_LANG`; English otherwise.
fn select_language() -> String {
    let mut features: Vec<String> = env::vars()
        .filter_map(|(key, _)| key.strip_prefix("CARGO_FEATURE_LANG_").map(str::to_lowercase))
        .collect();
    features.sort();

    match features.as_slice() {
        [] => env::var("TOOLWRAP_LANG").unwrap_or_else(|_| FALLBACK_LANG.to_string()),
        [only] => only.clone(),
        [first, ..] => {
            println!(
                "cargo:warning=Several lang_* features enabled ({:?}), using '{}'",
                features, first
            );
            first.clone()
        }
    }
}

fn read_locale(lang: &str) -> Option<HashMap<String, String>> {
    let path = format!("locales/{}.toml", lang);
    let content = fs::read_to_string(&path).ok()?;
    Some(toml::from_str(&content).unwrap_or_else(|e| panic!("Invalid locale file {}: {}", path, e)))
}

/// Emits one macro arm per key, sorted for a stable output file.
fn render_macro(translations: &HashMap<String, String>) -> String {
    let mut keys: Vec<&String> = translations.keys().collect();
    keys.sort();

    let mut code = String::from("#[macro_export]\nmacro_rules! t {\n");
    for key in keys {
        let value = translations[key].replace('\\', "\\\\").replace('"', "\\\"");
        code.push_str(&format!("    (\"{}\") => {{ \"{}\" }};\n", key, value));
    }
    code.push_str(
        "    ($key:expr) => {{ compile_error!(concat!(\"Missing translation key: \", $key)) }};\n",
    );
    code.push('}');
    code
}

fn main() {
    let lang = select_language();
    println!("cargo:rustc-env=TOOLWRAP_LANG_EFFECTIVE={}", lang);
    println!("cargo:rerun-if-env-changed=TOOLWRAP_LANG");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=locales/");

    // Every key exists in English; other locales override what they translate.
    let mut translations =
        read_locale(FALLBACK_LANG).expect("locales/en.toml is required");
    if lang != FALLBACK_LANG {
        match read_locale(&lang) {
            Some(overrides) => translations.extend(overrides),
            None => println!("cargo:warning=No locales/{}.toml, falling back to English", lang),
        }
    }

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    fs::write(Path::new(&out_dir).join("translations.rs"), render_macro(&translations))
        .expect("Failed to write translations.rs");
}
